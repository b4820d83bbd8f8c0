//! E2E tests for the loading screen and hero entrance

use crate::common::fixtures::PageFixture;
use crate::common::mock_github::offline;
use portfolio::events::names;
use portfolio::services::time_source::RealTimeSource;
use portfolio::{Config, Portfolio};
use std::time::Duration;
use tokio::time::{sleep_until, Instant};

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

#[tokio::test(start_paused = true)]
async fn test_loading_screen_then_staggered_entrance() {
    let page = PageFixture::new();
    let mut portfolio = Portfolio::new(
        page.document.clone(),
        Config::default(),
        RealTimeSource::shared(),
        offline(),
    );
    let start = Instant::now();
    portfolio.start();

    sleep_until(start + ms(1999)).await;
    assert!(!page.loading_screen.has_class("hidden"));
    assert!(!portfolio.is_loaded());

    sleep_until(start + ms(2001)).await;
    assert!(page.loading_screen.has_class("hidden"));
    assert!(page.loading_screen.style("display").is_none());

    sleep_until(start + ms(2501)).await;
    assert_eq!(page.loading_screen.style("display").as_deref(), Some("none"));
    assert!(portfolio.is_loaded());
    assert_eq!(
        page.hero_text.style("animation").as_deref(),
        Some("fadeInUp 0.8s ease-out forwards")
    );
    assert!(page.hero_visual.style("animation").is_none());

    sleep_until(start + ms(2701)).await;
    assert_eq!(
        page.hero_visual.style("animation").as_deref(),
        Some("fadeInUp 0.8s ease-out forwards")
    );
    assert_eq!(portfolio.events().count(names::ENTRANCE_STARTED), 2);
    assert_eq!(portfolio.events().count(names::PAGE_LOADED), 1);

    portfolio.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_page_without_loading_screen() {
    let page = PageFixture::new();
    page.document.body().remove_child(&page.loading_screen);
    let mut portfolio = Portfolio::new(
        page.document.clone(),
        Config::default(),
        RealTimeSource::shared(),
        offline(),
    );
    let start = Instant::now();
    portfolio.start();

    sleep_until(start + ms(5000)).await;

    assert!(!portfolio.is_loaded());
    assert!(page.hero_text.style("animation").is_none());
    portfolio.shutdown().await;
}
