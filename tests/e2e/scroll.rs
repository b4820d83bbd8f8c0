//! E2E tests for scroll-driven navigation state

use crate::common::fixtures::PageFixture;
use crate::common::mock_github::offline;
use portfolio::dom::{DomEvent, Viewport};
use portfolio::navigation::ScrollRequest;
use portfolio::services::time_source::RealTimeSource;
use portfolio::{Config, Portfolio};
use std::time::Duration;

fn portfolio(page: &PageFixture) -> Portfolio {
    Portfolio::new(
        page.document.clone(),
        Config::default(),
        RealTimeSource::shared(),
        offline(),
    )
}

fn at(scroll_y: f64) -> Viewport {
    Viewport::new(scroll_y, 1280.0, 800.0)
}

#[tokio::test]
async fn test_back_to_top_scenario() {
    let page = PageFixture::new();
    let mut portfolio = portfolio(&page);

    portfolio.on_scroll(at(600.0));
    assert!(page.back_to_top.has_class("visible"));
    assert!(page.navbar.has_class("scrolled"));

    portfolio.on_scroll(at(0.0));
    assert!(!page.back_to_top.has_class("visible"));
    assert!(!page.navbar.has_class("scrolled"));
}

#[tokio::test]
async fn test_exactly_one_link_tracks_the_section() {
    let page = PageFixture::new();
    let mut portfolio = portfolio(&page);

    for (scroll_y, expected) in [
        (0.0, "#home"),
        (850.0, "#about"),
        (1499.0, "#about"),
        (1500.0, "#experience"),
        (3950.0, "#contact"),
        (2400.0, "#skills"),
    ] {
        portfolio.on_scroll(at(scroll_y));
        assert_eq!(
            page.active_links(),
            vec![expected.to_string()],
            "scroll position {scroll_y}"
        );
    }
}

#[tokio::test]
async fn test_initial_highlight_on_start() {
    let page = PageFixture::new();
    let mut portfolio = portfolio(&page);

    portfolio.start();

    assert_eq!(portfolio.current_section(), Some("home"));
    assert_eq!(page.active_links(), vec!["#home".to_string()]);
    portfolio.shutdown().await;
}

#[tokio::test]
async fn test_nav_click_smooth_scrolls_below_navbar() {
    let page = PageFixture::new();
    let mut portfolio = portfolio(&page);
    let mut event = DomEvent::new();

    let request = portfolio.on_click(page.nav_link("skills"), &mut event);

    assert!(event.default_prevented());
    assert_eq!(request, Some(ScrollRequest::smooth_to(2500.0 - 70.0)));
}

#[tokio::test]
async fn test_mobile_menu_lifecycle() {
    let page = PageFixture::new();
    let mut portfolio = portfolio(&page);
    let bar = page.mobile_menu.children()[0].clone();

    portfolio.on_click(&bar, &mut DomEvent::new());
    assert!(portfolio.is_menu_open());
    assert!(page.nav_menu.has_class("active"));
    assert!(page.mobile_menu.has_class("active"));

    // A narrow resize keeps it open, clicking a link closes it.
    portfolio.on_resize(400.0);
    assert!(portfolio.is_menu_open());
    portfolio.on_click(page.nav_link("about"), &mut DomEvent::new());
    assert!(!portfolio.is_menu_open());
    assert!(!page.nav_menu.has_class("active"));

    portfolio.on_click(&bar, &mut DomEvent::new());
    portfolio.on_resize(1024.0);
    assert!(!portfolio.is_menu_open());
    assert!(!page.mobile_menu.has_class("active"));
}

#[tokio::test]
async fn test_back_to_top_click() {
    let page = PageFixture::new();
    let mut portfolio = portfolio(&page);

    let request = portfolio.on_click(&page.back_to_top, &mut DomEvent::new());

    assert_eq!(request, Some(ScrollRequest::smooth_to(0.0)));
}

#[tokio::test(start_paused = true)]
async fn test_throttled_scroll_runs_once_per_window() {
    let page = PageFixture::new();
    let mut portfolio = portfolio(&page);

    assert!(portfolio.on_scroll_throttled(at(600.0)));
    assert!(!portfolio.on_scroll_throttled(at(0.0)));
    assert!(page.back_to_top.has_class("visible"));

    tokio::time::sleep(Duration::from_millis(16)).await;
    assert!(portfolio.on_scroll_throttled(at(0.0)));
    assert!(!page.back_to_top.has_class("visible"));
}
