//! Loading screen fade-out followed by the staggered hero entrance.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde_json::json;

use crate::config::LoadingConfig;
use crate::dom::Document;
use crate::events::{names, EventLog};
use crate::services::time_source::SharedTimeSource;

const LOADING_SCREEN: &str = "loading-screen";
const ENTRANCE_TARGETS: &str = ".hero-text, .hero-visual";
const ENTRANCE_ANIMATION: &str = "fadeInUp 0.8s ease-out forwards";

#[derive(Debug, Clone)]
pub struct LoadingScreen {
    document: Document,
    config: LoadingConfig,
    stagger: Duration,
    time: SharedTimeSource,
    events: EventLog,
    loaded: Arc<AtomicBool>,
}

impl LoadingScreen {
    pub fn new(
        document: Document,
        config: LoadingConfig,
        stagger: Duration,
        time: SharedTimeSource,
        events: EventLog,
    ) -> Self {
        Self {
            document,
            config,
            stagger,
            time,
            events,
            loaded: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Whether the loading screen has been dismissed.
    pub fn is_loaded(&self) -> bool {
        self.loaded.load(Ordering::Acquire)
    }

    /// Hide the loading screen and play the entrance animations.
    ///
    /// Returns false, changing nothing, when the page has no loading screen.
    pub async fn run(&self) -> bool {
        let started = self.time.now();
        self.time.sleep(self.config.display()).await;
        let Some(screen) = self.document.by_id(LOADING_SCREEN) else {
            tracing::debug!("no loading screen on page");
            return false;
        };

        screen.add_class("hidden");
        self.time.sleep(self.config.fade()).await;
        screen.set_style("display", "none");
        self.loaded.store(true, Ordering::Release);
        let elapsed_ms = self.time.elapsed_since(started).as_millis() as u64;
        tracing::info!(elapsed_ms, "page loaded in {elapsed_ms}ms");
        self.events
            .emit_named(names::PAGE_LOADED, json!({ "elapsed_ms": elapsed_ms }));

        self.play_entrance().await;
        true
    }

    async fn play_entrance(&self) {
        for (index, element) in self.document.select(ENTRANCE_TARGETS).iter().enumerate() {
            if index > 0 {
                self.time.sleep(self.stagger).await;
            }
            element.set_style("animation", ENTRANCE_ANIMATION);
            self.events
                .emit_named(names::ENTRANCE_STARTED, json!({ "index": index }));
        }
    }
}
