//! Navigation highlighting, scroll-dependent toggles and the mobile menu.

use std::time::{Duration, Instant};

use serde_json::json;

use crate::config::ScrollConfig;
use crate::dom::{Document, DomEvent, Element};
use crate::events::{names, EventLog};

const ACTIVE: &str = "active";
const SCROLLED: &str = "scrolled";
const VISIBLE: &str = "visible";

/// A smooth scroll the host should perform
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollRequest {
    pub top: f64,
    pub smooth: bool,
}

impl ScrollRequest {
    pub fn smooth_to(top: f64) -> Self {
        Self { top, smooth: true }
    }
}

/// Owns the navbar, nav links, back-to-top button and mobile menu state
#[derive(Debug)]
pub struct Navigation {
    document: Document,
    config: ScrollConfig,
    events: EventLog,
    current_section: Option<String>,
    menu_open: bool,
}

impl Navigation {
    pub fn new(document: Document, config: ScrollConfig, events: EventLog) -> Self {
        Self {
            document,
            config,
            events,
            current_section: None,
            menu_open: false,
        }
    }

    pub fn current_section(&self) -> Option<&str> {
        self.current_section.as_deref()
    }

    pub fn is_menu_open(&self) -> bool {
        self.menu_open
    }

    /// Section containing `scroll_y + nav_offset`, last match wins.
    pub fn section_at(&self, scroll_y: f64) -> Option<Element> {
        let probe = scroll_y + self.config.nav_offset;
        self.document
            .select("section[id]")
            .into_iter()
            .filter(|s| probe >= s.top() && probe < s.top() + s.height())
            .last()
    }

    /// Highlight the link for the section under the probe line.
    ///
    /// Leaves the current highlight alone when no section contains the probe.
    /// Returns the active section id after the update.
    pub fn update_active_nav(&mut self, scroll_y: f64) -> Option<String> {
        let Some(section) = self.section_at(scroll_y) else {
            return self.current_section.clone();
        };
        let Some(id) = section.id() else {
            return self.current_section.clone();
        };

        let href = format!("#{id}");
        for link in self.document.select(".nav-link") {
            link.set_class(ACTIVE, link.attr("href").as_deref() == Some(href.as_str()));
        }

        if self.current_section.as_deref() != Some(id.as_str()) {
            tracing::debug!(section = %id, "active section changed");
            self.events
                .emit_named(names::NAV_SECTION_CHANGED, json!({ "section": id }));
            self.current_section = Some(id);
        }
        self.current_section.clone()
    }

    /// Apply every scroll-position dependent class.
    pub fn on_scroll(&mut self, scroll_y: f64) {
        if let Some(navbar) = self.document.by_id("navbar") {
            navbar.set_class(SCROLLED, scroll_y > self.config.navbar_threshold);
        }
        if let Some(button) = self.document.by_id("back-to-top") {
            button.set_class(VISIBLE, scroll_y > self.config.back_to_top_threshold);
        }
        self.update_active_nav(scroll_y);
    }

    /// Scroll offset that puts `section_id` just below the fixed navbar.
    pub fn scroll_target(&self, section_id: &str) -> Option<f64> {
        let section = self.document.by_id(section_id)?;
        let nav_height = self
            .document
            .select_first(".navbar")
            .map(|n| n.height())
            .unwrap_or(0.0);
        Some(section.top() - nav_height)
    }

    pub fn scroll_to_top(&self) -> ScrollRequest {
        ScrollRequest::smooth_to(0.0)
    }

    /// Route a click on `target`.
    ///
    /// In-page anchors cancel the default jump and yield a smooth scroll;
    /// nav links also close the mobile menu.
    pub fn handle_click(&mut self, target: &Element, event: &mut DomEvent) -> Option<ScrollRequest> {
        if self.document.closest(target, "#mobile-menu").is_some() {
            self.toggle_menu();
            return None;
        }
        if self.document.closest(target, "#back-to-top").is_some() {
            event.prevent_default();
            return Some(self.scroll_to_top());
        }

        let link = self.document.closest(target, "a[href]")?;
        let href = link.attr("href")?;
        let section_id = href.strip_prefix('#')?;

        event.prevent_default();
        let request = self.scroll_target(section_id).map(ScrollRequest::smooth_to);
        if link.has_class("nav-link") {
            self.close_menu();
        }
        request
    }

    fn menu_parts(&self) -> [Option<Element>; 2] {
        [
            self.document.by_id("nav-menu"),
            self.document.by_id("mobile-menu"),
        ]
    }

    /// Open or close the mobile menu; returns whether it is now open.
    pub fn toggle_menu(&mut self) -> bool {
        self.menu_open = !self.menu_open;
        for part in self.menu_parts().into_iter().flatten() {
            part.toggle_class(ACTIVE);
        }
        self.events
            .emit_named(names::NAV_MENU_TOGGLED, json!({ "open": self.menu_open }));
        self.menu_open
    }

    pub fn close_menu(&mut self) {
        let was_open = self.menu_open;
        self.menu_open = false;
        for part in self.menu_parts().into_iter().flatten() {
            part.remove_class(ACTIVE);
        }
        if was_open {
            self.events
                .emit_named(names::NAV_MENU_TOGGLED, json!({ "open": false }));
        }
    }

    /// Wide layouts have no mobile menu.
    pub fn on_resize(&mut self, width: f64) {
        if width > self.config.mobile_breakpoint && self.menu_open {
            self.close_menu();
        }
    }
}

/// Lets a call through at most once per `limit`
#[derive(Debug, Clone)]
pub struct Throttle {
    limit: Duration,
    open_at: Option<Instant>,
}

impl Throttle {
    pub fn new(limit: Duration) -> Self {
        Self {
            limit,
            open_at: None,
        }
    }

    /// Whether a call arriving at `now` should run.
    pub fn ready(&mut self, now: Instant) -> bool {
        match self.open_at {
            Some(open_at) if now < open_at => false,
            _ => {
                self.open_at = Some(now + self.limit);
                true
            }
        }
    }
}

/// Collapses a burst of calls into one
///
/// Trailing mode runs once `wait` has passed since the last call; leading
/// (`immediate`) mode runs on the first call of a burst instead.
#[derive(Debug, Clone)]
pub struct Debounce {
    wait: Duration,
    immediate: bool,
    deadline: Option<Instant>,
}

impl Debounce {
    pub fn new(wait: Duration, immediate: bool) -> Self {
        Self {
            wait,
            immediate,
            deadline: None,
        }
    }

    /// Record a call at `now`; true if it should run right away.
    pub fn call(&mut self, now: Instant) -> bool {
        let idle = self.deadline.map_or(true, |d| now >= d);
        self.deadline = Some(now + self.wait);
        self.immediate && idle
    }

    /// True once when a trailing run is due at `now`.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                !self.immediate
            }
            _ => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }
}
