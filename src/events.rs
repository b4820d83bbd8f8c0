//! Page Events - observable notifications about what the page just did
//!
//! - Events are just (name, data) pairs
//! - Names are namespaced strings: "terminal:typed", "github:fallback", "contact:sent"
//! - Data is arbitrary JSON
//!
//! Components emit into a shared `EventLog`; a host binding can forward the
//! events to analytics or devtools, and tests use them to observe ordering.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

/// Names of every event the page emits.
pub mod names {
    pub const PAGE_LOADED: &str = "page:loaded";
    pub const ENTRANCE_STARTED: &str = "page:entrance";

    pub const TERMINAL_TYPED: &str = "terminal:typed";
    pub const TERMINAL_OUTPUT: &str = "terminal:output";
    pub const TERMINAL_CLEARED: &str = "terminal:cleared";
    pub const TERMINAL_STOPPED: &str = "terminal:stopped";

    pub const NAV_SECTION_CHANGED: &str = "nav:section_changed";
    pub const NAV_MENU_TOGGLED: &str = "nav:menu_toggled";

    pub const COUNTER_DONE: &str = "animation:counter_done";
    pub const SKILL_BAR_DONE: &str = "animation:skill_bar_done";
    pub const REVEALED: &str = "animation:revealed";

    pub const GITHUB_RENDERED: &str = "github:rendered";
    pub const GITHUB_FALLBACK: &str = "github:fallback";

    pub const CONTACT_PENDING: &str = "contact:pending";
    pub const CONTACT_SENT: &str = "contact:sent";
    pub const CONTACT_FAILED: &str = "contact:failed";
    pub const CONTACT_RESTORED: &str = "contact:restored";

    pub const NOTIFICATION_SHOWN: &str = "notification:shown";
    pub const NOTIFICATION_REMOVED: &str = "notification:removed";

    /// Every registered event name
    pub fn all() -> &'static [&'static str] {
        &[
            PAGE_LOADED,
            ENTRANCE_STARTED,
            TERMINAL_TYPED,
            TERMINAL_OUTPUT,
            TERMINAL_CLEARED,
            TERMINAL_STOPPED,
            NAV_SECTION_CHANGED,
            NAV_MENU_TOGGLED,
            COUNTER_DONE,
            SKILL_BAR_DONE,
            REVEALED,
            GITHUB_RENDERED,
            GITHUB_FALLBACK,
            CONTACT_PENDING,
            CONTACT_SENT,
            CONTACT_FAILED,
            CONTACT_RESTORED,
            NOTIFICATION_SHOWN,
            NOTIFICATION_REMOVED,
        ]
    }
}

/// A single page event - just a name and some data
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PageEvent {
    pub name: String,
    pub data: Value,
}

impl PageEvent {
    pub fn new(name: impl Into<String>, data: Value) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    pub fn simple(name: impl Into<String>) -> Self {
        Self::new(name, Value::Null)
    }

    /// Check if event name matches a pattern
    /// Patterns can use one "*" as wildcard: "terminal:*", "*:failed"
    pub fn matches(&self, pattern: &str) -> bool {
        if pattern == "*" {
            return true;
        }

        match pattern.split_once('*') {
            None => self.name == pattern,
            Some((prefix, suffix)) if !suffix.contains('*') => {
                self.name.len() >= prefix.len() + suffix.len()
                    && self.name.starts_with(prefix)
                    && self.name.ends_with(suffix)
            }
            Some(_) => self.name == pattern,
        }
    }

    /// Shallow match of the data against an expected value.
    /// `Null` matches anything; object patterns only check listed keys.
    pub fn data_matches(&self, expected: &Value) -> bool {
        match (expected, &self.data) {
            (Value::Null, _) => true,
            (Value::Object(exp_map), Value::Object(data_map)) => {
                exp_map.iter().all(|(k, v)| {
                    data_map
                        .get(k)
                        .is_some_and(|data_v| v.is_null() || v == data_v)
                })
            }
            _ => expected == &self.data,
        }
    }
}

/// Bounded, shared history of page events
#[derive(Debug, Clone)]
pub struct EventLog {
    events: Arc<Mutex<VecDeque<PageEvent>>>,
    max_history: usize,
}

impl EventLog {
    pub fn new(max_history: usize) -> Self {
        Self {
            events: Arc::new(Mutex::new(VecDeque::with_capacity(max_history))),
            max_history: max_history.max(1),
        }
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<PageEvent>> {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn emit(&self, event: PageEvent) {
        tracing::trace!(name = %event.name, "page event");
        let mut events = self.lock();
        if events.len() >= self.max_history {
            events.pop_front();
        }
        events.push_back(event);
    }

    /// Convenience: emit with name and data
    pub fn emit_named(&self, name: impl Into<String>, data: Value) {
        self.emit(PageEvent::new(name, data));
    }

    /// Convenience: emit simple event (no data)
    pub fn emit_simple(&self, name: impl Into<String>) {
        self.emit(PageEvent::simple(name));
    }

    pub fn has_match(&self, name_pattern: &str, data_pattern: &Value) -> bool {
        self.lock()
            .iter()
            .any(|e| e.matches(name_pattern) && e.data_matches(data_pattern))
    }

    /// Take first event matching pattern (removes it and all events before it)
    pub fn take_match(&self, name_pattern: &str, data_pattern: &Value) -> Option<PageEvent> {
        let mut events = self.lock();
        let idx = events
            .iter()
            .position(|e| e.matches(name_pattern) && e.data_matches(data_pattern))?;
        let event = events.get(idx).cloned();
        events.drain(..=idx);
        event
    }

    /// Names of all events currently held, oldest first
    pub fn names(&self) -> Vec<String> {
        self.lock().iter().map(|e| e.name.clone()).collect()
    }

    pub fn count(&self, name_pattern: &str) -> usize {
        self.lock().iter().filter(|e| e.matches(name_pattern)).count()
    }

    pub fn drain(&self) -> Vec<PageEvent> {
        self.lock().drain(..).collect()
    }

    pub fn peek(&self) -> Vec<PageEvent> {
        self.lock().iter().cloned().collect()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new(1024)
    }
}
