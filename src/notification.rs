//! Toast notifications that slide in, wait, and slide back out.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use serde_json::json;
use tokio::sync::Notify;
use tokio::task::{AbortHandle, JoinHandle};

use crate::config::NotificationConfig;
use crate::dom::{Document, Element};
use crate::events::{names, EventLog};
use crate::services::time_source::SharedTimeSource;

const HIDDEN: &str = "translateX(100%)";
const SHOWN: &str = "translateX(0)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
    Info,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Success => "success",
            NotificationKind::Error => "error",
            NotificationKind::Info => "info",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            NotificationKind::Success => "fa-check-circle",
            _ => "fa-exclamation-circle",
        }
    }

    fn border(&self) -> &'static str {
        match self {
            NotificationKind::Success => "1px solid var(--success-color)",
            _ => "1px solid var(--error-color)",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

struct Active {
    element: Element,
    dismiss: Arc<Notify>,
}

/// A shown notification
#[derive(Debug)]
pub struct NotificationHandle {
    element: Element,
    dismiss: Arc<Notify>,
    task: JoinHandle<()>,
}

impl NotificationHandle {
    pub fn element(&self) -> &Element {
        &self.element
    }

    /// Start the exit transition now instead of waiting for auto-dismiss.
    pub fn dismiss(&self) {
        self.dismiss.notify_one();
    }

    /// Wait until the notification has been removed from the page.
    pub async fn closed(self) {
        if let Err(e) = self.task.await {
            tracing::debug!(error = %e, "notification task ended abnormally");
        }
    }
}

/// Creates notifications at the end of the page body
#[derive(Clone)]
pub struct Notifications {
    document: Document,
    config: NotificationConfig,
    time: SharedTimeSource,
    events: EventLog,
    active: Arc<Mutex<Vec<Active>>>,
    lifecycles: Arc<Mutex<Vec<AbortHandle>>>,
}

impl fmt::Debug for Notifications {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Notifications")
            .field("active", &self.lock_active().len())
            .finish()
    }
}

impl Notifications {
    pub fn new(
        document: Document,
        config: NotificationConfig,
        time: SharedTimeSource,
        events: EventLog,
    ) -> Self {
        Self {
            document,
            config,
            time,
            events,
            active: Arc::new(Mutex::new(Vec::new())),
            lifecycles: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn lock_active(&self) -> MutexGuard<'_, Vec<Active>> {
        self.active
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn lock_lifecycles(&self) -> MutexGuard<'_, Vec<AbortHandle>> {
        self.lifecycles
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Abort every pending lifecycle, leaving the toasts where they are.
    pub fn abort_all(&self) {
        for handle in self.lock_lifecycles().drain(..) {
            handle.abort();
        }
    }

    /// Number of notifications currently on the page.
    pub fn active_count(&self) -> usize {
        self.lock_active().len()
    }

    fn build(message: &str, kind: NotificationKind) -> Element {
        let element = Element::new("div")
            .with_class("notification")
            .with_class(&format!("notification-{kind}"))
            .with_child(Element::new("i").with_class("fas").with_class(kind.icon()))
            .with_child(Element::new("span").with_text(message))
            .with_child(
                Element::new("button")
                    .with_class("notification-close")
                    .with_child(Element::new("i").with_class("fas").with_class("fa-times")),
            );
        element.set_style("border", kind.border());
        element.set_style("transform", HIDDEN);
        element.set_style("transition", "transform 0.3s ease-out");
        element
    }

    /// Append a notification to the page and schedule its lifecycle.
    ///
    /// Must be called from within a tokio runtime.
    pub fn show(&self, message: &str, kind: NotificationKind) -> NotificationHandle {
        let element = Self::build(message, kind);
        let dismiss = Arc::new(Notify::new());
        self.document.body().append_child(element.clone());
        self.lock_active().push(Active {
            element: element.clone(),
            dismiss: dismiss.clone(),
        });
        self.events.emit_named(
            names::NOTIFICATION_SHOWN,
            json!({ "kind": kind.as_str(), "message": message }),
        );

        let task = tokio::spawn(self.clone().lifecycle(element.clone(), dismiss.clone()));
        {
            let mut lifecycles = self.lock_lifecycles();
            lifecycles.retain(|h| !h.is_finished());
            lifecycles.push(task.abort_handle());
        }
        NotificationHandle {
            element,
            dismiss,
            task,
        }
    }

    async fn lifecycle(self, element: Element, dismiss: Arc<Notify>) {
        let slide_in = self.config.slide_in();
        let mut dismissed = tokio::select! {
            _ = self.time.sleep(slide_in) => false,
            _ = dismiss.notified() => true,
        };

        if !dismissed {
            element.set_style("transform", SHOWN);
            let remaining = self.config.auto_dismiss().saturating_sub(slide_in);
            dismissed = tokio::select! {
                _ = self.time.sleep(remaining) => false,
                _ = dismiss.notified() => true,
            };
        }

        element.set_style("transform", HIDDEN);
        self.time.sleep(self.config.exit_transition()).await;
        self.document.body().remove_child(&element);
        self.lock_active().retain(|a| !a.element.ptr_eq(&element));
        self.events.emit_named(
            names::NOTIFICATION_REMOVED,
            json!({ "dismissed": dismissed }),
        );
    }

    /// Dismiss the notification whose close control contains `target`.
    pub fn handle_click(&self, target: &Element) -> bool {
        let Some(close) = self.document.closest(target, ".notification-close") else {
            return false;
        };
        let active = self.lock_active();
        match active.iter().find(|a| a.element.contains_child(&close)) {
            Some(a) => {
                a.dismiss.notify_one();
                true
            }
            None => false,
        }
    }
}
