//! Contact form: field focus styling and the submit sequence.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::config::ContactConfig;
use crate::dom::{Document, DomEvent, Element};
use crate::events::{names, EventLog};
use crate::notification::{NotificationKind, Notifications};
use crate::services::time_source::SharedTimeSource;

const FORM_ID: &str = "contact-form";
const FIELDS: &str = "input, textarea";
const SUBMIT: &str = "button[type=\"submit\"]";
const FOCUSED: &str = "focused";

pub const PENDING_LABEL: &str = "<i class=\"fas fa-spinner fa-spin\"></i> Sending...";
pub const SENT_LABEL: &str = "<i class=\"fas fa-check\"></i> Message Sent!";
pub const ERROR_LABEL: &str = "<i class=\"fas fa-exclamation-triangle\"></i> Error";
pub const SENT_MESSAGE: &str = "Message sent successfully! I'll get back to you soon.";
pub const ERROR_MESSAGE: &str = "Sorry, there was an error sending your message. Please try again.";

/// Named field values captured at submit time
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormData {
    fields: BTreeMap<String, String>,
}

impl FormData {
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendError {
    /// The delivery service refused the message
    Rejected(String),
    /// The delivery service could not be reached
    Unavailable(String),
}

impl std::fmt::Display for SendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SendError::Rejected(msg) => write!(f, "message rejected: {msg}"),
            SendError::Unavailable(msg) => write!(f, "delivery unavailable: {msg}"),
        }
    }
}

impl std::error::Error for SendError {}

/// Delivers a submitted message
#[async_trait]
pub trait MessageSender: Send + Sync {
    async fn send(&self, data: &FormData) -> Result<(), SendError>;
}

/// Waits a fixed delay and reports success without sending anything
#[derive(Debug, Clone)]
pub struct SimulatedSender {
    delay: Duration,
    time: SharedTimeSource,
}

impl SimulatedSender {
    pub fn new(delay: Duration, time: SharedTimeSource) -> Self {
        Self { delay, time }
    }
}

#[async_trait]
impl MessageSender for SimulatedSender {
    async fn send(&self, data: &FormData) -> Result<(), SendError> {
        tracing::debug!(fields = data.len(), "simulating message delivery");
        self.time.sleep(self.delay).await;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Sent,
    Failed,
    /// Arrived while a previous submission was still in flight
    Ignored,
}

/// A submission that has entered the pending state
#[derive(Debug, Clone)]
pub struct Submission {
    button: Option<Element>,
    label_html: String,
    label_text: String,
    data: FormData,
}

impl Submission {
    pub fn data(&self) -> &FormData {
        &self.data
    }
}

#[derive(Clone)]
pub struct ContactForm {
    form: Element,
    document: Document,
    config: ContactConfig,
    sender: Arc<dyn MessageSender>,
    notifications: Notifications,
    time: SharedTimeSource,
    events: EventLog,
}

impl std::fmt::Debug for ContactForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContactForm")
            .field("form", &self.form)
            .finish_non_exhaustive()
    }
}

impl ContactForm {
    /// Bind to `#contact-form`; `None` when the page has no form.
    pub fn bind(
        document: &Document,
        config: ContactConfig,
        sender: Arc<dyn MessageSender>,
        notifications: Notifications,
        time: SharedTimeSource,
        events: EventLog,
    ) -> Option<Self> {
        let form = document.by_id(FORM_ID)?;
        Some(Self {
            form,
            document: document.clone(),
            config,
            sender,
            notifications,
            time,
            events,
        })
    }

    pub fn form(&self) -> &Element {
        &self.form
    }

    pub fn fields(&self) -> Vec<Element> {
        self.form.select(FIELDS)
    }

    pub fn submit_button(&self) -> Option<Element> {
        self.form.select_first(SUBMIT)
    }

    fn owns(&self, field: &Element) -> bool {
        self.fields().iter().any(|f| f.ptr_eq(field))
    }

    pub fn focus(&self, field: &Element) {
        if !self.owns(field) {
            return;
        }
        if let Some(group) = self.document.parent_of(field) {
            group.add_class(FOCUSED);
        }
    }

    /// Drop the focus styling unless the field holds a value.
    pub fn blur(&self, field: &Element) {
        if !self.owns(field) || !field.value().is_empty() {
            return;
        }
        if let Some(group) = self.document.parent_of(field) {
            group.remove_class(FOCUSED);
        }
    }

    pub fn form_data(&self) -> FormData {
        let mut data = FormData::default();
        for field in self.fields() {
            if let Some(name) = field.attr("name") {
                data.insert(name, field.value());
            }
        }
        data
    }

    pub fn reset(&self) {
        for field in self.fields() {
            field.set_value("");
        }
    }

    /// Cancel the native submit and enter the pending state.
    ///
    /// Returns `None` when the submit control is disabled, i.e. a previous
    /// submission has not finished yet.
    pub fn begin(&self, event: &mut DomEvent) -> Option<Submission> {
        event.prevent_default();

        let button = self.submit_button();
        if button.as_ref().is_some_and(Element::is_disabled) {
            tracing::debug!("submit ignored while a message is in flight");
            return None;
        }

        let (label_html, label_text) = button
            .as_ref()
            .map(|b| (b.html(), b.text()))
            .unwrap_or_default();
        if let Some(button) = &button {
            button.set_html(PENDING_LABEL);
            button.set_disabled(true);
        }

        let data = self.form_data();
        self.events
            .emit_named(names::CONTACT_PENDING, json!({ "fields": data.len() }));
        Some(Submission {
            button,
            label_html,
            label_text,
            data,
        })
    }

    /// Send, show the outcome, then restore the control after the hold time.
    pub async fn complete(&self, submission: Submission) -> SubmitOutcome {
        let result = self.sender.send(&submission.data).await;
        let button = submission.button.as_ref();

        let outcome = match result {
            Ok(()) => {
                if let Some(button) = button {
                    button.set_html(SENT_LABEL);
                    button.set_style("background", "var(--success-color)");
                }
                self.reset();
                self.notifications
                    .show(SENT_MESSAGE, NotificationKind::Success);
                self.events.emit_simple(names::CONTACT_SENT);
                SubmitOutcome::Sent
            }
            Err(e) => {
                tracing::warn!(error = %e, "contact message could not be sent");
                if let Some(button) = button {
                    button.set_html(ERROR_LABEL);
                    button.set_style("background", "var(--error-color)");
                }
                self.notifications
                    .show(ERROR_MESSAGE, NotificationKind::Error);
                self.events
                    .emit_named(names::CONTACT_FAILED, json!({ "error": e.to_string() }));
                SubmitOutcome::Failed
            }
        };

        self.time.sleep(self.config.restore_delay()).await;
        if let Some(button) = button {
            if submission.label_html.is_empty() {
                button.set_text(&submission.label_text);
            } else {
                button.set_html(&submission.label_html);
            }
            button.set_disabled(false);
            button.set_style("background", "");
        }
        self.events.emit_simple(names::CONTACT_RESTORED);
        outcome
    }

    pub async fn submit(&self, event: &mut DomEvent) -> SubmitOutcome {
        match self.begin(event) {
            Some(submission) => self.complete(submission).await,
            None => SubmitOutcome::Ignored,
        }
    }
}
