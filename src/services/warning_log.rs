//! Warning capture layer for tracing
//!
//! Failures on the page never surface as errors; they degrade to a fallback
//! and leave a WARN line behind (the GitHub widget is the main source). This
//! layer keeps WARN and ERROR events in memory so a host binding can mirror
//! them to its console, and so tests can assert that a fallback was logged.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use tracing::Level;
use tracing_subscriber::layer::Context;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::Layer;

/// Upper bound on retained entries; the oldest are dropped first.
const MAX_ENTRIES: usize = 256;

/// One captured WARN/ERROR event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WarningEntry {
    pub timestamp: String,
    pub level: Level,
    pub target: String,
    pub message: String,
}

impl std::fmt::Display for WarningEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} {}: {}",
            self.timestamp, self.level, self.target, self.message
        )
    }
}

type SharedEntries = Arc<Mutex<Vec<WarningEntry>>>;

/// A tracing layer that records WARN+ events and notifies via channel
pub struct WarningLogLayer {
    entries: SharedEntries,
    sender: mpsc::Sender<()>,
}

/// Handle returned from setup, used to read back captured warnings
pub struct WarningLogHandle {
    /// Receiver that gets notified when a warning is captured
    pub receiver: mpsc::Receiver<()>,
    entries: SharedEntries,
}

impl WarningLogHandle {
    /// Snapshot of captured entries, oldest first.
    pub fn entries(&self) -> Vec<WarningEntry> {
        match self.entries.lock() {
            Ok(entries) => entries.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Whether any captured message contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.entries().iter().any(|e| e.message.contains(needle))
    }
}

/// Create a warning layer and the handle that reads it.
pub fn create() -> (WarningLogLayer, WarningLogHandle) {
    let entries: SharedEntries = Arc::new(Mutex::new(Vec::new()));
    let (sender, receiver) = mpsc::channel();

    let layer = WarningLogLayer {
        entries: entries.clone(),
        sender,
    };
    let handle = WarningLogHandle { receiver, entries };

    (layer, handle)
}

impl<S> Layer<S> for WarningLogLayer
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let level = *event.metadata().level();
        if level > Level::WARN {
            return;
        }

        let mut visitor = StringVisitor::default();
        event.record(&mut visitor);

        let entry = WarningEntry {
            timestamp: chrono::Local::now()
                .format("%Y-%m-%d %H:%M:%S%.3f")
                .to_string(),
            level,
            target: event.metadata().target().to_string(),
            message: visitor.0,
        };

        if let Ok(mut entries) = self.entries.lock() {
            if entries.len() >= MAX_ENTRIES {
                entries.remove(0);
            }
            entries.push(entry);
        }

        let _ = self.sender.send(());
    }
}

/// Flattens the message and fields of an event into one line
#[derive(Default)]
struct StringVisitor(String);

impl StringVisitor {
    fn push_field(&mut self, name: &str, rendered: String) {
        if name == "message" {
            if self.0.is_empty() {
                self.0 = rendered;
            } else {
                self.0 = format!("{} {}", rendered, self.0);
            }
        } else if self.0.is_empty() {
            self.0 = format!("{}={}", name, rendered);
        } else {
            self.0.push_str(&format!(" {}={}", name, rendered));
        }
    }
}

impl tracing::field::Visit for StringVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.push_field(field.name(), format!("{:?}", value));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.push_field(field.name(), value.to_string());
    }
}
