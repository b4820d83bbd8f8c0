//! Typing terminal animation.
//!
//! The hero section shows a fake shell that types a command, pauses, prints a
//! canned output block, pauses, erases the command and moves on to the next
//! one, forever:
//!
//! ```text
//! TYPING ──▶ PAUSE_AFTER_TYPE ──▶ SHOWING_OUTPUT ──▶ DELETING ──┐
//!    ▲                                                          │
//!    └──────────────────── next command ◀───────────────────────┘
//! ```
//!
//! `TerminalDriver::step` performs exactly one visible change and returns how
//! long to wait before the next one; `TerminalDriver::run` is that step in a
//! loop on top of a `TimeSource`, checking a `StopSignal` at every boundary.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use serde_json::json;
use unicode_segmentation::UnicodeSegmentation;

use crate::config::{default_command_output, TerminalConfig};
use crate::dom::{Document, Element};
use crate::events::{names, EventLog};
use crate::services::stop::StopSignal;
use crate::services::time_source::SharedTimeSource;

/// Why the terminal could not be set up
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalError {
    /// A display region is not on the page
    MissingRegion(String),
    /// The command list is empty
    EmptyScript,
}

impl fmt::Display for TerminalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TerminalError::MissingRegion(id) => write!(f, "terminal region #{id} not found"),
            TerminalError::EmptyScript => write!(f, "terminal script has no commands"),
        }
    }
}

impl std::error::Error for TerminalError {}

/// Ordered commands plus their canned output
#[derive(Debug, Clone, PartialEq)]
pub struct Script {
    commands: Vec<String>,
    outputs: BTreeMap<String, String>,
    default_output: String,
}

impl Script {
    pub fn new(commands: Vec<String>) -> Result<Self, TerminalError> {
        if commands.is_empty() {
            return Err(TerminalError::EmptyScript);
        }
        Ok(Self {
            commands,
            outputs: BTreeMap::new(),
            default_output: default_command_output(),
        })
    }

    pub fn from_config(config: &TerminalConfig) -> Result<Self, TerminalError> {
        Ok(Self::new(config.commands.clone())?
            .with_outputs(config.outputs.clone())
            .with_default_output(&config.default_output))
    }

    pub fn with_output(mut self, command: &str, output: &str) -> Self {
        self.outputs.insert(command.to_string(), output.to_string());
        self
    }

    pub fn with_outputs(mut self, outputs: BTreeMap<String, String>) -> Self {
        self.outputs.extend(outputs);
        self
    }

    pub fn with_default_output(mut self, output: &str) -> Self {
        self.default_output = output.to_string();
        self
    }

    pub fn commands(&self) -> &[String] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Output for `command`. Never empty: unmapped or blank entries fall back
    /// to the default output, and a blank default to the built-in message.
    pub fn output_for(&self, command: &str) -> String {
        let mapped = self
            .outputs
            .get(command)
            .filter(|o| !o.is_empty())
            .or(Some(&self.default_output).filter(|o| !o.is_empty()));
        match mapped {
            Some(output) => output.clone(),
            None => default_command_output(),
        }
    }
}

/// The two regions the terminal writes into
#[derive(Debug, Clone)]
pub struct TerminalView {
    pub command: Element,
    pub output: Element,
}

impl TerminalView {
    pub fn new(command: Element, output: Element) -> Self {
        Self { command, output }
    }

    /// Find both regions on the page; fails on the first one missing.
    pub fn locate(document: &Document, config: &TerminalConfig) -> Result<Self, TerminalError> {
        let command = document
            .by_id(&config.command_region)
            .ok_or_else(|| TerminalError::MissingRegion(config.command_region.clone()))?;
        let output = document
            .by_id(&config.output_region)
            .ok_or_else(|| TerminalError::MissingRegion(config.output_region.clone()))?;
        Ok(Self { command, output })
    }
}

/// Delays between animation steps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminalTiming {
    pub typing: Duration,
    pub deleting: Duration,
    pub pause_after_type: Duration,
    pub output_hold: Duration,
    pub restart_pause: Duration,
}

impl Default for TerminalTiming {
    fn default() -> Self {
        Self::from_config(&TerminalConfig::default())
    }
}

impl TerminalTiming {
    pub fn from_config(config: &TerminalConfig) -> Self {
        Self {
            typing: Duration::from_millis(config.typing_speed_ms),
            deleting: Duration::from_millis(config.deleting_speed_ms),
            pause_after_type: Duration::from_millis(config.pause_after_type_ms),
            output_hold: Duration::from_millis(config.output_hold_ms),
            restart_pause: Duration::from_millis(config.restart_pause_ms),
        }
    }
}

/// Externally visible animation state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalPhase {
    Typing,
    PauseAfterType,
    ShowingOutput,
    Deleting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// `revealed` graphemes of the current command are on screen
    Typing { revealed: usize },
    PauseAfterType,
    ShowingOutput,
    /// Next write shows the first `remaining` graphemes
    Deleting { remaining: usize },
    /// Command erased; the index moves on after this step
    Advance,
}

/// Owns the cursor state and drives the two regions
#[derive(Debug)]
pub struct TerminalDriver {
    script: Script,
    view: TerminalView,
    timing: TerminalTiming,
    index: usize,
    phase: Phase,
    cycles: u64,
    events: Option<EventLog>,
}

impl TerminalDriver {
    pub fn new(script: Script, view: TerminalView, timing: TerminalTiming) -> Self {
        Self {
            script,
            view,
            timing,
            index: 0,
            phase: Phase::Typing { revealed: 0 },
            cycles: 0,
            events: None,
        }
    }

    /// Build from configuration, locating the regions on the page.
    pub fn from_config(document: &Document, config: &TerminalConfig) -> Result<Self, TerminalError> {
        let script = Script::from_config(config)?;
        let view = TerminalView::locate(document, config)?;
        Ok(Self::new(script, view, TerminalTiming::from_config(config)))
    }

    pub fn with_events(mut self, events: EventLog) -> Self {
        self.events = Some(events);
        self
    }

    /// Index of the command currently being animated.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current_command(&self) -> &str {
        &self.script.commands[self.index]
    }

    /// Number of completed type/show/delete cycles.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    pub fn phase(&self) -> TerminalPhase {
        match self.phase {
            Phase::Typing { .. } => TerminalPhase::Typing,
            Phase::PauseAfterType => TerminalPhase::PauseAfterType,
            Phase::ShowingOutput => TerminalPhase::ShowingOutput,
            Phase::Deleting { .. } | Phase::Advance => TerminalPhase::Deleting,
        }
    }

    pub fn view(&self) -> &TerminalView {
        &self.view
    }

    fn grapheme_len(&self) -> usize {
        self.current_command().graphemes(true).count()
    }

    fn prefix(&self, graphemes: usize) -> String {
        self.current_command().graphemes(true).take(graphemes).collect()
    }

    fn emit(&self, name: &str, data: serde_json::Value) {
        if let Some(events) = &self.events {
            events.emit_named(name, data);
        }
    }

    /// Perform one step and return the delay before the next one.
    pub fn step(&mut self) -> Duration {
        match self.phase {
            Phase::Typing { revealed } => {
                let len = self.grapheme_len();
                if revealed == 0 {
                    self.view.command.set_text("");
                }
                if len == 0 {
                    // Nothing to reveal: go straight to the pause.
                    self.finish_typing();
                    return self.step();
                }
                let revealed = revealed + 1;
                self.view.command.set_text(&self.prefix(revealed));
                if revealed >= len {
                    self.finish_typing();
                } else {
                    self.phase = Phase::Typing { revealed };
                }
                self.timing.typing
            }
            Phase::PauseAfterType => {
                self.phase = Phase::ShowingOutput;
                self.timing.pause_after_type
            }
            Phase::ShowingOutput => {
                let command = self.current_command().to_string();
                self.view.output.set_text(&self.script.output_for(&command));
                self.emit(
                    names::TERMINAL_OUTPUT,
                    json!({ "command": command, "index": self.index }),
                );
                self.phase = Phase::Deleting {
                    remaining: self.grapheme_len(),
                };
                self.timing.output_hold
            }
            Phase::Deleting { remaining } => {
                self.view.command.set_text(&self.prefix(remaining));
                self.phase = match remaining.checked_sub(1) {
                    Some(next) => Phase::Deleting { remaining: next },
                    None => Phase::Advance,
                };
                self.timing.deleting
            }
            Phase::Advance => {
                self.emit(
                    names::TERMINAL_CLEARED,
                    json!({ "command": self.current_command(), "index": self.index }),
                );
                self.index = (self.index + 1) % self.script.len();
                self.cycles += 1;
                self.phase = Phase::Typing { revealed: 0 };
                self.timing.restart_pause
            }
        }
    }

    fn finish_typing(&mut self) {
        self.phase = Phase::PauseAfterType;
        self.emit(
            names::TERMINAL_TYPED,
            json!({ "command": self.current_command(), "index": self.index }),
        );
    }

    /// Animate until `stop` fires, then hand the driver back.
    ///
    /// The regions keep whatever they showed when the stop was observed.
    pub async fn run(mut self, time: SharedTimeSource, mut stop: StopSignal) -> Self {
        tracing::debug!(commands = self.script.len(), "terminal animation started");
        loop {
            if stop.is_stopped() {
                break;
            }
            let delay = self.step();
            if stop.is_stopped() {
                break;
            }
            tokio::select! {
                _ = time.sleep(delay) => {}
                _ = stop.stopped() => break,
            }
        }
        tracing::debug!(cycles = self.cycles, "terminal animation stopped");
        self.emit(names::TERMINAL_STOPPED, json!({ "cycles": self.cycles }));
        self
    }
}
