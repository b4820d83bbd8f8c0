//! Counter and skill-bar animations, plus the scroll reveal that triggers them.
//!
//! Both animations are a fixed-duration ramp from zero: every tick adds
//! `target / (duration / tick)` and the displayed value is floored, with the
//! last tick clamped to exactly the target. Elements are marked when they
//! start animating so repeated triggers are no-ops.

use std::time::Duration;

use serde_json::json;
use tokio::task::JoinSet;

use crate::config::AnimationConfig;
use crate::dom::{Document, Element, Viewport};
use crate::events::{names, EventLog};
use crate::services::time_source::SharedTimeSource;

/// Marks a counter whose ramp has finished
pub const COUNTED: &str = "counted";
/// Marks a counter whose ramp is in flight
pub const COUNTING: &str = "counting";
/// Marks a skill item whose bar has been (or is being) filled
pub const ANIMATED_SKILL: &str = "animated-skill";
/// Added to every element the scroll reveal watches
pub const ANIMATE_ON_SCROLL: &str = "animate-on-scroll";
/// Added once a watched element has scrolled into view
pub const ANIMATED: &str = "animated";

const REVEAL_TARGETS: &str = ".timeline-item, .skill-item, .stat-item";
const COUNTER_SELECTOR: &str = ".stat-number[data-target]";
const SKILL_BAR_SELECTOR: &str = ".skill-progress[data-width]";

/// Linear ramp from zero to a target in fixed ticks
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ramp {
    target: f64,
    increment: f64,
    current: f64,
    finished: bool,
}

impl Ramp {
    pub fn new(target: f64, duration: Duration, tick: Duration) -> Self {
        let target = if target.is_finite() { target.max(0.0) } else { 0.0 };
        let ticks = if tick.is_zero() {
            1.0
        } else {
            (duration.as_secs_f64() / tick.as_secs_f64()).max(1.0)
        };
        Self {
            target,
            increment: target / ticks,
            current: 0.0,
            finished: false,
        }
    }

    /// Advance one tick and return the value to display.
    pub fn tick(&mut self) -> f64 {
        if !self.finished {
            self.current += self.increment;
            if self.current >= self.target {
                self.current = self.target;
                self.finished = true;
            }
        }
        self.displayed()
    }

    /// Floored while in flight, exact once finished.
    pub fn displayed(&self) -> f64 {
        if self.finished {
            self.target
        } else {
            self.current.floor()
        }
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn target(&self) -> f64 {
        self.target
    }
}

/// Result of one animation request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationOutcome {
    Completed,
    /// Already animated (or animating); nothing changed
    Skipped,
    /// The element carried no usable target
    Invalid,
}

/// Runs ramps against page elements
#[derive(Debug, Clone)]
pub struct Animator {
    config: AnimationConfig,
    time: SharedTimeSource,
    events: EventLog,
}

impl Animator {
    pub fn new(config: AnimationConfig, time: SharedTimeSource, events: EventLog) -> Self {
        Self {
            config,
            time,
            events,
        }
    }

    fn ramp(&self, target: f64) -> Ramp {
        Ramp::new(target, self.config.ramp_duration(), self.config.tick())
    }

    /// Count a `.stat-number[data-target]` element up from zero.
    pub async fn animate_counter(&self, counter: &Element) -> AnimationOutcome {
        if counter.has_class(COUNTED) {
            return AnimationOutcome::Skipped;
        }
        let raw = counter.attr("data-target");
        let Some(target) = raw.as_deref().and_then(|v| v.trim().parse::<u64>().ok()) else {
            tracing::warn!(value = ?raw, "counter has no usable data-target");
            return AnimationOutcome::Invalid;
        };

        // Claim, then re-check: a finishing run swaps COUNTING for COUNTED under one lock.
        if !counter.insert_class(COUNTING) {
            return AnimationOutcome::Skipped;
        }
        if counter.has_class(COUNTED) {
            counter.remove_class(COUNTING);
            return AnimationOutcome::Skipped;
        }
        let mut ramp = self.ramp(target as f64);
        while !ramp.is_finished() {
            self.time.sleep(self.config.tick()).await;
            let shown = ramp.tick() as u64;
            counter.set_text(&shown.to_string());
        }
        counter.replace_class(COUNTING, COUNTED);

        self.events
            .emit_named(names::COUNTER_DONE, json!({ "target": target }));
        AnimationOutcome::Completed
    }

    /// Fill the `.skill-progress[data-width]` bar inside a `.skill-item`.
    pub async fn animate_skill_bar(&self, item: &Element) -> AnimationOutcome {
        let Some(bar) = item.select_first(SKILL_BAR_SELECTOR) else {
            return AnimationOutcome::Invalid;
        };
        let raw = bar.attr("data-width").unwrap_or_default();
        let Some(width) = parse_percentage(&raw) else {
            tracing::warn!(value = %raw, "skill bar has no usable data-width");
            return AnimationOutcome::Invalid;
        };

        if !item.insert_class(ANIMATED_SKILL) {
            return AnimationOutcome::Skipped;
        }
        self.time.sleep(self.config.skill_bar_delay()).await;

        let mut ramp = self.ramp(width);
        bar.set_style("width", "0%");
        while !ramp.is_finished() {
            self.time.sleep(self.config.tick()).await;
            bar.set_style("width", &format!("{}%", ramp.tick()));
        }

        self.events
            .emit_named(names::SKILL_BAR_DONE, json!({ "width": width }));
        AnimationOutcome::Completed
    }

    /// Start every counter on the page; returns when all have finished.
    pub async fn animate_counters(&self, document: &Document) {
        let mut set = JoinSet::new();
        for counter in document.select(COUNTER_SELECTOR) {
            let animator = self.clone();
            set.spawn(async move { animator.animate_counter(&counter).await });
        }
        while set.join_next().await.is_some() {}
    }

    /// Fill every skill bar on the page; returns when all have finished.
    pub async fn animate_skill_bars(&self, document: &Document) {
        let mut items: Vec<Element> = Vec::new();
        for bar in document.select(SKILL_BAR_SELECTOR) {
            if let Some(item) = document.closest(&bar, ".skill-item") {
                if !items.iter().any(|i| i.ptr_eq(&item)) {
                    items.push(item);
                }
            }
        }
        let mut set = JoinSet::new();
        for item in items {
            let animator = self.clone();
            set.spawn(async move { animator.animate_skill_bar(&item).await });
        }
        while set.join_next().await.is_some() {}
    }

    /// Run whatever animation a revealed element calls for.
    pub async fn play(&self, reveal: &Reveal) -> AnimationOutcome {
        match &reveal.kind {
            RevealKind::Counter(counter) => self.animate_counter(counter).await,
            RevealKind::SkillBar => self.animate_skill_bar(&reveal.element).await,
            RevealKind::Plain => AnimationOutcome::Skipped,
        }
    }
}

/// Parse `"85"` or `"85%"` into a percentage clamped to 0..=100.
fn parse_percentage(raw: &str) -> Option<f64> {
    let value: f64 = raw.trim().trim_end_matches('%').trim().parse().ok()?;
    value.is_finite().then(|| value.clamp(0.0, 100.0))
}

/// What a revealed element should animate
#[derive(Debug, Clone)]
pub enum RevealKind {
    /// A `.stat-item`; carries its number element
    Counter(Element),
    /// A `.skill-item`
    SkillBar,
    /// Timeline entries and anything else: the class change is the animation
    Plain,
}

#[derive(Debug, Clone)]
pub struct Reveal {
    pub element: Element,
    pub kind: RevealKind,
}

/// Watches the reveal targets and reports the ones that scrolled into view
#[derive(Debug, Clone)]
pub struct ScrollReveal {
    watched: Vec<Element>,
    offset: f64,
    threshold: f64,
}

impl ScrollReveal {
    /// Mark every reveal target with `animate-on-scroll` and start watching it.
    pub fn bind(document: &Document, config: &AnimationConfig) -> Self {
        let watched = document.select(REVEAL_TARGETS);
        for element in &watched {
            element.add_class(ANIMATE_ON_SCROLL);
        }
        Self {
            watched,
            offset: config.trigger_offset,
            threshold: config.visibility_threshold,
        }
    }

    pub fn watched(&self) -> &[Element] {
        &self.watched
    }

    /// Fraction of `element` inside the viewport trimmed by the trigger offset.
    pub fn visible_fraction(&self, element: &Element, viewport: &Viewport) -> f64 {
        let root_top = viewport.scroll_y + self.offset;
        let root_bottom = viewport.bottom() - self.offset;
        let top = element.top();
        let bottom = top + element.height();

        if element.height() <= 0.0 {
            return if top >= root_top && top <= root_bottom {
                1.0
            } else {
                0.0
            };
        }
        let overlap = (bottom.min(root_bottom) - top.max(root_top)).max(0.0);
        overlap / element.height()
    }

    fn is_intersecting(&self, element: &Element, viewport: &Viewport) -> bool {
        let fraction = self.visible_fraction(element, viewport);
        fraction > 0.0 && fraction >= self.threshold
    }

    /// Mark newly visible elements `animated` and describe what each should play.
    pub fn reveal(&self, viewport: &Viewport, events: &EventLog) -> Vec<Reveal> {
        let mut revealed = Vec::new();
        for element in &self.watched {
            if element.has_class(ANIMATED) || !self.is_intersecting(element, viewport) {
                continue;
            }
            element.add_class(ANIMATED);

            let kind = if element.has_class("stat-item") {
                match element.select_first(COUNTER_SELECTOR) {
                    Some(counter) => RevealKind::Counter(counter),
                    None if element.has_attr("data-target") => {
                        RevealKind::Counter(element.clone())
                    }
                    None => RevealKind::Plain,
                }
            } else if element.has_class("skill-item") {
                RevealKind::SkillBar
            } else {
                RevealKind::Plain
            };

            events.emit_named(
                names::REVEALED,
                json!({ "classes": element.classes(), "top": element.top() }),
            );
            revealed.push(Reveal {
                element: element.clone(),
                kind,
            });
        }
        revealed
    }
}
