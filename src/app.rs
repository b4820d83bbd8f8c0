//! Page wiring: binds every component to one document and routes host events.

use std::sync::Arc;

use tokio::task::{AbortHandle, JoinHandle};

use crate::animation::{Animator, ScrollReveal};
use crate::config::Config;
use crate::contact::{ContactForm, MessageSender, SimulatedSender, SubmitOutcome};
use crate::dom::{Document, DomEvent, Element, Viewport};
use crate::events::EventLog;
use crate::github::{GithubApi, GithubData, GithubWidget};
use crate::loading::LoadingScreen;
use crate::navigation::{Navigation, ScrollRequest, Throttle};
use crate::notification::Notifications;
use crate::services::stop::{stop_pair, StopHandle, StopSignal};
use crate::services::time_source::SharedTimeSource;
use crate::terminal::TerminalDriver;

/// The interactive page
///
/// Construct once per page load, call [`Portfolio::start`] from inside a
/// tokio runtime, then forward host events to the `on_*` methods.
pub struct Portfolio {
    document: Document,
    config: Config,
    time: SharedTimeSource,
    events: EventLog,
    navigation: Navigation,
    scroll_throttle: Throttle,
    reveal: ScrollReveal,
    animator: Animator,
    loading: LoadingScreen,
    github: GithubWidget,
    notifications: Notifications,
    contact: Option<ContactForm>,
    stop_handle: StopHandle,
    stop_signal: StopSignal,
    terminal: Option<JoinHandle<TerminalDriver>>,
    tasks: Vec<AbortHandle>,
    started: bool,
    scroll_y: f64,
}

impl std::fmt::Debug for Portfolio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Portfolio")
            .field("scroll_y", &self.scroll_y)
            .field("tasks", &self.tasks.len())
            .field("terminal_running", &self.terminal.is_some())
            .finish_non_exhaustive()
    }
}

impl Portfolio {
    pub fn new(
        document: Document,
        config: Config,
        time: SharedTimeSource,
        github_api: Arc<dyn GithubApi>,
    ) -> Self {
        let events = EventLog::default();
        let navigation = Navigation::new(document.clone(), config.scroll.clone(), events.clone());
        let reveal = ScrollReveal::bind(&document, &config.animation);
        let animator = Animator::new(config.animation.clone(), time.clone(), events.clone());
        let loading = LoadingScreen::new(
            document.clone(),
            config.loading.clone(),
            config.animation.entrance_stagger(),
            time.clone(),
            events.clone(),
        );
        let github = GithubWidget::new(
            github_api,
            config.github.clone(),
            document.clone(),
            events.clone(),
        );
        let notifications = Notifications::new(
            document.clone(),
            config.notifications.clone(),
            time.clone(),
            events.clone(),
        );
        let sender: Arc<dyn MessageSender> = Arc::new(SimulatedSender::new(
            config.contact.simulated_delay(),
            time.clone(),
        ));
        let contact = ContactForm::bind(
            &document,
            config.contact.clone(),
            sender,
            notifications.clone(),
            time.clone(),
            events.clone(),
        );
        let (stop_handle, stop_signal) = stop_pair();

        Self {
            scroll_throttle: Throttle::new(config.scroll.throttle()),
            document,
            config,
            time,
            events,
            navigation,
            reveal,
            animator,
            loading,
            github,
            notifications,
            contact,
            stop_handle,
            stop_signal,
            terminal: None,
            tasks: Vec::new(),
            started: false,
            scroll_y: 0.0,
        }
    }

    /// Build a page that loads GitHub data over HTTPS.
    #[cfg(feature = "http")]
    pub fn with_http_github(document: Document, config: Config, time: SharedTimeSource) -> Self {
        let api = Arc::new(crate::github::HttpGithubClient::from_config(&config.github));
        Self::new(document, config, time, api)
    }

    /// Replace the simulated contact delivery.
    pub fn with_sender(mut self, sender: Arc<dyn MessageSender>) -> Self {
        self.contact = ContactForm::bind(
            &self.document,
            self.config.contact.clone(),
            sender,
            self.notifications.clone(),
            self.time.clone(),
            self.events.clone(),
        );
        self
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn events(&self) -> &EventLog {
        &self.events
    }

    pub fn github_data(&self) -> Option<GithubData> {
        self.github.data()
    }

    pub fn current_section(&self) -> Option<&str> {
        self.navigation.current_section()
    }

    pub fn is_loaded(&self) -> bool {
        self.loading.is_loaded()
    }

    pub fn is_menu_open(&self) -> bool {
        self.navigation.is_menu_open()
    }

    fn track(&mut self, handle: AbortHandle) {
        self.tasks.retain(|t| !t.is_finished());
        self.tasks.push(handle);
    }

    fn spawn(&mut self, task: impl std::future::Future<Output = ()> + Send + 'static) {
        let handle = tokio::spawn(task).abort_handle();
        self.track(handle);
    }

    /// Kick off every independent component.
    ///
    /// Runs once per page; later calls are ignored.
    pub fn start(&mut self) {
        if self.started {
            tracing::debug!("portfolio page already started");
            return;
        }
        self.started = true;
        tracing::info!(user = %self.config.github.username, "starting portfolio page");

        let loading = self.loading.clone();
        self.spawn(async move {
            loading.run().await;
        });

        match TerminalDriver::from_config(&self.document, &self.config.terminal) {
            Ok(driver) => {
                let driver = driver.with_events(self.events.clone());
                let time = self.time.clone();
                let stop = self.stop_signal.clone();
                self.terminal = Some(tokio::spawn(driver.run(time, stop)));
            }
            Err(e) => tracing::warn!(error = %e, "terminal animation disabled"),
        }

        let github = self.github.clone();
        self.spawn(async move {
            github.load().await;
        });

        self.navigation.update_active_nav(self.scroll_y);
    }

    /// Window `load`: fill skill bars, count up stats, refresh the nav.
    pub fn on_load(&mut self) {
        let animator = self.animator.clone();
        let document = self.document.clone();
        self.spawn(async move {
            animator.animate_skill_bars(&document).await;
        });

        let animator = self.animator.clone();
        let document = self.document.clone();
        self.spawn(async move {
            animator.animate_counters(&document).await;
        });

        self.navigation.update_active_nav(self.scroll_y);
    }

    pub fn on_scroll(&mut self, viewport: Viewport) {
        self.scroll_y = viewport.scroll_y;
        self.navigation.on_scroll(viewport.scroll_y);

        for reveal in self.reveal.reveal(&viewport, &self.events) {
            let animator = self.animator.clone();
            self.spawn(async move {
                animator.play(&reveal).await;
            });
        }
    }

    /// Scroll handler limited to one run per throttle window.
    ///
    /// Returns whether this event was handled.
    pub fn on_scroll_throttled(&mut self, viewport: Viewport) -> bool {
        if !self.scroll_throttle.ready(self.time.now()) {
            return false;
        }
        self.on_scroll(viewport);
        true
    }

    pub fn on_resize(&mut self, width: f64) {
        self.navigation.on_resize(width);
    }

    /// Document-level click on `target`.
    pub fn on_click(&mut self, target: &Element, event: &mut DomEvent) -> Option<ScrollRequest> {
        if self.notifications.handle_click(target) {
            return None;
        }
        self.navigation.handle_click(target, event)
    }

    /// Form `submit`; the pending state is applied before this returns.
    pub fn submit_contact(&mut self, event: &mut DomEvent) -> Option<JoinHandle<SubmitOutcome>> {
        let form = self.contact.clone()?;
        let submission = form.begin(event)?;
        let task = tokio::spawn(async move { form.complete(submission).await });
        self.track(task.abort_handle());
        Some(task)
    }

    pub fn focus_field(&self, field: &Element) {
        if let Some(form) = &self.contact {
            form.focus(field);
        }
    }

    pub fn blur_field(&self, field: &Element) {
        if let Some(form) = &self.contact {
            form.blur(field);
        }
    }

    /// Stop the terminal, leaving its text in place, and abort other tasks.
    pub async fn shutdown(&mut self) -> Option<TerminalDriver> {
        self.stop_handle.stop();
        for task in self.tasks.drain(..) {
            task.abort();
        }
        self.notifications.abort_all();
        let terminal = self.terminal.take()?;
        match terminal.await {
            Ok(driver) => Some(driver),
            Err(e) => {
                tracing::warn!(error = %e, "terminal task failed");
                None
            }
        }
    }
}

impl Drop for Portfolio {
    fn drop(&mut self) {
        self.stop_handle.stop();
        for task in &self.tasks {
            task.abort();
        }
        self.notifications.abort_all();
    }
}
