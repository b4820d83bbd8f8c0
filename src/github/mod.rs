//! GitHub profile and repository widget.
//!
//! One load per page session: the profile is fetched first, then the
//! repositories. Either both render, or the static fallback fills both
//! regions.

pub mod client;
pub mod models;
pub mod render;

use std::sync::{Arc, Mutex, MutexGuard};

use serde_json::json;

use crate::config::GithubConfig;
use crate::dom::Document;
use crate::events::{names, EventLog};

pub use client::{GithubApi, GithubError};
#[cfg(feature = "http")]
pub use client::HttpGithubClient;
pub use models::{GithubData, GithubProfile, GithubRepo};

const PROFILE_REGION: &str = "github-profile";
const REPOS_REGION: &str = "github-repos";

/// What the widget ended up showing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Rendered,
    Fallback,
}

#[derive(Clone)]
pub struct GithubWidget {
    api: Arc<dyn GithubApi>,
    config: GithubConfig,
    document: Document,
    events: EventLog,
    data: Arc<Mutex<Option<GithubData>>>,
}

impl std::fmt::Debug for GithubWidget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GithubWidget")
            .field("username", &self.config.username)
            .field("loaded", &self.data().is_some())
            .finish()
    }
}

impl GithubWidget {
    pub fn new(
        api: Arc<dyn GithubApi>,
        config: GithubConfig,
        document: Document,
        events: EventLog,
    ) -> Self {
        Self {
            api,
            config,
            document,
            events,
            data: Arc::new(Mutex::new(None)),
        }
    }

    fn lock_data(&self) -> MutexGuard<'_, Option<GithubData>> {
        self.data
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Data from the last successful load.
    pub fn data(&self) -> Option<GithubData> {
        self.lock_data().clone()
    }

    async fn fetch(&self) -> Result<GithubData, GithubError> {
        let username = &self.config.username;
        let profile = self.api.profile(username).await?;
        let mut repos = self
            .api
            .repositories(username, self.config.repo_limit)
            .await?;
        repos.truncate(self.config.repo_limit);
        Ok(GithubData { profile, repos })
    }

    /// Fetch and render; never fails, falling back to static markup.
    pub async fn load(&self) -> LoadOutcome {
        match self.fetch().await {
            Ok(data) => {
                self.render(&data);
                self.events.emit_named(
                    names::GITHUB_RENDERED,
                    json!({ "login": data.profile.login, "repos": data.repos.len() }),
                );
                *self.lock_data() = Some(data);
                LoadOutcome::Rendered
            }
            Err(e) => {
                tracing::warn!(error = %e, user = %self.config.username, "GitHub data could not be loaded");
                self.render_fallback();
                self.events
                    .emit_named(names::GITHUB_FALLBACK, json!({ "error": e.to_string() }));
                LoadOutcome::Fallback
            }
        }
    }

    fn render(&self, data: &GithubData) {
        if let Some(region) = self.document.by_id(PROFILE_REGION) {
            region.set_html(&render::render_profile(&data.profile, &self.config.default_bio));
        }
        if let Some(region) = self.document.by_id(REPOS_REGION) {
            region.set_html(&render::render_repos(&data.repos));
        }
    }

    pub fn render_fallback(&self) {
        if let Some(region) = self.document.by_id(PROFILE_REGION) {
            region.set_html(&render::render_fallback_profile(
                &self.config.fallback_name,
                &self.config.fallback_tagline,
                &self.config.profile_url(),
            ));
        }
        if let Some(region) = self.document.by_id(REPOS_REGION) {
            region.set_html(&render::render_fallback_repos());
        }
    }
}
