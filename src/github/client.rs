//! Access to the public GitHub REST API.

use async_trait::async_trait;

use super::models::{GithubProfile, GithubRepo};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GithubError {
    /// Connection, DNS or TLS failure, or an unreadable body
    Transport(String),
    /// The API answered with a non-success status
    Status(u16),
    /// The body was not the JSON shape we expect
    Decode(String),
    /// The blocking fetch task died
    Task(String),
}

impl std::fmt::Display for GithubError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GithubError::Transport(msg) => write!(f, "transport error: {msg}"),
            GithubError::Status(code) => write!(f, "unexpected HTTP status {code}"),
            GithubError::Decode(msg) => write!(f, "malformed response: {msg}"),
            GithubError::Task(msg) => write!(f, "fetch task failed: {msg}"),
        }
    }
}

impl std::error::Error for GithubError {}

/// Source of profile and repository data
#[async_trait]
pub trait GithubApi: Send + Sync {
    async fn profile(&self, username: &str) -> Result<GithubProfile, GithubError>;

    /// Most recently updated repositories, at most `limit` of them.
    async fn repositories(&self, username: &str, limit: usize)
        -> Result<Vec<GithubRepo>, GithubError>;
}

pub fn profile_url(api_base: &str, username: &str) -> String {
    format!("{}/users/{}", api_base.trim_end_matches('/'), username)
}

pub fn repos_url(api_base: &str, username: &str, limit: usize) -> String {
    format!(
        "{}/users/{}/repos?sort=updated&per_page={}",
        api_base.trim_end_matches('/'),
        username,
        limit
    )
}

#[cfg(feature = "http")]
pub use http::HttpGithubClient;

#[cfg(feature = "http")]
mod http {
    use std::time::Duration;

    use async_trait::async_trait;
    use serde::de::DeserializeOwned;

    use super::{profile_url, repos_url, GithubApi, GithubError};
    use crate::config::GithubConfig;
    use crate::github::models::{GithubProfile, GithubRepo};

    const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

    /// `GithubApi` over HTTPS with ureq, run on tokio's blocking pool
    #[derive(Debug, Clone)]
    pub struct HttpGithubClient {
        api_base: String,
        user_agent: String,
        timeout: Duration,
    }

    impl HttpGithubClient {
        pub fn new(api_base: impl Into<String>, user_agent: impl Into<String>) -> Self {
            Self {
                api_base: api_base.into(),
                user_agent: user_agent.into(),
                timeout: REQUEST_TIMEOUT,
            }
        }

        pub fn from_config(config: &GithubConfig) -> Self {
            Self::new(config.api_base.clone(), config.user_agent.clone())
        }

        pub fn with_timeout(mut self, timeout: Duration) -> Self {
            self.timeout = timeout;
            self
        }

        async fn get_json<T>(&self, url: String) -> Result<T, GithubError>
        where
            T: DeserializeOwned + Send + 'static,
        {
            let user_agent = self.user_agent.clone();
            let timeout = self.timeout;
            tokio::task::spawn_blocking(move || fetch_json(&url, &user_agent, timeout))
                .await
                .map_err(|e| GithubError::Task(e.to_string()))?
        }
    }

    fn fetch_json<T: DeserializeOwned>(
        url: &str,
        user_agent: &str,
        timeout: Duration,
    ) -> Result<T, GithubError> {
        tracing::debug!(%url, "GitHub request");
        let response = ureq::get(url)
            .set("User-Agent", user_agent)
            .set("Accept", "application/vnd.github+json")
            .timeout(timeout)
            .call()
            .map_err(|e| match e {
                ureq::Error::Status(code, _) => GithubError::Status(code),
                ureq::Error::Transport(t) => GithubError::Transport(t.to_string()),
            })?;

        let body = response
            .into_string()
            .map_err(|e| GithubError::Transport(e.to_string()))?;
        serde_json::from_str(&body).map_err(|e| GithubError::Decode(e.to_string()))
    }

    #[async_trait]
    impl GithubApi for HttpGithubClient {
        async fn profile(&self, username: &str) -> Result<GithubProfile, GithubError> {
            self.get_json(profile_url(&self.api_base, username)).await
        }

        async fn repositories(
            &self,
            username: &str,
            limit: usize,
        ) -> Result<Vec<GithubRepo>, GithubError> {
            self.get_json(repos_url(&self.api_base, username, limit))
                .await
        }
    }
}
