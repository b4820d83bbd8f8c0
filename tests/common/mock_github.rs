// Local stand-in for the GitHub REST API

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

/// Canned reply for one endpoint
#[derive(Clone)]
pub struct Reply {
    pub status: u16,
    pub body: String,
}

impl Reply {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// A tiny_http server answering `/users/{user}` and `/users/{user}/repos`
///
/// Stops when dropped.
pub struct MockGithub {
    pub url: String,
    requests: Arc<Mutex<Vec<String>>>,
    stop_tx: mpsc::Sender<()>,
}

impl MockGithub {
    pub fn start(profile: Reply, repos: Reply) -> Self {
        let server = tiny_http::Server::http("127.0.0.1:0").expect("Failed to start test server");
        let port = server.server_addr().to_ip().unwrap().port();
        let url = format!("http://127.0.0.1:{}", port);
        let requests = Arc::new(Mutex::new(Vec::new()));
        let (stop_tx, stop_rx) = mpsc::channel::<()>();

        let seen = requests.clone();
        thread::spawn(move || loop {
            if stop_rx.try_recv().is_ok() {
                break;
            }

            match server.recv_timeout(Duration::from_millis(50)) {
                Ok(Some(request)) => {
                    let path = request.url().to_string();
                    seen.lock().unwrap().push(path.clone());
                    let reply = if path.contains("/repos") {
                        &repos
                    } else {
                        &profile
                    };
                    let response = tiny_http::Response::from_string(reply.body.clone())
                        .with_status_code(reply.status)
                        .with_header(
                            tiny_http::Header::from_bytes(
                                &b"Content-Type"[..],
                                &b"application/json"[..],
                            )
                            .unwrap(),
                        );
                    let _ = request.respond(response);
                }
                Ok(None) => {}
                Err(_) => break,
            }
        });

        Self {
            url,
            requests,
            stop_tx,
        }
    }

    /// Paths requested so far, in order
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

impl Drop for MockGithub {
    fn drop(&mut self) {
        let _ = self.stop_tx.send(());
    }
}

pub fn profile_json() -> String {
    serde_json::json!({
        "login": "AsimMerchant",
        "name": "Asim Merchant",
        "avatar_url": "https://avatars.githubusercontent.com/u/1",
        "bio": "Firmware & embedded systems",
        "public_repos": 24,
        "followers": 42,
        "following": 7
    })
    .to_string()
}

pub fn repos_json(count: usize) -> String {
    let languages = ["C", "Python", "C++", "Rust"];
    let repos: Vec<serde_json::Value> = (0..count)
        .map(|i| {
            serde_json::json!({
                "name": format!("project-{i}"),
                "html_url": format!("https://github.com/AsimMerchant/project-{i}"),
                "description": if i % 2 == 0 { serde_json::Value::Null } else { format!("Project number {i}").into() },
                "language": languages[i % languages.len()],
                "stargazers_count": i,
                "forks_count": 0
            })
        })
        .collect();
    serde_json::Value::Array(repos).to_string()
}

/// In-process `GithubApi` that always fails, for pages that never go online
pub struct OfflineGithub;

#[async_trait::async_trait]
impl portfolio::github::GithubApi for OfflineGithub {
    async fn profile(
        &self,
        _username: &str,
    ) -> Result<portfolio::github::GithubProfile, portfolio::github::GithubError> {
        Err(portfolio::github::GithubError::Transport(
            "offline".to_string(),
        ))
    }

    async fn repositories(
        &self,
        _username: &str,
        _limit: usize,
    ) -> Result<Vec<portfolio::github::GithubRepo>, portfolio::github::GithubError> {
        Err(portfolio::github::GithubError::Transport(
            "offline".to_string(),
        ))
    }
}

pub fn offline() -> Arc<dyn portfolio::github::GithubApi> {
    Arc::new(OfflineGithub)
}

/// Offline `GithubApi` that counts how often each endpoint was asked for
#[derive(Default)]
pub struct CountingGithub {
    pub profile_calls: std::sync::atomic::AtomicUsize,
    pub repo_calls: std::sync::atomic::AtomicUsize,
}

#[async_trait::async_trait]
impl portfolio::github::GithubApi for CountingGithub {
    async fn profile(
        &self,
        _username: &str,
    ) -> Result<portfolio::github::GithubProfile, portfolio::github::GithubError> {
        self.profile_calls
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        Err(portfolio::github::GithubError::Status(503))
    }

    async fn repositories(
        &self,
        _username: &str,
        _limit: usize,
    ) -> Result<Vec<portfolio::github::GithubRepo>, portfolio::github::GithubError> {
        self.repo_calls
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        Ok(Vec::new())
    }
}
