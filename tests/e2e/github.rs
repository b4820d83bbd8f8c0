//! E2E tests for the GitHub widget against a local HTTP server

use crate::common::fixtures::PageFixture;
use crate::common::mock_github::{profile_json, repos_json, MockGithub, Reply};
use crate::common::tracing::{capture_warnings, init_tracing};
use portfolio::config::GithubConfig;
use portfolio::events::{names, EventLog};
use portfolio::github::{GithubWidget, HttpGithubClient, LoadOutcome};
use portfolio::services::time_source::RealTimeSource;
use portfolio::{Config, Portfolio};
use std::sync::Arc;
use std::time::{Duration, Instant};

fn widget(page: &PageFixture, server: &MockGithub) -> (GithubWidget, EventLog) {
    let config = GithubConfig {
        api_base: server.url.clone(),
        ..GithubConfig::default()
    };
    let events = EventLog::default();
    let client = HttpGithubClient::from_config(&config).with_timeout(Duration::from_secs(5));
    (
        GithubWidget::new(Arc::new(client), config, page.document.clone(), events.clone()),
        events,
    )
}

fn assert_fallback(page: &PageFixture) {
    let profile = page.github_profile.html();
    assert!(profile.contains("github-fallback"), "profile: {profile}");
    assert!(profile.contains("Asim Merchant"));
    assert!(profile.contains("https://github.com/AsimMerchant"));
    assert!(!profile.contains("github-avatar"));
    assert!(page.github_repos.html().contains("repo-fallback"));
    assert!(!page.github_repos.html().contains("repo-card"));
}

#[tokio::test]
async fn test_profile_and_repos_render() {
    init_tracing();
    let server = MockGithub::start(Reply::ok(profile_json()), Reply::ok(repos_json(3)));
    let page = PageFixture::new();
    let (widget, events) = widget(&page, &server);

    assert_eq!(widget.load().await, LoadOutcome::Rendered);

    let profile = page.github_profile.html();
    assert!(profile.contains("<h3 class=\"github-name\">Asim Merchant</h3>"));
    assert!(profile.contains("Firmware &amp; embedded systems"));
    assert!(profile.contains(">42</span>"));

    let repos = page.github_repos.html();
    assert_eq!(repos.matches("repo-card").count(), 3);
    assert!(repos.contains("No description available"));
    assert!(repos.contains("Project number 1"));
    assert!(repos.contains("background-color: #555555"));
    assert!(repos.contains("⭐ 2"));

    assert_eq!(
        server.requests(),
        vec![
            "/users/AsimMerchant".to_string(),
            "/users/AsimMerchant/repos?sort=updated&per_page=6".to_string()
        ]
    );
    assert_eq!(widget.data().unwrap().profile.followers, 42);
    assert!(events.has_match(names::GITHUB_RENDERED, &serde_json::Value::Null));
}

#[tokio::test]
async fn test_never_more_than_six_repos() {
    let server = MockGithub::start(Reply::ok(profile_json()), Reply::ok(repos_json(9)));
    let page = PageFixture::new();
    let (widget, _) = widget(&page, &server);

    widget.load().await;

    assert_eq!(page.github_repos.html().matches("repo-card").count(), 6);
}

#[tokio::test]
async fn test_repo_failure_falls_back_for_both_regions() {
    let server = MockGithub::start(
        Reply::ok(profile_json()),
        Reply::status(500, r#"{"message": "Server Error"}"#),
    );
    let page = PageFixture::new();
    let (widget, events) = widget(&page, &server);
    let (warnings, _guard) = capture_warnings();

    assert_eq!(widget.load().await, LoadOutcome::Fallback);

    assert_fallback(&page);
    assert!(widget.data().is_none());
    assert!(warnings.contains("GitHub data could not be loaded"));
    assert!(events.has_match(names::GITHUB_FALLBACK, &serde_json::Value::Null));
}

#[tokio::test]
async fn test_malformed_profile_skips_repo_request() {
    let server = MockGithub::start(Reply::ok("{\"login\": "), Reply::ok(repos_json(3)));
    let page = PageFixture::new();
    let (widget, _) = widget(&page, &server);

    assert_eq!(widget.load().await, LoadOutcome::Fallback);

    assert_fallback(&page);
    assert_eq!(server.requests().len(), 1);
}

#[tokio::test]
async fn test_rate_limited_profile_falls_back() {
    let server = MockGithub::start(
        Reply::status(403, r#"{"message": "API rate limit exceeded"}"#),
        Reply::ok(repos_json(3)),
    );
    let page = PageFixture::new();
    let (widget, _) = widget(&page, &server);

    assert_eq!(widget.load().await, LoadOutcome::Fallback);
    assert_fallback(&page);
}

#[tokio::test]
async fn test_portfolio_start_loads_github() {
    let server = MockGithub::start(Reply::ok(profile_json()), Reply::ok(repos_json(2)));
    let page = PageFixture::new();
    let config = Config {
        github: GithubConfig {
            api_base: server.url.clone(),
            ..GithubConfig::default()
        },
        ..Config::default()
    };
    let mut portfolio =
        Portfolio::with_http_github(page.document.clone(), config, RealTimeSource::shared());

    portfolio.start();

    let deadline = Instant::now() + Duration::from_secs(5);
    while portfolio.github_data().is_none() && Instant::now() < deadline {
        tokio::time::sleep(Duration::from_millis(20)).await;
    }

    assert_eq!(portfolio.github_data().unwrap().repos.len(), 2);
    assert_eq!(page.github_repos.html().matches("repo-card").count(), 2);
    portfolio.shutdown().await;
}
