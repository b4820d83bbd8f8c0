//! Markup for the profile card and repository grid.

use super::models::{GithubProfile, GithubRepo};

const DEFAULT_LANGUAGE_COLOR: &str = "#586069";

const LANGUAGE_COLORS: &[(&str, &str)] = &[
    ("JavaScript", "#f1e05a"),
    ("Python", "#3572A5"),
    ("C", "#555555"),
    ("C++", "#f34b7d"),
    ("Java", "#b07219"),
    ("HTML", "#e34c26"),
    ("CSS", "#1572B6"),
    ("TypeScript", "#2b7489"),
    ("Shell", "#89e051"),
    ("Assembly", "#6E4C13"),
    ("Makefile", "#427819"),
];

/// Dot color for a repository language.
pub fn language_color(language: &str) -> &'static str {
    LANGUAGE_COLORS
        .iter()
        .find(|(name, _)| *name == language)
        .map(|(_, color)| *color)
        .unwrap_or(DEFAULT_LANGUAGE_COLOR)
}

/// Escape text for use in element content or a quoted attribute.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn stat(value: u64, label: &str) -> String {
    format!(
        "<div class=\"github-stat\">\
         <span class=\"github-stat-number\">{value}</span>\
         <span class=\"github-stat-label\">{label}</span>\
         </div>"
    )
}

pub fn render_profile(profile: &GithubProfile, default_bio: &str) -> String {
    let name = escape_html(profile.display_name());
    format!(
        "<img src=\"{avatar}\" alt=\"{name}\" class=\"github-avatar\">\
         <h3 class=\"github-name\">{name}</h3>\
         <p class=\"github-bio\">{bio}</p>\
         <div class=\"github-stats\">{repos}{followers}{following}</div>",
        avatar = escape_html(&profile.avatar_url),
        bio = escape_html(profile.bio_or(default_bio)),
        repos = stat(profile.public_repos, "Repositories"),
        followers = stat(profile.followers, "Followers"),
        following = stat(profile.following, "Following"),
    )
}

fn render_repo(repo: &GithubRepo) -> String {
    let description = repo
        .description
        .as_deref()
        .filter(|d| !d.trim().is_empty())
        .unwrap_or("No description available");

    let mut stats = String::new();
    if let Some(language) = repo.language.as_deref().filter(|l| !l.is_empty()) {
        stats.push_str(&format!(
            "<span class=\"repo-language\">\
             <span class=\"language-dot\" style=\"background-color: {}\"></span>{}</span>",
            language_color(language),
            escape_html(language)
        ));
    }
    if repo.stargazers_count > 0 {
        stats.push_str(&format!("<span>⭐ {}</span>", repo.stargazers_count));
    }
    if repo.forks_count > 0 {
        stats.push_str(&format!("<span>🍴 {}</span>", repo.forks_count));
    }

    format!(
        "<a href=\"{url}\" target=\"_blank\" rel=\"noopener\" class=\"repo-card\">\
         <h4 class=\"repo-name\"><i class=\"fab fa-github\"></i> {name}</h4>\
         <p class=\"repo-description\">{description}</p>\
         <div class=\"repo-stats\">{stats}</div>\
         </a>",
        url = escape_html(&repo.html_url),
        name = escape_html(&repo.name),
        description = escape_html(description),
    )
}

/// One card per repository, in the given order.
pub fn render_repos(repos: &[GithubRepo]) -> String {
    repos.iter().map(render_repo).collect()
}

/// Static profile card shown when the API could not be used.
pub fn render_fallback_profile(name: &str, tagline: &str, profile_url: &str) -> String {
    format!(
        "<div class=\"github-fallback\">\
         <h3>{}</h3>\
         <p>{}</p>\
         <a href=\"{}\" target=\"_blank\" rel=\"noopener\" class=\"btn btn-primary\">\
         <i class=\"fab fa-github\"></i> Visit GitHub Profile</a>\
         </div>",
        escape_html(name),
        escape_html(tagline),
        escape_html(profile_url)
    )
}

pub fn render_fallback_repos() -> String {
    "<div class=\"repo-fallback\">\
     <p>Visit my GitHub profile to see my latest projects and contributions.</p>\
     </div>"
        .to_string()
}
