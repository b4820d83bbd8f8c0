use serde::{Deserialize, Serialize};

/// The subset of `GET /users/{user}` the widget renders
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GithubProfile {
    pub login: String,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub avatar_url: String,

    #[serde(default)]
    pub bio: Option<String>,

    #[serde(default)]
    pub public_repos: u64,

    #[serde(default)]
    pub followers: u64,

    #[serde(default)]
    pub following: u64,
}

impl GithubProfile {
    /// Display name, falling back to the login when unset or blank.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(&self.login)
    }

    pub fn bio_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.bio
            .as_deref()
            .filter(|b| !b.trim().is_empty())
            .unwrap_or(default)
    }
}

/// One entry of `GET /users/{user}/repos`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GithubRepo {
    pub name: String,

    pub html_url: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub language: Option<String>,

    #[serde(default)]
    pub stargazers_count: u64,

    #[serde(default)]
    pub forks_count: u64,
}

/// Everything one successful load produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GithubData {
    pub profile: GithubProfile,
    pub repos: Vec<GithubRepo>,
}
