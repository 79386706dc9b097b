use std::fmt;

/// Public GitHub REST endpoint.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Article served by `get_medium_article` when no override is configured.
pub const DEFAULT_ARTICLE_URL: &str = "https://www.anthropic.com/news/model-context-protocol";

/// The single repository this process serves documentation for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryLocation {
    pub owner: String,
    pub repo: String,
}

impl RepositoryLocation {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
        }
    }
}

impl fmt::Display for RepositoryLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

/// Everything the adapter needs to reach its upstreams.
#[derive(Debug, Clone)]
pub struct AdapterConfig {
    pub location: RepositoryLocation,
    /// Base of the GitHub REST API, without trailing slash.
    pub api_base: String,
    pub article_url: String,
    pub token: Option<String>,
}

impl AdapterConfig {
    pub fn new(location: RepositoryLocation) -> Self {
        Self {
            location,
            api_base: DEFAULT_API_BASE.to_string(),
            article_url: DEFAULT_ARTICLE_URL.to_string(),
            token: None,
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_article_url(mut self, url: impl Into<String>) -> Self {
        self.article_url = url.into();
        self
    }

    /// Blank tokens are ignored so an exported-but-empty `GITHUB_TOKEN` behaves like an unset one.
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.trim().is_empty());
        self
    }
}
