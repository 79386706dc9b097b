use base64::{Engine as _, engine::general_purpose::STANDARD};
use reqwest::header::{ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;

use crate::config::{AdapterConfig, RepositoryLocation};
use crate::error::{DocsError, Result};

/// Filename casings probed for a README, in priority order.
pub const README_FILENAMES: [&str; 4] = ["README.md", "readme.md", "Readme.md", "README.MD"];

/// Branches tried after the requested one.
pub const FALLBACK_BRANCHES: [&str; 2] = ["main", "master"];

pub const DEFAULT_BRANCH: &str = "main";

const GITHUB_MEDIA_TYPE: &str = "application/vnd.github.v3+json";

pub(crate) const CLIENT_USER_AGENT: &str = concat!("repo-docs-mcp/", env!("CARGO_PKG_VERSION"));

/// A file or directory entry as reported by the contents API.
///
/// Every field is optional upstream as far as we are concerned; missing
/// values fall back to empty strings or `None`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContentEntry {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub path: String,
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub html_url: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

impl ContentEntry {
    /// Browser URL when present, API URL otherwise.
    pub fn display_url(&self) -> &str {
        self.html_url
            .as_deref()
            .or(self.url.as_deref())
            .unwrap_or("")
    }

    /// Decode the base64 `content` field into UTF-8 text.
    pub fn decoded_content(&self) -> Result<String> {
        let encoded = self
            .content
            .as_deref()
            .ok_or_else(|| DocsError::Malformed(format!("{} has no content field", self.path)))?;
        decode_base64(encoded)
    }
}

/// The contents API answers with an object for a file and an array for a directory.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ContentsPayload {
    Listing(Vec<ContentEntry>),
    Single(ContentEntry),
}

impl ContentsPayload {
    pub fn into_entries(self) -> Vec<ContentEntry> {
        match self {
            ContentsPayload::Listing(entries) => entries,
            ContentsPayload::Single(entry) => vec![entry],
        }
    }
}

/// A README located by [`GitHubConnector::get_readme`].
#[derive(Debug, Clone)]
pub struct Readme {
    pub filename: &'static str,
    pub branch: String,
    pub content: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchHit {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub html_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    items: Vec<SearchHit>,
}

/// Decode GitHub's base64 transport encoding, which wraps lines at 60 columns.
pub fn decode_base64(encoded: &str) -> Result<String> {
    let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = STANDARD
        .decode(compact)
        .map_err(|e| DocsError::Malformed(format!("invalid base64 content: {e}")))?;
    String::from_utf8(bytes).map_err(|e| DocsError::Malformed(format!("content is not UTF-8: {e}")))
}

/// Read-only client for the contents and search endpoints of one repository.
#[derive(Clone)]
pub struct GitHubConnector {
    client: Client,
    api_base: String,
    pub location: RepositoryLocation,
    token: Option<String>,
}

impl GitHubConnector {
    pub fn new(client: Client, config: &AdapterConfig) -> Self {
        if config.token.is_some() {
            tracing::info!("Using personal access token for GitHub API");
        }
        Self {
            client,
            api_base: config.api_base.clone(),
            location: config.location.clone(),
            token: config.token.clone(),
        }
    }

    fn repository(&self) -> String {
        self.location.to_string()
    }

    fn contents_url(&self, path: &str) -> String {
        format!(
            "{}/repos/{}/{}/contents/{}",
            self.api_base,
            self.location.owner,
            self.location.repo,
            path.trim_matches('/')
        )
    }

    fn get(&self, url: &str) -> RequestBuilder {
        let request = self
            .client
            .get(url)
            .header(ACCEPT, GITHUB_MEDIA_TYPE)
            .header(USER_AGENT, CLIENT_USER_AGENT);
        match &self.token {
            Some(token) => request.header(AUTHORIZATION, format!("token {token}")),
            None => request,
        }
    }

    fn check_status(&self, response: &Response, what: impl Into<String>) -> Result<()> {
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(DocsError::NotFound {
                what: what.into(),
                repository: self.repository(),
            });
        }
        if !status.is_success() {
            return Err(DocsError::Status {
                status: status.as_u16(),
                what: what.into(),
                repository: self.repository(),
            });
        }
        Ok(())
    }

    /// Fetch the contents endpoint for `path`. Without a branch the upstream
    /// default branch is used.
    pub async fn fetch_contents(&self, path: &str, branch: Option<&str>) -> Result<ContentsPayload> {
        let url = self.contents_url(path);
        tracing::debug!("GET {} (ref: {:?})", url, branch);

        // Pin the branch only when one was asked for
        let mut request = self.get(&url);
        if let Some(branch) = branch {
            request = request.query(&[("ref", branch)]);
        }
        let response = request.send().await?;

        // Map 404 and other non-success statuses to typed errors
        let what = if path.trim_matches('/').is_empty() {
            "repository root".to_string()
        } else {
            format!("path '{}'", path.trim_matches('/'))
        };
        self.check_status(&response, what)?;

        // Either a single entry or a directory listing
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| DocsError::Malformed(e.to_string()))
    }

    /// Probe every branch/filename combination until one yields a README.
    ///
    /// Failed attempts are discarded silently; only exhaustion is reported.
    pub async fn get_readme(&self, branch: &str) -> Result<Readme> {
        let branches = [branch, FALLBACK_BRANCHES[0], FALLBACK_BRANCHES[1]];

        for candidate_branch in branches {
            for filename in README_FILENAMES {
                let Ok(ContentsPayload::Single(entry)) =
                    self.fetch_contents(filename, Some(candidate_branch)).await
                else {
                    continue;
                };
                // An undecodable body counts as a miss
                if let Ok(content) = entry.decoded_content() {
                    return Ok(Readme {
                        filename,
                        branch: candidate_branch.to_string(),
                        content,
                    });
                }
            }
        }

        Err(DocsError::ReadmeNotFound {
            repository: self.repository(),
        })
    }

    /// List the entries at `path`, preserving upstream order.
    pub async fn list_directory(&self, path: &str, branch: Option<&str>) -> Result<Vec<ContentEntry>> {
        Ok(self.fetch_contents(path, branch).await?.into_entries())
    }

    /// Fetch a single file entry, rejecting directories and other entry types.
    pub async fn get_file(&self, path: &str, branch: &str) -> Result<ContentEntry> {
        match self.fetch_contents(path, Some(branch)).await? {
            ContentsPayload::Single(entry) if entry.kind == "file" => Ok(entry),
            ContentsPayload::Single(entry) => Err(DocsError::WrongType {
                path: path.to_string(),
                kind: if entry.kind.is_empty() {
                    "unknown".to_string()
                } else {
                    entry.kind
                },
            }),
            ContentsPayload::Listing(_) => Err(DocsError::WrongType {
                path: path.to_string(),
                kind: "dir".to_string(),
            }),
        }
    }

    /// Search the repository for markdown files via the code-search endpoint.
    pub async fn search_markdown(&self) -> Result<Vec<SearchHit>> {
        let url = format!("{}/search/code", self.api_base);
        let query = format!("extension:md repo:{}", self.repository());
        tracing::debug!("GET {} (q: {})", url, query);

        let response = self.get(&url).query(&[("q", query.as_str())]).send().await?;
        self.check_status(&response, "documentation search")?;

        let body = response.text().await?;
        let results: SearchResponse =
            serde_json::from_str(&body).map_err(|e| DocsError::Malformed(e.to_string()))?;
        Ok(results.items)
    }
}
