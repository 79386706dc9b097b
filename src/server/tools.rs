use std::fmt::Write as _;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rmcp::model::{JsonObject, Tool};
use rmcp::schemars;
use serde::Deserialize;
use serde_json::Value;

use crate::article::Article;
use crate::config::RepositoryLocation;
use crate::document::language_hint;
use crate::error::DocsError;
use crate::github::{ContentEntry, DEFAULT_BRANCH, Readme, SearchHit};

fn default_branch() -> String {
    DEFAULT_BRANCH.to_string()
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetReadmeRequest {
    #[schemars(description = "the branch to look on first; main and master are tried afterwards")]
    #[serde(default = "default_branch")]
    pub branch: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListFilesRequest {
    #[schemars(description = "the directory to list, relative to the repository root")]
    #[serde(default)]
    pub path: String,

    #[schemars(description = "the branch to list; the repository default branch when omitted")]
    #[serde(default)]
    pub branch: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetFileContentRequest {
    #[schemars(description = "the path of the file to retrieve, e.g. src/index.ts")]
    pub file_path: String,

    #[schemars(description = "the branch to read from")]
    #[serde(default = "default_branch")]
    pub branch: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetArticleRequest {
    #[schemars(description = "the article URL; the configured article when omitted")]
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Default, Deserialize, schemars::JsonSchema)]
pub struct NoArguments {}

/// Every tool the adapter exposes. Descriptors and dispatch both derive
/// from this enum, so a tool cannot be listed without a handler or vice versa.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocTool {
    GetReadme,
    ListFiles,
    GetFileContent,
    SearchDocumentation,
    GetMediumArticle,
    GetFullDocumentation,
}

impl DocTool {
    pub const ALL: [DocTool; 6] = [
        DocTool::GetReadme,
        DocTool::ListFiles,
        DocTool::GetFileContent,
        DocTool::SearchDocumentation,
        DocTool::GetMediumArticle,
        DocTool::GetFullDocumentation,
    ];

    pub fn name(self) -> &'static str {
        match self {
            DocTool::GetReadme => "get_readme",
            DocTool::ListFiles => "list_files",
            DocTool::GetFileContent => "get_file_content",
            DocTool::SearchDocumentation => "search_documentation",
            DocTool::GetMediumArticle => "get_medium_article",
            DocTool::GetFullDocumentation => "get_full_documentation",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tool| tool.name() == name)
    }

    fn description(self) -> &'static str {
        match self {
            DocTool::GetReadme => "Get the repository README, trying common filename casings on the requested branch, then main and master",
            DocTool::ListFiles => "List files and directories at a path in the repository",
            DocTool::GetFileContent => "Get the content of a specific file in the repository",
            DocTool::SearchDocumentation => "Find markdown documentation files anywhere in the repository",
            DocTool::GetMediumArticle => "Fetch the companion article and convert it to readable text",
            DocTool::GetFullDocumentation => "Get README, article and package.json combined into one document",
        }
    }

    fn input_schema(self) -> JsonObject {
        match self {
            DocTool::GetReadme => schema_for::<GetReadmeRequest>(),
            DocTool::ListFiles => schema_for::<ListFilesRequest>(),
            DocTool::GetFileContent => schema_for::<GetFileContentRequest>(),
            DocTool::GetMediumArticle => schema_for::<GetArticleRequest>(),
            DocTool::SearchDocumentation | DocTool::GetFullDocumentation => schema_for::<NoArguments>(),
        }
    }

    pub fn descriptor(self) -> Tool {
        Tool::new(self.name(), self.description(), Arc::new(self.input_schema()))
    }
}

pub fn descriptors() -> Vec<Tool> {
    DocTool::ALL.into_iter().map(DocTool::descriptor).collect()
}

fn schema_for<T: schemars::JsonSchema>() -> JsonObject {
    match serde_json::to_value(schemars::schema_for!(T)) {
        Ok(Value::Object(schema)) => schema,
        _ => JsonObject::new(),
    }
}

pub fn format_readme(location: &RepositoryLocation, readme: &Readme) -> String {
    format!(
        "# README for {}\n\nFile: {}\nBranch: {}\n\n{}",
        location, readme.filename, readme.branch, readme.content
    )
}

pub fn format_listing(location: &RepositoryLocation, path: &str, entries: &[ContentEntry]) -> String {
    let shown_path = match path.trim_matches('/') {
        "" => "/",
        other => other,
    };
    let mut out = format!("Files in {} at {}:\n", location, shown_path);

    if entries.is_empty() {
        out.push_str("\nNo entries found.");
        return out;
    }

    for entry in entries {
        let size = entry
            .size
            .map(|s| format!("{s} bytes"))
            .unwrap_or_else(|| "unknown".to_string());
        let _ = write!(
            out,
            "\n- {} ({})\n  Path: {}\n  Size: {}\n  URL: {}",
            entry.name,
            entry.kind,
            entry.path,
            size,
            entry.display_url()
        );
    }
    out
}

pub fn format_file(
    location: &RepositoryLocation,
    file_path: &str,
    branch: &str,
    entry: &ContentEntry,
    content: &str,
) -> String {
    let size = entry
        .size
        .map(|s| format!("{s} bytes"))
        .unwrap_or_else(|| "unknown".to_string());
    format!(
        "# {}\n\nRepository: {}\nBranch: {}\nSize: {}\n\n```{}\n{}\n```",
        file_path,
        location,
        branch,
        size,
        language_hint(file_path),
        content
    )
}

pub fn format_search(location: &RepositoryLocation, hits: &[SearchHit]) -> String {
    if hits.is_empty() {
        return format!("No documentation files found in {}.", location);
    }

    let mut out = format!("Found {} documentation files in {}:\n", hits.len(), location);
    for hit in hits {
        let _ = write!(
            out,
            "\n- {}\n  Path: {}\n  URL: {}",
            hit.name,
            hit.path,
            hit.html_url.as_deref().unwrap_or("")
        );
    }
    out
}

pub fn format_article(article: &Article) -> String {
    format!("# Article\n\nSource: {}\n\n{}", article.url, article.text)
}

/// Section of the combined document; a failed fetch becomes a placeholder.
pub fn format_section(title: &str, outcome: Result<String, DocsError>) -> String {
    match outcome {
        Ok(body) => body,
        Err(e) => format!("# {title}\n\n{title} not available: {e}"),
    }
}

pub fn format_full_documentation(
    location: &RepositoryLocation,
    generated_at: DateTime<Utc>,
    sections: &[String],
) -> String {
    let mut out = format!(
        "# Complete documentation for {}\n\nGenerated: {}",
        location,
        generated_at.to_rfc3339()
    );
    for section in sections {
        let _ = write!(out, "\n\n---\n\n{}", section);
    }
    out
}
