//! MCP server: tool descriptors, dispatch and the documentation handlers.

mod tools;

use std::sync::Arc;

use chrono::Utc;
use reqwest::Client;
use rmcp::model::{
    CallToolRequestParam, CallToolResult, Content, Implementation, JsonObject, ListToolsResult,
    PaginatedRequestParam, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{Error as McpError, RoleServer, ServerHandler, service::RequestContext};
use serde_json::Value;

pub use tools::{
    DocTool, GetArticleRequest, GetFileContentRequest, GetReadmeRequest, ListFilesRequest,
    NoArguments, descriptors,
};

use crate::article::ArticleFetcher;
use crate::config::AdapterConfig;
use crate::error::{DocsError, Result};
use crate::github::{DEFAULT_BRANCH, GitHubConnector};

/// Manifest included in the combined documentation.
pub const MANIFEST_PATH: &str = "package.json";

/// Prefix marking a tool response as a failure.
pub const ERROR_MARKER: &str = "Error: ";

#[derive(Clone)]
pub struct DocsAdapter {
    github: GitHubConnector,
    articles: Arc<ArticleFetcher>,
}

impl DocsAdapter {
    pub fn new(config: &AdapterConfig) -> anyhow::Result<Self> {
        let client = Client::builder().build()?;
        Ok(Self {
            github: GitHubConnector::new(client.clone(), config),
            articles: Arc::new(ArticleFetcher::new(client, config.article_url.clone())?),
        })
    }

    /// Run the named tool and wrap the outcome in a text envelope.
    ///
    /// Failures, including unknown tool names, come back as ordinary text
    /// starting with [`ERROR_MARKER`] rather than as protocol errors.
    pub async fn dispatch(&self, name: &str, arguments: JsonObject) -> CallToolResult {
        tracing::info!("Tool invoked: {}", name);

        // Resolve the tool and run its handler
        let outcome = match DocTool::from_name(name) {
            Some(tool) => self.invoke(tool, arguments).await,
            None => Err(DocsError::UnknownTool(name.to_string())),
        };

        // Failures are reported as text, never as protocol errors
        let text = match outcome {
            Ok(text) => text,
            Err(e) => {
                tracing::error!("Tool {} failed: {}", name, e);
                format!("{ERROR_MARKER}{e}")
            }
        };
        CallToolResult::success(vec![Content::text(text)])
    }

    async fn invoke(&self, tool: DocTool, arguments: JsonObject) -> Result<String> {
        let arguments = Value::Object(arguments);
        match tool {
            DocTool::GetReadme => {
                let GetReadmeRequest { branch } = serde_json::from_value(arguments)?;
                self.get_readme(&branch).await
            }
            DocTool::ListFiles => {
                let ListFilesRequest { path, branch } = serde_json::from_value(arguments)?;
                self.list_files(&path, branch.as_deref()).await
            }
            DocTool::GetFileContent => {
                let GetFileContentRequest { file_path, branch } = serde_json::from_value(arguments)?;
                self.get_file_content(&file_path, &branch).await
            }
            DocTool::SearchDocumentation => self.search_documentation().await,
            DocTool::GetMediumArticle => {
                let GetArticleRequest { url } = serde_json::from_value(arguments)?;
                self.get_medium_article(url.as_deref()).await
            }
            DocTool::GetFullDocumentation => self.get_full_documentation().await,
        }
    }

    pub async fn get_readme(&self, branch: &str) -> Result<String> {
        let readme = self.github.get_readme(branch).await?;
        Ok(tools::format_readme(&self.github.location, &readme))
    }

    pub async fn list_files(&self, path: &str, branch: Option<&str>) -> Result<String> {
        let entries = self.github.list_directory(path, branch).await?;
        Ok(tools::format_listing(&self.github.location, path, &entries))
    }

    pub async fn get_file_content(&self, file_path: &str, branch: &str) -> Result<String> {
        // Fetch the entry, then decode its base64 body
        let entry = self.github.get_file(file_path, branch).await?;
        let content = entry.decoded_content()?;
        Ok(tools::format_file(
            &self.github.location,
            file_path,
            branch,
            &entry,
            &content,
        ))
    }

    pub async fn search_documentation(&self) -> Result<String> {
        let hits = self.github.search_markdown().await?;
        Ok(tools::format_search(&self.github.location, &hits))
    }

    pub async fn get_medium_article(&self, url: Option<&str>) -> Result<String> {
        let article = self.articles.fetch(url).await?;
        Ok(tools::format_article(&article))
    }

    /// README, article and manifest in one document. Each part degrades to a
    /// placeholder on failure instead of aborting the whole response.
    pub async fn get_full_documentation(&self) -> Result<String> {
        // Fetch each part in turn; failures are kept, not propagated
        let readme = self.get_readme(DEFAULT_BRANCH).await;
        let article = self.get_medium_article(None).await;
        let manifest = self.get_file_content(MANIFEST_PATH, DEFAULT_BRANCH).await;

        // Replace failed parts with placeholders, in fixed order
        let sections = [
            tools::format_section("README", readme),
            tools::format_section("Article", article),
            tools::format_section(MANIFEST_PATH, manifest),
        ];
        Ok(tools::format_full_documentation(
            &self.github.location,
            Utc::now(),
            &sections,
        ))
    }
}

impl ServerHandler for DocsAdapter {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(format!(
                "This server provides documentation for the GitHub repository {}. Use 'get_readme' for the README, 'list_files' and 'get_file_content' to browse the source, 'search_documentation' to find markdown files, 'get_medium_article' for the companion article, or 'get_full_documentation' for everything at once.",
                self.github.location
            )),
        }
    }

    async fn list_tools(
        &self,
        _request: PaginatedRequestParam,
        _: RequestContext<RoleServer>,
    ) -> std::result::Result<ListToolsResult, McpError> {
        Ok(ListToolsResult {
            tools: descriptors(),
            next_cursor: None,
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _: RequestContext<RoleServer>,
    ) -> std::result::Result<CallToolResult, McpError> {
        let arguments = request.arguments.unwrap_or_default();
        Ok(self.dispatch(&request.name, arguments).await)
    }
}
