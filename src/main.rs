use anyhow::Result;
use clap::Parser;
use rmcp::{ServiceExt, transport::stdio};
use repo_docs_mcp::config::{AdapterConfig, DEFAULT_API_BASE, DEFAULT_ARTICLE_URL, RepositoryLocation};
use repo_docs_mcp::server::DocsAdapter;

#[cfg(feature = "trace")]
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
struct Cli {
    /// The github repository to serve documentation for
    #[clap(long, default_value = "rust-sdk")]
    github_repo: String,
    /// The github repository owner
    #[clap(long, default_value = "modelcontextprotocol")]
    github_owner: String,
    /// A github personal access token to use for authentication (optional)
    #[clap(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    github_token: Option<String>,
    /// The article served by get_medium_article
    #[clap(long, env = "MEDIUM_ARTICLE_URL", default_value = DEFAULT_ARTICLE_URL)]
    article_url: String,
    /// Base URL of the GitHub REST API
    #[clap(long, default_value = DEFAULT_API_BASE)]
    api_base: String,
    /// Where to write the server log; stdout is reserved for the protocol
    #[clap(long, default_value = "server.log")]
    log_file: String,
}

/// You can inspect the server using the Model Context Protocol Inspector.
/// npx @modelcontextprotocol/inspector cargo run -p repo-docs-mcp

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    #[cfg(feature = "trace")]
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::DEBUG.into()))
        .with_writer(std::fs::File::create(&args.log_file)?)
        .with_ansi(false)
        .init();

    tracing::info!("Starting MCP server");

    let config = AdapterConfig::new(RepositoryLocation::new(args.github_owner, args.github_repo))
        .with_api_base(args.api_base)
        .with_article_url(args.article_url)
        .with_token(args.github_token);
    tracing::info!(
        "Serving documentation for {} (article: {})",
        config.location,
        config.article_url
    );

    let service = DocsAdapter::new(&config)?
        .serve(stdio())
        .await
        .inspect_err(|e| {
            tracing::error!("serving error: {:?}", e);
        })?;

    service.waiting().await?;
    Ok(())
}
