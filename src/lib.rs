//! # Repo Docs MCP Server
//!
//! A Model Context Protocol (MCP) server that serves the documentation of a
//! single GitHub repository, plus one companion article, to an LLM.
//!
//! ## Features
//!
//! - Locate the README regardless of filename casing or default branch
//! - Browse directories and read individual files from the repository
//! - Search the repository for markdown documentation
//! - Fetch an external article and flatten its HTML into readable text
//! - Combine README, article and `package.json` into a single document
//!
//! ## Modules
//!
//! - `server`: MCP server implementation and tools
//! - `github`: GitHub content and search API access
//! - `article`: External article retrieval
//! - `document`: HTML-to-text normalization and file helpers
//! - `config`: Repository and upstream configuration
//! - `error`: Error types shared by the handlers

/// Server implementation and MCP tools
pub mod server;
/// GitHub API integration
pub mod github;
/// External article retrieval
pub mod article;
/// Document processing
pub mod document;
/// Adapter configuration
pub mod config;
/// Handler errors
pub mod error;

pub use config::{AdapterConfig, RepositoryLocation};
pub use error::{DocsError, Result};
pub use server::DocsAdapter;
