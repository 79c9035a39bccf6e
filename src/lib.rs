//! IDP MCP Server Library
//!
//! This crate provides MCP tools for batch PDF data extraction through the
//! ComIDP document-intelligence API:
//! - `data_extraction`: extract structured data from a list of PDF files
//! - `data_extraction_from_folder`: extract from every PDF in a folder
//!
//! Results are persisted as UTF-8 text files with collision-safe naming.

pub mod config;
pub mod error;
pub mod extract;
pub mod server;
pub mod source;

pub use config::{CredentialStore, ServerConfig};
pub use error::{Error, ErrorKind, Result};
pub use extract::{BatchExtractor, BatchReport, ExtractionBackend, IdpClient};
pub use server::{run_server, run_server_with_config, IdpServer};
