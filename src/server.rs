//! MCP Server implementation using rmcp

use crate::config::{CredentialStore, ServerConfig};
use crate::extract::{BatchExtractor, BatchReport, IdpClient};
use anyhow::Result;
use rmcp::{
    handler::server::tool::ToolRouter, handler::server::wrapper::Parameters, model::*,
    schemars::JsonSchema, tool, tool_handler, tool_router, ServerHandler, ServiceExt,
};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// IDP MCP Server
#[derive(Clone)]
pub struct IdpServer {
    extractor: Arc<BatchExtractor<IdpClient>>,
    tool_router: ToolRouter<Self>,
}

// ============================================================================
// Request types for the extraction tools
// ============================================================================

#[derive(Debug, Deserialize, JsonSchema)]
pub struct DataExtractionParams {
    /// PDF file paths to extract data from
    pub filenames: Vec<String>,
    /// Directory where result TXT files are written (default: "output")
    #[serde(default = "default_save_dir")]
    pub save_dir_path: String,
    /// API key for the IDP service. Required on the first call; persists
    /// for later calls once supplied.
    #[serde(default)]
    pub key: String,
    /// Language for error messages (e.g., "zh" or "en"; default: "en")
    #[serde(default = "default_lang")]
    pub err_msg_lang: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct DataExtractionFromFolderParams {
    /// Folder containing PDF files
    pub folder: String,
    /// Directory where result TXT files are written
    pub save_dir_path: String,
    /// Recursively search subdirectories for PDF files (default: false)
    #[serde(default)]
    pub recursive: bool,
    /// API key for the IDP service. Required on the first call; persists
    /// for later calls once supplied.
    #[serde(default)]
    pub key: String,
    /// Language for error messages (e.g., "zh" or "en"; default: "en")
    #[serde(default = "default_lang")]
    pub err_msg_lang: String,
}

fn default_save_dir() -> String {
    "output".to_string()
}

fn default_lang() -> String {
    "en".to_string()
}

// ============================================================================
// Tool implementations
// ============================================================================

#[tool_router]
impl IdpServer {
    pub fn new() -> Result<Self> {
        Self::with_config(ServerConfig::default())
    }

    /// Create a new IdpServer with full configuration
    pub fn with_config(config: ServerConfig) -> Result<Self> {
        let client = IdpClient::new(&config)?;
        let credentials = Arc::new(CredentialStore::new(config.api_key.clone()));
        Ok(Self {
            extractor: Arc::new(BatchExtractor::new(client, credentials)),
            tool_router: Self::tool_router(),
        })
    }

    /// Extract data from a list of PDF files
    #[tool(
        description = "Extract structured data from PDF files and save the results as TXT files in the specified folder. Files are processed in order; the first failure aborts the batch.

Params: filenames (list of PDF file paths), save_dir_path (output folder, default \"output\"), key (IDP API key, required on the first call), err_msg_lang (error message language, \"zh\" or \"en\")."
    )]
    async fn data_extraction(
        &self,
        Parameters(params): Parameters<DataExtractionParams>,
    ) -> std::result::Result<CallToolResult, ErrorData> {
        let paths: Vec<PathBuf> = params.filenames.iter().map(PathBuf::from).collect();

        self.extractor
            .extract_files(
                &paths,
                Path::new(&params.save_dir_path),
                &params.key,
                &params.err_msg_lang,
            )
            .await
            .map(report_result)
            .map_err(|e| {
                tracing::warn!(error = %e, "data_extraction failed");
                tool_error(e)
            })
    }

    /// Extract data from every PDF file in a folder
    #[tool(
        description = "Extract structured data from all PDF files in a folder and save the results as TXT files in the specified folder. Fails if the folder does not exist or contains no PDF files.

Params: folder (input folder path), save_dir_path (output folder), recursive (search subdirectories, default false), key (IDP API key, required on the first call), err_msg_lang (error message language, \"zh\" or \"en\")."
    )]
    async fn data_extraction_from_folder(
        &self,
        Parameters(params): Parameters<DataExtractionFromFolderParams>,
    ) -> std::result::Result<CallToolResult, ErrorData> {
        self.extractor
            .extract_folder(
                Path::new(&params.folder),
                Path::new(&params.save_dir_path),
                params.recursive,
                &params.key,
                &params.err_msg_lang,
            )
            .await
            .map(report_result)
            .map_err(|e| {
                tracing::warn!(error = %e, "data_extraction_from_folder failed");
                tool_error(e)
            })
    }
}

/// Render a successful batch report as pretty-printed JSON content.
fn report_result(report: BatchReport) -> CallToolResult {
    CallToolResult::success(vec![Content::text(
        serde_json::to_string_pretty(&report).unwrap_or_default(),
    )])
}

/// Map a batch error to a protocol error carrying the stable code and the
/// locale-resolved message. Full details are logged before this point.
fn tool_error(e: crate::error::Error) -> ErrorData {
    ErrorData::internal_error(
        format!("[{}] {}", e.code(), e.client_message()),
        Some(serde_json::json!({ "code": e.code() })),
    )
}

#[tool_handler]
impl ServerHandler for IdpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(
                "IDP MCP Server extracts structured data from PDF documents through the \
                 ComIDP document-intelligence API and saves the results as text files."
                    .into(),
            ),
        }
    }
}

/// Run the MCP server with configuration from the environment
pub async fn run_server() -> Result<()> {
    run_server_with_config(ServerConfig::from_env()).await
}

/// Run the MCP server with full configuration
pub async fn run_server_with_config(config: ServerConfig) -> Result<()> {
    let server = IdpServer::with_config(config)?;

    tracing::info!("IDP MCP Server ready, waiting for connections...");

    let service = server.serve(rmcp::transport::io::stdio()).await?;
    service.waiting().await?;

    Ok(())
}
