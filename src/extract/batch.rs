//! Batch extraction orchestration

use crate::config::CredentialStore;
use crate::error::{Error, ErrorKind, Result};
use crate::extract::client::{ExtractResponse, ExtractionBackend};
use crate::extract::writer;
use crate::source::supported_files;
use rmcp::schemars::JsonSchema;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Report returned for a fully successful batch.
///
/// A batch that fails on any file raises an error instead; files written
/// before the failure stay on disk but are not reported.
#[derive(Debug, Serialize, JsonSchema)]
pub struct BatchReport {
    /// Always "success"
    pub status: String,
    /// Output file names, in input order
    pub saved_files: Vec<String>,
    /// Absolute path of the directory results were written to
    pub save_dir: String,
}

/// Drives the per-file extract/interpret/write loop for one batch.
///
/// Files are processed strictly one at a time in caller order, fail-fast:
/// the first failure aborts the batch with no rollback of earlier output.
pub struct BatchExtractor<B> {
    backend: B,
    credentials: Arc<CredentialStore>,
}

impl<B: ExtractionBackend> BatchExtractor<B> {
    pub fn new(backend: B, credentials: Arc<CredentialStore>) -> Self {
        Self {
            backend,
            credentials,
        }
    }

    /// Extract every supported file under `folder`.
    ///
    /// Fails with the file-not-found error if the folder is missing or
    /// discovery yields no candidate files.
    pub async fn extract_folder(
        &self,
        folder: &Path,
        save_dir: &Path,
        recursive: bool,
        key: &str,
        locale: &str,
    ) -> Result<BatchReport> {
        if !folder.exists() {
            return Err(Error::catalog(ErrorKind::FileNotFound, locale));
        }

        let files = supported_files(folder, recursive);
        if files.is_empty() {
            return Err(Error::catalog(ErrorKind::FileNotFound, locale));
        }

        self.extract_files(&files, save_dir, key, locale).await
    }

    /// Extract `paths` one at a time, in caller order.
    ///
    /// A non-empty `key` overwrites the process credential before anything
    /// else happens; an empty effective credential fails immediately with
    /// the authentication error, before any network or filesystem work.
    pub async fn extract_files(
        &self,
        paths: &[PathBuf],
        save_dir: &Path,
        key: &str,
        locale: &str,
    ) -> Result<BatchReport> {
        self.credentials.apply_override(key);
        if self.credentials.is_empty() {
            return Err(Error::catalog(ErrorKind::InvalidKey, locale));
        }

        std::fs::create_dir_all(save_dir)?;
        let save_dir = save_dir.canonicalize()?;

        let mut saved_files = Vec::with_capacity(paths.len());

        for path in paths {
            if !path.exists() {
                return Err(Error::catalog(ErrorKind::FileNotFound, locale));
            }

            tracing::debug!(path = %path.display(), "extracting");

            let api_key = self.credentials.current();
            let raw = self
                .backend
                .extract(path, &api_key)
                .await
                .map_err(|e| interpret_transport(e, locale))?;

            let response = parse_response(&raw, locale)?;
            if !response.is_success() {
                let message = response
                    .msg
                    .clone()
                    .unwrap_or_else(|| ErrorKind::ExtractionFailed.message(locale).to_string());
                return Err(Error::upstream(response.code_str(), message));
            }

            let text = writer::render_payload(&response.data);
            let name = writer::write_result(&save_dir, path, &text)?;
            saved_files.push(name);
        }

        tracing::info!(
            count = saved_files.len(),
            save_dir = %save_dir.display(),
            "batch complete"
        );

        Ok(BatchReport {
            status: "success".to_string(),
            saved_files,
            save_dir: save_dir.display().to_string(),
        })
    }
}

/// Transport failures surface as the catalog network error; anything the
/// taxonomy already classified passes through unchanged.
fn interpret_transport(err: Error, locale: &str) -> Error {
    match err {
        Error::Http(inner) => {
            tracing::debug!(error = %inner, "transport failure");
            Error::catalog(ErrorKind::NetworkError, locale)
        }
        other => other,
    }
}

/// A response body that does not parse as the expected envelope maps to
/// the unknown-error kind.
fn parse_response(raw: &str, locale: &str) -> Result<ExtractResponse> {
    ExtractResponse::parse(raw).map_err(|e| {
        tracing::debug!(error = %e, "unrecognized response shape");
        Error::catalog(ErrorKind::Unknown, locale)
    })
}
