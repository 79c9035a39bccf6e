//! Error types for IDP MCP Server

use thiserror::Error;

/// Result type alias for IDP MCP Server
pub type Result<T> = std::result::Result<T, Error>;

/// Closed catalog of IDP error kinds.
///
/// Each kind carries a stable code and a per-locale message table. The
/// codes mirror the ones the ComIDP service reports, so a client sees the
/// same identifier whether the error was raised locally or upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing or invalid API key
    InvalidKey,
    /// Upload to the extraction service failed
    UploadFailed,
    /// Download from the extraction service failed
    DownloadFailed,
    /// Input file or folder missing
    FileNotFound,
    /// Account has insufficient assets/quota
    NoAsset,
    /// Document is password protected
    EncryptedDoc,
    /// Document is corrupted
    BrokenDoc,
    /// File format outside the supported set
    UnsupportedFormat,
    /// Catch-all for unrecognized failures
    Unknown,
    /// Zero-byte input file
    EmptyFile,
    /// Requested extraction field does not exist
    FieldMissing,
    /// Extraction failed server-side
    ExtractionFailed,
    /// Request could not be completed
    NetworkError,
    /// Requested page exceeds document length
    PageOverflow,
    /// Document exceeds the page count limit
    PageCountExceed,
}

impl ErrorKind {
    /// Stable error code for this kind.
    pub const fn code(self) -> &'static str {
        match self {
            ErrorKind::InvalidKey => "400",
            ErrorKind::UploadFailed => "01003",
            ErrorKind::DownloadFailed => "01004",
            ErrorKind::FileNotFound => "01203",
            ErrorKind::NoAsset => "05002",
            ErrorKind::EncryptedDoc => "02201",
            ErrorKind::BrokenDoc => "02203",
            ErrorKind::UnsupportedFormat => "02204",
            ErrorKind::Unknown => "01202",
            ErrorKind::EmptyFile => "04002",
            ErrorKind::FieldMissing => "06001",
            ErrorKind::ExtractionFailed => "06002",
            ErrorKind::NetworkError => "06003",
            ErrorKind::PageOverflow => "06004",
            ErrorKind::PageCountExceed => "06005",
        }
    }

    /// Message table keyed by locale tag. Every entry carries "en";
    /// additional locales may be added without touching lookup logic.
    fn messages(self) -> &'static [(&'static str, &'static str)] {
        match self {
            ErrorKind::InvalidKey => &[
                ("en", "Invalid API key"),
                ("zh", "序列码认证错误（或序列码无效）"),
            ],
            ErrorKind::UploadFailed => &[("en", "Upload failed"), ("zh", "上传文件失败")],
            ErrorKind::DownloadFailed => &[("en", "Download failed"), ("zh", "下载文件失败")],
            ErrorKind::FileNotFound => &[
                ("en", "File not found or cannot be opened"),
                ("zh", "找不到或无法打开文件"),
            ],
            ErrorKind::NoAsset => &[("en", "Insufficient assets"), ("zh", "资产不足")],
            ErrorKind::EncryptedDoc => &[("en", "Document is encrypted"), ("zh", "文档已加密")],
            ErrorKind::BrokenDoc => &[
                ("en", "Corrupted or broken document"),
                ("zh", "文档异常（或文档破损）"),
            ],
            ErrorKind::UnsupportedFormat => &[
                ("en", "Unsupported file format (PDF only)"),
                ("zh", "不支持的文件格式（仅支持 PDF）"),
            ],
            ErrorKind::Unknown => &[("en", "Unknown error"), ("zh", "未知错误")],
            ErrorKind::EmptyFile => &[
                ("en", "File is empty, no content detected"),
                ("zh", "文件大小为零，您的文件中没有内容"),
            ],
            ErrorKind::FieldMissing => &[("en", "Field not found"), ("zh", "抽取字段不存在")],
            ErrorKind::ExtractionFailed => &[("en", "Extraction failed"), ("zh", "抽取失败")],
            ErrorKind::NetworkError => &[("en", "Network error"), ("zh", "网络错误")],
            ErrorKind::PageOverflow => &[
                ("en", "Specified page exceeds document length"),
                ("zh", "指定抽取页码超出文档最大页码数"),
            ],
            ErrorKind::PageCountExceed => &[
                ("en", "Exceeded max page count (50)"),
                ("zh", "指定抽取文档页面数超出最大值50"),
            ],
        }
    }

    /// Resolve the human-readable message for a locale tag.
    ///
    /// Unsupported locales fall back to "en". A kind with no "en" entry
    /// resolves to the literal "Unknown error" (cannot happen for catalog
    /// entries, only a guard for the lookup itself).
    pub fn message(self, locale: &str) -> &'static str {
        let table = self.messages();
        table
            .iter()
            .find(|(tag, _)| *tag == locale)
            .or_else(|| table.iter().find(|(tag, _)| *tag == "en"))
            .map(|(_, msg)| *msg)
            .unwrap_or("Unknown error")
    }
}

/// Error types for IDP MCP Server
#[derive(Error, Debug)]
pub enum Error {
    /// Catalog error with the message resolved against the requested locale
    #[error("[{}] {message}", .kind.code())]
    Catalog { kind: ErrorKind, message: String },

    /// Error synthesized from a remote response's own code and message
    #[error("[{code}] {message}")]
    Upstream { code: String, message: String },

    /// Configured endpoint is not a valid URL
    #[error("Invalid endpoint URL: {url}")]
    InvalidEndpoint { url: String },

    /// HTTP client error
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Build a catalog error, resolving the message against `locale`.
    pub fn catalog(kind: ErrorKind, locale: &str) -> Self {
        Error::Catalog {
            kind,
            message: kind.message(locale).to_string(),
        }
    }

    /// Build an error echoing a remote response's code and message.
    /// No localization is available from upstream, so the message is
    /// surfaced identically for every locale.
    pub fn upstream(code: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Upstream {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Stable error code for any variant.
    pub fn code(&self) -> &str {
        match self {
            Error::Catalog { kind, .. } => kind.code(),
            Error::Upstream { code, .. } => code,
            Error::Http(_) => ErrorKind::NetworkError.code(),
            Error::InvalidEndpoint { .. } | Error::Io(_) | Error::Serialization(_) => {
                ErrorKind::Unknown.code()
            }
        }
    }

    /// Return a sanitized error message safe to send to clients.
    /// Internal details (paths, library errors) are omitted.
    /// Full details should be logged via tracing before calling this.
    pub fn client_message(&self) -> String {
        match self {
            Error::Catalog { message, .. } => message.clone(),
            Error::Upstream { message, .. } => message.clone(),
            Error::InvalidEndpoint { .. } => "Invalid endpoint URL".to_string(),
            Error::Http(_) => "HTTP request failed".to_string(),
            Error::Io(_) => "I/O error".to_string(),
            Error::Serialization(_) => "Serialization error".to_string(),
        }
    }
}
