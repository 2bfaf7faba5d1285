//! Domain errors callers may want to match on.
//!
//! Everything else flows through `anyhow` with context attached at the call site.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RevisorError {
    #[error("failed to parse {file}: {reason}")]
    InvalidConfig { file: PathBuf, reason: String },

    #[error("missing credential: set {env_var} for provider {provider}")]
    MissingCredential {
        provider: &'static str,
        env_var: &'static str,
    },

    #[error("directory not found: {0}")]
    MissingDirectory(PathBuf),

    #[error("no extractable text in {0}")]
    EmptyDocument(PathBuf),

    #[error("failed to extract text from {path}: {reason}")]
    PdfExtraction { path: PathBuf, reason: String },

    #[error("no YAML document found in model output")]
    NoYamlFound,
}

pub type Result<T> = std::result::Result<T, RevisorError>;
