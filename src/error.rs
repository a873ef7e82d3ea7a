use std::path::PathBuf;

use thiserror::Error;

use crate::config::{
    ConfigError,
    ValidationError,
};
use crate::input::DatError;

/// Errors that abort an update or verify run.
#[derive(Error, Debug)]
pub enum JobError {
    /// The base language file for a domain does not exist.
    #[error(
        "Incomplete required translation: '{}' not found for domain '{domain}'. Cannot proceed.",
        .path.display()
    )]
    MissingBase { domain: String, path: PathBuf },

    /// The base language file exists but could not be read or parsed.
    #[error("Incomplete required translation for domain '{domain}'. Cannot proceed: {source}")]
    UnreadableBase {
        domain: String,
        #[source]
        source: DatError,
    },

    /// The translation under verification could not be read or parsed.
    #[error("Cannot verify domain '{domain}': {source}")]
    UnreadableTarget {
        domain: String,
        #[source]
        source: DatError,
    },

    #[error("Failed to write merged translation: {0}")]
    Write(#[source] DatError),

    #[error("Invalid job parameters: {0}")]
    InvalidJob(#[from] ValidationError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
