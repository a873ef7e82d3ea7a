use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

use crate::domain::Domain;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Configuration error in '{field_path}': {message}")]
pub struct ValidationError {
    /// JSON path to the field (e.g., "domains[0].prefix")
    pub field_path: String,
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(field_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field_path: field_path.into(), message: message.into() }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration validation failed:\n{}", format_validation_errors(.0))]
    ValidationErrors(Vec<ValidationError>),

    #[error("Failed to load configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),
}

fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .enumerate()
        .map(|(i, err)| format!("  {}. {} - {}", i + 1, err.field_path, err.message))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Checks that `code` can be embedded in a file name.
///
/// # Errors
/// Empty codes and codes containing path separators or whitespace.
pub fn validate_language_code(field_path: &str, code: &str) -> Result<(), ValidationError> {
    if code.is_empty() {
        return Err(ValidationError::new(
            field_path,
            "The language code cannot be empty. Example: \"de_DE\"",
        ));
    }
    if code.contains(['/', '\\']) || code.chars().any(char::is_whitespace) || code == ".." {
        return Err(ValidationError::new(
            field_path,
            format!("Invalid language code '{code}': path separators and whitespace are not allowed"),
        ));
    }
    Ok(())
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Language every translation is filled from last.
    /// Its files define which keys must exist.
    pub base_language: String,

    /// Translation file extension, without the dot.
    pub file_extension: String,

    /// Domains to process, in order.
    pub domains: Vec<Domain>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_language: "en_US".to_string(),
            file_extension: "dat".to_string(),
            domains: Domain::defaults(),
        }
    }
}

impl Settings {
    /// # Errors
    /// - Invalid base language code
    /// - Empty or invalid file extension
    /// - Empty domain list, empty or duplicate prefixes
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(e) = validate_language_code("baseLanguage", &self.base_language) {
            errors.push(e);
        }

        if self.file_extension.is_empty() {
            errors.push(ValidationError::new(
                "fileExtension",
                "The extension cannot be empty. Example: \"dat\"",
            ));
        } else if self.file_extension.contains(['/', '\\', '.']) {
            errors.push(ValidationError::new(
                "fileExtension",
                format!(
                    "Invalid extension '{}': give it without the leading dot",
                    self.file_extension
                ),
            ));
        }

        if self.domains.is_empty() {
            errors.push(ValidationError::new(
                "domains",
                "At least one domain is required. Example: [{\"prefix\": \"strings\"}]",
            ));
        }

        for (index, domain) in self.domains.iter().enumerate() {
            if domain.prefix.is_empty() || domain.prefix.contains(['/', '\\']) {
                errors.push(ValidationError::new(
                    format!("domains[{index}].prefix"),
                    format!("Invalid domain prefix '{}'", domain.prefix),
                ));
            } else if self.domains.iter().take(index).any(|d| d.prefix == domain.prefix) {
                errors.push(ValidationError::new(
                    format!("domains[{index}].prefix"),
                    format!("Duplicate domain prefix '{}'", domain.prefix),
                ));
            }
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}
