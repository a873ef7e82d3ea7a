//! Update mode: refresh a translation from its fallback languages.
//!
//! For every configured domain the existing translation file is loaded (unless
//! restarting), the fallback chain is merged into it and the result is written
//! back. Domains are processed one after another in configuration order; the
//! first fatal error stops the run.

use std::path::{
    Path,
    PathBuf,
};

use serde::Serialize;

use crate::config::{
    Settings,
    ValidationError,
    validate_language_code,
};
use crate::domain::Domain;
use crate::error::JobError;
use crate::input::{
    load_dataset,
    write_dataset,
};
use crate::ir::Dataset;
use crate::merge::{
    Fallback,
    Marker,
    MergeStats,
    merge_into,
};

/// Parameters of one update run.
#[derive(Debug, Clone)]
pub struct UpdateJob {
    /// Language being translated into
    pub target_language: String,
    /// Directory holding the translation files
    pub directory: PathBuf,
    /// Secondary language preferred over the base language
    pub source_language: Option<String>,
    /// Discard the existing translation and rebuild it from fallbacks
    pub restart: bool,
}

/// Result of updating one domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainSummary {
    pub domain: String,
    pub path: PathBuf,
    pub stats: MergeStats,
    /// Keys in the written file
    pub total_keys: usize,
}

/// A fallback language before its file is loaded.
#[derive(Debug, Clone, Copy)]
struct FallbackSource<'a> {
    /// Language code
    language: &'a str,
    /// Tag for values copied from this language
    marker: Marker,
    /// Whether a missing file aborts the run
    required: bool,
}

impl UpdateJob {
    #[must_use]
    pub fn new(target_language: impl Into<String>, directory: impl Into<PathBuf>) -> Self {
        Self {
            target_language: target_language.into(),
            directory: directory.into(),
            source_language: None,
            restart: false,
        }
    }

    #[must_use]
    pub fn with_source(mut self, source_language: Option<String>) -> Self {
        self.source_language = source_language;
        self
    }

    #[must_use]
    pub const fn with_restart(mut self, restart: bool) -> Self {
        self.restart = restart;
        self
    }

    /// Checks the job parameters against `settings`.
    ///
    /// # Errors
    /// - Target or source language code is not usable in a file name
    /// - Target language is the base language
    pub fn validate(&self, settings: &Settings) -> Result<(), ValidationError> {
        validate_language_code("language", &self.target_language)?;
        if let Some(source) = &self.source_language {
            validate_language_code("source", source)?;
        }
        if self.target_language == settings.base_language {
            return Err(ValidationError::new(
                "language",
                format!(
                    "'{}' is the base language; it cannot be updated from itself",
                    self.target_language
                ),
            ));
        }
        Ok(())
    }

    /// Runs the update for every domain in `settings`.
    ///
    /// Domains already written stay written if a later domain fails.
    ///
    /// # Errors
    /// - Invalid job parameters
    /// - Base language file missing or malformed
    /// - Translation file could not be written
    pub fn run(&self, settings: &Settings) -> Result<Vec<DomainSummary>, JobError> {
        self.validate(settings)?;
        tracing::debug!(
            target_language = %self.target_language,
            source_language = ?self.source_language,
            restart = self.restart,
            directory = %self.directory.display(),
            "Starting update"
        );

        settings.domains.iter().map(|domain| self.update_domain(domain, settings)).collect()
    }

    /// Merges and writes a single domain.
    ///
    /// # Errors
    /// See [`UpdateJob::run`].
    pub fn update_domain(
        &self,
        domain: &Domain,
        settings: &Settings,
    ) -> Result<DomainSummary, JobError> {
        let path =
            self.directory.join(domain.file_name(&self.target_language, &settings.file_extension));

        let mut destination = self.load_destination(&path);
        let fallbacks = self.load_fallbacks(domain, settings)?;
        let stats = merge_into(&mut destination, &fallbacks);

        write_dataset(&path, &destination).map_err(JobError::Write)?;
        tracing::info!(
            domain = %domain.prefix,
            keys_added = stats.keys_added,
            "Wrote translation file {}",
            path.display()
        );

        Ok(DomainSummary {
            domain: domain.prefix.clone(),
            path,
            stats,
            total_keys: destination.key_count(),
        })
    }

    /// Existing translation, or an empty dataset for a fresh start.
    fn load_destination(&self, path: &Path) -> Dataset {
        if self.restart {
            tracing::debug!("Restarting; ignoring existing data in {}", path.display());
            return Dataset::new();
        }

        tracing::debug!("Trying to preload {}", path.display());
        match load_dataset(path) {
            Ok(Some(dataset)) => dataset,
            Ok(None) => {
                tracing::debug!("Preload attempt failed; starting a new translation");
                Dataset::new()
            }
            Err(e) => {
                tracing::warn!("{e}; starting a new translation in its place");
                Dataset::new()
            }
        }
    }

    /// Fallback languages, most trusted first. The base language is always last.
    fn fallback_chain<'a>(&'a self, settings: &'a Settings) -> Vec<FallbackSource<'a>> {
        let mut chain = Vec::with_capacity(2);
        if let Some(source) = &self.source_language {
            chain.push(FallbackSource { language: source, marker: Marker::Source, required: false });
        }
        chain.push(FallbackSource {
            language: &settings.base_language,
            marker: Marker::Base,
            required: true,
        });
        chain
    }

    fn load_fallbacks(
        &self,
        domain: &Domain,
        settings: &Settings,
    ) -> Result<Vec<Fallback>, JobError> {
        let mut fallbacks = Vec::new();

        for source in self.fallback_chain(settings) {
            let path =
                self.directory.join(domain.file_name(source.language, &settings.file_extension));
            tracing::debug!("Loading translation from {}", path.display());

            match load_dataset(&path) {
                Ok(Some(dataset)) => {
                    fallbacks.push(Fallback::new(source.language, source.marker, dataset));
                }
                Ok(None) if source.required => {
                    return Err(JobError::MissingBase { domain: domain.prefix.clone(), path });
                }
                Err(e) if source.required => {
                    return Err(JobError::UnreadableBase {
                        domain: domain.prefix.clone(),
                        source: e,
                    });
                }
                Ok(None) => {
                    tracing::debug!("Failed to find translation data in {}", path.display());
                }
                Err(e) => {
                    tracing::warn!("Skipping optional source language: {e}");
                }
            }
        }

        Ok(fallbacks)
    }
}
