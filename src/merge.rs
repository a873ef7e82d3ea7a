//! Fallback merge of translation datasets.
//!
//! A destination dataset (the translation being worked on) is filled from an
//! ordered chain of fallback datasets. Every key copied over is wrapped in the
//! fallback's [`Marker`] so translators can tell it apart from a real
//! translation. Keys the destination already has are never modified.

use std::fmt;

use serde::Serialize;

use crate::ir::Dataset;

/// Provenance tag wrapped around values copied from a fallback language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Marker {
    /// Copied from the base language: `!!!value!!!`
    Base,
    /// Copied from the secondary source language: `***value***`
    Source,
}

impl Marker {
    /// The literal three-character tag.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Base => "!!!",
            Self::Source => "***",
        }
    }

    /// Wraps `value` in this marker.
    #[must_use]
    pub fn wrap(self, value: &str) -> String {
        let tag = self.as_str();
        format!("{tag}{value}{tag}")
    }

    /// Returns the marker `value` is wrapped in, if any.
    ///
    /// The tag has to appear at both ends and must not overlap, so `!!!!!` is
    /// an ordinary value while `!!!!!!` is an empty base-language copy.
    #[must_use]
    pub fn detect(value: &str) -> Option<Self> {
        [Self::Base, Self::Source].into_iter().find(|marker| {
            let tag = marker.as_str();
            value.len() >= tag.len() * 2 && value.starts_with(tag) && value.ends_with(tag)
        })
    }

    /// Strips this marker from `value`, if present.
    #[must_use]
    pub fn unwrap_value(self, value: &str) -> Option<&str> {
        if Self::detect(value) != Some(self) {
            return None;
        }
        let tag = self.as_str();
        value.strip_prefix(tag)?.strip_suffix(tag)
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One link of the fallback chain.
#[derive(Debug, Clone)]
pub struct Fallback {
    /// Language code the dataset was loaded for
    pub language: String,
    pub marker: Marker,
    pub dataset: Dataset,
}

impl Fallback {
    #[must_use]
    pub fn new(language: impl Into<String>, marker: Marker, dataset: Dataset) -> Self {
        Self { language: language.into(), marker, dataset }
    }
}

/// Counters collected while merging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeStats {
    pub sections_added: usize,
    pub keys_added: usize,
    pub keys_from_source: usize,
    pub keys_from_base: usize,
}

/// Merges `fallbacks` into `destination` and returns the result.
///
/// `fallbacks` must be ordered most trusted first. A key is taken from the
/// first fallback that has it; keys already in `destination` are kept as-is.
#[must_use]
pub fn merge(mut destination: Dataset, fallbacks: &[Fallback]) -> Dataset {
    merge_into(&mut destination, fallbacks);
    destination
}

/// In-place variant of [`merge`] that reports what was added.
pub fn merge_into(destination: &mut Dataset, fallbacks: &[Fallback]) -> MergeStats {
    let mut stats = MergeStats::default();

    for fallback in fallbacks {
        tracing::debug!(
            language = %fallback.language,
            marker = %fallback.marker,
            "Merging fallback data"
        );

        for source_section in fallback.dataset.sections() {
            let name = source_section.name();
            if destination.add_section(name) {
                tracing::debug!("Adding section {name}");
                stats.sections_added += 1;
            }
            let target = destination.section_or_insert(name);

            for entry in source_section.entries() {
                if target.contains_key(&entry.key) {
                    continue;
                }
                let value = fallback.marker.wrap(&entry.value);
                tracing::debug!("Adding option {} with value {value}", entry.key);
                target.set(entry.key.as_str(), value);
                stats.keys_added += 1;
                match fallback.marker {
                    Marker::Base => stats.keys_from_base += 1,
                    Marker::Source => stats.keys_from_source += 1,
                }
            }
        }
    }

    stats
}
