//! Ordered section/key store for one language of one domain.
//!
//! Section names are unique within a [`Dataset`] and keys are unique within a
//! [`Section`]. Both keep the order in which they were first inserted; lookups
//! compare names byte for byte (no case folding, no trimming).

use std::collections::HashMap;

use thiserror::Error;

/// Errors raised by [`Dataset`] mutations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DatasetError {
    /// `set` was called for a section that has not been added.
    #[error("No section named '{0}'")]
    NoSection(String),
}

/// A single `key = value` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub key: String,
    pub value: String,
}

/// Named group of entries in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Section {
    /// Section name as written between the brackets.
    name: String,
    /// Entries in insertion order.
    entries: Vec<Entry>,
    /// key → index into `entries`
    positions: HashMap<String, usize>,
}

impl Section {
    /// Creates an empty section.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), entries: Vec::new(), positions: HashMap::new() }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order.
    pub fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter()
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.key.as_str())
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.positions.contains_key(key)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        let index = *self.positions.get(key)?;
        self.entries.get(index).map(|entry| entry.value.as_str())
    }

    /// Sets `key` to `value`, appending the key if it is new.
    ///
    /// Returns the previous value when the key already existed. An existing
    /// key keeps its position.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let key = key.into();
        let value = value.into();
        if let Some(entry) =
            self.positions.get(&key).copied().and_then(|index| self.entries.get_mut(index))
        {
            return Some(std::mem::replace(&mut entry.value, value));
        }
        self.positions.insert(key.clone(), self.entries.len());
        self.entries.push(Entry { key, value });
        None
    }

    /// Appends `key = value` only if `key` is not present yet.
    ///
    /// Returns `true` when the entry was inserted.
    pub fn insert_if_absent(&mut self, key: &str, value: impl Into<String>) -> bool {
        if self.contains_key(key) {
            return false;
        }
        self.set(key, value);
        true
    }

    /// Appends `text` to the value of an existing key.
    pub(crate) fn append_to_value(&mut self, key: &str, text: &str) -> bool {
        let Some(entry) =
            self.positions.get(key).copied().and_then(|index| self.entries.get_mut(index))
        else {
            return false;
        };
        entry.value.push_str(text);
        true
    }
}

/// All sections of one translation file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    /// Sections in insertion order.
    sections: Vec<Section>,
    /// section name → index into `sections`
    positions: HashMap<String, usize>,
}

impl Dataset {
    /// Creates an empty dataset.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of sections.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Total number of entries across all sections.
    #[must_use]
    pub fn key_count(&self) -> usize {
        self.sections.iter().map(Section::len).sum()
    }

    /// Sections in insertion order.
    pub fn sections(&self) -> impl Iterator<Item = &Section> {
        self.sections.iter()
    }

    /// Section names in insertion order.
    pub fn section_names(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(Section::name)
    }

    #[must_use]
    pub fn has_section(&self, name: &str) -> bool {
        self.positions.contains_key(name)
    }

    #[must_use]
    pub fn section(&self, name: &str) -> Option<&Section> {
        let index = *self.positions.get(name)?;
        self.sections.get(index)
    }

    #[must_use]
    pub fn has_option(&self, section: &str, key: &str) -> bool {
        self.section(section).is_some_and(|section| section.contains_key(key))
    }

    #[must_use]
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.section(section)?.get(key)
    }

    /// Appends an empty section. Returns `false` if the name is already taken.
    pub fn add_section(&mut self, name: &str) -> bool {
        if self.has_section(name) {
            return false;
        }
        self.section_or_insert(name);
        true
    }

    /// Returns the named section, appending an empty one if needed.
    // `positions` only ever holds indices of pushed sections.
    #[allow(clippy::indexing_slicing)]
    pub fn section_or_insert(&mut self, name: &str) -> &mut Section {
        let index = if let Some(&index) = self.positions.get(name) {
            index
        } else {
            let index = self.sections.len();
            self.sections.push(Section::new(name));
            self.positions.insert(name.to_string(), index);
            index
        };
        &mut self.sections[index]
    }

    /// Sets `key` in an existing section.
    ///
    /// # Errors
    /// [`DatasetError::NoSection`] if the section has not been added.
    pub fn set(
        &mut self,
        section: &str,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<Option<String>, DatasetError> {
        let section_ref = self
            .positions
            .get(section)
            .copied()
            .and_then(|index| self.sections.get_mut(index))
            .ok_or_else(|| DatasetError::NoSection(section.to_string()))?;
        Ok(section_ref.set(key, value))
    }
}
