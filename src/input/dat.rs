//! `.dat` translation file reading and writing
//!
//! The format is a small INI dialect:
//!
//! ```text
//! # comment
//! [Greeting]
//! hello = Hello
//! long_text = First line
//!     continues here
//! ```
//!
//! `=` and `:` both work as the key/value delimiter (the first one on the line
//! wins). Keys and values are trimmed. An indented line right after an entry
//! continues that entry's value.

use std::ffi::OsString;
use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::{
    Path,
    PathBuf,
};

use thiserror::Error;

use crate::ir::{
    Dataset,
    Section,
};

/// Reason a line could not be parsed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyntaxErrorKind {
    #[error("entry found before any [section] header")]
    MissingSectionHeader,
    #[error("expected 'key = value' or 'key: value'")]
    MissingDelimiter,
    #[error("empty key")]
    EmptyKey,
    #[error("empty section name")]
    EmptySectionName,
    #[error("section '{0}' is defined more than once")]
    DuplicateSection(String),
    #[error("key '{key}' is defined more than once in section '{section}'")]
    DuplicateKey { section: String, key: String },
}

/// Syntax error with its 1-based line number.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("line {line}: {kind}")]
pub struct SyntaxError {
    pub line: usize,
    pub kind: SyntaxErrorKind,
}

/// Errors from loading or writing a `.dat` file.
#[derive(Error, Debug)]
pub enum DatError {
    /// The file exists but is not a valid `.dat` file.
    #[error("Malformed translation file '{}': {source}", .path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: SyntaxError,
    },

    #[error("Translation file '{}' is not valid UTF-8", .path.display())]
    Encoding { path: PathBuf },

    #[error("Failed to access translation file '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl DatError {
    /// Path of the file the error refers to.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Malformed { path, .. } | Self::Encoding { path } | Self::Io { path, .. } => path,
        }
    }
}

/// Parser state for the entry whose value may still continue.
#[derive(Debug, Default)]
struct Continuation {
    /// Key of the last entry in the current section
    key: Option<String>,
    /// Blank lines seen since the last value line
    pending_blank_lines: usize,
}

/// Parses `.dat` text into a [`Dataset`].
///
/// # Errors
/// Returns the first [`SyntaxError`] encountered.
pub fn parse_dataset(content: &str) -> Result<Dataset, SyntaxError> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut dataset = Dataset::new();
    let mut current: Option<String> = None;
    let mut continuation = Continuation::default();

    for (index, line) in content.lines().enumerate() {
        let line_number = index + 1;
        let error = |kind| SyntaxError { line: line_number, kind };
        let trimmed = line.trim();

        if trimmed.is_empty() {
            if continuation.key.is_some() {
                continuation.pending_blank_lines += 1;
            }
            continue;
        }

        if trimmed.starts_with('#') || trimmed.starts_with(';') {
            continue;
        }

        let indented = line.starts_with([' ', '\t']);
        if indented
            && let (Some(section_name), Some(key)) = (&current, &continuation.key)
        {
            let mut text = "\n".repeat(continuation.pending_blank_lines + 1);
            text.push_str(trimmed);
            dataset.section_or_insert(section_name).append_to_value(key, &text);
            continuation.pending_blank_lines = 0;
            continue;
        }
        continuation = Continuation::default();

        if let Some(name) = trimmed.strip_prefix('[').and_then(|rest| rest.strip_suffix(']')) {
            if name.is_empty() {
                return Err(error(SyntaxErrorKind::EmptySectionName));
            }
            if !dataset.add_section(name) {
                return Err(error(SyntaxErrorKind::DuplicateSection(name.to_string())));
            }
            current = Some(name.to_string());
            continue;
        }

        let Some(section_name) = &current else {
            return Err(error(SyntaxErrorKind::MissingSectionHeader));
        };
        let Some((key, value)) = trimmed.split_once(['=', ':']) else {
            return Err(error(SyntaxErrorKind::MissingDelimiter));
        };
        let key = key.trim_end();
        if key.is_empty() {
            return Err(error(SyntaxErrorKind::EmptyKey));
        }

        let section = dataset.section_or_insert(section_name);
        if !section.insert_if_absent(key, value.trim_start()) {
            return Err(error(SyntaxErrorKind::DuplicateKey {
                section: section_name.clone(),
                key: key.to_string(),
            }));
        }
        continuation.key = Some(key.to_string());
    }

    Ok(dataset)
}

/// Serializes a [`Dataset`] in insertion order.
///
/// Multi-line values are written with a tab-indented continuation per line,
/// so that [`parse_dataset`] reads them back unchanged.
#[must_use]
pub fn serialize_dataset(dataset: &Dataset) -> String {
    let mut out = String::new();
    for section in dataset.sections() {
        write_section(&mut out, section);
    }
    out
}

fn write_section(out: &mut String, section: &Section) {
    // Writing into a String cannot fail.
    let _ = writeln!(out, "[{}]", section.name());
    for entry in section.entries() {
        let _ = writeln!(out, "{} = {}", entry.key, entry.value.replace('\n', "\n\t"));
    }
    out.push('\n');
}

/// Loads a `.dat` file.
///
/// # Returns
/// - `Ok(Some(dataset))`: the file was read and parsed
/// - `Ok(None)`: the file does not exist
/// - `Err(DatError)`: the file exists but could not be read or parsed
///
/// # Errors
/// I/O failure other than "not found", invalid UTF-8 or a syntax error.
pub fn load_dataset(path: &Path) -> Result<Option<Dataset>, DatError> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::debug!("Translation file not found: {}", path.display());
            return Ok(None);
        }
        Err(source) => return Err(DatError::Io { path: path.to_path_buf(), source }),
    };

    let content =
        String::from_utf8(bytes).map_err(|_| DatError::Encoding { path: path.to_path_buf() })?;

    let dataset = parse_dataset(&content)
        .map_err(|source| DatError::Malformed { path: path.to_path_buf(), source })?;
    tracing::debug!(
        sections = dataset.len(),
        keys = dataset.key_count(),
        "Loaded translation file {}",
        path.display()
    );
    Ok(Some(dataset))
}

/// Writes a `.dat` file, replacing any previous content in one step.
///
/// The data goes to a sibling `*.tmp` file first which is then renamed over
/// `path`, so readers never observe a half-written file.
///
/// # Errors
/// Returns [`DatError::Io`] if the temporary file cannot be written or renamed.
pub fn write_dataset(path: &Path, dataset: &Dataset) -> Result<(), DatError> {
    let mut tmp_name = OsString::from(path.as_os_str());
    tmp_name.push(".tmp");
    let tmp_path = PathBuf::from(tmp_name);

    let content = serialize_dataset(dataset);
    let result = fs::write(&tmp_path, content).and_then(|()| fs::rename(&tmp_path, path));
    if let Err(source) = result {
        // Best effort; the original error is what matters.
        let _ = fs::remove_file(&tmp_path);
        return Err(DatError::Io { path: path.to_path_buf(), source });
    }

    tracing::debug!("Wrote translation file {}", path.display());
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::fs;

    use googletest::prelude::*;
    use rstest::rstest;
    use tempfile::TempDir;

    use super::*;

    const SAMPLE: &str = "\
# Greeting strings
[Greeting]
hello = Hello
bye: Goodbye

[Menu]
; menu entries
start = Start game
quit=Quit
";

    #[rstest]
    fn test_parse_sections_and_keys_in_order() {
        let dataset = parse_dataset(SAMPLE).unwrap();

        assert_eq!(dataset.section_names().collect::<Vec<_>>(), vec!["Greeting", "Menu"]);
        let menu = dataset.section("Menu").unwrap();
        assert_eq!(menu.keys().collect::<Vec<_>>(), vec!["start", "quit"]);
        assert_eq!(dataset.get("Greeting", "hello"), Some("Hello"));
        assert_eq!(dataset.get("Greeting", "bye"), Some("Goodbye"));
        assert_eq!(dataset.get("Menu", "quit"), Some("Quit"));
    }

    #[rstest]
    fn test_parse_keeps_key_case() {
        let dataset = parse_dataset("[S]\nHello = A\nhello = B\n").unwrap();

        assert_eq!(dataset.get("S", "Hello"), Some("A"));
        assert_eq!(dataset.get("S", "hello"), Some("B"));
    }

    #[rstest]
    fn test_parse_first_delimiter_wins() {
        let dataset = parse_dataset("[S]\ntime = 10:30\nratio: a=b\n").unwrap();

        assert_eq!(dataset.get("S", "time"), Some("10:30"));
        assert_eq!(dataset.get("S", "ratio"), Some("a=b"));
    }

    #[rstest]
    fn test_parse_empty_value() {
        let dataset = parse_dataset("[S]\nempty =\n").unwrap();

        assert_eq!(dataset.get("S", "empty"), Some(""));
    }

    #[rstest]
    fn test_parse_continuation_lines() {
        let content = "[S]\ntext = first\n    second\n\n\tthird\nnext = x\n";

        let dataset = parse_dataset(content).unwrap();

        assert_eq!(dataset.get("S", "text"), Some("first\nsecond\n\nthird"));
        assert_eq!(dataset.get("S", "next"), Some("x"));
    }

    #[rstest]
    fn test_parse_strips_byte_order_mark() {
        let dataset = parse_dataset("\u{feff}[S]\nkey = value\n").unwrap();

        assert!(dataset.has_section("S"));
    }

    #[rstest]
    #[case::missing_header("key = value\n", 1, SyntaxErrorKind::MissingSectionHeader)]
    #[case::missing_delimiter("[S]\njust text\n", 2, SyntaxErrorKind::MissingDelimiter)]
    #[case::empty_key("[S]\n = value\n", 2, SyntaxErrorKind::EmptyKey)]
    #[case::empty_section("[]\n", 1, SyntaxErrorKind::EmptySectionName)]
    #[case::duplicate_section(
        "[S]\na = 1\n[S]\n",
        3,
        SyntaxErrorKind::DuplicateSection("S".to_string())
    )]
    #[case::duplicate_key(
        "[S]\na = 1\na = 2\n",
        3,
        SyntaxErrorKind::DuplicateKey { section: "S".to_string(), key: "a".to_string() }
    )]
    fn test_parse_errors(
        #[case] content: &str,
        #[case] line: usize,
        #[case] kind: SyntaxErrorKind,
    ) {
        let result = parse_dataset(content);

        assert_eq!(result, Err(SyntaxError { line, kind }));
    }

    #[rstest]
    fn test_serialize_layout() {
        let dataset = parse_dataset(SAMPLE).unwrap();

        let text = serialize_dataset(&dataset);

        assert_eq!(
            text,
            "[Greeting]\nhello = Hello\nbye = Goodbye\n\n[Menu]\nstart = Start game\nquit = Quit\n\n"
        );
    }

    #[rstest]
    fn test_serialized_multiline_value_reads_back() {
        let mut dataset = Dataset::new();
        dataset.section_or_insert("S").set("text", "!!!one\n\ntwo!!!");

        let reparsed = parse_dataset(&serialize_dataset(&dataset)).unwrap();

        assert_eq!(reparsed, dataset);
    }

    #[rstest]
    fn test_load_missing_file_is_none() {
        let temp_dir = TempDir::new().unwrap();

        let result = load_dataset(&temp_dir.path().join("strings_fr_FR.dat"));

        assert!(matches!(result, Ok(None)));
    }

    #[rstest]
    fn test_load_malformed_file_reports_line() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("strings_fr_FR.dat");
        fs::write(&path, "[S]\nno delimiter here\n").unwrap();

        let error = load_dataset(&path).unwrap_err();

        assert_that!(error.to_string(), contains_substring("line 2"));
        assert!(matches!(error, DatError::Malformed { .. }));
        assert_eq!(error.path(), path.as_path());
    }

    #[rstest]
    fn test_load_invalid_utf8_is_encoding_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("strings_fr_FR.dat");
        fs::write(&path, [b'[', 0xff, b']']).unwrap();

        let result = load_dataset(&path);

        assert!(matches!(result, Err(DatError::Encoding { .. })));
    }

    #[rstest]
    fn test_write_then_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("strings_fr_FR.dat");
        let dataset = parse_dataset(SAMPLE).unwrap();

        write_dataset(&path, &dataset).unwrap();

        assert_eq!(load_dataset(&path).unwrap(), Some(dataset));
        assert!(!temp_dir.path().join("strings_fr_FR.dat.tmp").exists());
    }

    #[rstest]
    fn test_write_into_missing_directory_fails() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing").join("strings_fr_FR.dat");

        let result = write_dataset(&path, &Dataset::new());

        assert!(matches!(result, Err(DatError::Io { .. })));
    }
}
