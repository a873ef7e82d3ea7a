//! Translatable domains and their file names.

use serde::{
    Deserialize,
    Serialize,
};

/// Built-in domain table: `(prefix, has_standalone)`.
const DEFAULT_DOMAINS: &[(&str, bool)] = &[
    ("bases", true),
    ("events", true),
    ("items", true),
    ("strings", false),
    ("techs", true),
    ("locations", true),
];

/// A category of translatable content with one file per language.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Domain {
    /// File name prefix, e.g. `items` for `items_de_DE.dat`.
    pub prefix: String,

    /// Whether the game also ships a standalone definition file for this
    /// domain. Informational only.
    #[serde(default)]
    pub has_standalone: bool,
}

impl Domain {
    #[must_use]
    pub fn new(prefix: impl Into<String>, has_standalone: bool) -> Self {
        Self { prefix: prefix.into(), has_standalone }
    }

    /// The built-in domain list, in processing order.
    #[must_use]
    pub fn defaults() -> Vec<Self> {
        DEFAULT_DOMAINS
            .iter()
            .map(|&(prefix, has_standalone)| Self::new(prefix, has_standalone))
            .collect()
    }

    /// File name of this domain for `language`, e.g. `strings_fr_FR.dat`.
    #[must_use]
    pub fn file_name(&self, language: &str, extension: &str) -> String {
        format!("{}_{language}.{extension}", self.prefix)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn test_defaults_order() {
        let prefixes: Vec<String> = Domain::defaults().into_iter().map(|d| d.prefix).collect();

        assert_that!(prefixes, elements_are![
            eq("bases"),
            eq("events"),
            eq("items"),
            eq("strings"),
            eq("techs"),
            eq("locations")
        ]);
    }

    #[rstest]
    fn test_only_strings_lacks_standalone() {
        let without: Vec<String> = Domain::defaults()
            .into_iter()
            .filter(|d| !d.has_standalone)
            .map(|d| d.prefix)
            .collect();

        assert_that!(without, elements_are![eq("strings")]);
    }

    #[rstest]
    #[case::base(Domain::new("items", true), "en_US", "items_en_US.dat")]
    #[case::target(Domain::new("strings", false), "eo", "strings_eo.dat")]
    fn test_file_name(#[case] domain: Domain, #[case] language: &str, #[case] expected: &str) {
        assert_that!(domain.file_name(language, "dat"), eq(expected));
    }

    #[rstest]
    fn test_deserialize_defaults_standalone_to_false() {
        let domain: Domain = serde_json::from_str(r#"{"prefix": "quests"}"#).unwrap();

        assert_eq!(domain, Domain::new("quests", false));
    }
}
