use std::path::PathBuf;

use clap::{
    Args,
    Parser,
    Subcommand,
};

#[derive(Debug, Parser)]
#[command(
    name = "dat-i18n",
    about = "Keep .dat translation files in sync with the base language",
    long_about = "Keep .dat translation files in sync with the base language.\n\n\
                  Strings copied from the base language are wrapped in !!!...!!!; strings \
                  copied from a --source language are wrapped in ***...***.",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Be talkative
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Use language files out of directory DIR
    #[arg(short, long, global = true, default_value = ".", value_name = "DIR")]
    pub directory: PathBuf,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start a new translation or pull new strings into an existing one
    Update(UpdateArgs),
    /// List strings that are missing, untranslated or obsolete
    Verify(VerifyArgs),
}

#[derive(Debug, Args)]
pub struct UpdateArgs {
    /// Language to update, e.g. de_DE
    pub language: String,

    /// Prefer strings from language LANG over the base language
    #[arg(short, long, value_name = "LANG")]
    pub source: Option<String>,

    /// Throw away the existing translation and start over (DANGEROUS!)
    #[arg(long)]
    pub restart: bool,
}

#[derive(Debug, Args)]
pub struct VerifyArgs {
    /// Language to verify
    pub language: String,

    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use clap::CommandFactory;
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[rstest]
    fn test_parse_update() {
        let cli = Cli::try_parse_from([
            "dat-i18n", "-v", "update", "--source", "fr_FR", "--restart", "fr_CA", "-d", "data",
        ])
        .unwrap();

        assert!(cli.verbose);
        assert_eq!(cli.directory, PathBuf::from("data"));
        let Command::Update(args) = cli.command else {
            panic!("expected update command");
        };
        assert_eq!(args.language, "fr_CA");
        assert_eq!(args.source.as_deref(), Some("fr_FR"));
        assert!(args.restart);
    }

    #[rstest]
    fn test_parse_verify_defaults() {
        let cli = Cli::try_parse_from(["dat-i18n", "verify", "de_DE"]).unwrap();

        assert!(!cli.verbose);
        assert_eq!(cli.directory, PathBuf::from("."));
        let Command::Verify(args) = cli.command else {
            panic!("expected verify command");
        };
        assert_eq!(args.format, OutputFormat::Text);
    }

    #[rstest]
    #[case::missing_language(&["dat-i18n", "update"])]
    #[case::unknown_mode(&["dat-i18n", "package", "de_DE"])]
    #[case::source_outside_update(&["dat-i18n", "verify", "--source", "fr_FR", "de_DE"])]
    #[case::restart_outside_update(&["dat-i18n", "verify", "--restart", "de_DE"])]
    fn test_parse_rejects(#[case] args: &[&str]) {
        assert!(Cli::try_parse_from(args).is_err());
    }
}
