use std::io::Write;
use std::path::Path;

use anyhow::Context;
use dat_i18n::config::{
    Settings,
    load_settings,
};
use dat_i18n::verify::{
    write_json_report,
    write_text_report,
};
use dat_i18n::{
    UpdateJob,
    VerifyJob,
};

use crate::cli::{
    Cli,
    Command,
    OutputFormat,
    UpdateArgs,
    VerifyArgs,
};

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let directory = std::path::absolute(&cli.directory)
        .with_context(|| format!("Invalid directory '{}'", cli.directory.display()))?;
    let settings = load_settings(&directory)?;

    match cli.command {
        Command::Update(args) => cmd_update(args, &directory, &settings),
        Command::Verify(args) => cmd_verify(args, &directory, &settings),
    }
}

fn cmd_update(args: UpdateArgs, directory: &Path, settings: &Settings) -> anyhow::Result<()> {
    let job = UpdateJob::new(args.language, directory)
        .with_source(args.source)
        .with_restart(args.restart);

    let summaries = job.run(settings)?;
    let added: usize = summaries.iter().map(|summary| summary.stats.keys_added).sum();
    tracing::info!(
        domains = summaries.len(),
        keys_added = added,
        "Updated translation '{}'",
        job.target_language
    );
    Ok(())
}

fn cmd_verify(args: VerifyArgs, directory: &Path, settings: &Settings) -> anyhow::Result<()> {
    let reports = VerifyJob::new(args.language, directory).run(settings)?;

    let mut out = std::io::stdout().lock();
    match args.format {
        OutputFormat::Text => write_text_report(&reports, &mut out)?,
        OutputFormat::Json => write_json_report(&reports, &mut out)?,
    }
    out.flush()?;
    Ok(())
}
