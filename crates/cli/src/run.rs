// Pipeline: config -> import -> detect -> export

use std::path::Path;

use anyhow::Context;
use log::info;
use rollcall_dedup::{DedupConfig, DedupResult, IdentityMode};

use crate::exit_codes::{EXIT_CONFIG, EXIT_EXPORT, EXIT_INPUT_PARSE, EXIT_MISSING_INPUT};
use crate::{report, Cli, CliError};

pub fn run(cli: &Cli) -> Result<(), CliError> {
    if !cli.input.exists() {
        return Err(CliError::new(
            EXIT_MISSING_INPUT,
            format!("input file '{}' not found", cli.input.display()),
        ));
    }

    let config = load_config(cli).map_err(|e| {
        CliError::processing(EXIT_CONFIG, e)
            .with_hint("keys: identity_mode, merge_strategy, group_blank_ids, [fuzzy] threshold and window")
    })?;

    let rows = rollcall_io::csv::import_roster(&cli.input)
        .with_context(|| format!("reading roster {}", cli.input.display()))
        .map_err(|e| {
            CliError::processing(EXIT_INPUT_PARSE, e)
                .with_hint("expected a ';'-separated file with columns matricule;nom;prenom;sexe")
        })?;
    info!("{} row(s) loaded from {}", rows.len(), cli.input.display());

    let result = rollcall_dedup::run(&config, rows)
        .context("duplicate detection failed")
        .map_err(|e| CliError::processing(EXIT_CONFIG, e))?;

    if !cli.quiet {
        report::print_banner(&result.summary);
    }

    write_outputs(cli, &result).map_err(|e| CliError::processing(EXIT_EXPORT, e))?;
    Ok(())
}

/// Defaults, then the config file if any, then command-line overrides.
fn load_config(cli: &Cli) -> anyhow::Result<DedupConfig> {
    let mut config = match &cli.config {
        Some(path) => read_config(path)?,
        None => DedupConfig::default(),
    };

    if cli.fuzzy {
        config.identity_mode = IdentityMode::Fuzzy;
    }
    if let Some(threshold) = cli.threshold {
        config.fuzzy.threshold = threshold;
    }
    if let Some(window) = cli.window {
        config.fuzzy.window = window;
    }
    if let Some(strategy) = cli.merge_strategy {
        config.merge_strategy = strategy.into();
    }
    if cli.no_blank_ids {
        config.group_blank_ids = false;
    }

    config.validate().context("invalid command-line override")?;
    Ok(config)
}

fn read_config(path: &Path) -> anyhow::Result<DedupConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    DedupConfig::from_toml(&text).with_context(|| format!("loading config {}", path.display()))
}

fn write_outputs(cli: &Cli, result: &DedupResult) -> anyhow::Result<()> {
    let stats = rollcall_io::xlsx::export(result, &cli.output)
        .with_context(|| format!("writing workbook {}", cli.output.display()))?;
    info!("wrote {} ({})", cli.output.display(), stats.summary());

    if let Some(path) = &cli.json {
        rollcall_io::json::export(result, path)
            .with_context(|| format!("writing report {}", path.display()))?;
        info!("wrote {}", path.display());
    }
    Ok(())
}
