// Rollcall CLI - duplicate student detection over a roster CSV

mod exit_codes;
mod report;
mod run;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use log::debug;
use rollcall_dedup::MergeStrategy;

use exit_codes::{EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "rollcall")]
#[command(about = "Find duplicate students in a roster and write an annotated spreadsheet")]
#[command(long_version = long_version())]
#[command(version)]
#[command(after_help = "\
The roster is a ';'-separated CSV with the columns matricule, nom, prenom
and sexe. Every row is written to the output workbook, grouped rows first,
with a Groupe (G1, G2, ...) and Type_doublon label.

Examples:
  rollcall etudiants.csv resultat_groupes.xlsx
  rollcall etudiants.csv out.xlsx --fuzzy --threshold 0.9
  rollcall etudiants.csv out.xlsx --config rollcall.toml --json report.json

Exit codes:
  0  success   2  usage   3  input not found
  4  config    5  input unreadable   6  output not written

On failure the error and its causes are printed on one line; run with -v to
also log the full diagnostic, including a backtrace when RUST_BACKTRACE=1.")]
pub struct Cli {
    /// Roster CSV to scan
    pub input: PathBuf,

    /// Output workbook (.xlsx)
    pub output: PathBuf,

    /// TOML config file
    #[arg(long, value_name = "FILE", env = "ROLLCALL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Match names approximately instead of exactly
    #[arg(long)]
    pub fuzzy: bool,

    /// Similarity a fuzzy match must exceed, in (0, 1]
    #[arg(long, value_name = "RATIO")]
    pub threshold: Option<f64>,

    /// Number of following sorted rows compared with each fuzzy anchor
    #[arg(long, value_name = "ROWS")]
    pub window: Option<usize>,

    /// How overlapping candidate groups are consolidated
    #[arg(long, value_enum)]
    pub merge_strategy: Option<MergeArg>,

    /// Never group rows whose matricule is blank
    #[arg(long)]
    pub no_blank_ids: bool,

    /// Also write the run report as JSON
    #[arg(long, value_name = "FILE")]
    pub json: Option<PathBuf>,

    /// Only log warnings and errors; skip the results banner
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log detector details and full error diagnostics
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum MergeArg {
    UnionFind,
    FirstMatch,
}

impl From<MergeArg> for MergeStrategy {
    fn from(arg: MergeArg) -> Self {
        match arg {
            MergeArg::UnionFind => MergeStrategy::UnionFind,
            MergeArg::FirstMatch => MergeStrategy::FirstMatch,
        }
    }
}

fn long_version() -> &'static str {
    if cfg!(debug_assertions) {
        concat!(
            env!("CARGO_PKG_VERSION"),
            " (", env!("GIT_COMMIT_HASH"), ")",
            "\nbuild:   debug",
            "\ntarget:  ", env!("TARGET"),
        )
    } else {
        concat!(
            env!("CARGO_PKG_VERSION"),
            " (", env!("GIT_COMMIT_HASH"), ")",
            "\nbuild:   release",
            "\ntarget:  ", env!("TARGET"),
        )
    }
}

fn init_logging(cli: &Cli) {
    let default_level = if cli.quiet {
        "warn"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .format_target(false)
        .init();
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // --help and --version land here too, on stdout.
            let _ = err.print();
            return ExitCode::from(if err.use_stderr() { EXIT_USAGE } else { EXIT_SUCCESS });
        }
    };
    init_logging(&cli);

    match run::run(&cli) {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn new(code: u8, msg: impl Into<String>) -> Self {
        Self { code, message: msg.into(), hint: None }
    }

    /// Processing failure: the full context chain becomes the message and
    /// the debug rendering (with backtrace, when captured) is logged at
    /// debug level.
    pub fn processing(code: u8, err: anyhow::Error) -> Self {
        debug!("{:?}", err);
        Self { code, message: format!("{:#}", err), hint: None }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}
