//! `yaml-patch` — apply operations files to a YAML document.
//!
//! Usage:
//!   yaml-patch -o ops1.yml [-o ops2.yml ...] < doc.yml > out.yml
//!
//! The document is read from stdin and the patched document is written to
//! stdout. Nothing is written to stdout if any step fails.

use std::io::{self, Read, Write};
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use tracing::error;
use tracing_subscriber::EnvFilter;
use yaml_patch::cli::{load_ops_files, run, CliError, Options};
use yaml_patch::Format;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Output {
    Yaml,
    Json,
}

impl From<Output> for Format {
    fn from(value: Output) -> Self {
        match value {
            Output::Yaml => Format::Yaml,
            Output::Json => Format::Json,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "yaml-patch", version, about)]
struct Args {
    /// Path to an operations file. Repeat to apply several, in order.
    #[arg(short = 'o', long = "ops-file", value_name = "PATH")]
    ops_files: Vec<PathBuf>,

    /// Left delimiter of template placeholders.
    #[arg(long, env = "YAML_PATCH_PLACEHOLDER_LEFT", default_value = "{{")]
    placeholder_left: String,

    /// Right delimiter of template placeholders.
    #[arg(long, env = "YAML_PATCH_PLACEHOLDER_RIGHT", default_value = "}}")]
    placeholder_right: String,

    #[arg(long, value_enum, default_value = "yaml")]
    output: Output,
}

#[derive(Debug, thiserror::Error)]
enum MainError {
    #[error("error reading document: {0}")]
    ReadDoc(#[source] io::Error),
    #[error("error writing output: {0}")]
    Write(#[source] io::Error),
    #[error(transparent)]
    Cli(#[from] CliError),
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn execute(args: Args) -> Result<(), MainError> {
    let ops = load_ops_files(&args.ops_files)?;

    let mut doc = Vec::new();
    io::stdin().read_to_end(&mut doc).map_err(MainError::ReadDoc)?;

    let options = Options {
        placeholder_left: args.placeholder_left,
        placeholder_right: args.placeholder_right,
        output: args.output.into(),
    };
    let out = run(&doc, &ops, &options)?;

    let mut stdout = io::stdout().lock();
    stdout.write_all(&out).map_err(MainError::Write)?;
    stdout.flush().map_err(MainError::Write)
}

fn main() {
    let args = Args::parse();
    init_tracing();
    if let Err(e) = execute(args) {
        error!("{e}");
        std::process::exit(1);
    }
}
