use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser, ValueEnum};
use multimover_core::{run, write_json_report, write_report, MoveConfig};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

const USAGE: &str = "multimover [options] <source-pattern> <destination-pattern>";

const PATTERN_HELP: &str = "Source patterns can use %<n>{pattern} to match and destination pattern \
can use %<n> which are parts of filenames specified in the source pattern.";

const EXAMPLES: &str = r"Source patterns can use %<n>{pattern} to match and destination pattern can use %<n> which are parts of filenames specified in the source pattern.

Example: multimover -s sourcedir -t targetdir 'file-%1{\d+}.txt' 'renamed-file-%1.txt'
    * This moves files like 'file-123.txt' in sourcedir to 'renamed-file-123.txt' in targetdir.
    * %<n>{pattern} matches part of the file name with a regular expression.
    * The destination pattern uses %1, %2, ... for the captured parts, numbered
      by where each %<n>{..} appears in the source pattern, left to right.
    * An invalid regular expression in the source pattern aborts before any file is touched.
    * With --dryrun (-d) the candidate moves are listed so the patterns can be
      checked before anything is actually moved.";

#[derive(Debug, Parser)]
#[command(name = "multimover", version)]
#[command(about = "Batch-rename or move files whose names match a token pattern")]
#[command(override_usage = USAGE)]
#[command(disable_help_flag = true)]
#[command(after_help = PATTERN_HELP, after_long_help = EXAMPLES)]
struct Cli {
    /// Do not actually move files, just show what would be done
    #[arg(short = 'd', long = "dryrun")]
    dry_run: bool,
    /// Show verbose output
    #[arg(short, long)]
    verbose: bool,
    /// Show this help message
    #[arg(short, long)]
    help: bool,
    /// Source directory to search for files
    #[arg(short = 's', long = "sourcedir", value_name = "DIR", default_value = ".")]
    source_dir: PathBuf,
    /// Target directory to move files to
    #[arg(short = 't', long = "targetdir", value_name = "DIR", default_value = ".")]
    target_dir: PathBuf,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,
    source_pattern: Option<String>,
    destination_pattern: Option<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> Result<ExitCode> {
    init_tracing();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            err.print()?;
            return Ok(match err.kind() {
                ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::FAILURE,
            });
        }
    };

    if cli.help {
        print_help(cli.verbose)?;
        return Ok(ExitCode::FAILURE);
    }

    let (Some(source_template), Some(destination_template)) =
        (cli.source_pattern, cli.destination_pattern)
    else {
        println!("Usage: {USAGE}");
        return Ok(ExitCode::FAILURE);
    };

    let config = MoveConfig {
        source_template,
        destination_template,
        source_dir: cli.source_dir,
        target_dir: cli.target_dir,
        dry_run: cli.dry_run,
        verbose: cli.verbose,
    };
    tracing::debug!(?config, "resolved configuration");

    let report = run(&config)
        .with_context(|| format!("cannot compile source pattern: {}", config.source_template))?;

    let written = match cli.output {
        OutputFormat::Text => write_report(
            &report,
            &config,
            &mut io::stdout().lock(),
            &mut io::stderr().lock(),
        ),
        OutputFormat::Json => write_json_report(&report, &config, &mut io::stdout().lock()),
    };
    written.context("failed to write report")?;

    Ok(ExitCode::SUCCESS)
}

// Help always exits non-zero, like a usage error.
fn print_help(verbose: bool) -> Result<()> {
    let mut cmd = Cli::command();
    if verbose {
        cmd.print_long_help()?;
    } else {
        cmd.print_help()?;
    }
    Ok(())
}

/// Installs a stderr subscriber when `RUST_LOG` is set, e.g.
/// `RUST_LOG=multimover_core=debug`.
fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    if std::env::var_os("RUST_LOG").is_some() {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(io::stderr).with_target(true))
            .with(EnvFilter::from_default_env())
            .init();
    }
}
