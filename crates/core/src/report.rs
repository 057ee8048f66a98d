use crate::apply::{MoveOutcome, MoveStatus, RunReport};
use crate::config::MoveConfig;
use serde::Serialize;
use std::io::{self, Write};

pub const PROGRAM_NAME: &str = "multimover";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Stdout,
    Stderr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Preview,
    Success,
    Failure,
    NoMatch,
}

impl MessageKind {
    pub fn of(status: &MoveStatus) -> Self {
        match status {
            MoveStatus::Preview => Self::Preview,
            MoveStatus::Moved => Self::Success,
            MoveStatus::Failed { .. } => Self::Failure,
        }
    }
}

/// Verbose runs keep everything on stdout; otherwise failures and the
/// no-match notice go to stderr.
pub fn channel_for(kind: MessageKind, verbose: bool) -> Channel {
    if verbose {
        return Channel::Stdout;
    }
    match kind {
        MessageKind::Info | MessageKind::Preview | MessageKind::Success => Channel::Stdout,
        MessageKind::Failure | MessageKind::NoMatch => Channel::Stderr,
    }
}

pub fn format_outcome(outcome: &MoveOutcome) -> String {
    let from = outcome.source_path.display();
    let to = outcome.target_path.display();
    match &outcome.status {
        MoveStatus::Preview => format!("{PROGRAM_NAME} : Would move: {from} -> {to}"),
        MoveStatus::Moved => format!("{PROGRAM_NAME} : Moved {from} -> {to}"),
        MoveStatus::Failed { reason } => {
            format!("{PROGRAM_NAME} : Failed to move: {from} -> {to} ({reason})")
        }
    }
}

pub fn format_no_match(source_template: &str) -> String {
    format!("{PROGRAM_NAME} : Found no match to pattern: {source_template}")
}

pub fn format_banner(config: &MoveConfig, report: &RunReport) -> Vec<String> {
    let mut lines = vec![
        format!(
            "{PROGRAM_NAME} : Source directory: {}",
            config.source_dir.display()
        ),
        format!(
            "{PROGRAM_NAME} : Target directory: {}",
            config.target_dir.display()
        ),
        format!(
            "{PROGRAM_NAME} : Compiled pattern: {}",
            report.compiled_expression
        ),
    ];
    if report.dry_run {
        lines.push(format!("{PROGRAM_NAME} : Dry run, no files will be moved."));
    }
    lines
}

pub fn format_summary(report: &RunReport) -> String {
    format!(
        "{PROGRAM_NAME} : scanned={} files={} matched={} moved={} previewed={} failed={}",
        report.stats.scanned_entries,
        report.stats.files,
        report.stats.matched,
        report.moved(),
        report.previewed(),
        report.failed()
    )
}

/// Writes the human-readable report, sending each line to the writer chosen
/// by [`channel_for`].
pub fn write_report<O: Write, E: Write>(
    report: &RunReport,
    config: &MoveConfig,
    out: &mut O,
    err: &mut E,
) -> io::Result<()> {
    let verbose = config.verbose;
    let mut emit = |kind: MessageKind, line: &str| -> io::Result<()> {
        match channel_for(kind, verbose) {
            Channel::Stdout => writeln!(out, "{line}"),
            Channel::Stderr => writeln!(err, "{line}"),
        }
    };

    if verbose {
        for line in format_banner(config, report) {
            emit(MessageKind::Info, &line)?;
        }
    }

    for outcome in &report.outcomes {
        emit(MessageKind::of(&outcome.status), &format_outcome(outcome))?;
    }

    if !report.matched_any() {
        emit(MessageKind::NoMatch, &format_no_match(&report.source_template))?;
    }

    if verbose {
        emit(MessageKind::Info, &format_summary(report))?;
    }

    Ok(())
}

#[derive(Serialize)]
struct JsonReport<'a> {
    config: &'a MoveConfig,
    report: &'a RunReport,
}

pub fn write_json_report<W: Write>(
    report: &RunReport,
    config: &MoveConfig,
    out: &mut W,
) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, &JsonReport { config, report })?;
    writeln!(out)
}
