use crate::config::MoveConfig;
use crate::pattern::{PatternError, TokenPattern};
use crate::planner::{plan_moves, MoveCandidate, MovePlan, ScanStats};
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum RenameFailure {
    #[error("Destination file already exists.")]
    DestinationExists,
    #[error("Directory is read-only.")]
    ReadOnlyDirectory,
    #[error("Unclassified failure: {0}")]
    Unclassified(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MoveStatus {
    Preview,
    Moved,
    Failed { reason: RenameFailure },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoveOutcome {
    pub source_path: PathBuf,
    pub target_path: PathBuf,
    pub captures: Vec<String>,
    pub status: MoveStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub source_template: String,
    pub compiled_expression: String,
    pub dry_run: bool,
    pub outcomes: Vec<MoveOutcome>,
    pub stats: ScanStats,
}

impl RunReport {
    pub fn matched_any(&self) -> bool {
        !self.outcomes.is_empty()
    }

    pub fn moved(&self) -> usize {
        self.count(|status| matches!(status, MoveStatus::Moved))
    }

    pub fn previewed(&self) -> usize {
        self.count(|status| matches!(status, MoveStatus::Preview))
    }

    pub fn failed(&self) -> usize {
        self.count(|status| matches!(status, MoveStatus::Failed { .. }))
    }

    fn count(&self, pred: impl Fn(&MoveStatus) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(&o.status)).count()
    }
}

/// Compiles the source template and applies it. A pattern error is returned
/// before the source directory is touched.
pub fn run(config: &MoveConfig) -> Result<RunReport, PatternError> {
    let pattern = TokenPattern::compile(&config.source_template)?;
    Ok(apply_moves(config, &pattern))
}

pub fn apply_moves(config: &MoveConfig, pattern: &TokenPattern) -> RunReport {
    apply_plan(plan_moves(config, pattern), config.dry_run)
}

/// Moves every planned file in order. A failed move is recorded and the loop
/// carries on; nothing already moved is rolled back.
pub fn apply_plan(plan: MovePlan, dry_run: bool) -> RunReport {
    let mut outcomes = Vec::with_capacity(plan.candidates.len());

    for MoveCandidate {
        source_path,
        target_path,
        captures,
    } in plan.candidates
    {
        let status = if dry_run {
            MoveStatus::Preview
        } else {
            match move_file(&source_path, &target_path) {
                Ok(()) => {
                    debug!(from = %source_path.display(), to = %target_path.display(), "moved");
                    MoveStatus::Moved
                }
                Err(reason) => {
                    warn!(from = %source_path.display(), to = %target_path.display(), %reason, "move failed");
                    MoveStatus::Failed { reason }
                }
            }
        };

        outcomes.push(MoveOutcome {
            source_path,
            target_path,
            captures,
            status,
        });
    }

    RunReport {
        source_template: plan.source_template,
        compiled_expression: plan.compiled_expression,
        dry_run,
        outcomes,
        stats: plan.stats,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MoveAction {
    /// Source and target are the same path.
    Skip,
    Rename,
    Collision,
}

// rename(2) replaces an existing target silently, so a foreign target is
// refused up front. A target that resolves to the source itself (a case-only
// rename on a case-insensitive filesystem) still goes through rename.
fn move_action(source: &Path, target: &Path) -> MoveAction {
    if source == target {
        MoveAction::Skip
    } else if !target.exists() || is_same_file(source, target) {
        MoveAction::Rename
    } else {
        MoveAction::Collision
    }
}

fn move_file(source: &Path, target: &Path) -> Result<(), RenameFailure> {
    match move_action(source, target) {
        MoveAction::Skip => Ok(()),
        MoveAction::Collision => Err(RenameFailure::DestinationExists),
        MoveAction::Rename => {
            fs::rename(source, target).map_err(|err| classify_failure(target, &err))
        }
    }
}

/// Best-effort diagnosis of a failed rename. Another process may change the
/// target between the failure and these checks.
pub fn classify_failure(target: &Path, err: &io::Error) -> RenameFailure {
    if target.exists() {
        return RenameFailure::DestinationExists;
    }

    if matches!(
        err.kind(),
        io::ErrorKind::PermissionDenied | io::ErrorKind::ReadOnlyFilesystem
    ) {
        return RenameFailure::ReadOnlyDirectory;
    }

    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    if is_read_only_dir(dir) {
        return RenameFailure::ReadOnlyDirectory;
    }

    RenameFailure::Unclassified(err.to_string())
}

fn is_read_only_dir(dir: &Path) -> bool {
    fs::metadata(dir)
        .map(|meta| meta.is_dir() && meta.permissions().readonly())
        .unwrap_or(false)
}

fn is_same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
