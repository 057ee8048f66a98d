use crate::config::MoveConfig;
use crate::pattern::TokenPattern;
use crate::template::{parse_destination_template, render_parts_bytes};
use serde::Serialize;
use std::ffi::OsString;
use std::path::PathBuf;
use tracing::{debug, trace};
use walkdir::WalkDir;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoveCandidate {
    pub source_path: PathBuf,
    pub target_path: PathBuf,
    pub captures: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub struct ScanStats {
    pub scanned_entries: usize,
    pub files: usize,
    pub skipped_non_files: usize,
    /// Matches whose rendered name cannot be turned back into a path. Only
    /// possible off Unix, where raw name bytes are not a valid `OsString`.
    pub skipped_unencodable: usize,
    pub matched: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct MovePlan {
    pub source_template: String,
    pub compiled_expression: String,
    pub candidates: Vec<MoveCandidate>,
    pub stats: ScanStats,
}

/// Lists the immediate entries of `config.source_dir` and pairs every
/// matching regular file with its rendered destination under
/// `config.target_dir`.
///
/// An unreadable or missing source directory produces an empty plan.
pub fn plan_moves(config: &MoveConfig, pattern: &TokenPattern) -> MovePlan {
    let destination = parse_destination_template(&config.destination_template);
    let mut stats = ScanStats::default();
    let mut candidates = Vec::new();

    let walker = WalkDir::new(&config.source_dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name();

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                debug!(error = %err, dir = %config.source_dir.display(), "skipping unreadable entry");
                continue;
            }
        };
        stats.scanned_entries += 1;

        let path = entry.path();
        if !path.is_file() {
            stats.skipped_non_files += 1;
            continue;
        }
        stats.files += 1;

        let name = entry.file_name();
        let Some(raw_captures) = pattern.captures_bytes(name.as_encoded_bytes()) else {
            trace!(name = %name.to_string_lossy(), "no match");
            continue;
        };

        let Some(rendered) = os_string_from_bytes(render_parts_bytes(&destination, &raw_captures))
        else {
            debug!(path = %path.display(), "rendered name is not representable on this platform");
            stats.skipped_unencodable += 1;
            continue;
        };
        let target_path = config.target_dir.join(rendered);
        let captures: Vec<String> = raw_captures
            .iter()
            .map(|value| String::from_utf8_lossy(value).into_owned())
            .collect();
        debug!(name = %name.to_string_lossy(), ?captures, target = %target_path.display(), "matched");

        stats.matched += 1;
        candidates.push(MoveCandidate {
            source_path: path.to_path_buf(),
            target_path,
            captures,
        });
    }

    MovePlan {
        source_template: pattern.source().to_string(),
        compiled_expression: pattern.as_regex_str().to_string(),
        candidates,
        stats,
    }
}

#[cfg(unix)]
fn os_string_from_bytes(bytes: Vec<u8>) -> Option<OsString> {
    use std::os::unix::ffi::OsStringExt;
    Some(OsString::from_vec(bytes))
}

#[cfg(not(unix))]
fn os_string_from_bytes(bytes: Vec<u8>) -> Option<OsString> {
    String::from_utf8(bytes).ok().map(OsString::from)
}
