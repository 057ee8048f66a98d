use serde::Serialize;
use std::path::PathBuf;

/// Everything one invocation needs, resolved once from the command line and
/// passed by reference into compiling, scanning and applying.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoveConfig {
    pub source_template: String,
    pub destination_template: String,
    pub source_dir: PathBuf,
    pub target_dir: PathBuf,
    pub dry_run: bool,
    pub verbose: bool,
}

impl Default for MoveConfig {
    fn default() -> Self {
        Self {
            source_template: String::new(),
            destination_template: String::new(),
            source_dir: PathBuf::from("."),
            target_dir: PathBuf::from("."),
            dry_run: false,
            verbose: false,
        }
    }
}

impl MoveConfig {
    pub fn new(source_template: impl Into<String>, destination_template: impl Into<String>) -> Self {
        Self {
            source_template: source_template.into(),
            destination_template: destination_template.into(),
            ..Self::default()
        }
    }
}
