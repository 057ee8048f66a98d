mod apply;
mod config;
mod pattern;
mod planner;
mod report;
mod template;

pub use apply::{
    apply_moves, apply_plan, classify_failure, run, MoveOutcome, MoveStatus, RenameFailure,
    RunReport,
};
pub use config::MoveConfig;
pub use pattern::{parse_source_template, PatternError, SourcePart, TokenPattern};
pub use planner::{plan_moves, MoveCandidate, MovePlan, ScanStats};
pub use report::{
    channel_for, format_banner, format_no_match, format_outcome, format_summary,
    write_json_report, write_report, Channel, MessageKind, PROGRAM_NAME,
};
pub use template::{
    parse_destination_template, render_destination, render_parts, render_parts_bytes,
    DestinationPart,
};
