//! Content scanning pipeline.
//!
//! One task flows through:
//! 1. `PatternSource::fetch_patterns()` — current pattern set, per task
//! 2. `scanner::scan()` — regex matching over message text
//! 3. `ContentExtractor::process_file()` + `scanner::scan()` — per attachment
//! 4. `MatchSink::report()` — one record per (content, pattern) match

pub mod handler;
pub mod scanner;
pub mod types;

pub use handler::ScanHandler;
pub use types::{
    AdditionalInfo, ContentExtractor, FileRef, MatchReport, MatchSink, Pattern, PatternSource,
    ScanOutcome, SourceType,
};
