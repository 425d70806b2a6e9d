//! `scan_message` task handler — orchestrates one scan end to end.
//!
//! Per task: fetch the current pattern set, scan the message text, then
//! download/extract and scan each attachment, reporting every match. The
//! handler is state-free across tasks and never fails the task itself —
//! pattern-fetch outages, bad files, and reporting failures are absorbed
//! at their own seams.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use crate::pipeline::scanner::scan;
use crate::pipeline::types::{
    AdditionalInfo, ContentExtractor, MatchReport, MatchSink, PatternSource, ScanOutcome,
};

/// Orchestrates a single `scan_message` task.
pub struct ScanHandler {
    patterns: Arc<dyn PatternSource>,
    extractor: Arc<dyn ContentExtractor>,
    sink: Arc<dyn MatchSink>,
}

impl ScanHandler {
    pub fn new(
        patterns: Arc<dyn PatternSource>,
        extractor: Arc<dyn ContentExtractor>,
        sink: Arc<dyn MatchSink>,
    ) -> Self {
        Self {
            patterns,
            extractor,
            sink,
        }
    }

    /// Run one scan task: message text first, then each attachment.
    ///
    /// Every reported pattern id references the pattern set fetched at the
    /// top of this call — never a stale set from an earlier task. Finding
    /// no matches is the common case and is not an error.
    pub async fn scan_message(&self, text: &str, info: &AdditionalInfo) -> ScanOutcome {
        let patterns = self.patterns.fetch_patterns().await;
        debug!(
            patterns = patterns.len(),
            channel = %info.channel,
            "Scanning message"
        );

        let mut message_matches = 0;
        for pattern_id in scan(text, &patterns) {
            self.sink
                .report(&MatchReport::for_message(pattern_id, text, info))
                .await;
            message_matches += 1;
        }

        let mut file_matches = 0;
        let mut files_scanned = 0;
        for file in &info.files {
            let Some(file_text) = self.extractor.process_file(file).await else {
                continue;
            };
            files_scanned += 1;

            for pattern_id in scan(&file_text, &patterns) {
                self.sink
                    .report(&MatchReport::for_file(pattern_id, &file_text, info, file))
                    .await;
                file_matches += 1;
            }
        }

        let outcome = ScanOutcome {
            message_matches,
            file_matches,
            files_scanned,
            completed_at: Utc::now(),
        };

        if outcome.total_matches() > 0 {
            info!(
                message_matches,
                file_matches,
                channel = %info.channel,
                user = %info.user,
                "Leaks detected"
            );
        }

        outcome
    }
}
