//! Shared types for the scan pipeline.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ── Detection pattern ───────────────────────────────────────────────

/// A detection pattern as served by the pattern API.
///
/// The worker holds a request-scoped copy only — every scan task re-fetches
/// the full set, so a pattern edit takes effect on the next message with no
/// cache invalidation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pattern {
    /// Primary key in the pattern store.
    pub id: i64,
    /// Human-readable name (e.g. "Visa card", "US SSN").
    pub name: String,
    /// Regular expression describing the sensitive-data shape.
    pub regex_pattern: String,
}

// ── Inbound task metadata ───────────────────────────────────────────

/// A chat attachment reference, as forwarded by the ingestion endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileRef {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Platform file type tag (e.g. "pdf", "png").
    #[serde(default)]
    pub filetype: String,
    /// Authenticated download URL.
    #[serde(default)]
    pub url_private: String,
}

/// Message metadata carried in the task's `kwargs`.
///
/// The Slack event path sends the message timestamp as `ts`; accept both
/// spellings on the wire.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdditionalInfo {
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub channel: String,
    #[serde(default, alias = "ts")]
    pub timestamp: String,
    /// Attachments to download and scan alongside the message text.
    #[serde(default)]
    pub files: Vec<FileRef>,
}

// ── Match report ────────────────────────────────────────────────────

/// Where the scanned content came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceType {
    Message,
    File,
}

/// One detected leak, submitted to the results store.
///
/// `file_name`/`file_id` are populated exactly when `source_type` is
/// [`SourceType::File`] — use [`MatchReport::for_message`] and
/// [`MatchReport::for_file`] rather than constructing this directly.
#[derive(Debug, Clone, Serialize)]
pub struct MatchReport {
    /// Id of the pattern that matched, from the same fetch that was scanned.
    pub pattern_matched: i64,
    /// The content that matched — message text, or extracted file text.
    pub message_content: String,
    pub user_id: String,
    pub channel: String,
    pub timestamp: String,
    /// Serialized as explicit `null` for message-sourced matches.
    pub file_name: Option<String>,
    pub file_id: Option<String>,
    pub source_type: SourceType,
}

impl MatchReport {
    /// Report a match found in the message text itself.
    pub fn for_message(pattern_id: i64, content: &str, info: &AdditionalInfo) -> Self {
        Self {
            pattern_matched: pattern_id,
            message_content: content.to_string(),
            user_id: info.user.clone(),
            channel: info.channel.clone(),
            timestamp: info.timestamp.clone(),
            file_name: None,
            file_id: None,
            source_type: SourceType::Message,
        }
    }

    /// Report a match found in text extracted from an attachment.
    ///
    /// `content` is the extracted file text, not the original message.
    pub fn for_file(
        pattern_id: i64,
        content: &str,
        info: &AdditionalInfo,
        file: &FileRef,
    ) -> Self {
        Self {
            pattern_matched: pattern_id,
            message_content: content.to_string(),
            user_id: info.user.clone(),
            channel: info.channel.clone(),
            timestamp: info.timestamp.clone(),
            file_name: Some(file.name.clone()),
            file_id: Some(file.id.clone()),
            source_type: SourceType::File,
        }
    }
}

// ── Scan outcome ────────────────────────────────────────────────────

/// Summary of one completed `scan_message` task, for logging and tests.
#[derive(Debug, Clone)]
pub struct ScanOutcome {
    /// Matches found in the message text.
    pub message_matches: usize,
    /// Matches found across all attachment texts.
    pub file_matches: usize,
    /// Attachments that yielded scannable text.
    pub files_scanned: usize,
    /// When the task finished.
    pub completed_at: DateTime<Utc>,
}

impl ScanOutcome {
    /// Total reports submitted for this task.
    pub fn total_matches(&self) -> usize {
        self.message_matches + self.file_matches
    }
}

// ── I/O seams ───────────────────────────────────────────────────────

/// Source of the current pattern set — pure I/O, no business logic.
///
/// An unreachable or failing source yields an empty set, never an error:
/// the scan proceeds (and finds nothing) rather than failing the task.
#[async_trait]
pub trait PatternSource: Send + Sync {
    async fn fetch_patterns(&self) -> Vec<Pattern>;
}

/// Turns an attachment into scannable plain text.
///
/// `None` means the file could not be scanned — unsupported type, download
/// failure, or a corrupt document. None of those abort the surrounding task.
#[async_trait]
pub trait ContentExtractor: Send + Sync {
    async fn process_file(&self, file: &FileRef) -> Option<String>;
}

/// Destination for detected matches.
///
/// Delivery is best-effort: implementations log failures and return, they
/// never propagate an error back into the scan.
#[async_trait]
pub trait MatchSink: Send + Sync {
    async fn report(&self, report: &MatchReport);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn additional_info_accepts_ts_alias() {
        let info: AdditionalInfo = serde_json::from_str(
            r#"{"user": "U123", "channel": "C456", "ts": "1700000000.000100"}"#,
        )
        .unwrap();
        assert_eq!(info.timestamp, "1700000000.000100");
        assert!(info.files.is_empty());
    }

    #[test]
    fn additional_info_missing_fields_default() {
        let info: AdditionalInfo = serde_json::from_str("{}").unwrap();
        assert_eq!(info.user, "");
        assert_eq!(info.timestamp, "");
        assert!(info.files.is_empty());
    }

    #[test]
    fn source_type_wire_values() {
        assert_eq!(
            serde_json::to_value(SourceType::Message).unwrap(),
            "message"
        );
        assert_eq!(serde_json::to_value(SourceType::File).unwrap(), "file");
    }

    #[test]
    fn message_report_has_null_file_fields() {
        let info = AdditionalInfo {
            user: "U1".into(),
            channel: "C1".into(),
            timestamp: "123.456".into(),
            files: vec![],
        };
        let report = MatchReport::for_message(7, "card 4111", &info);
        assert_eq!(report.source_type, SourceType::Message);
        assert!(report.file_name.is_none());

        // The results API expects explicit nulls, not omitted keys.
        let json = serde_json::to_value(&report).unwrap();
        assert!(json["file_name"].is_null());
        assert!(json["file_id"].is_null());
        assert_eq!(json["pattern_matched"], 7);
        assert_eq!(json["user_id"], "U1");
    }

    #[test]
    fn file_report_carries_attachment_identity() {
        let info = AdditionalInfo {
            user: "U1".into(),
            channel: "C1".into(),
            timestamp: "123.456".into(),
            files: vec![],
        };
        let file = FileRef {
            id: "F99".into(),
            name: "statement.pdf".into(),
            filetype: "pdf".into(),
            url_private: "https://files.example/F99".into(),
        };
        let report = MatchReport::for_file(3, "extracted text", &info, &file);
        assert_eq!(report.source_type, SourceType::File);
        assert_eq!(report.file_name.as_deref(), Some("statement.pdf"));
        assert_eq!(report.file_id.as_deref(), Some("F99"));
        assert_eq!(report.message_content, "extracted text");
    }
}
