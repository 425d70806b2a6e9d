//! Task envelope decoding.
//!
//! The ingestion endpoint publishes Celery-style envelopes:
//! `{"task": "scan_message", "args": [text], "kwargs": {"additional_info": {...}}}`.
//! Decoding resolves them into the closed [`ScanTask`] enum — there is no
//! string-keyed handler registry, and an unknown task name is a decode
//! error the worker rejects explicitly rather than leaving unacked.

use serde::Deserialize;
use serde_json::Value;

use crate::error::TaskError;
use crate::pipeline::types::AdditionalInfo;

/// Raw queue message envelope: a named task plus positional and keyword
/// arguments.
#[derive(Debug, Deserialize)]
pub struct TaskMessage {
    pub task: String,
    #[serde(default)]
    pub args: Vec<Value>,
    #[serde(default)]
    pub kwargs: serde_json::Map<String, Value>,
}

/// The closed set of tasks this worker executes.
#[derive(Debug)]
pub enum ScanTask {
    /// Scan a posted message and its attachments against the current
    /// pattern set.
    ScanMessage {
        text: String,
        info: AdditionalInfo,
    },
}

impl ScanTask {
    /// Decode a raw queue body into a task.
    ///
    /// Malformed bodies and unknown task names come back as [`TaskError`];
    /// the caller rejects those deliveries without requeue.
    pub fn decode(body: &[u8]) -> Result<Self, TaskError> {
        let envelope: TaskMessage = serde_json::from_slice(body)?;
        match envelope.task.as_str() {
            "scan_message" => Self::scan_message(envelope),
            other => Err(TaskError::UnknownTask(other.to_string())),
        }
    }

    fn scan_message(envelope: TaskMessage) -> Result<Self, TaskError> {
        // File-share events carry no message text: a null or absent first
        // argument scans as the empty string.
        let text = match envelope.args.first() {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(text)) => text.clone(),
            Some(other) => {
                return Err(TaskError::BadArguments {
                    task: "scan_message".into(),
                    reason: format!("message text must be a string, got {other}"),
                });
            }
        };

        let info = match envelope.kwargs.get("additional_info") {
            Some(value) => serde_json::from_value(value.clone())?,
            None => {
                return Err(TaskError::BadArguments {
                    task: "scan_message".into(),
                    reason: "missing additional_info keyword argument".into(),
                });
            }
        };

        Ok(Self::ScanMessage { text, info })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_scan_message_envelope() {
        let body = br#"{
            "task": "scan_message",
            "args": ["Card 4111-1111-1111-1111"],
            "kwargs": {"additional_info": {"user": "U1", "channel": "C1", "ts": "1.2"}}
        }"#;
        let ScanTask::ScanMessage { text, info } = ScanTask::decode(body).unwrap();
        assert_eq!(text, "Card 4111-1111-1111-1111");
        assert_eq!(info.user, "U1");
        assert_eq!(info.timestamp, "1.2");
    }

    #[test]
    fn null_message_text_scans_as_empty() {
        let body = br#"{
            "task": "scan_message",
            "args": [null],
            "kwargs": {"additional_info": {"user": "U1", "channel": "C1"}}
        }"#;
        let ScanTask::ScanMessage { text, .. } = ScanTask::decode(body).unwrap();
        assert_eq!(text, "");
    }

    #[test]
    fn decodes_attached_files() {
        let body = br#"{
            "task": "scan_message",
            "args": ["see attached"],
            "kwargs": {"additional_info": {
                "user": "U1",
                "channel": "C1",
                "ts": "1.2",
                "files": [{"id": "F1", "name": "doc.pdf", "filetype": "pdf",
                           "url_private": "https://files.example/F1"}]
            }}
        }"#;
        let ScanTask::ScanMessage { info, .. } = ScanTask::decode(body).unwrap();
        assert_eq!(info.files.len(), 1);
        assert_eq!(info.files[0].filetype, "pdf");
    }

    #[test]
    fn unknown_task_name_is_rejected() {
        let body = br#"{"task": "delete_everything", "args": [], "kwargs": {}}"#;
        let err = ScanTask::decode(body).unwrap_err();
        assert!(matches!(err, TaskError::UnknownTask(ref name) if name == "delete_everything"));
    }

    #[test]
    fn garbage_body_is_malformed() {
        let err = ScanTask::decode(b"not json at all").unwrap_err();
        assert!(matches!(err, TaskError::Malformed(_)));
    }

    #[test]
    fn missing_additional_info_is_bad_arguments() {
        let body = br#"{"task": "scan_message", "args": ["hello"], "kwargs": {}}"#;
        let err = ScanTask::decode(body).unwrap_err();
        assert!(matches!(err, TaskError::BadArguments { .. }));
    }

    #[test]
    fn non_string_text_is_bad_arguments() {
        let body = br#"{
            "task": "scan_message",
            "args": [42],
            "kwargs": {"additional_info": {}}
        }"#;
        let err = ScanTask::decode(body).unwrap_err();
        assert!(matches!(err, TaskError::BadArguments { .. }));
    }
}
