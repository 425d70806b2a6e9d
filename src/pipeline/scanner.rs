//! Scanning engine — matches text against a pattern set.

use regex::Regex;
use tracing::{debug, warn};

use crate::pipeline::types::Pattern;

/// Scan `text` against `patterns`, returning the ids of every pattern that
/// matches anywhere in the text (search semantics, not full-match).
///
/// The result is deterministic and ordered by pattern evaluation order —
/// the insertion order of the fetched set. A pattern whose expression fails
/// to compile is skipped with a warning; the remaining patterns are still
/// evaluated. The same function scans message bodies and extracted file
/// text identically.
pub fn scan(text: &str, patterns: &[Pattern]) -> Vec<i64> {
    let mut matched = Vec::new();

    for pattern in patterns {
        let regex = match Regex::new(&pattern.regex_pattern) {
            Ok(regex) => regex,
            Err(e) => {
                warn!(
                    pattern = %pattern.name,
                    pattern_id = pattern.id,
                    error = %e,
                    "Skipping pattern with invalid regex"
                );
                continue;
            }
        };

        if regex.is_match(text) {
            debug!(
                pattern = %pattern.name,
                pattern_id = pattern.id,
                "Pattern matched"
            );
            matched.push(pattern.id);
        }
    }

    matched
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern(id: i64, name: &str, regex: &str) -> Pattern {
        Pattern {
            id,
            name: name.into(),
            regex_pattern: regex.into(),
        }
    }

    #[test]
    fn matches_card_number() {
        let patterns = vec![pattern(1, "card", r"\b\d{4}-\d{4}-\d{4}-\d{4}\b")];
        let matched = scan("Card 4111-1111-1111-1111", &patterns);
        assert_eq!(matched, vec![1]);
    }

    #[test]
    fn no_match_returns_empty() {
        let patterns = vec![pattern(1, "card", r"\b\d{4}-\d{4}-\d{4}-\d{4}\b")];
        assert!(scan("nothing sensitive here", &patterns).is_empty());
    }

    #[test]
    fn empty_pattern_set_never_matches() {
        assert!(scan("Card 4111-1111-1111-1111", &[]).is_empty());
    }

    #[test]
    fn result_order_follows_pattern_order() {
        let patterns = vec![
            pattern(9, "ssn", r"\b\d{3}-\d{2}-\d{4}\b"),
            pattern(2, "card", r"\b\d{4}-\d{4}-\d{4}-\d{4}\b"),
            pattern(5, "word", "secret"),
        ];
        let text = "secret card 4111-1111-1111-1111 and ssn 123-45-6789";
        assert_eq!(scan(text, &patterns), vec![9, 2, 5]);
    }

    #[test]
    fn scan_is_deterministic() {
        let patterns = vec![
            pattern(1, "digits", r"\d+"),
            pattern(2, "email", r"[a-z]+@[a-z]+\.[a-z]+"),
        ];
        let text = "mail me at leak@corp.com about order 42";
        let first = scan(text, &patterns);
        for _ in 0..10 {
            assert_eq!(scan(text, &patterns), first);
        }
    }

    #[test]
    fn invalid_regex_is_skipped_not_fatal() {
        let patterns = vec![
            pattern(1, "broken", r"(unclosed"),
            pattern(2, "card", r"\b\d{4}-\d{4}-\d{4}-\d{4}\b"),
            pattern(3, "also-broken", r"[z-a]"),
        ];
        let matched = scan("Card 4111-1111-1111-1111", &patterns);
        assert_eq!(matched, vec![2]);
    }

    #[test]
    fn search_semantics_match_substring() {
        // Anchored full-match would fail here; search must succeed.
        let patterns = vec![pattern(1, "ssn", r"\d{3}-\d{2}-\d{4}")];
        let matched = scan("prefix 123-45-6789 suffix", &patterns);
        assert_eq!(matched, vec![1]);
    }

    #[test]
    fn pattern_matching_multiple_times_reported_once() {
        let patterns = vec![pattern(1, "digits", r"\d{4}")];
        let matched = scan("1111 2222 3333", &patterns);
        assert_eq!(matched, vec![1]);
    }
}
