//! HTTP client for the pattern and caught-message APIs.
//!
//! Both endpoints live on the same webserver and share `Api-Key` auth.
//! Pattern fetches degrade to an empty set on any failure; match reports
//! are retried a bounded number of times and then logged as lost — neither
//! path ever propagates an error into the scan.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, error, warn};

use crate::config::ApiConfig;
use crate::pipeline::types::{MatchReport, MatchSink, Pattern, PatternSource};

/// Per-request timeout so a wedged API cannot stall the consumer.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Attempts per match report before the finding is logged as lost.
const REPORT_ATTEMPTS: u32 = 3;

/// Base pause between report attempts, scaled linearly per attempt.
const RETRY_BACKOFF: Duration = Duration::from_millis(500);

/// Client for the DLP webserver's pattern and results endpoints.
pub struct DlpApi {
    client: reqwest::Client,
    base_url: String,
    api_key: SecretString,
}

impl DlpApi {
    pub fn new(config: &ApiConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
        }
    }

    fn auth_header(&self) -> String {
        format!("Api-Key {}", self.api_key.expose_secret())
    }
}

#[async_trait]
impl PatternSource for DlpApi {
    /// One authenticated read per scan task — no caching, so pattern edits
    /// apply to the very next message at the cost of a fetch per task.
    async fn fetch_patterns(&self) -> Vec<Pattern> {
        let url = format!("{}/api/patterns/", self.base_url);

        let response = match self
            .client
            .get(&url)
            .header("Authorization", self.auth_header())
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "Pattern fetch failed, scanning with empty set");
                return Vec::new();
            }
        };

        if response.status() != StatusCode::OK {
            warn!(
                status = %response.status(),
                "Pattern API returned non-200, scanning with empty set"
            );
            return Vec::new();
        }

        match response.json::<Vec<Pattern>>().await {
            Ok(patterns) => {
                debug!(count = patterns.len(), "Fetched pattern set");
                patterns
            }
            Err(e) => {
                warn!(error = %e, "Undecodable pattern response, scanning with empty set");
                Vec::new()
            }
        }
    }
}

#[async_trait]
impl MatchSink for DlpApi {
    /// Submit one caught-message record; success is `201 Created`.
    ///
    /// Transport errors and 5xx responses are retried up to
    /// [`REPORT_ATTEMPTS`] times; 4xx responses are permanent and logged
    /// with the response body. Exhausting retries loses the finding — that
    /// loss is logged, never raised.
    async fn report(&self, report: &MatchReport) {
        let url = format!("{}/api/caught_messages/", self.base_url);

        for attempt in 1..=REPORT_ATTEMPTS {
            match self
                .client
                .post(&url)
                .header("Authorization", self.auth_header())
                .timeout(REQUEST_TIMEOUT)
                .json(report)
                .send()
                .await
            {
                Ok(response) if response.status() == StatusCode::CREATED => {
                    debug!(
                        pattern_id = report.pattern_matched,
                        channel = %report.channel,
                        "Caught message recorded"
                    );
                    return;
                }
                Ok(response) => {
                    let status = response.status();
                    if status.is_server_error() && attempt < REPORT_ATTEMPTS {
                        warn!(%status, attempt, "Match report rejected, retrying");
                    } else {
                        let body = response.text().await.unwrap_or_default();
                        error!(
                            %status,
                            body = %body,
                            pattern_id = report.pattern_matched,
                            "Failed to record caught message"
                        );
                        return;
                    }
                }
                Err(e) if attempt < REPORT_ATTEMPTS => {
                    warn!(error = %e, attempt, "Match report failed, retrying");
                }
                Err(e) => {
                    error!(
                        error = %e,
                        pattern_id = report.pattern_matched,
                        "Match report lost after retries"
                    );
                    return;
                }
            }

            tokio::time::sleep(RETRY_BACKOFF * attempt).await;
        }
    }
}
