//! Content extraction — turns chat attachments into scannable text.
//!
//! Downloads the binary via the platform's bearer-authenticated private
//! URL, then dispatches on the platform file type. Only PDF is handled
//! today; adding a type means adding one match arm here.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, warn};

use crate::pipeline::types::{ContentExtractor, FileRef};

/// Per-download timeout so one slow file host cannot stall the consumer.
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(30);

/// Downloads attachments and extracts their text.
pub struct FileProcessor {
    client: reqwest::Client,
    bot_token: SecretString,
}

impl FileProcessor {
    pub fn new(bot_token: SecretString) -> Self {
        Self {
            client: reqwest::Client::new(),
            bot_token,
        }
    }

    async fn download(&self, url: &str) -> Option<Vec<u8>> {
        let response = match self
            .client
            .get(url)
            .header(
                "Authorization",
                format!("Bearer {}", self.bot_token.expose_secret()),
            )
            .timeout(DOWNLOAD_TIMEOUT)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "File download failed");
                return None;
            }
        };

        if response.status() != StatusCode::OK {
            warn!(status = %response.status(), "File download returned non-200");
            return None;
        }

        match response.bytes().await {
            Ok(bytes) => Some(bytes.to_vec()),
            Err(e) => {
                warn!(error = %e, "Failed to read file body");
                None
            }
        }
    }
}

#[async_trait]
impl ContentExtractor for FileProcessor {
    async fn process_file(&self, file: &FileRef) -> Option<String> {
        let content = self.download(&file.url_private).await?;

        match file.filetype.as_str() {
            "pdf" => {
                let text = extract_pdf_text(&content)?;
                debug!(
                    file_id = %file.id,
                    chars = text.len(),
                    "Extracted attachment text"
                );
                Some(text)
            }
            other => {
                warn!(file_id = %file.id, filetype = %other, "Unsupported file type, skipping");
                None
            }
        }
    }
}

/// Extract embedded plain text from a PDF. A corrupt document yields
/// `None`, never a panic.
fn extract_pdf_text(content: &[u8]) -> Option<String> {
    match pdf_extract::extract_text_from_mem(content) {
        Ok(text) => Some(text),
        Err(e) => {
            warn!(error = %e, "PDF text extraction failed");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corrupt_pdf_yields_none() {
        assert!(extract_pdf_text(b"definitely not a pdf").is_none());
    }
}
