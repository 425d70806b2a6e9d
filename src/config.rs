//! Configuration types — environment-only, no file or CLI surface.

use secrecy::SecretString;

use crate::error::ConfigError;

/// Broker connection settings.
#[derive(Debug, Clone)]
pub struct QueueConfig {
    /// Broker hostname.
    pub host: String,
    /// AMQP port.
    pub port: u16,
    pub username: String,
    pub password: SecretString,
    /// Durable queue the ingestion endpoint publishes scan tasks to.
    pub queue_name: String,
}

/// Pattern/results API settings.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL of the pattern-management and match-persistence API.
    pub base_url: String,
    /// Access key sent as `Authorization: Api-Key <key>`.
    pub api_key: SecretString,
}

/// Full worker configuration.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    pub queue: QueueConfig,
    pub api: ApiConfig,
    /// Bearer token for downloading private chat attachments.
    pub bot_token: SecretString,
}

impl WorkerConfig {
    /// Read configuration from the environment.
    ///
    /// Queue host, port, and queue name have deployment defaults; broker
    /// credentials, the API endpoint/key, and the attachment token are
    /// required and fail startup when absent.
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = std::env::var("RABBITMQ_HOST").unwrap_or_else(|_| "rabbitmq".to_string());

        let port: u16 = match std::env::var("RABBITMQ_PORT") {
            Err(_) => 5672,
            Ok(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
                key: "RABBITMQ_PORT".into(),
                message: format!("not a valid port number: {raw}"),
            })?,
        };

        let queue_name =
            std::env::var("DLP_QUEUE_NAME").unwrap_or_else(|_| "slack_messages".to_string());

        let base_url = require_env("WEBSERVER_BASE_URL")?;

        Ok(Self {
            queue: QueueConfig {
                host,
                port,
                username: require_env("RABBITMQ_USER")?,
                password: SecretString::from(require_env("RABBITMQ_PASSWORD")?),
                queue_name,
            },
            api: ApiConfig {
                // A trailing slash would double up when joining paths.
                base_url: base_url.trim_end_matches('/').to_string(),
                api_key: SecretString::from(require_env("WEBSERVER_API_KEY")?),
            },
            bot_token: SecretString::from(require_env("SLACK_BOT_TOKEN")?),
        })
    }
}

fn require_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_required_var_is_reported_by_name() {
        // SAFETY: test runs single-threaded over this var; nothing else
        // reads WEBSERVER_BASE_URL concurrently.
        unsafe { std::env::remove_var("WEBSERVER_BASE_URL") };
        let err = require_env("WEBSERVER_BASE_URL").unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(ref k) if k == "WEBSERVER_BASE_URL"));
    }
}
