use std::time::Duration;

use async_trait::async_trait;

use crate::config::MailConfig;
use crate::user::errors::MailError;
use crate::user::ports::Mailer;

/// Mailgun HTTP API adapter for the Mailer port.
pub struct MailgunMailer {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    from: String,
}

impl MailgunMailer {
    pub fn new(config: &MailConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            endpoint: format!(
                "{}/{}/messages",
                config.base_url.trim_end_matches('/'),
                config.domain
            ),
            api_key: config.api_key.clone(),
            from: format!("Stores API <{}>", config.from_email),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Mailer for MailgunMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), MailError> {
        let response = self
            .client
            .post(&self.endpoint)
            .basic_auth("api", Some(&self.api_key))
            .form(&[
                ("from", self.from.as_str()),
                ("to", to),
                ("subject", subject),
                ("text", body),
            ])
            .send()
            .await
            .map_err(|e| MailError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MailError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        tracing::debug!(to = %to, status = status.as_u16(), "Mailgun accepted message");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(base_url: &str) -> MailConfig {
        MailConfig {
            base_url: base_url.to_string(),
            domain: "mg.example.com".to_string(),
            api_key: "key".to_string(),
            from_email: "noreply@example.com".to_string(),
            timeout_secs: 1,
        }
    }

    #[test]
    fn test_endpoint_joins_domain() {
        let mailer = MailgunMailer::new(&config("https://api.mailgun.net/v3/"));
        assert_eq!(
            mailer.endpoint(),
            "https://api.mailgun.net/v3/mg.example.com/messages"
        );
    }

    #[tokio::test]
    async fn test_unreachable_provider_is_transport_error() {
        // Port 9 (discard) is closed on test hosts.
        let mailer = MailgunMailer::new(&config("http://127.0.0.1:9"));

        let result = mailer.send("alice@example.com", "Hi", "Hello").await;
        assert!(matches!(result, Err(MailError::Transport(_))));
    }
}
