//! SendGrid notifier - delivers email through SendGrid's v3 mail send API.

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use std::time::Duration;

use crate::ports::{DeliveryStatus, EmailMessage, NotificationError, NotificationProvider};

/// SendGrid configuration.
#[derive(Clone)]
pub struct SendGridConfig {
    api_key: SecretString,
    from_email: String,
    from_name: String,
    base_url: String,
    timeout: Duration,
}

impl SendGridConfig {
    pub fn new(
        api_key: impl Into<String>,
        from_email: impl Into<String>,
        from_name: impl Into<String>,
    ) -> Self {
        Self {
            api_key: SecretString::new(api_key.into()),
            from_email: from_email.into(),
            from_name: from_name.into(),
            base_url: "https://api.sendgrid.com".to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Notification provider backed by SendGrid.
pub struct SendGridNotifier {
    config: SendGridConfig,
    client: Client,
}

impl SendGridNotifier {
    pub fn new(config: SendGridConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self { config, client }
    }

    fn payload<'a>(&'a self, message: &'a EmailMessage) -> MailSendRequest<'a> {
        MailSendRequest {
            personalizations: vec![Personalization {
                to: vec![Address {
                    email: &message.to,
                    name: None,
                }],
            }],
            from: Address {
                email: &self.config.from_email,
                name: Some(&self.config.from_name),
            },
            subject: &message.subject,
            content: vec![Content {
                content_type: "text/html",
                value: &message.html_body,
            }],
        }
    }
}

/// Minimal shape check; SendGrid performs full validation.
fn is_plausible_address(address: &str) -> bool {
    match address.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !address.contains(' '),
        None => false,
    }
}

#[async_trait]
impl NotificationProvider for SendGridNotifier {
    async fn send(&self, message: EmailMessage) -> Result<DeliveryStatus, NotificationError> {
        if !is_plausible_address(&message.to) {
            return Err(NotificationError::InvalidRecipient(message.to));
        }

        let response = self
            .client
            .post(format!("{}/v3/mail/send", self.config.base_url))
            .bearer_auth(self.config.api_key.expose_secret())
            .json(&self.payload(&message))
            .send()
            .await
            .map_err(|e| NotificationError::Remote(e.to_string()))?;

        let status = DeliveryStatus::from_status(response.status().as_u16());
        if !status.accepted {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status_code = status.status_code, body = %body, "SendGrid rejected message");
        }
        Ok(status)
    }
}

#[derive(Debug, Serialize)]
struct MailSendRequest<'a> {
    personalizations: Vec<Personalization<'a>>,
    from: Address<'a>,
    subject: &'a str,
    content: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Personalization<'a> {
    to: Vec<Address<'a>>,
}

#[derive(Debug, Serialize)]
struct Address<'a> {
    email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(rename = "type")]
    content_type: &'a str,
    value: &'a str,
}
