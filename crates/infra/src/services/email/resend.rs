use super::{EmailMessage, IEmailDispatcher};
use crate::config::EmailSettings;
use crate::services::{http_client, DISPATCH_TIMEOUT};
use reqwest::Client;
use std::time::Duration;
use serde::Serialize;
use tracing::{error, info};

const RESEND_API_URL: &str = "https://api.resend.com/emails";

#[derive(Debug, Serialize)]
struct ResendEmailRequest<'a> {
    from: &'a str,
    to: Vec<&'a str>,
    subject: &'a str,
    html: &'a str,
    text: &'a str,
}

/// Sends emails through the Resend HTTP API
pub struct ResendEmailDispatcher {
    client: Client,
    settings: Option<EmailSettings>,
    api_url: String,
}

impl ResendEmailDispatcher {
    pub fn new(settings: Option<EmailSettings>) -> Self {
        Self::with_endpoint(settings, RESEND_API_URL, DISPATCH_TIMEOUT)
    }

    fn with_endpoint(settings: Option<EmailSettings>, api_url: &str, timeout: Duration) -> Self {
        Self {
            client: http_client(timeout),
            settings,
            api_url: api_url.to_string(),
        }
    }
}

#[async_trait::async_trait]
impl IEmailDispatcher for ResendEmailDispatcher {
    async fn send(&self, email: &EmailMessage) -> anyhow::Result<()> {
        let settings = self
            .settings
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("Email service not configured"))?;

        let body = ResendEmailRequest {
            from: &settings.from,
            to: vec![&email.to],
            subject: &email.subject,
            html: &email.html,
            text: &email.text,
        };
        let res = self
            .client
            .post(&self.api_url)
            .bearer_auth(&settings.api_key)
            .json(&body)
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let reason = res.text().await.unwrap_or_default();
            error!(
                "Resend rejected email to: {}. Status: {}, response: {}",
                email.to, status, reason
            );
            anyhow::bail!("Email provider responded with status {}", status);
        }

        let sent: serde_json::Value = res.json().await.unwrap_or_default();
        info!(
            "Email: {:?} sent to: {} with id: {}",
            email.subject, email.to, sent["id"]
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;

    #[tokio::test]
    async fn unresponsive_provider_times_out() {
        // Accepts connections but never answers
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let api_url = format!("http://{}/emails", listener.local_addr().unwrap());
        let settings = EmailSettings {
            api_key: "key".into(),
            from: "capsules@example.com".into(),
        };
        let dispatcher = ResendEmailDispatcher::with_endpoint(
            Some(settings),
            &api_url,
            Duration::from_millis(200),
        );
        let email = EmailMessage {
            to: "alice@example.com".into(),
            subject: "subject".into(),
            html: "<p>html</p>".into(),
            text: "text".into(),
        };

        let res = tokio::time::timeout(Duration::from_secs(5), dispatcher.send(&email))
            .await
            .expect("Expected the dispatcher to give up on its own");
        assert!(res.is_err());
        drop(listener);
    }

    #[tokio::test]
    async fn unconfigured_dispatcher_fails() {
        let dispatcher = ResendEmailDispatcher::new(None);
        let email = EmailMessage {
            to: "alice@example.com".into(),
            subject: "subject".into(),
            html: String::new(),
            text: String::new(),
        };
        let err = dispatcher.send(&email).await.unwrap_err();
        assert_eq!(err.to_string(), "Email service not configured");
    }
}
