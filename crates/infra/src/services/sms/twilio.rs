use super::{ISmsDispatcher, SmsMessage, SmsReceipt};
use crate::config::SmsSettings;
use crate::services::{http_client, DISPATCH_TIMEOUT};
use reqwest::Client;
use std::time::Duration;
use serde::Deserialize;
use tracing::{error, info};

const TWILIO_API_URL: &str = "https://api.twilio.com/2010-04-01";

#[derive(Debug, Deserialize)]
struct TwilioMessageResponse {
    sid: String,
}

#[derive(Debug, Deserialize)]
struct TwilioErrorResponse {
    message: String,
}

/// Sends text messages through the Twilio HTTP API
pub struct TwilioSmsDispatcher {
    client: Client,
    settings: Option<SmsSettings>,
    api_url: String,
}

impl TwilioSmsDispatcher {
    pub fn new(settings: Option<SmsSettings>) -> Self {
        Self::with_endpoint(settings, TWILIO_API_URL, DISPATCH_TIMEOUT)
    }

    fn with_endpoint(settings: Option<SmsSettings>, api_url: &str, timeout: Duration) -> Self {
        Self {
            client: http_client(timeout),
            settings,
            api_url: api_url.to_string(),
        }
    }
}

#[async_trait::async_trait]
impl ISmsDispatcher for TwilioSmsDispatcher {
    async fn send(&self, sms: &SmsMessage) -> anyhow::Result<SmsReceipt> {
        let settings = self
            .settings
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("SMS service not configured"))?;

        let url = format!(
            "{}/Accounts/{}/Messages.json",
            self.api_url, settings.account_sid
        );
        let res = self
            .client
            .post(&url)
            .basic_auth(&settings.account_sid, Some(&settings.auth_token))
            .form(&[
                ("To", sms.to.as_str()),
                ("From", settings.from.as_str()),
                ("Body", sms.body.as_str()),
            ])
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let reason = res
                .json::<TwilioErrorResponse>()
                .await
                .map(|e| e.message)
                .unwrap_or_else(|_| status.to_string());
            error!("Twilio rejected SMS to: {}. Reason: {}", sms.to, reason);
            anyhow::bail!(reason);
        }

        let message = res.json::<TwilioMessageResponse>().await?;
        info!("SMS sent to: {} with id: {}", sms.to, message.sid);
        Ok(SmsReceipt {
            message_id: message.sid,
        })
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
        let api_url = format!("http://{}", listener.local_addr().unwrap());
        let settings = SmsSettings {
            account_sid: "AC123".into(),
            auth_token: "token".into(),
            from: "+15550000000".into(),
        };
        let dispatcher =
            TwilioSmsDispatcher::with_endpoint(Some(settings), &api_url, Duration::from_millis(200));
        let sms = SmsMessage {
            to: "+15551234567".into(),
            body: "body".into(),
        };

        let res = tokio::time::timeout(Duration::from_secs(5), dispatcher.send(&sms))
            .await
            .expect("Expected the dispatcher to give up on its own");
        assert!(res.is_err());
        drop(listener);
    }
}
