use super::{ISmsDispatcher, SmsMessage, SmsReceipt};
use std::sync::Mutex;

/// Keeps sent text messages in memory. Used for testing.
pub struct InMemorySmsDispatcher {
    sent: Mutex<Vec<SmsMessage>>,
    failing_recipients: Mutex<Vec<String>>,
}

impl InMemorySmsDispatcher {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            failing_recipients: Mutex::new(Vec::new()),
        }
    }

    /// Every following message to `phone` will fail. `phone` is
    /// compared with the normalised recipient number.
    pub fn fail_for(&self, phone: &str) {
        self.failing_recipients.lock().unwrap().push(phone.to_string());
    }

    pub fn sent(&self) -> Vec<SmsMessage> {
        self.sent.lock().unwrap().clone()
    }
}

impl Default for InMemorySmsDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl ISmsDispatcher for InMemorySmsDispatcher {
    async fn send(&self, sms: &SmsMessage) -> anyhow::Result<SmsReceipt> {
        if self.failing_recipients.lock().unwrap().contains(&sms.to) {
            anyhow::bail!("Unreachable phone number: {}", sms.to);
        }
        let mut sent = self.sent.lock().unwrap();
        sent.push(sms.clone());
        Ok(SmsReceipt {
            message_id: format!("SM{}", sent.len()),
        })
    }
}
