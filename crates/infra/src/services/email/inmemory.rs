use super::{EmailMessage, IEmailDispatcher};
use std::sync::Mutex;

/// Keeps sent emails in memory. Used for testing.
pub struct InMemoryEmailDispatcher {
    sent: Mutex<Vec<EmailMessage>>,
    failing_recipients: Mutex<Vec<String>>,
}

impl InMemoryEmailDispatcher {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            failing_recipients: Mutex::new(Vec::new()),
        }
    }

    /// Every following email to `recipient` will fail
    pub fn fail_for(&self, recipient: &str) {
        self.failing_recipients
            .lock()
            .unwrap()
            .push(recipient.to_string());
    }

    pub fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_to(&self, recipient: &str) -> Vec<EmailMessage> {
        self.sent()
            .into_iter()
            .filter(|email| email.to == recipient)
            .collect()
    }
}

impl Default for InMemoryEmailDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl IEmailDispatcher for InMemoryEmailDispatcher {
    async fn send(&self, email: &EmailMessage) -> anyhow::Result<()> {
        if self.failing_recipients.lock().unwrap().contains(&email.to) {
            anyhow::bail!("Mailbox unavailable: {}", email.to);
        }
        self.sent.lock().unwrap().push(email.clone());
        Ok(())
    }
}
