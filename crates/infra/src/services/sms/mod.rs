mod inmemory;
mod twilio;

pub use inmemory::InMemorySmsDispatcher;
pub use twilio::TwilioSmsDispatcher;

#[derive(Debug, Clone, PartialEq)]
pub struct SmsMessage {
    /// Phone number in international format
    pub to: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SmsReceipt {
    /// Message identifier assigned by the provider
    pub message_id: String,
}

/// Sends text messages
#[async_trait::async_trait]
pub trait ISmsDispatcher: Send + Sync {
    async fn send(&self, sms: &SmsMessage) -> anyhow::Result<SmsReceipt>;
}
