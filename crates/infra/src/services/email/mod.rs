mod inmemory;
mod resend;

pub use inmemory::InMemoryEmailDispatcher;
pub use resend::ResendEmailDispatcher;

#[derive(Debug, Clone, PartialEq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub html: String,
    pub text: String,
}

/// Sends transactional emails
#[async_trait::async_trait]
pub trait IEmailDispatcher: Send + Sync {
    async fn send(&self, email: &EmailMessage) -> anyhow::Result<()>;
}
