mod email;
mod sms;
pub mod templates;

pub use email::{EmailMessage, IEmailDispatcher, InMemoryEmailDispatcher, ResendEmailDispatcher};
pub use sms::{ISmsDispatcher, InMemorySmsDispatcher, SmsMessage, SmsReceipt, TwilioSmsDispatcher};

use crate::config::Config;
use std::{sync::Arc, time::Duration};
use tracing::warn;

/// Upper bound for a single request to an email or SMS provider
pub const DISPATCH_TIMEOUT: Duration = Duration::from_secs(10);

pub(crate) fn http_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|e| {
            warn!("Unable to build http client with timeout: {:?}", e);
            reqwest::Client::new()
        })
}

/// The notification channels used to reach capsule recipients
#[derive(Clone)]
pub struct Dispatchers {
    pub email: Arc<dyn IEmailDispatcher>,
    pub sms: Arc<dyn ISmsDispatcher>,
}

impl Dispatchers {
    pub fn create(config: &Config) -> Self {
        Self {
            email: Arc::new(ResendEmailDispatcher::new(config.email.clone())),
            sms: Arc::new(TwilioSmsDispatcher::new(config.sms.clone())),
        }
    }

    pub fn create_inmemory() -> Self {
        Self {
            email: Arc::new(InMemoryEmailDispatcher::new()),
            sms: Arc::new(InMemorySmsDispatcher::new()),
        }
    }
}
