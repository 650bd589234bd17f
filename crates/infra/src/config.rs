use capsule_scheduler_utils::create_random_secret;
use std::str::FromStr;
use tracing::{info, warn};

/// Credentials for the transactional email provider
#[derive(Debug, Clone)]
pub struct EmailSettings {
    pub api_key: String,
    /// Sender address, e.g. "Memory Capsule <noreply@memorycapsule.app>"
    pub from: String,
}

/// Credentials for the SMS provider
#[derive(Debug, Clone)]
pub struct SmsSettings {
    pub account_sid: String,
    pub auth_token: String,
    /// The provider phone number that messages are sent from
    pub from: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Secret code that clients must provide to trigger sweeps and
    /// register `Capsule`s
    pub scheduler_secret_code: String,
    /// Port for the application to run on
    pub port: usize,
    /// Base url of the public web application. Used to build capsule links
    /// in notifications.
    pub app_url: String,
    /// Maximum number of `Capsule`s handled by one delivery sweep
    pub delivery_batch_limit: usize,
    /// Maximum number of `Capsule`s handled by one retry sweep.
    /// Retries are less time sensitive so this is kept lower.
    pub retry_batch_limit: usize,
    /// Maximum number of `Capsule`s handled per reminder timeframe
    /// in one reminder sweep
    pub reminder_batch_limit: usize,
    /// When set, the sweeps are also triggered in process with this
    /// interval in seconds
    pub sweep_interval_secs: Option<u64>,
    pub email: Option<EmailSettings>,
    pub sms: Option<SmsSettings>,
}

impl Config {
    pub fn new() -> Self {
        let scheduler_secret_code = match std::env::var("SCHEDULER_SECRET_CODE") {
            Ok(code) => code,
            Err(_) => {
                info!("Did not find SCHEDULER_SECRET_CODE environment variable. Going to create one.");
                let code = create_random_secret(16);
                info!(
                    "Secret code for triggering the scheduler was generated and set to: {}",
                    code
                );
                code
            }
        };
        let app_url = std::env::var("APP_URL")
            .unwrap_or_else(|_| "https://memorycapsule.app".into())
            .trim_end_matches('/')
            .to_string();

        let sweep_interval_secs = match std::env::var("SWEEP_INTERVAL_SECS") {
            Ok(interval) => match interval.parse::<u64>() {
                Ok(secs) if secs > 0 => Some(secs),
                _ => {
                    warn!(
                        "The given SWEEP_INTERVAL_SECS: {} is not valid, in process sweeps are disabled.",
                        interval
                    );
                    None
                }
            },
            Err(_) => None,
        };

        Self {
            scheduler_secret_code,
            port: parse_env_or("PORT", 5000),
            app_url,
            delivery_batch_limit: parse_env_or("DELIVERY_BATCH_LIMIT", 100),
            retry_batch_limit: parse_env_or("RETRY_BATCH_LIMIT", 50),
            reminder_batch_limit: parse_env_or("REMINDER_BATCH_LIMIT", 50),
            sweep_interval_secs,
            email: email_settings(),
            sms: sms_settings(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_env_or<T: FromStr + std::fmt::Display + Copy>(name: &str, default: T) -> T {
    match std::env::var(name) {
        Ok(value) => match value.parse::<T>() {
            Ok(value) => value,
            Err(_) => {
                warn!(
                    "The given {}: {} is not valid, falling back to the default value: {}.",
                    name, value, default
                );
                default
            }
        },
        Err(_) => default,
    }
}

fn email_settings() -> Option<EmailSettings> {
    match (
        std::env::var("RESEND_API_KEY"),
        std::env::var("RESEND_FROM_EMAIL"),
    ) {
        (Ok(api_key), Ok(from)) => Some(EmailSettings { api_key, from }),
        _ => {
            warn!("RESEND_API_KEY and RESEND_FROM_EMAIL are not both set. Emails will not be sent.");
            None
        }
    }
}

fn sms_settings() -> Option<SmsSettings> {
    match (
        std::env::var("TWILIO_ACCOUNT_SID"),
        std::env::var("TWILIO_AUTH_TOKEN"),
        std::env::var("TWILIO_PHONE_NUMBER"),
    ) {
        (Ok(account_sid), Ok(auth_token), Ok(from)) => Some(SmsSettings {
            account_sid,
            auth_token,
            from,
        }),
        _ => {
            warn!("TWILIO_ACCOUNT_SID, TWILIO_AUTH_TOKEN and TWILIO_PHONE_NUMBER are not all set. SMS will not be sent.");
            None
        }
    }
}
