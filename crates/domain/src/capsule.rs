use crate::{
    reminder::{NotificationsSent, ReminderTimeframe},
    shared::entity::{Entity, ID},
};
use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};
use thiserror::Error;

/// Maximum number of explicit email recipients and explicit phone recipients
/// a `Capsule` can have
pub const MAX_RECIPIENTS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CapsuleStatus {
    Scheduled,
    Delivered,
    Failed,
}

impl CapsuleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::Delivered => "delivered",
            Self::Failed => "failed",
        }
    }
}

impl Default for CapsuleStatus {
    fn default() -> Self {
        Self::Scheduled
    }
}

impl Display for CapsuleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Error, Debug)]
pub enum InvalidCapsuleStatusError {
    #[error("Capsule status: {0} is not one of scheduled, delivered or failed")]
    Malformed(String),
}

impl FromStr for CapsuleStatus {
    type Err = InvalidCapsuleStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scheduled" => Ok(Self::Scheduled),
            "delivered" => Ok(Self::Delivered),
            "failed" => Ok(Self::Failed),
            _ => Err(InvalidCapsuleStatusError::Malformed(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Text,
    Photo,
    Voice,
    Video,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Photo => "photo",
            Self::Voice => "voice",
            Self::Video => "video",
        }
    }
}

impl Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Error, Debug)]
pub enum InvalidContentTypeError {
    #[error("Content type: {0} is not one of text, photo, voice or video")]
    Malformed(String),
}

impl FromStr for ContentType {
    type Err = InvalidContentTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(Self::Text),
            "photo" => Ok(Self::Photo),
            "voice" => Ok(Self::Voice),
            "video" => Ok(Self::Video),
            _ => Err(InvalidContentTypeError::Malformed(s.to_string())),
        }
    }
}

/// A `Capsule` is a piece of content that is locked until `delivery_ts`.
/// When it unlocks, the creator and every recipient is notified
/// by email and / or SMS.
#[derive(Debug, Clone, PartialEq)]
pub struct Capsule {
    pub id: ID,
    /// Public token used to build the link to the capsule
    pub unique_link: String,
    pub content_type: ContentType,
    /// Timestamp in millis at which the `Capsule` unlocks
    pub delivery_ts: i64,
    pub status: CapsuleStatus,
    pub notifications_sent: NotificationsSent,
    pub creator_email: Option<String>,
    pub creator_phone: Option<String>,
    pub recipient_emails: Vec<String>,
    pub recipient_phones: Vec<String>,
    pub has_password: bool,
    /// Set when the `Capsule` was successfully delivered
    pub delivered_ts: Option<i64>,
    /// Diagnostic of the latest failed delivery attempt
    pub failure_reason: Option<String>,
    pub created_ts: i64,
}

impl Entity for Capsule {
    fn id(&self) -> &ID {
        &self.id
    }
}

impl Capsule {
    pub fn new(content_type: ContentType, delivery_ts: i64, created_ts: i64) -> Self {
        Self {
            id: Default::default(),
            unique_link: ID::new().as_string(),
            content_type,
            delivery_ts,
            status: CapsuleStatus::Scheduled,
            notifications_sent: Default::default(),
            creator_email: None,
            creator_phone: None,
            recipient_emails: Vec::new(),
            recipient_phones: Vec::new(),
            has_password: false,
            delivered_ts: None,
            failure_reason: None,
            created_ts,
        }
    }

    /// Creator email first, followed by the explicit recipients
    pub fn email_recipients(&self) -> Vec<&str> {
        self.creator_email
            .iter()
            .chain(self.recipient_emails.iter())
            .map(|email| email.as_str())
            .filter(|email| !email.trim().is_empty())
            .collect()
    }

    /// Creator phone first, followed by the explicit recipients
    pub fn phone_recipients(&self) -> Vec<&str> {
        self.creator_phone
            .iter()
            .chain(self.recipient_phones.iter())
            .map(|phone| phone.as_str())
            .filter(|phone| !phone.trim().is_empty())
            .collect()
    }

    pub fn has_recipients(&self) -> bool {
        !self.email_recipients().is_empty() || !self.phone_recipients().is_empty()
    }

    pub fn is_due(&self, now: i64) -> bool {
        self.delivery_ts <= now
    }

    /// Due for delivery but not yet picked up by a delivery sweep
    pub fn is_overdue(&self, now: i64) -> bool {
        self.status == CapsuleStatus::Scheduled && self.delivery_ts < now
    }

    /// Whether the reminder for `timeframe` should be sent at `now`
    pub fn needs_reminder(&self, timeframe: ReminderTimeframe, now: i64) -> bool {
        self.status == CapsuleStatus::Scheduled
            && self.delivery_ts > now
            && self.delivery_ts <= now + timeframe.millis_before_delivery()
            && self.notifications_sent.is_due_for(timeframe)
    }

    pub fn mark_delivered(&mut self, delivered_ts: i64) {
        self.status = CapsuleStatus::Delivered;
        self.delivered_ts = Some(delivered_ts);
        self.failure_reason = None;
    }

    pub fn mark_failed(&mut self, reason: &str) {
        self.status = CapsuleStatus::Failed;
        self.failure_reason = Some(reason.to_string());
    }
}
