use capsule_scheduler_domain::{Capsule, CapsuleStatus, ContentType, ReminderTimeframe, ID};
use serde::{Deserialize, Serialize};

/// The scheduler's view of a `Capsule`
#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CapsuleDTO {
    pub id: ID,
    pub unique_link: String,
    pub content_type: ContentType,
    pub delivery_ts: i64,
    pub status: CapsuleStatus,
    pub notifications_sent: Vec<ReminderTimeframe>,
    pub recipient_email_count: usize,
    pub recipient_phone_count: usize,
    pub has_password: bool,
    pub delivered_ts: Option<i64>,
    pub failure_reason: Option<String>,
    pub created_ts: i64,
}

impl CapsuleDTO {
    pub fn new(capsule: Capsule) -> Self {
        Self {
            recipient_email_count: capsule.email_recipients().len(),
            recipient_phone_count: capsule.phone_recipients().len(),
            notifications_sent: capsule.notifications_sent.iter().collect(),
            id: capsule.id,
            unique_link: capsule.unique_link,
            content_type: capsule.content_type,
            delivery_ts: capsule.delivery_ts,
            status: capsule.status,
            has_password: capsule.has_password,
            delivered_ts: capsule.delivered_ts,
            failure_reason: capsule.failure_reason,
            created_ts: capsule.created_ts,
        }
    }
}
