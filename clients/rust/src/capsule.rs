use crate::{APIResponse, BaseClient};
use capsule_scheduler_api_structs::*;
use capsule_scheduler_domain::{ContentType, ID};
use reqwest::StatusCode;
use std::sync::Arc;

#[derive(Clone)]
pub struct CapsuleClient {
    base: Arc<BaseClient>,
}

pub struct CreateCapsuleInput {
    pub content_type: ContentType,
    pub delivery_ts: i64,
    pub creator_email: Option<String>,
    pub creator_phone: Option<String>,
    pub recipient_emails: Vec<String>,
    pub recipient_phones: Vec<String>,
    pub has_password: bool,
    pub test_mode: bool,
}

impl CapsuleClient {
    pub(crate) fn new(base: Arc<BaseClient>) -> Self {
        Self { base }
    }

    pub async fn create(
        &self,
        input: CreateCapsuleInput,
    ) -> APIResponse<create_capsule::APIResponse> {
        let body = create_capsule::RequestBody {
            content_type: input.content_type,
            delivery_ts: input.delivery_ts,
            creator_email: input.creator_email,
            creator_phone: input.creator_phone,
            recipient_emails: input.recipient_emails,
            recipient_phones: input.recipient_phones,
            has_password: input.has_password,
            test_mode: input.test_mode,
        };
        self.base
            .post(body, "capsules".into(), StatusCode::CREATED)
            .await
    }

    pub async fn get(&self, capsule_id: ID) -> APIResponse<get_capsule::APIResponse> {
        self.base
            .get(format!("capsules/{}", capsule_id), StatusCode::OK)
            .await
    }
}
