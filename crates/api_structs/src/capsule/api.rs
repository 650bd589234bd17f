use crate::dtos::CapsuleDTO;
use capsule_scheduler_domain::{Capsule, ContentType, ID};
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CapsuleResponse {
    pub capsule: CapsuleDTO,
}

impl CapsuleResponse {
    pub fn new(capsule: Capsule) -> Self {
        Self {
            capsule: CapsuleDTO::new(capsule),
        }
    }
}

pub mod create_capsule {
    use super::*;

    #[derive(Serialize, Deserialize, Debug)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub content_type: ContentType,
        pub delivery_ts: i64,
        #[serde(default)]
        pub creator_email: Option<String>,
        #[serde(default)]
        pub creator_phone: Option<String>,
        #[serde(default)]
        pub recipient_emails: Vec<String>,
        #[serde(default)]
        pub recipient_phones: Vec<String>,
        #[serde(default)]
        pub has_password: bool,
        /// Skips the minimum delivery lead time
        #[serde(default)]
        pub test_mode: bool,
    }

    pub type APIResponse = CapsuleResponse;
}

pub mod get_capsule {
    use super::*;

    #[derive(Serialize, Deserialize, Debug)]
    pub struct PathParams {
        pub capsule_id: ID,
    }

    pub type APIResponse = CapsuleResponse;
}
