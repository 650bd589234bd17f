use crate::{
    error::CapsuleError,
    shared::{
        auth::protect_scheduler_route,
        usecase::{execute, UseCase},
    },
};
use actix_web::{web, HttpRequest, HttpResponse};
use capsule_scheduler_api_structs::create_capsule::*;
use capsule_scheduler_domain::{format_phone_number, Capsule, ContentType, MAX_RECIPIENTS};
use capsule_scheduler_infra::CapsuleContext;
use chrono::{Months, TimeZone, Utc};
use tracing::info;

const MAX_DELIVERY_YEARS: u32 = 20;
const MIN_DELIVERY_MONTHS: u32 = 1;

fn handle_error(e: UseCaseError) -> CapsuleError {
    match e {
        UseCaseError::DeliveryTooLate => CapsuleError::BadClientData(format!(
            "The delivery date can be at most {} years in the future",
            MAX_DELIVERY_YEARS
        )),
        UseCaseError::DeliveryTooSoon => CapsuleError::BadClientData(format!(
            "The delivery date must be at least {} month in the future",
            MIN_DELIVERY_MONTHS
        )),
        UseCaseError::TooManyRecipientEmails => CapsuleError::BadClientData(format!(
            "At most {} recipient emails are allowed",
            MAX_RECIPIENTS
        )),
        UseCaseError::TooManyRecipientPhones => CapsuleError::BadClientData(format!(
            "At most {} recipient phone numbers are allowed",
            MAX_RECIPIENTS
        )),
        UseCaseError::InvalidEmail(email) => {
            CapsuleError::BadClientData(format!("Invalid email address: {}", email))
        }
        UseCaseError::InvalidPhone(phone) => {
            CapsuleError::BadClientData(format!("Invalid phone number format: {}", phone))
        }
        UseCaseError::NoRecipients => CapsuleError::BadClientData(
            "At least one recipient email or phone number is required".into(),
        ),
        UseCaseError::StorageError => CapsuleError::InternalError,
    }
}

pub async fn create_capsule_controller(
    http_req: HttpRequest,
    body: web::Json<RequestBody>,
    ctx: web::Data<CapsuleContext>,
) -> Result<HttpResponse, CapsuleError> {
    protect_scheduler_route(&http_req, &ctx)?;

    let body = body.0;
    let usecase = ScheduleCapsuleDeliveryUseCase {
        content_type: body.content_type,
        delivery_ts: body.delivery_ts,
        creator_email: body.creator_email,
        creator_phone: body.creator_phone,
        recipient_emails: body.recipient_emails,
        recipient_phones: body.recipient_phones,
        has_password: body.has_password,
        test_mode: body.test_mode,
    };

    execute(usecase, &ctx)
        .await
        .map(|capsule| HttpResponse::Created().json(APIResponse::new(capsule)))
        .map_err(handle_error)
}

/// Registers a newly created `Capsule` for delivery
#[derive(Debug)]
pub struct ScheduleCapsuleDeliveryUseCase {
    pub content_type: ContentType,
    pub delivery_ts: i64,
    pub creator_email: Option<String>,
    pub creator_phone: Option<String>,
    pub recipient_emails: Vec<String>,
    pub recipient_phones: Vec<String>,
    pub has_password: bool,
    /// Allows delivery dates closer than the minimum lead time
    pub test_mode: bool,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    DeliveryTooLate,
    DeliveryTooSoon,
    TooManyRecipientEmails,
    TooManyRecipientPhones,
    InvalidEmail(String),
    InvalidPhone(String),
    NoRecipients,
    StorageError,
}

fn non_blank(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn validate_email(email: &str) -> Result<String, UseCaseError> {
    if email.contains('@') {
        Ok(email.to_string())
    } else {
        Err(UseCaseError::InvalidEmail(email.to_string()))
    }
}

fn validate_phone(phone: &str) -> Result<String, UseCaseError> {
    format_phone_number(phone).ok_or_else(|| UseCaseError::InvalidPhone(phone.to_string()))
}

/// Same day of the month, `months` calendar months after `ts`
fn add_months(ts: i64, months: u32) -> Option<i64> {
    Utc.timestamp_millis_opt(ts)
        .single()
        .and_then(|date| date.checked_add_months(Months::new(months)))
        .map(|date| date.timestamp_millis())
}

impl ScheduleCapsuleDeliveryUseCase {
    fn validate_delivery_ts(&self, now: i64) -> Result<(), UseCaseError> {
        let latest = add_months(now, MAX_DELIVERY_YEARS * 12).unwrap_or(i64::MAX);
        if self.delivery_ts > latest {
            return Err(UseCaseError::DeliveryTooLate);
        }

        let earliest = add_months(now, MIN_DELIVERY_MONTHS).unwrap_or(i64::MAX);
        if !self.test_mode && self.delivery_ts < earliest {
            return Err(UseCaseError::DeliveryTooSoon);
        }
        Ok(())
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for ScheduleCapsuleDeliveryUseCase {
    type Response = Capsule;

    type Error = UseCaseError;

    const NAME: &'static str = "ScheduleCapsuleDelivery";

    async fn execute(&mut self, ctx: &CapsuleContext) -> Result<Self::Response, Self::Error> {
        let now = ctx.sys.get_timestamp_millis();
        self.validate_delivery_ts(now)?;

        let recipient_emails = self
            .recipient_emails
            .iter()
            .filter_map(|email| non_blank(email))
            .collect::<Vec<_>>();
        if recipient_emails.len() > MAX_RECIPIENTS {
            return Err(UseCaseError::TooManyRecipientEmails);
        }
        let recipient_phones = self
            .recipient_phones
            .iter()
            .filter_map(|phone| non_blank(phone))
            .collect::<Vec<_>>();
        if recipient_phones.len() > MAX_RECIPIENTS {
            return Err(UseCaseError::TooManyRecipientPhones);
        }

        let mut capsule = Capsule::new(self.content_type, self.delivery_ts, now);
        capsule.has_password = self.has_password;
        capsule.creator_email = self
            .creator_email
            .as_deref()
            .and_then(non_blank)
            .map(|email| validate_email(&email))
            .transpose()?;
        capsule.creator_phone = self
            .creator_phone
            .as_deref()
            .and_then(non_blank)
            .map(|phone| validate_phone(&phone))
            .transpose()?;
        capsule.recipient_emails = recipient_emails
            .iter()
            .map(|email| validate_email(email))
            .collect::<Result<_, _>>()?;
        capsule.recipient_phones = recipient_phones
            .iter()
            .map(|phone| validate_phone(phone))
            .collect::<Result<_, _>>()?;

        if !capsule.has_recipients() {
            return Err(UseCaseError::NoRecipients);
        }

        ctx.repos
            .capsules
            .insert(&capsule)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        info!(
            "Capsule {} scheduled for delivery at {}",
            capsule.id, capsule.delivery_ts
        );
        Ok(capsule)
    }
}
