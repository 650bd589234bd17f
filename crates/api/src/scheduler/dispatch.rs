use capsule_scheduler_domain::{format_phone_number, Capsule, ReminderTimeframe};
use capsule_scheduler_infra::{templates, CapsuleContext};
use thiserror::Error;
use tracing::{info, warn};

/// Why a `Capsule` could not be delivered, or why a reminder could not be sent.
/// The message is stored as the failure reason of the `Capsule`.
#[derive(Error, Debug, PartialEq)]
pub enum DispatchError {
    #[error("No recipient email or phone number available")]
    NoRecipients,
    #[error("No recipient email available")]
    NoEmailRecipients,
    #[error("Failed to deliver to any recipients: {}", .0.join(", "))]
    AllRecipientsFailed(Vec<String>),
    #[error("Failed to send the {} reminder to any recipients: {}", .0, .1.join(", "))]
    AllRemindersFailed(ReminderTimeframe, Vec<String>),
}

/// Notifies every email and phone recipient that the `Capsule` has unlocked.
///
/// Recipients are handled one by one and a failing recipient never stops the others.
/// Succeeds with the number of notified recipients when at least one
/// notification went through.
pub async fn deliver_capsule(
    capsule: &Capsule,
    ctx: &CapsuleContext,
) -> Result<usize, DispatchError> {
    let emails = capsule.email_recipients();
    let phones = capsule.phone_recipients();
    if emails.is_empty() && phones.is_empty() {
        return Err(DispatchError::NoRecipients);
    }

    let mut notified = 0;
    let mut errors = Vec::new();

    for email in emails {
        let message = templates::capsule_delivery_email(capsule, email, &ctx.config.app_url);
        match ctx.dispatchers.email.send(&message).await {
            Ok(()) => notified += 1,
            Err(e) => {
                warn!("Capsule {} email to {} failed: {:?}", capsule.id, email, e);
                errors.push(format!("Email to {}: {}", email, e));
            }
        }
    }

    for phone in phones {
        let to = match format_phone_number(phone) {
            Some(to) => to,
            None => {
                warn!("Capsule {} has an invalid phone number: {}", capsule.id, phone);
                errors.push(format!("SMS to {}: Invalid phone number format", phone));
                continue;
            }
        };
        let message = templates::capsule_delivery_sms(capsule, &to, &ctx.config.app_url);
        match ctx.dispatchers.sms.send(&message).await {
            Ok(receipt) => {
                info!(
                    "Capsule {} SMS sent to {} with message id {}",
                    capsule.id, to, receipt.message_id
                );
                notified += 1;
            }
            Err(e) => {
                warn!("Capsule {} SMS to {} failed: {:?}", capsule.id, to, e);
                errors.push(format!("SMS to {}: {}", to, e));
            }
        }
    }

    if notified == 0 {
        return Err(DispatchError::AllRecipientsFailed(errors));
    }
    if !errors.is_empty() {
        warn!(
            "Capsule {} was only delivered to {} recipient(s): {}",
            capsule.id,
            notified,
            errors.join(", ")
        );
    }

    Ok(notified)
}

/// Emails every email recipient that the `Capsule` unlocks within `timeframe`.
/// Reminders are never sent by SMS.
pub async fn send_pre_opening_notification(
    capsule: &Capsule,
    timeframe: ReminderTimeframe,
    ctx: &CapsuleContext,
) -> Result<usize, DispatchError> {
    let emails = capsule.email_recipients();
    if emails.is_empty() {
        return Err(DispatchError::NoEmailRecipients);
    }

    let mut notified = 0;
    let mut errors = Vec::new();

    for email in emails {
        let message =
            templates::capsule_pre_opening_email(capsule, email, timeframe, &ctx.config.app_url);
        match ctx.dispatchers.email.send(&message).await {
            Ok(()) => notified += 1,
            Err(e) => {
                warn!(
                    "Capsule {} {} reminder to {} failed: {:?}",
                    capsule.id, timeframe, email, e
                );
                errors.push(format!("Email to {}: {}", email, e));
            }
        }
    }

    if notified == 0 {
        return Err(DispatchError::AllRemindersFailed(timeframe, errors));
    }
    if !errors.is_empty() {
        warn!(
            "Capsule {} {} reminder only reached {} recipient(s): {}",
            capsule.id,
            timeframe,
            notified,
            errors.join(", ")
        );
    }

    Ok(notified)
}
