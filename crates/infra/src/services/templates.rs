use super::{email::EmailMessage, sms::SmsMessage};
use capsule_scheduler_domain::{Capsule, ReminderTimeframe};
use chrono::{TimeZone, Utc};

const SIGNATURE: &str = "Memory Capsule Creator";

fn capsule_url(capsule: &Capsule, app_url: &str) -> String {
    format!("{}/capsule/{}", app_url, capsule.unique_link)
}

fn format_delivery_date(delivery_ts: i64) -> String {
    match Utc.timestamp_millis_opt(delivery_ts).single() {
        Some(date) => date.format("%B %-d, %Y at %H:%M UTC").to_string(),
        None => delivery_ts.to_string(),
    }
}

fn password_note(capsule: &Capsule) -> &'static str {
    if capsule.has_password {
        "This capsule is password protected. You will need the password to open it."
    } else {
        ""
    }
}

fn html_page(heading: &str, paragraphs: &[String], url: &str, button: &str) -> String {
    let body = paragraphs
        .iter()
        .filter(|p| !p.is_empty())
        .map(|p| format!("<p>{}</p>", p))
        .collect::<String>();
    format!(
        "<!DOCTYPE html><html><body><h1>{}</h1>{}<p><a href=\"{}\">{}</a></p><p>{}</p></body></html>",
        heading, body, url, button, SIGNATURE
    )
}

fn text_page(heading: &str, paragraphs: &[String], url: &str) -> String {
    let mut lines = vec![heading.to_string()];
    lines.extend(paragraphs.iter().filter(|p| !p.is_empty()).cloned());
    lines.push(url.to_string());
    lines.push(SIGNATURE.to_string());
    lines.join("\n\n")
}

/// Email sent to every email recipient when the `Capsule` unlocks
pub fn capsule_delivery_email(capsule: &Capsule, recipient: &str, app_url: &str) -> EmailMessage {
    let url = capsule_url(capsule, app_url);
    let heading = "Your Memory Capsule is Ready to Open!";
    let paragraphs = vec![
        format!(
            "The {} memory capsule sealed for {} has unlocked.",
            capsule.content_type,
            format_delivery_date(capsule.delivery_ts)
        ),
        password_note(capsule).to_string(),
    ];

    EmailMessage {
        to: recipient.to_string(),
        subject: heading.to_string(),
        html: html_page(heading, &paragraphs, &url, "Open your capsule"),
        text: text_page(heading, &paragraphs, &url),
    }
}

/// Email sent to every email recipient shortly before the `Capsule` unlocks
pub fn capsule_pre_opening_email(
    capsule: &Capsule,
    recipient: &str,
    timeframe: ReminderTimeframe,
    app_url: &str,
) -> EmailMessage {
    let url = capsule_url(capsule, app_url);
    let heading = format!("Your Time Capsule Opens {}!", timeframe.label());
    let urgency = match timeframe {
        ReminderTimeframe::OneHour => "Get ready! Your memories are being prepared to unlock.",
        ReminderTimeframe::ThirtyMinutes => "Almost time! Your memories are waiting for you.",
        ReminderTimeframe::TenMinutes => "Final countdown! Your time capsule is about to unlock!",
    };
    let paragraphs = vec![
        urgency.to_string(),
        format!(
            "Your {} memory capsule unlocks on {}.",
            capsule.content_type,
            format_delivery_date(capsule.delivery_ts)
        ),
        password_note(capsule).to_string(),
    ];

    EmailMessage {
        to: recipient.to_string(),
        subject: heading.clone(),
        html: html_page(&heading, &paragraphs, &url, "View your capsule"),
        text: text_page(&heading, &paragraphs, &url),
    }
}

/// Text message sent to every phone recipient when the `Capsule` unlocks.
/// `phone` must already be normalised.
pub fn capsule_delivery_sms(capsule: &Capsule, phone: &str, app_url: &str) -> SmsMessage {
    let body = format!(
        "Your Memory Capsule is Ready!\n\nThe moment you've been waiting for has arrived. Your memory capsule is now ready to open.\n\nOpen it here: {}\n\n{}",
        capsule_url(capsule, app_url),
        SIGNATURE
    );
    SmsMessage {
        to: phone.to_string(),
        body,
    }
}
