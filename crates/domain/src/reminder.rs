use serde::{Deserialize, Serialize};
use std::{collections::BTreeSet, fmt::Display, str::FromStr};
use thiserror::Error;

const MINUTE_MILLIS: i64 = 1000 * 60;

/// A fixed offset before the delivery of a `Capsule` at which its
/// recipients get a pre-opening reminder.
///
/// The variants are ordered from the farthest to the closest window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ReminderTimeframe {
    #[serde(rename = "1hour")]
    OneHour,
    #[serde(rename = "30min")]
    ThirtyMinutes,
    #[serde(rename = "10min")]
    TenMinutes,
}

impl ReminderTimeframe {
    /// All timeframes in the order they are expected to fire
    pub const ALL: [ReminderTimeframe; 3] = [
        ReminderTimeframe::OneHour,
        ReminderTimeframe::ThirtyMinutes,
        ReminderTimeframe::TenMinutes,
    ];

    pub fn millis_before_delivery(&self) -> i64 {
        match self {
            Self::OneHour => 60 * MINUTE_MILLIS,
            Self::ThirtyMinutes => 30 * MINUTE_MILLIS,
            Self::TenMinutes => 10 * MINUTE_MILLIS,
        }
    }

    /// The marker that has to be present before this one may be sent
    pub fn previous(&self) -> Option<ReminderTimeframe> {
        match self {
            Self::OneHour => None,
            Self::ThirtyMinutes => Some(Self::OneHour),
            Self::TenMinutes => Some(Self::ThirtyMinutes),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OneHour => "1hour",
            Self::ThirtyMinutes => "30min",
            Self::TenMinutes => "10min",
        }
    }

    /// Human readable text used in notification copy
    pub fn label(&self) -> &'static str {
        match self {
            Self::OneHour => "in 1 Hour",
            Self::ThirtyMinutes => "in 30 Minutes",
            Self::TenMinutes => "in 10 Minutes",
        }
    }
}

impl Display for ReminderTimeframe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Error, Debug)]
pub enum InvalidReminderTimeframeError {
    #[error("Reminder timeframe: {0} is not one of 1hour, 30min or 10min")]
    Malformed(String),
}

impl FromStr for ReminderTimeframe {
    type Err = InvalidReminderTimeframeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1hour" => Ok(Self::OneHour),
            "30min" => Ok(Self::ThirtyMinutes),
            "10min" => Ok(Self::TenMinutes),
            _ => Err(InvalidReminderTimeframeError::Malformed(s.to_string())),
        }
    }
}

/// The pre-opening reminders that have already been sent for a `Capsule`.
///
/// Markers are only ever appended, never removed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotificationsSent(BTreeSet<ReminderTimeframe>);

impl NotificationsSent {
    pub fn contains(&self, timeframe: ReminderTimeframe) -> bool {
        self.0.contains(&timeframe)
    }

    /// A reminder is due when it has not been sent yet and the reminder
    /// for the previous (farther) window has been sent
    pub fn is_due_for(&self, timeframe: ReminderTimeframe) -> bool {
        !self.contains(timeframe)
            && timeframe
                .previous()
                .map(|previous| self.contains(previous))
                .unwrap_or(true)
    }

    /// Returns `false` if the marker was already present
    pub fn insert(&mut self, timeframe: ReminderTimeframe) -> bool {
        self.0.insert(timeframe)
    }

    pub fn iter(&self) -> impl Iterator<Item = ReminderTimeframe> + '_ {
        self.0.iter().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn to_strings(&self) -> Vec<String> {
        self.iter().map(|t| t.as_str().to_string()).collect()
    }

    pub fn from_strings<S: AsRef<str>>(
        markers: &[S],
    ) -> Result<Self, InvalidReminderTimeframeError> {
        markers
            .iter()
            .map(|m| m.as_ref().parse::<ReminderTimeframe>())
            .collect::<Result<BTreeSet<_>, _>>()
            .map(Self)
    }
}

impl FromIterator<ReminderTimeframe> for NotificationsSent {
    fn from_iter<I: IntoIterator<Item = ReminderTimeframe>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeframes_require_previous_marker() {
        let mut sent = NotificationsSent::default();
        assert!(sent.is_due_for(ReminderTimeframe::OneHour));
        assert!(!sent.is_due_for(ReminderTimeframe::ThirtyMinutes));
        assert!(!sent.is_due_for(ReminderTimeframe::TenMinutes));

        sent.insert(ReminderTimeframe::OneHour);
        assert!(!sent.is_due_for(ReminderTimeframe::OneHour));
        assert!(sent.is_due_for(ReminderTimeframe::ThirtyMinutes));
        assert!(!sent.is_due_for(ReminderTimeframe::TenMinutes));

        sent.insert(ReminderTimeframe::ThirtyMinutes);
        assert!(sent.is_due_for(ReminderTimeframe::TenMinutes));
    }

    #[test]
    fn insert_is_idempotent() {
        let mut sent = NotificationsSent::default();
        assert!(sent.insert(ReminderTimeframe::OneHour));
        assert!(!sent.insert(ReminderTimeframe::OneHour));
        assert_eq!(sent.len(), 1);
    }

    #[test]
    fn parses_persisted_markers() {
        let sent = NotificationsSent::from_strings(&["30min", "1hour"]).unwrap();
        assert_eq!(sent.to_strings(), vec!["1hour", "30min"]);
        assert!(NotificationsSent::from_strings(&["5min"]).is_err());
    }

    #[test]
    fn serializes_markers_as_plain_strings() {
        let sent: NotificationsSent = vec![ReminderTimeframe::OneHour].into_iter().collect();
        assert_eq!(serde_json::to_string(&sent).unwrap(), r#"["1hour"]"#);
    }
}
