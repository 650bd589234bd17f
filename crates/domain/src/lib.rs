mod capsule;
mod phone;
mod reminder;
mod shared;
mod sweep;

pub use capsule::{
    Capsule, CapsuleStatus, ContentType, InvalidCapsuleStatusError, InvalidContentTypeError,
    MAX_RECIPIENTS,
};
pub use phone::format_phone_number;
pub use reminder::{InvalidReminderTimeframeError, NotificationsSent, ReminderTimeframe};
pub use shared::entity::{Entity, InvalidIDError, ID};
pub use sweep::{
    DeliveryStats, DeliverySweepReport, FailedReminder, ReminderSweepReport, SweepReport,
};
