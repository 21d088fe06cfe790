//! Mail record types consumed by the threading engine.

pub mod message;
pub mod timestamp;

pub use message::{
    Attachment, EmailAddress, FollowupFlag, ItemBody, MailMessage, MessageRole, Recipient,
    normalize_address,
};
pub use timestamp::parse_timestamp;
