//! Provider message record (Graph-style JSON) plus the role annotations the
//! classifier writes back onto it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::timestamp::lenient;

/// A message's function within its conversation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageRole {
    /// First outbound message from the current user in the thread.
    Initial,
    /// Outbound message shortly after the user's previous one, or after a reply.
    FollowUp,
    /// Outbound message after an idle gap following the user's own message.
    Nudge,
    /// Inbound message from anyone other than the current user.
    Reply,
    /// Not yet classified.
    #[default]
    Unknown,
}

impl MessageRole {
    /// Short label for logging.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Initial => "initial",
            Self::FollowUp => "follow_up",
            Self::Nudge => "nudge",
            Self::Reply => "reply",
            Self::Unknown => "unknown",
        }
    }

    /// Whether the current user authored a message with this role.
    pub fn is_outbound(&self) -> bool {
        matches!(self, Self::Initial | Self::FollowUp | Self::Nudge)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmailAddress {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipient {
    #[serde(default)]
    pub email_address: Option<EmailAddress>,
}

impl Recipient {
    /// Recipient with just an address.
    pub fn address(address: impl Into<String>) -> Self {
        Self {
            email_address: Some(EmailAddress {
                name: None,
                address: Some(address.into()),
            }),
        }
    }

    fn normalized_address(&self) -> Option<String> {
        self.email_address
            .as_ref()
            .and_then(|e| e.address.as_deref())
            .map(normalize_address)
            .filter(|a| !a.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemBody {
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

/// Provider follow-up flag. Carried through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowupFlag {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub completed_date_time: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient")]
    pub due_date_time: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient")]
    pub start_date_time: Option<DateTime<Utc>>,
}

/// Attachment metadata. Content is never carried.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    #[serde(default, rename = "@odata.type")]
    pub odata_type: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub is_inline: Option<bool>,
    #[serde(default, deserialize_with = "lenient")]
    pub last_modified_date_time: Option<DateTime<Utc>>,
}

/// A mailbox message as returned by the retrieval service.
///
/// Only the sender address, subject, identifiers and the received/sent
/// timestamps influence threading. Everything else passes through as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MailMessage {
    /// Provider-assigned immutable message identifier.
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub conversation_id: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub body: Option<ItemBody>,
    #[serde(default)]
    pub unique_body: Option<ItemBody>,
    #[serde(default)]
    pub from: Option<Recipient>,
    #[serde(default)]
    pub sender: Option<Recipient>,
    #[serde(default)]
    pub to_recipients: Option<Vec<Recipient>>,
    #[serde(default)]
    pub cc_recipients: Option<Vec<Recipient>>,
    #[serde(default)]
    pub bcc_recipients: Option<Vec<Recipient>>,
    #[serde(default)]
    pub reply_to: Option<Vec<Recipient>>,
    #[serde(default, deserialize_with = "lenient")]
    pub received_date_time: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient")]
    pub sent_date_time: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient")]
    pub created_date_time: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient")]
    pub last_modified_date_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_read: bool,
    #[serde(default)]
    pub is_draft: Option<bool>,
    #[serde(default)]
    pub has_attachments: Option<bool>,
    #[serde(default)]
    pub importance: Option<String>,
    #[serde(default)]
    pub flag: Option<FollowupFlag>,
    #[serde(default)]
    pub attachments: Option<Vec<Attachment>>,

    /// Classified role. `unknown` until the classifier runs.
    #[serde(default, rename = "message_type")]
    pub role: MessageRole,
    #[serde(default, rename = "is_from_current_user")]
    pub is_from_current_user: bool,
}

impl MailMessage {
    /// Normalized author address: `from`, else `sender`.
    pub fn sender_address(&self) -> Option<String> {
        self.from
            .as_ref()
            .and_then(Recipient::normalized_address)
            .or_else(|| self.sender.as_ref().and_then(Recipient::normalized_address))
    }

    /// Received time if present, else sent time.
    pub fn effective_timestamp(&self) -> Option<DateTime<Utc>> {
        self.received_date_time.or(self.sent_date_time)
    }
}

/// Case-insensitive address normalization.
pub fn normalize_address(address: &str) -> String {
    address.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn deserializes_graph_payload() {
        let json = r##"{
            "id": "AAMk-1",
            "conversationId": "conv-1",
            "subject": "Quarterly numbers",
            "from": {"emailAddress": {"name": "Alice", "address": "Alice@Example.COM"}},
            "toRecipients": [{"emailAddress": {"address": "bob@example.com"}}],
            "receivedDateTime": "2026-02-15T10:00:00Z",
            "isRead": true,
            "attachments": [{"@odata.type": "#microsoft.graph.fileAttachment", "name": "q3.pdf", "size": 1024}]
        }"##;
        let msg: MailMessage = serde_json::from_str(json).unwrap();

        assert_eq!(msg.id.as_deref(), Some("AAMk-1"));
        assert_eq!(msg.conversation_id.as_deref(), Some("conv-1"));
        assert_eq!(msg.sender_address().as_deref(), Some("alice@example.com"));
        assert!(msg.is_read);
        assert_eq!(msg.role, MessageRole::Unknown);
        assert!(!msg.is_from_current_user);
        let attachments = msg.attachments.unwrap();
        assert_eq!(
            attachments[0].odata_type.as_deref(),
            Some("#microsoft.graph.fileAttachment")
        );
    }

    #[test]
    fn bad_timestamp_degrades_to_absent() {
        let json = r#"{
            "receivedDateTime": "not a date",
            "sentDateTime": "2026-02-15T10:00:00"
        }"#;
        let msg: MailMessage = serde_json::from_str(json).unwrap();
        assert!(msg.received_date_time.is_none());
        assert_eq!(
            msg.effective_timestamp(),
            Some(Utc.with_ymd_and_hms(2026, 2, 15, 10, 0, 0).unwrap())
        );
    }

    #[test]
    fn non_string_timestamp_degrades_to_absent() {
        let json = r#"{"receivedDateTime": 12345}"#;
        let msg: MailMessage = serde_json::from_str(json).unwrap();
        assert!(msg.effective_timestamp().is_none());
    }

    #[test]
    fn received_preferred_over_sent() {
        let received = Utc.with_ymd_and_hms(2026, 1, 2, 0, 0, 0).unwrap();
        let msg = MailMessage {
            received_date_time: Some(received),
            sent_date_time: Some(Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()),
            ..Default::default()
        };
        assert_eq!(msg.effective_timestamp(), Some(received));
    }

    #[test]
    fn sender_falls_back_to_sender_field() {
        let msg = MailMessage {
            from: Some(Recipient::default()),
            sender: Some(Recipient::address(" Bob@Example.com ")),
            ..Default::default()
        };
        assert_eq!(msg.sender_address().as_deref(), Some("bob@example.com"));
    }

    #[test]
    fn blank_sender_is_absent() {
        let msg = MailMessage {
            from: Some(Recipient::address("   ")),
            ..Default::default()
        };
        assert!(msg.sender_address().is_none());
    }

    #[test]
    fn role_serializes_as_message_type() {
        let msg = MailMessage {
            role: MessageRole::FollowUp,
            is_from_current_user: true,
            ..Default::default()
        };
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["message_type"], "follow_up");
        assert_eq!(json["is_from_current_user"], true);
    }

    #[test]
    fn role_labels() {
        assert_eq!(MessageRole::Initial.label(), "initial");
        assert_eq!(MessageRole::FollowUp.label(), "follow_up");
        assert_eq!(MessageRole::Nudge.label(), "nudge");
        assert_eq!(MessageRole::Reply.label(), "reply");
        assert_eq!(MessageRole::Unknown.label(), "unknown");
        assert!(MessageRole::Nudge.is_outbound());
        assert!(!MessageRole::Reply.is_outbound());
        assert!(!MessageRole::Unknown.is_outbound());
    }
}
