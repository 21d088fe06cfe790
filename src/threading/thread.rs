//! Conversation thread and its status aggregation.

use serde::{Deserialize, Serialize};

use super::resolver::ConversationKey;
use crate::mail::{MailMessage, MessageRole};

/// A conversation: messages sharing a key, oldest first.
///
/// The status is never stored. It is read off the last message's role every
/// time, so it cannot drift from `messages`. On the wire the thread also
/// carries `total_messages` and `last_message_status`; both are ignored on
/// input and recomputed on output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "ThreadRecord", from = "ThreadRecord")]
pub struct Thread {
    key: ConversationKey,
    messages: Vec<MailMessage>,
}

impl Thread {
    /// Build a thread, stable-sorting messages by effective timestamp.
    ///
    /// Messages with no timestamp sort first; ties keep their given order.
    pub fn new(key: ConversationKey, mut messages: Vec<MailMessage>) -> Self {
        messages.sort_by_key(MailMessage::effective_timestamp);
        Self { key, messages }
    }

    pub fn key(&self) -> &ConversationKey {
        &self.key
    }

    pub fn messages(&self) -> &[MailMessage] {
        &self.messages
    }

    /// Mutable access for in-place annotation. A slice, so order and
    /// membership cannot change.
    pub(crate) fn messages_mut(&mut self) -> &mut [MailMessage] {
        &mut self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last_message(&self) -> Option<&MailMessage> {
        self.messages.last()
    }

    /// Thread status: the role of the chronologically last message.
    pub fn status(&self) -> MessageRole {
        aggregate(&self.messages)
    }
}

/// Status of a chronologically ordered message run. `unknown` when empty.
pub fn aggregate(messages: &[MailMessage]) -> MessageRole {
    messages.last().map(|m| m.role).unwrap_or_default()
}

// ── Wire form ──────────────────────────────────────────────────────

#[derive(Serialize, Deserialize)]
struct ThreadRecord {
    conversation_id: String,
    #[serde(default)]
    messages: Vec<MailMessage>,
    #[serde(default)]
    total_messages: usize,
    #[serde(default)]
    last_message_status: MessageRole,
}

impl From<Thread> for ThreadRecord {
    fn from(thread: Thread) -> Self {
        let last_message_status = thread.status();
        Self {
            conversation_id: thread.key.into_inner(),
            total_messages: thread.messages.len(),
            last_message_status,
            messages: thread.messages,
        }
    }
}

impl From<ThreadRecord> for Thread {
    fn from(record: ThreadRecord) -> Self {
        Thread::new(ConversationKey::new(record.conversation_id), record.messages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn at(hour: u32, subject: &str, role: MessageRole) -> MailMessage {
        MailMessage {
            subject: Some(subject.into()),
            received_date_time: Some(Utc.with_ymd_and_hms(2026, 3, 1, hour, 0, 0).unwrap()),
            role,
            ..Default::default()
        }
    }

    #[test]
    fn new_sorts_oldest_first() {
        let thread = Thread::new(
            "c1".into(),
            vec![
                at(12, "late", MessageRole::Reply),
                at(8, "early", MessageRole::Initial),
            ],
        );
        let subjects: Vec<_> = thread
            .messages()
            .iter()
            .map(|m| m.subject.as_deref().unwrap())
            .collect();
        assert_eq!(subjects, vec!["early", "late"]);
    }

    #[test]
    fn untimed_messages_sort_first_and_stay_stable() {
        let untimed = |s: &str| MailMessage {
            subject: Some(s.into()),
            ..Default::default()
        };
        let thread = Thread::new(
            "c1".into(),
            vec![at(9, "timed", MessageRole::Reply), untimed("u1"), untimed("u2")],
        );
        let subjects: Vec<_> = thread
            .messages()
            .iter()
            .map(|m| m.subject.as_deref().unwrap())
            .collect();
        assert_eq!(subjects, vec!["u1", "u2", "timed"]);
    }

    #[test]
    fn status_follows_last_message() {
        let mut thread = Thread::new(
            "c1".into(),
            vec![
                at(8, "a", MessageRole::Initial),
                at(9, "b", MessageRole::Reply),
            ],
        );
        assert_eq!(thread.status(), MessageRole::Reply);

        thread.messages_mut()[1].role = MessageRole::FollowUp;
        assert_eq!(thread.status(), MessageRole::FollowUp);
    }

    #[test]
    fn empty_thread_is_unknown() {
        let thread = Thread::new("c1".into(), vec![]);
        assert_eq!(thread.status(), MessageRole::Unknown);
        assert!(thread.is_empty());
    }

    #[test]
    fn serializes_summary_fields() {
        let thread = Thread::new(
            "c1".into(),
            vec![
                at(8, "a", MessageRole::Initial),
                at(9, "b", MessageRole::Nudge),
            ],
        );
        let json = serde_json::to_value(&thread).unwrap();
        assert_eq!(json["conversation_id"], "c1");
        assert_eq!(json["total_messages"], 2);
        assert_eq!(json["last_message_status"], "nudge");
        assert_eq!(json["messages"][1]["message_type"], "nudge");
    }

    #[test]
    fn deserialization_ignores_stale_status() {
        let json = r#"{
            "conversation_id": "c1",
            "total_messages": 99,
            "last_message_status": "reply",
            "messages": [
                {"subject": "a", "receivedDateTime": "2026-03-01T08:00:00Z", "message_type": "initial"}
            ]
        }"#;
        let thread: Thread = serde_json::from_str(json).unwrap();
        assert_eq!(thread.len(), 1);
        assert_eq!(thread.status(), MessageRole::Initial);
        assert_eq!(thread.key().as_str(), "c1");
    }
}
