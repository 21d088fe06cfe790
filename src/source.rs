//! Mailbox retrieval seam.
//!
//! Fetching lives outside the engine. A `MailboxSource` hands over the inbox,
//! the sent folder and the user's identity; `sync_conversations` runs both
//! fetches concurrently, joins them, and only then enters the engine.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::info;

use crate::error::{self, SourceError};
use crate::mail::MailMessage;
use crate::threading::{ClassificationContext, MergePolicy, ThreadCollection, ThreadingEngine};

/// Trait for mailbox retrieval collaborators — pure I/O, no threading logic.
#[async_trait]
pub trait MailboxSource: Send + Sync {
    /// Source name for logging (e.g. "graph").
    fn name(&self) -> &str;

    /// Addresses identifying the mailbox owner.
    async fn current_user(&self) -> Result<Vec<String>, SourceError>;

    /// Inbound messages.
    async fn fetch_inbox(&self) -> Result<Vec<MailMessage>, SourceError>;

    /// Outbound messages.
    async fn fetch_sent(&self) -> Result<Vec<MailMessage>, SourceError>;
}

/// Fetch identity, inbox and sent items concurrently, then classify with the
/// sent folder as anchor.
pub async fn sync_conversations(
    source: &dyn MailboxSource,
    engine: &ThreadingEngine,
    policy: MergePolicy,
    evaluation_time: DateTime<Utc>,
) -> error::Result<ThreadCollection> {
    let (identity, inbox, sent) = tokio::try_join!(
        source.current_user(),
        source.fetch_inbox(),
        source.fetch_sent(),
    )?;

    info!(
        source = source.name(),
        inbox = inbox.len(),
        sent = sent.len(),
        "Mailbox fetched"
    );

    let ctx = ClassificationContext::new(identity, evaluation_time)?;
    Ok(engine.classify_sources(sent, inbox, policy, &ctx))
}

/// In-memory mailbox.
#[derive(Debug, Clone, Default)]
pub struct StaticMailbox {
    pub identity: Vec<String>,
    pub inbox: Vec<MailMessage>,
    pub sent: Vec<MailMessage>,
}

impl StaticMailbox {
    pub fn new(identity: Vec<String>, inbox: Vec<MailMessage>, sent: Vec<MailMessage>) -> Self {
        Self {
            identity,
            inbox,
            sent,
        }
    }
}

#[async_trait]
impl MailboxSource for StaticMailbox {
    fn name(&self) -> &str {
        "static"
    }

    async fn current_user(&self) -> Result<Vec<String>, SourceError> {
        Ok(self.identity.clone())
    }

    async fn fetch_inbox(&self) -> Result<Vec<MailMessage>, SourceError> {
        Ok(self.inbox.clone())
    }

    async fn fetch_sent(&self) -> Result<Vec<MailMessage>, SourceError> {
        Ok(self.sent.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    use crate::error::{Error, InputError};
    use crate::mail::{MessageRole, Recipient};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 1, 0, 0, 0).unwrap()
    }

    fn msg(conv: &str, from: &str, days_ago: i64) -> MailMessage {
        MailMessage {
            conversation_id: Some(conv.into()),
            from: Some(Recipient::address(from)),
            received_date_time: Some(now() - Duration::days(days_ago)),
            ..Default::default()
        }
    }

    fn mailbox() -> StaticMailbox {
        StaticMailbox::new(
            vec!["me@example.com".into()],
            vec![msg("shared", "them@example.com", 2), msg("cold", "spam@example.com", 1)],
            vec![msg("shared", "me@example.com", 3)],
        )
    }

    struct FailingSource;

    #[async_trait]
    impl MailboxSource for FailingSource {
        fn name(&self) -> &str {
            "failing"
        }
        async fn current_user(&self) -> Result<Vec<String>, SourceError> {
            Ok(vec!["me@example.com".into()])
        }
        async fn fetch_inbox(&self) -> Result<Vec<MailMessage>, SourceError> {
            Err(SourceError::FetchFailed {
                source_name: "failing".into(),
                reason: "timeout".into(),
            })
        }
        async fn fetch_sent(&self) -> Result<Vec<MailMessage>, SourceError> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn merge_all_includes_inbox_only_threads() {
        let engine = ThreadingEngine::default();
        let result = sync_conversations(&mailbox(), &engine, MergePolicy::MergeAll, now())
            .await
            .unwrap();
        assert_eq!(result.total_conversations(), 2);
        let shared = result.get("shared").unwrap();
        assert_eq!(shared.status(), MessageRole::Reply);
        assert_eq!(shared.messages()[0].role, MessageRole::Initial);
    }

    #[tokio::test]
    async fn anchor_only_keeps_sent_conversations() {
        let engine = ThreadingEngine::default();
        let result = sync_conversations(&mailbox(), &engine, MergePolicy::AnchorOnly, now())
            .await
            .unwrap();
        assert_eq!(result.total_conversations(), 1);
        assert!(result.get("cold").is_none());
    }

    #[tokio::test]
    async fn fetch_failure_propagates() {
        let engine = ThreadingEngine::default();
        let err = sync_conversations(&FailingSource, &engine, MergePolicy::MergeAll, now())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Source(SourceError::FetchFailed { .. })));
    }

    #[tokio::test]
    async fn empty_identity_is_invalid_input() {
        let engine = ThreadingEngine::default();
        let source = StaticMailbox::default();
        let err = sync_conversations(&source, &engine, MergePolicy::MergeAll, now())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Input(InputError::MissingIdentity)));
    }
}
