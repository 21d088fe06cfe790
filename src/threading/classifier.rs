//! Role classification within a single thread.
//!
//! A forward fold over the chronologically ordered messages:
//!
//! - inbound (not from the current user) → `reply`
//! - first outbound → `initial`
//! - later outbound right after the user's own message, at least
//!   `nudge_threshold` later → `nudge`
//! - any other later outbound → `follow_up`
//!
//! A nudge needs both timestamps. If either is missing the pair falls
//! through to `follow_up`.

use chrono::{DateTime, Duration, Utc};

use super::context::ClassificationContext;
use super::thread::Thread;
use crate::mail::{MailMessage, MessageRole};

/// Classification of one message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Annotation {
    pub role: MessageRole,
    pub is_from_current_user: bool,
}

/// What the fold remembers about the message just processed.
#[derive(Debug, Clone, Copy)]
struct Previous {
    from_current_user: bool,
    timestamp: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, Default)]
struct WalkState {
    first_outbound_seen: bool,
    previous: Option<Previous>,
}

/// Assigns roles using the configured nudge threshold.
#[derive(Debug, Clone, Copy)]
pub struct RoleClassifier {
    nudge_threshold: Duration,
}

impl RoleClassifier {
    pub fn new(nudge_threshold: Duration) -> Self {
        Self { nudge_threshold }
    }

    /// Compute annotations for an ordered message run without touching it.
    pub fn annotations(
        &self,
        messages: &[MailMessage],
        ctx: &ClassificationContext,
    ) -> Vec<Annotation> {
        let (_, annotations) = messages.iter().fold(
            (WalkState::default(), Vec::with_capacity(messages.len())),
            |(state, mut out), message| {
                let (next, annotation) = self.step(state, message, ctx);
                out.push(annotation);
                (next, out)
            },
        );
        annotations
    }

    /// Annotate every message of `thread` in place.
    ///
    /// Re-running on an already classified thread yields the same roles.
    pub fn classify(&self, thread: &mut Thread, ctx: &ClassificationContext) {
        let annotations = self.annotations(thread.messages(), ctx);
        for (message, annotation) in thread.messages_mut().iter_mut().zip(annotations) {
            message.role = annotation.role;
            message.is_from_current_user = annotation.is_from_current_user;
        }
    }

    fn step(
        &self,
        state: WalkState,
        message: &MailMessage,
        ctx: &ClassificationContext,
    ) -> (WalkState, Annotation) {
        let sender = message.sender_address();
        let from_current_user = ctx.is_current_user(sender.as_deref());
        let timestamp = message.effective_timestamp();

        let role = if !from_current_user {
            MessageRole::Reply
        } else if !state.first_outbound_seen {
            MessageRole::Initial
        } else {
            match state.previous {
                Some(prev) if prev.from_current_user && self.is_idle_gap(prev.timestamp, timestamp) => {
                    MessageRole::Nudge
                }
                _ => MessageRole::FollowUp,
            }
        };

        let next = WalkState {
            first_outbound_seen: state.first_outbound_seen || from_current_user,
            previous: Some(Previous {
                from_current_user,
                timestamp,
            }),
        };

        (
            next,
            Annotation {
                role,
                is_from_current_user: from_current_user,
            },
        )
    }

    fn is_idle_gap(&self, earlier: Option<DateTime<Utc>>, later: Option<DateTime<Utc>>) -> bool {
        match (earlier, later) {
            (Some(earlier), Some(later)) => later.signed_duration_since(earlier) >= self.nudge_threshold,
            _ => false,
        }
    }
}

impl Default for RoleClassifier {
    fn default() -> Self {
        Self::new(crate::config::ThreadingConfig::default().nudge_threshold)
    }
}
