//! Worklist filters over classified threads.
//!
//! Both filters read only the stored roles and timestamps, so they work the
//! same on threads that were serialized and sent back by a client. Output
//! keeps input order; input is never modified.

use chrono::{DateTime, Duration, Utc};

use super::thread::Thread;
use crate::mail::MessageRole;

/// Threads whose last message is inbound: the user owes a reply.
pub fn needs_reply(threads: &[Thread]) -> Vec<&Thread> {
    threads
        .iter()
        .filter(|t| t.status() == MessageRole::Reply)
        .collect()
}

/// Threads where the user spoke last and the silence is recent.
///
/// The last message must be outbound (`initial`, `follow_up` or `nudge`) and
/// its effective timestamp no older than `recency_window` before
/// `evaluation_time`. A last message without a timestamp cannot prove
/// recency and is excluded.
pub fn needs_nudging(
    threads: &[Thread],
    evaluation_time: DateTime<Utc>,
    recency_window: Duration,
) -> Vec<&Thread> {
    // No cutoff when the window reaches past the earliest representable time.
    let cutoff = evaluation_time.checked_sub_signed(recency_window);
    threads
        .iter()
        .filter(|t| t.status().is_outbound())
        .filter(|t| {
            t.last_message()
                .and_then(|m| m.effective_timestamp())
                .is_some_and(|ts| cutoff.is_none_or(|c| ts >= c))
        })
        .collect()
}
