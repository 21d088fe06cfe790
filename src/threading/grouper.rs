//! Partition messages into threads by resolved conversation key.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::resolver::{ConversationKey, KeyResolver};
use super::thread::Thread;
use crate::mail::MailMessage;

/// How two separately fetched message sets are combined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergePolicy {
    /// Every conversation from either set is kept.
    #[default]
    MergeAll,
    /// Only conversations whose key appears in the anchor set are kept.
    AnchorOnly,
}

impl MergePolicy {
    pub fn from_anchor_only(anchor_only: bool) -> Self {
        if anchor_only {
            Self::AnchorOnly
        } else {
            Self::MergeAll
        }
    }
}

/// Bucket messages by key, then order each bucket oldest first.
///
/// Threads come out in order of their key's first appearance in the input.
/// Every message lands in exactly one thread.
pub fn group<I>(resolver: &KeyResolver, messages: I) -> Vec<Thread>
where
    I: IntoIterator<Item = MailMessage>,
{
    let mut index: HashMap<ConversationKey, usize> = HashMap::new();
    let mut buckets: Vec<(ConversationKey, Vec<MailMessage>)> = Vec::new();

    for message in messages {
        let key = resolver.resolve(&message);
        match index.get(&key) {
            Some(&slot) => buckets[slot].1.push(message),
            None => {
                index.insert(key.clone(), buckets.len());
                buckets.push((key, vec![message]));
            }
        }
    }

    buckets
        .into_iter()
        .map(|(key, messages)| Thread::new(key, messages))
        .collect()
}

/// Merge an anchor set (e.g. sent items) with a second set (e.g. inbox),
/// then group.
///
/// With [`MergePolicy::AnchorOnly`], threads whose key never appears among
/// the anchor messages are dropped. Messages from the second set that share
/// a key with an anchor message are still kept in that thread.
pub fn group_sources(
    resolver: &KeyResolver,
    anchor: Vec<MailMessage>,
    other: Vec<MailMessage>,
    policy: MergePolicy,
) -> Vec<Thread> {
    let anchor_keys: Option<HashSet<ConversationKey>> = match policy {
        MergePolicy::MergeAll => None,
        MergePolicy::AnchorOnly => Some(anchor.iter().map(|m| resolver.resolve(m)).collect()),
    };

    let threads = group(resolver, anchor.into_iter().chain(other));

    match anchor_keys {
        None => threads,
        Some(keys) => {
            let before = threads.len();
            let kept: Vec<Thread> = threads
                .into_iter()
                .filter(|t| keys.contains(t.key()))
                .collect();
            debug!(
                dropped = before - kept.len(),
                kept = kept.len(),
                "Restricted threads to anchor conversations"
            );
            kept
        }
    }
}
