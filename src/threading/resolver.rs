//! Conversation key resolution.
//!
//! Each message maps to a grouping key through an ordered list of
//! strategies; the first one that yields a non-empty key wins. The content
//! digest at the end of the default chain always succeeds, so resolution is
//! total.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::mail::MailMessage;

/// Subject used for the digest when a message has none.
pub const DEFAULT_SUBJECT: &str = "No Subject";

/// Prefix of digest-derived keys.
pub const DIGEST_KEY_PREFIX: &str = "subject_";

/// Hex characters of the SHA-256 digest kept in a derived key.
const DIGEST_KEY_LEN: usize = 16;

/// Grouping key shared by every message of a thread.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationKey(String);

impl ConversationKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ConversationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ConversationKey {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// One way of deriving a conversation key from a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyStrategy {
    /// Provider-assigned conversation identifier.
    ProviderConversation,
    /// Provider-assigned immutable message identifier. Isolates the message
    /// into a singleton thread.
    ImmutableMessageId,
    /// Digest of subject and sender address.
    SubjectDigest,
}

impl KeyStrategy {
    /// Try this strategy; `None` when the message lacks the needed field.
    pub fn attempt(&self, message: &MailMessage) -> Option<ConversationKey> {
        match self {
            Self::ProviderConversation => non_blank(message.conversation_id.as_deref()),
            Self::ImmutableMessageId => non_blank(message.id.as_deref()),
            Self::SubjectDigest => Some(subject_digest_key(message)),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<ConversationKey> {
    value
        .filter(|v| !v.trim().is_empty())
        .map(ConversationKey::from)
}

/// Deterministic key from `(subject, sender)`.
///
/// A blank subject hashes the same as a missing one. The two parts are joined with a unit separator before hashing so that
/// `("ab", "c")` and `("a", "bc")` never collide.
pub fn subject_digest_key(message: &MailMessage) -> ConversationKey {
    let subject = message
        .subject
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(DEFAULT_SUBJECT);
    let sender = message.sender_address().unwrap_or_default();

    let mut hasher = Sha256::new();
    hasher.update(subject.as_bytes());
    hasher.update([0x1f]);
    hasher.update(sender.as_bytes());
    let digest = hex::encode(hasher.finalize());

    ConversationKey(format!("{DIGEST_KEY_PREFIX}{}", &digest[..DIGEST_KEY_LEN]))
}

/// Ordered strategy chain.
#[derive(Debug, Clone)]
pub struct KeyResolver {
    strategies: Vec<KeyStrategy>,
}

impl Default for KeyResolver {
    fn default() -> Self {
        Self {
            strategies: vec![
                KeyStrategy::ProviderConversation,
                KeyStrategy::ImmutableMessageId,
                KeyStrategy::SubjectDigest,
            ],
        }
    }
}

impl KeyResolver {
    /// Custom chain. The content digest is still used if every strategy misses.
    pub fn with_strategies(strategies: Vec<KeyStrategy>) -> Self {
        Self { strategies }
    }

    /// Resolve a message's conversation key. Never fails.
    pub fn resolve(&self, message: &MailMessage) -> ConversationKey {
        self.strategies
            .iter()
            .find_map(|s| s.attempt(message))
            .unwrap_or_else(|| subject_digest_key(message))
    }
}
