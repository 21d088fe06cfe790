//! Conversation threading and follow-up classification.
//!
//! Messages flow one way through:
//! 1. `KeyResolver::resolve()` — conversation key per message
//! 2. `grouper::group()` — partition into threads, oldest first
//! 3. `RoleClassifier::classify()` — initial / follow_up / nudge / reply
//! 4. `Thread::status()` — role of the last message
//! 5. `filters` — needs-reply and needs-nudging worklists
//!
//! Everything here is synchronous and pure; no I/O, no shared state.

pub mod classifier;
pub mod context;
pub mod engine;
pub mod filters;
pub mod grouper;
pub mod resolver;
pub mod thread;

pub use classifier::{Annotation, RoleClassifier};
pub use context::ClassificationContext;
pub use engine::{ThreadCollection, ThreadingEngine};
pub use grouper::{MergePolicy, group, group_sources};
pub use resolver::{ConversationKey, KeyResolver, KeyStrategy};
pub use thread::{Thread, aggregate};
