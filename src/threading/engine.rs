//! Engine facade: resolve → group → classify → aggregate, plus the
//! worklist filters, all driven by an explicit [`ThreadingConfig`].

use serde::{Deserialize, Serialize};
use tracing::{debug, info, info_span, warn};
use uuid::Uuid;

use super::classifier::RoleClassifier;
use super::context::ClassificationContext;
use super::filters;
use super::grouper::{self, MergePolicy};
use super::resolver::KeyResolver;
use super::thread::Thread;
use crate::config::ThreadingConfig;
use crate::error::ConfigError;
use crate::mail::{MailMessage, MessageRole};

/// Classified threads with collection-level counts.
///
/// `total_messages` is the sum of every thread's message count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawCollection")]
pub struct ThreadCollection {
    conversations: Vec<Thread>,
    total_conversations: usize,
    total_messages: usize,
}

#[derive(Deserialize)]
struct RawCollection {
    #[serde(default)]
    conversations: Vec<Thread>,
}

impl From<RawCollection> for ThreadCollection {
    fn from(raw: RawCollection) -> Self {
        Self::from_threads(raw.conversations)
    }
}

impl ThreadCollection {
    pub fn from_threads(conversations: Vec<Thread>) -> Self {
        let total_messages = conversations.iter().map(Thread::len).sum();
        Self {
            total_conversations: conversations.len(),
            total_messages,
            conversations,
        }
    }

    pub fn conversations(&self) -> &[Thread] {
        &self.conversations
    }

    pub fn into_conversations(self) -> Vec<Thread> {
        self.conversations
    }

    pub fn total_conversations(&self) -> usize {
        self.total_conversations
    }

    pub fn total_messages(&self) -> usize {
        self.total_messages
    }

    pub fn is_empty(&self) -> bool {
        self.conversations.is_empty()
    }

    /// Look up a thread by conversation key.
    pub fn get(&self, key: &str) -> Option<&Thread> {
        self.conversations.iter().find(|t| t.key().as_str() == key)
    }
}

impl<'a> FromIterator<&'a Thread> for ThreadCollection {
    fn from_iter<I: IntoIterator<Item = &'a Thread>>(iter: I) -> Self {
        Self::from_threads(iter.into_iter().cloned().collect())
    }
}

/// Stateless between calls; one instance can serve any number of mailboxes.
#[derive(Debug, Clone)]
pub struct ThreadingEngine {
    config: ThreadingConfig,
    resolver: KeyResolver,
    classifier: RoleClassifier,
}

impl ThreadingEngine {
    /// Build an engine, rejecting non-positive thresholds.
    pub fn new(config: ThreadingConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            resolver: KeyResolver::default(),
            classifier: RoleClassifier::new(config.nudge_threshold),
        })
    }

    /// Replace the key resolution chain.
    pub fn with_resolver(mut self, resolver: KeyResolver) -> Self {
        self.resolver = resolver;
        self
    }

    /// Group and classify a single message collection.
    pub fn classify_messages(
        &self,
        messages: Vec<MailMessage>,
        ctx: &ClassificationContext,
    ) -> ThreadCollection {
        let run_id = Uuid::new_v4();
        let _span = info_span!("classify_run", run_id = %run_id).entered();

        let input = messages.len();
        let threads = grouper::group(&self.resolver, messages);
        self.finish(threads, ctx, input)
    }

    /// Merge two fetched sets, then group and classify.
    ///
    /// `anchor` is typically the sent folder; with
    /// [`MergePolicy::AnchorOnly`] only conversations seen there survive.
    pub fn classify_sources(
        &self,
        anchor: Vec<MailMessage>,
        other: Vec<MailMessage>,
        policy: MergePolicy,
        ctx: &ClassificationContext,
    ) -> ThreadCollection {
        let run_id = Uuid::new_v4();
        let _span = info_span!("classify_run", run_id = %run_id, policy = ?policy).entered();

        let input = anchor.len() + other.len();
        let threads = grouper::group_sources(&self.resolver, anchor, other, policy);
        self.finish(threads, ctx, input)
    }

    /// Re-run classification over existing threads.
    pub fn reclassify(&self, threads: Vec<Thread>, ctx: &ClassificationContext) -> ThreadCollection {
        let input = threads.iter().map(Thread::len).sum();
        self.finish(threads, ctx, input)
    }

    /// Threads awaiting the user's reply.
    pub fn needs_reply(&self, threads: &[Thread]) -> ThreadCollection {
        filters::needs_reply(threads).into_iter().collect()
    }

    /// Threads awaiting a nudge from the user, measured from the context's
    /// evaluation time.
    pub fn needs_nudging(&self, threads: &[Thread], ctx: &ClassificationContext) -> ThreadCollection {
        filters::needs_nudging(threads, ctx.evaluation_time(), self.config.recency_window)
            .into_iter()
            .collect()
    }

    fn finish(
        &self,
        mut threads: Vec<Thread>,
        ctx: &ClassificationContext,
        input_messages: usize,
    ) -> ThreadCollection {
        for thread in &mut threads {
            self.classifier.classify(thread, ctx);
            debug!(
                conversation = %thread.key(),
                messages = thread.len(),
                status = thread.status().label(),
                "Thread classified"
            );
            if thread.status() == MessageRole::Unknown {
                warn!(conversation = %thread.key(), "Thread left without a status");
            }
        }

        let collection = ThreadCollection::from_threads(threads);
        info!(
            input_messages,
            conversations = collection.total_conversations(),
            messages = collection.total_messages(),
            "Classification run complete"
        );
        collection
    }
}

impl Default for ThreadingEngine {
    fn default() -> Self {
        let config = ThreadingConfig::default();
        Self {
            config,
            resolver: KeyResolver::default(),
            classifier: RoleClassifier::new(config.nudge_threshold),
        }
    }
}
