//! Per-run classification inputs.

use chrono::{DateTime, Utc};

use crate::error::InputError;
use crate::mail::normalize_address;

/// Who "the user" is and the instant age checks are measured against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationContext {
    current_user: Vec<String>,
    evaluation_time: DateTime<Utc>,
}

impl ClassificationContext {
    /// Normalize and de-duplicate the identity addresses.
    ///
    /// Fails when no non-blank address remains.
    pub fn new<I, S>(identity: I, evaluation_time: DateTime<Utc>) -> Result<Self, InputError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut current_user: Vec<String> = Vec::new();
        for address in identity {
            let normalized = normalize_address(address.as_ref());
            if !normalized.is_empty() && !current_user.contains(&normalized) {
                current_user.push(normalized);
            }
        }

        if current_user.is_empty() {
            return Err(InputError::MissingIdentity);
        }

        Ok(Self {
            current_user,
            evaluation_time,
        })
    }

    /// Context evaluated against the wall clock.
    pub fn now<I, S>(identity: I) -> Result<Self, InputError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::new(identity, Utc::now())
    }

    pub fn current_user(&self) -> &[String] {
        &self.current_user
    }

    pub fn evaluation_time(&self) -> DateTime<Utc> {
        self.evaluation_time
    }

    /// Same identity, different evaluation instant.
    pub fn at(&self, evaluation_time: DateTime<Utc>) -> Self {
        Self {
            current_user: self.current_user.clone(),
            evaluation_time,
        }
    }

    /// Whether an (already normalized) sender address belongs to the user.
    pub fn is_current_user(&self, sender: Option<&str>) -> bool {
        sender.is_some_and(|s| self.current_user.iter().any(|u| u == s))
    }
}
