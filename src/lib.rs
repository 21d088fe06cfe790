//! Followup Assist — conversation threading and follow-up classification.

pub mod api;
pub mod config;
pub mod error;
pub mod mail;
pub mod source;
pub mod threading;
