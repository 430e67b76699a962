//! Trait definitions and outbound events for studybot.
//!
//! This crate describes the seams between the session core and its
//! collaborators: the [`StudyStore`] persistence trait and the fire-and-forget
//! [`Notifier`] that carries level-ups, phase changes and voice cues out to
//! the chat platform.

#![warn(missing_docs)]

mod events;
mod store;

pub use events::{EventReceivers, Notifier, StudyEvent, VoiceNotification};
pub use store::StudyStore;
