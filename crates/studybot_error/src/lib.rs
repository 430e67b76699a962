//! Error types for the studybot workspace.
//!
//! Every error follows the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum names the specific condition
//! - `*Error` struct wraps the kind with the source location it was raised at
//! - constructors use `#[track_caller]` so the location is captured automatically
//!
//! # Examples
//!
//! ```
//! use studybot_error::{SessionError, SessionErrorKind, StudyBotResult};
//!
//! fn stop_timer(server_id: i64) -> StudyBotResult<()> {
//!     Err(SessionError::new(SessionErrorKind::NoActiveSession(server_id)))?
//! }
//!
//! assert!(stop_timer(1).is_err());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod database;
mod error;
mod session;

pub use config::ConfigError;
pub use database::{DatabaseError, DatabaseErrorKind};
pub use error::{StudyBotError, StudyBotErrorKind, StudyBotResult};
pub use session::{SessionError, SessionErrorKind};
