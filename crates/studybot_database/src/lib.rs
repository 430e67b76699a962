//! SQLite persistence for studybot.
//!
//! This crate stores per-user study statistics and study session records
//! through an r2d2 pool of diesel SQLite connections. Migrations are embedded
//! and applied when the pool is created.
//!
//! # Example
//!
//! ```no_run
//! use studybot_database::SqliteStudyStore;
//! use studybot_interface::StudyStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = SqliteStudyStore::connect("studybot.db", 8)?;
//! let session_id = store.start_session(42).await?;
//! store.touch_user_session(7, 42, session_id).await?;
//! # Ok(())
//! # }
//! ```

mod connection;
mod conversions;
mod models;
mod study_repository;

pub mod schema;

pub use connection::{MIGRATIONS, SqlitePool, establish_pool};
pub use models::{LeaderboardRow, NewStudySession, NewUserStat, StudySessionRow, UserStatRow};
pub use study_repository::SqliteStudyStore;

use studybot_error::DatabaseError;

/// Result type for database operations.
pub type DatabaseResult<T> = Result<T, DatabaseError>;
