//! Top-level error wrapper types.

use crate::{ConfigError, DatabaseError, SessionError};

/// Every error the studybot crates can surface.
///
/// # Examples
///
/// ```
/// use studybot_error::{ConfigError, StudyBotError};
///
/// let err: StudyBotError = ConfigError::new("bad interval").into();
/// assert!(format!("{}", err).contains("Configuration Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum StudyBotErrorKind {
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Persistence error
    #[from(DatabaseError)]
    Database(DatabaseError),
    /// Session registry or pomodoro error
    #[from(SessionError)]
    Session(SessionError),
}

/// Studybot error with kind discrimination.
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("StudyBot Error: {}", _0)]
pub struct StudyBotError(Box<StudyBotErrorKind>);

impl StudyBotError {
    /// Create a new error from a kind.
    pub fn new(kind: StudyBotErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &StudyBotErrorKind {
        &self.0
    }

    /// The session error kind, if this is a session error.
    pub fn session_kind(&self) -> Option<&crate::SessionErrorKind> {
        match self.kind() {
            StudyBotErrorKind::Session(err) => Some(&err.kind),
            _ => None,
        }
    }

    /// The database error kind, if this is a persistence error.
    pub fn database_kind(&self) -> Option<&crate::DatabaseErrorKind> {
        match self.kind() {
            StudyBotErrorKind::Database(err) => Some(&err.kind),
            _ => None,
        }
    }
}

// Generic From implementation for any type that converts to StudyBotErrorKind
impl<T> From<T> for StudyBotError
where
    T: Into<StudyBotErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for studybot operations.
pub type StudyBotResult<T> = std::result::Result<T, StudyBotError>;
