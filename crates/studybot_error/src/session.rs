//! Session and pomodoro error types.

/// Conditions raised by the session registry and the pomodoro controller.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum SessionErrorKind {
    /// The server has no running study session
    #[display("No active study session in server {}", _0)]
    NoActiveSession(i64),
    /// The session has no running pomodoro timer
    #[display("No active pomodoro timer in server {}", _0)]
    NoPomodoroActive(i64),
    /// A caller-supplied value is out of range
    #[display("Invalid argument: {}", _0)]
    InvalidArgument(String),
}

/// Session error with source location tracking.
///
/// # Examples
///
/// ```
/// use studybot_error::{SessionError, SessionErrorKind};
///
/// let err = SessionError::new(SessionErrorKind::NoPomodoroActive(42));
/// assert!(format!("{}", err).contains("server 42"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Session Error: {} at line {} in {}", kind, line, file)]
pub struct SessionError {
    /// The kind of error that occurred
    pub kind: SessionErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl SessionError {
    /// Create a new SessionError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: SessionErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Shorthand for an `InvalidArgument` error.
    #[track_caller]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(SessionErrorKind::InvalidArgument(message.into()))
    }
}
