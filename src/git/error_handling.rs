use std::fmt;
use thiserror::Error;
use tracing::{debug, error, warn};

/// Errors raised around repository access
#[derive(Error, Debug)]
pub enum GitError {
    #[error("Invalid input: {input} - {reason}")]
    InvalidInput { input: String, reason: String },

    #[error("Configuration error: {setting} - {reason}")]
    Configuration { setting: String, reason: String },

    #[error("Git internal error: {0}")]
    Git2(#[from] git2::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl GitError {
    /// Create an invalid input error
    pub fn invalid_input(input: impl Into<String>, reason: impl Into<String>) -> Self {
        let input = input.into();
        let reason = reason.into();
        warn!("Invalid input '{}': {}", input, reason);
        GitError::InvalidInput { input, reason }
    }

    pub fn configuration(setting: impl Into<String>, reason: impl Into<String>) -> Self {
        GitError::Configuration {
            setting: setting.into(),
            reason: reason.into(),
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            GitError::InvalidInput { .. } => ErrorSeverity::Medium,
            GitError::Configuration { .. } => ErrorSeverity::Medium,
            GitError::Git2(_) => ErrorSeverity::Medium,
            GitError::Io(_) => ErrorSeverity::High,
            GitError::Serialization(_) => ErrorSeverity::Low,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorSeverity::Low => write!(f, "LOW"),
            ErrorSeverity::Medium => write!(f, "MEDIUM"),
            ErrorSeverity::High => write!(f, "HIGH"),
        }
    }
}

pub struct InputValidator;

impl InputValidator {
    /// Full or abbreviated hexadecimal commit id
    pub fn validate_commit_id(id: &str) -> Result<(), GitError> {
        if id.len() < 4 {
            return Err(GitError::invalid_input(id, "Commit ID too short (minimum 4 characters)"));
        }
        if id.len() > 40 {
            return Err(GitError::invalid_input(id, "Commit ID too long (maximum 40 characters)"));
        }
        if !id.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(GitError::invalid_input(id, "Commit ID contains non-hexadecimal characters"));
        }
        Ok(())
    }
}

pub struct ErrorRecovery;

impl ErrorRecovery {
    pub fn user_friendly_message(error: &GitError) -> String {
        match error {
            GitError::InvalidInput { input, .. } => {
                format!("Invalid input '{}': please check it and try again.", input)
            }
            GitError::Configuration { setting, .. } => {
                format!("Configuration error: please check the '{}' setting.", setting)
            }
            GitError::Git2(e) if e.code() == git2::ErrorCode::NotFound => {
                "Not a Git repository, or the requested object does not exist.".to_string()
            }
            GitError::Git2(e) => format!("Git error: {}", e.message()),
            GitError::Io(e) => format!("File operation failed: {}", e),
            GitError::Serialization(_) => "Settings file could not be read.".to_string(),
        }
    }

    /// Message for an application-level error, using the friendly text when
    /// the cause is a [`GitError`]
    pub fn describe(error: &anyhow::Error) -> String {
        match error.downcast_ref::<GitError>() {
            Some(git_error) => Self::user_friendly_message(git_error),
            None => match error.downcast_ref::<git2::Error>() {
                Some(e) => Self::user_friendly_message(&GitError::Git2(git2::Error::new(
                    e.code(),
                    e.class(),
                    e.message(),
                ))),
                None => error.to_string(),
            },
        }
    }
}

pub struct ErrorReporter;

impl ErrorReporter {
    /// Log error with appropriate level based on severity
    pub fn log_error(error: &GitError, context: &str) {
        match error.severity() {
            ErrorSeverity::High => {
                error!("[HIGH] {}: {}", context, error);
            }
            ErrorSeverity::Medium => {
                warn!("[MEDIUM] {}: {}", context, error);
            }
            ErrorSeverity::Low => {
                debug!("[LOW] {}: {}", context, error);
            }
        }
    }

    pub fn log_anyhow(error: &anyhow::Error, context: &str) {
        match error.downcast_ref::<GitError>() {
            Some(git_error) => Self::log_error(git_error, context),
            None => warn!("{}: {:#}", context, error),
        }
    }
}
