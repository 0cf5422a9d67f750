// Domain errors - malformed input and rule violations
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("invalid date '{0}', expected DD-MM-YYYY")]
    InvalidDate(String),

    #[error("invalid time '{0}', expected HH:MM")]
    InvalidTime(String),

    #[error("{0}")]
    Validation(String),
}

impl DomainError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// True for unparseable dates and times, as opposed to rule violations
    pub fn is_malformed_input(&self) -> bool {
        matches!(self, Self::InvalidDate(_) | Self::InvalidTime(_))
    }
}
