use crate::model::{ResourceKind, Slot};
use crate::store::StoreError;

#[derive(Debug)]
pub enum EngineError {
    /// Malformed or incomplete booking input. Never retried.
    Validation(&'static str),
    /// The requested interval overlaps an existing reservation.
    Conflict { kind: ResourceKind, slot: Slot },
    /// The referenced resource or reservation does not exist.
    NotFound(String),
    /// Storage/network failure. Transient; the caller may retry the whole
    /// operation (which re-checks availability — desirable, time passed).
    Infra(String),
}

impl EngineError {
    /// One human-readable line per abort, distinguishing "fix your input",
    /// "pick another time", and "try again later".
    pub fn user_message(&self) -> &'static str {
        match self {
            EngineError::Validation(_) => "Check the reservation details and try again.",
            EngineError::Conflict { .. } => {
                "This time slot is already booked. Please choose a different time."
            }
            EngineError::NotFound(_) => "That reservation or location no longer exists.",
            EngineError::Infra(_) => "Temporary problem reaching the server. Try again later.",
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, EngineError::Infra(_))
    }
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::Validation(msg) => write!(f, "invalid booking: {msg}"),
            EngineError::Conflict { kind, slot } => {
                write!(f, "slot already booked: {kind} {slot}")
            }
            EngineError::NotFound(what) => write!(f, "not found: {what}"),
            EngineError::Infra(e) => write!(f, "storage failure: {e}"),
        }
    }
}

impl std::error::Error for EngineError {}

impl From<StoreError> for EngineError {
    fn from(e: StoreError) -> Self {
        EngineError::Infra(e.0)
    }
}
