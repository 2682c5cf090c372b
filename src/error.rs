// Error types for the booking workflow

use thiserror::Error;

pub const GENERIC_FAILURE_MESSAGE: &str = "An unexpected error occurred. Please try again later.";

// Errors surfaced by the orchestrator to its callers
#[derive(Error, Debug)]
pub enum BookingError {
    #[error("{0}")]
    InvalidArgument(String),

    #[error("Unexpected error: {0:#}")]
    Unexpected(#[from] anyhow::Error),
}

impl BookingError {
    pub fn invalid(message: &str) -> Self {
        BookingError::InvalidArgument(message.to_string())
    }

    pub fn is_client_error(&self) -> bool {
        matches!(self, BookingError::InvalidArgument(_))
    }

    /// Message that is safe to hand back to a caller. Invalid arguments are
    /// reported verbatim, everything else collapses to a generic failure.
    pub fn public_message(&self) -> String {
        match self {
            BookingError::InvalidArgument(message) => message.clone(),
            BookingError::Unexpected(_) => GENERIC_FAILURE_MESSAGE.to_string(),
        }
    }
}

// Failures of the external supplier call
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SupplierError {
    #[error("Supplier request timed out after {0}ms")]
    Timeout(u64),

    #[error("Supplier unavailable: {0}")]
    Unavailable(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LedgerError {
    #[error("Could not allocate a unique booking code after {attempts} attempts")]
    CodeSpaceExhausted { attempts: u32 },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration error: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
