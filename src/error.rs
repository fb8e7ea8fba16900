use crate::chain::models::Chain;
use thiserror::Error;

/// Top-level error type for the coordinator
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Query failed on {chain}: {message}")]
    Query { chain: Chain, message: String },

    #[error("Broadcast failed: {0}")]
    Broadcast(#[from] BroadcastError),

    #[error("Invalid amount: {0}")]
    Amount(#[from] AmountError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn query(chain: Chain, message: impl Into<String>) -> Self {
        AppError::Query {
            chain,
            message: message.into(),
        }
    }
}

/// Transaction submission errors
#[derive(Error, Debug)]
pub enum BroadcastError {
    #[error("Transaction {txhash} rejected with code {code}: {raw_log}")]
    Rejected {
        txhash: String,
        code: u32,
        raw_log: String,
    },

    #[error("Signer unreachable: {0}")]
    Transport(String),

    #[error("Signer returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed signer response: {0}")]
    InvalidResponse(String),
}

/// Amount parsing errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum AmountError {
    #[error("empty amount")]
    Empty,

    #[error("not a base-10 integer: {0:?}")]
    NotDecimal(String),

    #[error("amount does not fit in 64 bits: {0}")]
    Overflow(String),
}

impl From<config::ConfigError> for AppError {
    fn from(error: config::ConfigError) -> Self {
        AppError::Config(error.to_string())
    }
}

/// Flatten validator field errors into one line
pub fn describe_validation(errors: &validator::ValidationErrors) -> String {
    errors
        .field_errors()
        .into_iter()
        .map(|(field, errors)| {
            let messages: Vec<String> = errors
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|s| s.to_string())
                        .unwrap_or_else(|| e.code.to_string())
                })
                .collect();
            format!("{}: {}", field, messages.join(", "))
        })
        .collect::<Vec<String>>()
        .join("; ")
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Config(describe_validation(&errors))
    }
}

/// Result type alias for the coordinator
pub type AppResult<T> = Result<T, AppError>;
