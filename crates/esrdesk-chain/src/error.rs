//! Error types for ledger gateway operations.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Failed to connect to router: {0}")]
    Connection(String),

    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Bad amount on wire: {0}")]
    Amount(#[from] esrdesk_core::AmountError),

    #[error("Transaction rejected: {0}")]
    Rejected(String),
}
