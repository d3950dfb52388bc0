//! Unified error type for the shipment desk.
//!
//! Every fallible operation in the crate returns [`Result`]. Store failures are
//! recoverable by the user: the desk keeps its form state and the front end
//! shows the message.

use thiserror::Error;

/// All errors produced by the crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be read or parsed
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// The database rejected or failed an operation
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// The record store refused a write or delete
    #[error("{message}")]
    StoreRejected {
        /// Message reported by the store
        message: String,
    },

    /// No shipment exists with the given identifier
    #[error("Shipment {id} not found")]
    ShipmentNotFound {
        /// Identifier that was looked up
        id: i64,
    },

    /// I/O failure (console, config file)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether this error came from the record store refusing an operation.
    ///
    /// These are the errors the front end reports with a blocking alert while
    /// leaving the form untouched.
    #[must_use]
    pub const fn is_store_rejection(&self) -> bool {
        matches!(
            self,
            Self::Database(_) | Self::StoreRejected { .. } | Self::ShipmentNotFound { .. }
        )
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
