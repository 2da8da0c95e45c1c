//! Error types for austat
//!
//! This module defines the error types used throughout the austat library.
//! All errors are derived from `thiserror` for convenient error handling
//! and automatic `From` implementations.
//!
//! # Example
//!
//! ```
//! use austat_core::error::{AustatError, Result};
//!
//! fn example_function() -> Result<()> {
//!     // This will automatically convert io::Error to AustatError
//!     let _file = std::fs::read_to_string("nonexistent.txt")?;
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// Main error type for austat operations
#[derive(Error, Debug)]
pub enum AustatError {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid argument
    ///
    /// Raised at the point of a violated contract: a zero month-shift,
    /// both calendar and subscription-anchor alignment requested at once,
    /// or a non-positive user id on the event-recording path.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Invalid date format
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    /// A collaborator (event store, user directory) failed
    ///
    /// Collaborator failures propagate unmodified; the core performs no
    /// retry and no recovery.
    #[error("Store error: {0}")]
    Store(String),
}

/// Convenience type alias for Results in austat
pub type Result<T> = std::result::Result<T, AustatError>;
