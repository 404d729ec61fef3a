// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Error types for SwipeSort

use thiserror::Error;

/// Result type alias for SwipeSort operations
pub type Result<T> = std::result::Result<T, SwipeError>;

/// SwipeSort error types
#[derive(Error, Debug)]
pub enum SwipeError {
    /// Missing, empty or malformed filename in a request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The named file is not (or no longer) in the pending directory
    #[error("File not found: {0}")]
    NotFound(String),

    /// Underlying storage failure (unreadable directory, failed rename)
    #[error("File system error: {0}")]
    FileSystem(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("API error: {0}")]
    Api(#[from] reqwest::Error),

    /// Non-success response from a remote SwipeSort service
    #[error("Service responded {status}: {message}")]
    Remote { status: u16, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),
}
