//! Error types for the Hedvig access provider

use thiserror::Error;

/// Result type alias using the provider Error
pub type Result<T> = std::result::Result<T, Error>;

/// Provider error types
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Management API returned HTTP {status} for {kind}")]
    Status { kind: String, status: u16 },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Session error: {0}")]
    Session(String),

    #[error("Invalid value for {field}: {reason}")]
    InvalidField { field: String, reason: String },

    #[error("Missing required attribute: {0}")]
    MissingAttribute(String),

    #[error("Not enough results to find host in for virtual disk {vdisk}")]
    EmptyResult { vdisk: String },

    #[error("Resource not found: {kind} with id {id}")]
    NotFound { kind: String, id: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Unknown resource type: {0}")]
    UnknownResourceType(String),

    /// The old grant is already gone when this is returned
    #[error("Access {id} was revoked but granting the replacement failed: {source}")]
    Revoked {
        id: String,
        #[source]
        source: Box<Error>,
    },
}
