//! Error handling types for soql-bridge.
//!
//! Collaborator failures (host engine, completion command) are carried through
//! unchanged; nothing in this crate retries.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BridgeError {
    /// The host-language completion engine rejected the request
    #[error("Host completion engine failed: {message}")]
    HostEngine { message: String },

    /// The completion command against the virtual document failed
    #[error("Embedded completion engine failed: {message}")]
    EmbeddedEngine { message: String },

    /// A URI could not be decoded as a virtual SOQL document
    #[error("Invalid virtual document URI: {uri}")]
    InvalidVirtualUri { uri: String },

    /// The embedded block does not fit inside the host document
    #[error("Embedded block [{start}, {end}) exceeds document length {len}")]
    BlockOutOfBounds { start: usize, end: usize, len: usize },

    /// A content provider is already registered for the scheme
    #[error("Content provider already registered for scheme: {scheme}")]
    SchemeAlreadyRegistered { scheme: String },

    /// Configuration error
    #[error("Invalid configuration: {message}")]
    Config { message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for bridge operations
pub type BridgeResult<T> = Result<T, BridgeError>;

impl BridgeError {
    pub fn host_engine(message: impl Into<String>) -> Self {
        BridgeError::HostEngine {
            message: message.into(),
        }
    }

    pub fn embedded_engine(message: impl Into<String>) -> Self {
        BridgeError::EmbeddedEngine {
            message: message.into(),
        }
    }

    pub fn invalid_virtual_uri(uri: impl Into<String>) -> Self {
        BridgeError::InvalidVirtualUri { uri: uri.into() }
    }

    pub fn scheme_already_registered(scheme: impl Into<String>) -> Self {
        BridgeError::SchemeAlreadyRegistered {
            scheme: scheme.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        BridgeError::Config {
            message: message.into(),
        }
    }
}
