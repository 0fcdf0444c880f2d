//! # Engine Error Types
//!
//! Error types for the cart engine and its collaborators.
//!
//! ## Error Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Engine Error Categories                           │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │    ApiError     │  │   StoreError    │  │     EngineError         │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  NotFound       │  │  Database       │  │  InvalidConfig          │ │
//! │  │  Status         │  │  Encode         │  │  ConfigLoadFailed       │ │
//! │  │  Transport      │  │  Unavailable    │  │  MissingCollaborator    │ │
//! │  │  Decode         │  │                 │  │  Store / Api            │ │
//! │  └────────┬────────┘  └────────┬────────┘  └─────────────────────────┘ │
//! │           │                    │                                        │
//! │           ▼                    ▼                                        │
//! │  CartError::QueryFailed  CartError::PersistFailed   (per operation)    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `ApiError` and `StoreError` never reach the caller of a cart operation;
//! the engine flattens them into a `CartError`. `EngineError` is only
//! returned while building the engine or loading configuration.

use rocket_core::{ProductId, ValidationError};
use rocket_db::DbError;
use thiserror::Error;

/// Result type alias for engine setup.
pub type EngineResult<T> = Result<T, EngineError>;

// =============================================================================
// Api Error
// =============================================================================

/// Failures talking to the stock oracle or product catalog.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The API does not know the product.
    #[error("{resource} {id} not found")]
    NotFound { resource: &'static str, id: ProductId },

    /// The API answered with a non-success status.
    #[error("Unexpected status {status} from {url}")]
    Status { status: u16, url: String },

    /// Connection, timeout or other transport failure.
    #[error("Request failed: {0}")]
    Transport(String),

    /// The response body was not the expected JSON.
    #[error("Malformed response: {0}")]
    Decode(String),

    /// The configured base URL is unusable.
    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Transport(err.to_string())
        }
    }
}

impl From<url::ParseError> for ApiError {
    fn from(err: url::ParseError) -> Self {
        ApiError::InvalidUrl(err.to_string())
    }
}

// =============================================================================
// Store Error
// =============================================================================

/// Failures of the durable store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The SQLite store failed.
    #[error("Database error: {0}")]
    Database(#[from] DbError),

    /// The snapshot could not be serialized.
    #[error("Could not encode snapshot: {0}")]
    Encode(String),

    /// The store is not reachable.
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

// =============================================================================
// Engine Error
// =============================================================================

/// Errors raised while configuring or opening the engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Invalid configuration value.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Failed to load config file.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    /// Failed to save config file.
    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    /// A required collaborator was not supplied to the builder.
    #[error("Cart engine is missing its {0}")]
    MissingCollaborator(&'static str),

    /// The persisted cart could not be read at startup.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// The HTTP client could not be built.
    #[error("API client error: {0}")]
    Api(#[from] ApiError),

    /// Input validation failed.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl From<DbError> for EngineError {
    fn from(err: DbError) -> Self {
        EngineError::Store(StoreError::Database(err))
    }
}

impl From<std::io::Error> for EngineError {
    fn from(err: std::io::Error) -> Self {
        EngineError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for EngineError {
    fn from(err: toml::de::Error) -> Self {
        EngineError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for EngineError {
    fn from(err: toml::ser::Error) -> Self {
        EngineError::ConfigSaveFailed(err.to_string())
    }
}
