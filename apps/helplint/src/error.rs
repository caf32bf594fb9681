//! Error types for index loading.
//!
//! Lint findings are never errors in this sense; they are `Diagnostic`s.
//! These variants cover the cases where a help index cannot be turned into
//! a `PackageIndex` at all.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("help index '{path}' could not be read")]
    Unreadable { path: String },

    #[error("help index '{path}' is not valid JSON: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("help index '{path}' is invalid: {reason}")]
    Schema { path: String, reason: String },

    #[error("no help index is loaded for package '{0}'")]
    UnknownPackage(String),
}
