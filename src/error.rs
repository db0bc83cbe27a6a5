//! Error types for the metadata server.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use std::fmt;

/// Server error type.
#[derive(Debug)]
pub enum Error {
    /// Configuration error (startup only).
    Config(String),
    /// Chain RPC communication error.
    Chain(String),
    /// Requested token ID is not a positive integer.
    InvalidToken(i64),
    /// Requested token ID is beyond the current total supply.
    NotYetMinted { requested: i64, supply: u64 },
    /// The token exists but has no asset of the requested kind.
    AssetNotFound(i64),
    /// The object store failed before any byte was streamed.
    StorageOpen(String),
    /// Anything unclassified.
    Internal(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(msg) => write!(f, "config error: {msg}"),
            Error::Chain(msg) => write!(f, "chain rpc error: {msg}"),
            Error::InvalidToken(id) => write!(f, "invalid token id: {id}"),
            Error::NotYetMinted { requested, supply } => {
                write!(f, "token {requested} not yet minted (supply: {supply})")
            }
            Error::AssetNotFound(id) => write!(f, "no such asset for token {id}"),
            Error::StorageOpen(msg) => write!(f, "object store error: {msg}"),
            Error::Internal(msg) => write!(f, "internal error: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match &self {
            Error::InvalidToken(_) | Error::AssetNotFound(_) => StatusCode::NOT_FOUND,
            Error::NotYetMinted { .. } => StatusCode::FORBIDDEN,
            Error::StorageOpen(_) | Error::Chain(_) => StatusCode::BAD_GATEWAY,
            Error::Config(_) | Error::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = serde_json::json!({
            "success": false,
            "error": self.to_string()
        });
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::response::IntoResponse;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (Error::InvalidToken(-1), StatusCode::NOT_FOUND),
            (
                Error::NotYetMinted {
                    requested: 11,
                    supply: 10,
                },
                StatusCode::FORBIDDEN,
            ),
            (Error::AssetNotFound(3), StatusCode::NOT_FOUND),
            (Error::StorageOpen("refused".into()), StatusCode::BAD_GATEWAY),
            (Error::Chain("timeout".into()), StatusCode::BAD_GATEWAY),
            (Error::Internal("oops".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }

    #[test]
    fn test_display_includes_supply() {
        let err = Error::NotYetMinted {
            requested: 42,
            supply: 10,
        };
        let msg = err.to_string();
        assert!(msg.contains("42"));
        assert!(msg.contains("10"));
    }
}
