use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Errors that can occur while talking to the remote repository
#[derive(Error, Debug)]
pub enum ContentError {
    #[error("Content not found: {path}")]
    NotFound { path: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Rate limited by remote service: {message}")]
    RateLimited { message: String },

    #[error("Unexpected status {status}: {message}")]
    UnexpectedStatus { status: u16, message: String },

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Result type alias for content operations
pub type Result<T> = std::result::Result<T, ContentError>;

/// Errors surfaced by a keyword search at the HTTP boundary
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Keyword is required")]
    MissingKeyword,

    #[error("Listing of {identifier} contained no candidate files")]
    EmptyListing { identifier: String },

    #[error("Listing failed: {0}")]
    Listing(#[source] ContentError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl SearchError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            SearchError::MissingKeyword => StatusCode::BAD_REQUEST,
            SearchError::EmptyListing { .. }
            | SearchError::Listing(_)
            | SearchError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message returned to the client. Causes are only logged.
    pub fn public_message(&self) -> &'static str {
        match self {
            SearchError::MissingKeyword => "Keyword is required",
            SearchError::EmptyListing { .. } | SearchError::Listing(_) => {
                "Could not retrieve file list from GitHub."
            }
            SearchError::Internal(_) => "An error occurred during the search.",
        }
    }
}

impl IntoResponse for SearchError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "Search failed");
        }

        (status, Json(json!({ "error": self.public_message() }))).into_response()
    }
}
