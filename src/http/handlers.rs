//! Request handlers for the search API

use std::any::Any;
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::debug;

use crate::error::SearchError;
use crate::search::KeywordSearch;
use crate::types::{SearchOutcome, SearchRequest, SearchResponse};

/// Search handler
///
/// Scans the configured directory for the first file containing the
/// request's keyword.
///
/// # Returns
///
/// - 200 with the file name and its full content on a match
/// - 404 when no file contains the keyword
///
/// # Errors
///
/// - `MissingKeyword` (400): body is not JSON, or `keyword` is missing,
///   empty or not a string
/// - `Listing` / `EmptyListing` (500): the file list could not be obtained
pub async fn search_handler(
    State(search): State<Arc<KeywordSearch>>,
    payload: Result<Json<SearchRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<SearchResponse>), SearchError> {
    let keyword = match payload {
        Ok(Json(req)) => req.keyword.unwrap_or_default(),
        Err(rejection) => {
            debug!(error = %rejection, "Rejected search body");
            return Err(SearchError::MissingKeyword);
        }
    };

    let (status, body) = match search.search(&keyword).await? {
        SearchOutcome::Found { file_name, content } => (
            StatusCode::OK,
            SearchResponse {
                message: format!("Keyword found in {}", file_name),
                file_content: Some(content),
            },
        ),
        SearchOutcome::NotFound => (
            StatusCode::NOT_FOUND,
            SearchResponse {
                message: "Keyword not found in any files.".to_string(),
                file_content: None,
            },
        ),
    };

    Ok((status, Json(body)))
}

/// Render a panic caught while handling a request as a generic 500
pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };

    SearchError::Internal(detail).into_response()
}
