//! Client error types

use thiserror::Error;

/// Errors from a single request to the dashboard API
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    #[error("API unavailable")]
    Unavailable,

    #[error("Request timeout")]
    Timeout,

    #[error("Request failed: {0}")]
    Request(String),

    #[error("API error {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Question is empty")]
    EmptyQuery,
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Timeout
        } else if e.is_connect() {
            FetchError::Unavailable
        } else if e.is_decode() {
            FetchError::Decode(e.to_string())
        } else {
            FetchError::Request(e.to_string())
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> Self {
        FetchError::Decode(e.to_string())
    }
}

/// Errors from downloading a report
#[derive(Error, Debug)]
pub enum ReportError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Report body was empty")]
    Empty,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Message to surface for an error response body.
///
/// The API answers failures with `{"error": "..."}`, or `{"answer": "[error] ..."}`
/// when the Q&A model fails; anything else is passed through as text.
pub(crate) fn api_error_message(body: &str) -> String {
    #[derive(serde::Deserialize)]
    struct ErrorBody {
        error: Option<String>,
        answer: Option<String>,
    }

    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody {
            error: Some(message),
            ..
        })
        | Ok(ErrorBody {
            answer: Some(message),
            ..
        }) => message,
        _ => body.trim().to_string(),
    }
}
