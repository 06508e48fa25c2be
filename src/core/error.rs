//! Error types shared by the rate providers and the interactive shell.

use thiserror::Error;

/// A failed attempt to fetch a rate from a remote source.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport failure, including the request timing out. The wrapped
    /// error has its URL stripped.
    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    /// The configured base URL cannot form a request URL.
    #[error("Invalid request URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The server answered with a non-success status.
    #[error("HTTP error: {status} for {url}")]
    Status {
        status: reqwest::StatusCode,
        url: String,
    },

    /// The body was not the JSON document we expected.
    #[error("Failed to parse JSON response from {url}: {reason}")]
    Decode { url: String, reason: String },

    /// The JSON parsed but the numeric field was absent.
    #[error("Missing field '{field}' in response from {url}")]
    MissingField { field: String, url: String },
}

/// Rejected user input at one of the shell prompts.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("'{0}' is not a number")]
    NotANumber(String),

    #[error("{0} is not a menu option")]
    InvalidChoice(i64),

    #[error("amount {0} is negative")]
    NegativeAmount(f64),
}
