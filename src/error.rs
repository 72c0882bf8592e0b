// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

pub const CONNECTION_MESSAGE: &str = "Unable to connect to server";
pub const MALFORMED_MESSAGE: &str = "Unexpected response from server";

/// Failures surfaced by the client core. Every variant ends up as a
/// user-visible notification at the command boundary; none is retried.
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP 403: the server no longer accepts the stored token.
    #[error("session expired")]
    Unauthorized,
    /// Form input rejected before any network call.
    #[error("{0}")]
    Validation(String),
    #[error("request failed ({status}): {message}")]
    RequestFailed { status: u16, message: String },
    #[error("connection error: {0}")]
    Connection(String),
    #[error("malformed response: {0}")]
    MalformedResponse(String),
    #[error("session storage: {0}")]
    Storage(String),
}

impl ClientError {
    pub fn validation(msg: impl Into<String>) -> Self {
        ClientError::Validation(msg.into())
    }

    /// Text shown to the user for this failure.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Unauthorized => "Session Expired: Please log in again".to_string(),
            ClientError::Validation(msg) => format!("Validation Error: {}", msg),
            ClientError::RequestFailed { message, .. } => message.clone(),
            ClientError::Connection(_) => CONNECTION_MESSAGE.to_string(),
            ClientError::MalformedResponse(_) => MALFORMED_MESSAGE.to_string(),
            ClientError::Storage(_) => "Could not save session locally".to_string(),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ClientError::Unauthorized)
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Connection(err.to_string())
    }
}
