// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2025 Daniel Negri
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Error types for building and executing API operations.
//!
//! - **Validation errors** ([`ClientError::Validation`]): raised locally before
//!   any network call. Fix the input and retry.
//! - **Transport errors** ([`ClientError::Http`], [`ClientError::Timeout`],
//!   [`ClientError::Api`]): the request left the process and failed.
//! - **Decoding errors** ([`ClientError::Decode`],
//!   [`ClientError::InvalidResponse`]): the server answered with something
//!   that does not match the expected schema.
//!
//! Empty results are not errors: they surface as `Ok(None)`.

use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Result alias used by every fallible operation in this crate.
pub type Result<T> = std::result::Result<T, ClientError>;

/// A single offending field reported by the validation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    /// Dotted path to the field, e.g. `debtor.address.country` or
    /// `pageItems[2].currency`. `$` denotes the document root.
    pub path: String,
    pub message: String,
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Structured validation failure enumerating every offending field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    issues: Vec<FieldIssue>,
}

impl ValidationError {
    pub(crate) fn new(issues: Vec<FieldIssue>) -> Self {
        debug_assert!(!issues.is_empty(), "validation error without issues");
        Self { issues }
    }

    /// Builds an error with a single issue.
    pub fn single(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(vec![FieldIssue {
            path: path.into(),
            message: message.into(),
        }])
    }

    pub fn issues(&self) -> &[FieldIssue] {
        &self.issues
    }

    /// Returns true if any issue is reported for exactly `path`.
    pub fn has_issue(&self, path: &str) -> bool {
        self.issues.iter().any(|issue| issue.path == path)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "validation failed")?;
        for (i, issue) in self.issues.iter().enumerate() {
            let sep = if i == 0 { ": " } else { "; " };
            write!(f, "{sep}{issue}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// A string did not match any spelling of a wire vocabulary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown {kind} `{value}`")]
pub struct UnknownVariant {
    kind: &'static str,
    value: String,
}

impl UnknownVariant {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_owned(),
        }
    }
}

/// Errors surfaced to the caller of `execute()` and the facade mutators.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Input rejected locally; nothing was sent.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Configuration cannot be used to reach the server.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The command was built without a facade and submitted via `execute()`.
    #[error("command is not bound to a client; submit it with ApiClient::request")]
    Unbound,

    /// Network-level failure (connection, TLS, DNS, ...).
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The request exceeded the configured timeout.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// The server answered with a non-2xx status.
    #[error("server responded with status {status}: {message}")]
    Api { status: u16, message: String },

    /// The response body is not valid JSON.
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The response body is JSON but does not satisfy the expected schema.
    #[error("invalid response: {0}")]
    InvalidResponse(ValidationError),

    /// The cancellation token fired before the request completed.
    #[error("request cancelled")]
    Cancelled,
}

impl ClientError {
    /// True for errors raised before anything was sent.
    pub fn is_validation(&self) -> bool {
        matches!(self, ClientError::Validation(_))
    }

    /// HTTP status of an [`Api`](ClientError::Api) error.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        assert_eq!(
            ClientError::Config("missing base_url".into()).to_string(),
            "invalid configuration: missing base_url"
        );
        assert_eq!(
            ClientError::Api {
                status: 404,
                message: "payment not found".into()
            }
            .to_string(),
            "server responded with status 404: payment not found"
        );
        assert_eq!(ClientError::Cancelled.to_string(), "request cancelled");
        assert_eq!(
            ClientError::Timeout(Duration::from_secs(5)).to_string(),
            "request timed out after 5s"
        );
    }

    #[test]
    fn validation_error_lists_every_issue() {
        let error = ValidationError::new(vec![
            FieldIssue {
                path: "amount".into(),
                message: "must be positive".into(),
            },
            FieldIssue {
                path: "debtor.name".into(),
                message: "must not be empty".into(),
            },
        ]);

        assert_eq!(
            error.to_string(),
            "validation failed: amount: must be positive; debtor.name: must not be empty"
        );
        assert!(error.has_issue("debtor.name"));
        assert!(!error.has_issue("debtor"));
    }

    #[test]
    fn validation_converts_into_client_error() {
        let error: ClientError = ValidationError::single("limit", "must be at least 1").into();
        assert!(error.is_validation());
        assert_eq!(error.status(), None);
    }

    #[test]
    fn unknown_variant_names_the_vocabulary() {
        let error = UnknownVariant::new("PaymentRail", "PIGEON");
        assert_eq!(error.to_string(), "unknown PaymentRail `PIGEON`");
    }
}
