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

//! Command objects.
//!
//! A [`Command`] is an inert description of one operation: its kind, the
//! request it will send and, once bound to a facade, where to send it.
//! Building a command performs no I/O. [`Command::execute`] sends exactly one
//! request per call and never caches, so executing twice issues two
//! independent requests.

use crate::api::Context;
use crate::error::{ClientError, Result, ValidationError};
use crate::schema::{self, Validate};
use crate::transport::{Method, Request, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::marker::PhantomData;
use tokio_util::sync::CancellationToken;

/// Kind of operation a command performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Get,
    List,
    Create,
    Update,
    /// Resolves to `None` on success, whatever the body.
    Delete,
    /// Built by hand for [`ApiClient::request`](crate::ApiClient::request).
    Custom,
}

/// Typed description of an intended operation producing `T`.
pub struct Command<T> {
    operation: Operation,
    request: Request,
    context: Option<Context>,
    _output: PhantomData<fn() -> T>,
}

impl<T> Clone for Command<T> {
    fn clone(&self) -> Self {
        Self {
            operation: self.operation,
            request: self.request.clone(),
            context: self.context.clone(),
            _output: PhantomData,
        }
    }
}

impl<T> fmt::Debug for Command<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("operation", &self.operation)
            .field("request", &self.request)
            .field("bound", &self.context.is_some())
            .finish()
    }
}

impl<T> Command<T> {
    pub(crate) fn bound(context: &Context, operation: Operation, request: Request) -> Self {
        Self {
            operation,
            request,
            context: Some(context.clone()),
            _output: PhantomData,
        }
    }

    /// Creates an unbound command; submit it with
    /// [`ApiClient::request`](crate::ApiClient::request).
    pub fn new(operation: Operation, method: Method, path: impl Into<String>) -> Self {
        Self {
            operation,
            request: Request::new(method, path),
            context: None,
            _output: PhantomData,
        }
    }

    /// Shorthand for an [`Operation::Custom`] command.
    pub fn custom(method: Method, path: impl Into<String>) -> Self {
        Self::new(Operation::Custom, method, path)
    }

    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.request.query.push((key.into(), value.to_string()));
        self
    }

    #[must_use]
    pub fn body(mut self, body: Value) -> Self {
        self.request.body = Some(body);
        self
    }

    /// Validates `payload` and uses it as the request body.
    ///
    /// # Errors
    ///
    /// Returns the payload's validation issues; the command is dropped.
    pub fn payload<B: Serialize + Validate>(mut self, payload: &B) -> std::result::Result<Self, ValidationError> {
        payload.check()?;
        self.request.body = Some(schema::to_payload(payload)?);
        Ok(self)
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    /// The request this command will send, before tenant resolution.
    pub fn request(&self) -> &Request {
        &self.request
    }

    pub fn is_bound(&self) -> bool {
        self.context.is_some()
    }
}

impl<T: DeserializeOwned + Validate> Command<T> {
    /// Sends the request and decodes the validated result.
    ///
    /// Returns `Ok(None)` for empty results and for every successful delete.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Unbound`] if the command was built with [`Command::new`].
    /// - [`ClientError::Api`] for non-2xx responses.
    /// - [`ClientError::Decode`] / [`ClientError::InvalidResponse`] if the body
    ///   does not match `T`.
    /// - Any error raised by the transport.
    pub async fn execute(&self) -> Result<Option<T>> {
        let context = self.context.as_ref().ok_or(ClientError::Unbound)?;
        self.execute_on(context).await
    }

    /// Like [`execute`](Command::execute), rejecting with
    /// [`ClientError::Cancelled`] as soon as `token` fires.
    pub async fn execute_with_cancel(&self, token: &CancellationToken) -> Result<Option<T>> {
        tokio::select! {
            biased;
            () = token.cancelled() => Err(ClientError::Cancelled),
            result = self.execute() => result,
        }
    }

    pub(crate) async fn execute_on(&self, context: &Context) -> Result<Option<T>> {
        let response = context.dispatch(self.request.clone()).await?;
        decode(self.operation, response)
    }
}

fn decode<T: DeserializeOwned + Validate>(operation: Operation, response: Response) -> Result<Option<T>> {
    if !response.is_success() {
        return Err(ClientError::Api {
            status: response.status,
            message: error_message(&response.body),
        });
    }
    if operation == Operation::Delete || response.body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }

    let value: Value = serde_json::from_slice(&response.body)?;
    if value.is_null() {
        return Ok(None);
    }
    schema::parse(value)
        .map(Some)
        .map_err(ClientError::InvalidResponse)
}

fn error_message(body: &[u8]) -> String {
    if let Ok(Value::Object(map)) = serde_json::from_slice::<Value>(body) {
        for key in ["message", "error", "defaultUserMessage"] {
            if let Some(Value::String(message)) = map.get(key) {
                return message.clone();
            }
        }
    }
    let text = String::from_utf8_lossy(body).trim().to_owned();
    if text.is_empty() {
        "empty error response".to_owned()
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payment::Payment;
    use serde_json::json;

    fn response(status: u16, body: &str) -> Response {
        Response {
            status,
            body: body.as_bytes().to_vec(),
        }
    }

    #[test]
    fn non_success_extracts_message() {
        let error = decode::<Value>(Operation::Get, response(404, r#"{"message":"payment not found"}"#))
            .unwrap_err();
        assert_eq!(error.status(), Some(404));
        assert_eq!(
            error.to_string(),
            "server responded with status 404: payment not found"
        );

        let error = decode::<Value>(Operation::Get, response(502, "bad gateway")).unwrap_err();
        assert_eq!(error.to_string(), "server responded with status 502: bad gateway");
    }

    #[test]
    fn empty_and_delete_resolve_to_none() {
        assert!(decode::<Value>(Operation::Get, response(204, "")).unwrap().is_none());
        assert!(decode::<Value>(Operation::Update, response(200, "null")).unwrap().is_none());
        assert!(
            decode::<()>(Operation::Delete, response(200, r#"{"deleted":true}"#))
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn invalid_response_is_reported_separately_from_input_validation() {
        let error = decode::<Payment>(Operation::Get, response(200, r#"{"id":1}"#)).unwrap_err();
        assert!(matches!(error, ClientError::InvalidResponse(_)));
        assert!(!error.is_validation());

        let error = decode::<Payment>(Operation::Get, response(200, "{ nope")).unwrap_err();
        assert!(matches!(error, ClientError::Decode(_)));
    }

    #[test]
    fn custom_commands_accumulate_query_and_body() {
        let command: Command<Value> = Command::custom(Method::Post, "/reports/daily")
            .query("date", "2024-05-01")
            .query("limit", 5)
            .body(json!({ "format": "csv" }));

        assert_eq!(command.operation(), Operation::Custom);
        assert!(!command.is_bound());
        assert_eq!(command.request().query_value("limit"), Some("5"));
        assert_eq!(command.request().body, Some(json!({ "format": "csv" })));
    }

    #[tokio::test]
    async fn unbound_command_refuses_to_execute() {
        let command: Command<Value> = Command::custom(Method::Get, "/ping");
        assert!(matches!(command.execute().await, Err(ClientError::Unbound)));
    }
}
