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

//! Transport abstraction and the HTTP implementation.
//!
//! A [`Transport`] turns one fully-built [`Request`] into one [`Response`].
//! It never validates, retries or decodes; that happens in
//! [`Command`](crate::Command). Tests inject their own transport through
//! [`ApiClient::with_transport`](crate::ApiClient::with_transport).

use crate::base::TenantId;
use crate::config::Config;
use crate::error::{ClientError, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::fmt;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Header carrying the addressed tenant.
pub const TENANT_HEADER: &str = "X-Tenant-Id";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub const fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// Outbound request, derived deterministically from a command.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub method: Method,
    /// Path below the configured base URL, starting with `/`.
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    /// Resolved at dispatch time from the facade view and the config snapshot.
    pub tenant: Option<TenantId>,
}

impl Request {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            tenant: None,
        }
    }

    /// First value of query parameter `key`.
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Raw response as received from the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub body: Vec<u8>,
}

impl Response {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends requests to the platform.
///
/// Implementations must issue exactly one request per call to
/// [`send`](Transport::send) and use `config` for every connection detail,
/// since it is the snapshot taken for this particular call.
#[async_trait]
pub trait Transport: Send + Sync + fmt::Debug {
    async fn send(&self, config: &Config, request: &Request) -> Result<Response>;
}

/// HTTP/JSON transport over [`reqwest`].
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Creates a transport with its own connection pool.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the TLS backend cannot be initialized.
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .pool_max_idle_per_host(32)
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self { client })
    }

    /// Reuses an existing [`reqwest::Client`] and its connection pool.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    fn url(config: &Config, request: &Request) -> Result<Url> {
        let base = config.base_url.trim_end_matches('/');
        let mut url = Url::parse(&format!("{base}{}", request.path))
            .map_err(|e| ClientError::Config(format!("invalid request url: {e}")))?;
        if !request.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&request.query);
        }
        Ok(url)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, config: &Config, request: &Request) -> Result<Response> {
        let url = Self::url(config, request)?;
        let timeout = config.timeout();
        // The query carries customer data; only the path is logged.
        debug!(method = %request.method, path = %request.path, "sending http request");

        let mut builder = self
            .client
            .request(request.method.into(), url)
            .timeout(timeout)
            .header(reqwest::header::ACCEPT, "application/json");
        if let Some(token) = &config.api_token {
            builder = builder.bearer_auth(token);
        }
        if let Some(tenant) = &request.tenant {
            builder = builder.header(TENANT_HEADER, tenant.as_str());
        }
        for (name, value) in &config.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| http_error(e, timeout))?;
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(|e| http_error(e, timeout))?;

        Ok(Response {
            status,
            body: body.to_vec(),
        })
    }
}

fn http_error(error: reqwest::Error, timeout: Duration) -> ClientError {
    if error.is_timeout() {
        ClientError::Timeout(timeout)
    } else {
        ClientError::Http(error.without_url())
    }
}
