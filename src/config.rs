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

//! Client configuration.
//!
//! A [`Config`] is bound to one [`ApiClient`](crate::ApiClient) at creation and
//! can later be replaced ([`set_config`](crate::ApiClient::set_config)),
//! shallow-merged ([`update_config`](crate::ApiClient::update_config)) or
//! restored ([`reset_config`](crate::ApiClient::reset_config)).

use crate::base::TenantId;
use crate::error::{ClientError, Result};
use crate::schema::Patch;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;
use url::Url;

/// Environment variable holding the base URL.
pub const ENV_BASE_URL: &str = "BANK_API_URL";
/// Environment variable holding the bearer token.
pub const ENV_API_TOKEN: &str = "BANK_API_TOKEN";
/// Environment variable holding the default tenant.
pub const ENV_TENANT: &str = "BANK_API_TENANT";
/// Environment variable holding the request timeout in seconds.
pub const ENV_TIMEOUT_SECS: &str = "BANK_API_TIMEOUT_SECS";

const MAX_TIMEOUT_SECS: u64 = 300;

fn default_timeout_secs() -> u64 {
    30
}

/// Connection settings of a client.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Root of the API, e.g. `https://api.bank.example/v1`.
    pub base_url: String,
    /// Sent as `Authorization: Bearer <token>`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,
    /// Tenant addressed when no [`tenant`](crate::ApiClient::tenant) view is used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<TenantId>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Extra headers added to every request.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("base_url", &self.base_url)
            .field("api_token", &self.api_token.as_ref().map(|_| "<redacted>"))
            .field("tenant_id", &self.tenant_id)
            .field("timeout_secs", &self.timeout_secs)
            .field("headers", &self.headers)
            .finish()
    }
}

impl Config {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_token: None,
            tenant_id: None,
            timeout_secs: default_timeout_secs(),
            headers: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    #[must_use]
    pub fn with_tenant(mut self, tenant: impl Into<TenantId>) -> Self {
        self.tenant_id = Some(tenant.into());
        self
    }

    #[must_use]
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Reads the configuration from `BANK_API_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Config`] if `BANK_API_URL` is unset or a value
    /// does not parse.
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var(ENV_BASE_URL)
            .map_err(|_| ClientError::Config(format!("{ENV_BASE_URL} is not set")))?;
        let mut config = Config::new(base_url);
        if let Ok(token) = std::env::var(ENV_API_TOKEN) {
            config.api_token = Some(token);
        }
        if let Ok(tenant) = std::env::var(ENV_TENANT) {
            config.tenant_id = Some(TenantId::new(tenant));
        }
        if let Ok(secs) = std::env::var(ENV_TIMEOUT_SECS) {
            config.timeout_secs = secs.parse().map_err(|_| {
                ClientError::Config(format!("{ENV_TIMEOUT_SECS} must be a number of seconds"))
            })?;
        }
        config.validate()?;
        Ok(config)
    }

    /// Checks that the configuration can reach a server.
    ///
    /// # Errors
    ///
    /// - `base_url` must be an absolute `http` or `https` URL.
    /// - `timeout_secs` must be between 1 and 300.
    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.base_url)
            .map_err(|e| ClientError::Config(format!("invalid base_url: {e}")))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ClientError::Config(format!(
                "unsupported base_url scheme `{}`",
                url.scheme()
            )));
        }
        if self.timeout_secs == 0 || self.timeout_secs > MAX_TIMEOUT_SECS {
            return Err(ClientError::Config(format!(
                "timeout_secs must be between 1 and {MAX_TIMEOUT_SECS}"
            )));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Applies `update` on top of `self`.
    ///
    /// The merge is shallow: a provided `headers` map replaces the previous
    /// map rather than being merged into it.
    #[must_use]
    pub fn merged(&self, update: ConfigUpdate) -> Config {
        let mut next = self.clone();
        if let Some(base_url) = update.base_url {
            next.base_url = base_url;
        }
        match update.api_token {
            Patch::Absent => {}
            Patch::Null => next.api_token = None,
            Patch::Value(token) => next.api_token = Some(token),
        }
        match update.tenant_id {
            Patch::Absent => {}
            Patch::Null => next.tenant_id = None,
            Patch::Value(tenant) => next.tenant_id = Some(tenant),
        }
        if let Some(secs) = update.timeout_secs {
            next.timeout_secs = secs;
        }
        if let Some(headers) = update.headers {
            next.headers = headers;
        }
        next
    }
}

/// Partial configuration for [`ApiClient::update_config`](crate::ApiClient::update_config).
///
/// Unset fields keep their current value; clearable fields use [`Patch`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub api_token: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub tenant_id: Patch<TenantId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<BTreeMap<String, String>>,
}
