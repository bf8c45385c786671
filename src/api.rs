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

//! Client facade and resource namespaces.
//!
//! [`ApiClient`] is the root object. It owns one configuration cell and one
//! transport, and hands out resource namespaces that build
//! [`Command`]s and [`ListQuery`]s bound to it.
//!
//! # Configuration state
//!
//! Configuration lives behind a lock owned by the facade, never in global
//! state, so two facades created separately never observe each other's
//! changes. Views returned by [`ApiClient::tenant`] share their parent's
//! transport but get their own cell, seeded from the parent's configuration
//! at the time the view is created. Config mutators on a view never reach
//! the parent, and the parent's later changes never reach the view.
//!
//! Each `execute()` takes one snapshot of the configuration when it
//! dispatches. A command already in flight when
//! [`update_config`](ApiClient::update_config) runs keeps the snapshot it
//! took; commands dispatched concurrently with an update may see either
//! version. No ordering between concurrent commands is provided.

use crate::account::{Account, CreateAccountInput, UpdateAccountInput};
use crate::base::{AccountId, ClientId, DocumentId, PaymentId, TenantId};
use crate::client::{Client, CreateClientInput, UpdateClientInput};
use crate::command::{Command, Operation};
use crate::config::{Config, ConfigUpdate};
use crate::document::{CreateDocumentInput, Document};
use crate::error::{Result, ValidationError};
use crate::filters::{AccountFilters, ClientFilters, PaymentFilters};
use crate::payment::{CreatePaymentInput, Payment, UpdatePaymentInput};
use crate::query::ListQuery;
use crate::schema::Validate;
use crate::transport::{HttpTransport, Method, Request, Response, Transport};
use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug)]
struct ConfigCell {
    initial: Config,
    current: RwLock<Config>,
}

impl ConfigCell {
    fn new(config: Config) -> Self {
        Self {
            current: RwLock::new(config.clone()),
            initial: config,
        }
    }
}

/// What a command needs to dispatch: the facade's configuration cell and
/// the transport it shares with its tenant views.
#[derive(Debug, Clone)]
pub(crate) struct Context {
    config: Arc<ConfigCell>,
    transport: Arc<dyn Transport>,
}

impl Context {
    fn snapshot(&self) -> Config {
        self.config.current.read().clone()
    }

    pub(crate) async fn dispatch(&self, mut request: Request) -> Result<Response> {
        let config = self.snapshot();
        request.tenant = config.tenant_id.clone();
        debug!(
            method = %request.method,
            path = %request.path,
            tenant = request.tenant.as_ref().map(TenantId::as_str),
            "dispatching request"
        );

        let response = self.transport.send(&config, &request).await?;
        debug!(status = response.status, path = %request.path, "received response");
        Ok(response)
    }

    fn command<T>(&self, operation: Operation, method: Method, path: String) -> Command<T> {
        Command::bound(self, operation, Request::new(method, path))
    }

    fn command_with<T, B: serde::Serialize + Validate>(
        &self,
        operation: Operation,
        method: Method,
        path: String,
        payload: &B,
    ) -> std::result::Result<Command<T>, ValidationError> {
        self.command(operation, method, path).payload(payload)
    }
}

/// Creates a facade over the HTTP transport.
///
/// # Errors
///
/// Returns [`ClientError::Config`](crate::ClientError::Config) if `config`
/// fails [`Config::validate`].
pub fn create_client(config: Config) -> Result<ApiClient> {
    ApiClient::new(config)
}

/// Root object of the API client.
///
/// Cloning is cheap and yields a handle to the same facade.
#[derive(Debug, Clone)]
pub struct ApiClient {
    context: Context,
}

impl ApiClient {
    /// See [`create_client`].
    pub fn new(config: Config) -> Result<Self> {
        Self::with_transport(config, HttpTransport::new()?)
    }

    /// Creates a facade that sends through `transport`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Config`](crate::ClientError::Config) if `config`
    /// fails [`Config::validate`].
    pub fn with_transport(config: Config, transport: impl Transport + 'static) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            context: Context {
                config: Arc::new(ConfigCell::new(config)),
                transport: Arc::new(transport),
            },
        })
    }

    pub fn payment(&self) -> PaymentsApi {
        PaymentsApi {
            context: self.context.clone(),
        }
    }

    pub fn client(&self) -> ClientsApi {
        ClientsApi {
            context: self.context.clone(),
        }
    }

    /// Snapshot of the current configuration.
    pub fn config(&self) -> Config {
        self.context.snapshot()
    }

    /// The configuration this facade was created with. For a tenant view,
    /// the parent's configuration at the time of the view's creation.
    pub fn initial_config(&self) -> &Config {
        &self.context.config.initial
    }

    /// Replaces the configuration.
    ///
    /// # Errors
    ///
    /// Leaves the current configuration untouched if `config` is invalid.
    pub fn set_config(&self, config: Config) -> Result<()> {
        config.validate()?;
        *self.context.config.current.write() = config;
        Ok(())
    }

    /// Shallow-merges `update` over the current configuration.
    ///
    /// # Errors
    ///
    /// Leaves the current configuration untouched if the merged result is
    /// invalid.
    pub fn update_config(&self, update: ConfigUpdate) -> Result<()> {
        let mut current = self.context.config.current.write();
        let next = current.merged(update);
        next.validate()?;
        *current = next;
        Ok(())
    }

    /// Restores [`initial_config`](ApiClient::initial_config).
    pub fn reset_config(&self) {
        let cell = &self.context.config;
        *cell.current.write() = cell.initial.clone();
    }

    /// Returns a facade addressing `tenant`.
    ///
    /// The view shares this facade's transport and starts from a copy of its
    /// current configuration with `tenant_id` replaced. From then on the two
    /// configurations evolve independently; `self` is not modified.
    pub fn tenant(&self, tenant: impl Into<TenantId>) -> ApiClient {
        let config = self.context.snapshot().with_tenant(tenant);
        ApiClient {
            context: Context {
                config: Arc::new(ConfigCell::new(config)),
                transport: Arc::clone(&self.context.transport),
            },
        }
    }

    /// Tenant the next request from this facade would address.
    pub fn tenant_id(&self) -> Option<TenantId> {
        self.context.snapshot().tenant_id
    }

    /// Executes any command through this facade, whatever it was bound to.
    ///
    /// # Errors
    ///
    /// See [`Command::execute`].
    pub async fn request<T: DeserializeOwned + Validate>(&self, command: Command<T>) -> Result<Option<T>> {
        command.execute_on(&self.context).await
    }
}

/// Payment operations.
#[derive(Debug, Clone)]
pub struct PaymentsApi {
    context: Context,
}

impl PaymentsApi {
    /// Validates `input` and builds the create command.
    ///
    /// # Errors
    ///
    /// Returns every validation issue of `input`; nothing is sent.
    pub fn create(&self, input: CreatePaymentInput) -> std::result::Result<Command<Payment>, ValidationError> {
        let input = input.normalized();
        self.context
            .command_with(Operation::Create, Method::Post, "/payments".to_owned(), &input)
    }

    pub fn get(&self, id: impl Into<PaymentId>) -> Command<Payment> {
        let id = id.into();
        self.context
            .command(Operation::Get, Method::Get, format!("/payments/{id}"))
    }

    /// Builds a partial update; unset fields are omitted from the request.
    ///
    /// # Errors
    ///
    /// Returns every validation issue of `input`; nothing is sent.
    pub fn update(
        &self,
        id: impl Into<PaymentId>,
        input: UpdatePaymentInput,
    ) -> std::result::Result<Command<Payment>, ValidationError> {
        let id = id.into();
        let input = input.normalized();
        self.context
            .command_with(Operation::Update, Method::Patch, format!("/payments/{id}"), &input)
    }

    pub fn delete(&self, id: impl Into<PaymentId>) -> Command<()> {
        let id = id.into();
        self.context
            .command(Operation::Delete, Method::Delete, format!("/payments/{id}"))
    }

    pub fn list(&self) -> ListQuery<PaymentFilters, Payment> {
        ListQuery::new(&self.context, "/payments".to_owned())
    }
}

/// Client (customer) operations.
#[derive(Debug, Clone)]
pub struct ClientsApi {
    context: Context,
}

impl ClientsApi {
    /// # Errors
    ///
    /// Returns every validation issue of `input`; nothing is sent.
    pub fn create(&self, input: CreateClientInput) -> std::result::Result<Command<Client>, ValidationError> {
        self.context
            .command_with(Operation::Create, Method::Post, "/clients".to_owned(), &input)
    }

    pub fn get(&self, id: impl Into<ClientId>) -> Command<Client> {
        let id = id.into();
        self.context
            .command(Operation::Get, Method::Get, format!("/clients/{id}"))
    }

    /// # Errors
    ///
    /// Returns every validation issue of `input`; nothing is sent.
    pub fn update(
        &self,
        id: impl Into<ClientId>,
        input: UpdateClientInput,
    ) -> std::result::Result<Command<Client>, ValidationError> {
        let id = id.into();
        self.context
            .command_with(Operation::Update, Method::Patch, format!("/clients/{id}"), &input)
    }

    pub fn delete(&self, id: impl Into<ClientId>) -> Command<()> {
        let id = id.into();
        self.context
            .command(Operation::Delete, Method::Delete, format!("/clients/{id}"))
    }

    pub fn list(&self) -> ListQuery<ClientFilters, Client> {
        ListQuery::new(&self.context, "/clients".to_owned())
    }

    /// Sub-resources owned by one client.
    pub fn for_client(&self, id: impl Into<ClientId>) -> ClientScope {
        ClientScope {
            context: self.context.clone(),
            client_id: id.into(),
        }
    }
}

/// Namespaces scoped to one client.
#[derive(Debug, Clone)]
pub struct ClientScope {
    context: Context,
    client_id: ClientId,
}

impl ClientScope {
    pub fn client_id(&self) -> ClientId {
        self.client_id
    }

    pub fn accounts(&self) -> AccountsApi {
        AccountsApi {
            context: self.context.clone(),
            base: format!("/clients/{}/accounts", self.client_id),
        }
    }

    pub fn documents(&self) -> DocumentsApi {
        DocumentsApi {
            context: self.context.clone(),
            base: format!("/clients/{}/documents", self.client_id),
        }
    }
}

/// Account operations of one client.
#[derive(Debug, Clone)]
pub struct AccountsApi {
    context: Context,
    base: String,
}

impl AccountsApi {
    /// # Errors
    ///
    /// Returns every validation issue of `input`; nothing is sent.
    pub fn create(&self, input: CreateAccountInput) -> std::result::Result<Command<Account>, ValidationError> {
        self.context
            .command_with(Operation::Create, Method::Post, self.base.clone(), &input)
    }

    pub fn get(&self, id: impl Into<AccountId>) -> Command<Account> {
        let id = id.into();
        self.context
            .command(Operation::Get, Method::Get, format!("{}/{id}", self.base))
    }

    /// # Errors
    ///
    /// Returns every validation issue of `input`; nothing is sent.
    pub fn update(
        &self,
        id: impl Into<AccountId>,
        input: UpdateAccountInput,
    ) -> std::result::Result<Command<Account>, ValidationError> {
        let id = id.into();
        self.context.command_with(
            Operation::Update,
            Method::Patch,
            format!("{}/{id}", self.base),
            &input,
        )
    }

    pub fn delete(&self, id: impl Into<AccountId>) -> Command<()> {
        let id = id.into();
        self.context
            .command(Operation::Delete, Method::Delete, format!("{}/{id}", self.base))
    }

    pub fn list(&self) -> ListQuery<AccountFilters, Account> {
        ListQuery::new(&self.context, self.base.clone())
    }
}

/// Document records of one client.
#[derive(Debug, Clone)]
pub struct DocumentsApi {
    context: Context,
    base: String,
}

impl DocumentsApi {
    /// # Errors
    ///
    /// Returns every validation issue of `input`; nothing is sent.
    pub fn create(&self, input: CreateDocumentInput) -> std::result::Result<Command<Document>, ValidationError> {
        self.context
            .command_with(Operation::Create, Method::Post, self.base.clone(), &input)
    }

    pub fn get(&self, id: impl Into<DocumentId>) -> Command<Document> {
        let id = id.into();
        self.context
            .command(Operation::Get, Method::Get, format!("{}/{id}", self.base))
    }

    pub fn list(&self) -> Command<Vec<Document>> {
        self.context
            .command(Operation::List, Method::Get, self.base.clone())
    }

    pub fn delete(&self, id: impl Into<DocumentId>) -> Command<()> {
        let id = id.into();
        self.context
            .command(Operation::Delete, Method::Delete, format!("{}/{id}", self.base))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    #[derive(Debug)]
    struct Unreachable;

    #[async_trait]
    impl Transport for Unreachable {
        async fn send(&self, _config: &Config, _request: &Request) -> Result<Response> {
            panic!("no request expected");
        }
    }

    fn client() -> ApiClient {
        let config = Config::new("https://api.bank.example").with_tenant("default");
        ApiClient::with_transport(config, Unreachable).unwrap()
    }

    #[test]
    fn paths_follow_resource_layout() {
        let api = client();
        assert_eq!(api.payment().get(42).request().path, "/payments/42");
        assert_eq!(api.payment().delete(42).request().method, Method::Delete);
        assert_eq!(
            api.client().for_client(7).accounts().get(3).request().path,
            "/clients/7/accounts/3"
        );
        assert_eq!(
            api.client().for_client(7).documents().list().request().path,
            "/clients/7/documents"
        );
    }

    #[test]
    fn rejects_invalid_config_at_creation() {
        let error = ApiClient::with_transport(Config::new("nope"), Unreachable).unwrap_err();
        assert!(matches!(error, crate::ClientError::Config(_)));
    }

    #[test]
    fn tenant_view_does_not_touch_parent() {
        let api = client();
        let scoped = api.tenant("t2");
        assert_eq!(scoped.tenant_id(), Some(TenantId::new("t2")));
        assert_eq!(api.tenant_id(), Some(TenantId::new("default")));
    }

    #[test]
    fn tenant_view_mutators_stay_local() {
        let api = client();
        let scoped = api.tenant("t2");

        scoped
            .update_config(ConfigUpdate {
                tenant_id: crate::Patch::Value(TenantId::new("t9")),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(scoped.tenant_id(), Some(TenantId::new("t9")));
        assert_eq!(api.tenant_id(), Some(TenantId::new("default")));

        api.update_config(ConfigUpdate {
            timeout_secs: Some(7),
            ..Default::default()
        })
        .unwrap();
        scoped.reset_config();
        assert_eq!(api.config().timeout_secs, 7);
        assert_eq!(scoped.config().timeout_secs, 30);
        assert_eq!(scoped.tenant_id(), Some(TenantId::new("t2")));
    }

    #[test]
    fn failed_update_keeps_previous_config() {
        let api = client();
        let result = api.update_config(ConfigUpdate {
            timeout_secs: Some(0),
            ..Default::default()
        });
        assert!(result.is_err());
        assert_eq!(api.config(), *api.initial_config());
    }
}
