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

//! # Bank API Client
//!
//! A typed client for a banking platform: payments, clients, and the
//! accounts and document records that belong to a client.
//!
//! ## Core Components
//!
//! - [`ApiClient`]: Facade bound to one [`Config`]; entry point via [`create_client`]
//! - [`PaymentsApi`], [`ClientsApi`], [`AccountsApi`], [`DocumentsApi`]: Resource namespaces
//! - [`Command`]: Inert description of one operation, sent by `execute()`
//! - [`ListQuery`]: Persistent builder accumulating filters and pagination
//! - [`Validate`] / [`parse`]: Schema validation applied to inputs and responses
//! - [`Transport`]: Seam to the network; [`HttpTransport`] is the default
//!
//! ## Example
//!
//! ```no_run
//! use bank_api_client::{
//!     Address, Config, CreatePaymentInput, PaymentFilters, PaymentParty, PaymentRail,
//!     PaymentStatus, PaymentType, create_client,
//! };
//! use rust_decimal::Decimal;
//!
//! # async fn example() -> bank_api_client::Result<()> {
//! let client = create_client(
//!     Config::new("https://api.bank.example/v1")
//!         .with_token("secret")
//!         .with_tenant("acme"),
//! )?;
//!
//! let debtor = PaymentParty {
//!     name: "Acme Corp".into(),
//!     identifier: "DE89370400440532013000".into(),
//!     address: Some(Address { country: Some("DE".into()), ..Default::default() }),
//!     ..Default::default()
//! };
//! let creditor = PaymentParty {
//!     name: "Globex".into(),
//!     identifier: "FR1420041010050500013M02606".into(),
//!     ..Default::default()
//! };
//!
//! let input = CreatePaymentInput::new(
//!     Decimal::new(12_550, 2),
//!     "EUR",
//!     PaymentRail::Swift,
//!     PaymentType::Credit,
//!     debtor,
//!     creditor,
//! );
//! let payment = client.payment().create(input)?.execute().await?;
//!
//! let drafts = client
//!     .payment()
//!     .list()
//!     .filter(PaymentFilters { status: Some(PaymentStatus::Draft), ..Default::default() })
//!     .limit(10)
//!     .execute()
//!     .await?;
//!
//! // Same transport and credentials, different tenant.
//! let other = client.tenant("globex").payment().get(42).execute().await?;
//! # Ok(())
//! # }
//! ```

#[macro_use]
mod macros;

pub mod account;
mod api;
mod base;
pub mod client;
mod command;
pub mod config;
pub mod document;
pub mod error;
pub mod filters;
pub mod payment;
mod query;
pub mod schema;
pub mod transport;

pub use account::{
    Account, AccountStatus, AccountSubStatus, AccountSummary, AccountType, CreateAccountInput,
    UpdateAccountInput,
};
pub use api::{
    AccountsApi, ApiClient, ClientScope, ClientsApi, DocumentsApi, PaymentsApi, create_client,
};
pub use base::{AccountId, ClientId, DocumentId, PaymentId, TenantId};
pub use client::{Client, CreateClientInput, LegalForm, UpdateClientInput};
pub use command::{Command, Operation};
pub use config::{Config, ConfigUpdate};
pub use document::{CreateDocumentInput, Document};
pub use error::{ClientError, FieldIssue, Result, UnknownVariant, ValidationError};
pub use filters::{
    AccountFilterKey, AccountFilters, ClientFilterKey, ClientFilters, Filters, PaymentFilterKey,
    PaymentFilters, SortOrder,
};
pub use payment::{
    Address, Agent, ChargeBearer, CreatePaymentInput, CurrencyData, Page, Party, Payment,
    PaymentParty, PaymentRail, PaymentResponse, PaymentStatus, PaymentType, UpdatePaymentInput,
};
pub use query::ListQuery;
pub use schema::{Issues, Metadata, Patch, Validate, parse, parse_slice};
pub use transport::{HttpTransport, Method, Request, Response, TENANT_HEADER, Transport};
pub use tokio_util::sync::CancellationToken;
