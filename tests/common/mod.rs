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

//! Shared fixtures: an in-memory transport that records every request and
//! replays queued responses.

#![allow(dead_code)]

use async_trait::async_trait;
use bank_api_client::{
    Address, ApiClient, Config, CreatePaymentInput, PaymentParty, PaymentRail, PaymentType,
    Request, Response, Result, Transport,
};
use parking_lot::Mutex;
use rust_decimal_macros::dec;
use serde_json::{Value, json};
use std::collections::VecDeque;
use std::sync::Arc;

#[derive(Debug, Default)]
struct Recorded {
    exchanges: Vec<(Config, Request)>,
    responses: VecDeque<Response>,
}

/// Records requests; answers with queued responses, then `204 No Content`.
#[derive(Debug, Clone, Default)]
pub struct RecordingTransport {
    inner: Arc<Mutex<Recorded>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, status: u16, body: Value) {
        self.inner.lock().responses.push_back(Response {
            status,
            body: serde_json::to_vec(&body).unwrap(),
        });
    }

    pub fn requests(&self) -> Vec<Request> {
        self.inner
            .lock()
            .exchanges
            .iter()
            .map(|(_, request)| request.clone())
            .collect()
    }

    pub fn configs(&self) -> Vec<Config> {
        self.inner
            .lock()
            .exchanges
            .iter()
            .map(|(config, _)| config.clone())
            .collect()
    }

    pub fn last(&self) -> Request {
        self.requests().pop().expect("no request recorded")
    }

    pub fn count(&self) -> usize {
        self.inner.lock().exchanges.len()
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn send(&self, config: &Config, request: &Request) -> Result<Response> {
        let mut inner = self.inner.lock();
        inner.exchanges.push((config.clone(), request.clone()));
        Ok(inner.responses.pop_front().unwrap_or(Response {
            status: 204,
            body: Vec::new(),
        }))
    }
}

pub fn base_config() -> Config {
    Config::new("https://api.bank.example/v1")
        .with_token("secret")
        .with_tenant("default")
}

pub fn recording_client() -> (ApiClient, RecordingTransport) {
    let transport = RecordingTransport::new();
    let client = ApiClient::with_transport(base_config(), transport.clone()).unwrap();
    (client, transport)
}

pub fn debtor() -> PaymentParty {
    PaymentParty {
        name: "Acme Corp".into(),
        identifier: "DE89370400440532013000".into(),
        address: Some(Address {
            country: Some("DE".into()),
            ..Default::default()
        }),
        ..Default::default()
    }
}

pub fn creditor() -> PaymentParty {
    PaymentParty {
        name: "Globex".into(),
        identifier: "FR1420041010050500013M02606".into(),
        ..Default::default()
    }
}

pub fn create_input() -> CreatePaymentInput {
    CreatePaymentInput::new(
        dec!(125.50),
        "EUR",
        PaymentRail::Swift,
        PaymentType::Credit,
        debtor(),
        creditor(),
    )
}

pub fn payment_json(id: u64, status: &str) -> Value {
    json!({
        "id": id,
        "correlationId": format!("corr-{id}"),
        "amount": "125.50",
        "currency": "EUR",
        "currencyData": { "code": "EUR", "decimalPlaces": 2 },
        "recipient": { "name": "Globex", "accountNumber": "FR1420041010050500013M02606" },
        "originator": {
            "name": "Acme Corp",
            "accountNumber": "DE89370400440532013000",
            "address": { "country": "DE" }
        },
        "paymentRail": "SWIFT",
        "paymentType": "CREDIT",
        "status": status,
        "paymentRailMetaData": { "uetr": "eb6305c9-1f7f-49de-aed0-16487c27b42d" },
        "createdAt": "2024-05-01T10:00:00Z"
    })
}

pub fn account_json(id: u64, client_id: u64) -> Value {
    json!({
        "id": id,
        "accountNo": format!("{id:09}"),
        "clientId": client_id,
        "accountType": "SAVINGS",
        "status": { "active": true, "approved": true },
        "summary": {
            "currency": { "code": "USD" },
            "accountBalance": "250.00",
            "availableBalance": "200.00"
        }
    })
}
