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

//! Client, account and document endpoints.

mod common;

use bank_api_client::{
    AccountFilters, AccountSubStatus, AccountType, ClientError, ClientId, ClientFilters, CreateAccountInput,
    CreateClientInput, CreateDocumentInput, Method, Patch, TenantId, UpdateAccountInput,
    UpdateClientInput,
};
use common::{account_json, recording_client};
use rust_decimal_macros::dec;
use serde_json::json;

#[tokio::test]
async fn creates_person_client() {
    let (client, transport) = recording_client();
    transport.respond(
        201,
        json!({ "id": 9, "displayName": "Ada Lovelace", "legalForm": "PERSON", "active": true }),
    );

    let mut input = CreateClientInput::person("Ada", "Lovelace");
    input.email_address = Some("ada@example.com".into());
    let created = client.client().create(input).unwrap().execute().await.unwrap().unwrap();

    assert_eq!(created.id, ClientId::from(9));
    assert!(created.active);
    let request = transport.last();
    assert_eq!(request.path, "/clients");
    assert_eq!(
        request.body,
        Some(json!({
            "legalForm": "PERSON",
            "firstname": "Ada",
            "lastname": "Lovelace",
            "emailAddress": "ada@example.com"
        }))
    );
}

#[test]
fn rejects_incomplete_clients() {
    let (client, transport) = recording_client();

    let mut person = CreateClientInput::person("Ada", " ");
    person.active = Some(false);
    person.activation_date = chrono::NaiveDate::from_ymd_opt(2024, 1, 2);
    let error = client.client().create(person).unwrap_err();
    assert!(error.has_issue("lastname"));
    assert!(error.has_issue("activationDate"));

    let mut entity = CreateClientInput::entity("Initech");
    entity.email_address = Some("billing".into());
    let error = client.client().create(entity).unwrap_err();
    assert!(error.has_issue("emailAddress"));

    assert_eq!(transport.count(), 0);
}

#[tokio::test]
async fn client_update_and_list() {
    let (client, transport) = recording_client();
    transport.respond(204, json!(null));
    transport.respond(200, json!({ "totalFilteredRecords": 0, "pageItems": [] }));

    let patch = UpdateClientInput {
        mobile_no: Patch::Null,
        ..Default::default()
    };
    client.client().update(9, patch).unwrap().execute().await.unwrap();
    let page = client
        .client()
        .list()
        .filter(ClientFilters {
            display_name: Some("Ada".into()),
            ..Default::default()
        })
        .limit(25)
        .execute()
        .await
        .unwrap();

    let requests = transport.requests();
    assert_eq!(requests[0].method, Method::Patch);
    assert_eq!(requests[0].path, "/clients/9");
    assert_eq!(requests[0].body, Some(json!({ "mobileNo": null })));
    assert_eq!(requests[1].query_value("displayName"), Some("Ada"));
    assert_eq!(requests[1].query_value("limit"), Some("25"));
    assert_eq!(page.unwrap().total_filtered_records, 0);
}

#[tokio::test]
async fn accounts_are_scoped_to_their_client() {
    let (client, transport) = recording_client();
    transport.respond(200, account_json(3, 9));

    let accounts = client.client().for_client(9).accounts();
    let account = accounts.get(3).execute().await.unwrap().unwrap();

    assert_eq!(transport.last().path, "/clients/9/accounts/3");
    assert_eq!(account.account_no, "000000003");
    assert_eq!(account.account_type, AccountType::Savings);
    assert_eq!(account.balance(), dec!(250.00));
    assert!(account.is_operational());
    assert!(!account.is_dormant());
}

#[tokio::test]
async fn account_create_update_delete() {
    let (client, transport) = recording_client();
    let accounts = client.tenant("t4").client().for_client(9).accounts();

    let mut input = CreateAccountInput::new(1, AccountType::Checking);
    input.currency = Some("USD".into());
    accounts.create(input).unwrap().execute().await.unwrap();

    let patch = UpdateAccountInput {
        sub_status: Patch::Value(AccountSubStatus {
            block_debit: true,
            ..Default::default()
        }),
        ..Default::default()
    };
    accounts.update(3, patch).unwrap().execute().await.unwrap();
    accounts.delete(3).execute().await.unwrap();

    let requests = transport.requests();
    assert_eq!(requests[0].method, Method::Post);
    assert_eq!(requests[0].path, "/clients/9/accounts");
    assert_eq!(
        requests[0].body,
        Some(json!({ "productId": 1, "accountType": "CHECKING", "currency": "USD" }))
    );
    assert_eq!(requests[1].path, "/clients/9/accounts/3");
    assert_eq!(requests[1].body.as_ref().unwrap()["subStatus"]["blockDebit"], true);
    assert_eq!(requests[2].method, Method::Delete);
    assert!(
        requests
            .iter()
            .all(|request| request.tenant == Some(TenantId::new("t4")))
    );
}

#[test]
fn account_update_cannot_clear_product() {
    let (client, _) = recording_client();
    let patch = UpdateAccountInput {
        product_id: Patch::Null,
        nominal_annual_interest_rate: Patch::Value(dec!(-0.5)),
        ..Default::default()
    };

    let error = client.client().for_client(1).accounts().update(2, patch).unwrap_err();
    assert!(error.has_issue("productId"));
    assert!(error.has_issue("nominalAnnualInterestRate"));
}

#[tokio::test]
async fn account_list_uses_filters() {
    let (client, transport) = recording_client();
    transport.respond(
        200,
        json!({ "totalFilteredRecords": 2, "pageItems": [account_json(1, 9), account_json(2, 9)] }),
    );

    let page = client
        .client()
        .for_client(9)
        .accounts()
        .list()
        .filter(AccountFilters {
            account_type: Some(AccountType::Savings),
            ..Default::default()
        })
        .all()
        .execute()
        .await
        .unwrap()
        .unwrap();

    assert_eq!(page.page_items.len(), 2);
    let request = transport.last();
    assert_eq!(request.path, "/clients/9/accounts");
    assert_eq!(
        request.query,
        vec![("accountType".to_string(), "SAVINGS".to_string())]
    );
}

#[tokio::test]
async fn inconsistent_account_is_rejected() {
    let (client, transport) = recording_client();
    let mut account = account_json(3, 9);
    account["status"]["closed"] = json!(true);
    account["summary"]["availableBalance"] = json!("900.00");
    transport.respond(200, json!({ "totalFilteredRecords": 1, "pageItems": [account] }));

    let error = client
        .client()
        .for_client(9)
        .accounts()
        .list()
        .execute()
        .await
        .unwrap_err();

    match error {
        ClientError::InvalidResponse(validation) => {
            assert!(validation.has_issue("pageItems[0].status"));
            assert!(validation.has_issue("pageItems[0].summary.availableBalance"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn documents_round_trip_through_client_scope() {
    let (client, transport) = recording_client();
    transport.respond(
        201,
        json!({ "id": 5, "clientId": 9, "name": "Passport", "fileName": "passport.pdf" }),
    );
    transport.respond(
        200,
        json!([
            { "id": 5, "clientId": 9, "name": "Passport", "fileName": "passport.pdf", "size": 1024 },
            { "id": 6, "clientId": 9, "name": "Utility bill", "fileName": "bill.png" }
        ]),
    );

    let documents = client.client().for_client(9).documents();
    let mut input = CreateDocumentInput::new("Passport", "passport.pdf");
    input.content_type = Some("application/pdf".into());

    let created = documents.create(input).unwrap().execute().await.unwrap().unwrap();
    let listed = documents.list().execute().await.unwrap().unwrap();
    documents.delete(5).execute().await.unwrap();

    assert_eq!(created.file_name, "passport.pdf");
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].size, Some(1024));

    let requests = transport.requests();
    assert_eq!(requests[0].path, "/clients/9/documents");
    assert_eq!(requests[0].body.as_ref().unwrap()["contentType"], "application/pdf");
    assert_eq!(requests[1].method, Method::Get);
    assert_eq!(requests[2].path, "/clients/9/documents/5");
}

#[test]
fn document_names_must_be_plain_files() {
    let (client, _) = recording_client();
    let error = client
        .client()
        .for_client(9)
        .documents()
        .create(CreateDocumentInput::new("", "../etc/passwd"))
        .unwrap_err();

    assert!(error.has_issue("name"));
    assert!(error.has_issue("fileName"));
}
