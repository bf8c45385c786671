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

//! Client (customer) records.

use crate::base::ClientId;
use crate::schema::{Issues, Patch, Validate, check_not_blank};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

wire_enum! {
    /// Whether a client is a natural person or an organization.
    pub enum LegalForm {
        Person => "PERSON",
        Entity => "ENTITY",
    }
}

/// A client as stored by the platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: ClientId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_no: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub firstname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lastname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fullname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legal_form: Option<LegalForm>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile_no: Option<String>,
    #[serde(default)]
    pub active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activation_date: Option<NaiveDate>,
}

impl Validate for Client {
    fn validate(&self, issues: &mut Issues) {
        check_not_blank(issues, "displayName", &self.display_name);
    }
}

/// Request to register a new client.
///
/// Persons are named by `firstname` + `lastname`, entities by `fullname`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateClientInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legal_form: Option<LegalForm>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub firstname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lastname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fullname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile_no: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activation_date: Option<NaiveDate>,
}

impl CreateClientInput {
    pub fn person(firstname: impl Into<String>, lastname: impl Into<String>) -> Self {
        Self {
            legal_form: Some(LegalForm::Person),
            firstname: Some(firstname.into()),
            lastname: Some(lastname.into()),
            ..Default::default()
        }
    }

    pub fn entity(fullname: impl Into<String>) -> Self {
        Self {
            legal_form: Some(LegalForm::Entity),
            fullname: Some(fullname.into()),
            ..Default::default()
        }
    }
}

fn check_email(issues: &mut Issues, field: &str, email: &str) {
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => {}
        _ => issues.push(field, format!("`{email}` is not an email address")),
    }
}

impl Validate for CreateClientInput {
    fn validate(&self, issues: &mut Issues) {
        match self.legal_form {
            Some(LegalForm::Entity) => match &self.fullname {
                Some(name) => check_not_blank(issues, "fullname", name),
                None => issues.push("fullname", "required for entities"),
            },
            Some(LegalForm::Person) | None => {
                for (field, value) in [("firstname", &self.firstname), ("lastname", &self.lastname)]
                {
                    match value {
                        Some(name) => check_not_blank(issues, field, name),
                        None => issues.push(field, "required for persons"),
                    }
                }
            }
        }
        if let Some(email) = &self.email_address {
            check_email(issues, "emailAddress", email);
        }
        if self.activation_date.is_some() && self.active == Some(false) {
            issues.push("activationDate", "only allowed when active");
        }
    }
}

/// Partial patch for a client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateClientInput {
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub firstname: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub lastname: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub fullname: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub external_id: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub email_address: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub mobile_no: Patch<String>,
}

impl Validate for UpdateClientInput {
    fn validate(&self, issues: &mut Issues) {
        if let Some(email) = self.email_address.value() {
            check_email(issues, "emailAddress", email);
        }
    }
}
