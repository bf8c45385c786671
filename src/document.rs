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

//! Document records attached to a client (identity proofs, contracts, ...).
//!
//! Only the record is managed here; file contents travel out of band.

use crate::base::{ClientId, DocumentId};
use crate::schema::{Issues, Validate, check_not_blank};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: DocumentId,
    pub client_id: ClientId,
    pub name: String,
    pub file_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Validate for Document {
    fn validate(&self, issues: &mut Issues) {
        check_not_blank(issues, "name", &self.name);
        check_not_blank(issues, "fileName", &self.file_name);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDocumentInput {
    pub name: String,
    pub file_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl CreateDocumentInput {
    pub fn new(name: impl Into<String>, file_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            file_name: file_name.into(),
            content_type: None,
            description: None,
        }
    }
}

impl Validate for CreateDocumentInput {
    fn validate(&self, issues: &mut Issues) {
        check_not_blank(issues, "name", &self.name);
        check_not_blank(issues, "fileName", &self.file_name);
        if self.file_name.contains(['/', '\\']) {
            issues.push("fileName", "must not contain path separators");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_blank_names_and_paths() {
        let input = CreateDocumentInput::new(" ", "../passport.pdf");
        let error = input.check().unwrap_err();
        assert!(error.has_issue("name"));
        assert!(error.has_issue("fileName"));

        assert!(CreateDocumentInput::new("Passport", "passport.pdf").check().is_ok());
    }
}
