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

//! Core identifier types for platform resources and tenants.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! numeric_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(id: u64) -> Self {
                $name(id)
            }
        }
    };
}

numeric_id!(
    /// Server-assigned identifier of a payment.
    PaymentId
);

numeric_id!(
    /// Server-assigned identifier of a client (customer) record.
    ClientId
);

numeric_id!(
    /// Identifier of an account owned by a client.
    AccountId
);

numeric_id!(
    /// Identifier of a document record attached to a client.
    DocumentId
);

/// Identifier of an isolated customer/organization context.
///
/// Every request is addressed to exactly one tenant, either explicitly via
/// [`ApiClient::tenant`](crate::ApiClient::tenant) or through the default in
/// [`Config`](crate::Config).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(transparent)]
pub struct TenantId(String);

impl TenantId {
    pub fn new(id: impl Into<String>) -> Self {
        TenantId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TenantId {
    fn from(id: &str) -> Self {
        TenantId(id.to_owned())
    }
}

impl From<String> for TenantId {
    fn from(id: String) -> Self {
        TenantId(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_serialize_transparently() {
        assert_eq!(serde_json::to_string(&PaymentId(42)).unwrap(), "42");
        assert_eq!(serde_json::to_string(&TenantId::new("t2")).unwrap(), "\"t2\"");

        let id: AccountId = serde_json::from_str("7").unwrap();
        assert_eq!(id, AccountId(7));
    }

    #[test]
    fn ids_display_their_value() {
        assert_eq!(ClientId(9).to_string(), "9");
        assert_eq!(DocumentId::from(3).to_string(), "3");
        assert_eq!(TenantId::from("default").to_string(), "default");
    }
}
