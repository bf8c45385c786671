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

//! Filter sets used to parameterize list queries.
//!
//! Each filter set is a flat bag of optional keys with a matching key enum
//! whose spellings are used verbatim as query parameter names. Every set
//! carries `limit`, `offset` and `sortOrder`.

use crate::account::AccountType;
use crate::base::ClientId;
use crate::payment::{PaymentRail, PaymentStatus, PaymentType};
use crate::schema::{Issues, Validate, check_currency};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

wire_enum! {
    /// Sort direction of list results.
    pub enum SortOrder {
        Asc => "ASC",
        Desc => "DESC",
    }
}

/// Behaviour shared by every filter set.
pub trait Filters: Clone + Default + fmt::Debug + Validate + Send + Sync + 'static {
    /// Closed set of recognized keys.
    type Key: Copy + Eq + fmt::Debug + 'static;

    /// Overlays every key set in `other`; last write wins per key.
    fn merge(&mut self, other: Self);

    fn set_limit(&mut self, limit: u32);

    fn set_offset(&mut self, offset: u32);

    /// Drops `limit` and `offset`.
    fn clear_pagination(&mut self);

    /// Set keys with their rendered values, in key declaration order.
    fn entries(&self) -> Vec<(Self::Key, String)>;

    /// Wire name of a key.
    fn key_name(key: Self::Key) -> &'static str;

    /// Renders the set as query parameters.
    fn to_query(&self) -> Vec<(String, String)> {
        self.entries()
            .into_iter()
            .map(|(key, value)| (Self::key_name(key).to_owned(), value))
            .collect()
    }

    /// Keys currently set.
    fn keys(&self) -> Vec<Self::Key> {
        self.entries().into_iter().map(|(key, _)| key).collect()
    }
}

macro_rules! filter_set {
    (
        $(#[$meta:meta])*
        pub struct $name:ident / $key:ident {
            $( $(#[$fmeta:meta])* $field:ident : $ty:ty => $variant:ident = $wire:literal ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
        pub struct $name {
            $(
                $(#[$fmeta])*
                #[serde(rename = $wire, default, skip_serializing_if = "Option::is_none")]
                pub $field: Option<$ty>,
            )*
            #[serde(default, skip_serializing_if = "Option::is_none")]
            pub limit: Option<u32>,
            #[serde(default, skip_serializing_if = "Option::is_none")]
            pub offset: Option<u32>,
            #[serde(rename = "sortOrder", default, skip_serializing_if = "Option::is_none")]
            pub sort_order: Option<SortOrder>,
        }

        #[doc = concat!("Recognized keys of [`", stringify!($name), "`].")]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $key {
            $( $variant, )*
            Limit,
            Offset,
            SortOrder,
        }

        impl $key {
            /// Every key, in declaration order.
            pub const ALL: &'static [$key] = &[$( $key::$variant, )* $key::Limit, $key::Offset, $key::SortOrder];

            /// Returns the exact wire spelling.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $( $key::$variant => $wire, )*
                    $key::Limit => "limit",
                    $key::Offset => "offset",
                    $key::SortOrder => "sortOrder",
                }
            }
        }

        impl fmt::Display for $key {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Filters for $name {
            type Key = $key;

            fn merge(&mut self, other: Self) {
                $(
                    if other.$field.is_some() {
                        self.$field = other.$field;
                    }
                )*
                if other.limit.is_some() {
                    self.limit = other.limit;
                }
                if other.offset.is_some() {
                    self.offset = other.offset;
                }
                if other.sort_order.is_some() {
                    self.sort_order = other.sort_order;
                }
            }

            fn set_limit(&mut self, limit: u32) {
                self.limit = Some(limit);
            }

            fn set_offset(&mut self, offset: u32) {
                self.offset = Some(offset);
            }

            fn clear_pagination(&mut self) {
                self.limit = None;
                self.offset = None;
            }

            fn entries(&self) -> Vec<($key, String)> {
                let mut entries = Vec::new();
                $(
                    if let Some(value) = &self.$field {
                        entries.push(($key::$variant, value.to_string()));
                    }
                )*
                if let Some(limit) = self.limit {
                    entries.push(($key::Limit, limit.to_string()));
                }
                if let Some(offset) = self.offset {
                    entries.push(($key::Offset, offset.to_string()));
                }
                if let Some(order) = self.sort_order {
                    entries.push(($key::SortOrder, order.to_string()));
                }
                entries
            }

            fn key_name(key: $key) -> &'static str {
                key.as_str()
            }
        }
    };
}

filter_set! {
    /// Filters accepted by the payment list endpoint.
    pub struct PaymentFilters / PaymentFilterKey {
        originator_name: String => OriginatorName = "originatorName",
        originator_account: String => OriginatorAccount = "originatorAccount",
        originator_bank_routing_code: String => OriginatorBankRoutingCode = "originatorBankRoutingCode",
        recipient_name: String => RecipientName = "recipientName",
        recipient_account: String => RecipientAccount = "recipientAccount",
        recipient_bank_routing_code: String => RecipientBankRoutingCode = "recipientBankRoutingCode",
        payment_rail: PaymentRail => PaymentRail = "paymentRail",
        payment_type: PaymentType => PaymentType = "paymentType",
        status: PaymentStatus => Status = "status",
        currency: String => Currency = "currency",
        correlation_id: String => CorrelationId = "correlationId",
        external_id: String => ExternalId = "externalId",
        reference: String => Reference = "reference",
        client_id: ClientId => ClientId = "clientId",
        amount_from: Decimal => AmountFrom = "amountFrom",
        amount_to: Decimal => AmountTo = "amountTo",
        executed_at_from: NaiveDate => ExecutedAtFrom = "executedAtFrom",
        executed_at_to: NaiveDate => ExecutedAtTo = "executedAtTo",
        created_at_from: NaiveDate => CreatedAtFrom = "createdAtFrom",
        created_at_to: NaiveDate => CreatedAtTo = "createdAtTo",
        /// Field to sort by, e.g. `createdAt`.
        order_by: String => OrderBy = "orderBy",
    }
}

filter_set! {
    /// Filters accepted by the client list endpoint.
    pub struct ClientFilters / ClientFilterKey {
        display_name: String => DisplayName = "displayName",
        external_id: String => ExternalId = "externalId",
        email_address: String => EmailAddress = "emailAddress",
        mobile_no: String => MobileNo = "mobileNo",
        order_by: String => OrderBy = "orderBy",
    }
}

filter_set! {
    /// Filters accepted by the account list endpoint of a client.
    pub struct AccountFilters / AccountFilterKey {
        account_type: AccountType => AccountType = "accountType",
        currency: String => Currency = "currency",
        external_id: String => ExternalId = "externalId",
        order_by: String => OrderBy = "orderBy",
    }
}

fn check_limit(issues: &mut Issues, limit: Option<u32>) {
    if limit == Some(0) {
        issues.push("limit", "must be at least 1");
    }
}

fn check_range<T: PartialOrd>(issues: &mut Issues, to_field: &str, from: &Option<T>, to: &Option<T>) {
    if let (Some(from), Some(to)) = (from, to)
        && from > to
    {
        issues.push(to_field, "must not precede the lower bound");
    }
}

impl Validate for PaymentFilters {
    fn validate(&self, issues: &mut Issues) {
        check_limit(issues, self.limit);
        if let Some(currency) = &self.currency {
            check_currency(issues, "currency", currency);
        }
        check_range(issues, "amountTo", &self.amount_from, &self.amount_to);
        check_range(issues, "executedAtTo", &self.executed_at_from, &self.executed_at_to);
        check_range(issues, "createdAtTo", &self.created_at_from, &self.created_at_to);
    }
}

impl Validate for ClientFilters {
    fn validate(&self, issues: &mut Issues) {
        check_limit(issues, self.limit);
    }
}

impl Validate for AccountFilters {
    fn validate(&self, issues: &mut Issues) {
        check_limit(issues, self.limit);
        if let Some(currency) = &self.currency {
            check_currency(issues, "currency", currency);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn payment_filter_vocabulary_has_24_keys() {
        let names: Vec<&str> = PaymentFilterKey::ALL.iter().map(|k| k.as_str()).collect();
        assert_eq!(names.len(), 24);
        assert!(names.contains(&"originatorBankRoutingCode"));
        assert!(names.contains(&"sortOrder"));
        assert_eq!(names.last(), Some(&"sortOrder"));
    }

    #[test]
    fn merge_is_last_write_wins_per_key() {
        let mut filters = PaymentFilters {
            status: Some(PaymentStatus::Draft),
            currency: Some("USD".into()),
            ..Default::default()
        };
        filters.merge(PaymentFilters {
            status: Some(PaymentStatus::Cancelled),
            limit: Some(5),
            ..Default::default()
        });

        assert_eq!(filters.status, Some(PaymentStatus::Cancelled));
        assert_eq!(filters.currency.as_deref(), Some("USD"));
        assert_eq!(filters.limit, Some(5));
    }

    #[test]
    fn query_uses_wire_names_and_values() {
        let filters = PaymentFilters {
            payment_rail: Some(PaymentRail::SameDayAch),
            amount_from: Some(dec!(10.50)),
            created_at_from: NaiveDate::from_ymd_opt(2024, 1, 31),
            sort_order: Some(SortOrder::Desc),
            ..Default::default()
        };

        assert_eq!(
            filters.to_query(),
            vec![
                ("paymentRail".to_owned(), "SAMEDAYACH".to_owned()),
                ("amountFrom".to_owned(), "10.50".to_owned()),
                ("createdAtFrom".to_owned(), "2024-01-31".to_owned()),
                ("sortOrder".to_owned(), "DESC".to_owned()),
            ]
        );
    }

    #[test]
    fn clear_pagination_keeps_other_keys() {
        let mut filters = ClientFilters {
            display_name: Some("Ada".into()),
            limit: Some(10),
            offset: Some(20),
            ..Default::default()
        };
        filters.clear_pagination();
        assert_eq!(filters.keys(), vec![ClientFilterKey::DisplayName]);
    }

    #[test]
    fn rejects_inverted_ranges_and_zero_limit() {
        let filters = PaymentFilters {
            amount_from: Some(dec!(100)),
            amount_to: Some(dec!(1)),
            limit: Some(0),
            ..Default::default()
        };
        let error = filters.check().unwrap_err();
        assert!(error.has_issue("amountTo"));
        assert!(error.has_issue("limit"));
    }

    #[test]
    fn serde_uses_wire_names() {
        let filters = AccountFilters {
            account_type: Some(AccountType::Savings),
            limit: Some(3),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&filters).unwrap(),
            serde_json::json!({ "accountType": "SAVINGS", "limit": 3 })
        );
    }
}
