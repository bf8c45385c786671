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

//! Client accounts.
//!
//! An account's lifecycle is reported as a set of boolean flags rather than a
//! single enum, mirroring how the platform exposes it. Exactly which flag
//! combinations occur is up to the server; the client only rejects records
//! that claim to be active and closed at once.
//!
//! # Example
//!
//! ```
//! use bank_api_client::{Account, Validate};
//!
//! let account: Account = serde_json::from_value(serde_json::json!({
//!     "id": 11,
//!     "accountNo": "000000011",
//!     "clientId": 7,
//!     "accountType": "SAVINGS",
//!     "status": { "active": true },
//!     "summary": { "currency": { "code": "USD" }, "accountBalance": "250.00" }
//! }))
//! .unwrap();
//!
//! assert!(account.check().is_ok());
//! assert!(account.is_operational());
//! ```

use crate::base::{AccountId, ClientId};
use crate::payment::CurrencyData;
use crate::schema::{Issues, Patch, Validate, check_currency, check_not_blank};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

wire_enum! {
    /// Kind of deposit account.
    pub enum AccountType {
        Checking => "CHECKING",
        Savings => "SAVINGS",
    }
}

/// Lifecycle flags of an account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AccountStatus {
    pub submitted_and_pending_approval: bool,
    pub approved: bool,
    pub rejected: bool,
    pub withdrawn_by_applicant: bool,
    pub active: bool,
    pub closed: bool,
    pub pre_mature_closure: bool,
    pub transfer_in_progress: bool,
    pub transfer_on_hold: bool,
    pub matured: bool,
}

/// Restrictions layered on top of the lifecycle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AccountSubStatus {
    pub inactive: bool,
    pub dormant: bool,
    pub escheat: bool,
    pub block: bool,
    pub block_credit: bool,
    pub block_debit: bool,
}

impl AccountSubStatus {
    /// True if any debit or credit restriction applies.
    pub fn is_blocked(&self) -> bool {
        self.block || self.block_credit || self.block_debit
    }
}

/// Balances and running totals of an account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSummary {
    pub currency: CurrencyData,
    #[serde(default)]
    pub account_balance: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available_balance: Option<Decimal>,
    #[serde(default)]
    pub total_deposits: Decimal,
    #[serde(default)]
    pub total_withdrawals: Decimal,
    #[serde(default)]
    pub total_interest_earned: Decimal,
    #[serde(default)]
    pub total_fee_charge: Decimal,
}

impl Validate for AccountSummary {
    fn validate(&self, issues: &mut Issues) {
        issues.validate_nested("currency", &self.currency);
        if let Some(available) = self.available_balance
            && available > self.account_balance
        {
            issues.push("availableBalance", "must not exceed accountBalance");
        }
    }
}

/// A deposit account owned by a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: AccountId,
    pub account_no: String,
    pub client_id: ClientId,
    pub account_type: AccountType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    pub status: AccountStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_status: Option<AccountSubStatus>,
    pub summary: AccountSummary,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nominal_annual_interest_rate: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activated_on: Option<NaiveDate>,
}

impl Account {
    /// Active, not closed, and free of blocks.
    pub fn is_operational(&self) -> bool {
        self.status.active
            && !self.status.closed
            && !self.sub_status.as_ref().is_some_and(AccountSubStatus::is_blocked)
    }

    pub fn is_dormant(&self) -> bool {
        self.sub_status.as_ref().is_some_and(|s| s.dormant)
    }

    pub fn balance(&self) -> Decimal {
        self.summary.account_balance
    }
}

impl Validate for Account {
    fn validate(&self, issues: &mut Issues) {
        check_not_blank(issues, "accountNo", &self.account_no);
        if self.status.active && self.status.closed {
            issues.push("status", "account cannot be both active and closed");
        }
        issues.validate_nested("summary", &self.summary);
    }
}

/// Request to open a new account for a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountInput {
    pub product_id: u64,
    pub account_type: AccountType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted_on_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nominal_annual_interest_rate: Option<Decimal>,
}

impl CreateAccountInput {
    pub fn new(product_id: u64, account_type: AccountType) -> Self {
        Self {
            product_id,
            account_type,
            currency: None,
            external_id: None,
            submitted_on_date: None,
            nominal_annual_interest_rate: None,
        }
    }
}

impl Validate for CreateAccountInput {
    fn validate(&self, issues: &mut Issues) {
        if let Some(currency) = &self.currency {
            check_currency(issues, "currency", currency);
        }
        if let Some(rate) = self.nominal_annual_interest_rate
            && rate < Decimal::ZERO
        {
            issues.push("nominalAnnualInterestRate", "must not be negative");
        }
    }
}

/// Partial patch for an account.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAccountInput {
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub external_id: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub product_id: Patch<u64>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub nominal_annual_interest_rate: Patch<Decimal>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub sub_status: Patch<AccountSubStatus>,
}

impl Validate for UpdateAccountInput {
    fn validate(&self, issues: &mut Issues) {
        if self.product_id.is_null() {
            issues.push("productId", "cannot be cleared");
        }
        if let Some(rate) = self.nominal_annual_interest_rate.value()
            && *rate < Decimal::ZERO
        {
            issues.push("nominalAnnualInterestRate", "must not be negative");
        }
    }
}
