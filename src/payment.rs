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

//! Payment records, creation/update inputs and the payment vocabularies.
//!
//! A payment moves through the lifecycle below. The client only carries the
//! status; legality of a transition is decided by the server.
//!
//! ```text
//! DRAFT ─► AML_SCREENING ─┬─► AML_REJECTED
//!                         └─► EXECUTION_SCHEDULED ─► EXECUTION_PROCESSING ─┬─► EXECUTION_SUCCESS
//!                                                                          └─► EXECUTION_FAILURE
//! EXECUTION_SUCCESS | EXECUTION_FAILURE ─► RETURNED | CANCELLED | COMPLIANCE_FAILURE | DELETED
//! ```
//!
//! `UNKNOWN` is a non-terminal catch-all; unrecognized wire statuses decode to it.

use crate::base::{ClientId, PaymentId};
use crate::schema::{
    Issues, Metadata, Patch, Validate, check_country, check_currency, check_not_blank,
    check_not_null, check_positive,
};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

wire_enum! {
    /// Network/channel a payment travels over.
    pub enum PaymentRail {
        Ach => "ACH",
        SameDayAch => "SAMEDAYACH",
        Wire => "WIRE",
        Swift => "SWIFT",
        Internal => "INTERNAL",
        FxPay => "FXPAY",
        Card => "CARD",
    }
}

wire_enum! {
    /// Direction of a payment from the account holder's point of view.
    pub enum PaymentType {
        Credit => "CREDIT",
        Debit => "DEBIT",
    }
}

wire_enum! {
    /// Lifecycle state of a payment.
    pub enum PaymentStatus {
        Draft => "DRAFT",
        AmlScreening => "AML_SCREENING",
        AmlRejected => "AML_REJECTED",
        ExecutionScheduled => "EXECUTION_SCHEDULED",
        ExecutionProcessing => "EXECUTION_PROCESSING",
        ExecutionSuccess => "EXECUTION_SUCCESS",
        ExecutionFailure => "EXECUTION_FAILURE",
        Returned => "RETURNED",
        Cancelled => "CANCELLED",
        ComplianceFailure => "COMPLIANCE_FAILURE",
        Deleted => "DELETED",
        #[serde(other)]
        Unknown => "UNKNOWN",
    }
}

wire_enum! {
    /// Who pays the transfer charges on cross-border payments.
    pub enum ChargeBearer {
        /// Debtor pays all charges.
        Our => "OUR",
        /// Creditor pays all charges.
        Ben => "BEN",
        /// Charges are shared.
        Sha => "SHA",
    }
}

impl PaymentStatus {
    /// True for states no further transition leaves.
    ///
    /// `EXECUTION_FAILURE` counts as terminal even though an external retry
    /// may re-submit the payment.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::AmlRejected
                | Self::ExecutionFailure
                | Self::Returned
                | Self::Cancelled
                | Self::ComplianceFailure
                | Self::Deleted
        )
    }

    /// Advisory transition table. The client never enforces it.
    pub fn can_transition_to(self, next: PaymentStatus) -> bool {
        use PaymentStatus::*;

        if next == Unknown || self == Unknown {
            return true;
        }
        match self {
            Draft => matches!(next, AmlScreening),
            AmlScreening => matches!(next, AmlRejected | ExecutionScheduled),
            ExecutionScheduled => matches!(next, ExecutionProcessing),
            ExecutionProcessing => matches!(next, ExecutionSuccess | ExecutionFailure),
            ExecutionSuccess | ExecutionFailure => {
                matches!(next, Returned | Cancelled | ComplianceFailure | Deleted)
            }
            AmlRejected | Returned | Cancelled | ComplianceFailure | Deleted => false,
            Unknown => true,
        }
    }
}

/// Postal address of a party.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    /// ISO 3166-1 alpha-2 code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

impl Validate for Address {
    fn validate(&self, issues: &mut Issues) {
        if let Some(country) = &self.country {
            check_country(issues, "country", country);
        }
    }
}

/// Originator or recipient on a payment record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Party {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank_routing_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
}

impl Validate for Party {
    fn validate(&self, issues: &mut Issues) {
        issues.validate_nested("address", &self.address);
    }
}

/// Currency descriptor attached to a payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyData {
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decimal_places: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_symbol: Option<String>,
}

impl Validate for CurrencyData {
    fn validate(&self, issues: &mut Issues) {
        check_currency(issues, "code", &self.code);
    }
}

/// A payment as stored by the platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: PaymentId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<ClientId>,
    pub amount: Decimal,
    pub currency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency_data: Option<CurrencyData>,
    pub recipient: Party,
    pub originator: Party,
    pub payment_rail: PaymentRail,
    pub payment_type: PaymentType,
    pub status: PaymentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    /// Rail-specific passthrough; see [`Metadata`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_rail_meta_data: Option<Metadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub executed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Validate for Payment {
    fn validate(&self, issues: &mut Issues) {
        if self.amount < Decimal::ZERO {
            issues.push("amount", "must not be negative");
        }
        check_currency(issues, "currency", &self.currency);
        if let Some(data) = &self.currency_data {
            issues.validate_nested("currencyData", data);
            if data.code != self.currency {
                issues.push(
                    "currencyData.code",
                    format!("`{}` does not match currency `{}`", data.code, self.currency),
                );
            }
        }
        issues.validate_nested("recipient", &self.recipient);
        issues.validate_nested("originator", &self.originator);
    }
}

/// Financial institution servicing a party's account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Agent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// BIC, ABA routing number or sort code, depending on the rail.
    pub identifier: String,
}

/// Debtor or creditor on a payment that is about to be created.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentParty {
    pub name: String,
    /// Account number or IBAN.
    pub identifier: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent: Option<Agent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
}

impl PaymentParty {
    fn country(&self) -> Option<&str> {
        self.address.as_ref()?.country.as_deref()
    }
}

impl Validate for PaymentParty {
    fn validate(&self, issues: &mut Issues) {
        check_not_blank(issues, "name", &self.name);
        check_not_blank(issues, "identifier", &self.identifier);
        if let Some(agent) = &self.agent {
            issues.nested("agent", |issues| {
                check_not_blank(issues, "identifier", &agent.identifier);
            });
        }
        issues.validate_nested("address", &self.address);
    }
}

/// Pre-creation view of a payment.
///
/// Consumed by [`PaymentsApi::create`](crate::PaymentsApi::create). The only
/// transformation applied before submission is currency normalization
/// (trimmed, upper-cased); optional fields left unset stay absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentInput {
    pub amount: Decimal,
    pub currency: String,
    pub payment_rail: PaymentRail,
    pub payment_type: PaymentType,
    pub debtor: PaymentParty,
    pub creditor: PaymentParty,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exchange_rate: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub charge_bearer: Option<ChargeBearer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_rail_meta_data: Option<Metadata>,
}

impl CreatePaymentInput {
    /// Starts an input with the required fields; everything optional is unset.
    pub fn new(
        amount: Decimal,
        currency: impl Into<String>,
        payment_rail: PaymentRail,
        payment_type: PaymentType,
        debtor: PaymentParty,
        creditor: PaymentParty,
    ) -> Self {
        Self {
            amount,
            currency: currency.into(),
            payment_rail,
            payment_type,
            debtor,
            creditor,
            correlation_id: None,
            external_id: None,
            exchange_rate: None,
            charge_bearer: None,
            value_date: None,
            execution_date: None,
            reference: None,
            payment_rail_meta_data: None,
        }
    }

    pub(crate) fn normalized(mut self) -> Self {
        self.currency = self.currency.trim().to_ascii_uppercase();
        self
    }
}

impl Validate for CreatePaymentInput {
    fn validate(&self, issues: &mut Issues) {
        check_positive(issues, "amount", self.amount);
        check_currency(issues, "currency", &self.currency);
        if let Some(rate) = self.exchange_rate {
            check_positive(issues, "exchangeRate", rate);
        }
        issues.validate_nested("debtor", &self.debtor);
        issues.validate_nested("creditor", &self.creditor);
        if self.debtor.country().is_none() && self.creditor.country().is_none() {
            issues.push(
                "debtor.address.country",
                "debtor or creditor must carry country information",
            );
        }
    }
}

/// Partial patch for an existing payment.
///
/// Unset fields are omitted from the request so the server keeps their
/// stored values; see [`Patch`]. A provided currency is normalized the same
/// way as on creation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePaymentInput {
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub amount: Patch<Decimal>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub currency: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub status: Patch<PaymentStatus>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub payment_rail: Patch<PaymentRail>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub payment_type: Patch<PaymentType>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub correlation_id: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub external_id: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub reference: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub recipient: Patch<Party>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub originator: Patch<Party>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub payment_rail_meta_data: Patch<Metadata>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub executed_at: Patch<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub error_code: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub error_message: Patch<String>,
}

impl UpdatePaymentInput {
    pub(crate) fn normalized(mut self) -> Self {
        if let Patch::Value(currency) = &mut self.currency {
            *currency = currency.trim().to_ascii_uppercase();
        }
        self
    }
}

impl Validate for UpdatePaymentInput {
    fn validate(&self, issues: &mut Issues) {
        check_not_null(issues, "amount", &self.amount);
        check_not_null(issues, "currency", &self.currency);
        check_not_null(issues, "status", &self.status);
        check_not_null(issues, "paymentRail", &self.payment_rail);
        check_not_null(issues, "paymentType", &self.payment_type);

        if let Some(amount) = self.amount.value() {
            check_positive(issues, "amount", *amount);
        }
        if let Some(currency) = self.currency.value() {
            check_currency(issues, "currency", currency);
        }
        if let Some(recipient) = self.recipient.value() {
            issues.validate_nested("recipient", recipient);
        }
        if let Some(originator) = self.originator.value() {
            issues.validate_nested("originator", originator);
        }
    }
}

/// One page of a list result plus the total matching the filters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub total_filtered_records: u64,
    pub page_items: Vec<T>,
}

impl<T: Validate> Validate for Page<T> {
    fn validate(&self, issues: &mut Issues) {
        issues.validate_nested("pageItems", &self.page_items);
    }
}

/// Result of listing payments.
pub type PaymentResponse = Page<Payment>;
