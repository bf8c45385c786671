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

//! Schema validation layer.
//!
//! Values move through two stages: serde checks the *shape* (types, required
//! fields, enum spellings) and [`Validate`] checks the *refinements* that a
//! type system cannot express (positive amounts, agreeing currency codes,
//! country information on at least one party). Both stages report
//! [`FieldIssue`]s so callers see every offending path at once.
//!
//! Validation is local: nothing in this module performs I/O, and commands
//! run it before a request is handed to a transport.

use crate::error::{FieldIssue, ValidationError};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use serde_path_to_error::Segment;

/// Opaque, rail-specific metadata.
///
/// Only checked for being a JSON object; contents pass through untouched.
pub type Metadata = serde_json::Map<String, Value>;

/// Types that carry refinements beyond their serde shape.
pub trait Validate {
    /// Reports every violated refinement into `issues`.
    fn validate(&self, issues: &mut Issues);

    /// Runs [`validate`](Validate::validate) from the document root.
    fn check(&self) -> Result<(), ValidationError> {
        let mut issues = Issues::new();
        self.validate(&mut issues);
        issues.finish()
    }
}

impl Validate for () {
    fn validate(&self, _issues: &mut Issues) {}
}

impl Validate for Value {
    fn validate(&self, _issues: &mut Issues) {}
}

impl<T: Validate> Validate for Option<T> {
    fn validate(&self, issues: &mut Issues) {
        if let Some(value) = self {
            value.validate(issues);
        }
    }
}

impl<T: Validate> Validate for Vec<T> {
    fn validate(&self, issues: &mut Issues) {
        for (i, item) in self.iter().enumerate() {
            issues.validate_nested(&format!("[{i}]"), item);
        }
    }
}

/// Collects field issues while tracking the current path.
#[derive(Debug, Default)]
pub struct Issues {
    prefix: String,
    issues: Vec<FieldIssue>,
}

impl Issues {
    pub fn new() -> Self {
        Self::default()
    }

    fn path(&self, field: &str) -> String {
        if self.prefix.is_empty() {
            field.to_owned()
        } else if field.starts_with('[') {
            format!("{}{field}", self.prefix)
        } else {
            format!("{}.{field}", self.prefix)
        }
    }

    /// Records an issue for `field` relative to the current path.
    pub fn push(&mut self, field: &str, message: impl Into<String>) {
        let path = self.path(field);
        self.issues.push(FieldIssue {
            path,
            message: message.into(),
        });
    }

    /// Runs `f` with `field` appended to the current path.
    pub fn nested(&mut self, field: &str, f: impl FnOnce(&mut Issues)) {
        let inner = self.path(field);
        let outer = std::mem::replace(&mut self.prefix, inner);
        f(self);
        self.prefix = outer;
    }

    pub fn validate_nested<V: Validate + ?Sized>(&mut self, field: &str, value: &V) {
        self.nested(field, |issues| value.validate(issues));
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn finish(self) -> Result<(), ValidationError> {
        if self.issues.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::new(self.issues))
        }
    }
}

/// Deserializes and validates an untyped JSON value.
///
/// # Errors
///
/// Returns every shape or refinement issue found.
pub fn parse<T: DeserializeOwned + Validate>(value: Value) -> Result<T, ValidationError> {
    let parsed: T = serde_path_to_error::deserialize(value).map_err(shape_issue)?;
    parsed.check()?;
    Ok(parsed)
}

/// Like [`parse`], from raw JSON bytes.
///
/// # Errors
///
/// Returns every shape or refinement issue found.
pub fn parse_slice<T: DeserializeOwned + Validate>(bytes: &[u8]) -> Result<T, ValidationError> {
    let mut deserializer = serde_json::Deserializer::from_slice(bytes);
    let parsed: T = serde_path_to_error::deserialize(&mut deserializer).map_err(shape_issue)?;
    deserializer
        .end()
        .map_err(|e| ValidationError::single("$", e.to_string()))?;
    parsed.check()?;
    Ok(parsed)
}

/// Serializes a validated value into the outbound JSON payload.
pub(crate) fn to_payload<T: Serialize>(value: &T) -> Result<Value, ValidationError> {
    serde_json::to_value(value).map_err(|e| ValidationError::single("$", e.to_string()))
}

// Renders the failing location in the same `a.b[0].c` form `Issues` uses.
// A missing field fails at its parent, so its name is appended from the
// message. Errors at the root are reported at `$`.
fn shape_issue(error: serde_path_to_error::Error<serde_json::Error>) -> ValidationError {
    let mut path = String::new();
    for segment in error.path().iter() {
        match segment {
            Segment::Seq { index } => path.push_str(&format!("[{index}]")),
            Segment::Map { key } => push_field(&mut path, key),
            Segment::Enum { variant } => push_field(&mut path, variant),
            _ => push_field(&mut path, "?"),
        }
    }

    let message = error.into_inner().to_string();
    if let Some(field) = message
        .strip_prefix("missing field `")
        .and_then(|rest| rest.split('`').next())
    {
        push_field(&mut path, field);
    }
    if path.is_empty() {
        path.push('$');
    }
    ValidationError::single(path, message)
}

fn push_field(path: &mut String, field: &str) {
    if !path.is_empty() {
        path.push('.');
    }
    path.push_str(field);
}

/// A field of a partial update.
///
/// `Absent` is skipped on the wire (server keeps the stored value), `Null`
/// is sent as JSON `null` (server clears the value), `Value` replaces it.
/// Declare fields as
/// `#[serde(default, skip_serializing_if = "Patch::is_absent")]`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Patch<T> {
    #[default]
    Absent,
    Null,
    Value(T),
}

impl<T> Patch<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Patch::Absent)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Patch::Null)
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Patch::Value(value) => Some(value),
            _ => None,
        }
    }
}

impl<T> From<T> for Patch<T> {
    fn from(value: T) -> Self {
        Patch::Value(value)
    }
}

impl<T: Serialize> Serialize for Patch<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Patch::Value(value) => value.serialize(serializer),
            Patch::Absent | Patch::Null => serializer.serialize_none(),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Patch<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<T>::deserialize(deserializer).map(|value| value.map_or(Patch::Null, Patch::Value))
    }
}

pub(crate) fn check_not_blank(issues: &mut Issues, field: &str, value: &str) {
    if value.trim().is_empty() {
        issues.push(field, "must not be empty");
    }
}

pub(crate) fn check_positive(issues: &mut Issues, field: &str, value: Decimal) {
    if value <= Decimal::ZERO {
        issues.push(field, "must be positive");
    }
}

/// ISO 4217 shape: three upper-case ASCII letters.
pub(crate) fn check_currency(issues: &mut Issues, field: &str, code: &str) {
    if code.len() != 3 || !code.bytes().all(|b| b.is_ascii_uppercase()) {
        issues.push(field, format!("`{code}` is not a 3-letter currency code"));
    }
}

/// ISO 3166-1 alpha-2 shape: two upper-case ASCII letters.
pub(crate) fn check_country(issues: &mut Issues, field: &str, code: &str) {
    if code.len() != 2 || !code.bytes().all(|b| b.is_ascii_uppercase()) {
        issues.push(field, format!("`{code}` is not a 2-letter country code"));
    }
}

pub(crate) fn check_not_null<T>(issues: &mut Issues, field: &str, value: &Patch<T>) {
    if value.is_null() {
        issues.push(field, "cannot be cleared");
    }
}
