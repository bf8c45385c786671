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

//! Fluent list queries.
//!
//! [`ListQuery`] is persistent: every chain method borrows the current value
//! and returns a new one, so a partially built query can serve as a template
//! for several branches without cross-contamination:
//!
//! ```no_run
//! # use bank_api_client::{Config, PaymentFilters, PaymentStatus, create_client};
//! # async fn example() -> bank_api_client::Result<()> {
//! let client = create_client(Config::new("https://api.bank.example"))?;
//! let drafts = client.payment().list().filter(PaymentFilters {
//!     status: Some(PaymentStatus::Draft),
//!     ..Default::default()
//! });
//!
//! let first_page = drafts.limit(10).offset(0).execute().await?;
//! let everything = drafts.all().execute().await?;
//! # Ok(())
//! # }
//! ```
//!
//! `.all()` bypasses pagination and takes precedence over `.limit()` and
//! `.offset()` no matter where it appears in the chain.

use crate::api::Context;
use crate::command::{Command, Operation};
use crate::error::{Result, ValidationError};
use crate::filters::Filters;
use crate::payment::Page;
use crate::schema::Validate;
use crate::transport::{Method, Request};
use serde::de::DeserializeOwned;
use std::fmt;
use std::marker::PhantomData;
use tokio_util::sync::CancellationToken;

/// Accumulated list intent over filter set `F`, yielding pages of `T`.
#[must_use = "a query does nothing until executed"]
pub struct ListQuery<F, T> {
    context: Context,
    path: String,
    filters: F,
    all: bool,
    _output: PhantomData<fn() -> T>,
}

impl<F: Clone, T> Clone for ListQuery<F, T> {
    fn clone(&self) -> Self {
        Self {
            context: self.context.clone(),
            path: self.path.clone(),
            filters: self.filters.clone(),
            all: self.all,
            _output: PhantomData,
        }
    }
}

impl<F: fmt::Debug, T> fmt::Debug for ListQuery<F, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListQuery")
            .field("path", &self.path)
            .field("filters", &self.filters)
            .field("all", &self.all)
            .finish()
    }
}

impl<F: Filters, T> ListQuery<F, T> {
    /// Seeds a query with no filters.
    pub(crate) fn new(context: &Context, path: String) -> Self {
        Self {
            context: context.clone(),
            path,
            filters: F::default(),
            all: false,
            _output: PhantomData,
        }
    }

    /// Merges `filters` into the accumulated set; last write wins per key.
    pub fn filter(&self, filters: F) -> Self {
        let mut next = self.clone();
        next.filters.merge(filters);
        next
    }

    pub fn limit(&self, limit: u32) -> Self {
        let mut next = self.clone();
        next.filters.set_limit(limit);
        next
    }

    pub fn offset(&self, offset: u32) -> Self {
        let mut next = self.clone();
        next.filters.set_offset(offset);
        next
    }

    /// Fetches everything in one unpaginated request.
    pub fn all(&self) -> Self {
        let mut next = self.clone();
        next.all = true;
        next
    }

    pub fn is_all(&self) -> bool {
        self.all
    }

    /// The filter set that will be sent, after applying `.all()`.
    pub fn filters(&self) -> F {
        let mut filters = self.filters.clone();
        if self.all {
            filters.clear_pagination();
        }
        filters
    }

    /// Finalizes the accumulated intent into a single list command.
    ///
    /// # Errors
    ///
    /// Returns the filter set's validation issues.
    pub fn to_command(&self) -> std::result::Result<Command<Page<T>>, ValidationError> {
        let filters = self.filters();
        filters.check()?;

        let mut request = Request::new(Method::Get, self.path.clone());
        request.query = filters.to_query();
        Ok(Command::bound(&self.context, Operation::List, request))
    }
}

impl<F: Filters, T: DeserializeOwned + Validate> ListQuery<F, T> {
    /// Finalizes and sends the query.
    ///
    /// # Errors
    ///
    /// Filter validation errors are returned before anything is sent; see
    /// [`Command::execute`] for the rest.
    pub async fn execute(&self) -> Result<Option<Page<T>>> {
        self.to_command()?.execute().await
    }

    pub async fn execute_with_cancel(&self, token: &CancellationToken) -> Result<Option<Page<T>>> {
        self.to_command()?.execute_with_cancel(token).await
    }
}
