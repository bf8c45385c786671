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

use bank_api_client::config::{ENV_API_TOKEN, ENV_BASE_URL, ENV_TENANT, ENV_TIMEOUT_SECS};
use bank_api_client::{
    AccountFilters, AccountType, ApiClient, ClientError, ClientFilters, Config, PaymentFilters,
    PaymentRail, PaymentStatus, PaymentType, SortOrder, create_client,
};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::process;
use tracing_subscriber::EnvFilter;

/// Banking API client - query payments, clients and accounts
///
/// Results are printed to stdout as JSON. Set RUST_LOG=debug to trace
/// outgoing requests on stderr.
#[derive(Parser, Debug)]
#[command(name = "bank-api")]
#[command(about = "Command line access to the banking platform API", long_about = None)]
struct Args {
    /// Root URL of the API
    #[arg(long, env = ENV_BASE_URL)]
    base_url: String,

    /// Bearer token
    #[arg(long, env = ENV_API_TOKEN, hide_env_values = true)]
    token: Option<String>,

    /// Tenant to address
    #[arg(long, env = ENV_TENANT)]
    tenant: Option<String>,

    /// Request timeout in seconds
    #[arg(long, env = ENV_TIMEOUT_SECS, default_value_t = 30)]
    timeout_secs: u64,

    #[command(subcommand)]
    command: Resource,
}

#[derive(Subcommand, Debug)]
enum Resource {
    /// Payment operations
    #[command(subcommand)]
    Payments(PaymentsCommand),
    /// Client operations
    #[command(subcommand)]
    Clients(ClientsCommand),
    /// Account operations of a client
    #[command(subcommand)]
    Accounts(AccountsCommand),
}

#[derive(Subcommand, Debug)]
enum PaymentsCommand {
    /// List payments
    List {
        #[arg(long)]
        status: Option<PaymentStatus>,
        #[arg(long)]
        rail: Option<PaymentRail>,
        #[arg(long = "type")]
        payment_type: Option<PaymentType>,
        #[arg(long)]
        currency: Option<String>,
        #[arg(long)]
        recipient_name: Option<String>,
        #[arg(long)]
        sort: Option<SortOrder>,
        #[command(flatten)]
        page: PageArgs,
    },
    /// Show one payment
    Get { id: u64 },
    /// Delete one payment
    Delete { id: u64 },
}

#[derive(Subcommand, Debug)]
enum ClientsCommand {
    /// List clients
    List {
        #[arg(long)]
        name: Option<String>,
        #[command(flatten)]
        page: PageArgs,
    },
    /// Show one client
    Get { id: u64 },
}

#[derive(Subcommand, Debug)]
enum AccountsCommand {
    /// List accounts of a client
    List {
        #[arg(long)]
        client: u64,
        #[arg(long = "type")]
        account_type: Option<AccountType>,
        #[command(flatten)]
        page: PageArgs,
    },
}

#[derive(clap::Args, Debug)]
struct PageArgs {
    #[arg(long)]
    limit: Option<u32>,
    #[arg(long)]
    offset: Option<u32>,
    /// Fetch every record, ignoring --limit and --offset
    #[arg(long)]
    all: bool,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = Config::new(args.base_url).with_timeout_secs(args.timeout_secs);
    config.api_token = args.token;
    config.tenant_id = args.tenant.map(Into::into);

    let client = match create_client(config) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Error creating client: {e}");
            process::exit(1);
        }
    };

    if let Err(e) = run(&client, args.command).await {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

async fn run(client: &ApiClient, resource: Resource) -> Result<(), ClientError> {
    match resource {
        Resource::Payments(PaymentsCommand::List {
            status,
            rail,
            payment_type,
            currency,
            recipient_name,
            sort,
            page,
        }) => {
            let filters = PaymentFilters {
                status,
                payment_rail: rail,
                payment_type,
                currency,
                recipient_name,
                sort_order: sort,
                limit: page.limit,
                offset: page.offset,
                ..Default::default()
            };
            let mut query = client.payment().list().filter(filters);
            if page.all {
                query = query.all();
            }
            print(&query.execute().await?)
        }
        Resource::Payments(PaymentsCommand::Get { id }) => {
            print(&client.payment().get(id).execute().await?)
        }
        Resource::Payments(PaymentsCommand::Delete { id }) => {
            client.payment().delete(id).execute().await?;
            eprintln!("Deleted payment {id}");
            Ok(())
        }
        Resource::Clients(ClientsCommand::List { name, page }) => {
            let filters = ClientFilters {
                display_name: name,
                limit: page.limit,
                offset: page.offset,
                ..Default::default()
            };
            let mut query = client.client().list().filter(filters);
            if page.all {
                query = query.all();
            }
            print(&query.execute().await?)
        }
        Resource::Clients(ClientsCommand::Get { id }) => {
            print(&client.client().get(id).execute().await?)
        }
        Resource::Accounts(AccountsCommand::List {
            client: client_id,
            account_type,
            page,
        }) => {
            let filters = AccountFilters {
                account_type,
                limit: page.limit,
                offset: page.offset,
                ..Default::default()
            };
            let mut query = client
                .client()
                .for_client(client_id)
                .accounts()
                .list()
                .filter(filters);
            if page.all {
                query = query.all();
            }
            print(&query.execute().await?)
        }
    }
}

/// Writes `value` to stdout as pretty JSON; `None` prints `null`.
fn print<T: Serialize>(value: &T) -> Result<(), ClientError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
