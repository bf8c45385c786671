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

//! Configuration changes racing with in-flight dispatches.
//!
//! Each dispatch takes one snapshot of the configuration, so a request
//! never observes half of an update.

mod common;

use bank_api_client::{ApiClient, Config, ConfigUpdate, Patch, TenantId};
use common::RecordingTransport;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

fn config_a() -> Config {
    Config::new("https://a.bank.example")
        .with_token("token-a")
        .with_tenant("tenant-a")
}

fn update_b() -> ConfigUpdate {
    ConfigUpdate {
        base_url: Some("https://b.bank.example".into()),
        api_token: Patch::Value("token-b".into()),
        tenant_id: Patch::Value(TenantId::new("tenant-b")),
        ..Default::default()
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn dispatch_never_sees_torn_config() {
    let transport = RecordingTransport::new();
    let client = ApiClient::with_transport(config_a(), transport.clone()).unwrap();
    let done = Arc::new(AtomicBool::new(false));

    let flipper = {
        let client = client.clone();
        let done = Arc::clone(&done);
        tokio::spawn(async move {
            let mut flip = false;
            while !done.load(Ordering::Relaxed) {
                if flip {
                    client.reset_config();
                } else {
                    client.update_config(update_b()).unwrap();
                }
                flip = !flip;
                tokio::task::yield_now().await;
            }
        })
    };

    let workers: Vec<_> = (0..8u64)
        .map(|worker| {
            let client = client.clone();
            tokio::spawn(async move {
                for i in 0..50u64 {
                    client.payment().get(worker * 100 + i).execute().await.unwrap();
                }
            })
        })
        .collect();
    for worker in workers {
        worker.await.unwrap();
    }
    done.store(true, Ordering::Relaxed);
    flipper.await.unwrap();

    let configs = transport.configs();
    let requests = transport.requests();
    assert_eq!(configs.len(), 400);

    for (config, request) in configs.iter().zip(&requests) {
        let suffix = if config.base_url.contains("://a.") { "a" } else { "b" };
        assert_eq!(config.api_token.as_deref(), Some(format!("token-{suffix}").as_str()));
        assert_eq!(request.tenant, Some(TenantId::new(format!("tenant-{suffix}"))));
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn tenant_views_dispatch_concurrently() {
    let transport = RecordingTransport::new();
    let client = ApiClient::with_transport(config_a(), transport.clone()).unwrap();

    let tasks: Vec<_> = ["t1", "t2", "t3"]
        .into_iter()
        .map(|tenant| {
            let view = client.tenant(tenant);
            tokio::spawn(async move {
                for id in 0..20u64 {
                    view.payment().delete(id).execute().await.unwrap();
                }
            })
        })
        .collect();
    for task in tasks {
        task.await.unwrap();
    }

    let requests = transport.requests();
    assert_eq!(requests.len(), 60);
    for tenant in ["t1", "t2", "t3"] {
        let count = requests
            .iter()
            .filter(|request| request.tenant == Some(TenantId::new(tenant)))
            .count();
        assert_eq!(count, 20);
    }
    assert_eq!(client.tenant_id(), Some(TenantId::new("tenant-a")));
}
