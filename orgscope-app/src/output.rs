use std::collections::BTreeMap;

use orgscope_core::{config::Config, RemoteWriteConfig, Secret, TenantId};
use serde::Serialize;

/// What the CLI prints: the remote_write destinations of every tenant, with
/// credentials redacted.
#[derive(Serialize, Debug)]
pub struct Output {
    pub remote_write_flush_deadline_secs: u64,
    pub tenants: BTreeMap<String, Vec<RemoteWriteConfig>>,
}

impl Output {
    pub fn build(config: &Config, tenants: &[TenantId]) -> Self {
        let mut scoped = BTreeMap::new();

        for tenant in tenants {
            let configs = config
                .remote_write_configs_for(tenant)
                .into_iter()
                .map(redact)
                .collect();

            scoped.insert(tenant.to_string(), configs);
        }

        Self {
            remote_write_flush_deadline_secs: config.remote_write_flush_deadline().as_secs(),
            tenants: scoped,
        }
    }
}

fn redact(mut config: RemoteWriteConfig) -> RemoteWriteConfig {
    if let Some(token) = config.client.bearer_token.as_mut() {
        *token = Secret::redacted();
    }

    if let Some(auth) = config.client.basic_auth.as_mut() {
        auth.password = Secret::redacted();
    }

    config
}
