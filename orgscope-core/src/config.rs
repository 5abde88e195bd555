use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{
    copy_remote_write_configs, generate_tenant_remote_write_configs, RemoteWriteConfig, TenantId,
};

/// Remote-write section of the storage configuration. A single value is
/// shared by every tenant and never mutated when scoped.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub remote_write: Vec<RemoteWriteConfig>,

    #[serde(default = "default_flush_deadline_secs")]
    pub remote_write_flush_deadline_secs: u64,

    /// When disabled, destinations are handed out as-is. Useful for backends
    /// that aren't multi-tenant.
    #[serde(default = "default_add_org_id_header")]
    pub remote_write_add_org_id_header: bool,
}

fn default_flush_deadline_secs() -> u64 {
    60
}

fn default_add_org_id_header() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            remote_write: Vec::new(),
            remote_write_flush_deadline_secs: default_flush_deadline_secs(),
            remote_write_add_org_id_header: default_add_org_id_header(),
        }
    }
}

impl Config {
    pub fn register_remote_write(mut self, config: RemoteWriteConfig) -> Self {
        self.remote_write.push(config);

        self
    }

    pub fn add_org_id_header(self, enabled: bool) -> Self {
        Self {
            remote_write_add_org_id_header: enabled,
            ..self
        }
    }

    pub fn flush_deadline(self, deadline: Duration) -> Self {
        Self {
            remote_write_flush_deadline_secs: deadline.as_secs(),
            ..self
        }
    }

    pub fn remote_write_flush_deadline(&self) -> Duration {
        Duration::from_secs(self.remote_write_flush_deadline_secs)
    }

    /// Remote-write destinations `tenant` owns exclusively.
    pub fn remote_write_configs_for(&self, tenant: &TenantId) -> Vec<RemoteWriteConfig> {
        if self.remote_write_add_org_id_header {
            return generate_tenant_remote_write_configs(&self.remote_write, tenant);
        }

        copy_remote_write_configs(&self.remote_write)
    }
}
