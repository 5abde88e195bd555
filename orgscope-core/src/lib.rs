pub mod config;

use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fmt};

/// Header carrying the tenant identity on every request forwarded to a
/// multi-tenant metrics backend.
pub const ORG_ID_HEADER_NAME: &str = "X-Scope-OrgID";

pub type Headers = HashMap<String, String>;

/// Opaque identifier of the tenant on whose behalf samples are forwarded.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TenantId(String);

impl TenantId {
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(id.as_ref().to_string())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<String> for TenantId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for TenantId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Credential kept out of `Debug` output. It serializes as-is so a
/// configuration can be written back; redact before showing it to anyone.
#[derive(Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl AsRef<str>) -> Self {
        Self(value.as_ref().to_string())
    }

    pub fn expose(&self) -> &str {
        self.0.as_str()
    }

    pub fn redacted() -> Self {
        Self::new("<secret>")
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<secret>")
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct BasicAuth {
    pub username: String,
    pub password: Secret,
}

/// Transport and authentication settings of a remote-write destination. The
/// scoping logic copies them as a whole and never looks inside.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct ClientSettings {
    pub url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default = "default_remote_timeout_secs")]
    pub remote_timeout_secs: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bearer_token: Option<Secret>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub basic_auth: Option<BasicAuth>,

    #[serde(default)]
    pub send_exemplars: bool,
}

fn default_remote_timeout_secs() -> u64 {
    30
}

impl ClientSettings {
    pub fn new(url: impl AsRef<str>) -> Self {
        Self {
            url: url.as_ref().to_string(),
            name: None,
            remote_timeout_secs: default_remote_timeout_secs(),
            bearer_token: None,
            basic_auth: None,
            send_exemplars: false,
        }
    }
}

/// One endpoint samples get forwarded to.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct RemoteWriteConfig {
    #[serde(flatten)]
    pub client: ClientSettings,

    #[serde(default)]
    pub headers: Headers,
}

impl RemoteWriteConfig {
    pub fn new(url: impl AsRef<str>) -> Self {
        Self {
            client: ClientSettings::new(url),
            headers: Headers::new(),
        }
    }

    pub fn header(mut self, key: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        self.headers
            .insert(key.as_ref().to_string(), value.as_ref().to_string());

        self
    }

    /// Copy whose headers live in their own map, so the copy can be mutated
    /// without touching `self`.
    fn detached(&self) -> Self {
        Self {
            client: self.client.clone(),
            headers: copy_headers(&self.headers),
        }
    }
}

/// Returns a freshly allocated map holding every entry of `headers`.
pub fn copy_headers(headers: &Headers) -> Headers {
    let mut copy = Headers::with_capacity(headers.len());

    for (key, value) in headers {
        copy.insert(key.clone(), value.clone());
    }

    copy
}

/// Tells if `key` names the org id header, whatever its casing and the
/// whitespace around it. Casing is compared with Unicode case folding, so
/// `X-ſcope-OrgID` (long s) matches too.
pub fn is_org_id_header(key: &str) -> bool {
    unicase::eq(key.trim(), ORG_ID_HEADER_NAME)
}

/// Copies the remote-write configurations and stamps each copy with the
/// `X-Scope-OrgID` header of `tenant`.
///
/// Any header already in the configuration that could pass for the org id
/// header is discarded first, so a tenant can't forge its identity. `configs`
/// is left untouched.
pub fn generate_tenant_remote_write_configs(
    configs: &[RemoteWriteConfig],
    tenant: &TenantId,
) -> Vec<RemoteWriteConfig> {
    let mut scoped = Vec::with_capacity(configs.len());

    for config in configs {
        let mut clone = config.detached();

        clone.headers.retain(|key, value| {
            if !is_org_id_header(key) {
                return true;
            }

            tracing::warn!(
                key = key.as_str(),
                value = value.as_str(),
                "discarding reserved identity header"
            );

            false
        });

        clone
            .headers
            .insert(ORG_ID_HEADER_NAME.to_string(), tenant.as_str().to_string());

        scoped.push(clone);
    }

    scoped
}

/// Copies the remote-write configurations without touching their headers.
pub fn copy_remote_write_configs(configs: &[RemoteWriteConfig]) -> Vec<RemoteWriteConfig> {
    configs.iter().map(RemoteWriteConfig::detached).collect()
}
