use std::path::Path;

use eyre::WrapErr;
use orgscope_core::config::Config;
use toml::{value::Table, Value};

const CONFIG_KEYS: &[&str] = &[
    "remote_write",
    "remote_write_flush_deadline_secs",
    "remote_write_add_org_id_header",
];

const REMOTE_WRITE_KEYS: &[&str] = &[
    "url",
    "name",
    "remote_timeout_secs",
    "bearer_token",
    "basic_auth",
    "send_exemplars",
    "headers",
];

const BASIC_AUTH_KEYS: &[&str] = &["username", "password"];

pub async fn load(path: &Path) -> eyre::Result<Config> {
    let content = tokio::fs::read_to_string(path)
        .await
        .wrap_err_with(|| format!("Error when reading configuration file '{}'", path.display()))?;

    parse(content.as_str())
}

pub fn parse(content: &str) -> eyre::Result<Config> {
    let value: Value = toml::from_str(content).wrap_err("Error when parsing configuration")?;

    for key in unknown_keys(&value) {
        tracing::warn!(key = key.as_str(), "Ignoring unknown configuration key");
    }

    let config: Config = value
        .try_into()
        .wrap_err("Error when parsing configuration")?;

    if config.remote_write.is_empty() {
        tracing::warn!("No remote_write destination configured");
    }

    for (idx, remote_write) in config.remote_write.iter().enumerate() {
        if remote_write.client.url.trim().is_empty() {
            eyre::bail!("remote_write #{} has an empty 'url'", idx);
        }
    }

    Ok(config)
}

/// Dotted paths of the keys serde would silently skip. Header names are free
/// form and never reported.
pub fn unknown_keys(value: &Value) -> Vec<String> {
    let mut unknowns = Vec::new();

    let root = match value.as_table() {
        Some(root) => root,
        None => return unknowns,
    };

    collect_unknown_keys(root, CONFIG_KEYS, "", &mut unknowns);

    let remote_writes = root
        .get("remote_write")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    for (idx, remote_write) in remote_writes.iter().enumerate() {
        let table = match remote_write.as_table() {
            Some(table) => table,
            None => continue,
        };

        let prefix = format!("remote_write[{}].", idx);
        collect_unknown_keys(table, REMOTE_WRITE_KEYS, &prefix, &mut unknowns);

        if let Some(auth) = table.get("basic_auth").and_then(Value::as_table) {
            let prefix = format!("{}basic_auth.", prefix);
            collect_unknown_keys(auth, BASIC_AUTH_KEYS, &prefix, &mut unknowns);
        }
    }

    unknowns
}

fn collect_unknown_keys(
    table: &Table,
    known: &[&str],
    prefix: &str,
    unknowns: &mut Vec<String>,
) {
    for key in table.keys() {
        if !known.contains(&key.as_str()) {
            unknowns.push(format!("{}{}", prefix, key));
        }
    }
}
