mod config;
mod output;

use std::path::PathBuf;

use eyre::{bail, WrapErr};
use orgscope_core::TenantId;
use structopt::StructOpt;
use tracing_subscriber::EnvFilter;

use crate::output::Output;

/// Prints the remote-write destinations each tenant gets once scoped.
#[derive(StructOpt, Debug)]
#[structopt(name = "orgscope")]
struct Opts {
    /// TOML file holding the remote_write configuration.
    #[structopt(short, long, parse(from_os_str))]
    config: PathBuf,

    /// Tenant to scope the configuration for. Can be repeated.
    #[structopt(short, long = "tenant", required = true)]
    tenants: Vec<String>,
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let opts = Opts::from_args();
    let tenants = parse_tenants(opts.tenants)?;
    let config = config::load(&opts.config).await?;

    tracing::info!(
        target = "orgscope",
        "Scoping {} remote_write destination(s) for {} tenant(s), flush deadline {:?}",
        config.remote_write.len(),
        tenants.len(),
        config.remote_write_flush_deadline()
    );

    let output = serde_json::to_string_pretty(&Output::build(&config, &tenants))
        .wrap_err("Error when serializing scoped configs")?;

    println!("{}", output);

    Ok(())
}

fn parse_tenants(raw: Vec<String>) -> eyre::Result<Vec<TenantId>> {
    if raw.is_empty() {
        bail!("At least one tenant is required");
    }

    let mut tenants = Vec::with_capacity(raw.len());

    for tenant in raw {
        if tenant.trim().is_empty() {
            bail!("Tenant id can't be blank");
        }

        tenants.push(TenantId::from(tenant));
    }

    Ok(tenants)
}
