//! Marathon HTTP frontends check
//!
//! Probes the proxy port of every Marathon service instance on the cluster with
//! `check_http` and sends one Sensu event per instance. Meant to be scheduled
//! by the Sensu client; prints a single plugin status line on stdout.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::error;

use frontends_check::command::CHECK_HTTP_PATH;
use frontends_check::soa::DEFAULT_SOA_DIR;
use frontends_check::{build_runner, CheckConfig, PluginOutput, SensuPluginOutput};
use notify::channels::sensu::{DEFAULT_SENSU_HOST, DEFAULT_SENSU_PORT};

/// Name printed in front of the plugin status line.
const PLUGIN_NAME: &str = "CheckMarathonServicesHttpFrontends";
const UNKNOWN_EXIT: u8 = 3;

/// Check the HTTP frontends of every Marathon service instance
#[derive(Parser)]
#[command(name = "check-marathon-services-http-frontends")]
#[command(about = "Check the HTTP frontends of every Marathon service instance")]
#[command(version)]
struct Cli {
    /// Marathon cluster to check
    #[arg(long, env = "MARATHON_CLUSTER")]
    cluster: String,

    /// SOA configs directory
    #[arg(long, env = "SOA_DIR", default_value = DEFAULT_SOA_DIR)]
    soa_dir: PathBuf,

    /// Path to the Nagios check_http plugin
    #[arg(long, env = "CHECK_HTTP_PATH", default_value = CHECK_HTTP_PATH)]
    check_http_path: String,

    /// Sensu client socket host
    #[arg(long, env = "SENSU_HOST", default_value = DEFAULT_SENSU_HOST)]
    sensu_host: String,

    /// Sensu client socket port
    #[arg(long, env = "SENSU_PORT", default_value_t = DEFAULT_SENSU_PORT)]
    sensu_port: u16,

    /// Seconds to wait for the Sensu client to accept an event
    #[arg(long, default_value = "10")]
    sensu_timeout: u64,

    /// Log events instead of sending them
    #[arg(long)]
    dry_run: bool,

    /// Drop events entirely
    #[arg(long, env = "NOTIFY_DISABLED")]
    notify_disabled: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn into_config(self) -> CheckConfig {
        CheckConfig {
            soa_dir: self.soa_dir,
            check_http_path: self.check_http_path,
            sensu_host: self.sensu_host,
            sensu_port: self.sensu_port,
            sensu_timeout: Duration::from_secs(self.sensu_timeout),
            dry_run: self.dry_run,
            notify_disabled: self.notify_disabled,
            verbose: self.verbose,
            ..CheckConfig::new(self.cluster)
        }
    }
}

async fn run(config: CheckConfig, output: Arc<dyn PluginOutput>) -> Result<()> {
    let runner = build_runner(&config, output);
    runner
        .run()
        .await
        .with_context(|| format!("checking HTTP frontends on cluster {}", config.cluster))
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let output = Arc::new(SensuPluginOutput::new(PLUGIN_NAME));

    match run(cli.into_config(), output.clone()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %format!("{e:#}"), "Check failed to run");
            output.unknown(&format!("Check failed to run: {e:#}"));
            ExitCode::from(UNKNOWN_EXIT)
        }
    }
}
