//! Runtime configuration for the check.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use notify::channels::sensu::{DEFAULT_SENSU_HOST, DEFAULT_SENSU_PORT};
use notify::{EventChannel, LogChannel, Notifier, SensuChannel};
use tracing::info;

use crate::command::CHECK_HTTP_PATH;
use crate::soa::monitoring::MARATHON_FRAMEWORK;
use crate::soa::DEFAULT_SOA_DIR;

/// Everything the check needs to know about its environment.
#[derive(Debug, Clone)]
pub struct CheckConfig {
    /// Marathon cluster whose instances are checked
    pub cluster: String,
    pub soa_dir: PathBuf,
    pub check_http_path: String,
    /// Framework passed to every monitoring metadata lookup
    pub framework: String,
    pub sensu_host: String,
    pub sensu_port: u16,
    pub sensu_timeout: Duration,
    /// Log events instead of sending them
    pub dry_run: bool,
    /// Drop events entirely
    pub notify_disabled: bool,
    /// Debug-level logging for this check
    pub verbose: bool,
}

impl CheckConfig {
    /// Defaults for everything except the cluster.
    pub fn new(cluster: impl Into<String>) -> Self {
        Self {
            cluster: cluster.into(),
            soa_dir: PathBuf::from(DEFAULT_SOA_DIR),
            check_http_path: CHECK_HTTP_PATH.to_string(),
            framework: MARATHON_FRAMEWORK.to_string(),
            sensu_host: DEFAULT_SENSU_HOST.to_string(),
            sensu_port: DEFAULT_SENSU_PORT,
            sensu_timeout: Duration::from_secs(10),
            dry_run: false,
            notify_disabled: false,
            verbose: false,
        }
    }

    /// Build the event transport this config asks for.
    pub fn notifier(&self) -> Notifier {
        if self.notify_disabled {
            info!("Event emission disabled");
            return Notifier::disabled();
        }

        let channel: Arc<dyn EventChannel> = if self.dry_run {
            Arc::new(LogChannel)
        } else {
            Arc::new(
                SensuChannel::new(self.sensu_host.clone(), self.sensu_port)
                    .with_timeout(self.sensu_timeout),
            )
        };

        Notifier::with_channels(vec![channel])
    }
}
