//! Sensu check for the HTTP frontends of Marathon services.
//!
//! For every (service, instance) deployed on a cluster, the check resolves the
//! instance's local proxy port from SOA configs, probes it with the Nagios
//! `check_http` plugin, and sends the plugin's verdict to the local Sensu
//! client as `soa_<service>.<instance>_http_frontends`. Instances are checked
//! one after another; the first failure aborts the run.

pub mod command;
pub mod config;
pub mod error;
pub mod fleet;
pub mod instance;
pub mod logging;
pub mod plugin;
pub mod probe;
pub mod report;
pub mod soa;

use std::sync::Arc;

pub use config::CheckConfig;
pub use error::{CheckError, SoaError};
pub use fleet::FleetRunner;
pub use instance::{check_name, InstanceCheck, InstanceChecker};
pub use plugin::{PluginOutput, SensuPluginOutput};
pub use probe::{HttpProbe, Probe, ProbeResult, SystemSpawner};
pub use report::{EventReporter, Reporter};
pub use soa::ServiceInstance;

use logging::LoggingSetup;
use soa::monitoring::SoaMonitoring;
use soa::registry::{ServiceRegistry, SoaRegistry};
use soa::SoaDir;

/// Wire the production collaborators for `config`.
pub fn build_runner(config: &CheckConfig, output: Arc<dyn PluginOutput>) -> FleetRunner {
    let dir = SoaDir::new(config.soa_dir.clone(), config.cluster.clone());
    let registry: Arc<dyn ServiceRegistry> = Arc::new(SoaRegistry::new(dir.clone()));

    let probe = Arc::new(HttpProbe::new(
        config.check_http_path.clone(),
        Arc::new(SystemSpawner),
    ));
    let reporter = Arc::new(EventReporter::new(
        config.framework.clone(),
        Arc::new(SoaMonitoring::new(dir)),
        Arc::new(config.notifier()),
    ));
    let checker = Arc::new(InstanceChecker::new(Arc::clone(&registry), probe, reporter));

    let setup = Arc::new(LoggingSetup {
        verbose: config.verbose,
    });

    FleetRunner::new(setup, registry, checker, output)
}
