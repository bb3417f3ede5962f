//! Checking one service instance end to end.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::error::Result;
use crate::probe::Probe;
use crate::report::{CheckReport, Reporter};
use crate::soa::registry::ServiceRegistry;
use crate::soa::ServiceInstance;

/// Sensu check name for an instance's HTTP frontend.
pub fn check_name(service: &str, instance: &str) -> String {
    format!("soa_{service}.{instance}_http_frontends")
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InstanceCheck: Send + Sync {
    /// Probe one instance and report the result.
    async fn check_service_instance(&self, target: ServiceInstance) -> Result<()>;
}

/// Resolves the proxy port, probes it, and reports under the derived check name.
pub struct InstanceChecker {
    registry: Arc<dyn ServiceRegistry>,
    probe: Arc<dyn Probe>,
    reporter: Arc<dyn Reporter>,
}

impl InstanceChecker {
    pub fn new(
        registry: Arc<dyn ServiceRegistry>,
        probe: Arc<dyn Probe>,
        reporter: Arc<dyn Reporter>,
    ) -> Self {
        Self {
            registry,
            probe,
            reporter,
        }
    }
}

#[async_trait]
impl InstanceCheck for InstanceChecker {
    async fn check_service_instance(&self, target: ServiceInstance) -> Result<()> {
        let ServiceInstance { service, instance } = target;

        let port = self.registry.proxy_port_for_instance(&service, &instance)?;
        let result = self.probe.check_http(port).await?;
        let check_name = check_name(&service, &instance);

        info!(
            service = %service,
            instance = %instance,
            port,
            status = notify::CheckStatus::from_code(result.status).as_str(),
            "Checked HTTP frontend"
        );

        self.reporter
            .send_event(CheckReport {
                service,
                instance,
                check_name,
                status: result.status,
                output: result.output,
            })
            .await
    }
}
