//! Monitoring ownership: who gets alerted for an instance, and how.
//!
//! `alert_after` is a human interval (`5m`, `1h30m`); a bare integer is
//! read as seconds.

use serde::{Deserialize, Deserializer};
use tracing::debug;

use super::{read_yaml, SoaDir};
use crate::error::SoaError;

/// Framework whose instance configs this check reads.
pub const MARATHON_FRAMEWORK: &str = "marathon";

const DEFAULT_PAGE: bool = true;
const DEFAULT_ALERT_AFTER: &str = "5m";

/// Monitoring keys as written in `monitoring.yaml` or an instance's `monitoring` block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MonitoringConfig {
    #[serde(default)]
    pub team: Option<String>,
    #[serde(default)]
    pub runbook: Option<String>,
    #[serde(default)]
    pub tip: Option<String>,
    #[serde(default)]
    pub notification_email: Option<String>,
    #[serde(default)]
    pub page: Option<bool>,
    #[serde(default, deserialize_with = "interval")]
    pub alert_after: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawInterval {
    Seconds(u64),
    Human(String),
}

fn interval<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(
        Option::<RawInterval>::deserialize(deserializer)?.map(|raw| match raw {
            RawInterval::Seconds(seconds) => format!("{seconds}s"),
            RawInterval::Human(interval) => interval,
        }),
    )
}

impl MonitoringConfig {
    /// Keys set here win, everything else falls back to `defaults`.
    #[must_use]
    pub fn or(self, defaults: Self) -> Self {
        Self {
            team: self.team.or(defaults.team),
            runbook: self.runbook.or(defaults.runbook),
            tip: self.tip.or(defaults.tip),
            notification_email: self.notification_email.or(defaults.notification_email),
            page: self.page.or(defaults.page),
            alert_after: self.alert_after.or(defaults.alert_after),
        }
    }
}

/// Source of alerting metadata, one lookup per field.
#[cfg_attr(test, mockall::automock)]
pub trait MonitoringMetadata: Send + Sync {
    fn team(&self, framework: &str, service: &str, instance: &str) -> Result<String, SoaError>;

    fn runbook(&self, framework: &str, service: &str, instance: &str) -> Result<String, SoaError>;

    fn tip(&self, framework: &str, service: &str, instance: &str)
        -> Result<Option<String>, SoaError>;

    fn notification_email(
        &self,
        framework: &str,
        service: &str,
        instance: &str,
    ) -> Result<Option<String>, SoaError>;

    fn page(&self, framework: &str, service: &str, instance: &str) -> Result<bool, SoaError>;

    fn alert_after(&self, framework: &str, service: &str, instance: &str)
        -> Result<String, SoaError>;
}

/// [`MonitoringMetadata`] read from SOA configs on every call.
pub struct SoaMonitoring {
    dir: SoaDir,
}

impl SoaMonitoring {
    pub fn new(dir: SoaDir) -> Self {
        Self { dir }
    }

    /// Instance overrides layered over the service's `monitoring.yaml`.
    fn resolve(
        &self,
        framework: &str,
        service: &str,
        instance: &str,
    ) -> Result<MonitoringConfig, SoaError> {
        if framework != MARATHON_FRAMEWORK {
            return Err(SoaError::UnsupportedFramework(framework.to_string()));
        }

        let service_level: MonitoringConfig =
            read_yaml(&self.dir.monitoring_file(service))?.unwrap_or_default();
        let instance_level = self
            .dir
            .instance_config(service, instance)?
            .map(|config| config.monitoring)
            .unwrap_or_default();

        debug!(service, instance, "Resolved monitoring config");
        Ok(instance_level.or(service_level))
    }

    fn required(
        value: Option<String>,
        key: &'static str,
        service: &str,
        instance: &str,
    ) -> Result<String, SoaError> {
        value.ok_or_else(|| SoaError::MissingMonitoringKey {
            key,
            service: service.to_string(),
            instance: instance.to_string(),
        })
    }
}

impl MonitoringMetadata for SoaMonitoring {
    fn team(&self, framework: &str, service: &str, instance: &str) -> Result<String, SoaError> {
        let config = self.resolve(framework, service, instance)?;
        Self::required(config.team, "team", service, instance)
    }

    fn runbook(&self, framework: &str, service: &str, instance: &str) -> Result<String, SoaError> {
        let config = self.resolve(framework, service, instance)?;
        Self::required(config.runbook, "runbook", service, instance)
    }

    fn tip(
        &self,
        framework: &str,
        service: &str,
        instance: &str,
    ) -> Result<Option<String>, SoaError> {
        Ok(self.resolve(framework, service, instance)?.tip)
    }

    fn notification_email(
        &self,
        framework: &str,
        service: &str,
        instance: &str,
    ) -> Result<Option<String>, SoaError> {
        Ok(self.resolve(framework, service, instance)?.notification_email)
    }

    fn page(&self, framework: &str, service: &str, instance: &str) -> Result<bool, SoaError> {
        Ok(self
            .resolve(framework, service, instance)?
            .page
            .unwrap_or(DEFAULT_PAGE))
    }

    fn alert_after(
        &self,
        framework: &str,
        service: &str,
        instance: &str,
    ) -> Result<String, SoaError> {
        Ok(self
            .resolve(framework, service, instance)?
            .alert_after
            .unwrap_or_else(|| DEFAULT_ALERT_AFTER.to_string()))
    }
}
