//! Turning a probe result into one alerting event.

use std::sync::Arc;

use async_trait::async_trait;
use notify::{CheckEvent, EventOptions, Notifier, REALERT_NEVER};
use tracing::info;

use crate::error::{CheckError, Result, SoaError};
use crate::soa::monitoring::MonitoringMetadata;

/// Everything needed to report one instance's check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckReport {
    pub service: String,
    pub instance: String,
    pub check_name: String,
    pub status: i32,
    pub output: String,
}

/// Who to alert for an instance and how.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertMetadata {
    pub team: String,
    pub runbook: String,
    pub tip: Option<String>,
    pub notification_email: Option<String>,
    pub page: bool,
    pub alert_after: String,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Reporter: Send + Sync {
    /// Emit exactly one event for a finished check.
    async fn send_event(&self, report: CheckReport) -> Result<()>;
}

/// [`Reporter`] that resolves monitoring metadata and emits through a [`Notifier`].
pub struct EventReporter {
    framework: String,
    metadata: Arc<dyn MonitoringMetadata>,
    notifier: Arc<Notifier>,
}

impl EventReporter {
    pub fn new(
        framework: impl Into<String>,
        metadata: Arc<dyn MonitoringMetadata>,
        notifier: Arc<Notifier>,
    ) -> Self {
        Self {
            framework: framework.into(),
            metadata,
            notifier,
        }
    }

    /// Look up every alerting field for `service.instance`, one lookup per field.
    pub fn alert_metadata(
        &self,
        service: &str,
        instance: &str,
    ) -> std::result::Result<AlertMetadata, SoaError> {
        let framework = self.framework.as_str();
        Ok(AlertMetadata {
            team: self.metadata.team(framework, service, instance)?,
            runbook: self.metadata.runbook(framework, service, instance)?,
            tip: self.metadata.tip(framework, service, instance)?,
            notification_email: self
                .metadata
                .notification_email(framework, service, instance)?,
            page: self.metadata.page(framework, service, instance)?,
            alert_after: self.metadata.alert_after(framework, service, instance)?,
        })
    }
}

#[async_trait]
impl Reporter for EventReporter {
    async fn send_event(&self, report: CheckReport) -> Result<()> {
        let meta = self.alert_metadata(&report.service, &report.instance)?;

        let event = CheckEvent {
            name: report.check_name.clone(),
            runbook: meta.runbook,
            status: report.status,
            output: report.output,
            team: meta.team,
            options: EventOptions {
                tip: meta.tip,
                notification_email: meta.notification_email,
                page: meta.page,
                alert_after: meta.alert_after,
                realert_every: REALERT_NEVER,
            },
        };

        info!(
            check = %event.name,
            status = event.check_status().as_str(),
            team = %event.team,
            page = event.options.page,
            "Sending event"
        );

        self.notifier
            .send_event(event)
            .await
            .map_err(|source| CheckError::Emit {
                check_name: report.check_name,
                source,
            })
    }
}
