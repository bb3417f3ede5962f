//! Log-only channel, used for dry runs.

use async_trait::async_trait;
use tracing::info;

use crate::error::ChannelError;
use crate::events::CheckEvent;
use crate::EventChannel;

/// Writes events to the log instead of delivering them.
#[derive(Debug, Default)]
pub struct LogChannel;

#[async_trait]
impl EventChannel for LogChannel {
    fn name(&self) -> &'static str {
        "log"
    }

    async fn send(&self, event: &CheckEvent) -> Result<(), ChannelError> {
        info!(
            channel = "log",
            check = %event.name,
            status = event.check_status().as_str(),
            team = %event.team,
            runbook = %event.runbook,
            page = event.options.page,
            alert_after = %event.options.alert_after,
            realert_every = event.options.realert_every,
            output = %event.output,
            "Dry run, event not sent"
        );
        Ok(())
    }
}
