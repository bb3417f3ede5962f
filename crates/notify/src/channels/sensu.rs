//! Sensu client socket channel.
//!
//! The local Sensu client accepts one JSON check result per TCP connection.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tracing::debug;

use crate::error::ChannelError;
use crate::events::CheckEvent;
use crate::interval::human_to_seconds;
use crate::EventChannel;

pub const DEFAULT_SENSU_HOST: &str = "localhost";
pub const DEFAULT_SENSU_PORT: u16 = 3030;
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Handler every event is routed through.
const HANDLER: &str = "default";
/// How often the check is expected to run, used by Sensu to compute occurrences.
const CHECK_EVERY: &str = "1m";

/// Sensu client socket channel.
pub struct SensuChannel {
    host: String,
    port: u16,
    timeout: Duration,
}

impl SensuChannel {
    /// Create a channel for a specific client socket.
    #[must_use]
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Bound connect and write by `timeout`.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn endpoint(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Build the JSON check result for an event.
    fn format_payload(event: &CheckEvent) -> Result<SensuResult<'_>, ChannelError> {
        Ok(SensuResult {
            name: &event.name,
            status: event.status,
            output: &event.output,
            handler: HANDLER,
            team: &event.team,
            runbook: &event.runbook,
            tip: event.options.tip.as_deref(),
            notification_email: event.options.notification_email.as_deref(),
            interval: human_to_seconds(CHECK_EVERY)?,
            page: event.options.page,
            alert_after: human_to_seconds(&event.options.alert_after)?,
            realert_every: event.options.realert_every,
        })
    }

    async fn deliver(&self, endpoint: &str, body: &[u8]) -> Result<(), ChannelError> {
        let io_err = |source| ChannelError::Io {
            endpoint: endpoint.to_string(),
            source,
        };

        let mut stream = TcpStream::connect((self.host.as_str(), self.port))
            .await
            .map_err(io_err)?;
        stream.write_all(body).await.map_err(io_err)?;
        stream.shutdown().await.map_err(io_err)?;
        Ok(())
    }
}

#[async_trait]
impl EventChannel for SensuChannel {
    fn name(&self) -> &'static str {
        "sensu"
    }

    async fn send(&self, event: &CheckEvent) -> Result<(), ChannelError> {
        let payload = Self::format_payload(event)?;
        let body = serde_json::to_vec(&payload)?;
        let endpoint = self.endpoint();

        debug!(
            channel = "sensu",
            endpoint = %endpoint,
            check = %event.name,
            status = event.status,
            "Sending check result"
        );

        tokio::time::timeout(self.timeout, self.deliver(&endpoint, &body))
            .await
            .map_err(|_| ChannelError::Timeout {
                endpoint: endpoint.clone(),
                timeout_ms: u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
            })?
    }
}

// =============================================================================
// Sensu client socket payload
// =============================================================================

#[derive(Debug, Serialize)]
struct SensuResult<'a> {
    name: &'a str,
    status: i32,
    output: &'a str,
    handler: &'a str,
    team: &'a str,
    runbook: &'a str,
    tip: Option<&'a str>,
    notification_email: Option<&'a str>,
    interval: u64,
    page: bool,
    alert_after: u64,
    realert_every: i64,
}
