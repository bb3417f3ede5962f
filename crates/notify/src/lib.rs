//! Check event transport for monitoring checks.
//!
//! This crate carries one structured check result per call to the alerting
//! pipeline. The default channel writes the result to the local Sensu client
//! socket, which forwards it to the handlers that page and email teams.
//!
//! # Usage
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use notify::{CheckEvent, EventChannel, EventOptions, Notifier, SensuChannel, REALERT_NEVER};
//!
//! # async fn example() -> Result<(), notify::ChannelError> {
//! let sensu: Arc<dyn EventChannel> = Arc::new(SensuChannel::new("localhost", 3030));
//! let notifier = Notifier::with_channels(vec![sensu]);
//!
//! notifier
//!     .send_event(CheckEvent {
//!         name: "soa_web.main_http_frontends".to_string(),
//!         runbook: "y/web-runbook".to_string(),
//!         status: 0,
//!         output: "HTTP OK".to_string(),
//!         team: "web".to_string(),
//!         options: EventOptions {
//!             tip: None,
//!             notification_email: None,
//!             page: true,
//!             alert_after: "5m".to_string(),
//!             realert_every: REALERT_NEVER,
//!         },
//!     })
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! Callers pick the channels; use [`Notifier::disabled`] to drop all events.

pub mod channels;
pub mod error;
pub mod events;
pub mod interval;

pub use channels::log::LogChannel;
pub use channels::sensu::SensuChannel;
pub use channels::EventChannel;
pub use error::ChannelError;
pub use events::{CheckEvent, CheckStatus, EventOptions, REALERT_NEVER};
pub use interval::human_to_seconds;

use std::sync::Arc;
use tracing::debug;

/// Central event dispatcher.
///
/// Unlike a fire-and-forget notifier, every send is awaited and the first
/// channel error is returned to the caller. There is no retry.
pub struct Notifier {
    channels: Vec<Arc<dyn EventChannel>>,
    disabled: bool,
}

impl Notifier {
    /// Create a notifier with specific channels.
    #[must_use]
    pub fn with_channels(channels: Vec<Arc<dyn EventChannel>>) -> Self {
        Self {
            channels,
            disabled: false,
        }
    }

    /// Create a disabled notifier (for testing or when emission is off).
    #[must_use]
    pub const fn disabled() -> Self {
        Self {
            channels: vec![],
            disabled: true,
        }
    }

    /// Check if any channels are enabled.
    #[must_use]
    pub fn has_channels(&self) -> bool {
        !self.disabled && !self.channels.is_empty()
    }

    /// Send one event to every channel in order.
    pub async fn send_event(&self, event: CheckEvent) -> Result<(), ChannelError> {
        if !self.has_channels() {
            debug!(check = %event.name, "No channels enabled, dropping event");
            return Ok(());
        }

        for channel in &self.channels {
            channel.send(&event).await?;
            debug!(channel = channel.name(), check = %event.name, "Event sent");
        }

        Ok(())
    }
}
