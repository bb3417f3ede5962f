//! Event channel implementations.

pub mod log;
pub mod sensu;

use async_trait::async_trait;

use crate::error::ChannelError;
use crate::events::CheckEvent;

/// Trait for event channels (Sensu client socket, log-only, etc.).
#[async_trait]
pub trait EventChannel: Send + Sync {
    /// Get the name of this channel.
    fn name(&self) -> &'static str;

    /// Deliver one check event.
    async fn send(&self, event: &CheckEvent) -> Result<(), ChannelError>;
}
