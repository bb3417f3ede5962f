//! Check event types emitted to the alerting pipeline.

/// Realert interval meaning "never re-alert from this emitter".
pub const REALERT_NEVER: i64 = -1;

/// Status levels understood by Sensu handlers (Nagios plugin exit codes).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStatus {
    /// Check passed
    Ok,
    /// Something needs attention
    Warning,
    /// Immediate action required
    Critical,
    /// The check itself could not determine a result
    Unknown,
}

impl CheckStatus {
    /// Map a raw plugin exit code onto a status. Anything outside 0..=2 is unknown.
    #[must_use]
    pub const fn from_code(code: i32) -> Self {
        match code {
            0 => Self::Ok,
            1 => Self::Warning,
            2 => Self::Critical,
            _ => Self::Unknown,
        }
    }

    /// Exit code for this status.
    #[must_use]
    pub const fn code(&self) -> i32 {
        match self {
            Self::Ok => 0,
            Self::Warning => 1,
            Self::Critical => 2,
            Self::Unknown => 3,
        }
    }

    /// Get display name for this status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::Warning => "WARNING",
            Self::Critical => "CRITICAL",
            Self::Unknown => "UNKNOWN",
        }
    }
}

/// Routing and paging options attached to a check event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventOptions {
    pub tip: Option<String>,
    pub notification_email: Option<String>,
    pub page: bool,
    /// Human interval, e.g. `5m`, before the first alert fires
    pub alert_after: String,
    /// Minimum interval between repeated alerts, `-1` disables repeats
    pub realert_every: i64,
}

/// One check result destined for the alerting pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckEvent {
    pub name: String,
    pub runbook: String,
    pub status: i32,
    pub output: String,
    pub team: String,
    pub options: EventOptions,
}

impl CheckEvent {
    /// Status level derived from the raw exit code.
    #[must_use]
    pub const fn check_status(&self) -> CheckStatus {
        CheckStatus::from_code(self.status)
    }
}
