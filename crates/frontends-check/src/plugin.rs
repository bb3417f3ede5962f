//! Sensu plugin output: one status line on stdout, exit code carries the status.

use notify::CheckStatus;

/// Where a check reports its own overall verdict.
#[cfg_attr(test, mockall::automock)]
pub trait PluginOutput: Send + Sync {
    fn emit(&self, status: CheckStatus, message: &str);

    fn ok(&self, message: &str) {
        self.emit(CheckStatus::Ok, message);
    }

    fn warning(&self, message: &str) {
        self.emit(CheckStatus::Warning, message);
    }

    fn critical(&self, message: &str) {
        self.emit(CheckStatus::Critical, message);
    }

    fn unknown(&self, message: &str) {
        self.emit(CheckStatus::Unknown, message);
    }
}

/// Prints `<name> <STATUS>: <message>` to stdout.
#[derive(Debug, Clone)]
pub struct SensuPluginOutput {
    name: String,
}

impl SensuPluginOutput {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn format(&self, status: CheckStatus, message: &str) -> String {
        format!("{} {}: {message}", self.name, status.as_str())
    }
}

impl PluginOutput for SensuPluginOutput {
    fn emit(&self, status: CheckStatus, message: &str) {
        println!("{}", self.format(status, message));
    }
}
