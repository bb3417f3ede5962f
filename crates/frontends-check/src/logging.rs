//! Tracing setup. Logs go to stderr; stdout carries only the plugin line.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// One-time process setup performed at the start of a run.
#[cfg_attr(test, mockall::automock)]
pub trait RunSetup: Send + Sync {
    fn setup(&self);
}

/// [`RunSetup`] that installs the tracing subscriber.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingSetup {
    pub verbose: bool,
}

impl RunSetup for LoggingSetup {
    fn setup(&self) {
        setup_logging(self.verbose);
    }
}

/// Install the global subscriber. `RUST_LOG` overrides the default filter.
///
/// Safe to call more than once; later calls are ignored.
pub fn setup_logging(verbose: bool) {
    let default = if verbose {
        "frontends_check=debug,notify=debug,info"
    } else {
        "frontends_check=info,notify=info,warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();
}
