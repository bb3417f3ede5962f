//! Error types for the HTTP frontends check.

use std::path::PathBuf;

use thiserror::Error;

/// Errors reading SOA configs: registry lookups and monitoring metadata.
#[derive(Debug, Error)]
pub enum SoaError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Instance {service}.{instance} is not deployed on cluster {cluster}")]
    UnknownInstance {
        service: String,
        instance: String,
        cluster: String,
    },

    #[error("No proxy_port for namespace {service}.{namespace} in smartstack.yaml")]
    NoProxyPort { service: String, namespace: String },

    #[error("No {key} configured for {service}.{instance}")]
    MissingMonitoringKey {
        key: &'static str,
        service: String,
        instance: String,
    },

    #[error("Unsupported framework {0:?}")]
    UnsupportedFramework(String),
}

/// Errors that abort the check of one instance.
#[derive(Debug, Error)]
pub enum CheckError {
    /// The probe subprocess could not be started or read
    #[error("Failed to run {command:?}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// Registry or monitoring metadata lookup failed
    #[error(transparent)]
    Soa(#[from] SoaError),

    /// The event could not be handed to the alerting pipeline
    #[error("Failed to send event {check_name}: {source}")]
    Emit {
        check_name: String,
        #[source]
        source: notify::ChannelError,
    },
}

pub type Result<T, E = CheckError> = std::result::Result<T, E>;
