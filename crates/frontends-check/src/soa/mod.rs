//! SOA configs: the per-service YAML tree describing where each service runs,
//! which proxy namespace it registers in, and who owns its alerts.
//!
//! ```text
//! <soa_dir>/<service>/marathon-<cluster>.yaml   instance name -> instance config
//! <soa_dir>/<service>/smartstack.yaml           namespace -> { proxy_port }
//! <soa_dir>/<service>/monitoring.yaml           service-wide monitoring defaults
//! ```

pub mod monitoring;
pub mod registry;

use std::fmt;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::SoaError;
use monitoring::MonitoringConfig;

/// Default location of the SOA configs checkout on hosts.
pub const DEFAULT_SOA_DIR: &str = "/nail/etc/services";

/// A (service, instance) pair deployed on the cluster.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ServiceInstance {
    pub service: String,
    pub instance: String,
}

impl ServiceInstance {
    pub fn new(service: impl Into<String>, instance: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            instance: instance.into(),
        }
    }
}

impl fmt::Display for ServiceInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.service, self.instance)
    }
}

/// The parts of a Marathon instance config this check cares about.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InstanceConfig {
    /// Smartstack namespace the instance registers in, defaults to the instance name
    #[serde(default)]
    pub nerve_ns: Option<String>,

    /// Per-instance monitoring overrides
    #[serde(default)]
    pub monitoring: MonitoringConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct SmartstackNamespace {
    #[serde(default)]
    pub proxy_port: Option<u16>,
}

/// One cluster's view of an SOA configs directory.
#[derive(Debug, Clone)]
pub struct SoaDir {
    root: PathBuf,
    cluster: String,
}

impl SoaDir {
    pub fn new(root: impl Into<PathBuf>, cluster: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            cluster: cluster.into(),
        }
    }

    pub fn cluster(&self) -> &str {
        &self.cluster
    }

    fn cluster_file(&self, service: &str) -> PathBuf {
        self.root
            .join(service)
            .join(format!("marathon-{}.yaml", self.cluster))
    }

    fn smartstack_file(&self, service: &str) -> PathBuf {
        self.root.join(service).join("smartstack.yaml")
    }

    fn monitoring_file(&self, service: &str) -> PathBuf {
        self.root.join(service).join("monitoring.yaml")
    }

    /// Service directories, sorted by name.
    pub fn list_services(&self) -> Result<Vec<String>, SoaError> {
        let read_err = |source: std::io::Error| SoaError::Read {
            path: self.root.clone(),
            source,
        };

        let mut services = Vec::new();
        for entry in std::fs::read_dir(&self.root).map_err(read_err)? {
            let entry = entry.map_err(read_err)?;
            if entry.file_type().map_err(read_err)?.is_dir() {
                if let Some(name) = entry.file_name().to_str() {
                    services.push(name.to_string());
                }
            }
        }

        services.sort();
        Ok(services)
    }

    /// Instances declared for this cluster, in file order.
    ///
    /// `None` when the service has no config for this cluster.
    pub fn cluster_instances(
        &self,
        service: &str,
    ) -> Result<Option<Vec<(String, InstanceConfig)>>, SoaError> {
        let path = self.cluster_file(service);
        let Some(mapping) = read_yaml::<serde_yaml::Mapping>(&path)? else {
            return Ok(None);
        };

        let parse_err = |source: serde_yaml::Error| SoaError::Parse {
            path: path.clone(),
            source,
        };

        let mut instances = Vec::with_capacity(mapping.len());
        for (name, config) in mapping {
            let name: String = serde_yaml::from_value(name).map_err(parse_err)?;
            let config: InstanceConfig = if config.is_null() {
                InstanceConfig::default()
            } else {
                serde_yaml::from_value(config).map_err(parse_err)?
            };
            instances.push((name, config));
        }

        Ok(Some(instances))
    }

    /// Config of a single instance on this cluster.
    pub fn instance_config(
        &self,
        service: &str,
        instance: &str,
    ) -> Result<Option<InstanceConfig>, SoaError> {
        Ok(self
            .cluster_instances(service)?
            .unwrap_or_default()
            .into_iter()
            .find_map(|(name, config)| (name == instance).then_some(config)))
    }
}

/// Read and parse a YAML file.
///
/// A missing file is `Ok(None)`; an empty file is the type's default.
pub(crate) fn read_yaml<T>(path: &Path) -> Result<Option<T>, SoaError>
where
    T: DeserializeOwned + Default,
{
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(SoaError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    if contents.trim().is_empty() {
        return Ok(Some(T::default()));
    }

    serde_yaml::from_str(&contents)
        .map(Some)
        .map_err(|source| SoaError::Parse {
            path: path.to_path_buf(),
            source,
        })
}
