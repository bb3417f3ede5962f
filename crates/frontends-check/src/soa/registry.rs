//! Which instances run on the cluster, and where their proxies listen.

use std::collections::BTreeMap;

use tracing::debug;

use super::{read_yaml, ServiceInstance, SmartstackNamespace, SoaDir};
use crate::error::SoaError;

#[cfg_attr(test, mockall::automock)]
pub trait ServiceRegistry: Send + Sync {
    /// Local proxy port routing to `service.instance`.
    fn proxy_port_for_instance(&self, service: &str, instance: &str) -> Result<u16, SoaError>;

    /// Every (service, instance) deployed on the cluster, in a stable order.
    fn services_for_cluster(&self) -> Result<Vec<ServiceInstance>, SoaError>;
}

/// [`ServiceRegistry`] backed by SOA configs.
pub struct SoaRegistry {
    dir: SoaDir,
}

impl SoaRegistry {
    pub fn new(dir: SoaDir) -> Self {
        Self { dir }
    }
}

impl ServiceRegistry for SoaRegistry {
    fn proxy_port_for_instance(&self, service: &str, instance: &str) -> Result<u16, SoaError> {
        let config = self
            .dir
            .instance_config(service, instance)?
            .ok_or_else(|| SoaError::UnknownInstance {
                service: service.to_string(),
                instance: instance.to_string(),
                cluster: self.dir.cluster().to_string(),
            })?;

        let namespace = config.nerve_ns.unwrap_or_else(|| instance.to_string());
        let namespaces: BTreeMap<String, SmartstackNamespace> =
            read_yaml(&self.dir.smartstack_file(service))?.unwrap_or_default();

        let port = namespaces
            .get(&namespace)
            .and_then(|ns| ns.proxy_port)
            .ok_or_else(|| SoaError::NoProxyPort {
                service: service.to_string(),
                namespace: namespace.clone(),
            })?;

        debug!(service, instance, namespace = %namespace, port, "Resolved proxy port");
        Ok(port)
    }

    fn services_for_cluster(&self) -> Result<Vec<ServiceInstance>, SoaError> {
        let mut pairs = Vec::new();

        for service in self.dir.list_services()? {
            let Some(instances) = self.dir.cluster_instances(&service)? else {
                continue;
            };
            pairs.extend(
                instances
                    .into_iter()
                    .map(|(instance, _)| ServiceInstance::new(service.clone(), instance)),
            );
        }

        debug!(
            cluster = self.dir.cluster(),
            count = pairs.len(),
            "Enumerated service instances"
        );
        Ok(pairs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::soa::test_support::write_config;

    fn fixture() -> (tempfile::TempDir, SoaRegistry) {
        let tmp = tempfile::tempdir().unwrap();
        write_config(
            tmp.path(),
            "web",
            "marathon-norcal.yaml",
            "main: {}\ncanary:\n  nerve_ns: main\nbatch: {}\n",
        );
        write_config(
            tmp.path(),
            "web",
            "smartstack.yaml",
            "main:\n  proxy_port: 20001\n  timeout_server_ms: 1000\nbatch: {}\n",
        );
        write_config(tmp.path(), "api", "marathon-norcal.yaml", "v1: {}\n");
        write_config(tmp.path(), "api", "smartstack.yaml", "v1:\n  proxy_port: 20002\n");
        write_config(tmp.path(), "elsewhere", "marathon-nova.yaml", "main: {}\n");

        let registry = SoaRegistry::new(SoaDir::new(tmp.path(), "norcal"));
        (tmp, registry)
    }

    #[test]
    fn test_services_for_cluster_order() {
        let (_tmp, registry) = fixture();
        let pairs: Vec<String> = registry
            .services_for_cluster()
            .unwrap()
            .iter()
            .map(ToString::to_string)
            .collect();

        assert_eq!(pairs, ["api.v1", "web.main", "web.canary", "web.batch"]);
    }

    #[test]
    fn test_services_for_cluster_may_be_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let registry = SoaRegistry::new(SoaDir::new(tmp.path(), "norcal"));
        assert!(registry.services_for_cluster().unwrap().is_empty());
    }

    #[test]
    fn test_proxy_port_for_instance() {
        let (_tmp, registry) = fixture();
        assert_eq!(registry.proxy_port_for_instance("web", "main").unwrap(), 20001);
        assert_eq!(registry.proxy_port_for_instance("api", "v1").unwrap(), 20002);
    }

    #[test]
    fn test_proxy_port_follows_nerve_ns() {
        let (_tmp, registry) = fixture();
        assert_eq!(registry.proxy_port_for_instance("web", "canary").unwrap(), 20001);
    }

    #[test]
    fn test_unknown_instance() {
        let (_tmp, registry) = fixture();
        let err = registry.proxy_port_for_instance("web", "ghost").unwrap_err();
        assert!(matches!(err, SoaError::UnknownInstance { .. }));

        let err = registry.proxy_port_for_instance("elsewhere", "main").unwrap_err();
        assert!(matches!(err, SoaError::UnknownInstance { .. }));
    }

    #[test]
    fn test_namespace_without_proxy_port() {
        let (_tmp, registry) = fixture();
        let err = registry.proxy_port_for_instance("web", "batch").unwrap_err();
        assert!(matches!(
            err,
            SoaError::NoProxyPort { ref namespace, .. } if namespace == "batch"
        ));
    }
}
