//! Checking every instance on the cluster, one at a time.

use std::sync::Arc;

use tracing::{debug, info};

use crate::error::Result;
use crate::instance::InstanceCheck;
use crate::logging::RunSetup;
use crate::plugin::PluginOutput;
use crate::soa::registry::ServiceRegistry;
use crate::soa::ServiceInstance;

/// Summary line listing every checked instance in order.
pub fn summary_message(targets: &[ServiceInstance]) -> String {
    let checked: Vec<String> = targets.iter().map(ToString::to_string).collect();
    format!("Finished checking all services: {}", checked.join(" "))
}

/// Runs the instance check over the whole cluster.
///
/// Fail-fast: the first instance error aborts the run and no summary is
/// emitted. Instances already checked keep the events they sent.
pub struct FleetRunner {
    setup: Arc<dyn RunSetup>,
    registry: Arc<dyn ServiceRegistry>,
    checker: Arc<dyn InstanceCheck>,
    output: Arc<dyn PluginOutput>,
}

impl FleetRunner {
    pub fn new(
        setup: Arc<dyn RunSetup>,
        registry: Arc<dyn ServiceRegistry>,
        checker: Arc<dyn InstanceCheck>,
        output: Arc<dyn PluginOutput>,
    ) -> Self {
        Self {
            setup,
            registry,
            checker,
            output,
        }
    }

    pub async fn run(&self) -> Result<()> {
        self.setup.setup();

        let targets = self.registry.services_for_cluster()?;
        info!(count = targets.len(), "Checking HTTP frontends");

        for target in &targets {
            debug!(target = %target, "Checking instance");
            self.checker.check_service_instance(target.clone()).await?;
        }

        self.output.ok(&summary_message(&targets));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CheckError, SoaError};
    use crate::instance::MockInstanceCheck;
    use crate::logging::MockRunSetup;
    use crate::plugin::MockPluginOutput;
    use crate::soa::registry::MockServiceRegistry;
    use mockall::Sequence;

    fn fake_service_list() -> Vec<ServiceInstance> {
        vec![
            ServiceInstance::new("fake_service1", "fake_instance1"),
            ServiceInstance::new("fake_service2", "fake_instance2"),
        ]
    }

    fn setup_once() -> Arc<MockRunSetup> {
        let mut setup = MockRunSetup::new();
        setup.expect_setup().times(1).return_const(());
        Arc::new(setup)
    }

    #[tokio::test]
    async fn test_run_checks_every_instance_in_order() {
        let mut seq = Sequence::new();
        let mut setup = MockRunSetup::new();
        setup
            .expect_setup()
            .times(1)
            .in_sequence(&mut seq)
            .return_const(());

        let mut registry = MockServiceRegistry::new();
        registry
            .expect_services_for_cluster()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(fake_service_list()));

        let mut checker = MockInstanceCheck::new();
        for expected in fake_service_list() {
            checker
                .expect_check_service_instance()
                .withf(move |target: &ServiceInstance| *target == expected)
                .times(1)
                .in_sequence(&mut seq)
                .returning(|_| Ok(()));
        }

        let mut output = MockPluginOutput::new();
        output
            .expect_ok()
            .withf(|message: &str| {
                message
                    == "Finished checking all services: fake_service1.fake_instance1 fake_service2.fake_instance2"
            })
            .times(1)
            .return_const(());

        let runner = FleetRunner::new(
            Arc::new(setup),
            Arc::new(registry),
            Arc::new(checker),
            Arc::new(output),
        );
        runner.run().await.unwrap();
    }

    #[tokio::test]
    async fn test_run_with_no_instances() {
        let mut registry = MockServiceRegistry::new();
        registry
            .expect_services_for_cluster()
            .times(1)
            .returning(|| Ok(vec![]));

        let mut checker = MockInstanceCheck::new();
        checker.expect_check_service_instance().never();

        let mut output = MockPluginOutput::new();
        output
            .expect_ok()
            .withf(|message: &str| message == "Finished checking all services: ")
            .times(1)
            .return_const(());

        let runner = FleetRunner::new(
            setup_once(),
            Arc::new(registry),
            Arc::new(checker),
            Arc::new(output),
        );
        runner.run().await.unwrap();
    }

    #[tokio::test]
    async fn test_run_stops_at_first_failure() {
        let mut registry = MockServiceRegistry::new();
        registry
            .expect_services_for_cluster()
            .returning(|| Ok(fake_service_list()));

        let mut checker = MockInstanceCheck::new();
        checker
            .expect_check_service_instance()
            .withf(|target: &ServiceInstance| target.service == "fake_service1")
            .times(1)
            .returning(|target| {
                Err(CheckError::Soa(SoaError::UnknownInstance {
                    service: target.service,
                    instance: target.instance,
                    cluster: "norcal".to_string(),
                }))
            });
        checker
            .expect_check_service_instance()
            .withf(|target: &ServiceInstance| target.service == "fake_service2")
            .never();

        let mut output = MockPluginOutput::new();
        output.expect_ok().never();

        let runner = FleetRunner::new(
            setup_once(),
            Arc::new(registry),
            Arc::new(checker),
            Arc::new(output),
        );
        assert!(runner.run().await.is_err());
    }

    #[tokio::test]
    async fn test_registry_failure_aborts_before_any_check() {
        let mut registry = MockServiceRegistry::new();
        registry.expect_services_for_cluster().times(1).returning(|| {
            Err(SoaError::UnsupportedFramework("chronos".to_string()))
        });

        let mut checker = MockInstanceCheck::new();
        checker.expect_check_service_instance().never();
        let mut output = MockPluginOutput::new();
        output.expect_ok().never();

        let runner = FleetRunner::new(
            setup_once(),
            Arc::new(registry),
            Arc::new(checker),
            Arc::new(output),
        );
        assert!(matches!(runner.run().await, Err(CheckError::Soa(_))));
    }

    #[test]
    fn test_summary_message() {
        assert_eq!(
            summary_message(&[ServiceInstance::new("s1", "i1"), ServiceInstance::new("s2", "i2")]),
            "Finished checking all services: s1.i1 s2.i2"
        );
    }
}
