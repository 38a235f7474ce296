use log::{error, info};

use super::descriptor::ContractDescriptor;
use super::error::{DeployError, RunError};
use super::executor::deploy_contract;
use super::registry::DeploymentRegistry;
use crate::client::cosmwasm::CosmWasmClient;

/// Deploys `descriptors` strictly in the given order.
///
/// The order must already satisfy every pending reference: a descriptor may
/// only reference contracts that come before it. The run halts on the first
/// failure and the returned `RunError` carries the registry built so far.
pub async fn run_deployment(
    client: &CosmWasmClient,
    descriptors: &[ContractDescriptor],
) -> Result<DeploymentRegistry, RunError> {
    resume_deployment(client, DeploymentRegistry::new(), descriptors).await
}

/// Same as [run_deployment] but starting from an existing registry.
///
/// Descriptors already present in `registry` are skipped and never redeployed.
pub async fn resume_deployment(
    client: &CosmWasmClient,
    mut registry: DeploymentRegistry,
    descriptors: &[ContractDescriptor],
) -> Result<DeploymentRegistry, RunError> {
    for descriptor in descriptors {
        if let Some(record) = registry.get(&descriptor.name) {
            info!(
                "Skipping {}, already deployed at {}",
                descriptor.name, record.address
            );
            continue;
        }

        let res = deploy_contract(client, &registry, descriptor).await;
        let res = res.and_then(|record| registry.record(record).map_err(DeployError::from));

        if let Err(e) = res {
            error!("Deployment halted at {}: {}", descriptor.name, e);
            return Err(RunError {
                contract: descriptor.name.clone(),
                source: e,
                registry,
            });
        }
    }

    Ok(registry)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;
    use crate::orchestrator::descriptor::WasmSource;
    use crate::testing::MockChain;

    fn descriptor(name: &str, init_msg: serde_json::Value) -> ContractDescriptor {
        ContractDescriptor::new(name, WasmSource::CodeId(1), init_msg)
    }

    fn names(registry: &DeploymentRegistry) -> Vec<&str> {
        registry
            .records()
            .iter()
            .map(|r| r.contract_name.as_str())
            .collect()
    }

    #[tokio::test]
    async fn deploys_in_input_order() {
        let chain = MockChain::new();
        let client = chain.client();
        let descriptors = vec![
            descriptor("a", json!({})),
            descriptor("b", json!({"a": "&a"})),
            descriptor("c", json!({"a": "&a", "b": "&b", "b_code": "&b.code_id"})),
        ];

        let registry = run_deployment(&client, &descriptors).await.unwrap();

        assert_eq!(names(&registry), vec!["a", "b", "c"]);
        let state = chain.state.lock().unwrap();
        assert_eq!(state.contract("c").config["b"], registry.address("b").unwrap());
        assert_eq!(state.contract("c").config["b_code"], 1);
    }

    #[tokio::test]
    async fn forward_reference_halts_with_partial_registry() {
        let chain = MockChain::new();
        let client = chain.client();
        let descriptors = vec![
            descriptor("a", json!({})),
            descriptor("b", json!({"a": "&a"})),
            descriptor("c", json!({"d": "&d"})),
            descriptor("d", json!({})),
        ];

        let err = run_deployment(&client, &descriptors).await.unwrap_err();

        assert_eq!(err.contract, "c");
        assert_matches!(&err.source, DeployError::UnresolvedReference { name } if name == "d");
        assert_eq!(names(&err.registry), vec!["a", "b"]);
        assert_eq!(chain.state.lock().unwrap().instantiate_calls, 2);
    }

    #[tokio::test]
    async fn chain_failure_halts_the_run() {
        let chain = MockChain::new().reject_instantiate("b");
        let client = chain.client();
        let descriptors = vec![
            descriptor("a", json!({})),
            descriptor("b", json!({})),
            descriptor("c", json!({})),
        ];

        let err = run_deployment(&client, &descriptors).await.unwrap_err();

        assert_eq!(err.contract, "b");
        assert_matches!(err.source, DeployError::InstantiationFailed { .. });
        assert!(err.to_string().contains("unauthorized"));
        assert_eq!(names(&err.registry), vec!["a"]);
        assert_eq!(chain.state.lock().unwrap().instantiate_calls, 2);
    }

    #[tokio::test]
    async fn resume_skips_deployed_contracts() {
        let chain = MockChain::new().reject_instantiate("b");
        let client = chain.client();
        let descriptors = vec![
            descriptor("a", json!({})),
            descriptor("b", json!({"a": "&a"})),
        ];

        let err = run_deployment(&client, &descriptors).await.unwrap_err();
        chain.state.lock().unwrap().reject_labels.clear();

        let registry = resume_deployment(&client, err.registry, &descriptors)
            .await
            .unwrap();

        assert_eq!(names(&registry), vec!["a", "b"]);
        // a once, b twice
        assert_eq!(chain.state.lock().unwrap().instantiate_calls, 3);
    }
}
