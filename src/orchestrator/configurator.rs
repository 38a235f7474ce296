use log::{debug, info, warn};

use super::descriptor::ConfigUpdate;
use super::error::ConfigureError;
use super::reference::resolve_references;
use super::registry::DeploymentRegistry;
use crate::client::chain_res::ExecResponse;
use crate::client::cosmwasm::CosmWasmClient;

/// Result of one [ConfigUpdate].
#[derive(Debug)]
pub struct ConfigOutcome {
    pub update: ConfigUpdate,
    pub result: Result<ExecResponse, ConfigureError>,
}

impl ConfigOutcome {
    pub fn is_err(&self) -> bool {
        self.result.is_err()
    }
}

/// Sends every update to its already deployed target, in order.
///
/// Updates are independent of each other: a failed update is recorded in its
/// outcome and the remaining updates are still sent. Returns one outcome per
/// update, in the same order.
pub async fn apply_config_updates(
    client: &CosmWasmClient,
    registry: &DeploymentRegistry,
    updates: Vec<ConfigUpdate>,
) -> Vec<ConfigOutcome> {
    let mut outcomes = Vec::with_capacity(updates.len());

    for update in updates {
        let result = apply_config_update(client, registry, &update).await;
        if let Err(e) = &result {
            warn!("Config update on {} failed: {}", update.target, e);
        }
        outcomes.push(ConfigOutcome { update, result });
    }

    outcomes
}

async fn apply_config_update(
    client: &CosmWasmClient,
    registry: &DeploymentRegistry,
    update: &ConfigUpdate,
) -> Result<ExecResponse, ConfigureError> {
    let msg = resolve_references(&update.msg, registry)?;
    let address = registry
        .address(&update.target)
        .map_err(|_| ConfigureError::UnknownTarget {
            name: update.target.clone(),
        })?
        .to_string();
    if let Some(kind) = update.kind {
        kind.validate_execute(&msg)?;
    }
    let payload = serde_json::to_vec(&msg).map_err(ConfigureError::json)?;

    info!("Configuring {} at {}", update.target, address);
    let res = client
        .execute(address, payload, vec![])
        .await
        .map_err(|e| ConfigureError::ExecuteFailed {
            target: update.target.clone(),
            source: e,
        })?;
    debug!("{:?}", res.res);

    Ok(res)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;
    use crate::catalog::ContractKind;
    use crate::orchestrator::descriptor::{ContractDescriptor, WasmSource};
    use crate::orchestrator::runner::run_deployment;
    use crate::testing::MockChain;

    async fn deployed(chain: &MockChain, names: &[&str]) -> DeploymentRegistry {
        let descriptors: Vec<_> = names
            .iter()
            .map(|n| ContractDescriptor::new(*n, WasmSource::CodeId(1), json!({})))
            .collect();
        run_deployment(&chain.client(), &descriptors).await.unwrap()
    }

    #[tokio::test]
    async fn failed_update_does_not_stop_the_others() {
        let chain = MockChain::new().reject_execute(1);
        let registry = deployed(&chain, &["a", "b", "c"]).await;

        let outcomes = apply_config_updates(
            &chain.client(),
            &registry,
            vec![
                ConfigUpdate::new("a", json!({"update_config": {"b": "&b"}})),
                ConfigUpdate::new("b", json!({"update_config": {"c": "&c"}})),
                ConfigUpdate::new("c", json!({"update_config": {"a": "&a"}})),
            ],
        )
        .await;

        assert_eq!(outcomes.len(), 3);
        assert!(!outcomes[0].is_err());
        assert!(outcomes[1].is_err());
        assert!(!outcomes[2].is_err());

        let err = outcomes[1].result.as_ref().unwrap_err();
        assert_matches!(err, ConfigureError::ExecuteFailed { target, .. } if target == "b");
        assert_eq!(err.outcome().unwrap().code.value(), 5);

        let state = chain.state.lock().unwrap();
        assert_eq!(state.executed.len(), 3);
        assert_eq!(state.contract("c").config["a"], registry.address("a").unwrap());
    }

    #[tokio::test]
    async fn unknown_target_and_unresolved_reference_are_recorded() {
        let chain = MockChain::new();
        let registry = deployed(&chain, &["a"]).await;

        let outcomes = apply_config_updates(
            &chain.client(),
            &registry,
            vec![
                ConfigUpdate::new("missing", json!({"update_config": {}})),
                ConfigUpdate::new("a", json!({"update_config": {"x": "&missing"}})),
                ConfigUpdate::new("a", json!({"update_config": {"x": "&a"}})),
                ConfigUpdate::new("missing", json!({"update_config": {"x": "&gone"}})),
            ],
        )
        .await;

        assert_matches!(
            &outcomes[0].result,
            Err(ConfigureError::UnknownTarget { name }) if name == "missing"
        );
        assert_matches!(
            &outcomes[1].result,
            Err(ConfigureError::UnresolvedReference { name }) if name == "missing"
        );
        assert!(!outcomes[2].is_err());
        // references are resolved before the target is looked up
        assert_matches!(
            &outcomes[3].result,
            Err(ConfigureError::UnresolvedReference { name }) if name == "gone"
        );
        // only the third update reached the chain
        assert_eq!(chain.state.lock().unwrap().executed.len(), 1);
    }

    #[tokio::test]
    async fn schema_violations_never_reach_the_chain() {
        let chain = MockChain::new();
        let registry = deployed(&chain, &["reward"]).await;

        let outcomes = apply_config_updates(
            &chain.client(),
            &registry,
            vec![ConfigUpdate::new("reward", json!({"update_config": {"staking": "&reward"}}))
                .kind(ContractKind::Reward)],
        )
        .await;

        assert_matches!(&outcomes[0].result, Err(ConfigureError::InvalidMessage(_)));
        assert!(chain.state.lock().unwrap().executed.is_empty());
    }

    #[tokio::test]
    async fn cyclic_references_are_reconciled() {
        let chain = MockChain::new();
        let client = chain.client();
        let descriptors = vec![
            ContractDescriptor::new(
                "Reward",
                WasmSource::CodeId(1),
                json!({"staking_contract": "PLACEHOLDER"}),
            ),
            ContractDescriptor::new(
                "Staking",
                WasmSource::CodeId(2),
                json!({"reward_contract": "&Reward"}),
            ),
        ];

        let registry = run_deployment(&client, &descriptors).await.unwrap();
        let outcomes = apply_config_updates(
            &client,
            &registry,
            vec![ConfigUpdate::new(
                "Reward",
                json!({"update_config": {"staking_contract": "&Staking"}}),
            )],
        )
        .await;

        assert!(!outcomes[0].is_err());
        let state = chain.state.lock().unwrap();
        assert_eq!(
            state.contract("Reward").config["staking_contract"],
            registry.address("Staking").unwrap()
        );
        assert_eq!(
            state.contract("Staking").config["reward_contract"],
            registry.address("Reward").unwrap()
        );
    }
}
