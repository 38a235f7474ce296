use log::{debug, info, warn};
use std::fs;

use super::descriptor::{ContractDescriptor, WasmSource};
use super::error::DeployError;
use super::reference::resolve_references;
use super::registry::{DeploymentRecord, DeploymentRegistry};
use crate::client::cosmwasm::CosmWasmClient;

/// Uploads (unless the code is already stored) and instantiates one contract.
///
/// Pending references in the init msg are resolved against `registry` and the
/// result is checked against the message catalog before anything is broadcast.
/// Neither the upload nor the instantiation is retried; when instantiation
/// fails the stored code id is reported in `DeployError::InstantiationFailed`
/// so it can be reused through `WasmSource::CodeId`.
pub async fn deploy_contract(
    client: &CosmWasmClient,
    registry: &DeploymentRegistry,
    descriptor: &ContractDescriptor,
) -> Result<DeploymentRecord, DeployError> {
    let msg = resolve_references(&descriptor.init_msg, registry)?;
    if let Some(kind) = descriptor.kind {
        kind.validate_instantiate(&msg)?;
    }
    let payload = serde_json::to_vec(&msg).map_err(DeployError::json)?;

    let code_id = match &descriptor.source {
        WasmSource::CodeId(code_id) => {
            info!("Using stored code id {} for {}", code_id, descriptor.name);
            *code_id
        }
        WasmSource::Path(path) => {
            info!("Storing {:?}", path);
            let wasm = fs::read(path).map_err(|e| DeployError::wasmfile(path, e))?;

            let res = client
                .store(wasm)
                .await
                .map_err(|e| DeployError::CodeUploadFailed {
                    contract: descriptor.name.clone(),
                    source: e,
                })?;
            debug!("{:?}", res.res);
            res.code_id
        }
    };

    info!("Instantiating {} from code id {}", descriptor.name, code_id);
    let res = client
        .instantiate(
            code_id,
            payload,
            descriptor.label.clone(),
            descriptor.admin.clone(),
            descriptor.funds.clone(),
        )
        .await
        .map_err(|e| {
            if let Some(tx) = e.committed() {
                warn!(
                    "{} instantiation committed in tx {} but its address is unknown, do not redeploy",
                    descriptor.name, tx.tx_hash
                );
            }
            DeployError::InstantiationFailed {
                contract: descriptor.name.clone(),
                code_id,
                source: e,
            }
        })?;
    debug!("{:?}", res.res);

    info!("{} deployed at {}", descriptor.name, res.address);

    Ok(DeploymentRecord {
        contract_name: descriptor.name.clone(),
        code_id,
        address: res.address,
    })
}
