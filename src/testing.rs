//! Simulated chain behind a faux mocked `CosmWasmClient`.

use serde_json::Value;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::client::chain_res::{ExecResponse, InstantiateResponse, StoreCodeResponse, TxOutcome};
use crate::client::cosmwasm::CosmWasmClient;
use crate::client::error::ClientError;
use crate::client::Code;

pub(crate) const DEPLOYER: &str = "terra1deployer";

#[derive(Debug)]
pub(crate) struct Contract {
    pub label: String,
    pub address: String,
    pub code_id: u64,
    /// Init msg with every `update_config` merged in.
    pub config: Value,
}

#[derive(Debug, Default)]
pub(crate) struct ChainState {
    pub codes: Vec<Vec<u8>>,
    pub contracts: Vec<Contract>,
    pub store_calls: usize,
    pub instantiate_calls: usize,
    pub executed: Vec<(String, Value)>,

    pub reject_wasm: Vec<Vec<u8>>,
    pub reject_labels: Vec<String>,
    /// Labels whose instantiation commits without an `instantiate` event.
    pub eventless_labels: Vec<String>,
    /// Zero based indexes of execute calls the chain rejects.
    pub reject_executes: Vec<usize>,
}

impl ChainState {
    pub fn contract(&self, label: &str) -> &Contract {
        self.contracts
            .iter()
            .find(|c| c.label == label)
            .unwrap_or_else(|| panic!("{label} was never instantiated"))
    }
}

pub(crate) fn rejected(code: u32, log: &str) -> ClientError {
    ClientError::CosmosSdk {
        res: TxOutcome {
            code: Code::Err(code),
            codespace: "wasm".to_string(),
            log: log.to_string(),
            ..Default::default()
        },
    }
}

fn committed(height: usize) -> TxOutcome {
    TxOutcome {
        tx_hash: format!("{height:064X}"),
        height: height as u64,
        gas_wanted: 200_000,
        gas_used: 150_000,
        ..Default::default()
    }
}

/// Writes `contents` to a fresh wasm file and returns its path.
pub(crate) fn wasm_file(name: &str, contents: &[u8]) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("stader-deploy-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join(format!("{name}.wasm"));
    std::fs::write(&path, contents).unwrap();
    path
}

pub(crate) struct MockChain {
    pub state: Arc<Mutex<ChainState>>,
}

impl MockChain {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(ChainState::default())),
        }
    }

    pub fn reject_wasm(self, wasm: &[u8]) -> Self {
        self.state.lock().unwrap().reject_wasm.push(wasm.to_vec());
        self
    }

    pub fn reject_instantiate(self, label: &str) -> Self {
        self.state.lock().unwrap().reject_labels.push(label.to_string());
        self
    }

    pub fn drop_instantiate_event(self, label: &str) -> Self {
        self.state.lock().unwrap().eventless_labels.push(label.to_string());
        self
    }

    pub fn reject_execute(self, index: usize) -> Self {
        self.state.lock().unwrap().reject_executes.push(index);
        self
    }

    pub fn client(&self) -> CosmWasmClient {
        let mut client = CosmWasmClient::faux();

        faux::when!(client.sender).then(|_| Ok(DEPLOYER.to_string()));

        let state = self.state.clone();
        faux::when!(client.store).then(move |wasm| {
            let mut state = state.lock().unwrap();
            state.store_calls += 1;
            if state.reject_wasm.contains(&wasm) {
                return Err(rejected(2, "failed to validate wasm bytecode"));
            }
            state.codes.push(wasm);
            let code_id = state.codes.len() as u64;
            Ok(StoreCodeResponse {
                code_id,
                res: committed(state.store_calls),
            })
        });

        let state = self.state.clone();
        faux::when!(client.instantiate).then(move |(code_id, payload, label, _admin, _funds)| {
            let mut state = state.lock().unwrap();
            state.instantiate_calls += 1;
            if state.reject_labels.contains(&label) {
                return Err(rejected(4, "unauthorized"));
            }
            let address = format!("terra1{}{}", label, state.contracts.len());
            state.contracts.push(Contract {
                label: label.clone(),
                address: address.clone(),
                code_id,
                config: serde_json::from_slice(&payload).unwrap(),
            });
            let res = committed(state.instantiate_calls);
            if state.eventless_labels.contains(&label) {
                return Err(ClientError::missing_event("instantiate", "_contract_address", res));
            }
            Ok(InstantiateResponse { address, res })
        });

        let state = self.state.clone();
        faux::when!(client.execute).then(move |(address, payload, _funds)| {
            let mut state = state.lock().unwrap();
            let index = state.executed.len();
            let msg: Value = serde_json::from_slice(&payload).unwrap();
            state.executed.push((address.clone(), msg.clone()));
            if state.reject_executes.contains(&index) {
                return Err(rejected(5, "unauthorized: only manager can update config"));
            }

            let contract = state
                .contracts
                .iter_mut()
                .find(|c| c.address == address)
                .ok_or_else(|| rejected(22, "contract not found"))?;
            if let Some(update) = msg.get("update_config").and_then(Value::as_object) {
                let update = update
                    .get("config_request")
                    .and_then(Value::as_object)
                    .unwrap_or(update);
                for (field, value) in update {
                    contract.config[field] = value.clone();
                }
            }
            Ok(ExecResponse {
                res: committed(index + 1),
            })
        });

        client
    }
}
