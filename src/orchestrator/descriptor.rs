use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};

use crate::catalog::ContractKind;
use crate::config::cfg::Coin;

/// Where the bytecode of a contract comes from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WasmSource {
    /// Optimized wasm file to upload.
    Path(PathBuf),
    /// Code already stored on chain, the upload is skipped.
    CodeId(u64),
}

impl WasmSource {
    /// `<wasm_dir>/<name>.wasm`
    pub fn from_wasm_dir<P: AsRef<Path>>(wasm_dir: P, name: &str) -> Self {
        WasmSource::Path(wasm_dir.as_ref().join(format!("{name}.wasm")))
    }
}

/// Everything needed to upload and instantiate one contract.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContractDescriptor {
    pub name: String,
    /// Schema the init msg is validated against, if known.
    pub kind: Option<ContractKind>,
    pub source: WasmSource,
    /// Instantiate msg template, may contain pending references.
    pub init_msg: Value,
    pub label: String,
    pub admin: Option<String>,
    #[serde(default)]
    pub funds: Vec<Coin>,
}

impl ContractDescriptor {
    pub fn new<S: Into<String>>(name: S, source: WasmSource, init_msg: Value) -> Self {
        let name = name.into();
        Self {
            label: name.clone(),
            name,
            kind: None,
            source,
            init_msg,
            admin: None,
            funds: vec![],
        }
    }

    pub fn kind(mut self, kind: ContractKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn admin<S: Into<String>>(mut self, admin: S) -> Self {
        self.admin = Some(admin.into());
        self
    }

    pub fn funds(mut self, funds: Vec<Coin>) -> Self {
        self.funds = funds;
        self
    }
}

/// An execute msg to send to an already deployed contract.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConfigUpdate {
    /// Registry name of the contract receiving the msg.
    pub target: String,
    pub kind: Option<ContractKind>,
    /// Execute msg template, may contain pending references.
    pub msg: Value,
}

impl ConfigUpdate {
    pub fn new<S: Into<String>>(target: S, msg: Value) -> Self {
        Self {
            target: target.into(),
            kind: None,
            msg,
        }
    }

    pub fn kind(mut self, kind: ContractKind) -> Self {
        self.kind = Some(kind);
        self
    }
}
