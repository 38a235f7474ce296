use std::path::PathBuf;
use thiserror::Error;

use super::reference::UnresolvedReference;
use super::registry::DeploymentRegistry;
use crate::catalog::CatalogError;
use crate::client::chain_res::TxOutcome;
use crate::client::error::ClientError;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum RegistryError {
    #[error("smart contract not deployed: {name:?}")]
    NotDeployed { name: String },

    #[error("smart contract already recorded: {name:?}")]
    AlreadyRecorded { name: String },
}

#[derive(Error, Debug)]
pub enum PersistError {
    #[error("error accessing registry file {path:?}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("registry file is not valid json")]
    Json(#[from] serde_json::Error),
}

impl PersistError {
    pub fn io(path: &std::path::Path, e: std::io::Error) -> PersistError {
        PersistError::Io {
            path: path.to_path_buf(),
            source: e,
        }
    }
}

/// Failure of a single upload + instantiate step.
#[derive(Error, Debug)]
pub enum DeployError {
    #[error("error reading wasm file {path:?}")]
    WasmFileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("init msg references {name:?} which has not been deployed")]
    UnresolvedReference { name: String },

    #[error("invalid init msg")]
    InvalidMessage(#[from] CatalogError),

    #[error("serde json serialization error")]
    JsonSerialize { source: serde_json::Error },

    #[error("code upload failed for {contract:?}: {source}")]
    CodeUploadFailed {
        contract: String,
        source: ClientError,
    },

    #[error("instantiation of {contract:?} failed (code id {code_id} remains stored): {source}")]
    InstantiationFailed {
        contract: String,
        code_id: u64,
        source: ClientError,
    },

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

impl DeployError {
    pub fn wasmfile(path: &std::path::Path, e: std::io::Error) -> DeployError {
        DeployError::WasmFileRead {
            path: path.to_path_buf(),
            source: e,
        }
    }

    pub fn json(e: serde_json::Error) -> DeployError {
        DeployError::JsonSerialize { source: e }
    }

    /// Outcome reported by the chain, when the chain rejected the tx.
    pub fn outcome(&self) -> Option<&TxOutcome> {
        match self {
            DeployError::CodeUploadFailed { source, .. }
            | DeployError::InstantiationFailed { source, .. } => source.outcome(),
            _ => None,
        }
    }

    /// Tx the chain committed before the step failed. Redeploying would duplicate it.
    pub fn committed(&self) -> Option<&TxOutcome> {
        match self {
            DeployError::CodeUploadFailed { source, .. }
            | DeployError::InstantiationFailed { source, .. } => source.committed(),
            _ => None,
        }
    }
}

impl From<UnresolvedReference> for DeployError {
    fn from(e: UnresolvedReference) -> DeployError {
        DeployError::UnresolvedReference { name: e.name }
    }
}

/// Aborted deployment run.
///
/// `registry` holds every contract deployed before `contract` failed, so the
/// run can be resumed from this point.
#[derive(Error, Debug)]
#[error("deployment halted at {contract:?}: {source}")]
pub struct RunError {
    pub contract: String,
    pub source: DeployError,
    pub registry: DeploymentRegistry,
}

/// Failure of a single post-deploy configuration update.
#[derive(Error, Debug)]
pub enum ConfigureError {
    #[error("config target {name:?} has not been deployed")]
    UnknownTarget { name: String },

    #[error("config msg references {name:?} which has not been deployed")]
    UnresolvedReference { name: String },

    #[error("invalid config msg")]
    InvalidMessage(#[from] CatalogError),

    #[error("serde json serialization error")]
    JsonSerialize { source: serde_json::Error },

    #[error("execute on {target:?} failed: {source}")]
    ExecuteFailed { target: String, source: ClientError },
}

impl From<UnresolvedReference> for ConfigureError {
    fn from(e: UnresolvedReference) -> ConfigureError {
        ConfigureError::UnresolvedReference { name: e.name }
    }
}

impl ConfigureError {
    pub fn json(e: serde_json::Error) -> ConfigureError {
        ConfigureError::JsonSerialize { source: e }
    }

    pub fn outcome(&self) -> Option<&TxOutcome> {
        match self {
            ConfigureError::ExecuteFailed { source, .. } => source.outcome(),
            _ => None,
        }
    }
}
