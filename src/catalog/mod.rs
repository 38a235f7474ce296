//! Typed instantiate / execute messages for the contracts this crate deploys.
//!
//! Deployment templates are plain JSON so they can carry pending references.
//! Once references are resolved the JSON is checked against these types, so a
//! missing field or a badly encoded value is caught before a tx is broadcast.
//!
//! Value encodings follow `cosmwasm-std`: `Uint128` is a decimal string,
//! `Decimal` a decimal string with 18 fractional digits, `Binary` base64 and
//! `Timestamp` a string of nanoseconds.

pub mod airdrops_registry;
pub mod reward;
pub mod staking;

pub use cw20_base::msg as cw20_token;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
#[error("{kind} {msg_type} message does not match its schema")]
pub struct CatalogError {
    pub kind: ContractKind,
    pub msg_type: MsgType,
    pub source: serde_json::Error,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MsgType {
    Instantiate,
    Execute,
}

impl fmt::Display for MsgType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MsgType::Instantiate => write!(f, "instantiate"),
            MsgType::Execute => write!(f, "execute"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractKind {
    Staking,
    Reward,
    AirdropsRegistry,
    Cw20Token,
}

impl fmt::Display for ContractKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ContractKind::Staking => "staking",
            ContractKind::Reward => "reward",
            ContractKind::AirdropsRegistry => "airdrops_registry",
            ContractKind::Cw20Token => "cw20_token",
        };
        write!(f, "{name}")
    }
}

impl ContractKind {
    pub fn validate_instantiate(&self, msg: &Value) -> Result<(), CatalogError> {
        match self {
            ContractKind::Staking => self.check::<staking::InstantiateMsg>(MsgType::Instantiate, msg),
            ContractKind::Reward => self.check::<reward::InstantiateMsg>(MsgType::Instantiate, msg),
            ContractKind::AirdropsRegistry => {
                self.check::<airdrops_registry::InstantiateMsg>(MsgType::Instantiate, msg)
            }
            ContractKind::Cw20Token => {
                self.check::<cw20_token::InstantiateMsg>(MsgType::Instantiate, msg)
            }
        }
    }

    pub fn validate_execute(&self, msg: &Value) -> Result<(), CatalogError> {
        match self {
            ContractKind::Staking => self.check::<staking::ExecuteMsg>(MsgType::Execute, msg),
            ContractKind::Reward => self.check::<reward::ExecuteMsg>(MsgType::Execute, msg),
            ContractKind::AirdropsRegistry => {
                self.check::<airdrops_registry::ExecuteMsg>(MsgType::Execute, msg)
            }
            ContractKind::Cw20Token => self.check::<cw20_token::ExecuteMsg>(MsgType::Execute, msg),
        }
    }

    fn check<T: DeserializeOwned>(&self, msg_type: MsgType, msg: &Value) -> Result<(), CatalogError> {
        T::deserialize(msg).map(|_| ()).map_err(|e| CatalogError {
            kind: *self,
            msg_type,
            source: e,
        })
    }
}
