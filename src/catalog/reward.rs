use cosmwasm_std::Uint128;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct InstantiateMsg {
    /// Address of the staking contract. Usually a placeholder at
    /// instantiation, since the staking contract needs this contract's address first.
    pub staking_contract: String,
    pub reward_denom: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub enum ExecuteMsg {
    Swap {},
    Transfer { amount: Uint128 },
    UpdateConfig { staking_contract: Option<String> },
}
