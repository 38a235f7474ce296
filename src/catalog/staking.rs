use cosmwasm_std::{Addr, Decimal, Uint128};
use cw20::Cw20ReceiveMsg;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct InstantiateMsg {
    pub min_deposit: Uint128,
    pub max_deposit: Uint128,

    pub reward_contract: String,
    pub airdrops_registry_contract: String,
    pub airdrop_withdrawal_contract: String,

    pub protocol_fee_contract: String,
    // 1 is 100%, 0.02 is 2%
    pub protocol_reward_fee: Decimal,
    pub protocol_deposit_fee: Decimal,
    pub protocol_withdraw_fee: Decimal,

    pub unbonding_period: u64,
    pub undelegation_cooldown: u64,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub enum ExecuteMsg {
    AddValidator {
        val_addr: Addr,
    },
    RemoveValidator {
        val_addr: Addr,
        redel_addr: Addr,
    },
    RebalancePool {
        amount: Uint128,
        val_addr: Addr,
        redel_addr: Addr,
    },
    Deposit {},
    RedeemRewards {},
    Swap {},
    /// Sent by the cw20 token contract on `send`, `cw20_msg.msg` carries a [Cw20HookMsg].
    QueueUndelegate {
        cw20_msg: Cw20ReceiveMsg,
    },
    Undelegate {},
    ReconcileFunds {},
    WithdrawFundsToWallet {
        batch_id: u64,
    },
    ClaimAirdrops {
        rates: Vec<AirdropRate>,
    },
    UpdateConfig {
        config_request: ConfigUpdateRequest,
    },
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub enum Cw20HookMsg {
    QueueUndelegate {},
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct AirdropRate {
    pub denom: String,
    // uAirdrop per 10^6 uBase
    pub amount: Uint128,
    pub stage: u8,
    pub proof: Vec<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct ConfigUpdateRequest {
    pub active: Option<bool>,
    pub min_deposit: Option<Uint128>,
    pub max_deposit: Option<Uint128>,

    /// Only accepted once by the staking contract.
    pub cw20_token_contract: Option<String>,
    pub protocol_fee_contract: Option<String>,
    pub protocol_reward_fee: Option<Decimal>,
    pub protocol_withdraw_fee: Option<Decimal>,
    pub protocol_deposit_fee: Option<Decimal>,
    pub airdrop_withdrawal_contract: Option<String>,
    pub airdrop_registry_contract: Option<String>,

    pub unbonding_period: Option<u64>,
    pub undelegation_cooldown: Option<u64>,
}
