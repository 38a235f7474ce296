//! The fixed Stader deployment sequence.
//!
//! The reward and staking contracts reference each other. The cycle is broken
//! in two phases: reward is instantiated with a placeholder staking address,
//! and a reconciliation update points it at the real staking contract once
//! both exist.

use cosmwasm_std::{Decimal, Uint128};
use cw20::Cw20Coin;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::path::{Path, PathBuf};

use crate::catalog::ContractKind;
use crate::config::cfg::Coin;
use crate::orchestrator::descriptor::{ConfigUpdate, ContractDescriptor, WasmSource};
use crate::orchestrator::reference::{literal, PendingReference};

pub const AIRDROPS_REGISTRY: &str = "airdrops_registry";
pub const REWARD: &str = "reward";
pub const STAKING: &str = "staking";
pub const CW20_TOKEN: &str = "cw20_token";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DeploymentParams {
    /// Address the reward contract is instantiated with until reconciliation.
    pub placeholder_address: String,
    pub reward_denom: String,

    pub min_deposit: Uint128,
    pub max_deposit: Uint128,
    pub airdrop_withdrawal_contract: String,
    pub protocol_fee_contract: String,
    pub protocol_reward_fee: Decimal,
    pub protocol_deposit_fee: Decimal,
    pub protocol_withdraw_fee: Decimal,
    pub unbonding_period: u64,
    pub undelegation_cooldown: u64,

    pub token_name: String,
    pub token_symbol: String,
    #[serde(default = "default_decimals")]
    pub token_decimals: u8,
    #[serde(default)]
    pub initial_balances: Vec<Cw20Coin>,

    /// Validators added to the staking contract after deployment.
    #[serde(default)]
    pub initial_validators: Vec<String>,
    /// Admin allowed to migrate every deployed contract.
    #[serde(default)]
    pub admin: Option<String>,
    /// Funds sent along with the staking contract instantiation.
    #[serde(default)]
    pub staking_init_funds: Vec<Coin>,
}

fn default_decimals() -> u8 {
    6
}

/// Contracts to deploy, in dependency order, plus the updates that wire them together.
#[derive(Clone, Debug)]
pub struct DeploymentPlan {
    pub descriptors: Vec<ContractDescriptor>,
    pub updates: Vec<ConfigUpdate>,
}

impl DeploymentPlan {
    pub fn new<P: AsRef<Path>>(wasm_dir: P, params: &DeploymentParams) -> Self {
        let wasm_dir = wasm_dir.as_ref();
        Self::with_sources(params, |name| WasmSource::from_wasm_dir(wasm_dir, name))
    }

    /// Builds the plan taking each contract's bytecode from `source`.
    pub fn with_sources<F>(params: &DeploymentParams, source: F) -> Self
    where
        F: Fn(&str) -> WasmSource,
    {
        let admin = |d: ContractDescriptor| match &params.admin {
            Some(admin) => d.admin(admin.clone()),
            None => d,
        };

        let descriptors = vec![
            admin(
                ContractDescriptor::new(AIRDROPS_REGISTRY, source(AIRDROPS_REGISTRY), json!({}))
                    .kind(ContractKind::AirdropsRegistry),
            ),
            admin(
                ContractDescriptor::new(
                    REWARD,
                    source(REWARD),
                    json!({
                        "staking_contract": literal(&params.placeholder_address),
                        "reward_denom": literal(&params.reward_denom),
                    }),
                )
                .kind(ContractKind::Reward),
            ),
            admin(
                ContractDescriptor::new(
                    STAKING,
                    source(STAKING),
                    json!({
                        "min_deposit": params.min_deposit,
                        "max_deposit": params.max_deposit,
                        "reward_contract": PendingReference::address(REWARD),
                        "airdrops_registry_contract": PendingReference::address(AIRDROPS_REGISTRY),
                        "airdrop_withdrawal_contract": literal(&params.airdrop_withdrawal_contract),
                        "protocol_fee_contract": literal(&params.protocol_fee_contract),
                        "protocol_reward_fee": params.protocol_reward_fee,
                        "protocol_deposit_fee": params.protocol_deposit_fee,
                        "protocol_withdraw_fee": params.protocol_withdraw_fee,
                        "unbonding_period": params.unbonding_period,
                        "undelegation_cooldown": params.undelegation_cooldown,
                    }),
                )
                .kind(ContractKind::Staking)
                .funds(params.staking_init_funds.clone()),
            ),
            admin(
                ContractDescriptor::new(
                    CW20_TOKEN,
                    source(CW20_TOKEN),
                    json!({
                        "name": literal(&params.token_name),
                        "symbol": literal(&params.token_symbol),
                        "decimals": params.token_decimals,
                        "initial_balances": params
                            .initial_balances
                            .iter()
                            .map(|c| json!({"address": literal(&c.address), "amount": c.amount}))
                            .collect::<Vec<_>>(),
                        "mint": { "minter": PendingReference::address(STAKING) },
                    }),
                )
                .kind(ContractKind::Cw20Token),
            ),
        ];

        let mut updates = vec![
            ConfigUpdate::new(
                REWARD,
                json!({"update_config": {"staking_contract": PendingReference::address(STAKING)}}),
            )
            .kind(ContractKind::Reward),
            ConfigUpdate::new(
                STAKING,
                json!({"update_config": {"config_request": {
                    "cw20_token_contract": PendingReference::address(CW20_TOKEN),
                }}}),
            )
            .kind(ContractKind::Staking),
        ];
        updates.extend(params.initial_validators.iter().map(|val_addr| {
            ConfigUpdate::new(STAKING, json!({"add_validator": {"val_addr": literal(val_addr)}}))
                .kind(ContractKind::Staking)
        }));

        Self {
            descriptors,
            updates,
        }
    }

    /// Bytecode files the plan uploads.
    pub fn wasm_paths(&self) -> Vec<&PathBuf> {
        self.descriptors
            .iter()
            .filter_map(|d| match &d.source {
                WasmSource::Path(p) => Some(p),
                WasmSource::CodeId(_) => None,
            })
            .collect()
    }
}
