use config::Config as _Config;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::str::FromStr;
use tendermint_rpc::error::ErrorDetail::UnsupportedScheme;
use tendermint_rpc::{Error, Url};

use super::error::ConfigError;
use crate::client::error::ClientError;
use crate::orchestrator::registry::{DeploymentRecord, DeploymentRegistry};
use crate::plan::DeploymentParams;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    pub chain_cfg: ChainCfg,
    /// Directory holding the optimized `<contract_name>.wasm` artifacts
    pub wasm_dir: PathBuf,
    pub deployment: DeploymentParams,
    // used to configure already deployed contracts when resuming a run
    #[serde(default)]
    pub contract_deploy_info: BTreeMap<String, DeployInfo>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ChainCfg {
    pub denom: String,
    pub prefix: String,
    pub chain_id: String,
    pub rpc_endpoint: String,
    pub gas_prices: f64,
    pub gas_adjustment: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct DeployInfo {
    pub code_id: u64,
    pub address: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Coin {
    pub denom: String,
    pub amount: u64,
}

impl TryFrom<Coin> for cosmrs::Coin {
    type Error = ClientError;

    fn try_from(coin: Coin) -> Result<cosmrs::Coin, ClientError> {
        Ok(cosmrs::Coin {
            denom: coin
                .denom
                .parse()
                .map_err(|_| ClientError::Denom { name: coin.denom })?,
            amount: coin.amount.into(),
        })
    }
}

impl Config {
    pub fn from_yaml(file: &str) -> Result<Config, ConfigError> {
        let settings = _Config::builder()
            .add_source(config::File::with_name(file))
            .build()?;

        let mut cfg = settings.try_deserialize::<Config>()?;
        cfg.chain_cfg.rpc_endpoint = parse_url(&cfg.chain_cfg.rpc_endpoint)?;

        Ok(cfg)
    }

    /// Registry pre-populated with `contract_deploy_info`.
    ///
    /// BTreeMap iteration is by name, so seeded records are ordered
    /// alphabetically rather than by their original deployment order.
    pub fn seeded_registry(&self) -> Result<DeploymentRegistry, ConfigError> {
        let mut registry = DeploymentRegistry::new();
        for (name, info) in &self.contract_deploy_info {
            registry.record(DeploymentRecord {
                contract_name: name.clone(),
                code_id: info.code_id,
                address: info.address.clone(),
            })?;
        }
        Ok(registry)
    }
}

// Attempt to parse the configured url to ensure that it is valid.
// If url is missing the Scheme then default to https.
pub(crate) fn parse_url(url: &str) -> Result<String, Error> {
    let u = Url::from_str(url);

    if let Err(Error(UnsupportedScheme(detail), report)) = u {
        // if url is missing the scheme, then we will default to https:
        if !url.contains("://") {
            return Ok(format!("https://{}", url));
        }

        return Err(Error(UnsupportedScheme(detail), report));
    }

    Ok(u?.to_string())
}
