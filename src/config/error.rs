use config::ConfigError as _ConfigError;
use thiserror::Error;

use crate::client::error::ClientError;
use crate::orchestrator::error::RegistryError;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Error parsing url")]
    UrlParse(#[from] tendermint_rpc::Error),

    #[error("invalid contract_deploy_info")]
    DeployInfo(#[from] RegistryError),

    #[error(transparent)]
    Config(#[from] _ConfigError),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("failed to start async runtime")]
    Runtime(#[from] std::io::Error),
}
