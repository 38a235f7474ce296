//! Multi contract [Cosmwasm] deployment orchestrator for the Stader liquid staking contracts.
//!
//! Uploads bytecode, instantiates contracts in dependency order against a configured
//! [Cosmos] based chain, and wires them together afterwards with configuration updates.
//!
//! Instantiate and execute messages are JSON templates. A string `"&staking"` inside a
//! template is a pending reference to the address of the contract deployed as `staking`
//! (`"&staking.code_id"` for its code id) and is substituted from the deployment registry
//! right before the message is validated and sent. A literal string starting with `&` is
//! written as `"&&..."`, see [orchestrator::reference::literal].
//!
//! [cosmwasm]: https://github.com/CosmWasm/cosmwasm
//! [Cosmos]: https://github.com/cosmos/cosmos-sdk
//!
//!
//! # Quick Start
//!
//! ```no_run
//! use stader_deploy::{
//!    config::{cfg::Config, key::{Key, SigningKey}},
//!    orchestrator::deployer::Deployer,
//!    plan::DeploymentPlan,
//! };
//!
//! let cfg = Config::from_yaml("config.yaml")?;
//! let key = SigningKey {
//!     name: "deployer".to_string(),
//!     key: Key::Mnemonic("word1 word2 ...".to_string()),
//! };
//!
//! let plan = DeploymentPlan::new(&cfg.wasm_dir, &cfg.deployment);
//! let mut deployer = Deployer::from_config(&cfg, key)?;
//!
//! // halts on the first failed contract, calling it again resumes from there
//! let outcomes = deployer.run_plan_blocking(plan)?;
//! for failed in outcomes.iter().filter(|o| o.is_err()) {
//!     println!("{:?}", failed);
//! }
//!
//! deployer.registry().save("deployed.json")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod catalog;

pub mod client;

pub mod config;

pub mod orchestrator;

pub mod plan;

#[cfg(test)]
pub(crate) mod testing;
