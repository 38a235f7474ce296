use std::fmt::{self, Debug};
use std::future::Future;
use std::io;
use std::mem;
use std::sync::Arc;

use tokio::runtime::Runtime;

use super::configurator::{apply_config_updates, ConfigOutcome};
use super::descriptor::{ConfigUpdate, ContractDescriptor};
use super::error::RunError;
use super::registry::DeploymentRegistry;
use super::runner::resume_deployment;
use crate::client::cosmwasm::CosmWasmClient;
use crate::plan::DeploymentPlan;

#[cfg(not(test))]
use crate::config::{cfg::Config, error::ConfigError, key::SigningKey};

/// Deploys and configures contracts against the configured chain, keeping the
/// registry of everything deployed so far.
#[derive(Clone)]
pub struct Deployer {
    registry: DeploymentRegistry,
    client: CosmWasmClient,
    runtime: Arc<Runtime>,
}

impl Debug for Deployer {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self.registry)
    }
}

impl Deployer {
    /// Fails only if the runtime backing the `*_blocking` methods cannot be built.
    pub fn new(client: CosmWasmClient, registry: DeploymentRegistry) -> io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        Ok(Self {
            registry,
            client,
            runtime: Arc::new(runtime),
        })
    }

    /// Creates a Deployer from the supplied Config, signing with `key`.
    ///
    /// The registry starts with the contracts listed in `contract_deploy_info`.
    #[cfg(not(test))]
    pub fn from_config(cfg: &Config, key: SigningKey) -> Result<Self, ConfigError> {
        let client = CosmWasmClient::new(cfg.chain_cfg.clone(), key)?;
        Ok(Self::new(client, cfg.seeded_registry()?)?)
    }

    pub fn registry(&self) -> &DeploymentRegistry {
        &self.registry
    }

    /// Deploys `descriptors` in order, skipping contracts already in the registry.
    ///
    /// # Errors
    /// * The first failing contract halts the run with a [RunError]. Contracts
    ///   deployed before it stay recorded in [Self::registry()], so calling
    ///   `deploy` again resumes from the failure.
    pub async fn deploy(&mut self, descriptors: &[ContractDescriptor]) -> Result<(), RunError> {
        let registry = mem::take(&mut self.registry);
        match resume_deployment(&self.client, registry, descriptors).await {
            Ok(registry) => {
                self.registry = registry;
                Ok(())
            }
            Err(e) => {
                self.registry = e.registry.clone();
                Err(e)
            }
        }
    }

    /// Sends post deploy configuration updates.
    ///
    /// Never fails as a whole; inspect each [ConfigOutcome] and re-issue the failed ones.
    pub async fn configure(&self, updates: Vec<ConfigUpdate>) -> Vec<ConfigOutcome> {
        apply_config_updates(&self.client, &self.registry, updates).await
    }

    /// Deploys every contract of `plan`, then applies its reconciliation updates.
    pub async fn run_plan(&mut self, plan: DeploymentPlan) -> Result<Vec<ConfigOutcome>, RunError> {
        self.deploy(&plan.descriptors).await?;
        Ok(self.configure(plan.updates).await)
    }

    /// Blocking version of [Self::deploy()]
    pub fn deploy_blocking(&mut self, descriptors: &[ContractDescriptor]) -> Result<(), RunError> {
        let runtime = self.runtime.clone();
        tokio_block(&runtime, self.deploy(descriptors))
    }

    /// Blocking version of [Self::configure()]
    pub fn configure_blocking(&self, updates: Vec<ConfigUpdate>) -> Vec<ConfigOutcome> {
        tokio_block(&self.runtime, self.configure(updates))
    }

    /// Blocking version of [Self::run_plan()]
    pub fn run_plan_blocking(
        &mut self,
        plan: DeploymentPlan,
    ) -> Result<Vec<ConfigOutcome>, RunError> {
        let runtime = self.runtime.clone();
        tokio_block(&runtime, self.run_plan(plan))
    }
}

fn tokio_block<F: Future>(runtime: &Runtime, f: F) -> F::Output {
    runtime.block_on(f)
}
