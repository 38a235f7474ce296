pub mod configurator;
pub mod deployer;
pub mod descriptor;
pub mod error;
pub mod executor;
pub mod reference;
pub mod registry;
pub mod runner;
