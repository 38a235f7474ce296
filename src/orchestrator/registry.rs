use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::fs;
use std::path::Path;

use super::error::{PersistError, RegistryError};

pub type ContractName = String;

/// Code id and address assigned by the chain to one deployed contract.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeploymentRecord {
    pub contract_name: ContractName,
    pub code_id: u64,
    pub address: String,
}

#[derive(Serialize, Deserialize)]
struct DeployInfo {
    code_id: u64,
    address: String,
}

/// Append-only record of every contract deployed by a run, in deployment order.
///
/// Serializes as a json object `{ name: { code_id, address } }` whose keys keep
/// the deployment order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DeploymentRegistry {
    records: Vec<DeploymentRecord>,
}

impl DeploymentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a freshly deployed contract.
    ///
    /// A name can only be recorded once; recorded facts are never overwritten.
    pub fn record(&mut self, record: DeploymentRecord) -> Result<(), RegistryError> {
        if self.contains(&record.contract_name) {
            return Err(RegistryError::AlreadyRecorded {
                name: record.contract_name,
            });
        }
        self.records.push(record);
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn get(&self, name: &str) -> Option<&DeploymentRecord> {
        self.records.iter().find(|r| r.contract_name == name)
    }

    /// Returns the stored code id for a given contract name
    pub fn code_id(&self, name: &str) -> Result<u64, RegistryError> {
        self.get(name)
            .map(|r| r.code_id)
            .ok_or(RegistryError::NotDeployed { name: name.into() })
    }

    /// Returns the stored contract address for a given contract name
    pub fn address(&self, name: &str) -> Result<&str, RegistryError> {
        self.get(name)
            .map(|r| r.address.as_str())
            .ok_or(RegistryError::NotDeployed { name: name.into() })
    }

    pub fn records(&self) -> &[DeploymentRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, PersistError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|e| PersistError::io(path, e))?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), PersistError> {
        let path = path.as_ref();
        let json = serde_json::to_vec_pretty(self)?;
        fs::write(path, json).map_err(|e| PersistError::io(path, e))
    }
}

impl Serialize for DeploymentRegistry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.records.len()))?;
        for r in &self.records {
            map.serialize_entry(
                &r.contract_name,
                &DeployInfo {
                    code_id: r.code_id,
                    address: r.address.clone(),
                },
            )?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for DeploymentRegistry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RegistryVisitor;

        impl<'de> Visitor<'de> for RegistryVisitor {
            type Value = DeploymentRegistry;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of contract name to {code_id, address}")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut registry = DeploymentRegistry::new();
                while let Some((name, info)) = access.next_entry::<ContractName, DeployInfo>()? {
                    registry
                        .record(DeploymentRecord {
                            contract_name: name,
                            code_id: info.code_id,
                            address: info.address,
                        })
                        .map_err(serde::de::Error::custom)?;
                }
                Ok(registry)
            }
        }

        deserializer.deserialize_map(RegistryVisitor)
    }
}

impl fmt::Display for DeploymentRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in &self.records {
            writeln!(
                f,
                "{:<20} code_id: {:<6} address: {}",
                r.contract_name, r.code_id, r.address
            )?;
        }
        Ok(())
    }
}
