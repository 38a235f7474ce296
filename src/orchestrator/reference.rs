//! Pending references inside message templates.
//!
//! A json string `"&reward"` stands for the address of the contract deployed
//! as `reward`, and `"&reward.code_id"` for its code id. References are
//! resolved against the registry right before the message is sent.
//!
//! A literal string starting with `&` is written with the prefix doubled
//! (`"&&LunaX"` is sent as `"&LunaX"`); [literal] does the escaping.

use serde::{Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use thiserror::Error;

use super::registry::DeploymentRegistry;

const PREFIX: char = '&';
const CODE_ID_SUFFIX: &str = ".code_id";

#[derive(Error, Debug, PartialEq, Eq)]
#[error("pending reference to {name:?} cannot be resolved")]
pub struct UnresolvedReference {
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PendingReference {
    Address(String),
    CodeId(String),
}

impl PendingReference {
    pub fn address<S: Into<String>>(name: S) -> Self {
        PendingReference::Address(name.into())
    }

    pub fn code_id<S: Into<String>>(name: S) -> Self {
        PendingReference::CodeId(name.into())
    }

    pub fn parse(s: &str) -> Option<Self> {
        let name = s.strip_prefix(PREFIX)?;
        if name.starts_with(PREFIX) {
            return None;
        }
        let reference = match name.strip_suffix(CODE_ID_SUFFIX) {
            Some(name) => PendingReference::CodeId(name.to_string()),
            None => PendingReference::Address(name.to_string()),
        };
        if reference.name().is_empty() {
            return None;
        }
        Some(reference)
    }

    pub fn name(&self) -> &str {
        match self {
            PendingReference::Address(name) | PendingReference::CodeId(name) => name,
        }
    }

    pub fn resolve(&self, registry: &DeploymentRegistry) -> Result<Value, UnresolvedReference> {
        let record = registry.get(self.name()).ok_or_else(|| UnresolvedReference {
            name: self.name().to_string(),
        })?;

        Ok(match self {
            PendingReference::Address(_) => Value::String(record.address.clone()),
            PendingReference::CodeId(_) => Value::from(record.code_id),
        })
    }
}

/// Template form of the reference, as it appears inside a message template.
impl fmt::Display for PendingReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PendingReference::Address(name) => write!(f, "{PREFIX}{name}"),
            PendingReference::CodeId(name) => write!(f, "{PREFIX}{name}{CODE_ID_SUFFIX}"),
        }
    }
}

impl Serialize for PendingReference {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Escapes `s` so it is sent verbatim instead of being read as a reference.
pub fn literal(s: &str) -> String {
    if s.starts_with(PREFIX) {
        format!("{PREFIX}{s}")
    } else {
        s.to_string()
    }
}

/// Every pending reference in `value`.
pub fn references(value: &Value) -> Vec<PendingReference> {
    let mut refs = vec![];
    collect(value, &mut refs);
    refs
}

fn collect(value: &Value, refs: &mut Vec<PendingReference>) {
    match value {
        Value::String(s) => refs.extend(PendingReference::parse(s)),
        Value::Array(array) => array.iter().for_each(|v| collect(v, refs)),
        Value::Object(map) => map.values().for_each(|v| collect(v, refs)),
        _ => {}
    }
}

/// Returns a copy of `template` with every pending reference substituted.
///
/// Fails on the first reference whose contract is not in `registry`.
pub fn resolve_references(
    template: &Value,
    registry: &DeploymentRegistry,
) -> Result<Value, UnresolvedReference> {
    let mut value = template.clone();
    replace(&mut value, registry)?;
    Ok(value)
}

fn replace(value: &mut Value, registry: &DeploymentRegistry) -> Result<(), UnresolvedReference> {
    match value {
        Value::String(s) => {
            if let Some(reference) = PendingReference::parse(s) {
                *value = reference.resolve(registry)?;
            } else if let Some(escaped) = s.strip_prefix(PREFIX).filter(|s| s.starts_with(PREFIX)) {
                *value = Value::String(escaped.to_string());
            }
        }
        Value::Array(array) => {
            for value in array {
                replace(value, registry)?;
            }
        }
        Value::Object(map) => {
            for (_, value) in map {
                replace(value, registry)?;
            }
        }
        _ => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orchestrator::registry::DeploymentRecord;
    use serde_json::json;

    fn registry() -> DeploymentRegistry {
        let mut registry = DeploymentRegistry::new();
        registry
            .record(DeploymentRecord {
                contract_name: "reward".to_string(),
                code_id: 42,
                address: "terra1reward".to_string(),
            })
            .unwrap();
        registry
    }

    #[test]
    fn parses_references() {
        assert_eq!(
            PendingReference::parse("&reward"),
            Some(PendingReference::address("reward"))
        );
        assert_eq!(
            PendingReference::parse("&reward.code_id"),
            Some(PendingReference::code_id("reward"))
        );
        assert_eq!(PendingReference::parse("uluna"), None);
        assert_eq!(PendingReference::parse("&"), None);
    }

    #[test]
    fn template_form_round_trips() {
        let value = json!({"code": PendingReference::code_id("reward")});
        assert_eq!(value, json!({"code": "&reward.code_id"}));
        assert_eq!(
            PendingReference::parse(value["code"].as_str().unwrap()),
            Some(PendingReference::code_id("reward"))
        );
    }

    #[test]
    fn resolves_nested_references() {
        let template = json!({
            "reward_contract": "&reward",
            "codes": ["&reward.code_id"],
            "nested": {"denom": "uluna"},
        });

        let resolved = resolve_references(&template, &registry()).unwrap();
        assert_eq!(
            resolved,
            json!({
                "reward_contract": "terra1reward",
                "codes": [42],
                "nested": {"denom": "uluna"},
            })
        );
    }

    #[test]
    fn resolving_twice_is_stable() {
        let template = json!({"reward_contract": "&reward"});
        let registry = registry();

        assert_eq!(
            resolve_references(&template, &registry).unwrap(),
            resolve_references(&template, &registry).unwrap()
        );
    }

    #[test]
    fn unresolved_reference_names_the_contract() {
        let template = json!({"staking_contract": "&staking"});

        assert_eq!(
            resolve_references(&template, &registry()).unwrap_err(),
            UnresolvedReference {
                name: "staking".to_string()
            }
        );
    }

    #[test]
    fn escaped_strings_are_sent_verbatim() {
        assert_eq!(literal("&Stader LunaX"), "&&Stader LunaX");
        assert_eq!(literal("uluna"), "uluna");
        assert_eq!(PendingReference::parse("&&reward"), None);

        let template = json!({
            "name": literal("&Stader LunaX"),
            "symbols": [literal("&&x"), "&reward"],
        });
        assert_eq!(
            references(&template),
            vec![PendingReference::address("reward")]
        );

        assert_eq!(
            resolve_references(&template, &registry()).unwrap(),
            json!({
                "name": "&Stader LunaX",
                "symbols": ["&&x", "terra1reward"],
            })
        );
    }

    #[test]
    fn lists_nested_references() {
        let template = json!({"a": "&reward", "b": ["&staking.code_id", "plain"]});

        assert_eq!(
            references(&template),
            vec![
                PendingReference::address("reward"),
                PendingReference::code_id("staking")
            ]
        );
    }
}
