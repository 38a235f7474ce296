use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct InstantiateMsg {}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub enum ExecuteMsg {
    UpdateAirdropRegistry {
        airdrop_token: String,
        airdrop_contract: String,
        cw20_contract: String,
    },
    SetManager {
        manager: String,
    },
    AcceptManager {},
}
