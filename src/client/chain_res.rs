use cosmrs::rpc::endpoint::broadcast::tx_commit::{Response, TxResult};
use cosmrs::tendermint::abci::Code;
use std::fmt;
use tendermint_rpc::endpoint::abci_query::AbciQuery;

/// Result of a single broadcast transaction (or ABCI query), successful or not.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TxOutcome {
    pub code: Code,
    pub codespace: String,
    pub log: String,
    pub data: Option<Vec<u8>>,
    pub gas_wanted: u64,
    pub gas_used: u64,
    pub tx_hash: String,
    pub height: u64,
}

impl TxOutcome {
    pub fn is_err(&self) -> bool {
        self.code.is_err()
    }

    pub(crate) fn from_commit(res: &Response, tx: &TxResult) -> TxOutcome {
        TxOutcome {
            tx_hash: res.hash.to_string(),
            height: res.height.value(),
            ..tx.clone().into()
        }
    }
}

impl fmt::Display for TxOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "code: {}, codespace: {:?}, raw_log: {}",
            self.code.value(),
            self.codespace,
            self.log
        )
    }
}

impl From<TxResult> for TxOutcome {
    fn from(res: TxResult) -> TxOutcome {
        TxOutcome {
            code: res.code,
            codespace: res.codespace.to_string(),
            log: res.log.to_string(),
            data: res.data.map(|d| d.into()),
            gas_wanted: res.gas_wanted.into(),
            gas_used: res.gas_used.into(),
            ..Default::default()
        }
    }
}

impl From<AbciQuery> for TxOutcome {
    fn from(res: AbciQuery) -> TxOutcome {
        TxOutcome {
            code: res.code,
            codespace: res.codespace,
            log: res.log.to_string(),
            data: Some(res.value),
            ..Default::default()
        }
    }
}

#[derive(Clone, Debug)]
pub struct StoreCodeResponse {
    pub code_id: u64,
    pub res: TxOutcome,
}

#[derive(Clone, Debug)]
pub struct InstantiateResponse {
    pub address: String,
    pub res: TxOutcome,
}

#[derive(Clone, Debug)]
pub struct ExecResponse {
    pub res: TxOutcome,
}
