use cosmrs::ErrorReport;
use prost::{DecodeError, EncodeError};
use thiserror::Error;

use super::chain_res::TxOutcome;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("invalid account ID: {id:?}")]
    AccountId { id: String },

    #[error("invalid contract address: {addr:?}")]
    Address { addr: String },

    #[error("cryptographic error")]
    Crypto { source: ErrorReport },

    #[error("invalid denomination: {name:?}")]
    Denom { name: String },

    #[error("invalid chainId: {chain_id:?}")]
    ChainId { chain_id: String },

    #[error("invalid mnemonic")]
    Mnemonic,

    #[error("invalid derivation path")]
    DerviationPath,

    #[error("proto encoding error")]
    ProtoEncoding { source: ErrorReport },

    #[error("proto decoding error")]
    ProtoDecoding { source: ErrorReport },

    #[error("tx {} committed at height {} but its {event:?} event has no valid {attribute:?}", res.tx_hash, res.height)]
    MissingEvent {
        event: String,
        attribute: String,
        res: TxOutcome,
    },

    #[error("CosmosSDK error ({res})")]
    CosmosSdk { res: TxOutcome },

    #[error(transparent)]
    RPC(#[from] tendermint_rpc::Error),
}

impl ClientError {
    pub fn crypto(e: ErrorReport) -> ClientError {
        ClientError::Crypto { source: e }
    }

    pub fn proto_encoding(e: ErrorReport) -> ClientError {
        ClientError::ProtoEncoding { source: e }
    }

    pub fn prost_proto_en(e: EncodeError) -> ClientError {
        ClientError::ProtoEncoding { source: e.into() }
    }

    pub fn prost_proto_de(e: DecodeError) -> ClientError {
        ClientError::ProtoDecoding { source: e.into() }
    }

    pub fn missing_event(event: &str, attribute: &str, res: TxOutcome) -> ClientError {
        ClientError::MissingEvent {
            event: event.to_string(),
            attribute: attribute.to_string(),
            res,
        }
    }

    /// The chain's outcome when the chain itself rejected the transaction.
    pub fn outcome(&self) -> Option<&TxOutcome> {
        match self {
            ClientError::CosmosSdk { res } => Some(res),
            _ => None,
        }
    }

    /// The committed tx when the call failed after the chain accepted it.
    ///
    /// The chain state has already changed; recover from this tx instead of resending.
    pub fn committed(&self) -> Option<&TxOutcome> {
        match self {
            ClientError::MissingEvent { res, .. } => Some(res),
            _ => None,
        }
    }
}
