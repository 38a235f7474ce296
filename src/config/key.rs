use cosmrs::{bip32, crypto::secp256k1, AccountId};

use crate::client::error::ClientError;

// https://github.com/confio/cosmos-hd-key-derivation-spec#the-cosmos-hub-path
const DERVIATION_PATH: &str = "m/44'/118'/0'/0/0";

/// Identity used to sign every transaction of a deployment run.
#[derive(Debug, Clone)]
pub struct SigningKey {
    /// human readable key name
    pub name: String,
    /// private key associated with `name`
    pub key: Key,
}

#[derive(Debug, Clone)]
pub enum Key {
    /// Mnemonic allows you to pass the private key mnemonic words
    /// for configuring the deployer key.
    /// DO NOT USE FOR MAINNET
    Mnemonic(String),
}

impl SigningKey {
    pub fn to_account(&self, prefix: &str) -> Result<AccountId, ClientError> {
        let key: secp256k1::SigningKey = self.try_into()?;
        key.public_key()
            .account_id(prefix)
            .map_err(|_| ClientError::AccountId {
                id: self.name.clone(),
            })
    }
}

impl TryFrom<&SigningKey> for secp256k1::SigningKey {
    type Error = ClientError;

    fn try_from(signer: &SigningKey) -> Result<secp256k1::SigningKey, ClientError> {
        match &signer.key {
            Key::Mnemonic(phrase) => {
                let seed = bip32::Mnemonic::new(phrase, bip32::Language::English)
                    .map_err(|_| ClientError::Mnemonic)?
                    .to_seed("");
                let path = DERVIATION_PATH
                    .parse()
                    .map_err(|_| ClientError::DerviationPath)?;
                Ok(bip32::XPrv::derive_from_path(seed, &path)
                    .map_err(|_| ClientError::DerviationPath)?
                    .into())
            }
        }
    }
}
