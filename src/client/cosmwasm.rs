use cosmrs::cosmwasm::{MsgExecuteContract, MsgInstantiateContract, MsgStoreCode};
use cosmrs::crypto::secp256k1;
use cosmrs::rpc::HttpClient;
use cosmrs::tx::Msg;
use cosmrs::AccountId;

use super::chain_res::{ExecResponse, InstantiateResponse, StoreCodeResponse, TxOutcome};
use super::cosmos::{find_attribute, send_tx};
use super::error::ClientError;
use crate::config::cfg::{ChainCfg, Coin};
use crate::config::key::SigningKey;

/// Chain access for a single deployer identity.
///
/// Every method signs with the wrapped key and awaits the commit before returning.
#[cfg_attr(test, faux::create)]
#[derive(Clone, Debug)]
pub struct CosmWasmClient {
    // http tendermint RPC client
    rpc_client: HttpClient,
    cfg: ChainCfg,
    key: SigningKey,
}

#[cfg_attr(test, faux::methods)]
impl CosmWasmClient {
    // HACK: faux doesn't support mocking a struct wrapped in a Result
    // so we are just ignoring the constructor for this crate's tests
    #[cfg(not(test))]
    pub fn new(cfg: ChainCfg, key: SigningKey) -> Result<Self, ClientError> {
        Ok(Self {
            rpc_client: HttpClient::new(cfg.rpc_endpoint.as_str())?,
            cfg,
            key,
        })
    }

    /// Bech32 account address of the deployer.
    pub fn sender(&self) -> Result<String, ClientError> {
        Ok(self.key.to_account(&self.cfg.prefix)?.to_string())
    }

    pub async fn store(&self, wasm: Vec<u8>) -> Result<StoreCodeResponse, ClientError> {
        let signing_key: secp256k1::SigningKey = (&self.key).try_into()?;
        let account_id = self.key.to_account(&self.cfg.prefix)?;

        let msg = MsgStoreCode {
            sender: account_id.clone(),
            wasm_byte_code: wasm,
            instantiate_permission: None,
        }
        .to_any()
        .map_err(ClientError::proto_encoding)?;

        let tx_res = send_tx(
            &self.rpc_client,
            vec![msg],
            &signing_key,
            account_id,
            &self.cfg,
        )
        .await?;

        let res = TxOutcome::from_commit(&tx_res, &tx_res.deliver_tx);
        let code_id = find_attribute(&tx_res, "store_code", "code_id")?;
        let code_id = match code_id.parse::<u64>() {
            Ok(code_id) => code_id,
            Err(_) => return Err(ClientError::missing_event("store_code", "code_id", res)),
        };

        Ok(StoreCodeResponse { code_id, res })
    }

    pub async fn instantiate(
        &self,
        code_id: u64,
        payload: Vec<u8>,
        label: String,
        admin: Option<String>,
        funds: Vec<Coin>,
    ) -> Result<InstantiateResponse, ClientError> {
        let signing_key: secp256k1::SigningKey = (&self.key).try_into()?;
        let account_id = self.key.to_account(&self.cfg.prefix)?;

        let mut cosm_funds = vec![];
        for fund in funds {
            cosm_funds.push(fund.try_into()?);
        }

        let msg = MsgInstantiateContract {
            sender: account_id.clone(),
            admin: admin.map(|a| parse_address(&a)).transpose()?,
            code_id,
            label: Some(label),
            msg: payload,
            funds: cosm_funds,
        }
        .to_any()
        .map_err(ClientError::proto_encoding)?;

        let tx_res = send_tx(
            &self.rpc_client,
            vec![msg],
            &signing_key,
            account_id,
            &self.cfg,
        )
        .await?;

        let res = TxOutcome::from_commit(&tx_res, &tx_res.deliver_tx);
        let address = find_attribute(&tx_res, "instantiate", "_contract_address")?;
        if parse_address(&address).is_err() {
            return Err(ClientError::missing_event("instantiate", "_contract_address", res));
        }

        Ok(InstantiateResponse { address, res })
    }

    pub async fn execute(
        &self,
        address: String,
        payload: Vec<u8>,
        funds: Vec<Coin>,
    ) -> Result<ExecResponse, ClientError> {
        let signing_key: secp256k1::SigningKey = (&self.key).try_into()?;
        let account_id = self.key.to_account(&self.cfg.prefix)?;

        let mut cosm_funds = vec![];
        for fund in funds {
            cosm_funds.push(fund.try_into()?);
        }

        let msg = MsgExecuteContract {
            sender: account_id.clone(),
            contract: parse_address(&address)?,
            msg: payload,
            funds: cosm_funds,
        }
        .to_any()
        .map_err(ClientError::proto_encoding)?;

        let tx_res = send_tx(
            &self.rpc_client,
            vec![msg],
            &signing_key,
            account_id,
            &self.cfg,
        )
        .await?;

        Ok(ExecResponse {
            res: TxOutcome::from_commit(&tx_res, &tx_res.deliver_tx),
        })
    }
}

fn parse_address(addr: &str) -> Result<AccountId, ClientError> {
    addr.parse().map_err(|_| ClientError::Address {
        addr: addr.to_string(),
    })
}
