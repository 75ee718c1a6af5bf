//! Adapts a raw call transport (an RPC client, a signer-backed account) into
//! [`Provider`] and [`FundingAccount`] by ABI-encoding the gateway and wallet
//! calls.

use std::fmt;
use std::sync::Arc;

use alloy_primitives::{Address, Bytes, B256, U256};
use async_trait::async_trait;
use chain_eth::abi::{decode_address, decode_uint};
use tracing::debug;

use crate::chain::{ChainEndpoint, ChainIdCapability};
use crate::error::Result;
use crate::gateway::{encode_wallet_from_hash, encode_wallet_nonce, ActionCalls};
use crate::keys::PublicKeyHash;
use crate::provider::{FundingAccount, Provider, TxReceipt};

/// The minimal surface of a chain client.
#[async_trait]
pub trait CallTransport: ChainEndpoint {
    /// `eth_call` of `data` against `to` at the latest block.
    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes>;

    /// Signs and broadcasts a transaction from the transport's own account.
    async fn send_transaction(&self, to: Address, data: Bytes, value: U256) -> Result<B256>;

    async fn wait_for_receipt(&self, tx_hash: B256) -> Result<TxReceipt>;
}

pub struct TransportProvider<T: ?Sized> {
    transport: Arc<T>,
}

impl<T: CallTransport + ?Sized> TransportProvider<T> {
    pub fn new(transport: Arc<T>) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &Arc<T> {
        &self.transport
    }
}

impl<T: ?Sized> Clone for TransportProvider<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
        }
    }
}

impl<T: ?Sized> fmt::Debug for TransportProvider<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransportProvider").finish_non_exhaustive()
    }
}

impl<T: CallTransport + ?Sized> ChainEndpoint for TransportProvider<T> {
    fn chain_id_capability(&self) -> ChainIdCapability<'_> {
        self.transport.chain_id_capability()
    }
}

#[async_trait]
impl<T: CallTransport + ?Sized> Provider for TransportProvider<T> {
    async fn wallet_from_hash(&self, gateway: Address, hash: PublicKeyHash) -> Result<Address> {
        let output = self.transport.call(gateway, encode_wallet_from_hash(hash)).await?;
        Ok(decode_address(&output)?)
    }

    async fn wallet_nonce(&self, wallet: Address) -> Result<U256> {
        let output = self.transport.call(wallet, encode_wallet_nonce()).await?;
        Ok(decode_uint(&output)?)
    }
}

#[async_trait]
impl<T: CallTransport + ?Sized + 'static> FundingAccount for TransportProvider<T> {
    fn provider(&self) -> Arc<dyn Provider> {
        Arc::new(self.clone())
    }

    async fn submit_action_calls(&self, gateway: Address, calls: &ActionCalls) -> Result<B256> {
        let data = calls.encode_calldata()?;
        debug!(%gateway, operations = calls.operations.len(), bytes = data.len(), "sending gateway batch");
        self.transport.send_transaction(gateway, data, U256::ZERO).await
    }

    async fn wait_for_receipt(&self, tx_hash: B256) -> Result<TxReceipt> {
        self.transport.wait_for_receipt(tx_hash).await
    }
}
