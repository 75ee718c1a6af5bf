//! Read and write access to the chain, as the wallet lifecycle needs it.

use std::sync::Arc;

use alloy_primitives::{Address, B256, U256};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::chain::ChainEndpoint;
use crate::error::Result;
use crate::gateway::ActionCalls;
use crate::keys::PublicKeyHash;

/// Outcome of a mined transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxReceipt {
    pub tx_hash: B256,
    pub success: bool,
    pub block_number: Option<u64>,
}

/// Read-only view of the gateway registry and wallet contracts.
#[async_trait]
pub trait Provider: ChainEndpoint {
    /// The wallet registered under `hash`, or the zero address.
    async fn wallet_from_hash(&self, gateway: Address, hash: PublicKeyHash) -> Result<Address>;

    /// Current nonce of the wallet contract at `wallet`.
    async fn wallet_nonce(&self, wallet: Address) -> Result<U256>;
}

/// An account able to pay for and submit gateway transactions.
#[async_trait]
pub trait FundingAccount: ChainEndpoint {
    /// The provider reads go through after submission.
    fn provider(&self) -> Arc<dyn Provider>;

    /// Submits a gateway batch and returns the transaction hash.
    async fn submit_action_calls(&self, gateway: Address, calls: &ActionCalls) -> Result<B256>;

    /// Blocks until `tx_hash` is mined. No timeout.
    async fn wait_for_receipt(&self, tx_hash: B256) -> Result<TxReceipt>;
}
