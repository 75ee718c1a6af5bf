//! In-memory provider for unit tests.

use std::collections::HashMap;

use alloy_primitives::{Address, U256};
use async_trait::async_trait;

use crate::chain::{ChainEndpoint, ChainIdCapability, StaticChainId};
use crate::error::{Result, WalletError};
use crate::keys::PublicKeyHash;
use crate::provider::Provider;

pub(crate) struct MockProvider {
    pub chain: StaticChainId,
    pub wallets: HashMap<PublicKeyHash, Address>,
    pub nonces: HashMap<Address, U256>,
    pub offline: bool,
}

impl MockProvider {
    pub fn new(chain_id: u64) -> Self {
        Self {
            chain: StaticChainId(chain_id),
            wallets: HashMap::new(),
            nonces: HashMap::new(),
            offline: false,
        }
    }

    pub fn with_wallet(mut self, hash: PublicKeyHash, wallet: Address, nonce: U256) -> Self {
        self.wallets.insert(hash, wallet);
        self.nonces.insert(wallet, nonce);
        self
    }
}

impl ChainEndpoint for MockProvider {
    fn chain_id_capability(&self) -> ChainIdCapability<'_> {
        ChainIdCapability::Direct(&self.chain)
    }
}

#[async_trait]
impl Provider for MockProvider {
    async fn wallet_from_hash(&self, _gateway: Address, hash: PublicKeyHash) -> Result<Address> {
        if self.offline {
            return Err(WalletError::provider("connection refused"));
        }
        Ok(self.wallets.get(&hash).copied().unwrap_or(Address::ZERO))
    }

    async fn wallet_nonce(&self, wallet: Address) -> Result<U256> {
        if self.offline {
            return Err(WalletError::provider("connection refused"));
        }
        self.nonces
            .get(&wallet)
            .copied()
            .ok_or_else(|| WalletError::provider(format!("no contract at {wallet}")))
    }
}
