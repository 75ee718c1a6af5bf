//! In-memory gateway and funding account shared by the integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use alloy_primitives::{Address, Bytes, B256, U256};
use async_trait::async_trait;
use smart_wallet::chain::ChainIdCapability;
use smart_wallet::{
    ActionCalls, ChainEndpoint, FundingAccount, Provider, PublicKey, PublicKeyHash, Result,
    Secp256k1Signer, SignedTransaction, StaticChainId, TransactionRequest, TxReceipt,
    WalletError, WalletSigner,
};

pub const GATEWAY: Address = Address::new([0x44; 20]);
pub const CHAIN_ID: u64 = 31337;

#[derive(Default)]
pub struct ChainState {
    pub registry: HashMap<PublicKeyHash, Address>,
    pub nonces: HashMap<Address, U256>,
    pub submissions: Vec<ActionCalls>,
    pub receipts: HashMap<B256, TxReceipt>,
    pub reads: usize,
}

/// Read side of the fake chain. Clones share state.
#[derive(Clone)]
pub struct FakeChain {
    chain: StaticChainId,
    pub state: Arc<Mutex<ChainState>>,
}

impl FakeChain {
    pub fn new() -> Self {
        Self {
            chain: StaticChainId(CHAIN_ID),
            state: Arc::default(),
        }
    }

    pub fn register(&self, hash: PublicKeyHash, wallet: Address, nonce: U256) {
        let mut state = self.state.lock().unwrap();
        state.registry.insert(hash, wallet);
        state.nonces.insert(wallet, nonce);
    }

    pub fn submissions(&self) -> usize {
        self.state.lock().unwrap().submissions.len()
    }

    pub fn set_nonce(&self, wallet: Address, nonce: U256) {
        self.state.lock().unwrap().nonces.insert(wallet, nonce);
    }
}

impl ChainEndpoint for FakeChain {
    fn chain_id_capability(&self) -> ChainIdCapability<'_> {
        ChainIdCapability::Direct(&self.chain)
    }
}

#[async_trait]
impl Provider for FakeChain {
    async fn wallet_from_hash(&self, gateway: Address, hash: PublicKeyHash) -> Result<Address> {
        let mut state = self.state.lock().unwrap();
        state.reads += 1;
        if gateway != GATEWAY {
            return Ok(Address::ZERO);
        }
        Ok(state.registry.get(&hash).copied().unwrap_or(Address::ZERO))
    }

    async fn wallet_nonce(&self, wallet: Address) -> Result<U256> {
        let mut state = self.state.lock().unwrap();
        state.reads += 1;
        state
            .nonces
            .get(&wallet)
            .copied()
            .ok_or_else(|| WalletError::provider(format!("call to non-contract {wallet}")))
    }
}

/// How the fake gateway reacts to a creation batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayBehavior {
    /// Verifies the operation and registers a fresh wallet.
    Register,
    /// Confirms the transaction but registers nothing.
    Ignore,
    /// Reverts the transaction.
    Revert,
    /// Reverts, while another party registers the wallet in the meantime.
    RevertAfterRace,
}

pub struct FakeFunder {
    pub chain: FakeChain,
    pub behavior: GatewayBehavior,
}

impl FakeFunder {
    pub fn new(chain: FakeChain) -> Self {
        Self::with_behavior(chain, GatewayBehavior::Register)
    }

    pub fn with_behavior(chain: FakeChain, behavior: GatewayBehavior) -> Self {
        Self { chain, behavior }
    }
}

impl ChainEndpoint for FakeFunder {
    fn chain_id_capability(&self) -> ChainIdCapability<'_> {
        self.chain.chain_id_capability()
    }
}

/// Rebuilds the signed transaction behind operation `index` of a batch.
pub fn operation_tx(calls: &ActionCalls, index: usize) -> SignedTransaction {
    let op = &calls.operations[index];
    let key_bytes: Vec<u8> = calls.public_keys[index]
        .iter()
        .flat_map(|word| word.to_be_bytes::<32>())
        .collect();
    let signature: Vec<u8> = calls
        .signature
        .iter()
        .flat_map(|word| word.to_be_bytes::<32>())
        .collect();

    SignedTransaction {
        request: TransactionRequest {
            contract_address: op.contract_address,
            encoded_function: op.encoded_function.clone(),
            nonce: op.nonce,
            reward_token_address: op.reward_token_address,
            reward_token_amount: op.reward_token_amount,
            eth_value: op.eth_value,
        },
        public_key: PublicKey::new(key_bytes),
        signature: Bytes::from(signature),
    }
}

#[async_trait]
impl FundingAccount for FakeFunder {
    fn provider(&self) -> Arc<dyn Provider> {
        Arc::new(self.chain.clone())
    }

    async fn submit_action_calls(&self, gateway: Address, calls: &ActionCalls) -> Result<B256> {
        let mut state = self.chain.state.lock().unwrap();
        state.submissions.push(calls.clone());
        let tx_hash = B256::with_last_byte(state.submissions.len() as u8);

        let tx = operation_tx(calls, 0);
        let hash = PublicKeyHash::from(calls.operations[0].public_key_hash);
        let verified = gateway == GATEWAY
            && hash == tx.public_key_hash()
            && Secp256k1Signer::new(CHAIN_ID).verify(&tx);
        let wallet = Address::with_last_byte(0xa0 + state.submissions.len() as u8);

        let success = match self.behavior {
            GatewayBehavior::Register if verified && !state.registry.contains_key(&hash) => {
                state.registry.insert(hash, wallet);
                state.nonces.insert(wallet, U256::ZERO);
                true
            }
            GatewayBehavior::Register => false,
            GatewayBehavior::Ignore => true,
            GatewayBehavior::Revert => false,
            GatewayBehavior::RevertAfterRace => {
                state.registry.insert(hash, wallet);
                state.nonces.insert(wallet, U256::ZERO);
                false
            }
        };

        let block_number = Some(state.submissions.len() as u64);
        state.receipts.insert(
            tx_hash,
            TxReceipt {
                tx_hash,
                success,
                block_number,
            },
        );
        Ok(tx_hash)
    }

    async fn wait_for_receipt(&self, tx_hash: B256) -> Result<TxReceipt> {
        self.chain
            .state
            .lock()
            .unwrap()
            .receipts
            .get(&tx_hash)
            .copied()
            .ok_or_else(|| WalletError::provider(format!("unknown transaction {tx_hash}")))
    }
}
