//! Calldata for the verification gateway and wallet contracts.

use alloy_primitives::{Address, Bytes, B256, U256};
use chain_eth::abi::{encode_function_call, split_words, AbiValue};
use chain_eth::hash::selector;
use serde::{Deserialize, Serialize};

use crate::error::{Result, WalletError};
use crate::keys::PublicKeyHash;
use crate::transaction::SignedTransaction;

/// `walletFromHash(bytes32) -> address` on the gateway.
pub const WALLET_FROM_HASH: &str = "walletFromHash(bytes32)";

/// `nonce() -> uint256` on a wallet contract.
pub const WALLET_NONCE: &str = "nonce()";

const ACTION_CALL_TUPLE: &str = "(bytes32,uint256,address,uint256,uint256,address,bytes)";

/// One operation inside a gateway batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionCall {
    pub public_key_hash: B256,
    pub nonce: U256,
    pub reward_token_address: Address,
    pub reward_token_amount: U256,
    pub eth_value: U256,
    pub contract_address: Address,
    pub encoded_function: Bytes,
}

impl ActionCall {
    pub fn from_signed(tx: &SignedTransaction) -> Self {
        Self {
            public_key_hash: tx.public_key_hash().as_b256(),
            nonce: tx.request.nonce,
            reward_token_address: tx.request.reward_token_address,
            reward_token_amount: tx.request.reward_token_amount,
            eth_value: tx.request.eth_value,
            contract_address: tx.request.contract_address,
            encoded_function: tx.request.encoded_function.clone(),
        }
    }

    fn to_abi(&self) -> AbiValue {
        AbiValue::Tuple(vec![
            AbiValue::FixedBytes(self.public_key_hash.to_vec()),
            AbiValue::Uint(self.nonce),
            AbiValue::Address(self.reward_token_address),
            AbiValue::Uint(self.reward_token_amount),
            AbiValue::Uint(self.eth_value),
            AbiValue::Address(self.contract_address),
            AbiValue::Bytes(self.encoded_function.to_vec()),
        ])
    }
}

/// Arguments of the gateway's batched entry point
/// `actionCalls(rewardRecipient, publicKeys, signature, operations)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionCalls {
    /// Receives submission rewards; zero for self-submitted batches.
    pub reward_recipient: Address,
    /// One public key per operation, split into `uint256` words.
    pub public_keys: Vec<Vec<U256>>,
    /// The (aggregate) signature over all operations, split into words.
    pub signature: Vec<U256>,
    pub operations: Vec<ActionCall>,
}

impl ActionCalls {
    /// A single-operation batch carrying `tx`, with no reward recipient.
    pub fn single(tx: &SignedTransaction) -> Result<Self> {
        let signature = split_words(&tx.signature)
            .map_err(|e| WalletError::SigningFailed(format!("unexpected signature encoding: {e}")))?;
        Ok(Self {
            reward_recipient: Address::ZERO,
            public_keys: vec![tx.public_key.words()?],
            signature,
            operations: vec![ActionCall::from_signed(tx)],
        })
    }

    /// The canonical function signature. Word counts of keys and signature are
    /// part of it, so they come from the batch itself.
    pub fn function_signature(&self) -> Result<String> {
        let key_words = self
            .public_keys
            .first()
            .map(Vec::len)
            .ok_or_else(|| WalletError::InvalidPublicKey("batch carries no public keys".into()))?;
        if self.public_keys.iter().any(|words| words.len() != key_words) {
            return Err(WalletError::InvalidPublicKey(
                "public keys in a batch must have the same width".into(),
            ));
        }
        Ok(format!(
            "actionCalls(address,uint256[{key_words}][],uint256[{}],{ACTION_CALL_TUPLE}[])",
            self.signature.len()
        ))
    }

    pub fn encode_calldata(&self) -> Result<Bytes> {
        if self.public_keys.len() != self.operations.len() {
            return Err(WalletError::Internal(format!(
                "batch has {} public keys for {} operations",
                self.public_keys.len(),
                self.operations.len()
            )));
        }

        let signature = self.function_signature()?;
        let public_keys = self
            .public_keys
            .iter()
            .map(|words| AbiValue::FixedArray(words.iter().copied().map(AbiValue::Uint).collect()))
            .collect();
        let args = [
            AbiValue::Address(self.reward_recipient),
            AbiValue::Array(public_keys),
            AbiValue::FixedArray(self.signature.iter().copied().map(AbiValue::Uint).collect()),
            AbiValue::Array(self.operations.iter().map(ActionCall::to_abi).collect()),
        ];
        Ok(encode_function_call(selector(&signature), &args).into())
    }
}

pub fn encode_wallet_from_hash(hash: PublicKeyHash) -> Bytes {
    encode_function_call(
        selector(WALLET_FROM_HASH),
        &[AbiValue::FixedBytes(hash.as_b256().to_vec())],
    )
    .into()
}

pub fn encode_wallet_nonce() -> Bytes {
    encode_function_call(selector(WALLET_NONCE), &[]).into()
}
