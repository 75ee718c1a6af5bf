use alloy_primitives::{Address, Bytes, U256};
use chain_eth::abi::{AbiValue, ContractAbi};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::keys::{PrivateKey, PublicKey, PublicKeyHash};
use crate::signer::WalletSigner;

/// An operation a wallet authorizes: a call on `contract_address` plus the
/// wallet-specific metadata the gateway checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRequest {
    pub contract_address: Address,
    pub encoded_function: Bytes,
    pub nonce: U256,
    pub reward_token_address: Address,
    pub reward_token_amount: U256,
    pub eth_value: U256,
}

impl TransactionRequest {
    pub fn new(
        contract_address: Address,
        encoded_function: impl Into<Bytes>,
        nonce: U256,
        fees: &FeeTerms,
    ) -> Self {
        Self {
            contract_address,
            encoded_function: encoded_function.into(),
            nonce,
            reward_token_address: fees.reward_token_address,
            reward_token_amount: fees.reward_token_amount,
            eth_value: fees.eth_value,
        }
    }

    /// The payload that registers a new wallet: addressed at the gateway with
    /// an empty call, nonce zero and no reward or value.
    pub fn creation(gateway: Address) -> Self {
        Self::new(gateway, Bytes::new(), U256::ZERO, &FeeTerms::default())
    }
}

/// Reward and value terms attached to a signed transaction. All zero by
/// default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeTerms {
    /// Token paid to whoever submits the transaction; zero means none.
    pub reward_token_address: Address,
    pub reward_token_amount: U256,
    /// Native value forwarded with the call.
    pub eth_value: U256,
}

impl FeeTerms {
    pub fn with_reward(mut self, token: Address, amount: U256) -> Self {
        self.reward_token_address = token;
        self.reward_token_amount = amount;
        self
    }

    pub fn with_eth_value(mut self, value: U256) -> Self {
        self.eth_value = value;
        self
    }
}

/// A signed request. Plain data: serializable and independent of any live
/// connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedTransaction {
    #[serde(flatten)]
    pub request: TransactionRequest,
    pub public_key: PublicKey,
    pub signature: Bytes,
}

impl SignedTransaction {
    pub fn public_key_hash(&self) -> PublicKeyHash {
        self.public_key.hash()
    }
}

/// A deployed contract and the functions callers may encode against it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractInterface {
    address: Address,
    abi: ContractAbi,
}

impl ContractInterface {
    pub fn new(address: Address, abi: ContractAbi) -> Self {
        Self { address, abi }
    }

    /// Builds the interface from human-readable function signatures such as
    /// `"function transfer(address to, uint256 amount)"`.
    pub fn from_signatures<S: AsRef<str>>(address: Address, signatures: &[S]) -> Result<Self> {
        Ok(Self::new(address, ContractAbi::parse(signatures)?))
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn abi(&self) -> &ContractAbi {
        &self.abi
    }

    /// Encodes a call to `method`, given as a bare name or a full signature.
    pub fn encode_function_data(&self, method: &str, args: &[AbiValue]) -> Result<Bytes> {
        Ok(self.abi.encode_function_data(method, args)?.into())
    }
}

/// Encodes `method(args)` against `contract` and signs it with the given
/// nonce and fee terms. No network access.
pub fn sign_call(
    signer: &dyn WalletSigner,
    private_key: &PrivateKey,
    contract: &ContractInterface,
    method: &str,
    args: &[AbiValue],
    nonce: U256,
    fees: &FeeTerms,
) -> Result<SignedTransaction> {
    let encoded_function = contract.encode_function_data(method, args)?;
    debug!(
        contract = %contract.address(),
        method,
        %nonce,
        chain_id = signer.chain_id(),
        "signing contract call"
    );
    let request = TransactionRequest::new(contract.address(), encoded_function, nonce, fees);
    signer.sign(&request, private_key)
}
