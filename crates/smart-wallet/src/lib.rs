//! Smart-contract wallets registered through a verification gateway.
//!
//! A wallet is identified by the hash of its owner's public key. The gateway
//! maps that hash to a wallet contract; [`SmartWalletClient`] looks wallets up,
//! connects to them and creates them on demand, and [`SmartWallet`] signs
//! operations for submission through the gateway.

pub mod chain;
pub mod config;
pub mod ecdsa;
pub mod error;
pub mod gateway;
pub mod keys;
pub mod nonce;
pub mod provider;
pub mod resolver;
pub mod signer;
pub mod transaction;
pub mod transport;
pub mod validation;
pub mod wallet;

#[cfg(test)]
mod mock;

pub use chain::{ChainContext, ChainEndpoint, ChainIdCapability, StaticChainId};
pub use config::GatewayConfig;
pub use ecdsa::{Secp256k1Signer, Secp256k1SignerFactory};
pub use error::{Result, WalletError};
pub use gateway::{ActionCall, ActionCalls};
pub use keys::{PrivateKey, PublicKey, PublicKeyHash};
pub use nonce::{nonce_of_handle, nonce_of_public_key};
pub use provider::{FundingAccount, Provider, TxReceipt};
pub use resolver::resolve_address;
pub use signer::{CachedSignerFactory, SignerFactory, WalletSigner};
pub use transaction::{sign_call, ContractInterface, FeeTerms, SignedTransaction, TransactionRequest};
pub use transport::{CallTransport, TransportProvider};
pub use validation::{validate_creation_tx, CreationDefect};
pub use wallet::{SmartWallet, SmartWalletClient};

pub use chain_eth::abi::AbiValue;
