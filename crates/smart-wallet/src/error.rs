use alloy_primitives::B256;
use chain_eth::EthError;
use thiserror::Error;

/// Boxed error raised by an external collaborator (RPC transport, contract
/// binding). Carried through unchanged.
pub type ProviderFault = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum WalletError {
    #[error("Endpoint exposes neither a chain id nor a network info accessor")]
    MissingChainId,

    #[error("Provider error: {0}")]
    Provider(#[source] ProviderFault),

    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error("Invalid public key: {0}")]
    InvalidPublicKey(String),

    #[error("Signing failed: {0}")]
    SigningFailed(String),

    #[error("Encoding failed: {0}")]
    Encoding(#[from] EthError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Creation transaction {tx_hash} reverted")]
    CreationReverted { tx_hash: B256 },

    #[error(
        "Wallet for public key hash {public_key_hash} is still unregistered after creation transaction {tx_hash} confirmed"
    )]
    CreationNotVisible { public_key_hash: B256, tx_hash: B256 },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl WalletError {
    /// Wraps a fault raised by a provider, transport or contract binding.
    pub fn provider(fault: impl Into<ProviderFault>) -> Self {
        WalletError::Provider(fault.into())
    }

    /// Whether the error signals broken chain state rather than a failed
    /// operation. Callers must not retry fatal errors.
    pub fn is_fatal(&self) -> bool {
        matches!(self, WalletError::CreationNotVisible { .. })
    }
}

pub type Result<T> = std::result::Result<T, WalletError>;
