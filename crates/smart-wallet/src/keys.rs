use std::fmt;

use alloy_primitives::{Bytes, B256, U256};
use chain_eth::abi::split_words;
use chain_eth::keccak256;
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{Result, WalletError};

/// A wallet's private signing key.
///
/// Owned by the caller and treated as opaque. The bytes are zeroed on drop and
/// never appear in `Debug` output.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey([u8; 32]);

impl PrivateKey {
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let bytes: [u8; 32] = bytes.try_into().map_err(|_| {
            WalletError::InvalidPrivateKey(format!("expected 32 bytes, got {}", bytes.len()))
        })?;
        Ok(Self(bytes))
    }

    /// Parses a hex-encoded key, with or without a `0x` prefix.
    pub fn from_hex(text: &str) -> Result<Self> {
        let hex_str = text.strip_prefix("0x").unwrap_or(text);
        let mut decoded = hex::decode(hex_str)
            .map_err(|e| WalletError::InvalidPrivateKey(format!("invalid hex: {e}")))?;
        let key = Self::from_slice(&decoded);
        decoded.zeroize();
        key
    }

    /// Generates a fresh key from the operating system's CSPRNG.
    pub fn random() -> Self {
        let mut bytes = [0u8; 32];
        OsRng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    pub fn expose_secret(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKey([REDACTED])")
    }
}

/// Public key bytes in the encoding produced by the chain signer. The length
/// is a whole number of 32-byte words.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PublicKey(Bytes);

impl PublicKey {
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// The registry lookup key: `keccak256(public_key)`.
    pub fn hash(&self) -> PublicKeyHash {
        PublicKeyHash(keccak256(&self.0))
    }

    /// The key split into `uint256` words, as the gateway expects it.
    pub fn words(&self) -> Result<Vec<U256>> {
        split_words(&self.0)
            .map_err(|e| WalletError::InvalidPublicKey(e.to_string()))
    }
}

/// Digest of a public key used as the gateway's registry key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PublicKeyHash(B256);

impl PublicKeyHash {
    pub fn as_b256(&self) -> B256 {
        self.0
    }
}

impl From<B256> for PublicKeyHash {
    fn from(hash: B256) -> Self {
        Self(hash)
    }
}

impl fmt::Display for PublicKeyHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}
