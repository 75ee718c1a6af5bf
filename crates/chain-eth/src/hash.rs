use alloy_primitives::B256;
use sha3::{Digest, Keccak256};

/// Keccak-256 digest of `data`.
pub fn keccak256(data: impl AsRef<[u8]>) -> B256 {
    B256::from_slice(&Keccak256::digest(data.as_ref()))
}

/// The 4-byte function selector for a canonical signature such as
/// `transfer(address,uint256)`.
pub fn selector(canonical_signature: &str) -> [u8; 4] {
    let hash = keccak256(canonical_signature.as_bytes());
    let mut out = [0u8; 4];
    out.copy_from_slice(&hash[..4]);
    out
}
