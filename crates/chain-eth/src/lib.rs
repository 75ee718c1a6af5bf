//! EVM primitives for the smart-wallet workspace.
//!
//! This crate provides:
//! - Keccak-256 hashing and function selectors
//! - EIP-55 address parsing and checksums
//! - Human-readable function signatures and Solidity ABI encoding

pub mod abi;
pub mod address;
pub mod error;
pub mod hash;

pub use error::EthError;
pub use hash::keccak256;
