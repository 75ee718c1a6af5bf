//! A secp256k1 implementation of [`WalletSigner`].
//!
//! Deployments backed by an aggregate-signature gateway plug their own signer
//! in through [`SignerFactory`]; this one works with gateways that verify
//! plain ECDSA and is what the test suites run against.
//!
//! Digest: `keccak256(DOMAIN || abi.encode(chainId, contractAddress, nonce,
//! rewardTokenAddress, rewardTokenAmount, ethValue, keccak256(encodedFunction)))`.
//! The public key is the 64-byte uncompressed point without its `0x04` prefix
//! and the signature is `r || s`, so both split into two `uint256` words.

use std::sync::Arc;

use alloy_primitives::{Bytes, B256, U256};
use chain_eth::abi::{encode, AbiValue};
use chain_eth::keccak256;
use k256::ecdsa::signature::hazmat::{PrehashSigner, PrehashVerifier};
use k256::ecdsa::{RecoveryId, Signature, SigningKey, VerifyingKey};
use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::SecretKey;

use crate::error::{Result, WalletError};
use crate::keys::{PrivateKey, PublicKey};
use crate::signer::{SignerFactory, WalletSigner};
use crate::transaction::{SignedTransaction, TransactionRequest};

const DOMAIN: &[u8] = b"smart-wallet:tx:v1";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Secp256k1Signer {
    chain_id: u64,
}

impl Secp256k1Signer {
    pub fn new(chain_id: u64) -> Self {
        Self { chain_id }
    }

    /// The digest this signer signs for `request`.
    pub fn digest(&self, request: &TransactionRequest) -> B256 {
        let fields = encode(&[
            AbiValue::Uint(U256::from(self.chain_id)),
            AbiValue::Address(request.contract_address),
            AbiValue::Uint(request.nonce),
            AbiValue::Address(request.reward_token_address),
            AbiValue::Uint(request.reward_token_amount),
            AbiValue::Uint(request.eth_value),
            AbiValue::FixedBytes(keccak256(&request.encoded_function).to_vec()),
        ]);

        let mut preimage = Vec::with_capacity(DOMAIN.len() + fields.len());
        preimage.extend_from_slice(DOMAIN);
        preimage.extend_from_slice(&fields);
        keccak256(preimage)
    }

    fn signing_key(private_key: &PrivateKey) -> Result<SigningKey> {
        SigningKey::from_bytes(private_key.expose_secret().into())
            .map_err(|e| WalletError::InvalidPrivateKey(e.to_string()))
    }
}

impl WalletSigner for Secp256k1Signer {
    fn chain_id(&self) -> u64 {
        self.chain_id
    }

    fn public_key(&self, private_key: &PrivateKey) -> Result<PublicKey> {
        let secret = SecretKey::from_bytes(private_key.expose_secret().into())
            .map_err(|e| WalletError::InvalidPrivateKey(e.to_string()))?;
        let uncompressed = secret.public_key().to_encoded_point(false);
        // Drop the 0x04 prefix.
        Ok(PublicKey::new(uncompressed.as_bytes()[1..].to_vec()))
    }

    fn sign(&self, request: &TransactionRequest, private_key: &PrivateKey) -> Result<SignedTransaction> {
        let signing_key = Self::signing_key(private_key)?;
        let digest = self.digest(request);

        let (signature, _recovery_id): (Signature, RecoveryId) = signing_key
            .sign_prehash(digest.as_slice())
            .map_err(|e| WalletError::SigningFailed(e.to_string()))?;

        Ok(SignedTransaction {
            request: request.clone(),
            public_key: self.public_key(private_key)?,
            signature: Bytes::from(signature.to_bytes().to_vec()),
        })
    }

    fn verify(&self, tx: &SignedTransaction) -> bool {
        let key_bytes = tx.public_key.as_bytes();
        if key_bytes.len() != 64 {
            return false;
        }

        let mut sec1 = Vec::with_capacity(65);
        sec1.push(0x04);
        sec1.extend_from_slice(key_bytes);

        let Ok(verifying_key) = VerifyingKey::from_sec1_bytes(&sec1) else {
            return false;
        };
        let Ok(signature) = Signature::from_slice(&tx.signature) else {
            return false;
        };

        verifying_key
            .verify_prehash(self.digest(&tx.request).as_slice(), &signature)
            .is_ok()
    }
}

/// Builds a [`Secp256k1Signer`] for any chain id.
#[derive(Debug, Clone, Copy, Default)]
pub struct Secp256k1SignerFactory;

impl SignerFactory for Secp256k1SignerFactory {
    fn signer_for_chain(&self, chain_id: u64) -> Result<Arc<dyn WalletSigner>> {
        Ok(Arc::new(Secp256k1Signer::new(chain_id)))
    }
}
