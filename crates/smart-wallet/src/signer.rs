use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use crate::error::Result;
use crate::keys::{PrivateKey, PublicKey, PublicKeyHash};
use crate::transaction::{SignedTransaction, TransactionRequest};

/// A chain-bound signing capability.
///
/// Implementations bind signatures to their chain id so a payload signed for
/// one chain never verifies on another. Instances are immutable once built.
pub trait WalletSigner: fmt::Debug + Send + Sync {
    fn chain_id(&self) -> u64;

    fn public_key(&self, private_key: &PrivateKey) -> Result<PublicKey>;

    /// The registry lookup key for `private_key`.
    fn public_key_hash(&self, private_key: &PrivateKey) -> Result<PublicKeyHash> {
        Ok(self.public_key(private_key)?.hash())
    }

    fn sign(&self, request: &TransactionRequest, private_key: &PrivateKey) -> Result<SignedTransaction>;

    /// Whether `tx.signature` is valid for `tx.request` under `tx.public_key`.
    /// Malformed keys or signatures verify as `false`.
    fn verify(&self, tx: &SignedTransaction) -> bool;
}

/// Builds the signer for a chain id.
///
/// Any `Fn(u64) -> Result<Arc<dyn WalletSigner>>` is a factory, which makes it
/// easy to inject test doubles.
pub trait SignerFactory: Send + Sync {
    fn signer_for_chain(&self, chain_id: u64) -> Result<Arc<dyn WalletSigner>>;
}

impl<F> SignerFactory for F
where
    F: Fn(u64) -> Result<Arc<dyn WalletSigner>> + Send + Sync,
{
    fn signer_for_chain(&self, chain_id: u64) -> Result<Arc<dyn WalletSigner>> {
        self(chain_id)
    }
}

/// Memoizes signers per chain id on top of another factory.
pub struct CachedSignerFactory<F> {
    inner: F,
    signers: RwLock<HashMap<u64, Arc<dyn WalletSigner>>>,
}

impl<F: SignerFactory> CachedSignerFactory<F> {
    pub fn new(inner: F) -> Self {
        Self {
            inner,
            signers: RwLock::new(HashMap::new()),
        }
    }

    /// Number of chains with a cached signer.
    pub fn cached_chains(&self) -> usize {
        self.signers.read().unwrap_or_else(PoisonError::into_inner).len()
    }
}

impl<F: SignerFactory> SignerFactory for CachedSignerFactory<F> {
    fn signer_for_chain(&self, chain_id: u64) -> Result<Arc<dyn WalletSigner>> {
        // Cached signers are immutable, so a poisoned map is still consistent.
        {
            let signers = self.signers.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(signer) = signers.get(&chain_id) {
                return Ok(Arc::clone(signer));
            }
        }

        // Built outside the lock; a concurrent build for the same chain keeps
        // whichever signer landed first.
        let built = self.inner.signer_for_chain(chain_id)?;
        let mut signers = self.signers.write().unwrap_or_else(PoisonError::into_inner);
        Ok(Arc::clone(signers.entry(chain_id).or_insert(built)))
    }
}

impl<F: SignerFactory> fmt::Debug for CachedSignerFactory<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachedSignerFactory")
            .field("cached_chains", &self.cached_chains())
            .finish_non_exhaustive()
    }
}
