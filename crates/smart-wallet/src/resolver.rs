use alloy_primitives::Address;
use tracing::{debug, instrument};

use crate::error::Result;
use crate::keys::{PrivateKey, PublicKeyHash};
use crate::provider::Provider;
use crate::signer::WalletSigner;

/// Looks up the wallet registered for `private_key`'s public key hash.
///
/// Read-only. `Ok(None)` means no wallet is registered; provider faults
/// propagate unchanged.
#[instrument(skip_all, fields(%gateway, chain_id = signer.chain_id()))]
pub async fn resolve_address<P: Provider + ?Sized>(
    gateway: Address,
    provider: &P,
    signer: &dyn WalletSigner,
    private_key: &PrivateKey,
) -> Result<Option<Address>> {
    let hash = signer.public_key_hash(private_key)?;
    lookup_wallet(gateway, provider, hash).await
}

/// Registry lookup by hash. The gateway reports "none" as the zero address.
pub(crate) async fn lookup_wallet<P: Provider + ?Sized>(
    gateway: Address,
    provider: &P,
    hash: PublicKeyHash,
) -> Result<Option<Address>> {
    let address = provider.wallet_from_hash(gateway, hash).await?;
    if address.is_zero() {
        debug!(public_key_hash = %hash, "no wallet registered");
        Ok(None)
    } else {
        debug!(public_key_hash = %hash, wallet = %address, "wallet resolved");
        Ok(Some(address))
    }
}
