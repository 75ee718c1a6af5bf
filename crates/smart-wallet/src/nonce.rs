use alloy_primitives::{Address, U256};
use tracing::debug;

use crate::error::Result;
use crate::keys::PublicKey;
use crate::provider::Provider;
use crate::resolver::lookup_wallet;
use crate::wallet::SmartWallet;

/// Current nonce of a connected wallet. A wallet that never executed an
/// operation reports zero.
pub async fn nonce_of_handle(wallet: &SmartWallet) -> Result<U256> {
    let nonce = wallet.provider().wallet_nonce(wallet.address()).await?;
    debug!(wallet = %wallet.address(), %nonce, "wallet nonce");
    Ok(nonce)
}

/// Nonce of the wallet registered for `public_key`, without a private key.
///
/// `Ok(None)` when no wallet is registered for the key.
pub async fn nonce_of_public_key<P: Provider + ?Sized>(
    gateway: Address,
    provider: &P,
    public_key: &PublicKey,
) -> Result<Option<U256>> {
    let Some(wallet) = lookup_wallet(gateway, provider, public_key.hash()).await? else {
        return Ok(None);
    };
    let nonce = provider.wallet_nonce(wallet).await?;
    debug!(%wallet, %nonce, "wallet nonce by public key");
    Ok(Some(nonce))
}
