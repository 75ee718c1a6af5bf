//! Wallet lifecycle: lookup, connection and on-demand creation through the
//! verification gateway.

use std::fmt;
use std::sync::Arc;

use alloy_primitives::{Address, U256};
use chain_eth::abi::AbiValue;
use tracing::{error, info, instrument, warn};

use crate::chain::{ChainContext, ChainEndpoint};
use crate::config::GatewayConfig;
use crate::ecdsa::Secp256k1SignerFactory;
use crate::error::{Result, WalletError};
use crate::gateway::ActionCalls;
use crate::keys::{PrivateKey, PublicKey, PublicKeyHash};
use crate::nonce;
use crate::provider::{FundingAccount, Provider};
use crate::resolver::resolve_address;
use crate::signer::{CachedSignerFactory, SignerFactory};
use crate::transaction::{sign_call, ContractInterface, FeeTerms, SignedTransaction, TransactionRequest};
use crate::validation::{self, CreationDefect};

/// Entry point for wallet operations against one verification gateway.
///
/// Cheap to clone. Signers are built once per chain id and shared.
#[derive(Clone)]
pub struct SmartWalletClient {
    config: GatewayConfig,
    signers: Arc<dyn SignerFactory>,
}

impl SmartWalletClient {
    pub fn new<F: SignerFactory + 'static>(config: GatewayConfig, factory: F) -> Self {
        Self {
            config,
            signers: Arc::new(CachedSignerFactory::new(factory)),
        }
    }

    /// A client signing with [`Secp256k1SignerFactory`].
    pub fn with_secp256k1(config: GatewayConfig) -> Self {
        Self::new(config, Secp256k1SignerFactory)
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    pub fn gateway(&self) -> Address {
        self.config.verification_gateway
    }

    pub async fn chain_context<E: ChainEndpoint + ?Sized>(&self, endpoint: &E) -> Result<ChainContext> {
        ChainContext::for_endpoint(endpoint, self.signers.as_ref()).await
    }

    /// The wallet registered for `private_key`, if any.
    pub async fn address<P: Provider + ?Sized>(
        &self,
        private_key: &PrivateKey,
        provider: &P,
    ) -> Result<Option<Address>> {
        let context = self.chain_context(provider).await?;
        resolve_address(self.gateway(), provider, context.signer().as_ref(), private_key).await
    }

    pub async fn exists<P: Provider + ?Sized>(&self, private_key: &PrivateKey, provider: &P) -> Result<bool> {
        Ok(self.address(private_key, provider).await?.is_some())
    }

    /// Nonce of the wallet registered for `public_key`; `None` when there is
    /// no such wallet.
    pub async fn nonce_of_public_key<P: Provider + ?Sized>(
        &self,
        public_key: &PublicKey,
        provider: &P,
    ) -> Result<Option<U256>> {
        nonce::nonce_of_public_key(self.gateway(), provider, public_key).await
    }

    /// Signs the creation payload for `private_key` on `endpoint`'s chain,
    /// without submitting it.
    pub async fn sign_creation<E: ChainEndpoint + ?Sized>(
        &self,
        private_key: &PrivateKey,
        endpoint: &E,
    ) -> Result<SignedTransaction> {
        let context = self.chain_context(endpoint).await?;
        context
            .signer()
            .sign(&TransactionRequest::creation(self.gateway()), private_key)
    }

    /// Defects of `tx` as a creation payload on `endpoint`'s chain. Errors only
    /// when the chain or its signer cannot be determined.
    pub async fn validate_creation_tx<E: ChainEndpoint + ?Sized>(
        &self,
        tx: &SignedTransaction,
        endpoint: &E,
    ) -> Result<Vec<CreationDefect>> {
        let context = self.chain_context(endpoint).await?;
        Ok(validation::validate_creation_tx(tx, context.signer().as_ref(), self.gateway()))
    }

    /// Connects to the existing wallet for `private_key`. Never writes to the
    /// chain; `Ok(None)` when no wallet is registered.
    #[instrument(skip_all, fields(gateway = %self.config.verification_gateway))]
    pub async fn connect(
        &self,
        private_key: &PrivateKey,
        provider: Arc<dyn Provider>,
    ) -> Result<Option<SmartWallet>> {
        let context = self.chain_context(provider.as_ref()).await?;
        let address = resolve_address(
            self.gateway(),
            provider.as_ref(),
            context.signer().as_ref(),
            private_key,
        )
        .await?;

        Ok(address.map(|address| SmartWallet {
            private_key: private_key.clone(),
            address,
            context,
            provider,
            gateway: self.gateway(),
        }))
    }

    /// Connects to the wallet for `private_key`, creating it through `funder`
    /// first if it does not exist yet.
    ///
    /// Submits at most one transaction and waits for it without a timeout.
    /// Two concurrent callers with the same key may both submit.
    #[instrument(skip_all, fields(gateway = %self.config.verification_gateway))]
    pub async fn connect_or_create<F: FundingAccount + ?Sized>(
        &self,
        private_key: &PrivateKey,
        funder: &F,
    ) -> Result<SmartWallet> {
        if let Some(wallet) = self.connect(private_key, funder.provider()).await? {
            return Ok(wallet);
        }

        let tx = self.sign_creation(private_key, funder).await?;
        let public_key_hash = tx.public_key_hash();
        let calls = ActionCalls::single(&tx)?;

        let tx_hash = funder.submit_action_calls(self.gateway(), &calls).await?;
        info!(%public_key_hash, %tx_hash, "wallet creation submitted");

        let receipt = funder.wait_for_receipt(tx_hash).await?;
        let wallet = self.connect(private_key, funder.provider()).await?;

        match (wallet, receipt.success) {
            (Some(wallet), true) => {
                info!(wallet = %wallet.address(), %tx_hash, "wallet created");
                Ok(wallet)
            }
            (Some(wallet), false) => {
                warn!(wallet = %wallet.address(), %tx_hash, "creation reverted, wallet created concurrently");
                Ok(wallet)
            }
            (None, false) => {
                warn!(%public_key_hash, %tx_hash, "wallet creation reverted");
                Err(WalletError::CreationReverted { tx_hash })
            }
            (None, true) => {
                error!(%public_key_hash, %tx_hash, "wallet missing after confirmed creation");
                Err(WalletError::CreationNotVisible {
                    public_key_hash: public_key_hash.as_b256(),
                    tx_hash,
                })
            }
        }
    }
}

impl fmt::Debug for SmartWalletClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmartWalletClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// A connected wallet. Only exists for keys with a registered wallet.
pub struct SmartWallet {
    private_key: PrivateKey,
    address: Address,
    context: ChainContext,
    provider: Arc<dyn Provider>,
    gateway: Address,
}

impl SmartWallet {
    pub fn address(&self) -> Address {
        self.address
    }

    pub fn chain_id(&self) -> u64 {
        self.context.chain_id()
    }

    pub fn gateway(&self) -> Address {
        self.gateway
    }

    pub fn context(&self) -> &ChainContext {
        &self.context
    }

    pub fn provider(&self) -> &Arc<dyn Provider> {
        &self.provider
    }

    pub fn public_key(&self) -> Result<PublicKey> {
        self.context.signer().public_key(&self.private_key)
    }

    pub fn public_key_hash(&self) -> Result<PublicKeyHash> {
        self.context.signer().public_key_hash(&self.private_key)
    }

    /// Current nonce as of the latest block.
    pub async fn nonce(&self) -> Result<U256> {
        nonce::nonce_of_handle(self).await
    }

    /// Signs `method(args)` on `contract`. Local only; the caller picks the
    /// nonce.
    pub fn sign(
        &self,
        contract: &ContractInterface,
        method: &str,
        args: &[AbiValue],
        nonce: U256,
        fees: &FeeTerms,
    ) -> Result<SignedTransaction> {
        sign_call(
            self.context.signer().as_ref(),
            &self.private_key,
            contract,
            method,
            args,
            nonce,
            fees,
        )
    }

    pub fn sign_request(&self, request: &TransactionRequest) -> Result<SignedTransaction> {
        self.context.signer().sign(request, &self.private_key)
    }
}

impl fmt::Debug for SmartWallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmartWallet")
            .field("address", &self.address)
            .field("chain_id", &self.context.chain_id())
            .field("gateway", &self.gateway)
            .finish_non_exhaustive()
    }
}
