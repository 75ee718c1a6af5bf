//! Chain identification and the chain-bound signing context.
//!
//! Endpoints (providers, funding accounts, signers) announce how their chain
//! id can be obtained through [`ChainEndpoint::chain_id_capability`]: either a
//! direct accessor or a network-info query. Endpoints offering neither are
//! rejected before any network traffic happens.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, WalletError};
use crate::signer::{SignerFactory, WalletSigner};

/// Direct chain id accessor, typically offered by signing endpoints.
#[async_trait]
pub trait ChainIdAccessor: Send + Sync {
    async fn chain_id(&self) -> Result<u64>;
}

/// Network description returned by a provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkInfo {
    pub chain_id: u64,
    pub name: String,
}

/// Network-info query, typically offered by read-only providers.
#[async_trait]
pub trait NetworkInfoAccessor: Send + Sync {
    async fn network(&self) -> Result<NetworkInfo>;
}

/// How an endpoint exposes its chain id.
pub enum ChainIdCapability<'a> {
    Direct(&'a dyn ChainIdAccessor),
    NetworkInfo(&'a dyn NetworkInfoAccessor),
    Unavailable,
}

impl fmt::Debug for ChainIdCapability<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Direct(_) => "Direct",
            Self::NetworkInfo(_) => "NetworkInfo",
            Self::Unavailable => "Unavailable",
        })
    }
}

/// Anything bound to a chain: providers, funding accounts, transports.
pub trait ChainEndpoint: Send + Sync {
    fn chain_id_capability(&self) -> ChainIdCapability<'_>;
}

/// Obtains the chain id through whichever accessor the endpoint offers.
///
/// Fails with [`WalletError::MissingChainId`] when the endpoint offers none.
/// Accessor faults propagate unchanged.
pub async fn discover_chain_id<E: ChainEndpoint + ?Sized>(endpoint: &E) -> Result<u64> {
    match endpoint.chain_id_capability() {
        ChainIdCapability::Direct(accessor) => accessor.chain_id().await,
        ChainIdCapability::NetworkInfo(accessor) => Ok(accessor.network().await?.chain_id),
        ChainIdCapability::Unavailable => Err(WalletError::MissingChainId),
    }
}

/// An endpoint whose chain id is known up front.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticChainId(pub u64);

#[async_trait]
impl ChainIdAccessor for StaticChainId {
    async fn chain_id(&self) -> Result<u64> {
        Ok(self.0)
    }
}

impl ChainEndpoint for StaticChainId {
    fn chain_id_capability(&self) -> ChainIdCapability<'_> {
        ChainIdCapability::Direct(self)
    }
}

/// A chain id together with the signer bound to it. Cheap to clone and safe to
/// share between concurrent callers.
#[derive(Debug, Clone)]
pub struct ChainContext {
    chain_id: u64,
    signer: Arc<dyn WalletSigner>,
}

impl ChainContext {
    pub fn new(signer: Arc<dyn WalletSigner>) -> Self {
        Self {
            chain_id: signer.chain_id(),
            signer,
        }
    }

    /// Discovers the endpoint's chain id and obtains the matching signer.
    pub async fn for_endpoint<E: ChainEndpoint + ?Sized>(
        endpoint: &E,
        factory: &dyn SignerFactory,
    ) -> Result<Self> {
        let chain_id = discover_chain_id(endpoint).await?;
        debug!(chain_id, "building chain context");
        let signer = factory.signer_for_chain(chain_id)?;
        Ok(Self::new(signer))
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    pub fn signer(&self) -> &Arc<dyn WalletSigner> {
        &self.signer
    }
}
