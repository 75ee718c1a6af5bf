use alloy_primitives::Address;
use chain_eth::address::{checksum_address, parse_address};
use serde::{Deserialize, Serialize};

use crate::error::{Result, WalletError};

/// Environment variable holding the verification gateway address.
pub const GATEWAY_ENV_VAR: &str = "VERIFICATION_GATEWAY_ADDRESS";

/// Deployment settings shared by every wallet on a chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayConfig {
    /// The verification gateway: registry of public-key hashes and entry point
    /// for signature-authorized batches.
    pub verification_gateway: Address,
}

impl GatewayConfig {
    pub fn new(verification_gateway: Address) -> Self {
        Self {
            verification_gateway,
        }
    }

    /// Reads the gateway address from `VERIFICATION_GATEWAY_ADDRESS`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Like [`GatewayConfig::from_env`] but with an injectable variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let value = lookup(GATEWAY_ENV_VAR)
            .ok_or_else(|| WalletError::Config(format!("{GATEWAY_ENV_VAR} is not set")))?;
        Self::from_address_str(value.trim())
    }

    /// Parses an EIP-55 (or single-case) gateway address.
    pub fn from_address_str(address: &str) -> Result<Self> {
        let gateway = parse_address(address)
            .map_err(|e| WalletError::Config(format!("bad gateway address: {e}")))?;
        Self::new(gateway).validated()
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| WalletError::Config(format!("invalid gateway config: {e}")))?;
        config.validated()
    }

    fn validated(self) -> Result<Self> {
        if self.verification_gateway.is_zero() {
            return Err(WalletError::Config(
                "verification gateway must not be the zero address".into(),
            ));
        }
        Ok(self)
    }

    /// Checksummed gateway address for display.
    pub fn gateway_display(&self) -> String {
        checksum_address(&self.verification_gateway)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GATEWAY: &str = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";

    #[test]
    fn from_lookup_reads_gateway_variable() {
        let config = GatewayConfig::from_lookup(|name| {
            assert_eq!(name, GATEWAY_ENV_VAR);
            Some(format!(" {GATEWAY} "))
        })
        .unwrap();
        assert_eq!(config.gateway_display(), GATEWAY);
    }

    #[test]
    fn from_lookup_missing_variable() {
        let err = GatewayConfig::from_lookup(|_| None).unwrap_err();
        assert!(matches!(err, WalletError::Config(_)));
        assert!(err.to_string().contains(GATEWAY_ENV_VAR));
    }

    #[test]
    fn rejects_bad_checksum() {
        assert!(GatewayConfig::from_address_str("0x5AAEB6053F3E94C9b9A09f33669435E7Ef1BeAed").is_err());
    }

    #[test]
    fn rejects_zero_gateway() {
        let err =
            GatewayConfig::from_address_str("0x0000000000000000000000000000000000000000").unwrap_err();
        assert!(matches!(err, WalletError::Config(_)));
    }

    #[test]
    fn from_json_camel_case() {
        let json = format!(r#"{{"verificationGateway":"{GATEWAY}"}}"#);
        let config = GatewayConfig::from_json(&json).unwrap();
        assert_eq!(config.gateway_display(), GATEWAY);
    }

    #[test]
    fn from_json_rejects_garbage() {
        assert!(GatewayConfig::from_json("{}").is_err());
    }
}
