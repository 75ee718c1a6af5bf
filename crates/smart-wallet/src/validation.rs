//! Checks a third party can run on a creation transaction before relaying it.

use alloy_primitives::{Address, U256};
use serde::Serialize;
use thiserror::Error;

use crate::signer::WalletSigner;
use crate::transaction::SignedTransaction;

/// A reason a creation transaction is unacceptable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum CreationDefect {
    #[error("invalid signature")]
    InvalidSignature,

    #[error("encoded function data mismatch")]
    EncodedFunctionMismatch,

    #[error("creation nonce must be zero")]
    NonZeroNonce,

    #[error("creation must not carry a reward")]
    NonZeroReward,

    #[error("creation must not carry eth value")]
    NonZeroEthValue,

    #[error("creation must target the verification gateway")]
    ContractAddressMismatch,
}

/// Every defect of `tx` as a wallet creation payload for `gateway`. An empty
/// list means the transaction is acceptable.
///
/// Checks are independent: one defect never hides another.
pub fn validate_creation_tx(
    tx: &SignedTransaction,
    signer: &dyn WalletSigner,
    gateway: Address,
) -> Vec<CreationDefect> {
    let request = &tx.request;
    let mut defects = Vec::new();

    if !signer.verify(tx) {
        defects.push(CreationDefect::InvalidSignature);
    }
    if !request.encoded_function.is_empty() {
        defects.push(CreationDefect::EncodedFunctionMismatch);
    }
    if request.nonce != U256::ZERO {
        defects.push(CreationDefect::NonZeroNonce);
    }
    if !request.reward_token_address.is_zero() || request.reward_token_amount != U256::ZERO {
        defects.push(CreationDefect::NonZeroReward);
    }
    if request.eth_value != U256::ZERO {
        defects.push(CreationDefect::NonZeroEthValue);
    }
    if request.contract_address != gateway {
        defects.push(CreationDefect::ContractAddressMismatch);
    }

    defects
}

#[cfg(test)]
mod tests {
    use alloy_primitives::Bytes;

    use super::*;
    use crate::ecdsa::Secp256k1Signer;
    use crate::keys::PrivateKey;
    use crate::transaction::TransactionRequest;

    const GATEWAY: Address = Address::new([0x44; 20]);

    fn signed(request: &TransactionRequest) -> SignedTransaction {
        Secp256k1Signer::new(1)
            .sign(request, &PrivateKey::from_bytes([8u8; 32]))
            .unwrap()
    }

    #[test]
    fn display_messages() {
        assert_eq!(CreationDefect::InvalidSignature.to_string(), "invalid signature");
        assert_eq!(
            CreationDefect::EncodedFunctionMismatch.to_string(),
            "encoded function data mismatch"
        );
        assert_eq!(CreationDefect::NonZeroNonce.to_string(), "creation nonce must be zero");
        assert_eq!(
            CreationDefect::ContractAddressMismatch.to_string(),
            "creation must target the verification gateway"
        );
    }

    #[test]
    fn well_formed_creation_passes() {
        let tx = signed(&TransactionRequest::creation(GATEWAY));
        assert!(validate_creation_tx(&tx, &Secp256k1Signer::new(1), GATEWAY).is_empty());
    }

    #[test]
    fn wrong_chain_is_an_invalid_signature() {
        let tx = signed(&TransactionRequest::creation(GATEWAY));
        assert_eq!(
            validate_creation_tx(&tx, &Secp256k1Signer::new(2), GATEWAY),
            vec![CreationDefect::InvalidSignature]
        );
    }

    #[test]
    fn tampering_after_signing_reports_both_defects() {
        let mut tx = signed(&TransactionRequest::creation(GATEWAY));
        tx.request.encoded_function = Bytes::from(vec![0xde, 0xad]);

        assert_eq!(
            validate_creation_tx(&tx, &Secp256k1Signer::new(1), GATEWAY),
            vec![CreationDefect::InvalidSignature, CreationDefect::EncodedFunctionMismatch]
        );
    }

    #[test]
    fn flipped_signature_byte_is_only_a_signature_defect() {
        let mut tx = signed(&TransactionRequest::creation(GATEWAY));
        let mut signature = tx.signature.to_vec();
        signature[10] ^= 0x01;
        tx.signature = Bytes::from(signature);

        assert_eq!(
            validate_creation_tx(&tx, &Secp256k1Signer::new(1), GATEWAY),
            vec![CreationDefect::InvalidSignature]
        );
    }

    #[test]
    fn signed_call_payload_is_only_a_payload_defect() {
        let mut request = TransactionRequest::creation(GATEWAY);
        request.encoded_function = Bytes::from(vec![0xde, 0xad, 0xbe, 0xef]);
        let tx = signed(&request);

        assert_eq!(
            validate_creation_tx(&tx, &Secp256k1Signer::new(1), GATEWAY),
            vec![CreationDefect::EncodedFunctionMismatch]
        );
    }

    #[test]
    fn flipped_signature_and_call_payload_report_both() {
        let mut request = TransactionRequest::creation(GATEWAY);
        request.encoded_function = Bytes::from(vec![0xde, 0xad, 0xbe, 0xef]);
        let mut tx = signed(&request);
        let mut signature = tx.signature.to_vec();
        signature[10] ^= 0x01;
        tx.signature = Bytes::from(signature);

        assert_eq!(
            validate_creation_tx(&tx, &Secp256k1Signer::new(1), GATEWAY),
            vec![CreationDefect::InvalidSignature, CreationDefect::EncodedFunctionMismatch]
        );
    }

    #[test]
    fn signed_non_creation_payload_is_rejected_field_by_field() {
        let mut request = TransactionRequest::creation(Address::repeat_byte(0x99));
        request.nonce = U256::from(1);
        request.reward_token_amount = U256::from(10);
        request.eth_value = U256::from(1);
        let tx = signed(&request);

        assert_eq!(
            validate_creation_tx(&tx, &Secp256k1Signer::new(1), GATEWAY),
            vec![
                CreationDefect::NonZeroNonce,
                CreationDefect::NonZeroReward,
                CreationDefect::NonZeroEthValue,
                CreationDefect::ContractAddressMismatch,
            ]
        );
    }
}
