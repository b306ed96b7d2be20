//! Ed25519 envelope signatures. An account address doubles as the
//! verifying key, so a transaction is valid only if it was signed by
//! the holder of that address's secret key.

use custodia_types::state::Address;
use ed25519_dalek::{Signature, Signer, Verifier};
pub use ed25519_dalek::{SigningKey, VerifyingKey};
use rand::rngs::OsRng;
use thiserror::Error;

pub const SIGNATURE_LEN: usize = Signature::BYTE_SIZE;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SignatureError {
    #[error("address is not a valid ed25519 public key")]
    InvalidPublicKey,
    #[error("malformed signature ({0} bytes)")]
    MalformedSignature(usize),
    #[error("signature does not match message")]
    Rejected,
}

pub fn generate_keypair() -> SigningKey {
    SigningKey::generate(&mut OsRng)
}

pub fn sign(key: &SigningKey, message: &[u8]) -> Vec<u8> {
    key.sign(message).to_bytes().to_vec()
}

pub fn address_of(key: &SigningKey) -> Address {
    key.verifying_key().to_bytes()
}

pub fn verify_signature(
    signer: &Address,
    message: &[u8],
    signature: &[u8],
) -> Result<(), SignatureError> {
    let pubkey = VerifyingKey::from_bytes(signer).map_err(|_| SignatureError::InvalidPublicKey)?;
    let signature = Signature::from_slice(signature)
        .map_err(|_| SignatureError::MalformedSignature(signature.len()))?;
    pubkey
        .verify(message, &signature)
        .map_err(|_| SignatureError::Rejected)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_and_verify_round_trip() {
        let key = generate_keypair();
        let signer = address_of(&key);
        let sig = sign(&key, b"borrow batch 42");
        assert_eq!(sig.len(), SIGNATURE_LEN);
        assert!(verify_signature(&signer, b"borrow batch 42", &sig).is_ok());
        assert_eq!(
            verify_signature(&signer, b"borrow batch 43", &sig),
            Err(SignatureError::Rejected)
        );
    }

    #[test]
    fn truncated_signature_is_malformed() {
        let key = generate_keypair();
        let signer = address_of(&key);
        let sig = sign(&key, b"deposit");
        assert_eq!(
            verify_signature(&signer, b"deposit", &sig[..sig.len() - 1]),
            Err(SignatureError::MalformedSignature(SIGNATURE_LEN - 1))
        );
    }
}
