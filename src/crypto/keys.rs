//! ECDSA key handling for transaction signatures
//!
//! Signatures use the secp256k1 curve. On the wire, sender public keys and
//! signatures travel base58-encoded (compressed key, compact signature);
//! addresses are Bitcoin-style Base58Check of RIPEMD160(SHA256(pubkey)).

use rand::rngs::OsRng;
use ripemd::Ripemd160;
use secp256k1::ecdsa::Signature;
use secp256k1::{Message, PublicKey, Secp256k1, SecretKey};
use sha2::Digest;
use thiserror::Error;

use super::hash::sha256;

/// Version byte prepended to addresses before the checksum
const ADDRESS_VERSION: u8 = 0x00;

/// Errors from key decoding, signing, and verification
#[derive(Error, Debug)]
pub enum KeyError {
    #[error("undecodable public key")]
    InvalidPublicKey,
    #[error("undecodable signature")]
    InvalidSignature,
    #[error("secp256k1 error: {0}")]
    Secp256k1(#[from] secp256k1::Error),
}

/// A secp256k1 key pair
#[derive(Clone)]
pub struct KeyPair {
    pub secret_key: SecretKey,
    pub public_key: PublicKey,
}

impl KeyPair {
    /// Generate a new random key pair
    pub fn generate() -> Self {
        let secp = Secp256k1::new();
        let (secret_key, public_key) = secp.generate_keypair(&mut OsRng);
        Self {
            secret_key,
            public_key,
        }
    }

    /// Base58 wire form of the compressed public key
    pub fn public_key_b58(&self) -> String {
        bs58::encode(self.public_key.serialize()).into_string()
    }

    /// Address owned by this key pair
    pub fn address(&self) -> String {
        public_key_to_address(&self.public_key)
    }

    /// Sign a 32-byte digest, returning the base58 wire form of the
    /// compact signature
    pub fn sign_b58(&self, digest: &[u8; 32]) -> Result<String, KeyError> {
        let secp = Secp256k1::new();
        let message = Message::from_digest_slice(digest)?;
        let signature = secp.sign_ecdsa(&message, &self.secret_key);
        Ok(bs58::encode(signature.serialize_compact()).into_string())
    }
}

/// Convert a public key to its Base58Check address
pub fn public_key_to_address(public_key: &PublicKey) -> String {
    let sha = sha256(&public_key.serialize());

    let mut ripemd = Ripemd160::new();
    ripemd.update(sha);
    let ripemd_hash = ripemd.finalize();

    let mut payload = vec![ADDRESS_VERSION];
    payload.extend_from_slice(&ripemd_hash);

    // Checksum is the first 4 bytes of double SHA-256
    let checksum = sha256(&sha256(&payload));
    payload.extend_from_slice(&checksum[..4]);

    bs58::encode(payload).into_string()
}

/// Decode a base58 wire public key
pub fn public_key_from_wire(encoded: &str) -> Result<PublicKey, KeyError> {
    let bytes = bs58::decode(encoded)
        .into_vec()
        .map_err(|_| KeyError::InvalidPublicKey)?;
    PublicKey::from_slice(&bytes).map_err(|_| KeyError::InvalidPublicKey)
}

/// Derive the address for a base58 wire public key
pub fn address_from_wire(encoded: &str) -> Result<String, KeyError> {
    Ok(public_key_to_address(&public_key_from_wire(encoded)?))
}

/// Decode a base58 wire signature (compact form)
pub fn signature_from_wire(encoded: &str) -> Result<Signature, KeyError> {
    let bytes = bs58::decode(encoded)
        .into_vec()
        .map_err(|_| KeyError::InvalidSignature)?;
    Signature::from_compact(&bytes).map_err(|_| KeyError::InvalidSignature)
}

/// Verify a signature over a 32-byte digest
pub fn verify_signature(
    public_key: &PublicKey,
    digest: &[u8; 32],
    signature: &Signature,
) -> Result<bool, KeyError> {
    let secp = Secp256k1::new();
    let message = Message::from_digest_slice(digest)?;
    Ok(secp.verify_ecdsa(&message, signature, public_key).is_ok())
}
