//! Cryptographic primitives: hashing, keys, signatures, addresses

pub mod hash;
pub mod keys;

pub use hash::{meets_difficulty, sha256, sha256_hex};
pub use keys::{
    address_from_wire, public_key_from_wire, public_key_to_address, signature_from_wire,
    verify_signature, KeyError, KeyPair,
};
