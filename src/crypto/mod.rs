//! Cryptographic operations for key and address generation.
//!
//! This module provides:
//! - Secure random key generation on P-256 or secp256k1
//! - Address derivation using Keccak-256
//! - Checksum casing and the Base58Check alternate form

mod address;
pub mod base58;
mod keypair;

pub use address::{
    checksum_case, keccak256, Address, ADDRESS_HEX_LEN, ADDRESS_LEN, UNCOMPRESSED_PUBLIC_KEY_LEN,
};
pub(crate) use address::nibble;
pub use keypair::{Curve, KeyGenerator, Keypair};
