//! Address representation and its two textual forms.

use std::fmt;

use tiny_keccak::{Hasher, Keccak};

use super::base58;

/// Length of a raw address in bytes.
pub const ADDRESS_LEN: usize = 20;

/// Length of a raw address as lowercase hex.
pub const ADDRESS_HEX_LEN: usize = ADDRESS_LEN * 2;

/// Length of an uncompressed SEC1 public key: format byte plus two coordinates.
pub const UNCOMPRESSED_PUBLIC_KEY_LEN: usize = 65;

/// A raw 20-byte address.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Address([u8; ADDRESS_LEN]);

impl Address {
    /// Creates an address from raw bytes.
    #[inline]
    pub const fn from_bytes(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }

    /// Derives an address from an uncompressed SEC1 public key.
    ///
    /// The leading format byte is dropped, the coordinates are hashed with
    /// Keccak-256 and the last 20 bytes of the digest are kept.
    #[inline]
    pub fn from_uncompressed_public_key(public_key: &[u8; UNCOMPRESSED_PUBLIC_KEY_LEN]) -> Self {
        let hash = keccak256(&public_key[1..]);
        let mut bytes = [0u8; ADDRESS_LEN];
        bytes.copy_from_slice(&hash[32 - ADDRESS_LEN..]);
        Self(bytes)
    }

    /// Returns the address as raw bytes.
    #[inline]
    pub const fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }

    /// Returns the address as a lowercase hex string (without 0x prefix).
    #[inline]
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Returns the checksum-cased address with 0x prefix.
    pub fn to_checksum(&self) -> String {
        format!("0x{}", checksum_case(&self.to_hex()))
    }

    /// Returns the Base58Check form: `encode_check(version_prefix || address)`.
    pub fn to_alternate(&self, version_prefix: [u8; 2]) -> String {
        let mut data = [0u8; 2 + ADDRESS_LEN];
        data[..2].copy_from_slice(&version_prefix);
        data[2..].copy_from_slice(&self.0);
        base58::encode_check(&data)
    }
}

/// Keccak-256 digest of `data`.
#[inline]
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    hasher.update(data);
    let mut hash = [0u8; 32];
    hasher.finalize(&mut hash);
    hash
}

/// Returns the nibble at hex position `i` of `hash`.
#[inline]
pub(crate) fn nibble(hash: &[u8; 32], i: usize) -> u8 {
    let byte = hash[i / 2];
    if i % 2 == 0 {
        byte >> 4
    } else {
        byte & 0x0f
    }
}

/// Applies checksum casing to a lowercase hex address (no 0x prefix).
///
/// A character is uppercased iff the matching nibble of
/// `keccak256(address_hex)` is >= 8.
pub fn checksum_case(address_hex: &str) -> String {
    let hash = keccak256(address_hex.as_bytes());

    address_hex
        .chars()
        .enumerate()
        .map(|(i, c)| {
            if i < 64 && nibble(&hash, i) >= 8 {
                c.to_ascii_uppercase()
            } else {
                c
            }
        })
        .collect()
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_checksum())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_checksum())
    }
}
