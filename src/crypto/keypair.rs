//! Keypair generation on the supported curves.

use std::fmt;
use std::str::FromStr;

use p256::elliptic_curve::sec1::ToEncodedPoint;
use rand::{CryptoRng, RngCore};
use secp256k1::{All, PublicKey, Secp256k1, SecretKey};

use super::{Address, UNCOMPRESSED_PUBLIC_KEY_LEN};
use crate::error::{Result, VanityError};

/// Elliptic curve used to generate keypairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Curve {
    /// NIST P-256 (prime256v1)
    #[default]
    P256,
    /// secp256k1
    Secp256k1,
}

impl FromStr for Curve {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "p256" | "p-256" | "prime256v1" | "secp256r1" => Ok(Curve::P256),
            "secp256k1" | "k256" => Ok(Curve::Secp256k1),
            _ => Err(format!("Unknown curve: {}", s)),
        }
    }
}

impl fmt::Display for Curve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Curve::P256 => write!(f, "p256"),
            Curve::Secp256k1 => write!(f, "secp256k1"),
        }
    }
}

/// A private key and the address derived from it.
#[derive(Debug, Clone)]
pub struct Keypair {
    /// The private key bytes (32 bytes)
    secret_key: [u8; 32],
    /// The derived address
    address: Address,
}

impl Keypair {
    /// Derives the keypair for an existing secret scalar.
    pub fn from_secret_key(curve: Curve, secret_bytes: [u8; 32]) -> Result<Self> {
        KeyGenerator::new(curve).derive(secret_bytes)
    }

    /// Returns the private key as a hex string (without 0x prefix).
    pub fn private_key_hex(&self) -> String {
        hex::encode(self.secret_key)
    }

    /// Returns the private key bytes.
    pub fn private_key_bytes(&self) -> &[u8; 32] {
        &self.secret_key
    }

    /// Returns a reference to the derived address.
    #[inline]
    pub fn address(&self) -> &Address {
        &self.address
    }
}

/// Generates keypairs on one curve.
///
/// Holds the secp256k1 context so it is built once per search rather than
/// once per attempt.
pub struct KeyGenerator {
    curve: Curve,
    secp: Secp256k1<All>,
}

impl KeyGenerator {
    /// Creates a generator for `curve`.
    pub fn new(curve: Curve) -> Self {
        Self {
            curve,
            secp: Secp256k1::new(),
        }
    }

    /// Returns the curve keys are generated on.
    pub fn curve(&self) -> Curve {
        self.curve
    }

    /// Generates a fresh random keypair.
    ///
    /// Fails only if the random source fails. Candidate scalars outside the
    /// curve order are redrawn.
    pub fn generate<R: RngCore + CryptoRng>(&self, rng: &mut R) -> Result<Keypair> {
        let mut secret = [0u8; 32];
        loop {
            rng.try_fill_bytes(&mut secret)?;
            match self.derive(secret) {
                Ok(keypair) => return Ok(keypair),
                Err(VanityError::InvalidSecretKey(_)) => continue,
                Err(e) => return Err(e),
            }
        }
    }

    /// Derives the keypair for an existing secret scalar.
    pub fn derive(&self, secret_bytes: [u8; 32]) -> Result<Keypair> {
        let address = match self.curve {
            Curve::P256 => {
                let secret_key = p256::SecretKey::from_slice(&secret_bytes)
                    .map_err(|e| VanityError::InvalidSecretKey(e.to_string()))?;
                let point = secret_key.public_key().to_encoded_point(false);
                let public_key: &[u8; UNCOMPRESSED_PUBLIC_KEY_LEN] =
                    point.as_bytes().try_into().map_err(|_| {
                        VanityError::InvalidSecretKey("unexpected public key encoding".into())
                    })?;
                Address::from_uncompressed_public_key(public_key)
            }
            Curve::Secp256k1 => {
                let secret_key = SecretKey::from_slice(&secret_bytes)
                    .map_err(|e| VanityError::InvalidSecretKey(e.to_string()))?;
                let public_key = PublicKey::from_secret_key(&self.secp, &secret_key);
                Address::from_uncompressed_public_key(&public_key.serialize_uncompressed())
            }
        };

        Ok(Keypair {
            secret_key: secret_bytes,
            address,
        })
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn secret_one() -> [u8; 32] {
        let mut secret = [0u8; 32];
        secret[31] = 1;
        secret
    }

    #[test]
    fn test_keypair_generation() {
        for curve in [Curve::P256, Curve::Secp256k1] {
            let generator = KeyGenerator::new(curve);
            let keypair = generator.generate(&mut rand::rngs::OsRng).unwrap();
            assert_eq!(keypair.private_key_hex().len(), 64);
            assert_eq!(keypair.address().as_bytes().len(), 20);
        }
    }

    #[test]
    fn test_deterministic_address() {
        let keypair = Keypair::from_secret_key(Curve::Secp256k1, secret_one()).unwrap();

        // Address for private key = 1 is well-known
        assert_eq!(
            keypair.address().to_hex(),
            "7e5f4552091a69125d5dfcb7b8c2659029395bdf"
        );
    }

    #[test]
    fn test_p256_deterministic_address() {
        let keypair = Keypair::from_secret_key(Curve::P256, secret_one()).unwrap();

        // Scalar 1 yields the P-256 generator point
        assert_eq!(
            keypair.address().to_hex(),
            "d3a9f047ad43d7e2e4e7e491f1fe2e657a2651b6"
        );
    }

    #[test]
    fn test_same_seed_same_wallet() {
        let generator = KeyGenerator::new(Curve::P256);
        let a = generator.generate(&mut StdRng::seed_from_u64(7)).unwrap();
        let b = generator.generate(&mut StdRng::seed_from_u64(7)).unwrap();
        assert_eq!(a.private_key_bytes(), b.private_key_bytes());
        assert_eq!(a.address(), b.address());
    }

    #[test]
    fn test_rejects_zero_scalar() {
        for curve in [Curve::P256, Curve::Secp256k1] {
            assert!(matches!(
                Keypair::from_secret_key(curve, [0u8; 32]),
                Err(VanityError::InvalidSecretKey(_))
            ));
        }
    }

    #[test]
    fn test_curve_from_str() {
        assert_eq!("prime256v1".parse::<Curve>().unwrap(), Curve::P256);
        assert_eq!("SECP256K1".parse::<Curve>().unwrap(), Curve::Secp256k1);
        assert!("ed25519".parse::<Curve>().is_err());
    }
}
