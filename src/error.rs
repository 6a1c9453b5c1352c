//! Error types shared by the encoder, key generation and search loop.

/// Errors raised while generating wallets or encoding addresses.
#[derive(Debug, thiserror::Error)]
pub enum VanityError {
    #[error("Invalid base58 character {character:?} at position {position}")]
    InvalidBase58Character { character: char, position: usize },

    #[error("Invalid base58check length: {0} bytes")]
    InvalidLength(usize),

    #[error("Invalid base58check version byte: {0:#04x}")]
    InvalidVersion(u8),

    #[error("Invalid base58check checksum")]
    InvalidChecksum,

    #[error("Entropy source failure: {0}")]
    Entropy(#[from] rand::Error),

    #[error("Invalid secret key: {0}")]
    InvalidSecretKey(String),
}

pub type Result<T> = std::result::Result<T, VanityError>;
