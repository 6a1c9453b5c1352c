//! Runtime configuration for the vanity wallet generator.

use clap::Parser;

use crate::crypto::{base58, Curve, ADDRESS_HEX_LEN};
use crate::matcher::{AddressFormat, Pattern, PatternType, ALTERNATE_BODY_LEN};
use crate::worker::SearchRequest;

/// Attempts between two progress notifications.
pub const DEFAULT_BATCH_SIZE: u64 = 500;

/// Network marker prepended to the address in the alternate form.
pub const DEFAULT_VERSION_PREFIX: [u8; 2] = [0x41, 0xf8];

/// Prefix of a displayed hex address.
pub const HEX_DISPLAY_PREFIX: &str = "0x";

/// Tag prepended to a displayed alternate address.
pub const ALTERNATE_DISPLAY_TAG: &str = "NEW";

/// Constants that shape one search invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    /// Progress notification interval, in attempts
    pub batch_size: u64,
    /// Curve keypairs are generated on
    pub curve: Curve,
    /// Two-byte marker for alternate-format addresses
    pub version_prefix: [u8; 2],
    /// Length the alternate body is anchored to for suffix matching
    pub alternate_body_len: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            curve: Curve::default(),
            version_prefix: DEFAULT_VERSION_PREFIX,
            alternate_body_len: ALTERNATE_BODY_LEN,
        }
    }
}

/// Vanity Wallet Generator
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Pattern to search for (hex characters, or base58 characters with --alternate)
    #[arg(short, long)]
    pub pattern: String,

    /// Pattern type: prefix or suffix
    #[arg(short = 't', long, default_value = "prefix")]
    pub pattern_type: PatternType,

    /// Case sensitive matching (checksum casing for hex addresses)
    #[arg(short = 'c', long, default_value = "false")]
    pub case_sensitive: bool,

    /// Match against the base58check alternate address form
    #[arg(short = 'a', long, default_value = "false")]
    pub alternate: bool,

    /// Number of worker threads (default: number of CPU cores)
    #[arg(short = 'w', long)]
    pub workers: Option<usize>,

    /// Progress report interval in seconds
    #[arg(short = 'r', long, default_value = "5")]
    pub report_interval: u64,

    /// Curve used for key generation: p256 or secp256k1
    #[arg(long, default_value = "p256")]
    pub curve: Curve,

    /// Attempts between progress notifications
    #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
    pub batch_size: u64,

    /// Alternate-form version prefix (4 hex characters)
    #[arg(long, default_value = "41f8", value_parser = parse_version_prefix)]
    pub version_prefix: [u8; 2],

    /// Alternate-form body length used to anchor suffix matches
    #[arg(long, default_value_t = ALTERNATE_BODY_LEN)]
    pub body_len: usize,

    /// Print progress and results as JSON lines
    #[arg(long, default_value = "false")]
    pub json: bool,
}

impl Config {
    /// Returns the number of workers, defaulting to CPU count
    pub fn worker_count(&self) -> usize {
        self.workers.unwrap_or_else(num_cpus::get)
    }

    /// Returns the address representation selected on the command line.
    pub fn format(&self) -> AddressFormat {
        if self.alternate {
            AddressFormat::Alternate
        } else {
            AddressFormat::Hex
        }
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let pattern = self.normalized_pattern();

        if pattern.is_empty() {
            return Err(ConfigError::InvalidPattern("Pattern cannot be empty".into()));
        }

        match self.format() {
            AddressFormat::Hex => {
                if !pattern.chars().all(|c| c.is_ascii_hexdigit()) {
                    return Err(ConfigError::InvalidPattern(
                        "Pattern must contain only hex characters (0-9, a-f)".into(),
                    ));
                }
                if pattern.len() > ADDRESS_HEX_LEN {
                    return Err(ConfigError::InvalidPattern(
                        "Pattern cannot be longer than 40 characters (full address)".into(),
                    ));
                }
            }
            AddressFormat::Alternate => {
                let valid = |c: char| {
                    c.is_ascii()
                        && (base58::ALPHABET.contains(&(c as u8))
                            || (!self.case_sensitive
                                && base58::ALPHABET.contains(&(c.to_ascii_uppercase() as u8))))
                };
                if !pattern.chars().all(valid) {
                    return Err(ConfigError::InvalidPattern(
                        "Pattern must contain only base58 characters (no 0, O, I or l)".into(),
                    ));
                }
                if pattern.len() > self.body_len {
                    return Err(ConfigError::InvalidPattern(format!(
                        "Pattern cannot be longer than {} characters",
                        self.body_len
                    )));
                }
                if !self.compiled_pattern().is_reachable() {
                    return Err(ConfigError::InvalidPattern(format!(
                        "No address with version prefix {} can start with '{}'",
                        hex::encode(self.version_prefix),
                        &pattern[..1]
                    )));
                }
            }
        }

        if self.batch_size == 0 {
            return Err(ConfigError::InvalidOption(
                "Batch size must be at least 1".into(),
            ));
        }

        if self.workers == Some(0) {
            return Err(ConfigError::InvalidOption(
                "Worker count must be at least 1".into(),
            ));
        }

        Ok(())
    }

    /// Returns the normalized pattern (lowercase if case insensitive)
    pub fn normalized_pattern(&self) -> String {
        if self.case_sensitive {
            self.pattern.clone()
        } else {
            self.pattern.to_lowercase()
        }
    }

    /// Builds the compiled pattern for display and difficulty estimates.
    pub fn compiled_pattern(&self) -> Pattern {
        Pattern::new(
            self.pattern.as_str(),
            self.pattern_type,
            self.case_sensitive,
            self.format(),
        )
        .with_body_len(self.body_len)
        .with_version_prefix(self.version_prefix)
    }

    /// Returns the request sent to every worker.
    pub fn request(&self) -> SearchRequest {
        SearchRequest {
            pattern: self.pattern.clone(),
            case_sensitive: self.case_sensitive,
            use_alternate_format: self.alternate,
            match_at_suffix: self.pattern_type == PatternType::Suffix,
        }
    }

    /// Returns the search constants selected on the command line.
    pub fn search_config(&self) -> SearchConfig {
        SearchConfig {
            batch_size: self.batch_size,
            curve: self.curve,
            version_prefix: self.version_prefix,
            alternate_body_len: self.body_len,
        }
    }
}

/// Parses a two-byte version prefix written as 4 hex characters.
fn parse_version_prefix(s: &str) -> Result<[u8; 2], String> {
    let s = s.trim_start_matches("0x");
    let bytes = hex::decode(s).map_err(|e| format!("Invalid version prefix: {}", e))?;
    bytes
        .try_into()
        .map_err(|_| "Version prefix must be exactly 2 bytes".to_string())
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),

    #[error("Invalid option: {0}")]
    InvalidOption(String),
}
