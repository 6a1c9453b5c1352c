//! A single search invocation: generate, match, report.

use std::sync::atomic::{AtomicBool, Ordering};

use crossbeam_channel::Sender;
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};

use crate::config::{SearchConfig, ALTERNATE_DISPLAY_TAG, HEX_DISPLAY_PREFIX};
use crate::crypto::{checksum_case, KeyGenerator, Keypair};
use crate::error::Result;
use crate::matcher::{AddressFormat, Pattern, PatternType, ALTERNATE_LEAD_LEN};

/// Parameters of one search invocation, as sent by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    /// Text the address must contain at the chosen edge
    pub pattern: String,
    /// Whether the pattern's casing must match
    #[serde(default)]
    pub case_sensitive: bool,
    /// Match the base58check form instead of hex
    #[serde(default)]
    pub use_alternate_format: bool,
    /// Match the end rather than the start of the address
    #[serde(default)]
    pub match_at_suffix: bool,
}

impl SearchRequest {
    /// Compiles the request into a normalized pattern.
    pub fn to_pattern(&self, config: &SearchConfig) -> Pattern {
        let pattern_type = if self.match_at_suffix {
            PatternType::Suffix
        } else {
            PatternType::Prefix
        };
        let format = if self.use_alternate_format {
            AddressFormat::Alternate
        } else {
            AddressFormat::Hex
        };

        Pattern::new(self.pattern.as_str(), pattern_type, self.case_sensitive, format)
            .with_body_len(config.alternate_body_len)
    }
}

/// Messages sent from a search back to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SearchMessage {
    /// Terminal success
    Success {
        address: String,
        #[serde(rename = "privateKey")]
        private_key: String,
        attempts: u64,
    },
    /// Periodic progress tick
    Progress { attempts: u64 },
    /// Terminal failure
    Failure { error: String },
}

impl SearchMessage {
    /// Returns true for success and failure messages.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, SearchMessage::Progress { .. })
    }
}

/// Outbound side of the host channel.
///
/// Implementations must never block the search.
pub trait MessageSink {
    /// Delivers a message. Returns false once nobody is listening anymore.
    fn deliver(&self, message: SearchMessage) -> bool;
}

impl MessageSink for Sender<SearchMessage> {
    fn deliver(&self, message: SearchMessage) -> bool {
        self.send(message).is_ok()
    }
}

/// A matched wallet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Found {
    /// Display address (`0x` + checksum hex, or tag + base58check)
    pub address: String,
    /// Private key as hex, no 0x prefix
    pub private_key: String,
    /// Attempts since the last progress tick, including the match
    pub attempts: u64,
}

/// How a search that did not fail ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    Found(Found),
    Cancelled,
}

/// One search invocation with its own random source.
pub struct Search<R> {
    pattern: Pattern,
    config: SearchConfig,
    generator: KeyGenerator,
    rng: R,
    total_attempts: u64,
}

impl Search<OsRng> {
    /// Creates a search seeded from the operating system.
    pub fn from_os_rng(request: &SearchRequest, config: SearchConfig) -> Self {
        Self::new(request, config, OsRng)
    }
}

impl<R: RngCore + CryptoRng> Search<R> {
    /// Creates a search. The pattern is normalized once here.
    pub fn new(request: &SearchRequest, config: SearchConfig, rng: R) -> Self {
        Self {
            pattern: request.to_pattern(&config),
            generator: KeyGenerator::new(config.curve),
            config,
            rng,
            total_attempts: 0,
        }
    }

    /// Returns the normalized pattern.
    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    /// Returns every attempt made so far, across progress ticks.
    pub fn total_attempts(&self) -> u64 {
        self.total_attempts
    }

    /// Runs until a match is found, `stop` is set, or the sink goes away.
    ///
    /// Emits `Progress` every `batch_size` misses and one `Success` on match.
    /// Errors are returned without emitting anything.
    pub fn run<S: MessageSink>(&mut self, stop: &AtomicBool, sink: &S) -> Result<SearchOutcome> {
        let batch_size = self.config.batch_size.max(1);
        let mut attempts = 0u64;

        loop {
            if stop.load(Ordering::Relaxed) {
                return Ok(SearchOutcome::Cancelled);
            }

            let keypair = self.generator.generate(&mut self.rng)?;
            attempts += 1;
            self.total_attempts += 1;

            if let Some(address) = self.evaluate(&keypair) {
                let found = Found {
                    address,
                    private_key: keypair.private_key_hex(),
                    attempts,
                };
                log::debug!(
                    "match {} after {} attempts",
                    found.address,
                    self.total_attempts
                );
                let delivered = sink.deliver(SearchMessage::Success {
                    address: found.address.clone(),
                    private_key: found.private_key.clone(),
                    attempts,
                });
                if !delivered {
                    log::warn!("host went away before the result was delivered");
                }
                return Ok(SearchOutcome::Found(found));
            }

            if attempts >= batch_size {
                if !sink.deliver(SearchMessage::Progress { attempts }) {
                    log::debug!("host went away, stopping search");
                    return Ok(SearchOutcome::Cancelled);
                }
                attempts = 0;
            }
        }
    }

    /// Runs the search and reports any error as a single `Failure` message.
    pub fn dispatch<S: MessageSink>(
        &mut self,
        stop: &AtomicBool,
        sink: &S,
    ) -> Option<SearchOutcome> {
        match self.run(stop, sink) {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                log::error!("search failed: {}", e);
                sink.deliver(SearchMessage::Failure {
                    error: e.to_string(),
                });
                None
            }
        }
    }

    /// Returns the display address if the keypair matches.
    #[inline]
    fn evaluate(&self, keypair: &Keypair) -> Option<String> {
        let address = keypair.address();
        match self.pattern.format() {
            AddressFormat::Hex => {
                let hex = address.to_hex();
                self.pattern
                    .matches(&hex)
                    .is_match()
                    .then(|| format!("{}{}", HEX_DISPLAY_PREFIX, checksum_case(&hex)))
            }
            AddressFormat::Alternate => {
                let text = address.to_alternate(self.config.version_prefix);
                let body = text.get(ALTERNATE_LEAD_LEN..).unwrap_or("");
                self.pattern
                    .matches(body)
                    .is_match()
                    .then(|| format!("{}{}", ALTERNATE_DISPLAY_TAG, text))
            }
        }
    }
}

/// Host entry point: runs one search seeded from the OS and reports failures.
pub fn dispatch<S: MessageSink>(
    request: &SearchRequest,
    config: SearchConfig,
    stop: &AtomicBool,
    sink: &S,
) -> Option<SearchOutcome> {
    Search::from_os_rng(request, config).dispatch(stop, sink)
}
