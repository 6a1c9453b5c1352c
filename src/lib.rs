//! # vanity_wallet
//!
//! Vanity wallet generator. Draws random keypairs until the derived address
//! matches a prefix or suffix, either as checksum-cased hex or as a
//! Base58Check string with a network version prefix.
//!
//! ## Architecture
//!
//! - `crypto`: Key generation, address derivation and Base58Check
//! - `matcher`: Pattern matching for both address forms
//! - `worker`: The search loop, host messages and the worker pool
//! - `config`: Search constants and command-line configuration

pub mod config;
pub mod crypto;
pub mod error;
pub mod matcher;
pub mod worker;

pub use config::{Config, SearchConfig};
pub use crypto::{Address, Curve, KeyGenerator, Keypair};
pub use error::VanityError;
pub use matcher::{AddressFormat, MatchResult, Pattern, PatternType};
pub use worker::{
    dispatch, MessageSink, Search, SearchMessage, SearchOutcome, SearchRequest, WorkerPool,
};
