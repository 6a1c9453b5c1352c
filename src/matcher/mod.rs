//! Pattern matching for vanity addresses.
//!
//! Supports two address representations:
//! - Hex: 40 lowercase hex characters, optionally checked against checksum casing
//! - Alternate: Base58Check body, exact or case-insensitive comparison

mod pattern;

pub use pattern::{
    alternate_lead_range, is_valid_alternate_address, is_valid_vanity_address, AddressFormat,
    MatchResult, Pattern, PatternType, ALTERNATE_BODY_LEN, ALTERNATE_LEAD_LEN,
};
