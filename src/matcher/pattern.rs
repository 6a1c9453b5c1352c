//! Pattern matching implementation.

use std::ops::RangeInclusive;
use std::str::FromStr;

use crate::config::DEFAULT_VERSION_PREFIX;
use crate::crypto::{base58, keccak256, nibble, ADDRESS_HEX_LEN, ADDRESS_LEN};

/// Expected length of the alternate form once its leading characters are
/// stripped.
pub const ALTERNATE_BODY_LEN: usize = 33;

/// Number of fixed leading characters stripped from the alternate form before
/// matching.
pub const ALTERNATE_LEAD_LEN: usize = 4;

/// Where in the address the pattern must appear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PatternType {
    /// Match at the beginning of the address
    #[default]
    Prefix,
    /// Match at the end of the address
    Suffix,
}

impl FromStr for PatternType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "prefix" | "start" | "begin" => Ok(PatternType::Prefix),
            "suffix" | "end" => Ok(PatternType::Suffix),
            _ => Err(format!("Unknown pattern type: {}", s)),
        }
    }
}

impl std::fmt::Display for PatternType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PatternType::Prefix => write!(f, "prefix"),
            PatternType::Suffix => write!(f, "suffix"),
        }
    }
}

/// Textual representation the pattern is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AddressFormat {
    /// 40 lowercase hex characters, checksum-cased for display
    #[default]
    Hex,
    /// Base58Check of version prefix + address
    Alternate,
}

impl std::fmt::Display for AddressFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AddressFormat::Hex => write!(f, "hex"),
            AddressFormat::Alternate => write!(f, "base58check"),
        }
    }
}

/// Result of a pattern match operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchResult {
    /// Full match found
    Match,
    /// No match
    NoMatch,
}

impl MatchResult {
    #[inline]
    pub fn is_match(self) -> bool {
        matches!(self, MatchResult::Match)
    }
}

impl From<bool> for MatchResult {
    #[inline]
    fn from(matched: bool) -> Self {
        if matched {
            MatchResult::Match
        } else {
            MatchResult::NoMatch
        }
    }
}

/// A normalized pattern ready to be matched against candidate addresses.
#[derive(Debug, Clone)]
pub struct Pattern {
    /// The pattern string (lowercased unless case sensitive)
    pattern: String,
    /// The pattern type
    pattern_type: PatternType,
    /// Whether matching is case sensitive
    case_sensitive: bool,
    /// Which address representation is matched
    format: AddressFormat,
    /// Length the alternate body is anchored to for suffix matching
    body_len: usize,
    /// Alphabet indices the first alternate body character can take
    lead: Option<RangeInclusive<usize>>,
}

impl Pattern {
    /// Creates a new pattern.
    pub fn new(
        pattern: impl Into<String>,
        pattern_type: PatternType,
        case_sensitive: bool,
        format: AddressFormat,
    ) -> Self {
        let pattern = pattern.into();
        let pattern = if case_sensitive {
            pattern
        } else {
            pattern.to_lowercase()
        };

        Self {
            pattern,
            pattern_type,
            case_sensitive,
            format,
            body_len: ALTERNATE_BODY_LEN,
            lead: match format {
                AddressFormat::Alternate => alternate_lead_range(DEFAULT_VERSION_PREFIX),
                AddressFormat::Hex => None,
            },
        }
    }

    /// Sets the version prefix that alternate addresses are built with.
    pub fn with_version_prefix(mut self, version_prefix: [u8; 2]) -> Self {
        if self.format == AddressFormat::Alternate {
            self.lead = alternate_lead_range(version_prefix);
        }
        self
    }

    /// Overrides the anchor length used for alternate-form suffix matching.
    pub fn with_body_len(mut self, body_len: usize) -> Self {
        self.body_len = body_len;
        self
    }

    /// Returns the pattern string.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Returns the pattern type.
    pub fn pattern_type(&self) -> PatternType {
        self.pattern_type
    }

    /// Returns whether matching is case sensitive.
    pub fn case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    /// Returns the address representation this pattern targets.
    pub fn format(&self) -> AddressFormat {
        self.format
    }

    /// Matches a candidate address text against this pattern.
    ///
    /// `candidate` is the lowercase hex address for [`AddressFormat::Hex`], or
    /// the alternate text with its leading characters stripped for
    /// [`AddressFormat::Alternate`].
    #[inline]
    pub fn matches(&self, candidate: &str) -> MatchResult {
        let suffix = self.pattern_type == PatternType::Suffix;
        let matched = match self.format {
            AddressFormat::Hex => {
                is_valid_vanity_address(candidate, &self.pattern, self.case_sensitive, suffix)
            }
            AddressFormat::Alternate => is_valid_alternate_address(
                candidate,
                &self.pattern,
                self.case_sensitive,
                suffix,
                self.body_len,
            ),
        };
        matched.into()
    }

    /// Counts how many reachable first body characters the pattern's first
    /// character accepts, out of all reachable ones.
    ///
    /// Only prefix patterns on the alternate form are constrained.
    fn lead_choices(&self) -> Option<(u64, u64)> {
        if self.pattern_type != PatternType::Prefix {
            return None;
        }
        let range = self.lead.clone()?;
        let first = *self.pattern.as_bytes().first()?;
        let reachable = &base58::ALPHABET[range];
        let accepted = reachable
            .iter()
            .filter(|&&c| {
                if self.case_sensitive {
                    c == first
                } else {
                    c.eq_ignore_ascii_case(&first)
                }
            })
            .count();
        Some((accepted as u64, reachable.len() as u64))
    }

    /// Returns false when no generated address can ever satisfy the pattern.
    pub fn is_reachable(&self) -> bool {
        let limit = match self.format {
            AddressFormat::Hex => ADDRESS_HEX_LEN,
            AddressFormat::Alternate => self.body_len,
        };
        self.pattern.len() <= limit && !matches!(self.lead_choices(), Some((0, _)))
    }

    /// Returns the estimated number of attempts needed to find a match.
    ///
    /// - Hex: 16 per character, doubled for each letter under case sensitivity
    /// - Alternate: 58 per character, halved for letters that exist in both
    ///   cases when case insensitive. The first character of a prefix only
    ///   competes with the characters the version prefix leaves reachable.
    ///
    /// Unreachable patterns report `u64::MAX`.
    pub fn estimated_difficulty(&self) -> u64 {
        if !self.is_reachable() {
            return u64::MAX;
        }
        let lead = self.lead_choices();

        self.pattern.chars().enumerate().fold(1u64, |acc, (i, c)| {
            let per_char = match (self.format, lead) {
                (AddressFormat::Alternate, Some((accepted, reachable))) if i == 0 => {
                    reachable.div_ceil(accepted)
                }
                (AddressFormat::Hex, _) => {
                    if self.case_sensitive && c.is_ascii_alphabetic() {
                        32
                    } else {
                        16
                    }
                }
                (AddressFormat::Alternate, _) => {
                    let both_cases = base58::ALPHABET.contains(&(c.to_ascii_lowercase() as u8))
                        && base58::ALPHABET.contains(&(c.to_ascii_uppercase() as u8))
                        && c.is_ascii_alphabetic();
                    if !self.case_sensitive && both_cases {
                        29
                    } else {
                        58
                    }
                }
            };
            acc.saturating_mul(per_char)
        })
    }

    /// Returns a human-readable difficulty estimate.
    pub fn difficulty_description(&self) -> String {
        if !self.is_reachable() {
            return "Impossible (no address can match)".into();
        }
        let diff = self.estimated_difficulty();
        match diff {
            0..=1_000 => "Very Easy (< 1 second)".into(),
            1_001..=100_000 => "Easy (seconds)".into(),
            100_001..=10_000_000 => "Medium (minutes)".into(),
            10_000_001..=1_000_000_000 => "Hard (hours)".into(),
            _ => "Very Hard (days or more)".into(),
        }
    }
}

/// Alphabet indices the first body character of an alternate address can take.
///
/// Encodes the smallest and largest Base58Check payloads for `version_prefix`.
/// Returns `None` when the two do not share the stripped lead, in which case
/// no narrower bound is known.
pub fn alternate_lead_range(version_prefix: [u8; 2]) -> Option<RangeInclusive<usize>> {
    let extreme = |fill: u8| {
        let mut payload = [fill; 1 + 2 + ADDRESS_LEN + base58::CHECKSUM_LEN];
        payload[0] = base58::CHECK_LEADER;
        payload[1..3].copy_from_slice(&version_prefix);
        base58::encode(&payload)
    };
    let (low, high) = (extreme(0x00), extreme(0xff));
    if low.len() != high.len() || low.get(..ALTERNATE_LEAD_LEN) != high.get(..ALTERNATE_LEAD_LEN) {
        return None;
    }

    let digit = |text: &str| {
        let c = *text.as_bytes().get(ALTERNATE_LEAD_LEN)?;
        base58::ALPHABET.iter().position(|&a| a == c)
    };
    Some(digit(&low)?..=digit(&high)?)
}

/// Takes `len` bytes of `text` at the chosen edge of a `total`-long string.
///
/// Returns the slice and its offset, or `None` when the text is too short.
#[inline]
fn edge(text: &[u8], len: usize, total: usize, suffix: bool) -> Option<(&[u8], usize)> {
    if suffix {
        let start = total.checked_sub(len)?;
        text.get(start..).map(|s| (s, start))
    } else {
        text.get(..len).map(|s| (s, 0))
    }
}

/// Checks a lowercase hex address (no 0x prefix) against `pattern`.
///
/// When `case_sensitive` is set, the pattern's casing must also equal the
/// checksum casing of the address at the same positions.
pub fn is_valid_vanity_address(
    address_hex: &str,
    pattern: &str,
    case_sensitive: bool,
    suffix: bool,
) -> bool {
    let address = address_hex.as_bytes();
    let pattern = pattern.as_bytes();
    if address.len() != ADDRESS_HEX_LEN {
        return false;
    }

    let Some((sub, offset)) = edge(address, pattern.len(), ADDRESS_HEX_LEN, suffix) else {
        return false;
    };

    if !sub.eq_ignore_ascii_case(pattern) {
        return false;
    }
    if !case_sensitive {
        return true;
    }

    let hash = keccak256(address);
    pattern.iter().enumerate().all(|(i, &p)| {
        let j = i + offset;
        let expected = if nibble(&hash, j) >= 8 {
            address[j].to_ascii_uppercase()
        } else {
            address[j]
        };
        p == expected
    })
}

/// Checks the stripped body of an alternate address against `pattern`.
///
/// Suffix extraction is anchored at `body_len` rather than the body's actual
/// length.
pub fn is_valid_alternate_address(
    body: &str,
    pattern: &str,
    case_sensitive: bool,
    suffix: bool,
    body_len: usize,
) -> bool {
    let Some((sub, _)) = edge(body.as_bytes(), pattern.len(), body_len, suffix) else {
        return false;
    };

    if case_sensitive {
        sub == pattern.as_bytes()
    } else {
        sub.eq_ignore_ascii_case(pattern.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EIP55: &str = "5aaeb6053f3e94c9b9a09f33669435e7ef1beaed";

    #[test]
    fn test_prefix_match() {
        let pattern = Pattern::new("DEAD", PatternType::Prefix, false, AddressFormat::Hex);
        assert_eq!(pattern.pattern(), "dead");
        assert!(pattern
            .matches("deadbeef00000000000000000000000000000000")
            .is_match());
    }

    #[test]
    fn test_prefix_no_match() {
        let pattern = Pattern::new("dead", PatternType::Prefix, false, AddressFormat::Hex);
        assert!(!pattern
            .matches("beefdeadbeef0000000000000000000000000000")
            .is_match());
    }

    #[test]
    fn test_suffix_match() {
        let pattern = Pattern::new("beef", PatternType::Suffix, false, AddressFormat::Hex);
        assert!(pattern
            .matches("0000000000000000000000000000000000debeef")
            .is_match());
    }

    #[test]
    fn test_checksum_prefix() {
        // EIP-55 casing of the address is 5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed
        assert!(is_valid_vanity_address(EIP55, "5aAeb", true, false));
        assert!(!is_valid_vanity_address(EIP55, "5aaeb", true, false));
        assert!(!is_valid_vanity_address(EIP55, "5AAeb", true, false));
        assert!(is_valid_vanity_address(EIP55, "5aaeb", false, false));
    }

    #[test]
    fn test_checksum_suffix() {
        assert!(is_valid_vanity_address(EIP55, "1BeAed", true, true));
        assert!(!is_valid_vanity_address(EIP55, "1beaed", true, true));
        assert!(is_valid_vanity_address(EIP55, "1beaed", false, true));
    }

    #[test]
    fn test_digits_only_case_sensitive() {
        assert!(is_valid_vanity_address(EIP55, "5", true, false));
        assert!(!is_valid_vanity_address(EIP55, "6", true, false));
    }

    #[test]
    fn test_pattern_longer_than_address() {
        let long = "0".repeat(41);
        let address = "0".repeat(40);
        assert!(!is_valid_vanity_address(&address, &long, false, false));
        assert!(!is_valid_vanity_address(&address, &long, false, true));
        assert!(!is_valid_vanity_address(&address, &long, true, true));
    }

    #[test]
    fn test_empty_pattern_always_matches() {
        assert!(is_valid_vanity_address(EIP55, "", true, false));
        assert!(is_valid_vanity_address(EIP55, "", false, true));
        assert!(is_valid_alternate_address("abc", "", true, true, 33));
    }

    #[test]
    fn test_alternate_case_rules() {
        let body = "AhedUmxL1vWKaPpr8hDn4zZ1MZoEWzjLVF";
        let body = &body[1..];
        assert_eq!(body.len(), 33);

        assert!(is_valid_alternate_address(body, "hedU", true, false, 33));
        assert!(!is_valid_alternate_address(body, "hedu", true, false, 33));
        assert!(is_valid_alternate_address(body, "hedu", false, false, 33));
        assert!(is_valid_alternate_address(body, "zjLVF", true, true, 33));
        assert!(is_valid_alternate_address(body, "zjlvf", false, true, 33));
        assert!(!is_valid_alternate_address(body, "ZJLVF", true, true, 33));
    }

    #[test]
    fn test_alternate_suffix_anchor() {
        // A shorter anchor moves the window one character towards the start.
        let body = "123456789";
        assert!(is_valid_alternate_address(body, "89", false, true, 9));
        assert!(!is_valid_alternate_address(body, "89", false, true, 8));
        assert!(!is_valid_alternate_address(body, "1234567890", false, true, 9));
    }

    #[test]
    fn test_pattern_type_from_str() {
        assert_eq!("end".parse::<PatternType>().unwrap(), PatternType::Suffix);
        assert!("contains".parse::<PatternType>().is_err());
    }

    #[test]
    fn test_difficulty() {
        let pattern = Pattern::new("dead", PatternType::Prefix, false, AddressFormat::Hex);
        assert_eq!(pattern.estimated_difficulty(), 65536); // 16^4

        let pattern = Pattern::new("dEad", PatternType::Prefix, true, AddressFormat::Hex);
        assert_eq!(pattern.estimated_difficulty(), 65536 * 16);

        // 'a' is the only accepted lead out of the 25 reachable ones
        let pattern = Pattern::new("a1", PatternType::Prefix, false, AddressFormat::Alternate);
        assert_eq!(pattern.estimated_difficulty(), 25 * 58);

        let pattern = Pattern::new("1a", PatternType::Suffix, false, AddressFormat::Alternate);
        assert_eq!(pattern.estimated_difficulty(), 58 * 29);
    }

    #[test]
    fn test_alternate_lead_range() {
        let range = alternate_lead_range([0x41, 0xf8]).unwrap();
        let reachable: String = base58::ALPHABET[range].iter().map(|&c| c as char).collect();
        assert_eq!(reachable, "NPQRSTUVWXYZabcdefghijkmn");

        // All-zero prefixes change the encoded length with the payload.
        assert!(alternate_lead_range([0x00, 0x00]).is_none());
    }

    #[test]
    fn test_unreachable_alternate_lead() {
        let pattern = Pattern::new("1", PatternType::Prefix, true, AddressFormat::Alternate);
        assert!(!pattern.is_reachable());
        assert_eq!(pattern.estimated_difficulty(), u64::MAX);
        assert_eq!(pattern.difficulty_description(), "Impossible (no address can match)");

        let pattern = Pattern::new("N", PatternType::Prefix, true, AddressFormat::Alternate);
        assert!(pattern.is_reachable());
        assert_eq!(pattern.estimated_difficulty(), 25);

        // Lowercase 'n' and uppercase 'N' are both reachable leads.
        let pattern = Pattern::new("n", PatternType::Prefix, false, AddressFormat::Alternate);
        assert_eq!(pattern.estimated_difficulty(), 13);

        // Suffixes are not constrained by the version prefix.
        let pattern = Pattern::new("1", PatternType::Suffix, true, AddressFormat::Alternate);
        assert!(pattern.is_reachable());
    }

    #[test]
    fn test_generated_leads_stay_in_range() {
        use crate::crypto::Address;

        let range = alternate_lead_range([0x41, 0xf8]).unwrap();
        for fill in [0x00u8, 0x01, 0x7f, 0x80, 0xfe, 0xff] {
            let alt = Address::from_bytes([fill; ADDRESS_LEN]).to_alternate([0x41, 0xf8]);
            let lead = alt.as_bytes()[ALTERNATE_LEAD_LEN];
            let index = base58::ALPHABET.iter().position(|&a| a == lead).unwrap();
            assert!(range.contains(&index), "{}", alt);
        }
    }
}
