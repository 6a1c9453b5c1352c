//! Base58 and Base58Check encoding.
//!
//! `encode_check` prepends a single `0x00` leader byte to the data, appends the
//! first four bytes of SHA-256(SHA-256(leader || data)) and converts the result
//! with the plain `encode`.

use sha2::{Digest, Sha256};

use crate::error::{Result, VanityError};

/// The base58 alphabet (no `0`, `O`, `I` or `l`).
pub const ALPHABET: &[u8; 58] = b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// Byte prepended to the data before the checksum is computed.
pub const CHECK_LEADER: u8 = 0x00;

/// Length of the checksum trailer in bytes.
pub const CHECKSUM_LEN: usize = 4;

const BASE: u32 = 58;

/// Reverse lookup table from ASCII byte to digit value (0xff = invalid).
const DIGITS: [u8; 128] = {
    let mut table = [0xffu8; 128];
    let mut i = 0;
    while i < ALPHABET.len() {
        table[ALPHABET[i] as usize] = i as u8;
        i += 1;
    }
    table
};

/// Encodes bytes as base58.
///
/// Every leading zero byte becomes a leading `1`. An empty input yields an
/// empty string.
pub fn encode(input: &[u8]) -> String {
    if input.is_empty() {
        return String::new();
    }

    let zeroes = input.iter().take_while(|&&b| b == 0).count();
    let rest = &input[zeroes..];

    // log(256) / log(58) ~= 1.366, rounded up
    let size = rest.len() * 138 / 100 + 1;
    let mut b58 = vec![0u8; size];
    let mut length = 0;

    for &byte in rest {
        let mut carry = byte as u32;
        let mut i = 0;
        // b58 = b58 * 256 + byte, most significant digit first
        for digit in b58.iter_mut().rev() {
            if carry == 0 && i >= length {
                break;
            }
            carry += 256 * (*digit as u32);
            *digit = (carry % BASE) as u8;
            carry /= BASE;
            i += 1;
        }
        assert_eq!(carry, 0, "base58 buffer too small: non-zero carry");
        length = i;
    }

    let digits = b58[size - length..].iter().skip_while(|&&d| d == 0);

    let mut out = String::with_capacity(zeroes + length);
    out.extend(std::iter::repeat(ALPHABET[0] as char).take(zeroes));
    out.extend(digits.map(|&d| ALPHABET[d as usize] as char));
    out
}

/// Decodes a base58 string back into bytes.
pub fn decode(input: &str) -> Result<Vec<u8>> {
    let bytes = input.as_bytes();
    let ones = bytes.iter().take_while(|&&b| b == ALPHABET[0]).count();

    // log(58) / log(256) ~= 0.733, rounded up
    let size = (bytes.len() - ones) * 733 / 1000 + 1;
    let mut b256 = vec![0u8; size];
    let mut length = 0;

    for (position, &c) in bytes.iter().enumerate().skip(ones) {
        let value = DIGITS
            .get(c as usize)
            .copied()
            .filter(|&v| v != 0xff)
            .ok_or_else(|| VanityError::InvalidBase58Character {
                character: input[position..].chars().next().unwrap_or('?'),
                position,
            })?;

        let mut carry = value as u32;
        let mut i = 0;
        for byte in b256.iter_mut().rev() {
            if carry == 0 && i >= length {
                break;
            }
            carry += BASE * (*byte as u32);
            *byte = (carry & 0xff) as u8;
            carry >>= 8;
            i += 1;
        }
        assert_eq!(carry, 0, "base256 buffer too small: non-zero carry");
        length = i;
    }

    let mut out = vec![0u8; ones];
    out.extend(b256[size - length..].iter().skip_while(|&&b| b == 0));
    Ok(out)
}

/// Computes the 4-byte double SHA-256 checksum of `data`.
pub fn checksum(data: &[u8]) -> [u8; CHECKSUM_LEN] {
    let digest = Sha256::digest(Sha256::digest(data));
    let mut out = [0u8; CHECKSUM_LEN];
    out.copy_from_slice(&digest[..CHECKSUM_LEN]);
    out
}

/// Encodes `data` as Base58Check with the `0x00` leader byte.
pub fn encode_check(data: &[u8]) -> String {
    let mut buf = Vec::with_capacity(1 + data.len() + CHECKSUM_LEN);
    buf.push(CHECK_LEADER);
    buf.extend_from_slice(data);
    let sum = checksum(&buf);
    buf.extend_from_slice(&sum);
    encode(&buf)
}

/// Decodes a Base58Check string, verifying the leader byte and checksum.
///
/// Returns the data without the leader byte and checksum.
pub fn decode_check(input: &str) -> Result<Vec<u8>> {
    let raw = decode(input)?;
    if raw.len() < 1 + CHECKSUM_LEN {
        return Err(VanityError::InvalidLength(raw.len()));
    }

    let (body, sum) = raw.split_at(raw.len() - CHECKSUM_LEN);
    if checksum(body) != sum {
        return Err(VanityError::InvalidChecksum);
    }
    if body[0] != CHECK_LEADER {
        return Err(VanityError::InvalidVersion(body[0]));
    }

    Ok(body[1..].to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty() {
        assert_eq!(encode(&[]), "");
        assert_eq!(decode("").unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_known_vectors() {
        assert_eq!(encode(b"hello world"), "StV1DL6CwTryKyV");
        assert_eq!(encode(&hex::decode("572e4794").unwrap()), "3EFU7m");
        assert_eq!(encode(&hex::decode("516b6fcd0f").unwrap()), "ABnLTmg");
        assert_eq!(encode(&[0x00]), "1");
        assert_eq!(encode(&[57]), "z");
        assert_eq!(encode(&[58]), "21");
    }

    #[test]
    fn test_leading_zeroes_only() {
        assert_eq!(encode(&[0, 0, 0]), "111");
        assert_eq!(decode("111").unwrap(), vec![0, 0, 0]);
    }

    #[test]
    fn test_encode_check_p2pkh_vector() {
        let hash160 = hex::decode("010966776006953d5567439e5e39f86a0d273bee").unwrap();
        assert_eq!(encode_check(&hash160), "16UwLL9Risc3QfPqBUvKofHmBQ7wMtjvM");
    }

    #[test]
    fn test_decode_check_roundtrip() {
        let data = hex::decode("41f8deadbeef").unwrap();
        let encoded = encode_check(&data);
        assert_eq!(decode_check(&encoded).unwrap(), data);
    }

    #[test]
    fn test_decode_check_rejects_tampering() {
        let encoded = encode_check(b"payload");
        let mut tampered = encoded.into_bytes();
        let last = tampered.len() - 1;
        tampered[last] = if tampered[last] == b'2' { b'3' } else { b'2' };
        let tampered = String::from_utf8(tampered).unwrap();
        assert!(matches!(
            decode_check(&tampered),
            Err(VanityError::InvalidChecksum)
        ));
    }

    #[test]
    fn test_decode_invalid_character() {
        let err = decode("12O4").unwrap_err();
        assert!(matches!(
            err,
            VanityError::InvalidBase58Character {
                character: 'O',
                position: 2
            }
        ));
    }

    #[test]
    fn test_decode_check_too_short() {
        assert!(matches!(
            decode_check("1"),
            Err(VanityError::InvalidLength(1))
        ));
    }
}
