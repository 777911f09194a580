//! Deterministic derivation of numbers from hex digests.
//!
//! Every chance-based decision the engine makes goes through these
//! functions. They take a digest and an explicit counter and nothing else;
//! the exact rotation and parsing rules are part of the output contract and
//! must not be "improved".

/// Number of hex characters parsed out of a rotated digest.
pub const DECIMAL_WIDTH: usize = 12;

/// Rotates `digest` so that index `counter % len` becomes its start,
/// wrapping the prefix around to the end.
#[must_use]
pub fn wrap_around(digest: &str, counter: u64) -> String {
    let length = digest.chars().count();
    if length == 0 {
        return String::new();
    }
    let index = (counter % length as u64) as usize;
    digest.chars().cycle().skip(index).take(length).collect()
}

/// Parses the leading hexadecimal digits of `s` (at most [`DECIMAL_WIDTH`]
/// of them are ever passed in). Returns 0 when there are none.
#[must_use]
pub fn parse_hex_prefix(s: &str) -> u64 {
    s.chars()
        .take_while(char::is_ascii_hexdigit)
        .take(16)
        .fold(0u64, |acc, c| {
            (acc << 4) | u64::from(c.to_digit(16).unwrap_or(0))
        })
}

/// Decimal value of the first twelve hex characters of the digest,
/// read without any rotation.
#[must_use]
pub fn decimal_for_prefix(digest: &str) -> u64 {
    let window: String = digest.chars().take(DECIMAL_WIDTH).collect();
    parse_hex_prefix(&window)
}

/// Decimal value of the first twelve hex characters of the digest after
/// rotating it by `counter`.
#[must_use]
pub fn decimal_for_hash(digest: &str, counter: u64) -> u64 {
    decimal_for_prefix(&wrap_around(digest, counter))
}

/// Fixed 0–100 threshold test: true iff `number % 100 >= 100 - percentage`.
#[must_use]
pub fn chance_for(percentage: f64, number: u64) -> bool {
    let modded = (number % 100) as f64;
    modded >= 100.0 - percentage
}

/// `decimal_for_hash(digest, counter) % max`. A zero result is replaced by
/// `max / 2` unless `zero_allowed` is set.
#[must_use]
pub fn random_number_for(max: u64, digest: &str, counter: u64, zero_allowed: bool) -> u64 {
    if max == 0 {
        return 0;
    }
    match decimal_for_hash(digest, counter) % max {
        0 if !zero_allowed => max / 2,
        n => n,
    }
}

/// Decimal value of a named slice of the fingerprint.
#[must_use]
pub fn decimal_for_fragment(digest: &str, index: usize, length: usize) -> u64 {
    let fragment: String = digest.chars().skip(index).take(length).collect();
    parse_hex_prefix(&fragment)
}
