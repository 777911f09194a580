//! SHA-256 fingerprints for pets, feeding events and rendered state.

use serde_json::Value;
use sha2::{Digest, Sha256};

/// Lowercase hex SHA-256 of the UTF-8 bytes of `input`.
#[must_use]
pub fn hash_for(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}

/// Digest seeding every chance roll made on behalf of one feeding event.
#[must_use]
pub fn hashed_event_id(event_id: &str, timestamp: u64, pet_fingerprint: &str) -> String {
    hash_for(&format!("{}{}{}", event_id, timestamp, pet_fingerprint))
}

/// Renders integral floats without a fractional part, matching how the
/// rules document itself writes numbers.
#[must_use]
pub fn plain_number(value: f64) -> Value {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 9_007_199_254_740_992.0 {
        Value::from(value as i64)
    } else {
        Value::from(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_for_known_vector() {
        assert_eq!(
            hash_for("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_hashed_event_id_depends_on_all_parts() {
        let base = hashed_event_id("child", 1, "pet");
        assert_eq!(base, hash_for("child1pet"));
        assert_ne!(base, hashed_event_id("child", 2, "pet"));
        assert_ne!(base, hashed_event_id("child", 1, "other"));
    }

    #[test]
    fn test_plain_number() {
        assert_eq!(plain_number(3.0).to_string(), "3");
        assert_eq!(plain_number(2.5).to_string(), "2.5");
        assert_eq!(plain_number(-1.0).to_string(), "-1");
    }
}
