//! Client-side fingerprint identifier synthesis.

use std::time::{SystemTime, UNIX_EPOCH};

const BASE36: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Generate a fingerprint identifier.
///
/// Format matches the vendor's JavaScript:
/// `'fp_' + Math.random().toString(36).substr(2, 9) + '_' + Date.now()`
pub fn generate() -> String {
    let random_part: String = (0..9)
        .map(|_| {
            let idx = (rand::random::<f64>() * BASE36.len() as f64) as usize;
            BASE36[idx.min(BASE36.len() - 1)] as char
        })
        .collect();

    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis();

    format!("fp_{}_{}", random_part, timestamp)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_shape() {
        let fp = generate();
        let parts: Vec<&str> = fp.split('_').collect();

        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "fp");
        assert_eq!(parts[1].len(), 9);
        assert!(parts[1].bytes().all(|b| BASE36.contains(&b)));
        assert!(parts[2].parse::<u128>().is_ok());
    }

    #[test]
    fn test_fingerprints_are_unique() {
        let a = generate();
        let b = generate();
        // Random part alone makes collisions vanishingly unlikely
        assert_ne!(a, b);
    }
}
