//! # Sale Number Generation
//!
//! Generates the human-readable `sale_number` printed on receipts.
//!
//! ## Properties
//! - Fixed length, lowercase letters and digits only
//! - Sampled with replacement from a fixed alphabet, so it is **not**
//!   unique by construction
//! - Uniqueness is a storage constraint (`sales.sale_number UNIQUE`); the
//!   sale orchestrator regenerates and retries a bounded number of times
//!   on collision

use rand::Rng;

/// Sampling alphabet for sale numbers.
///
/// Letters appear more than once, which weights the sample toward letters
/// over digits. Receipt numbers have looked like this since the first
/// deployment, so the alphabet stays as-is.
pub const SALE_NUMBER_ALPHABET: &str = "abcdefghijklmnopqrstuvwxy1234567890abcdefghijklmnopqrstuvw";

/// Length of a generated sale number (equals the alphabet length).
pub const SALE_NUMBER_LEN: usize = SALE_NUMBER_ALPHABET.len();

/// Generates a pseudo-random sale number.
///
/// ## Example
/// ```rust
/// use duka_core::sale_number::{generate_sale_number, SALE_NUMBER_LEN};
///
/// let number = generate_sale_number();
/// assert_eq!(number.len(), SALE_NUMBER_LEN);
/// ```
pub fn generate_sale_number() -> String {
    let alphabet = SALE_NUMBER_ALPHABET.as_bytes();
    let mut rng = rand::rng();

    (0..SALE_NUMBER_LEN)
        .map(|_| alphabet[rng.random_range(0..alphabet.len())] as char)
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_length() {
        for _ in 0..32 {
            assert_eq!(generate_sale_number().len(), SALE_NUMBER_LEN);
        }
    }

    #[test]
    fn test_charset_is_lowercase_alphanumeric() {
        let number = generate_sale_number();
        assert!(number
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
    }

    #[test]
    fn test_consecutive_numbers_differ() {
        // With 59 positions over a 36-symbol charset a repeat would mean
        // a broken RNG, not bad luck.
        assert_ne!(generate_sale_number(), generate_sale_number());
    }
}
