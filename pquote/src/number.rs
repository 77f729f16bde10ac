//! Quote number generation and format checks.
//!
//! ```rust
//! use pquote::{generate_quote_number, is_valid_quote_number};
//!
//! let number = generate_quote_number();
//! assert!(is_valid_quote_number(&number));
//! assert!(!is_valid_quote_number("Q123"));
//! ```

use rand::Rng;

const QUOTE_NUMBER_DIGITS: usize = 8;

pub fn generate_quote_number() -> String {
    generate_quote_number_with(&mut rand::rng())
}

pub fn generate_quote_number_with<R: Rng + ?Sized>(rng: &mut R) -> String {
    let digits: u32 = rng.random_range(10_000_000..100_000_000);
    format!("Q{digits}")
}

/// `Q` followed by exactly eight ASCII digits.
pub fn is_valid_quote_number(value: &str) -> bool {
    value
        .strip_prefix('Q')
        .is_some_and(|digits| {
            digits.len() == QUOTE_NUMBER_DIGITS && digits.bytes().all(|byte| byte.is_ascii_digit())
        })
}
