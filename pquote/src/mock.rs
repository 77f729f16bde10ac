//! Deterministic quote data for mock mode.

use rand::Rng;

use crate::number::generate_quote_number_with;
use crate::{EXAMPLE_PRODUCTS, QuoteRequest, QuoteResult};

pub const MOCK_CHAT_REPLY: &str =
    "This is a mock response. Please set up your API key to chat with the AI.";

/// Quantity used when a request reaches mock mode without an item count.
pub const FALLBACK_QUANTITY: u32 = 100;

pub fn mock_quote(request: &QuoteRequest) -> QuoteResult {
    mock_quote_with(request, &mut rand::rng())
}

/// Same catalog and pricing on every call; only the quote number varies.
///
/// ```rust
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
/// use pquote::{QuoteRequest, mock_quote_with};
///
/// let quote = mock_quote_with(&QuoteRequest::new("Client Gifts", 2), &mut StdRng::seed_from_u64(1));
/// assert_eq!(quote.products.len(), 3);
/// assert_eq!(quote.subtotal, 49.48);
/// ```
pub fn mock_quote_with<R: Rng + ?Sized>(request: &QuoteRequest, rng: &mut R) -> QuoteResult {
    let quantity = match request.recipient_count {
        0 => FALLBACK_QUANTITY,
        count => count,
    };
    let products = EXAMPLE_PRODUCTS
        .iter()
        .map(|product| product.recommend(quantity))
        .collect();

    QuoteResult::priced(generate_quote_number_with(rng), products)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_item_requests_use_fallback_quantity() {
        let quote = mock_quote(&QuoteRequest::new("Client Gifts", 0));
        assert!(quote.products.iter().all(|p| p.quantity == FALLBACK_QUANTITY));
    }

    #[test]
    fn repeated_calls_only_differ_in_quote_number() {
        let request = QuoteRequest::new("Holiday Gifts", 75);
        let first = mock_quote(&request);
        let second = mock_quote(&request);

        assert_eq!(first.products, second.products);
        assert_eq!(first.totals(), second.totals());
    }
}
