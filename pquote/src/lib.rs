//! Quote domain model for the PumaPromos assistant.
//!
//! ```rust
//! use pquote::prelude::*;
//!
//! let request = QuoteRequest::new("Trade Show/Event", 50)
//!     .with_budget("$5-$10")
//!     .with_category("Drinkware (Tumblers, Bottles, Mugs)");
//! let quote = mock_quote(&request);
//!
//! assert!(quote.products.iter().all(|product| product.quantity == 50));
//! assert_eq!(format_currency(quote.total), "$1,485.96");
//! assert!(is_valid_quote_number(&quote.quote_number));
//! ```

pub mod catalog;
pub mod draft;
pub mod format;
pub mod mock;
pub mod number;
pub mod parse;
pub mod pricing;
pub mod prompt;
pub mod request;

pub use catalog::{CatalogProduct, EXAMPLE_PRODUCTS};
pub use draft::{
    BrandingPreferences, ContactDetails, QuoteDraft, QuoteField, ValidationErrors, is_valid_email,
};
pub use format::format_currency;
pub use mock::{FALLBACK_QUANTITY, MOCK_CHAT_REPLY, mock_quote, mock_quote_with};
pub use number::{generate_quote_number, generate_quote_number_with, is_valid_quote_number};
pub use parse::{
    AssembledQuote, QuoteCorrection, QuoteParseError, RawProduct, RawQuote, assemble_quote,
    parse_vendor_quote, strip_code_fence,
};
pub use pricing::{
    PRODUCTS_PER_QUOTE, QuoteResult, QuoteTotals, RecommendedProduct, SETUP_FEE, SHIPPING_RATE,
    round_cents,
};
pub use prompt::{CHAT_SYSTEM_PROMPT, JSON_ONLY_SYSTEM_PROMPT, quote_prompt};
pub use request::{QuoteRequest, Timeline};

pub mod prelude {
    pub use crate::{
        QuoteDraft, QuoteField, QuoteRequest, QuoteResult, RecommendedProduct, Timeline,
        ValidationErrors, format_currency, is_valid_quote_number, mock_quote,
    };
}
