//! Quote result model and the pricing formula.
//!
//! ```rust
//! use pquote::{QuoteTotals, RecommendedProduct};
//!
//! let products = vec![
//!     RecommendedProduct::new("Mug", "Ceramic mug", 6.50, "Everyone uses mugs").with_quantity(10),
//! ];
//! let totals = QuoteTotals::from_products(&products);
//!
//! assert_eq!(totals.subtotal, 65.0);
//! assert_eq!(totals.setup_fees, 150.0);
//! assert_eq!(totals.shipping, 5.2);
//! assert_eq!(totals.total, 220.2);
//! ```

use serde::{Deserialize, Serialize};

pub const SETUP_FEE: f64 = 150.0;
pub const SHIPPING_RATE: f64 = 0.08;
pub const PRODUCTS_PER_QUOTE: usize = 3;

/// Rounds a currency amount to whole cents.
pub fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendedProduct {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub reason: String,
    pub quantity: u32,
}

impl RecommendedProduct {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        price: f64,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            price,
            reason: reason.into(),
            quantity: 0,
        }
    }

    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }

    pub fn line_total(&self) -> f64 {
        round_cents(self.price * f64::from(self.quantity))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuoteTotals {
    pub subtotal: f64,
    pub setup_fees: f64,
    pub shipping: f64,
    pub total: f64,
}

impl QuoteTotals {
    pub fn from_products(products: &[RecommendedProduct]) -> Self {
        let subtotal = round_cents(
            products
                .iter()
                .map(|product| product.price * f64::from(product.quantity))
                .sum(),
        );
        let shipping = round_cents(subtotal * SHIPPING_RATE);
        let total = round_cents(subtotal + SETUP_FEE + shipping);

        Self {
            subtotal,
            setup_fees: SETUP_FEE,
            shipping,
            total,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResult {
    pub quote_number: String,
    pub products: Vec<RecommendedProduct>,
    pub subtotal: f64,
    pub setup_fees: f64,
    pub shipping: f64,
    pub total: f64,
}

impl QuoteResult {
    /// Builds a result whose summary fields are derived from `products`.
    pub fn priced(quote_number: impl Into<String>, products: Vec<RecommendedProduct>) -> Self {
        let totals = QuoteTotals::from_products(&products);
        Self {
            quote_number: quote_number.into(),
            products,
            subtotal: totals.subtotal,
            setup_fees: totals.setup_fees,
            shipping: totals.shipping,
            total: totals.total,
        }
    }

    pub fn totals(&self) -> QuoteTotals {
        QuoteTotals {
            subtotal: self.subtotal,
            setup_fees: self.setup_fees,
            shipping: self.shipping,
            total: self.total,
        }
    }

    pub fn line_total(&self, index: usize) -> Option<f64> {
        self.products.get(index).map(RecommendedProduct::line_total)
    }

    pub fn item_count(&self) -> u32 {
        self.products
            .first()
            .map(|product| product.quantity)
            .unwrap_or_default()
    }

    /// Recomputes the summary and reports whether it matches within one cent.
    pub fn is_consistent(&self) -> bool {
        let expected = QuoteTotals::from_products(&self.products);
        within_cent(self.subtotal, expected.subtotal)
            && within_cent(self.setup_fees, expected.setup_fees)
            && within_cent(self.shipping, expected.shipping)
            && within_cent(self.total, expected.total)
    }
}

pub(crate) fn within_cent(left: f64, right: f64) -> bool {
    (left - right).abs() <= 0.01 + f64::EPSILON
}
