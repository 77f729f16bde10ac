//! Vendor quote payload decoding and local normalization.
//!
//! Vendors return the quote as JSON text. Decoding is strict about the
//! required fields; normalization then stamps quantities, recomputes every
//! total and repairs the quote number.

use std::fmt::{Display, Formatter};

use serde::Deserialize;

use crate::number::{generate_quote_number, is_valid_quote_number};
use crate::pricing::{PRODUCTS_PER_QUOTE, QuoteResult, QuoteTotals, within_cent};
use crate::RecommendedProduct;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawQuote {
    pub quote_number: String,
    pub products: Vec<RawProduct>,
    pub subtotal: f64,
    pub setup_fees: f64,
    pub shipping: f64,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawProduct {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteParseError {
    pub message: String,
}

impl QuoteParseError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Display for QuoteParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "malformed quote payload: {}", self.message)
    }
}

impl std::error::Error for QuoteParseError {}

/// A local adjustment applied to vendor output.
#[derive(Debug, Clone, PartialEq)]
pub enum QuoteCorrection {
    Totals { reported: f64, recomputed: f64 },
    QuoteNumber { reported: String, replacement: String },
    ExtraProducts { discarded: usize },
}

impl Display for QuoteCorrection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Totals {
                reported,
                recomputed,
            } => write!(f, "total {reported:.2} recomputed as {recomputed:.2}"),
            Self::QuoteNumber {
                reported,
                replacement,
            } => write!(f, "quote number '{reported}' replaced by {replacement}"),
            Self::ExtraProducts { discarded } => write!(f, "{discarded} extra products discarded"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssembledQuote {
    pub result: QuoteResult,
    pub corrections: Vec<QuoteCorrection>,
}

/// Strips a surrounding Markdown code fence, if any.
///
/// ```rust
/// use pquote::strip_code_fence;
///
/// assert_eq!(strip_code_fence("```json\n{\"a\":1}\n```"), "{\"a\":1}");
/// assert_eq!(strip_code_fence("  {\"a\":1} "), "{\"a\":1}");
/// assert_eq!(strip_code_fence("```json{\"a\":1}```"), "{\"a\":1}");
/// ```
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(body) = rest.strip_suffix("```") else {
        return trimmed;
    };

    match body.find('\n') {
        Some(newline) => body[newline + 1..].trim(),
        None => {
            let body = body.trim();
            match body.get(..4) {
                Some(tag) if tag.eq_ignore_ascii_case("json") => body[4..].trim(),
                _ => body,
            }
        }
    }
}

pub fn parse_vendor_quote(text: &str) -> Result<RawQuote, QuoteParseError> {
    let body = strip_code_fence(text);
    if body.is_empty() {
        return Err(QuoteParseError::new("empty response body"));
    }

    serde_json::from_str::<RawQuote>(body).map_err(|error| QuoteParseError::new(error.to_string()))
}

/// Turns a decoded vendor quote into a trusted result for `quantity` items.
pub fn assemble_quote(raw: RawQuote, quantity: u32) -> Result<AssembledQuote, QuoteParseError> {
    if raw.products.len() < PRODUCTS_PER_QUOTE {
        return Err(QuoteParseError::new(format!(
            "expected {PRODUCTS_PER_QUOTE} products, got {}",
            raw.products.len()
        )));
    }

    let mut corrections = Vec::new();
    let extra = raw.products.len() - PRODUCTS_PER_QUOTE;
    if extra > 0 {
        corrections.push(QuoteCorrection::ExtraProducts { discarded: extra });
    }

    let mut products = Vec::with_capacity(PRODUCTS_PER_QUOTE);
    for product in raw.products.into_iter().take(PRODUCTS_PER_QUOTE) {
        if !product.price.is_finite() || product.price < 0.0 {
            return Err(QuoteParseError::new(format!(
                "invalid price {} for '{}'",
                product.price, product.name
            )));
        }
        products.push(
            RecommendedProduct::new(product.name, product.description, product.price, product.reason)
                .with_quantity(quantity),
        );
    }

    let quote_number = if is_valid_quote_number(raw.quote_number.trim()) {
        raw.quote_number.trim().to_string()
    } else {
        let replacement = generate_quote_number();
        corrections.push(QuoteCorrection::QuoteNumber {
            reported: raw.quote_number,
            replacement: replacement.clone(),
        });
        replacement
    };

    let recomputed = QuoteTotals::from_products(&products);
    let reported = QuoteTotals {
        subtotal: raw.subtotal,
        setup_fees: raw.setup_fees,
        shipping: raw.shipping,
        total: raw.total,
    };
    if !totals_match(&reported, &recomputed) {
        corrections.push(QuoteCorrection::Totals {
            reported: raw.total,
            recomputed: recomputed.total,
        });
    }

    Ok(AssembledQuote {
        result: QuoteResult::priced(quote_number, products),
        corrections,
    })
}

fn totals_match(left: &QuoteTotals, right: &QuoteTotals) -> bool {
    within_cent(left.subtotal, right.subtotal)
        && within_cent(left.setup_fees, right.setup_fees)
        && within_cent(left.shipping, right.shipping)
        && within_cent(left.total, right.total)
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"{
        "quoteNumber": "Q87654321",
        "products": [
            {"name": "Tumbler", "description": "Steel", "price": 8.99, "reason": "Daily use"},
            {"name": "Mug", "description": "Ceramic", "price": 6.5, "reason": "Cheap"},
            {"name": "Cap", "description": "Adjustable", "price": 9.25, "reason": "Wearable"}
        ],
        "subtotal": 24.74,
        "setupFees": 150,
        "shipping": 1.98,
        "total": 176.72
    }"#;

    #[test]
    fn parses_fenced_payloads() {
        let fenced = format!("```json\n{VALID}\n```");
        let raw = parse_vendor_quote(&fenced).expect("fenced payload should parse");

        assert_eq!(raw.quote_number, "Q87654321");
        assert_eq!(raw.products.len(), 3);
    }

    #[test]
    fn parses_single_line_fences_with_a_language_tag() {
        let compact = VALID.replace('\n', "");
        for fenced in [format!("```json{compact}```"), format!("```JSON {compact} ```")] {
            let raw = parse_vendor_quote(&fenced).expect("single-line fence should parse");
            assert_eq!(raw.quote_number, "Q87654321");
        }

        assert_eq!(strip_code_fence("```{\"a\":1}```"), "{\"a\":1}");
    }

    #[test]
    fn missing_required_fields_are_rejected() {
        let error = parse_vendor_quote(r#"{"quoteNumber": "Q87654321", "products": []}"#)
            .expect_err("incomplete payload should fail");
        assert!(error.message.contains("subtotal"));

        assert!(parse_vendor_quote("not json at all").is_err());
        assert!(parse_vendor_quote("   ").is_err());
    }

    #[test]
    fn assembly_stamps_quantity_and_recomputes_totals() {
        let raw = parse_vendor_quote(VALID).expect("payload should parse");
        let assembled = assemble_quote(raw, 50).expect("payload should assemble");

        assert!(assembled.result.products.iter().all(|p| p.quantity == 50));
        assert_eq!(assembled.result.subtotal, 1237.0);
        assert_eq!(assembled.result.total, 1485.96);
        assert_eq!(assembled.result.quote_number, "Q87654321");
        assert!(matches!(
            assembled.corrections.as_slice(),
            [QuoteCorrection::Totals { reported, recomputed }]
                if *reported == 176.72 && *recomputed == 1485.96
        ));
    }

    #[test]
    fn assembly_without_discrepancies_reports_nothing() {
        let raw = parse_vendor_quote(VALID).expect("payload should parse");
        let assembled = assemble_quote(raw, 1).expect("payload should assemble");

        assert!(assembled.corrections.is_empty());
        assert!(assembled.result.is_consistent());
    }

    #[test]
    fn assembly_keeps_first_three_products_and_repairs_quote_number() {
        let mut raw = parse_vendor_quote(VALID).expect("payload should parse");
        raw.products.push(raw.products[0].clone());
        raw.quote_number = "QUOTE-1".to_string();

        let assembled = assemble_quote(raw, 1).expect("payload should assemble");

        assert_eq!(assembled.result.products.len(), 3);
        assert!(is_valid_quote_number(&assembled.result.quote_number));
        assert!(assembled
            .corrections
            .contains(&QuoteCorrection::ExtraProducts { discarded: 1 }));
        assert!(assembled
            .corrections
            .iter()
            .any(|c| matches!(c, QuoteCorrection::QuoteNumber { reported, .. } if reported == "QUOTE-1")));
    }

    #[test]
    fn assembly_rejects_short_lists_and_negative_prices() {
        let mut short = parse_vendor_quote(VALID).expect("payload should parse");
        short.products.pop();
        assert!(assemble_quote(short, 1).is_err());

        let mut negative = parse_vendor_quote(VALID).expect("payload should parse");
        negative.products[1].price = -1.0;
        let error = assemble_quote(negative, 1).expect_err("negative price should fail");
        assert!(error.message.contains("Mug"));
    }
}
