//! Example products embedded in quote prompts and used by the mock quote.

use crate::RecommendedProduct;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CatalogProduct {
    pub name: &'static str,
    pub description: &'static str,
    pub price: f64,
    pub reason: &'static str,
}

impl CatalogProduct {
    pub fn recommend(&self, quantity: u32) -> RecommendedProduct {
        RecommendedProduct::new(self.name, self.description, self.price, self.reason)
            .with_quantity(quantity)
    }
}

pub const EXAMPLE_PRODUCTS: [CatalogProduct; 3] = [
    CatalogProduct {
        name: "20oz Stainless Steel Tumbler",
        description: "This insulated tumbler keeps your drinks at perfect temperature throughout the workday.",
        price: 8.99,
        reason: "Perfect for daily use, high perceived value, keeps drinks hot/cold",
    },
    CatalogProduct {
        name: "Daily Perk Coffee Mug",
        description: "A classic ceramic mug that is essential for every employee's morning coffee routine.",
        price: 6.50,
        reason: "Budget-friendly, everyone uses mugs, wide imprint area",
    },
    CatalogProduct {
        name: "Pro-Fit Adjustable Cap",
        description: "Our premium adjustable cap offers a professional and stylish addition to your company swag.",
        price: 9.25,
        reason: "Wearable branding, comfortable fit, works for all head sizes",
    },
];
