//! Prompt text shared by every vendor adapter.

use crate::{EXAMPLE_PRODUCTS, QuoteRequest};

pub const JSON_ONLY_SYSTEM_PROMPT: &str =
    "You are a helpful assistant that responds only with valid JSON.";

pub const CHAT_SYSTEM_PROMPT: &str = "You are an AI assistant for PumaPromos, a Houston-based promotional products company. You must adhere to a professional, monochrome aesthetic in your persona.

Your role:
1. Help customers find perfect promotional products.
2. Answer pricing and customization questions.
3. Provide product recommendations.
4. Be friendly, professional, and consultative.

Key facts:
- We're based in Houston, Texas
- We sell branded promotional items for businesses
- Typical minimums: 25-100 units
- Standard turnaround: 10-14 business days

Guidelines:
- Keep responses concise and clear.
- Suggest specific products with prices.
- Always mention minimum quantities when relevant.
- If unsure, offer to connect with our human team.";

/// Renders the structured-quote prompt for one request.
///
/// ```rust
/// use pquote::{QuoteRequest, quote_prompt};
///
/// let prompt = quote_prompt(&QuoteRequest::new("Client Gifts", 25));
/// assert!(prompt.contains("- Number of Items: 25"));
/// assert!(prompt.contains("- Special Requirements: None"));
/// ```
pub fn quote_prompt(request: &QuoteRequest) -> String {
    let examples = EXAMPLE_PRODUCTS
        .iter()
        .map(|product| format!("- {} (~${:.2})", product.name, product.price))
        .collect::<Vec<_>>()
        .join("\n");
    let requirements = request
        .special_requirements
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or("None");

    format!(
        "You are an AI sales assistant for PumaPromos, a Houston-based promotional products company.
A client has submitted a quote request with the following details:
- Use Case: {use_case}
- Number of Items: {count}
- Desired Timeline: {timeline}
- Budget Per Item: {budget}
- Product Categories of Interest: {categories}
- Special Requirements: {requirements}

Here are some example products we offer with their typical price:
{examples}

Based on the client's details, your task is to:
1.  Recommend exactly 3 promotional products that are a great fit. For each product, provide:
    - A short, catchy 'name'.
    - A 'description' (string, max 25 words) for the product.
    - A realistic 'price' per item (number only), keeping our examples in mind.
    - A compelling 'reason' (string, max 15 words) why it's a good fit for their needs.
2.  Calculate a quote summary based on your recommended product prices and the client's item count:
    - Calculate 'subtotal'.
    - Add a fixed 'setupFees' of 150.
    - Estimate 'shipping' as 8% of the subtotal.
    - Calculate the final 'total'.
3.  Generate a unique 'quoteNumber' starting with 'Q' followed by 8 random digits.

Respond ONLY with a valid JSON object matching this schema:
{{
  \"quoteNumber\": \"string\",
  \"products\": [{{ \"name\": \"string\", \"description\": \"string\", \"price\": number, \"reason\": \"string\" }}],
  \"subtotal\": number,
  \"setupFees\": number,
  \"shipping\": number,
  \"total\": number
}}
Do not include any other text or markdown formatting.
",
        use_case = request.use_case,
        count = request.recipient_count,
        timeline = request.timeline,
        budget = request.effective_budget(),
        categories = request.product_categories.join(", "),
    )
}
