//! Mutable wizard draft and per-field validation.
//!
//! The draft holds raw form input across the wizard steps. Only a draft
//! that passes step validation can be turned into a [`QuoteRequest`].
//!
//! ```rust
//! use pquote::{QuoteDraft, QuoteField};
//!
//! let mut draft = QuoteDraft::default();
//! let errors = draft.validate_details().expect_err("empty draft is invalid");
//! assert_eq!(errors.get(QuoteField::UseCase), Some("This field is required."));
//!
//! draft.use_case = "Client Gifts".to_string();
//! draft.recipient_count = "40".to_string();
//! let request = draft.build_request().expect("draft should be valid");
//! assert_eq!(request.recipient_count, 40);
//! ```

use std::fmt::{Display, Formatter};

use crate::{QuoteRequest, Timeline};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuoteField {
    UseCase,
    RecipientCount,
    Timeline,
    CompanyName,
    ContactName,
    Email,
}

impl QuoteField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::UseCase => "useCase",
            Self::RecipientCount => "recipientCount",
            Self::Timeline => "timeline",
            Self::CompanyName => "companyName",
            Self::ContactName => "contactName",
            Self::Email => "email",
        }
    }
}

impl Display for QuoteField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field messages in the order they were found.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationErrors {
    entries: Vec<(QuoteField, String)>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: QuoteField, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.insert(field, message);
        errors
    }

    /// Records a message, replacing any earlier one for the same field.
    pub fn insert(&mut self, field: QuoteField, message: impl Into<String>) {
        let message = message.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == field) {
            Some((_, slot)) => *slot = message,
            None => self.entries.push((field, message)),
        }
    }

    pub fn get(&self, field: QuoteField) -> Option<&str> {
        self.entries
            .iter()
            .find(|(existing, _)| *existing == field)
            .map(|(_, message)| message.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (QuoteField, &str)> {
        self.entries
            .iter()
            .map(|(field, message)| (*field, message.as_str()))
    }

    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl Display for ValidationErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (index, (field, message)) in self.entries.iter().enumerate() {
            if index > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BrandingPreferences {
    pub brand_colors: String,
    pub logo_placements: Vec<String>,
    pub logo_file_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ContactDetails {
    pub company_name: String,
    pub contact_name: String,
    pub email: String,
    pub phone: String,
    pub referral_source: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteDraft {
    pub use_case: String,
    pub recipient_count: String,
    pub event_date: String,
    pub timeline: Option<Timeline>,
    pub budget_per_item: String,
    pub custom_budget: String,
    pub product_categories: Vec<String>,
    pub special_requirements: String,
    pub branding: BrandingPreferences,
    pub contact: ContactDetails,
}

impl Default for QuoteDraft {
    fn default() -> Self {
        Self {
            use_case: String::new(),
            recipient_count: String::new(),
            event_date: String::new(),
            timeline: Some(Timeline::Standard),
            budget_per_item: String::new(),
            custom_budget: String::new(),
            product_categories: Vec::new(),
            special_requirements: String::new(),
            branding: BrandingPreferences::default(),
            contact: ContactDetails::default(),
        }
    }
}

impl QuoteDraft {
    /// Returns whether the category is selected after the toggle.
    pub fn toggle_category(&mut self, category: &str) -> bool {
        toggle(&mut self.product_categories, category)
    }

    pub fn toggle_placement(&mut self, placement: &str) -> bool {
        toggle(&mut self.branding.logo_placements, placement)
    }

    pub fn validate_details(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if self.use_case.trim().is_empty() {
            errors.insert(QuoteField::UseCase, "This field is required.");
        }
        if let Err(message) = parse_recipient_count(&self.recipient_count) {
            errors.insert(QuoteField::RecipientCount, message);
        }
        if self.timeline.is_none() {
            errors.insert(QuoteField::Timeline, "Please select a timeline.");
        }
        errors.into_result()
    }

    pub fn validate_contact(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if self.contact.company_name.trim().is_empty() {
            errors.insert(QuoteField::CompanyName, "Company name is required.");
        }
        if self.contact.contact_name.trim().is_empty() {
            errors.insert(QuoteField::ContactName, "Your name is required.");
        }
        if self.contact.email.trim().is_empty() {
            errors.insert(QuoteField::Email, "Email is required.");
        } else if !is_valid_email(&self.contact.email) {
            errors.insert(QuoteField::Email, "Email is invalid.");
        }
        errors.into_result()
    }

    pub fn build_request(&self) -> Result<QuoteRequest, ValidationErrors> {
        self.validate_details()?;
        let recipient_count = parse_recipient_count(&self.recipient_count)
            .map_err(|message| ValidationErrors::single(QuoteField::RecipientCount, message))?;

        Ok(QuoteRequest {
            use_case: self.use_case.trim().to_string(),
            recipient_count,
            event_date: non_blank(&self.event_date),
            timeline: self.timeline.unwrap_or_default(),
            budget_per_item: self.budget_per_item.clone(),
            custom_budget: non_blank(&self.custom_budget),
            product_categories: self.product_categories.clone(),
            special_requirements: non_blank(&self.special_requirements),
        })
    }
}

fn toggle(values: &mut Vec<String>, value: &str) -> bool {
    match values.iter().position(|existing| existing == value) {
        Some(index) => {
            values.remove(index);
            false
        }
        None => {
            values.push(value.to_string());
            true
        }
    }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn parse_recipient_count(raw: &str) -> Result<u32, &'static str> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err("This field is required.");
    }
    match raw.parse::<i64>() {
        Ok(count) if count <= 0 => Err("Must be greater than zero."),
        Ok(count) => u32::try_from(count).map_err(|_| "Please enter a smaller quantity."),
        Err(_) => Err("Please enter a whole number."),
    }
}

/// Loose `something@domain.tld` shape check, whitespace not allowed inside.
pub fn is_valid_email(value: &str) -> bool {
    value.split_whitespace().any(|token| {
        let Some(at) = token.char_indices().skip(1).find(|(_, c)| *c == '@').map(|(i, _)| i) else {
            return false;
        };
        let domain = &token[at + 1..];
        domain
            .char_indices()
            .any(|(index, c)| c == '.' && index >= 1 && index + 1 < domain.len())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_draft() -> QuoteDraft {
        let mut draft = QuoteDraft {
            use_case: "Trade Show/Event".to_string(),
            recipient_count: "50".to_string(),
            budget_per_item: "$5-$10".to_string(),
            ..QuoteDraft::default()
        };
        draft.contact.company_name = "Acme".to_string();
        draft.contact.contact_name = "Sam".to_string();
        draft.contact.email = "sam@acme.com".to_string();
        draft
    }

    #[test]
    fn recipient_count_messages_follow_input_shape() {
        let mut draft = filled_draft();
        for (input, expected) in [
            ("", "This field is required."),
            ("0", "Must be greater than zero."),
            ("-4", "Must be greater than zero."),
            ("many", "Please enter a whole number."),
        ] {
            draft.recipient_count = input.to_string();
            let errors = draft.validate_details().expect_err("count should be rejected");
            assert_eq!(errors.get(QuoteField::RecipientCount), Some(expected), "input {input:?}");
        }
    }

    #[test]
    fn missing_timeline_is_reported() {
        let mut draft = filled_draft();
        draft.timeline = None;

        let errors = draft.validate_details().expect_err("timeline is required");
        assert_eq!(errors.get(QuoteField::Timeline), Some("Please select a timeline."));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn contact_validation_checks_required_fields_and_email_shape() {
        let mut draft = QuoteDraft::default();
        let errors = draft.validate_contact().expect_err("contact is empty");
        assert_eq!(errors.len(), 3);
        assert_eq!(errors.get(QuoteField::Email), Some("Email is required."));

        draft.contact = filled_draft().contact;
        draft.contact.email = "sam@acme".to_string();
        let errors = draft.validate_contact().expect_err("email lacks a domain dot");
        assert_eq!(errors.get(QuoteField::Email), Some("Email is invalid."));

        draft.contact.email = "sam@acme.com".to_string();
        assert!(draft.validate_contact().is_ok());
    }

    #[test]
    fn email_shape_check() {
        assert!(is_valid_email("a@b.c"));
        assert!(is_valid_email(" first.last@mail.example.org "));
        assert!(!is_valid_email("@b.c"));
        assert!(!is_valid_email("a@.c"));
        assert!(!is_valid_email("a@b."));
        assert!(!is_valid_email("a @b.c"));
    }

    #[test]
    fn toggles_behave_as_sets() {
        let mut draft = QuoteDraft::default();
        assert!(draft.toggle_category("Apparel"));
        assert!(draft.toggle_category("Drinkware"));
        assert!(!draft.toggle_category("Apparel"));
        assert_eq!(draft.product_categories, vec!["Drinkware"]);

        assert!(draft.toggle_placement("Left Chest"));
        assert_eq!(draft.branding.logo_placements, vec!["Left Chest"]);
    }

    #[test]
    fn build_request_trims_and_drops_blank_optionals() {
        let mut draft = filled_draft();
        draft.custom_budget = "  ".to_string();
        draft.special_requirements = " rush art ".to_string();

        let request = draft.build_request().expect("draft should be valid");

        assert_eq!(request.recipient_count, 50);
        assert_eq!(request.timeline, Timeline::Standard);
        assert_eq!(request.custom_budget, None);
        assert_eq!(request.special_requirements.as_deref(), Some("rush art"));
        assert_eq!(request.effective_budget(), "$5-$10");
    }
}
