//! Quote request model submitted by the wizard.
//!
//! ```rust
//! use pquote::{QuoteRequest, Timeline};
//!
//! let request = QuoteRequest::new("Trade Show/Event", 50)
//!     .with_timeline(Timeline::Rush)
//!     .with_budget("$5-$10")
//!     .with_category("Drinkware (Tumblers, Bottles, Mugs)");
//!
//! assert!(request.validate().is_ok());
//! assert_eq!(request.effective_budget(), "$5-$10");
//! ```

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{QuoteField, ValidationErrors};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Timeline {
    Rush,
    #[default]
    Standard,
    Flexible,
}

impl Timeline {
    pub const ALL: [Timeline; 3] = [Timeline::Rush, Timeline::Standard, Timeline::Flexible];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Rush => "rush",
            Self::Standard => "standard",
            Self::Flexible => "flexible",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Rush => "Rush (7-10 days)",
            Self::Standard => "Standard (2-3 weeks)",
            Self::Flexible => "Flexible (30+ days)",
        }
    }
}

impl Display for Timeline {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Timeline {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "rush" => Ok(Self::Rush),
            "standard" => Ok(Self::Standard),
            "flexible" => Ok(Self::Flexible),
            other => Err(format!("unknown timeline '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    pub use_case: String,
    pub recipient_count: u32,
    pub event_date: Option<String>,
    pub timeline: Timeline,
    pub budget_per_item: String,
    pub custom_budget: Option<String>,
    pub product_categories: Vec<String>,
    pub special_requirements: Option<String>,
}

impl QuoteRequest {
    pub fn new(use_case: impl Into<String>, recipient_count: u32) -> Self {
        Self {
            use_case: use_case.into(),
            recipient_count,
            event_date: None,
            timeline: Timeline::default(),
            budget_per_item: String::new(),
            custom_budget: None,
            product_categories: Vec::new(),
            special_requirements: None,
        }
    }

    pub fn with_timeline(mut self, timeline: Timeline) -> Self {
        self.timeline = timeline;
        self
    }

    pub fn with_event_date(mut self, event_date: impl Into<String>) -> Self {
        self.event_date = Some(event_date.into());
        self
    }

    pub fn with_budget(mut self, budget_per_item: impl Into<String>) -> Self {
        self.budget_per_item = budget_per_item.into();
        self
    }

    pub fn with_custom_budget(mut self, custom_budget: impl Into<String>) -> Self {
        self.custom_budget = Some(custom_budget.into());
        self
    }

    /// Adds a category unless it is already present.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        let category = category.into();
        if !self.product_categories.contains(&category) {
            self.product_categories.push(category);
        }
        self
    }

    pub fn with_special_requirements(mut self, requirements: impl Into<String>) -> Self {
        self.special_requirements = Some(requirements.into());
        self
    }

    /// A non-blank custom budget takes precedence over the preset choice.
    pub fn effective_budget(&self) -> &str {
        match self.custom_budget.as_deref() {
            Some(custom) if !custom.trim().is_empty() => custom,
            _ => self.budget_per_item.as_str(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if self.use_case.trim().is_empty() {
            errors.insert(QuoteField::UseCase, "This field is required.");
        }

        if self.recipient_count == 0 {
            errors.insert(QuoteField::RecipientCount, "Must be greater than zero.");
        }

        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeline_parses_case_insensitively_and_defaults_to_standard() {
        assert_eq!("RUSH".parse::<Timeline>(), Ok(Timeline::Rush));
        assert_eq!(" flexible ".parse::<Timeline>(), Ok(Timeline::Flexible));
        assert!("someday".parse::<Timeline>().is_err());
        assert_eq!(Timeline::default(), Timeline::Standard);
        assert_eq!(Timeline::Standard.to_string(), "standard");
    }

    #[test]
    fn custom_budget_overrides_preset_only_when_not_blank() {
        let preset = QuoteRequest::new("Client Gifts", 10).with_budget("$10-$20");
        assert_eq!(preset.effective_budget(), "$10-$20");

        let blank = preset.clone().with_custom_budget("   ");
        assert_eq!(blank.effective_budget(), "$10-$20");

        let custom = preset.with_custom_budget("$12 each");
        assert_eq!(custom.effective_budget(), "$12 each");
    }

    #[test]
    fn categories_behave_like_a_set() {
        let request = QuoteRequest::new("Client Gifts", 10)
            .with_category("Apparel")
            .with_category("Drinkware")
            .with_category("Apparel");

        assert_eq!(request.product_categories, vec!["Apparel", "Drinkware"]);
    }

    #[test]
    fn validate_rejects_zero_items_and_blank_use_case() {
        let errors = QuoteRequest::new("  ", 0)
            .validate()
            .expect_err("request should be invalid");

        assert_eq!(errors.len(), 2);
        assert_eq!(
            errors.get(QuoteField::RecipientCount),
            Some("Must be greater than zero.")
        );
        assert!(errors.get(QuoteField::UseCase).is_some());
    }

    #[test]
    fn request_serializes_with_camel_case_fields() {
        let request = QuoteRequest::new("Trade Show/Event", 50).with_timeline(Timeline::Rush);
        let value = serde_json::to_value(&request).expect("request should serialize");

        assert_eq!(value["useCase"], "Trade Show/Event");
        assert_eq!(value["recipientCount"], 50);
        assert_eq!(value["timeline"], "rush");
    }
}
