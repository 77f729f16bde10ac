//! Five-step quote modal lifecycle.

use pquote::{QuoteDraft, QuoteField, QuoteResult, ValidationErrors, format_currency};

use crate::{Assistant, WizardError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum WizardStep {
    #[default]
    Details = 1,
    Preferences = 2,
    Branding = 3,
    Contact = 4,
    Results = 5,
}

impl WizardStep {
    pub fn number(self) -> u8 {
        self as u8
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Details => "Project Details",
            Self::Preferences => "Preferences",
            Self::Branding => "Branding",
            Self::Contact => "Contact",
            Self::Results => "Your Quote",
        }
    }

    fn next(self) -> Self {
        match self {
            Self::Details => Self::Preferences,
            Self::Preferences => Self::Branding,
            Self::Branding => Self::Contact,
            Self::Contact | Self::Results => Self::Results,
        }
    }

    fn previous(self) -> Self {
        match self {
            Self::Details | Self::Preferences => Self::Details,
            Self::Branding => Self::Preferences,
            Self::Contact => Self::Branding,
            Self::Results => Self::Results,
        }
    }
}

/// Ready-to-send email for a finished quote. Nothing is sent from here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteEmail {
    pub recipient: String,
    pub subject: String,
    pub body: String,
}

/// Holds one modal session: the draft, per-field errors and at most one
/// generated quote.
#[derive(Debug, Clone, Default)]
pub struct QuoteWizard {
    step: WizardStep,
    draft: QuoteDraft,
    errors: ValidationErrors,
    submitted: bool,
    result: Option<QuoteResult>,
    failure: Option<String>,
}

impl QuoteWizard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn draft(&self) -> &QuoteDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut QuoteDraft {
        &mut self.draft
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    pub fn result(&self) -> Option<&QuoteResult> {
        self.result.as_ref()
    }

    /// User-safe message shown when generation failed.
    pub fn failure(&self) -> Option<&str> {
        self.failure.as_deref()
    }

    /// Advances one step. Leaving the details step requires a valid draft;
    /// the contact step only moves on through [`QuoteWizard::submit`].
    pub fn next_step(&mut self) -> Result<WizardStep, WizardError> {
        match self.step {
            WizardStep::Details => {
                if let Err(errors) = self.draft.validate_details() {
                    self.errors = errors.clone();
                    return Err(WizardError::validation(errors));
                }
            }
            WizardStep::Contact => {
                return Err(WizardError::not_ready(
                    "submit the contact step to generate a quote",
                ));
            }
            WizardStep::Preferences | WizardStep::Branding | WizardStep::Results => {}
        }

        self.errors = ValidationErrors::new();
        self.step = self.step.next();
        Ok(self.step)
    }

    pub fn previous_step(&mut self) -> WizardStep {
        self.errors = ValidationErrors::new();
        self.step = self.step.previous();
        self.step
    }

    /// Validates contact details and generates the quote. Allowed once per
    /// modal session, successful or not.
    pub async fn submit(&mut self, assistant: &Assistant) -> Result<&QuoteResult, WizardError> {
        if self.submitted {
            return Err(WizardError::already_submitted());
        }
        if self.step != WizardStep::Contact {
            return Err(WizardError::not_ready(format!(
                "quotes are submitted from the contact step, not step {}",
                self.step.number()
            )));
        }

        if let Err(errors) = self.draft.validate_contact() {
            self.errors = errors.clone();
            return Err(WizardError::validation(errors));
        }
        let request = match self.draft.build_request() {
            Ok(request) => request,
            Err(errors) => {
                self.errors = errors.clone();
                self.step = WizardStep::Details;
                return Err(WizardError::validation(errors));
            }
        };

        self.errors = ValidationErrors::new();
        self.submitted = true;
        self.step = WizardStep::Results;

        match assistant.generate_quote(&request).await {
            Ok(result) => Ok(&*self.result.insert(result)),
            Err(error) => {
                let error = WizardError::from(error);
                self.failure = Some(error.message.clone());
                Err(error)
            }
        }
    }

    pub fn email_quote(&self) -> Result<QuoteEmail, WizardError> {
        let result = self
            .result
            .as_ref()
            .ok_or_else(|| WizardError::not_ready("there is no quote to email yet"))?;

        let recipient = self.draft.contact.email.trim();
        if recipient.is_empty() {
            return Err(WizardError::validation(ValidationErrors::single(
                QuoteField::Email,
                "Email is required.",
            )));
        }

        Ok(QuoteEmail {
            recipient: recipient.to_string(),
            subject: format!("Your PumaPromos quote {}", result.quote_number),
            body: render_email_body(&self.draft, result),
        })
    }

    /// Discards the draft, errors and any result.
    pub fn close(&mut self) {
        *self = Self::default();
    }
}

fn render_email_body(draft: &QuoteDraft, result: &QuoteResult) -> String {
    let greeting = match draft.contact.contact_name.trim() {
        "" => "Hello,".to_string(),
        name => format!("Hi {name},"),
    };

    let mut lines = vec![
        greeting,
        String::new(),
        format!(
            "Here is your personalized quote {} for {} items.",
            result.quote_number,
            result.item_count()
        ),
        String::new(),
    ];

    for (index, product) in result.products.iter().enumerate() {
        lines.push(format!(
            "{}. {} - {} x {} = {}",
            index + 1,
            product.name,
            product.quantity,
            format_currency(product.price),
            format_currency(result.line_total(index).unwrap_or_default())
        ));
        lines.push(format!("   {}", product.reason));
    }

    lines.extend([
        String::new(),
        format!("Subtotal: {}", format_currency(result.subtotal)),
        format!("Setup fees: {}", format_currency(result.setup_fees)),
        format!("Shipping: {}", format_currency(result.shipping)),
        format!("Total: {}", format_currency(result.total)),
        String::new(),
        "Reply to this email or chat with us to finalize your order.".to_string(),
        "The PumaPromos team".to_string(),
    ]);

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use pquote::{RecommendedProduct, Timeline};

    use super::*;

    fn filled_details(wizard: &mut QuoteWizard) {
        let draft = wizard.draft_mut();
        draft.use_case = "Trade Show/Event".to_string();
        draft.recipient_count = "50".to_string();
    }

    #[test]
    fn details_step_blocks_until_required_fields_are_valid() {
        let mut wizard = QuoteWizard::new();
        wizard.draft_mut().recipient_count = "0".to_string();

        let error = wizard.next_step().expect_err("details are incomplete");

        assert_eq!(error.kind, crate::WizardErrorKind::Validation);
        assert_eq!(wizard.step(), WizardStep::Details);
        assert_eq!(
            wizard.errors().get(QuoteField::UseCase),
            Some("This field is required.")
        );
        assert_eq!(
            wizard.errors().get(QuoteField::RecipientCount),
            Some("Must be greater than zero.")
        );

        filled_details(&mut wizard);
        assert_eq!(wizard.next_step().expect("details valid"), WizardStep::Preferences);
        assert!(wizard.errors().is_empty());
    }

    #[test]
    fn steps_walk_forward_and_back_within_bounds() {
        let mut wizard = QuoteWizard::new();
        filled_details(&mut wizard);

        assert_eq!(wizard.previous_step(), WizardStep::Details);
        wizard.next_step().expect("details valid");
        wizard.next_step().expect("preferences are optional");
        assert_eq!(wizard.next_step().expect("branding optional"), WizardStep::Contact);
        assert_eq!(
            wizard.next_step().expect_err("contact submits").kind,
            crate::WizardErrorKind::NotReady
        );
        assert_eq!(wizard.previous_step(), WizardStep::Branding);
    }

    #[test]
    fn close_resets_to_a_fresh_draft() {
        let mut wizard = QuoteWizard::new();
        filled_details(&mut wizard);
        wizard.draft_mut().timeline = Some(Timeline::Rush);
        wizard.next_step().expect("details valid");

        wizard.close();

        assert_eq!(wizard.step(), WizardStep::Details);
        assert_eq!(wizard.draft().timeline, Some(Timeline::Standard));
        assert!(wizard.draft().use_case.is_empty());
        assert!(wizard.result().is_none());
        assert!(!wizard.is_submitted());
    }

    #[test]
    fn email_body_lists_lines_and_totals() {
        let mut wizard = QuoteWizard::new();
        wizard.draft_mut().contact.contact_name = "Dana".to_string();
        wizard.draft_mut().contact.email = " dana@example.com ".to_string();
        wizard.result = Some(QuoteResult::priced(
            "Q12345678",
            vec![
                RecommendedProduct::new("Mug", "Ceramic mug", 6.5, "Everyday use").with_quantity(10),
                RecommendedProduct::new("Cap", "Cotton cap", 9.25, "Outdoor events")
                    .with_quantity(10),
                RecommendedProduct::new("Pen", "Metal pen", 1.0, "Cheap").with_quantity(10),
            ],
        ));

        let email = wizard.email_quote().expect("email should render");

        assert_eq!(email.recipient, "dana@example.com");
        assert_eq!(email.subject, "Your PumaPromos quote Q12345678");
        assert!(email.body.starts_with("Hi Dana,"));
        assert!(email.body.contains("1. Mug - 10 x $6.50 = $65.00"));
        assert!(email.body.contains("Subtotal: $167.50"));
        assert!(email.body.contains("Setup fees: $150.00"));
        assert!(email.body.contains("Shipping: $13.40"));
        assert!(email.body.contains("Total: $330.90"));
    }

    #[test]
    fn email_requires_a_result_and_an_address() {
        let mut wizard = QuoteWizard::new();
        assert_eq!(
            wizard.email_quote().expect_err("no result").kind,
            crate::WizardErrorKind::NotReady
        );

        wizard.result = Some(pquote::mock_quote(&pquote::QuoteRequest::new("Gifts", 5)));
        let error = wizard.email_quote().expect_err("no address");
        assert_eq!(error.kind, crate::WizardErrorKind::Validation);
        assert_eq!(
            error.validation.as_ref().and_then(|errors| errors.get(QuoteField::Email)),
            Some("Email is required.")
        );
    }
}
