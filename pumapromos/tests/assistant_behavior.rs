use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures_util::{StreamExt, stream};
use pumapromos::pprovider::{
    ByteStream, HttpRequest, HttpTransport, ProviderError, ProviderFuture, ProviderSelector,
    SecureCredentialManager, VendorAuth,
};
use pumapromos::prelude::*;
use pumapromos::{CHAT_APOLOGY, QUOTE_FAILURE_MESSAGE, TurnPhase};

const VENDOR_QUOTE: &str = r#"{"choices":[{"message":{"content":"{\"quoteNumber\":\"Q11112222\",\"products\":[{\"name\":\"Tote\",\"description\":\"Canvas tote\",\"price\":4.5,\"reason\":\"Reusable\"},{\"name\":\"Pen\",\"description\":\"Metal pen\",\"price\":1.25,\"reason\":\"Handy\"},{\"name\":\"Notebook\",\"description\":\"A5 notebook\",\"price\":3.0,\"reason\":\"Conference notes\"}],\"subtotal\":1,\"setupFees\":150,\"shipping\":1,\"total\":1}"}}]}"#;

#[derive(Debug)]
enum Canned {
    Body(&'static str),
    Chunks(Vec<&'static str>),
    Fail(ProviderError),
}

#[derive(Debug)]
struct CannedTransport {
    replies: Mutex<Vec<Canned>>,
    calls: AtomicUsize,
}

impl CannedTransport {
    fn new(replies: Vec<Canned>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies),
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn next(&self) -> Canned {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut replies = self.replies.lock().expect("replies lock");
        if replies.is_empty() {
            Canned::Fail(ProviderError::unavailable("no canned reply left"))
        } else {
            replies.remove(0)
        }
    }
}

impl HttpTransport for CannedTransport {
    fn post_json<'a>(
        &'a self,
        _request: HttpRequest,
        _auth: VendorAuth,
    ) -> ProviderFuture<'a, Result<String, ProviderError>> {
        Box::pin(async move {
            match self.next() {
                Canned::Body(body) => Ok(body.to_string()),
                Canned::Fail(error) => Err(error),
                Canned::Chunks(_) => Err(ProviderError::other("expected a JSON call")),
            }
        })
    }

    fn post_stream<'a>(
        &'a self,
        _request: HttpRequest,
        _auth: VendorAuth,
    ) -> ProviderFuture<'a, Result<ByteStream<'a>, ProviderError>> {
        Box::pin(async move {
            match self.next() {
                Canned::Chunks(chunks) => {
                    let chunks = chunks
                        .into_iter()
                        .map(|chunk| Ok(chunk.as_bytes().to_vec()))
                        .collect::<Vec<_>>();
                    Ok(Box::pin(stream::iter(chunks)) as ByteStream<'a>)
                }
                Canned::Fail(error) => Err(error),
                Canned::Body(_) => Err(ProviderError::other("expected a streaming call")),
            }
        })
    }
}

fn mock_config() -> AppConfig {
    AppConfig::from_lookup(|key| (key == "PUMAPROMOS_MOCK_LATENCY_MS").then(|| "0".to_string()))
        .expect("config should load")
}

fn live_openai(transport: Arc<CannedTransport>) -> Assistant {
    let credentials = SecureCredentialManager::new();
    credentials
        .set_api_key(ProviderId::OpenAi, "sk-test")
        .expect("key should store");
    Assistant::new(
        ProviderSelector::new(ProviderId::OpenAi, Arc::new(credentials), transport)
            .with_mock_latency(Duration::ZERO),
    )
}

fn trade_show_request() -> QuoteRequest {
    QuoteRequest::new("Trade Show/Event", 50)
        .with_timeline(Timeline::Standard)
        .with_budget("$5-$10")
        .with_category("Drinkware (Tumblers, Bottles, Mugs)")
}

#[tokio::test]
async fn trade_show_request_without_credentials_is_served_by_the_mock() {
    let assistant = Assistant::from_config(&mock_config()).expect("assistant should build");

    let quote = assistant
        .generate_quote(&trade_show_request())
        .await
        .expect("mock quote should succeed");

    assert_eq!(quote.products.len(), 3);
    assert!(quote.products.iter().all(|product| product.quantity == 50));
    assert!((quote.subtotal - 1237.00).abs() < 0.0051);
    assert!((quote.setup_fees - 150.00).abs() < 1e-9);
    assert!((quote.shipping - 98.96).abs() < 0.0051);
    assert!((quote.total - 1485.96).abs() < 0.0051);
    assert!(pumapromos::pquote::is_valid_quote_number(&quote.quote_number));
}

#[tokio::test]
async fn mock_mode_is_chosen_for_every_configured_provider() {
    for provider in ["gemini", "openai", "anthropic", "something-else"] {
        let vars = HashMap::from([
            ("AI_PROVIDER", provider.to_string()),
            ("PUMAPROMOS_MOCK_LATENCY_MS", "0".to_string()),
        ]);
        let config = AppConfig::from_lookup(|key| vars.get(key).cloned())
            .expect("config should load");
        let assistant = Assistant::from_config(&config).expect("assistant should build");

        assert!(assistant.is_mock_mode().expect("credentials readable"));
        let replies = assistant
            .stream_chat_response(Vec::new(), "hello".to_string())
            .collect::<Vec<_>>()
            .await;
        assert_eq!(replies.len(), 1);
        assert_eq!(replies[0].text(), pumapromos::pquote::MOCK_CHAT_REPLY);
    }
}

#[tokio::test]
async fn live_quote_is_normalized_before_it_reaches_the_ui() {
    let transport = CannedTransport::new(vec![Canned::Body(VENDOR_QUOTE)]);
    let assistant = live_openai(transport.clone());

    let quote = assistant
        .generate_quote(&QuoteRequest::new("Conference", 100))
        .await
        .expect("live quote should succeed");

    assert_eq!(transport.calls(), 1);
    assert_eq!(quote.quote_number, "Q11112222");
    assert!(quote.products.iter().all(|product| product.quantity == 100));
    assert!((quote.subtotal - 875.0).abs() < 0.0051);
    assert!((quote.shipping - 70.0).abs() < 0.0051);
    assert!((quote.total - 1095.0).abs() < 0.0051);
    assert!(quote.is_consistent());
}

#[tokio::test]
async fn provider_failures_become_one_user_safe_error() {
    for failure in [
        Canned::Fail(ProviderError::authentication("Incorrect API key provided: sk-test")),
        Canned::Fail(ProviderError::timeout("request timed out")),
        Canned::Body(r#"{"choices":[{"message":{"content":"I cannot help with that"}}]}"#),
    ] {
        let assistant = live_openai(CannedTransport::new(vec![failure]));

        let error = assistant
            .generate_quote(&trade_show_request())
            .await
            .expect_err("quote should fail");

        assert_eq!(error.kind, AssistantErrorKind::QuoteGenerationFailed);
        assert_eq!(error.message, QUOTE_FAILURE_MESSAGE);
        assert!(!error.to_string().contains("sk-test"));
    }
}

#[tokio::test]
async fn invalid_requests_fail_validation_without_a_network_call() {
    let transport = CannedTransport::new(vec![Canned::Body(VENDOR_QUOTE)]);
    let assistant = live_openai(transport.clone());

    let error = assistant
        .generate_quote(&QuoteRequest::new("  ", 0))
        .await
        .expect_err("request is invalid");

    assert_eq!(error.kind, AssistantErrorKind::Validation);
    let fields = error.validation.expect("field errors");
    assert_eq!(fields.get(QuoteField::UseCase), Some("This field is required."));
    assert_eq!(
        fields.get(QuoteField::RecipientCount),
        Some("Must be greater than zero.")
    );
    assert_eq!(transport.calls(), 0);
}

#[tokio::test]
async fn chat_failures_end_with_a_single_apology() {
    let transport = CannedTransport::new(vec![Canned::Fail(ProviderError::unavailable(
        "HTTP 503",
    ))]);
    let assistant = live_openai(transport.clone());

    let failed = assistant
        .stream_chat_response(Vec::new(), "Hi".to_string())
        .collect::<Vec<_>>()
        .await;
    assert_eq!(failed.len(), 1);
    assert!(failed[0].is_apology());
    assert_eq!(failed[0].text(), CHAT_APOLOGY);

    let blank = assistant
        .stream_chat_response(Vec::new(), "   ".to_string())
        .collect::<Vec<_>>()
        .await;
    assert!(blank.is_empty());
    assert_eq!(transport.calls(), 1);
}

#[tokio::test]
async fn vendor_error_mid_stream_apologizes_and_keeps_the_transcript_clean() {
    let transport = CannedTransport::new(vec![Canned::Chunks(vec![
        "data: {\"choices\":[{\"delta\":{\"content\":\"Let me check \"}}]}\n\n",
        "data: {\"error\":{\"message\":\"server_error\",\"type\":\"server_error\"}}\n\n",
        "data: {\"choices\":[{\"delta\":{\"content\":\"never shown\"}}]}\n\n",
    ])]);
    let assistant = live_openai(transport);
    let mut session = assistant.chat_session().expect("session should open");

    let outcome = session.send("Do you have lanyards?").await.expect("send should run");

    assert_eq!(outcome, SendOutcome::Apologized);
    let last = session.conversation().last().expect("reply");
    assert_eq!(last.content, CHAT_APOLOGY);
    assert!(session.service().transcript().expect("transcript").is_empty());
}

#[tokio::test]
async fn chat_session_streams_into_the_conversation() {
    let transport = CannedTransport::new(vec![Canned::Chunks(vec![
        "data: {\"choices\":[{\"delta\":{\"content\":\"Minimums start \"}}]}\n\n",
        "data: {\"choices\":[{\"delta\":{\"content\":\"at 25 units.\"}}]}\n\n",
        "data: [DONE]\n\n",
    ])]);
    let assistant = live_openai(transport);
    let mut session = assistant.chat_session().expect("session should open");

    let outcome = session.send("What are your minimums?").await.expect("send should run");

    assert_eq!(outcome, SendOutcome::Completed);
    let last = session.conversation().last().expect("reply");
    assert_eq!(last.role, ChatRole::Model);
    assert_eq!(last.content, "Minimums start at 25 units.");
    assert_eq!(session.service().transcript().expect("transcript").len(), 2);
    assert!(matches!(session.conversation().phase(), TurnPhase::Settled(_)));
}

#[tokio::test]
async fn wizard_submits_once_and_builds_the_email() {
    let assistant = Assistant::from_config(&mock_config()).expect("assistant should build");
    let mut wizard = QuoteWizard::new();

    {
        let draft = wizard.draft_mut();
        draft.use_case = "Trade Show/Event".to_string();
        draft.recipient_count = "50".to_string();
        draft.budget_per_item = "$5-$10".to_string();
        draft.toggle_category("Drinkware (Tumblers, Bottles, Mugs)");
    }
    wizard.next_step().expect("details valid");
    wizard.next_step().expect("preferences optional");
    wizard.next_step().expect("branding optional");
    assert_eq!(wizard.step(), WizardStep::Contact);

    let error = wizard
        .submit(&assistant)
        .await
        .expect_err("contact details missing");
    assert_eq!(error.kind, WizardErrorKind::Validation);
    assert!(!wizard.is_submitted());

    {
        let contact = &mut wizard.draft_mut().contact;
        contact.company_name = "Acme Events".to_string();
        contact.contact_name = "Jordan".to_string();
        contact.email = "jordan@acme.test".to_string();
    }
    let total = wizard
        .submit(&assistant)
        .await
        .expect("submit should succeed")
        .total;
    assert!((total - 1485.96).abs() < 0.0051);
    assert_eq!(wizard.step(), WizardStep::Results);

    let again = wizard
        .submit(&assistant)
        .await
        .expect_err("second submit is rejected");
    assert_eq!(again.kind, WizardErrorKind::AlreadySubmitted);

    let email = wizard.email_quote().expect("email should render");
    assert_eq!(email.recipient, "jordan@acme.test");
    assert!(email.body.contains("Total: $1,485.96"));

    wizard.close();
    assert_eq!(wizard.step(), WizardStep::Details);
    assert!(wizard.result().is_none());
}

#[tokio::test]
async fn wizard_records_a_user_safe_failure() {
    let assistant = live_openai(CannedTransport::new(vec![Canned::Fail(
        ProviderError::unavailable("HTTP 500"),
    )]));
    let mut wizard = QuoteWizard::new();
    {
        let draft = wizard.draft_mut();
        draft.use_case = "Client Gifts".to_string();
        draft.recipient_count = "10".to_string();
        draft.contact.company_name = "Acme".to_string();
        draft.contact.contact_name = "Sam".to_string();
        draft.contact.email = "sam@acme.test".to_string();
    }
    for _ in 0..3 {
        wizard.next_step().expect("steps advance");
    }

    let error = wizard.submit(&assistant).await.expect_err("generation fails");

    assert_eq!(error.kind, WizardErrorKind::GenerationFailed);
    assert_eq!(wizard.failure(), Some(QUOTE_FAILURE_MESSAGE));
    assert!(wizard.is_submitted());
    assert_eq!(
        wizard.email_quote().expect_err("no quote").kind,
        WizardErrorKind::NotReady
    );
}
