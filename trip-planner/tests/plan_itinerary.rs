use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use trip_planner::adapters::traits::{BackendMetadata, ChatBackend, ChatRequest};
use trip_planner::{
    ApiKey, ErrorClass, GenerationClient, GenerationError, GenerationOptions, GenerationResult,
    TemplateVariant, TripPlanner, TripRequest, plan_itinerary, render,
};

/// Replies with a fixed string and records every request it sees.
struct EchoBackend {
    metadata: BackendMetadata,
    reply: String,
    calls: AtomicUsize,
    seen: Mutex<Vec<ChatRequest>>,
}

impl EchoBackend {
    fn new(reply: impl Into<String>) -> Self {
        Self {
            metadata: BackendMetadata::new("echo", "memory://echo"),
            reply: reply.into(),
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChatBackend for EchoBackend {
    fn metadata(&self) -> &BackendMetadata {
        &self.metadata
    }

    async fn complete(&self, request: ChatRequest) -> GenerationResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(request);
        Ok(self.reply.clone())
    }
}

/// Fails every call as if the connection dropped.
struct UnreachableBackend {
    metadata: BackendMetadata,
    calls: AtomicUsize,
}

#[async_trait]
impl ChatBackend for UnreachableBackend {
    fn metadata(&self) -> &BackendMetadata {
        &self.metadata
    }

    async fn complete(&self, _request: ChatRequest) -> GenerationResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(GenerationError::transport("connection reset by peer"))
    }
}

fn options() -> GenerationOptions {
    GenerationOptions::default().with_api_key(ApiKey::new("gsk_test").unwrap())
}

#[tokio::test]
async fn lisbon_brief_bulleted_end_to_end() {
    let request = TripRequest::new("Lisbon", ["History", "Coffee", "Viewpoints"]).unwrap();

    let payload = render(&request, TemplateVariant::BriefBulleted).unwrap();
    assert!(payload.system_text().contains("Lisbon"));
    assert!(payload.system_text().contains("History, Coffee, Viewpoints"));

    let backend = Arc::new(EchoBackend::new("Morning: visit castle"));
    let client = GenerationClient::new(backend.clone());
    let text = plan_itinerary(&client, &request, TemplateVariant::BriefBulleted, &options())
        .await
        .unwrap();

    assert_eq!(text, "Morning: visit castle");
    assert_eq!(backend.calls(), 1);

    let seen = backend.seen.lock().unwrap();
    assert_eq!(seen[0].messages()[0].content(), payload.system_text());
    assert_eq!(seen[0].messages()[1].content(), payload.human_text());
}

#[tokio::test]
async fn empty_interests_rejected_before_rendering() {
    let backend = Arc::new(EchoBackend::new("unused"));
    let planner = TripPlanner::new(backend.clone(), options());

    for city in ["Lisbon", "", "   "] {
        let err = planner
            .plan_raw(city, Vec::<&str>::new(), TemplateVariant::BriefBulleted)
            .await
            .expect_err("no interests");
        assert!(matches!(err, GenerationError::Validation { .. }), "{city:?}");
    }
    assert_eq!(backend.calls(), 0);
}

#[tokio::test]
async fn blank_city_rejected_before_rendering() {
    let backend = Arc::new(EchoBackend::new("unused"));
    let planner = TripPlanner::new(backend.clone(), options());

    let err = planner
        .plan_raw("  ", ["Food"], TemplateVariant::FreeformMarkdown)
        .await
        .expect_err("blank city");
    assert!(matches!(err, GenerationError::Validation { .. }));
    assert_eq!(err.class(), ErrorClass::FixConfiguration);
    assert_eq!(backend.calls(), 0);
}

#[tokio::test]
async fn missing_credential_makes_no_backend_call() {
    let backend = Arc::new(EchoBackend::new("unused"));
    let planner = TripPlanner::new(backend.clone(), GenerationOptions::default());
    let request = TripRequest::new("Vienna", ["Art"]).unwrap();

    let err = planner.plan(&request).await.expect_err("no key");
    assert!(matches!(err, GenerationError::Configuration { .. }));
    assert_eq!(backend.calls(), 0);
}

#[tokio::test]
async fn transport_failure_called_once() {
    let backend = Arc::new(UnreachableBackend {
        metadata: BackendMetadata::new("unreachable", "memory://void"),
        calls: AtomicUsize::new(0),
    });
    let planner = TripPlanner::new(backend.clone(), options());
    let request = TripRequest::new("Tokyo", ["Food", "Nightlife"]).unwrap();

    let err = planner.plan(&request).await.expect_err("transport");
    assert!(matches!(err, GenerationError::Transport { .. }));
    assert_eq!(err.class(), ErrorClass::Transient);
    assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn planner_is_usable_after_a_failure() {
    let backend = Arc::new(EchoBackend::new("## Morning\n- Sagrada Familia"));
    let planner = TripPlanner::new(backend.clone(), options());

    assert!(planner
        .plan_raw("Barcelona", Vec::<&str>::new(), TemplateVariant::default())
        .await
        .is_err());

    let text = planner
        .plan_raw("Barcelona", ["Architecture"], TemplateVariant::StrictSectionedMarkdown)
        .await
        .unwrap();
    assert_eq!(text, "## Morning\n- Sagrada Familia");
    assert_eq!(backend.calls(), 1);
}

#[tokio::test]
async fn default_variant_is_used_by_plan() {
    let backend = Arc::new(EchoBackend::new("ok"));
    let planner =
        TripPlanner::new(backend.clone(), options()).with_variant(TemplateVariant::BriefBulleted);
    let request = TripRequest::new("Rome", ["History"]).unwrap();

    planner.plan(&request).await.unwrap();

    let expected = render(&request, TemplateVariant::BriefBulleted).unwrap();
    let seen = backend.seen.lock().unwrap();
    assert_eq!(seen[0].messages()[0].content(), expected.system_text());
}

#[tokio::test]
async fn concurrent_calls_are_independent() {
    let backend = Arc::new(EchoBackend::new("plan"));
    let planner = TripPlanner::new(backend.clone(), options());
    let lisbon = TripRequest::new("Lisbon", ["Coffee"]).unwrap();
    let porto = TripRequest::new("Porto", ["Food"]).unwrap();

    let (a, b) = tokio::join!(planner.plan(&lisbon), planner.plan(&porto));
    assert_eq!(a.unwrap(), "plan");
    assert_eq!(b.unwrap(), "plan");
    assert_eq!(backend.calls(), 2);
}
