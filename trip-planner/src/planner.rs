//! Render-then-invoke composition.

use std::sync::Arc;

use tracing::{Instrument, info, info_span, warn};
use trip_adapters::traits::ChatBackend;
use trip_adapters::{GenerationClient, GenerationOptions, GenerationResult};
use trip_primitives::{RequestId, TripRequest};
use trip_prompts::{TemplateVariant, render};

/// Renders `request` with `variant` and sends it through `client`.
///
/// # Errors
///
/// Propagates template and generation failures unchanged; see
/// [`GenerationClient::invoke`].
pub async fn plan_itinerary(
    client: &GenerationClient,
    request: &TripRequest,
    variant: TemplateVariant,
    options: &GenerationOptions,
) -> GenerationResult<String> {
    let request_id = RequestId::random();
    let span = info_span!("plan_itinerary", %request_id, %variant);
    render_and_invoke(client, request, variant, options)
        .instrument(span)
        .await
}

async fn render_and_invoke(
    client: &GenerationClient,
    request: &TripRequest,
    variant: TemplateVariant,
    options: &GenerationOptions,
) -> GenerationResult<String> {
    info!(
        model = options.model(),
        interests = request.interests().len(),
        "itinerary requested"
    );
    let payload = render(request, variant)?;
    let result = client.invoke(payload, options).await;
    match &result {
        Ok(text) => info!(chars = text.len(), "itinerary generated"),
        Err(err) => warn!(error = %err, class = ?err.class(), "itinerary generation failed"),
    }
    result
}

/// A configured client, option set, and default variant.
#[derive(Clone, Debug)]
pub struct TripPlanner {
    client: GenerationClient,
    options: GenerationOptions,
    variant: TemplateVariant,
}

impl TripPlanner {
    /// Creates a planner over `backend`.
    #[must_use]
    pub fn new(backend: Arc<dyn ChatBackend>, options: GenerationOptions) -> Self {
        Self {
            client: GenerationClient::new(backend),
            options,
            variant: TemplateVariant::default(),
        }
    }

    /// Builds a planner talking to the configured HTTPS backend.
    ///
    /// # Errors
    ///
    /// Returns [`trip_adapters::GenerationError::Configuration`] if the backend
    /// endpoint is invalid.
    #[cfg(feature = "config")]
    pub fn from_config(config: &trip_config::PlannerConfig) -> GenerationResult<Self> {
        use trip_adapters::openai::OpenAiCompatibleBackend;

        let backend = OpenAiCompatibleBackend::new(config.backend().clone())?;
        Ok(Self::new(Arc::new(backend), config.generation_options()).with_variant(config.variant()))
    }

    /// Sets the variant used by [`TripPlanner::plan`].
    #[must_use]
    pub fn with_variant(mut self, variant: TemplateVariant) -> Self {
        self.variant = variant;
        self
    }

    /// Default variant.
    #[must_use]
    pub const fn variant(&self) -> TemplateVariant {
        self.variant
    }

    /// Options sent with each call.
    #[must_use]
    pub fn options(&self) -> &GenerationOptions {
        &self.options
    }

    /// Plans with the default variant.
    ///
    /// # Errors
    ///
    /// See [`plan_itinerary`].
    pub async fn plan(&self, request: &TripRequest) -> GenerationResult<String> {
        self.plan_with(request, self.variant).await
    }

    /// Plans with an explicit variant.
    ///
    /// # Errors
    ///
    /// See [`plan_itinerary`].
    pub async fn plan_with(
        &self,
        request: &TripRequest,
        variant: TemplateVariant,
    ) -> GenerationResult<String> {
        plan_itinerary(&self.client, request, variant, &self.options).await
    }

    /// Validates raw input, then plans. Invalid input is rejected before any
    /// prompt is rendered.
    ///
    /// # Errors
    ///
    /// Returns [`trip_adapters::GenerationError::Validation`] for a blank city
    /// or an empty interest list, otherwise see [`plan_itinerary`].
    pub async fn plan_raw<I, S>(
        &self,
        city: &str,
        interests: I,
        variant: TemplateVariant,
    ) -> GenerationResult<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let request = TripRequest::new(city, interests)?;
        self.plan_with(&request, variant).await
    }
}
