//! Recipe extraction from a URL.
//!
//! One `extract_recipe` call runs a short pipeline: classify the URL by
//! platform, fetch a transcript for video platforms, then call the
//! extraction endpoint with either the transcript or the bare URL. The
//! endpoint call is wrapped in retry-with-backoff; failures surface as a
//! single classified [`ExtractError`].

pub mod endpoint;
pub mod platform;
pub mod retry;
pub mod transcript;

pub use endpoint::{ExtractionEndpoint, ExtractionRequest, HttpEndpoint, MockCall, MockEndpoint};
pub use platform::{HostPlatformDetector, Platform, PlatformDetector};
pub use retry::{retry_with_backoff, RetryConfig};
pub use transcript::{
    CaptionApiClient, FakeTranscripts, PlatformTranscripts, TranscriptError, TranscriptProvider,
    YouTubeCaptions, TRANSCRIPT_API_KEY,
};

use std::env;
use std::sync::Arc;

use crate::error::ExtractError;
use crate::store::KeyStore;
use crate::types::{ExtractedRecipe, SourceType};

/// Default recipe-extraction endpoint.
pub const DEFAULT_ENDPOINT_URL: &str = "https://api.larder.app/v1/extract";

/// Default transcript API endpoint.
pub const DEFAULT_TRANSCRIPT_API_URL: &str = "https://api.larder.app/v1/transcript";

/// Extraction client configuration.
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    /// URL of the recipe-extraction endpoint.
    pub endpoint_url: String,
    /// URL of the third-party transcript API.
    pub transcript_api_url: String,
    /// Retry policy shared by the endpoint and transcript calls.
    pub retry: RetryConfig,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            endpoint_url: DEFAULT_ENDPOINT_URL.to_string(),
            transcript_api_url: DEFAULT_TRANSCRIPT_API_URL.to_string(),
            retry: RetryConfig::default(),
        }
    }
}

impl ExtractorConfig {
    /// Load configuration from environment variables, defaulting anything
    /// unset.
    ///
    /// Optional:
    /// - `LARDER_EXTRACT_URL`: extraction endpoint URL
    /// - `LARDER_TRANSCRIPT_API_URL`: transcript API URL
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            endpoint_url: env::var("LARDER_EXTRACT_URL").unwrap_or(defaults.endpoint_url),
            transcript_api_url: env::var("LARDER_TRANSCRIPT_API_URL")
                .unwrap_or(defaults.transcript_api_url),
            retry: defaults.retry,
        }
    }
}

/// Client for turning a URL into a structured recipe.
pub struct ExtractionClient {
    endpoint: Arc<dyn ExtractionEndpoint>,
    transcripts: Arc<dyn TranscriptProvider>,
    detector: Box<dyn PlatformDetector>,
    retry: RetryConfig,
}

impl ExtractionClient {
    /// Production wiring: HTTP endpoint, scraped/API transcripts, hostname
    /// platform detection. The key store supplies the transcript API key.
    pub fn new(config: ExtractorConfig, keys: Arc<dyn KeyStore>) -> Self {
        let transcripts = PlatformTranscripts::new(
            config.transcript_api_url,
            keys,
            config.retry.clone(),
        );
        Self {
            endpoint: Arc::new(HttpEndpoint::new(config.endpoint_url)),
            transcripts: Arc::new(transcripts),
            detector: Box::new(HostPlatformDetector),
            retry: config.retry,
        }
    }

    /// Build a client from explicit collaborators. Tests use this to swap
    /// in scripted endpoints and transcript providers.
    pub fn with_collaborators(
        endpoint: Arc<dyn ExtractionEndpoint>,
        transcripts: Arc<dyn TranscriptProvider>,
        detector: Box<dyn PlatformDetector>,
        retry: RetryConfig,
    ) -> Self {
        Self {
            endpoint,
            transcripts,
            detector,
            retry,
        }
    }

    /// Extract a recipe from `url`.
    ///
    /// Video URLs go through the transcript flow first. A failed transcript
    /// for TikTok or Instagram falls back to page extraction, since those
    /// platforms usually carry the recipe in the post caption anyway;
    /// YouTube transcript failures propagate.
    pub async fn extract_recipe(&self, url: &str) -> Result<ExtractedRecipe, ExtractError> {
        let platform = self.detector.detect(url);
        tracing::info!(url, platform = platform.as_str(), "extracting recipe");

        if platform.is_video() {
            match self.transcripts.fetch_transcript(platform, url).await {
                Ok(transcript) => {
                    let request = ExtractionRequest::transcript(url, transcript);
                    return self.call_endpoint(request).await;
                }
                Err(err) if platform != Platform::YouTube => {
                    tracing::warn!(
                        url,
                        platform = platform.as_str(),
                        error = %err,
                        "transcript failed, extracting from page instead"
                    );
                }
                Err(err) => return Err(err.into()),
            }
        }

        self.call_endpoint(ExtractionRequest::webpage(url)).await
    }

    async fn call_endpoint(
        &self,
        request: ExtractionRequest,
    ) -> Result<ExtractedRecipe, ExtractError> {
        let recipe = retry_with_backoff(&self.retry, "recipe extraction", || {
            self.endpoint.extract(&request)
        })
        .await?;
        Ok(normalize(recipe, &request))
    }
}

/// Fill in fields the endpoint is allowed to omit: the source URL, the
/// transcript flag, and a source type inferred from how we asked.
fn normalize(mut recipe: ExtractedRecipe, request: &ExtractionRequest) -> ExtractedRecipe {
    if recipe.source_url.is_none() {
        recipe.source_url = Some(request.url.clone());
    }
    recipe.is_transcript = request.is_transcript;
    if recipe.source_type.is_none() {
        recipe.source_type = Some(if request.is_transcript {
            SourceType::Video
        } else {
            SourceType::Webpage
        });
    }
    recipe
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare_recipe(title: &str) -> ExtractedRecipe {
        ExtractedRecipe {
            title: title.to_string(),
            servings: None,
            prep_time: None,
            cook_time: None,
            ingredients: vec![],
            instructions: vec![],
            image_url: None,
            source_url: None,
            source_type: None,
            is_transcript: false,
        }
    }

    #[test]
    fn test_normalize_fills_source_fields() {
        let request =
            ExtractionRequest::transcript("https://youtu.be/abc", "mix it all".to_string());
        let recipe = normalize(bare_recipe("Cake"), &request);

        assert_eq!(recipe.source_url.as_deref(), Some("https://youtu.be/abc"));
        assert_eq!(recipe.source_type, Some(SourceType::Video));
        assert!(recipe.is_transcript);
    }

    #[test]
    fn test_normalize_keeps_endpoint_values() {
        let request = ExtractionRequest::webpage("https://example.com/cake");
        let mut extracted = bare_recipe("Cake");
        extracted.source_url = Some("https://example.com/cake?canonical".to_string());
        extracted.source_type = Some(SourceType::Video);

        let recipe = normalize(extracted, &request);
        assert_eq!(
            recipe.source_url.as_deref(),
            Some("https://example.com/cake?canonical")
        );
        assert_eq!(recipe.source_type, Some(SourceType::Video));
    }

    #[test]
    fn test_config_defaults() {
        let config = ExtractorConfig::default();
        assert_eq!(config.endpoint_url, DEFAULT_ENDPOINT_URL);
        assert_eq!(config.retry.max_retries, retry::DEFAULT_MAX_RETRIES);
    }
}
