//! Extraction endpoint contract and implementations.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Instant;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ExtractError;
use crate::types::ExtractedRecipe;

/// Request body for the extraction endpoint.
///
/// Webpage flow sends `{url}`; transcript flow sends
/// `{url, isTranscript: true, transcript}`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionRequest {
    pub url: String,
    #[serde(skip_serializing_if = "is_false")]
    pub is_transcript: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transcript: Option<String>,
}

fn is_false(value: &bool) -> bool {
    !value
}

impl ExtractionRequest {
    /// Request extraction from the page at `url`.
    pub fn webpage(url: &str) -> Self {
        Self {
            url: url.to_string(),
            is_transcript: false,
            transcript: None,
        }
    }

    /// Request extraction from a transcript of the video at `url`.
    pub fn transcript(url: &str, transcript: String) -> Self {
        Self {
            url: url.to_string(),
            is_transcript: true,
            transcript: Some(transcript),
        }
    }
}

/// Contract for the recipe-extraction endpoint.
///
/// Implementations perform a single attempt per call; retry policy lives
/// with the caller.
#[async_trait]
pub trait ExtractionEndpoint: Send + Sync {
    async fn extract(&self, request: &ExtractionRequest) -> Result<ExtractedRecipe, ExtractError>;
}

/// Error body shape returned by the extraction endpoint.
#[derive(Debug, Deserialize)]
struct EndpointErrorBody {
    error: String,
}

/// HTTP implementation of the extraction endpoint.
#[derive(Debug)]
pub struct HttpEndpoint {
    endpoint_url: String,
    client: reqwest::Client,
}

impl HttpEndpoint {
    pub fn new(endpoint_url: String) -> Self {
        Self {
            endpoint_url,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl ExtractionEndpoint for HttpEndpoint {
    async fn extract(&self, request: &ExtractionRequest) -> Result<ExtractedRecipe, ExtractError> {
        let response = self
            .client
            .post(&self.endpoint_url)
            .json(request)
            .send()
            .await
            .map_err(ExtractError::from)?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(ExtractError::from)?;

        if status != 200 {
            // Try to parse a structured error body
            let message = match serde_json::from_str::<EndpointErrorBody>(&body) {
                Ok(parsed) => parsed.error,
                Err(_) => body,
            };
            return Err(ExtractError::from_status(status, message));
        }

        serde_json::from_str(&body)
            .map_err(|e| ExtractError::Unknown(format!("Malformed extraction response: {}", e)))
    }
}

/// One recorded call to a `MockEndpoint`.
#[derive(Debug, Clone)]
pub struct MockCall {
    pub request: ExtractionRequest,
    pub at: Instant,
}

/// Scripted endpoint for tests. Responses are consumed in order; an
/// exhausted script returns a terminal error so a test that over-calls
/// fails loudly instead of retrying.
#[derive(Default)]
pub struct MockEndpoint {
    responses: Mutex<VecDeque<Result<ExtractedRecipe, ExtractError>>>,
    calls: Mutex<Vec<MockCall>>,
}

impl MockEndpoint {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful response.
    pub fn with_recipe(mut self, recipe: ExtractedRecipe) -> Self {
        self.responses.get_mut().unwrap().push_back(Ok(recipe));
        self
    }

    /// Queue a failure.
    pub fn with_error(mut self, error: ExtractError) -> Self {
        self.responses.get_mut().unwrap().push_back(Err(error));
        self
    }

    /// Requests received so far, in order.
    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ExtractionEndpoint for MockEndpoint {
    async fn extract(&self, request: &ExtractionRequest) -> Result<ExtractedRecipe, ExtractError> {
        self.calls.lock().unwrap().push(MockCall {
            request: request.clone(),
            at: Instant::now(),
        });

        match self.responses.lock().unwrap().pop_front() {
            Some(response) => response,
            None => Err(ExtractError::Unknown(
                "No scripted response left".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_webpage_request_body() {
        let request = ExtractionRequest::webpage("https://example.com/pie");
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["url"], "https://example.com/pie");
        assert!(json.get("isTranscript").is_none());
        assert!(json.get("transcript").is_none());
    }

    #[test]
    fn test_transcript_request_body() {
        let request =
            ExtractionRequest::transcript("https://youtu.be/abc", "mix the flour".to_string());
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["isTranscript"], true);
        assert_eq!(json["transcript"], "mix the flour");
    }

    #[tokio::test]
    async fn test_mock_endpoint_scripting() {
        let endpoint = MockEndpoint::new()
            .with_error(ExtractError::Server("HTTP 500: boom".to_string()))
            .with_recipe(ExtractedRecipe {
                title: "Pie".to_string(),
                servings: None,
                prep_time: None,
                cook_time: None,
                ingredients: vec![],
                instructions: vec![],
                image_url: None,
                source_url: None,
                source_type: None,
                is_transcript: false,
            });

        let request = ExtractionRequest::webpage("https://example.com");
        assert!(endpoint.extract(&request).await.is_err());
        assert_eq!(endpoint.extract(&request).await.unwrap().title, "Pie");
        assert_eq!(endpoint.calls().len(), 2);
    }
}
