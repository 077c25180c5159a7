//! Transcript acquisition for video platforms.
//!
//! YouTube transcripts come from the caption tracks embedded in the video
//! page. TikTok and Instagram go through a third-party transcript API keyed
//! by a user-provided secret.

use std::sync::{Arc, LazyLock};

use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::platform::Platform;
use super::retry::{retry_with_backoff, RetryConfig};
use crate::error::ExtractError;
use crate::store::KeyStore;

/// Name under which the transcript API key is stored.
pub const TRANSCRIPT_API_KEY: &str = "transcript_api_key";

/// Keys shorter than this are treated as unset rather than sent.
const MIN_KEY_LENGTH: usize = 10;

#[derive(Debug, Error)]
pub enum TranscriptError {
    /// The video has no usable transcript. Not retryable.
    #[error("No transcript available: {0}")]
    Unavailable(String),

    /// The transcript API needs a key that isn't configured.
    #[error("Transcript API key missing or too short")]
    MissingKey,

    /// A transport failure, classified like any extraction error.
    #[error(transparent)]
    Request(#[from] ExtractError),
}

impl From<TranscriptError> for ExtractError {
    fn from(err: TranscriptError) -> Self {
        match err {
            TranscriptError::Request(inner) => inner,
            other => ExtractError::Unknown(other.to_string()),
        }
    }
}

/// Contract for fetching the spoken-word transcript of a video URL.
#[async_trait]
pub trait TranscriptProvider: Send + Sync {
    async fn fetch_transcript(
        &self,
        platform: Platform,
        url: &str,
    ) -> Result<String, TranscriptError>;
}

/// Caption track descriptor inside the YouTube page JSON.
#[derive(Debug, Deserialize)]
struct CaptionTrack {
    #[serde(rename = "baseUrl")]
    base_url: String,
    #[serde(rename = "languageCode", default)]
    language_code: String,
}

/// The caption track list embedded in a YouTube video page.
static CAPTION_TRACKS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""captionTracks":\s*(\[.*?\])"#).expect("valid regex"));

/// Markup tags in a caption track payload.
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").expect("valid regex"));

/// Transcript provider that scrapes caption tracks from the YouTube video
/// page. Prefers an English track, otherwise takes the first one listed.
pub struct YouTubeCaptions {
    client: reqwest::Client,
    retry: RetryConfig,
}

impl YouTubeCaptions {
    pub fn new(retry: RetryConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            retry,
        }
    }

    async fn fetch_page(&self, url: &str) -> Result<String, ExtractError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(ExtractError::from)?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(ExtractError::from)?;

        if status != 200 {
            return Err(ExtractError::from_status(status, body));
        }
        Ok(body)
    }
}

#[async_trait]
impl TranscriptProvider for YouTubeCaptions {
    async fn fetch_transcript(
        &self,
        _platform: Platform,
        url: &str,
    ) -> Result<String, TranscriptError> {
        let page = retry_with_backoff(&self.retry, "youtube video page", || self.fetch_page(url))
            .await?;

        let tracks = parse_caption_tracks(&page)?;
        let track = pick_track(&tracks)
            .ok_or_else(|| TranscriptError::Unavailable("Video has no caption tracks".to_string()))?;

        tracing::debug!(url, language = track.language_code.as_str(), "fetching caption track");
        let payload = retry_with_backoff(&self.retry, "youtube caption track", || {
            self.fetch_page(&track.base_url)
        })
        .await?;

        let text = caption_text(&payload);
        if text.is_empty() {
            return Err(TranscriptError::Unavailable(
                "Caption track was empty".to_string(),
            ));
        }
        Ok(text)
    }
}

/// Pull the caption track list out of a YouTube video page.
fn parse_caption_tracks(page: &str) -> Result<Vec<CaptionTrack>, TranscriptError> {
    let captures = CAPTION_TRACKS_RE
        .captures(page)
        .ok_or_else(|| TranscriptError::Unavailable("Video page lists no captions".to_string()))?;

    let tracks: Vec<CaptionTrack> = serde_json::from_str(&captures[1])
        .map_err(|e| TranscriptError::Unavailable(format!("Caption list unreadable: {}", e)))?;

    if tracks.is_empty() {
        return Err(TranscriptError::Unavailable(
            "Video has no caption tracks".to_string(),
        ));
    }
    Ok(tracks)
}

/// Prefer an English track; fall back to the first listed.
fn pick_track(tracks: &[CaptionTrack]) -> Option<&CaptionTrack> {
    tracks
        .iter()
        .find(|t| t.language_code.starts_with("en"))
        .or_else(|| tracks.first())
}

/// Flatten a caption track payload (timed markup) into plain text.
fn caption_text(payload: &str) -> String {
    let stripped = TAG_RE.replace_all(payload, " ");
    let decoded = decode_entities(&stripped);
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn decode_entities(text: &str) -> String {
    text.replace("&amp;", "&")
        .replace("&#39;", "'")
        .replace("&quot;", "\"")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
}

#[derive(Debug, Serialize)]
struct TranscriptApiRequest {
    url: String,
}

#[derive(Debug, Deserialize)]
struct TranscriptApiResponse {
    transcript: String,
}

/// Transcript provider backed by a third-party transcript API, used for
/// platforms whose pages can't be scraped. The API key comes from the
/// embedder's key store and is validated before any request goes out.
pub struct CaptionApiClient {
    api_url: String,
    keys: Arc<dyn KeyStore>,
    client: reqwest::Client,
    retry: RetryConfig,
}

impl CaptionApiClient {
    pub fn new(api_url: String, keys: Arc<dyn KeyStore>, retry: RetryConfig) -> Self {
        Self {
            api_url,
            keys,
            client: reqwest::Client::new(),
            retry,
        }
    }

    /// One transcript API request. `Ok(None)` means the service has no
    /// transcript for this video, which is terminal, not retryable.
    async fn request_transcript(
        &self,
        key: &str,
        url: &str,
    ) -> Result<Option<String>, ExtractError> {
        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(key)
            .json(&TranscriptApiRequest {
                url: url.to_string(),
            })
            .send()
            .await
            .map_err(ExtractError::from)?;

        let status = response.status().as_u16();
        if status == 404 {
            return Ok(None);
        }

        let body = response.text().await.map_err(ExtractError::from)?;
        if status != 200 {
            return Err(ExtractError::from_status(status, body));
        }

        let parsed: TranscriptApiResponse = serde_json::from_str(&body)
            .map_err(|e| ExtractError::Unknown(format!("Malformed transcript response: {}", e)))?;
        Ok(Some(parsed.transcript))
    }
}

#[async_trait]
impl TranscriptProvider for CaptionApiClient {
    async fn fetch_transcript(
        &self,
        platform: Platform,
        url: &str,
    ) -> Result<String, TranscriptError> {
        let key = self
            .keys
            .get_key(TRANSCRIPT_API_KEY)
            .await
            .map_err(|e| TranscriptError::Unavailable(format!("Key store error: {}", e)))?
            .filter(|key| key.trim().len() >= MIN_KEY_LENGTH)
            .ok_or(TranscriptError::MissingKey)?;

        tracing::debug!(url, platform = platform.as_str(), "requesting transcript");
        let transcript = retry_with_backoff(&self.retry, "transcript api", || {
            self.request_transcript(&key, url)
        })
        .await?;

        transcript.ok_or_else(|| {
            TranscriptError::Unavailable("No transcript for this video".to_string())
        })
    }
}

/// Production transcript provider: captions scraped from YouTube, the
/// transcript API for everything else.
pub struct PlatformTranscripts {
    youtube: YouTubeCaptions,
    caption_api: CaptionApiClient,
}

impl PlatformTranscripts {
    pub fn new(api_url: String, keys: Arc<dyn KeyStore>, retry: RetryConfig) -> Self {
        Self {
            youtube: YouTubeCaptions::new(retry.clone()),
            caption_api: CaptionApiClient::new(api_url, keys, retry),
        }
    }
}

#[async_trait]
impl TranscriptProvider for PlatformTranscripts {
    async fn fetch_transcript(
        &self,
        platform: Platform,
        url: &str,
    ) -> Result<String, TranscriptError> {
        match platform {
            Platform::YouTube => self.youtube.fetch_transcript(platform, url).await,
            Platform::TikTok | Platform::Instagram => {
                self.caption_api.fetch_transcript(platform, url).await
            }
            Platform::Web => Err(TranscriptError::Unavailable(
                "Web pages have no transcript".to_string(),
            )),
        }
    }
}

/// Scripted transcript provider for tests.
#[derive(Debug, Default)]
pub struct FakeTranscripts {
    transcript: Option<String>,
    failure: Option<String>,
}

impl FakeTranscripts {
    /// Always return this transcript.
    pub fn with_transcript(text: &str) -> Self {
        Self {
            transcript: Some(text.to_string()),
            failure: None,
        }
    }

    /// Always fail with `Unavailable`.
    pub fn unavailable(message: &str) -> Self {
        Self {
            transcript: None,
            failure: Some(message.to_string()),
        }
    }
}

#[async_trait]
impl TranscriptProvider for FakeTranscripts {
    async fn fetch_transcript(
        &self,
        _platform: Platform,
        _url: &str,
    ) -> Result<String, TranscriptError> {
        match (&self.transcript, &self.failure) {
            (Some(text), _) => Ok(text.clone()),
            (None, Some(message)) => Err(TranscriptError::Unavailable(message.clone())),
            (None, None) => Err(TranscriptError::Unavailable(
                "No transcript scripted".to_string(),
            )),
        }
    }
}
