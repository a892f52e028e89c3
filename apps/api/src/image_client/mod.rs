/// Image Client — the single point of entry for calls to the image-generation API.
///
/// One request per generation, no retry, and no application-level timeout:
/// the reqwest client runs with its defaults.
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

const OPENAI_IMAGES_URL: &str = "https://api.openai.com/v1/images/generations";
/// Every request asks for exactly one image.
const IMAGE_COUNT: u32 = 1;
const IMAGE_SIZE: &str = "1024x1024";

#[derive(Debug, Error)]
pub enum ImageApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Response did not contain an image URL")]
    MalformedResponse,
}

/// Anything that can turn a prompt into the URL of one generated image.
///
/// Carried in `AppState` as `Arc<dyn ImageGenerator>`.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, ImageApiError>;
}

#[derive(Debug, Serialize)]
struct ImageRequest<'a> {
    prompt: &'a str,
    n: u32,
    size: &'a str,
}

#[derive(Debug, Deserialize)]
struct ImageResponse {
    #[serde(default)]
    data: Vec<ImageData>,
}

#[derive(Debug, Deserialize)]
struct ImageData {
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiError {
    error: OpenAiErrorBody,
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorBody {
    message: String,
}

#[derive(Clone)]
pub struct OpenAiImageClient {
    client: Client,
    api_key: String,
    endpoint: String,
}

impl OpenAiImageClient {
    pub fn new(api_key: String) -> Result<Self, ImageApiError> {
        Ok(Self {
            client: Client::builder().build()?,
            api_key,
            endpoint: OPENAI_IMAGES_URL.to_string(),
        })
    }
}

#[async_trait]
impl ImageGenerator for OpenAiImageClient {
    async fn generate(&self, prompt: &str) -> Result<String, ImageApiError> {
        let request_body = ImageRequest {
            prompt,
            n: IMAGE_COUNT,
            size: IMAGE_SIZE,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .header("content-type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(api_error(status.as_u16(), body));
        }

        let url = first_image_url(&body)?;
        debug!("Image API call succeeded");
        Ok(url)
    }
}

/// Builds an `Api` error, preferring the provider's own message over the raw body.
fn api_error(status: u16, body: String) -> ImageApiError {
    let message = serde_json::from_str::<OpenAiError>(&body)
        .map(|e| e.error.message)
        .unwrap_or(body);
    ImageApiError::Api { status, message }
}

/// Reads `data[0].url` out of a response body.
fn first_image_url(body: &str) -> Result<String, ImageApiError> {
    let parsed: ImageResponse =
        serde_json::from_str(body).map_err(|_| ImageApiError::MalformedResponse)?;
    parsed
        .data
        .into_iter()
        .next()
        .and_then(|d| d.url)
        .filter(|url| !url.is_empty())
        .ok_or(ImageApiError::MalformedResponse)
}
