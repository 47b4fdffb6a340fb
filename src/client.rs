//! Client implementation for the Gemini captioning API.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use tracing::debug;

use crate::{
    error::CaptionError,
    models::{ModelParams, Part, Request, Response},
    source::ImageSource,
};

/// Default API endpoint for Google's Generative AI service
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
/// Default API version
const DEFAULT_API_VERSION: &str = "v1beta";

/// The fixed prompt sent alongside every image.
pub const CAPTION_PROMPT: &str = "What do you see in this image? \
    Provide a clear, concise, detailed, and helpful caption for someone with visual impairments. \
    Focus on key objects, actions, and the overall scene. \
    Limit the given description to less than 40 words.";

/// A client for producing image captions with the Gemini API.
#[derive(Debug, Clone)]
pub struct CaptionModel {
    api_key: String,
    params: ModelParams,
    base_url: String,
    client: reqwest::Client,
}

impl CaptionModel {
    /// Creates a new CaptionModel with the specified API key and model.
    ///
    /// # Arguments
    ///
    /// * `api_key` - The API key for authentication
    /// * `params` - The model parameters
    pub fn new(api_key: impl Into<String>, params: impl Into<ModelParams>) -> Self {
        let base_url =
            std::env::var("GOOGLE_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        Self {
            api_key: api_key.into(),
            params: params.into(),
            base_url,
            client: reqwest::Client::new(),
        }
    }

    /// Creates a new CaptionModel from environment variables.
    ///
    /// # Environment Variables
    ///
    /// * `GOOGLE_API_KEY` - The API key for authentication
    /// * `GOOGLE_BASE_URL` - Optional endpoint override
    ///
    /// # Arguments
    ///
    /// * `model` - The model identifier (e.g., "gemini-2.5-flash")
    ///
    /// # Errors
    ///
    /// Returns an error if the required environment variable is not set.
    pub fn from_env(model: impl Into<String>) -> Result<Self, CaptionError> {
        let api_key = std::env::var("GOOGLE_API_KEY")?;
        Ok(Self::new(
            api_key,
            ModelParams::builder().model(model).build(),
        ))
    }

    /// Returns a copy of this model that authenticates with a different key.
    ///
    /// The underlying HTTP client is shared between the copies.
    pub fn with_api_key(&self, api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..self.clone()
        }
    }

    /// Overrides the API endpoint base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// The shared HTTP client, reused for remote image fetches.
    pub fn http_client(&self) -> &reqwest::Client {
        &self.client
    }

    fn build_url(&self) -> String {
        format!(
            "{}/{}/models/{}:generateContent?key={}",
            self.base_url, DEFAULT_API_VERSION, self.params.model, self.api_key
        )
    }

    /// Makes a request to the generateContent endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns a non-success
    /// status.
    async fn make_request(&self, request: Request) -> Result<reqwest::Response, CaptionError> {
        let url = self.build_url();
        let response = self.client.post(&url).json(&request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CaptionError::Api { status, body });
        }

        Ok(response)
    }

    /// Generates a response for an arbitrary request.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or if the response cannot
    /// be parsed.
    pub async fn generate_response(&self, request: Request) -> Result<Response, CaptionError> {
        Ok(self.make_request(request).await?.json().await?)
    }

    /// Captions a resolved image source with the given prompt.
    ///
    /// Byte-carrying sources are base64-encoded into an inline data part;
    /// provider file references are forwarded as file data parts.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or produces no text.
    pub async fn describe_image(
        &self,
        source: ImageSource,
        prompt: impl Into<String>,
    ) -> Result<String, CaptionError> {
        let image_part = match source {
            ImageSource::Remote { bytes, mime_type }
            | ImageSource::Inline { bytes, mime_type } => {
                Part::inline_data(mime_type, BASE64.encode(bytes))
            }
            ImageSource::Reference { uri, mime_type } => Part::file_data(mime_type, uri),
        };

        let request = Request::from_parts(vec![Part::text(prompt), image_part]);
        let response = self.generate_response(request).await?;

        let description = response.text();
        if description.is_empty() {
            return Err(CaptionError::EmptyResponse);
        }

        debug!(model = %self.params.model, "generated image description");
        Ok(description)
    }
}
