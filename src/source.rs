//! Image source resolution.
//!
//! Incoming requests reference an image as an opaque string: a remote
//! HTTP(S) URL, an inline base64 data URI, or an already-uploaded provider
//! file URI. [`ImageSource::resolve`] classifies the string and normalizes
//! it into a uniform payload for the captioning call.

use std::time::Duration;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use tracing::debug;

use crate::error::CaptionError;

/// MIME type assumed when the source does not declare one.
pub const DEFAULT_MIME_TYPE: &str = "image/jpeg";

/// Timeout applied to remote image fetches.
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// A normalized image reference, ready to be attached to a captioning
/// request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// Image bytes fetched from a remote URL.
    Remote {
        /// The response body.
        bytes: Vec<u8>,
        /// MIME type from the `Content-Type` response header.
        mime_type: String,
    },
    /// Image bytes decoded from an inline base64 data URI.
    Inline {
        /// The decoded payload.
        bytes: Vec<u8>,
        /// MIME type parsed from the data URI header.
        mime_type: String,
    },
    /// An opaque provider file URI, passed through to the API untouched.
    Reference {
        /// The provider file URI.
        uri: String,
        /// Assumed MIME type; the API performs its own content negotiation.
        mime_type: String,
    },
}

impl ImageSource {
    /// Resolves an opaque source string into an [`ImageSource`].
    ///
    /// Classification is a prefix test, evaluated in order:
    ///
    /// 1. `http` — the URL is fetched (10-second timeout) and the body
    ///    returned as [`ImageSource::Remote`]. A non-success status fails
    ///    with [`CaptionError::FetchFailed`].
    /// 2. `data:image` — the payload after the first comma is
    ///    base64-decoded into [`ImageSource::Inline`].
    /// 3. Anything else is treated as a provider file URI and passed
    ///    through as [`ImageSource::Reference`], except other `data:` URIs,
    ///    which can never name a provider file and fail with
    ///    [`CaptionError::UnsupportedFormat`].
    ///
    /// # Errors
    ///
    /// Returns an error if the fetch fails, the data URI is malformed, or
    /// the string is an unsupported data URI.
    pub async fn resolve(
        client: &reqwest::Client,
        source: &str,
    ) -> Result<Self, CaptionError> {
        if source.starts_with("http") {
            return Self::fetch_remote(client, source).await;
        }

        if source.starts_with("data:image") {
            return Self::decode_data_uri(source);
        }

        if source.starts_with("data:") {
            return Err(CaptionError::unsupported(source));
        }

        debug!(uri = %source, "passing source through as provider file reference");
        Ok(Self::Reference {
            uri: source.to_string(),
            mime_type: DEFAULT_MIME_TYPE.to_string(),
        })
    }

    /// Fetches a remote image and captures its declared content type.
    async fn fetch_remote(
        client: &reqwest::Client,
        url: &str,
    ) -> Result<Self, CaptionError> {
        let response = client.get(url).timeout(FETCH_TIMEOUT).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CaptionError::FetchFailed {
                status,
                url: url.to_string(),
            });
        }

        let mime_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or(DEFAULT_MIME_TYPE)
            .to_string();
        let bytes = response.bytes().await?.to_vec();

        debug!(url = %url, mime_type = %mime_type, len = bytes.len(), "fetched remote image");
        Ok(Self::Remote { bytes, mime_type })
    }

    /// Decodes a `data:image/...;base64,...` URI.
    fn decode_data_uri(source: &str) -> Result<Self, CaptionError> {
        let (header, payload) = source
            .split_once(',')
            .ok_or_else(|| CaptionError::unsupported(source))?;

        // Header looks like `data:image/png;base64`; the MIME type sits
        // between the first `:` and the first `;`.
        let mime_type = header
            .trim_start_matches("data:")
            .split(';')
            .next()
            .unwrap_or(DEFAULT_MIME_TYPE)
            .to_string();

        let bytes = BASE64.decode(payload)?;
        Ok(Self::Inline { bytes, mime_type })
    }

    /// The MIME type associated with this source.
    pub fn mime_type(&self) -> &str {
        match self {
            Self::Remote { mime_type, .. }
            | Self::Inline { mime_type, .. }
            | Self::Reference { mime_type, .. } => mime_type,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::header, response::IntoResponse, routing::get, Router};

    fn client() -> reqwest::Client {
        reqwest::Client::new()
    }

    /// Serves `app` on an ephemeral loopback port and returns its base URL.
    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn data_uri_decodes_payload_and_mime_type() {
        // "aGVsbG8=" is base64 for "hello".
        let source = "data:image/png;base64,aGVsbG8=";
        let resolved = ImageSource::resolve(&client(), source).await.unwrap();

        assert_eq!(
            resolved,
            ImageSource::Inline {
                bytes: b"hello".to_vec(),
                mime_type: "image/png".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn data_uri_mime_type_is_parsed_from_header() {
        let source = "data:image/webp;base64,aGVsbG8=";
        let resolved = ImageSource::resolve(&client(), source).await.unwrap();
        assert_eq!(resolved.mime_type(), "image/webp");
    }

    #[tokio::test]
    async fn data_uri_with_invalid_base64_fails() {
        let source = "data:image/png;base64,not!!valid";
        let err = ImageSource::resolve(&client(), source).await.unwrap_err();
        assert!(matches!(err, CaptionError::DecodeError(_)));
    }

    #[tokio::test]
    async fn data_uri_without_payload_separator_fails() {
        let err = ImageSource::resolve(&client(), "data:image/png;base64")
            .await
            .unwrap_err();
        assert!(matches!(err, CaptionError::UnsupportedFormat { .. }));
    }

    #[tokio::test]
    async fn non_image_data_uri_is_rejected() {
        let err = ImageSource::resolve(&client(), "data:text/plain;base64,aGVsbG8=")
            .await
            .unwrap_err();
        assert!(matches!(err, CaptionError::UnsupportedFormat { .. }));
    }

    #[tokio::test]
    async fn opaque_string_passes_through_as_reference() {
        let resolved = ImageSource::resolve(&client(), "files/abc-123")
            .await
            .unwrap();

        assert_eq!(
            resolved,
            ImageSource::Reference {
                uri: "files/abc-123".to_string(),
                mime_type: DEFAULT_MIME_TYPE.to_string(),
            }
        );
    }

    #[tokio::test]
    async fn remote_fetch_returns_body_and_content_type() {
        let app = Router::new().route(
            "/cat.png",
            get(|| async {
                ([(header::CONTENT_TYPE, "image/png")], b"pngbytes".to_vec())
            }),
        );
        let base = serve(app).await;

        let resolved = ImageSource::resolve(&client(), &format!("{base}/cat.png"))
            .await
            .unwrap();

        assert_eq!(
            resolved,
            ImageSource::Remote {
                bytes: b"pngbytes".to_vec(),
                mime_type: "image/png".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn remote_fetch_defaults_missing_content_type_to_jpeg() {
        // An empty 200 with no Content-Type header.
        let app = Router::new().route(
            "/raw",
            get(|| async {
                let mut response = b"jpegbytes".to_vec().into_response();
                response.headers_mut().remove(header::CONTENT_TYPE);
                response
            }),
        );
        let base = serve(app).await;

        let resolved = ImageSource::resolve(&client(), &format!("{base}/raw"))
            .await
            .unwrap();
        assert_eq!(resolved.mime_type(), DEFAULT_MIME_TYPE);
    }

    #[tokio::test]
    async fn remote_fetch_non_success_status_fails() {
        let app = Router::new();
        let base = serve(app).await;

        let err = ImageSource::resolve(&client(), &format!("{base}/missing.png"))
            .await
            .unwrap_err();

        match err {
            CaptionError::FetchFailed { status, .. } => {
                assert_eq!(status, reqwest::StatusCode::NOT_FOUND);
            }
            other => panic!("expected FetchFailed, got {other:?}"),
        }
    }
}
