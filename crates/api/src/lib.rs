//! Composition server client.
//!
//! This crate provides a lightweight client for the single endpoint the
//! composer talks to. It focuses on:
//!
//! - Validating the configured base URL
//! - Building requests with a timeout, `Accept` header and User-Agent
//! - Posting a [`CompositionPayload`] to `/save_composition`
//! - Strictly parsing the `{ "status": string }` reply
//!
//! # Example
//!
//! ```ignore
//! use std::time::Duration;
//! use composer_api::CompositionClient;
//! use composer_types::CompositionPayload;
//!
//! async fn save(payload: &CompositionPayload) -> Result<(), composer_api::ApiError> {
//!     let client = CompositionClient::new("http://127.0.0.1:8080", Duration::from_secs(30))?;
//!     let response = client.save_composition(payload).await?;
//!     println!("{}", response.status);
//!     Ok(())
//! }
//! ```

mod error;
pub mod parser;

use std::env;
use std::time::Duration;

use composer_types::{CompositionPayload, SaveCompositionResponse};
use reqwest::{Client, Request, Url, header};
use tracing::{debug, warn};

pub use error::ApiError;
pub use parser::{JsonParseError, parse_response_json_strict, truncate_response_preview};

/// Environment variable overriding the server base URL.
pub const BASE_URL_ENV: &str = "COMPOSER_BASE_URL";
/// Base URL used when neither a flag nor [`BASE_URL_ENV`] is set.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8080";
/// Path of the endpoint that stores a composition and starts its execution.
pub const SAVE_COMPOSITION_PATH: &str = "/save_composition";
/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const BODY_PREVIEW_LIMIT: usize = 200;

/// Thin wrapper around a configured `reqwest::Client` for the composition server.
///
/// Cloning is cheap; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct CompositionClient {
    base_url: Url,
    http: Client,
    user_agent: String,
}

impl CompositionClient {
    /// Construct a client for `base_url` with the given request timeout.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let base_url = validate_base_url(base_url)?;
        let http = Client::builder().timeout(timeout).build().map_err(ApiError::BuildClient)?;

        Ok(Self {
            base_url,
            http,
            user_agent: format!("composer/{}; {}", env!("CARGO_PKG_VERSION"), env::consts::OS),
        })
    }

    /// Construct a client whose base URL comes from [`BASE_URL_ENV`], falling
    /// back to [`DEFAULT_BASE_URL`].
    pub fn from_env(timeout: Duration) -> Result<Self, ApiError> {
        let base_url = env::var(BASE_URL_ENV).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::new(&base_url, timeout)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Absolute URL of the save endpoint.
    pub fn save_composition_url(&self) -> Url {
        let mut url = self.base_url.clone();
        url.set_path(SAVE_COMPOSITION_PATH);
        url.set_query(None);
        url
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Build the exact request [`Self::save_composition`] sends, without sending it.
    pub fn build_save_request(&self, payload: &CompositionPayload) -> Result<Request, ApiError> {
        self.http
            .post(self.save_composition_url())
            .header(header::ACCEPT, "application/json")
            .header(header::USER_AGENT, &self.user_agent)
            .json(payload)
            .build()
            .map_err(ApiError::BuildRequest)
    }

    /// Submit a composition and return the server's status reply.
    ///
    /// Exactly one POST is sent; failures are returned, never retried.
    pub async fn save_composition(&self, payload: &CompositionPayload) -> Result<SaveCompositionResponse, ApiError> {
        let request = self.build_save_request(payload)?;
        debug!(url = %request.url(), relations = payload.compositions.len(), interval = ?payload.interval, "posting composition");

        let response = self.http.execute(request).await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "composition server rejected the request");
            return Err(ApiError::HttpStatus {
                status: status.as_u16(),
                body_preview: truncate_response_preview(&text, BODY_PREVIEW_LIMIT),
            });
        }

        let value = parse_response_json_strict(&text, Some(status))?;
        match value.get("status").and_then(|status| status.as_str()) {
            Some(status) => Ok(SaveCompositionResponse {
                status: status.to_string(),
            }),
            None => Err(ApiError::MissingStatus {
                body_preview: truncate_response_preview(&text, BODY_PREVIEW_LIMIT),
            }),
        }
    }
}

/// Validate that a base URL is acceptable for use by the client.
///
/// Rules:
/// - it must parse as an absolute URL with a host
/// - the scheme must be `http`; the client is built without a TLS backend
fn validate_base_url(base: &str) -> Result<Url, ApiError> {
    let parsed = Url::parse(base.trim()).map_err(|error| ApiError::InvalidBaseUrl {
        url: base.to_string(),
        reason: error.to_string(),
    })?;

    if parsed.scheme() != "http" {
        return Err(ApiError::UnsupportedScheme(parsed.scheme().to_string()));
    }

    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(ApiError::InvalidBaseUrl {
            url: base.to_string(),
            reason: "missing host".to_string(),
        });
    }

    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_base_url_accepts_plain_http() {
        assert!(validate_base_url("http://127.0.0.1:8080").is_ok());
        assert!(validate_base_url("  http://composer.local/ ").is_ok());
    }

    #[test]
    fn https_is_refused_up_front() {
        assert!(matches!(
            validate_base_url("https://composer.example.com"),
            Err(ApiError::UnsupportedScheme(scheme)) if scheme == "https"
        ));
        assert!(matches!(
            CompositionClient::new("https://127.0.0.1:8443", DEFAULT_TIMEOUT),
            Err(ApiError::UnsupportedScheme(_))
        ));
    }

    #[test]
    fn validate_base_url_rejects_bad_input() {
        assert!(matches!(validate_base_url("not a url"), Err(ApiError::InvalidBaseUrl { .. })));
        assert!(matches!(validate_base_url("ftp://host"), Err(ApiError::UnsupportedScheme(scheme)) if scheme == "ftp"));
    }

    #[test]
    fn built_request_carries_json_body_and_headers() {
        use composer_types::{RelationKind, RelationRecord};

        let client = CompositionClient::new("http://127.0.0.1:8080", DEFAULT_TIMEOUT).unwrap();
        let payload = CompositionPayload::new(
            vec![RelationRecord::from_fields("svcA", RelationKind::After, "svcB", "")],
            None,
        );
        let request = client.build_save_request(&payload).unwrap();

        assert_eq!(request.method(), reqwest::Method::POST);
        assert_eq!(request.url().as_str(), "http://127.0.0.1:8080/save_composition");
        assert_eq!(request.headers()[header::CONTENT_TYPE], "application/json");
        assert_eq!(request.headers()[header::ACCEPT], "application/json");
        assert!(request.headers()[header::USER_AGENT].to_str().unwrap().starts_with("composer/"));
        let body = request.body().and_then(|body| body.as_bytes()).unwrap();
        assert_eq!(
            body,
            br#"{"compositions":[{"service_a":"svcA","relation":"after","service_b":"svcB"}],"interval":null}"#
        );
    }

    #[test]
    fn save_url_replaces_any_base_path() {
        let client = CompositionClient::new("http://localhost:8080/ui/index.html?x=1", DEFAULT_TIMEOUT).unwrap();
        assert_eq!(client.save_composition_url().as_str(), "http://localhost:8080/save_composition");
    }
}
