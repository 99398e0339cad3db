//! Storage REST client.
//!
//! Issues signed object URLs through the storage API:
//! `POST {endpoint}/storage/v1/object/sign/{bucket}/{path}` with `{"expiresIn": secs}`.

use std::time::{Duration, Instant};

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, info_span, Instrument};
use url::Url;

use crate::config::StorageConfig;
use crate::error::{StorageError, StorageResult};
use crate::link::{StorageReference, SIGN_ROUTE};
use crate::metrics::record_request;

/// API base path, relative to the project endpoint.
const API_BASE: &str = "/storage/v1";

/// Sign route as it appears in relative `signedURL` answers.
const SIGNED_RELATIVE_ROUTE: &str = "object/sign/";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SignRequest {
    expires_in: u64,
}

#[derive(Debug, Deserialize)]
struct SignResponse {
    #[serde(rename = "signedURL", alias = "signedUrl", default)]
    signed_url: Option<String>,
}

/// Storage REST API client.
#[derive(Clone)]
pub struct StorageClient {
    http: Client,
    config: StorageConfig,
}

impl StorageClient {
    /// Create a new storage client.
    pub fn new(config: StorageConfig) -> StorageResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(10)
            .user_agent(concat!("vgen-storage/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(StorageError::Network)?;

        Ok(Self { http, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> StorageResult<Self> {
        Self::new(StorageConfig::from_env()?)
    }

    /// Project endpoint; links containing it are considered ours.
    pub fn endpoint_url(&self) -> &str {
        &self.config.endpoint_url
    }

    /// Request a fresh signed URL for an object.
    ///
    /// The returned URL is absolute and valid for `expires_in`.
    pub async fn create_signed_url(
        &self,
        reference: &StorageReference,
        expires_in: Duration,
    ) -> StorageResult<String> {
        let expires_in_secs = expires_in.as_secs();
        if expires_in_secs == 0 {
            return Err(StorageError::InvalidExpiry(format!(
                "signed URL expiry must be at least one second, got {:?}",
                expires_in
            )));
        }

        let url = format!(
            "{}{}{}",
            self.config.endpoint_url,
            SIGN_ROUTE,
            reference.encoded_path()
        );
        let body = SignRequest {
            expires_in: expires_in_secs,
        };

        let span = info_span!(
            "storage_request",
            operation = "create_signed_url",
            container = %reference.container(),
            object_path = %reference.object_path()
        );

        async {
            let start = Instant::now();
            let result = self
                .http
                .post(&url)
                .bearer_auth(&self.config.api_key)
                .header("apikey", &self.config.api_key)
                .json(&body)
                .send()
                .await;

            let response = match result {
                Ok(response) => response,
                Err(e) => {
                    record_request("create_signed_url", 0, elapsed_ms(start));
                    return Err(StorageError::Network(e));
                }
            };

            let status = response.status();
            record_request("create_signed_url", status.as_u16(), elapsed_ms(start));

            if !status.is_success() {
                return Err(Self::handle_error_response(status, &url, response).await);
            }

            let parsed: SignResponse = response.json().await?;
            let signed = parsed
                .signed_url
                .filter(|s| !s.trim().is_empty())
                .ok_or_else(|| StorageError::invalid_response("response carried no signedURL"))?;

            let signed = self.resolve_signed_url(&signed)?;
            debug!("Issued signed URL for {}", reference);
            Ok(signed)
        }
        .instrument(span)
        .await
    }

    /// Turn the API's `signedURL` into an absolute link.
    ///
    /// The API may answer with a path relative to `/storage/v1`, which must
    /// point at the sign route. Absolute answers must be http(s) with a host.
    fn resolve_signed_url(&self, signed: &str) -> StorageResult<String> {
        let malformed =
            || StorageError::invalid_response(format!("malformed signedURL: {}", truncate(signed, 200)));

        if signed.chars().any(char::is_whitespace) {
            return Err(malformed());
        }

        let absolute = if signed.starts_with("http://") || signed.starts_with("https://") {
            signed.to_string()
        } else {
            let relative = signed.strip_prefix('/').unwrap_or(signed);
            if !relative.starts_with(SIGNED_RELATIVE_ROUTE) {
                return Err(malformed());
            }
            format!("{}{}/{}", self.config.endpoint_url, API_BASE, relative)
        };

        let parsed = Url::parse(&absolute).map_err(|_| malformed())?;
        let has_host = parsed.host_str().is_some_and(|host| !host.is_empty());
        if !matches!(parsed.scheme(), "http" | "https") || !has_host {
            return Err(malformed());
        }

        Ok(absolute)
    }

    async fn handle_error_response(
        status: StatusCode,
        url: &str,
        response: reqwest::Response,
    ) -> StorageError {
        let body = response.text().await.unwrap_or_default();
        StorageError::from_http_status(
            status.as_u16(),
            format!("{} failed with {}: {}", url, status, truncate(&body, 200)),
        )
    }
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

fn truncate(body: &str, max: usize) -> &str {
    match body.char_indices().nth(max) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}
