//! HTTP client for the imagery provider.
//!
//! The API key is sent as the `x-api-key` header on every call and never
//! appears in a URL, so logged URLs are safe to keep.

use std::time::Duration;

use anyhow::{Context, Result};
use bytes::Bytes;
use imagery_common::{ImageryConfig, ImageryRequest, SceneSearchRequest};
use reqwest::{header, Client, Response};
use serde_json::Value;
use tracing::{debug, instrument};

use crate::error::ApiError;
use crate::metrics::record_upstream_error;

const API_KEY_HEADER: &str = "x-api-key";

/// Image bytes returned by the provider.
#[derive(Debug, Clone)]
pub struct UpstreamImage {
    pub content_type: String,
    pub bytes: Bytes,
}

/// Client for the provider's render and search endpoints.
pub struct EosdaClient {
    client: Client,
    render_base: String,
    search_url: String,
    api_key: Option<String>,
}

impl EosdaClient {
    pub fn new(config: &ImageryConfig, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .pool_max_idle_per_host(8)
            .tcp_nodelay(true)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            render_base: config.render_base().to_string(),
            search_url: config.search_url.clone(),
            api_key: config.api_key.clone(),
        })
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    fn api_key(&self) -> Result<&str, ApiError> {
        self.api_key.as_deref().ok_or(ApiError::MissingApiKey)
    }

    fn render_url(&self, request: &ImageryRequest) -> String {
        format!("{}/{}", self.render_base, request.path)
    }

    /// Fetch a rendered tile. The response must carry an `image/*` content type.
    #[instrument(skip(self, request), fields(path = %request.relative_url()))]
    pub async fn fetch_image(&self, request: &ImageryRequest) -> Result<UpstreamImage, ApiError> {
        let result = self.fetch_image_inner(request).await;
        record_failure(&result);
        result
    }

    async fn fetch_image_inner(&self, request: &ImageryRequest) -> Result<UpstreamImage, ApiError> {
        let api_key = self.api_key()?;

        let response = self
            .client
            .get(self.render_url(request))
            .query(&request.query)
            .header(API_KEY_HEADER, api_key)
            .header(header::ACCEPT, "image/png")
            .send()
            .await?;
        let response = check_status(response).await?;

        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();
        if !content_type.starts_with("image/") {
            return Err(ApiError::UnexpectedContentType(content_type));
        }

        let bytes = response.bytes().await?;
        debug!(bytes = bytes.len(), content_type = %content_type, "Fetched image");

        Ok(UpstreamImage {
            content_type,
            bytes,
        })
    }

    /// Post a scene search and return the provider's JSON unchanged.
    #[instrument(skip(self, body), fields(page = body.page, limit = body.limit))]
    pub async fn search(&self, body: &SceneSearchRequest) -> Result<Value, ApiError> {
        let result = self.search_inner(body).await;
        record_failure(&result);
        result
    }

    async fn search_inner(&self, body: &SceneSearchRequest) -> Result<Value, ApiError> {
        let api_key = self.api_key()?;

        let response = self
            .client
            .post(&self.search_url)
            .header(API_KEY_HEADER, api_key)
            .json(body)
            .send()
            .await?;
        let response = check_status(response).await?;

        response
            .json::<Value>()
            .await
            .map_err(|e| ApiError::MalformedUpstream(e.to_string()))
    }

    /// Elevation in meters at a point.
    #[instrument(skip(self, request), fields(path = %request.path))]
    pub async fn point_elevation(&self, request: &ImageryRequest) -> Result<f64, ApiError> {
        let result = self.point_elevation_inner(request).await;
        record_failure(&result);
        result
    }

    async fn point_elevation_inner(&self, request: &ImageryRequest) -> Result<f64, ApiError> {
        let api_key = self.api_key()?;

        let response = self
            .client
            .get(self.render_url(request))
            .header(API_KEY_HEADER, api_key)
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;
        let response = check_status(response).await?;

        let body = response
            .json::<Value>()
            .await
            .map_err(|e| ApiError::MalformedUpstream(e.to_string()))?;
        extract_elevation(&body)
    }
}

/// Read the elevation from a point response (`elevation`, else `index_value`).
pub fn extract_elevation(body: &Value) -> Result<f64, ApiError> {
    body.get("elevation")
        .and_then(Value::as_f64)
        .or_else(|| body.get("index_value").and_then(Value::as_f64))
        .ok_or_else(|| {
            ApiError::MalformedUpstream("point response has no elevation value".to_string())
        })
}

async fn check_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response.text().await.unwrap_or_default();
    Err(ApiError::Upstream {
        status: status.as_u16(),
        message,
    })
}

fn record_failure<T>(result: &Result<T, ApiError>) {
    if let Some(kind) = result.as_ref().err().and_then(ApiError::upstream_kind) {
        record_upstream_error(kind);
    }
}
