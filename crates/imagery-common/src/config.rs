//! Imagery provider configuration.

use serde::{Deserialize, Serialize};

use crate::{GeoPoint, NdviRenderOptions};

pub const DEFAULT_RENDER_URL: &str = "https://api-connect.eos.com/api/render";
pub const DEFAULT_SEARCH_URL: &str = "https://api-connect.eos.com/api/lms/search/v2";

/// Provider endpoints, credentials, and pipeline defaults.
///
/// Passed explicitly into request builders so resolution stays
/// deterministic under test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageryConfig {
    /// Base URL that relative render paths are appended to.
    pub render_base_url: String,
    /// Scene search endpoint.
    pub search_url: String,
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// Returned by the centroid helper when a field geometry is invalid.
    pub fallback_center: GeoPoint,
    pub default_zoom: u32,
    pub ndvi: NdviRenderOptions,
}

impl Default for ImageryConfig {
    fn default() -> Self {
        Self {
            render_base_url: DEFAULT_RENDER_URL.to_string(),
            search_url: DEFAULT_SEARCH_URL.to_string(),
            api_key: None,
            fallback_center: GeoPoint::new(-2.063534, -79.671282),
            default_zoom: 15,
            ndvi: NdviRenderOptions::default(),
        }
    }
}

impl ImageryConfig {
    /// Defaults overlaid with environment variables.
    ///
    /// Reads `EOSDA_API_KEY`, `EOSDA_RENDER_URL`, `EOSDA_SEARCH_URL`, and
    /// `IMAGERY_DEFAULT_ZOOM`.
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Apply environment variables on top of an existing config.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(key) = std::env::var("EOSDA_API_KEY") {
            if !key.trim().is_empty() {
                self.api_key = Some(key.trim().to_string());
            }
        }
        if let Ok(url) = std::env::var("EOSDA_RENDER_URL") {
            self.render_base_url = url;
        }
        if let Ok(url) = std::env::var("EOSDA_SEARCH_URL") {
            self.search_url = url;
        }
        if let Some(zoom) = std::env::var("IMAGERY_DEFAULT_ZOOM")
            .ok()
            .and_then(|s| s.parse().ok())
        {
            self.default_zoom = zoom;
        }
        self
    }

    /// Render base URL without a trailing slash.
    pub fn render_base(&self) -> &str {
        self.render_base_url.trim_end_matches('/')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ImageryConfig::default();
        assert_eq!(config.render_base(), "https://api-connect.eos.com/api/render");
        assert_eq!(config.default_zoom, 15);
        assert!(config.api_key.is_none());
        assert_eq!(config.ndvi.clusters_no, 5);
    }

    #[test]
    fn test_partial_deserialization_keeps_defaults() {
        let config: ImageryConfig =
            serde_json::from_str(r#"{"render_base_url":"http://localhost:9000/render/"}"#)
                .unwrap();
        assert_eq!(config.render_base(), "http://localhost:9000/render");
        assert_eq!(config.search_url, DEFAULT_SEARCH_URL);
        assert_eq!(config.fallback_center, GeoPoint::new(-2.063534, -79.671282));
    }

    #[test]
    fn test_api_key_not_serialized() {
        let config = ImageryConfig {
            api_key: Some("secret".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("secret"));
    }
}
