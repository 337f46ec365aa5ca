//! Analysis parameter bags and NDVI render options.

use serde::{Deserialize, Serialize};

use crate::{ImageryError, ImageryResult};

/// Maximum slope (degrees) the terrain service renders.
pub const MAX_SLOPE_DEGREES: f64 = 70.0;

/// Kind of analysis a parameter bag belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisKind {
    Hillshade,
    Slope,
    Ndvi,
}

impl AnalysisKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisKind::Hillshade => "hillshade",
            AnalysisKind::Slope => "slope",
            AnalysisKind::Ndvi => "ndvi",
        }
    }
}

/// Simulated sun position for hillshade rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HillshadeParameters {
    /// Degrees clockwise from north, `[0, 360]`.
    pub azimuth: f64,
    /// Degrees above the horizon, `[0, 90]`.
    pub altitude: f64,
}

impl Default for HillshadeParameters {
    fn default() -> Self {
        Self {
            azimuth: 315.0,
            altitude: 45.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlopeParameters {
    pub min_degrees: f64,
    pub max_degrees: f64,
    pub colormap: String,
}

impl Default for SlopeParameters {
    fn default() -> Self {
        Self {
            min_degrees: 0.0,
            max_degrees: MAX_SLOPE_DEGREES,
            colormap: "Spectral".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NdviParameters {
    /// Optional index cutoff in `[-1, 1]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f64>,
}

/// Exactly one active parameter bag per analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum AnalysisParameters {
    Hillshade(HillshadeParameters),
    Slope(SlopeParameters),
    Ndvi(NdviParameters),
}

impl AnalysisParameters {
    pub fn default_for(kind: AnalysisKind) -> Self {
        match kind {
            AnalysisKind::Hillshade => AnalysisParameters::Hillshade(Default::default()),
            AnalysisKind::Slope => AnalysisParameters::Slope(Default::default()),
            AnalysisKind::Ndvi => AnalysisParameters::Ndvi(Default::default()),
        }
    }

    pub fn kind(&self) -> AnalysisKind {
        match self {
            AnalysisParameters::Hillshade(_) => AnalysisKind::Hillshade,
            AnalysisParameters::Slope(_) => AnalysisKind::Slope,
            AnalysisParameters::Ndvi(_) => AnalysisKind::Ndvi,
        }
    }

    pub fn validate(&self) -> ImageryResult<()> {
        match self {
            AnalysisParameters::Hillshade(p) => {
                check_range("azimuth", p.azimuth, 0.0, 360.0)?;
                check_range("altitude", p.altitude, 0.0, 90.0)
            }
            AnalysisParameters::Slope(p) => {
                check_range("slope_min", p.min_degrees, 0.0, MAX_SLOPE_DEGREES)?;
                check_range("slope_max", p.max_degrees, 0.0, MAX_SLOPE_DEGREES)?;
                if p.min_degrees > p.max_degrees {
                    return Err(ImageryError::invalid_param(
                        "slope_range",
                        format!("min {} exceeds max {}", p.min_degrees, p.max_degrees),
                    ));
                }
                if p.colormap.is_empty()
                    || !p.colormap.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
                {
                    return Err(ImageryError::invalid_param(
                        "colormap",
                        format!("'{}' is not a colormap name", p.colormap),
                    ));
                }
                Ok(())
            }
            AnalysisParameters::Ndvi(p) => match p.threshold {
                Some(t) => check_range("threshold", t, -1.0, 1.0),
                None => Ok(()),
            },
        }
    }

    /// Flat key/value pairs appended to a render request.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        match self {
            AnalysisParameters::Hillshade(p) => vec![
                ("format".to_string(), "hillshade".to_string()),
                ("azimuth".to_string(), p.azimuth.to_string()),
                ("altitude".to_string(), p.altitude.to_string()),
            ],
            AnalysisParameters::Slope(p) => vec![
                ("format".to_string(), "slope".to_string()),
                ("colormap".to_string(), p.colormap.clone()),
                (
                    "slopeRange".to_string(),
                    format!("{},{}", p.min_degrees, p.max_degrees),
                ),
            ],
            AnalysisParameters::Ndvi(p) => p
                .threshold
                .map(|t| vec![("threshold".to_string(), t.to_string())])
                .unwrap_or_default(),
        }
    }
}

fn check_range(param: &str, value: f64, min: f64, max: f64) -> ImageryResult<()> {
    if !value.is_finite() || value < min || value > max {
        return Err(ImageryError::invalid_param(
            param,
            format!("{} is outside [{}, {}]", value, min, max),
        ));
    }
    Ok(())
}

/// Clustering algorithm applied to NDVI renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Clustering {
    Kmeans,
    Natural,
}

impl Clustering {
    pub fn as_str(&self) -> &'static str {
        match self {
            Clustering::Kmeans => "kmeans",
            Clustering::Natural => "natural",
        }
    }
}

/// Fixed calibration and clustering parameters sent with NDVI renders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NdviRenderOptions {
    pub calibrate: bool,
    pub clustering: Clustering,
    pub clusters_no: u32,
    /// Minimum cluster area in square meters.
    pub min_area: u32,
}

impl Default for NdviRenderOptions {
    fn default() -> Self {
        Self {
            calibrate: true,
            clustering: Clustering::Kmeans,
            clusters_no: 5,
            min_area: 2000,
        }
    }
}

impl NdviRenderOptions {
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        vec![
            (
                "CALIBRATE".to_string(),
                if self.calibrate { "1" } else { "0" }.to_string(),
            ),
            ("CLUSTERING".to_string(), self.clustering.as_str().to_string()),
            ("CLUSTERS_NO".to_string(), self.clusters_no.to_string()),
            ("MIN_AREA".to_string(), self.min_area.to_string()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        for kind in [AnalysisKind::Hillshade, AnalysisKind::Slope, AnalysisKind::Ndvi] {
            let params = AnalysisParameters::default_for(kind);
            assert_eq!(params.kind(), kind);
            params.validate().unwrap();
        }
    }

    #[test]
    fn test_hillshade_ranges() {
        let params = AnalysisParameters::Hillshade(HillshadeParameters {
            azimuth: 361.0,
            altitude: 45.0,
        });
        let err = params.validate().unwrap_err();
        assert!(matches!(
            err,
            ImageryError::InvalidAnalysisParameter { ref param, .. } if param == "azimuth"
        ));

        let params = AnalysisParameters::Hillshade(HillshadeParameters {
            azimuth: 0.0,
            altitude: 90.0,
        });
        params.validate().unwrap();
    }

    #[test]
    fn test_slope_range_order() {
        let params = AnalysisParameters::Slope(SlopeParameters {
            min_degrees: 40.0,
            max_degrees: 10.0,
            ..Default::default()
        });
        assert!(params.validate().is_err());

        let params = AnalysisParameters::Slope(SlopeParameters {
            min_degrees: 0.0,
            max_degrees: 71.0,
            ..Default::default()
        });
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_ndvi_threshold() {
        let params = AnalysisParameters::Ndvi(NdviParameters {
            threshold: Some(-1.5),
        });
        assert!(params.validate().is_err());

        let params = AnalysisParameters::Ndvi(NdviParameters {
            threshold: Some(0.35),
        });
        params.validate().unwrap();
        assert_eq!(
            params.query_pairs(),
            vec![("threshold".to_string(), "0.35".to_string())]
        );
        assert!(AnalysisParameters::default_for(AnalysisKind::Ndvi)
            .query_pairs()
            .is_empty());
    }

    #[test]
    fn test_query_pairs() {
        let pairs = AnalysisParameters::default_for(AnalysisKind::Hillshade).query_pairs();
        assert_eq!(pairs[0], ("format".to_string(), "hillshade".to_string()));
        assert_eq!(pairs[1], ("azimuth".to_string(), "315".to_string()));
        assert_eq!(pairs[2], ("altitude".to_string(), "45".to_string()));

        let pairs = AnalysisParameters::default_for(AnalysisKind::Slope).query_pairs();
        assert_eq!(pairs[1], ("colormap".to_string(), "Spectral".to_string()));
        assert_eq!(pairs[2], ("slopeRange".to_string(), "0,70".to_string()));
    }

    #[test]
    fn test_tagged_serde() {
        let json = r#"{"kind":"hillshade","azimuth":90,"altitude":30}"#;
        let params: AnalysisParameters = serde_json::from_str(json).unwrap();
        assert_eq!(
            params,
            AnalysisParameters::Hillshade(HillshadeParameters {
                azimuth: 90.0,
                altitude: 30.0
            })
        );
    }

    #[test]
    fn test_ndvi_render_options_default() {
        let pairs = NdviRenderOptions::default().query_pairs();
        let rendered: Vec<String> = pairs.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
        assert_eq!(
            rendered,
            vec!["CALIBRATE=1", "CLUSTERING=kmeans", "CLUSTERS_NO=5", "MIN_AREA=2000"]
        );
    }
}
