//! Satellite scene identifiers.
//!
//! Identifiers come from the provider's search results and are parsed once
//! into a [`SceneId`] variant. Path building dispatches on the variant instead
//! of re-inspecting the raw string.
//!
//! Sentinel-2: `S2C_tile_20250204_17MPT_0`
//! ```text
//! mission _ "tile" _ YYYYMMDD _ {zone:2}{band:1}{square:2} _ version
//! ```
//! Landsat: any other path-safe id; `LC09` prefix means Landsat 9.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::{ImageryError, ImageryResult};

const SENTINEL_PREFIX: &str = "S2";
const LANDSAT_9_PREFIX: &str = "LC09";
const SENTINEL_FIELD_COUNT: usize = 5;

/// A parsed satellite scene identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneId {
    Sentinel2(SentinelSceneId),
    Landsat(LandsatSceneId),
}

impl SceneId {
    pub fn parse(raw: &str) -> ImageryResult<Self> {
        if raw.starts_with(SENTINEL_PREFIX) {
            SentinelSceneId::parse(raw).map(SceneId::Sentinel2)
        } else {
            LandsatSceneId::parse(raw).map(SceneId::Landsat)
        }
    }

    pub fn is_sentinel(&self) -> bool {
        matches!(self, SceneId::Sentinel2(_))
    }

    /// The identifier exactly as issued by the provider.
    pub fn as_str(&self) -> &str {
        match self {
            SceneId::Sentinel2(s) => &s.raw,
            SceneId::Landsat(l) => &l.raw,
        }
    }
}

impl FromStr for SceneId {
    type Err = ImageryError;

    fn from_str(s: &str) -> ImageryResult<Self> {
        SceneId::parse(s)
    }
}

impl fmt::Display for SceneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sentinel-2 tile-pass identifier, decomposed positionally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentinelSceneId {
    raw: String,
    /// `S2A`, `S2B`, `S2C`, ...
    pub mission: String,
    pub date: NaiveDate,
    /// Two-digit UTM zone, kept as written (`07`, `17`).
    pub utm_zone: String,
    pub latitude_band: char,
    /// Two-letter 100km grid square.
    pub grid_square: String,
    pub version: String,
}

impl SentinelSceneId {
    pub fn parse(raw: &str) -> ImageryResult<Self> {
        let fields: Vec<&str> = raw.split('_').collect();
        if fields.len() != SENTINEL_FIELD_COUNT {
            return Err(ImageryError::malformed_scene(
                raw,
                format!(
                    "expected {} underscore-separated fields, found {}",
                    SENTINEL_FIELD_COUNT,
                    fields.len()
                ),
            ));
        }

        let mission = fields[0];
        let mission_ok = mission.len() == 3
            && mission.starts_with(SENTINEL_PREFIX)
            && mission.as_bytes()[2].is_ascii_uppercase();
        if !mission_ok {
            return Err(ImageryError::malformed_scene(
                raw,
                format!("unknown Sentinel-2 mission '{}'", mission),
            ));
        }

        if fields[1] != "tile" {
            return Err(ImageryError::malformed_scene(
                raw,
                format!("expected 'tile' marker, found '{}'", fields[1]),
            ));
        }

        let date = parse_date(raw, fields[2])?;
        let (utm_zone, latitude_band, grid_square) = parse_tile_code(raw, fields[3])?;

        let version = fields[4];
        if version.is_empty() || !version.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(ImageryError::malformed_scene(
                raw,
                format!("invalid version token '{}'", version),
            ));
        }

        Ok(Self {
            raw: raw.to_string(),
            mission: mission.to_string(),
            date,
            utm_zone,
            latitude_band,
            grid_square,
            version: version.to_string(),
        })
    }

    /// `S2/{zone}/{band}/{square}/{year}/{month}/{day}/{version}`
    ///
    /// Month and day are written without zero padding.
    pub fn path_prefix(&self) -> String {
        format!(
            "S2/{}/{}/{}/{}/{}/{}/{}",
            self.utm_zone,
            self.latitude_band,
            self.grid_square,
            self.date.year(),
            self.date.month(),
            self.date.day(),
            self.version
        )
    }
}

fn parse_date(raw: &str, field: &str) -> ImageryResult<NaiveDate> {
    if field.len() != 8 || !field.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ImageryError::malformed_scene(
            raw,
            format!("date '{}' is not YYYYMMDD", field),
        ));
    }

    NaiveDate::parse_from_str(field, "%Y%m%d").map_err(|_| {
        ImageryError::malformed_scene(raw, format!("date '{}' is not a calendar date", field))
    })
}

fn parse_tile_code(raw: &str, field: &str) -> ImageryResult<(String, char, String)> {
    let chars: Vec<char> = field.chars().collect();
    let well_formed = chars.len() == 5
        && chars[..2].iter().all(|c| c.is_ascii_digit())
        && chars[2..].iter().all(|c| c.is_ascii_alphabetic());

    if !well_formed {
        return Err(ImageryError::malformed_scene(
            raw,
            format!("tile code '{}' is not {{zone:2}}{{band:1}}{{square:2}}", field),
        ));
    }

    Ok((
        chars[..2].iter().collect(),
        chars[2],
        chars[3..].iter().collect(),
    ))
}

/// Landsat satellite family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LandsatFamily {
    Landsat8,
    Landsat9,
}

impl LandsatFamily {
    /// Path token used by the render service.
    pub fn token(&self) -> &'static str {
        match self {
            LandsatFamily::Landsat8 => "L8",
            LandsatFamily::Landsat9 => "L9",
        }
    }
}

/// Opaque Landsat scene identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LandsatSceneId {
    raw: String,
    pub family: LandsatFamily,
}

impl LandsatSceneId {
    pub fn parse(raw: &str) -> ImageryResult<Self> {
        if raw.is_empty() {
            return Err(ImageryError::malformed_scene(raw, "identifier is empty"));
        }
        if let Some(c) = raw
            .chars()
            .find(|c| matches!(c, '/' | '?' | '#' | '%') || c.is_whitespace())
        {
            return Err(ImageryError::malformed_scene(
                raw,
                format!("character {:?} is not allowed in a path segment", c),
            ));
        }

        let family = if raw.starts_with(LANDSAT_9_PREFIX) {
            LandsatFamily::Landsat9
        } else {
            LandsatFamily::Landsat8
        };

        Ok(Self {
            raw: raw.to_string(),
            family,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sentinel() {
        let scene = SceneId::parse("S2C_tile_20250204_17MPT_0").unwrap();
        let SceneId::Sentinel2(s2) = &scene else {
            panic!("expected Sentinel-2, got {:?}", scene);
        };
        assert_eq!(s2.mission, "S2C");
        assert_eq!(s2.date, NaiveDate::from_ymd_opt(2025, 2, 4).unwrap());
        assert_eq!(s2.utm_zone, "17");
        assert_eq!(s2.latitude_band, 'M');
        assert_eq!(s2.grid_square, "PT");
        assert_eq!(s2.version, "0");
        assert_eq!(s2.path_prefix(), "S2/17/M/PT/2025/2/4/0");
        assert_eq!(scene.to_string(), "S2C_tile_20250204_17MPT_0");
    }

    #[test]
    fn test_sentinel_keeps_zone_padding() {
        let scene = SentinelSceneId::parse("S2A_tile_20231130_07VCG_1").unwrap();
        assert_eq!(scene.path_prefix(), "S2/07/V/CG/2023/11/30/1");
    }

    #[test]
    fn test_sentinel_wrong_field_count() {
        let err = SceneId::parse("S2C_badformat").unwrap_err();
        assert!(matches!(err, ImageryError::MalformedSceneIdentifier { .. }));
        assert!(err.to_string().contains("found 2"));

        assert!(SceneId::parse("S2C_tile_20250204_17MPT_0_extra").is_err());
    }

    #[test]
    fn test_sentinel_bad_date() {
        assert!(SceneId::parse("S2C_tile_2025020X_17MPT_0").is_err());
        assert!(SceneId::parse("S2C_tile_2025024_17MPT_0").is_err());
        assert!(SceneId::parse("S2C_tile_20250231_17MPT_0").is_err());
    }

    #[test]
    fn test_sentinel_bad_tile_code() {
        assert!(SceneId::parse("S2C_tile_20250204_17MP_0").is_err());
        assert!(SceneId::parse("S2C_tile_20250204_1MMPT_0").is_err());
        assert!(SceneId::parse("S2C_tile_20250204_17M1T_0").is_err());
    }

    #[test]
    fn test_sentinel_bad_marker_and_version() {
        assert!(SceneId::parse("S2C_tyle_20250204_17MPT_0").is_err());
        assert!(SceneId::parse("S2C_tile_20250204_17MPT_").is_err());
        assert!(SceneId::parse("S2_tile_20250204_17MPT_0").is_err());
    }

    #[test]
    fn test_parse_landsat_family() {
        let l9 = SceneId::parse("LC09_L2SP_001001_20240101").unwrap();
        assert_eq!(
            l9,
            SceneId::Landsat(LandsatSceneId {
                raw: "LC09_L2SP_001001_20240101".to_string(),
                family: LandsatFamily::Landsat9,
            })
        );

        let SceneId::Landsat(l8) = SceneId::parse("LC08_L1TP_042034_20240115").unwrap() else {
            panic!("expected Landsat");
        };
        assert_eq!(l8.family, LandsatFamily::Landsat8);
        assert_eq!(l8.family.token(), "L8");
    }

    #[test]
    fn test_landsat_rejects_unsafe_ids() {
        assert!(SceneId::parse("").is_err());
        assert!(SceneId::parse("LC08/../admin").is_err());
        assert!(SceneId::parse("LC08 x").is_err());
        assert!(SceneId::parse("LC08?api_key=x").is_err());
    }
}
