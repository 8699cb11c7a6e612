use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Conversion options suitable for config files
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionParams {
    /// Prefer the geometry of the USGS STAC record over the locally derived one
    /// (ignored for OLI-TIRS)
    pub use_usgs_geometry: bool,
    /// Fail instead of skipping on missing USGS records or unmapped assets
    pub strict: bool,
    /// Attach `raster:bands` to band assets
    pub raster_bands: bool,
}

impl Default for ConversionParams {
    fn default() -> Self {
        Self {
            use_usgs_geometry: false,
            strict: false,
            raster_bands: true,
        }
    }
}

impl ConversionParams {
    /// Load parameters from a JSON file; missing keys keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let params: ConversionParams = serde_json::from_str(r#"{ "strict": true }"#).unwrap();
        assert_eq!(
            params,
            ConversionParams {
                strict: true,
                ..ConversionParams::default()
            }
        );
        assert!(params.raster_bands);
        assert!(!params.use_usgs_geometry);
    }
}
