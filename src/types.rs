//! Shared types and enums used across landsat-stac.
//! Includes the sensor classifier (`Sensor`, `InstrumentFamily`, `ProductGroup`),
//! the positional Landsat scene identifier (`SceneId`) and `ItemSource`.
use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Landsat sensor generation, encoded as the second character of a scene identifier.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub enum Sensor {
    /// Multispectral Scanner System (Landsat 1-5)
    Mss,
    /// Thematic Mapper (Landsat 4-5)
    Tm,
    /// Enhanced Thematic Mapper Plus (Landsat 7)
    Etm,
    /// Operational Land Imager / Thermal Infrared Sensor (Landsat 8-9)
    OliTirs,
}

impl Sensor {
    pub fn from_code(code: char) -> Option<Self> {
        match code {
            'M' => Some(Sensor::Mss),
            'T' => Some(Sensor::Tm),
            'E' => Some(Sensor::Etm),
            'C' => Some(Sensor::OliTirs),
            _ => None,
        }
    }

    /// Classify a scene identifier by its sensor character (offset 1).
    pub fn from_identifier(id: &str) -> Result<Self> {
        let code = id
            .chars()
            .nth(1)
            .ok_or_else(|| Error::invalid_identifier(id, "identifier too short"))?;
        Sensor::from_code(code).ok_or_else(|| {
            Error::invalid_identifier(id, format!("unrecognized sensor code `{}`", code))
        })
    }

    pub fn family(&self) -> InstrumentFamily {
        match self {
            Sensor::Mss => InstrumentFamily::Mss,
            Sensor::Tm | Sensor::Etm => InstrumentFamily::TmEtm,
            Sensor::OliTirs => InstrumentFamily::OliTirs,
        }
    }

    /// Lower-case instrument names as they appear in `instruments`.
    pub fn instruments(&self) -> &'static [&'static str] {
        match self {
            Sensor::Mss => &["mss"],
            Sensor::Tm => &["tm"],
            Sensor::Etm => &["etm"],
            Sensor::OliTirs => &["oli", "tirs"],
        }
    }

    /// Path segment used by the USGS stac-browser (`oli-tirs`, `tm`, ...).
    pub fn instrument_dir(&self) -> String {
        self.instruments().join("-")
    }

    /// Sensors whose USGS records are split into SR and ST items.
    pub fn has_split_products(&self) -> bool {
        matches!(self, Sensor::Tm | Sensor::Etm | Sensor::OliTirs)
    }
}

impl std::fmt::Display for Sensor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Sensor::Mss => "MSS",
            Sensor::Tm => "TM",
            Sensor::Etm => "ETM+",
            Sensor::OliTirs => "OLI-TIRS",
        };
        write!(f, "{}", s)
    }
}

/// Groups of sensors sharing one asset/band schema.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub enum InstrumentFamily {
    Mss,
    TmEtm,
    OliTirs,
}

/// Level-2 product groups: surface reflectance and surface temperature.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub enum ProductGroup {
    Sr,
    St,
}

impl ProductGroup {
    pub fn suffix(&self) -> &'static str {
        match self {
            ProductGroup::Sr => "SR",
            ProductGroup::St => "ST",
        }
    }

    pub fn from_suffix(s: &str) -> Option<Self> {
        match s {
            "SR" => Some(ProductGroup::Sr),
            "ST" => Some(ProductGroup::St),
            _ => None,
        }
    }
}

/// Which source an Item is assembled from.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug, Serialize, Deserialize)]
pub enum ItemSource {
    /// MTL/ANG metadata files
    Mtl,
    /// STAC records published by USGS next to the product
    Usgs,
}

impl std::fmt::Display for ItemSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ItemSource::Mtl => write!(f, "mtl"),
            ItemSource::Usgs => write!(f, "usgs"),
        }
    }
}

/// Positional decoding of `LXSS_LLLL_PPPRRR_YYYYMMDD_yyyymmdd_CC_TX[_GG]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneId {
    pub sensor: Sensor,
    pub satellite: u8,
    /// Processing level code, e.g. `L1GS` or `L2SP`
    pub level_code: String,
    /// Numeric processing level (1 or 2)
    pub level: u8,
    pub wrs_path: String,
    pub wrs_row: String,
    pub acquired: NaiveDate,
    pub processed: NaiveDate,
    pub collection_number: String,
    pub tier: String,
    /// Trailing product group of split USGS records (`_SR`, `_ST`)
    pub product_group: Option<ProductGroup>,
}

impl SceneId {
    pub fn parse(id: &str) -> Result<Self> {
        let parts: Vec<&str> = id.split('_').collect();
        if parts.len() < 7 || parts.len() > 8 {
            return Err(Error::invalid_identifier(
                id,
                format!("expected 7 or 8 `_` segments, got {}", parts.len()),
            ));
        }

        let sensor = Sensor::from_identifier(id)?;
        let satellite = parts[0]
            .get(2..4)
            .and_then(|s| s.parse::<u8>().ok())
            .ok_or_else(|| Error::invalid_identifier(id, "satellite number is not numeric"))?;

        let level_code = parts[1];
        let level = level_code
            .chars()
            .nth(1)
            .and_then(|c| c.to_digit(10))
            .ok_or_else(|| Error::invalid_identifier(id, "processing level is not numeric"))?
            as u8;

        let path_row = parts[2];
        if path_row.len() != 6 {
            return Err(Error::invalid_identifier(id, "path/row must be 6 digits"));
        }

        let parse_date = |s: &str, what: &str| {
            NaiveDate::parse_from_str(s, "%Y%m%d")
                .map_err(|_| Error::invalid_identifier(id, format!("invalid {} `{}`", what, s)))
        };

        let product_group = match parts.get(7) {
            Some(s) => Some(ProductGroup::from_suffix(s).ok_or_else(|| {
                Error::invalid_identifier(id, format!("unknown product group `{}`", s))
            })?),
            None => None,
        };

        Ok(SceneId {
            sensor,
            satellite,
            level_code: level_code.to_string(),
            level,
            wrs_path: path_row[..3].to_string(),
            wrs_row: path_row[3..].to_string(),
            acquired: parse_date(parts[3], "acquisition date")?,
            processed: parse_date(parts[4], "processing date")?,
            collection_number: parts[5].to_string(),
            tier: parts[6].to_string(),
            product_group,
        })
    }

    pub fn platform(&self) -> String {
        format!("landsat-{}", self.satellite)
    }
}

/// Sensor, satellite number and numeric processing level read from fixed
/// offsets of an identifier, without validating the remaining segments.
pub fn classify(id: &str) -> Result<(Sensor, u8, u8)> {
    let sensor = Sensor::from_identifier(id)?;
    let satellite = id
        .get(2..4)
        .and_then(|s| s.parse::<u8>().ok())
        .ok_or_else(|| Error::invalid_identifier(id, "satellite number is not numeric"))?;
    let level = id
        .chars()
        .nth(6)
        .and_then(|c| c.to_digit(10))
        .ok_or_else(|| Error::invalid_identifier(id, "processing level is not numeric"))?;
    Ok((sensor, satellite, level as u8))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sensor_codes_map_to_families() {
        assert_eq!(Sensor::from_identifier("LM01").unwrap(), Sensor::Mss);
        assert_eq!(Sensor::from_identifier("LT05").unwrap(), Sensor::Tm);
        assert_eq!(Sensor::from_identifier("LE07").unwrap(), Sensor::Etm);
        assert_eq!(Sensor::from_identifier("LC09").unwrap(), Sensor::OliTirs);
        assert_eq!(Sensor::Etm.family(), Sensor::Tm.family());
    }

    #[test]
    fn unknown_sensor_code_is_rejected() {
        for id in ["LX08_L2SP", "LO08_L1TP", "L", ""] {
            match Sensor::from_identifier(id) {
                Err(Error::InvalidIdentifier { .. }) => {}
                other => panic!("expected invalid identifier for {id:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn scene_id_positions() {
        let id = SceneId::parse("LT04_L2SP_002026_19830110_20200918_02_T1").unwrap();
        assert_eq!(id.sensor, Sensor::Tm);
        assert_eq!(id.satellite, 4);
        assert_eq!(id.level, 2);
        assert_eq!(id.level_code, "L2SP");
        assert_eq!(id.wrs_path, "002");
        assert_eq!(id.wrs_row, "026");
        assert_eq!(id.acquired, NaiveDate::from_ymd_opt(1983, 1, 10).unwrap());
        assert_eq!(id.tier, "T1");
        assert_eq!(id.product_group, None);
        assert_eq!(id.platform(), "landsat-4");

        let split = SceneId::parse("LT04_L2SP_002026_19830110_20200918_02_T1_ST").unwrap();
        assert_eq!(split.product_group, Some(ProductGroup::St));
    }

    #[test]
    fn classify_reads_fixed_offsets() {
        let (sensor, satellite, level) =
            classify("LM01_L1GS_001010_19720908_20200909_02_T2").unwrap();
        assert_eq!(sensor, Sensor::Mss);
        assert_eq!(satellite, 1);
        assert_eq!(level, 1);
        assert!(classify("LC0X_L2SP").is_err());
    }

    #[test]
    fn instrument_dir_joins_instruments() {
        assert_eq!(Sensor::OliTirs.instrument_dir(), "oli-tirs");
        assert_eq!(Sensor::Mss.instrument_dir(), "mss");
    }
}
