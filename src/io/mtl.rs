use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use quick_xml::Reader;
use quick_xml::events::Event;
use serde_json::{Map, Value};
use tracing::info;

use super::fields::{MetadataError, MetadataFields};
use super::href::HrefReader;
use super::odl::parse_odl;

const PRODUCT: &str = "PRODUCT_CONTENTS";
const IMAGE: &str = "IMAGE_ATTRIBUTES";
const PROJECTION: &str = "PROJECTION_ATTRIBUTES";

/// Linear rescaling of a band's digital numbers: `value = dn * scale + offset`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rescale {
    pub scale: f64,
    pub offset: f64,
}

/// Scene-level values extracted from a Collection 2 MTL file (`_MTL.xml` or `_MTL.txt`)
#[derive(Debug, Clone, PartialEq)]
pub struct MtlMetadata {
    /// Full product identifier, including processing date
    pub product_id: String,
    /// Product identifier without the processing date
    pub item_id: String,
    /// e.g. `L1GS`, `L1TP`, `L2SP`
    pub processing_level: String,
    pub scene_datetime: DateTime<Utc>,
    /// WGS84 bounds `[west, south, east, north]` of the product corners
    pub bbox: [f64; 4],
    /// Projected bounds, padded from pixel centres to pixel edges
    pub proj_bbox: [f64; 4],
    pub epsg: u32,
    pub sr_shape: [u32; 2],
    pub sr_transform: [f64; 6],
    pub thermal_shape: Option<[u32; 2]>,
    pub thermal_transform: Option<[f64; 6]>,
    pub cloud_cover: f64,
    pub sun_azimuth: f64,
    pub sun_elevation: f64,
    pub off_nadir: Option<f64>,
    /// Zero-padded to three digits, as in the scene identifier
    pub wrs_path: String,
    pub wrs_row: String,
    /// `landsat:*` extension properties
    pub landsat_metadata: Map<String, Value>,
    /// Rescaling keyed by asset key (`B4`, `SR_B1`, `ST_B10`, ...)
    pub rescaling: BTreeMap<String, Rescale>,
}

impl MtlMetadata {
    /// Read an MTL file, choosing the XML or text parser from the extension.
    pub fn from_href(reader: &HrefReader, href: &str) -> Result<Self, MetadataError> {
        info!("Reading MTL metadata from {}", href);
        let text = reader.read_to_string(href)?;
        if href.to_ascii_lowercase().ends_with(".xml") {
            Self::from_xml_str(&text)
        } else {
            Self::from_txt_str(&text)
        }
    }

    pub fn from_xml_str(text: &str) -> Result<Self, MetadataError> {
        Self::from_fields(&parse_mtl_xml(text)?)
    }

    pub fn from_txt_str(text: &str) -> Result<Self, MetadataError> {
        Self::from_fields(&parse_odl(text)?)
    }

    pub fn from_fields(fields: &MetadataFields) -> Result<Self, MetadataError> {
        let product_id = fields.text(&key(PRODUCT, "LANDSAT_PRODUCT_ID"))?.to_string();
        let id_parts: Vec<&str> = product_id.split('_').collect();
        if id_parts.len() != 7 {
            return Err(MetadataError::InvalidValue {
                field: key(PRODUCT, "LANDSAT_PRODUCT_ID"),
                value: product_id,
            });
        }
        // products that differ only by processing date describe the same scene
        let item_id = [&id_parts[..4], &id_parts[5..]].concat().join("_");

        let processing_level = fields.text(&key(PRODUCT, "PROCESSING_LEVEL"))?.to_string();
        let scene_datetime = scene_datetime(fields)?;

        let corner = |name: &str| fields.f64(&key(PROJECTION, name));
        let lons = [
            corner("CORNER_UL_LON_PRODUCT")?,
            corner("CORNER_UR_LON_PRODUCT")?,
            corner("CORNER_LL_LON_PRODUCT")?,
            corner("CORNER_LR_LON_PRODUCT")?,
        ];
        let lats = [
            corner("CORNER_UL_LAT_PRODUCT")?,
            corner("CORNER_UR_LAT_PRODUCT")?,
            corner("CORNER_LL_LAT_PRODUCT")?,
            corner("CORNER_LR_LAT_PRODUCT")?,
        ];
        let bbox = [
            lons.iter().copied().fold(f64::INFINITY, f64::min),
            lats.iter().copied().fold(f64::INFINITY, f64::min),
            lons.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            lats.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        ];

        // corner coordinates are pixel centres; transforms address pixel edges
        let sr_gsd = corner("GRID_CELL_SIZE_REFLECTIVE")?;
        let padding = sr_gsd / 2.0;
        let xmin = corner("CORNER_UL_PROJECTION_X_PRODUCT")? - padding;
        let ymin = corner("CORNER_LL_PROJECTION_Y_PRODUCT")? - padding;
        let xmax = corner("CORNER_UR_PROJECTION_X_PRODUCT")? + padding;
        let ymax = corner("CORNER_UL_PROJECTION_Y_PRODUCT")? + padding;
        let proj_bbox = [xmin, ymin, xmax, ymax];

        let sr_shape = [
            fields.u32(&key(PROJECTION, "REFLECTIVE_LINES"))?,
            fields.u32(&key(PROJECTION, "REFLECTIVE_SAMPLES"))?,
        ];
        let sr_transform = [sr_gsd, 0.0, xmin, 0.0, -sr_gsd, ymax];

        let thermal_gsd = fields.opt_f64(&key(PROJECTION, "GRID_CELL_SIZE_THERMAL"))?;
        let thermal_shape = match (
            fields.opt_u32(&key(PROJECTION, "THERMAL_LINES"))?,
            fields.opt_u32(&key(PROJECTION, "THERMAL_SAMPLES"))?,
        ) {
            (Some(lines), Some(samples)) => Some([lines, samples]),
            _ => None,
        };
        let thermal_transform = thermal_gsd.map(|gsd| [gsd, 0.0, xmin, 0.0, -gsd, ymax]);

        let epsg = epsg(fields, &bbox)?;

        let wrs_path = format!("{:03}", fields.u32(&key(IMAGE, "WRS_PATH"))?);
        let wrs_row = format!("{:03}", fields.u32(&key(IMAGE, "WRS_ROW"))?);

        let mut landsat_metadata = landsat_metadata(fields, &processing_level)?;
        landsat_metadata.insert("landsat:wrs_path".into(), Value::from(wrs_path.as_str()));
        landsat_metadata.insert("landsat:wrs_row".into(), Value::from(wrs_row.as_str()));

        Ok(MtlMetadata {
            product_id,
            item_id,
            processing_level,
            scene_datetime,
            bbox,
            proj_bbox,
            epsg,
            sr_shape,
            sr_transform,
            thermal_shape,
            thermal_transform,
            cloud_cover: fields.f64(&key(IMAGE, "CLOUD_COVER"))?,
            sun_azimuth: fields.f64(&key(IMAGE, "SUN_AZIMUTH"))?,
            sun_elevation: fields.f64(&key(IMAGE, "SUN_ELEVATION"))?,
            off_nadir: fields.opt_f64(&key(IMAGE, "ROLL_ANGLE"))?.map(f64::abs),
            wrs_path,
            wrs_row,
            landsat_metadata,
            rescaling: rescaling(fields),
        })
    }
}

/// Flatten an MTL XML document into `PARENT/ELEMENT` fields.
pub fn parse_mtl_xml(text: &str) -> Result<MetadataFields, MetadataError> {
    let mut reader = Reader::from_str(text);
    reader.trim_text(true);
    let mut buf = Vec::new();
    let mut path: Vec<String> = Vec::new();
    let mut fields = MetadataFields::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(ref e) => {
                path.push(String::from_utf8_lossy(e.name().as_ref()).to_string());
            }
            Event::End(_) => {
                path.pop();
            }
            Event::Text(e) => {
                let txt = e.unescape()?;
                if let [.., group, field] = path.as_slice() {
                    fields.insert(group, field, txt.to_string());
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if fields.is_empty() {
        return Err(MetadataError::MissingField("MTL document has no fields".into()));
    }
    Ok(fields)
}

fn key(group: &str, field: &str) -> String {
    format!("{}/{}", group, field)
}

fn scene_datetime(fields: &MetadataFields) -> Result<DateTime<Utc>, MetadataError> {
    let date = fields.text(&key(IMAGE, "DATE_ACQUIRED"))?;
    let time = fields.text(&key(IMAGE, "SCENE_CENTER_TIME"))?;
    let zoned = if time.ends_with('Z') {
        time.to_string()
    } else {
        format!("{}Z", time)
    };
    let stamp = format!("{}T{}", date, zoned);
    DateTime::parse_from_rfc3339(&stamp)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| MetadataError::InvalidValue {
            field: key(IMAGE, "SCENE_CENTER_TIME"),
            value: stamp,
        })
}

fn epsg(fields: &MetadataFields, bbox: &[f64; 4]) -> Result<u32, MetadataError> {
    if let Some(zone) = fields.opt_u32(&key(PROJECTION, "UTM_ZONE"))? {
        let center_lat = (bbox[1] + bbox[3]) / 2.0;
        return Ok(if center_lat > 0.0 { 32600 + zone } else { 32700 + zone });
    }

    // polar stereographic products are only produced at +/-71 true scale latitude
    let field = key("LEVEL1_PROJECTION_PARAMETERS", "TRUE_SCALE_LAT");
    let lat_ts = fields.f64(&field)?;
    if (lat_ts + 71.0).abs() < 1e-6 {
        Ok(3031)
    } else if (lat_ts - 71.0).abs() < 1e-6 {
        Ok(3995)
    } else {
        Err(MetadataError::InvalidValue {
            field,
            value: lat_ts.to_string(),
        })
    }
}

fn landsat_metadata(
    fields: &MetadataFields,
    processing_level: &str,
) -> Result<Map<String, Value>, MetadataError> {
    let mut meta = Map::new();
    if let Some(land) = fields.opt_f64(&key(IMAGE, "CLOUD_COVER_LAND"))? {
        meta.insert("landsat:cloud_cover_land".into(), Value::from(land));
    }
    for (name, group, field) in [
        ("landsat:wrs_type", IMAGE, "WRS_TYPE"),
        ("landsat:collection_category", PRODUCT, "COLLECTION_CATEGORY"),
        ("landsat:collection_number", PRODUCT, "COLLECTION_NUMBER"),
    ] {
        if let Some(value) = fields.get(&key(group, field)) {
            meta.insert(name.into(), Value::from(value));
        }
    }
    meta.insert("landsat:correction".into(), Value::from(processing_level));
    let scene_id = fields
        .get(&key("LEVEL1_PROCESSING_RECORD", "LANDSAT_SCENE_ID"))
        .or_else(|| fields.get(&key(PRODUCT, "LANDSAT_SCENE_ID")));
    if let Some(scene_id) = scene_id {
        meta.insert("landsat:scene_id".into(), Value::from(scene_id));
    }
    Ok(meta)
}

fn rescaling(fields: &MetadataFields) -> BTreeMap<String, Rescale> {
    let sources = [
        (
            "LEVEL1_RADIOMETRIC_RESCALING",
            "RADIANCE_MULT_BAND_",
            "RADIANCE_ADD_BAND_",
            "B",
        ),
        (
            "LEVEL2_SURFACE_REFLECTANCE_PARAMETERS",
            "REFLECTANCE_MULT_BAND_",
            "REFLECTANCE_ADD_BAND_",
            "SR_B",
        ),
        (
            "LEVEL2_SURFACE_TEMPERATURE_PARAMETERS",
            "TEMPERATURE_MULT_BAND_",
            "TEMPERATURE_ADD_BAND_",
            "",
        ),
    ];

    let mut out = BTreeMap::new();
    for (group, mult, add, asset_prefix) in sources {
        for (field, value) in fields.group(group) {
            let Some(band) = field.strip_prefix(mult) else {
                continue;
            };
            let offset = fields
                .get(&key(group, &format!("{}{}", add, band)))
                .and_then(|v| v.trim().parse::<f64>().ok());
            if let (Ok(scale), Some(offset)) = (value.trim().parse::<f64>(), offset) {
                out.insert(format!("{}{}", asset_prefix, band), Rescale { scale, offset });
            }
        }
    }
    out
}
