use tracing::info;

use super::fields::{MetadataError, MetadataFields};
use super::href::HrefReader;
use super::odl::parse_odl;

/// Geometry-relevant content of an `_ANG.txt` angle coefficient file.
///
/// Corner lines/samples are the L1T image corners of band 1 in the order
/// upper-left, upper-right, lower-right, lower-left.
#[derive(Debug, Clone, PartialEq)]
pub struct AngMetadata {
    /// `UTM` or `PS`
    pub map_projection: String,
    pub utm_zone: Option<u32>,
    /// Projected `(x, y)` of the upper-left pixel
    pub ul_corner: [f64; 2],
    pub pixel_size: f64,
    pub corner_lines: Vec<f64>,
    pub corner_samples: Vec<f64>,
}

impl AngMetadata {
    pub fn from_href(reader: &HrefReader, href: &str) -> Result<Self, MetadataError> {
        info!("Reading angle coefficients from {}", href);
        Self::from_str(&reader.read_to_string(href)?)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(text: &str) -> Result<Self, MetadataError> {
        Self::from_fields(&parse_odl(text)?)
    }

    pub fn from_fields(fields: &MetadataFields) -> Result<Self, MetadataError> {
        let require = |field: &str| {
            fields
                .find(field)
                .ok_or_else(|| MetadataError::MissingField(field.to_string()))
        };

        let map_projection = fields.text(require("MAP_PROJECTION")?)?.to_string();
        let utm_zone = match fields.find("UTM_ZONE").or_else(|| fields.find("ZONE_NUMBER")) {
            Some(key) => Some(fields.u32(key)?),
            None => None,
        };

        let ul = fields.f64_list(require("UL_CORNER")?)?;
        let ul_corner = match ul.as_slice() {
            [x, y] => [*x, *y],
            _ => {
                return Err(MetadataError::InvalidValue {
                    field: "UL_CORNER".into(),
                    value: format!("{:?}", ul),
                });
            }
        };

        let corner_lines = fields.f64_list(require("BAND01_L1T_IMAGE_CORNER_LINES")?)?;
        let corner_samples = fields.f64_list(require("BAND01_L1T_IMAGE_CORNER_SAMPS")?)?;
        if corner_lines.len() != 4 || corner_samples.len() != 4 {
            return Err(MetadataError::InvalidValue {
                field: "BAND01_L1T_IMAGE_CORNER_LINES".into(),
                value: format!("{} lines, {} samples", corner_lines.len(), corner_samples.len()),
            });
        }

        let pixel_size = match fields.find("BAND01_PIXEL_SIZE") {
            Some(key) => fields.f64(key)?,
            None => derived_pixel_size(fields, ul_corner[0])?,
        };

        Ok(AngMetadata {
            map_projection,
            utm_zone,
            ul_corner,
            pixel_size,
            corner_lines,
            corner_samples,
        })
    }

    /// Projected `(x, y)` of each image corner.
    pub fn projected_corners(&self) -> Vec<[f64; 2]> {
        self.corner_lines
            .iter()
            .zip(&self.corner_samples)
            .map(|(line, samp)| {
                [
                    self.ul_corner[0] + samp * self.pixel_size,
                    self.ul_corner[1] - line * self.pixel_size,
                ]
            })
            .collect()
    }
}

// (LR_x - UL_x) spans NUM_L1T_SAMPS - 1 pixels
fn derived_pixel_size(fields: &MetadataFields, ul_x: f64) -> Result<f64, MetadataError> {
    let lr = fields.f64_list(
        fields
            .find("LR_CORNER")
            .ok_or_else(|| MetadataError::MissingField("BAND01_PIXEL_SIZE".into()))?,
    )?;
    let samples = fields.f64(
        fields
            .find("BAND01_NUM_L1T_SAMPS")
            .ok_or_else(|| MetadataError::MissingField("BAND01_NUM_L1T_SAMPS".into()))?,
    )?;
    match lr.first() {
        Some(lr_x) if samples > 1.0 => Ok((lr_x - ul_x) / (samples - 1.0)),
        _ => Err(MetadataError::InvalidValue {
            field: "LR_CORNER".into(),
            value: format!("{:?}", lr),
        }),
    }
}
