//! Item assembly from an MTL metadata file and its sibling files.
use chrono::{Datelike, SecondsFormat};
use serde_json::{Value, json};
use tracing::{debug, info};

use super::assets::{AssetDefinition, asset_table, common_assets};
use super::geometry::{resolve_footprint, usgs_geometry};
use super::params::ConversionParams;
use crate::error::{Error, Result};
use crate::io::href::base_href;
use crate::io::{HrefReader, MetadataError, MtlMetadata};
use crate::stac::{Item, Link, RasterBand, media_type, schema};
use crate::types::{ProductGroup, SceneId, Sensor};

const OLI_TIRS_DESCRIPTION: &str = "Landsat Collection 2 Level-2 Surface Reflectance Product";
const BROWSER_ROOT: &str = "https://landsatlook.usgs.gov/stac-browser/collection02";

/// Create an Item from an `_MTL.xml` / `_MTL.txt` href.
///
/// All other files are expected next to the MTL file and share its base
/// name, i.e. the href with the trailing `_MTL.<ext>` removed.
pub fn create_item(
    mtl_href: &str,
    params: &ConversionParams,
    reader: &HrefReader,
) -> Result<Item> {
    if !(mtl_href.ends_with("_MTL.xml") || mtl_href.ends_with("_MTL.txt")) {
        return Err(Error::InvalidArgument {
            arg: "mtl_href",
            value: mtl_href.to_string(),
        });
    }
    let base = base_href(mtl_href);
    let mtl = MtlMetadata::from_href(reader, mtl_href).map_err(|e| match e {
        MetadataError::NotFound(_) => Error::MissingSource {
            href: mtl_href.to_string(),
        },
        other => Error::Metadata(other),
    })?;
    let scene = SceneId::parse(&mtl.product_id)?;
    info!(
        "Creating {} item {} from {}",
        scene.sensor, mtl.item_id, mtl_href
    );

    // OLI-TIRS always derives its footprint from the angle file
    let usgs = if params.use_usgs_geometry && scene.sensor != Sensor::OliTirs {
        usgs_geometry(reader, base, scene.sensor)
    } else {
        None
    };
    let footprint = resolve_footprint(reader, base, &mtl, scene.sensor, usgs);
    debug!("Footprint of {} from {:?}", mtl.item_id, footprint.source);

    let mut item = Item::new(mtl.item_id.clone());
    item.bbox = Some(mtl.bbox.to_vec());
    item.geometry = Some(footprint.geometry);
    item.set_property(
        "datetime",
        mtl.scene_datetime
            .to_rfc3339_opts(SecondsFormat::AutoSi, true),
    );

    set_common_metadata(&mut item, &scene);
    set_extension_properties(&mut item, &mtl, scene.sensor);

    let ctx = AssetContext {
        base,
        mtl: &mtl,
        scene: &scene,
        params,
    };
    for def in common_assets() {
        // MSS products have no angle file
        if def.key == "ANG" && scene.sensor == Sensor::Mss {
            continue;
        }
        ctx.add(&mut item, def, ProductGroup::Sr);
    }
    let family = scene.sensor.family();
    for def in asset_table(family, ProductGroup::Sr) {
        ctx.add(&mut item, def, ProductGroup::Sr);
    }
    if mtl.processing_level == "L2SP" {
        for def in asset_table(family, ProductGroup::St) {
            ctx.add(&mut item, def, ProductGroup::St);
        }
    }
    if item.assets.values().any(|a| !a.raster_bands.is_empty()) {
        item.add_extension(schema::RASTER);
    }

    item.links.push(browser_link(&mtl, &scene));
    Ok(item)
}

fn set_common_metadata(item: &mut Item, scene: &SceneId) {
    item.set_property("platform", scene.platform());
    item.set_property(
        "instruments",
        scene
            .sensor
            .instruments()
            .iter()
            .map(|i| Value::from(*i))
            .collect::<Vec<_>>(),
    );
    let description = match scene.sensor {
        Sensor::OliTirs => OLI_TIRS_DESCRIPTION.to_string(),
        _ => format!("Landsat Collection 2 Level-{} Product", scene.level),
    };
    item.set_property("description", description);
}

fn set_extension_properties(item: &mut Item, mtl: &MtlMetadata, sensor: Sensor) {
    item.add_extension(schema::EO);
    item.set_property("eo:cloud_cover", mtl.cloud_cover);

    item.add_extension(schema::VIEW);
    if let Some(off_nadir) = mtl.off_nadir {
        item.set_property("view:off_nadir", off_nadir);
    }
    item.set_property("view:sun_elevation", mtl.sun_elevation);
    item.set_property("view:sun_azimuth", mtl.sun_azimuth);

    item.add_extension(schema::PROJECTION);
    item.set_property("proj:epsg", mtl.epsg);
    if sensor == Sensor::OliTirs {
        item.set_property("proj:bbox", mtl.proj_bbox.to_vec());
        item.add_extension(schema::LANDSAT_OLI);
    } else {
        item.set_property("proj:shape", mtl.sr_shape.to_vec());
        item.set_property("proj:transform", mtl.sr_transform.to_vec());
        item.add_extension(schema::LANDSAT);
    }

    for (key, value) in &mtl.landsat_metadata {
        item.properties.insert(key.clone(), value.clone());
    }
}

/// The single informational link to the USGS stac-browser page of the product.
fn browser_link(mtl: &MtlMetadata, scene: &SceneId) -> Link {
    let href = format!(
        "{}/level-{}/standard/{}/{}/{}/{}/{}",
        BROWSER_ROOT,
        scene.level,
        scene.sensor.instrument_dir(),
        mtl.scene_datetime.year(),
        mtl.wrs_path,
        mtl.wrs_row,
        mtl.product_id
    );
    Link::new("alternate", href)
        .with_title("USGS stac-browser page")
        .with_media_type(media_type::HTML)
}

struct AssetContext<'a> {
    base: &'a str,
    mtl: &'a MtlMetadata,
    scene: &'a SceneId,
    params: &'a ConversionParams,
}

impl AssetContext<'_> {
    fn add(&self, item: &mut Item, def: &AssetDefinition, group: ProductGroup) {
        let mut asset = def.to_asset(def.href(self.base), self.scene.level);

        if self.params.raster_bands {
            if let Some(data_type) = def.data_type {
                let rescale = self.mtl.rescaling.get(def.key);
                asset.raster_bands.push(RasterBand {
                    data_type: data_type.to_string(),
                    nodata: def.is_spectral().then_some(0.0),
                    scale: rescale.map(|r| r.scale),
                    offset: rescale.map(|r| r.offset),
                    unit: (group == ProductGroup::St && def.is_spectral())
                        .then(|| "kelvin".to_string()),
                });
            }
        }

        if def.media_type == media_type::COG {
            self.add_projection(&mut asset.extra_fields, group);
        }
        item.assets.insert(def.key.to_string(), asset);
    }

    /// Per-asset grid where it differs from the item-level one. OLI-TIRS items
    /// carry no item-level grid, so every raster asset gets its own.
    fn add_projection(&self, fields: &mut serde_json::Map<String, Value>, group: ProductGroup) {
        let mtl = self.mtl;
        let thermal = match (group, mtl.thermal_shape, mtl.thermal_transform) {
            (ProductGroup::St, Some(shape), Some(transform))
                if shape != mtl.sr_shape || transform != mtl.sr_transform =>
            {
                Some((shape, transform))
            }
            _ => None,
        };
        let grid = match (thermal, self.scene.sensor) {
            (Some(grid), _) => Some(grid),
            (None, Sensor::OliTirs) => Some((mtl.sr_shape, mtl.sr_transform)),
            (None, _) => None,
        };
        if let Some((shape, transform)) = grid {
            fields.insert("proj:shape".into(), json!(shape));
            fields.insert("proj:transform".into(), json!(transform));
        }
    }
}
