//! Item assembly from the STAC records USGS publishes next to each product
//! (`_stac.json`, or `_SR_stac.json` + `_ST_stac.json` for split products).
use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use super::assets::{COMMON_FILE_ASSETS, find_asset};
use super::params::ConversionParams;
use crate::error::{Error, Result};
use crate::io::HrefReader;
use crate::io::href::{base_href, basename, dirname, join, sibling_href};
use crate::stac::{AlternateAsset, Asset, Item, Link, media_type, schema};
use crate::types::{ProductGroup, SceneId, Sensor};

/// Length of `LXSS_LLLL_PPPRRR_YYYYMMDD_yyyymmdd_CC_TX_` at the start of
/// every USGS asset file name
const PRODUCT_PREFIX_LEN: usize = 41;

const VIEW_FIELDS: [&str; 3] = ["sun_azimuth", "sun_elevation", "off_nadir"];

/// Create an Item from the USGS STAC record(s) next to `mtl_href`.
///
/// Assets are re-pointed at the directory of `mtl_href`; the USGS location
/// is kept as the `usgs` alternate. Missing records are skipped unless
/// `params.strict` is set.
pub fn create_item_from_usgs(
    mtl_href: &str,
    params: &ConversionParams,
    reader: &HrefReader,
) -> Result<Item> {
    let records = read_usgs_records(mtl_href, params, reader)?;
    let Some((first_href, first)) = records.first() else {
        return Err(Error::NoUsgsRecords {
            href: mtl_href.to_string(),
        });
    };

    let scene = SceneId::parse(&first.id)?;
    let asset_dir = dirname(mtl_href);
    let mut item = format_usgs_item(first.clone(), first_href)?;
    info!("Creating item {} from USGS STAC record {}", item.id, first_href);

    add_common_assets(&mut item, first, asset_dir, scene.level);
    for (href, record) in &records {
        add_remaining_assets(&mut item, record, href, asset_dir, params)?;
    }
    Ok(item)
}

/// USGS STAC record hrefs for the product of `mtl_href`.
pub fn usgs_record_hrefs(mtl_href: &str) -> Result<Vec<String>> {
    let base = base_href(mtl_href);
    let sensor = Sensor::from_identifier(basename(base))?;
    Ok(if sensor.has_split_products() {
        [ProductGroup::Sr, ProductGroup::St]
            .iter()
            .map(|g| sibling_href(base, &format!("{}_stac.json", g.suffix())))
            .collect()
    } else {
        vec![sibling_href(base, "stac.json")]
    })
}

fn read_usgs_records(
    mtl_href: &str,
    params: &ConversionParams,
    reader: &HrefReader,
) -> Result<Vec<(String, Item)>> {
    let mut records = Vec::new();
    for href in usgs_record_hrefs(mtl_href)? {
        if !reader.exists(&href) {
            if params.strict {
                return Err(Error::MissingSource { href });
            }
            warn!("USGS STAC record {} not found, skipping", href);
            continue;
        }
        let item: Item = serde_json::from_str(&reader.read_to_string(&href)?)?;
        debug!("Read USGS STAC record {} ({} assets)", item.id, item.assets.len());
        records.push((href, item));
    }
    Ok(records)
}

/// Reshape a USGS record into a local Item with no assets.
pub fn format_usgs_item(mut item: Item, source_href: &str) -> Result<Item> {
    let scene = SceneId::parse(&item.id)?;

    item.remove_extension(schema::FILE);
    item.remove_extension(schema::STORAGE);
    item.add_extension(schema::ALTERNATE);

    normalize_properties(&mut item.properties, &item.id);
    if VIEW_FIELDS
        .iter()
        .any(|f| item.properties.contains_key(&format!("view:{}", f)))
    {
        item.add_extension(schema::VIEW);
    }

    item.id = local_id(&item.id);
    item.set_property(
        "description",
        format!("Landsat Collection 2 Level-{} Product", scene.level),
    );
    if let Some(platform) = item.properties.get("platform").and_then(Value::as_str) {
        let platform = platform.to_lowercase().replace('_', "-");
        item.set_property("platform", platform);
    }
    if let Some(Value::Array(instruments)) = item.properties.get_mut("instruments") {
        for instrument in instruments.iter_mut() {
            if let Value::String(s) = instrument {
                *s = s.to_lowercase();
            }
        }
    }
    item.set_property(
        "created",
        Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
    );

    let browse_dir = item
        .self_href()
        .map(|href| dirname(href).to_string())
        .unwrap_or_else(|| dirname(source_href).to_string());
    let browse = Link::new("alternate", browse_dir.replace("/data/", "/stac-browser/"))
        .with_media_type(media_type::HTML)
        .with_title("USGS stac-browser page");
    item.links = vec![browse];

    item.assets = BTreeMap::new();
    item.collection = None;
    item.extra_fields.remove("description");
    Ok(item)
}

/// Drop the processing date (segment 4) and the trailing tier or product group.
pub fn local_id(usgs_id: &str) -> String {
    let parts: Vec<&str> = usgs_id.split('_').collect();
    if parts.len() < 6 {
        return usgs_id.to_string();
    }
    [&parts[..4], &parts[5..parts.len() - 1]].concat().join("_")
}

fn normalize_properties(props: &mut Map<String, Value>, usgs_id: &str) {
    for field in VIEW_FIELDS {
        let view_key = format!("view:{}", field);
        if props.contains_key(&view_key) {
            continue;
        }
        if let Some(value) = props.remove(&format!("eo:{}", field)) {
            props.insert(view_key, value);
        }
    }

    if let Some(datetime) = props.get("datetime").and_then(Value::as_str) {
        match DateTime::parse_from_rfc3339(datetime) {
            Ok(dt) => {
                let utc = dt
                    .with_timezone(&Utc)
                    .to_rfc3339_opts(SecondsFormat::AutoSi, true);
                props.insert("datetime".into(), Value::from(utc));
            }
            Err(e) => warn!("Keeping unparseable datetime {:?}: {}", datetime, e),
        }
    }

    if props.get("landsat:correction").is_none_or(Value::is_null) {
        if let Some(correction) = usgs_id.get(5..9) {
            props.insert("landsat:correction".into(), Value::from(correction));
        }
    }
}

fn usgs_common_key(key: &str) -> &str {
    if key == "ANG" { "ANG.txt" } else { key }
}

fn alternate(usgs_href: &str) -> BTreeMap<String, AlternateAsset> {
    BTreeMap::from([(
        "usgs".to_string(),
        AlternateAsset {
            href: usgs_href.to_string(),
            title: Some("USGS asset location".to_string()),
            extra_fields: Map::new(),
        },
    )])
}

fn add_common_assets(item: &mut Item, record: &Item, asset_dir: &str, level: u8) {
    for def in COMMON_FILE_ASSETS {
        let Some(source) = record.assets.get(usgs_common_key(def.key)) else {
            continue;
        };
        let mut asset = def.to_asset(join(asset_dir, basename(&source.href)), level);
        asset.alternate = alternate(&source.href);
        item.assets.insert(def.key.to_string(), asset);
    }
}

fn add_remaining_assets(
    item: &mut Item,
    record: &Item,
    record_href: &str,
    asset_dir: &str,
    params: &ConversionParams,
) -> Result<()> {
    let scene = SceneId::parse(&record.id)?;
    let family = scene.sensor.family();

    for (usgs_key, source) in &record.assets {
        let is_common = COMMON_FILE_ASSETS
            .iter()
            .any(|def| usgs_common_key(def.key) == usgs_key);
        if is_common || usgs_key == "index" {
            continue;
        }

        let filename = basename(&source.href);
        let stem = filename.rsplit_once('.').map_or(filename, |(stem, _)| stem);
        let key = stem.get(PRODUCT_PREFIX_LEN..).unwrap_or_default();
        let Some(def) = find_asset(family, key) else {
            if params.strict {
                return Err(Error::UnmappedAsset {
                    key: usgs_key.clone(),
                    href: record_href.to_string(),
                });
            }
            warn!(
                "USGS asset {} ({}) of {} has no local definition, skipping",
                usgs_key, filename, record_href
            );
            continue;
        };

        let mut asset = def.to_asset(join(asset_dir, filename), scene.level);
        asset.media_type = Some(media_type::COG.to_string());
        asset.alternate = alternate(&source.href);
        copy_projection(&mut asset, source, &record.properties);
        item.assets.insert(def.key.to_string(), asset);
    }
    Ok(())
}

/// Grid of a raster asset: the source asset's own, else the record's.
fn copy_projection(asset: &mut Asset, source: &Asset, properties: &Map<String, Value>) {
    for field in ["proj:shape", "proj:transform"] {
        let value = source
            .extra_fields
            .get(field)
            .or_else(|| properties.get(field));
        if let Some(value) = value {
            asset.extra_fields.insert(field.to_string(), value.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_id_drops_processing_date_and_last_segment() {
        assert_eq!(
            local_id("LM01_L1GS_001010_19720908_20200909_02_T2"),
            "LM01_L1GS_001010_19720908_02"
        );
        assert_eq!(
            local_id("LT04_L2SP_002026_19830110_20200918_02_T1_SR"),
            "LT04_L2SP_002026_19830110_02_T1"
        );
    }

    #[test]
    fn record_hrefs_follow_product_split() {
        assert_eq!(
            usgs_record_hrefs("/d/LM01_L1GS_001010_19720908_20200909_02_T2_MTL.xml").unwrap(),
            vec!["/d/LM01_L1GS_001010_19720908_20200909_02_T2_stac.json"]
        );
        assert_eq!(
            usgs_record_hrefs("/d/LT04_L2SP_002026_19830110_20200918_02_T1_MTL.xml").unwrap(),
            vec![
                "/d/LT04_L2SP_002026_19830110_20200918_02_T1_SR_stac.json",
                "/d/LT04_L2SP_002026_19830110_20200918_02_T1_ST_stac.json",
            ]
        );
        assert!(usgs_record_hrefs("/d/LX04_L2SP_002026_MTL.xml").is_err());
    }

    #[test]
    fn eo_view_fields_move_to_view_namespace() {
        let mut props = Map::new();
        props.insert("eo:sun_azimuth".into(), Value::from(150.0));
        props.insert("view:sun_elevation".into(), Value::from(20.0));
        props.insert("eo:sun_elevation".into(), Value::from(99.0));
        props.insert("datetime".into(), Value::from("1983-01-10T09:47:07.72+00:00"));
        normalize_properties(&mut props, "LT04_L2SP_002026_19830110_20200918_02_T1_SR");

        assert_eq!(props["view:sun_azimuth"], 150.0);
        assert!(!props.contains_key("eo:sun_azimuth"));
        assert_eq!(props["view:sun_elevation"], 20.0);
        assert_eq!(props["datetime"], "1983-01-10T09:47:07.720Z");
        assert_eq!(props["landsat:correction"], "L2SP");
    }
}
