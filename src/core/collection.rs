//! Collection 2 Level-1 (MSS) collection builder.
use serde_json::Value;

use super::params::ConversionParams;
use super::usgs::create_item_from_usgs;
use crate::error::Result;
use crate::io::HrefReader;
use crate::stac::{
    Collection, Extent, ItemAssetDefinition, Link, Provider, SpatialExtent, TemporalExtent,
    schema,
};

pub const C2_L1_ID: &str = "landsat-c2-l1";
pub const C2_L1_TITLE: &str = "Landsat Collection 2 Level-1";
pub const C2_L1_DESCRIPTION: &str = "The Landsat program provides a comprehensive, continuous \
archive of the Earth's surface. Landsat Collection 2 Level-1 data products consist of quantized \
and calibrated scaled Digital Numbers (DN) representing the multispectral image data. This \
dataset represent the global archive of Level-1 data acquired by the Multispectral Scanner \
System onboard Landsat 1 through Landsat 5. MSS data is only available in Level-1 form.";
pub const C2_L1_KEYWORDS: &[&str] = &[
    "Landsat",
    "USGS",
    "NASA",
    "Satellite",
    "Global",
    "Imagery",
    "Reflectance",
];
pub const C2_L1_LICENSE: &str = "proprietary";
pub const C2_L1_LICENSE_HREF: &str = "https://www.usgs.gov/core-science-systems/hdds/data-policy";
/// First MSS acquisitions; the interval stays open
pub const C2_L1_START: &str = "1972-08-01T00:00:00Z";

const MSS_BANDS: [&str; 4] = ["B4", "B5", "B6", "B7"];

fn providers() -> Vec<Provider> {
    vec![
        Provider::new(
            "NASA",
            &["producer", "licensor"],
            "https://landsat.gsfc.nasa.gov/",
        ),
        Provider::new(
            "USGS",
            &["producer", "processor", "licensor"],
            "https://www.usgs.gov/landsat-missions/landsat-collection-2-level-1-data",
        ),
        Provider::new(
            "Microsoft",
            &["host"],
            "https://planetarycomputer.microsoft.com",
        ),
    ]
}

/// Build the Level-1 collection; `mss_mtl_href` names a sample MSS product
/// whose USGS record provides the band summaries and item asset definitions.
pub fn create_collection_c2l1(
    mss_mtl_href: &str,
    params: &ConversionParams,
    reader: &HrefReader,
) -> Result<Collection> {
    let extent = Extent {
        spatial: SpatialExtent {
            bbox: vec![vec![-180.0, -90.0, 180.0, 90.0]],
        },
        temporal: TemporalExtent {
            interval: vec![vec![Some(C2_L1_START.to_string()), None]],
        },
    };
    let mut collection = Collection::new(C2_L1_ID, C2_L1_DESCRIPTION, extent);
    collection.title = Some(C2_L1_TITLE.to_string());
    collection.keywords = C2_L1_KEYWORDS.iter().map(|k| k.to_string()).collect();
    collection.providers = providers();
    collection.license = C2_L1_LICENSE.to_string();
    collection
        .links
        .push(Link::new("license", C2_L1_LICENSE_HREF).with_title("Public Domain"));

    let summaries = &mut collection.summaries;
    summaries.insert(
        "platform".into(),
        Value::from(
            (1..=5)
                .map(|n| format!("landsat-{}", n))
                .collect::<Vec<_>>(),
        ),
    );
    summaries.insert("instruments".into(), Value::from(vec!["mss"]));
    summaries.insert("gsd".into(), Value::from(vec![60]));

    let item = create_item_from_usgs(mss_mtl_href, params, reader)?;
    let bands: Vec<Value> = MSS_BANDS
        .iter()
        .filter_map(|key| item.assets.get(*key))
        .filter_map(|asset| asset.bands.first())
        .map(serde_json::to_value)
        .collect::<std::result::Result<_, _>>()?;
    summaries.insert("eo:bands".into(), Value::from(bands));

    // hrefs, alternates and grids are per item
    collection.item_assets = item
        .assets
        .iter()
        .map(|(key, asset)| {
            let definition = ItemAssetDefinition {
                media_type: asset.media_type.clone(),
                title: asset.title.clone(),
                description: asset.description.clone(),
                roles: asset.roles.clone(),
                gsd: asset.gsd,
                bands: asset.bands.clone(),
            };
            (key.clone(), definition)
        })
        .collect();
    collection.add_extension(schema::ITEM_ASSETS);

    Ok(collection)
}
