mod common;

use std::fs;

use geojson::Value as GeoValue;
use landsat_stac::{ConversionParams, Error, HrefReader, Item, create_item};

use common::*;

fn exterior_ring(item: &Item) -> Vec<Vec<f64>> {
    match &item.geometry.as_ref().unwrap().value {
        GeoValue::Polygon(rings) => rings[0].clone(),
        other => panic!("expected polygon, got {:?}", other),
    }
}

fn assert_within_bbox(item: &Item) {
    let bbox = item.bbox.as_ref().unwrap();
    for position in exterior_ring(item) {
        assert!(position[0] >= bbox[0] - 1e-9 && position[0] <= bbox[2] + 1e-9);
        assert!(position[1] >= bbox[1] - 1e-9 && position[1] <= bbox[3] + 1e-9);
    }
}

#[test]
fn mss_item_uses_bbox_footprint_and_no_thermal_assets() {
    let item = create_item(&mss_mtl(), &ConversionParams::default(), &HrefReader::new()).unwrap();

    assert_eq!(item.id, "LM01_L1GS_001010_19720908_02_T2");
    assert_eq!(item.properties["platform"], "landsat-1");
    assert_eq!(item.properties["instruments"], serde_json::json!(["mss"]));
    assert_eq!(
        item.properties["description"],
        "Landsat Collection 2 Level-1 Product"
    );
    assert_eq!(item.properties["landsat:correction"], "L1GS");
    assert_eq!(item.properties["proj:epsg"], 32627);

    assert_eq!(item.assets.len(), 11);
    assert!(!item.assets.contains_key("ANG"));
    assert!(item.assets.keys().all(|k| !k.starts_with("ST_")));
    for band in ["B4", "B5", "B6", "B7"] {
        let asset = &item.assets[band];
        assert_eq!(asset.bands.len(), 1, "{}", band);
        assert_eq!(asset.bands[0].name, band);
        assert_eq!(asset.gsd, Some(60.0));
    }
    let b4 = &item.assets["B4"].raster_bands[0];
    assert_eq!(b4.data_type, "uint8");
    assert_eq!(b4.scale, Some(0.95591));
    assert_eq!(b4.offset, Some(-18.19118));
    assert_eq!(b4.nodata, Some(0.0));

    let bbox = item.bbox.clone().unwrap();
    let ring = exterior_ring(&item);
    assert_eq!(ring.len(), 5);
    assert_eq!(ring[0], vec![bbox[0], bbox[1]]);
    assert_eq!(ring[2], vec![bbox[2], bbox[3]]);
    assert_eq!(ring.first(), ring.last());

    assert_eq!(item.links.len(), 1);
    assert_eq!(item.links[0].rel, "alternate");
    assert!(item.links[0]
        .href
        .contains("/level-1/standard/mss/1972/001/010/LM01_L1GS_001010_19720908_20200909_02_T2"));
}

#[test]
fn mss_item_can_take_the_usgs_footprint() {
    let params = ConversionParams {
        use_usgs_geometry: true,
        ..ConversionParams::default()
    };
    let item = create_item(&mss_mtl(), &params, &HrefReader::new()).unwrap();
    let usgs: serde_json::Value = serde_json::from_str(
        &fs::read_to_string(fixture_href(
            "mss",
            &format!("{}_stac.json", MSS_PRODUCT),
        ))
        .unwrap(),
    )
    .unwrap();

    let geometry = serde_json::to_value(item.geometry.as_ref().unwrap()).unwrap();
    assert_eq!(geometry["coordinates"], usgs["geometry"]["coordinates"]);
}

#[test]
fn tm_l2sp_item_has_reflectance_and_thermal_assets() {
    let item = create_item(&tm_mtl(), &ConversionParams::default(), &HrefReader::new()).unwrap();

    assert_eq!(item.id, "LT04_L2SP_002026_19830110_02_T1");
    assert_eq!(item.properties["platform"], "landsat-4");
    assert_eq!(item.properties["instruments"], serde_json::json!(["tm"]));
    assert_eq!(item.properties["landsat:correction"], "L2SP");
    assert_eq!(item.properties["proj:epsg"], 32623);
    assert!(item.properties.contains_key("proj:shape"));
    assert_eq!(item.properties["landsat:wrs_path"], "002");
    assert_eq!(item.properties["landsat:wrs_row"], "026");

    assert_eq!(item.assets.len(), 25);
    assert!(item.assets.contains_key("ANG"));
    assert!(item.assets.contains_key("SR_B1"));
    assert!(item.assets.contains_key("ST_B6"));
    assert_eq!(
        item.assets["ANG"].description.as_deref(),
        Some("Collection 2 Level-2 Angle Coefficients File (ANG)")
    );
    assert!(item.assets["SR_B1"].href.ends_with(&format!("{}_SR_B1.TIF", TM_PRODUCT)));

    let sr_b1 = &item.assets["SR_B1"].raster_bands[0];
    assert_eq!(sr_b1.scale, Some(2.75e-05));
    assert_eq!(sr_b1.offset, Some(-0.2));
    let st_b6 = &item.assets["ST_B6"].raster_bands[0];
    assert_eq!(st_b6.unit.as_deref(), Some("kelvin"));
    assert_eq!(st_b6.offset, Some(149.0));

    assert_eq!(item.links.len(), 1);
    assert_eq!(item.links[0].rel, "alternate");
    assert!(item.links[0]
        .href
        .contains("/level-2/standard/tm/1983/002/026/LT04_L2SP_002026_19830110_20200918_02_T1"));
}

#[test]
fn tm_footprint_comes_from_the_angle_file() {
    let item = create_item(&tm_mtl(), &ConversionParams::default(), &HrefReader::new()).unwrap();
    let ring = exterior_ring(&item);
    let bbox = item.bbox.clone().unwrap();

    // the scene footprint is rotated, so it cannot be the bbox rectangle
    assert_ne!(ring[0], vec![bbox[0], bbox[1]]);
    assert!(ring.len() >= 4);
    assert_eq!(ring.first(), ring.last());
    assert_within_bbox(&item);
}

#[test]
fn missing_angle_file_falls_back_to_bbox() {
    let dir = copy_fixtures("tm");
    fs::remove_file(dir.path().join(format!("{}_ANG.txt", TM_PRODUCT))).unwrap();
    let mtl = href_in(dir.path(), &format!("{}_MTL.xml", TM_PRODUCT));

    let item = create_item(&mtl, &ConversionParams::default(), &HrefReader::new()).unwrap();
    let bbox = item.bbox.clone().unwrap();
    let ring = exterior_ring(&item);
    assert_eq!(ring.len(), 5);
    assert_eq!(ring[0], vec![bbox[0], bbox[1]]);
    assert_eq!(ring[1], vec![bbox[2], bbox[1]]);
}

#[test]
fn thermal_assets_only_for_l2sp() {
    let dir = copy_fixtures("tm");
    let path = dir.path().join(format!("{}_MTL.xml", TM_PRODUCT));
    let text = fs::read_to_string(&path).unwrap().replacen(
        "<PROCESSING_LEVEL>L2SP</PROCESSING_LEVEL>",
        "<PROCESSING_LEVEL>L2SR</PROCESSING_LEVEL>",
        1,
    );
    fs::write(&path, text).unwrap();

    let item = create_item(
        &path.to_string_lossy(),
        &ConversionParams::default(),
        &HrefReader::new(),
    )
    .unwrap();
    assert!(item.assets.contains_key("SR_B1"));
    assert!(item.assets.keys().all(|k| !k.starts_with("ST_")));
    assert_eq!(item.properties["landsat:correction"], "L2SR");
}

#[test]
fn oli_text_mtl_item() {
    let item = create_item(&oli_mtl(), &ConversionParams::default(), &HrefReader::new()).unwrap();

    assert_eq!(item.id, "LC08_L2SP_047027_20201204_02_T1");
    assert_eq!(item.properties["platform"], "landsat-8");
    assert_eq!(
        item.properties["instruments"],
        serde_json::json!(["oli", "tirs"])
    );
    assert_eq!(
        item.properties["description"],
        "Landsat Collection 2 Level-2 Surface Reflectance Product"
    );
    assert_eq!(item.properties["view:off_nadir"], 0.001);
    assert_eq!(item.properties["proj:epsg"], 32610);
    assert!(item.properties.contains_key("proj:bbox"));
    assert!(!item.properties.contains_key("proj:shape"));
    assert!(item
        .stac_extensions
        .iter()
        .any(|e| e.ends_with("landsat-extension/v1.1.0/schema.json")));

    assert_eq!(item.assets.len(), 25);
    let st_b10 = &item.assets["ST_B10"];
    assert_eq!(st_b10.raster_bands[0].unit.as_deref(), Some("kelvin"));
    assert_eq!(st_b10.raster_bands[0].offset, Some(149.0));
    assert_eq!(st_b10.bands[0].common_name.as_deref(), Some("lwir11"));
    // every raster asset carries its own grid
    assert_eq!(
        item.assets["SR_B4"].extra_fields["proj:shape"],
        serde_json::json!([7921, 7781])
    );

    assert_within_bbox(&item);
}

#[test]
fn oli_ignores_the_usgs_geometry_toggle() {
    let with = create_item(
        &oli_mtl(),
        &ConversionParams {
            use_usgs_geometry: true,
            ..ConversionParams::default()
        },
        &HrefReader::new(),
    )
    .unwrap();
    let without =
        create_item(&oli_mtl(), &ConversionParams::default(), &HrefReader::new()).unwrap();
    assert_eq!(with.geometry, without.geometry);
}

#[test]
fn raster_bands_can_be_disabled() {
    let params = ConversionParams {
        raster_bands: false,
        ..ConversionParams::default()
    };
    let item = create_item(&tm_mtl(), &params, &HrefReader::new()).unwrap();
    assert!(item.assets.values().all(|a| a.raster_bands.is_empty()));
    assert!(!item
        .stac_extensions
        .iter()
        .any(|e| e.contains("/raster/")));
}

#[test]
fn href_modifier_is_applied_to_reads_only() {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let real_dir = data_dir("tm").to_string_lossy().to_string();
    let reader = HrefReader::with_modifier(move |href| {
        counter.fetch_add(1, Ordering::SeqCst);
        href.replace("https://mirror.example.com/tm", &real_dir)
    });

    let mtl = format!("https://mirror.example.com/tm/{}_MTL.xml", TM_PRODUCT);
    let item = create_item(&mtl, &ConversionParams::default(), &reader).unwrap();

    assert!(calls.load(Ordering::SeqCst) > 0);
    assert!(item.assets["SR_B4"]
        .href
        .starts_with("https://mirror.example.com/tm/"));
}

#[test]
fn missing_mtl_is_a_missing_source() {
    let dir = tempfile::tempdir().unwrap();
    let mtl = href_in(dir.path(), &format!("{}_MTL.xml", TM_PRODUCT));
    let err = create_item(&mtl, &ConversionParams::default(), &HrefReader::new()).unwrap_err();
    assert!(matches!(err, Error::MissingSource { href } if href == mtl));
}

#[test]
fn non_mtl_href_is_rejected() {
    let href = fixture_href("tm", &format!("{}_ANG.txt", TM_PRODUCT));
    let err = create_item(&href, &ConversionParams::default(), &HrefReader::new()).unwrap_err();
    assert!(
        matches!(err, Error::InvalidArgument { arg: "mtl_href", .. }),
        "{:?}",
        err
    );
}

#[test]
fn wrs_fields_match_the_usgs_records() {
    let from_mtl =
        create_item(&tm_mtl(), &ConversionParams::default(), &HrefReader::new()).unwrap();
    let from_usgs = landsat_stac::create_item_from_usgs(
        &tm_mtl(),
        &ConversionParams::default(),
        &HrefReader::new(),
    )
    .unwrap();
    for key in ["landsat:wrs_path", "landsat:wrs_row"] {
        assert_eq!(from_mtl.properties[key], from_usgs.properties[key], "{}", key);
    }

    let mss = create_item(&mss_mtl(), &ConversionParams::default(), &HrefReader::new()).unwrap();
    assert_eq!(mss.properties["landsat:wrs_path"], "001");
    assert_eq!(mss.properties["landsat:wrs_row"], "010");
}
