mod common;

use std::fs;

use landsat_stac::api::find_mtl_files;
use landsat_stac::{
    BatchReport, Collection, ConversionParams, HrefReader, Item, ItemSource,
    convert_directory_to_path, convert_to_path, create_collection_c2l1,
    create_collection_to_path,
};
use serde_json::json;

use common::*;

#[test]
fn collection_summarizes_the_mss_archive() {
    let collection =
        create_collection_c2l1(&mss_mtl(), &ConversionParams::default(), &HrefReader::new())
            .unwrap();

    assert_eq!(collection.id, "landsat-c2-l1");
    assert_eq!(collection.license, "proprietary");
    assert_eq!(collection.extent.spatial.bbox, vec![vec![-180.0, -90.0, 180.0, 90.0]]);
    assert_eq!(
        collection.extent.temporal.interval,
        vec![vec![Some("1972-08-01T00:00:00Z".to_string()), None]]
    );
    let providers: Vec<&str> = collection.providers.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(providers, ["NASA", "USGS", "Microsoft"]);

    let license = collection.links.iter().find(|l| l.rel == "license").unwrap();
    assert_eq!(license.title.as_deref(), Some("Public Domain"));

    let summaries = &collection.summaries;
    assert_eq!(
        summaries["platform"],
        json!(["landsat-1", "landsat-2", "landsat-3", "landsat-4", "landsat-5"])
    );
    assert_eq!(summaries["instruments"], json!(["mss"]));
    assert_eq!(summaries["gsd"], json!([60]));
    let bands = summaries["eo:bands"].as_array().unwrap();
    assert_eq!(bands.len(), 4);
    assert_eq!(bands[0]["name"], "B4");
    assert_eq!(bands[0]["common_name"], "green");

    assert_eq!(collection.item_assets.len(), 11);
    assert_eq!(collection.item_assets["B5"].bands.len(), 1);
    assert!(collection
        .stac_extensions
        .iter()
        .any(|e| e.contains("/item-assets/")));
}

#[test]
fn collection_is_written_to_disk() {
    let out = tempfile::tempdir().unwrap();
    let (collection, path) = create_collection_to_path(
        &mss_mtl(),
        out.path(),
        &ConversionParams::default(),
        &HrefReader::new(),
    )
    .unwrap();

    assert_eq!(path, out.path().join("collection.json"));
    let written: Collection = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(written.id, collection.id);
    assert_eq!(written.item_assets.len(), collection.item_assets.len());
}

#[test]
fn item_is_written_under_its_id() {
    let out = tempfile::tempdir().unwrap();
    let path = convert_to_path(
        &tm_mtl(),
        out.path(),
        ItemSource::Mtl,
        &ConversionParams::default(),
        &HrefReader::new(),
    )
    .unwrap();

    assert_eq!(path, out.path().join("LT04_L2SP_002026_19830110_02_T1.json"));
    let text = fs::read_to_string(&path).unwrap();
    assert!(text.ends_with('\n'));
    let item: Item = serde_json::from_str(&text).unwrap();
    assert_eq!(item.assets.len(), 25);
}

#[test]
fn find_mtl_files_prefers_xml_and_reports_unknown_sensors() {
    let dir = tempfile::tempdir().unwrap();
    for name in [
        format!("{}_MTL.xml", TM_PRODUCT),
        format!("{}_MTL.txt", TM_PRODUCT),
        format!("{}_MTL.txt", OLI_PRODUCT),
        "LX09_L1TP_MTL.xml".to_string(),
        "notes.txt".to_string(),
    ] {
        fs::write(dir.path().join(name), "").unwrap();
    }

    let (found, unrecognized) = find_mtl_files(dir.path()).unwrap();
    assert_eq!(
        found,
        vec![
            dir.path().join(format!("{}_MTL.txt", OLI_PRODUCT)),
            dir.path().join(format!("{}_MTL.xml", TM_PRODUCT)),
        ]
    );
    assert_eq!(unrecognized, vec![dir.path().join("LX09_L1TP_MTL.xml")]);
}

#[test]
fn batch_converts_every_product() {
    let input = tempfile::tempdir().unwrap();
    for sensor in ["mss", "tm", "oli"] {
        copy_fixtures_into(sensor, input.path());
    }
    fs::write(input.path().join("LX09_L1TP_MTL.xml"), "").unwrap();
    let out = tempfile::tempdir().unwrap();

    let report = convert_directory_to_path(
        input.path(),
        out.path(),
        ItemSource::Mtl,
        &ConversionParams::default(),
        &HrefReader::new(),
        true,
    )
    .unwrap();

    assert_eq!(
        report,
        BatchReport {
            processed: 3,
            skipped: 1,
            errors: 0
        }
    );
    for id in [
        "LM01_L1GS_001010_19720908_02_T2",
        "LT04_L2SP_002026_19830110_02_T1",
        "LC08_L2SP_047027_20201204_02_T1",
    ] {
        assert!(out.path().join(format!("{}.json", id)).is_file(), "{}", id);
    }
}

#[test]
fn batch_from_usgs_records_counts_failures() {
    let input = tempfile::tempdir().unwrap();
    for sensor in ["mss", "oli"] {
        copy_fixtures_into(sensor, input.path());
    }
    let out = tempfile::tempdir().unwrap();

    // the OLI product has no USGS records next to it
    let report = convert_directory_to_path(
        input.path(),
        out.path(),
        ItemSource::Usgs,
        &ConversionParams::default(),
        &HrefReader::new(),
        true,
    )
    .unwrap();
    assert_eq!(report.processed, 1);
    assert_eq!(report.errors, 1);
    assert!(out.path().join("LM01_L1GS_001010_19720908_02.json").is_file());

    let fail_fast = convert_directory_to_path(
        input.path(),
        out.path(),
        ItemSource::Usgs,
        &ConversionParams::default(),
        &HrefReader::new(),
        false,
    );
    assert!(fail_fast.is_err());
}

#[test]
fn batch_requires_an_input_directory() {
    let out = tempfile::tempdir().unwrap();
    let err = convert_directory_to_path(
        &out.path().join("missing"),
        out.path(),
        ItemSource::Mtl,
        &ConversionParams::default(),
        &HrefReader::new(),
        true,
    )
    .unwrap_err();
    assert!(matches!(err, landsat_stac::Error::InvalidArgument { arg: "input_dir", .. }));
}
