#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

pub const MSS_PRODUCT: &str = "LM01_L1GS_001010_19720908_20200909_02_T2";
pub const TM_PRODUCT: &str = "LT04_L2SP_002026_19830110_20200918_02_T1";
pub const OLI_PRODUCT: &str = "LC08_L2SP_047027_20201204_20210313_02_T1";

pub fn data_dir(sensor: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(sensor)
}

pub fn fixture_href(sensor: &str, file: &str) -> String {
    data_dir(sensor).join(file).to_string_lossy().to_string()
}

pub fn mss_mtl() -> String {
    fixture_href("mss", &format!("{}_MTL.xml", MSS_PRODUCT))
}

pub fn tm_mtl() -> String {
    fixture_href("tm", &format!("{}_MTL.xml", TM_PRODUCT))
}

pub fn oli_mtl() -> String {
    fixture_href("oli", &format!("{}_MTL.txt", OLI_PRODUCT))
}

/// Copy every fixture file of `sensor` into a fresh temporary directory.
pub fn copy_fixtures(sensor: &str) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    copy_fixtures_into(sensor, dir.path());
    dir
}

pub fn copy_fixtures_into(sensor: &str, target: &Path) {
    for entry in fs::read_dir(data_dir(sensor)).unwrap() {
        let path = entry.unwrap().path();
        fs::copy(&path, target.join(path.file_name().unwrap())).unwrap();
    }
}

pub fn href_in(dir: &Path, file: &str) -> String {
    dir.join(file).to_string_lossy().to_string()
}
