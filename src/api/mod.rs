//! High-level, ergonomic library API: convert one product to a STAC Item in
//! memory or on disk, batch helpers for directories of products, and the
//! Collection builder. Prefer these entrypoints over the `core` assemblers when
//! integrating landsat-stac.
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::core::params::ConversionParams;
use crate::error::{Error, Result};
use crate::io::HrefReader;
use crate::io::writers::stac::{save_collection, save_item};
use crate::stac::{Collection, Item};
use crate::types::{ItemSource, classify};

pub use crate::core::collection::create_collection_c2l1;
pub use crate::core::item::create_item;
pub use crate::core::usgs::create_item_from_usgs;

/// Create an Item from `mtl_href` using the chosen source.
pub fn create_item_from_source(
    mtl_href: &str,
    source: ItemSource,
    params: &ConversionParams,
    reader: &HrefReader,
) -> Result<Item> {
    match source {
        ItemSource::Mtl => create_item(mtl_href, params, reader),
        ItemSource::Usgs => create_item_from_usgs(mtl_href, params, reader),
    }
}

/// Convert one product and write `{output_dir}/{id}.json`.
pub fn convert_to_path(
    mtl_href: &str,
    output_dir: &Path,
    source: ItemSource,
    params: &ConversionParams,
    reader: &HrefReader,
) -> Result<PathBuf> {
    let item = create_item_from_source(mtl_href, source, params, reader)?;
    save_item(&item, output_dir)
}

/// Build the Level-1 collection from a sample MSS product and write
/// `{output_dir}/collection.json`.
pub fn create_collection_to_path(
    mss_mtl_href: &str,
    output_dir: &Path,
    params: &ConversionParams,
    reader: &HrefReader,
) -> Result<(Collection, PathBuf)> {
    let collection = create_collection_c2l1(mss_mtl_href, params, reader)?;
    let path = save_collection(&collection, output_dir)?;
    Ok((collection, path))
}

/// Summary of a batch conversion
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BatchReport {
    pub processed: usize,
    pub skipped: usize,
    pub errors: usize,
}

/// MTL files directly inside `input_dir`, one per product (XML preferred over
/// text), sorted by file name. Files whose names carry no recognizable
/// sensor code are reported separately.
pub fn find_mtl_files(input_dir: &Path) -> Result<(Vec<PathBuf>, Vec<PathBuf>)> {
    let mut products: BTreeMap<String, PathBuf> = BTreeMap::new();
    let mut unrecognized = Vec::new();

    for entry in fs::read_dir(input_dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let Some(product) = name
            .strip_suffix("_MTL.xml")
            .or_else(|| name.strip_suffix("_MTL.txt"))
        else {
            continue;
        };
        if classify(product).is_err() {
            unrecognized.push(path);
            continue;
        }
        let is_xml = name.ends_with(".xml");
        let product = product.to_string();
        match products.get(&product) {
            Some(existing) if existing.extension().is_some_and(|e| e == "xml") || !is_xml => {}
            _ => {
                products.insert(product, path);
            }
        }
    }

    Ok((products.into_values().collect(), unrecognized))
}

/// Convert every product in `input_dir` into `output_dir` using `params`.
/// If `continue_on_error` is true, errors are counted in the report and
/// conversion continues; otherwise, the first error is returned.
pub fn convert_directory_to_path(
    input_dir: &Path,
    output_dir: &Path,
    source: ItemSource,
    params: &ConversionParams,
    reader: &HrefReader,
    continue_on_error: bool,
) -> Result<BatchReport> {
    if !input_dir.is_dir() {
        return Err(Error::InvalidArgument {
            arg: "input_dir",
            value: input_dir.display().to_string(),
        });
    }
    fs::create_dir_all(output_dir)?;
    let mut report = BatchReport::default();

    let (mtl_files, unrecognized) = find_mtl_files(input_dir)?;
    for path in unrecognized {
        warn!("Skipping {:?}: no recognizable Landsat sensor code", path);
        report.skipped += 1;
    }

    for path in mtl_files {
        let href = path.to_string_lossy();
        match convert_to_path(&href, output_dir, source, params, reader) {
            Ok(written) => {
                info!("Converted {} -> {:?}", href, written);
                report.processed += 1;
            }
            Err(e) => {
                report.errors += 1;
                if !continue_on_error {
                    return Err(e);
                }
                warn!("Error converting {}: {}", href, e);
            }
        }
    }

    Ok(report)
}
