#![doc = r#"
LANDSAT-STAC: STAC metadata for Landsat Collection 2 products.

This crate turns Landsat Collection 2 metadata (MTL XML/text product metadata, ANG
angle-coefficient files, and the STAC records USGS publishes next to each product)
into STAC Items and Collections. It covers MSS, TM, ETM+ and OLI-TIRS at Level-1 and
Level-2, powers the `landsat-stac` CLI, and can be embedded in your own Rust
applications.

Stability
---------
The public library API is experimental in initial releases and may evolve as the
crate stabilizes. Breaking changes can occur.

Add dependency
--------------
```toml
[dependencies]
landsat-stac = "0.1"
```

Quick start: create an Item from an MTL file
--------------------------------------------
```rust,no_run
use landsat_stac::{create_item, ConversionParams, HrefReader};

fn main() -> landsat_stac::Result<()> {
    let item = create_item(
        "/data/LT04_L2SP_002026_19830110_20200918_02_T1_MTL.xml",
        &ConversionParams::default(),
        &HrefReader::new(),
    )?;
    println!("{} has {} assets", item.id, item.assets.len());
    Ok(())
}
```

Reshape the USGS STAC records instead
-------------------------------------
```rust,no_run
use landsat_stac::{create_item_from_usgs, ConversionParams, HrefReader};

fn main() -> landsat_stac::Result<()> {
    let params = ConversionParams {
        strict: true, // fail on missing records or unmapped assets
        ..ConversionParams::default()
    };
    let item = create_item_from_usgs(
        "/data/LM01_L1GS_001010_19720908_20200909_02_T2_MTL.xml",
        &params,
        &HrefReader::new(),
    )?;
    assert_eq!(item.links.len(), 1);
    Ok(())
}
```

Rewriting hrefs before reads
----------------------------
```rust,no_run
use landsat_stac::{create_item, ConversionParams, HrefReader};

fn main() -> landsat_stac::Result<()> {
    // e.g. serve reads from a local mirror of a blob store
    let reader = HrefReader::with_modifier(|href| {
        href.replace("https://storage.example.com/landsat", "/mnt/landsat")
    });
    let item = create_item(
        "https://storage.example.com/landsat/LC08_L2SP_047027_20201204_20210313_02_T1_MTL.xml",
        &ConversionParams::default(),
        &reader,
    )?;
    // asset hrefs keep the original (unmodified) location
    assert!(item.assets["SR_B4"].href.starts_with("https://"));
    Ok(())
}
```

Batch helpers
-------------
```rust,no_run
use std::path::Path;
use landsat_stac::{convert_directory_to_path, ConversionParams, HrefReader, ItemSource};

fn main() -> landsat_stac::Result<()> {
    let report = convert_directory_to_path(
        Path::new("/data/scenes"),
        Path::new("/out"),
        ItemSource::Mtl,
        &ConversionParams::default(),
        &HrefReader::new(),
        true, // continue_on_error
    )?;

    println!("processed={} skipped={} errors={}", report.processed, report.skipped, report.errors);
    Ok(())
}
```

Error handling
--------------
All public functions return `landsat_stac::Result<T>`; match on `landsat_stac::Error` to
handle specific cases, e.g. unreadable metadata or unknown sensor codes.

```rust,no_run
use landsat_stac::{create_item, ConversionParams, Error, HrefReader};

fn main() {
    match create_item("/bad/LX09_MTL.xml", &ConversionParams::default(), &HrefReader::new()) {
        Ok(_) => {}
        Err(Error::MissingSource { href }) => eprintln!("missing: {href}"),
        Err(Error::InvalidIdentifier { id, reason }) => eprintln!("{id}: {reason}"),
        Err(other) => eprintln!("Other error: {other}"),
    }
}
```

Useful modules
--------------
- [`api`]: high-level, ergonomic entry points.
- [`types`]: sensor classifier and scene identifier.
- [`core`]: asset/band tables, footprint resolution and the assemblers.
- [`io`]: MTL/ANG readers, href resolution and JSON writers.
- [`stac`]: the STAC object model.
- [`error`]: crate-level `Error` and `Result`.
"#]

// Core modules (public)
pub mod api;
pub mod core;
pub mod error;
pub mod io;
pub mod stac;
pub mod types;

// Curated public API surface
// Types
pub use core::params::ConversionParams;
pub use error::{Error, Result};
pub use stac::{Asset, Collection, Item, Link};
pub use types::{InstrumentFamily, ItemSource, ProductGroup, SceneId, Sensor};

// Readers
pub use io::{AngMetadata, HrefReader, MetadataError, MtlMetadata};

// High-level API re-exports
pub use api::{
    BatchReport, convert_directory_to_path, convert_to_path, create_collection_c2l1,
    create_collection_to_path, create_item, create_item_from_source, create_item_from_usgs,
    find_mtl_files,
};
