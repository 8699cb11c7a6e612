//! Minimal STAC object model: Items, Collections, Assets and Links as serde
//! structs, plus the media types and extension schemas used by Landsat records.
//! Members outside the typed fields round-trip through `extra_fields`.
pub mod collection;
pub mod item;

pub use collection::{
    Collection, Extent, ItemAssetDefinition, Provider, SpatialExtent, TemporalExtent,
};
pub use item::{AlternateAsset, Asset, Band, Item, Link, RasterBand};

pub const STAC_VERSION: &str = "1.0.0";

pub mod media_type {
    pub const COG: &str = "image/tiff; application=geotiff; profile=cloud-optimized";
    pub const JPEG: &str = "image/jpeg";
    pub const JSON: &str = "application/json";
    pub const TEXT: &str = "text/plain";
    pub const XML: &str = "application/xml";
    pub const HTML: &str = "text/html";
}

pub mod schema {
    pub const EO: &str = "https://stac-extensions.github.io/eo/v1.0.0/schema.json";
    pub const VIEW: &str = "https://stac-extensions.github.io/view/v1.0.0/schema.json";
    pub const PROJECTION: &str = "https://stac-extensions.github.io/projection/v1.0.0/schema.json";
    pub const RASTER: &str = "https://stac-extensions.github.io/raster/v1.0.0/schema.json";
    pub const ALTERNATE: &str =
        "https://stac-extensions.github.io/alternate-assets/v1.1.0/schema.json";
    pub const ITEM_ASSETS: &str =
        "https://stac-extensions.github.io/item-assets/v1.0.0/schema.json";
    pub const FILE: &str = "https://stac-extensions.github.io/file/v1.0.0/schema.json";
    pub const STORAGE: &str = "https://stac-extensions.github.io/storage/v1.0.0/schema.json";
    pub const LANDSAT: &str = "https://landsat.usgs.gov/stac/landsat-extension/v1.1.1/schema.json";
    /// Landsat extension version used for OLI-TIRS items
    pub const LANDSAT_OLI: &str =
        "https://landsat.usgs.gov/stac/landsat-extension/v1.1.0/schema.json";
}
