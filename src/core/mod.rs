//! Conversion building blocks: static asset/band tables, footprint resolution
//! (inverse UTM projection of angle-file corners), and the Item and Collection
//! assemblers. These are consumed by the high-level `api` module.
pub mod assets;
pub mod collection;
pub mod geometry;
pub mod item;
pub mod params;
pub mod projection;
pub mod usgs;
