//! I/O layer: metadata readers for Landsat MTL (XML/ODL text) and ANG files,
//! href resolution with an optional rewriting hook, and JSON `writers` for
//! STAC records.
pub mod fields;
pub use fields::{MetadataError, MetadataFields};

pub mod odl;
pub use odl::parse_odl;

pub mod mtl;
pub use mtl::{MtlMetadata, Rescale};

pub mod ang;
pub use ang::AngMetadata;

pub mod href;
pub use href::{HrefModifier, HrefReader};

pub mod writers;
