//! Output writers for converted records.
pub mod stac;

pub use stac::{save_collection, save_item, write_json};
