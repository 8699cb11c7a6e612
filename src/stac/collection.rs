use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{Band, Link, STAC_VERSION};

/// STAC Collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    #[serde(rename = "type")]
    pub type_: String,
    pub stac_version: String,
    #[serde(default)]
    pub stac_extensions: Vec<String>,
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
    pub license: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub providers: Vec<Provider>,
    pub extent: Extent,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub summaries: Map<String, Value>,
    #[serde(default)]
    pub links: Vec<Link>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub item_assets: BTreeMap<String, ItemAssetDefinition>,
}

impl Collection {
    pub fn new<I: Into<String>, D: Into<String>>(id: I, description: D, extent: Extent) -> Self {
        Collection {
            type_: "Collection".to_string(),
            stac_version: STAC_VERSION.to_string(),
            stac_extensions: Vec::new(),
            id: id.into(),
            title: None,
            description: description.into(),
            keywords: Vec::new(),
            license: "proprietary".to_string(),
            providers: Vec::new(),
            extent,
            summaries: Map::new(),
            links: Vec::new(),
            item_assets: BTreeMap::new(),
        }
    }

    pub fn add_extension(&mut self, schema: &str) {
        if !self.stac_extensions.iter().any(|s| s == schema) {
            self.stac_extensions.push(schema.to_string());
        }
    }
}

/// STAC Provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Provider {
    pub name: String,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Provider {
    pub fn new(name: &str, roles: &[&str], url: &str) -> Self {
        Provider {
            name: name.to_string(),
            roles: roles.iter().map(|r| r.to_string()).collect(),
            url: Some(url.to_string()),
        }
    }
}

/// STAC Extent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    pub spatial: SpatialExtent,
    pub temporal: TemporalExtent,
}

/// Spatial Extent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpatialExtent {
    pub bbox: Vec<Vec<f64>>,
}

/// Temporal Extent; `None` marks an open interval end
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemporalExtent {
    pub interval: Vec<Vec<Option<String>>>,
}

/// Asset description without an href (item-assets extension)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemAssetDefinition {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gsd: Option<f64>,
    #[serde(rename = "eo:bands", default, skip_serializing_if = "Vec::is_empty")]
    pub bands: Vec<Band>,
}
