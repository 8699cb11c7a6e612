use std::collections::BTreeMap;

use geojson::Geometry;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::STAC_VERSION;

/// STAC Item (GeoJSON Feature)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    #[serde(rename = "type")]
    pub type_: String,
    pub stac_version: String,
    #[serde(default)]
    pub stac_extensions: Vec<String>,
    pub id: String,
    pub geometry: Option<Geometry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bbox: Option<Vec<f64>>,
    pub properties: Map<String, Value>,
    #[serde(default)]
    pub links: Vec<Link>,
    #[serde(default)]
    pub assets: BTreeMap<String, Asset>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection: Option<String>,
    /// Top-level members outside the core Item fields
    #[serde(flatten)]
    pub extra_fields: Map<String, Value>,
}

impl Item {
    pub fn new<S: Into<String>>(id: S) -> Self {
        Item {
            type_: "Feature".to_string(),
            stac_version: STAC_VERSION.to_string(),
            stac_extensions: Vec::new(),
            id: id.into(),
            geometry: None,
            bbox: None,
            properties: Map::new(),
            links: Vec::new(),
            assets: BTreeMap::new(),
            collection: None,
            extra_fields: Map::new(),
        }
    }

    /// Declare an extension schema once.
    pub fn add_extension(&mut self, schema: &str) {
        if !self.stac_extensions.iter().any(|s| s == schema) {
            self.stac_extensions.push(schema.to_string());
        }
    }

    /// Remove an extension schema; returns whether it was declared.
    pub fn remove_extension(&mut self, schema: &str) -> bool {
        let before = self.stac_extensions.len();
        self.stac_extensions.retain(|s| s != schema);
        before != self.stac_extensions.len()
    }

    pub fn set_property<V: Into<Value>>(&mut self, key: &str, value: V) {
        self.properties.insert(key.to_string(), value.into());
    }

    pub fn self_href(&self) -> Option<&str> {
        self.links
            .iter()
            .find(|l| l.rel == "self")
            .map(|l| l.href.as_str())
    }
}

/// STAC Link
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub rel: String,
    pub href: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl Link {
    pub fn new<R: Into<String>, H: Into<String>>(rel: R, href: H) -> Self {
        Link {
            rel: rel.into(),
            href: href.into(),
            media_type: None,
            title: None,
        }
    }

    pub fn with_media_type<S: Into<String>>(mut self, media_type: S) -> Self {
        self.media_type = Some(media_type.into());
        self
    }

    pub fn with_title<S: Into<String>>(mut self, title: S) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// STAC Asset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub href: String,
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
    #[serde(rename = "raster:bands", default, skip_serializing_if = "Vec::is_empty")]
    pub raster_bands: Vec<RasterBand>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub alternate: BTreeMap<String, AlternateAsset>,
    #[serde(flatten)]
    pub extra_fields: Map<String, Value>,
}

impl Asset {
    pub fn new<S: Into<String>>(href: S) -> Self {
        Asset {
            href: href.into(),
            media_type: None,
            title: None,
            description: None,
            roles: Vec::new(),
            gsd: None,
            bands: Vec::new(),
            raster_bands: Vec::new(),
            alternate: BTreeMap::new(),
            extra_fields: Map::new(),
        }
    }
}

/// Alternate location of an asset (alternate-assets extension)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlternateAsset {
    pub href: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(flatten)]
    pub extra_fields: Map<String, Value>,
}

/// Electro-optical band (`eo:bands` entry)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub common_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub center_wavelength: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_width_half_max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gsd: Option<f64>,
    #[serde(flatten)]
    pub extra_fields: Map<String, Value>,
}

/// Raster band description (`raster:bands` entry)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RasterBand {
    pub data_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nodata: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_keeps_unknown_members() {
        let json = r#"{
            "type": "Feature",
            "stac_version": "1.0.0",
            "stac_extensions": [],
            "id": "test-item",
            "description": "top-level description",
            "geometry": null,
            "properties": { "datetime": "2020-09-09T00:00:00Z" },
            "links": [{ "rel": "self", "href": "https://example.com/item.json" }],
            "assets": {
                "B4": {
                    "href": "B4.TIF",
                    "type": "image/tiff; application=geotiff; profile=cloud-optimized",
                    "file:checksum": "abc",
                    "eo:bands": [{ "name": "B4", "common_name": "green", "center_wavelength": 0.55 }]
                }
            }
        }"#;

        let item: Item = serde_json::from_str(json).unwrap();
        assert_eq!(item.id, "test-item");
        assert_eq!(item.self_href(), Some("https://example.com/item.json"));
        assert_eq!(item.extra_fields["description"], "top-level description");
        let asset = &item.assets["B4"];
        assert_eq!(asset.bands[0].common_name.as_deref(), Some("green"));
        assert_eq!(asset.extra_fields["file:checksum"], "abc");
    }

    #[test]
    fn extensions_are_declared_once() {
        let mut item = Item::new("x");
        item.add_extension("https://example.com/a.json");
        item.add_extension("https://example.com/a.json");
        assert_eq!(item.stac_extensions.len(), 1);
        assert!(item.remove_extension("https://example.com/a.json"));
        assert!(!item.remove_extension("https://example.com/a.json"));
    }
}
