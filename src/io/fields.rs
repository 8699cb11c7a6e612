use std::collections::BTreeMap;

use thiserror::Error;

/// Errors encountered when reading MTL, ANG and USGS STAC source files
#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("I/O error reading {href}: {source}")]
    Io {
        href: String,
        #[source]
        source: std::io::Error,
    },
    #[error("XML parse error: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("Missing field `{0}` in metadata")]
    MissingField(String),
    #[error("Invalid value for `{field}`: {value}")]
    InvalidValue { field: String, value: String },
    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },
    #[error("File does not exist: {0}")]
    NotFound(String),
}

/// Flattened metadata fields keyed by `GROUP/FIELD`, where `GROUP` is the
/// innermost group (ODL) or parent element (XML) enclosing the field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetadataFields {
    values: BTreeMap<String, String>,
}

impl MetadataFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, group: &str, field: &str, value: String) {
        self.values.insert(format!("{}/{}", group, field), value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn text(&self, key: &str) -> Result<&str, MetadataError> {
        self.get(key)
            .ok_or_else(|| MetadataError::MissingField(key.to_string()))
    }

    pub fn f64(&self, key: &str) -> Result<f64, MetadataError> {
        parse_value(key, self.text(key)?)
    }

    pub fn opt_f64(&self, key: &str) -> Result<Option<f64>, MetadataError> {
        self.get(key).map(|v| parse_value(key, v)).transpose()
    }

    pub fn u32(&self, key: &str) -> Result<u32, MetadataError> {
        parse_value(key, self.text(key)?)
    }

    pub fn opt_u32(&self, key: &str) -> Result<Option<u32>, MetadataError> {
        self.get(key).map(|v| parse_value(key, v)).transpose()
    }

    /// Values of a parenthesised list such as `( 1.0, 2.0, 3.0 )`.
    pub fn f64_list(&self, key: &str) -> Result<Vec<f64>, MetadataError> {
        let raw = self.text(key)?;
        raw.trim()
            .trim_start_matches('(')
            .trim_end_matches(')')
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| parse_value(key, s))
            .collect()
    }

    /// Key of the first field named `field`, whatever group holds it.
    pub fn find(&self, field: &str) -> Option<&str> {
        self.values
            .keys()
            .find(|k| k.rsplit_once('/').is_some_and(|(_, f)| f == field))
            .map(String::as_str)
    }

    /// All `(field, value)` pairs of a group.
    pub fn group<'a>(&'a self, group: &'a str) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
        self.values.iter().filter_map(move |(k, v)| {
            k.split_once('/')
                .filter(|(g, _)| *g == group)
                .map(|(_, f)| (f, v.as_str()))
        })
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, MetadataError> {
    value
        .trim()
        .parse::<T>()
        .map_err(|_| MetadataError::InvalidValue {
            field: key.to_string(),
            value: value.to_string(),
        })
}
