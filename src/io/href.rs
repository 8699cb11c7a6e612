use std::fmt;
use std::fs;
use std::path::Path;

use tracing::debug;

use super::fields::MetadataError;

/// Rewrites an href before it is read, e.g. to route reads through signed URLs
/// or a mounted mirror.
pub type HrefModifier = dyn Fn(&str) -> String + Send + Sync;

/// Reads source files by href, applying an optional [`HrefModifier`] to every
/// href before the existence check or read.
#[derive(Default)]
pub struct HrefReader {
    modifier: Option<Box<HrefModifier>>,
}

impl fmt::Debug for HrefReader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HrefReader")
            .field("modifier", &self.modifier.is_some())
            .finish()
    }
}

impl HrefReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_modifier<F>(modifier: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        Self {
            modifier: Some(Box::new(modifier)),
        }
    }

    /// The href that is actually opened for `href`.
    pub fn resolve(&self, href: &str) -> String {
        let href = match &self.modifier {
            Some(modifier) => modifier(href),
            None => href.to_string(),
        };
        href.strip_prefix("file://").map(str::to_string).unwrap_or(href)
    }

    pub fn exists(&self, href: &str) -> bool {
        Path::new(&self.resolve(href)).is_file()
    }

    pub fn read_to_string(&self, href: &str) -> Result<String, MetadataError> {
        let resolved = self.resolve(href);
        debug!("Reading {}", resolved);
        fs::read_to_string(&resolved).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                MetadataError::NotFound(resolved)
            } else {
                MetadataError::Io {
                    href: resolved,
                    source,
                }
            }
        })
    }
}

/// `base_{suffix}`, the naming convention shared by all files of one scene.
pub fn sibling_href(base: &str, suffix: &str) -> String {
    format!("{}_{}", base, suffix)
}

/// Strip the trailing `_MTL.<ext>` (or any last `_` segment) from a metadata href.
pub fn base_href(mtl_href: &str) -> &str {
    match mtl_href.rfind('_') {
        Some(idx) => &mtl_href[..idx],
        None => mtl_href,
    }
}

/// Directory part of an href (`/`-separated, works for URLs and paths).
pub fn dirname(href: &str) -> &str {
    match href.rfind('/') {
        Some(idx) => &href[..idx],
        None => "",
    }
}

/// Last `/`-separated segment of an href.
pub fn basename(href: &str) -> &str {
    match href.rfind('/') {
        Some(idx) => &href[idx + 1..],
        None => href,
    }
}

pub fn join(dir: &str, name: &str) -> String {
    if dir.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", dir.trim_end_matches('/'), name)
    }
}
