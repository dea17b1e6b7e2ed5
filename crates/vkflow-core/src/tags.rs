//! Catalog of prompt snippets ("tags") seeded into Vibe Kanban.
//!
//! The catalog is described by a `tags.json` manifest listing each tag name
//! and the file holding its content. Built-in assets are compiled into the
//! binary; a directory can be substituted for local customisation.

use crate::error::{Result, VkflowError};
use rust_embed::Embed;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

pub const MANIFEST: &str = "tags.json";

#[derive(Embed)]
#[folder = "$CARGO_MANIFEST_DIR/assets/"]
struct BuiltinAssets;

// ---------------------------------------------------------------------------
// AssetSource
// ---------------------------------------------------------------------------

pub trait AssetSource: Send + Sync {
    /// Read the asset at `rel` (a `/`-separated path) as UTF-8 text.
    fn read(&self, rel: &str) -> Result<String>;
}

/// Assets embedded at compile time.
pub struct EmbeddedAssets;

impl AssetSource for EmbeddedAssets {
    fn read(&self, rel: &str) -> Result<String> {
        let file = <BuiltinAssets as Embed>::get(rel)
            .ok_or_else(|| VkflowError::AssetNotFound(rel.to_string()))?;
        String::from_utf8(file.data.into_owned())
            .map_err(|_| VkflowError::InvalidManifest(format!("{rel} is not UTF-8")))
    }
}

/// Assets read from a directory on disk.
pub struct DirAssets(pub PathBuf);

impl AssetSource for DirAssets {
    fn read(&self, rel: &str) -> Result<String> {
        let path = self.0.join(rel);
        if !path.is_file() {
            return Err(VkflowError::AssetNotFound(path.display().to_string()));
        }
        Ok(std::fs::read_to_string(path)?)
    }
}

// ---------------------------------------------------------------------------
// TagCatalog
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct Manifest {
    #[serde(default)]
    version: Option<u32>,
    #[serde(default)]
    tags: Option<Vec<ManifestEntry>>,
}

#[derive(Debug, Deserialize)]
struct ManifestEntry {
    #[serde(default)]
    tag_name: Option<String>,
    #[serde(default)]
    file: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagEntry {
    pub tag_name: String,
    pub content: String,
    /// Manifest-relative file the content came from.
    pub source: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagCatalog {
    pub version: u32,
    pub tags: Vec<TagEntry>,
}

impl TagCatalog {
    pub fn load(source: &dyn AssetSource) -> Result<Self> {
        let raw = source.read(MANIFEST)?;
        let manifest: Manifest = serde_json::from_str(&raw)
            .map_err(|e| VkflowError::InvalidManifest(format!("{MANIFEST}: {e}")))?;
        let entries = manifest
            .tags
            .ok_or_else(|| VkflowError::InvalidManifest(format!("{MANIFEST}: missing 'tags' array")))?;

        let tags = entries
            .into_iter()
            .enumerate()
            .map(|(i, entry)| {
                let (tag_name, file) = match (entry.tag_name, entry.file) {
                    (Some(n), Some(f)) if !n.is_empty() && !f.is_empty() => (n, f),
                    _ => {
                        return Err(VkflowError::InvalidManifest(format!(
                            "entry {i} needs both 'tag_name' and 'file'"
                        )))
                    }
                };
                let source_path = normalize_rel(&file);
                let content = source.read(&source_path)?;
                Ok(TagEntry {
                    tag_name,
                    content,
                    source: source_path,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            version: manifest.version.unwrap_or(1),
            tags,
        })
    }
}

fn normalize_rel(file: &str) -> String {
    Path::new(file)
        .components()
        .filter_map(|c| match c {
            std::path::Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

// ---------------------------------------------------------------------------
// TagCatalogCache
// ---------------------------------------------------------------------------

/// Read-through cache: the catalog is loaded on first use and kept for the
/// lifetime of the cache value.
pub struct TagCatalogCache {
    source: Box<dyn AssetSource>,
    catalog: OnceLock<TagCatalog>,
}

impl TagCatalogCache {
    pub fn new(source: Box<dyn AssetSource>) -> Self {
        Self {
            source,
            catalog: OnceLock::new(),
        }
    }

    pub fn embedded() -> Self {
        Self::new(Box::new(EmbeddedAssets))
    }

    pub fn from_dir(dir: impl Into<PathBuf>) -> Self {
        Self::new(Box::new(DirAssets(dir.into())))
    }

    pub fn get(&self) -> Result<&TagCatalog> {
        if let Some(catalog) = self.catalog.get() {
            return Ok(catalog);
        }
        let loaded = TagCatalog::load(self.source.as_ref())?;
        tracing::debug!(tags = loaded.tags.len(), "tag catalog loaded");
        Ok(self.catalog.get_or_init(|| loaded))
    }
}
