//! Icon packs
//!
//! A pack is a reusable icon table referenced by path from a renderer
//! configuration. Packs are either registered in code under an arbitrary
//! path string or read from `.toml` / `.json` files. A pack that cannot be
//! loaded is logged and skipped, it never fails the lookup.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use thiserror::Error;

use crate::loader::resolve_path;
use crate::renderer::IconMap;

/// Reasons a pack could not be used
#[derive(Error, Debug)]
pub enum PackError {
    #[error("no pack registered under '{path}'")]
    Unresolvable { path: String },

    #[error("failed to read pack file {}: {source}", .file.display())]
    Io {
        file: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse pack TOML {}: {source}", .file.display())]
    Toml {
        file: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to parse pack JSON {}: {source}", .file.display())]
    Json {
        file: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Packs addressable by path
#[derive(Debug, Clone, Default)]
pub struct PackLibrary {
    packs: IndexMap<String, toml::Value>,
    base_dir: Option<PathBuf>,
}

impl PackLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve pack files relative to this directory
    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    /// Builder form of [`register`](Self::register)
    pub fn with_pack(mut self, path: impl Into<String>, pack: impl Into<toml::Value>) -> Self {
        self.register(path, pack);
        self
    }

    /// Register a pack under a path string
    pub fn register(&mut self, path: impl Into<String>, pack: impl Into<toml::Value>) {
        self.packs.insert(path.into(), pack.into());
    }

    pub fn base_dir(&self) -> Option<&Path> {
        self.base_dir.as_deref()
    }

    /// Load the raw value of a pack
    pub fn load(&self, path: &str) -> Result<toml::Value, PackError> {
        if let Some(pack) = self.packs.get(path) {
            return Ok(pack.clone());
        }

        let is_toml = path.ends_with(".toml");
        let is_json = path.ends_with(".json");
        if !is_toml && !is_json {
            return Err(PackError::Unresolvable {
                path: path.to_string(),
            });
        }

        let file = resolve_path(self.base_dir.as_deref(), Path::new(path));
        let content = std::fs::read_to_string(&file).map_err(|source| PackError::Io {
            file: file.clone(),
            source,
        })?;

        if is_toml {
            toml::from_str::<toml::Table>(&content)
                .map(toml::Value::Table)
                .map_err(|source| PackError::Toml { file, source })
        } else {
            serde_json::from_str::<toml::Value>(&content)
                .map_err(|source| PackError::Json { file, source })
        }
    }

    /// Load packs in order and merge them, later packs winning
    ///
    /// Unloadable packs, packs that are not a mapping and non-string entries
    /// are skipped with a warning naming `owner`.
    pub fn load_and_merge_packs(&self, paths: &[String], owner: &str) -> IconMap {
        let mut merged = IconMap::new();

        for path in paths {
            let pack = match self.load(path) {
                Ok(pack) => pack,
                Err(e) => {
                    tracing::warn!("Cannot import pack '{}' for '{}': {}", path, owner, e);
                    continue;
                }
            };
            let toml::Value::Table(table) = pack else {
                tracing::warn!(
                    "Pack '{}' for '{}' is not a dictionary, skipping",
                    path,
                    owner
                );
                continue;
            };

            for (name, value) in table {
                match value {
                    toml::Value::String(identifier) => {
                        merged.insert(name, identifier);
                    }
                    _ => tracing::warn!(
                        "Skipping icon '{}' in pack '{}': value is not a string",
                        name,
                        path
                    ),
                }
            }
        }

        merged
    }
}

/// Overlay explicit icons on the merged pack table
///
/// Explicit entries win over any pack entry of the same name.
pub fn merge_icon_table(packs: IconMap, explicit: &IconMap) -> IconMap {
    let mut merged = packs;
    for (name, identifier) in explicit {
        merged.insert(name.clone(), identifier.clone());
    }
    merged
}
