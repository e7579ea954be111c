//! SVG source loading
//!
//! The inline SVG renderer does not read files itself; it asks an
//! [`SvgLoader`] for the raw markup of a relative path such as
//! `icons/home.svg`. [`DirLoader`] searches a list of template roots on disk,
//! [`MemoryLoader`] serves markup registered in code.

use std::collections::HashMap;
use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::LoadError;

/// Source of raw SVG markup
pub trait SvgLoader: Send + Sync + fmt::Debug {
    /// Load the markup stored under a relative path
    fn load(&self, path: &str) -> Result<String, LoadError>;
}

/// Loads SVG files from a list of template roots, first match wins
#[derive(Debug, Clone, Default)]
pub struct DirLoader {
    roots: Vec<PathBuf>,
}

impl DirLoader {
    /// Create a loader searching the given roots in order
    pub fn new(roots: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
        Self {
            roots: roots.into_iter().map(Into::into).collect(),
        }
    }

    /// Add a root searched after the existing ones
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.roots.push(root.into());
        self
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    fn candidates<'a>(&'a self, relative: &'a str) -> impl Iterator<Item = PathBuf> + 'a {
        self.roots.iter().map(move |root| root.join(relative))
    }
}

impl SvgLoader for DirLoader {
    fn load(&self, path: &str) -> Result<String, LoadError> {
        for candidate in self.candidates(path) {
            match std::fs::read_to_string(&candidate) {
                Ok(content) => return Ok(content),
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => {
                    return Err(LoadError::Io {
                        path: candidate,
                        source: e,
                    })
                }
            }
        }

        Err(LoadError::NotFound {
            path: path.to_string(),
            searched: self.roots.clone(),
        })
    }
}

/// Serves SVG markup registered in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryLoader {
    sources: HashMap<String, String>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register markup under a relative path
    pub fn with_source(mut self, path: impl Into<String>, svg: impl Into<String>) -> Self {
        self.insert(path, svg);
        self
    }

    pub fn insert(&mut self, path: impl Into<String>, svg: impl Into<String>) {
        self.sources.insert(path.into(), svg.into());
    }
}

impl SvgLoader for MemoryLoader {
    fn load(&self, path: &str) -> Result<String, LoadError> {
        self.sources
            .get(path)
            .cloned()
            .ok_or_else(|| LoadError::NotFound {
                path: path.to_string(),
                searched: Vec::new(),
            })
    }
}

/// Resolve a possibly relative path against an optional base directory
pub(crate) fn resolve_path(base: Option<&Path>, relative: &Path) -> PathBuf {
    match base {
        Some(base) if relative.is_relative() => base.join(relative),
        _ => relative.to_path_buf(),
    }
}
