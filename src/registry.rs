//! Global icon registry
//!
//! Maps every logical icon name to the renderer configuration that serves it
//! when no renderer is requested explicitly. The `default` configuration is
//! consulted first, the rest in declaration order, and the first
//! configuration to declare a name owns it.

use indexmap::IndexMap;
use serde::Serialize;

use crate::packs::{merge_icon_table, PackLibrary};
use crate::settings::{Settings, DEFAULT_RENDERER};

/// One configuration's claim on an icon name
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistryEntry {
    pub renderer: String,
    pub value: String,
    /// Whether this claim won
    pub used: bool,
}

/// Icon name -> owning renderer configuration
#[derive(Debug, Clone, Default)]
pub struct IconRegistry {
    owners: IndexMap<String, String>,
    entries: IndexMap<String, Vec<RegistryEntry>>,
}

impl IconRegistry {
    /// Build the registry from settings
    ///
    /// Entries that are not tables contribute nothing. Every collision is
    /// logged as a warning naming both configurations.
    pub fn build(settings: &Settings, packs: &PackLibrary) -> Self {
        let mut registry = IconRegistry::default();

        let ordered = settings
            .renderer_names()
            .filter(|name| *name == DEFAULT_RENDERER)
            .chain(settings.renderer_names().filter(|name| *name != DEFAULT_RENDERER));

        for name in ordered {
            let Some(sources) = settings.icon_sources(name) else {
                tracing::debug!("Skipping renderer config '{}': not a table", name);
                continue;
            };
            let icons = merge_icon_table(
                packs.load_and_merge_packs(&sources.packs, name),
                &sources.icons,
            );
            for (icon, value) in icons {
                registry.claim(icon, name, value);
            }
        }

        registry
    }

    fn claim(&mut self, icon: String, renderer: &str, value: String) {
        let used = match self.owners.get(&icon) {
            Some(owner) => {
                tracing::warn!(
                    "Icon name collision: '{}' is defined in both '{}' and '{}'; using '{}'",
                    icon,
                    owner,
                    renderer,
                    owner
                );
                false
            }
            None => {
                self.owners.insert(icon.clone(), renderer.to_string());
                true
            }
        };
        self.entries.entry(icon).or_default().push(RegistryEntry {
            renderer: renderer.to_string(),
            value,
            used,
        });
    }

    /// Name of the configuration owning an icon
    pub fn resolve(&self, name: &str) -> Option<&str> {
        self.owners.get(name).map(String::as_str)
    }

    /// Registered icon names in registration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.owners.keys().map(String::as_str)
    }

    /// Every claim on an icon, winner first
    pub fn entries(&self, name: &str) -> &[RegistryEntry] {
        self.entries.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All claims, keyed by icon name
    pub fn all_entries(&self) -> &IndexMap<String, Vec<RegistryEntry>> {
        &self.entries
    }

    /// Icons claimed by more than one configuration
    pub fn collisions(&self) -> impl Iterator<Item = (&str, &[RegistryEntry])> {
        self.entries
            .iter()
            .filter(|(_, claims)| claims.len() > 1)
            .map(|(name, claims)| (name.as_str(), claims.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.owners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }
}
