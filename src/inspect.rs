//! Registry inspection
//!
//! Renders the icon registry, including every shadowed claim, either as a
//! text table or as JSON.

use indexmap::IndexMap;
use serde::Serialize;

use crate::registry::{IconRegistry, RegistryEntry};

const MAX_VALUE_WIDTH: usize = 40;

/// Snapshot of a registry for display
#[derive(Debug, Clone)]
pub struct RegistryReport {
    fail_silently: bool,
    entries: IndexMap<String, Vec<RegistryEntry>>,
}

#[derive(Serialize)]
struct ReportSettings {
    fail_silently: bool,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    settings: ReportSettings,
    #[serde(skip_serializing_if = "Option::is_none")]
    registry: Option<&'a IndexMap<String, Vec<RegistryEntry>>>,
    collisions: IndexMap<&'a str, &'a [RegistryEntry]>,
}

impl RegistryReport {
    pub fn new(registry: &IconRegistry, fail_silently: bool) -> Self {
        Self {
            fail_silently,
            entries: registry.all_entries().clone(),
        }
    }

    /// Icons claimed by more than one configuration
    pub fn collisions(&self) -> impl Iterator<Item = (&str, &[RegistryEntry])> {
        self.entries
            .iter()
            .filter(|(_, claims)| claims.len() > 1)
            .map(|(name, claims)| (name.as_str(), claims.as_slice()))
    }

    /// JSON document; `collisions_only` drops the full registry
    pub fn to_json(&self, collisions_only: bool) -> Result<serde_json::Value, serde_json::Error> {
        let report = JsonReport {
            settings: ReportSettings {
                fail_silently: self.fail_silently,
            },
            registry: (!collisions_only).then_some(&self.entries),
            collisions: self.collisions().collect(),
        };
        serde_json::to_value(report)
    }

    /// Human-readable table
    pub fn render_table(&self, collisions_only: bool) -> String {
        if collisions_only {
            return self.render_collisions();
        }

        let mut out = String::new();
        out.push_str("Icon Registry\n");
        out.push_str("=============\n");
        out.push_str(&format!("FAIL_SILENTLY: {}\n\n", self.fail_silently));
        out.push_str(&format!("Total unique icons: {}\n", self.entries.len()));
        out.push_str(&format!(
            "Icons with collisions: {}\n\n",
            self.collisions().count()
        ));

        if self.entries.is_empty() {
            out.push_str("No icons registered.\n");
            return out;
        }

        out.push_str(&format!(
            "{:<24} {:<16} {:<40} {}\n",
            "ICON", "RENDERER", "VALUE", "STATUS"
        ));
        for (name, claims) in &self.entries {
            for (i, claim) in claims.iter().enumerate() {
                let label = if i == 0 { name.as_str() } else { "" };
                out.push_str(
                    format!(
                        "{:<24} {:<16} {:<40} {}",
                        label,
                        claim.renderer,
                        truncate(&claim.value),
                        status(claim)
                    )
                    .trim_end(),
                );
                out.push('\n');
            }
        }

        if self.collisions().next().is_some() {
            out.push_str("\nCollision Summary\n");
            out.push_str("-----------------\n");
            for (name, claims) in self.collisions() {
                let shadowed: Vec<&str> = claims
                    .iter()
                    .filter(|c| !c.used)
                    .map(|c| c.renderer.as_str())
                    .collect();
                let winner = claims
                    .iter()
                    .find(|c| c.used)
                    .map(|c| c.renderer.as_str())
                    .unwrap_or("?");
                out.push_str(&format!(
                    "{}: using '{}', shadowed: {}\n",
                    name,
                    winner,
                    shadowed.join(", ")
                ));
            }
        }

        out
    }

    fn render_collisions(&self) -> String {
        if self.collisions().next().is_none() {
            return "No icon name collisions detected!\n".to_string();
        }

        let mut out = String::new();
        out.push_str("Icon Name Collisions\n");
        out.push_str("====================\n");
        for (name, claims) in self.collisions() {
            out.push_str(&format!("\n{}\n", name));
            for claim in claims {
                out.push_str(&format!(
                    "  {:<8} {:<16} {}\n",
                    status(claim),
                    claim.renderer,
                    truncate(&claim.value)
                ));
            }
        }
        out
    }
}

fn status(claim: &RegistryEntry) -> &'static str {
    if claim.used {
        "USED"
    } else {
        "SHADOWED"
    }
}

fn truncate(value: &str) -> String {
    if value.chars().count() <= MAX_VALUE_WIDTH {
        return value.to_string();
    }
    let head: String = value.chars().take(MAX_VALUE_WIDTH - 3).collect();
    format!("{}...", head)
}
