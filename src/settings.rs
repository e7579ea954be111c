//! Icon settings loaded from TOML
//!
//! A settings document mixes two kinds of top-level keys. All-caps keys are
//! global options (`DEBUG`, `FAIL_SILENTLY`, `ALIASES`, `TEMPLATE_DIRS`);
//! every other key names a renderer configuration:
//!
//! ```toml
//! FAIL_SILENTLY = false
//!
//! [default]
//! renderer = "svg"
//! config = { svg_dir = "icons" }
//! icons = { home = "home.svg" }
//!
//! [fontawesome]
//! renderer = "provider"
//! packs = ["packs/fontawesome.toml"]
//! icons = { heart = "fas fa-heart" }
//! ```
//!
//! Renderer configurations keep their declaration order.

use std::path::{Path, PathBuf};

use ariadne::{Color, Label, Report, ReportKind, Source};
use indexmap::IndexMap;
use thiserror::Error;

use crate::error::ConfigError;
use crate::loader::resolve_path;
use crate::renderer::IconMap;

/// Name of the renderer used when none is requested
pub const DEFAULT_RENDERER: &str = "default";

/// Errors that can occur when loading a settings document
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to read settings file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse settings TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("global option '{key}' must be {expected}")]
    InvalidGlobal { key: String, expected: String },
}

impl SettingsError {
    /// Format the error with source context using ariadne
    ///
    /// Falls back to the plain message when no location is known.
    pub fn format(&self, source: &str, filename: &str) -> String {
        let span = match self {
            SettingsError::Parse(err) => err.span(),
            _ => None,
        };
        let Some(span) = span else {
            return format!("{}: {}\n", filename, self);
        };

        let message = match self {
            SettingsError::Parse(err) => err.message().to_string(),
            other => other.to_string(),
        };

        let mut buf = Vec::new();
        let written = Report::build(ReportKind::Error, filename, span.start)
            .with_message("invalid icon settings")
            .with_label(
                Label::new((filename, span))
                    .with_message(message)
                    .with_color(Color::Red),
            )
            .finish()
            .write((filename, Source::from(source)), &mut buf);
        match written {
            Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
            Err(_) => format!("{}: {}\n", filename, self),
        }
    }
}

/// Parsed settings document
#[derive(Debug, Clone)]
pub struct Settings {
    /// Host debug flag
    pub debug: bool,
    /// Explicit fail-silently option; falls back to `debug` when absent
    pub fail_silently: Option<bool>,
    /// Alias name -> icon name
    pub aliases: IndexMap<String, String>,
    /// Roots searched by the default SVG loader
    pub template_dirs: Vec<PathBuf>,
    /// Directory relative paths are resolved against
    pub base_dir: Option<PathBuf>,
    renderers: toml::Table,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug: false,
            fail_silently: None,
            aliases: IndexMap::new(),
            template_dirs: vec![PathBuf::from("templates")],
            base_dir: None,
            renderers: toml::Table::new(),
        }
    }
}

/// A renderer configuration, strictly validated
#[derive(Debug, Clone, PartialEq)]
pub struct RendererEntry {
    pub name: String,
    /// Renderer kind, e.g. `svg`
    pub kind: String,
    /// Kind-specific options
    pub config: toml::Table,
    pub packs: Vec<String>,
    pub icons: IconMap,
}

/// The icon sources of a renderer configuration, leniently read
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IconSources {
    pub packs: Vec<String>,
    pub icons: IconMap,
}

fn is_global_key(key: &str) -> bool {
    key.chars().any(char::is_alphabetic) && !key.chars().any(char::is_lowercase)
}

impl Settings {
    /// Load settings from a TOML file
    ///
    /// Relative paths inside the document resolve against the file's directory.
    pub fn from_file(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path)?;
        let mut settings = Self::from_str(&content)?;
        settings.base_dir = path.parent().map(Path::to_path_buf);
        Ok(settings)
    }

    /// Load settings from a TOML string
    pub fn from_str(content: &str) -> Result<Self, SettingsError> {
        let table: toml::Table = toml::from_str(content)?;
        Self::from_table(table)
    }

    /// Build settings from an already parsed TOML table
    pub fn from_table(table: toml::Table) -> Result<Self, SettingsError> {
        let mut settings = Settings::default();

        for (key, value) in table {
            if !is_global_key(&key) {
                settings.renderers.insert(key, value);
                continue;
            }
            match key.as_str() {
                "DEBUG" => settings.debug = expect_bool(&key, &value)?,
                "FAIL_SILENTLY" => settings.fail_silently = Some(expect_bool(&key, &value)?),
                "ALIASES" => settings.aliases = expect_string_table(&key, &value)?,
                "TEMPLATE_DIRS" => {
                    settings.template_dirs = expect_string_array(&key, &value)?
                        .into_iter()
                        .map(PathBuf::from)
                        .collect()
                }
                _ => {}
            }
        }

        Ok(settings)
    }

    /// Set the directory relative paths resolve against
    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    /// Set the debug flag
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Set the fail-silently option explicitly
    pub fn with_fail_silently(mut self, fail_silently: bool) -> Self {
        self.fail_silently = Some(fail_silently);
        self
    }

    /// Add an alias
    pub fn with_alias(mut self, alias: impl Into<String>, target: impl Into<String>) -> Self {
        self.aliases.insert(alias.into(), target.into());
        self
    }

    /// Add or replace a raw renderer configuration
    pub fn with_renderer(mut self, name: impl Into<String>, entry: toml::Value) -> Self {
        self.renderers.insert(name.into(), entry);
        self
    }

    /// Effective fail-silently mode
    pub fn fail_silently(&self) -> bool {
        self.fail_silently.unwrap_or(self.debug)
    }

    /// Alias resolution; unknown names map to themselves
    pub fn resolve_alias<'a>(&'a self, name: &'a str) -> &'a str {
        self.aliases.get(name).map(String::as_str).unwrap_or(name)
    }

    /// Renderer configuration names in declaration order
    pub fn renderer_names(&self) -> impl Iterator<Item = &str> {
        self.renderers.keys().map(String::as_str)
    }

    /// Template roots, resolved against the base directory
    pub fn template_roots(&self) -> Vec<PathBuf> {
        self.template_dirs
            .iter()
            .map(|dir| resolve_path(self.base_dir.as_deref(), dir))
            .collect()
    }

    /// Strictly validated renderer configuration
    pub fn entry(&self, name: &str) -> Result<RendererEntry, ConfigError> {
        let value = self
            .renderers
            .get(name)
            .ok_or_else(|| ConfigError::NotConfigured {
                name: name.to_string(),
            })?;
        let table = value.as_table().ok_or_else(|| ConfigError::EntryNotATable {
            name: name.to_string(),
        })?;

        let invalid = |field: &str, expected: &str| ConfigError::InvalidField {
            name: name.to_string(),
            field: field.to_string(),
            expected: expected.to_string(),
        };

        let kind = match table.get("renderer") {
            None => {
                return Err(ConfigError::MissingRendererKind {
                    name: name.to_string(),
                })
            }
            Some(toml::Value::String(kind)) => kind.clone(),
            Some(_) => return Err(invalid("renderer", "a string")),
        };

        let config = match table.get("config") {
            None => toml::Table::new(),
            Some(toml::Value::Table(config)) => config.clone(),
            Some(_) => return Err(invalid("config", "a table")),
        };

        let packs = match table.get("packs") {
            None => Vec::new(),
            Some(toml::Value::Array(items)) => items
                .iter()
                .map(|item| item.as_str().map(str::to_string))
                .collect::<Option<Vec<_>>>()
                .ok_or_else(|| invalid("packs", "an array of strings"))?,
            Some(_) => return Err(invalid("packs", "an array of strings")),
        };

        let icons = match table.get("icons") {
            None => IconMap::new(),
            Some(toml::Value::Table(icons)) => string_icons(name, icons),
            Some(_) => return Err(invalid("icons", "a table of strings")),
        };

        Ok(RendererEntry {
            name: name.to_string(),
            kind,
            config,
            packs,
            icons,
        })
    }

    /// Icon sources of a renderer configuration, skipping malformed parts
    ///
    /// Returns `None` when the entry is missing or not a table.
    pub fn icon_sources(&self, name: &str) -> Option<IconSources> {
        let table = self.renderers.get(name)?.as_table()?;

        let packs = table
            .get("packs")
            .and_then(toml::Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| item.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default();

        let icons = table
            .get("icons")
            .and_then(toml::Value::as_table)
            .map(|icons| string_icons(name, icons))
            .unwrap_or_default();

        Some(IconSources { packs, icons })
    }
}

/// String entries of an `icons` table; other values are skipped with a warning
fn string_icons(owner: &str, icons: &toml::Table) -> IconMap {
    icons
        .iter()
        .filter_map(|(k, v)| match v.as_str() {
            Some(v) => Some((k.clone(), v.to_string())),
            None => {
                tracing::warn!(
                    "Skipping icon '{}' in '{}': value is not a string",
                    k,
                    owner
                );
                None
            }
        })
        .collect()
}

fn expect_bool(key: &str, value: &toml::Value) -> Result<bool, SettingsError> {
    value.as_bool().ok_or_else(|| SettingsError::InvalidGlobal {
        key: key.to_string(),
        expected: "a boolean".to_string(),
    })
}

fn expect_string_table(
    key: &str,
    value: &toml::Value,
) -> Result<IndexMap<String, String>, SettingsError> {
    let invalid = || SettingsError::InvalidGlobal {
        key: key.to_string(),
        expected: "a table of strings".to_string(),
    };
    value
        .as_table()
        .ok_or_else(invalid)?
        .iter()
        .map(|(k, v)| v.as_str().map(|v| (k.clone(), v.to_string())))
        .collect::<Option<_>>()
        .ok_or_else(invalid)
}

fn expect_string_array(key: &str, value: &toml::Value) -> Result<Vec<String>, SettingsError> {
    let invalid = || SettingsError::InvalidGlobal {
        key: key.to_string(),
        expected: "an array of strings".to_string(),
    };
    value
        .as_array()
        .ok_or_else(invalid)?
        .iter()
        .map(|v| v.as_str().map(str::to_string))
        .collect::<Option<_>>()
        .ok_or_else(invalid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = r#"
DEBUG = true
ALIASES = { house = "home" }

[zeta]
renderer = "provider"
icons = { star = "fa-star" }

[default]
renderer = "svg"
config = { svg_dir = "svg" }
packs = ["base"]
icons = { home = "home.svg" }
"#;

    #[test]
    fn test_parse_globals_and_renderers() {
        let settings = Settings::from_str(SAMPLE).expect("Should parse settings");
        assert!(settings.debug);
        assert_eq!(settings.resolve_alias("house"), "home");
        assert_eq!(settings.resolve_alias("other"), "other");
        assert_eq!(
            settings.renderer_names().collect::<Vec<_>>(),
            vec!["zeta", "default"]
        );
    }

    #[test]
    fn test_fail_silently_defaults_to_debug() {
        let settings = Settings::from_str("DEBUG = true").unwrap();
        assert!(settings.fail_silently());

        let settings = Settings::from_str("DEBUG = true\nFAIL_SILENTLY = false").unwrap();
        assert!(!settings.fail_silently());

        assert!(!Settings::default().fail_silently());
    }

    #[test]
    fn test_unknown_caps_keys_are_not_renderers() {
        let settings =
            Settings::from_str("SOMETHING_ELSE = 1\n[default]\nrenderer = \"svg\"").unwrap();
        assert_eq!(settings.renderer_names().collect::<Vec<_>>(), vec!["default"]);
    }

    #[test]
    fn test_entry_strict_validation() {
        let settings = Settings::from_str(SAMPLE).unwrap();
        let entry = settings.entry("default").expect("Should read entry");
        assert_eq!(entry.kind, "svg");
        assert_eq!(entry.packs, vec!["base".to_string()]);
        assert_eq!(entry.icons.get("home").map(String::as_str), Some("home.svg"));
        assert_eq!(entry.config.get("svg_dir").and_then(|v| v.as_str()), Some("svg"));

        assert_eq!(
            settings.entry("missing"),
            Err(ConfigError::NotConfigured {
                name: "missing".into()
            })
        );

        let settings = Settings::from_str("[bad]\nconfig = {}").unwrap();
        assert_eq!(
            settings.entry("bad"),
            Err(ConfigError::MissingRendererKind { name: "bad".into() })
        );

        let settings = Settings::from_str("bad = 3").unwrap();
        assert_eq!(
            settings.entry("bad"),
            Err(ConfigError::EntryNotATable { name: "bad".into() })
        );
    }

    #[test]
    fn test_entry_skips_non_string_icons() {
        let settings = Settings::from_str(
            "[default]\nrenderer = \"provider\"\nicons = { home = \"fa-home\", size = 3 }",
        )
        .unwrap();
        let entry = settings.entry("default").expect("Should read entry");
        assert_eq!(entry.icons.len(), 1);
        assert_eq!(entry.icons.get("home").map(String::as_str), Some("fa-home"));
        assert_eq!(
            settings.icon_sources("default").map(|s| s.icons),
            Some(entry.icons)
        );
    }

    #[test]
    fn test_icon_sources_lenient() {
        let settings = Settings::from_str(
            "plain = 1\n[odd]\nrenderer = \"svg\"\nicons = \"nope\"\n\
             [mixed]\nicons = { a = \"x\", b = 2 }",
        )
        .unwrap();
        assert_eq!(settings.icon_sources("plain"), None);
        assert_eq!(settings.icon_sources("odd"), Some(IconSources::default()));
        let mixed = settings.icon_sources("mixed").unwrap();
        assert_eq!(mixed.icons.len(), 1);
        assert_eq!(mixed.icons.get("a").map(String::as_str), Some("x"));
    }

    #[test]
    fn test_invalid_global_type() {
        let err = Settings::from_str("DEBUG = \"yes\"").unwrap_err();
        assert!(matches!(err, SettingsError::InvalidGlobal { ref key, .. } if key == "DEBUG"));
    }

    #[test]
    fn test_template_roots_resolve_against_base_dir() {
        let settings = Settings::from_str("TEMPLATE_DIRS = [\"tpl\", \"/abs\"]")
            .unwrap()
            .with_base_dir("/srv/site");
        assert_eq!(
            settings.template_roots(),
            vec![PathBuf::from("/srv/site/tpl"), PathBuf::from("/abs")]
        );
    }

    #[test]
    fn test_parse_error_report_points_at_location() {
        let source = "[default]\nrenderer = \n";
        let err = Settings::from_str(source).unwrap_err();
        let report = err.format(source, "icons.toml");
        assert!(report.contains("icons.toml"));
        assert!(report.contains("invalid icon settings"));
    }
}
