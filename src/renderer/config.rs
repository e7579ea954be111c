//! Construction options shared by every renderer kind

use crate::attrs::{AttrValue, Attributes};
use crate::error::BuildError;
use crate::renderer::IconMap;

/// Options a renderer is constructed from
#[derive(Debug, Clone, Default)]
pub struct RendererOptions {
    /// Name of the renderer configuration, used in error messages
    pub label: String,

    /// Logical icon name -> renderer-specific identifier
    pub icons: IconMap,

    /// Attributes applied to every icon unless the caller opts out
    pub default_attrs: Attributes,

    /// Kind-specific options such as `svg_dir`, `tag` or `sprite_url`
    pub config: toml::Table,
}

impl RendererOptions {
    /// Create options with no icons and no defaults
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }

    /// Build options from a configuration table
    ///
    /// A `default_attrs` table inside `config` becomes the default attribute
    /// set; the remaining keys stay available to the renderer kind.
    pub fn from_config(
        label: impl Into<String>,
        icons: IconMap,
        mut config: toml::Table,
    ) -> Result<Self, BuildError> {
        let default_attrs = match config.remove("default_attrs") {
            None => Attributes::new(),
            Some(toml::Value::Table(table)) => table
                .iter()
                .map(|(name, value)| AttrValue::from_toml(value).map(|v| (name.clone(), v)))
                .collect::<Option<Attributes>>()
                .ok_or_else(|| {
                    invalid("default_attrs", "a table of strings, numbers or booleans")
                })?,
            Some(_) => return Err(invalid("default_attrs", "a table")),
        };

        Ok(Self {
            label: label.into(),
            icons,
            default_attrs,
            config,
        })
    }

    /// Set the icon table
    pub fn with_icons(mut self, icons: IconMap) -> Self {
        self.icons = icons;
        self
    }

    /// Add a single icon
    pub fn with_icon(mut self, name: impl Into<String>, identifier: impl Into<String>) -> Self {
        self.icons.insert(name.into(), identifier.into());
        self
    }

    /// Set the default attributes
    pub fn with_default_attrs(mut self, attrs: Attributes) -> Self {
        self.default_attrs = attrs;
        self
    }

    /// Set a kind-specific option
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<toml::Value>) -> Self {
        self.config.insert(key.into(), value.into());
        self
    }

    /// A string option, `None` when absent
    pub fn string_option(&self, key: &str) -> Result<Option<&str>, BuildError> {
        match self.config.get(key) {
            None => Ok(None),
            Some(toml::Value::String(s)) => Ok(Some(s.as_str())),
            Some(_) => Err(invalid(key, "a string")),
        }
    }

    /// A string option that must be present and non-empty
    pub fn required_string(&self, kind: &str, key: &str) -> Result<&str, BuildError> {
        match self.string_option(key)? {
            Some(value) if !value.trim().is_empty() => Ok(value),
            _ => Err(BuildError::MissingOption {
                kind: kind.to_string(),
                option: key.to_string(),
            }),
        }
    }
}

fn invalid(option: &str, expected: &str) -> BuildError {
    BuildError::InvalidOption {
        option: option.to_string(),
        expected: expected.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(src: &str) -> toml::Table {
        toml::from_str(src).unwrap()
    }

    #[test]
    fn test_default_attrs_extracted_from_config() {
        let options = RendererOptions::from_config(
            "default",
            IconMap::new(),
            table(
                "svg_dir = \"svg\"\n\
                 default_attrs = { class = \"icon\", height = 16, hidden = true }",
            ),
        )
        .expect("Should build options");

        assert_eq!(options.default_attrs.render(), r#"class="icon" height="16" hidden"#);
        assert!(!options.config.contains_key("default_attrs"));
        assert_eq!(options.string_option("svg_dir"), Ok(Some("svg")));
    }

    #[test]
    fn test_invalid_default_attrs() {
        let err = RendererOptions::from_config("x", IconMap::new(), table("default_attrs = 3"))
            .unwrap_err();
        assert!(matches!(
            err,
            BuildError::InvalidOption { ref option, .. } if option == "default_attrs"
        ));
    }

    #[test]
    fn test_builder_pattern() {
        let options = RendererOptions::new("sprites")
            .with_icon("home", "house")
            .with_option("sprite_url", "/s.svg")
            .with_default_attrs(Attributes::new().with("class", "i"));

        assert_eq!(options.label, "sprites");
        assert_eq!(options.icons.get("home").map(String::as_str), Some("house"));
        assert_eq!(options.required_string("sprites", "sprite_url"), Ok("/s.svg"));
    }

    #[test]
    fn test_required_string_rejects_blank() {
        let options = RendererOptions::new("s").with_option("sprite_url", "  ");
        assert_eq!(
            options.required_string("sprites", "sprite_url"),
            Err(BuildError::MissingOption {
                kind: "sprites".into(),
                option: "sprite_url".into()
            })
        );
        let options = RendererOptions::new("s").with_option("sprite_url", 5i64);
        assert!(matches!(
            options.required_string("sprites", "sprite_url"),
            Err(BuildError::InvalidOption { .. })
        ));
    }
}
