//! HTML attribute composition
//!
//! Icons carry two attribute sources: the defaults configured on a renderer
//! and the attributes supplied at the call site. [`Attributes::merged`]
//! combines them and [`Attributes::render`] turns the result into the text
//! that goes inside an opening tag.

use std::fmt;

use indexmap::IndexMap;

/// A single attribute value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrValue {
    /// Rendered as `name="value"`
    Text(String),
    /// `true` renders the bare attribute name, `false` omits it
    Flag(bool),
}

impl AttrValue {
    /// Convert a TOML value into an attribute value
    ///
    /// Strings and booleans map directly, numbers use their display form.
    /// Tables, arrays and datetimes have no attribute representation.
    pub fn from_toml(value: &toml::Value) -> Option<Self> {
        match value {
            toml::Value::String(s) => Some(AttrValue::Text(s.clone())),
            toml::Value::Boolean(b) => Some(AttrValue::Flag(*b)),
            toml::Value::Integer(i) => Some(AttrValue::Text(i.to_string())),
            toml::Value::Float(f) => Some(AttrValue::Text(f.to_string())),
            _ => None,
        }
    }

    /// The text of a `Text` value
    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttrValue::Text(s) => Some(s.as_str()),
            AttrValue::Flag(_) => None,
        }
    }
}

impl From<&str> for AttrValue {
    fn from(s: &str) -> Self {
        AttrValue::Text(s.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(s: String) -> Self {
        AttrValue::Text(s)
    }
}

impl From<bool> for AttrValue {
    fn from(b: bool) -> Self {
        AttrValue::Flag(b)
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Text(s) => f.write_str(s),
            AttrValue::Flag(b) => write!(f, "{}", b),
        }
    }
}

/// Ordered attribute mapping
///
/// Iteration follows insertion order; re-inserting a key keeps its original
/// position and replaces the value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes(IndexMap<String, AttrValue>);

impl Attributes {
    /// Create an empty attribute set
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`insert`](Self::insert)
    pub fn with(mut self, name: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Set an attribute, replacing any previous value
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<AttrValue>) {
        self.0.insert(name.into(), value.into());
    }

    /// Remove an attribute, keeping the order of the others
    pub fn remove(&mut self, name: &str) -> Option<AttrValue> {
        self.0.shift_remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&AttrValue> {
        self.0.get(name)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttrValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Merge call-site attributes over a set of defaults
    ///
    /// Call-site keys replace same-named defaults outright. With
    /// `use_defaults == false` the defaults are ignored entirely.
    pub fn merged(defaults: &Attributes, overrides: &Attributes, use_defaults: bool) -> Attributes {
        let mut merged = if use_defaults {
            defaults.clone()
        } else {
            Attributes::new()
        };
        for (name, value) in overrides.iter() {
            merged.insert(name, value.clone());
        }
        merged
    }

    /// Render as `name="value"` pairs separated by single spaces
    pub fn render(&self) -> String {
        self.0
            .iter()
            .filter_map(|(name, value)| match value {
                AttrValue::Text(text) => Some(format!(r#"{}="{}""#, name, escape_attr(text))),
                AttrValue::Flag(true) => Some(name.clone()),
                AttrValue::Flag(false) => None,
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl<K, V> FromIterator<(K, V)> for Attributes
where
    K: Into<String>,
    V: Into<AttrValue>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut attrs = Attributes::new();
        for (k, v) in iter {
            attrs.insert(k, v);
        }
        attrs
    }
}

/// Escape special characters for use inside a double-quoted attribute
pub fn escape_attr(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn icon_defaults() -> Attributes {
        Attributes::new().with("class", "icon").with("height", "1em")
    }

    #[test]
    fn test_call_site_replaces_defaults() {
        let call = Attributes::new().with("class", "custom").with("height", "2em");
        let merged = Attributes::merged(&icon_defaults(), &call, true);

        assert_eq!(merged.get("class"), Some(&AttrValue::from("custom")));
        assert_eq!(merged.get("height"), Some(&AttrValue::from("2em")));
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn test_defaults_kept_when_not_overridden() {
        let call = Attributes::new().with("width", "2em");
        let rendered = Attributes::merged(&icon_defaults(), &call, true).render();
        assert_eq!(rendered, r#"class="icon" height="1em" width="2em""#);
    }

    #[test]
    fn test_use_defaults_false_drops_defaults() {
        let call = Attributes::new().with("class", "custom");
        let rendered = Attributes::merged(&icon_defaults(), &call, false).render();
        assert_eq!(rendered, r#"class="custom""#);
        assert!(!rendered.contains("height"));
    }

    #[test]
    fn test_merge_does_not_mutate_defaults() {
        let defaults = icon_defaults();
        let call = Attributes::new().with("class", "other");
        let _ = Attributes::merged(&defaults, &call, true);
        assert_eq!(defaults.get("class"), Some(&AttrValue::from("icon")));
    }

    #[test]
    fn test_boolean_attributes() {
        let attrs = Attributes::new()
            .with("hidden", true)
            .with("disabled", false)
            .with("id", "x");
        assert_eq!(attrs.render(), r#"hidden id="x""#);
    }

    #[test]
    fn test_empty_renders_empty_string() {
        assert_eq!(Attributes::new().render(), "");
    }

    #[test]
    fn test_values_are_escaped() {
        let attrs = Attributes::new().with("title", r#"say "hi" & <bye>"#);
        assert_eq!(
            attrs.render(),
            r#"title="say &quot;hi&quot; &amp; &lt;bye&gt;""#
        );
    }

    #[test]
    fn test_remove_keeps_order() {
        let mut attrs: Attributes = [("a", "1"), ("b", "2"), ("c", "3")].into_iter().collect();
        attrs.remove("b");
        assert_eq!(attrs.render(), r#"a="1" c="3""#);
    }

    #[test]
    fn test_from_toml_values() {
        assert_eq!(
            AttrValue::from_toml(&toml::Value::String("x".into())),
            Some(AttrValue::from("x"))
        );
        assert_eq!(
            AttrValue::from_toml(&toml::Value::Integer(24)),
            Some(AttrValue::from("24"))
        );
        assert_eq!(
            AttrValue::from_toml(&toml::Value::Boolean(true)),
            Some(AttrValue::Flag(true))
        );
        assert_eq!(AttrValue::from_toml(&toml::Value::Array(vec![])), None);
    }
}
