//! Iconography - icon rendering for HTML templates
//!
//! Resolves logical icon names through a configurable registry to one of
//! several renderers (inline SVG, icon-font classes, sprite references) and
//! returns markup with merged HTML attributes.
//!
//! # Example
//!
//! ```rust
//! use iconography::{IconRequest, Icons, Settings};
//!
//! let settings = Settings::from_str(r#"
//!     [default]
//!     renderer = "provider"
//!     icons = { home = "fa-solid fa-house" }
//! "#).unwrap();
//!
//! let icons = Icons::new(settings);
//! let html = icons.icon("home", &IconRequest::new().attr("class", "big")).unwrap();
//! assert_eq!(html.as_str(), r#"<i class="fa-solid fa-house big"></i>"#);
//! ```

pub mod attrs;
pub mod error;
pub mod icons;
pub mod inspect;
pub mod loader;
pub mod markup;
pub mod packs;
pub mod registry;
pub mod renderer;
pub mod settings;
pub mod tag;

pub use attrs::{AttrValue, Attributes};
pub use error::{BuildError, ConfigError, LoadError, LookupError};
pub use icons::Icons;
pub use inspect::RegistryReport;
pub use loader::{DirLoader, MemoryLoader, SvgLoader};
pub use markup::Markup;
pub use packs::{PackError, PackLibrary};
pub use registry::{IconRegistry, RegistryEntry};
pub use renderer::{
    IconMap, IconRenderer, ProviderRenderer, RendererKinds, RendererOptions, SpritesRenderer,
    SvgRenderer,
};
pub use settings::{Settings, SettingsError};
pub use tag::{render_template, TagContext, TemplateError};

use thiserror::Error;

/// Errors returned by [`Icons::icon`]
#[derive(Debug, Error)]
pub enum IconError {
    /// Deployment mistake, never silenced
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Failed lookup of a single icon
    #[error(transparent)]
    Lookup(#[from] LookupError),
}

impl IconError {
    /// True when the icon name is unknown
    pub fn is_not_found(&self) -> bool {
        matches!(self, IconError::Lookup(e) if e.is_not_found())
    }
}

/// Per-call options for [`Icons::icon`]
#[derive(Debug, Clone)]
pub struct IconRequest {
    /// Explicit renderer configuration, bypassing the registry
    pub renderer: Option<String>,
    /// Merge the renderer's default attributes
    pub use_defaults: bool,
    /// Call-site attributes
    pub attrs: Attributes,
}

impl Default for IconRequest {
    fn default() -> Self {
        Self {
            renderer: None,
            use_defaults: true,
            attrs: Attributes::new(),
        }
    }
}

impl IconRequest {
    /// Create a request using the registry and default attributes
    pub fn new() -> Self {
        Self::default()
    }

    /// Render with a specific renderer configuration
    pub fn renderer(mut self, name: impl Into<String>) -> Self {
        self.renderer = Some(name.into());
        self
    }

    /// Enable or disable the renderer's default attributes
    pub fn use_defaults(mut self, use_defaults: bool) -> Self {
        self.use_defaults = use_defaults;
        self
    }

    /// Add a call-site attribute
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.attrs.insert(name, value);
        self
    }

    /// Replace the call-site attributes
    pub fn attrs(mut self, attrs: Attributes) -> Self {
        self.attrs = attrs;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn icons() -> Icons {
        let settings = Settings::from_str(
            r#"
[default]
renderer = "provider"
icons = { home = "fa-home" }
"#,
        )
        .unwrap();
        Icons::new(settings)
    }

    #[test]
    fn test_request_defaults() {
        let request = IconRequest::new();
        assert!(request.use_defaults);
        assert!(request.renderer.is_none());
        assert!(request.attrs.is_empty());
    }

    #[test]
    fn test_icon_error_tiers() {
        let icons = icons();
        let err = icons.icon("missing", &IconRequest::new()).unwrap_err();
        assert!(err.is_not_found());
        assert!(matches!(err, IconError::Lookup(_)));

        let err = icons
            .icon("home", &IconRequest::new().renderer("other"))
            .unwrap_err();
        assert!(!err.is_not_found());
        assert!(matches!(err, IconError::Config(_)));
    }

    #[test]
    fn test_render_icon() {
        let html = icons()
            .icon("home", &IconRequest::new().attr("title", "Home"))
            .unwrap();
        assert_eq!(html.as_str(), r#"<i class="fa-home" title="Home"></i>"#);
    }
}
