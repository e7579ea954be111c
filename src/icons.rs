//! Icon lookup service
//!
//! [`Icons`] ties settings, renderer kinds, packs and the SVG loader
//! together and owns the two caches: constructed renderers by configuration
//! name, and the derived registry.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::error::{ConfigError, LookupError};
use crate::loader::{DirLoader, SvgLoader};
use crate::markup::Markup;
use crate::packs::{merge_icon_table, PackLibrary};
use crate::registry::IconRegistry;
use crate::renderer::{BuildContext, IconRenderer, RendererKinds, RendererOptions};
use crate::settings::{Settings, DEFAULT_RENDERER};
use crate::{IconError, IconRequest};

/// Icon lookup over a settings document
#[derive(Debug)]
pub struct Icons {
    settings: Settings,
    kinds: RendererKinds,
    packs: PackLibrary,
    loader: Arc<dyn SvgLoader>,
    renderers: RwLock<HashMap<String, Arc<dyn IconRenderer>>>,
    registry: RwLock<Option<Arc<IconRegistry>>>,
}

impl Icons {
    /// Create a service with the built-in renderer kinds
    ///
    /// SVG sources are read from the settings' template directories and
    /// pack files relative to the settings' base directory.
    pub fn new(settings: Settings) -> Self {
        let loader = DirLoader::new(settings.template_roots());
        let mut packs = PackLibrary::new();
        if let Some(dir) = &settings.base_dir {
            packs = packs.with_base_dir(dir);
        }
        Self {
            settings,
            kinds: RendererKinds::default(),
            packs,
            loader: Arc::new(loader),
            renderers: RwLock::new(HashMap::new()),
            registry: RwLock::new(None),
        }
    }

    /// Replace the SVG loader
    pub fn with_loader(mut self, loader: impl SvgLoader + 'static) -> Self {
        self.loader = Arc::new(loader);
        self.clear_cache();
        self
    }

    /// Replace the pack library
    pub fn with_packs(mut self, packs: PackLibrary) -> Self {
        self.packs = packs;
        self.clear_cache();
        self
    }

    /// Replace the renderer kinds
    pub fn with_kinds(mut self, kinds: RendererKinds) -> Self {
        self.kinds = kinds;
        self.clear_cache();
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn fail_silently(&self) -> bool {
        self.settings.fail_silently()
    }

    /// The renderer for a configuration name, `None` meaning `default`
    ///
    /// Renderers are constructed once per name and cached.
    pub fn get_renderer(&self, name: Option<&str>) -> Result<Arc<dyn IconRenderer>, ConfigError> {
        let name = name.unwrap_or(DEFAULT_RENDERER);

        if let Some(renderer) = self
            .renderers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
        {
            return Ok(renderer.clone());
        }

        let renderer = self.build_renderer(name)?;

        let mut cache = self.renderers.write().unwrap_or_else(PoisonError::into_inner);
        let cached = cache
            .entry(name.to_string())
            .or_insert_with(|| renderer)
            .clone();
        Ok(cached)
    }

    fn build_renderer(&self, name: &str) -> Result<Arc<dyn IconRenderer>, ConfigError> {
        let entry = self.settings.entry(name)?;
        let factory = self
            .kinds
            .get(&entry.kind)
            .ok_or_else(|| ConfigError::UnknownKind {
                name: name.to_string(),
                kind: entry.kind.clone(),
            })?;

        let icons = merge_icon_table(
            self.packs.load_and_merge_packs(&entry.packs, name),
            &entry.icons,
        );
        let instantiate = |source| ConfigError::Instantiate {
            name: name.to_string(),
            source,
        };
        let options = RendererOptions::from_config(name, icons, entry.config).map_err(instantiate)?;
        let ctx = BuildContext {
            loader: self.loader.clone(),
        };
        let renderer = factory(options, &ctx).map_err(instantiate)?;

        tracing::debug!("Constructed '{}' renderer for '{}'", entry.kind, name);
        Ok(renderer)
    }

    /// Re-derive the registry from settings, replacing any cached one
    pub fn build_registry(&self) -> Arc<IconRegistry> {
        let registry = Arc::new(IconRegistry::build(&self.settings, &self.packs));
        *self.registry.write().unwrap_or_else(PoisonError::into_inner) = Some(registry.clone());
        tracing::debug!("Built icon registry with {} icons", registry.len());
        registry
    }

    /// The registry, built on first use
    pub fn registry(&self) -> Arc<IconRegistry> {
        if let Some(registry) = self
            .registry
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
        {
            return registry.clone();
        }

        let built = Arc::new(IconRegistry::build(&self.settings, &self.packs));
        let mut slot = self.registry.write().unwrap_or_else(PoisonError::into_inner);
        slot.get_or_insert(built).clone()
    }

    /// Owning configuration of an icon name
    pub fn resolve(&self, name: &str) -> Option<String> {
        self.registry().resolve(name).map(str::to_string)
    }

    /// Drop both caches
    pub fn clear_cache(&self) {
        self.renderers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        *self.registry.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Render an icon
    ///
    /// Aliases are applied first. With an explicit renderer the icon is
    /// looked up there only; otherwise the registry picks the renderer.
    /// Unknown icons yield empty markup when fail-silently is on.
    pub fn icon(&self, name: &str, request: &IconRequest) -> Result<Markup, IconError> {
        let name = self.settings.resolve_alias(name);

        let rendered = match &request.renderer {
            Some(renderer) => self.get_renderer(Some(renderer.as_str()))?.render(
                name,
                &request.attrs,
                request.use_defaults,
            ),
            None => match self.resolve(name) {
                Some(owner) => self.get_renderer(Some(owner.as_str()))?.render(
                    name,
                    &request.attrs,
                    request.use_defaults,
                ),
                None => {
                    let registry = self.registry();
                    let err = LookupError::not_found(name, None, registry.names());
                    Err(err)
                }
            },
        };

        match rendered {
            Err(e) if e.is_not_found() && self.fail_silently() => {
                tracing::debug!("Silenced icon lookup failure: {}", e);
                Ok(Markup::empty())
            }
            other => Ok(other?),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::MemoryLoader;
    use pretty_assertions::assert_eq;

    const SETTINGS: &str = r#"
ALIASES = { house = "home" }

[default]
renderer = "svg"
icons = { home = "home.svg" }

[fa]
renderer = "provider"
icons = { home = "fa-home", heart = "fa-heart" }

[sprites]
renderer = "sprites"
icons = { star = "star" }
"#;

    fn icons(src: &str) -> Icons {
        Icons::new(Settings::from_str(src).expect("Should parse settings"))
            .with_loader(MemoryLoader::new().with_source("icons/home.svg", "<svg></svg>"))
    }

    #[test]
    fn test_renderer_cached_by_name() {
        let icons = icons(SETTINGS);
        let a = icons.get_renderer(Some("fa")).unwrap();
        let b = icons.get_renderer(Some("fa")).unwrap();
        assert!(Arc::ptr_eq(&a, &b));

        let default = icons.get_renderer(None).unwrap();
        assert_eq!(default.label(), "default");

        icons.clear_cache();
        let c = icons.get_renderer(Some("fa")).unwrap();
        assert!(!Arc::ptr_eq(&a, &c));
    }

    #[test]
    fn test_registry_drives_unqualified_lookup() {
        let icons = icons(SETTINGS);
        assert_eq!(icons.icon("home", &IconRequest::new()).unwrap(), "<svg></svg>");
        assert_eq!(
            icons.icon("heart", &IconRequest::new()).unwrap(),
            r#"<i class="fa-heart"></i>"#
        );
    }

    #[test]
    fn test_explicit_renderer_and_alias() {
        let icons = icons(SETTINGS);
        let out = icons
            .icon("house", &IconRequest::new().renderer("fa").attr("class", "big"))
            .unwrap();
        assert_eq!(out, r#"<i class="fa-home big"></i>"#);
    }

    #[test]
    fn test_config_errors_are_not_silenced() {
        let icons = icons(&format!("FAIL_SILENTLY = true\n{}", SETTINGS));
        let err = icons
            .icon("home", &IconRequest::new().renderer("nowhere"))
            .unwrap_err();
        assert!(matches!(
            err,
            IconError::Config(ConfigError::NotConfigured { .. })
        ));

        // sprites config has no sprite_url
        let err = icons.icon("star", &IconRequest::new()).unwrap_err();
        assert!(matches!(
            err,
            IconError::Config(ConfigError::Instantiate { .. })
        ));
    }

    #[test]
    fn test_fail_silently_returns_empty_markup() {
        let icons = icons(&format!("DEBUG = true\n{}", SETTINGS));
        assert!(icons.fail_silently());
        assert!(icons.icon("missing", &IconRequest::new()).unwrap().is_empty());
        assert!(icons
            .icon("missing", &IconRequest::new().renderer("fa"))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_unknown_icon_lists_registry() {
        let icons = icons(SETTINGS);
        let err = icons.icon("missing", &IconRequest::new()).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("not found in any configured renderer"));
        assert!(msg.contains("heart, home, star"));
    }

    #[test]
    fn test_non_string_icon_does_not_break_renderer() {
        let icons = icons(
            r#"
FAIL_SILENTLY = true

[default]
renderer = "provider"
icons = { home = "fa-home", size = 3 }
"#,
        );
        assert_eq!(icons.resolve("home").as_deref(), Some("default"));
        assert_eq!(
            icons.icon("home", &IconRequest::new()).unwrap(),
            r#"<i class="fa-home"></i>"#
        );
        assert!(icons.icon("size", &IconRequest::new()).unwrap().is_empty());
    }

    #[test]
    fn test_unknown_kind() {
        let icons = icons("[default]\nrenderer = \"nope\"");
        assert_eq!(
            icons.get_renderer(None).unwrap_err(),
            ConfigError::UnknownKind {
                name: "default".into(),
                kind: "nope".into()
            }
        );
    }

    #[test]
    fn test_build_registry_replaces_cache() {
        let icons = icons(SETTINGS);
        let first = icons.registry();
        assert!(Arc::ptr_eq(&first, &icons.registry()));
        let rebuilt = icons.build_registry();
        assert!(!Arc::ptr_eq(&first, &rebuilt));
        assert_eq!(icons.resolve("star").as_deref(), Some("sprites"));
    }

    #[test]
    fn test_use_defaults_flag() {
        let icons = icons(
            r#"
[default]
renderer = "provider"
config = { default_attrs = { "aria-hidden" = "true" } }
icons = { home = "fa-home" }
"#,
        );
        assert_eq!(
            icons.icon("home", &IconRequest::new()).unwrap(),
            r#"<i class="fa-home" aria-hidden="true"></i>"#
        );
        assert_eq!(
            icons
                .icon("home", &IconRequest::new().use_defaults(false))
                .unwrap(),
            r#"<i class="fa-home"></i>"#
        );
    }
}
