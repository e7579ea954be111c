//! Icon renderers
//!
//! Every renderer owns an icon table mapping logical names to its own
//! identifiers plus a set of default attributes. The three built-in kinds
//! differ only in the markup they emit for a resolved identifier.

mod config;
mod provider;
mod sprites;
mod svg;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::attrs::Attributes;
use crate::error::{BuildError, LookupError};
use crate::loader::SvgLoader;
use crate::markup::Markup;

pub use config::RendererOptions;
pub use provider::ProviderRenderer;
pub use sprites::SpritesRenderer;
pub use svg::SvgRenderer;

/// Logical icon name -> renderer-specific identifier
pub type IconMap = IndexMap<String, String>;

/// A configured icon renderer
pub trait IconRenderer: Send + Sync + fmt::Debug {
    /// Name of the configuration this renderer was built from
    fn label(&self) -> &str;

    fn icons(&self) -> &IconMap;

    fn default_attrs(&self) -> &Attributes;

    /// Emit markup for an already resolved identifier
    fn render_identifier(
        &self,
        identifier: &str,
        attrs: &Attributes,
        use_defaults: bool,
    ) -> Result<Markup, LookupError>;

    /// Look up the identifier for a logical icon name
    fn resolve(&self, name: &str) -> Result<&str, LookupError> {
        self.icons().get(name).map(String::as_str).ok_or_else(|| {
            LookupError::not_found(
                name,
                Some(self.label()),
                self.icons().keys().map(String::as_str),
            )
        })
    }

    /// Merge call-site attributes over this renderer's defaults
    fn build_attrs(&self, attrs: &Attributes, use_defaults: bool) -> Attributes {
        Attributes::merged(self.default_attrs(), attrs, use_defaults)
    }

    /// Resolve a logical name and render it
    fn render(
        &self,
        name: &str,
        attrs: &Attributes,
        use_defaults: bool,
    ) -> Result<Markup, LookupError> {
        let identifier = self.resolve(name)?;
        self.render_identifier(identifier, attrs, use_defaults)
    }

    /// Render with default attributes only
    fn render_plain(&self, name: &str) -> Result<Markup, LookupError> {
        self.render(name, &Attributes::new(), true)
    }
}

/// Collaborators available to renderer factories
#[derive(Debug, Clone)]
pub struct BuildContext {
    pub loader: Arc<dyn SvgLoader>,
}

/// Constructor for one renderer kind
pub type RendererFactory = Arc<
    dyn Fn(RendererOptions, &BuildContext) -> Result<Arc<dyn IconRenderer>, BuildError>
        + Send
        + Sync,
>;

/// Renderer kinds addressable from settings by name
#[derive(Clone)]
pub struct RendererKinds {
    factories: HashMap<String, RendererFactory>,
}

impl RendererKinds {
    /// A registry with no kinds at all
    pub fn empty() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Register a kind, replacing any previous kind of the same name
    pub fn register<F>(&mut self, kind: impl Into<String>, factory: F)
    where
        F: Fn(RendererOptions, &BuildContext) -> Result<Arc<dyn IconRenderer>, BuildError>
            + Send
            + Sync
            + 'static,
    {
        self.factories.insert(kind.into(), Arc::new(factory));
    }

    /// Builder form of [`register`](Self::register)
    pub fn with_kind<F>(mut self, kind: impl Into<String>, factory: F) -> Self
    where
        F: Fn(RendererOptions, &BuildContext) -> Result<Arc<dyn IconRenderer>, BuildError>
            + Send
            + Sync
            + 'static,
    {
        self.register(kind, factory);
        self
    }

    pub fn get(&self, kind: &str) -> Option<&RendererFactory> {
        self.factories.get(kind)
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.factories.contains_key(kind)
    }

    /// Registered kind names, sorted
    pub fn kinds(&self) -> Vec<&str> {
        let mut kinds: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        kinds.sort_unstable();
        kinds
    }
}

impl Default for RendererKinds {
    /// The built-in `svg`, `provider` and `sprites` kinds
    fn default() -> Self {
        Self::empty()
            .with_kind("svg", |options, ctx| {
                let renderer = SvgRenderer::new(options, ctx.loader.clone())?;
                Ok(Arc::new(renderer) as Arc<dyn IconRenderer>)
            })
            .with_kind("provider", |options, _| {
                Ok(Arc::new(ProviderRenderer::new(options)?) as Arc<dyn IconRenderer>)
            })
            .with_kind("sprites", |options, _| {
                Ok(Arc::new(SpritesRenderer::new(options)?) as Arc<dyn IconRenderer>)
            })
    }
}

impl fmt::Debug for RendererKinds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RendererKinds")
            .field("kinds", &self.kinds())
            .finish()
    }
}
