//! SVG sprite renderer

use crate::attrs::{escape_attr, Attributes};
use crate::error::{BuildError, LookupError};
use crate::markup::Markup;
use crate::renderer::{IconMap, IconRenderer, RendererOptions};

/// References symbols of an external sprite sheet through `<use>`
#[derive(Debug)]
pub struct SpritesRenderer {
    options: RendererOptions,
    sprite_url: String,
}

impl SpritesRenderer {
    /// Fails unless `config.sprite_url` is a non-empty string
    pub fn new(options: RendererOptions) -> Result<Self, BuildError> {
        let sprite_url = options.required_string("sprites", "sprite_url")?.to_string();
        Ok(Self {
            options,
            sprite_url,
        })
    }

    pub fn sprite_url(&self) -> &str {
        &self.sprite_url
    }
}

impl IconRenderer for SpritesRenderer {
    fn label(&self) -> &str {
        &self.options.label
    }

    fn icons(&self) -> &IconMap {
        &self.options.icons
    }

    fn default_attrs(&self) -> &Attributes {
        &self.options.default_attrs
    }

    fn render_identifier(
        &self,
        identifier: &str,
        attrs: &Attributes,
        use_defaults: bool,
    ) -> Result<Markup, LookupError> {
        let attrs = self.build_attrs(attrs, use_defaults).render();
        // a fragment already present in the URL is left alone
        let href = escape_attr(&format!("{}#{}", self.sprite_url, identifier));
        let open = if attrs.is_empty() {
            "<svg>".to_string()
        } else {
            format!("<svg {}>", attrs)
        };
        Ok(Markup::new(format!(
            r#"{}<use href="{}"></use></svg>"#,
            open, href
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sprites(url: &str) -> SpritesRenderer {
        SpritesRenderer::new(
            RendererOptions::new("sprites")
                .with_icon("home", "house")
                .with_icon("warning", "warning-triangle")
                .with_option("sprite_url", url),
        )
        .expect("Should build sprites renderer")
    }

    #[test]
    fn test_use_reference() {
        assert_eq!(
            sprites("/static/icons.svg").render_plain("home").unwrap().as_str(),
            r#"<svg><use href="/static/icons.svg#house"></use></svg>"#
        );
    }

    #[test]
    fn test_attrs_on_outer_svg() {
        let out = sprites("/icons.svg")
            .render("home", &Attributes::new().with("class", "icon").with("width", "16"), true)
            .unwrap();
        assert_eq!(
            out.as_str(),
            r#"<svg class="icon" width="16"><use href="/icons.svg#house"></use></svg>"#
        );
    }

    #[test]
    fn test_existing_fragment_is_not_inspected() {
        let out = sprites("/icons.svg#base").render_plain("warning").unwrap();
        assert!(out.as_str().contains(r#"href="/icons.svg#base#warning-triangle""#));
    }

    #[test]
    fn test_url_with_spaces_kept() {
        let out = sprites("/my icons.svg").render_plain("home").unwrap();
        assert!(out.as_str().contains(r#"href="/my icons.svg#house""#));
    }

    #[test]
    fn test_missing_sprite_url() {
        let err = SpritesRenderer::new(RendererOptions::new("sprites")).unwrap_err();
        assert_eq!(err.to_string(), "sprites renderer requires 'sprite_url' option");

        let options = RendererOptions::new("sprites").with_option("sprite_url", "");
        let err = SpritesRenderer::new(options).unwrap_err();
        assert!(matches!(err, BuildError::MissingOption { .. }));
    }
}
