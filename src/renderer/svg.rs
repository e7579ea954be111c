//! Inline SVG renderer

use std::sync::Arc;

use crate::attrs::Attributes;
use crate::error::{BuildError, LookupError};
use crate::loader::SvgLoader;
use crate::markup::Markup;
use crate::renderer::{IconMap, IconRenderer, RendererOptions};

const DEFAULT_SVG_DIR: &str = "icons";

/// Embeds SVG files directly in the output, with merged attributes spliced
/// into the opening `<svg` tag
#[derive(Debug)]
pub struct SvgRenderer {
    options: RendererOptions,
    svg_dir: String,
    loader: Arc<dyn SvgLoader>,
}

impl SvgRenderer {
    /// Create a renderer reading from `config.svg_dir` (default `icons`)
    pub fn new(options: RendererOptions, loader: Arc<dyn SvgLoader>) -> Result<Self, BuildError> {
        let svg_dir = options
            .string_option("svg_dir")?
            .unwrap_or(DEFAULT_SVG_DIR)
            .trim_end_matches('/')
            .to_string();
        Ok(Self {
            options,
            svg_dir,
            loader,
        })
    }

    pub fn svg_dir(&self) -> &str {
        &self.svg_dir
    }

    /// Relative path handed to the loader for an identifier
    pub fn source_path(&self, identifier: &str) -> String {
        let file = if identifier.ends_with(".svg") {
            identifier.to_string()
        } else {
            format!("{}.svg", identifier)
        };
        if self.svg_dir.is_empty() {
            file
        } else {
            format!("{}/{}", self.svg_dir, file)
        }
    }
}

impl IconRenderer for SvgRenderer {
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
        let path = self.source_path(identifier);
        let content = self.loader.load(&path)?;
        let attrs = self.build_attrs(attrs, use_defaults).render();
        inject_attrs(&content, &attrs, &path).map(Markup::new)
    }
}

/// Byte offset just past the first `<svg` tag name
fn find_svg_tag(content: &str) -> Option<usize> {
    content.match_indices("<svg").find_map(|(idx, tag)| {
        let end = idx + tag.len();
        match content[end..].chars().next() {
            Some(c) if c.is_whitespace() || c == '>' || c == '/' => Some(end),
            _ => None,
        }
    })
}

/// Splice rendered attributes into the opening `<svg` tag
///
/// Attributes already on the tag are kept as they are.
pub(crate) fn inject_attrs(content: &str, attrs: &str, path: &str) -> Result<String, LookupError> {
    let end = find_svg_tag(content).ok_or_else(|| LookupError::InvalidSvg {
        path: path.to_string(),
    })?;
    if attrs.is_empty() {
        return Ok(content.to_string());
    }

    let mut out = String::with_capacity(content.len() + attrs.len() + 1);
    out.push_str(&content[..end]);
    out.push(' ');
    out.push_str(attrs);
    out.push_str(&content[end..]);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LoadError;
    use crate::loader::MemoryLoader;
    use pretty_assertions::assert_eq;

    const HOME: &str = r#"<svg viewBox="0 0 24 24"><path d="M0 0"/></svg>"#;

    fn renderer(options: RendererOptions) -> SvgRenderer {
        let loader = MemoryLoader::new()
            .with_source("icons/home.svg", HOME)
            .with_source("icons/broken.svg", "<div>not an icon</div>")
            .with_source("custom/star.svg", "<svg>*</svg>");
        SvgRenderer::new(options, Arc::new(loader)).expect("Should build svg renderer")
    }

    fn options() -> RendererOptions {
        RendererOptions::new("default")
            .with_icon("home", "home.svg")
            .with_icon("house", "home")
            .with_icon("broken", "broken.svg")
            .with_icon("gone", "gone.svg")
    }

    #[test]
    fn test_inline_svg_with_attrs() {
        let r = renderer(options());
        let out = r
            .render("home", &Attributes::new().with("class", "big"), true)
            .unwrap();
        assert_eq!(
            out.as_str(),
            r#"<svg class="big" viewBox="0 0 24 24"><path d="M0 0"/></svg>"#
        );
    }

    #[test]
    fn test_no_attrs_returns_content_unchanged() {
        let r = renderer(options());
        assert_eq!(r.render_plain("home").unwrap().as_str(), HOME);
    }

    #[test]
    fn test_identifier_without_extension() {
        let r = renderer(options());
        assert_eq!(r.source_path("home"), "icons/home.svg");
        assert_eq!(r.render_plain("house").unwrap().as_str(), HOME);
    }

    #[test]
    fn test_defaults_and_opt_out() {
        let r = renderer(
            options().with_default_attrs(Attributes::new().with("height", "1em")),
        );
        let with_defaults = r.render_plain("home").unwrap();
        assert!(with_defaults.as_str().starts_with(r#"<svg height="1em" viewBox"#));

        let without = r
            .render("home", &Attributes::new().with("id", "x"), false)
            .unwrap();
        assert!(without.as_str().starts_with(r#"<svg id="x" viewBox"#));
        assert!(!without.as_str().contains("height"));
    }

    #[test]
    fn test_custom_svg_dir() {
        let r = renderer(
            RendererOptions::new("custom")
                .with_icon("star", "star")
                .with_option("svg_dir", "custom/"),
        );
        assert_eq!(r.svg_dir(), "custom");
        let out = r
            .render("star", &Attributes::new().with("role", "img"), true)
            .unwrap();
        assert_eq!(out.as_str(), r#"<svg role="img">*</svg>"#);
    }

    #[test]
    fn test_missing_svg_tag() {
        let r = renderer(options());
        let err = r.render_plain("broken").unwrap_err();
        assert!(matches!(err, LookupError::InvalidSvg { ref path } if path == "icons/broken.svg"));
    }

    #[test]
    fn test_missing_file_propagates_load_error() {
        let r = renderer(options());
        let err = r.render_plain("gone").unwrap_err();
        assert!(matches!(err, LookupError::Template(LoadError::NotFound { .. })));
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_inject_skips_lookalike_tags() {
        let content = r#"<svgx></svgx><svg
  width="2"></svg>"#;
        let out = inject_attrs(content, r#"id="a""#, "x.svg").unwrap();
        assert_eq!(out, "<svgx></svgx><svg id=\"a\"\n  width=\"2\"></svg>");
    }

    #[test]
    fn test_inject_keeps_prolog() {
        let content = "<?xml version=\"1.0\"?>\n<svg/>";
        let out = inject_attrs(content, "hidden", "x.svg").unwrap();
        assert_eq!(out, "<?xml version=\"1.0\"?>\n<svg hidden/>");
    }
}
