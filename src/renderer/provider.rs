//! CSS class renderer for icon fonts such as Font Awesome

use crate::attrs::{escape_attr, AttrValue, Attributes};
use crate::error::{BuildError, LookupError};
use crate::markup::Markup;
use crate::renderer::{IconMap, IconRenderer, RendererOptions};

const DEFAULT_TAG: &str = "i";

/// Emits an empty element whose class list carries the icon identifier
///
/// The call-site `class` is appended to the identifier (and to the default
/// class) rather than replacing it. A `tag` attribute switches the element
/// for a single call.
#[derive(Debug)]
pub struct ProviderRenderer {
    options: RendererOptions,
    tag: String,
}

impl ProviderRenderer {
    pub fn new(options: RendererOptions) -> Result<Self, BuildError> {
        let tag = match options.string_option("tag")? {
            Some(tag) if is_tag_name(tag) => tag.to_string(),
            Some(_) => {
                return Err(BuildError::InvalidOption {
                    option: "tag".to_string(),
                    expected: "an element name".to_string(),
                })
            }
            None => DEFAULT_TAG.to_string(),
        };
        Ok(Self { options, tag })
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }
}

fn is_tag_name(tag: &str) -> bool {
    let mut chars = tag.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '-')
}

fn push_classes<'a>(tokens: &mut Vec<&'a str>, value: Option<&'a AttrValue>) {
    if let Some(text) = value.and_then(AttrValue::as_text) {
        tokens.extend(text.split_whitespace());
    }
}

impl IconRenderer for ProviderRenderer {
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
        let mut classes: Vec<&str> = identifier.split_whitespace().collect();
        if use_defaults {
            push_classes(&mut classes, self.default_attrs().get("class"));
        }
        push_classes(&mut classes, attrs.get("class"));

        let mut rest = self.build_attrs(attrs, use_defaults);
        rest.remove("class");
        let tag = match rest.remove("tag") {
            Some(AttrValue::Text(tag)) if is_tag_name(&tag) => tag,
            Some(AttrValue::Text(tag)) => return Err(LookupError::InvalidTag { tag }),
            Some(AttrValue::Flag(true)) => {
                return Err(LookupError::InvalidTag {
                    tag: "true".to_string(),
                })
            }
            Some(AttrValue::Flag(false)) | None => self.tag.clone(),
        };

        let mut html = format!(r#"<{} class="{}""#, tag, escape_attr(&classes.join(" ")));
        let rendered = rest.render();
        if !rendered.is_empty() {
            html.push(' ');
            html.push_str(&rendered);
        }
        html.push_str(&format!("></{}>", tag));
        Ok(Markup::new(html))
    }
}
