//! Template tag form
//!
//! Expands `{% icon <name> key=value ... %}` tags inside a text template:
//!
//! ```text
//! <a href="/">{% icon "home" class="nav" %}</a>
//! {% icon icon_name class=css_class renderer="fontawesome" %}
//! ```
//!
//! Bare names are context variables. `renderer` and `use_defaults` steer the
//! lookup; every other argument becomes an HTML attribute. Tags other than
//! `icon` are left untouched.

mod grammar;
pub mod lexer;

use ariadne::{Color, Label, Report, ReportKind, Source};
use indexmap::IndexMap;
use thiserror::Error;

use crate::attrs::AttrValue;
use crate::error::{Span, TagSyntaxError};
use crate::icons::Icons;
use crate::{IconError, IconRequest};

pub use grammar::{parse_tag, Argument, IconTag, Spanned, TagValue};

const TAG_OPEN: &str = "{%";
const TAG_CLOSE: &str = "%}";

/// Errors raised while expanding a template
#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("syntax errors: {}", format_syntax_errors(.0))]
    Syntax(Vec<TagSyntaxError>),

    #[error("unclosed tag starting at byte {}", .span.start)]
    UnclosedTag { span: Span },

    #[error("undefined variable '{name}'")]
    UndefinedVariable { name: String, span: Span },

    #[error("argument '{key}' must be {expected}")]
    InvalidArgument {
        key: String,
        expected: String,
        span: Span,
    },

    #[error("{source}")]
    Icon { span: Span, source: IconError },
}

fn format_syntax_errors(errors: &[TagSyntaxError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

impl TemplateError {
    /// Location of the error in the template
    pub fn span(&self) -> Option<Span> {
        match self {
            TemplateError::Syntax(errors) => errors.first().map(|e| e.span.clone()),
            TemplateError::UnclosedTag { span }
            | TemplateError::UndefinedVariable { span, .. }
            | TemplateError::InvalidArgument { span, .. }
            | TemplateError::Icon { span, .. } => Some(span.clone()),
        }
    }

    /// Format the error with source context using ariadne
    pub fn format(&self, source: &str, filename: &str) -> String {
        if let TemplateError::Syntax(errors) = self {
            return errors.iter().map(|e| e.format(source, filename)).collect();
        }
        let Some(span) = self.span() else {
            return format!("{}: {}\n", filename, self);
        };

        let mut buf = Vec::new();
        let written = Report::build(ReportKind::Error, filename, span.start)
            .with_message("cannot render icon tag")
            .with_label(
                Label::new((filename, span))
                    .with_message(self.to_string())
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

/// Variables visible to icon tags
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TagContext(IndexMap<String, AttrValue>);

impl TagContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`insert`](Self::insert)
    pub fn with(mut self, name: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<AttrValue>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&AttrValue> {
        self.0.get(name)
    }
}

/// Expand every icon tag in `source`
pub fn render_template(
    source: &str,
    icons: &Icons,
    context: &TagContext,
) -> Result<String, TemplateError> {
    let mut out = String::with_capacity(source.len());
    let mut rest = 0;

    while let Some(found) = source[rest..].find(TAG_OPEN) {
        let start = rest + found;
        let body_start = start + TAG_OPEN.len();
        let Some(close) = source[body_start..].find(TAG_CLOSE) else {
            return Err(TemplateError::UnclosedTag {
                span: start..source.len(),
            });
        };
        let body_end = body_start + close;
        let end = body_end + TAG_CLOSE.len();

        out.push_str(&source[rest..start]);
        let body = &source[body_start..body_end];
        if body.split_whitespace().next() == Some("icon") {
            let markup = render_tag(body, body_start, start..end, icons, context)?;
            out.push_str(markup.as_str());
        } else {
            out.push_str(&source[start..end]);
        }
        rest = end;
    }

    out.push_str(&source[rest..]);
    Ok(out)
}

fn render_tag(
    body: &str,
    offset: usize,
    tag_span: Span,
    icons: &Icons,
    context: &TagContext,
) -> Result<crate::Markup, TemplateError> {
    let shift = |span: &Span| span.start + offset..span.end + offset;

    let tag = parse_tag(body).map_err(|errors| {
        TemplateError::Syntax(errors.into_iter().map(|e| e.offset(offset)).collect())
    })?;

    let evaluate = |value: &Spanned<TagValue>| -> Result<AttrValue, TemplateError> {
        match &value.node {
            TagValue::Str(s) | TagValue::Number(s) => Ok(AttrValue::Text(s.clone())),
            TagValue::Bool(b) => Ok(AttrValue::Flag(*b)),
            TagValue::Var(name) => {
                context
                    .get(name)
                    .cloned()
                    .ok_or_else(|| TemplateError::UndefinedVariable {
                        name: name.clone(),
                        span: shift(&value.span),
                    })
            }
        }
    };
    let invalid = |key: &str, expected: &str, span: &Span| TemplateError::InvalidArgument {
        key: key.to_string(),
        expected: expected.to_string(),
        span: shift(span),
    };

    let name = match evaluate(&tag.name)? {
        AttrValue::Text(name) => name,
        AttrValue::Flag(_) => return Err(invalid("name", "a string", &tag.name.span)),
    };

    let mut request = IconRequest::new();
    for arg in &tag.args {
        let value = evaluate(&arg.value)?;
        match (arg.key.node.as_str(), value) {
            ("renderer", AttrValue::Text(renderer)) => request = request.renderer(renderer),
            ("renderer", _) => return Err(invalid("renderer", "a string", &arg.value.span)),
            ("use_defaults", AttrValue::Flag(flag)) => request = request.use_defaults(flag),
            ("use_defaults", _) => {
                return Err(invalid("use_defaults", "a boolean", &arg.value.span))
            }
            (key, value) => request = request.attr(key, value),
        }
    }

    icons
        .icon(&name, &request)
        .map_err(|source| TemplateError::Icon {
            span: tag_span,
            source,
        })
}
