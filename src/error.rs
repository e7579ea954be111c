//! Error types for configuration and icon lookup
//!
//! Two tiers: [`ConfigError`] reports deployment mistakes and is never
//! silenced, [`LookupError`] reports a single failed icon lookup and may be
//! silenced by the fail-silently mode.

use std::path::PathBuf;

use ariadne::{Color, Label, Report, ReportKind, Source};
use chumsky::error::{Rich, RichPattern, RichReason};
use thiserror::Error;

use crate::tag::lexer::Token;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

/// Errors raised while turning a renderer configuration into a renderer
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// A mandatory constructor option is absent or empty
    #[error("{kind} renderer requires '{option}' option")]
    MissingOption { kind: String, option: String },

    /// A constructor option has the wrong type
    #[error("option '{option}' must be {expected}")]
    InvalidOption { option: String, expected: String },
}

/// Configuration-tier errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// No renderer config with this name exists
    #[error("renderer '{name}' is not configured")]
    NotConfigured { name: String },

    /// The renderer config value is not a table
    #[error("icon settings entry '{name}' must be a table")]
    EntryNotATable { name: String },

    /// The renderer config does not name a renderer kind
    #[error("renderer config '{name}' must specify a 'renderer' kind")]
    MissingRendererKind { name: String },

    /// A field of the renderer config has the wrong type
    #[error("field '{field}' of renderer config '{name}' must be {expected}")]
    InvalidField {
        name: String,
        field: String,
        expected: String,
    },

    /// The renderer kind is not registered
    #[error("cannot resolve renderer kind '{kind}' for '{name}'")]
    UnknownKind { name: String, kind: String },

    /// The renderer kind exists but construction failed
    #[error("cannot instantiate renderer '{name}': {source}")]
    Instantiate {
        name: String,
        #[source]
        source: BuildError,
    },
}

/// Errors produced by an [`SvgLoader`](crate::SvgLoader)
#[derive(Error, Debug)]
pub enum LoadError {
    /// No root contains the requested file
    #[error("SVG source not found: {path}")]
    NotFound { path: String, searched: Vec<PathBuf> },

    /// The file exists but could not be read
    #[error("error reading SVG source {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Lookup-tier errors
#[derive(Error, Debug)]
pub enum LookupError {
    /// The icon name is unknown to the renderer (or to every renderer)
    #[error("{}", format_not_found(.name, .renderer, .available))]
    IconNotFound {
        name: String,
        /// `None` when the lookup went through the registry
        renderer: Option<String>,
        available: Vec<String>,
    },

    /// The SVG source has no `<svg` tag to inject attributes into
    #[error("No <svg> tag found in {path}")]
    InvalidSvg { path: String },

    /// A per-call element name is not a valid tag name
    #[error("invalid element name '{tag}'")]
    InvalidTag { tag: String },

    /// The SVG source could not be loaded
    #[error(transparent)]
    Template(#[from] LoadError),
}

impl LookupError {
    /// Build an `IconNotFound` error with a sorted list of available names
    pub fn not_found<'a>(
        name: &str,
        renderer: Option<&str>,
        available: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        let mut available: Vec<String> = available.into_iter().map(str::to_string).collect();
        available.sort();
        LookupError::IconNotFound {
            name: name.to_string(),
            renderer: renderer.map(str::to_string),
            available,
        }
    }

    /// True for the variant silenced by fail-silently mode
    pub fn is_not_found(&self) -> bool {
        matches!(self, LookupError::IconNotFound { .. })
    }
}

fn format_not_found(name: &str, renderer: &Option<String>, available: &[String]) -> String {
    let listing = if available.is_empty() {
        "(none)".to_string()
    } else {
        available.join(", ")
    };
    match renderer {
        Some(renderer) => format!(
            "Icon '{}' not listed in available icons for renderer '{}'. Available icons: {}",
            name, renderer, listing
        ),
        None => format!(
            "Icon '{}' not found in any configured renderer. Available icons: {}",
            name, listing
        ),
    }
}

/// Syntax error inside an `{% icon ... %}` tag
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Syntax error at {span:?}: {message}")]
pub struct TagSyntaxError {
    pub span: Span,
    pub message: String,
    pub expected: Vec<String>,
}

impl TagSyntaxError {
    /// Shift the span by `by` bytes
    pub fn offset(mut self, by: usize) -> Self {
        self.span = self.span.start + by..self.span.end + by;
        self
    }

    /// Format the error with source context using ariadne
    pub fn format(&self, source: &str, filename: &str) -> String {
        let expected_str = if self.expected.is_empty() {
            String::new()
        } else {
            format!("\nExpected: {}", self.expected.join(", "))
        };

        let mut buf = Vec::new();
        let written = Report::build(ReportKind::Error, filename, self.span.start)
            .with_message(&self.message)
            .with_label(
                Label::new((filename, self.span.clone()))
                    .with_message(format!("{}{}", self.message, expected_str))
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

impl<'a> From<Rich<'a, Token>> for TagSyntaxError {
    fn from(err: Rich<'a, Token>) -> Self {
        let message = match err.reason() {
            RichReason::ExpectedFound { found, .. } => {
                let found_str = match found {
                    Some(tok) => format_token(tok),
                    None => "end of tag".to_string(),
                };
                format!("Unexpected {}", found_str)
            }
            RichReason::Custom(msg) => msg.to_string(),
            #[allow(unreachable_patterns)]
            _ => "Invalid icon tag".to_string(),
        };

        let expected: Vec<String> = err
            .expected()
            .filter_map(|e| match e {
                RichPattern::Token(tok) => Some(format_token(tok)),
                RichPattern::Label(label) => Some(label.to_string()),
                RichPattern::EndOfInput => Some("end of tag".to_string()),
                _ => None,
            })
            .collect();

        // End-of-input errors can carry a span that ends before it starts
        let range = err.span().into_range();
        TagSyntaxError {
            span: range.start.min(range.end)..range.end.max(range.start),
            message,
            expected,
        }
    }
}

/// Format a token for human-readable error messages
fn format_token(tok: &Token) -> String {
    match tok {
        Token::Icon => "keyword 'icon'".to_string(),
        Token::True => "'true'".to_string(),
        Token::False => "'false'".to_string(),
        Token::Equals => "'='".to_string(),
        Token::Ident(s) => format!("name '{}'", s),
        Token::Str(s) => format!("string \"{}\"", s),
        Token::Number(n) => format!("number {}", n),
    }
}
