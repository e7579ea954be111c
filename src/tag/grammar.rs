//! Parser for the body of an `{% icon ... %}` tag using chumsky

use chumsky::input::{Stream, ValueInput};
use chumsky::prelude::*;

use crate::error::TagSyntaxError;
use crate::tag::lexer::{lex, Span, Token};

/// A node with its source span
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<T> {
    pub node: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(node: T, span: Span) -> Self {
        Self { node, span }
    }
}

/// A value position in the tag
#[derive(Debug, Clone, PartialEq)]
pub enum TagValue {
    Str(String),
    Number(String),
    Bool(bool),
    /// Context variable, looked up at render time
    Var(String),
}

/// `key=value`
#[derive(Debug, Clone, PartialEq)]
pub struct Argument {
    pub key: Spanned<String>,
    pub value: Spanned<TagValue>,
}

/// A parsed `icon <name> key=value...` tag body
#[derive(Debug, Clone, PartialEq)]
pub struct IconTag {
    pub name: Spanned<TagValue>,
    pub args: Vec<Argument>,
}

/// Parse a tag body; spans are relative to `input`
pub fn parse_tag(input: &str) -> Result<IconTag, Vec<TagSyntaxError>> {
    let len = input.len();

    let mut tokens = Vec::new();
    let mut errors = Vec::new();
    for (tok, span) in lex(input) {
        match tok {
            Ok(tok) => tokens.push((tok, SimpleSpan::from(span))),
            Err(()) => errors.push(TagSyntaxError {
                message: format!("Unexpected character '{}'", &input[span.clone()]),
                span,
                expected: Vec::new(),
            }),
        }
    }
    if !errors.is_empty() {
        return Err(errors);
    }

    let token_stream = Stream::from_iter(tokens.into_iter())
        // Split (Token, SimpleSpan) into token and span parts
        .map((len..len).into(), |(t, s): (_, _)| (t, s));

    tag_parser()
        .parse(token_stream)
        .into_result()
        .map_err(|errs| errs.into_iter().map(|e| e.into()).collect())
}

/// Helper to extract span range from chumsky's MapExtra
fn span_range(e: &impl chumsky::span::Span<Offset = usize>) -> Span {
    e.start()..e.end()
}

fn tag_parser<'a, I>() -> impl Parser<'a, I, IconTag, extra::Err<Rich<'a, Token>>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = SimpleSpan>,
{
    let value = select! {
        Token::Str(s) => TagValue::Str(s),
        Token::Number(n) => TagValue::Number(n),
        Token::True => TagValue::Bool(true),
        Token::False => TagValue::Bool(false),
        Token::Ident(name) => TagValue::Var(name),
    }
    .labelled("value")
    .map_with(|v, e| Spanned::new(v, span_range(&e.span())));

    let key = select! {
        Token::Ident(k) => k,
    }
    .labelled("argument name")
    .map_with(|k, e| Spanned::new(k, span_range(&e.span())));

    let argument = key
        .then_ignore(just(Token::Equals))
        .then(value.clone())
        .map(|(key, value)| Argument { key, value });

    just(Token::Icon)
        .ignore_then(value)
        .then(argument.repeated().collect::<Vec<_>>())
        .then_ignore(end())
        .map(|(name, args)| IconTag { name, args })
}
