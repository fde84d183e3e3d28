//! Contains all kinds of grammar violations the statement validator can report.

use std::fmt::Display;

use ccheck_base::{
    log::{Message, Severity},
    source_file::Location,
};
use ccheck_lexical::token::{KeywordKind, PunctuationKind, Token};
use derive_more::From;
use enum_as_inner::EnumAsInner;

/// Enumeration containing all kinds of syntax the validator can expect at a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnumAsInner)]
#[allow(missing_docs)]
pub enum SyntaxKind {
    Punctuation(PunctuationKind),
    Keyword(KeywordKind),
    Identifier,
    Expression,
    Statement,
}

impl Display for SyntaxKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Punctuation(punctuation) => write!(f, "`{}`", punctuation.as_str()),
            Self::Keyword(keyword) => write!(f, "`{}`", keyword.as_str()),
            Self::Identifier => f.write_str("an identifier"),
            Self::Expression => f.write_str("an expression"),
            Self::Statement => f.write_str("a statement"),
        }
    }
}

/// A syntax is expected but an other token (or the end of the token stream) was found.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UnexpectedSyntax {
    /// The kind of syntax that was expected.
    pub expected: SyntaxKind,

    /// The offending token; [`None`] if the token stream ended.
    pub found: Option<Token>,

    /// The cursor position of the offending token; the number of tokens at the end of the
    /// stream.
    pub position: usize,
}

impl Display for UnexpectedSyntax {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let found_binding = self.found.as_ref().map_or_else(
            || "the end of the token stream".to_string(),
            |token| format!("`{}`", token.text()),
        );

        write!(
            f,
            "{}",
            Message::new(
                Severity::Error,
                format!("expected {}, but found {found_binding}", self.expected)
            )
        )
    }
}

/// The statements are nested deeper than the configured bound.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NestingTooDeep {
    /// The token that would have started the statement one level too deep.
    pub found: Option<Token>,

    /// The cursor position where the limit was hit.
    pub position: usize,

    /// The configured bound.
    pub max_depth: usize,
}

impl Display for NestingTooDeep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            Message::new(
                Severity::Error,
                format!(
                    "statements are nested deeper than the limit of {}",
                    self.max_depth
                )
            )
        )
    }
}

/// Is an enumeration containing all kinds of grammar violations. The first violation stops the
/// validator.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, EnumAsInner, From)]
#[allow(missing_docs)]
pub enum Error {
    UnexpectedSyntax(UnexpectedSyntax),
    NestingTooDeep(NestingTooDeep),
}

impl Error {
    /// Gets the cursor position where the violation was detected.
    #[must_use]
    pub fn position(&self) -> usize {
        match self {
            Self::UnexpectedSyntax(error) => error.position,
            Self::NestingTooDeep(error) => error.position,
        }
    }

    /// Gets the offending token; [`None`] if the violation was detected at the end of the token
    /// stream.
    #[must_use]
    pub fn found(&self) -> Option<&Token> {
        match self {
            Self::UnexpectedSyntax(error) => error.found.as_ref(),
            Self::NestingTooDeep(error) => error.found.as_ref(),
        }
    }

    /// Gets the source location of the offending token, if the token carries one.
    #[must_use]
    pub fn location(&self) -> Option<Location> { self.found()?.lexeme().location() }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnexpectedSyntax(error) => error.fmt(f),
            Self::NestingTooDeep(error) => error.fmt(f),
        }
    }
}

impl std::error::Error for Error {}
