//! Contains all kinds of lexical errors that can occur while splitting the source code into
//! lexemes.

use std::fmt::Display;

use ccheck_base::{
    log::{Message, Severity, SourceCodeDisplay},
    source_file::{Location, Span},
};
use derive_more::From;
use enum_as_inner::EnumAsInner;

/// The source code contains a string or character literal that is not closed before the end of
/// the line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnterminatedLiteral {
    /// The span of the opening quote.
    pub span: Span,

    /// The quote character that opened the literal (`"` or `'`).
    pub quote: char,
}

impl Display for UnterminatedLiteral {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = if self.quote == '"' {
            "string"
        } else {
            "character"
        };

        write!(
            f,
            "{}\n{}",
            Message::new(
                Severity::Error,
                format!("found an unterminated {kind} literal")
            ),
            SourceCodeDisplay::new(
                self.span.source_file().as_ref(),
                self.span.start_location(),
                1,
                Some(format!("this `{}` is never closed", self.quote))
            )
        )
    }
}

/// The source code contains an unclosed `/*` comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnterminatedComment {
    /// The span of the unclosed `/*` that starts the comment.
    pub span: Span,
}

impl Display for UnterminatedComment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}\n{}",
            Message::new(Severity::Error, "found an unclosed `/*` comment"),
            SourceCodeDisplay::new(
                self.span.source_file().as_ref(),
                self.span.start_location(),
                2,
                Option::<&str>::None
            )
        )
    }
}

/// Is an enumeration containing all kinds of lexical errors. Any of them stops the lexer.
#[derive(Debug, Clone, PartialEq, Eq, EnumAsInner, From)]
#[allow(missing_docs)]
pub enum Error {
    UnterminatedLiteral(UnterminatedLiteral),
    UnterminatedComment(UnterminatedComment),
}

impl Error {
    /// Gets the location in the source code where the offending construct starts.
    #[must_use]
    pub fn location(&self) -> Location {
        match self {
            Self::UnterminatedLiteral(error) => error.span.start_location(),
            Self::UnterminatedComment(error) => error.span.start_location(),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnterminatedLiteral(err) => write!(f, "{err}"),
            Self::UnterminatedComment(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {}
