//! Contains the [`Lexer`] that splits the source code into [`Lexeme`]s.

use std::{fmt::Display, sync::Arc};

use ccheck_base::source_file::{self, ByteIndex, Location, SourceFile, Span};
use getset::{CopyGetters, Getters};

use crate::{
    error::{Error, UnterminatedComment, UnterminatedLiteral},
    token::Symbol,
};

/// Represents the text of one atomic unit of the source code.
///
/// Lexemes carry their index in the lexeme sequence and, when known, the location where they
/// start in the source code. Lexemes read back from a token dump that has no location field have
/// no location.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Getters, CopyGetters)]
pub struct Lexeme {
    /// Gets the text of the lexeme.
    #[get = "pub"]
    text: String,

    /// Gets the position of the lexeme in the lexeme sequence (starts at 0).
    #[get_copy = "pub"]
    index: usize,

    /// Gets the location where the lexeme starts in the source code.
    #[get_copy = "pub"]
    location: Option<Location>,
}

impl Lexeme {
    /// Creates a new lexeme.
    #[must_use]
    pub fn new(text: impl Into<String>, index: usize, location: Option<Location>) -> Self {
        Self {
            text: text.into(),
            index,
            location,
        }
    }
}

impl Display for Lexeme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { f.write_str(&self.text) }
}

/// Is an iterator producing the [`Lexeme`]s of a source file in a single forward pass.
///
/// The iterator yields [`Err`] at most once; after an error it is exhausted.
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    iter: source_file::Iterator<'a>,
    next_index: usize,
    failed: bool,
}

impl<'a> Lexer<'a> {
    /// Creates a lexer positioned at the start of the source file.
    #[must_use]
    pub fn new(source_file: &'a Arc<SourceFile>) -> Self {
        Self {
            iter: source_file.iter(),
            next_index: 0,
            failed: false,
        }
    }

    /// Increments the iterator until the predicate returns false.
    fn walk_iter(&mut self, predicate: impl Fn(char) -> bool) {
        while let Some((_, character)) = self.iter.peek() {
            if !predicate(character) {
                break;
            }

            self.iter.next();
        }
    }

    /// Moves the iterator to the given byte index.
    fn advance_to(&mut self, byte_index: ByteIndex) {
        while self.iter.position() < byte_index {
            self.iter.next();
        }
    }

    /// Creates a span from the given start location to the current location of the iterator.
    fn create_span(&mut self, start: ByteIndex) -> Span {
        let end = self.iter.position();
        Span::new(self.iter.source_file().clone(), start, end)
            .expect("the iterator always stops on a char boundary")
    }

    /// Skips whitespaces and comments.
    fn skip_trivia(&mut self) -> Result<(), Error> {
        loop {
            let remaining = self.iter.remaining();

            if remaining.starts_with(char::is_whitespace) {
                self.walk_iter(char::is_whitespace);
            } else if remaining.starts_with("//") {
                self.walk_iter(|character| character != '\n');
            } else if remaining.starts_with("/*") {
                let start = self.iter.position();

                let Some(offset) = remaining[2..].find("*/") else {
                    return Err(UnterminatedComment {
                        span: Span::new(self.iter.source_file().clone(), start, start + 2)
                            .expect("`/*` is two ASCII characters"),
                    }
                    .into());
                };

                self.advance_to(start + 2 + offset + 2);
            } else {
                return Ok(());
            }
        }
    }

    fn handle_quoted(&mut self, start: ByteIndex, quote: char) -> Result<(), Error> {
        loop {
            match self.iter.next() {
                Some((_, character)) if character == quote => return Ok(()),

                // the escaped character can't close the literal
                Some((_, '\\')) if self.iter.peek().is_some_and(|(_, next)| next != '\n') => {
                    self.iter.next();
                }

                None | Some((_, '\n' | '\\')) => {
                    return Err(UnterminatedLiteral {
                        span: Span::new(self.iter.source_file().clone(), start, start + 1)
                            .expect("quotes are single ASCII characters"),
                        quote,
                    }
                    .into());
                }

                Some(_) => {}
            }
        }
    }

    fn lex(&mut self) -> Option<Result<Lexeme, Error>> {
        if let Err(error) = self.skip_trivia() {
            return Some(Err(error));
        }

        let (start, character) = self.iter.next()?;

        match character {
            // identifier/keyword
            character if character.is_ascii_alphabetic() || character == '_' => {
                self.walk_iter(|character| character.is_ascii_alphanumeric() || character == '_');
            }

            // numeric literal, malformed ones included
            character if character.is_ascii_digit() => {
                self.walk_iter(|character| {
                    character.is_ascii_alphanumeric() || character == '_' || character == '.'
                });
            }

            '"' | '\'' => {
                if let Err(error) = self.handle_quoted(start, character) {
                    return Some(Err(error));
                }
            }

            // operator/punctuation, the longest spelling wins; anything else becomes a single
            // character lexeme
            _ => {
                let text = &self.iter.source_file().content()[start..];
                if let Some(symbol) = Symbol::longest_prefix(text) {
                    self.advance_to(start + symbol.as_str().len());
                }
            }
        }

        let span = self.create_span(start);
        let lexeme = Lexeme::new(span.str(), self.next_index, Some(span.start_location()));
        self.next_index += 1;

        Some(Ok(lexeme))
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Result<Lexeme, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        let result = self.lex();
        self.failed = matches!(result, Some(Err(..)));

        result
    }
}

/// Splits the whole source file into lexemes.
///
/// # Errors
/// The first lexical [`Error`] encountered; no lexemes are returned in that case.
pub fn lex(source_file: &Arc<SourceFile>) -> Result<Vec<Lexeme>, Error> {
    Lexer::new(source_file).collect()
}
