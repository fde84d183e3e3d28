//! Contains the [`TokenStream`] struct: the classified tokens of a source file together with the
//! single cursor a validation pass moves over them.

use derive_more::Deref;
use thiserror::Error;

use crate::token::Token;

/// The cursor is already past the last token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Error)]
#[error("the token stream is already at its end")]
pub struct EndOfStream;

/// Is an ordered list of [`Token`]s with a cursor that only moves forward.
///
/// The cursor always stays within `0..=len`. The only way to move it backward is
/// [`TokenStream::reset()`], which starts a fresh pass over the same tokens.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Deref)]
pub struct TokenStream {
    #[deref]
    tokens: Vec<Token>,
    cursor: usize,
}

impl TokenStream {
    /// Creates a token stream with the cursor at the first token.
    #[must_use]
    pub fn new(tokens: Vec<Token>) -> Self { Self { tokens, cursor: 0 } }

    /// Returns the token under the cursor without consuming it, or [`None`] at the end.
    #[must_use]
    pub fn current(&self) -> Option<&Token> { self.tokens.get(self.cursor) }

    /// Returns the token under the cursor and moves the cursor forward by one.
    ///
    /// # Errors
    /// [`EndOfStream`] if the cursor is already at the end; the cursor doesn't move.
    pub fn advance(&mut self) -> Result<&Token, EndOfStream> {
        let token = self.tokens.get(self.cursor).ok_or(EndOfStream)?;
        self.cursor += 1;

        Ok(token)
    }

    /// Checks whether every token has been consumed.
    #[must_use]
    pub fn is_end(&self) -> bool { self.cursor >= self.tokens.len() }

    /// Gets the index of the token under the cursor; equal to the number of tokens at the end.
    #[must_use]
    pub fn position(&self) -> usize { self.cursor }

    /// Moves the cursor back to the first token.
    pub fn reset(&mut self) { self.cursor = 0; }

    /// Dissolves this struct into the list of its tokens.
    #[must_use]
    pub fn dissolve(self) -> Vec<Token> { self.tokens }
}

impl FromIterator<Token> for TokenStream {
    fn from_iter<T: IntoIterator<Item = Token>>(iter: T) -> Self { Self::new(iter.into_iter().collect()) }
}
