//! Is a module containing the [`Token`] type, the fixed classification tables, and the token
//! classifier.

use std::{collections::HashMap, fmt::Display, str::FromStr};

use ccheck_base::diagnostic::Handler;
use derive_new::new;
use enum_as_inner::EnumAsInner;
use getset::{CopyGetters, Getters};
use lazy_static::lazy_static;
use strum::IntoEnumIterator;
use strum_macros::{EnumIter, EnumString};
use thiserror::Error;

use crate::lexeme::Lexeme;

/// Is an enumeration representing the reserved keywords of the language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter)]
#[allow(missing_docs)]
pub enum KeywordKind {
    Int,
    Float,
    Char,
    Double,
    Long,
    Short,
    Void,
    Signed,
    Unsigned,
    Const,
    If,
    Else,
    For,
    While,
    Do,
    Return,
    Break,
    Continue,
    Sizeof,
}

/// Is an error that is returned when a string cannot be parsed into a [`KeywordKind`] in
/// [`FromStr`] trait implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Error)]
#[error("invalid string representation of keyword.")]
pub struct KeywordParseError;

impl FromStr for KeywordKind {
    type Err = KeywordParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        lazy_static! {
            static ref STRING_KEYWORD_MAP: HashMap<&'static str, KeywordKind> =
                KeywordKind::iter()
                    .map(|keyword| (keyword.as_str(), keyword))
                    .collect();
        }

        STRING_KEYWORD_MAP.get(s).copied().ok_or(KeywordParseError)
    }
}

impl KeywordKind {
    /// Gets the string representation of the keyword as a `&str`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::Float => "float",
            Self::Char => "char",
            Self::Double => "double",
            Self::Long => "long",
            Self::Short => "short",
            Self::Void => "void",
            Self::Signed => "signed",
            Self::Unsigned => "unsigned",
            Self::Const => "const",
            Self::If => "if",
            Self::Else => "else",
            Self::For => "for",
            Self::While => "while",
            Self::Do => "do",
            Self::Return => "return",
            Self::Break => "break",
            Self::Continue => "continue",
            Self::Sizeof => "sizeof",
        }
    }

    /// Checks whether the keyword names a type (or a type qualifier) and thus introduces a
    /// declaration.
    #[must_use]
    pub fn is_type_specifier(self) -> bool {
        matches!(
            self,
            Self::Int
                | Self::Float
                | Self::Char
                | Self::Double
                | Self::Long
                | Self::Short
                | Self::Void
                | Self::Signed
                | Self::Unsigned
                | Self::Const
        )
    }
}

impl Display for KeywordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { f.write_str(self.as_str()) }
}

/// Is an enumeration representing the operators of the language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter)]
#[allow(missing_docs)]
pub enum OperatorKind {
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    PlusPlus,
    MinusMinus,
    Assign,
    PlusAssign,
    MinusAssign,
    StarAssign,
    SlashAssign,
    PercentAssign,
    AmpersandAssign,
    PipeAssign,
    CaretAssign,
    ShiftLeftAssign,
    ShiftRightAssign,
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    LogicalAnd,
    LogicalOr,
    Bang,
    Ampersand,
    Pipe,
    Caret,
    Tilde,
    ShiftLeft,
    ShiftRight,
    Arrow,
    Question,
    Colon,
}

impl OperatorKind {
    /// Gets the spelling of the operator.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Star => "*",
            Self::Slash => "/",
            Self::Percent => "%",
            Self::PlusPlus => "++",
            Self::MinusMinus => "--",
            Self::Assign => "=",
            Self::PlusAssign => "+=",
            Self::MinusAssign => "-=",
            Self::StarAssign => "*=",
            Self::SlashAssign => "/=",
            Self::PercentAssign => "%=",
            Self::AmpersandAssign => "&=",
            Self::PipeAssign => "|=",
            Self::CaretAssign => "^=",
            Self::ShiftLeftAssign => "<<=",
            Self::ShiftRightAssign => ">>=",
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::Less => "<",
            Self::LessEqual => "<=",
            Self::Greater => ">",
            Self::GreaterEqual => ">=",
            Self::LogicalAnd => "&&",
            Self::LogicalOr => "||",
            Self::Bang => "!",
            Self::Ampersand => "&",
            Self::Pipe => "|",
            Self::Caret => "^",
            Self::Tilde => "~",
            Self::ShiftLeft => "<<",
            Self::ShiftRight => ">>",
            Self::Arrow => "->",
            Self::Question => "?",
            Self::Colon => ":",
        }
    }
}

/// Is an enumeration representing the punctuations of the language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter)]
#[allow(missing_docs)]
pub enum PunctuationKind {
    LeftParenthesis,
    RightParenthesis,
    LeftBrace,
    RightBrace,
    LeftBracket,
    RightBracket,
    Comma,
    Semicolon,
    Dot,
}

impl PunctuationKind {
    /// Gets the spelling of the punctuation.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::LeftParenthesis => "(",
            Self::RightParenthesis => ")",
            Self::LeftBrace => "{",
            Self::RightBrace => "}",
            Self::LeftBracket => "[",
            Self::RightBracket => "]",
            Self::Comma => ",",
            Self::Semicolon => ";",
            Self::Dot => ".",
        }
    }
}

/// Is either an operator or a punctuation; the two tables the lexer munches symbols from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnumAsInner)]
#[allow(missing_docs)]
pub enum Symbol {
    Operator(OperatorKind),
    Punctuation(PunctuationKind),
}

impl Symbol {
    /// The length in bytes of the longest symbol spelling.
    pub const MAX_LENGTH: usize = 3;

    /// Gets the spelling of the symbol.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Operator(operator) => operator.as_str(),
            Self::Punctuation(punctuation) => punctuation.as_str(),
        }
    }

    /// Looks up the symbol spelled exactly as `text`.
    #[must_use]
    pub fn lookup(text: &str) -> Option<Self> {
        lazy_static! {
            static ref STRING_SYMBOL_MAP: HashMap<&'static str, Symbol> = OperatorKind::iter()
                .map(Symbol::Operator)
                .chain(PunctuationKind::iter().map(Symbol::Punctuation))
                .map(|symbol| (symbol.as_str(), symbol))
                .collect();
        }

        STRING_SYMBOL_MAP.get(text).copied()
    }

    /// Finds the longest symbol that `text` starts with.
    #[must_use]
    pub fn longest_prefix(text: &str) -> Option<Self> {
        (1..=Self::MAX_LENGTH.min(text.len()))
            .rev()
            .filter_map(|length| text.get(..length))
            .find_map(Self::lookup)
    }
}

/// Is an enumeration of the grammatical categories a token can be classified into.
///
/// The [`Display`] and [`FromStr`] representations are the variant names; they are used by the
/// token dump format.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    EnumIter,
    EnumString,
    strum_macros::Display,
)]
#[allow(missing_docs)]
pub enum TokenCategory {
    Keyword,
    Identifier,
    IntegerLiteral,
    FloatLiteral,
    CharLiteral,
    StringLiteral,
    Operator,
    Punctuation,
}

type Rule = fn(&str) -> Option<TokenCategory>;

/// The classification rules in priority order; the first rule that matches wins.
const RULES: [Rule; 5] = [
    classify_keyword,
    classify_symbol,
    classify_numeric,
    classify_quoted,
    classify_identifier,
];

fn classify_keyword(text: &str) -> Option<TokenCategory> {
    KeywordKind::from_str(text)
        .ok()
        .map(|_| TokenCategory::Keyword)
}

fn classify_symbol(text: &str) -> Option<TokenCategory> {
    Symbol::lookup(text).map(|symbol| match symbol {
        Symbol::Operator(..) => TokenCategory::Operator,
        Symbol::Punctuation(..) => TokenCategory::Punctuation,
    })
}

fn classify_numeric(text: &str) -> Option<TokenCategory> {
    let is_digits = |part: &str| !part.is_empty() && part.bytes().all(|byte| byte.is_ascii_digit());

    match text.split_once('.') {
        None if is_digits(text) => Some(TokenCategory::IntegerLiteral),
        Some((whole, fraction)) if is_digits(whole) && is_digits(fraction) => {
            Some(TokenCategory::FloatLiteral)
        }
        _ => None,
    }
}

fn classify_quoted(text: &str) -> Option<TokenCategory> {
    let mut chars = text.chars();
    let (Some(open), Some(close)) = (chars.next(), chars.next_back()) else {
        return None;
    };

    match (open, close) {
        ('"', '"') => Some(TokenCategory::StringLiteral),
        // the empty character literal `''` is not a character
        ('\'', '\'') if text.len() > 2 => Some(TokenCategory::CharLiteral),
        _ => None,
    }
}

fn classify_identifier(text: &str) -> Option<TokenCategory> {
    let mut chars = text.chars();
    let first = chars.next()?;

    ((first.is_ascii_alphabetic() || first == '_')
        && chars.all(|character| character.is_ascii_alphanumeric() || character == '_'))
    .then_some(TokenCategory::Identifier)
}

/// Classifies the given lexeme text by walking the classification rules in priority order:
/// keyword, operator/punctuation, numeric literal, quoted literal, identifier.
///
/// Returns [`None`] if no rule matches.
#[must_use]
pub fn classify(text: &str) -> Option<TokenCategory> { RULES.iter().find_map(|rule| rule(text)) }

/// The lexeme doesn't match any classification rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("found an unrecognized token `{lexeme}`")]
pub struct UnrecognizedToken {
    /// The offending lexeme.
    pub lexeme: Lexeme,
}

/// Is a lexeme paired with its grammatical category.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Getters, CopyGetters, new)]
pub struct Token {
    /// Gets the lexeme of the token.
    #[get = "pub"]
    lexeme: Lexeme,

    /// Gets the category the lexeme was classified into.
    #[get_copy = "pub"]
    category: TokenCategory,
}

impl Token {
    /// Classifies the given lexeme into a token.
    ///
    /// # Errors
    /// [`UnrecognizedToken`] if the lexeme doesn't match any classification rule.
    pub fn classify(lexeme: Lexeme) -> Result<Self, UnrecognizedToken> {
        match classify(lexeme.text()) {
            Some(category) => Ok(Self { lexeme, category }),
            None => Err(UnrecognizedToken { lexeme }),
        }
    }

    /// Gets the text of the token.
    #[must_use]
    pub fn text(&self) -> &str { self.lexeme.text() }

    /// Gets the keyword this token represents, if it is a keyword.
    #[must_use]
    pub fn keyword(&self) -> Option<KeywordKind> {
        if self.category == TokenCategory::Keyword {
            KeywordKind::from_str(self.text()).ok()
        } else {
            None
        }
    }

    /// Gets the operator this token represents, if it is an operator.
    #[must_use]
    pub fn operator(&self) -> Option<OperatorKind> {
        if self.category == TokenCategory::Operator {
            Symbol::lookup(self.text()).and_then(|symbol| symbol.into_operator().ok())
        } else {
            None
        }
    }

    /// Gets the punctuation this token represents, if it is a punctuation.
    #[must_use]
    pub fn punctuation(&self) -> Option<PunctuationKind> {
        if self.category == TokenCategory::Punctuation {
            Symbol::lookup(self.text()).and_then(|symbol| symbol.into_punctuation().ok())
        } else {
            None
        }
    }
}

/// Classifies every lexeme, stopping at the first one that is not recognized.
///
/// # Errors
/// [`UnrecognizedToken`] for the first lexeme that doesn't match any rule. No partial token list
/// is returned.
pub fn classify_all(
    lexemes: impl IntoIterator<Item = Lexeme>,
) -> Result<Vec<Token>, UnrecognizedToken> {
    lexemes.into_iter().map(Token::classify).collect()
}

/// Classifies every lexeme, reporting each unrecognized one to the `handler` and carrying on.
///
/// Returns [`None`] if at least one lexeme was reported; the tokens classified successfully are
/// discarded in that case.
pub fn classify_each(
    lexemes: impl IntoIterator<Item = Lexeme>,
    handler: &dyn Handler<UnrecognizedToken>,
) -> Option<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut failed = false;

    for lexeme in lexemes {
        match Token::classify(lexeme) {
            Ok(token) => tokens.push(token),
            Err(error) => {
                handler.receive(error);
                failed = true;
            }
        }
    }

    (!failed).then_some(tokens)
}

#[cfg(test)]
pub(crate) mod tests;
