//! Reads and writes the token dump: the textual format the classified tokens are exchanged in.
//!
//! Every token is one newline-terminated record of whitespace-separated fields:
//!
//! ``` text
//! <lexeme> <category> [<line>:<column>]
//! ```
//!
//! The location field is optional. Inside `<lexeme>` the characters that would break the record
//! apart are escaped: `\\` for a backslash, `\s` for a space, `\t`, `\r` and `\n` for the
//! usual control characters, and `\u{..}` for any other whitespace.

use std::{
    io::{BufRead, Write},
    str::FromStr,
};

use ccheck_base::source_file::Location;
use thiserror::Error;

use crate::{
    lexeme::Lexeme,
    token::{Token, TokenCategory},
};

/// Is an error that occurs while reading a token dump.
///
/// Line numbers start at 1.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("line {line}: the record has no category field")]
    MissingCategory { line: usize },

    #[error("line {line}: `{name}` is not a token category")]
    UnknownCategory { line: usize, name: String },

    #[error("line {line}: `{field}` is not a `line:column` location")]
    MalformedLocation { line: usize, field: String },

    #[error("line {line}: `{field}` contains an invalid escape sequence")]
    InvalidEscape { line: usize, field: String },

    #[error("line {line}: unexpected trailing field `{field}`")]
    TrailingField { line: usize, field: String },
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());

    for character in text.chars() {
        match character {
            '\\' => escaped.push_str("\\\\"),
            ' ' => escaped.push_str("\\s"),
            '\t' => escaped.push_str("\\t"),
            '\r' => escaped.push_str("\\r"),
            '\n' => escaped.push_str("\\n"),
            character if character.is_whitespace() => {
                escaped.push_str(&format!("\\u{{{:x}}}", u32::from(character)));
            }
            character => escaped.push(character),
        }
    }

    escaped
}

fn unescape(field: &str) -> Option<String> {
    let mut text = String::with_capacity(field.len());
    let mut chars = field.chars();

    while let Some(character) = chars.next() {
        if character != '\\' {
            text.push(character);
            continue;
        }

        text.push(match chars.next()? {
            '\\' => '\\',
            's' => ' ',
            't' => '\t',
            'r' => '\r',
            'n' => '\n',
            'u' => {
                if chars.next()? != '{' {
                    return None;
                }

                let mut code = String::new();
                loop {
                    match chars.next()? {
                        '}' => break,
                        digit => code.push(digit),
                    }
                }

                char::from_u32(u32::from_str_radix(&code, 16).ok()?)?
            }
            _ => return None,
        });
    }

    Some(text)
}

fn parse_location(field: &str) -> Option<Location> {
    let (line, column) = field.split_once(':')?;

    Some(Location {
        line: line.parse().ok()?,
        column: column.parse().ok()?,
    })
}

/// Writes the record of a single token, including the trailing newline.
///
/// # Errors
/// Any IO error raised by the writer.
pub fn write_record(token: &Token, mut writer: impl Write) -> std::io::Result<()> {
    write!(writer, "{} {}", escape(token.text()), token.category())?;

    if let Some(location) = token.lexeme().location() {
        write!(writer, " {location}")?;
    }

    writeln!(writer)
}

/// Writes the records of all the tokens.
///
/// # Errors
/// Any IO error raised by the writer.
pub fn write<'a>(
    tokens: impl IntoIterator<Item = &'a Token>,
    mut writer: impl Write,
) -> std::io::Result<()> {
    for token in tokens {
        write_record(token, &mut writer)?;
    }

    writer.flush()
}

/// Serializes the tokens into a string of records.
#[must_use]
pub fn serialize<'a>(tokens: impl IntoIterator<Item = &'a Token>) -> String {
    let mut buffer = Vec::new();
    write(tokens, &mut buffer).expect("writing to a vector never fails");

    String::from_utf8(buffer).expect("the records are built from strings")
}

/// Parses a single record. `index` becomes the lexeme index and `line` is used in errors.
///
/// # Errors
/// See [`Error`]; never [`Error::Io`].
pub fn parse_record(record: &str, index: usize, line: usize) -> Result<Token, Error> {
    let mut fields = record.split_whitespace();

    let text_field = fields.next().ok_or(Error::MissingCategory { line })?;
    let text = unescape(text_field).ok_or_else(|| Error::InvalidEscape {
        line,
        field: text_field.to_owned(),
    })?;

    let category_field = fields.next().ok_or(Error::MissingCategory { line })?;
    let category =
        TokenCategory::from_str(category_field).map_err(|_| Error::UnknownCategory {
            line,
            name: category_field.to_owned(),
        })?;

    let location = fields
        .next()
        .map(|field| {
            parse_location(field).ok_or_else(|| Error::MalformedLocation {
                line,
                field: field.to_owned(),
            })
        })
        .transpose()?;

    if let Some(field) = fields.next() {
        return Err(Error::TrailingField {
            line,
            field: field.to_owned(),
        });
    }

    Ok(Token::new(Lexeme::new(text, index, location), category))
}

/// Reads the records from the reader. Blank lines are skipped.
///
/// # Errors
/// See [`Error`].
pub fn read(reader: impl BufRead) -> Result<Vec<Token>, Error> {
    let mut tokens = Vec::new();

    for (line_index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        tokens.push(parse_record(&line, tokens.len(), line_index + 1)?);
    }

    Ok(tokens)
}

/// Deserializes a string of records.
///
/// # Errors
/// See [`Error`]; never [`Error::Io`].
pub fn deserialize(text: &str) -> Result<Vec<Token>, Error> { read(text.as_bytes()) }
