//! Drives the whole checking pipeline: loads the source file, lexes and classifies it, exchanges
//! the tokens through the token dump, and validates the statements read back from it.

use std::{
    cell::Cell,
    ffi::OsString,
    fmt::Display,
    fs::File,
    io::{BufReader, BufWriter},
    path::{Path, PathBuf},
    process::ExitCode,
    sync::Arc,
};

pub use clap::Parser;
use ccheck_base::{
    diagnostic::Handler,
    log::{Message, Severity, SourceCodeDisplay},
    source_file::{Location, SourceFile},
};
use ccheck_lexical::{
    exchange,
    lexeme::{self, Lexeme},
    token::{self, Token, UnrecognizedToken},
    token_stream::TokenStream,
};
use ccheck_syntax::{
    error::Error as SyntaxError,
    validator::{self, Config, DEFAULT_MAX_DEPTH},
};

/// The arguments to the program.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, clap::Parser)]
#[clap(
    name = "ccheck",
    about = "Lexes, classifies and validates the statements of a C-like source file.",
    author = "66011245@kmitl.ac.th"
)]
pub struct Argument {
    /// The source file to check.
    pub file: PathBuf,

    /// Where the token dump is written; defaults to the source path with `.tokens` appended.
    #[clap(long = "tokens")]
    pub tokens: Option<PathBuf>,

    /// Prints every token record to the standard output.
    #[clap(long = "print-tokens")]
    pub print_tokens: bool,

    /// The maximum statement nesting depth the validator accepts.
    #[clap(long = "max-depth", default_value_t = DEFAULT_MAX_DEPTH)]
    pub max_depth: usize,

    /// Reports every unrecognized lexeme instead of only the first one.
    #[clap(long = "report-all")]
    pub report_all: bool,
}

impl Argument {
    /// Creates the arguments for checking the given file with every option at its default.
    pub fn new(file: impl Into<PathBuf>) -> Self {
        Self {
            file: file.into(),
            tokens: None,
            print_tokens: false,
            max_depth: DEFAULT_MAX_DEPTH,
            report_all: false,
        }
    }

    /// Gets the path of the token dump.
    pub fn tokens_path(&self) -> PathBuf {
        self.tokens.clone().unwrap_or_else(|| {
            let mut path = OsString::from(self.file.as_os_str());
            path.push(".tokens");
            PathBuf::from(path)
        })
    }
}

fn print_error(display: impl Display) {
    eprintln!("{}", Message::new(Severity::Error, display));
}

/// A struct that implements [`Handler`] by printing the unrecognized lexemes, with their source
/// lines, to the standard error stream.
#[derive(Debug)]
struct Printer<'a> {
    source_file: &'a SourceFile,
    printed: Cell<bool>,
}

impl<'a> Printer<'a> {
    fn new(source_file: &'a SourceFile) -> Self {
        Self {
            source_file,
            printed: Cell::new(false),
        }
    }

    fn has_printed(&self) -> bool { self.printed.get() }
}

impl<'a> Handler<UnrecognizedToken> for Printer<'a> {
    fn receive(&self, error: UnrecognizedToken) {
        print_error(&error);

        if let Some(location) = error.lexeme.location() {
            eprintln!(
                "{}",
                SourceCodeDisplay::new(
                    self.source_file,
                    location,
                    error.lexeme.text().chars().count(),
                    Some("this lexeme doesn't belong to any token category")
                )
            );
        }

        self.printed.set(true);
    }
}

/// Gets where the violation should be pointed at in the source code: the offending token, or
/// right after the last token at the end of the stream.
fn violation_location(error: &SyntaxError, tokens: &[Token]) -> Option<(Location, usize)> {
    if let Some(token) = error.found() {
        return Some((token.lexeme().location()?, token.text().chars().count()));
    }

    let last = tokens.last()?;
    let location = last.lexeme().location()?;

    Some((
        Location {
            line: location.line,
            column: location.column + last.text().chars().count(),
        },
        1,
    ))
}

fn report_violation(source_file: &SourceFile, tokens: &[Token], error: &SyntaxError) {
    eprintln!("{error}");

    let Some((location, width)) = violation_location(error, tokens) else {
        return;
    };

    let help = match error {
        SyntaxError::UnexpectedSyntax(error) => format!("expected {} here", error.expected),
        SyntaxError::NestingTooDeep(..) => "the limit can be raised with `--max-depth`".to_string(),
    };

    eprintln!(
        "{}",
        SourceCodeDisplay::new(source_file, location, width, Some(help))
    );
}

fn load(path: &Path) -> Option<Arc<SourceFile>> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(error) => {
            print_error(format!("{}: {error}", path.display()));
            return None;
        }
    };

    match SourceFile::load(file, path.to_path_buf()) {
        Ok(source_file) => Some(source_file),
        Err(error) => {
            print_error(format!("{}: {error}", path.display()));
            None
        }
    }
}

fn classify(
    argument: &Argument,
    source_file: &SourceFile,
    lexemes: Vec<Lexeme>,
) -> Option<Vec<Token>> {
    if argument.report_all {
        let printer = Printer::new(source_file);
        let tokens = token::classify_each(lexemes, &printer);

        // early exit
        if printer.has_printed() {
            return None;
        }

        return tokens;
    }

    match token::classify_all(lexemes) {
        Ok(tokens) => Some(tokens),
        Err(error) => {
            Printer::new(source_file).receive(error);
            None
        }
    }
}

/// Writes the token dump and reads it back.
fn exchange_tokens(argument: &Argument, tokens: &[Token]) -> Option<Vec<Token>> {
    let path = argument.tokens_path();

    let written =
        File::create(&path).and_then(|file| exchange::write(tokens, BufWriter::new(file)));
    if let Err(error) = written {
        print_error(format!("{}: {error}", path.display()));
        return None;
    }

    if argument.print_tokens {
        print!("{}", exchange::serialize(tokens));
    }

    let read = File::open(&path)
        .map_err(exchange::Error::from)
        .and_then(|file| exchange::read(BufReader::new(file)));

    match read {
        Ok(tokens) => Some(tokens),
        Err(error) => {
            print_error(format!("{}: {error}", path.display()));
            None
        }
    }
}

/// Runs the program with the given arguments.
#[must_use]
pub fn run(argument: &Argument) -> ExitCode {
    let Some(source_file) = load(&argument.file) else {
        return ExitCode::FAILURE;
    };

    // lexemes
    let lexemes = match lexeme::lex(&source_file) {
        Ok(lexemes) => lexemes,
        Err(error) => {
            eprintln!("{error}");
            return ExitCode::FAILURE;
        }
    };

    // tokens
    let Some(tokens) = classify(argument, &source_file, lexemes) else {
        return ExitCode::FAILURE;
    };

    // token dump round trip
    let Some(tokens) = exchange_tokens(argument, &tokens) else {
        return ExitCode::FAILURE;
    };

    // validation
    let mut token_stream = TokenStream::new(tokens);
    let config = Config {
        max_depth: argument.max_depth,
    };

    match validator::validate(&mut token_stream, config) {
        Ok(statements) => {
            println!(
                "{}",
                Message::new(
                    Severity::Info,
                    format!(
                        "{} is valid ({} statements)",
                        argument.file.display(),
                        statements.len()
                    )
                )
            );

            ExitCode::SUCCESS
        }
        Err(error) => {
            report_violation(&source_file, &token_stream, &error);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests;
