//! Provides the functions related to logging/printing messages to the console.

use std::fmt::Display;

use derive_new::new;
use formatting::Style;

use crate::source_file::{Location, SourceFile};

pub mod formatting;

/// Represents the severity of a log message to be printed to the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[allow(missing_docs)]
pub enum Severity {
    Error,
    Info,
    Warning,
}

/// Is a struct implementing [`Display`] that represents a log message to be displayed to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, new)]
pub struct Message<T> {
    /// The severity of the log message.
    pub severity: Severity,

    /// The message to be displayed.
    pub display: T,
}

impl<T: Display> Display for Message<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let log_header = Style::Bold.with(match self.severity {
            Severity::Error => Style::Red.with("[error]:"),
            Severity::Info => Style::Green.with("[info]:"),
            Severity::Warning => Style::Yellow.with("[warning]:"),
        });

        write!(f, "{log_header} {}", Style::Bold.with(&self.display))
    }
}

/// Structure implementing [`Display`] that prints a single source line with the columns
/// `location.column..location.column + width` underlined.
///
/// ``` text
///   --> main.c:3:10
///   ┃
/// 3 ┃     int x
///   ┃          ^ help: add a `;` here
///   ┃
/// ```
#[derive(Debug, Clone, Copy, new)]
pub struct SourceCodeDisplay<'a, T> {
    /// The source file the location points into.
    pub source_file: &'a SourceFile,

    /// Where the highlighted region starts.
    pub location: Location,

    /// The number of highlighted characters; zero still shows a single caret.
    pub width: usize,

    /// The help message to be displayed under the highlighted region.
    pub help_display: Option<T>,
}

impl<'a, T: Display> Display for SourceCodeDisplay<'a, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let line_number = self.location.line;
        let gutter = line_number.to_string().len();
        let pipe = Style::Bold.with(Style::Cyan.with("┃"));

        writeln!(
            f,
            "{:gutter$} {} {}:{}",
            "",
            Style::Bold.with(Style::Cyan.with("-->")),
            self.source_file.full_path().display(),
            self.location,
        )?;
        writeln!(f, "{:gutter$} {pipe}", "")?;

        let Some(line) = self.source_file.get_line(line_number) else {
            return Ok(());
        };

        write!(
            f,
            "{} {pipe} ",
            Style::Bold.with(Style::Cyan.with(line_number))
        )?;

        let highlighted = self.location.column..self.location.column + self.width.max(1);
        for (column, character) in (1..).zip(line.trim_end_matches(['\r', '\n']).chars()) {
            if highlighted.contains(&column) {
                write!(
                    f,
                    "{}",
                    Style::Underline.with(Style::Bold.with(Style::Red.with(character)))
                )?;
            } else if character == '\t' {
                write!(f, " ")?;
            } else {
                write!(f, "{character}")?;
            }
        }
        writeln!(f)?;

        write!(f, "{:gutter$} {pipe} ", "")?;
        write!(
            f,
            "{:indent$}{}",
            "",
            Style::Bold.with(Style::Red.with("^".repeat(self.width.max(1)))),
            indent = self.location.column.saturating_sub(1),
        )?;
        if let Some(help) = &self.help_display {
            write!(f, " {}: {help}", Style::Bold.with("help"))?;
        }
        writeln!(f)?;

        writeln!(f, "{:gutter$} {pipe}", "")
    }
}
