//! Contains the ANSI escape codes used to decorate console output.

use std::fmt::Display;

/// Represents a text decoration: either a font style or a foreground color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(missing_docs)]
pub enum Style {
    Bold,
    Underline,
    Red,
    Green,
    Yellow,
    Cyan,
}

impl Style {
    /// Gets the ANSI escape sequence that turns the decoration on.
    #[must_use]
    pub fn escape_code(self) -> &'static str {
        match self {
            Self::Bold => "\x1B[1m",
            Self::Underline => "\x1B[4m",
            Self::Red => "\x1B[31m",
            Self::Green => "\x1B[32m",
            Self::Yellow => "\x1B[33m",
            Self::Cyan => "\x1B[36m",
        }
    }

    /// Applies the decoration to the given displayable object.
    #[must_use]
    pub fn with<T>(self, display: T) -> Styled<T> {
        Styled {
            style: self,
            display,
        }
    }
}

/// Is a struct implementing [`Display`] that represents a displayable object with a decoration
/// applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Styled<T> {
    /// The decoration applied to the displayable object.
    pub style: Style,

    /// The displayable object.
    pub display: T,
}

impl<T: Display> Display for Styled<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}\x1B[0m", self.style.escape_code(), self.display)
    }
}
