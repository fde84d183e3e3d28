//! Contains the [`Validator`]: a single pass, lookahead-one grammar checker that walks a
//! [`TokenStream`] statement by statement.
//!
//! Syntax Synopsis:
//!
//! ``` ebnf
//! Program:
//!     Statement*
//!     ;
//!
//! Statement:
//!     'if' Condition Statement ('else' Statement)?
//!     | 'while' Condition Statement
//!     | 'do' Statement 'while' Condition ';'
//!     | 'for' '(' (DeclarationHead | Run)? ';' Run? ';' Run? ')' Statement
//!     | Declaration
//!     | Block
//!     | 'return' Run? ';'
//!     | 'break' ';'
//!     | 'continue' ';'
//!     | Run? ';'
//!     ;
//!
//! Condition:
//!     '(' Run ')'
//!     ;
//!
//! Block:
//!     '{' Statement* '}'
//!     ;
//!
//! Declaration:
//!     TypeSpecifier+ Declarator '(' Run? ')' (';' | Block)
//!     | DeclarationHead ';'
//!     ;
//!
//! DeclarationHead:
//!     TypeSpecifier+ Declarator Initializer? (',' Declarator Initializer?)*
//!     ;
//!
//! Declarator:
//!     '*'* Identifier ('[' Run? ']')*
//!     ;
//!
//! Initializer:
//!     '=' (Run | '{' (Initializer (',' Initializer)* ','?)? '}')
//!     ;
//! ```
//!
//! A `Run` is a sequence of tokens whose inner grammar is not checked: parentheses and brackets
//! must balance, and braces, `;` and control flow keywords end it.

use ccheck_lexical::{
    token::{KeywordKind, OperatorKind, PunctuationKind, Token, TokenCategory},
    token_stream::TokenStream,
};

use crate::error::{Error, NestingTooDeep, SyntaxKind, UnexpectedSyntax};

/// The bound on statement nesting used by [`Config::default()`].
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Is the configuration of a [`Validator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Config {
    /// The maximum number of statements (and initializer lists) that may enclose each other.
    pub max_depth: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Is the kind of a statement the validator accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(missing_docs)]
pub enum StatementKind {
    Declaration,
    FunctionPrototype,
    FunctionDefinition,
    Expression,
    Empty,
    Block,
    Conditional,
    While,
    DoWhile,
    For,
    Return,
    Break,
    Continue,
}

/// Checks whether the keyword can only appear at the start of a statement.
fn is_control_flow(keyword: KeywordKind) -> bool {
    matches!(
        keyword,
        KeywordKind::If
            | KeywordKind::Else
            | KeywordKind::For
            | KeywordKind::While
            | KeywordKind::Do
            | KeywordKind::Return
            | KeywordKind::Break
            | KeywordKind::Continue
    )
}

/// Gets the punctuation closing the given opening one.
fn closing_of(punctuation: PunctuationKind) -> Option<PunctuationKind> {
    match punctuation {
        PunctuationKind::LeftParenthesis => Some(PunctuationKind::RightParenthesis),
        PunctuationKind::LeftBracket => Some(PunctuationKind::RightBracket),
        _ => None,
    }
}

/// Is a grammar checker borrowing the cursor of a [`TokenStream`] for one validation pass.
///
/// The cursor only moves forward. The first violation is returned right away; the cursor is
/// left at the offending token.
#[derive(Debug)]
pub struct Validator<'a> {
    token_stream: &'a mut TokenStream,
    config: Config,
    depth: usize,
}

impl<'a> Validator<'a> {
    /// Creates a validator with the default [`Config`], starting at the current cursor position.
    #[must_use]
    pub fn new(token_stream: &'a mut TokenStream) -> Self {
        Self::with_config(token_stream, Config::default())
    }

    /// Creates a validator with the given [`Config`], starting at the current cursor position.
    #[must_use]
    pub fn with_config(token_stream: &'a mut TokenStream, config: Config) -> Self {
        Self {
            token_stream,
            config,
            depth: 0,
        }
    }

    /// Validates statements until the end of the token stream.
    ///
    /// # Errors
    /// The first grammar violation found.
    pub fn validate_program(&mut self) -> Result<Vec<StatementKind>, Error> {
        let mut statements = Vec::new();

        while !self.token_stream.is_end() {
            statements.push(self.validate_statement()?);
        }

        Ok(statements)
    }

    /// Validates a single statement starting at the cursor.
    ///
    /// # Errors
    /// The first grammar violation found.
    pub fn validate_statement(&mut self) -> Result<StatementKind, Error> {
        self.nested(Self::statement)
    }

    fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T, Error>) -> Result<T, Error> {
        if self.depth >= self.config.max_depth {
            return Err(NestingTooDeep {
                found: self.token_stream.current().cloned(),
                position: self.token_stream.position(),
                max_depth: self.config.max_depth,
            }
            .into());
        }

        self.depth += 1;
        let result = f(self);
        self.depth -= 1;

        result
    }

    fn unexpected(&self, expected: SyntaxKind) -> Error {
        UnexpectedSyntax {
            expected,
            found: self.token_stream.current().cloned(),
            position: self.token_stream.position(),
        }
        .into()
    }

    /// Moves past the current token; does nothing at the end of the stream.
    fn forward(&mut self) { let _ = self.token_stream.advance(); }

    fn peek_keyword(&self) -> Option<KeywordKind> {
        self.token_stream.current().and_then(Token::keyword)
    }

    fn peek_punctuation(&self) -> Option<PunctuationKind> {
        self.token_stream.current().and_then(Token::punctuation)
    }

    fn eat_punctuation(&mut self, punctuation: PunctuationKind) -> bool {
        let found = self.peek_punctuation() == Some(punctuation);
        if found {
            self.forward();
        }

        found
    }

    fn eat_operator(&mut self, operator: OperatorKind) -> bool {
        let found = self.token_stream.current().and_then(Token::operator) == Some(operator);
        if found {
            self.forward();
        }

        found
    }

    fn expect_punctuation(&mut self, punctuation: PunctuationKind) -> Result<(), Error> {
        if self.eat_punctuation(punctuation) {
            Ok(())
        } else {
            Err(self.unexpected(SyntaxKind::Punctuation(punctuation)))
        }
    }

    fn expect_keyword(&mut self, keyword: KeywordKind) -> Result<(), Error> {
        if self.peek_keyword() == Some(keyword) {
            self.forward();
            Ok(())
        } else {
            Err(self.unexpected(SyntaxKind::Keyword(keyword)))
        }
    }

    fn expect_identifier(&mut self) -> Result<(), Error> {
        if self
            .token_stream
            .current()
            .is_some_and(|token| token.category() == TokenCategory::Identifier)
        {
            self.forward();
            Ok(())
        } else {
            Err(self.unexpected(SyntaxKind::Identifier))
        }
    }

    /// Consumes a run of tokens up to (not including) one of the `terminators` at nesting depth
    /// zero, and returns the number of tokens consumed.
    ///
    /// The first terminator is the one reported when the run is cut short.
    fn run(&mut self, terminators: &[PunctuationKind]) -> Result<usize, Error> {
        let mut closers: Vec<PunctuationKind> = Vec::new();
        let mut length = 0;

        loop {
            let expected =
                SyntaxKind::Punctuation(closers.last().copied().unwrap_or(terminators[0]));

            let Some(token) = self.token_stream.current() else {
                return Err(self.unexpected(expected));
            };

            if token.keyword().is_some_and(is_control_flow) {
                return Err(self.unexpected(expected));
            }

            if let Some(punctuation) = token.punctuation() {
                if closers.is_empty() && terminators.contains(&punctuation) {
                    return Ok(length);
                }

                match punctuation {
                    PunctuationKind::LeftParenthesis | PunctuationKind::LeftBracket => {
                        closers.extend(closing_of(punctuation));
                    }

                    PunctuationKind::RightParenthesis | PunctuationKind::RightBracket
                        if closers.last() == Some(&punctuation) =>
                    {
                        closers.pop();
                    }

                    // unmatched closers, braces and stray `;`
                    PunctuationKind::RightParenthesis
                    | PunctuationKind::RightBracket
                    | PunctuationKind::LeftBrace
                    | PunctuationKind::RightBrace
                    | PunctuationKind::Semicolon => return Err(self.unexpected(expected)),

                    PunctuationKind::Comma | PunctuationKind::Dot => {}
                }
            }

            self.forward();
            length += 1;
        }
    }

    fn non_empty_run(&mut self, terminators: &[PunctuationKind]) -> Result<(), Error> {
        if self.run(terminators)? == 0 {
            Err(self.unexpected(SyntaxKind::Expression))
        } else {
            Ok(())
        }
    }

    fn condition(&mut self) -> Result<(), Error> {
        self.expect_punctuation(PunctuationKind::LeftParenthesis)?;
        self.non_empty_run(&[PunctuationKind::RightParenthesis])?;
        self.expect_punctuation(PunctuationKind::RightParenthesis)
    }

    fn statement(&mut self) -> Result<StatementKind, Error> {
        if let Some(keyword) = self.peek_keyword() {
            return match keyword {
                KeywordKind::If => self.conditional(),
                KeywordKind::While => self.while_loop(),
                KeywordKind::Do => self.do_while(),
                KeywordKind::For => self.for_loop(),
                KeywordKind::Return => self.return_statement(),
                KeywordKind::Break => self.jump(StatementKind::Break),
                KeywordKind::Continue => self.jump(StatementKind::Continue),
                keyword if keyword.is_type_specifier() => self.declaration(),
                KeywordKind::Sizeof => self.expression_statement(),
                _ => Err(self.unexpected(SyntaxKind::Statement)),
            };
        }

        match self.peek_punctuation() {
            Some(PunctuationKind::LeftBrace) => self.block().map(|()| StatementKind::Block),
            Some(PunctuationKind::Semicolon) => {
                self.forward();
                Ok(StatementKind::Empty)
            }
            Some(PunctuationKind::RightBrace) => Err(self.unexpected(SyntaxKind::Statement)),
            _ if self.token_stream.is_end() => Err(self.unexpected(SyntaxKind::Statement)),
            _ => self.expression_statement(),
        }
    }

    fn block(&mut self) -> Result<(), Error> {
        self.expect_punctuation(PunctuationKind::LeftBrace)?;

        loop {
            if self.eat_punctuation(PunctuationKind::RightBrace) {
                return Ok(());
            }

            if self.token_stream.is_end() {
                return Err(self.unexpected(SyntaxKind::Punctuation(
                    PunctuationKind::RightBrace,
                )));
            }

            self.validate_statement()?;
        }
    }

    fn conditional(&mut self) -> Result<StatementKind, Error> {
        // eat the `if` keyword
        self.forward();

        self.condition()?;
        self.validate_statement()?;

        if self.peek_keyword() == Some(KeywordKind::Else) {
            // eat the `else` keyword
            self.forward();

            self.validate_statement()?;
        }

        Ok(StatementKind::Conditional)
    }

    fn while_loop(&mut self) -> Result<StatementKind, Error> {
        // eat the `while` keyword
        self.forward();

        self.condition()?;
        self.validate_statement()?;

        Ok(StatementKind::While)
    }

    fn do_while(&mut self) -> Result<StatementKind, Error> {
        // eat the `do` keyword
        self.forward();

        self.validate_statement()?;
        self.expect_keyword(KeywordKind::While)?;
        self.condition()?;
        self.expect_punctuation(PunctuationKind::Semicolon)?;

        Ok(StatementKind::DoWhile)
    }

    fn for_loop(&mut self) -> Result<StatementKind, Error> {
        // eat the `for` keyword
        self.forward();

        self.expect_punctuation(PunctuationKind::LeftParenthesis)?;

        if self.peek_keyword().is_some_and(KeywordKind::is_type_specifier) {
            self.type_specifiers();
            self.declarator()?;
            self.remaining_declarators()?;
        } else {
            self.run(&[PunctuationKind::Semicolon])?;
        }
        self.expect_punctuation(PunctuationKind::Semicolon)?;

        self.run(&[PunctuationKind::Semicolon])?;
        self.expect_punctuation(PunctuationKind::Semicolon)?;

        self.run(&[PunctuationKind::RightParenthesis])?;
        self.expect_punctuation(PunctuationKind::RightParenthesis)?;

        self.validate_statement()?;

        Ok(StatementKind::For)
    }

    fn return_statement(&mut self) -> Result<StatementKind, Error> {
        // eat the `return` keyword
        self.forward();

        self.run(&[PunctuationKind::Semicolon])?;
        self.expect_punctuation(PunctuationKind::Semicolon)?;

        Ok(StatementKind::Return)
    }

    fn jump(&mut self, kind: StatementKind) -> Result<StatementKind, Error> {
        // eat the `break`/`continue` keyword
        self.forward();

        self.expect_punctuation(PunctuationKind::Semicolon)?;

        Ok(kind)
    }

    fn expression_statement(&mut self) -> Result<StatementKind, Error> {
        self.run(&[PunctuationKind::Semicolon])?;
        self.expect_punctuation(PunctuationKind::Semicolon)?;

        Ok(StatementKind::Expression)
    }

    fn type_specifiers(&mut self) {
        while self.peek_keyword().is_some_and(KeywordKind::is_type_specifier) {
            self.forward();
        }
    }

    fn declarator(&mut self) -> Result<(), Error> {
        while self.eat_operator(OperatorKind::Star) {}

        self.expect_identifier()?;

        while self.eat_punctuation(PunctuationKind::LeftBracket) {
            self.run(&[PunctuationKind::RightBracket])?;
            self.expect_punctuation(PunctuationKind::RightBracket)?;
        }

        Ok(())
    }

    /// Validates the optional initializer of the current declarator and the rest of the
    /// declarator list.
    fn remaining_declarators(&mut self) -> Result<(), Error> {
        self.initializer()?;

        while self.eat_punctuation(PunctuationKind::Comma) {
            self.declarator()?;
            self.initializer()?;
        }

        Ok(())
    }

    fn initializer(&mut self) -> Result<(), Error> {
        if self.eat_operator(OperatorKind::Assign) {
            self.initializer_value(&[PunctuationKind::Semicolon, PunctuationKind::Comma])
        } else {
            Ok(())
        }
    }

    fn initializer_value(&mut self, terminators: &[PunctuationKind]) -> Result<(), Error> {
        if self.peek_punctuation() != Some(PunctuationKind::LeftBrace) {
            return self.non_empty_run(terminators);
        }

        self.nested(|validator| {
            // eat the `{` punctuation
            validator.forward();

            loop {
                if validator.eat_punctuation(PunctuationKind::RightBrace) {
                    return Ok(());
                }

                validator.initializer_value(&[
                    PunctuationKind::RightBrace,
                    PunctuationKind::Comma,
                ])?;

                if !validator.eat_punctuation(PunctuationKind::Comma) {
                    return validator.expect_punctuation(PunctuationKind::RightBrace);
                }
            }
        })
    }

    fn declaration(&mut self) -> Result<StatementKind, Error> {
        self.type_specifiers();
        self.declarator()?;

        // function prototype/definition
        if self.eat_punctuation(PunctuationKind::LeftParenthesis) {
            self.run(&[PunctuationKind::RightParenthesis])?;
            self.expect_punctuation(PunctuationKind::RightParenthesis)?;

            return match self.peek_punctuation() {
                Some(PunctuationKind::LeftBrace) => {
                    self.block()?;
                    Ok(StatementKind::FunctionDefinition)
                }
                _ => {
                    self.expect_punctuation(PunctuationKind::Semicolon)?;
                    Ok(StatementKind::FunctionPrototype)
                }
            };
        }

        self.remaining_declarators()?;
        self.expect_punctuation(PunctuationKind::Semicolon)?;

        Ok(StatementKind::Declaration)
    }
}

/// Validates every statement from the current cursor position to the end of the token stream.
///
/// # Errors
/// The first grammar violation found.
pub fn validate(
    token_stream: &mut TokenStream,
    config: Config,
) -> Result<Vec<StatementKind>, Error> {
    Validator::with_config(token_stream, config).validate_program()
}

#[cfg(test)]
mod tests;
