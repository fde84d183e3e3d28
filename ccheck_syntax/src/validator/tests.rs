use std::{fmt::Display, str::FromStr};

use ccheck_base::source_file::SourceFile;
use ccheck_lexical::{
    lexeme,
    token::{classify_all, KeywordKind, PunctuationKind},
    token_stream::TokenStream,
};
use ccheck_test::input::Input;
use proptest::{
    prelude::Arbitrary,
    prop_assert_eq, prop_oneof, proptest,
    strategy::{BoxedStrategy, Just, Strategy},
    test_runner::{TestCaseError, TestCaseResult},
};

use super::{validate, Config, StatementKind, Validator};
use crate::error::{Error, SyntaxKind};

fn token_stream(text: &str) -> TokenStream {
    let source_file = SourceFile::from_text("test.c", text);
    classify_all(lexeme::lex(&source_file).unwrap())
        .unwrap()
        .into_iter()
        .collect()
}

fn validate_text(text: &str) -> Result<Vec<StatementKind>, Error> {
    validate(&mut token_stream(text), Config::default())
}

fn expect_violation(text: &str, expected: SyntaxKind, found: Option<&str>, position: usize) {
    let error = validate_text(text).unwrap_err();
    let error = error
        .as_unexpected_syntax()
        .unwrap_or_else(|| panic!("`{text}`: expected an unexpected syntax error, got {error:?}"));

    assert_eq!(error.expected, expected, "`{text}`");
    assert_eq!(
        error.found.as_ref().map(|token| token.text()),
        found,
        "`{text}`"
    );
    assert_eq!(error.position, position, "`{text}`");
}

#[test]
fn declaration() {
    assert_eq!(validate_text("int x;").unwrap(), [StatementKind::Declaration]);
    assert_eq!(
        validate_text("unsigned long *p, a[10][n + 1] = 0, **q = &p;").unwrap(),
        [StatementKind::Declaration]
    );
    assert_eq!(
        validate_text("int primes[] = { 2, 3, { 5, 7 }, };").unwrap(),
        [StatementKind::Declaration]
    );
}

#[test]
fn functions() {
    assert_eq!(
        validate_text("int add(int a, int b);\nint main(void) { return add(1, 2); }").unwrap(),
        [
            StatementKind::FunctionPrototype,
            StatementKind::FunctionDefinition
        ]
    );
}

#[test]
fn conditional_with_nested_block() {
    assert_eq!(
        validate_text("if (x) { y; }").unwrap(),
        [StatementKind::Conditional]
    );

    let mut stream = token_stream("if (x) { y; }");
    let mut validator = Validator::new(&mut stream);
    assert_eq!(
        validator.validate_statement().unwrap(),
        StatementKind::Conditional
    );
    assert!(stream.is_end());
}

#[test]
fn dangling_else_binds_to_the_nearest_if() {
    assert_eq!(
        validate_text("if (a) if (b) x; else y; z;").unwrap(),
        [StatementKind::Conditional, StatementKind::Expression]
    );
}

#[test]
fn loops() {
    assert_eq!(
        validate_text(
            "while (i < n) i++;\n\
             do { i--; } while (i > 0);\n\
             for (int i = 0, j = 1; i < n; i++, j *= 2) sum += a[i];\n\
             for (;;) break;"
        )
        .unwrap(),
        [
            StatementKind::While,
            StatementKind::DoWhile,
            StatementKind::For,
            StatementKind::For
        ]
    );
}

#[test]
fn simple_statements() {
    assert_eq!(
        validate_text("return; return (a + b) * c; break; continue; ; f(x, g(y)); {}").unwrap(),
        [
            StatementKind::Return,
            StatementKind::Return,
            StatementKind::Break,
            StatementKind::Continue,
            StatementKind::Empty,
            StatementKind::Expression,
            StatementKind::Block
        ]
    );
    assert_eq!(
        validate_text("sizeof(int);").unwrap(),
        [StatementKind::Expression]
    );
}

#[test]
fn empty_program() {
    assert!(validate_text("").unwrap().is_empty());
    assert!(validate_text("  // nothing here\n/* at all */")
        .unwrap()
        .is_empty());
}

#[test]
fn missing_semicolon_at_end_of_stream() {
    expect_violation(
        "int x",
        SyntaxKind::Punctuation(PunctuationKind::Semicolon),
        None,
        2,
    );
}

#[test]
fn misplaced_tokens() {
    expect_violation("else x;", SyntaxKind::Statement, Some("else"), 0);
    expect_violation("x; }", SyntaxKind::Statement, Some("}"), 2);
    expect_violation(
        "{ x;",
        SyntaxKind::Punctuation(PunctuationKind::RightBrace),
        None,
        3,
    );
    expect_violation(
        "x = { 1 };",
        SyntaxKind::Punctuation(PunctuationKind::Semicolon),
        Some("{"),
        2,
    );
    expect_violation(
        "x = y }",
        SyntaxKind::Punctuation(PunctuationKind::Semicolon),
        Some("}"),
        3,
    );
}

#[test]
fn unbalanced_runs() {
    expect_violation(
        "f(a;",
        SyntaxKind::Punctuation(PunctuationKind::RightParenthesis),
        Some(";"),
        3,
    );
    expect_violation(
        "a[1);",
        SyntaxKind::Punctuation(PunctuationKind::RightBracket),
        Some(")"),
        3,
    );
    expect_violation(
        "x);",
        SyntaxKind::Punctuation(PunctuationKind::Semicolon),
        Some(")"),
        1,
    );
}

#[test]
fn conditions() {
    expect_violation("if () x;", SyntaxKind::Expression, Some(")"), 2);
    expect_violation(
        "if x;",
        SyntaxKind::Punctuation(PunctuationKind::LeftParenthesis),
        Some("x"),
        1,
    );
    expect_violation(
        "while (x if) y;",
        SyntaxKind::Punctuation(PunctuationKind::RightParenthesis),
        Some("if"),
        3,
    );
    expect_violation(
        "do x; (y);",
        SyntaxKind::Keyword(KeywordKind::While),
        Some("("),
        3,
    );
}

#[test]
fn declarators() {
    expect_violation("int;", SyntaxKind::Identifier, Some(";"), 1);
    expect_violation("int 5;", SyntaxKind::Identifier, Some("5"), 1);
    expect_violation("int x = ;", SyntaxKind::Expression, Some(";"), 3);
    expect_violation(
        "int f(void) return 0;",
        SyntaxKind::Punctuation(PunctuationKind::Semicolon),
        Some("return"),
        5,
    );
}

#[test]
fn nesting_bound() {
    let config = Config { max_depth: 3 };

    assert!(validate(&mut token_stream("{ { x; } }"), config).is_ok());

    let error = validate(&mut token_stream("{ { { x; } } }"), config).unwrap_err();
    let error = error.as_nesting_too_deep().unwrap();
    assert_eq!(error.max_depth, 3);
    assert_eq!(error.position, 3);
    assert_eq!(error.found.as_ref().map(|token| token.text()), Some("x"));

    let deep = format!("{}x;{}", "{".repeat(10_000), "}".repeat(10_000));
    assert!(validate_text(&deep).unwrap_err().is_nesting_too_deep());
}

#[test]
fn error_messages() {
    let error = validate_text("int x").unwrap_err();
    let message = error.to_string();

    assert!(message.contains("expected `;`"), "{message}");
    assert!(message.contains("the end of the token stream"), "{message}");
    assert_eq!(error.location(), None);

    let error = validate_text("int x\ny;").unwrap_err();
    assert!(error.to_string().contains("found `y`"));
    assert_eq!(error.location().map(|location| location.line), Some(2));
}

#[test]
fn revalidation_after_reset() {
    for text in ["int x; if (x) { y; }", "int x"] {
        let mut stream = token_stream(text);

        let first = validate(&mut stream, Config::default());
        stream.reset();
        let second = validate(&mut stream, Config::default());

        assert_eq!(first, second);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Identifier(String);

impl Arbitrary for Identifier {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        "[a-z_][a-z0-9_]{0,6}"
            .prop_filter_map("filter out identifiers that are keywords", |x| {
                KeywordKind::from_str(&x).is_err().then_some(Self(x))
            })
            .boxed()
    }
}

impl Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { f.write_str(&self.0) }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Expression {
    Identifier(Identifier),
    Integer(u32),
    Binary(Box<Expression>, &'static str, Box<Expression>),
    Parenthesized(Box<Expression>),
    Call(Identifier, Vec<Expression>),
    Index(Identifier, Box<Expression>),
}

impl Arbitrary for Expression {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        let leaf = prop_oneof![
            Identifier::arbitrary().prop_map(Self::Identifier),
            proptest::num::u32::ANY.prop_map(Self::Integer),
        ];

        leaf.prop_recursive(4, 16, 3, |inner| {
            prop_oneof![
                (
                    inner.clone(),
                    proptest::sample::select(vec!["+", "-", "*", "/", "==", "&&", "=", "<<="]),
                    inner.clone()
                )
                    .prop_map(|(left, operator, right)| Self::Binary(
                        Box::new(left),
                        operator,
                        Box::new(right)
                    )),
                inner
                    .clone()
                    .prop_map(|inner| Self::Parenthesized(Box::new(inner))),
                (
                    Identifier::arbitrary(),
                    proptest::collection::vec(inner.clone(), 0..3)
                )
                    .prop_map(|(function, arguments)| Self::Call(function, arguments)),
                (Identifier::arbitrary(), inner)
                    .prop_map(|(array, index)| Self::Index(array, Box::new(index))),
            ]
        })
        .boxed()
    }
}

impl Display for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Identifier(identifier) => identifier.fmt(f),
            Self::Integer(integer) => write!(f, "{integer}"),
            Self::Binary(left, operator, right) => write!(f, "{left} {operator} {right}"),
            Self::Parenthesized(inner) => write!(f, "({inner})"),
            Self::Call(function, arguments) => {
                write!(f, "{function}(")?;

                for (index, argument) in arguments.iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }

                    write!(f, "{argument}")?;
                }

                write!(f, ")")
            }
            Self::Index(array, index) => write!(f, "{array}[{index}]"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Statement {
    Declaration(&'static str, Vec<(Identifier, Option<Expression>)>),
    Expression(Expression),
    Empty,
    Block(Vec<Statement>),
    Conditional(Expression, Box<Statement>, Option<Box<Statement>>),
    While(Expression, Box<Statement>),
    DoWhile(Box<Statement>, Expression),
    For(Option<Expression>, Option<Expression>, Box<Statement>),
    Return(Option<Expression>),
    Break,
    Continue,
}

impl Statement {
    fn kind(&self) -> StatementKind {
        match self {
            Self::Declaration(..) => StatementKind::Declaration,
            Self::Expression(..) => StatementKind::Expression,
            Self::Empty => StatementKind::Empty,
            Self::Block(..) => StatementKind::Block,
            Self::Conditional(..) => StatementKind::Conditional,
            Self::While(..) => StatementKind::While,
            Self::DoWhile(..) => StatementKind::DoWhile,
            Self::For(..) => StatementKind::For,
            Self::Return(..) => StatementKind::Return,
            Self::Break => StatementKind::Break,
            Self::Continue => StatementKind::Continue,
        }
    }
}

impl Input<&StatementKind> for &Statement {
    fn assert(self, output: &StatementKind) -> TestCaseResult {
        prop_assert_eq!(self.kind(), *output);
        Ok(())
    }
}

impl Arbitrary for Statement {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        let leaf = prop_oneof![
            (
                proptest::sample::select(vec!["int", "float", "char", "unsigned long", "const int"]),
                proptest::collection::vec(
                    (
                        Identifier::arbitrary(),
                        proptest::option::of(Expression::arbitrary())
                    ),
                    1..4
                )
            )
                .prop_map(|(ty, declarators)| Self::Declaration(ty, declarators)),
            Expression::arbitrary().prop_map(Self::Expression),
            proptest::option::of(Expression::arbitrary()).prop_map(Self::Return),
            Just(Self::Empty),
            Just(Self::Break),
            Just(Self::Continue),
        ];

        leaf.prop_recursive(
            16, // levels deep
            64, // max size
            4,
            |inner| {
                prop_oneof![
                    proptest::collection::vec(inner.clone(), 0..4).prop_map(Self::Block),
                    (
                        Expression::arbitrary(),
                        inner.clone(),
                        proptest::option::of(inner.clone())
                    )
                        .prop_map(|(condition, then, otherwise)| Self::Conditional(
                            condition,
                            Box::new(then),
                            otherwise.map(Box::new)
                        )),
                    (Expression::arbitrary(), inner.clone())
                        .prop_map(|(condition, body)| Self::While(condition, Box::new(body))),
                    (inner.clone(), Expression::arbitrary())
                        .prop_map(|(body, condition)| Self::DoWhile(Box::new(body), condition)),
                    (
                        proptest::option::of(Expression::arbitrary()),
                        proptest::option::of(Expression::arbitrary()),
                        inner
                    )
                        .prop_map(|(condition, step, body)| Self::For(
                            condition,
                            step,
                            Box::new(body)
                        )),
                ]
            },
        )
        .boxed()
    }
}

impl Display for Statement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Declaration(ty, declarators) => {
                write!(f, "{ty} ")?;

                for (index, (identifier, value)) in declarators.iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }

                    write!(f, "{identifier}")?;

                    if let Some(value) = value {
                        write!(f, " = {value}")?;
                    }
                }

                write!(f, ";")
            }
            Self::Expression(expression) => write!(f, "{expression};"),
            Self::Empty => write!(f, ";"),
            Self::Block(statements) => {
                write!(f, "{{")?;

                for statement in statements {
                    write!(f, " {statement}")?;
                }

                write!(f, " }}")
            }
            Self::Conditional(condition, then, otherwise) => {
                write!(f, "if ({condition}) {then}")?;

                if let Some(otherwise) = otherwise {
                    write!(f, " else {otherwise}")?;
                }

                Ok(())
            }
            Self::While(condition, body) => write!(f, "while ({condition}) {body}"),
            Self::DoWhile(body, condition) => write!(f, "do {body} while ({condition});"),
            Self::For(condition, step, body) => {
                write!(f, "for (int i = 0; ")?;

                if let Some(condition) = condition {
                    write!(f, "{condition}")?;
                }

                write!(f, "; ")?;

                if let Some(step) = step {
                    write!(f, "{step}")?;
                }

                write!(f, ") {body}")
            }
            Self::Return(value) => match value {
                Some(value) => write!(f, "return {value};"),
                None => write!(f, "return;"),
            },
            Self::Break => write!(f, "break;"),
            Self::Continue => write!(f, "continue;"),
        }
    }
}

fn validate_source(source: impl Display) -> Result<Vec<StatementKind>, TestCaseError> {
    let source_file = SourceFile::temp(source)?;
    let tokens = classify_all(
        lexeme::lex(&source_file).map_err(|error| TestCaseError::fail(format!("{error:?}")))?,
    )
    .map_err(|error| TestCaseError::fail(error.to_string()))?;

    validate(&mut TokenStream::new(tokens), Config::default())
        .map_err(|error| TestCaseError::fail(error.to_string()))
}

proptest! {
    #![
        proptest_config(
            proptest::test_runner::Config {
                max_shrink_iters: 4096,
                ..proptest::test_runner::Config::default()
            }
        )
    ]
    #[test]
    fn statement_test(
        statement_input in Statement::arbitrary()
    ) {
        let statements = validate_source(&statement_input)?;

        prop_assert_eq!(statements.len(), 1);
        statement_input.assert(&statements[0])?;
    }

    #[test]
    fn program_test(
        program_input in proptest::collection::vec(Statement::arbitrary(), 0..8)
    ) {
        let source = program_input
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n");

        let statements = validate_source(source)?;

        program_input.assert(&statements)?;
    }
}
