use std::str::FromStr;

use ccheck_base::diagnostic::Storage;
use proptest::{prelude::Arbitrary, prop_assert_eq, proptest};
use strum::IntoEnumIterator;

use super::{
    classify, classify_all, classify_each, KeywordKind, OperatorKind, PunctuationKind, Symbol,
    Token, TokenCategory, UnrecognizedToken,
};
use crate::lexeme::{
    tests::{lex_source, Source},
    Lexeme,
};

fn lexemes(texts: &[&str]) -> Vec<Lexeme> {
    texts
        .iter()
        .enumerate()
        .map(|(index, text)| Lexeme::new(*text, index, None))
        .collect()
}

#[test]
fn keyword_wins_over_identifier_shape() {
    for keyword in KeywordKind::iter() {
        assert_eq!(classify(keyword.as_str()), Some(TokenCategory::Keyword));
    }

    assert_eq!(classify("iff"), Some(TokenCategory::Identifier));
    assert_eq!(classify("_if"), Some(TokenCategory::Identifier));
}

#[test]
fn symbol_tables() {
    for operator in OperatorKind::iter() {
        assert_eq!(classify(operator.as_str()), Some(TokenCategory::Operator));
    }

    for punctuation in PunctuationKind::iter() {
        assert_eq!(
            classify(punctuation.as_str()),
            Some(TokenCategory::Punctuation)
        );
    }

    assert_eq!(Symbol::longest_prefix("<<=1"), Some(Symbol::Operator(OperatorKind::ShiftLeftAssign)));
    assert_eq!(Symbol::longest_prefix("@"), None);
}

#[test]
fn numeric_literals() {
    assert_eq!(classify("42"), Some(TokenCategory::IntegerLiteral));
    assert_eq!(classify("3.14"), Some(TokenCategory::FloatLiteral));

    for malformed in ["1.2.3", "1.", "12ab", "1_000"] {
        assert_eq!(classify(malformed), None, "`{malformed}` must not classify");
    }
}

#[test]
fn quoted_literals() {
    assert_eq!(classify("\"hello world\""), Some(TokenCategory::StringLiteral));
    assert_eq!(classify("\"\""), Some(TokenCategory::StringLiteral));
    assert_eq!(classify("'a'"), Some(TokenCategory::CharLiteral));
    assert_eq!(classify("''"), None);
}

#[test]
fn unrecognized_lexemes() {
    for text in ["@", "#", "$", "`", "é"] {
        assert_eq!(classify(text), None);
    }
}

#[test]
fn category_names() {
    for category in TokenCategory::iter() {
        assert_eq!(
            TokenCategory::from_str(&category.to_string()).unwrap(),
            category
        );
    }

    assert_eq!(TokenCategory::IntegerLiteral.to_string(), "IntegerLiteral");
    assert!(TokenCategory::from_str("Unknown").is_err());
}

#[test]
fn declaration_tokens() {
    let tokens = classify_all(lexemes(&["int", "x", ";"])).unwrap();

    let pairs = tokens
        .iter()
        .map(|token| (token.text(), token.category()))
        .collect::<Vec<_>>();

    assert_eq!(
        pairs,
        [
            ("int", TokenCategory::Keyword),
            ("x", TokenCategory::Identifier),
            (";", TokenCategory::Punctuation),
        ]
    );
    assert_eq!(tokens[0].keyword(), Some(KeywordKind::Int));
    assert_eq!(tokens[1].keyword(), None);
    assert_eq!(tokens[2].punctuation(), Some(PunctuationKind::Semicolon));
    assert_eq!(tokens[2].operator(), None);
}

#[test]
fn classify_all_stops_at_first_failure() {
    let error = classify_all(lexemes(&["x", "@", "y", "$", ";"])).unwrap_err();

    assert_eq!(error.lexeme.text(), "@");
    assert_eq!(error.lexeme.index(), 1);
    assert_eq!(error.to_string(), "found an unrecognized token `@`");
}

#[test]
fn classify_each_reports_every_failure() {
    let storage: Storage<UnrecognizedToken> = Storage::new();

    let tokens = classify_each(lexemes(&["x", "@", "y", "$", ";"]), &storage);

    assert!(tokens.is_none());
    let reported = storage
        .into_vec()
        .into_iter()
        .map(|error| error.lexeme.text().clone())
        .collect::<Vec<_>>();
    assert_eq!(reported, ["@", "$"]);
}

#[test]
fn classify_each_without_failures() {
    let storage: Storage<UnrecognizedToken> = Storage::new();

    let tokens = classify_each(lexemes(&["return", "0", ";"]), &storage).unwrap();

    assert!(storage.as_vec().is_empty());
    assert_eq!(tokens.len(), 3);
    assert_eq!(tokens[1].category(), TokenCategory::IntegerLiteral);
}

proptest! {
    #[test]
    fn token_test(
        source in Source::arbitrary()
    ) {
        let lexemes = lex_source(&source)?;
        let tokens = classify_all(lexemes.clone())?;

        prop_assert_eq!(tokens.len(), source.parts.len());
        for ((fragment, token), lexeme) in source.fragments().zip(&tokens).zip(&lexemes) {
            prop_assert_eq!(token.category(), fragment.category());
            prop_assert_eq!(token.lexeme(), lexeme);
        }
    }

    #[test]
    fn identifier_shape_test(
        text in "[A-Za-z_][A-Za-z0-9_]{0,12}"
    ) {
        let expected = if KeywordKind::from_str(&text).is_ok() {
            TokenCategory::Keyword
        } else {
            TokenCategory::Identifier
        };

        prop_assert_eq!(Token::classify(Lexeme::new(text, 0, None))?.category(), expected);
    }
}
