use std::{fs, path::Path, process::ExitCode};

use ccheck_lexical::exchange;

use super::{run, Argument};

fn write_source(directory: &Path, text: &str) -> Argument {
    let path = directory.join("main.c");
    fs::write(&path, text).unwrap();

    Argument::new(path)
}

#[test]
fn default_tokens_path() {
    let argument = Argument::new("dir/main.c");
    assert_eq!(argument.tokens_path(), Path::new("dir/main.c.tokens"));

    let argument = Argument {
        tokens: Some("out.tokens".into()),
        ..argument
    };
    assert_eq!(argument.tokens_path(), Path::new("out.tokens"));
}

#[test]
fn valid_program() {
    let directory = tempfile::tempdir().unwrap();
    let argument = write_source(
        directory.path(),
        "int main(void) {\n    int x = 1;\n    if (x) { x++; }\n    return x;\n}\n",
    );

    assert_eq!(run(&argument), ExitCode::SUCCESS);

    let dump = fs::read_to_string(argument.tokens_path()).unwrap();
    let tokens = exchange::deserialize(&dump).unwrap();

    assert_eq!(tokens.first().map(|token| token.text()), Some("int"));
    assert_eq!(tokens.last().map(|token| token.text()), Some("}"));
    assert!(dump.starts_with("int Keyword 1:1\nmain Identifier 1:5\n"));
}

#[test]
fn custom_tokens_path() {
    let directory = tempfile::tempdir().unwrap();
    let tokens_path = directory.path().join("dump.txt");
    let argument = Argument {
        tokens: Some(tokens_path.clone()),
        ..write_source(directory.path(), "int x;")
    };

    assert_eq!(run(&argument), ExitCode::SUCCESS);
    assert_eq!(
        fs::read_to_string(tokens_path).unwrap(),
        "int Keyword 1:1\nx Identifier 1:5\n; Punctuation 1:6\n"
    );
}

#[test]
fn grammar_violation() {
    let directory = tempfile::tempdir().unwrap();
    let argument = write_source(directory.path(), "int x");

    assert_eq!(run(&argument), ExitCode::FAILURE);
}

#[test]
fn nesting_bound_from_arguments() {
    let directory = tempfile::tempdir().unwrap();
    let argument = write_source(directory.path(), "{ { { x; } } }");

    assert_eq!(run(&argument), ExitCode::SUCCESS);
    assert_eq!(
        run(&Argument {
            max_depth: 2,
            ..argument
        }),
        ExitCode::FAILURE
    );
}

#[test]
fn unrecognized_lexemes() {
    let directory = tempfile::tempdir().unwrap();
    let argument = write_source(directory.path(), "x @ y;\nz $;");

    assert_eq!(run(&argument), ExitCode::FAILURE);
    assert_eq!(
        run(&Argument {
            report_all: true,
            ..argument.clone()
        }),
        ExitCode::FAILURE
    );

    // classification fails before any dump is written
    assert!(!argument.tokens_path().exists());
}

#[test]
fn lexical_error() {
    let directory = tempfile::tempdir().unwrap();
    let argument = write_source(directory.path(), "char *s = \"unterminated;\n");

    assert_eq!(run(&argument), ExitCode::FAILURE);
}

#[test]
fn missing_file() {
    let directory = tempfile::tempdir().unwrap();

    assert_eq!(
        run(&Argument::new(directory.path().join("missing.c"))),
        ExitCode::FAILURE
    );
}

#[test]
fn empty_file() {
    let directory = tempfile::tempdir().unwrap();
    let argument = write_source(directory.path(), "");

    assert_eq!(run(&argument), ExitCode::SUCCESS);
    assert_eq!(fs::read_to_string(argument.tokens_path()).unwrap(), "");
}
