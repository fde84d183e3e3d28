//! This crate implements the lexical analysis phase of the checker. This phase is responsible for
//! splitting the source code into lexemes, classifying every lexeme into a token category, and
//! packing the classified tokens into a [`token_stream::TokenStream`] for the statement
//! validator.
//!
//! The [`exchange`] module provides the textual token dump format that lets the two phases run
//! in separate processes.

#![deny(
    missing_debug_implementations,
    missing_copy_implementations,
    missing_docs,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    clippy::missing_errors_doc
)]
#![allow(clippy::missing_panics_doc, clippy::missing_const_for_fn)]

pub mod error;
pub mod exchange;
pub mod lexeme;
pub mod token;
pub mod token_stream;
