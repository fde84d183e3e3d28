//! This crate implements the statement validation phase of the checker. This phase is
//! responsible for walking the classified token stream and accepting or rejecting it according
//! to the statement-level grammar.

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
pub mod validator;
