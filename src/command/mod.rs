//! Command parsing
//!
//! Turns raw client lines into typed [`Command`] values. Parsing is pure;
//! dispatch lives in the session.

mod parser;
mod types;

pub use types::{ArticlePart, ArticleSpec, Command, CommandError, ListKeyword, Selection};
