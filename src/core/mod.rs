//! Core interfaces and types.

pub mod input;
pub mod output;
pub mod style;
pub mod terminal;
pub mod text;
