//! Utility functions.

pub mod env;
pub mod text;

pub use text::{html_to_text, is_blank, truncate};
