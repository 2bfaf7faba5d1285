//! # Radkit-Compatible Tools
//!
//! Tools annotated with `#[tool]` that the reader and research agents may call.

pub mod pdf_tools;
pub mod search_tools;
