//! # Documents
//!
//! PDF discovery, text extraction and passage search.

pub mod discovery;
pub mod pdf;

pub use discovery::discover_pdfs;
pub use pdf::{DocumentStore, Passage, PdfDocument};
