#![forbid(unsafe_code)]

//! The prompt catalog.
//!
//! - [`PromptRepository`]: the immutable, ordered set of [`PromptRecord`]s,
//!   loaded once at startup from the embedded dataset or a JSON file.
//! - [`filter()`]: the category + substring search over it, with
//!   [`FilterCache`] to skip recomputation while the inputs are unchanged.
//! - [`IconMap`]: glyph for each [`Category`].

pub mod category;
pub mod error;
pub mod filter;
pub mod icon;
pub mod prompt;
pub mod repository;

pub use category::{Category, CategoryFilter};
pub use error::CatalogError;
pub use filter::{FilterCache, filter, matches};
pub use icon::{Icon, IconMap};
pub use prompt::PromptRecord;
pub use repository::PromptRepository;
