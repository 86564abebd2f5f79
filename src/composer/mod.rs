//! Page Composer
//!
//! Merges a chain of master pages with a content page into one compiled page
//! and optionally interpolates placeholders in the result.

mod options;
mod page_composer;

pub use options::{CompositionFlags, CompositionOptions, CompositionResult};
pub use page_composer::{PageComposer, DEFAULT_CONTENT_PLACEHOLDER};
