//! Loading, storing and caching navigation templates
//!
//! Templates are looked up by organisation within one deployment
//! environment. A [`TemplateSource`] owns persistence; the
//! [`TemplateCache`] holds the published `Arc<MenuStructure>` per
//! [`TemplateKey`] and swaps it as a whole, so readers never observe a
//! half-updated tree.

mod cache;
mod source;

pub use cache::{TemplateCache, TemplateKey};
pub use source::{FileTemplateSource, InMemoryTemplateSource, TemplateSource, TEMPLATE_FILE_NAME};
