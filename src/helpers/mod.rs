//! Helper functions for page rendering
//!
//! URL building, HTML escaping and date formatting shared by the
//! generator and the template context.

mod date;
pub mod html;
mod url;

pub use date::*;
pub use html::*;
pub use url::*;
