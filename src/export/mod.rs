//! Rendering of fetched review comments.
//!
//! The core hands over an ordered comment batch plus the resolved pull
//! request reference; this module turns them into text. The built-in
//! Markdown layout is the default; a user-supplied Jinja2 template can
//! replace it.

pub mod markdown;
pub mod model;
pub mod template;

pub use markdown::write_markdown;
pub use model::{ExportDocument, ExportedComment};
pub use template::write_template;
