//! Output generation for rendered result pages.
//!
//! # Submodules
//!
//! - [`html`]: Renders a `SearchPage` through the Handlebars page template
//! - [`json`]: Writes the same `SearchPage` as JSON for other consumers
//!
//! Both writers name their file after the query slug and page number, so one
//! page yields `{slug}_p{page}.html` and `{slug}_p{page}.json` side by side.

pub mod html;
pub mod json;
