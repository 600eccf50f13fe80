//! # Templates
//!
//! Exposes the HTML pages from the `templates/` directory.

pub const INDEX_PAGE: &str = include_str!("../../templates/index.html");
