//! # Strings Module
//!
//! Centralizes transcript messages, log wording, and the input page.
//! Ensures consistency in messaging and easier updates.

pub mod logs;
pub mod messages;
pub mod templates;
