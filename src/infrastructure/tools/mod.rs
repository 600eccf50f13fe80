//! # Tools Module
//!
//! In-process handlers for shell, filesystem and review commands.

pub mod executor;
