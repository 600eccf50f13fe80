//! # Domain Layer
//!
//! Core definitions, types, and traits shared by the interpreter and its executors.
//! Independent of the HTTP surface and of git, serving as the contract for other layers.

pub mod config;
pub mod error;
pub mod markers;
pub mod traits;
pub mod types;
