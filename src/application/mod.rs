//! # Application Layer
//!
//! Contains the interpreter: the block scanner, the execution engine that
//! dispatches commands and assembles the transcript, and the session entry point.

pub mod engine;
pub mod logging;
pub mod parsing;
pub mod session;
