//! # Infrastructure Layer
//!
//! Handles interactions with the machine and the outside world.
//! Implements the traits defined in the Domain layer (e.g., ReviewGateway).

pub mod git;
pub mod http;
pub mod tools;
