//! Flock Core - Shared types library.
//!
//! This crate provides common types used across all Flock components:
//! - `client` - API client (session, directory, attendance)
//! - `cli` - Command-line front end
//!
//! # Architecture
//!
//! The core crate contains only types and pure normalization rules - no I/O,
//! no HTTP clients. This keeps it lightweight and allows it to be used
//! anywhere.
//!
//! # Modules
//!
//! - [`normalize`] - Ordered field-alias resolution for loosely-shaped
//!   backend payloads
//! - [`types`] - Domain types (`Role`, `User`, `Member`)

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod normalize;
pub mod types;

pub use types::*;
