//! Lookbook Core - Shared types library.
//!
//! This crate provides common types used across all Lookbook components:
//! - `studio` - Try-on orchestration, in-memory store and JSON API
//! - `cli` - Command-line try-on and image tools
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no async.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices and account types
//! - [`models`] - Entity records (profiles, items, products, folders, posts)

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod models;
pub mod types;

pub use models::*;
pub use types::*;
