//! TyphoonX Core - Shared types library.
//!
//! This crate provides common types used across the TyphoonX components:
//! - `admin` - Merchant administration console
//! - `functions` - Platform functions owned by this repo (signup)
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. This keeps
//! it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Email validation, newtype IDs, and merchant records

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
