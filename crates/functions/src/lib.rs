//! TyphoonX signup service library.
//!
//! The one platform function this repository owns: account creation
//! through the platform's admin identity API. Everything else the console
//! talks to (merchant list/manage) is operated by the platform.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod identity;
pub mod signup;
