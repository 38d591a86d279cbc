//! Clients for the hosted platform.
//!
//! - [`auth`] - Auth gateway: password sign-in, sign-out, signup function
//! - [`directory`] - Merchant directory: authorized list/create calls

pub mod auth;
pub mod directory;
