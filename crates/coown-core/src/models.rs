//! Domain models for the co-ownership platform.
//!
//! These are the core types shared across all crates.

pub mod kyc;
pub mod signature;
pub mod template;
