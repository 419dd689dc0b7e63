//! Database models for the Pharmacy Management Platform
//!
//! Re-exports models from the shared crate; row structs specific to a
//! service live next to that service

pub use shared::models::*;
