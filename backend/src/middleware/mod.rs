//! Request middleware

pub mod identity;

pub use identity::{identity_middleware, CallerIdentity, CurrentUser};
