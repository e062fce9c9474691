//! Core domain types and errors for the warden workspace.
//!
//! This crate establishes the foundational data structures and error handling
//! used throughout the workspace:
//!
//! - **`errors`**: the primary `Error` enum and `Result` alias, centralizing
//!   the failure modes of policy compilation and authorizer construction.
//! - **`types`**: the records flowing through the resolution layer (raw
//!   policies, identities, roles) and the trait seams to the external rule
//!   compiler, authorizer constructor, and authorizer evaluation primitives.

pub mod errors;
pub mod types;

pub use self::{
    errors::{BoxedError, Error, Result},
    types::*,
};
