//! Domain models for the roster API.
//!
//! These types represent validated domain objects separate from database
//! row types.

pub mod member;

pub use member::{CurrentMember, Member};
