//! Business logic services for the roster API.

pub mod auth;
pub mod avatar;
