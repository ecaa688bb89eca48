//! Validated domain types shared across the workspace.

pub mod email;
pub mod id;
pub mod role;

pub use email::{Email, EmailError};
pub use id::MemberId;
pub use role::{Role, RoleParseError};
