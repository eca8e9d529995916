pub mod auth;

pub use auth::{require_role, AuthUser};
