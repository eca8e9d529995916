pub mod email;
pub mod jwt;
