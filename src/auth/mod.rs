//! Credential issuance and verification, and the admin role lookup.

pub mod jwt;
pub mod roles;

pub use jwt::{Claims, TokenService};
