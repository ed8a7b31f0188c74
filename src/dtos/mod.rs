pub mod auth;
pub mod cart;
pub mod document;
pub mod user;
