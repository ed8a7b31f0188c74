pub mod auth;
pub mod cart;
pub mod menu;
pub mod review;
pub mod user;
