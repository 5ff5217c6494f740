pub mod admin;
pub mod auth;
pub mod campaign;
pub mod charity;
pub mod health;
pub mod news;
pub mod user;
pub mod vote;
