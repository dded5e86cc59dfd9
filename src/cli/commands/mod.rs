pub mod auth;
pub mod demo;
pub mod mutate;
pub mod view;
