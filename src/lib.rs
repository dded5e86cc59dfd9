pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod demo;
pub mod error;
pub mod filter;
pub mod guard;
pub mod mutation;
pub mod polls;
pub mod render;
pub mod routes;
pub mod session;
pub mod view;
