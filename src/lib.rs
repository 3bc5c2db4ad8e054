//! Family records service
//!
//! A GraphQL API over parent and child records. Inbound adapters (GraphQL,
//! HTTP) talk to the family service through [ports]; storage is reached
//! through the repository ports, with an in-memory adapter provided.

pub mod api;
pub mod app;
pub mod config;
pub mod context;
pub mod domain;
pub mod graphql;
pub mod identifier;
pub mod ports;
pub mod repository;
pub mod services;

pub use app::{AppState, build_app};
pub use config::Config;
