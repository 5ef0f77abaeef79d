//! geodb - REST service for geographic entity collections
//!
//! Countries, states, counties and cities, each validated against a
//! declarative schema and served through a read-through cache over a
//! document gateway.

pub mod cache;
pub mod cli;
pub mod config;
pub mod entity;
pub mod gateway;
pub mod http_server;
pub mod logging;
pub mod schema;
pub mod service;
