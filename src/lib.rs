//! Newsroom - Environment-adaptive data access for articles and events
//!
//! This crate lets a content site read and manage its articles and events
//! whether it is served statically (hosted backend only) or next to the
//! local HTTP gateway, and implements that gateway over flat JSON files.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
