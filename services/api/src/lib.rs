//! services/api/src/lib.rs
//!
//! The portfolio HTTP service: database adapter, health reporting, background
//! keep-alive timers and the axum router. The binaries in `src/bin` wire these together.

pub mod adapters;
pub mod config;
pub mod error;
pub mod health;
pub mod retry;
pub mod tasks;
pub mod web;
