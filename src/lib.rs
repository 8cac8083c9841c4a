//! PocketCSV: a bookmark popup that keeps its collection in a key-value
//! store and moves it in and out as semicolon-delimited CSV.
//!
//! This library crate exposes all modules for use by the RPC binary and
//! integration tests.

pub mod app;
pub mod database;
pub mod managers;
pub mod platform;
pub mod rpc_handler;
pub mod services;
pub mod types;
