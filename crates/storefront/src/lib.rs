//! Bihar Bhojan storefront library.
//!
//! This crate provides the web server as a library, allowing the router
//! to be tested with in-memory collaborators and reused by the CLI.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;
