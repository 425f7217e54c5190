//! # TaskDesk Shared Library
//!
//! Domain types, persistence and business logic used by the TaskDesk API
//! server.
//!
//! ## Module Organization
//!
//! - `db`: SQLite connection pool and embedded migrations
//! - `models`: Users, tasks and categories with their queries
//! - `auth`: Password hashing, JWT, request authentication and RBAC
//! - `listing`: Filter, sort and pagination parameters for task lists
//! - `export`: CSV and JSON task export
//! - `dashboard`: Aggregate statistics over a user's tasks
//! - `chatbot`: Rule-based natural-language task assistant

pub mod auth;
pub mod chatbot;
pub mod dashboard;
pub mod db;
pub mod export;
pub mod listing;
pub mod models;

/// Current version of the TaskDesk shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
