/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Registration, login and logout
/// - `users`: Current user profile and password change
/// - `todos`: Todo CRUD, listing, export and categories
/// - `dashboard`: Aggregated views over the caller's tasks
/// - `admin`: Cross-user task management
/// - `chatbot`: Rule-based chat assistant

pub mod admin;
pub mod auth;
pub mod chatbot;
pub mod dashboard;
pub mod health;
pub mod todos;
pub mod users;
