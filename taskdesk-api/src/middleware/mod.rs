/// Middleware modules for the API server
///
/// - `security`: response security headers
/// - `auth`: bearer/cookie authentication and the admin role gate

pub mod auth;
pub mod security;
