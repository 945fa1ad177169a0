/// Middleware modules for the API server
///
/// - `security`: security response headers
///
/// JWT authentication is applied per route in [`crate::app`].

pub mod security;
