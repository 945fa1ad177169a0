/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Greeting and health check endpoints
/// - `tasks`: Task CRUD endpoints
/// - `auth`: Signup, signin, refresh and profile endpoints
/// - `photos`: Profile photo upload

pub mod auth;
pub mod health;
pub mod photos;
pub mod tasks;
