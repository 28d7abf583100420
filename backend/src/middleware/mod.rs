//! Middleware for the Produce Trading Platform

pub mod auth;

pub use auth::{auth_middleware, AuthUser, CurrentUser};
