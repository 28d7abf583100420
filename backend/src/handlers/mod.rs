//! HTTP handlers for the Produce Trading Platform

pub mod auth;
pub mod bot;
pub mod customer;
pub mod health;
pub mod logistics;
pub mod message;
pub mod opportunity;
pub mod pricing;
pub mod product;
pub mod reporting;
pub mod supplier;
pub mod trade_potential;

pub use auth::*;
pub use bot::*;
pub use customer::*;
pub use health::*;
pub use logistics::*;
pub use message::*;
pub use opportunity::*;
pub use pricing::*;
pub use product::*;
pub use reporting::*;
pub use supplier::*;
pub use trade_potential::*;
