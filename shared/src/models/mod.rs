//! Domain models for the Produce Trading Platform

mod customer;
mod logistics;
mod opportunity;
mod pricing;
mod product;
mod supplier;
mod task;
mod trade_potential;
mod user;

pub use customer::*;
pub use logistics::*;
pub use opportunity::*;
pub use pricing::*;
pub use product::*;
pub use supplier::*;
pub use task::*;
pub use trade_potential::*;
pub use user::*;
