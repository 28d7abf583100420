//! Business logic services for the Produce Trading Platform

pub mod auth;
pub mod bot;
pub mod customer;
pub mod logistics;
pub mod message;
pub mod opportunity;
pub mod pricing;
pub mod product;
pub mod reporting;
pub mod supplier;
pub mod trade_potential;

pub use auth::AuthService;
pub use bot::BotService;
pub use customer::CustomerService;
pub use logistics::LogisticsService;
pub use message::MessageService;
pub use opportunity::OpportunityService;
pub use pricing::PricingService;
pub use product::ProductService;
pub use reporting::ReportingService;
pub use supplier::SupplierService;
pub use trade_potential::TradePotentialService;
