//! External API integrations

pub mod embedding;
pub mod whatsapp;

pub use embedding::EmbeddingClient;
pub use whatsapp::WhatsAppClient;
