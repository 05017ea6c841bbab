pub mod airtable;
pub mod chat;
pub mod config;
pub mod context;
pub mod error;
pub mod fallback;
pub mod models;
pub mod openai;
pub mod price;
pub mod record;
pub mod schema;
pub mod server;
pub mod tiers;

pub use config::AppConfig;
pub use error::{Error, Result};
pub use server::run_server;
