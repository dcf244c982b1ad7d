pub mod api;
pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod filter;
pub mod handlers;
pub mod logging;
pub mod server;

pub use config::AppConfig;
pub use error::ApiError;
pub use server::app;
