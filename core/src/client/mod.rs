pub mod api;
pub mod config;

pub use api::ApiClient;
pub use config::ClientConfig;
