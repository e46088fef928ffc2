pub mod settings;

pub use settings::{AuthConfig, DatabaseConfig, ServerConfig, Settings};
