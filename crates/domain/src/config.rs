pub mod dynamic;
pub mod errors;
pub mod fallback;
pub mod logging;
pub mod root;
pub mod server;

pub use dynamic::DynamicConfig;
pub use errors::ConfigError;
pub use fallback::FallbackConfig;
pub use logging::LoggingConfig;
pub use root::{CliOverrides, Config};
pub use server::ServerConfig;
