pub mod dns;
pub mod env;
pub mod errors;
pub mod inventory;
pub mod logging;
pub mod root;
pub mod server;

pub use dns::{DnsConfig, WildcardMatch};
pub use env::EnvOverrides;
pub use errors::ConfigError;
pub use inventory::{InventoryConfig, InventorySource};
pub use logging::{LogFormat, LoggingConfig};
pub use root::{CliOverrides, Config};
pub use server::ServerConfig;
