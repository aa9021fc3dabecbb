//! Ingress DNS Domain Layer
pub mod config;
pub mod dns_query;
pub mod dns_record;
pub mod errors;
pub mod host_rule;

pub use config::{
    CliOverrides, Config, ConfigError, DnsConfig, EnvOverrides, InventoryConfig, InventorySource,
    LogFormat, LoggingConfig, ServerConfig, WildcardMatch,
};
pub use dns_query::DnsQuery;
pub use dns_record::RecordType;
pub use errors::DomainError;
pub use host_rule::{HostPattern, HostRule};
