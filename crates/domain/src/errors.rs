use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum DomainError {
    #[error("Invalid domain name: {0}")]
    InvalidDomainName(String),

    #[error("Invalid DNS response: {0}")]
    InvalidDnsResponse(String),

    #[error("Hostname inventory unavailable: {0}")]
    InventoryUnavailable(String),

    #[error("Fallback resolution failed: {0}")]
    FallbackFailed(String),

    #[error("Query timeout")]
    QueryTimeout,

    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}
