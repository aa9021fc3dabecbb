mod fallback_resolver;
mod hostname_inventory;

pub use fallback_resolver::FallbackResolver;
pub use hostname_inventory::HostnameInventory;

// Re-export for convenience
pub use ingress_dns_domain::{DnsQuery, HostRule};
