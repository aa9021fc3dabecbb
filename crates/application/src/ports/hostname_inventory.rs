use async_trait::async_trait;
use ingress_dns_domain::{DomainError, HostRule};

/// Supplies the hostnames currently exposed by the routing layer.
///
/// Implementations are called once per resolved question and must not cache
/// between calls; every listing reflects the inventory at call time.
#[async_trait]
pub trait HostnameInventory: Send + Sync {
    async fn list_hostnames(&self) -> Result<Vec<HostRule>, DomainError>;

    /// Short label used in log output.
    fn source_name(&self) -> &'static str;
}
