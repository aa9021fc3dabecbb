use async_trait::async_trait;
use hickory_proto::rr::Record;
use ingress_dns_domain::DomainError;

#[async_trait]
pub trait FallbackResolver: Send + Sync {
    /// Resolve the A records for `name` (no trailing dot) upstream and
    /// return the answer section unchanged, in upstream order.
    async fn resolve(&self, name: &str) -> Result<Vec<Record>, DomainError>;
}
