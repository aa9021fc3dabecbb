use async_trait::async_trait;
use ingress_dns_application::ports::HostnameInventory;
use ingress_dns_domain::{DomainError, HostRule};
use std::sync::Arc;

/// Fixed hostname list taken from configuration.
pub struct StaticHostnameInventory {
    rules: Arc<[HostRule]>,
}

impl StaticHostnameInventory {
    pub fn new<I, S>(hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let rules = hosts
            .into_iter()
            .map(|host| host.as_ref().trim().to_string())
            .filter(|host| !host.is_empty())
            .map(|host| HostRule::new(host).with_source("static"))
            .collect();
        Self { rules }
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[async_trait]
impl HostnameInventory for StaticHostnameInventory {
    async fn list_hostnames(&self) -> Result<Vec<HostRule>, DomainError> {
        Ok(self.rules.to_vec())
    }

    fn source_name(&self) -> &'static str {
        "static"
    }
}
