use anyhow::Context;
use ingress_dns_application::ports::{FallbackResolver, HostnameInventory};
use ingress_dns_application::services::HostMatcher;
use ingress_dns_application::use_cases::{DispatchRequestUseCase, ResolveQueryUseCase};
use ingress_dns_domain::{Config, InventorySource};
use ingress_dns_infrastructure::dns::{DnsServerHandler, UpstreamFallbackResolver};
use ingress_dns_infrastructure::inventory::{KubernetesIngressInventory, StaticHostnameInventory};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

pub struct DnsServices {
    pub handler: DnsServerHandler,
}

impl DnsServices {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let ingress_ip = config
            .dns
            .ingress_ip
            .context("dns.ingress_ip must be set")?;

        let inventory = Self::build_inventory(config)?;
        let matcher = HostMatcher::new(config.dns.wildcard_match);

        let mut resolver = ResolveQueryUseCase::new(inventory, matcher, ingress_ip)
            .with_answer_ttl(config.dns.answer_ttl);

        if let Some(fallback) = Self::build_fallback(config)? {
            resolver = resolver.with_fallback(fallback);
        }

        let dispatcher = DispatchRequestUseCase::new(Arc::new(resolver))
            .with_query_timeout(Duration::from_millis(config.dns.query_timeout));

        info!(ingress_ip = %ingress_ip, "DNS services initialized");

        Ok(Self {
            handler: DnsServerHandler::new(Arc::new(dispatcher)),
        })
    }

    fn build_inventory(config: &Config) -> anyhow::Result<Arc<dyn HostnameInventory>> {
        let inventory: Arc<dyn HostnameInventory> = match config.inventory.source {
            InventorySource::Kubernetes => {
                let inventory = KubernetesIngressInventory::from_config(&config.inventory)
                    .context("Failed to configure Kubernetes inventory")?;
                info!(api_server = inventory.api_server(), "Using Kubernetes ingress inventory");
                Arc::new(inventory)
            }
            InventorySource::Static => {
                let inventory = StaticHostnameInventory::new(&config.inventory.static_hosts);
                info!(hosts = inventory.len(), "Using static hostname inventory");
                Arc::new(inventory)
            }
        };
        Ok(inventory)
    }

    fn build_fallback(config: &Config) -> anyhow::Result<Option<Arc<dyn FallbackResolver>>> {
        if !config.dns.fallback_enabled {
            info!("Fallback resolution disabled");
            return Ok(None);
        }

        let server = config.fallback_address()?;
        let timeout = Duration::from_millis(config.dns.fallback_timeout);
        info!(server = %server, timeout_ms = config.dns.fallback_timeout, "Fallback resolver configured");

        Ok(Some(Arc::new(UpstreamFallbackResolver::new(server, timeout))))
    }
}
