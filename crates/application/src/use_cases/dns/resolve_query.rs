use crate::ports::{FallbackResolver, HostnameInventory};
use crate::services::HostMatcher;
use hickory_proto::rr::rdata::A;
use hickory_proto::rr::{Name, RData, Record};
use ingress_dns_domain::DnsQuery;
use std::net::Ipv4Addr;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, warn};

const DEFAULT_ANSWER_TTL: u32 = 3600;

/// Resolves a single question against the hostname inventory, delegating to
/// the fallback resolver when no rule covers the name.
pub struct ResolveQueryUseCase {
    inventory: Arc<dyn HostnameInventory>,
    matcher: HostMatcher,
    fallback: Option<Arc<dyn FallbackResolver>>,
    ingress_ip: Ipv4Addr,
    answer_ttl: u32,
}

impl ResolveQueryUseCase {
    pub fn new(
        inventory: Arc<dyn HostnameInventory>,
        matcher: HostMatcher,
        ingress_ip: Ipv4Addr,
    ) -> Self {
        Self {
            inventory,
            matcher,
            fallback: None,
            ingress_ip,
            answer_ttl: DEFAULT_ANSWER_TTL,
        }
    }

    pub fn with_fallback(mut self, fallback: Arc<dyn FallbackResolver>) -> Self {
        self.fallback = Some(fallback);
        self
    }

    pub fn with_answer_ttl(mut self, answer_ttl: u32) -> Self {
        self.answer_ttl = answer_ttl;
        self
    }

    pub async fn execute(&self, query: &DnsQuery) -> Vec<Record> {
        if !query.is_address_query() {
            debug!(name = %query.name, record_type = %query.record_type, "Ignoring non-address query");
            return Vec::new();
        }

        let name = query.bare_name();

        let rules = match self.inventory.list_hostnames().await {
            Ok(rules) => rules,
            Err(e) => {
                warn!(
                    name = %name,
                    source = self.inventory.source_name(),
                    error = %e,
                    "Failed to list hostnames, answering without records"
                );
                return Vec::new();
            }
        };

        if self.matcher.matches(&rules, name) {
            if tracing::enabled!(tracing::Level::DEBUG) {
                for rule in self.matcher.matching_rules(&rules, name) {
                    debug!(
                        name = %name,
                        rule = %rule,
                        wildcard = rule.is_wildcard(),
                        wildcard_match = self.matcher.wildcard_match().as_str(),
                        "Host rule matched"
                    );
                }
            }
            return self.synthesize(query).into_iter().collect();
        }

        debug!(name = %name, rules = rules.len(), "No host rule matched");
        self.delegate(name).await
    }

    fn synthesize(&self, query: &DnsQuery) -> Option<Record> {
        let owner = match Name::from_str(&query.name) {
            Ok(owner) => owner,
            Err(e) => {
                warn!(name = %query.name, error = %e, "Cannot encode answer owner name");
                return None;
            }
        };

        let record = Record::from_rdata(owner, self.answer_ttl, RData::A(A(self.ingress_ip)));
        debug!(answer = %record, "Synthesized ingress answer");
        Some(record)
    }

    async fn delegate(&self, name: &str) -> Vec<Record> {
        let Some(fallback) = &self.fallback else {
            debug!(name = %name, "Fallback disabled, answering without records");
            return Vec::new();
        };

        match fallback.resolve(name).await {
            Ok(answers) => {
                for answer in &answers {
                    debug!(answer = %answer, "Fallback answer");
                }
                answers
            }
            Err(e) => {
                warn!(name = %name, error = %e, "Fallback resolution failed");
                Vec::new()
            }
        }
    }
}
