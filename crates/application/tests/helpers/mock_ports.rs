#![allow(dead_code)]

use async_trait::async_trait;
use hickory_proto::rr::rdata::A;
use hickory_proto::rr::{Name, RData, Record};
use ingress_dns_application::ports::{FallbackResolver, HostnameInventory};
use ingress_dns_domain::{DomainError, HostRule};
use std::collections::HashMap;
use std::net::Ipv4Addr;
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub fn a_record(name: &str, ip: [u8; 4], ttl: u32) -> Record {
    Record::from_rdata(
        Name::from_str(name).unwrap(),
        ttl,
        RData::A(A(Ipv4Addr::from(ip))),
    )
}

#[derive(Clone, Default)]
pub struct MockHostnameInventory {
    rules: Arc<Mutex<Vec<HostRule>>>,
    should_fail: Arc<Mutex<bool>>,
    delay: Arc<Mutex<Option<Duration>>>,
    calls: Arc<AtomicUsize>,
}

impl MockHostnameInventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_hosts(hosts: &[&str]) -> Self {
        let inventory = Self::new();
        inventory.set_hosts(hosts);
        inventory
    }

    pub fn set_hosts(&self, hosts: &[&str]) {
        *self.rules.lock().unwrap() = hosts.iter().map(|h| HostRule::new(*h)).collect();
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        *self.should_fail.lock().unwrap() = should_fail;
    }

    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HostnameInventory for MockHostnameInventory {
    async fn list_hostnames(&self) -> Result<Vec<HostRule>, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if *self.should_fail.lock().unwrap() {
            return Err(DomainError::InventoryUnavailable(
                "Mock inventory failed".to_string(),
            ));
        }

        Ok(self.rules.lock().unwrap().clone())
    }

    fn source_name(&self) -> &'static str {
        "mock"
    }
}

#[derive(Clone, Default)]
pub struct MockFallbackResolver {
    responses: Arc<Mutex<HashMap<String, Vec<Record>>>>,
    errors: Arc<Mutex<HashMap<String, DomainError>>>,
    delays: Arc<Mutex<HashMap<String, Duration>>>,
    requested: Arc<Mutex<Vec<String>>>,
}

impl MockFallbackResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_response(&self, name: &str, answers: Vec<Record>) {
        self.responses
            .lock()
            .unwrap()
            .insert(name.to_string(), answers);
    }

    pub fn set_error(&self, name: &str, error: DomainError) {
        self.errors.lock().unwrap().insert(name.to_string(), error);
    }

    pub fn set_delay(&self, name: &str, delay: Duration) {
        self.delays.lock().unwrap().insert(name.to_string(), delay);
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.requested.lock().unwrap().len()
    }
}

#[async_trait]
impl FallbackResolver for MockFallbackResolver {
    async fn resolve(&self, name: &str) -> Result<Vec<Record>, DomainError> {
        self.requested.lock().unwrap().push(name.to_string());

        let delay = self.delays.lock().unwrap().get(name).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(err) = self.errors.lock().unwrap().get(name).cloned() {
            return Err(err);
        }

        Ok(self
            .responses
            .lock()
            .unwrap()
            .get(name)
            .cloned()
            .unwrap_or_default())
    }
}
