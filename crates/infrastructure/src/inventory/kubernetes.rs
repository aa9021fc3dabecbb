//! Ingress hostname inventory backed by the Kubernetes API server.
//!
//! Lists `networking.k8s.io/v1` ingresses across every namespace on each call.
//! Nothing is cached; the service account token is re-read per listing so a
//! rotated projected token is picked up without a restart.

use async_trait::async_trait;
use ingress_dns_application::ports::HostnameInventory;
use ingress_dns_domain::{DomainError, HostRule, InventoryConfig};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

const INGRESS_LIST_PATH: &str = "/apis/networking.k8s.io/v1/ingresses";
const SERVICE_HOST_VAR: &str = "KUBERNETES_SERVICE_HOST";
const SERVICE_PORT_VAR: &str = "KUBERNETES_SERVICE_PORT";
const PAGE_LIMIT: &str = "500";

#[derive(Debug, Default, Deserialize)]
pub struct IngressList {
    #[serde(default)]
    pub metadata: ListMeta,
    #[serde(default)]
    pub items: Vec<Ingress>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListMeta {
    #[serde(default, rename = "continue")]
    pub continue_token: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Ingress {
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub spec: Option<IngressSpec>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ObjectMeta {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub namespace: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct IngressSpec {
    #[serde(default)]
    pub rules: Vec<IngressRule>,
}

#[derive(Debug, Default, Deserialize)]
pub struct IngressRule {
    #[serde(default)]
    pub host: Option<String>,
}

pub struct KubernetesIngressInventory {
    client: reqwest::Client,
    api_server: String,
    token_path: Option<PathBuf>,
    request_timeout: Duration,
}

impl KubernetesIngressInventory {
    /// Build the inventory from configuration and the process environment.
    pub fn from_config(config: &InventoryConfig) -> Result<Self, DomainError> {
        Self::from_config_with(config, |key| std::env::var(key).ok())
    }

    /// Same as [`from_config`](Self::from_config) with an injectable
    /// environment lookup.
    ///
    /// When `api_server` is configured explicitly the token and CA bundle are
    /// optional, which allows talking to `kubectl proxy` over plain HTTP.
    /// Without it the in-cluster service account must be present.
    pub fn from_config_with<F>(config: &InventoryConfig, lookup: F) -> Result<Self, DomainError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let explicit = config.api_server.is_some();
        let api_server = match &config.api_server {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => in_cluster_api_server(&lookup)?,
        };

        let token_path = PathBuf::from(&config.token_path);
        let token_path = match std::fs::metadata(&token_path) {
            Ok(_) => Some(token_path),
            Err(_) if explicit => None,
            Err(e) => {
                return Err(DomainError::ConfigError(format!(
                    "Service account token {} unreadable: {}",
                    config.token_path, e
                )))
            }
        };

        let mut builder = reqwest::Client::builder()
            .use_rustls_tls()
            .timeout(Duration::from_secs(config.request_timeout));

        match std::fs::read(&config.ca_path) {
            Ok(pem) => {
                let cert = reqwest::Certificate::from_pem(&pem).map_err(|e| {
                    DomainError::ConfigError(format!("Invalid CA bundle {}: {}", config.ca_path, e))
                })?;
                builder = builder.add_root_certificate(cert);
            }
            Err(_) if explicit => {}
            Err(e) => {
                return Err(DomainError::ConfigError(format!(
                    "Cluster CA bundle {} unreadable: {}",
                    config.ca_path, e
                )))
            }
        }

        let client = builder
            .build()
            .map_err(|e| DomainError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_server,
            token_path,
            request_timeout: Duration::from_secs(config.request_timeout),
        })
    }

    pub fn api_server(&self) -> &str {
        &self.api_server
    }

    async fn bearer_token(&self) -> Result<Option<String>, DomainError> {
        let Some(path) = &self.token_path else {
            return Ok(None);
        };

        let token = tokio::fs::read_to_string(path).await.map_err(|e| {
            DomainError::InventoryUnavailable(format!(
                "Failed to read token {}: {}",
                path.display(),
                e
            ))
        })?;
        Ok(Some(token.trim().to_string()))
    }

    async fn fetch_page(
        &self,
        token: Option<&str>,
        continue_token: Option<&str>,
    ) -> Result<IngressList, DomainError> {
        let url = format!("{}{}", self.api_server, INGRESS_LIST_PATH);
        let mut request = self
            .client
            .get(&url)
            .timeout(self.request_timeout)
            .query(&[("limit", PAGE_LIMIT)]);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        if let Some(next) = continue_token {
            request = request.query(&[("continue", next)]);
        }

        let response = request.send().await.map_err(|e| {
            DomainError::InventoryUnavailable(format!("Ingress list request failed: {}", e))
        })?;

        if !response.status().is_success() {
            return Err(DomainError::InventoryUnavailable(format!(
                "HTTP {} listing ingresses",
                response.status().as_u16()
            )));
        }

        let body = response.bytes().await.map_err(|e| {
            DomainError::InventoryUnavailable(format!("Failed to read ingress list: {}", e))
        })?;

        parse_ingress_list(&body)
    }
}

#[async_trait]
impl HostnameInventory for KubernetesIngressInventory {
    async fn list_hostnames(&self) -> Result<Vec<HostRule>, DomainError> {
        let token = self.bearer_token().await?;
        let mut rules = Vec::new();
        let mut continue_token: Option<String> = None;

        loop {
            let page = self
                .fetch_page(token.as_deref(), continue_token.as_deref())
                .await?;
            rules.extend(host_rules(&page));

            match page.metadata.continue_token {
                Some(next) if !next.is_empty() => continue_token = Some(next),
                _ => break,
            }
        }

        debug!(rules = rules.len(), api_server = %self.api_server, "Listed ingress hosts");
        Ok(rules)
    }

    fn source_name(&self) -> &'static str {
        "kubernetes"
    }
}

pub fn parse_ingress_list(body: &[u8]) -> Result<IngressList, DomainError> {
    serde_json::from_slice(body).map_err(|e| {
        DomainError::InventoryUnavailable(format!("Malformed ingress list: {}", e))
    })
}

/// Flatten every ingress rule host into a [`HostRule`]. Rules without a host
/// are skipped.
pub fn host_rules(list: &IngressList) -> Vec<HostRule> {
    let mut rules = Vec::new();
    for ingress in &list.items {
        let Some(spec) = &ingress.spec else {
            continue;
        };
        let source = format!("{}/{}", ingress.metadata.namespace, ingress.metadata.name);
        for rule in &spec.rules {
            match rule.host.as_deref().map(str::trim) {
                Some(host) if !host.is_empty() => {
                    rules.push(HostRule::new(host).with_source(source.as_str()));
                }
                _ => {}
            }
        }
    }
    rules
}

fn in_cluster_api_server<F>(lookup: &F) -> Result<String, DomainError>
where
    F: Fn(&str) -> Option<String>,
{
    let host = lookup(SERVICE_HOST_VAR)
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| {
            DomainError::ConfigError(format!(
                "{} is not set and no inventory.api_server is configured",
                SERVICE_HOST_VAR
            ))
        })?;
    let port = lookup(SERVICE_PORT_VAR)
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| "443".to_string());

    let host = host.trim();
    if host.contains(':') {
        Ok(format!("https://[{}]:{}", host, port.trim()))
    } else {
        Ok(format!("https://{}:{}", host, port.trim()))
    }
}
