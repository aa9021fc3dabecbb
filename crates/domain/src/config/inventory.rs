use serde::Deserialize;

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum InventorySource {
    /// Ingress resources listed from the cluster API server.
    #[default]
    Kubernetes,

    /// Fixed list from `static_hosts`.
    Static,
}

impl InventorySource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Kubernetes => "kubernetes",
            Self::Static => "static",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct InventoryConfig {
    #[serde(default)]
    pub source: InventorySource,

    #[serde(default)]
    pub static_hosts: Vec<String>,

    /// API server base URL. Derived from `KUBERNETES_SERVICE_HOST` and
    /// `KUBERNETES_SERVICE_PORT` when unset.
    #[serde(default)]
    pub api_server: Option<String>,

    #[serde(default = "default_token_path")]
    pub token_path: String,

    #[serde(default = "default_ca_path")]
    pub ca_path: String,

    /// Seconds allowed for one listing request.
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            source: InventorySource::default(),
            static_hosts: Vec::new(),
            api_server: None,
            token_path: default_token_path(),
            ca_path: default_ca_path(),
            request_timeout: default_request_timeout(),
        }
    }
}

fn default_token_path() -> String {
    "/var/run/secrets/kubernetes.io/serviceaccount/token".to_string()
}

fn default_ca_path() -> String {
    "/var/run/secrets/kubernetes.io/serviceaccount/ca.crt".to_string()
}

fn default_request_timeout() -> u64 {
    5
}
