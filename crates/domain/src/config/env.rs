use super::errors::ConfigError;
use std::net::Ipv4Addr;

pub const DNS_PORT_VAR: &str = "DNS_PORT";
pub const INGRESS_IP_VAR: &str = "INGRESS_IP";
pub const FALLBACK_DNS_VAR: &str = "FALLBACK_DNS";

/// Settings taken from the process environment.
///
/// Applied after the configuration file and before command-line flags.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct EnvOverrides {
    pub dns_port: Option<u16>,
    pub ingress_ip: Option<Ipv4Addr>,
    pub fallback_server: Option<String>,
}

impl EnvOverrides {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let dns_port = match non_empty(lookup(DNS_PORT_VAR)) {
            Some(raw) => Some(
                raw.parse::<u16>()
                    .map_err(|e| ConfigError::InvalidOverride(DNS_PORT_VAR, format!("{raw}: {e}")))?,
            ),
            None => None,
        };

        let ingress_ip = match non_empty(lookup(INGRESS_IP_VAR)) {
            Some(raw) => Some(raw.parse::<Ipv4Addr>().map_err(|e| {
                ConfigError::InvalidOverride(INGRESS_IP_VAR, format!("{raw}: {e}"))
            })?),
            None => None,
        };

        Ok(Self {
            dns_port,
            ingress_ip,
            fallback_server: non_empty(lookup(FALLBACK_DNS_VAR)),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
