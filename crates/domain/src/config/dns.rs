use serde::Deserialize;
use std::net::Ipv4Addr;

/// How a `*.<suffix>` ingress host is compared with a query name.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum WildcardMatch {
    /// `name == suffix` or `name` ends with `.<suffix>`.
    #[default]
    Suffix,

    /// The suffix is compiled as a regular expression and searched for
    /// anywhere in the name.
    Regex,
}

impl WildcardMatch {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Suffix => "suffix",
            Self::Regex => "regex",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DnsConfig {
    /// Address returned for every name covered by an ingress host.
    #[serde(default)]
    pub ingress_ip: Option<Ipv4Addr>,

    #[serde(default = "default_answer_ttl")]
    pub answer_ttl: u32,

    #[serde(default = "default_fallback_server")]
    pub fallback_server: String,

    #[serde(default = "default_true")]
    pub fallback_enabled: bool,

    /// Milliseconds to wait for the fallback upstream.
    #[serde(default = "default_fallback_timeout")]
    pub fallback_timeout: u64,

    /// Upper bound in milliseconds for resolving one question.
    #[serde(default = "default_query_timeout")]
    pub query_timeout: u64,

    #[serde(default)]
    pub wildcard_match: WildcardMatch,
}

impl Default for DnsConfig {
    fn default() -> Self {
        Self {
            ingress_ip: None,
            answer_ttl: default_answer_ttl(),
            fallback_server: default_fallback_server(),
            fallback_enabled: true,
            fallback_timeout: default_fallback_timeout(),
            query_timeout: default_query_timeout(),
            wildcard_match: WildcardMatch::default(),
        }
    }
}

fn default_answer_ttl() -> u32 {
    3600
}

fn default_fallback_server() -> String {
    "1.1.1.1:53".to_string()
}

fn default_fallback_timeout() -> u64 {
    2000
}

fn default_query_timeout() -> u64 {
    5000
}

fn default_true() -> bool {
    true
}
