use std::fmt;
use std::sync::Arc;

/// One hostname exposed by the routing inventory.
///
/// `host` is either a literal hostname or a wildcard of the form
/// `*.<suffix>`. `source` records where the rule came from (for ingresses,
/// `namespace/name`) and is only used in log output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostRule {
    pub host: Arc<str>,
    pub source: Option<Arc<str>>,
}

/// Classification of a [`HostRule`] host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostPattern<'a> {
    Exact(&'a str),
    /// Suffix following the leading `*.`.
    Wildcard(&'a str),
    Malformed,
}

impl HostRule {
    pub fn new(host: impl Into<Arc<str>>) -> Self {
        Self {
            host: host.into(),
            source: None,
        }
    }

    pub fn with_source(mut self, source: impl Into<Arc<str>>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn pattern(&self) -> HostPattern<'_> {
        let host = self.host.as_ref();
        if host.is_empty() {
            return HostPattern::Malformed;
        }

        match host.strip_prefix("*.") {
            Some(suffix) if !suffix.is_empty() && !suffix.contains('*') => {
                HostPattern::Wildcard(suffix)
            }
            Some(_) => HostPattern::Malformed,
            None if host.contains('*') => HostPattern::Malformed,
            None => HostPattern::Exact(host),
        }
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self.pattern(), HostPattern::Wildcard(_))
    }
}

impl fmt::Display for HostRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            Some(source) => write!(f, "{} ({})", self.host, source),
            None => write!(f, "{}", self.host),
        }
    }
}

impl From<&str> for HostRule {
    fn from(host: &str) -> Self {
        Self::new(host)
    }
}

impl From<String> for HostRule {
    fn from(host: String) -> Self {
        Self::new(host)
    }
}
