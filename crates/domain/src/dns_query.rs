use super::RecordType;
use std::sync::Arc;

/// A single question taken from an inbound request.
///
/// `name` is kept exactly as it arrived (fully qualified, trailing dot
/// included) so that synthesized answers echo the owner name the client
/// asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsQuery {
    pub name: Arc<str>,
    pub record_type: RecordType,
}

impl DnsQuery {
    pub fn new(name: impl Into<Arc<str>>, record_type: RecordType) -> Self {
        Self {
            name: name.into(),
            record_type,
        }
    }

    /// Name with a single trailing dot removed, used as the comparison key
    /// against ingress hosts.
    pub fn bare_name(&self) -> &str {
        self.name.strip_suffix('.').unwrap_or(&self.name)
    }

    pub fn is_address_query(&self) -> bool {
        self.record_type.is_address()
    }
}
