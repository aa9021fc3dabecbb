use super::message_builder::MessageBuilder;
use super::response_parser::ResponseParser;
use crate::dns::transport::UdpTransport;
use async_trait::async_trait;
use hickory_proto::op::ResponseCode;
use hickory_proto::rr::{Record, RecordType};
use ingress_dns_application::ports::FallbackResolver;
use ingress_dns_domain::DomainError;
use std::net::SocketAddr;
use std::time::Duration;
use tracing::debug;

/// Forwards unmatched names to a single upstream resolver over UDP.
///
/// One attempt per call: no retry and no alternate upstream.
pub struct UpstreamFallbackResolver {
    transport: UdpTransport,
    timeout: Duration,
}

impl UpstreamFallbackResolver {
    pub fn new(server: SocketAddr, timeout: Duration) -> Self {
        Self {
            transport: UdpTransport::new(server),
            timeout,
        }
    }

    pub fn server(&self) -> SocketAddr {
        self.transport.server_addr()
    }
}

#[async_trait]
impl FallbackResolver for UpstreamFallbackResolver {
    async fn resolve(&self, name: &str) -> Result<Vec<Record>, DomainError> {
        let (id, request_bytes) = MessageBuilder::build_query(name, RecordType::A)?;

        let response_bytes = self.transport.send(&request_bytes, self.timeout).await?;

        let mut message = ResponseParser::parse(&response_bytes, id)?;
        let rcode = message.response_code();
        if rcode != ResponseCode::NoError {
            debug!(
                name = %name,
                server = %self.server(),
                rcode = ResponseParser::rcode_to_status(rcode),
                "Upstream answered with error code"
            );
        }

        Ok(message.take_answers())
    }
}
