//! UDP Transport for DNS queries (RFC 1035 §4.2.1)
//!
//! Standard DNS transport. Messages are sent as-is (no framing).
//! Limited to 512 bytes without EDNS(0), or up to 4096 bytes with EDNS(0).

use ingress_dns_domain::DomainError;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::UdpSocket;
use tracing::debug;

/// Maximum UDP DNS response size with EDNS(0)
const MAX_UDP_RESPONSE_SIZE: usize = 4096;

/// DNS over UDP transport
#[derive(Debug, Clone)]
pub struct UdpTransport {
    server_addr: SocketAddr,
}

impl UdpTransport {
    pub fn new(server_addr: SocketAddr) -> Self {
        Self { server_addr }
    }

    pub fn server_addr(&self) -> SocketAddr {
        self.server_addr
    }

    /// Send one message and wait for one datagram back.
    ///
    /// The socket is connected to the server, so datagrams from other
    /// sources are discarded by the kernel.
    pub async fn send(&self, message_bytes: &[u8], timeout: Duration) -> Result<Vec<u8>, DomainError> {
        let bind_addr: SocketAddr = if self.server_addr.is_ipv4() {
            SocketAddr::from(([0, 0, 0, 0], 0))
        } else {
            SocketAddr::from(([0u16; 8], 0))
        };

        let socket = UdpSocket::bind(bind_addr).await.map_err(|e| {
            DomainError::IoError(format!("Failed to bind UDP socket: {}", e))
        })?;

        socket.connect(self.server_addr).await.map_err(|e| {
            DomainError::FallbackFailed(format!(
                "Failed to connect to {}: {}",
                self.server_addr, e
            ))
        })?;

        let bytes_sent = socket.send(message_bytes).await.map_err(|e| {
            DomainError::FallbackFailed(format!(
                "Failed to send UDP query to {}: {}",
                self.server_addr, e
            ))
        })?;

        debug!(
            server = %self.server_addr,
            bytes_sent = bytes_sent,
            "UDP query sent"
        );

        let mut recv_buf = vec![0u8; MAX_UDP_RESPONSE_SIZE];

        let bytes_received = tokio::time::timeout(timeout, socket.recv(&mut recv_buf))
            .await
            .map_err(|_| DomainError::QueryTimeout)?
            .map_err(|e| {
                DomainError::FallbackFailed(format!(
                    "Failed to receive UDP response from {}: {}",
                    self.server_addr, e
                ))
            })?;

        recv_buf.truncate(bytes_received);

        debug!(
            server = %self.server_addr,
            bytes_received = bytes_received,
            "UDP response received"
        );

        Ok(recv_buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_udp_transport_creation() {
        let addr: SocketAddr = "1.1.1.1:53".parse().unwrap();
        let transport = UdpTransport::new(addr);
        assert_eq!(transport.server_addr(), addr);
    }

    #[tokio::test]
    async fn test_silent_server_times_out() {
        let silent = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let transport = UdpTransport::new(silent.local_addr().unwrap());

        let result = transport
            .send(&[0u8; 12], Duration::from_millis(50))
            .await;

        assert!(matches!(result, Err(DomainError::QueryTimeout)));
    }
}
