pub mod forwarding;
pub mod server;
pub mod transport;

pub use forwarding::UpstreamFallbackResolver;
pub use server::DnsServerHandler;
