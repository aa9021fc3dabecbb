#![allow(dead_code, unused_imports)]
pub mod api_server_mock;
pub mod dns_server_mock;

pub use api_server_mock::{MockApiServer, MockHttpResponse};
pub use dns_server_mock::{MockDnsServer, UpstreamBehavior};
