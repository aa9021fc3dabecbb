use hickory_proto::op::{Edns, Header, Message, MessageType, OpCode, ResponseCode};
use hickory_proto::serialize::binary::BinDecodable;
use hickory_server::authority::MessageResponseBuilder;
use hickory_server::server::{Request, RequestHandler, ResponseHandler, ResponseInfo};
use ingress_dns_application::use_cases::DispatchRequestUseCase;
use std::sync::Arc;
use tracing::{debug, error, warn};

use super::forwarding::MessageBuilder;

const HEADER_LEN: usize = 12;
const MIN_UDP_PAYLOAD: usize = 512;
const ADVERTISED_UDP_PAYLOAD: u16 = 1232;

/// Bridges DNS wire messages to the request dispatcher.
///
/// The UDP listener hands raw datagrams to [`DnsServerHandler::handle_datagram`];
/// the TCP listener goes through hickory-server's `RequestHandler`.
#[derive(Clone)]
pub struct DnsServerHandler {
    dispatcher: Arc<DispatchRequestUseCase>,
}

impl DnsServerHandler {
    pub fn new(dispatcher: Arc<DispatchRequestUseCase>) -> Self {
        Self { dispatcher }
    }

    /// Decode one UDP datagram, dispatch it and encode the reply.
    ///
    /// Returns `None` when nothing should be sent back.
    pub async fn handle_datagram(&self, bytes: &[u8]) -> Option<Vec<u8>> {
        if bytes.len() < HEADER_LEN {
            debug!(len = bytes.len(), "Dropping datagram shorter than a DNS header");
            return None;
        }

        let request = match Message::from_vec(bytes) {
            Ok(message) => message,
            Err(e) => return Self::format_error(bytes, &e.to_string()),
        };

        if request.message_type() == MessageType::Response {
            debug!(id = request.id(), "Dropping response message sent to the listener");
            return None;
        }

        if request.op_code() != OpCode::Query {
            debug!(id = request.id(), op_code = ?request.op_code(), "Unsupported opcode");
            let reply = Message::error_msg(request.id(), request.op_code(), ResponseCode::NotImp);
            return Self::encode(&reply);
        }

        let mut reply = self.dispatcher.execute(&request).await;
        Self::mirror_edns(&request, &mut reply);

        let limit = Self::udp_payload_limit(&request);
        let encoded = Self::encode(&reply)?;
        if encoded.len() <= limit {
            return Some(encoded);
        }

        debug!(
            id = reply.id(),
            size = encoded.len(),
            limit,
            "Reply exceeds UDP payload limit, truncating"
        );
        reply.take_answers();
        reply.set_truncated(true);
        Self::encode(&reply)
    }

    fn format_error(bytes: &[u8], reason: &str) -> Option<Vec<u8>> {
        let header = match Header::from_bytes(&bytes[..HEADER_LEN]) {
            Ok(header) => header,
            Err(_) => return None,
        };

        if header.message_type() == MessageType::Response {
            return None;
        }

        warn!(id = header.id(), error = %reason, "Malformed DNS request");
        let reply = Message::error_msg(header.id(), header.op_code(), ResponseCode::FormErr);
        Self::encode(&reply)
    }

    fn udp_payload_limit(request: &Message) -> usize {
        request
            .extensions()
            .as_ref()
            .map(|edns| usize::from(edns.max_payload()).max(MIN_UDP_PAYLOAD))
            .unwrap_or(MIN_UDP_PAYLOAD)
    }

    fn mirror_edns(request: &Message, reply: &mut Message) {
        if request.extensions().is_some() {
            let mut edns = Edns::new();
            edns.set_max_payload(ADVERTISED_UDP_PAYLOAD);
            edns.set_version(0);
            reply.set_edns(edns);
        }
    }

    fn encode(message: &Message) -> Option<Vec<u8>> {
        match MessageBuilder::serialize_message(message) {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                error!(id = message.id(), error = %e, "Failed to encode reply");
                None
            }
        }
    }
}

#[async_trait::async_trait]
impl RequestHandler for DnsServerHandler {
    async fn handle_request<R: ResponseHandler>(
        &self,
        request: &Request,
        mut response_handle: R,
    ) -> ResponseInfo {
        if request.message_type() == MessageType::Response {
            debug!(id = request.id(), "Ignoring response message on TCP listener");
            return ResponseInfo::from(*request.header());
        }

        if request.op_code() != OpCode::Query {
            return send_error_response(request, &mut response_handle, ResponseCode::NotImp).await;
        }

        // hickory-server decodes exactly one question per TCP request;
        // multi-question fan-out is served by `handle_datagram` on UDP.
        let mut message = Message::new();
        message.set_header(*request.header());
        message.add_query(request.query().original().clone());

        let reply = self.dispatcher.execute(&message).await;

        let builder = MessageResponseBuilder::from_message_request(request);
        let response = builder.build(*reply.header(), reply.answers().iter(), &[], &[], &[]);

        match response_handle.send_response(response).await {
            Ok(info) => info,
            Err(e) => {
                error!(error = %e, "Failed to send response");
                ResponseInfo::from(*request.header())
            }
        }
    }
}

async fn send_error_response<R: ResponseHandler>(
    request: &Request,
    response_handle: &mut R,
    code: ResponseCode,
) -> ResponseInfo {
    debug!(code = ?code, "Sending error response");
    let builder = MessageResponseBuilder::from_message_request(request);
    let mut header = Header::response_from_request(request.header());
    header.set_response_code(code);
    let response = builder.build_no_records(header);

    match response_handle.send_response(response).await {
        Ok(info) => info,
        Err(e) => {
            error!(error = %e, "Failed to send error response");
            ResponseInfo::from(*request.header())
        }
    }
}
