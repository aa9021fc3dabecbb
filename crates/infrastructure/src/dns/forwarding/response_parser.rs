use hickory_proto::op::{Message, MessageType, ResponseCode};
use ingress_dns_domain::DomainError;
use tracing::debug;

pub struct ResponseParser;

impl ResponseParser {
    /// Decode an upstream reply and check it belongs to the query `expected_id`.
    pub fn parse(response_bytes: &[u8], expected_id: u16) -> Result<Message, DomainError> {
        let message = Message::from_vec(response_bytes).map_err(|e| {
            DomainError::InvalidDnsResponse(format!("Failed to parse DNS response: {}", e))
        })?;

        if message.id() != expected_id {
            return Err(DomainError::InvalidDnsResponse(format!(
                "Response ID {} does not match query ID {}",
                message.id(),
                expected_id
            )));
        }

        if message.message_type() != MessageType::Response {
            return Err(DomainError::InvalidDnsResponse(
                "Upstream sent a query instead of a response".to_string(),
            ));
        }

        debug!(
            rcode = ?message.response_code(),
            answers = message.answers().len(),
            truncated = message.truncated(),
            "DNS response parsed"
        );

        Ok(message)
    }

    pub fn rcode_to_status(rcode: ResponseCode) -> &'static str {
        match rcode {
            ResponseCode::NoError => "NOERROR",
            ResponseCode::NXDomain => "NXDOMAIN",
            ResponseCode::ServFail => "SERVFAIL",
            ResponseCode::Refused => "REFUSED",
            ResponseCode::NotImp => "NOTIMP",
            ResponseCode::FormErr => "FORMERR",
            _ => "UNKNOWN",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dns::forwarding::MessageBuilder;

    fn response_with_id(id: u16) -> Vec<u8> {
        let mut message = Message::new();
        message
            .set_id(id)
            .set_message_type(MessageType::Response)
            .set_response_code(ResponseCode::NXDomain);
        MessageBuilder::serialize_message(&message).unwrap()
    }

    #[test]
    fn test_matching_id_is_accepted() {
        let message = ResponseParser::parse(&response_with_id(42), 42).unwrap();
        assert_eq!(message.response_code(), ResponseCode::NXDomain);
    }

    #[test]
    fn test_mismatched_id_is_rejected() {
        let result = ResponseParser::parse(&response_with_id(42), 43);
        assert!(matches!(result, Err(DomainError::InvalidDnsResponse(_))));
    }

    #[test]
    fn test_garbage_is_rejected() {
        let result = ResponseParser::parse(&[0xde, 0xad], 0);
        assert!(matches!(result, Err(DomainError::InvalidDnsResponse(_))));
    }

    #[test]
    fn test_query_message_is_rejected() {
        let (id, bytes) =
            MessageBuilder::build_query("example.com", hickory_proto::rr::RecordType::A).unwrap();
        assert!(ResponseParser::parse(&bytes, id).is_err());
    }

    #[test]
    fn test_rcode_status_names() {
        assert_eq!(ResponseParser::rcode_to_status(ResponseCode::NoError), "NOERROR");
        assert_eq!(ResponseParser::rcode_to_status(ResponseCode::ServFail), "SERVFAIL");
    }
}
