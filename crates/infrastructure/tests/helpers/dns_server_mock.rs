use hickory_proto::op::{Message, MessageType, ResponseCode};
use hickory_proto::rr::rdata::A;
use hickory_proto::rr::{RData, Record};
use hickory_proto::serialize::binary::{BinEncodable, BinEncoder};
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::{Arc, Mutex};
use tokio::net::UdpSocket;
use tokio::sync::oneshot;

/// How the mock upstream reacts to a query.
#[derive(Debug, Clone)]
pub enum UpstreamBehavior {
    /// Answer with one A record per address, owner name copied from the question.
    Answer(Vec<Ipv4Addr>),
    /// Reply with no answers and the given code.
    Rcode(ResponseCode),
    /// Answer, but with a transaction ID that does not match the query.
    WrongId,
    /// Never reply.
    Silent,
}

pub struct MockDnsServer {
    addr: SocketAddr,
    received: Arc<Mutex<Vec<Message>>>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockDnsServer {
    pub async fn start(behavior: UpstreamBehavior) -> Result<Self, std::io::Error> {
        let socket = UdpSocket::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = socket.local_addr()?;
        let received = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&received);

        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            let mut buf = vec![0u8; 4096];

            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => {
                        break;
                    }
                    result = socket.recv_from(&mut buf) => {
                        let Ok((len, peer)) = result else { continue };
                        let Ok(query) = Message::from_vec(&buf[..len]) else { continue };
                        log.lock().unwrap().push(query.clone());

                        if let Some(response) = Self::build_response(&query, &behavior) {
                            let _ = socket.send_to(&response, peer).await;
                        }
                    }
                }
            }
        });

        Ok(Self {
            addr,
            received,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn received(&self) -> Vec<Message> {
        self.received.lock().unwrap().clone()
    }

    fn build_response(query: &Message, behavior: &UpstreamBehavior) -> Option<Vec<u8>> {
        let mut response = Message::new();
        response
            .set_id(query.id())
            .set_message_type(MessageType::Response)
            .set_op_code(query.op_code())
            .set_recursion_desired(query.recursion_desired())
            .set_recursion_available(true)
            .add_queries(query.queries().to_vec());

        match behavior {
            UpstreamBehavior::Answer(addresses) => {
                let name = query.queries().first()?.name().clone();
                for ip in addresses {
                    response.add_answer(Record::from_rdata(name.clone(), 60, RData::A(A(*ip))));
                }
            }
            UpstreamBehavior::Rcode(code) => {
                response.set_response_code(*code);
            }
            UpstreamBehavior::WrongId => {
                response.set_id(query.id().wrapping_add(1));
            }
            UpstreamBehavior::Silent => return None,
        }

        let mut buf = Vec::new();
        let mut encoder = BinEncoder::new(&mut buf);
        response.emit(&mut encoder).ok()?;
        Some(buf)
    }

    pub fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockDnsServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
