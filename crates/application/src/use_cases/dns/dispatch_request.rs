use super::ResolveQueryUseCase;
use hickory_proto::op::{Header, Message};
use hickory_proto::rr::Record;
use ingress_dns_domain::{DnsQuery, RecordType};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tracing::{debug, error, warn};

const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(5);

/// Fans every question of a request out to its own task and assembles the
/// reply once all of them have finished.
pub struct DispatchRequestUseCase {
    resolver: Arc<ResolveQueryUseCase>,
    query_timeout: Duration,
}

impl DispatchRequestUseCase {
    pub fn new(resolver: Arc<ResolveQueryUseCase>) -> Self {
        Self {
            resolver,
            query_timeout: DEFAULT_QUERY_TIMEOUT,
        }
    }

    pub fn with_query_timeout(mut self, query_timeout: Duration) -> Self {
        self.query_timeout = query_timeout;
        self
    }

    pub async fn execute(&self, request: &Message) -> Message {
        let mut reply = Self::reply_for(request);
        let mut tasks: JoinSet<(usize, Vec<Record>)> = JoinSet::new();

        for (index, question) in request.queries().iter().enumerate() {
            let query = DnsQuery::new(
                question.name().to_ascii(),
                RecordType::from_code(u16::from(question.query_type())),
            );

            if !query.is_address_query() {
                debug!(name = %query.name, record_type = %query.record_type, "Skipping non-address question");
                continue;
            }

            let resolver = Arc::clone(&self.resolver);
            let timeout = self.query_timeout;
            tasks.spawn(async move {
                let answers = match tokio::time::timeout(timeout, resolver.execute(&query)).await {
                    Ok(answers) => answers,
                    Err(_) => {
                        warn!(
                            name = %query.name,
                            timeout_ms = timeout.as_millis() as u64,
                            "Question timed out, answering without records"
                        );
                        Vec::new()
                    }
                };
                (index, answers)
            });
        }

        let mut groups = Vec::with_capacity(tasks.len());
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(group) => groups.push(group),
                Err(e) => error!(error = %e, "Question task failed"),
            }
        }

        groups.sort_unstable_by_key(|(index, _)| *index);
        for (_, answers) in groups {
            reply.add_answers(answers);
        }

        debug!(
            id = reply.id(),
            questions = reply.queries().len(),
            answers = reply.answers().len(),
            "Reply assembled"
        );

        reply
    }

    /// Response header and question section mirroring `request`, with no
    /// answers yet.
    pub fn reply_for(request: &Message) -> Message {
        let mut reply = Message::new();
        reply.set_header(Header::response_from_request(request.header()));
        reply.set_recursion_available(true);
        reply.add_queries(request.queries().iter().cloned());
        reply
    }
}
