//! crates/club_dashboard_core/src/chat.rs
//!
//! Turns user questions into `/strava/ask` requests and backend replies into
//! something the chat panel can display. The session id is fixed for the
//! lifetime of a `ChatSession`.

use crate::domain::{AnswerPayload, AskRequest, ChatFilters, SessionId};
use crate::normalize::{answer_display_text, error_detail, normalize_answer};
use crate::ports::BackendService;
use std::sync::Arc;
use tracing::{info, warn};

const REQUEST_FAILED: &str = "Request failed.";
const UNREACHABLE: &str = "❌ Could not reach the API. Check the API URL or your network.";

/// The result of one `ask` round trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatReply {
    /// 2xx reply. `text` is what the panel shows, references included.
    Answered { answer: AnswerPayload, text: String },
    /// Non-2xx reply, with the body's `detail` when there was one.
    Rejected { status: u16, detail: Option<String> },
    /// No HTTP response at all.
    Unreachable,
}

impl ChatReply {
    pub fn display_text(&self) -> String {
        match self {
            ChatReply::Answered { text, .. } => text.clone(),
            ChatReply::Rejected { status, detail } => format!(
                "❌ Error ({}): {}",
                status,
                detail.as_deref().unwrap_or(REQUEST_FAILED)
            ),
            ChatReply::Unreachable => UNREACHABLE.to_string(),
        }
    }

    pub fn answer(&self) -> Option<&AnswerPayload> {
        match self {
            ChatReply::Answered { answer, .. } => Some(answer),
            _ => None,
        }
    }
}

pub struct ChatSession {
    backend: Arc<dyn BackendService>,
    session_id: SessionId,
}

impl ChatSession {
    pub fn new(backend: Arc<dyn BackendService>, session_id: SessionId) -> Self {
        Self {
            backend,
            session_id,
        }
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    /// Assembles the request, or `None` when the trimmed query is empty.
    pub fn build_request(&self, query: &str, filters: &ChatFilters) -> Option<AskRequest> {
        let query = query.trim();
        if query.is_empty() {
            return None;
        }
        Some(AskRequest {
            query: query.to_string(),
            with_answer: true,
            session_id: self.session_id.clone(),
            member: present(&filters.member),
            month: present(&filters.month),
            year: present(&filters.year),
        })
    }

    /// Sends `query` to the backend. Returns `None` without any request when
    /// the query is blank; every other outcome is a displayable reply.
    pub async fn ask(&self, query: &str, filters: &ChatFilters) -> Option<ChatReply> {
        let request = self.build_request(query, filters)?;
        info!("Asking backend (session {}): '{}'", self.session_id, request.query);

        let reply = match self.backend.ask(&request).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!("Ask request failed: {}", e);
                return Some(ChatReply::Unreachable);
            }
        };

        if !reply.is_success() {
            warn!("Ask request returned HTTP {}", reply.status);
            return Some(ChatReply::Rejected {
                status: reply.status,
                detail: error_detail(reply.body.as_ref()),
            });
        }

        let answer = reply
            .body
            .as_ref()
            .map(normalize_answer)
            .unwrap_or_default();
        let text = answer_display_text(reply.body.as_ref());
        Some(ChatReply::Answered { answer, text })
    }
}

fn present(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeBackend;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn session(backend: Arc<FakeBackend>) -> ChatSession {
        let started = Utc.timestamp_opt(0, 0).unwrap();
        ChatSession::new(backend, SessionId::from_start_time(started))
    }

    #[tokio::test]
    async fn blank_query_sends_nothing() {
        let backend = Arc::new(FakeBackend::with_ask(200, Some(json!({"answer": "x"}))));
        let chat = session(backend.clone());

        assert_eq!(chat.ask("", &ChatFilters::default()).await, None);
        assert_eq!(chat.ask("   \n\t", &ChatFilters::default()).await, None);
        assert!(backend.ask_requests().is_empty());
    }

    #[tokio::test]
    async fn request_carries_session_and_only_supplied_filters() {
        let backend = Arc::new(FakeBackend::with_ask(200, Some(json!({"answer": "x"}))));
        let chat = session(backend.clone());
        let filters = ChatFilters {
            member: Some("Ana".into()),
            month: Some("  ".into()),
            year: None,
        };

        chat.ask("  longest ride?  ", &filters).await;
        chat.ask("and this week?", &ChatFilters::default()).await;

        let sent = backend.ask_requests();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].query, "longest ride?");
        assert!(sent[0].with_answer);
        assert_eq!(sent[0].member.as_deref(), Some("Ana"));
        assert_eq!(sent[0].month, None);
        assert_eq!(sent[0].year, None);
        assert_eq!(sent[0].session_id.as_str(), "session_0");
        assert_eq!(sent[1].session_id, sent[0].session_id);
    }

    #[tokio::test]
    async fn successful_reply_is_normalized() {
        let body = json!({"message": "Budi leads.", "refs": [1, 2]});
        let backend = Arc::new(FakeBackend::with_ask(200, Some(body)));
        let reply = session(backend).ask("who leads?", &ChatFilters::default()).await;

        let reply = reply.expect("reply");
        assert_eq!(
            reply.answer(),
            Some(&AnswerPayload {
                text: "Budi leads.".into(),
                reference_count: 2,
            })
        );
        assert_eq!(reply.display_text(), "Budi leads.\n\nReferences: [1] [2]");
    }

    #[tokio::test]
    async fn success_without_json_body_says_no_response() {
        let backend = Arc::new(FakeBackend::with_ask(200, None));
        let reply = session(backend).ask("hi", &ChatFilters::default()).await.expect("reply");
        assert_eq!(reply.answer(), Some(&AnswerPayload::default()));
        assert_eq!(reply.display_text(), "No response.");
    }

    #[tokio::test]
    async fn http_error_embeds_status_and_detail() {
        let backend = Arc::new(FakeBackend::with_ask(
            422,
            Some(json!({"detail": "month out of range"})),
        ));
        let reply = session(backend).ask("hi", &ChatFilters::default()).await.expect("reply");
        assert_eq!(reply.display_text(), "❌ Error (422): month out of range");

        let backend = Arc::new(FakeBackend::with_ask(500, None));
        let reply = session(backend).ask("hi", &ChatFilters::default()).await.expect("reply");
        assert_eq!(reply.display_text(), "❌ Error (500): Request failed.");
    }

    #[tokio::test]
    async fn transport_failure_is_a_message_not_an_error() {
        let backend = Arc::new(FakeBackend::offline());
        let reply = session(backend).ask("hi", &ChatFilters::default()).await;
        assert_eq!(reply, Some(ChatReply::Unreachable));
        assert!(ChatReply::Unreachable.display_text().contains("Could not reach the API"));
    }
}
