//! Chat request coordination.
//!
//! Executes one user query against the backend and folds the result into
//! the conversation log: optimistic user turn first, then exactly one
//! assistant turn (answer or error) once the request resolves.

use crate::backend::BackendClient;
use crate::conversation::ConversationStore;
use crate::error::Error;
use crate::models::Turn;
use tracing::{debug, error, warn};

/// Prefix for assistant turns that report a failure.
pub const WARNING_MARKER: &str = "⚠️ ";

/// Fallback text when the backend gave no usable error detail.
pub const CHAT_FALLBACK_MESSAGE: &str = "Error: Could not get response.";

/// Run one query. Returns `false` without touching the log or the network
/// when the query is empty or whitespace-only; otherwise appends the user
/// turn, issues the request, appends the resulting assistant turn, and
/// returns `true`.
///
/// The context window is taken from the log as it stood before the
/// optimistic user turn: the backend receives prior context, not an echo
/// of the question it is being asked.
pub async fn run_query(
    client: &BackendClient,
    store: &mut ConversationStore,
    history_window: usize,
    query: &str,
) -> bool {
    if query.trim().is_empty() {
        debug!("Ignoring empty query");
        return false;
    }

    let history = store.windowed_history(history_window);
    store.append(Turn::user(query));

    let turn = match client.chat(query, &history).await {
        Ok(answer) => Turn::assistant(answer.answer, answer.sources),
        Err(Error::Backend(detail)) => {
            warn!("Backend rejected query: {}", detail);
            Turn::assistant(format!("{}{}", WARNING_MARKER, detail), Vec::new())
        }
        Err(e) => {
            error!("Chat request failed: {}", e);
            Turn::assistant(
                format!("{}{}", WARNING_MARKER, CHAT_FALLBACK_MESSAGE),
                Vec::new(),
            )
        }
    };
    store.append(turn);

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use serde_json::{json, Value};
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(uri: &str) -> BackendClient {
        BackendClient::new(uri, Duration::from_secs(5)).unwrap()
    }

    async fn mock_answer(server: &MockServer, answer: &str, sources: Vec<&str>) {
        Mock::given(method("POST"))
            .and(path("/api/v1/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "answer": answer,
                "sources": sources,
            })))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_empty_and_whitespace_queries_are_noops() {
        // Never contacted; an empty query must not produce a request.
        let client = client("http://127.0.0.1:9");
        let mut store = ConversationStore::new();

        assert!(!run_query(&client, &mut store, 10, "").await);
        assert!(!run_query(&client, &mut store, 10, "   ").await);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_success_appends_user_then_assistant_turn() {
        let server = MockServer::start().await;
        mock_answer(&server, "In section 2.", vec!["guide.pdf"]).await;

        let mut store = ConversationStore::new();
        assert!(run_query(&client(&server.uri()), &mut store, 10, "where?").await);

        assert_eq!(store.len(), 2);
        let log = store.all();
        assert_eq!(log[0].role, Role::User);
        assert_eq!(log[0].content, "where?");
        assert_eq!(log[1].role, Role::Assistant);
        assert_eq!(log[1].content, "In section 2.");
        assert_eq!(log[1].sources, vec!["guide.pdf"]);
    }

    #[tokio::test]
    async fn test_backend_detail_surfaces_verbatim_after_marker() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/chat"))
            .respond_with(
                ResponseTemplate::new(500).set_body_json(json!({ "detail": "index is empty" })),
            )
            .mount(&server)
            .await;

        let mut store = ConversationStore::new();
        run_query(&client(&server.uri()), &mut store, 10, "anything").await;

        assert_eq!(store.len(), 2);
        let last = store.all().last().unwrap();
        assert_eq!(last.content, "⚠️ index is empty");
        assert!(last.sources.is_empty());
    }

    #[tokio::test]
    async fn test_transport_failure_appends_fixed_error_turn() {
        // Connection refused: nothing is listening on this port.
        let client = client("http://127.0.0.1:9");
        let mut store = ConversationStore::new();

        run_query(&client, &mut store, 10, "hello").await;

        assert_eq!(store.len(), 2);
        let last = store.all().last().unwrap();
        assert_eq!(last.content, "⚠️ Error: Could not get response.");
    }

    #[tokio::test]
    async fn test_window_excludes_the_in_flight_turn() {
        let server = MockServer::start().await;
        mock_answer(&server, "ok", vec![]).await;

        let mut store = ConversationStore::new();
        for i in 0..12 {
            store.append(Turn::user(format!("old {}", i)));
        }

        run_query(&client(&server.uri()), &mut store, 10, "the new question").await;

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
        assert_eq!(body["message"], "the new question");

        let history = body["history"].as_array().unwrap();
        assert_eq!(history.len(), 10);
        // Window holds turns 2..=11, oldest first; the new question is absent.
        assert_eq!(history[0]["content"], "old 2");
        assert_eq!(history[9]["content"], "old 11");
        assert!(history
            .iter()
            .all(|entry| entry["content"] != "the new question"));
    }
}
