//! End-to-end: the workspace driving a real `ApiClient` against a mock
//! backend.

use atrium_core::{ApiClient, ChatStatus, Message, SyncOptions, Workspace};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn workspace_against(server: &MockServer) -> Workspace {
    Workspace::with_client(ApiClient::new(&server.uri()), SyncOptions::default())
}

#[tokio::test]
async fn project_selection_hydrates_history_and_counts() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/chatHistory"))
        .and(query_param("chatId", "1"))
        .and(query_param("projectName", "Alpha"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"question": "hi", "reply": "hello", "timestamp": 1700000000}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/chatCount"))
        .and(query_param("projectName", "Alpha"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([1])))
        .mount(&server)
        .await;

    let workspace = workspace_against(&server);
    workspace.select_project("Alpha").await;

    assert_eq!(
        workspace.messages(),
        vec![Message::user("hi"), Message::ai("hello")]
    );
    assert_eq!(workspace.counts(), vec![1]);
    assert!(workspace.has_fetched_history());
    workspace.shutdown();
}

#[tokio::test]
async fn exchange_appends_reply_and_bumps_count() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/chatHistory"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/chatCount"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([0])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rag"))
        .and(query_param("query", "what is in scope?"))
        .and(query_param("chatId", "1"))
        .and(query_param("projectName", "Alpha"))
        .respond_with(ResponseTemplate::new(200).set_body_string("the dashboard core"))
        .mount(&server)
        .await;

    let workspace = workspace_against(&server);
    workspace.select_project("Alpha").await;

    assert!(workspace.submit("what is in scope?").await);

    let messages = workspace.messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[1], Message::ai("the dashboard core"));
    assert_eq!(workspace.status(), ChatStatus::Completed);
    assert_eq!(workspace.counts(), vec![1]);
    workspace.shutdown();
}

#[tokio::test]
async fn failed_exchange_shows_status_bubble() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/chatHistory"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/chatCount"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rag"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"message": "boom"})))
        .mount(&server)
        .await;

    let workspace = workspace_against(&server);
    workspace.select_project("Alpha").await;
    assert!(workspace.submit("hello?").await);

    let messages = workspace.messages();
    assert_eq!(
        messages[1],
        Message::ai("Error: 500 - Please try again or check your input.")
    );
    assert_eq!(workspace.status(), ChatStatus::Failed);
    assert_eq!(workspace.last_error(), Some("boom".to_string()));
    // Failed exchanges never bump counts.
    assert_eq!(workspace.counts(), Vec::<u64>::new());
    workspace.shutdown();
}

#[tokio::test]
async fn history_failure_still_arms_fetch_guard() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/chatHistory"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/chatCount"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let workspace = workspace_against(&server);
    workspace.select_project("Alpha").await;

    assert!(workspace.has_fetched_history());
    // A second call must not refetch — the mock's expect(1) enforces it.
    workspace.ensure_history().await;
    workspace.shutdown();
}
