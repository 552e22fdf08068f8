use medassist_engine::{
    Backend, BackendSettings, ChatRole, ChatTurn, FailureKind, Operation, ReqwestBackend,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn backend_for(server: &MockServer) -> ReqwestBackend {
    let settings = BackendSettings::new(&server.uri()).expect("mock server uri");
    ReqwestBackend::new(settings).expect("client")
}

#[tokio::test]
async fn ask_sends_encoded_query_and_reads_scraping_flag() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("query", "Give me a diet plan & more"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Here is a plan...",
            "webscraping": true,
        })))
        .expect(1)
        .mount(&server)
        .await;

    let reply = backend_for(&server)
        .ask("Give me a diet plan & more")
        .await
        .expect("ask ok");
    assert_eq!(reply.message, "Here is a plan...");
    assert_eq!(reply.operation, Operation::WebScraping);
}

#[tokio::test]
async fn ask_reads_rag_flag() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Chicken is rich in protein.",
            "ragRetrieval": true,
            "sources": ["doc one"],
            "cachedResponse": false,
        })))
        .mount(&server)
        .await;

    let reply = backend_for(&server).ask("chicken").await.expect("ask ok");
    assert_eq!(reply.operation, Operation::RagRetrieval);
    assert_eq!(reply.sources, vec!["doc one".to_string()]);
}

#[tokio::test]
async fn ask_fails_on_http_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "detail": "No question provided" })),
        )
        .mount(&server)
        .await;

    let err = backend_for(&server).ask("x").await.unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(400));
    assert_eq!(err.detail.as_deref(), Some("No question provided"));
}

#[tokio::test]
async fn ask_rejects_malformed_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = backend_for(&server).ask("x").await.unwrap_err();
    assert_eq!(err.kind, FailureKind::MalformedResponse);
}

#[tokio::test]
async fn ask_reports_network_failure() {
    // Grab a free port, then close it so the connection is refused.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let settings = BackendSettings::new(&format!("http://{addr}")).unwrap();
    let err = ReqwestBackend::new(settings)
        .unwrap()
        .ask("anyone there?")
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::Network);
}

#[tokio::test]
async fn history_is_returned_in_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/chat-history"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "history": [
                { "role": "user", "content": "hi" },
                { "role": "bot", "content": "hello" },
                { "role": "assistant", "content": "anything else?" },
            ]
        })))
        .mount(&server)
        .await;

    let history = backend_for(&server).load_history().await.expect("history");
    assert_eq!(
        history,
        vec![
            ChatTurn::new(ChatRole::User, "hi"),
            ChatTurn::new(ChatRole::Bot, "hello"),
            ChatTurn::new(ChatRole::Bot, "anything else?"),
        ]
    );
}

#[tokio::test]
async fn base_url_path_prefix_is_kept() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/chat-history"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "history": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let settings = BackendSettings::new(&format!("{}/api/", server.uri())).unwrap();
    let backend = ReqwestBackend::new(settings).unwrap();
    assert!(backend.load_history().await.unwrap().is_empty());
}

#[test]
fn invalid_base_url_is_rejected() {
    let err = BackendSettings::new("not a url").unwrap_err();
    assert_eq!(err.kind, FailureKind::InvalidUrl);
}
