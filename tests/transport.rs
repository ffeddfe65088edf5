//! Transport tests against a wiremock server.

use gogsapi::{
    GogsClient, GogsError, LogPhase, Params, RequestLog, Transport, Verb,
};
use wiremock::matchers::{basic_auth, body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn transport(server: &MockServer, log: RequestLog) -> Transport {
    Transport::new(&format!("{}/api/v1", server.uri()), "test-token", log).unwrap()
}

#[tokio::test]
async fn test_get_403_carries_exact_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/user"))
        .respond_with(ResponseTemplate::new(403).set_body_string("{\"message\":\"forbidden here\"}"))
        .mount(&server)
        .await;

    let t = transport(&server, RequestLog::new());
    let err = t.get("/user", &Params::new()).await.unwrap_err();

    match err {
        GogsError::NotAuthorized { status, body } => {
            assert_eq!(status, 403);
            assert_eq!(body, "{\"message\":\"forbidden here\"}");
        }
        other => panic!("Expected NotAuthorized, got {other:?}"),
    }
}

#[tokio::test]
async fn test_get_sends_token_header_and_user_agent() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/user"))
        .and(header("Authorization", "token test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .expect(1)
        .mount(&server)
        .await;

    let t = transport(&server, RequestLog::new());
    let body = t.get("/user", &Params::new()).await.unwrap();
    assert_eq!(body, "{}");

    let requests = server.received_requests().await.unwrap();
    let agent = requests[0].headers.get("user-agent").unwrap().to_str().unwrap();
    assert!(agent.starts_with("Gogs Rust API Client/"));
}

#[tokio::test]
async fn test_get_encodes_query_parameters() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/repos/search"))
        .and(query_param("q", "my repo"))
        .and(query_param("limit", "5"))
        .and(query_param("private", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
        .expect(1)
        .mount(&server)
        .await;

    let mut params = Params::new();
    params
        .insert("q", "my repo")
        .insert("limit", 5)
        .insert("private", true);

    let t = transport(&server, RequestLog::new());
    t.get("/repos/search", &params).await.unwrap();
}

#[tokio::test]
async fn test_post_sends_json_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/user/repos"))
        .and(header("Content-Type", "application/json"))
        .and(body_json(serde_json::json!({"name": "demo", "private": false})))
        .respond_with(ResponseTemplate::new(201).set_body_string("{\"id\":1}"))
        .expect(1)
        .mount(&server)
        .await;

    let mut params = Params::new();
    params.insert("name", "demo").insert("private", false);

    let t = transport(&server, RequestLog::new());
    let body = t.post("/user/repos", &params).await.unwrap();
    assert_eq!(body, "{\"id\":1}");
}

#[tokio::test]
async fn test_post_400_is_authorization_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/admin/users"))
        .respond_with(ResponseTemplate::new(400).set_body_string("bad"))
        .mount(&server)
        .await;

    let t = transport(&server, RequestLog::new());
    let err = t.post("/admin/users", &Params::new()).await.unwrap_err();
    assert!(err.is_not_authorized());
    assert_eq!(err.status(), Some(400));
}

#[tokio::test]
async fn test_unexpected_status_carries_phrase() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/users/ghost"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not here"))
        .mount(&server)
        .await;

    let t = transport(&server, RequestLog::new());
    let err = t.get("/users/ghost", &Params::new()).await.unwrap_err();

    match &err {
        GogsError::UnexpectedResponse { status, phrase, body } => {
            assert_eq!(*status, 404);
            assert_eq!(*phrase, "Client Error: Not Found");
            assert_eq!(body, "not here");
        }
        other => panic!("Expected UnexpectedResponse, got {other:?}"),
    }
    assert_eq!(err.to_string(), "[404 | Client Error: Not Found]: not here");
}

#[tokio::test]
async fn test_delete_accepts_204() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/v1/repos/alice/demo"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let t = transport(&server, RequestLog::new());
    assert!(t.delete("/repos/alice/demo").await.unwrap());
}

#[tokio::test]
async fn test_basic_auth_mode() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/users/alice/tokens"))
        .and(basic_auth("alice@example.com", "hunter2"))
        .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
        .expect(1)
        .mount(&server)
        .await;

    let t = transport(&server, RequestLog::new()).basic("alice@example.com", "hunter2");
    t.get("/users/alice/tokens", &Params::new()).await.unwrap();
}

#[tokio::test]
async fn test_log_records_request_and_response() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/api/v1/repos/alice/demo"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"name\":\"demo\"}"))
        .mount(&server)
        .await;

    let log = RequestLog::new();
    let t = transport(&server, log.clone());
    let mut params = Params::new();
    params.insert("description", "new");
    t.patch("/repos/alice/demo", &params).await.unwrap();

    let entries = log.entries();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].verb, Verb::Patch.to_string());
    assert!(entries[0].url.ends_with("/api/v1/repos/alice/demo"));
    match &entries[0].phase {
        LogPhase::Request { payload, .. } => assert_eq!(payload, "{\"description\":\"new\"}"),
        other => panic!("Expected request entry, got {other:?}"),
    }
    assert_eq!(entries[1].status(), Some(200));
}

#[tokio::test]
async fn test_authorized_probe() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/admin/users"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/user"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .mount(&server)
        .await;

    let client = GogsClient::new("test-token", &format!("{}/api/v1", server.uri())).unwrap();
    assert!(client.authorized("/user").await.unwrap());

    let err = client.authorized("/admin/users").await.unwrap_err();
    assert!(err.is_not_authorized());
}
