//! Resource lifecycle tests: lazy loading, create/patch/delete guards.
//!
//! Uses wiremock to count the requests each operation actually sends.

use gogsapi::{args, GogsClient, GogsError, LoadState, OwnerRef, Repo, Resource};
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> GogsClient {
    GogsClient::new("test-token", &format!("{}/api/v1", server.uri())).unwrap()
}

fn repo_json() -> serde_json::Value {
    json!({
        "id": 10,
        "owner": {"id": 1, "username": "alice"},
        "name": "demo",
        "full_name": "alice/demo",
        "private": false,
        "mirror": false,
        "created_at": "2020-03-01T10:00:00Z"
    })
}

#[tokio::test]
async fn test_create_on_loaded_resource_sends_nothing() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/repos/alice/demo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(repo_json()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201).set_body_json(repo_json()))
        .expect(0)
        .mount(&server)
        .await;

    let mut repo = client(&server).repo("alice/demo");
    repo.load(false).await.unwrap();
    assert!(repo.is_loaded());

    let err = repo.create(&args!["demo"]).await.unwrap_err();
    assert!(matches!(err, GogsError::InvalidMethodRequest(_)));

    // wiremock verifies the expectations on MockServer drop
}

#[tokio::test]
async fn test_load_is_idempotent_unless_forced() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/users/alice"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"id": 1, "username": "alice"})),
        )
        .expect(2)
        .mount(&server)
        .await;

    let client = client(&server);
    let mut alice = client.user("alice");
    alice.load(false).await.unwrap();
    alice.load(false).await.unwrap();
    alice.load(true).await.unwrap();

    assert_eq!(alice.id(), Some(1));
    // One request and one response per fetch.
    assert_eq!(client.log().len(), 4);
}

#[tokio::test]
async fn test_create_posts_only_given_params() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/admin/users"))
        .and(body_json(json!({
            "username": "carol",
            "email": "carol@example.com",
            "password": "pw"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 5,
            "username": "carol",
            "email": "carol@example.com"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut carol = client(&server).user("carol");
    // source_id and login_name are skipped: wrong types fall back to null.
    carol
        .create(&args!["carol", "carol@example.com", "x", 3, "pw"])
        .await
        .unwrap();

    assert!(carol.is_loaded());
    assert_eq!(carol.id(), Some(5));
}

#[tokio::test]
async fn test_patch_requires_loaded_resource() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut alice = client(&server).user("alice");
    let err = alice.patch().await.unwrap_err();
    assert!(matches!(err, GogsError::InvalidMethodRequest(_)));
}

#[tokio::test]
async fn test_patch_unsupported_after_load() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/users/alice"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"username": "alice"})))
        .mount(&server)
        .await;

    let mut alice = client(&server).user("alice");
    alice.load(false).await.unwrap();

    let err = alice.patch().await.unwrap_err();
    assert!(matches!(err, GogsError::NotImplemented { .. }));
}

#[tokio::test]
async fn test_deleted_resource_rejects_further_operations() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/v1/repos/alice/demo"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(repo_json()))
        .expect(0)
        .mount(&server)
        .await;

    let mut repo = client(&server).repo("alice/demo");
    assert!(repo.delete().await.unwrap());
    assert_eq!(repo.state(), LoadState::Deleted);

    let err = repo.load(true).await.unwrap_err();
    assert!(matches!(err, GogsError::InvalidMethodRequest(_)));

    let err = repo.delete().await.unwrap_err();
    assert!(matches!(err, GogsError::InvalidMethodRequest(_)));
}

#[tokio::test]
async fn test_create_repo_under_org() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/org/acme/repos"))
        .and(body_json(json!({
            "name": "site",
            "description": "Landing page",
            "private": true,
            "auto_init": false,
            "readme": "Default"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 12,
            "owner": {"id": 3, "username": "acme"},
            "name": "site",
            "full_name": "acme/site",
            "private": true
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    let mut repo = Repo::new(client.transport(), Some(OwnerRef::org("acme")), "");
    repo.create(&args!["site", "Landing page", true])
        .await
        .unwrap();

    assert_eq!(repo.full_name(), Some("acme/site"));
    assert!(repo.is_private());
    // The embedded owner fills in the id, the kind stays Org.
    let owner = repo.owner().unwrap();
    assert!(owner.is_org());
    assert_eq!(owner.id, Some(3));
}

#[tokio::test]
async fn test_migrate_resolves_owner_id() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/user"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"id": 1, "username": "alice"})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/repos/migrate"))
        .and(body_json(json!({
            "clone_addr": "https://github.com/gogs/gogs.git",
            "repo_name": "gogs",
            "mirror": true,
            "private": false,
            "uid": 1
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 20,
            "owner": {"id": 1, "username": "alice"},
            "name": "gogs",
            "full_name": "alice/gogs",
            "mirror": true
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    let mut repo = Repo::new(client.transport(), Some(OwnerRef::authenticated()), "");
    repo.migrate(&args![
        "https://github.com/gogs/gogs.git",
        "gogs",
        None::<&str>,
        None::<&str>,
        true
    ])
    .await
    .unwrap();

    assert_eq!(repo.full_name(), Some("alice/gogs"));
    assert!(repo.is_mirror());
}

#[tokio::test]
async fn test_migrate_rejects_relative_clone_address() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let client = client(&server);
    let mut repo = Repo::new(
        client.transport(),
        Some(OwnerRef {
            id: Some(1),
            ..OwnerRef::user("alice")
        }),
        "",
    );
    let err = repo
        .migrate(&args!["not a url", "gogs"])
        .await
        .unwrap_err();
    assert!(matches!(err, GogsError::InvalidParam { .. }));
}
