// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use aegis_guard::domain::app_config::{GuardConfig, DEFAULT_APP_NAME};
use aegis_guard::infrastructure::app_loader::LoadedApp;
use aegis_guard::presentation::{app, GatewayEnviron};
use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use tower::ServiceExt;

const CONFIG: &str = r#"
apps:
  main:
    settings:
      debug_authorization: true
    security:
      authentication:
        type: header
        groups:
          fred: ["group:editors"]
      authorization:
        type: acl
    root_acl:
      - { action: Allow, principal: system.Everyone, permissions: view }
      - { action: Allow, principal: "group:editors", permissions: edit }
    routes:
      - path: /public
        body: "public {command_request}"
      - path: /page
        methods: [GET, HEAD]
        permission: view
        body: "page for {userid} ({query})"
      - path: /edit
        methods: [POST]
        view: edit
        permission: edit
        status: 201
        body: "saved {request_body}"
      - path: /vault
        view: vault
        permission: view
        acl:
          - { action: Allow, principal: fred, permissions: view }
          - { action: Deny, principal: system.Everyone, permissions: ALL_PERMISSIONS }
        body: "vault"
      - path: /login
        identity: remember
        max_age: 3600
      - path: /logout
        identity: forget
  open:
    routes:
      - path: /anything
        permission: view
        body: "no security configured"
"#;

fn router(name: &str) -> Router {
    let config = GuardConfig::from_yaml_str(CONFIG).unwrap();
    let app_config = config.app(name).unwrap();
    app(LoadedApp::from_config(name, app_config))
}

async fn send(router: Router, request: Request<Body>) -> (StatusCode, axum::http::HeaderMap, String) {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, headers, String::from_utf8(body.to_vec()).unwrap())
}

fn get(uri: &str, user: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(Method::GET).uri(uri);
    if let Some(user) = user {
        builder = builder.header("X-Remote-User", user);
    }
    builder.body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_unguarded_route() {
    let (status, _, body) = send(router(DEFAULT_APP_NAME), get("/public", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "public false");
}

#[tokio::test]
async fn test_command_request_marker() {
    let environ = GatewayEnviron::for_command(Method::GET, "/public", "");
    let request = environ.into_request(Body::empty()).unwrap();
    let (status, _, body) = send(router(DEFAULT_APP_NAME), request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "public true");
}

#[tokio::test]
async fn test_guarded_route_allowed_for_everyone() {
    let (status, headers, body) =
        send(router(DEFAULT_APP_NAME), get("/page?a=1", Some("bob"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers["content-type"], "text/plain; charset=utf-8");
    assert_eq!(body, "page for bob (a=1)");
}

#[tokio::test]
async fn test_inserted_values_are_not_expanded() {
    let (status, _, body) =
        send(router(DEFAULT_APP_NAME), get("/page?q=%7Buserid%7D", Some("{request_body}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "page for {request_body} (q=%7Buserid%7D)");
}

#[tokio::test]
async fn test_shared_view_name_keeps_its_permission() {
    let config = GuardConfig::from_yaml_str(
        r#"
apps:
  main:
    security:
      authentication: { type: header }
      authorization: { type: acl }
    root_acl:
      - { action: Allow, principal: system.Everyone, permissions: view }
    routes:
      - { path: /a, view: shared, permission: view, body: a }
      - { path: /b, view: shared, permission: view, body: b }
"#,
    )
    .unwrap();
    let app_config = config.app(DEFAULT_APP_NAME).unwrap();

    for (path, expected) in [("/a", "a"), ("/b", "b")] {
        let router = app(LoadedApp::from_config(DEFAULT_APP_NAME, app_config));
        let (status, _, body) = send(router, get(path, None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, expected);
    }
}

#[tokio::test]
async fn test_router_with_captured_segment() {
    let config = GuardConfig::from_yaml_str(
        r#"
apps:
  main:
    routes:
      - { path: "/users/{id}", body: user }
"#,
    )
    .unwrap();
    let router = app(LoadedApp::from_config(
        DEFAULT_APP_NAME,
        config.app(DEFAULT_APP_NAME).unwrap(),
    ));
    let (status, _, body) = send(router, get("/users/42", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "user");
}

#[tokio::test]
async fn test_method_filter() {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri("/page")
        .body(Body::empty())
        .unwrap();
    let (status, _, _) = send(router(DEFAULT_APP_NAME), request).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_edit_requires_group() {
    let post = |user: &str| {
        Request::builder()
            .method(Method::POST)
            .uri("/edit")
            .header("X-Remote-User", user)
            .body(Body::from("draft"))
            .unwrap()
    };

    let (status, _, body) = send(router(DEFAULT_APP_NAME), post("bob")).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body.starts_with("ACLDenied permission 'edit' via ACE '<default deny>'"));

    let (status, _, body) = send(router(DEFAULT_APP_NAME), post("fred")).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, "saved draft");
}

#[tokio::test]
async fn test_route_acl_overrides_root() {
    let (status, _, body) = send(router(DEFAULT_APP_NAME), get("/vault", Some("bob"))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body.contains("via ACE '<Deny system.Everyone ALL_PERMISSIONS>'"));
    assert!(body.contains("on context 'vault'"));

    let (status, _, body) = send(router(DEFAULT_APP_NAME), get("/vault", Some("fred"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "vault");
}

#[tokio::test]
async fn test_remember_and_forget_headers() {
    let (status, headers, _) =
        send(router(DEFAULT_APP_NAME), get("/login?principal=fred", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers["x-remote-user"], "fred");
    assert_eq!(headers["cache-control"], "max-age=3600");

    let (_, headers, _) = send(router(DEFAULT_APP_NAME), get("/logout", Some("fred"))).await;
    assert_eq!(headers["x-remote-user"], "");
}

#[tokio::test]
async fn test_app_without_security_policies() {
    let (status, _, body) = send(router("open"), get("/anything", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "no security configured");
}
