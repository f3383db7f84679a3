//! End-to-end tests against a mock Prometheus rules API.

use std::net::SocketAddr;
use std::time::Duration;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Request, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use http_body_util::BodyExt;
use healthz_server::{BasicCredentials, HealthzConfig, HealthzServer, RulesClient, ServerError};
use tokio::net::TcpListener;
use tower::ServiceExt;

const RULES_TWO_GROUPS: &str = r#"{
    "status": "success",
    "data": {
        "groups": [
            {
                "name": "control-plane",
                "rules": [
                    {
                        "name": "ApiServerDown",
                        "labels": {"type": "healthz"},
                        "alerts": [{"labels": {"job": "apiserver"}, "state": "firing"}]
                    },
                    {
                        "name": "SchedulerSlow",
                        "labels": {"type": "healthz"},
                        "alerts": [{"labels": {}, "state": "pending"}]
                    }
                ]
            },
            {
                "name": "storage",
                "rules": [
                    {
                        "name": "DiskFilling",
                        "labels": {"type": "capacity"},
                        "alerts": [{"labels": {}, "state": "firing"}]
                    },
                    {
                        "name": "EtcdNoLeader",
                        "labels": {"type": "healthz", "team": "storage"},
                        "alerts": [{"labels": {}, "state": "firing"}]
                    }
                ]
            }
        ]
    }
}"#;

const RULES_QUIET: &str = r#"{
    "status": "success",
    "data": {
        "groups": [
            {
                "name": "control-plane",
                "rules": [
                    {
                        "name": "ApiServerDown",
                        "labels": {"type": "healthz"},
                        "alerts": [{"labels": {}, "state": "inactive"}]
                    },
                    {
                        "name": "DiskFilling",
                        "labels": {"type": "capacity"},
                        "alerts": [{"labels": {}, "state": "firing"}]
                    }
                ]
            }
        ]
    }
}"#;

/// Serves a fixed status and body on `/api/v1/rules`, returning its base URI.
async fn spawn_upstream(status: StatusCode, body: &'static str) -> String {
    let app = Router::new().route(
        "/api/v1/rules",
        get(move || async move {
            let response: Response =
                (status, [(CONTENT_TYPE, "application/json")], body).into_response();
            response
        }),
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    format!("http://{addr}")
}

/// Serves `/api/v1/rules` only after `delay`.
async fn spawn_slow_upstream(delay: Duration) -> String {
    let app = Router::new().route(
        "/api/v1/rules",
        get(move || async move {
            tokio::time::sleep(delay).await;
            RULES_QUIET
        }),
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    format!("http://{addr}")
}

fn make_server(upstream: &str, query: &str) -> HealthzServer {
    let config = HealthzConfig::new(BasicCredentials::new("admin", "s3cret"))
        .with_query(query)
        .with_upstream_uri(upstream);
    HealthzServer::new(config).unwrap()
}

fn authed_get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(AUTHORIZATION, format!("Basic {}", STANDARD.encode("admin:s3cret")))
        .body(Body::empty())
        .unwrap()
}

async fn body_bytes(response: Response) -> Vec<u8> {
    response.into_body().collect().await.unwrap().to_bytes().to_vec()
}

#[tokio::test]
async fn healthy_when_no_matching_rule_fires() {
    let upstream = spawn_upstream(StatusCode::OK, RULES_QUIET).await;
    let app = make_server(&upstream, "type=healthz").router();

    let response = app.oneshot(authed_get("/healthz")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_bytes(response).await;
    assert_eq!(body, br#"{"state":"healthy","rules":null}"#);
}

#[tokio::test]
async fn unhealthy_lists_firing_rules_in_order() {
    let upstream = spawn_upstream(StatusCode::OK, RULES_TWO_GROUPS).await;
    let app = make_server(&upstream, "type=healthz").router();

    let response = app.oneshot(authed_get("/healthz")).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(json["state"], "unhealthy");
    assert_eq!(json["rules"], serde_json::json!(["ApiServerDown", "EtcdNoLeader"]));
}

#[tokio::test]
async fn narrower_query_requires_every_label() {
    let upstream = spawn_upstream(StatusCode::OK, RULES_TWO_GROUPS).await;
    let app = make_server(&upstream, "type=healthz,team=storage").router();

    let response = app.oneshot(authed_get("/healthz")).await.unwrap();

    let json: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(json["rules"], serde_json::json!(["EtcdNoLeader"]));
}

#[tokio::test]
async fn empty_query_reports_every_firing_rule() {
    let upstream = spawn_upstream(StatusCode::OK, RULES_TWO_GROUPS).await;
    let app = make_server(&upstream, "").router();

    let response = app.oneshot(authed_get("/healthz")).await.unwrap();

    let json: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(
        json["rules"],
        serde_json::json!(["ApiServerDown", "DiskFilling", "EtcdNoLeader"])
    );
}

#[tokio::test]
async fn repeated_checks_give_same_answer() {
    let upstream = spawn_upstream(StatusCode::OK, RULES_TWO_GROUPS).await;
    let server = make_server(&upstream, "type=healthz");

    let first = server.router().oneshot(authed_get("/healthz")).await.unwrap();
    let second = server.router().oneshot(authed_get("/healthz")).await.unwrap();

    assert_eq!(first.status(), second.status());
    assert_eq!(body_bytes(first).await, body_bytes(second).await);
}

#[tokio::test]
async fn upstream_non_success_status_is_plain_text_500() {
    let upstream = spawn_upstream(StatusCode::SERVICE_UNAVAILABLE, "overloaded").await;
    let app = make_server(&upstream, "type=healthz").router();

    let response = app.oneshot(authed_get("/healthz")).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let text = String::from_utf8(body_bytes(response).await).unwrap();
    assert_eq!(text, "upstream returned 503: overloaded");
}

#[tokio::test]
async fn upstream_malformed_json_is_500() {
    let upstream = spawn_upstream(StatusCode::OK, "{\"data\": [").await;
    let app = make_server(&upstream, "type=healthz").router();

    let response = app.oneshot(authed_get("/healthz")).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let text = String::from_utf8(body_bytes(response).await).unwrap();
    assert!(text.starts_with("failed to decode rules response"));
}

#[tokio::test]
async fn upstream_error_envelope_is_500() {
    let upstream = spawn_upstream(
        StatusCode::OK,
        r#"{"status":"error","errorType":"unavailable","error":"rule manager not ready"}"#,
    )
    .await;
    let client = RulesClient::new(format!("{upstream}/api/v1/rules"), Duration::from_secs(5))
        .unwrap();

    let result = client.fetch_rules().await;

    match result {
        Err(ServerError::UpstreamError {
            error_type,
            message,
        }) => {
            assert_eq!(error_type, "unavailable");
            assert_eq!(message, "rule manager not ready");
        }
        other => panic!("expected upstream error, got {other:?}"),
    }
}

#[tokio::test]
async fn oversized_upstream_body_is_rejected() {
    let upstream = spawn_upstream(StatusCode::OK, RULES_QUIET).await;
    let client = RulesClient::new(format!("{upstream}/api/v1/rules"), Duration::from_secs(5))
        .unwrap()
        .with_max_body_bytes(RULES_QUIET.len() - 1);

    let result = client.fetch_rules().await;

    assert!(matches!(
        result,
        Err(ServerError::UpstreamTooLarge { limit }) if limit == RULES_QUIET.len() - 1
    ));
}

#[tokio::test]
async fn upstream_body_at_limit_is_accepted() {
    let upstream = spawn_upstream(StatusCode::OK, RULES_QUIET).await;
    let client = RulesClient::new(format!("{upstream}/api/v1/rules"), Duration::from_secs(5))
        .unwrap()
        .with_max_body_bytes(RULES_QUIET.len());

    let snapshot = client.fetch_rules().await.unwrap();

    assert_eq!(snapshot.groups().len(), 1);
}

#[tokio::test]
async fn upstream_timeout_fails_fast() {
    let upstream = spawn_slow_upstream(Duration::from_secs(5)).await;
    let client = RulesClient::new(
        format!("{upstream}/api/v1/rules"),
        Duration::from_millis(200),
    )
    .unwrap();

    let started = std::time::Instant::now();
    let result = client.fetch_rules().await;

    assert!(matches!(result, Err(ServerError::UpstreamRequest(ref e)) if e.is_timeout()));
    assert!(started.elapsed() < Duration::from_secs(3));
}

#[tokio::test]
async fn serves_over_tcp() {
    let upstream = spawn_upstream(StatusCode::OK, RULES_QUIET).await;
    let server = make_server(&upstream, "type=healthz");

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    let router = server.router();
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });

    let client = reqwest::Client::new();
    let response = client
        .get(format!("http://{addr}/healthz"))
        .basic_auth("admin", Some("s3cret"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);

    let response = client
        .get(format!("http://{addr}/healthz"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 401);
}
