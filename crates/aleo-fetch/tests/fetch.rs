//! Fetcher tests against an in-process fake node.

use std::net::SocketAddr;
use std::time::Duration;

use aleo_fetch::{Credentials, DecodeError, FetchConfig, FetchError, Fetcher, StateSource};
use aleo_model::{ChannelSet, PayloadFormat};
use axum::{
    Json, Router,
    body::Body,
    http::{HeaderMap, StatusCode, header},
    response::IntoResponse,
    routing::{get, post},
};
use futures_util::stream;
use serde_json::{Value, json};

const EXPECTED_AUTH: &str = "Basic bm9kZTpzZWNyZXQ=";

fn node_state() -> Value {
    json!({
        "type": "validator",
        "status": "synced",
        "connected_sync_nodes": 1,
        "connected_peers": 5,
        "candidate_peers": 3,
        "cumulative_weight": 1200,
        "latest_block_height": 18500,
        "blocks_mined": [17999, 18001]
    })
}

const XML_STATE: &str = "<nodeState><type>prover</type>\
    <channel><name>a</name><status>synced</status><connectedSyncNodes>1</connectedSyncNodes>\
    <connectedPeers>4</connectedPeers><candidatePeers>2</candidatePeers>\
    <cumulativeWeight>7</cumulativeWeight><latestBlockHeight>100</latestBlockHeight></channel>\
    <channel><name>b</name><status>syncing</status><connectedSyncNodes>0</connectedSyncNodes>\
    <connectedPeers>1</connectedPeers><candidatePeers>0</candidatePeers>\
    <cumulativeWeight>3</cumulativeWeight><latestBlockHeight>50</latestBlockHeight></channel>\
    </nodeState>";

async fn json_state() -> Json<Value> {
    Json(node_state())
}

async fn rpc(Json(req): Json<Value>) -> Json<Value> {
    if req["method"] != "getnodestate" || req["jsonrpc"] != "2.0" {
        return Json(json!({
            "jsonrpc": "2.0",
            "id": req["id"],
            "error": { "code": -32601, "message": "Method not found" }
        }));
    }
    Json(json!({ "jsonrpc": "2.0", "id": req["id"], "result": node_state() }))
}

async fn xml_state() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "application/xml")], XML_STATE)
}

async fn protected(headers: HeaderMap) -> impl IntoResponse {
    match headers.get(header::AUTHORIZATION) {
        Some(value) if value == EXPECTED_AUTH => Json(node_state()).into_response(),
        _ => StatusCode::UNAUTHORIZED.into_response(),
    }
}

async fn anonymous_only(headers: HeaderMap) -> impl IntoResponse {
    if headers.contains_key(header::AUTHORIZATION) {
        return StatusCode::BAD_REQUEST.into_response();
    }
    Json(node_state()).into_response()
}

async fn broken() -> StatusCode {
    StatusCode::INTERNAL_SERVER_ERROR
}

async fn garbage() -> &'static str {
    "<html>upstream proxy error</html>"
}

async fn huge() -> String {
    "x".repeat(64 * 1024)
}

/// 64 KiB in 1 KiB chunks with no `Content-Length`.
async fn huge_chunked() -> Body {
    let chunks = (0..64).map(|_| Ok::<_, std::io::Error>(vec![b'x'; 1024]));
    Body::from_stream(stream::iter(chunks))
}

async fn slow() -> Json<Value> {
    tokio::time::sleep(Duration::from_secs(5)).await;
    Json(node_state())
}

async fn spawn_upstream() -> SocketAddr {
    let app = Router::new()
        .route("/json", get(json_state))
        .route("/rpc", post(rpc))
        .route("/xml", get(xml_state))
        .route("/protected", get(protected))
        .route("/anonymous", get(anonymous_only))
        .route("/broken", get(broken))
        .route("/garbage", get(garbage))
        .route("/huge", get(huge))
        .route("/huge-chunked", get(huge_chunked))
        .route("/slow", get(slow));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn config(addr: SocketAddr, path: &str, format: PayloadFormat) -> FetchConfig {
    FetchConfig {
        endpoint: format!("http://{addr}{path}"),
        format,
        timeout: Duration::from_millis(500),
        ..Default::default()
    }
}

fn fetcher(cfg: FetchConfig) -> Fetcher {
    Fetcher::new(cfg).expect("client builds")
}

#[tokio::test]
async fn fetches_bare_json() {
    let addr = spawn_upstream().await;
    let state = fetcher(config(addr, "/json", PayloadFormat::Json))
        .fetch()
        .await
        .unwrap();

    assert_eq!(state.node_type(), "validator");
    let ChannelSet::Implicit(ch) = state.channels() else {
        panic!("expected implicit channel");
    };
    assert_eq!(ch.connected_peers, 5);
    assert_eq!(ch.mined_blocks.before_threshold, 1);
    assert_eq!(ch.mined_blocks.after_threshold, 1);
}

#[tokio::test]
async fn fetches_json_rpc_with_post() {
    let addr = spawn_upstream().await;
    let state = fetcher(config(addr, "/rpc", PayloadFormat::JsonRpc))
        .fetch()
        .await
        .unwrap();
    assert_eq!(state.node_type(), "validator");
}

#[tokio::test]
async fn unknown_rpc_method_is_rpc_error() {
    let addr = spawn_upstream().await;
    let mut cfg = config(addr, "/rpc", PayloadFormat::JsonRpc);
    cfg.rpc_method = "getpeerinfo".into();

    let err = fetcher(cfg).fetch().await.unwrap_err();
    assert_eq!(err.cause(), "rpc");
    assert!(matches!(
        err,
        FetchError::Decode(DecodeError::Rpc { code: -32601, .. })
    ));
}

#[tokio::test]
async fn fetches_xml_channels() {
    let addr = spawn_upstream().await;
    let state = fetcher(config(addr, "/xml", PayloadFormat::Xml))
        .fetch()
        .await
        .unwrap();

    assert_eq!(state.node_type(), "prover");
    let names: Vec<_> = state.channels().iter().map(|(name, _)| name).collect();
    assert_eq!(names, vec![Some("a"), Some("b")]);
}

#[tokio::test]
async fn sends_basic_auth_when_configured() {
    let addr = spawn_upstream().await;
    let mut cfg = config(addr, "/protected", PayloadFormat::Json);
    cfg.credentials = Some(Credentials {
        username: "node".into(),
        password: Some("secret".into()),
    });

    let state = fetcher(cfg).fetch().await.unwrap();
    assert_eq!(state.node_type(), "validator");
}

#[tokio::test]
async fn missing_credentials_send_no_auth_header() {
    let addr = spawn_upstream().await;
    let state = fetcher(config(addr, "/anonymous", PayloadFormat::Json))
        .fetch()
        .await
        .unwrap();
    assert_eq!(state.node_type(), "validator");
}

#[tokio::test]
async fn bad_credentials_are_upstream_401() {
    let addr = spawn_upstream().await;
    let mut cfg = config(addr, "/protected", PayloadFormat::Json);
    cfg.credentials = Some(Credentials {
        username: "node".into(),
        password: Some("wrong".into()),
    });

    let err = fetcher(cfg).fetch().await.unwrap_err();
    assert!(matches!(err, FetchError::UpstreamError(401)));
    assert_eq!(err.cause(), "upstream");
}

#[tokio::test]
async fn server_error_is_upstream_500() {
    let addr = spawn_upstream().await;
    let err = fetcher(config(addr, "/broken", PayloadFormat::Json))
        .fetch()
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::UpstreamError(500)));
}

#[tokio::test]
async fn malformed_body_is_decode_error() {
    let addr = spawn_upstream().await;
    let err = fetcher(config(addr, "/garbage", PayloadFormat::Json))
        .fetch()
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::Decode(DecodeError::Json(_))));
    assert_eq!(err.cause(), "decode");
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let addr = spawn_upstream().await;
    let mut cfg = config(addr, "/huge", PayloadFormat::Json);
    cfg.max_body_bytes = 1024;

    let err = fetcher(cfg).fetch().await.unwrap_err();
    assert!(matches!(
        err,
        FetchError::Decode(DecodeError::BodyTooLarge { limit: 1024 })
    ));
}

#[tokio::test]
async fn oversized_chunked_body_is_rejected() {
    let addr = spawn_upstream().await;
    let mut cfg = config(addr, "/huge-chunked", PayloadFormat::Json);
    cfg.max_body_bytes = 1024;

    let err = fetcher(cfg).fetch().await.unwrap_err();
    assert!(matches!(
        err,
        FetchError::Decode(DecodeError::BodyTooLarge { limit: 1024 })
    ));
    assert_eq!(err.to_string(), "decode failed: response body exceeds 1024 bytes");
}

#[tokio::test]
async fn slow_upstream_times_out() {
    let addr = spawn_upstream().await;
    let mut cfg = config(addr, "/slow", PayloadFormat::Json);
    cfg.timeout = Duration::from_millis(100);

    let err = fetcher(cfg).fetch().await.unwrap_err();
    match err {
        FetchError::Unreachable(e) => assert!(e.is_timeout()),
        other => panic!("expected timeout, got {other}"),
    }
}

#[tokio::test]
async fn refused_connection_is_unreachable() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = fetcher(config(addr, "/json", PayloadFormat::Json))
        .fetch()
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::Unreachable(_)));
    assert_eq!(err.cause(), "unreachable");
}

#[tokio::test]
async fn state_source_reports_target() {
    let addr = spawn_upstream().await;
    let cfg = config(addr, "/json", PayloadFormat::Json);
    let expected = cfg.endpoint.clone();
    let source: Box<dyn StateSource> = Box::new(fetcher(cfg));

    assert_eq!(source.target(), expected);
    assert!(source.fetch().await.is_ok());
}
