//! Router tests driven through `tower::ServiceExt::oneshot`.

use super::*;
use crate::aggregate::{HIRE_NOW_CAPTION, IMAGE_KIND, LINK_KIND, RELEASE_CODE_CAPTION};
use crate::hire::HireClient;
use crate::web::WebConfig;
use crate::workflow::{Fragment, MockWorkflow, Operation, WorkflowError};
use axum::body::Body;
use axum::http::Request;
use tower::ServiceExt as _;

fn app() -> (Router, AppState<MockWorkflow>, MockWorkflow) {
    let mock = MockWorkflow::new();
    let state = AppState::new(HireClient::new(mock.clone()), WebConfig::default());
    (create_router(state.clone(), "static"), state, mock)
}

fn search_response() -> Vec<Fragment> {
    vec![
        Fragment::new("lchs_searchresult_7_a")
            .with_kind(LINK_KIND)
            .with_name("Kings Cross")
            .with_subtitle("12 bikes"),
        Fragment::new("lchs_searchresult_7_b")
            .with_kind(IMAGE_KIND)
            .with_name(HIRE_NOW_CAPTION)
            .with_tag("Terminal", "300100")
            .with_tag("PointName", "Kings Cross, Station Rd"),
        Fragment::new("lchs_searchresult_8_a")
            .with_kind(LINK_KIND)
            .with_name("Pancras Road")
            .with_subtitle("0 bikes"),
    ]
}

fn code_response(code: &str) -> Vec<Fragment> {
    vec![
        Fragment::new("page_code")
            .with_name(RELEASE_CODE_CAPTION)
            .with_subtitle(code),
    ]
}

async fn send(router: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn send_html(router: Router, request: Request<Body>) -> (StatusCode, String) {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

fn post(uri: &str) -> Request<Body> {
    Request::post(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn health_is_ok() {
    let (router, _, _) = app();
    let (status, body) = send_html(router, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ok");
}

#[tokio::test]
async fn search_primes_and_returns_json() {
    let (router, state, mock) = app();
    mock.push_fragments(search_response());

    let (status, json) = send(router, get("/stations/search?q=Kings")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["query"], "Kings");
    assert_eq!(json["stations"].as_array().unwrap().len(), 2);
    assert_eq!(json["stations"][0]["hirable"], true);
    assert_eq!(json["stations"][1]["hirable"], false);

    assert_eq!(state.results.get("7").await.unwrap().name, "Kings Cross");
    let info = state.hire.lock().await.active_token_info();
    assert_eq!(info.source.as_deref(), Some("known_location:cromer_street"));
}

#[tokio::test]
async fn search_renders_html_for_browsers() {
    let (router, _, mock) = app();
    mock.push_fragments(search_response());

    let request = Request::get("/stations/search?q=Kings")
        .header(header::ACCEPT, "text/html")
        .body(Body::empty())
        .unwrap();
    let (status, html) = send_html(router, request).await;

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("/stations/7/release-code"));
    assert!(!html.contains("/stations/8/release-code"));
}

#[tokio::test]
async fn search_with_override_tokens() {
    let (router, state, mock) = app();
    mock.push_fragments(search_response());

    let (status, _) = send(
        router,
        get("/stations/search?q=Kings&encoding=abc&client_time=1748480905.5"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let calls = mock.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].tokens.encoding(), "abc");
    let info = state.hire.lock().await.active_token_info();
    assert_eq!(info.encoding.as_deref(), Some("abc"));
}

#[tokio::test]
async fn search_with_half_override_is_bad_request() {
    let (router, _, mock) = app();

    let (status, json) = send(router, get("/stations/search?q=Kings&encoding=abc")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("together"));
    assert_eq!(mock.call_count(), 0);
}

#[tokio::test]
async fn search_with_bad_client_time_is_bad_request() {
    let (router, _, _) = app();
    let (status, _) = send(
        router,
        get("/stations/search?q=Kings&encoding=abc&client_time=noon"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn search_failure_is_bad_gateway() {
    let (router, _, mock) = app();
    mock.push_status(500).push_status(500);

    let (status, json) = send(router, get("/stations/search?q=Kings")).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(json["error"].as_str().unwrap().starts_with("all token strategies failed"));
}

#[tokio::test]
async fn station_release_code_uses_cached_record() {
    let (router, _, mock) = app();
    mock.push_fragments(search_response())
        .push_fragments(code_response("4821"));

    let (status, _) = send(router.clone(), get("/stations/search?q=Kings")).await;
    assert_eq!(status, StatusCode::OK);

    let (status, json) = send(router, post("/stations/7/release-code")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["code"], "4821");
    assert_eq!(json["point_name"], "Kings Cross, Station Rd");

    assert_eq!(
        mock.calls()[1].operation,
        Operation::ConfirmHire {
            terminal_id: "300100".to_string(),
            point_name: "Kings Cross, Station Rd".to_string(),
        }
    );
}

#[tokio::test]
async fn station_id_with_slash_is_routable() {
    let (router, _, mock) = app();
    let mut results = search_response();
    results[1] = results[1].clone().with_tag("StationID", "BikePoints/7");
    mock.push_fragments(results)
        .push_fragments(code_response("4821"));

    let request = Request::get("/stations/search?q=Kings")
        .header(header::ACCEPT, "text/html")
        .body(Body::empty())
        .unwrap();
    let (status, html) = send_html(router.clone(), request).await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("/stations/BikePoints%2F7/release-code"));

    let (status, json) = send(router, post("/stations/BikePoints%2F7/release-code")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["code"], "4821");
}

#[tokio::test]
async fn remote_error_text_stays_out_of_response() {
    let (router, _, mock) = app();
    for _ in 0..3 {
        mock.push_failure(WorkflowError::Api {
            status: 500,
            message: "<img src=x onerror=alert(1)>".to_string(),
        });
    }

    let request = Request::post("/locations/cromer_street/release-code")
        .header(header::ACCEPT, "text/html")
        .body(Body::empty())
        .unwrap();
    let (status, json) = send(router, request).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    let error = json["error"].as_str().unwrap();
    assert!(error.starts_with("all token strategies failed"));
    assert!(!error.contains('<'));
    assert!(!error.contains("onerror"));
}

#[test]
fn remote_summaries_are_fixed_text() {
    let unauthorized = HireError::Transport(WorkflowError::Unauthorized { status: 403 });
    assert_eq!(
        remote_summary(&unauthorized),
        "the hire service rejected the session tokens"
    );
    let api = HireError::Transport(WorkflowError::Api {
        status: 500,
        message: "<script>".to_string(),
    });
    assert_eq!(remote_summary(&api), "the hire service request failed");
}

#[tokio::test]
async fn unknown_station_is_not_found() {
    let (router, _, mock) = app();
    let (status, _) = send(router, post("/stations/99/release-code")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(mock.call_count(), 0);
}

#[tokio::test]
async fn not_hirable_station_is_bad_request() {
    let (router, _, mock) = app();
    mock.push_fragments(search_response());
    send(router.clone(), get("/stations/search?q=Kings")).await;

    let (status, _) = send(router, post("/stations/8/release-code")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(mock.call_count(), 1);
}

#[tokio::test]
async fn location_release_code_html() {
    let (router, _, mock) = app();
    mock.push_fragments(code_response("9013"));

    let request = Request::post("/locations/taviton_street/release-code")
        .header(header::ACCEPT, "text/html")
        .body(Body::empty())
        .unwrap();
    let (status, html) = send_html(router, request).await;

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("9013"));
    assert!(html.contains("Taviton Street"));
}

#[tokio::test]
async fn unknown_location_is_not_found() {
    let (router, _, _) = app();
    let (status, _) = send(router, post("/locations/baker_street/release-code")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn no_strategy_is_conflict() {
    let mock = MockWorkflow::new();
    let state = AppState::new(
        HireClient::new(mock.clone()),
        WebConfig::default().with_prime_from(None),
    );
    let router = create_router(state, "static");

    let (status, _) = send(router, get("/stations/search?q=Kings")).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(mock.call_count(), 0);
}

#[tokio::test]
async fn token_lifecycle() {
    let (router, _, _) = app();

    let (status, json) = send(router.clone(), get("/tokens")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["active"], false);

    let request = Request::put("/tokens")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            r#"{"encoding":"Kv6OJKA1JWRui1R+UltG2iCZBcb3","client_time":"1748480905.5"}"#,
        ))
        .unwrap();
    let (status, json) = send(router.clone(), request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["active"], true);
    assert_eq!(json["encoding"], "Kv6OJKA1JWRui1R...");
    assert_eq!(json["source"], "user_set");

    let delete = Request::delete("/tokens").body(Body::empty()).unwrap();
    let (status, _) = send(router.clone(), delete).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, json) = send(router, get("/tokens")).await;
    assert_eq!(json["active"], false);
}

#[tokio::test]
async fn set_tokens_rejects_bad_client_time() {
    let (router, _, _) = app();
    let request = Request::put("/tokens")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"encoding":"abc","client_time":"yesterday"}"#))
        .unwrap();

    let (status, _) = send(router, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn prime_tokens_route() {
    let (router, _, _) = app();

    let (status, json) = send(router.clone(), post("/tokens/prime/warren_street_station")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["primed"], true);
    assert_eq!(json["tokens"]["source"], "known_location:warren_street_station");

    let (status, _) = send(router, post("/tokens/prime/nowhere")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn index_page_renders() {
    let (router, _, _) = app();
    let (status, html) = send_html(router, get("/")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("/locations/cromer_street/release-code"));
}
