//! Tests for the lookup proxy against an in-process mock IDM.

use std::collections::HashMap;

use axum::{
  Json, Router,
  extract::{Query, RawQuery},
  http::{HeaderMap, StatusCode, header},
  response::{IntoResponse, Response},
  routing::get,
};
use serde_json::json;
use tokio::net::TcpListener;

use crate::{
  Error, IdmClient, LookupConfig, LookupQuery, query::normalize_date_of_birth,
};

const TOKEN: &str = "Bearer someToken";

// ─── Mock upstream ───────────────────────────────────────────────────────────

/// Mirrors the IDM: 401 without credentials, 400 for an empty search, a JSON
/// hit for John Doe and an empty JSON list otherwise.
async fn mock_search(
  headers: HeaderMap,
  Query(params): Query<HashMap<String, String>>,
) -> Response {
  if !headers.contains_key(header::AUTHORIZATION) {
    return StatusCode::UNAUTHORIZED.into_response();
  }
  if params.is_empty() {
    return (StatusCode::BAD_REQUEST, "at least one search parameter is required")
      .into_response();
  }
  let john_doe = params.get("givenname").map(String::as_str) == Some("John")
    && params.get("surname").map(String::as_str) == Some("Doe")
    && params.get("date_of_birth").map(String::as_str) == Some("19981224");
  if john_doe {
    ([(header::CONTENT_TYPE, "application/json")], "[{\"unilogin\":\"jdo42\"}]")
      .into_response()
  } else {
    ([(header::CONTENT_TYPE, "application/json")], "[]").into_response()
  }
}

/// Echoes the raw query string and `Authorization` header.
async fn echo(headers: HeaderMap, RawQuery(query): RawQuery) -> Json<serde_json::Value> {
  let auth = headers
    .get(header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .map(str::to_owned);
  Json(json!({ "query": query, "authorization": auth }))
}

async fn spawn_upstream() -> String {
  let app = Router::new()
    .route("/idm-connect/searchidm", get(mock_search))
    .route("/echo", get(echo))
    .route("/teapot", get(|| async { (StatusCode::IM_A_TEAPOT, "short and stout") }))
    .route("/empty", get(|| async { StatusCode::NO_CONTENT }));
  let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
  let addr = listener.local_addr().unwrap();
  tokio::spawn(async move {
    axum::serve(listener, app).await.unwrap();
  });
  format!("http://{addr}")
}

fn client(url: Option<String>, token: Option<&str>) -> IdmClient {
  IdmClient::new(LookupConfig { url, token: token.map(str::to_owned) }).unwrap()
}

fn john_doe() -> LookupQuery {
  LookupQuery {
    first_name:    Some("John".into()),
    last_name:     Some("Doe".into()),
    date_of_birth: Some("1998-12-24".into()),
  }
}

async fn echoed(base: &str, token: Option<&str>, query: &LookupQuery) -> serde_json::Value {
  let relayed = client(Some(format!("{base}/echo")), token)
    .search(query)
    .await
    .unwrap();
  serde_json::from_slice(&relayed.body).unwrap()
}

// ─── Date normalisation ──────────────────────────────────────────────────────

#[test]
fn iso_dates_are_compacted() {
  assert_eq!(normalize_date_of_birth("1998-12-24"), "19981224");
  assert_eq!(normalize_date_of_birth("2000-02-29"), "20000229");
}

#[test]
fn unparseable_dates_pass_through() {
  assert_eq!(normalize_date_of_birth("24.12.1998"), "24.12.1998");
  assert_eq!(normalize_date_of_birth("1999-02-29"), "1999-02-29");
  assert_eq!(normalize_date_of_birth(""), "");
}

#[test]
fn loosely_formatted_dates_pass_through() {
  for raw in ["1998-1-5", "+1998-12-24", " 1998-12-24", "1998-12-24 ", "1998/12/24"] {
    assert_eq!(normalize_date_of_birth(raw), raw, "{raw:?}");
  }
}

#[test]
fn absent_fields_are_not_forwarded() {
  let q = LookupQuery { last_name: Some("Doe".into()), ..LookupQuery::default() };
  assert_eq!(q.upstream_params(), vec![("surname", "Doe".to_owned())]);
  assert!(LookupQuery::default().upstream_params().is_empty());
}

// ─── Configuration errors ────────────────────────────────────────────────────

#[tokio::test]
async fn missing_url_fails_without_request() {
  let err = client(None, Some(TOKEN)).search(&john_doe()).await.unwrap_err();
  assert!(matches!(err, Error::NotConfigured));
  assert_eq!(err.to_string(), crate::error::MSG_IDM_URL_NOT_SET);
}

#[tokio::test]
async fn empty_or_relative_url_is_invalid() {
  for url in ["", "idm-connect/searchidm", "ftp://example.org/idm"] {
    let err = client(Some(url.into()), Some(TOKEN))
      .search(&john_doe())
      .await
      .unwrap_err();
    assert!(matches!(err, Error::InvalidUrl { .. }), "{url:?}: {err}");
  }
}

#[tokio::test]
async fn unsendable_token_is_rejected() {
  let base = spawn_upstream().await;
  let err = client(Some(format!("{base}/echo")), Some("bad\ntoken"))
    .search(&john_doe())
    .await
    .unwrap_err();
  assert!(matches!(err, Error::InvalidCredential));
}

// ─── Outbound request shape ──────────────────────────────────────────────────

#[tokio::test]
async fn query_carries_compacted_date_and_token() {
  let base = spawn_upstream().await;
  let body = echoed(&base, Some(TOKEN), &john_doe()).await;

  assert_eq!(
    body["query"],
    "givenname=John&surname=Doe&date_of_birth=19981224"
  );
  assert_eq!(body["authorization"], TOKEN);
}

#[tokio::test]
async fn malformed_date_is_forwarded_verbatim() {
  let base = spawn_upstream().await;
  let q = LookupQuery {
    date_of_birth: Some("24.12.1998".into()),
    ..LookupQuery::default()
  };
  let body = echoed(&base, Some(TOKEN), &q).await;
  assert_eq!(body["query"], "date_of_birth=24.12.1998");
}

#[tokio::test]
async fn missing_token_omits_authorization_header() {
  let base = spawn_upstream().await;
  let body = echoed(&base, None, &john_doe()).await;
  assert!(body["authorization"].is_null());
}

// ─── Relay ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn successful_search_is_relayed() {
  let base = spawn_upstream().await;
  let relayed = client(Some(format!("{base}/idm-connect/searchidm")), Some(TOKEN))
    .search(&john_doe())
    .await
    .unwrap();

  assert_eq!(relayed.status, StatusCode::OK);
  assert_eq!(relayed.content_type.unwrap(), "application/json");
  assert_eq!(&relayed.body[..], b"[{\"unilogin\":\"jdo42\"}]");
}

#[tokio::test]
async fn upstream_rejection_of_empty_search_is_relayed() {
  let base = spawn_upstream().await;
  let relayed = client(Some(format!("{base}/idm-connect/searchidm")), Some(TOKEN))
    .search(&LookupQuery::default())
    .await
    .unwrap();

  assert_eq!(relayed.status, StatusCode::BAD_REQUEST);
  assert_eq!(&relayed.body[..], b"at least one search parameter is required");
}

#[tokio::test]
async fn upstream_unauthorized_is_relayed() {
  let base = spawn_upstream().await;
  let relayed = client(Some(format!("{base}/idm-connect/searchidm")), None)
    .search(&john_doe())
    .await
    .unwrap();
  assert_eq!(relayed.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn unusual_statuses_and_missing_content_type_are_relayed() {
  let base = spawn_upstream().await;

  let teapot = client(Some(format!("{base}/teapot")), None)
    .search(&LookupQuery::default())
    .await
    .unwrap();
  assert_eq!(teapot.status, StatusCode::IM_A_TEAPOT);
  assert_eq!(&teapot.body[..], b"short and stout");

  let empty = client(Some(format!("{base}/empty")), None)
    .search(&LookupQuery::default())
    .await
    .unwrap();
  assert_eq!(empty.status, StatusCode::NO_CONTENT);
  assert!(empty.content_type.is_none());
  assert!(empty.body.is_empty());
}

#[tokio::test]
async fn unreachable_upstream_is_unavailable() {
  let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
  let addr = listener.local_addr().unwrap();
  drop(listener);

  let err = client(Some(format!("http://{addr}/idm")), Some(TOKEN))
    .search(&john_doe())
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Unavailable(_)));
}
