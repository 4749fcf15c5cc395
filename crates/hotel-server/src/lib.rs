//! HTTP front end for the hotel front desk.
//!
//! Mounts the JSON API from `hotel-api` under `/api` and wraps it with CORS,
//! request tracing and a JSON 404 fallback.

use std::{path::PathBuf, sync::Arc, time::Duration};

use axum::{
  Json, Router,
  http::{
    Method, StatusCode,
    header::{AUTHORIZATION, CONTENT_TYPE},
  },
  response::IntoResponse,
};
use hotel_core::store::FrontDeskStore;
use hotel_store_sqlite::PoolOptions;
use serde::Deserialize;
use serde_json::json;
use tower_http::{
  cors::{Any, CorsLayer},
  trace::TraceLayer,
};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `HOTEL_*` environment variables. Every field has a default.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
  pub host:               String,
  pub port:               u16,
  pub store_path:         PathBuf,
  /// Number of pooled database connections.
  pub pool_size:          usize,
  /// Longest a request waits for a free connection before failing with 503.
  pub acquire_timeout_ms: u64,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:               "127.0.0.1".to_owned(),
      port:               3000,
      store_path:         PathBuf::from("hotel.sqlite3"),
      pool_size:          10,
      acquire_timeout_ms: 5000,
    }
  }
}

impl ServerConfig {
  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }

  pub fn pool_options(&self) -> PoolOptions {
    PoolOptions {
      size:            self.pool_size,
      acquire_timeout: Duration::from_millis(self.acquire_timeout_ms),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the complete application [`Router`] for `store`.
pub fn router<S>(store: Arc<S>) -> Router
where
  S: FrontDeskStore + 'static,
{
  Router::new()
    .nest(
      "/api",
      hotel_api::api_router(store).method_not_allowed_fallback(route_not_found),
    )
    .fallback(route_not_found)
    .layer(TraceLayer::new_for_http())
    .layer(cors_layer())
}

/// Any origin may call the API; preflight requests are answered here.
pub fn cors_layer() -> CorsLayer {
  CorsLayer::new()
    .allow_origin(Any)
    .allow_methods([
      Method::GET,
      Method::POST,
      Method::PUT,
      Method::DELETE,
      Method::OPTIONS,
    ])
    .allow_headers([CONTENT_TYPE, AUTHORIZATION])
}

async fn route_not_found() -> impl IntoResponse {
  (StatusCode::NOT_FOUND, Json(json!({ "error": "route not found" })))
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, header},
  };
  use hotel_store_sqlite::SqliteStore;
  use serde_json::Value;
  use tower::ServiceExt as _;

  async fn app() -> Router {
    let store = SqliteStore::open_in_memory().await.unwrap();
    router(Arc::new(store))
  }

  async fn send(
    app:    &Router,
    method: &str,
    uri:    &str,
    body:   Option<Value>,
  ) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
      Some(v) => {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
        Body::from(v.to_string())
      }
      None => Body::empty(),
    };
    let resp = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
      Value::Null
    } else {
      serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
  }

  fn ana() -> Value {
    json!({ "nombre": "Ana", "email": "a@x.com", "documento_identidad": "123" })
  }

  fn bruno() -> Value {
    json!({ "nombre": "Bruno", "email": "b@x.com", "documento_identidad": "456" })
  }

  fn check_in(guest: i64, room: &str) -> Value {
    json!({
      "huesped_id": guest,
      "numero_habitacion": room,
      "tipo_habitacion": "single",
      "fecha_checkin": "2024-01-01",
    })
  }

  // ── Front-desk scenario ─────────────────────────────────────────────────────

  #[tokio::test]
  async fn check_in_and_out_scenario() {
    let app = app().await;

    let (status, body) = send(&app, "POST", "/api/huespedes", Some(ana())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], 1);
    assert_eq!(body["success"], true);

    let (status, body) =
      send(&app, "POST", "/api/registros", Some(check_in(1, "101"))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], 1);

    let (_, active) = send(&app, "GET", "/api/registros/activos", None).await;
    assert_eq!(active.as_array().unwrap().len(), 1);
    assert_eq!(active[0]["estado"], "activo");
    assert_eq!(active[0]["nombre"], "Ana");
    assert_eq!(active[0]["numero_habitacion"], "101");
    assert!(
      active[0]["fecha_checkin"]
        .as_str()
        .unwrap()
        .starts_with("2024-01-01T00:00:00")
    );

    send(&app, "POST", "/api/huespedes", Some(bruno())).await;
    let (status, body) =
      send(&app, "POST", "/api/registros", Some(check_in(2, "101"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("101"));

    let (status, body) = send(
      &app,
      "PUT",
      "/api/registros/1/checkout",
      Some(json!({ "total_pagado": 50 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert!(body["fecha_checkout"].is_string());

    let (status, _) = send(
      &app,
      "PUT",
      "/api/registros/1/checkout",
      Some(json!({ "total_pagado": 70 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, history) = send(&app, "GET", "/api/registros/historial", None).await;
    assert_eq!(history.as_array().unwrap().len(), 1);
    assert_eq!(history[0]["estado"], "finalizado");
    assert_eq!(history[0]["total_pagado"], 50.0);

    let (_, active) = send(&app, "GET", "/api/registros/activos", None).await;
    assert!(active.as_array().unwrap().is_empty());
  }

  // ── Guest directory ─────────────────────────────────────────────────────────

  #[tokio::test]
  async fn missing_guest_fields_are_rejected() {
    let app = app().await;
    let (status, body) = send(
      &app,
      "POST",
      "/api/huespedes",
      Some(json!({ "nombre": "Ana", "email": "a@x.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("documento_identidad"));
  }

  #[tokio::test]
  async fn duplicate_document_is_rejected() {
    let app = app().await;
    send(&app, "POST", "/api/huespedes", Some(ana())).await;
    let (status, _) = send(&app, "POST", "/api/huespedes", Some(ana())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, guests) = send(&app, "GET", "/api/huespedes", None).await;
    assert_eq!(guests.as_array().unwrap().len(), 1);
  }

  #[tokio::test]
  async fn guest_lookup_status_codes() {
    let app = app().await;
    send(&app, "POST", "/api/huespedes", Some(ana())).await;

    let (status, body) = send(&app, "GET", "/api/huespedes/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["documento_identidad"], "123");

    let (status, body) = send(&app, "GET", "/api/huespedes/9", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());

    let (status, _) = send(&app, "GET", "/api/huespedes/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn update_guest_replaces_fields() {
    let app = app().await;
    send(&app, "POST", "/api/huespedes", Some(ana())).await;

    let changed = json!({
      "nombre": "Ana María",
      "email": "ana@x.com",
      "documento_identidad": "123",
      "nacionalidad": "PE",
    });
    let (status, body) =
      send(&app, "PUT", "/api/huespedes/1", Some(changed.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (_, guest) = send(&app, "GET", "/api/huespedes/1", None).await;
    assert_eq!(guest["nombre"], "Ana María");
    assert_eq!(guest["nacionalidad"], "PE");

    let (status, _) = send(&app, "PUT", "/api/huespedes/5", Some(changed)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn delete_guest_waits_for_checkout() {
    let app = app().await;
    send(&app, "POST", "/api/huespedes", Some(ana())).await;
    send(&app, "POST", "/api/registros", Some(check_in(1, "101"))).await;

    let (status, _) = send(&app, "DELETE", "/api/huespedes/1", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    send(&app, "PUT", "/api/registros/1/checkout", None).await;
    let (status, body) = send(&app, "DELETE", "/api/huespedes/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (status, _) = send(&app, "DELETE", "/api/huespedes/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // The finished stay outlives its guest, detached from them.
    let (status, history) =
      send(&app, "GET", "/api/registros/historial", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(history.as_array().unwrap().len(), 1);
    assert_eq!(history[0]["id"], 1);
    assert_eq!(history[0]["huesped_id"], Value::Null);
    assert_eq!(history[0]["estado"], "finalizado");
  }

  // ── Stay ledger ─────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn check_in_for_unknown_guest_is_bad_request() {
    let app = app().await;
    let (status, body) =
      send(&app, "POST", "/api/registros", Some(check_in(42, "101"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("42"));
  }

  #[tokio::test]
  async fn check_in_rejects_years_beyond_four_digits() {
    let app = app().await;
    send(&app, "POST", "/api/huespedes", Some(ana())).await;

    for when in ["-0001-01-01", "+10000-01-01T00:00"] {
      let mut body = check_in(1, "101");
      body["fecha_checkin"] = json!(when);
      let (status, body) = send(&app, "POST", "/api/registros", Some(body)).await;
      assert_eq!(status, StatusCode::BAD_REQUEST, "{when}");
      assert!(body["error"].is_string(), "{when}");
    }

    let mut body = check_in(1, "101");
    body["fecha_checkout_estimada"] = json!("10000-01-01");
    let (status, _) = send(&app, "POST", "/api/registros", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    for uri in ["/api/registros", "/api/registros/activos", "/api/registros/historial"] {
      let (status, body) = send(&app, "GET", uri, None).await;
      assert_eq!(status, StatusCode::OK, "{uri}");
      assert_eq!(body, json!([]), "{uri}");
    }
  }

  #[tokio::test]
  async fn mistyped_json_body_is_bad_request() {
    let app = app().await;
    send(&app, "POST", "/api/huespedes", Some(ana())).await;

    let mut body = check_in(1, "101");
    body["huesped_id"] = json!("1");
    let (status, body) = send(&app, "POST", "/api/registros", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, body) = send(
      &app,
      "POST",
      "/api/huespedes",
      Some(json!({ "nombre": 7, "email": "c@x.com", "documento_identidad": "789" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, body) = send(
      &app,
      "PUT",
      "/api/registros/1/checkout",
      Some(json!("nope")),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, _) = send(&app, "GET", "/api/registros", None).await;
    assert_eq!(status, StatusCode::OK);
  }

  #[tokio::test]
  async fn check_in_rejects_checkout_before_checkin() {
    let app = app().await;
    send(&app, "POST", "/api/huespedes", Some(ana())).await;

    let mut body = check_in(1, "101");
    body["fecha_checkout_estimada"] = json!("2023-12-31");
    let (status, _) = send(&app, "POST", "/api/registros", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn stay_listing_carries_nights() {
    let app = app().await;
    send(&app, "POST", "/api/huespedes", Some(ana())).await;

    let mut body = check_in(1, "101");
    body["fecha_checkout_estimada"] = json!("2024-01-03");
    send(&app, "POST", "/api/registros", Some(body)).await;

    let (status, stay) = send(&app, "GET", "/api/registros/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stay["noches"], 2);
    assert_eq!(stay["email"], "a@x.com");

    let (status, _) = send(&app, "GET", "/api/registros/2", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn checkout_accepts_text_and_empty_totals() {
    let app = app().await;
    send(&app, "POST", "/api/huespedes", Some(ana())).await;
    send(&app, "POST", "/api/registros", Some(check_in(1, "101"))).await;
    send(&app, "POST", "/api/registros", Some(check_in(1, "102"))).await;
    send(&app, "POST", "/api/registros", Some(check_in(1, "103"))).await;

    let (status, _) = send(
      &app,
      "PUT",
      "/api/registros/1/checkout",
      Some(json!({ "total_pagado": "abc" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
      &app,
      "PUT",
      "/api/registros/1/checkout",
      Some(json!({ "total_pagado": "80.5" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, "PUT", "/api/registros/2/checkout", None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
      &app,
      "PUT",
      "/api/registros/3/checkout",
      Some(json!({ "total_pagado": "" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, stay) = send(&app, "GET", "/api/registros/1", None).await;
    assert_eq!(stay["total_pagado"], 80.5);
    let (_, stay) = send(&app, "GET", "/api/registros/2", None).await;
    assert_eq!(stay["total_pagado"], 0.0);
  }

  #[tokio::test]
  async fn update_stay_status_codes() {
    let app = app().await;
    send(&app, "POST", "/api/huespedes", Some(ana())).await;
    send(&app, "POST", "/api/huespedes", Some(bruno())).await;
    send(&app, "POST", "/api/registros", Some(check_in(1, "101"))).await;
    send(&app, "POST", "/api/registros", Some(check_in(2, "102"))).await;

    let moved = json!({
      "numero_habitacion": "201",
      "tipo_habitacion": "suite",
      "observaciones": "upgrade",
    });
    let (status, _) =
      send(&app, "PUT", "/api/registros/1", Some(moved.clone())).await;
    assert_eq!(status, StatusCode::OK);

    let (_, stay) = send(&app, "GET", "/api/registros/1", None).await;
    assert_eq!(stay["numero_habitacion"], "201");
    assert_eq!(stay["observaciones"], "upgrade");

    // Room 201 is now held by stay 1.
    let (status, _) = send(&app, "PUT", "/api/registros/2", Some(moved)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
      &app,
      "PUT",
      "/api/registros/2",
      Some(json!({ "numero_habitacion": "", "tipo_habitacion": "suite" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    send(&app, "PUT", "/api/registros/2/checkout", None).await;
    let (status, _) = send(
      &app,
      "PUT",
      "/api/registros/2",
      Some(json!({ "numero_habitacion": "301", "tipo_habitacion": "single" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  // ── Availability ────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn exhausted_pool_is_service_unavailable() {
    let store = SqliteStore::open_in_memory_with_timeout(
      std::time::Duration::from_millis(50),
    )
    .await
    .unwrap();
    let held = store.pool().acquire().await.unwrap();
    let app = router(Arc::new(store));

    let (status, body) = send(&app, "GET", "/api/huespedes", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(body["error"].is_string());

    drop(held);
    let (status, _) = send(&app, "GET", "/api/huespedes", None).await;
    assert_eq!(status, StatusCode::OK);
  }

  // ── Plumbing ────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn liveness_endpoint_answers() {
    let app = app().await;
    let (status, body) = send(&app, "GET", "/api/test", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].is_string());
    assert!(body["timestamp"].is_string());
  }

  #[tokio::test]
  async fn unknown_route_is_json_404() {
    let app = app().await;
    // Unknown paths, and known paths under a method they do not serve.
    for (method, uri) in [
      ("GET", "/nope"),
      ("GET", "/api/nope"),
      ("DELETE", "/api/registros/1"),
      ("PATCH", "/api/huespedes"),
      ("POST", "/api/registros/activos"),
    ] {
      let (status, body) = send(&app, method, uri, None).await;
      assert_eq!(status, StatusCode::NOT_FOUND, "{method} {uri}");
      assert_eq!(body, json!({ "error": "route not found" }), "{method} {uri}");
    }
  }

  #[tokio::test]
  async fn cors_preflight_is_answered() {
    let app = app().await;
    let req = Request::builder()
      .method("OPTIONS")
      .uri("/api/huespedes")
      .header(header::ORIGIN, "http://localhost:8080")
      .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
      .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
      .body(Body::empty())
      .unwrap();
    let resp = app.oneshot(req).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let origin = resp
      .headers()
      .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
      .unwrap();
    assert_eq!(origin, "*");
    let methods = resp
      .headers()
      .get(header::ACCESS_CONTROL_ALLOW_METHODS)
      .unwrap()
      .to_str()
      .unwrap();
    assert!(methods.contains("DELETE"), "methods: {methods}");
  }

  // ── Configuration ───────────────────────────────────────────────────────────

  #[test]
  fn config_file_overrides_defaults() {
    let settings = config::Config::builder()
      .add_source(config::File::from_str(
        "port = 8080\npool_size = 4",
        config::FileFormat::Toml,
      ))
      .build()
      .unwrap();
    let cfg: ServerConfig = settings.try_deserialize().unwrap();

    assert_eq!(cfg.port, 8080);
    assert_eq!(cfg.pool_size, 4);
    assert_eq!(cfg.host, "127.0.0.1");
    assert_eq!(cfg.store_path, PathBuf::from("hotel.sqlite3"));
    assert_eq!(cfg.address(), "127.0.0.1:8080");
    assert_eq!(
      cfg.pool_options().acquire_timeout,
      Duration::from_millis(5000)
    );
  }
}
