use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use tracing::info;
use utoipa::OpenApi;

use super::{
    dto::{HealthDto, MessageDto},
    errors::ApiError,
    AppState,
};
use crate::{
    db::models::{NeolightPatch, NeolightRecord},
    store::NeolightStore,
};

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// Fetch the current record of a device by name.
#[utoipa::path(
    get,
    path = "/api/neolight/{name}",
    params(
        ("name" = String, Path, description = "Device name (lookup key)"),
    ),
    responses(
        (status = 200, description = "Device record", body = NeolightRecord),
        (status = 404, description = "No record with this name", body = MessageDto),
        (status = 500, description = "Store unavailable", body = MessageDto),
    ),
    tag = "neolight"
)]
pub async fn get_neolight<S: NeolightStore>(
    State(state): State<AppState<S>>,
    Path(name): Path<String>,
) -> Result<Json<NeolightRecord>, ApiError> {
    let record = state
        .store
        .get_by_name(&name)
        .await
        .map_err(ApiError::read_failure)?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(record))
}

/// Create or partially update the record of a device by name.
///
/// Only the fields present in the body are written; every other stored field
/// keeps its value. The record is created on the first write for a name.
#[utoipa::path(
    put,
    path = "/api/neolight/{name}",
    params(
        ("name" = String, Path, description = "Device name (lookup key)"),
    ),
    request_body = NeolightPatch,
    responses(
        (status = 200, description = "Record after the update", body = NeolightRecord),
        (status = 400, description = "Malformed body or rejected value", body = MessageDto),
        (status = 500, description = "Store unavailable", body = MessageDto),
    ),
    tag = "neolight"
)]
pub async fn put_neolight<S: NeolightStore>(
    State(state): State<AppState<S>>,
    Path(name): Path<String>,
    payload: Result<Json<NeolightPatch>, JsonRejection>,
) -> Result<Json<NeolightRecord>, ApiError> {
    let Json(patch) = payload?;
    let record = state.store.upsert_by_name(&name, patch).await?;
    info!(name = %record.name, id = %record.id, "Neolight record upserted");

    Ok(Json(record))
}

// ---------------------------------------------------------------------------
// Health check
// ---------------------------------------------------------------------------

/// Returns `200 OK` with `{"status":"ok"}` when the server is running.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthDto),
    ),
    tag = "system"
)]
pub async fn health() -> Json<HealthDto> {
    Json(HealthDto {
        status: "ok".to_owned(),
    })
}

// ---------------------------------------------------------------------------
// OpenAPI spec
// ---------------------------------------------------------------------------

#[derive(OpenApi)]
#[openapi(
    paths(get_neolight, put_neolight, health),
    components(schemas(NeolightRecord, NeolightPatch, MessageDto, HealthDto)),
    tags(
        (name = "neolight", description = "Device record endpoints"),
        (name = "system",   description = "System endpoints"),
    ),
    info(
        title = "Neolight API",
        version = "0.1.0",
        description = "Latest telemetry and configuration per Neolight device"
    )
)]
pub struct ApiDoc;

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::{
        future::{self, Future},
        sync::Arc,
    };

    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::{json, Value};

    use crate::{
        api::router,
        db::models::{NeolightPatch, NeolightRecord},
        store::{InMemoryNeolightStore, NeolightStore, StoreError},
    };

    fn test_server() -> TestServer {
        TestServer::new(router(Arc::new(InMemoryNeolightStore::new()))).unwrap()
    }

    /// Behaves like a store whose database connection is down.
    struct UnreachableStore;

    impl NeolightStore for UnreachableStore {
        fn get_by_name(
            &self,
            _name: &str,
        ) -> impl Future<Output = Result<Option<NeolightRecord>, StoreError>> + Send {
            future::ready(Err(StoreError::Unavailable(sqlx::Error::PoolTimedOut)))
        }

        fn upsert_by_name(
            &self,
            _name: &str,
            _patch: NeolightPatch,
        ) -> impl Future<Output = Result<NeolightRecord, StoreError>> + Send {
            future::ready(Err(StoreError::Unavailable(sqlx::Error::PoolTimedOut)))
        }
    }

    /// Rejects every value the way Postgres rejects bad data.
    struct RejectingStore;

    impl NeolightStore for RejectingStore {
        fn get_by_name(
            &self,
            _name: &str,
        ) -> impl Future<Output = Result<Option<NeolightRecord>, StoreError>> + Send {
            future::ready(Err(StoreError::Validation(
                "invalid byte sequence for encoding \"UTF8\": 0x00".into(),
            )))
        }

        fn upsert_by_name(
            &self,
            _name: &str,
            _patch: NeolightPatch,
        ) -> impl Future<Output = Result<NeolightRecord, StoreError>> + Send {
            future::ready(Err(StoreError::Validation(
                "value out of range for type double precision".into(),
            )))
        }
    }

    // -----------------------------------------------------------------------
    // GET /api/neolight/{name}
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn get_unknown_device_returns_404() {
        let server = test_server();
        let resp = server.get("/api/neolight/unknown-device").await;
        resp.assert_status(StatusCode::NOT_FOUND);
        let body: Value = resp.json();
        assert_eq!(body, json!({ "message": "Device not found" }));
    }

    #[tokio::test]
    async fn get_returns_500_when_store_is_down() {
        let server = TestServer::new(router(Arc::new(UnreachableStore))).unwrap();
        let resp = server.get("/api/neolight/device1").await;
        resp.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = resp.json();
        assert!(!body["message"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn get_rejected_by_store_returns_500() {
        let server = TestServer::new(router(Arc::new(RejectingStore))).unwrap();
        let resp = server.get("/api/neolight/a%00b").await;
        resp.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = resp.json();
        assert_eq!(
            body["message"],
            "invalid byte sequence for encoding \"UTF8\": 0x00"
        );
    }

    // -----------------------------------------------------------------------
    // PUT /api/neolight/{name}
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn put_creates_record_on_fresh_store() {
        let server = test_server();
        let resp = server
            .put("/api/neolight/device1")
            .json(&json!({ "currentMode": "auto", "baseBrightness": 50 }))
            .await;
        resp.assert_status_ok();

        let body: Value = resp.json();
        assert_eq!(body["name"], "device1");
        assert_eq!(body["currentMode"], "auto");
        assert_eq!(body["baseBrightness"], 50.0);
        assert!(body["id"].is_string());
    }

    #[tokio::test]
    async fn put_subset_preserves_other_fields() {
        let server = test_server();
        server
            .put("/api/neolight/device1")
            .json(&json!({ "currentMode": "auto", "baseBrightness": 50 }))
            .await
            .assert_status_ok();

        let resp = server
            .put("/api/neolight/device1")
            .json(&json!({ "baseBrightness": 80 }))
            .await;
        resp.assert_status_ok();

        let body: Value = resp.json();
        assert_eq!(body["currentMode"], "auto");
        assert_eq!(body["baseBrightness"], 80.0);
    }

    #[tokio::test]
    async fn put_then_get_returns_every_written_field() {
        let server = test_server();
        let fields = json!({
            "currentMode": "motion",
            "appControlDuration": 30,
            "baseBrightness": 40,
            "motionBrightness": 100,
            "led1Working": true,
            "led2Working": false,
            "led3Working": true,
            "currentPower": 4.5,
            "totalEnergy": 120.25,
            "time": "18:30:00",
            "weather": "clouds",
            "sunrise": "06:01:12",
            "sunset": "18:45:09",
            "date": "16-10-2026",
        });
        server
            .put("/api/neolight/porch")
            .json(&fields)
            .await
            .assert_status_ok();

        let resp = server.get("/api/neolight/porch").await;
        resp.assert_status_ok();
        let body: Value = resp.json();

        for (key, value) in fields.as_object().unwrap() {
            match value.as_f64() {
                Some(n) => assert_eq!(body[key].as_f64(), Some(n), "field {key}"),
                None => assert_eq!(&body[key], value, "field {key}"),
            }
        }
        assert_eq!(body["name"], "porch");
    }

    #[tokio::test]
    async fn put_same_payload_twice_is_idempotent() {
        let server = test_server();
        let payload = json!({ "led1Working": false, "totalEnergy": 3.5 });

        let first: Value = server.put("/api/neolight/neo").json(&payload).await.json();
        let second: Value = server.put("/api/neolight/neo").json(&payload).await.json();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn put_omits_fields_never_written() {
        let server = test_server();
        let resp = server
            .put("/api/neolight/device2")
            .json(&json!({ "weather": "clear" }))
            .await;
        resp.assert_status_ok();

        let body: Value = resp.json();
        assert!(body.get("currentMode").is_none());
        assert!(body.get("led1Working").is_none());
    }

    #[tokio::test]
    async fn put_wrong_field_type_returns_400() {
        let server = test_server();
        let resp = server
            .put("/api/neolight/device1")
            .json(&json!({ "baseBrightness": "very bright" }))
            .await;
        resp.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = resp.json();
        assert!(!body["message"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn put_invalid_json_returns_400() {
        let server = test_server();
        let resp = server
            .put("/api/neolight/device1")
            .bytes("{ not json".into())
            .content_type("application/json")
            .await;
        resp.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = resp.json();
        assert!(body["message"].is_string());
    }

    #[tokio::test]
    async fn put_rejected_by_store_returns_400() {
        let server = TestServer::new(router(Arc::new(RejectingStore))).unwrap();
        let resp = server
            .put("/api/neolight/device1")
            .json(&json!({ "baseBrightness": 1e308 }))
            .await;
        resp.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = resp.json();
        assert_eq!(
            body["message"],
            "value out of range for type double precision"
        );
    }

    #[tokio::test]
    async fn put_returns_500_when_store_is_down() {
        let server = TestServer::new(router(Arc::new(UnreachableStore))).unwrap();
        let resp = server
            .put("/api/neolight/device1")
            .json(&json!({ "currentMode": "auto" }))
            .await;
        resp.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    }

    // -----------------------------------------------------------------------
    // GET /health, GET /api-docs/openapi.json
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn health_returns_ok() {
        let server = test_server();
        let resp = server.get("/health").await;
        resp.assert_status_ok();
        let body: Value = resp.json();
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn openapi_spec_is_served() {
        let server = test_server();
        let resp = server.get("/api-docs/openapi.json").await;
        resp.assert_status_ok();
        let body: Value = resp.json();
        assert_eq!(body["info"]["title"], "Neolight API");
        assert!(body["paths"]["/api/neolight/{name}"]["put"].is_object());
    }
}
