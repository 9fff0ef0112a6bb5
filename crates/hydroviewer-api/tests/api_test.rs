//! Router-level tests: requests go through the full axum stack against a
//! temporary workspace, with the atlas and map server replaced by fakes.

use std::fs;
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use hydroviewer_api::{create_router, AppState};
use hydroviewer_core::config::LayeredConfig;
use hydroviewer_core::error::Result;
use hydroviewer_core::models::MapServerTarget;
use hydroviewer_core::ports::{AtlasSource, MapServer};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

const SOUTHERN_AFRICA: &str = r#"{
    "type": "FeatureCollection",
    "features": [{
        "type": "Feature",
        "properties": { "REGION": "Southern Africa" },
        "geometry": {
            "type": "Polygon",
            "coordinates": [[[20, -30], [30, -30], [30, -20], [20, -20], [20, -30]]]
        }
    }]
}"#;

struct FakeAtlas;

#[async_trait]
impl AtlasSource for FakeAtlas {
    async fn fetch_region_geojson(&self, _region: &str) -> Result<String> {
        Ok(SOUTHERN_AFRICA.to_string())
    }

    fn region_names(&self) -> &[&'static str] {
        &["Southern Africa"]
    }
}

struct AcceptingServer;

#[async_trait]
impl MapServer for AcceptingServer {
    async fn upload_shapefile(&self, _: &MapServerTarget, _: &str, _: Vec<u8>) -> Result<()> {
        Ok(())
    }
}

struct TestApp {
    _root: TempDir,
    router: Router,
}

impl TestApp {
    fn new() -> Self {
        let root = TempDir::new().unwrap();
        let mut config = LayeredConfig::with_defaults();
        config.workspace.value = root.path().to_path_buf();
        let ctx = config.to_context().unwrap();
        fs::create_dir_all(&ctx.shapefile_dir).unwrap();

        let state = AppState::new(ctx, Arc::new(FakeAtlas), Arc::new(AcceptingServer), None);
        let router = create_router(Arc::new(state), 1024 * 1024);
        Self {
            _root: root,
            router,
        }
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Request::get(uri).body(Body::empty()).unwrap()).await
    }

    async fn post_json(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    async fn post_empty(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Request::post(uri).body(Body::empty()).unwrap()).await
    }

    async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Request::delete(uri).body(Body::empty()).unwrap()).await
    }

    async fn create_project(&self, name: &str) {
        let (status, _) = self.post_json("/api/v1/projects", json!({ "name": name })).await;
        assert_eq!(status, StatusCode::CREATED);
    }
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new();
    let (status, body) = app.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "hydroviewer-api");
}

#[tokio::test]
async fn test_project_lifecycle() {
    let app = TestApp::new();

    let (status, body) = app.post_json("/api/v1/projects", json!({ "name": "Upper Nile" })).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["name"], "Upper_Nile");
    assert_eq!(body["title"], "Upper Nile");

    let (status, _) = app.post_json("/api/v1/projects", json!({ "name": "Upper  Nile" })).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = app.get("/api/v1/projects").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([{ "name": "Upper_Nile", "title": "Upper Nile" }]));

    let (status, body) = app.get("/api/v1/projects/Upper_Nile").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["boundaries"], false);
    assert_eq!(body["shapefiles"], false);

    let (status, _) = app.delete("/api/v1/projects/Upper_Nile").await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.get("/api/v1/projects/Upper_Nile").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["details"], "Project not found: Upper_Nile");
}

#[tokio::test]
async fn test_blank_project_name_is_rejected() {
    let app = TestApp::new();
    let (status, body) = app.post_json("/api/v1/projects", json!({ "name": "   " })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["details"].as_str().unwrap().contains("must not be empty"));
}

#[tokio::test]
async fn test_atlas_boundary_and_region_outside_store() {
    let app = TestApp::new();
    app.create_project("kalahari").await;

    let (status, body) = app.get("/api/v1/atlas-regions").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!(["Southern Africa"]));

    let (status, body) = app
        .post_json("/api/v1/projects/kalahari/boundaries", json!({ "esri": "Southern Africa" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["features"], 1);
    assert_eq!(body["source_crs"]["epsg"], 4326);

    let (status, body) = app.get("/api/v1/projects/kalahari/boundaries").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["type"], "FeatureCollection");

    // Empty geometry store
    let (status, body) = app.get("/api/v1/regions").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let (status, _) = app.get("/api/v1/projects/kalahari/region").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_boundary_input_errors() {
    let app = TestApp::new();
    app.create_project("inputs").await;

    let (status, _) =
        app.post_json("/api/v1/projects/inputs/boundaries", json!({ "esri": "Atlantis" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.post_json("/api/v1/projects/inputs/boundaries", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let point = json!({ "type": "Point", "coordinates": [0.0, 0.0] });
    let (status, _) =
        app.post_json("/api/v1/projects/inputs/boundaries", json!({ "geojson": point })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.get("/api/v1/projects/inputs/boundaries").await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = app
        .post_json("/api/v1/projects/missing/boundaries", json!({ "geojson": SOUTHERN_AFRICA }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_incomplete_shapefile_upload() {
    let app = TestApp::new();
    app.create_project("upload").await;

    let body = concat!(
        "--XBOUNDARY\r\n",
        "Content-Disposition: form-data; name=\"files\"; filename=\"basin.shp\"\r\n",
        "Content-Type: application/octet-stream\r\n\r\n",
        "not really a shapefile\r\n",
        "--XBOUNDARY--\r\n",
    );
    let request = Request::post("/api/v1/projects/upload/boundaries/shapefile")
        .header(header::CONTENT_TYPE, "multipart/form-data; boundary=XBOUNDARY")
        .body(Body::from(body))
        .unwrap();

    let (status, body) = app.send(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["details"].as_str().unwrap().contains(".shx"));
}

#[tokio::test]
async fn test_steps_out_of_order() {
    let app = TestApp::new();
    app.create_project("early").await;

    let (status, _) = app.post_empty("/api/v1/projects/early/clip?shapefile=boundary").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.post_empty("/api/v1/projects/early/clip?region=..%2Fetc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .post_empty("/api/v1/projects/early/clip?region=islands&shapefile=drainageline")
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = app.get("/api/v1/projects/early/export/zip").await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = app.get("/api/v1/projects/early/export/html").await;
    assert_eq!(status, StatusCode::CONFLICT);

    // No GeoServer configured and none given
    let (status, _) = app.post_empty("/api/v1/projects/early/export/geoserver").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .post_json(
            "/api/v1/projects/early/export/geoserver",
            json!({ "url": "http://localhost:8080/geoserver/rest/" }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}
