mod common;

use std::fs;
use std::sync::Arc;
use std::time::Duration;

use backroads_lib::{
    build_graph, fetch_graph, read_road_segments, Computed, Error, GraphCache, GraphSource,
    LatLng, RoadGraph, RoadPreferences, RouteEngine, RouteMode, DEFAULT_CLASS_PROPERTY,
};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::sample_roads_path;

fn sample_graph() -> RoadGraph {
    let segments =
        read_road_segments(&sample_roads_path(), DEFAULT_CLASS_PROPERTY).expect("fixture loads");
    build_graph(&segments)
}

/// Temp directory holding a freshly built sample graph.
struct GraphFixture {
    _dir: TempDir,
    path: std::path::PathBuf,
}

impl GraphFixture {
    fn new() -> Self {
        let dir = TempDir::new().expect("create temp dir");
        let path = dir.path().join("road_graph.json");
        sample_graph().write_to(&path).expect("graph written");
        Self { _dir: dir, path }
    }

    fn source(&self) -> GraphSource {
        GraphSource::File(self.path.clone())
    }
}

#[tokio::test]
async fn loads_graph_from_file_once() {
    let fixture = GraphFixture::new();
    let cache = GraphCache::new(fixture.source());

    let first = cache.load().await.expect("graph loads");
    assert_eq!(first.node_count(), 9);

    // Removing the file proves the second call is served from memory.
    fs::remove_file(&fixture.path).expect("remove graph file");
    let second = cache.load().await.expect("cached graph");
    assert!(Arc::ptr_eq(&first, &second));
}

#[tokio::test]
async fn missing_file_resolves_to_no_graph() {
    let dir = TempDir::new().expect("create temp dir");
    let cache = GraphCache::new(GraphSource::File(dir.path().join("absent.json")));
    assert!(cache.load().await.is_none());
}

#[tokio::test]
async fn malformed_file_resolves_to_no_graph() {
    let dir = TempDir::new().expect("create temp dir");
    let path = dir.path().join("broken.json");
    fs::write(&path, br#"{ "nodes": { "n0": { "id": "n0" } } "#).expect("write file");

    let cache = GraphCache::new(GraphSource::File(path));
    assert!(cache.load().await.is_none());
}

#[tokio::test]
async fn schema_violation_resolves_to_no_graph() {
    let dir = TempDir::new().expect("create temp dir");
    let path = dir.path().join("dangling.json");
    fs::write(
        &path,
        r#"{
            "nodes": {
                "n0": { "id": "n0", "position": { "lat": 0, "lng": 0 }, "edges": [
                    { "targetNodeId": "n9", "roadSegmentId": "x", "weight": 5, "roadClass": "local" }
                ] }
            },
            "metadata": { "nodeCount": 1, "edgeCount": 1, "generatedAt": "2024-05-01T00:00:00Z" }
        }"#,
    )
    .expect("write file");

    let cache = GraphCache::new(GraphSource::File(path));
    assert!(cache.load().await.is_none());
}

#[tokio::test]
async fn unreachable_url_resolves_to_no_graph() {
    let cache = GraphCache::new(GraphSource::Url(
        "http://127.0.0.1:9/road_graph.json".to_string(),
    ));
    assert!(cache.load().await.is_none());
}

#[tokio::test]
async fn http_error_status_resolves_to_no_graph() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/road_graph.json"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    let url = format!("{}/road_graph.json", server.uri());

    let error = fetch_graph(&reqwest::Client::new(), &GraphSource::Url(url.clone()))
        .await
        .expect_err("404 must not parse as a graph");
    assert!(
        matches!(error, Error::HttpStatus { status: 404, .. }),
        "unexpected error: {error}"
    );

    let cache = GraphCache::new(GraphSource::Url(url));
    assert!(cache.load().await.is_none());
}

#[tokio::test]
async fn loads_graph_from_url_with_one_request() {
    let server = MockServer::start().await;
    let body = sample_graph().to_json().expect("serialize graph");
    Mock::given(method("GET"))
        .and(path("/road_graph.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(1)
        .mount(&server)
        .await;

    let cache = GraphCache::new(GraphSource::Url(format!(
        "{}/road_graph.json",
        server.uri()
    )));
    let (first, second) = tokio::join!(cache.load(), cache.load());

    let first = first.expect("graph loads over http");
    assert_eq!(first.node_count(), 9);
    assert!(Arc::ptr_eq(&first, &second.expect("shared graph")));
}

#[tokio::test]
async fn concurrent_loads_share_one_failed_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/road_graph.json"))
        .respond_with(ResponseTemplate::new(503).set_delay(Duration::from_millis(50)))
        .expect(1)
        .mount(&server)
        .await;

    let cache = GraphCache::new(GraphSource::Url(format!(
        "{}/road_graph.json",
        server.uri()
    )));
    let (a, b, c, d) = tokio::join!(cache.load(), cache.load(), cache.load(), cache.load());

    assert!([a, b, c, d].iter().all(Option::is_none));
}

#[tokio::test]
async fn engine_degrades_to_straight_lines_without_graph() {
    let engine = RouteEngine::new(GraphCache::unavailable());
    let waypoints = [LatLng::new(49.0, -123.0), LatLng::new(49.0, -122.98)];

    let route = engine
        .route(&waypoints, &RoadPreferences::default())
        .await
        .expect("route");
    assert_eq!(route.mode, RouteMode::StraightLine);
    assert_eq!(route.path, waypoints.to_vec());
}

#[tokio::test]
async fn concurrent_engine_requests_share_the_graph() {
    let fixture = GraphFixture::new();
    let engine = RouteEngine::new(GraphCache::new(fixture.source()));
    let prefs = RoadPreferences::default();
    let a = [LatLng::new(49.0, -123.0), LatLng::new(49.0, -122.98)];
    let b = [LatLng::new(49.0, -122.99), LatLng::new(49.0, -122.96)];

    let ticket = engine.begin();
    let (first, second) = tokio::join!(
        engine.compute(&ticket, &a, &prefs),
        engine.compute(&ticket, &b, &prefs),
    );

    for computed in [first, second] {
        match computed {
            Computed::Current(Some(route)) => {
                assert_eq!(route.mode, RouteMode::Graph);
                assert_eq!(route.straight_line_legs(), 0);
            }
            other => panic!("expected a current route, got {other:?}"),
        }
    }
}
