//! Registry fetch lifecycle against a mock admin API
//!
//! Spins up an in-process axum server per test so the full HTTP path is
//! exercised: URL building, status handling, JSON decoding, and how each
//! outcome lands in the registry.

use axum::{Json, Router, http::StatusCode, http::header, response::IntoResponse, routing::get};
use oyster_client::{ClientConfig, FetchError, HttpClient, TableRegistry};
use shared::Table;
use tokio::net::TcpListener;

fn sample_tables() -> Vec<Table> {
    vec![
        Table {
            id: "1".to_string(),
            name: "Window 1".to_string(),
            is_occupied: true,
            qr_code: "qr-1".to_string(),
        },
        Table {
            id: "2".to_string(),
            name: "Window 2".to_string(),
            is_occupied: false,
            qr_code: "qr-2".to_string(),
        },
        Table {
            id: "3".to_string(),
            name: "Patio 3".to_string(),
            is_occupied: true,
            qr_code: "qr-3".to_string(),
        },
    ]
}

async fn list_tables() -> Json<Vec<Table>> {
    Json(sample_tables())
}

async fn raw_table_json() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/json")],
        r#"[{"id":"1","name":"T1","is_occupied":true,"qr_code":"q"}]"#,
    )
}

async fn not_json() -> &'static str {
    "this is not json"
}

async fn spawn_admin_api(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn client_for(base: &str) -> HttpClient {
    ClientConfig::new(base).with_timeout(2).build_client()
}

#[tokio::test]
async fn test_fetch_tables_preserves_server_order() {
    let app = Router::new().route("/admin/tables", get(list_tables));
    let base = spawn_admin_api(app).await;

    let tables = client_for(&base).fetch_tables().await.unwrap();

    assert_eq!(tables, sample_tables());
}

#[tokio::test]
async fn test_fetch_tables_decodes_wire_fields() {
    let app = Router::new().route("/admin/tables", get(raw_table_json));
    let base = spawn_admin_api(app).await;

    let tables = client_for(&base).fetch_tables().await.unwrap();

    assert_eq!(tables.len(), 1);
    assert_eq!(tables[0].id, "1");
    assert_eq!(tables[0].name, "T1");
    assert!(tables[0].is_occupied);
    assert_eq!(tables[0].qr_code, "q");
}

#[tokio::test]
async fn test_trailing_slash_in_base_url_still_resolves() {
    let app = Router::new().route("/admin/tables", get(list_tables));
    let base = spawn_admin_api(app).await;

    let tables = client_for(&format!("{base}/")).fetch_tables().await.unwrap();

    assert_eq!(tables.len(), 3);
}

#[tokio::test]
async fn test_refresh_replaces_local_state_with_server_order() {
    let app = Router::new().route("/admin/tables", get(list_tables));
    let base = spawn_admin_api(app).await;
    let client = client_for(&base);

    let mut registry = TableRegistry::new();
    registry.add_table(Table::new("Local only"));

    registry.refresh(&client).await;

    assert_eq!(registry.tables(), &sample_tables()[..]);
    assert!(!registry.is_loading());
    assert!(registry.error().is_none());
}

#[tokio::test]
async fn test_refresh_404_records_status_and_keeps_tables() {
    // No /admin/tables route, so the server answers 404
    let base = spawn_admin_api(Router::new()).await;
    let client = client_for(&base);

    let mut registry = TableRegistry::new();
    registry.add_table(Table::new("Survivor"));
    let before = registry.tables().to_vec();

    registry.refresh(&client).await;

    assert!(!registry.is_loading());
    assert!(registry.error().is_some_and(|e| e.contains("404")));
    assert_eq!(registry.tables(), &before[..]);
}

#[tokio::test]
async fn test_fetch_500_is_status_error() {
    let app = Router::new().route(
        "/admin/tables",
        get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
    );
    let base = spawn_admin_api(app).await;

    let err = client_for(&base).fetch_tables().await.unwrap_err();

    assert!(matches!(err, FetchError::Status(s) if s == StatusCode::INTERNAL_SERVER_ERROR));
}

#[tokio::test]
async fn test_fetch_malformed_body_is_transport_error() {
    let app = Router::new().route("/admin/tables", get(not_json));
    let base = spawn_admin_api(app).await;

    let err = client_for(&base).fetch_tables().await.unwrap_err();

    assert!(matches!(err, FetchError::Transport(_)));
}

#[tokio::test]
async fn test_refresh_connection_refused_records_error() {
    // Bind then drop to get a port with nothing listening on it
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = client_for(&format!("http://{addr}"));
    let mut registry = TableRegistry::new();

    registry.refresh(&client).await;

    assert!(!registry.is_loading());
    assert!(registry.error().is_some());
    assert!(registry.tables().is_empty());
}
