use super::*;
use std::sync::Arc;

use anyhow::Result;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use serde_json::json;
use shared::{domain::CreatedOn, error::ErrorCode};
use tokio::{net::TcpListener, sync::Mutex};

#[derive(Clone, Default)]
struct StubState {
    created: Arc<Mutex<Vec<serde_json::Value>>>,
    status_updates: Arc<Mutex<Vec<(String, serde_json::Value)>>>,
}

async fn stub_types() -> Json<serde_json::Value> {
    Json(json!([
        { "id": "1", "name": "scientific" },
        { "id": 2, "name": "thesis" }
    ]))
}

async fn stub_publications() -> Json<serde_json::Value> {
    Json(json!([
        {
            "id": "1",
            "title": "Graph theory",
            "type": "scientific",
            "isCollectiveAuthors": false,
            "authors": "Ivanova A.",
            "coauthors": "",
            "contactName": "Ivanova A.",
            "contactPhone": "+7",
            "contactEmail": "a@example.org",
            "createdAt": "1.1.2024",
            "status": "pending"
        },
        {
            "id": "2",
            "title": "Broken date",
            "type": "thesis",
            "createdAt": "2024-01-02",
            "status": "approved"
        },
        {
            "id": 3,
            "title": "Unknown status",
            "type": "thesis",
            "createdAt": "3.1.2024",
            "status": "archived"
        },
        {
            "id": 4,
            "title": "Numeric id",
            "type": "thesis",
            "createdAt": "04.01.2024",
            "status": "rejected"
        }
    ]))
}

async fn stub_create(
    State(state): State<StubState>,
    Json(body): Json<serde_json::Value>,
) -> (StatusCode, Json<serde_json::Value>) {
    state.created.lock().await.push(body.clone());
    let mut record = body;
    record["id"] = json!("50");
    (StatusCode::CREATED, Json(record))
}

async fn stub_update(
    State(state): State<StubState>,
    Path(id): Path<String>,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<serde_json::Value>, (StatusCode, Json<ApiError>)> {
    if id != "1" {
        return Err((
            StatusCode::NOT_FOUND,
            Json(ApiError::new(ErrorCode::NotFound, "publication not found")),
        ));
    }
    state
        .status_updates
        .lock()
        .await
        .push((id.clone(), body.clone()));
    Ok(Json(json!({
        "id": id,
        "title": "Graph theory",
        "type": "scientific",
        "createdAt": "1.1.2024",
        "status": body["status"]
    })))
}

async fn spawn_store_stub(prefix: &str) -> Result<(String, StubState)> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let state = StubState::default();
    let routes = Router::new()
        .route("/types", get(stub_types))
        .route("/publications", get(stub_publications).post(stub_create))
        .route("/publications/:id", put(stub_update))
        .with_state(state.clone());
    let app = if prefix.is_empty() {
        routes
    } else {
        Router::new().nest(prefix, routes)
    };
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok((format!("http://{addr}{prefix}"), state))
}

#[tokio::test]
async fn list_types_accepts_string_and_numeric_ids() {
    let (base_url, _state) = spawn_store_stub("").await.expect("spawn stub");
    let api = HttpPublicationApi::new(&base_url).expect("client");

    let types = api.list_types().await.expect("types");
    assert_eq!(types.len(), 2);
    assert_eq!(types[1].id.0, "2");
    assert_eq!(types[1].name.as_str(), "thesis");
}

#[tokio::test]
async fn list_publications_quarantines_malformed_records() {
    let (base_url, _state) = spawn_store_stub("").await.expect("spawn stub");
    let api = HttpPublicationApi::new(&base_url).expect("client");

    let page = api.list_publications().await.expect("publications");
    let ids: Vec<&str> = page
        .publications
        .iter()
        .map(|publication| publication.id.0.as_str())
        .collect();
    assert_eq!(ids, vec!["1", "4"]);
    assert_eq!(
        page.publications[1].created_at,
        CreatedOn::parse("4.1.2024").expect("date")
    );

    let quarantined: Vec<Option<&str>> = page
        .quarantined
        .iter()
        .map(|record| record.id.as_deref())
        .collect();
    assert_eq!(quarantined, vec![Some("2"), Some("3")]);
}

#[test]
fn records_missing_title_or_type_are_kept() {
    let page = partition_records(vec![
        json!({ "id": 9, "type": "thesis", "createdAt": "5.3.2024", "status": "pending" }),
        json!({ "id": 10, "title": "Untyped", "createdAt": "6.3.2024", "status": "approved" }),
    ]);

    assert!(page.quarantined.is_empty());
    assert_eq!(page.publications.len(), 2);
    assert_eq!(page.publications[0].id.0, "9");
    assert!(page.publications[0].title.is_empty());
    assert_eq!(page.publications[0].kind.as_str(), "thesis");
    assert_eq!(page.publications[1].title, "Untyped");
    assert!(page.publications[1].kind.as_str().is_empty());
}

#[tokio::test]
async fn base_url_prefix_is_kept_for_every_endpoint() {
    let (base_url, state) = spawn_store_stub("/api/v1/politeh")
        .await
        .expect("spawn stub");
    let api = HttpPublicationApi::new(&base_url).expect("client");
    assert!(api.base_url().path().ends_with("/api/v1/politeh/"));

    assert_eq!(api.list_types().await.expect("types").len(), 2);
    let updated = api
        .update_status(&"1".into(), PublicationStatus::Approved)
        .await
        .expect("update");
    assert_eq!(updated.status, PublicationStatus::Approved);

    let updates = state.status_updates.lock().await;
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].0, "1");
    assert_eq!(updates[0].1, json!({ "status": "approved" }));
}

#[tokio::test]
async fn create_posts_wire_body_and_returns_store_record() {
    let (base_url, state) = spawn_store_stub("").await.expect("spawn stub");
    let api = HttpPublicationApi::new(&base_url).expect("client");

    let request = CreatePublicationRequest {
        title: "Thermal models".to_string(),
        kind: "thesis".into(),
        is_collective_authors: true,
        authors: "Lab 4".to_string(),
        coauthors: "A., B.".to_string(),
        contact_name: "Orlov O.".to_string(),
        contact_phone: "+7 000".to_string(),
        contact_email: "orlov@example.org".to_string(),
        status: PublicationStatus::Pending,
        no_state_secret: true,
        expert_number: "9".to_string(),
        expert_date: "01.02.2024".to_string(),
        expert_start: "02.02.2024".to_string(),
        expert_end: "03.02.2024".to_string(),
        created_at: CreatedOn::parse("5.3.2024").expect("date"),
    };

    let created = api.create_publication(&request).await.expect("create");
    assert_eq!(created.id.0, "50");
    assert_eq!(created.coauthors, "A., B.");
    assert!(created.no_state_secret);

    let bodies = state.created.lock().await;
    assert_eq!(bodies.len(), 1);
    assert_eq!(bodies[0]["createdAt"], "5.3.2024");
    assert_eq!(bodies[0]["isCollectiveAuthors"], true);
    assert_eq!(bodies[0]["noStateSecret"], true);
    assert_eq!(bodies[0]["expertEnd"], "03.02.2024");
}

#[tokio::test]
async fn store_error_payload_is_surfaced() {
    let (base_url, _state) = spawn_store_stub("").await.expect("spawn stub");
    let api = HttpPublicationApi::new(&base_url).expect("client");

    let err = api
        .update_status(&"404".into(), PublicationStatus::Rejected)
        .await
        .expect_err("unknown id");
    match err {
        ClientError::Store { status, message } => {
            assert_eq!(status, 404);
            assert_eq!(message, "publication not found");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn unreachable_store_is_a_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let api = HttpPublicationApi::new(&format!("http://{addr}")).expect("client");
    let err = api.list_types().await.expect_err("closed port");
    assert!(matches!(err, ClientError::Transport(_)));
}

#[test]
fn invalid_base_url_is_rejected() {
    assert!(matches!(
        HttpPublicationApi::new("not a url"),
        Err(ClientError::Url(_))
    ));
}
