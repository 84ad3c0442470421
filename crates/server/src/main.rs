use std::net::SocketAddr;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use shared::{
    domain::{Publication, PublicationId, PublicationType},
    error::{ApiError, ErrorCode},
    protocol::{CreatePublicationRequest, UpdateStatusRequest},
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod api;
mod config;

use api::ApiContext;
use config::{load_settings, read_seed_file};

type ApiResult<T> = Result<T, (StatusCode, Json<ApiError>)>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let settings = load_settings();
    let seed = match &settings.seed_file {
        Some(path) => read_seed_file(path)?,
        None => Vec::new(),
    };
    info!(
        types = settings.types.len(),
        seeded = seed.len(),
        "publication store initialised"
    );

    let app = build_router(ApiContext::new(&settings.types, seed));

    let addr: SocketAddr = settings.bind_addr.parse()?;
    info!(%addr, "publication store listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(ctx: ApiContext) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/types", get(http_list_types))
        .route(
            "/publications",
            get(http_list_publications).post(http_create_publication),
        )
        .route("/publications/:id", put(http_update_status))
        .with_state(ctx)
}

async fn healthz() -> &'static str {
    "ok"
}

fn error_status(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Validation => StatusCode::BAD_REQUEST,
    }
}

fn reject(err: ApiError) -> (StatusCode, Json<ApiError>) {
    (error_status(err.code), Json(err))
}

fn bad_body(rejection: JsonRejection) -> (StatusCode, Json<ApiError>) {
    warn!(error = %rejection, "rejecting malformed request body");
    (
        StatusCode::BAD_REQUEST,
        Json(ApiError::new(ErrorCode::Validation, rejection.body_text())),
    )
}

async fn http_list_types(State(ctx): State<ApiContext>) -> Json<Vec<PublicationType>> {
    Json(api::list_types(&ctx).await)
}

async fn http_list_publications(State(ctx): State<ApiContext>) -> Json<Vec<Publication>> {
    Json(api::list_publications(&ctx).await)
}

async fn http_create_publication(
    State(ctx): State<ApiContext>,
    body: Result<Json<CreatePublicationRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Publication>)> {
    let Json(request) = body.map_err(bad_body)?;
    let created = api::create_publication(&ctx, request).await.map_err(reject)?;
    info!(publication_id = %created.id, kind = %created.kind, "publication created");
    Ok((StatusCode::CREATED, Json(created)))
}

async fn http_update_status(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
    body: Result<Json<UpdateStatusRequest>, JsonRejection>,
) -> ApiResult<Json<Publication>> {
    let Json(request) = body.map_err(bad_body)?;
    let id = PublicationId(id);
    let updated = api::update_status(&ctx, &id, request.status)
        .await
        .map_err(reject)?;
    info!(publication_id = %id, status = %updated.status, "publication status updated");
    Ok(Json(updated))
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
