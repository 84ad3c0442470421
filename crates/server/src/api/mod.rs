use std::sync::Arc;

use shared::{
    domain::{Publication, PublicationId, PublicationStatus, PublicationType, TypeCatalog},
    error::{ApiError, ErrorCode},
    protocol::CreatePublicationRequest,
};
use tokio::sync::RwLock;

/// In-memory publication store shared by the route handlers.
#[derive(Clone, Default)]
pub struct ApiContext {
    inner: Arc<RwLock<StoreState>>,
}

#[derive(Default)]
struct StoreState {
    catalog: TypeCatalog,
    publications: Vec<Publication>,
    next_id: u64,
}

impl ApiContext {
    pub fn new(type_names: &[String], publications: Vec<Publication>) -> Self {
        let catalog = TypeCatalog::new(
            type_names
                .iter()
                .enumerate()
                .map(|(index, name)| PublicationType {
                    id: (index + 1).to_string().as_str().into(),
                    name: name.as_str().into(),
                })
                .collect(),
        );
        let next_id = publications
            .iter()
            .filter_map(|publication| publication.id.0.parse::<u64>().ok())
            .max()
            .unwrap_or(0)
            + 1;
        Self {
            inner: Arc::new(RwLock::new(StoreState {
                catalog,
                publications,
                next_id,
            })),
        }
    }
}

pub async fn list_types(ctx: &ApiContext) -> Vec<PublicationType> {
    ctx.inner.read().await.catalog.types().to_vec()
}

pub async fn list_publications(ctx: &ApiContext) -> Vec<Publication> {
    ctx.inner.read().await.publications.clone()
}

pub async fn create_publication(
    ctx: &ApiContext,
    request: CreatePublicationRequest,
) -> Result<Publication, ApiError> {
    if request.title.trim().is_empty() {
        return Err(ApiError::new(ErrorCode::Validation, "title is required"));
    }

    let mut state = ctx.inner.write().await;
    let kind = state
        .catalog
        .resolve(request.kind.as_str())
        .map_err(|err| ApiError::new(ErrorCode::Validation, err.to_string()))?;

    let id = PublicationId(state.next_id.to_string());
    state.next_id += 1;

    let publication = Publication {
        id,
        title: request.title,
        kind,
        is_collective_authors: request.is_collective_authors,
        authors: request.authors,
        coauthors: request.coauthors,
        contact_name: request.contact_name,
        contact_phone: request.contact_phone,
        contact_email: request.contact_email,
        created_at: request.created_at,
        status: request.status,
        no_state_secret: request.no_state_secret,
        expert_number: request.expert_number,
        expert_date: request.expert_date,
        expert_start: request.expert_start,
        expert_end: request.expert_end,
    };
    state.publications.push(publication.clone());
    Ok(publication)
}

pub async fn update_status(
    ctx: &ApiContext,
    id: &PublicationId,
    status: PublicationStatus,
) -> Result<Publication, ApiError> {
    let mut state = ctx.inner.write().await;
    let publication = state
        .publications
        .iter_mut()
        .find(|publication| &publication.id == id)
        .ok_or_else(|| ApiError::new(ErrorCode::NotFound, format!("publication {id} not found")))?;
    publication.status = status;
    Ok(publication.clone())
}

#[cfg(test)]
#[path = "tests/mod_tests.rs"]
mod tests;
