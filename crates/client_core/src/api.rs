//! HTTP access to the publication store.

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use shared::{
    domain::{Publication, PublicationId, PublicationStatus, PublicationType},
    error::ApiError,
    protocol::{CreatePublicationRequest, UpdateStatusRequest},
};
use tracing::{debug, error, warn};
use url::Url;

use crate::error::ClientError;

/// A store record that could not be decoded into a [`Publication`] and was
/// left out of the collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuarantinedRecord {
    pub id: Option<String>,
    pub reason: String,
}

#[derive(Debug, Clone, Default)]
pub struct PublicationPage {
    pub publications: Vec<Publication>,
    pub quarantined: Vec<QuarantinedRecord>,
}

#[async_trait]
pub trait PublicationApi: Send + Sync {
    async fn list_types(&self) -> Result<Vec<PublicationType>, ClientError>;
    async fn list_publications(&self) -> Result<PublicationPage, ClientError>;
    async fn create_publication(
        &self,
        request: &CreatePublicationRequest,
    ) -> Result<Publication, ClientError>;
    async fn update_status(
        &self,
        id: &PublicationId,
        status: PublicationStatus,
    ) -> Result<Publication, ClientError>;
}

pub struct HttpPublicationApi {
    http: Client,
    base_url: Url,
}

impl HttpPublicationApi {
    /// `base_url` may carry a path prefix (e.g. `https://host/api/v1/politeh`);
    /// endpoint paths are resolved beneath it.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: &str) -> Result<Self, ClientError> {
        let mut base_url = Url::parse(base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        Ok(self.base_url.join(path)?)
    }

    fn publication_url(&self, id: &PublicationId) -> Result<Url, ClientError> {
        let mut url = self.endpoint("publications")?;
        url.path_segments_mut()
            .map_err(|()| ClientError::Url(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .push(&id.0);
        Ok(url)
    }
}

#[async_trait]
impl PublicationApi for HttpPublicationApi {
    async fn list_types(&self) -> Result<Vec<PublicationType>, ClientError> {
        let url = self.endpoint("types")?;
        let response = self.http.get(url).send().await;
        let result = match response {
            Ok(response) => decode(response).await,
            Err(err) => Err(err.into()),
        };
        result.inspect_err(|error| error!(%error, "failed to list publication types"))
    }

    async fn list_publications(&self) -> Result<PublicationPage, ClientError> {
        let url = self.endpoint("publications")?;
        let response = self.http.get(url).send().await;
        let result = match response {
            Ok(response) => decode::<Vec<serde_json::Value>>(response).await,
            Err(err) => Err(err.into()),
        };
        let records = result.inspect_err(|error| error!(%error, "failed to list publications"))?;
        Ok(partition_records(records))
    }

    async fn create_publication(
        &self,
        request: &CreatePublicationRequest,
    ) -> Result<Publication, ClientError> {
        let url = self.endpoint("publications")?;
        let response = self.http.post(url).json(request).send().await;
        let result = match response {
            Ok(response) => decode(response).await,
            Err(err) => Err(err.into()),
        };
        result.inspect_err(|error| {
            error!(%error, title = %request.title, "failed to create publication");
        })
    }

    async fn update_status(
        &self,
        id: &PublicationId,
        status: PublicationStatus,
    ) -> Result<Publication, ClientError> {
        let url = self.publication_url(id)?;
        let response = self
            .http
            .put(url)
            .json(&UpdateStatusRequest { status })
            .send()
            .await;
        let result = match response {
            Ok(response) => decode(response).await,
            Err(err) => Err(err.into()),
        };
        result.inspect_err(|error| {
            error!(%error, publication_id = %id, %status, "failed to update publication status");
        })
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();
    let body = response.bytes().await?;
    if !status.is_success() {
        let message = serde_json::from_slice::<ApiError>(&body)
            .map(|api_error| api_error.message)
            .unwrap_or_else(|_| String::from_utf8_lossy(&body).into_owned());
        return Err(ClientError::Store {
            status: status.as_u16(),
            message,
        });
    }
    debug!(status = status.as_u16(), bytes = body.len(), "store response");
    Ok(serde_json::from_slice(&body)?)
}

/// Splits raw store records into well-formed publications and records whose
/// status or creation date cannot be read. Store order is preserved.
pub fn partition_records(records: Vec<serde_json::Value>) -> PublicationPage {
    let mut page = PublicationPage::default();
    for record in records {
        let id = record.get("id").map(|id| match id {
            serde_json::Value::String(text) => text.clone(),
            other => other.to_string(),
        });
        match serde_json::from_value::<Publication>(record) {
            Ok(publication) => page.publications.push(publication),
            Err(err) => {
                warn!(id = ?id, error = %err, "quarantining malformed publication record");
                page.quarantined.push(QuarantinedRecord {
                    id,
                    reason: err.to_string(),
                });
            }
        }
    }
    page
}

#[cfg(test)]
#[path = "tests/api_tests.rs"]
mod tests;
