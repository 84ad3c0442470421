//! The publication board owns list and form state, talks to the store and
//! announces every state change on a broadcast channel for the view.

use std::{
    collections::{BTreeSet, HashSet},
    fmt,
    sync::{Arc, Mutex as SyncMutex, PoisonError},
};

use chrono::{Local, NaiveDate};
use shared::domain::{Publication, PublicationId, PublicationStatus, TypeCatalog, TypeName};
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, info, warn};

use crate::{
    api::{PublicationApi, QuarantinedRecord},
    error::ClientError,
    form::{FormController, FormDraft, RequiredField},
    list::{ListController, SortDirective},
};

const EVENT_CAPACITY: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BoardAction {
    Load,
    Create,
    UpdateStatus(PublicationId),
}

impl fmt::Display for BoardAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Load => f.write_str("load"),
            Self::Create => f.write_str("create"),
            Self::UpdateStatus(id) => write!(f, "status update for {id}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggle(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

#[derive(Debug, Clone)]
pub enum BoardEvent {
    Loaded {
        publications: usize,
        types: usize,
        quarantined: usize,
    },
    PublicationCreated(Publication),
    StatusUpdated(Publication),
    ValidationFailed {
        missing: Vec<RequiredField>,
    },
    OperationFailed {
        action: BoardAction,
        message: String,
    },
}

#[derive(Debug, Clone, Default)]
pub struct LoadOutcome {
    pub publications: usize,
    pub types: usize,
    pub quarantined: Vec<QuarantinedRecord>,
}

#[derive(Default)]
struct BoardState {
    catalog: TypeCatalog,
    list: ListController,
    form: FormController,
    theme: Theme,
    last_error: Option<String>,
    quarantined: Vec<QuarantinedRecord>,
}

type InFlightSet = SyncMutex<HashSet<BoardAction>>;

/// Marks an action as in flight until dropped, including when the owning
/// future is cancelled.
struct InFlight<'a> {
    set: &'a InFlightSet,
    action: BoardAction,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.set
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.action);
    }
}

pub struct PublicationBoard<A: PublicationApi> {
    api: Arc<A>,
    state: Mutex<BoardState>,
    in_flight: InFlightSet,
    events: broadcast::Sender<BoardEvent>,
    today: fn() -> NaiveDate,
}

fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

impl<A: PublicationApi> PublicationBoard<A> {
    pub fn new(api: A) -> Self {
        Self::with_shared_api(Arc::new(api))
    }

    pub fn with_shared_api(api: Arc<A>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            api,
            state: Mutex::new(BoardState::default()),
            in_flight: SyncMutex::new(HashSet::new()),
            events,
            today: local_today,
        }
    }

    /// Overrides the calendar used to stamp new publications.
    pub fn with_today(mut self, today: fn() -> NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<BoardEvent> {
        self.events.subscribe()
    }

    fn emit(&self, event: BoardEvent) {
        // No subscriber is fine; the state is still readable.
        let _ = self.events.send(event);
    }

    async fn fail(&self, action: BoardAction, err: ClientError) -> ClientError {
        let message = err.to_string();
        self.state.lock().await.last_error = Some(message.clone());
        self.emit(BoardEvent::OperationFailed { action, message });
        err
    }

    /// Claims `action`, or reports it as failed with `Busy` when an identical
    /// request is still running.
    async fn begin(&self, action: BoardAction) -> Result<InFlight<'_>, ClientError> {
        let claimed = self
            .in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(action.clone());
        if !claimed {
            warn!(%action, "rejecting duplicate request");
            return Err(self.fail(action.clone(), ClientError::Busy(action)).await);
        }
        Ok(InFlight {
            set: &self.in_flight,
            action,
        })
    }

    /// Fetches types and publications together; defaults that depend on the
    /// type list are applied only once both have arrived.
    pub async fn load(&self) -> Result<LoadOutcome, ClientError> {
        let _in_flight = self.begin(BoardAction::Load).await?;

        let fetched = futures::try_join!(self.api.list_types(), self.api.list_publications());
        let (types, page) = match fetched {
            Ok(fetched) => fetched,
            Err(err) => return Err(self.fail(BoardAction::Load, err).await),
        };

        let catalog = TypeCatalog::new(types);
        let outcome = LoadOutcome {
            publications: page.publications.len(),
            types: catalog.len(),
            quarantined: page.quarantined.clone(),
        };

        {
            let mut state = self.state.lock().await;
            state.list.load(page.publications, &catalog);
            state.form.set_default_type(catalog.first().cloned());
            state.catalog = catalog;
            state.quarantined = page.quarantined;
        }

        info!(
            publications = outcome.publications,
            types = outcome.types,
            quarantined = outcome.quarantined.len(),
            "publication board loaded"
        );
        self.emit(BoardEvent::Loaded {
            publications: outcome.publications,
            types: outcome.types,
            quarantined: outcome.quarantined.len(),
        });
        Ok(outcome)
    }

    /// Sends the status change and, once the store confirms, swaps the stored
    /// record in place. Nothing changes locally on failure.
    pub async fn update_status(
        &self,
        id: &PublicationId,
        status: PublicationStatus,
    ) -> Result<Publication, ClientError> {
        let action = BoardAction::UpdateStatus(id.clone());
        let _in_flight = self.begin(action.clone()).await?;

        let updated = match self.api.update_status(id, status).await {
            Ok(updated) => updated,
            Err(err) => return Err(self.fail(action, err).await),
        };

        {
            let mut state = self.state.lock().await;
            if !state.list.replace(updated.clone()) {
                debug!(publication_id = %id, "updated publication is not in the loaded collection");
            }
        }

        info!(publication_id = %id, %status, "publication status updated");
        self.emit(BoardEvent::StatusUpdated(updated.clone()));
        Ok(updated)
    }

    /// Moves a loaded publication to the next status in the review cycle.
    pub async fn advance_status(&self, id: &PublicationId) -> Result<Publication, ClientError> {
        let current = {
            let state = self.state.lock().await;
            state
                .list
                .get(id)
                .map(|publication| publication.status)
                .ok_or_else(|| ClientError::NotLoaded(id.clone()))?
        };
        self.update_status(id, current.next()).await
    }

    /// Validates and sends the draft. A valid submission is appended to the
    /// list and the draft is reset; an invalid one never reaches the store.
    pub async fn submit(&self) -> Result<Publication, ClientError> {
        let request = {
            let mut state = self.state.lock().await;
            let composed = state.form.compose(&state.catalog, (self.today)());
            match composed {
                Ok(request) => request,
                Err(err) => {
                    state.last_error = Some(err.to_string());
                    drop(state);
                    if let ClientError::Validation { missing } = &err {
                        self.emit(BoardEvent::ValidationFailed {
                            missing: missing.clone(),
                        });
                    }
                    warn!(error = %err, "draft rejected before submission");
                    return Err(err);
                }
            }
        };
        let _in_flight = self.begin(BoardAction::Create).await?;

        let created = match self.api.create_publication(&request).await {
            Ok(created) => created,
            Err(err) => return Err(self.fail(BoardAction::Create, err).await),
        };

        {
            let mut state = self.state.lock().await;
            state.list.append(created.clone());
            state.form.close();
            state.last_error = None;
        }

        info!(publication_id = %created.id, title = %created.title, "publication created");
        self.emit(BoardEvent::PublicationCreated(created.clone()));
        Ok(created)
    }

    pub async fn view(&self) -> Vec<Publication> {
        let state = self.state.lock().await;
        state.list.view().into_iter().cloned().collect()
    }

    pub async fn publications(&self) -> Vec<Publication> {
        self.state.lock().await.list.publications().to_vec()
    }

    pub async fn catalog(&self) -> TypeCatalog {
        self.state.lock().await.catalog.clone()
    }

    pub async fn quarantined(&self) -> Vec<QuarantinedRecord> {
        self.state.lock().await.quarantined.clone()
    }

    pub async fn selected_types(&self) -> BTreeSet<TypeName> {
        self.state.lock().await.list.selected_types().clone()
    }

    pub async fn select_type(&self, name: &str) {
        self.state.lock().await.list.select_type(TypeName::from(name));
    }

    pub async fn sort(&self) -> SortDirective {
        self.state.lock().await.list.sort()
    }

    pub async fn toggle_date_sort(&self) -> SortDirective {
        let mut state = self.state.lock().await;
        state.list.toggle_date_sort();
        state.list.sort()
    }

    pub async fn toggle_status_sort(&self) -> SortDirective {
        let mut state = self.state.lock().await;
        state.list.toggle_status_sort();
        state.list.sort()
    }

    pub async fn toggle_type_selector(&self) -> bool {
        let mut state = self.state.lock().await;
        state.list.toggle_type_selector();
        state.list.type_selector_open()
    }

    pub async fn open_publication(&self, id: &PublicationId) -> Option<Publication> {
        self.state.lock().await.list.open(id).cloned()
    }

    pub async fn close_publication(&self) {
        self.state.lock().await.list.close();
    }

    pub async fn opened(&self) -> Option<Publication> {
        self.state.lock().await.list.opened().cloned()
    }

    pub async fn open_form(&self) {
        self.state.lock().await.form.open();
    }

    pub async fn close_form(&self) {
        self.state.lock().await.form.close();
    }

    pub async fn form_open(&self) -> bool {
        self.state.lock().await.form.is_open()
    }

    pub async fn draft(&self) -> FormDraft {
        self.state.lock().await.form.draft().clone()
    }

    pub async fn edit_draft<F>(&self, edit: F)
    where
        F: FnOnce(&mut FormDraft),
    {
        edit(self.state.lock().await.form.draft_mut());
    }

    pub async fn theme(&self) -> Theme {
        self.state.lock().await.theme
    }

    pub async fn toggle_theme(&self) -> Theme {
        let mut state = self.state.lock().await;
        state.theme = state.theme.toggle();
        state.theme
    }

    pub async fn last_error(&self) -> Option<String> {
        self.state.lock().await.last_error.clone()
    }
}

#[cfg(test)]
#[path = "tests/board_tests.rs"]
mod tests;
