//! Publication list state: type filter, date/status sort and the opened record.

use std::collections::BTreeSet;

use shared::domain::{Publication, PublicationId, PublicationStatus, TypeCatalog, TypeName};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flip(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            Self::Asc => "▲",
            Self::Desc => "▼",
        }
    }
}

/// At most one sort column is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortDirective {
    #[default]
    Unsorted,
    Date(SortDirection),
    Status(SortDirection),
}

impl SortDirective {
    /// First activation sorts newest first; further toggles flip the direction.
    /// Any status sort is dropped.
    pub fn toggle_date(self) -> Self {
        match self {
            Self::Date(direction) => Self::Date(direction.flip()),
            _ => Self::Date(SortDirection::Desc),
        }
    }

    /// First activation sorts pending first; further toggles flip the direction.
    /// Any date sort is dropped.
    pub fn toggle_status(self) -> Self {
        match self {
            Self::Status(direction) => Self::Status(direction.flip()),
            _ => Self::Status(SortDirection::Asc),
        }
    }

    pub fn date_direction(self) -> Option<SortDirection> {
        match self {
            Self::Date(direction) => Some(direction),
            _ => None,
        }
    }

    pub fn status_direction(self) -> Option<SortDirection> {
        match self {
            Self::Status(direction) => Some(direction),
            _ => None,
        }
    }
}

pub fn cycle_status(current: PublicationStatus) -> PublicationStatus {
    current.next()
}

/// Filters by type and orders the result. The input slice is never reordered;
/// an empty selection keeps every record. Both sorts are stable.
pub fn apply_view<'a>(
    publications: &'a [Publication],
    selected_types: &BTreeSet<TypeName>,
    sort: SortDirective,
) -> Vec<&'a Publication> {
    let mut view: Vec<&Publication> = publications
        .iter()
        .filter(|publication| {
            selected_types.is_empty() || selected_types.contains(&publication.kind)
        })
        .collect();

    match sort {
        SortDirective::Unsorted => {}
        SortDirective::Date(SortDirection::Asc) => {
            view.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        }
        SortDirective::Date(SortDirection::Desc) => {
            view.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        }
        SortDirective::Status(SortDirection::Asc) => {
            view.sort_by_key(|publication| publication.status.rank());
        }
        SortDirective::Status(SortDirection::Desc) => {
            view.sort_by(|a, b| b.status.rank().cmp(&a.status.rank()));
        }
    }

    view
}

#[derive(Debug, Clone, Default)]
pub struct ListController {
    publications: Vec<Publication>,
    selected_types: BTreeSet<TypeName>,
    sort: SortDirective,
    opened: Option<PublicationId>,
    type_selector_open: bool,
}

impl ListController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the collection and selects every known type.
    pub fn load(&mut self, publications: Vec<Publication>, catalog: &TypeCatalog) {
        self.publications = publications;
        self.selected_types = catalog.names();
        self.opened = None;
    }

    pub fn publications(&self) -> &[Publication] {
        &self.publications
    }

    pub fn get(&self, id: &PublicationId) -> Option<&Publication> {
        self.publications.iter().find(|publication| &publication.id == id)
    }

    pub fn view(&self) -> Vec<&Publication> {
        apply_view(&self.publications, &self.selected_types, self.sort)
    }

    pub fn selected_types(&self) -> &BTreeSet<TypeName> {
        &self.selected_types
    }

    pub fn is_selected(&self, name: &TypeName) -> bool {
        self.selected_types.contains(name)
    }

    pub fn select_type(&mut self, name: TypeName) {
        if !self.selected_types.remove(&name) {
            self.selected_types.insert(name);
        }
    }

    pub fn sort(&self) -> SortDirective {
        self.sort
    }

    pub fn toggle_date_sort(&mut self) {
        self.sort = self.sort.toggle_date();
    }

    pub fn toggle_status_sort(&mut self) {
        self.sort = self.sort.toggle_status();
    }

    pub fn type_selector_open(&self) -> bool {
        self.type_selector_open
    }

    pub fn toggle_type_selector(&mut self) {
        self.type_selector_open = !self.type_selector_open;
    }

    /// Opens a loaded publication; unknown ids leave the current selection alone.
    pub fn open(&mut self, id: &PublicationId) -> Option<&Publication> {
        let index = self
            .publications
            .iter()
            .position(|publication| &publication.id == id)?;
        self.opened = Some(id.clone());
        self.publications.get(index)
    }

    pub fn close(&mut self) {
        self.opened = None;
    }

    pub fn opened(&self) -> Option<&Publication> {
        self.opened.as_ref().and_then(|id| self.get(id))
    }

    pub fn append(&mut self, publication: Publication) {
        self.publications.push(publication);
    }

    /// Swaps in the record with the same id, keeping its position. The opened
    /// view follows automatically since it is tracked by id.
    pub fn replace(&mut self, updated: Publication) -> bool {
        match self
            .publications
            .iter_mut()
            .find(|publication| publication.id == updated.id)
        {
            Some(slot) => {
                *slot = updated;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
#[path = "tests/list_tests.rs"]
mod tests;
