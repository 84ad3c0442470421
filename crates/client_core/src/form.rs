//! Draft state for the "add publication" form.

use std::fmt;

use chrono::NaiveDate;
use shared::{
    domain::{CreatedOn, PublicationStatus, TypeCatalog, TypeName},
    protocol::CreatePublicationRequest,
};

use crate::error::ClientError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequiredField {
    Type,
    Title,
    Authors,
    ContactName,
    ContactPhone,
    ContactEmail,
    ExpertNumber,
    ExpertDate,
    ExpertStart,
    ExpertEnd,
}

impl RequiredField {
    pub const ALL: [RequiredField; 10] = [
        Self::Type,
        Self::Title,
        Self::Authors,
        Self::ContactName,
        Self::ContactPhone,
        Self::ContactEmail,
        Self::ExpertNumber,
        Self::ExpertDate,
        Self::ExpertStart,
        Self::ExpertEnd,
    ];

    /// Field name as it appears on the wire.
    pub fn name(self) -> &'static str {
        match self {
            Self::Type => "type",
            Self::Title => "title",
            Self::Authors => "authors",
            Self::ContactName => "contactName",
            Self::ContactPhone => "contactPhone",
            Self::ContactEmail => "contactEmail",
            Self::ExpertNumber => "expertNumber",
            Self::ExpertDate => "expertDate",
            Self::ExpertStart => "expertStart",
            Self::ExpertEnd => "expertEnd",
        }
    }

    fn value(self, draft: &FormDraft) -> &str {
        match self {
            Self::Type => &draft.kind,
            Self::Title => &draft.title,
            Self::Authors => &draft.authors,
            Self::ContactName => &draft.contact_name,
            Self::ContactPhone => &draft.contact_phone,
            Self::ContactEmail => &draft.contact_email,
            Self::ExpertNumber => &draft.expert_number,
            Self::ExpertDate => &draft.expert_date,
            Self::ExpertStart => &draft.expert_start,
            Self::ExpertEnd => &draft.expert_end,
        }
    }

    pub(crate) fn join(fields: &[RequiredField]) -> String {
        fields
            .iter()
            .map(|field| field.name())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for RequiredField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormDraft {
    pub kind: String,
    pub title: String,
    pub is_collective_authors: bool,
    pub authors: String,
    pub coauthors: Vec<String>,
    pub contact_name: String,
    pub contact_phone: String,
    pub contact_email: String,
    pub no_state_secret: bool,
    pub expert_number: String,
    pub expert_date: String,
    pub expert_start: String,
    pub expert_end: String,
}

impl FormDraft {
    pub fn with_type(default_type: Option<&TypeName>) -> Self {
        Self {
            kind: default_type.map(|name| name.0.clone()).unwrap_or_default(),
            ..Self::default()
        }
    }

    pub fn missing_fields(&self) -> Vec<RequiredField> {
        RequiredField::ALL
            .into_iter()
            .filter(|field| field.value(self).is_empty())
            .collect()
    }

    pub fn add_coauthor(&mut self) {
        self.coauthors.push(String::new());
    }

    pub fn remove_coauthor(&mut self, index: usize) {
        if index < self.coauthors.len() {
            self.coauthors.remove(index);
        }
    }

    pub fn set_coauthor(&mut self, index: usize, value: impl Into<String>) {
        if let Some(slot) = self.coauthors.get_mut(index) {
            *slot = value.into();
        }
    }

    pub fn coauthors_joined(&self) -> String {
        self.coauthors.join(", ")
    }

    /// Expert dates are entered as zero-padded `DD.MM.YYYY`.
    pub fn set_expert_dates(&mut self, decided: NaiveDate, start: NaiveDate, end: NaiveDate) {
        self.expert_date = decided.format("%d.%m.%Y").to_string();
        self.expert_start = start.format("%d.%m.%Y").to_string();
        self.expert_end = end.format("%d.%m.%Y").to_string();
    }
}

pub fn validate(draft: &FormDraft) -> bool {
    draft.missing_fields().is_empty()
}

#[derive(Debug, Clone, Default)]
pub struct FormController {
    draft: FormDraft,
    default_type: Option<TypeName>,
    open: bool,
}

impl FormController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draft(&self) -> &FormDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut FormDraft {
        &mut self.draft
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    /// Closing throws the draft away.
    pub fn close(&mut self) {
        self.open = false;
        self.reset();
    }

    /// Records the catalog's first type as the default and applies it to the
    /// draft if the draft has no type yet.
    pub fn set_default_type(&mut self, default_type: Option<TypeName>) {
        if self.draft.kind.is_empty() {
            if let Some(name) = &default_type {
                self.draft.kind = name.0.clone();
            }
        }
        self.default_type = default_type;
    }

    pub fn reset(&mut self) {
        self.draft = FormDraft::with_type(self.default_type.as_ref());
    }

    pub fn validate(&self) -> bool {
        validate(&self.draft)
    }

    /// Builds the create request for the current draft. Nothing is sent here.
    pub fn compose(
        &self,
        catalog: &TypeCatalog,
        today: NaiveDate,
    ) -> Result<CreatePublicationRequest, ClientError> {
        let missing = self.draft.missing_fields();
        if !missing.is_empty() {
            return Err(ClientError::Validation { missing });
        }
        let kind = catalog.resolve(&self.draft.kind)?;
        let draft = &self.draft;

        Ok(CreatePublicationRequest {
            title: draft.title.clone(),
            kind,
            is_collective_authors: draft.is_collective_authors,
            authors: draft.authors.clone(),
            coauthors: draft.coauthors_joined(),
            contact_name: draft.contact_name.clone(),
            contact_phone: draft.contact_phone.clone(),
            contact_email: draft.contact_email.clone(),
            status: PublicationStatus::Pending,
            no_state_secret: draft.no_state_secret,
            expert_number: draft.expert_number.clone(),
            expert_date: draft.expert_date.clone(),
            expert_start: draft.expert_start.clone(),
            expert_end: draft.expert_end.clone(),
            created_at: CreatedOn::new(today),
        })
    }
}

#[cfg(test)]
#[path = "tests/form_tests.rs"]
mod tests;
