use std::{collections::BTreeSet, fmt, str::FromStr};

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Store identifiers arrive as either JSON strings or numbers; both are kept as text.
macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                #[derive(Deserialize)]
                #[serde(untagged)]
                enum Raw {
                    Text(String),
                    Number(i64),
                }

                Ok(match Raw::deserialize(deserializer)? {
                    Raw::Text(text) => Self(text),
                    Raw::Number(number) => Self(number.to_string()),
                })
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

id_newtype!(PublicationId);
id_newtype!(PublicationTypeId);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PublicationStatus {
    Pending,
    Approved,
    Rejected,
}

impl PublicationStatus {
    pub const ALL: [PublicationStatus; 3] = [Self::Pending, Self::Approved, Self::Rejected];

    /// Position used by the status sort: pending < approved < rejected.
    pub fn rank(self) -> u8 {
        match self {
            Self::Pending => 1,
            Self::Approved => 2,
            Self::Rejected => 3,
        }
    }

    /// One-click review advance: pending -> approved -> rejected -> pending.
    pub fn next(self) -> Self {
        match self {
            Self::Pending => Self::Approved,
            Self::Approved => Self::Rejected,
            Self::Rejected => Self::Pending,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Reviewer-facing label shown next to each record.
    pub fn label(self) -> &'static str {
        match self {
            Self::Pending => "Ожидает",
            Self::Approved => "Одобрено",
            Self::Rejected => "Отклонено",
        }
    }
}

impl fmt::Display for PublicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown publication status '{0}'")]
pub struct UnknownStatus(pub String);

impl FromStr for PublicationStatus {
    type Err = UnknownStatus;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(raw.trim()))
            .ok_or_else(|| UnknownStatus(raw.to_string()))
    }
}

/// Name of a server-defined publication category. Membership is data driven,
/// see [`TypeCatalog`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeName(pub String);

impl TypeName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TypeName {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicationType {
    pub id: PublicationTypeId,
    pub name: TypeName,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("publication type '{0}' is not offered by the store")]
pub struct UnknownType(pub String);

/// The set of publication types loaded from the store, in store order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeCatalog {
    types: Vec<PublicationType>,
}

impl TypeCatalog {
    pub fn new(types: Vec<PublicationType>) -> Self {
        let mut seen = BTreeSet::new();
        let types = types
            .into_iter()
            .filter(|ty| seen.insert(ty.name.clone()))
            .collect();
        Self { types }
    }

    pub fn types(&self) -> &[PublicationType] {
        &self.types
    }

    pub fn first(&self) -> Option<&TypeName> {
        self.types.first().map(|ty| &ty.name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.iter().any(|ty| ty.name.as_str() == name)
    }

    pub fn resolve(&self, name: &str) -> Result<TypeName, UnknownType> {
        self.types
            .iter()
            .find(|ty| ty.name.as_str() == name)
            .map(|ty| ty.name.clone())
            .ok_or_else(|| UnknownType(name.to_string()))
    }

    pub fn names(&self) -> BTreeSet<TypeName> {
        self.types.iter().map(|ty| ty.name.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CreatedOnError {
    #[error("expected day.month.year, got '{0}'")]
    Shape(String),
    #[error("'{0}' is not a calendar date")]
    OutOfRange(String),
}

/// Creation day of a publication. Text form is `D.M.YYYY` without zero padding,
/// e.g. `5.3.2024`; padded input is accepted when parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CreatedOn(NaiveDate);

impl CreatedOn {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn date(self) -> NaiveDate {
        self.0
    }

    pub fn parse(raw: &str) -> Result<Self, CreatedOnError> {
        let shape = || CreatedOnError::Shape(raw.to_string());
        let mut parts = raw.trim().split('.');
        let (Some(day), Some(month), Some(year), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(shape());
        };

        let day: u32 = day.parse().map_err(|_| shape())?;
        let month: u32 = month.parse().map_err(|_| shape())?;
        let year: i32 = year.parse().map_err(|_| shape())?;

        NaiveDate::from_ymd_opt(year, month, day)
            .map(Self)
            .ok_or_else(|| CreatedOnError::OutOfRange(raw.to_string()))
    }
}

impl fmt::Display for CreatedOn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.0.day(), self.0.month(), self.0.year())
    }
}

impl FromStr for CreatedOn {
    type Err = CreatedOnError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::parse(raw)
    }
}

impl Serialize for CreatedOn {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CreatedOn {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Publication {
    pub id: PublicationId,
    #[serde(default)]
    pub title: String,
    #[serde(rename = "type", default)]
    pub kind: TypeName,
    #[serde(default)]
    pub is_collective_authors: bool,
    #[serde(default)]
    pub authors: String,
    #[serde(default)]
    pub coauthors: String,
    #[serde(default)]
    pub contact_name: String,
    #[serde(default)]
    pub contact_phone: String,
    #[serde(default)]
    pub contact_email: String,
    pub created_at: CreatedOn,
    pub status: PublicationStatus,
    #[serde(default)]
    pub no_state_secret: bool,
    #[serde(default)]
    pub expert_number: String,
    #[serde(default)]
    pub expert_date: String,
    #[serde(default)]
    pub expert_start: String,
    #[serde(default)]
    pub expert_end: String,
}
