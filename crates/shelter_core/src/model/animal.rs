//! Animal domain model.
//!
//! # Responsibility
//! - Define the animal record and its shelter status.
//! - Parse user-facing status text into the canonical enum.
//!
//! # Invariants
//! - `family_id`, when set, references a persisted family row. The store
//!   enforces this through a foreign key, not this type.
//! - Status tokens written to storage are stable and never localized.

use crate::model::family::FamilyId;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Store-assigned identifier of an `animales` row.
pub type AnimalId = i64;

/// Where an animal currently is in the shelter lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnimalStatus {
    /// Just arrived after being abandoned.
    #[serde(rename = "RECIEN_ABANDONADO")]
    RecentlyAbandoned,
    /// Living in the shelter.
    #[serde(rename = "EN_REFUGIO")]
    InShelter,
    /// About to move in with a foster family.
    #[serde(rename = "PROXIMAMENTE_EN_ACOGIDA")]
    SoonToBeFostered,
}

impl AnimalStatus {
    /// Every status in declaration order.
    pub const ALL: [AnimalStatus; 3] = [
        AnimalStatus::RecentlyAbandoned,
        AnimalStatus::InShelter,
        AnimalStatus::SoonToBeFostered,
    ];

    /// Canonical token stored in `animales.estado`.
    pub fn as_db_token(self) -> &'static str {
        match self {
            Self::RecentlyAbandoned => "RECIEN_ABANDONADO",
            Self::InShelter => "EN_REFUGIO",
            Self::SoonToBeFostered => "PROXIMAMENTE_EN_ACOGIDA",
        }
    }

    /// Human label shown in prompts and listings.
    pub fn label(self) -> &'static str {
        match self {
            Self::RecentlyAbandoned => "Recién abandonado",
            Self::InShelter => "En refugio",
            Self::SoonToBeFostered => "Próximamente en acogida",
        }
    }

    /// Decodes a stored token. Exact match only.
    pub fn from_db_token(token: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_db_token() == token)
    }

    /// Parses user input as either a token or a label, ignoring case and
    /// surrounding whitespace.
    pub fn parse(value: &str) -> Result<Self, StatusParseError> {
        let trimmed = value.trim();
        let upper = trimmed.to_uppercase();
        let lower = trimmed.to_lowercase();

        Self::ALL
            .into_iter()
            .find(|status| status.as_db_token() == upper || status.label().to_lowercase() == lower)
            .ok_or_else(|| StatusParseError {
                value: value.to_string(),
            })
    }

    /// Comma-separated list of every label, for prompts and error messages.
    pub fn valid_labels() -> String {
        Self::ALL
            .into_iter()
            .map(AnimalStatus::label)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl Display for AnimalStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for AnimalStatus {
    type Err = StatusParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

/// Rejected status text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusParseError {
    pub value: String,
}

impl Display for StatusParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid status `{}`; valid values are: {}",
            self.value,
            AnimalStatus::valid_labels()
        )
    }
}

impl Error for StatusParseError {}

/// One animal registered by the shelter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Animal {
    /// `None` until the animal has been saved.
    pub id: Option<AnimalId>,
    pub name: String,
    /// Free text; searched by exact match.
    pub species: String,
    /// Age in years.
    pub age: u32,
    /// Free text; searched by substring.
    pub description: String,
    pub status: Option<AnimalStatus>,
    /// Adopting family, if any.
    pub family_id: Option<FamilyId>,
}

impl Animal {
    /// Creates an unsaved animal with no status and no family.
    pub fn new(
        name: impl Into<String>,
        species: impl Into<String>,
        age: u32,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            name: name.into(),
            species: species.into(),
            age,
            description: description.into(),
            status: None,
            family_id: None,
        }
    }

    /// Parses and assigns a status. The previous status is kept on error.
    pub fn set_status(&mut self, value: &str) -> Result<(), StatusParseError> {
        self.status = Some(AnimalStatus::parse(value)?);
        Ok(())
    }

    /// Links this animal to an adopting family.
    pub fn assign_family(&mut self, family_id: FamilyId) {
        self.family_id = Some(family_id);
    }

    pub fn is_adopted(&self) -> bool {
        self.family_id.is_some()
    }

    /// Case-insensitive species comparison used by the adoption flow.
    ///
    /// Surrounding whitespace in `species` is ignored; the stored species is
    /// compared as is.
    pub fn species_matches(&self, species: &str) -> bool {
        self.species.to_lowercase() == species.trim().to_lowercase()
    }
}

impl Display for Animal {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Name: {}, Species: {}, Age: {}, Description: {}",
            self.name, self.species, self.age, self.description
        )?;
        if let Some(status) = self.status {
            write!(f, ", Status: {status}")?;
        }
        Ok(())
    }
}
