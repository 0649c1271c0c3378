//! Adopting family domain model.
//!
//! # Responsibility
//! - Define the family record that adopts animals.
//! - Validate name, age and city on every write path.
//!
//! # Invariants
//! - `name` and `city` are never blank after trim.
//! - `age` is strictly positive.
//! - A failed setter leaves the previous value untouched.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-assigned identifier of a `familias` row.
pub type FamilyId = i64;

/// Field validation failure for [`Family`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FamilyValidationError {
    EmptyName,
    EmptyCity,
    NonPositiveAge,
}

impl Display for FamilyValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "family name must not be empty"),
            Self::EmptyCity => write!(f, "family city must not be empty"),
            Self::NonPositiveAge => write!(f, "family age must be a positive value"),
        }
    }
}

impl Error for FamilyValidationError {}

/// A family that adopts animals from the shelter.
///
/// Fields are private so every mutation goes through a validating setter.
/// Deserialization runs the same checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "FamilyFields")]
pub struct Family {
    id: Option<FamilyId>,
    name: String,
    age: u32,
    city: String,
}

#[derive(Deserialize)]
struct FamilyFields {
    id: Option<FamilyId>,
    name: String,
    age: u32,
    city: String,
}

impl TryFrom<FamilyFields> for Family {
    type Error = FamilyValidationError;

    fn try_from(value: FamilyFields) -> Result<Self, Self::Error> {
        let mut family = Family::new(value.name, value.age, value.city)?;
        family.id = value.id;
        Ok(family)
    }
}

impl Family {
    /// Creates an unsaved family after validating every field.
    pub fn new(
        name: impl Into<String>,
        age: u32,
        city: impl Into<String>,
    ) -> Result<Self, FamilyValidationError> {
        let name = name.into();
        let city = city.into();
        validate_name(&name)?;
        validate_age(age)?;
        validate_city(&city)?;
        Ok(Self {
            id: None,
            name,
            age,
            city,
        })
    }

    /// Rebuilds a persisted family. Used by the repository read path.
    pub fn with_id(
        id: FamilyId,
        name: impl Into<String>,
        age: u32,
        city: impl Into<String>,
    ) -> Result<Self, FamilyValidationError> {
        let mut family = Self::new(name, age, city)?;
        family.id = Some(id);
        Ok(family)
    }

    pub fn id(&self) -> Option<FamilyId> {
        self.id
    }

    pub(crate) fn assign_id(&mut self, id: FamilyId) {
        self.id = Some(id);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> Result<(), FamilyValidationError> {
        let name = name.into();
        validate_name(&name)?;
        self.name = name;
        Ok(())
    }

    pub fn age(&self) -> u32 {
        self.age
    }

    pub fn set_age(&mut self, age: u32) -> Result<(), FamilyValidationError> {
        validate_age(age)?;
        self.age = age;
        Ok(())
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn set_city(&mut self, city: impl Into<String>) -> Result<(), FamilyValidationError> {
        let city = city.into();
        validate_city(&city)?;
        self.city = city;
        Ok(())
    }
}

impl Display for Family {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Family [Name: {}, Age: {}, City: {}]",
            self.name, self.age, self.city
        )
    }
}

fn validate_name(name: &str) -> Result<(), FamilyValidationError> {
    if name.trim().is_empty() {
        return Err(FamilyValidationError::EmptyName);
    }
    Ok(())
}

fn validate_age(age: u32) -> Result<(), FamilyValidationError> {
    if age == 0 {
        return Err(FamilyValidationError::NonPositiveAge);
    }
    Ok(())
}

fn validate_city(city: &str) -> Result<(), FamilyValidationError> {
    if city.trim().is_empty() {
        return Err(FamilyValidationError::EmptyCity);
    }
    Ok(())
}
