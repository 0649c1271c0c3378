//! Shelter use-case service.
//!
//! # Responsibility
//! - Register animals and run the three animal searches.
//! - Run the adoption flow: pick an animal by species, register the family,
//!   link the two.
//!
//! # Invariants
//! - Service APIs never bypass repository persistence contracts.
//! - Adoption species matching is case-insensitive and client-side, unlike
//!   the exact species search.
//! - The first animal (by id) of the requested species is the one adopted.
//! - The pick runs over the listing already shown to the user, so an adoption
//!   reads the `animales` table once.

use crate::model::animal::{Animal, AnimalStatus};
use crate::model::family::{Family, FamilyValidationError};
use crate::repo::animal_repo::AnimalRepository;
use crate::repo::family_repo::FamilyRepository;
use crate::repo::{RepoError, RepoResult};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for shelter use cases.
#[derive(Debug)]
pub enum ServiceError {
    /// Family input failed validation; nothing was written.
    InvalidFamily(FamilyValidationError),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidFamily(err) => write!(f, "invalid family: {err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidFamily(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<FamilyValidationError> for ServiceError {
    fn from(value: FamilyValidationError) -> Self {
        Self::InvalidFamily(value)
    }
}

/// Input for registering an animal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAnimal {
    pub name: String,
    pub species: String,
    pub age: u32,
    pub description: String,
    pub status: Option<AnimalStatus>,
}

/// Input for registering an adopting family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFamily {
    pub name: String,
    pub age: u32,
    pub city: String,
}

/// Use-case facade over the animal and family repositories.
pub struct ShelterService<A: AnimalRepository, F: FamilyRepository> {
    animals: A,
    families: F,
}

impl<A: AnimalRepository, F: FamilyRepository> ShelterService<A, F> {
    pub fn new(animals: A, families: F) -> Self {
        Self { animals, families }
    }

    /// Builds and saves a new animal. Returns it with its generated id.
    pub fn register_animal(&self, request: NewAnimal) -> RepoResult<Animal> {
        let mut animal = Animal::new(
            request.name,
            request.species,
            request.age,
            request.description,
        );
        animal.status = request.status;
        self.animals.save_animal(&mut animal)?;
        Ok(animal)
    }

    pub fn list_animals(&self) -> RepoResult<Vec<Animal>> {
        self.animals.list_animals()
    }

    pub fn search_by_species(&self, species: &str) -> RepoResult<Vec<Animal>> {
        self.animals.find_by_species(species)
    }

    pub fn search_by_age(&self, age: u32) -> RepoResult<Vec<Animal>> {
        self.animals.find_by_age(age)
    }

    pub fn search_by_description(&self, fragment: &str) -> RepoResult<Vec<Animal>> {
        self.animals.find_by_description(fragment)
    }

    pub fn list_families(&self) -> RepoResult<Vec<Family>> {
        self.families.list_families()
    }

    /// Registers `family` and links `animal` to it.
    ///
    /// Family and animal are written in separate transactions: if the animal
    /// update fails, the family stays registered.
    pub fn adopt(
        &self,
        mut animal: Animal,
        family: NewFamily,
    ) -> Result<(Animal, Family), ServiceError> {
        let mut family = Family::new(family.name, family.age, family.city)?;
        let family_id = self.families.register_family(&mut family)?;

        animal.assign_family(family_id);
        self.animals.update_animal(&animal)?;

        info!(
            "event=adoption module=service status=ok animal_id={} family_id={family_id}",
            animal.id.unwrap_or_default()
        );
        Ok((animal, family))
    }
}

/// Picks the animal to adopt from an already listed shelter: the first one
/// whose species matches `species`, ignoring case.
pub fn first_adoptable<'a>(animals: &'a [Animal], species: &str) -> Option<&'a Animal> {
    animals
        .iter()
        .find(|animal| animal.species_matches(species))
}
