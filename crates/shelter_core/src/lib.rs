//! Core domain logic for the animal shelter registry.
//! This crate is the single source of truth for persistence and validation.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{ConfigError, ShelterConfig};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::animal::{Animal, AnimalId, AnimalStatus, StatusParseError};
pub use model::family::{Family, FamilyId, FamilyValidationError};
pub use repo::animal_repo::{AnimalRepository, SqliteAnimalRepository};
pub use repo::family_repo::{FamilyRepository, SqliteFamilyRepository};
pub use repo::{RepoError, RepoResult};
pub use service::shelter_service::{
    first_adoptable, NewAnimal, NewFamily, ServiceError, ShelterService,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
