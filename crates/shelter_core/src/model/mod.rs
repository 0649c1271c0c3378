//! Shelter domain model.
//!
//! # Responsibility
//! - Define the animal and family records persisted by the registry.
//! - Own field-level validation that must hold before anything is stored.
//!
//! # Invariants
//! - Identifiers are assigned by the store; `None` means "not persisted yet".
//! - A `Family` value is always valid: construction and setters validate.

pub mod animal;
pub mod family;
