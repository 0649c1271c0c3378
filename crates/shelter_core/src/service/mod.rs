//! Shelter use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into the use cases offered by the menu.
//! - Keep the console layer decoupled from storage details.

pub mod shelter_service;
