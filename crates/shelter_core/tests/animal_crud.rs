use rusqlite::Connection;
use shelter_core::db::migrations::latest_version;
use shelter_core::db::open_db_in_memory;
use shelter_core::{
    Animal, AnimalRepository, AnimalStatus, Family, FamilyRepository, RepoError,
    SqliteAnimalRepository, SqliteFamilyRepository,
};
use std::error::Error;

#[test]
fn save_assigns_id_and_get_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteAnimalRepository::try_new(&conn).unwrap();

    let mut animal = Animal::new("León", "Felino", 5, "Rey de la selva");
    animal.status = Some(AnimalStatus::InShelter);
    let id = repo.save_animal(&mut animal).unwrap();

    assert_eq!(animal.id, Some(id));
    let loaded = repo.get_animal(id).unwrap().unwrap();
    assert_eq!(loaded, animal);
}

#[test]
fn save_generates_distinct_ids() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteAnimalRepository::try_new(&conn).unwrap();

    let mut first = Animal::new("Rex", "Dog", 3, "friendly");
    let mut second = Animal::new("Rex", "Dog", 3, "friendly");
    let first_id = repo.save_animal(&mut first).unwrap();
    let second_id = repo.save_animal(&mut second).unwrap();

    assert_ne!(first_id, second_id);
    assert_eq!(repo.list_animals().unwrap().len(), 2);
}

#[test]
fn save_rejects_already_saved_animal() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteAnimalRepository::try_new(&conn).unwrap();

    let mut animal = Animal::new("Kiwi", "Bird", 1, "sings");
    let id = repo.save_animal(&mut animal).unwrap();

    let err = repo.save_animal(&mut animal).unwrap_err();
    assert!(matches!(err, RepoError::AlreadySaved { id: existing, .. } if existing == id));
    assert_eq!(repo.list_animals().unwrap().len(), 1);
}

#[test]
fn update_description_keeps_other_fields() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteAnimalRepository::try_new(&conn).unwrap();

    let mut animal = Animal::new("Tigre", "Felino", 3, "Gran felino");
    animal.status = Some(AnimalStatus::RecentlyAbandoned);
    let id = repo.save_animal(&mut animal).unwrap();

    animal.description = "Felino ágil".to_string();
    repo.update_animal(&animal).unwrap();

    let loaded = repo.get_animal(id).unwrap().unwrap();
    assert_eq!(loaded.description, "Felino ágil");
    assert_eq!(loaded.name, "Tigre");
    assert_eq!(loaded.species, "Felino");
    assert_eq!(loaded.age, 3);
    assert_eq!(loaded.status, Some(AnimalStatus::RecentlyAbandoned));
    assert_eq!(loaded.family_id, None);
}

#[test]
fn update_unsaved_or_missing_animal_fails() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteAnimalRepository::try_new(&conn).unwrap();

    let unsaved = Animal::new("Ghost", "Cat", 4, "");
    let err = repo.update_animal(&unsaved).unwrap_err();
    assert!(matches!(err, RepoError::Unsaved("animal")));

    let mut missing = Animal::new("Ghost", "Cat", 4, "");
    missing.id = Some(4242);
    let err = repo.update_animal(&missing).unwrap_err();
    assert!(matches!(err, RepoError::NotFound { entity: "animal", id: 4242 }));
}

#[test]
fn delete_reports_whether_row_existed() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteAnimalRepository::try_new(&conn).unwrap();

    let mut animal = Animal::new("Nagini", "Snake", 7, "quiet");
    let id = repo.save_animal(&mut animal).unwrap();

    assert!(repo.delete_animal(id).unwrap());
    assert!(repo.get_animal(id).unwrap().is_none());
    assert!(!repo.delete_animal(id).unwrap());
}

#[test]
fn find_by_species_is_exact_and_case_sensitive() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteAnimalRepository::try_new(&conn).unwrap();

    for (name, species) in [("Rex", "Dog"), ("Toby", "dog"), ("Luna", "Cat"), ("Max", "Dogo")] {
        repo.save_animal(&mut Animal::new(name, species, 2, "")).unwrap();
    }

    let dogs = repo.find_by_species("Dog").unwrap();
    assert_eq!(dogs.len(), 1);
    assert_eq!(dogs[0].name, "Rex");

    assert!(repo.find_by_species("DOG").unwrap().is_empty());
}

#[test]
fn find_by_age_is_exact() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteAnimalRepository::try_new(&conn).unwrap();

    for (name, age) in [("A", 1), ("B", 2), ("C", 2), ("D", 12)] {
        repo.save_animal(&mut Animal::new(name, "Cat", age, "")).unwrap();
    }

    let names: Vec<_> = repo
        .find_by_age(2)
        .unwrap()
        .into_iter()
        .map(|animal| animal.name)
        .collect();
    assert_eq!(names, vec!["B", "C"]);
    assert!(repo.find_by_age(3).unwrap().is_empty());
}

#[test]
fn find_by_description_matches_substring() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteAnimalRepository::try_new(&conn).unwrap();

    repo.save_animal(&mut Animal::new("A", "Dog", 1, "recién abandonado en la calle"))
        .unwrap();
    repo.save_animal(&mut Animal::new("B", "Dog", 1, "en refugio"))
        .unwrap();
    repo.save_animal(&mut Animal::new("C", "Dog", 1, "100% vacunado"))
        .unwrap();

    let hits = repo.find_by_description("abandonado").unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].name, "A");

    assert_eq!(repo.find_by_description("en ").unwrap().len(), 2);
    // `%` is literal, not a wildcard.
    let percent = repo.find_by_description("%").unwrap();
    assert_eq!(percent.len(), 1);
    assert_eq!(percent[0].name, "C");
    assert!(repo.find_by_description("perdido").unwrap().is_empty());
}

#[test]
fn save_with_missing_family_rolls_back_and_wraps_storage_error() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteAnimalRepository::try_new(&conn).unwrap();

    let mut animal = Animal::new("Orphan", "Dog", 2, "");
    animal.assign_family(999);
    let err = repo.save_animal(&mut animal).unwrap_err();

    assert!(err.is_storage());
    assert!(err.to_string().starts_with("failed to save animal"));
    assert!(err.source().is_some());
    assert_eq!(animal.id, None);
    assert!(repo.list_animals().unwrap().is_empty());
}

#[test]
fn update_with_missing_family_rolls_back_and_wraps_storage_error() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteAnimalRepository::try_new(&conn).unwrap();

    let mut animal = Animal::new("Rex", "Dog", 3, "friendly");
    let id = repo.save_animal(&mut animal).unwrap();
    let before = repo.get_animal(id).unwrap().unwrap();

    animal.description = "moved to a family".to_string();
    animal.assign_family(999);
    let err = repo.update_animal(&animal).unwrap_err();

    assert!(err.is_storage());
    assert!(err.to_string().starts_with("failed to update animal"));
    assert!(err.source().is_some());
    assert_eq!(repo.get_animal(id).unwrap().unwrap(), before);
}

#[test]
fn update_links_animal_to_persisted_family() {
    let conn = open_db_in_memory().unwrap();
    let animals = SqliteAnimalRepository::try_new(&conn).unwrap();
    let families = SqliteFamilyRepository::try_new(&conn).unwrap();

    let mut animal = Animal::new("Peppa", "Vietnamese pig", 2, "");
    animals.save_animal(&mut animal).unwrap();
    let mut family = Family::new("Gómez", 45, "Madrid").unwrap();
    let family_id = families.register_family(&mut family).unwrap();

    animal.assign_family(family_id);
    animals.update_animal(&animal).unwrap();

    let loaded = animals.get_animal(animal.id.unwrap()).unwrap().unwrap();
    assert_eq!(loaded.family_id, Some(family_id));
    assert!(loaded.is_adopted());
}

#[test]
fn invalid_persisted_status_is_reported() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteAnimalRepository::try_new(&conn).unwrap();
    conn.execute_batch(
        "PRAGMA ignore_check_constraints = ON;
         INSERT INTO animales (nombre, tipo, edad, detalles, estado)
         VALUES ('Rex', 'Dog', 3, '', 'ADOPTADO');",
    )
    .unwrap();

    let err = repo.list_animals().unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(message) if message.contains("ADOPTADO")));
}

#[test]
fn repository_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    match SqliteAnimalRepository::try_new(&conn) {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert_eq!(expected_version, latest_version()),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn repository_rejects_connection_without_animales_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!(
        "CREATE TABLE familias (id INTEGER PRIMARY KEY);
         PRAGMA user_version = {};",
        latest_version()
    ))
    .unwrap();

    assert!(matches!(
        SqliteAnimalRepository::try_new(&conn),
        Err(RepoError::MissingRequiredTable("animales"))
    ));
}
