use shelter_core::db::open_db_in_memory;
use shelter_core::{
    first_adoptable, AnimalStatus, FamilyRepository, FamilyValidationError, NewAnimal, NewFamily,
    ServiceError, ShelterService, SqliteAnimalRepository, SqliteFamilyRepository,
};
use rusqlite::Connection;

fn service(
    conn: &Connection,
) -> ShelterService<SqliteAnimalRepository<'_>, SqliteFamilyRepository<'_>> {
    ShelterService::new(
        SqliteAnimalRepository::try_new(conn).unwrap(),
        SqliteFamilyRepository::try_new(conn).unwrap(),
    )
}

fn new_animal(name: &str, species: &str, age: u32, description: &str) -> NewAnimal {
    NewAnimal {
        name: name.to_string(),
        species: species.to_string(),
        age,
        description: description.to_string(),
        status: None,
    }
}

fn new_family(name: &str, age: u32, city: &str) -> NewFamily {
    NewFamily {
        name: name.to_string(),
        age,
        city: city.to_string(),
    }
}

#[test]
fn register_animal_returns_saved_animal() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let mut request = new_animal("Luna", "Cat", 2, "playful");
    request.status = Some(AnimalStatus::RecentlyAbandoned);
    let animal = service.register_animal(request).unwrap();

    assert!(animal.id.is_some());
    assert_eq!(animal.status, Some(AnimalStatus::RecentlyAbandoned));
    assert_eq!(service.list_animals().unwrap(), vec![animal]);
}

#[test]
fn searches_delegate_to_repository_semantics() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    service.register_animal(new_animal("Rex", "Dog", 3, "en refugio")).unwrap();
    service.register_animal(new_animal("Luna", "Cat", 3, "recién abandonado")).unwrap();

    assert_eq!(service.search_by_species("Dog").unwrap().len(), 1);
    assert!(service.search_by_species("dog").unwrap().is_empty());
    assert_eq!(service.search_by_age(3).unwrap().len(), 2);
    assert_eq!(service.search_by_description("abandonado").unwrap()[0].name, "Luna");
}

#[test]
fn adoption_links_first_animal_of_species_ignoring_case() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    service.register_animal(new_animal("Luna", "Cat", 2, "")).unwrap();
    let first_dog = service.register_animal(new_animal("Rex", "Dog", 3, "")).unwrap();
    service.register_animal(new_animal("Toby", "Dog", 5, "")).unwrap();

    let animals = service.list_animals().unwrap();
    let picked = first_adoptable(&animals, "dog").unwrap().clone();
    assert_eq!(picked, first_dog);

    let (animal, family) = service
        .adopt(picked, new_family("Gómez", 45, "Madrid"))
        .unwrap();
    let family_id = family.id().unwrap();
    assert_eq!(animal.family_id, Some(family_id));

    let families = SqliteFamilyRepository::try_new(&conn).unwrap();
    let adopted = families.adopted_animals(family_id).unwrap();
    assert_eq!(adopted.len(), 1);
    assert_eq!(adopted[0].name, "Rex");
}

#[test]
fn first_adoptable_finds_nothing_for_unknown_species_or_empty_shelter() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    assert!(first_adoptable(&[], "Dog").is_none());

    service.register_animal(new_animal("Luna", "Cat", 2, "")).unwrap();
    let animals = service.list_animals().unwrap();
    assert!(first_adoptable(&animals, "Spider").is_none());
    assert!(service.list_families().unwrap().is_empty());
}

#[test]
fn invalid_family_is_rejected_before_any_write() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let rex = service.register_animal(new_animal("Rex", "Dog", 3, "")).unwrap();
    let err = service.adopt(rex.clone(), new_family("Gómez", 45, "  ")).unwrap_err();

    assert!(matches!(
        err,
        ServiceError::InvalidFamily(FamilyValidationError::EmptyCity)
    ));
    assert!(service.list_families().unwrap().is_empty());
    let animals = service.list_animals().unwrap();
    assert_eq!(first_adoptable(&animals, "DOG"), Some(&rex));
}
