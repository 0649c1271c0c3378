//! Animal repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide fetch-all, search and CRUD APIs over the `animales` table.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Species and age searches are exact matches; species is case-sensitive.
//! - Description search is case-sensitive substring containment.
//! - Writes run in one transaction each and roll back on failure.
//! - Read paths reject undecodable rows instead of masking them.

use crate::model::animal::{Animal, AnimalId, AnimalStatus};
use crate::model::family::FamilyId;
use crate::repo::{ensure_connection_ready, in_transaction, RepoError, RepoResult};
use log::{debug, info};
use rusqlite::{params, Connection, Params, Row};

const ANIMAL_SELECT_SQL: &str = "SELECT
    id,
    nombre,
    tipo,
    edad,
    detalles,
    estado,
    familia_id
FROM animales";

const ENTITY: &str = "animal";

/// Repository interface for animal data access.
pub trait AnimalRepository {
    /// Returns every animal ordered by id.
    fn list_animals(&self) -> RepoResult<Vec<Animal>>;
    /// Exact, case-sensitive species match.
    fn find_by_species(&self, species: &str) -> RepoResult<Vec<Animal>>;
    fn find_by_age(&self, age: u32) -> RepoResult<Vec<Animal>>;
    /// Animals whose description contains `fragment`.
    fn find_by_description(&self, fragment: &str) -> RepoResult<Vec<Animal>>;
    fn get_animal(&self, id: AnimalId) -> RepoResult<Option<Animal>>;
    /// Inserts `animal` and writes the generated id back into it.
    fn save_animal(&self, animal: &mut Animal) -> RepoResult<AnimalId>;
    /// Overwrites every column of an already saved animal.
    fn update_animal(&self, animal: &Animal) -> RepoResult<()>;
    /// Returns whether a row existed and was removed.
    fn delete_animal(&self, id: AnimalId) -> RepoResult<bool>;
}

/// SQLite-backed animal repository.
pub struct SqliteAnimalRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAnimalRepository<'conn> {
    /// Constructs a repository from a connection returned by `open_db*`.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }

    fn search(
        &self,
        filter: &'static str,
        sql: &str,
        params: impl Params,
    ) -> RepoResult<Vec<Animal>> {
        let animals = query_animals(self.conn, sql, params)
            .map_err(|err| err.with_context(format!("failed to search animals by {filter}")))?;
        debug!(
            "event=animal_search module=repo status=ok filter={filter} rows={}",
            animals.len()
        );
        Ok(animals)
    }
}

impl AnimalRepository for SqliteAnimalRepository<'_> {
    fn list_animals(&self) -> RepoResult<Vec<Animal>> {
        self.search(
            "all",
            &format!("{ANIMAL_SELECT_SQL} ORDER BY id ASC;"),
            params![],
        )
    }

    fn find_by_species(&self, species: &str) -> RepoResult<Vec<Animal>> {
        self.search(
            "species",
            &format!("{ANIMAL_SELECT_SQL} WHERE tipo = ?1 ORDER BY id ASC;"),
            [species],
        )
    }

    fn find_by_age(&self, age: u32) -> RepoResult<Vec<Animal>> {
        self.search(
            "age",
            &format!("{ANIMAL_SELECT_SQL} WHERE edad = ?1 ORDER BY id ASC;"),
            [age],
        )
    }

    fn find_by_description(&self, fragment: &str) -> RepoResult<Vec<Animal>> {
        // instr() keeps `%` and `_` in user input literal, unlike LIKE.
        self.search(
            "description",
            &format!("{ANIMAL_SELECT_SQL} WHERE instr(detalles, ?1) > 0 ORDER BY id ASC;"),
            [fragment],
        )
    }

    fn get_animal(&self, id: AnimalId) -> RepoResult<Option<Animal>> {
        let mut animals = query_animals(
            self.conn,
            &format!("{ANIMAL_SELECT_SQL} WHERE id = ?1;"),
            [id],
        )
        .map_err(|err| err.with_context(format!("failed to load animal {id}")))?;
        Ok(animals.pop())
    }

    fn save_animal(&self, animal: &mut Animal) -> RepoResult<AnimalId> {
        if let Some(id) = animal.id {
            return Err(RepoError::AlreadySaved { entity: ENTITY, id });
        }

        let id = in_transaction(self.conn, "animal_save", "failed to save animal", |tx| {
            tx.execute(
                "INSERT INTO animales (
                    nombre,
                    tipo,
                    edad,
                    detalles,
                    estado,
                    familia_id
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
                params![
                    animal.name.as_str(),
                    animal.species.as_str(),
                    animal.age,
                    animal.description.as_str(),
                    animal.status.map(AnimalStatus::as_db_token),
                    animal.family_id,
                ],
            )?;
            Ok(tx.last_insert_rowid())
        })?;

        animal.id = Some(id);
        info!("event=animal_save module=repo status=ok id={id}");
        Ok(id)
    }

    fn update_animal(&self, animal: &Animal) -> RepoResult<()> {
        let id = animal.id.ok_or(RepoError::Unsaved(ENTITY))?;

        in_transaction(self.conn, "animal_update", "failed to update animal", |tx| {
            let changed = tx.execute(
                "UPDATE animales
                 SET
                    nombre = ?1,
                    tipo = ?2,
                    edad = ?3,
                    detalles = ?4,
                    estado = ?5,
                    familia_id = ?6
                 WHERE id = ?7;",
                params![
                    animal.name.as_str(),
                    animal.species.as_str(),
                    animal.age,
                    animal.description.as_str(),
                    animal.status.map(AnimalStatus::as_db_token),
                    animal.family_id,
                    id,
                ],
            )?;

            if changed == 0 {
                return Err(RepoError::NotFound { entity: ENTITY, id });
            }
            Ok(())
        })?;

        info!(
            "event=animal_update module=repo status=ok id={id} adopted={}",
            animal.is_adopted()
        );
        Ok(())
    }

    fn delete_animal(&self, id: AnimalId) -> RepoResult<bool> {
        let removed = in_transaction(
            self.conn,
            "animal_delete",
            &format!("failed to delete animal {id}"),
            |tx| {
                let changed = tx.execute("DELETE FROM animales WHERE id = ?1;", [id])?;
                Ok(changed > 0)
            },
        )?;

        info!("event=animal_delete module=repo status=ok id={id} removed={removed}");
        Ok(removed)
    }
}

/// Animals adopted by one family, ordered by id.
pub(crate) fn query_adopted_animals(
    conn: &Connection,
    family_id: FamilyId,
) -> RepoResult<Vec<Animal>> {
    query_animals(
        conn,
        &format!("{ANIMAL_SELECT_SQL} WHERE familia_id = ?1 ORDER BY id ASC;"),
        [family_id],
    )
}

fn query_animals(conn: &Connection, sql: &str, params: impl Params) -> RepoResult<Vec<Animal>> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query(params)?;
    let mut animals = Vec::new();

    while let Some(row) = rows.next()? {
        animals.push(parse_animal_row(row)?);
    }

    Ok(animals)
}

fn parse_animal_row(row: &Row<'_>) -> RepoResult<Animal> {
    let id: AnimalId = row.get("id")?;

    let raw_age: i64 = row.get("edad")?;
    let age = u32::try_from(raw_age).map_err(|_| {
        RepoError::InvalidData(format!("invalid age `{raw_age}` in animales.edad for id {id}"))
    })?;

    let status = match row.get::<_, Option<String>>("estado")? {
        Some(token) => Some(AnimalStatus::from_db_token(&token).ok_or_else(|| {
            RepoError::InvalidData(format!(
                "invalid status `{token}` in animales.estado for id {id}"
            ))
        })?),
        None => None,
    };

    Ok(Animal {
        id: Some(id),
        name: row.get("nombre")?,
        species: row.get("tipo")?,
        age,
        description: row.get("detalles")?,
        status,
        family_id: row.get("familia_id")?,
    })
}
