//! Family repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide fetch-all, lookup and CRUD APIs over the `familias` table.
//! - Expose the animals adopted by a family.
//!
//! # Invariants
//! - Every write runs in its own transaction and rolls back on failure.
//! - Deleting a family deletes its adopted animals (`ON DELETE CASCADE`).
//! - Rows read back must pass `Family` validation.

use crate::model::animal::Animal;
use crate::model::family::{Family, FamilyId};
use crate::repo::animal_repo::query_adopted_animals;
use crate::repo::{ensure_connection_ready, in_transaction, RepoError, RepoResult};
use log::{debug, info};
use rusqlite::{params, Connection, Params, Row};

const FAMILY_SELECT_SQL: &str = "SELECT
    id,
    nombre,
    edad,
    ciudad
FROM familias";

const ENTITY: &str = "family";

/// Repository interface for adopting families.
pub trait FamilyRepository {
    /// Returns every family ordered by id.
    fn list_families(&self) -> RepoResult<Vec<Family>>;
    fn get_family(&self, id: FamilyId) -> RepoResult<Option<Family>>;
    /// Exact city match.
    fn find_by_city(&self, city: &str) -> RepoResult<Vec<Family>>;
    /// Inserts `family` and writes the generated id back into it.
    fn register_family(&self, family: &mut Family) -> RepoResult<FamilyId>;
    fn modify_family(&self, family: &Family) -> RepoResult<()>;
    /// Returns whether a row existed and was removed.
    fn delete_family(&self, id: FamilyId) -> RepoResult<bool>;
    fn adopted_animals(&self, id: FamilyId) -> RepoResult<Vec<Animal>>;
}

/// SQLite-backed family repository.
pub struct SqliteFamilyRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteFamilyRepository<'conn> {
    /// Constructs a repository from a connection returned by `open_db*`.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl FamilyRepository for SqliteFamilyRepository<'_> {
    fn list_families(&self) -> RepoResult<Vec<Family>> {
        let families = query_families(
            self.conn,
            &format!("{FAMILY_SELECT_SQL} ORDER BY id ASC;"),
            params![],
        )
        .map_err(|err| err.with_context("failed to list families"))?;
        debug!(
            "event=family_list module=repo status=ok rows={}",
            families.len()
        );
        Ok(families)
    }

    fn get_family(&self, id: FamilyId) -> RepoResult<Option<Family>> {
        let mut families = query_families(
            self.conn,
            &format!("{FAMILY_SELECT_SQL} WHERE id = ?1;"),
            [id],
        )
        .map_err(|err| err.with_context(format!("failed to find family with id {id}")))?;
        Ok(families.pop())
    }

    fn find_by_city(&self, city: &str) -> RepoResult<Vec<Family>> {
        let families = query_families(
            self.conn,
            &format!("{FAMILY_SELECT_SQL} WHERE ciudad = ?1 ORDER BY id ASC;"),
            [city],
        )
        .map_err(|err| err.with_context("failed to search families by city"))?;
        debug!(
            "event=family_search module=repo status=ok filter=city rows={}",
            families.len()
        );
        Ok(families)
    }

    fn register_family(&self, family: &mut Family) -> RepoResult<FamilyId> {
        if let Some(id) = family.id() {
            return Err(RepoError::AlreadySaved { entity: ENTITY, id });
        }

        let id = in_transaction(
            self.conn,
            "family_register",
            "failed to register family",
            |tx| {
                tx.execute(
                    "INSERT INTO familias (nombre, edad, ciudad) VALUES (?1, ?2, ?3);",
                    params![family.name(), family.age(), family.city()],
                )?;
                Ok(tx.last_insert_rowid())
            },
        )?;

        family.assign_id(id);
        info!("event=family_register module=repo status=ok id={id}");
        Ok(id)
    }

    fn modify_family(&self, family: &Family) -> RepoResult<()> {
        let id = family.id().ok_or(RepoError::Unsaved(ENTITY))?;

        in_transaction(
            self.conn,
            "family_modify",
            "failed to update family information",
            |tx| {
                let changed = tx.execute(
                    "UPDATE familias
                     SET
                        nombre = ?1,
                        edad = ?2,
                        ciudad = ?3
                     WHERE id = ?4;",
                    params![family.name(), family.age(), family.city(), id],
                )?;

                if changed == 0 {
                    return Err(RepoError::NotFound { entity: ENTITY, id });
                }
                Ok(())
            },
        )?;

        info!("event=family_modify module=repo status=ok id={id}");
        Ok(())
    }

    fn delete_family(&self, id: FamilyId) -> RepoResult<bool> {
        let removed = in_transaction(
            self.conn,
            "family_delete",
            &format!("failed to delete family with id {id}"),
            |tx| {
                let changed = tx.execute("DELETE FROM familias WHERE id = ?1;", [id])?;
                Ok(changed > 0)
            },
        )?;

        info!("event=family_delete module=repo status=ok id={id} removed={removed}");
        Ok(removed)
    }

    fn adopted_animals(&self, id: FamilyId) -> RepoResult<Vec<Animal>> {
        query_adopted_animals(self.conn, id).map_err(|err| {
            err.with_context(format!("failed to load animals adopted by family {id}"))
        })
    }
}

fn query_families(conn: &Connection, sql: &str, params: impl Params) -> RepoResult<Vec<Family>> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query(params)?;
    let mut families = Vec::new();

    while let Some(row) = rows.next()? {
        families.push(parse_family_row(row)?);
    }

    Ok(families)
}

fn parse_family_row(row: &Row<'_>) -> RepoResult<Family> {
    let id: FamilyId = row.get("id")?;

    let raw_age: i64 = row.get("edad")?;
    let age = u32::try_from(raw_age).map_err(|_| {
        RepoError::InvalidData(format!("invalid age `{raw_age}` in familias.edad for id {id}"))
    })?;

    let name: String = row.get("nombre")?;
    let city: String = row.get("ciudad")?;
    Ok(Family::with_id(id, name, age, city)?)
}
