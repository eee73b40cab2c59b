//! SQLite-backed persistence gateway.
//!
//! # Responsibility
//! - Implement `FactGateway` over the `facts` table.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Read paths reject invalid persisted rows instead of masking them.
//! - Ties on `created_at` are broken by `id` in the same direction, so page
//!   order is deterministic.

use crate::gateway::{FactGateway, FactQuery, StoreError, StoreResult};
use crate::model::category::is_valid_category;
use crate::model::fact::{Fact, FactId, NewFact, VoteField};
use log::{debug, warn};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

const FACT_SELECT_SQL: &str = "SELECT
    id,
    text,
    source,
    category,
    v_interest,
    v_mindblow,
    v_false,
    created_at
FROM facts";

/// Gateway over a migrated facts connection.
pub struct SqliteFactGateway<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteFactGateway<'conn> {
    /// Wraps a connection returned by `open_db`/`open_db_in_memory`.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn get_fact(&self, fact_id: FactId) -> StoreResult<Option<Fact>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{FACT_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([fact_id])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_fact_row(row)?)),
            None => Ok(None),
        }
    }

    fn read_back(&self, fact_id: FactId) -> StoreResult<Fact> {
        self.get_fact(fact_id)?
            .ok_or(StoreError::NotFound(fact_id))
    }
}

impl FactGateway for SqliteFactGateway<'_> {
    fn fetch_facts(&self, query: &FactQuery) -> StoreResult<Vec<Fact>> {
        let mut sql = format!("{FACT_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(category) = query.category.as_ref() {
            sql.push_str(" AND category = ?");
            bind_values.push(Value::Text(category.clone()));
        }

        if query.newest_first {
            sql.push_str(" ORDER BY created_at DESC, id DESC");
        } else {
            sql.push_str(" ORDER BY created_at ASC, id ASC");
        }
        sql.push_str(" LIMIT ?");
        bind_values.push(Value::Integer(i64::from(query.limit)));

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut facts = Vec::new();
        while let Some(row) = rows.next()? {
            facts.push(parse_fact_row(row)?);
        }

        debug!(
            "event=store_fetch module=gateway status=ok rows={} filtered={}",
            facts.len(),
            query.category.is_some()
        );
        Ok(facts)
    }

    fn insert_fact(&self, fact: &NewFact) -> StoreResult<Fact> {
        if !is_valid_category(&fact.category) {
            return Err(StoreError::InvalidData(format!(
                "unknown category `{}`",
                fact.category
            )));
        }

        self.conn.execute(
            "INSERT INTO facts (text, source, category) VALUES (?1, ?2, ?3);",
            params![
                fact.text.as_str(),
                fact.source.as_str(),
                fact.category.as_str()
            ],
        )?;

        let fact_id = self.conn.last_insert_rowid();
        debug!("event=store_insert module=gateway status=ok fact_id={fact_id}");
        self.read_back(fact_id)
    }

    fn increment_vote(
        &self,
        fact_id: FactId,
        field: VoteField,
        current_value: u32,
    ) -> StoreResult<Fact> {
        let next_value = current_value.checked_add(1).ok_or_else(|| {
            StoreError::InvalidData(format!("{} counter overflow on fact {fact_id}", field))
        })?;

        let changed = self.conn.execute(
            &format!("UPDATE facts SET {} = ?2 WHERE id = ?1;", field.column()),
            params![fact_id, i64::from(next_value)],
        )?;

        if changed == 0 {
            warn!(
                "event=store_vote module=gateway status=error fact_id={fact_id} error_code=store_not_found"
            );
            return Err(StoreError::NotFound(fact_id));
        }

        debug!(
            "event=store_vote module=gateway status=ok fact_id={fact_id} field={field} value={next_value}"
        );
        self.read_back(fact_id)
    }
}

fn parse_fact_row(row: &Row<'_>) -> StoreResult<Fact> {
    let id: FactId = row.get("id")?;
    let category: String = row.get("category")?;
    if !is_valid_category(&category) {
        return Err(StoreError::InvalidData(format!(
            "unknown category `{category}` in facts.category for id {id}"
        )));
    }

    Ok(Fact {
        id,
        text: row.get("text")?,
        source: row.get("source")?,
        category,
        votes_interest: parse_counter(row, id, VoteField::Interest)?,
        votes_mindblow: parse_counter(row, id, VoteField::Mindblow)?,
        votes_false: parse_counter(row, id, VoteField::False)?,
        created_at: row.get("created_at")?,
    })
}

fn parse_counter(row: &Row<'_>, id: FactId, field: VoteField) -> StoreResult<u32> {
    let raw: i64 = row.get(field.column())?;
    u32::try_from(raw).map_err(|_| {
        StoreError::InvalidData(format!(
            "invalid counter `{raw}` in facts.{} for id {id}",
            field.column()
        ))
    })
}
