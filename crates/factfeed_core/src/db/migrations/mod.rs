//! Ordered schema steps for the `facts` table.
//!
//! # Invariants
//! - Step versions start at 1 and increase by exactly one.
//! - After a successful run `PRAGMA user_version` equals
//!   `FACTS_SCHEMA_VERSION`.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

struct SchemaStep {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const FACT_SCHEMA_STEPS: &[SchemaStep] = &[SchemaStep {
    version: 1,
    name: "create_facts",
    sql: include_str!("0001_facts.sql"),
}];

/// Facts schema version this build writes.
pub const FACTS_SCHEMA_VERSION: u32 = 1;

/// Returns the newest facts schema version known to this build.
pub fn latest_version() -> u32 {
    FACT_SCHEMA_STEPS.last().map_or(0, |step| step.version)
}

/// Reads the facts schema version recorded in the database.
pub fn schema_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}

/// Runs every step above the recorded version inside one transaction.
///
/// Returns the number of steps applied; zero when already current.
///
/// # Errors
/// - `SchemaTooNew` when the file is ahead of this build. Nothing is
///   touched in that case.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<usize> {
    let found = schema_version(conn)?;
    let supported = latest_version();
    if found > supported {
        return Err(DbError::SchemaTooNew { found, supported });
    }

    let pending: Vec<&SchemaStep> = FACT_SCHEMA_STEPS
        .iter()
        .filter(|step| step.version > found)
        .collect();
    if pending.is_empty() {
        return Ok(0);
    }

    let tx = conn.transaction()?;
    for step in &pending {
        tx.execute_batch(step.sql)?;
        tx.pragma_update(None, "user_version", step.version)?;
        info!(
            "event=db_migrate module=db status=ok step={} version={}",
            step.name, step.version
        );
    }
    tx.commit()?;

    Ok(pending.len())
}

#[cfg(test)]
mod tests {
    use super::{
        apply_migrations, latest_version, schema_version, FACTS_SCHEMA_VERSION,
        FACT_SCHEMA_STEPS,
    };
    use rusqlite::Connection;

    #[test]
    fn steps_are_contiguous_and_match_schema_constant() {
        for (index, step) in FACT_SCHEMA_STEPS.iter().enumerate() {
            assert_eq!(step.version as usize, index + 1, "step {}", step.name);
        }
        assert_eq!(latest_version(), FACTS_SCHEMA_VERSION);
    }

    #[test]
    fn fresh_database_gets_vote_columns_once() {
        let mut conn = Connection::open_in_memory().unwrap();
        assert_eq!(schema_version(&conn).unwrap(), 0);

        assert_eq!(apply_migrations(&mut conn).unwrap(), 1);
        assert_eq!(apply_migrations(&mut conn).unwrap(), 0);
        assert_eq!(schema_version(&conn).unwrap(), FACTS_SCHEMA_VERSION);

        conn.execute(
            "INSERT INTO facts (text, source, category) VALUES ('t', 'https://x.com', 'news');",
            [],
        )
        .unwrap();
        let default_votes: (u32, u32, u32) = conn
            .query_row(
                "SELECT v_interest, v_mindblow, v_false FROM facts;",
                [],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .unwrap();
        assert_eq!(default_votes, (0, 0, 0));
    }
}
