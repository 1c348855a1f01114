use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::Connection;

use crate::parser::candidate::JokeCandidate;

/// Title stored for jokes committed without one.
pub const PLACEHOLDER_TITLE: &str = "Untitled Joke";

pub fn connect(path: &Path) -> Result<Connection> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).with_context(|| format!("Failed to create {:?}", dir))?;
    }
    let conn = Connection::open(path).with_context(|| format!("Failed to open {:?}", path))?;
    conn.execute_batch("PRAGMA journal_mode=WAL;")?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS jokes (
            id         TEXT PRIMARY KEY,
            title      TEXT NOT NULL,
            body       TEXT NOT NULL DEFAULT '',
            source     TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_jokes_created ON jokes(created_at);
        ",
    )?;
    Ok(())
}

pub struct JokeRow {
    pub id: String,
    pub title: String,
    pub body: String,
    pub source: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Store committed candidates, one row each, in a single transaction.
pub fn save_jokes(conn: &Connection, jokes: &[JokeCandidate], source: Option<&str>) -> Result<usize> {
    let now = Utc::now();
    let tx = conn.unchecked_transaction()?;
    let mut count = 0;
    {
        let mut stmt = tx.prepare(
            "INSERT INTO jokes (id, title, body, source, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
        )?;
        for j in jokes {
            let title = match j.title().trim() {
                "" => PLACEHOLDER_TITLE,
                t => t,
            };
            count += stmt.execute(rusqlite::params![
                j.id().to_string(),
                title,
                j.body().trim(),
                source,
                now,
            ])?;
        }
    }
    tx.commit()?;
    Ok(count)
}

pub fn fetch_jokes(conn: &Connection, limit: usize) -> Result<Vec<JokeRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, title, body, source, created_at
         FROM jokes
         ORDER BY created_at DESC, rowid DESC
         LIMIT ?1",
    )?;
    let rows = stmt
        .query_map([limit as i64], |row| {
            Ok(JokeRow {
                id: row.get(0)?,
                title: row.get(1)?,
                body: row.get(2)?,
                source: row.get(3)?,
                created_at: row.get(4)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn count_jokes(conn: &Connection) -> Result<usize> {
    let n: i64 = conn.query_row("SELECT COUNT(*) FROM jokes", [], |r| r.get(0))?;
    Ok(n as usize)
}
