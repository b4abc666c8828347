use std::path::Path;

use rusqlite::{Connection, params};

use gc_core::KeyValueStore;

use crate::error::Result;
use crate::schema;

const UPSERT_SQL: &str = "INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, datetime('now'))
     ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at";

/// A single player's persisted state: one row per key in `kv`.
pub struct Store {
    conn: Connection,
}

impl Store {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        schema::initialize(&conn)?;
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        schema::initialize(&conn)?;
        Ok(Self { conn })
    }

    // --- Session keys ---

    pub fn get_value(&self, key: &str) -> Result<Option<String>> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let mut rows = stmt.query([key])?;
        match rows.next()? {
            Some(row) => Ok(Some(row.get(0)?)),
            None => Ok(None),
        }
    }

    pub fn set_value(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(UPSERT_SQL, params![key, value])?;
        tracing::debug!(key, bytes = value.len(), "stored");
        Ok(())
    }

    pub fn remove_value(&self, key: &str) -> Result<()> {
        self.conn.execute("DELETE FROM kv WHERE key = ?1", [key])?;
        Ok(())
    }

    /// Upsert every entry in one transaction: all of them land or none do.
    pub fn set_values(&self, entries: &[(&str, &str)]) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        for (key, value) in entries {
            tx.execute(UPSERT_SQL, params![key, value])?;
        }
        tx.commit()?;
        tracing::debug!(keys = entries.len(), "stored batch");
        Ok(())
    }

    pub fn remove_values(&self, keys: &[&str]) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        for key in keys {
            tx.execute("DELETE FROM kv WHERE key = ?1", [key])?;
        }
        tx.commit()?;
        Ok(())
    }
}

impl KeyValueStore for Store {
    fn get(&self, key: &str) -> gc_core::Result<Option<String>> {
        Ok(self.get_value(key)?)
    }

    fn set(&mut self, key: &str, value: &str) -> gc_core::Result<()> {
        Ok(self.set_value(key, value)?)
    }

    fn remove(&mut self, key: &str) -> gc_core::Result<()> {
        Ok(self.remove_value(key)?)
    }

    fn set_many(&mut self, entries: &[(&str, &str)]) -> gc_core::Result<()> {
        Ok(self.set_values(entries)?)
    }

    fn remove_many(&mut self, keys: &[&str]) -> gc_core::Result<()> {
        Ok(self.remove_values(keys)?)
    }
}
