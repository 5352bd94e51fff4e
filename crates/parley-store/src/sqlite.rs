use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Mutex;

use rusqlite::{Connection, OptionalExtension};
use tracing::info;

use crate::store::{Fields, KeyValueStore, StoreError};

/// SQLite-backed store: one `records` row per (key, field) pair, which
/// gives the flat hash-per-key model a durable home without changing its
/// semantics. WAL mode for concurrent readers.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;

        conn.pragma_update(None, "journal_mode", "WAL")?;

        migrate(&conn)?;

        info!("Store opened at {}", path.display());
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn with_conn<F, T>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut Connection) -> Result<T, StoreError>,
    {
        let mut conn = self.conn.lock().map_err(|_| StoreError::LockPoisoned)?;
        f(&mut conn)
    }
}

fn migrate(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS records (
            key    TEXT NOT NULL,
            field  TEXT NOT NULL,
            value  TEXT NOT NULL,
            PRIMARY KEY (key, field)
        );
        ",
    )?;

    info!("Store migrations complete");
    Ok(())
}

/// Escape LIKE wildcards in a literal key prefix. Minted keys never
/// contain `%` or `_`, but the scan contract is for arbitrary prefixes.
fn like_pattern(prefix: &str) -> String {
    let mut pattern = String::with_capacity(prefix.len() + 1);
    for c in prefix.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

impl KeyValueStore for SqliteStore {
    fn put(&self, key: &str, fields: Fields) -> Result<(), StoreError> {
        self.with_conn(|conn| {
            let tx = conn.transaction()?;
            {
                let mut stmt = tx.prepare(
                    "INSERT INTO records (key, field, value) VALUES (?1, ?2, ?3)
                     ON CONFLICT (key, field) DO UPDATE SET value = excluded.value",
                )?;
                for (field, value) in &fields {
                    stmt.execute((key, field, value))?;
                }
            }
            tx.commit()?;
            Ok(())
        })
    }

    fn get_field(&self, key: &str, field: &str) -> Result<Option<String>, StoreError> {
        self.with_conn(|conn| {
            let value = conn
                .query_row(
                    "SELECT value FROM records WHERE key = ?1 AND field = ?2",
                    (key, field),
                    |row| row.get(0),
                )
                .optional()?;
            Ok(value)
        })
    }

    fn scan_keys(&self, prefix: &str) -> Result<BTreeSet<String>, StoreError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT DISTINCT key FROM records WHERE key LIKE ?1 ESCAPE '\\' ORDER BY key",
            )?;
            let keys = stmt
                .query_map([like_pattern(prefix)], |row| row.get::<_, String>(0))?
                .collect::<Result<BTreeSet<_>, _>>()?;
            Ok(keys)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn open_temp() -> (SqliteStore, std::path::PathBuf) {
        let path = std::env::temp_dir().join(format!("parley_store_test_{}.db", Uuid::new_v4()));
        (SqliteStore::open(&path).unwrap(), path)
    }

    fn fields(pairs: &[(&str, &str)]) -> Fields {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn round_trips_fields_and_overwrites_per_field() {
        let (store, path) = open_temp();

        store
            .put("CHATROOM:1", fields(&[("topic", "first"), ("chatroomid", "CHATROOM:1")]))
            .unwrap();
        store.put("CHATROOM:1", fields(&[("topic", "second")])).unwrap();

        assert_eq!(store.get_field("CHATROOM:1", "topic").unwrap().as_deref(), Some("second"));
        assert_eq!(
            store.get_field("CHATROOM:1", "chatroomid").unwrap().as_deref(),
            Some("CHATROOM:1")
        );
        assert_eq!(store.get_field("CHATROOM:1", "missing").unwrap(), None);

        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn scan_isolates_sibling_prefixes() {
        let (store, path) = open_temp();

        store.put("MESSAGE:CHATROOM:a:1", fields(&[("message", "hi")])).unwrap();
        store.put("MESSAGE:CHATROOM:a:2", fields(&[("message", "yo")])).unwrap();
        store.put("MESSAGE:CHATROOM:b:1", fields(&[("message", "no")])).unwrap();
        store.put("USER:1", fields(&[("nickname", "ada")])).unwrap();

        let keys = store.scan_keys("MESSAGE:CHATROOM:a:").unwrap();
        assert_eq!(keys.len(), 2);
        assert!(keys.iter().all(|k| k.starts_with("MESSAGE:CHATROOM:a:")));

        assert_eq!(store.scan_keys("USER:").unwrap().len(), 1);
        assert_eq!(store.scan_keys("MESSAGE:").unwrap().len(), 3);

        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("USER:"), "USER:%");
        assert_eq!(like_pattern("a%b_c"), "a\\%b\\_c%");
    }
}
