use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, Result as SqlResult};
use std::path::{Path, PathBuf};

/// Name of the current cache generation. Rows written under any other
/// name are dropped when the store opens.
pub const CACHE_NAME: &str = "photo-grid-v1";

/// The ResponseStore keeps fetched response bodies in a SQLite database.
/// It backs the network-first (API) and cache-first (images) policies.
pub struct ResponseStore {
    conn: Connection,
    db_path: Option<PathBuf>,
}

impl ResponseStore {
    /// Where the database lives by default.
    ///
    /// - Linux: ~/.cache/photo-grid/responses.db
    /// - macOS: ~/Library/Caches/photo-grid/responses.db
    /// - Windows: %LOCALAPPDATA%\photo-grid\responses.db
    pub fn default_db_path() -> PathBuf {
        let mut path = dirs::cache_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(std::env::temp_dir);

        path.push("photo-grid");
        path.push("responses.db");
        path
    }

    /// Open or create the store at `db_path`
    pub fn open(db_path: PathBuf) -> SqlResult<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|_| rusqlite::Error::InvalidPath(db_path.clone()))?;
        }

        let conn = Connection::open(&db_path)?;
        tracing::info!("📁 Response cache at: {}", db_path.display());

        let mut store = ResponseStore {
            conn,
            db_path: Some(db_path),
        };
        store.init_schema()?;
        Ok(store)
    }

    /// Store that lives only as long as the process
    pub fn open_in_memory() -> SqlResult<Self> {
        let mut store = ResponseStore {
            conn: Connection::open_in_memory()?,
            db_path: None,
        };
        store.init_schema()?;
        Ok(store)
    }

    /// Create tables and drop rows left over from older cache generations
    fn init_schema(&mut self) -> SqlResult<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS responses (
                cache_name      TEXT NOT NULL,
                url             TEXT NOT NULL,
                body            BLOB NOT NULL,
                stored_at       INTEGER NOT NULL,
                PRIMARY KEY (cache_name, url)
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_responses_stored_at
             ON responses(stored_at)",
            [],
        )?;

        let stale = self.conn.execute(
            "DELETE FROM responses WHERE cache_name != ?1",
            rusqlite::params![CACHE_NAME],
        )?;
        if stale > 0 {
            tracing::info!("🧹 Dropped {} responses from old cache versions", stale);
        }

        Ok(())
    }

    /// Get the path to the database file (None for in-memory stores)
    pub fn path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    /// Save (or overwrite) the body fetched from `url`
    pub fn put(&self, url: &str, body: &[u8], stored_at: DateTime<Utc>) -> SqlResult<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO responses (cache_name, url, body, stored_at)
             VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![CACHE_NAME, url, body, stored_at.timestamp_millis()],
        )?;
        Ok(())
    }

    /// Body stored for `url`, if any
    pub fn get(&self, url: &str) -> SqlResult<Option<Vec<u8>>> {
        self.conn
            .query_row(
                "SELECT body FROM responses WHERE cache_name = ?1 AND url = ?2",
                rusqlite::params![CACHE_NAME, url],
                |row| row.get(0),
            )
            .optional()
    }

    /// Remove everything stored before `cutoff`
    pub fn prune_older_than(&self, cutoff: DateTime<Utc>) -> SqlResult<usize> {
        self.conn.execute(
            "DELETE FROM responses WHERE stored_at < ?1",
            rusqlite::params![cutoff.timestamp_millis()],
        )
    }

    #[cfg(test)]
    pub fn count(&self) -> SqlResult<i64> {
        self.conn
            .query_row("SELECT COUNT(*) FROM responses", [], |row| row.get(0))
    }
}

// Implement Debug for better error messages
impl std::fmt::Debug for ResponseStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseStore")
            .field("db_path", &self.db_path)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_put_get_overwrite() {
        let store = ResponseStore::open_in_memory().unwrap();
        let now = Utc::now();

        assert_eq!(store.get("https://api.pexels.com/v1/photos/1").unwrap(), None);
        store.put("https://api.pexels.com/v1/photos/1", b"{\"id\":1}", now).unwrap();
        assert_eq!(
            store.get("https://api.pexels.com/v1/photos/1").unwrap(),
            Some(b"{\"id\":1}".to_vec())
        );

        store.put("https://api.pexels.com/v1/photos/1", b"{}", now).unwrap();
        assert_eq!(store.count().unwrap(), 1);
        assert_eq!(store.get("https://api.pexels.com/v1/photos/1").unwrap(), Some(b"{}".to_vec()));
    }

    #[test]
    fn test_prune_older_than() {
        let store = ResponseStore::open_in_memory().unwrap();
        let now = Utc::now();
        store.put("old", b"1", now - Duration::days(8)).unwrap();
        store.put("new", b"2", now).unwrap();

        assert_eq!(store.prune_older_than(now - Duration::days(7)).unwrap(), 1);
        assert_eq!(store.get("new").unwrap(), Some(b"2".to_vec()));
    }

    #[test]
    fn test_reopen_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("responses.db");

        {
            let store = ResponseStore::open(path.clone()).unwrap();
            assert_eq!(store.path(), Some(path.as_path()));
            store.put("https://images.pexels.com/a.jpg", &[0xFF, 0xD8], Utc::now()).unwrap();
        }

        let store = ResponseStore::open(path).unwrap();
        assert_eq!(
            store.get("https://images.pexels.com/a.jpg").unwrap(),
            Some(vec![0xFF, 0xD8])
        );
    }

    #[test]
    fn test_old_cache_versions_dropped_on_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("responses.db");
        {
            let store = ResponseStore::open(path.clone()).unwrap();
            store
                .conn
                .execute(
                    "INSERT INTO responses (cache_name, url, body, stored_at) VALUES ('photo-grid-v0', 'x', x'00', 0)",
                    [],
                )
                .unwrap();
            assert_eq!(store.count().unwrap(), 1);
        }

        let store = ResponseStore::open(path).unwrap();
        assert_eq!(store.count().unwrap(), 0);
    }
}
