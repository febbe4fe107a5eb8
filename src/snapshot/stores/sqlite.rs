use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, SecondsFormat, Utc};
use indexmap::IndexMap;
use rusqlite::Connection;
use tracing::{debug, info};

use crate::error::StoreError;
use crate::snapshot::store::SnapshotStore;
use crate::snapshot::types::{Snapshot, SourceResult};
use crate::version::types::Version;

/// Snapshot history kept in SQLite.
///
/// Every save appends a snapshot; `load` returns the newest one. Older
/// snapshots stay available through [`SqliteSnapshotStore::history`].
pub struct SqliteSnapshotStore {
    conn: Mutex<Connection>,
}

impl SqliteSnapshotStore {
    pub fn new(db_path: &Path) -> Result<Self, StoreError> {
        info!("Initializing snapshot database at {:?}", db_path);

        let conn = Connection::open(db_path)?;

        // Enable WAL mode for better concurrency
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;

        debug!("Database connection established");

        let store = Self {
            conn: Mutex::new(conn),
        };

        store.create_schema()?;
        info!("Snapshot store initialized successfully");

        Ok(store)
    }

    /// Acquire database connection lock with proper error handling
    fn lock_conn(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::LockPoisoned)
    }

    fn create_schema(&self) -> Result<(), StoreError> {
        debug!("Creating database schema");

        let conn = self.lock_conn()?;

        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS snapshots (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                taken_at TEXT NOT NULL
            )
            "#,
            [],
        )?;

        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS source_results (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                snapshot_id INTEGER NOT NULL,
                source_id TEXT NOT NULL,
                position INTEGER NOT NULL,
                highest_link TEXT,
                highest_version TEXT,
                FOREIGN KEY (snapshot_id) REFERENCES snapshots(id) ON DELETE CASCADE,
                UNIQUE(snapshot_id, source_id)
            )
            "#,
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_source_results_snapshot_id ON source_results(snapshot_id)",
            [],
        )?;

        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS links (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                source_result_id INTEGER NOT NULL,
                position INTEGER NOT NULL,
                url TEXT NOT NULL,
                FOREIGN KEY (source_result_id) REFERENCES source_results(id) ON DELETE CASCADE
            )
            "#,
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_links_source_result_id ON links(source_result_id)",
            [],
        )?;

        debug!("Database schema created successfully");
        Ok(())
    }

    /// Most recent snapshots first, at most `limit` of them
    pub fn history(&self, limit: usize) -> Result<Vec<Snapshot>, StoreError> {
        let conn = self.lock_conn()?;
        let mut stmt =
            conn.prepare("SELECT id, taken_at FROM snapshots ORDER BY id DESC LIMIT ?1")?;

        let headers = stmt
            .query_map([limit as i64], |row| {
                Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        headers
            .into_iter()
            .map(|(id, taken_at)| Self::read_snapshot(&conn, id, &taken_at))
            .collect()
    }

    fn read_snapshot(
        conn: &Connection,
        snapshot_id: i64,
        taken_at: &str,
    ) -> Result<Snapshot, StoreError> {
        let taken_at = DateTime::parse_from_rfc3339(taken_at)?.with_timezone(&Utc);

        let mut results_stmt = conn.prepare(
            r#"
            SELECT id, source_id, highest_link, highest_version FROM source_results
            WHERE snapshot_id = ?1
            ORDER BY position
            "#,
        )?;
        let rows = results_stmt
            .query_map([snapshot_id], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, Option<String>>(2)?,
                    row.get::<_, Option<String>>(3)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut links_stmt =
            conn.prepare("SELECT url FROM links WHERE source_result_id = ?1 ORDER BY position")?;

        let mut sources = IndexMap::new();
        for (result_id, source_id, highest_link, highest_version) in rows {
            let links = links_stmt
                .query_map([result_id], |row| row.get(0))?
                .collect::<Result<Vec<String>, _>>()?;
            let highest_version = highest_version
                .map(|v| v.parse::<Version>())
                .transpose()?;

            sources.insert(
                source_id,
                SourceResult {
                    links,
                    highest_link,
                    highest_version,
                },
            );
        }

        Ok(Snapshot::new(taken_at, sources))
    }
}

impl SnapshotStore for SqliteSnapshotStore {
    fn load(&self) -> Result<Option<Snapshot>, StoreError> {
        let conn = self.lock_conn()?;
        let latest = conn.query_row(
            "SELECT id, taken_at FROM snapshots ORDER BY id DESC LIMIT 1",
            [],
            |row| Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?)),
        );

        match latest {
            Ok((id, taken_at)) => Self::read_snapshot(&conn, id, &taken_at).map(Some),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, snapshot: &Snapshot) -> Result<(), StoreError> {
        debug!("Saving snapshot with {} sources", snapshot.sources.len());

        let mut conn = self.lock_conn()?;
        let tx = conn.transaction()?;

        tx.execute(
            "INSERT INTO snapshots (taken_at) VALUES (?1)",
            [snapshot
                .taken_at
                .to_rfc3339_opts(SecondsFormat::AutoSi, true)],
        )?;
        let snapshot_id = tx.last_insert_rowid();

        {
            let mut result_stmt = tx.prepare(
                r#"
                INSERT INTO source_results
                    (snapshot_id, source_id, position, highest_link, highest_version)
                VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
            )?;
            let mut link_stmt = tx.prepare(
                "INSERT INTO links (source_result_id, position, url) VALUES (?1, ?2, ?3)",
            )?;

            for (position, (source_id, result)) in snapshot.sources.iter().enumerate() {
                result_stmt.execute((
                    snapshot_id,
                    source_id,
                    position as i64,
                    &result.highest_link,
                    result.highest_version.map(|v| v.to_string()),
                ))?;
                let result_id = tx.last_insert_rowid();

                for (link_position, url) in result.links.iter().enumerate() {
                    link_stmt.execute((result_id, link_position as i64, url))?;
                }
            }
        }

        tx.commit()?;
        Ok(())
    }
}
