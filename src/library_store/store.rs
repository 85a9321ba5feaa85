//! SQLite-backed library store.
//!
//! One guarded write connection plus a small round-robin pool of read-only
//! connections. Every write-composed operation (creates with their parent
//! checks, cascading deletes, multi-row play-count bumps) runs under a
//! `BEGIN IMMEDIATE` transaction so readers never observe a partially
//! applied cascade or increment batch.

use super::models::*;
use super::schema::LIBRARY_VERSIONED_SCHEMAS;
use super::trait_def::{LibraryStore, StoreResult};
use super::StoreError;
use crate::sqlite_persistence::BASE_DB_VERSION;
use anyhow::{bail, Context, Result};
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tracing::info;

#[derive(Clone)]
pub struct SqliteLibraryStore {
    read_pool: Vec<Arc<Mutex<Connection>>>,
    write_conn: Arc<Mutex<Connection>>,
    read_index: Arc<AtomicUsize>,
}

fn init_if_needed(conn: &Connection) -> Result<()> {
    let latest_version = LIBRARY_VERSIONED_SCHEMAS.len() - 1;
    let latest_schema = &LIBRARY_VERSIONED_SCHEMAS[latest_version];

    let table_count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
            [],
            |r| r.get(0),
        )
        .unwrap_or(0);

    if table_count == 0 {
        info!("Creating library db schema at version {}", latest_version);
        latest_schema.create(conn)?;
        return Ok(());
    }

    let db_version: i64 = conn.query_row("PRAGMA user_version", [], |r| r.get(0))?;
    if db_version as usize != BASE_DB_VERSION + latest_version {
        bail!(
            "Library db has unsupported schema version {} (expected {})",
            db_version,
            BASE_DB_VERSION + latest_version
        );
    }
    latest_schema.validate(conn)?;
    Ok(())
}

impl SqliteLibraryStore {
    /// Open (or create) the library database.
    ///
    /// # Arguments
    /// * `db_path` - Path to the SQLite database file
    /// * `read_pool_size` - Number of connections for concurrent reads
    pub fn new<P: AsRef<Path>>(db_path: P, read_pool_size: usize) -> Result<Self> {
        let db_path_ref = db_path.as_ref();

        let write_conn = Connection::open_with_flags(
            db_path_ref,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                | rusqlite::OpenFlags::SQLITE_OPEN_URI
                | rusqlite::OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .context("Failed to open library database")?;

        init_if_needed(&write_conn)?;

        write_conn.pragma_update(None, "journal_mode", "WAL")?;

        let mut read_pool = Vec::with_capacity(read_pool_size);
        for _ in 0..read_pool_size {
            let read_conn = Connection::open_with_flags(
                db_path_ref,
                rusqlite::OpenFlags::SQLITE_OPEN_READ_ONLY
                    | rusqlite::OpenFlags::SQLITE_OPEN_URI
                    | rusqlite::OpenFlags::SQLITE_OPEN_NO_MUTEX,
            )?;
            read_conn.pragma_update(None, "journal_mode", "WAL")?;
            read_pool.push(Arc::new(Mutex::new(read_conn)));
        }

        let store = SqliteLibraryStore {
            write_conn: Arc::new(Mutex::new(write_conn)),
            read_pool,
            read_index: Arc::new(AtomicUsize::new(0)),
        };

        info!(
            "Opened library: {} artists, {} albums, {} tracks",
            store.artists_count(),
            store.albums_count(),
            store.tracks_count()
        );

        Ok(store)
    }

    fn get_read_conn(&self) -> Arc<Mutex<Connection>> {
        let index = self.read_index.fetch_add(1, Ordering::SeqCst) % self.read_pool.len();
        self.read_pool[index].clone()
    }

    // =========================================================================
    // Internal Helper Methods
    // =========================================================================

    fn artist_rowid(conn: &Connection, id: &str) -> Result<Option<i64>, rusqlite::Error> {
        match conn.query_row(
            "SELECT rowid FROM artists WHERE id = ?1",
            params![id],
            |r| r.get(0),
        ) {
            Ok(rowid) => Ok(Some(rowid)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn album_rowid(conn: &Connection, id: &str) -> Result<Option<i64>, rusqlite::Error> {
        match conn.query_row("SELECT rowid FROM albums WHERE id = ?1", params![id], |r| {
            r.get(0)
        }) {
            Ok(rowid) => Ok(Some(rowid)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn track_rowid(conn: &Connection, id: &str) -> Result<Option<i64>, rusqlite::Error> {
        match conn.query_row("SELECT rowid FROM tracks WHERE id = ?1", params![id], |r| {
            r.get(0)
        }) {
            Ok(rowid) => Ok(Some(rowid)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn parse_artist_row(row: &rusqlite::Row) -> rusqlite::Result<Artist> {
        Ok(Artist {
            id: row.get(0)?,
            name: row.get(1)?,
            age: row.get(2)?,
        })
    }

    fn parse_album_row(row: &rusqlite::Row) -> rusqlite::Result<Album> {
        Ok(Album {
            id: row.get(0)?,
            artist_id: row.get(1)?,
            name: row.get(2)?,
            genre: row.get(3)?,
        })
    }

    fn parse_track_row(row: &rusqlite::Row) -> rusqlite::Result<Track> {
        Ok(Track {
            id: row.get(0)?,
            album_id: row.get(1)?,
            artist_id: row.get(2)?,
            name: row.get(3)?,
            duration: row.get(4)?,
            times_played: row.get(5)?,
        })
    }

    const ALBUM_SELECT: &'static str = "SELECT al.id, ar.id, al.name, al.genre
         FROM albums al JOIN artists ar ON ar.rowid = al.artist_rowid";

    const TRACK_SELECT: &'static str =
        "SELECT t.id, al.id, ar.id, t.name, t.duration, t.times_played
         FROM tracks t
         JOIN albums al ON al.rowid = t.album_rowid
         JOIN artists ar ON ar.rowid = al.artist_rowid";

    fn query_artist(conn: &Connection, id: &str) -> Result<Option<Artist>, rusqlite::Error> {
        match conn.query_row(
            "SELECT id, name, age FROM artists WHERE id = ?1",
            params![id],
            Self::parse_artist_row,
        ) {
            Ok(artist) => Ok(Some(artist)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn query_album(conn: &Connection, id: &str) -> Result<Option<Album>, rusqlite::Error> {
        let sql = format!("{} WHERE al.id = ?1", Self::ALBUM_SELECT);
        match conn.query_row(&sql, params![id], Self::parse_album_row) {
            Ok(album) => Ok(Some(album)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn query_track(conn: &Connection, id: &str) -> Result<Option<Track>, rusqlite::Error> {
        let sql = format!("{} WHERE t.id = ?1", Self::TRACK_SELECT);
        match conn.query_row(&sql, params![id], Self::parse_track_row) {
            Ok(track) => Ok(Some(track)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn count(&self, table: &str) -> usize {
        let read_conn = self.get_read_conn();
        let conn = read_conn.lock().unwrap();
        conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |r| {
            r.get::<_, i64>(0)
        })
        .unwrap_or(0) as usize
    }
}

impl LibraryStore for SqliteLibraryStore {
    // =========================================================================
    // Lookup
    // =========================================================================

    fn get_artist(&self, id: &str) -> StoreResult<Option<Artist>> {
        let read_conn = self.get_read_conn();
        let conn = read_conn.lock().unwrap();
        Ok(Self::query_artist(&conn, id)?)
    }

    fn get_album(&self, id: &str) -> StoreResult<Option<Album>> {
        let read_conn = self.get_read_conn();
        let conn = read_conn.lock().unwrap();
        Ok(Self::query_album(&conn, id)?)
    }

    fn get_track(&self, id: &str) -> StoreResult<Option<Track>> {
        let read_conn = self.get_read_conn();
        let conn = read_conn.lock().unwrap();
        Ok(Self::query_track(&conn, id)?)
    }

    // =========================================================================
    // Listing
    // =========================================================================

    fn list_artists(&self) -> StoreResult<Vec<Artist>> {
        let read_conn = self.get_read_conn();
        let conn = read_conn.lock().unwrap();
        let mut stmt = conn.prepare("SELECT id, name, age FROM artists ORDER BY rowid")?;
        let artists = stmt
            .query_map([], Self::parse_artist_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(artists)
    }

    fn list_albums(&self) -> StoreResult<Vec<Album>> {
        let read_conn = self.get_read_conn();
        let conn = read_conn.lock().unwrap();
        let sql = format!("{} ORDER BY al.rowid", Self::ALBUM_SELECT);
        let mut stmt = conn.prepare(&sql)?;
        let albums = stmt
            .query_map([], Self::parse_album_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(albums)
    }

    fn list_tracks(&self) -> StoreResult<Vec<Track>> {
        let read_conn = self.get_read_conn();
        let conn = read_conn.lock().unwrap();
        let sql = format!("{} ORDER BY t.rowid", Self::TRACK_SELECT);
        let mut stmt = conn.prepare(&sql)?;
        let tracks = stmt
            .query_map([], Self::parse_track_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(tracks)
    }

    fn list_artist_albums(&self, artist_id: &str) -> StoreResult<Vec<Album>> {
        let read_conn = self.get_read_conn();
        let conn = read_conn.lock().unwrap();
        let artist_rowid = Self::artist_rowid(&conn, artist_id)?
            .ok_or_else(|| StoreError::not_found("artist", artist_id))?;
        let sql = format!(
            "{} WHERE al.artist_rowid = ?1 ORDER BY al.rowid",
            Self::ALBUM_SELECT
        );
        let mut stmt = conn.prepare(&sql)?;
        let albums = stmt
            .query_map(params![artist_rowid], Self::parse_album_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(albums)
    }

    fn list_artist_tracks(&self, artist_id: &str) -> StoreResult<Vec<Track>> {
        let read_conn = self.get_read_conn();
        let conn = read_conn.lock().unwrap();
        let artist_rowid = Self::artist_rowid(&conn, artist_id)?
            .ok_or_else(|| StoreError::not_found("artist", artist_id))?;
        let sql = format!(
            "{} WHERE al.artist_rowid = ?1 ORDER BY t.rowid",
            Self::TRACK_SELECT
        );
        let mut stmt = conn.prepare(&sql)?;
        let tracks = stmt
            .query_map(params![artist_rowid], Self::parse_track_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(tracks)
    }

    fn list_album_tracks(&self, album_id: &str) -> StoreResult<Vec<Track>> {
        let read_conn = self.get_read_conn();
        let conn = read_conn.lock().unwrap();
        let album_rowid = Self::album_rowid(&conn, album_id)?
            .ok_or_else(|| StoreError::not_found("album", album_id))?;
        let sql = format!(
            "{} WHERE t.album_rowid = ?1 ORDER BY t.rowid",
            Self::TRACK_SELECT
        );
        let mut stmt = conn.prepare(&sql)?;
        let tracks = stmt
            .query_map(params![album_rowid], Self::parse_track_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(tracks)
    }

    // =========================================================================
    // Creation (with transactions)
    // =========================================================================

    fn create_artist(&self, id: &str, new: &NewArtist) -> StoreResult<CreateOutcome<Artist>> {
        let conn = self.write_conn.lock().unwrap();
        conn.execute("BEGIN IMMEDIATE", [])?;

        let result = (|| -> StoreResult<CreateOutcome<Artist>> {
            if let Some(existing) = Self::query_artist(&conn, id)? {
                return Ok(CreateOutcome::Conflict(existing));
            }

            conn.execute(
                "INSERT INTO artists (id, name, age) VALUES (?1, ?2, ?3)",
                params![id, &new.name, new.age],
            )?;

            Ok(CreateOutcome::Created(Artist {
                id: id.to_string(),
                name: new.name.clone(),
                age: new.age,
            }))
        })();

        match result {
            Ok(outcome) => {
                conn.execute("COMMIT", [])?;
                Ok(outcome)
            }
            Err(e) => {
                let _ = conn.execute("ROLLBACK", []);
                Err(e)
            }
        }
    }

    fn create_album(
        &self,
        artist_id: &str,
        id: &str,
        new: &NewAlbum,
    ) -> StoreResult<CreateOutcome<Album>> {
        let conn = self.write_conn.lock().unwrap();
        conn.execute("BEGIN IMMEDIATE", [])?;

        let result = (|| -> StoreResult<CreateOutcome<Album>> {
            let artist_rowid = Self::artist_rowid(&conn, artist_id)?
                .ok_or_else(|| StoreError::missing_parent("artist", artist_id))?;

            if let Some(existing) = Self::query_album(&conn, id)? {
                return Ok(CreateOutcome::Conflict(existing));
            }

            conn.execute(
                "INSERT INTO albums (id, artist_rowid, name, genre) VALUES (?1, ?2, ?3, ?4)",
                params![id, artist_rowid, &new.name, &new.genre],
            )?;

            Ok(CreateOutcome::Created(Album {
                id: id.to_string(),
                artist_id: artist_id.to_string(),
                name: new.name.clone(),
                genre: new.genre.clone(),
            }))
        })();

        match result {
            Ok(outcome) => {
                conn.execute("COMMIT", [])?;
                Ok(outcome)
            }
            Err(e) => {
                let _ = conn.execute("ROLLBACK", []);
                Err(e)
            }
        }
    }

    fn create_track(
        &self,
        album_id: &str,
        id: &str,
        new: &NewTrack,
    ) -> StoreResult<CreateOutcome<Track>> {
        let conn = self.write_conn.lock().unwrap();
        conn.execute("BEGIN IMMEDIATE", [])?;

        let result = (|| -> StoreResult<CreateOutcome<Track>> {
            let album_rowid = Self::album_rowid(&conn, album_id)?
                .ok_or_else(|| StoreError::missing_parent("album", album_id))?;

            if let Some(existing) = Self::query_track(&conn, id)? {
                return Ok(CreateOutcome::Conflict(existing));
            }

            let artist_id: String = conn.query_row(
                "SELECT ar.id FROM artists ar
                 JOIN albums al ON al.artist_rowid = ar.rowid
                 WHERE al.rowid = ?1",
                params![album_rowid],
                |r| r.get(0),
            )?;

            conn.execute(
                "INSERT INTO tracks (id, album_rowid, name, duration, times_played)
                 VALUES (?1, ?2, ?3, ?4, 0)",
                params![id, album_rowid, &new.name, new.duration],
            )?;

            Ok(CreateOutcome::Created(Track {
                id: id.to_string(),
                album_id: album_id.to_string(),
                artist_id,
                name: new.name.clone(),
                duration: new.duration,
                times_played: 0,
            }))
        })();

        match result {
            Ok(outcome) => {
                conn.execute("COMMIT", [])?;
                Ok(outcome)
            }
            Err(e) => {
                let _ = conn.execute("ROLLBACK", []);
                Err(e)
            }
        }
    }

    // =========================================================================
    // Deletion (cascading, with transactions)
    // =========================================================================

    fn delete_artist(&self, id: &str) -> StoreResult<Artist> {
        let conn = self.write_conn.lock().unwrap();
        conn.execute("BEGIN IMMEDIATE", [])?;

        let result = (|| -> StoreResult<Artist> {
            let artist = Self::query_artist(&conn, id)?
                .ok_or_else(|| StoreError::not_found("artist", id))?;
            let rowid = Self::artist_rowid(&conn, id)?
                .ok_or_else(|| StoreError::not_found("artist", id))?;

            // Children first so the hierarchy is never left with orphans
            conn.execute(
                "DELETE FROM tracks WHERE album_rowid IN
                 (SELECT rowid FROM albums WHERE artist_rowid = ?1)",
                params![rowid],
            )?;
            conn.execute(
                "DELETE FROM albums WHERE artist_rowid = ?1",
                params![rowid],
            )?;
            conn.execute("DELETE FROM artists WHERE rowid = ?1", params![rowid])?;

            Ok(artist)
        })();

        match result {
            Ok(artist) => {
                conn.execute("COMMIT", [])?;
                Ok(artist)
            }
            Err(e) => {
                let _ = conn.execute("ROLLBACK", []);
                Err(e)
            }
        }
    }

    fn delete_album(&self, id: &str) -> StoreResult<Album> {
        let conn = self.write_conn.lock().unwrap();
        conn.execute("BEGIN IMMEDIATE", [])?;

        let result = (|| -> StoreResult<Album> {
            let album =
                Self::query_album(&conn, id)?.ok_or_else(|| StoreError::not_found("album", id))?;
            let rowid =
                Self::album_rowid(&conn, id)?.ok_or_else(|| StoreError::not_found("album", id))?;

            conn.execute("DELETE FROM tracks WHERE album_rowid = ?1", params![rowid])?;
            conn.execute("DELETE FROM albums WHERE rowid = ?1", params![rowid])?;

            Ok(album)
        })();

        match result {
            Ok(album) => {
                conn.execute("COMMIT", [])?;
                Ok(album)
            }
            Err(e) => {
                let _ = conn.execute("ROLLBACK", []);
                Err(e)
            }
        }
    }

    fn delete_track(&self, id: &str) -> StoreResult<Track> {
        let conn = self.write_conn.lock().unwrap();
        conn.execute("BEGIN IMMEDIATE", [])?;

        let result = (|| -> StoreResult<Track> {
            let track =
                Self::query_track(&conn, id)?.ok_or_else(|| StoreError::not_found("track", id))?;
            let rowid =
                Self::track_rowid(&conn, id)?.ok_or_else(|| StoreError::not_found("track", id))?;

            conn.execute("DELETE FROM tracks WHERE rowid = ?1", params![rowid])?;

            Ok(track)
        })();

        match result {
            Ok(track) => {
                conn.execute("COMMIT", [])?;
                Ok(track)
            }
            Err(e) => {
                let _ = conn.execute("ROLLBACK", []);
                Err(e)
            }
        }
    }

    // =========================================================================
    // Play counts (with transactions)
    // =========================================================================

    fn play_track(&self, id: &str) -> StoreResult<Track> {
        let conn = self.write_conn.lock().unwrap();
        conn.execute("BEGIN IMMEDIATE", [])?;

        let result = (|| -> StoreResult<Track> {
            let rowid =
                Self::track_rowid(&conn, id)?.ok_or_else(|| StoreError::not_found("track", id))?;
            conn.execute(
                "UPDATE tracks SET times_played = times_played + 1 WHERE rowid = ?1",
                params![rowid],
            )?;
            // The row was just updated under the same transaction
            Ok(Self::query_track(&conn, id)?
                .ok_or_else(|| StoreError::not_found("track", id))?)
        })();

        match result {
            Ok(track) => {
                conn.execute("COMMIT", [])?;
                Ok(track)
            }
            Err(e) => {
                let _ = conn.execute("ROLLBACK", []);
                Err(e)
            }
        }
    }

    fn play_album(&self, id: &str) -> StoreResult<usize> {
        let conn = self.write_conn.lock().unwrap();
        conn.execute("BEGIN IMMEDIATE", [])?;

        let result = (|| -> StoreResult<usize> {
            let rowid =
                Self::album_rowid(&conn, id)?.ok_or_else(|| StoreError::not_found("album", id))?;
            let bumped = conn.execute(
                "UPDATE tracks SET times_played = times_played + 1 WHERE album_rowid = ?1",
                params![rowid],
            )?;
            Ok(bumped)
        })();

        match result {
            Ok(bumped) => {
                conn.execute("COMMIT", [])?;
                Ok(bumped)
            }
            Err(e) => {
                let _ = conn.execute("ROLLBACK", []);
                Err(e)
            }
        }
    }

    fn play_artist(&self, id: &str) -> StoreResult<usize> {
        let conn = self.write_conn.lock().unwrap();
        conn.execute("BEGIN IMMEDIATE", [])?;

        let result = (|| -> StoreResult<usize> {
            let rowid =
                Self::artist_rowid(&conn, id)?.ok_or_else(|| StoreError::not_found("artist", id))?;
            let bumped = conn.execute(
                "UPDATE tracks SET times_played = times_played + 1 WHERE album_rowid IN
                 (SELECT rowid FROM albums WHERE artist_rowid = ?1)",
                params![rowid],
            )?;
            Ok(bumped)
        })();

        match result {
            Ok(bumped) => {
                conn.execute("COMMIT", [])?;
                Ok(bumped)
            }
            Err(e) => {
                let _ = conn.execute("ROLLBACK", []);
                Err(e)
            }
        }
    }

    // =========================================================================
    // Counts
    // =========================================================================

    fn artists_count(&self) -> usize {
        self.count("artists")
    }

    fn albums_count(&self) -> usize {
        self.count("albums")
    }

    fn tracks_count(&self) -> usize {
        self.count("tracks")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn open_store(dir: &TempDir) -> SqliteLibraryStore {
        SqliteLibraryStore::new(dir.path().join("library.db"), 2).unwrap()
    }

    fn seed_artist(store: &SqliteLibraryStore, id: &str, name: &str) -> Artist {
        match store
            .create_artist(
                id,
                &NewArtist {
                    name: name.to_string(),
                    age: 40,
                },
            )
            .unwrap()
        {
            CreateOutcome::Created(artist) => artist,
            CreateOutcome::Conflict(_) => panic!("unexpected conflict seeding artist"),
        }
    }

    fn seed_album(store: &SqliteLibraryStore, artist_id: &str, id: &str, name: &str) -> Album {
        match store
            .create_album(
                artist_id,
                id,
                &NewAlbum {
                    name: name.to_string(),
                    genre: "Rock".to_string(),
                },
            )
            .unwrap()
        {
            CreateOutcome::Created(album) => album,
            CreateOutcome::Conflict(_) => panic!("unexpected conflict seeding album"),
        }
    }

    fn seed_track(store: &SqliteLibraryStore, album_id: &str, id: &str, name: &str) -> Track {
        match store
            .create_track(
                album_id,
                id,
                &NewTrack {
                    name: name.to_string(),
                    duration: 180.0,
                },
            )
            .unwrap()
        {
            CreateOutcome::Created(track) => track,
            CreateOutcome::Conflict(_) => panic!("unexpected conflict seeding track"),
        }
    }

    #[test]
    fn test_create_and_get_artist() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);

        let created = seed_artist(&store, "a1", "Bowie");
        assert_eq!(created.age, 40);

        let fetched = store.get_artist("a1").unwrap().unwrap();
        assert_eq!(fetched, created);
    }

    #[test]
    fn test_create_artist_conflict_returns_existing() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);

        let first = seed_artist(&store, "a1", "Bowie");
        let outcome = store
            .create_artist(
                "a1",
                &NewArtist {
                    name: "Bowie".to_string(),
                    age: 99,
                },
            )
            .unwrap();

        match outcome {
            CreateOutcome::Conflict(existing) => assert_eq!(existing, first),
            CreateOutcome::Created(_) => panic!("expected conflict"),
        }
        // The colliding request must not have overwritten anything
        assert_eq!(store.get_artist("a1").unwrap().unwrap().age, 40);
        assert_eq!(store.artists_count(), 1);
    }

    #[test]
    fn test_create_album_under_missing_artist() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);

        let err = store
            .create_album(
                "ghost",
                "al1",
                &NewAlbum {
                    name: "Low".to_string(),
                    genre: "Art Rock".to_string(),
                },
            )
            .unwrap_err();
        assert!(matches!(err, StoreError::MissingParent { entity: "artist", .. }));
        assert_eq!(store.albums_count(), 0);
    }

    #[test]
    fn test_create_track_under_missing_album() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);

        let err = store
            .create_track(
                "ghost",
                "t1",
                &NewTrack {
                    name: "Speed of Life".to_string(),
                    duration: 166.0,
                },
            )
            .unwrap_err();
        assert!(matches!(err, StoreError::MissingParent { entity: "album", .. }));
        assert_eq!(store.tracks_count(), 0);
    }

    #[test]
    fn test_track_carries_artist_id() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);

        seed_artist(&store, "a1", "Bowie");
        seed_album(&store, "a1", "al1", "Low");
        let track = seed_track(&store, "al1", "t1", "Speed of Life");

        assert_eq!(track.artist_id, "a1");
        assert_eq!(track.album_id, "al1");
        assert_eq!(track.times_played, 0);
    }

    #[test]
    fn test_delete_artist_cascades() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);

        seed_artist(&store, "a1", "Bowie");
        seed_album(&store, "a1", "al1", "Low");
        seed_album(&store, "a1", "al2", "Heroes");
        seed_track(&store, "al1", "t1", "Speed of Life");
        seed_track(&store, "al2", "t2", "Beauty and the Beast");

        // Unrelated records must survive the cascade
        seed_artist(&store, "a2", "Eno");
        seed_album(&store, "a2", "al3", "Another Green World");
        seed_track(&store, "al3", "t3", "Sky Saw");

        let deleted = store.delete_artist("a1").unwrap();
        assert_eq!(deleted.name, "Bowie");

        assert!(store.get_artist("a1").unwrap().is_none());
        assert!(store.get_album("al1").unwrap().is_none());
        assert!(store.get_album("al2").unwrap().is_none());
        assert!(store.get_track("t1").unwrap().is_none());
        assert!(store.get_track("t2").unwrap().is_none());

        assert!(store.get_artist("a2").unwrap().is_some());
        assert!(store.get_album("al3").unwrap().is_some());
        assert!(store.get_track("t3").unwrap().is_some());
    }

    #[test]
    fn test_delete_album_cascades_tracks_only() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);

        seed_artist(&store, "a1", "Bowie");
        seed_album(&store, "a1", "al1", "Low");
        seed_track(&store, "al1", "t1", "Speed of Life");

        let deleted = store.delete_album("al1").unwrap();
        assert_eq!(deleted.name, "Low");

        assert!(store.get_album("al1").unwrap().is_none());
        assert!(store.get_track("t1").unwrap().is_none());
        assert!(store.get_artist("a1").unwrap().is_some());
    }

    #[test]
    fn test_delete_missing_artist() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);

        let err = store.delete_artist("ghost").unwrap_err();
        assert!(matches!(err, StoreError::NotFound { entity: "artist", .. }));
    }

    #[test]
    fn test_play_track_increments() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);

        seed_artist(&store, "a1", "Bowie");
        seed_album(&store, "a1", "al1", "Low");
        seed_track(&store, "al1", "t1", "Speed of Life");

        for expected in 1..=3 {
            let track = store.play_track("t1").unwrap();
            assert_eq!(track.times_played, expected);
        }
    }

    #[test]
    fn test_play_album_bumps_every_track() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);

        seed_artist(&store, "a1", "Bowie");
        seed_album(&store, "a1", "al1", "Low");
        seed_track(&store, "al1", "t1", "Speed of Life");
        seed_track(&store, "al1", "t2", "Breaking Glass");

        let bumped = store.play_album("al1").unwrap();
        assert_eq!(bumped, 2);
        assert_eq!(store.get_track("t1").unwrap().unwrap().times_played, 1);
        assert_eq!(store.get_track("t2").unwrap().unwrap().times_played, 1);
    }

    #[test]
    fn test_play_album_with_no_tracks_is_a_noop() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);

        seed_artist(&store, "a1", "Bowie");
        seed_album(&store, "a1", "al1", "Low");

        let bumped = store.play_album("al1").unwrap();
        assert_eq!(bumped, 0);
    }

    #[test]
    fn test_play_artist_bumps_across_albums() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);

        seed_artist(&store, "a1", "Bowie");
        seed_album(&store, "a1", "al1", "Low");
        seed_album(&store, "a1", "al2", "Heroes");
        seed_track(&store, "al1", "t1", "Speed of Life");
        seed_track(&store, "al2", "t2", "Beauty and the Beast");

        // Tracks of other artists must not be bumped
        seed_artist(&store, "a2", "Eno");
        seed_album(&store, "a2", "al3", "Another Green World");
        seed_track(&store, "al3", "t3", "Sky Saw");

        let bumped = store.play_artist("a1").unwrap();
        assert_eq!(bumped, 2);
        assert_eq!(store.get_track("t1").unwrap().unwrap().times_played, 1);
        assert_eq!(store.get_track("t2").unwrap().unwrap().times_played, 1);
        assert_eq!(store.get_track("t3").unwrap().unwrap().times_played, 0);
    }

    #[test]
    fn test_play_missing_track() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);

        let err = store.play_track("ghost").unwrap_err();
        assert!(matches!(err, StoreError::NotFound { entity: "track", .. }));
    }

    #[test]
    fn test_list_artist_albums_requires_artist() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);

        let err = store.list_artist_albums("ghost").unwrap_err();
        assert!(matches!(err, StoreError::NotFound { entity: "artist", .. }));

        seed_artist(&store, "a1", "Bowie");
        assert!(store.list_artist_albums("a1").unwrap().is_empty());
    }

    #[test]
    fn test_list_artist_tracks_spans_albums() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);

        seed_artist(&store, "a1", "Bowie");
        seed_album(&store, "a1", "al1", "Low");
        seed_album(&store, "a1", "al2", "Heroes");
        seed_track(&store, "al1", "t1", "Speed of Life");
        seed_track(&store, "al2", "t2", "Beauty and the Beast");

        let tracks = store.list_artist_tracks("a1").unwrap();
        let ids: Vec<&str> = tracks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["t1", "t2"]);
    }

    #[test]
    fn test_listing_order_is_insertion_order() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);

        seed_artist(&store, "a1", "Zappa");
        seed_artist(&store, "a2", "Abba");

        let names: Vec<String> = store
            .list_artists()
            .unwrap()
            .into_iter()
            .map(|a| a.name)
            .collect();
        assert_eq!(names, vec!["Zappa".to_string(), "Abba".to_string()]);
    }

    #[test]
    fn test_reopen_preserves_data() {
        let dir = TempDir::new().unwrap();
        {
            let store = open_store(&dir);
            seed_artist(&store, "a1", "Bowie");
        }
        let store = open_store(&dir);
        assert_eq!(store.artists_count(), 1);
        assert!(store.get_artist("a1").unwrap().is_some());
    }
}
