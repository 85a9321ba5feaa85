//! LibraryStore trait definition.
//!
//! Handlers depend on this trait rather than on the SQLite store directly,
//! so the atomicity rules for write-composed operations (cascading deletes,
//! multi-row play-count bumps) are part of the interface contract.

use super::models::*;
use super::StoreError;

pub type StoreResult<T> = Result<T, StoreError>;

pub trait LibraryStore: Send + Sync {
    // =========================================================================
    // Lookup
    // =========================================================================

    fn get_artist(&self, id: &str) -> StoreResult<Option<Artist>>;

    fn get_album(&self, id: &str) -> StoreResult<Option<Album>>;

    fn get_track(&self, id: &str) -> StoreResult<Option<Track>>;

    // =========================================================================
    // Listing
    // =========================================================================

    /// All artists in insertion order.
    fn list_artists(&self) -> StoreResult<Vec<Artist>>;

    fn list_albums(&self) -> StoreResult<Vec<Album>>;

    fn list_tracks(&self) -> StoreResult<Vec<Track>>;

    /// Albums owned by an artist. Fails `NotFound` if the artist is absent;
    /// an artist with no albums yields an empty list.
    fn list_artist_albums(&self, artist_id: &str) -> StoreResult<Vec<Album>>;

    /// Tracks under an artist, gathered across all of its albums.
    fn list_artist_tracks(&self, artist_id: &str) -> StoreResult<Vec<Track>>;

    /// Tracks owned by an album. Fails `NotFound` if the album is absent.
    fn list_album_tracks(&self, album_id: &str) -> StoreResult<Vec<Track>>;

    // =========================================================================
    // Creation
    // =========================================================================

    /// Insert an artist under a pre-derived id. If the id is already taken
    /// the existing record comes back as `Conflict` and nothing is written.
    fn create_artist(&self, id: &str, new: &NewArtist) -> StoreResult<CreateOutcome<Artist>>;

    /// Insert an album under an existing artist. Fails `MissingParent` if the
    /// artist does not exist; conflict semantics as for artists.
    fn create_album(
        &self,
        artist_id: &str,
        id: &str,
        new: &NewAlbum,
    ) -> StoreResult<CreateOutcome<Album>>;

    /// Insert a track under an existing album. `times_played` starts at 0.
    fn create_track(
        &self,
        album_id: &str,
        id: &str,
        new: &NewTrack,
    ) -> StoreResult<CreateOutcome<Track>>;

    // =========================================================================
    // Deletion (cascading, atomic)
    // =========================================================================

    /// Delete an artist and, transitively, all of its albums and their
    /// tracks, in a single transaction. Returns the artist's prior record.
    fn delete_artist(&self, id: &str) -> StoreResult<Artist>;

    /// Delete an album and all of its tracks in a single transaction.
    fn delete_album(&self, id: &str) -> StoreResult<Album>;

    fn delete_track(&self, id: &str) -> StoreResult<Track>;

    // =========================================================================
    // Play counts (atomic per call, monotonically non-decreasing)
    // =========================================================================

    /// Increment one track's play count, returning the updated record.
    fn play_track(&self, id: &str) -> StoreResult<Track>;

    /// Increment the play count of every track on an album in one
    /// transaction. Returns how many tracks were bumped; zero is a valid
    /// no-op success.
    fn play_album(&self, id: &str) -> StoreResult<usize>;

    /// Increment the play count of every track under every album owned by an
    /// artist, in one transaction.
    fn play_artist(&self, id: &str) -> StoreResult<usize>;

    // =========================================================================
    // Counts (startup logging / stats endpoint)
    // =========================================================================

    fn artists_count(&self) -> usize;

    fn albums_count(&self) -> usize;

    fn tracks_count(&self) -> usize;
}
