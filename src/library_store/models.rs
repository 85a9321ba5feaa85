//! Library entity models.
//!
//! `Artist`, `Album` and `Track` are full records as stored; the `New*`
//! structs are validated creation payloads, before an identifier has been
//! derived for them.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Artist {
    pub id: String,
    pub name: String,
    pub age: i64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Album {
    pub id: String,
    /// Owning artist, always resolvable.
    pub artist_id: String,
    pub name: String,
    pub genre: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    /// Owning album, always resolvable.
    pub album_id: String,
    /// Artist owning the album, carried so representations can link to it
    /// without another lookup.
    pub artist_id: String,
    pub name: String,
    pub duration: f64,
    pub times_played: i64,
}

/// Validated artist creation payload.
#[derive(Clone, Debug, PartialEq)]
pub struct NewArtist {
    pub name: String,
    pub age: i64,
}

/// Validated album creation payload. The owning artist comes from the path.
#[derive(Clone, Debug, PartialEq)]
pub struct NewAlbum {
    pub name: String,
    pub genre: String,
}

/// Validated track creation payload. The owning album comes from the path.
#[derive(Clone, Debug, PartialEq)]
pub struct NewTrack {
    pub name: String,
    pub duration: f64,
}

/// Outcome of a create operation.
///
/// A colliding derived id is not an error at the store level: the conflicting
/// existing record is returned so callers can surface it.
#[derive(Clone, Debug, PartialEq)]
pub enum CreateOutcome<T> {
    Created(T),
    Conflict(T),
}
