//! Hypermedia representations.
//!
//! Every entity serializes with navigation links to itself and to its
//! relations. The builders are pure functions of `(entity, base_url)` with
//! no dependence on ambient request state, so link shapes are trivially
//! testable.

use crate::library_store::{Album, Artist, Track};
use axum::http::HeaderMap;
use serde_json::{json, Value};

/// Resolve the base URL for link generation: the configured public URL when
/// present, otherwise the request's Host header.
pub fn request_base_url(headers: &HeaderMap, public_url: Option<&str>) -> String {
    if let Some(url) = public_url {
        return url.trim_end_matches('/').to_string();
    }
    let host = headers
        .get("host")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("localhost");
    format!("http://{}", host)
}

pub fn artist_json(artist: &Artist, base_url: &str) -> Value {
    let self_url = format!("{}/artists/{}", base_url, artist.id);
    json!({
        "id": artist.id,
        "name": artist.name,
        "age": artist.age,
        "self": self_url,
        "albums": format!("{}/albums", self_url),
        "tracks": format!("{}/tracks", self_url),
    })
}

pub fn album_json(album: &Album, base_url: &str) -> Value {
    let self_url = format!("{}/albums/{}", base_url, album.id);
    json!({
        "id": album.id,
        "name": album.name,
        "genre": album.genre,
        "self": self_url,
        "tracks": format!("{}/tracks", self_url),
        "artist": format!("{}/artists/{}", base_url, album.artist_id),
    })
}

pub fn track_json(track: &Track, base_url: &str) -> Value {
    json!({
        "id": track.id,
        "name": track.name,
        "duration": track.duration,
        "times_played": track.times_played,
        "self": format!("{}/tracks/{}", base_url, track.id),
        "album": format!("{}/albums/{}", base_url, track.album_id),
        "artist": format!("{}/artists/{}", base_url, track.artist_id),
    })
}
