//! Validation of creation payloads.
//!
//! Runs before identifier derivation and before any store access: a payload
//! either becomes a typed `New*` value or fails with a `PayloadError`.
//! Conflict detection and referential checks are separate concerns handled
//! by the store afterwards.

use super::models::{NewAlbum, NewArtist, NewTrack};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum PayloadError {
    #[error("Field '{field}' is required but was missing")]
    MissingField { field: &'static str },

    #[error("Field '{field}' must be a {expected}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
    },

    #[error("Field '{field}' must not be empty")]
    EmptyField { field: &'static str },
}

pub type PayloadResult<T> = Result<T, PayloadError>;

fn require_string(body: &Value, field: &'static str) -> PayloadResult<String> {
    let value = body
        .get(field)
        .ok_or(PayloadError::MissingField { field })?;
    let s = value
        .as_str()
        .ok_or(PayloadError::WrongType {
            field,
            expected: "string",
        })?;
    if s.trim().is_empty() {
        return Err(PayloadError::EmptyField { field });
    }
    Ok(s.to_string())
}

fn require_integer(body: &Value, field: &'static str) -> PayloadResult<i64> {
    let value = body
        .get(field)
        .ok_or(PayloadError::MissingField { field })?;
    value.as_i64().ok_or(PayloadError::WrongType {
        field,
        expected: "integer",
    })
}

fn require_number(body: &Value, field: &'static str) -> PayloadResult<f64> {
    let value = body
        .get(field)
        .ok_or(PayloadError::MissingField { field })?;
    value.as_f64().ok_or(PayloadError::WrongType {
        field,
        expected: "number",
    })
}

/// Validate an artist creation payload: {name, age}.
pub fn artist_payload(body: &Value) -> PayloadResult<NewArtist> {
    Ok(NewArtist {
        name: require_string(body, "name")?,
        age: require_integer(body, "age")?,
    })
}

/// Validate an album creation payload: {name, genre}.
pub fn album_payload(body: &Value) -> PayloadResult<NewAlbum> {
    Ok(NewAlbum {
        name: require_string(body, "name")?,
        genre: require_string(body, "genre")?,
    })
}

/// Validate a track creation payload: {name, duration}.
pub fn track_payload(body: &Value) -> PayloadResult<NewTrack> {
    Ok(NewTrack {
        name: require_string(body, "name")?,
        duration: require_number(body, "duration")?,
    })
}
