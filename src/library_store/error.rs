use thiserror::Error;

/// Errors surfaced by library store operations.
///
/// `NotFound` is for the entity the operation addresses directly; a missing
/// creation parent is the distinct `MissingParent` case so callers can tell
/// "the resource doesn't exist" apart from "the resource you're attaching
/// this to doesn't exist".
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{entity} '{id}' not found")]
    NotFound { entity: &'static str, id: String },

    #[error("referenced {entity} '{id}' does not exist")]
    MissingParent { entity: &'static str, id: String },

    #[error(transparent)]
    Db(#[from] rusqlite::Error),
}

impl StoreError {
    pub fn not_found(entity: &'static str, id: &str) -> Self {
        StoreError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn missing_parent(entity: &'static str, id: &str) -> Self {
        StoreError::MissingParent {
            entity,
            id: id.to_string(),
        }
    }
}
