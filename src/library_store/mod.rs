mod error;
mod models;
mod schema;
mod store;
mod trait_def;
pub mod validation;

pub use error::StoreError;
pub use models::*;
pub use schema::LIBRARY_VERSIONED_SCHEMAS;
pub use store::SqliteLibraryStore;
pub use trait_def::LibraryStore;
