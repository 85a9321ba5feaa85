//! Shared constants for end-to-end tests
//!
//! Derived ids are base64 of the entity name truncated to 22 characters,
//! so well-known names have well-known ids.

/// Timeout for individual HTTP requests
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// How long to wait for the test server to become ready
pub const SERVER_READY_TIMEOUT_SECS: u64 = 5;

/// Derived id for artist "Bowie"
pub const BOWIE_ID: &str = "Qm93aWU=";

/// Derived id for album "Low"
pub const LOW_ID: &str = "TG93";

/// Derived id for track "Heroes"
pub const HEROES_ID: &str = "SGVyb2Vz";
