//! HTTP client for end-to-end tests
//!
//! This module provides a high-level HTTP client that wraps reqwest
//! and provides methods for all discography-server endpoints.
//!
//! When API routes or request formats change, update only this file.

use super::constants::*;
use reqwest::Response;
use serde_json::json;
use std::time::Duration;

/// HTTP test client
pub struct TestClient {
    /// The underlying reqwest client (public for custom requests in tests)
    pub client: reqwest::Client,
    /// The base URL of the test server
    pub base_url: String,
}

impl TestClient {
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build reqwest client");

        Self { client, base_url }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    // ========================================================================
    // Artists
    // ========================================================================

    pub async fn list_artists(&self) -> Response {
        self.client.get(self.url("/artists")).send().await.unwrap()
    }

    pub async fn create_artist(&self, name: &str, age: i64) -> Response {
        self.create_artist_raw(json!({ "name": name, "age": age }))
            .await
    }

    /// Posts an arbitrary JSON body, for malformed-payload tests.
    pub async fn create_artist_raw(&self, body: serde_json::Value) -> Response {
        self.client
            .post(self.url("/artists"))
            .json(&body)
            .send()
            .await
            .unwrap()
    }

    pub async fn get_artist(&self, id: &str) -> Response {
        self.client
            .get(self.url(&format!("/artists/{}", id)))
            .send()
            .await
            .unwrap()
    }

    pub async fn delete_artist(&self, id: &str) -> Response {
        self.client
            .delete(self.url(&format!("/artists/{}", id)))
            .send()
            .await
            .unwrap()
    }

    pub async fn list_artist_albums(&self, artist_id: &str) -> Response {
        self.client
            .get(self.url(&format!("/artists/{}/albums", artist_id)))
            .send()
            .await
            .unwrap()
    }

    pub async fn list_artist_tracks(&self, artist_id: &str) -> Response {
        self.client
            .get(self.url(&format!("/artists/{}/tracks", artist_id)))
            .send()
            .await
            .unwrap()
    }

    // ========================================================================
    // Albums
    // ========================================================================

    pub async fn list_albums(&self) -> Response {
        self.client.get(self.url("/albums")).send().await.unwrap()
    }

    pub async fn create_album(&self, artist_id: &str, name: &str, genre: &str) -> Response {
        self.create_album_raw(artist_id, json!({ "name": name, "genre": genre }))
            .await
    }

    pub async fn create_album_raw(&self, artist_id: &str, body: serde_json::Value) -> Response {
        self.client
            .post(self.url(&format!("/artists/{}/albums", artist_id)))
            .json(&body)
            .send()
            .await
            .unwrap()
    }

    pub async fn get_album(&self, id: &str) -> Response {
        self.client
            .get(self.url(&format!("/albums/{}", id)))
            .send()
            .await
            .unwrap()
    }

    pub async fn delete_album(&self, id: &str) -> Response {
        self.client
            .delete(self.url(&format!("/albums/{}", id)))
            .send()
            .await
            .unwrap()
    }

    pub async fn list_album_tracks(&self, album_id: &str) -> Response {
        self.client
            .get(self.url(&format!("/albums/{}/tracks", album_id)))
            .send()
            .await
            .unwrap()
    }

    // ========================================================================
    // Tracks
    // ========================================================================

    pub async fn list_tracks(&self) -> Response {
        self.client.get(self.url("/tracks")).send().await.unwrap()
    }

    pub async fn create_track(&self, album_id: &str, name: &str, duration: f64) -> Response {
        self.create_track_raw(album_id, json!({ "name": name, "duration": duration }))
            .await
    }

    pub async fn create_track_raw(&self, album_id: &str, body: serde_json::Value) -> Response {
        self.client
            .post(self.url(&format!("/albums/{}/tracks", album_id)))
            .json(&body)
            .send()
            .await
            .unwrap()
    }

    pub async fn get_track(&self, id: &str) -> Response {
        self.client
            .get(self.url(&format!("/tracks/{}", id)))
            .send()
            .await
            .unwrap()
    }

    pub async fn delete_track(&self, id: &str) -> Response {
        self.client
            .delete(self.url(&format!("/tracks/{}", id)))
            .send()
            .await
            .unwrap()
    }

    // ========================================================================
    // Play counts
    // ========================================================================

    pub async fn play_track(&self, id: &str) -> Response {
        self.client
            .put(self.url(&format!("/tracks/{}/play", id)))
            .send()
            .await
            .unwrap()
    }

    pub async fn play_album(&self, id: &str) -> Response {
        self.client
            .put(self.url(&format!("/albums/{}/tracks/play", id)))
            .send()
            .await
            .unwrap()
    }

    pub async fn play_artist(&self, id: &str) -> Response {
        self.client
            .put(self.url(&format!("/artists/{}/albums/play", id)))
            .send()
            .await
            .unwrap()
    }
}
