//! HTTP surface: one handler per resource operation.
//!
//! Handlers compose payload validation, identifier derivation and the
//! library store, then serialize hypermedia representations. Collection
//! endpoints always answer 200 with a (possibly empty) array; 404 on a
//! nested collection means the parent path segment did not resolve.

use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;

use tracing::error;

use crate::id;
use crate::library_store::validation::{self, PayloadError};
use crate::library_store::{CreateOutcome, LibraryStore, StoreError};
use crate::server::representation::{album_json, artist_json, request_base_url, track_json};

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::Serialize;
use serde_json::{json, Value};

use super::{log_requests, state::*, ServerConfig};

#[derive(Serialize)]
struct ServerStats {
    pub uptime: String,
    pub hash: String,
    pub artists: usize,
    pub albums: usize,
    pub tracks: usize,
}

fn format_uptime(duration: Duration) -> String {
    let total_seconds = duration.as_secs();

    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}d {:02}:{:02}:{:02}", days, hours, minutes, seconds)
}

// =============================================================================
// Error -> Response mapping
// =============================================================================

fn payload_error_response(err: PayloadError) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": err.to_string() })),
    )
        .into_response()
}

fn store_error_response(err: StoreError) -> Response {
    match &err {
        StoreError::NotFound { .. } => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": err.to_string() })),
        )
            .into_response(),
        StoreError::MissingParent { .. } => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "error": err.to_string() })),
        )
            .into_response(),
        StoreError::Db(db_err) => {
            error!("Library store failure: {}", db_err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "internal error" })),
            )
                .into_response()
        }
    }
}

/// 204 with the deleted entity's prior representation, per the interface
/// contract for DELETE.
fn deleted_response(representation: Value) -> Response {
    (
        StatusCode::NO_CONTENT,
        [(header::CONTENT_TYPE, "application/json")],
        representation.to_string(),
    )
        .into_response()
}

// =============================================================================
// Handlers
// =============================================================================

async fn home(State(state): State<ServerState>) -> impl IntoResponse {
    let stats = ServerStats {
        uptime: format_uptime(state.start_time.elapsed()),
        hash: state.hash.clone(),
        artists: state.library_store.artists_count(),
        albums: state.library_store.albums_count(),
        tracks: state.library_store.tracks_count(),
    };
    Json(stats)
}

async fn list_artists(State(state): State<ServerState>, headers: HeaderMap) -> Response {
    let base_url = request_base_url(&headers, state.config.public_url.as_deref());
    match state.library_store.list_artists() {
        Ok(artists) => {
            let body: Vec<Value> = artists.iter().map(|a| artist_json(a, &base_url)).collect();
            Json(body).into_response()
        }
        Err(err) => store_error_response(err),
    }
}

async fn create_artist(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let new = match validation::artist_payload(&body) {
        Ok(new) => new,
        Err(err) => return payload_error_response(err),
    };
    let artist_id = id::derive_id(&new.name);
    let base_url = request_base_url(&headers, state.config.public_url.as_deref());

    match state.library_store.create_artist(&artist_id, &new) {
        Ok(CreateOutcome::Created(artist)) => {
            (StatusCode::CREATED, Json(artist_json(&artist, &base_url))).into_response()
        }
        Ok(CreateOutcome::Conflict(existing)) => {
            (StatusCode::CONFLICT, Json(artist_json(&existing, &base_url))).into_response()
        }
        Err(err) => store_error_response(err),
    }
}

async fn get_artist(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    let base_url = request_base_url(&headers, state.config.public_url.as_deref());
    match state.library_store.get_artist(&id) {
        Ok(Some(artist)) => Json(artist_json(&artist, &base_url)).into_response(),
        Ok(None) => store_error_response(StoreError::not_found("artist", &id)),
        Err(err) => store_error_response(err),
    }
}

async fn delete_artist(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    let base_url = request_base_url(&headers, state.config.public_url.as_deref());
    match state.library_store.delete_artist(&id) {
        Ok(artist) => deleted_response(artist_json(&artist, &base_url)),
        Err(err) => store_error_response(err),
    }
}

async fn list_albums(State(state): State<ServerState>, headers: HeaderMap) -> Response {
    let base_url = request_base_url(&headers, state.config.public_url.as_deref());
    match state.library_store.list_albums() {
        Ok(albums) => {
            let body: Vec<Value> = albums.iter().map(|a| album_json(a, &base_url)).collect();
            Json(body).into_response()
        }
        Err(err) => store_error_response(err),
    }
}

async fn get_album(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    let base_url = request_base_url(&headers, state.config.public_url.as_deref());
    match state.library_store.get_album(&id) {
        Ok(Some(album)) => Json(album_json(&album, &base_url)).into_response(),
        Ok(None) => store_error_response(StoreError::not_found("album", &id)),
        Err(err) => store_error_response(err),
    }
}

async fn delete_album(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    let base_url = request_base_url(&headers, state.config.public_url.as_deref());
    match state.library_store.delete_album(&id) {
        Ok(album) => deleted_response(album_json(&album, &base_url)),
        Err(err) => store_error_response(err),
    }
}

async fn list_tracks(State(state): State<ServerState>, headers: HeaderMap) -> Response {
    let base_url = request_base_url(&headers, state.config.public_url.as_deref());
    match state.library_store.list_tracks() {
        Ok(tracks) => {
            let body: Vec<Value> = tracks.iter().map(|t| track_json(t, &base_url)).collect();
            Json(body).into_response()
        }
        Err(err) => store_error_response(err),
    }
}

async fn get_track(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    let base_url = request_base_url(&headers, state.config.public_url.as_deref());
    match state.library_store.get_track(&id) {
        Ok(Some(track)) => Json(track_json(&track, &base_url)).into_response(),
        Ok(None) => store_error_response(StoreError::not_found("track", &id)),
        Err(err) => store_error_response(err),
    }
}

async fn delete_track(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    let base_url = request_base_url(&headers, state.config.public_url.as_deref());
    match state.library_store.delete_track(&id) {
        Ok(track) => deleted_response(track_json(&track, &base_url)),
        Err(err) => store_error_response(err),
    }
}

// =============================================================================
// Nested collections
// =============================================================================

async fn list_artist_albums(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Path(artist_id): Path<String>,
) -> Response {
    let base_url = request_base_url(&headers, state.config.public_url.as_deref());
    match state.library_store.list_artist_albums(&artist_id) {
        Ok(albums) => {
            let body: Vec<Value> = albums.iter().map(|a| album_json(a, &base_url)).collect();
            Json(body).into_response()
        }
        Err(err) => store_error_response(err),
    }
}

async fn create_artist_album(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Path(artist_id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let new = match validation::album_payload(&body) {
        Ok(new) => new,
        Err(err) => return payload_error_response(err),
    };
    let album_id = id::derive_id(&new.name);
    let base_url = request_base_url(&headers, state.config.public_url.as_deref());

    match state.library_store.create_album(&artist_id, &album_id, &new) {
        Ok(CreateOutcome::Created(album)) => {
            (StatusCode::CREATED, Json(album_json(&album, &base_url))).into_response()
        }
        Ok(CreateOutcome::Conflict(existing)) => {
            (StatusCode::CONFLICT, Json(album_json(&existing, &base_url))).into_response()
        }
        Err(err) => store_error_response(err),
    }
}

async fn list_artist_tracks(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Path(artist_id): Path<String>,
) -> Response {
    let base_url = request_base_url(&headers, state.config.public_url.as_deref());
    match state.library_store.list_artist_tracks(&artist_id) {
        Ok(tracks) => {
            let body: Vec<Value> = tracks.iter().map(|t| track_json(t, &base_url)).collect();
            Json(body).into_response()
        }
        Err(err) => store_error_response(err),
    }
}

async fn list_album_tracks(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Path(album_id): Path<String>,
) -> Response {
    let base_url = request_base_url(&headers, state.config.public_url.as_deref());
    match state.library_store.list_album_tracks(&album_id) {
        Ok(tracks) => {
            let body: Vec<Value> = tracks.iter().map(|t| track_json(t, &base_url)).collect();
            Json(body).into_response()
        }
        Err(err) => store_error_response(err),
    }
}

async fn create_album_track(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Path(album_id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let new = match validation::track_payload(&body) {
        Ok(new) => new,
        Err(err) => return payload_error_response(err),
    };
    let track_id = id::derive_id(&new.name);
    let base_url = request_base_url(&headers, state.config.public_url.as_deref());

    match state.library_store.create_track(&album_id, &track_id, &new) {
        Ok(CreateOutcome::Created(track)) => {
            (StatusCode::CREATED, Json(track_json(&track, &base_url))).into_response()
        }
        Ok(CreateOutcome::Conflict(existing)) => {
            (StatusCode::CONFLICT, Json(track_json(&existing, &base_url))).into_response()
        }
        Err(err) => store_error_response(err),
    }
}

// =============================================================================
// Play counts
// =============================================================================

async fn play_track(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    let base_url = request_base_url(&headers, state.config.public_url.as_deref());
    match state.library_store.play_track(&id) {
        Ok(track) => Json(track_json(&track, &base_url)).into_response(),
        Err(err) => store_error_response(err),
    }
}

async fn play_album(State(state): State<ServerState>, Path(id): Path<String>) -> Response {
    match state.library_store.play_album(&id) {
        Ok(bumped) => Json(json!({ "tracks_played": bumped })).into_response(),
        Err(err) => store_error_response(err),
    }
}

async fn play_artist(State(state): State<ServerState>, Path(id): Path<String>) -> Response {
    match state.library_store.play_artist(&id) {
        Ok(bumped) => Json(json!({ "tracks_played": bumped })).into_response(),
        Err(err) => store_error_response(err),
    }
}

// =============================================================================
// Router assembly
// =============================================================================

pub fn make_app(config: ServerConfig, library_store: Arc<dyn LibraryStore>) -> Result<Router> {
    let state = ServerState::new(config, library_store);

    let mut app: Router = Router::new()
        .route("/", get(home))
        .route("/artists", get(list_artists))
        .route("/artists", post(create_artist))
        .route("/artists/{id}", get(get_artist))
        .route("/artists/{id}", delete(delete_artist))
        .route("/artists/{id}/albums", get(list_artist_albums))
        .route("/artists/{id}/albums", post(create_artist_album))
        .route("/artists/{id}/albums/play", put(play_artist))
        .route("/artists/{id}/tracks", get(list_artist_tracks))
        .route("/albums", get(list_albums))
        .route("/albums/{id}", get(get_album))
        .route("/albums/{id}", delete(delete_album))
        .route("/albums/{id}/tracks", get(list_album_tracks))
        .route("/albums/{id}/tracks", post(create_album_track))
        .route("/albums/{id}/tracks/play", put(play_album))
        .route("/tracks", get(list_tracks))
        .route("/tracks/{id}", get(get_track))
        .route("/tracks/{id}", delete(delete_track))
        .route("/tracks/{id}/play", put(play_track))
        .with_state(state.clone());

    app = app.layer(middleware::from_fn_with_state(state, log_requests));

    Ok(app)
}

pub async fn run_server(config: ServerConfig, library_store: Arc<dyn LibraryStore>) -> Result<()> {
    let port = config.port;
    let app = make_app(config, library_store)?;

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port)).await?;

    Ok(axum::serve(listener, app).await?)
}
