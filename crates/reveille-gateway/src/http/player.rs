//! Player configuration endpoints: playlists, the default wakeup playlist,
//! the one-shot next-track override, devices and search.

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{error, warn};

use reveille_playback::{PlaybackError, PlayerDevice, Playlist, Track};

use crate::app::AppState;

type HandlerError = (StatusCode, Json<Value>);

/// GET /player/playlists — all playlists known to the playback backend.
pub async fn get_playlists(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Playlist>>, HandlerError> {
    let playlists = state.music.playlists().await.map_err(player_error)?;
    Ok(Json(playlists))
}

/// GET /player/default_playlist — the playlist wakeup tracks are drawn from.
pub async fn get_default_playlist(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Playlist>, HandlerError> {
    let id = state
        .selector
        .default_playlist_id()
        .map_err(player_error)?
        .ok_or_else(|| not_found("no default playlist is configured"))?;
    let playlist = state.music.playlist(&id).await.map_err(player_error)?;
    Ok(Json(playlist))
}

/// PUT /player/default_playlist — body is the playlist to draw from.
pub async fn put_default_playlist(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<Playlist>, HandlerError> {
    let playlist: Playlist = serde_json::from_slice(&body).map_err(bad_body)?;
    state
        .selector
        .set_default_playlist(&playlist.id)
        .map_err(player_error)?;
    Ok(Json(playlist))
}

/// GET /player/next_track — what the next wakeup run would play: the stored
/// override if present, else a random pick from the default playlist.
pub async fn get_next_track(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Track>, HandlerError> {
    let track = state
        .selector
        .next_wakeup_track()
        .await
        .map_err(player_error)?;
    Ok(Json(track))
}

/// PUT /player/next_track — body is the track to play on the next run.
pub async fn put_next_track(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<Track>, HandlerError> {
    let track: Track = serde_json::from_slice(&body).map_err(bad_body)?;
    state
        .selector
        .set_next_track(&track.id)
        .map_err(player_error)?;
    Ok(Json(track))
}

/// DELETE /player/next_track — drop the override; the next run picks randomly.
pub async fn delete_next_track(
    State(state): State<Arc<AppState>>,
) -> Result<StatusCode, HandlerError> {
    state.selector.clear_next_track().map_err(player_error)?;
    Ok(StatusCode::OK)
}

/// GET /player/devices — output devices known to the playback backend.
pub async fn get_devices(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<PlayerDevice>>, HandlerError> {
    let devices = state.music.devices().await.map_err(player_error)?;
    Ok(Json(devices))
}

#[derive(Deserialize)]
pub struct SearchParams {
    q: String,
}

/// GET /player/search?q= — track search against the playback backend.
pub async fn search_tracks(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Track>>, HandlerError> {
    let tracks = state.music.search(&params.q).await.map_err(player_error)?;
    Ok(Json(tracks))
}

fn bad_body(e: serde_json::Error) -> HandlerError {
    warn!("decoding body: {e}");
    (
        StatusCode::BAD_REQUEST,
        Json(json!({"error": format!("decoding body: {e}")})),
    )
}

fn not_found(msg: &str) -> HandlerError {
    (StatusCode::NOT_FOUND, Json(json!({"error": msg})))
}

fn player_error(e: PlaybackError) -> HandlerError {
    let status = match &e {
        PlaybackError::NoDefaultPlaylist | PlaybackError::NothingPlaying => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status.is_server_error() {
        error!("player request failed: {e}");
    } else {
        warn!("player request rejected: {e}");
    }
    (status, Json(json!({"error": e.to_string()})))
}
