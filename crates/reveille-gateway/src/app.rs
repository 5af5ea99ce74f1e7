use std::sync::Arc;

use axum::{
    routing::get,
    Router,
};

use reveille_alarms::AlarmService;
use reveille_core::ReveilleConfig;
use reveille_playback::{MusicService, TrackSelector};
use reveille_scheduler::Scheduler;

/// Central shared state — passed as Arc<AppState> to all Axum handlers.
pub struct AppState {
    pub config: ReveilleConfig,
    pub alarms: AlarmService,
    pub selector: TrackSelector,
    pub music: Arc<dyn MusicService>,
    pub scheduler: Scheduler,
}

impl AppState {
    pub fn new(
        config: ReveilleConfig,
        alarms: AlarmService,
        selector: TrackSelector,
        music: Arc<dyn MusicService>,
        scheduler: Scheduler,
    ) -> Self {
        Self {
            config,
            alarms,
            selector,
            music,
            scheduler,
        }
    }
}

/// Assemble the full Axum router.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(crate::http::health::health_handler))
        .route(
            "/alarms",
            get(crate::http::alarms::list_alarms)
                .post(crate::http::alarms::create_alarm)
                .delete(crate::http::alarms::delete_alarm),
        )
        .route("/player/playlists", get(crate::http::player::get_playlists))
        .route(
            "/player/default_playlist",
            get(crate::http::player::get_default_playlist)
                .put(crate::http::player::put_default_playlist),
        )
        .route(
            "/player/next_track",
            get(crate::http::player::get_next_track)
                .put(crate::http::player::put_next_track)
                .delete(crate::http::player::delete_next_track),
        )
        .route("/player/devices", get(crate::http::player::get_devices))
        .route("/player/search", get(crate::http::player::search_tracks))
        .with_state(state)
        .layer(tower_http::trace::TraceLayer::new_for_http())
}
