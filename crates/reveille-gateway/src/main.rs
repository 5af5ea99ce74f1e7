use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};

use reveille_alarms::{AlarmService, AlarmStore, WakeAction};
use reveille_core::config::{ReveilleConfig, HEARTBEAT_INTERVAL_SECS, SCHEDULER_TICK_SECS};
use reveille_playback::{HttpMusicService, MusicService, PlayerConfigStore, TrackSelector};
use reveille_speech::{CalendarPlugin, ContentPlugin, HttpSpeechSynthesizer, WeatherPlugin};
use reveille_wakeup::{AmixerMixer, RodioSink, WakeupRunner};

mod app;
mod http;

#[derive(Parser)]
#[command(name = "reveille-gateway", about = "Wake-up alarm service")]
struct Args {
    /// Path to reveille.toml (falls back to REVEILLE_CONFIG, then
    /// ~/.reveille/reveille.toml).
    #[arg(long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "reveille_gateway=info,tower_http=debug".into()),
        )
        .init();

    let args = Args::parse();
    let config = ReveilleConfig::load(args.config.as_deref()).unwrap_or_else(|e| {
        warn!("Config load failed ({}), using defaults", e);
        ReveilleConfig::default()
    });

    let bind = config.gateway.bind.clone();
    let port = config.gateway.port;

    // initialize SQLite database — single file for all subsystems
    let db_path = &config.database.path;
    ensure_parent_dir(db_path);
    info!(path = %db_path, "opening SQLite database");

    let db = rusqlite::Connection::open(db_path)?;
    db.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;

    // run all schema migrations (idempotent)
    reveille_alarms::db::init_db(&db)?;
    reveille_playback::db::init_db(&db)?;
    info!("database migrations complete");

    // build subsystems — each gets its own connection for thread safety
    let store = AlarmStore::new(rusqlite::Connection::open(db_path)?)?;
    let player_config = PlayerConfigStore::new(rusqlite::Connection::open(db_path)?)?;

    let music: Arc<dyn MusicService> = Arc::new(HttpMusicService::new(
        config.player.base_url.clone(),
        config.player.api_token.clone(),
    ));
    let selector = TrackSelector::new(Arc::clone(&music), player_config);

    let synthesizer = Arc::new(HttpSpeechSynthesizer::new(
        config.speech.base_url.clone(),
        config.speech.api_key.clone(),
    ));

    let mut plugins: Vec<Arc<dyn ContentPlugin>> = Vec::new();
    if let Some(ref weather) = config.plugins.weather {
        plugins.push(Arc::new(WeatherPlugin::new(weather.clone())));
        info!("weather plugin enabled");
    }
    if let Some(ref calendar) = config.plugins.calendar {
        plugins.push(Arc::new(CalendarPlugin::new(calendar.clone())));
        info!(calendars = calendar.calendars.len(), "calendar plugin enabled");
    }

    let mixer = Arc::new(AmixerMixer::new(
        config.audio.mixer_controls.clone(),
        config.audio.volume.clone(),
    ));
    let runner = Arc::new(WakeupRunner::new(
        mixer,
        Arc::clone(&music),
        selector.clone(),
        synthesizer,
        plugins,
        Arc::new(RodioSink),
        config.player.device_name.clone(),
    ));

    // the alarm action, injected into every alarm-derived job
    let wake: WakeAction = Arc::new(move || {
        let runner = Arc::clone(&runner);
        Box::pin(async move {
            runner.run().await?;
            Ok(())
        })
    });

    let scheduler = reveille_scheduler::Scheduler::new();
    let alarms = AlarmService::new(store, scheduler.clone(), wake);

    // re-materialise persisted alarms before serving any request
    alarms
        .restore()
        .context("restoring alarms from store")?;

    // maintenance heartbeat — shares the scheduler with alarm jobs, which is
    // why alarm jobs carry a type label
    let heartbeat = scheduler.every(
        HEARTBEAT_INTERVAL_SECS,
        Arc::new(|_id| {
            Box::pin(async {
                info!("scheduler heartbeat");
                Ok(())
            })
        }),
    )?;
    scheduler.label(heartbeat, "kind", "maintenance")?;

    let state = Arc::new(app::AppState::new(
        config,
        alarms,
        selector,
        music,
        scheduler.clone(),
    ));
    let router = app::build_router(state);

    let addr: SocketAddr = format!("{}:{}", bind, port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("reveille gateway listening on {}", addr);

    // drive loop: the scheduler performs no background waiting of its own.
    // run_pending is awaited before the next tick, so a scan (and the wakeup
    // run it may execute) never overlaps the previous one.
    let driver = tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(SCHEDULER_TICK_SECS));
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            scheduler.run_pending().await;
        }
    });

    let server = tokio::spawn(async move { axum::serve(listener, router).await });

    // both tasks must stay alive; losing either is fatal
    tokio::select! {
        res = driver => anyhow::bail!("scheduler drive loop exited: {res:?}"),
        res = server => match res {
            Ok(Ok(())) => anyhow::bail!("http server exited"),
            Ok(Err(e)) => Err(e).context("http server crashed"),
            Err(e) => Err(e).context("http server task died"),
        },
    }
}

/// Ensure the parent directory for a file path exists.
fn ensure_parent_dir(path: &str) {
    if let Some(parent) = std::path::Path::new(path).parent() {
        let _ = std::fs::create_dir_all(parent);
    }
}
