use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use reveille_playback::{wait_for_track, MusicService, TrackSelector};
use reveille_speech::{build_message, ContentPlugin, SpeechSynthesizer};

use crate::audio::AudioSink;
use crate::error::{Result, WakeupError};
use crate::mixer::Mixer;

/// Executes one wakeup run when an alarm job fires.
///
/// The run is a single unit of work with one internal fork: the briefing
/// (plugins + TTS) is generated concurrently with the music path (volume,
/// device and track resolution, play, near-completion poll, pause). The two
/// sides rendezvous only when the decoded briefing audio is needed. If the
/// music path fails first, the briefing task is aborted and its result
/// discarded; if briefing generation fails, the failure surfaces at the
/// rendezvous and nothing is played.
pub struct WakeupRunner {
    mixer: Arc<dyn Mixer>,
    music: Arc<dyn MusicService>,
    selector: TrackSelector,
    synthesizer: Arc<dyn SpeechSynthesizer>,
    plugins: Vec<Arc<dyn ContentPlugin>>,
    sink: Arc<dyn AudioSink>,
    device_name: String,
}

impl WakeupRunner {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        mixer: Arc<dyn Mixer>,
        music: Arc<dyn MusicService>,
        selector: TrackSelector,
        synthesizer: Arc<dyn SpeechSynthesizer>,
        plugins: Vec<Arc<dyn ContentPlugin>>,
        sink: Arc<dyn AudioSink>,
        device_name: String,
    ) -> Self {
        Self {
            mixer,
            music,
            selector,
            synthesizer,
            plugins,
            sink,
            device_name,
        }
    }

    /// One full wakeup run. No step is retried; the first failure aborts
    /// the remainder.
    pub async fn run(&self) -> Result<()> {
        info!("wakeup run started");
        self.mixer.raise().await?;

        let speech = self.spawn_speech_task();

        if let Err(e) = self.play_wakeup_track().await {
            error!("wakeup playback failed: {e}");
            speech.abort();
            return Err(e);
        }

        let audio = match speech.await {
            Ok(Ok(audio)) => audio,
            Ok(Err(e)) => {
                error!("briefing generation failed: {e}");
                return Err(e.into());
            }
            Err(e) => return Err(WakeupError::SpeechTask(e.to_string())),
        };

        self.sink.play(audio).await?;
        info!("wakeup run finished");
        Ok(())
    }

    /// Generate the briefing off the main path. The handle is the
    /// single-use rendezvous carrying the audio payload or the error.
    fn spawn_speech_task(
        &self,
    ) -> JoinHandle<std::result::Result<Vec<u8>, reveille_speech::SpeechError>> {
        let plugins = self.plugins.clone();
        let synthesizer = Arc::clone(&self.synthesizer);
        tokio::spawn(async move {
            let message = build_message(&plugins).await?;
            debug!(chars = message.len(), "briefing assembled");
            synthesizer.synthesize(&message).await
        })
    }

    /// Main path: resolve device and track, play, poll until the track is
    /// nearly over, pause, and consume the one-shot track override.
    async fn play_wakeup_track(&self) -> Result<()> {
        let devices = self.music.devices().await?;
        let device = devices
            .into_iter()
            .find(|d| d.name == self.device_name)
            .ok_or_else(|| WakeupError::DeviceNotFound {
                name: self.device_name.clone(),
            })?;

        let track = self.selector.next_wakeup_track().await?;
        info!(track = %track.name, device = %device.name, "playing wakeup track");
        self.music.play(&track, &device).await?;

        wait_for_track(self.music.as_ref()).await?;

        self.music.pause().await?;
        self.selector.clear_next_track()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use reveille_playback::{PlaybackState, PlayerConfigStore, PlayerDevice, Playlist, Track};
    use reveille_speech::SpeechError;
    use rusqlite::Connection;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    struct FakeMusic {
        device_name: String,
        paused: AtomicBool,
        play_issued: AtomicBool,
    }

    impl FakeMusic {
        fn new(device_name: &str) -> Self {
            Self {
                device_name: device_name.to_string(),
                paused: AtomicBool::new(false),
                play_issued: AtomicBool::new(false),
            }
        }
    }

    fn track(id: &str) -> Track {
        Track {
            id: id.to_string(),
            name: format!("track {id}"),
            uri: format!("music:track:{id}"),
            duration_ms: 180_000,
            artist: String::new(),
        }
    }

    #[async_trait]
    impl MusicService for FakeMusic {
        async fn devices(&self) -> reveille_playback::Result<Vec<PlayerDevice>> {
            Ok(vec![PlayerDevice {
                id: "d-1".to_string(),
                name: self.device_name.clone(),
                active: true,
            }])
        }
        async fn playlists(&self) -> reveille_playback::Result<Vec<Playlist>> {
            unreachable!()
        }
        async fn playlist(&self, id: &str) -> reveille_playback::Result<Playlist> {
            Ok(Playlist {
                id: id.to_string(),
                name: "wakeup".to_string(),
                tracks: vec![track("a")],
            })
        }
        async fn track(&self, id: &str) -> reveille_playback::Result<Track> {
            Ok(track(id))
        }
        async fn search(&self, _query: &str) -> reveille_playback::Result<Vec<Track>> {
            unreachable!()
        }
        async fn play(
            &self,
            _track: &Track,
            _device: &PlayerDevice,
        ) -> reveille_playback::Result<()> {
            self.play_issued.store(true, Ordering::SeqCst);
            Ok(())
        }
        async fn pause(&self) -> reveille_playback::Result<()> {
            self.paused.store(true, Ordering::SeqCst);
            Ok(())
        }
        async fn currently_playing(&self) -> reveille_playback::Result<PlaybackState> {
            // Nearly over on the first poll.
            Ok(PlaybackState {
                progress_ms: 179_000,
                duration_ms: 180_000,
                is_playing: true,
            })
        }
    }

    struct OkMixer;

    #[async_trait]
    impl Mixer for OkMixer {
        async fn raise(&self) -> Result<()> {
            Ok(())
        }
    }

    struct BrokenMixer;

    #[async_trait]
    impl Mixer for BrokenMixer {
        async fn raise(&self) -> Result<()> {
            Err(WakeupError::Volume("amixer exited with 1".to_string()))
        }
    }

    struct FixedSynth;

    #[async_trait]
    impl SpeechSynthesizer for FixedSynth {
        async fn synthesize(&self, _text: &str) -> reveille_speech::Result<Vec<u8>> {
            Ok(b"RIFFbriefing".to_vec())
        }
    }

    struct FixedPlugin;

    #[async_trait]
    impl ContentPlugin for FixedPlugin {
        fn name(&self) -> &str {
            "fixed"
        }
        async fn text(&self) -> reveille_speech::Result<String> {
            Ok("One event today. ".to_string())
        }
    }

    struct BrokenPlugin;

    #[async_trait]
    impl ContentPlugin for BrokenPlugin {
        fn name(&self) -> &str {
            "broken"
        }
        async fn text(&self) -> reveille_speech::Result<String> {
            Err(SpeechError::Api { status: 500 })
        }
    }

    /// Never finishes; the run must abort it rather than wait.
    struct StalledPlugin;

    #[async_trait]
    impl ContentPlugin for StalledPlugin {
        fn name(&self) -> &str {
            "stalled"
        }
        async fn text(&self) -> reveille_speech::Result<String> {
            loop {
                tokio::time::sleep(std::time::Duration::from_secs(3600)).await;
            }
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        played: Mutex<Option<Vec<u8>>>,
    }

    #[async_trait]
    impl AudioSink for RecordingSink {
        async fn play(&self, audio: Vec<u8>) -> Result<()> {
            *self.played.lock().unwrap() = Some(audio);
            Ok(())
        }
    }

    struct Fixture {
        runner: WakeupRunner,
        music: Arc<FakeMusic>,
        sink: Arc<RecordingSink>,
        selector: TrackSelector,
    }

    fn fixture(
        mixer: Arc<dyn Mixer>,
        plugins: Vec<Arc<dyn ContentPlugin>>,
        device_name: &str,
    ) -> Fixture {
        let music = Arc::new(FakeMusic::new("bedroom-speaker"));
        let config = PlayerConfigStore::new(Connection::open_in_memory().unwrap()).unwrap();
        config.set("default_playlist", "pl-1").unwrap();
        let selector = TrackSelector::new(music.clone(), config);
        let sink = Arc::new(RecordingSink::default());
        let runner = WakeupRunner::new(
            mixer,
            music.clone(),
            selector.clone(),
            Arc::new(FixedSynth),
            plugins,
            sink.clone(),
            device_name.to_string(),
        );
        Fixture {
            runner,
            music,
            sink,
            selector,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn successful_run_plays_briefing_after_pause() {
        let f = fixture(Arc::new(OkMixer), vec![Arc::new(FixedPlugin)], "bedroom-speaker");
        f.selector.set_next_track("chosen").unwrap();

        f.runner.run().await.unwrap();

        assert!(f.music.play_issued.load(Ordering::SeqCst));
        assert!(f.music.paused.load(Ordering::SeqCst));
        assert_eq!(
            f.sink.played.lock().unwrap().as_deref(),
            Some(b"RIFFbriefing".as_slice())
        );
        // The one-shot override was consumed.
        assert_eq!(f.selector.next_track_override().unwrap(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn speech_failure_surfaces_and_plays_nothing() {
        let f = fixture(
            Arc::new(OkMixer),
            vec![Arc::new(BrokenPlugin)],
            "bedroom-speaker",
        );

        let err = f.runner.run().await.unwrap_err();
        assert!(matches!(err, WakeupError::Speech(_)));
        // Music still completed its path, but no briefing audio played.
        assert!(f.music.paused.load(Ordering::SeqCst));
        assert!(f.sink.played.lock().unwrap().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn main_path_failure_wins_over_stalled_speech() {
        let f = fixture(
            Arc::new(OkMixer),
            vec![Arc::new(StalledPlugin)],
            "kitchen-speaker",
        );

        let err = f.runner.run().await.unwrap_err();
        match err {
            WakeupError::DeviceNotFound { name } => assert_eq!(name, "kitchen-speaker"),
            other => panic!("unexpected error: {other}"),
        }
        assert!(!f.music.play_issued.load(Ordering::SeqCst));
        assert!(f.sink.played.lock().unwrap().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn volume_failure_aborts_before_playback() {
        let f = fixture(
            Arc::new(BrokenMixer),
            vec![Arc::new(FixedPlugin)],
            "bedroom-speaker",
        );

        let err = f.runner.run().await.unwrap_err();
        assert!(matches!(err, WakeupError::Volume(_)));
        assert!(!f.music.play_issued.load(Ordering::SeqCst));
        assert!(f.sink.played.lock().unwrap().is_none());
    }
}
