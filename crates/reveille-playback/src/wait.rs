use std::time::Duration;

use tracing::debug;

use crate::client::MusicService;
use crate::error::{PlaybackError, Result};

/// How often the playback-status endpoint is polled.
pub const POLL_INTERVAL: Duration = Duration::from_secs(5);
/// The track counts as nearly over when less than this remains.
pub const NEAR_END_MS: u64 = 6_000;
/// Absolute bound on the whole poll loop.
pub const WAIT_TIMEOUT: Duration = Duration::from_secs(600);

/// Poll the status endpoint until the current track is nearly over.
///
/// Two-way race: a status check every [`POLL_INTERVAL`] against an absolute
/// deadline of [`WAIT_TIMEOUT`]. The backend itself is never told to stop —
/// only the polling ends. Status-endpoint failures propagate immediately.
pub async fn wait_for_track(music: &dyn MusicService) -> Result<()> {
    let deadline = tokio::time::Instant::now() + WAIT_TIMEOUT;
    let mut ticker = tokio::time::interval_at(
        tokio::time::Instant::now() + POLL_INTERVAL,
        POLL_INTERVAL,
    );

    loop {
        tokio::select! {
            // Deadline wins when both are due at once.
            biased;
            _ = tokio::time::sleep_until(deadline) => {
                return Err(PlaybackError::WaitTimeout);
            }
            _ = ticker.tick() => {
                let state = music.currently_playing().await?;
                let remaining = state.remaining_ms();
                if remaining < NEAR_END_MS {
                    debug!(remaining_ms = remaining, "track near completion");
                    return Ok(());
                }
                debug!(remaining_ms = remaining, "track still playing");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PlaybackState, PlayerDevice, Playlist, Track};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Reports a scripted sequence of remaining durations, repeating the
    /// final entry forever.
    struct ScriptedStatus {
        remaining: Vec<u64>,
        polls: AtomicUsize,
    }

    impl ScriptedStatus {
        fn new(remaining: Vec<u64>) -> Self {
            Self {
                remaining,
                polls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl MusicService for ScriptedStatus {
        async fn devices(&self) -> Result<Vec<PlayerDevice>> {
            unreachable!()
        }
        async fn playlists(&self) -> Result<Vec<Playlist>> {
            unreachable!()
        }
        async fn playlist(&self, _id: &str) -> Result<Playlist> {
            unreachable!()
        }
        async fn track(&self, _id: &str) -> Result<Track> {
            unreachable!()
        }
        async fn search(&self, _query: &str) -> Result<Vec<Track>> {
            unreachable!()
        }
        async fn play(&self, _track: &Track, _device: &PlayerDevice) -> Result<()> {
            unreachable!()
        }
        async fn pause(&self) -> Result<()> {
            unreachable!()
        }
        async fn currently_playing(&self) -> Result<PlaybackState> {
            let n = self.polls.fetch_add(1, Ordering::SeqCst);
            let remaining = *self
                .remaining
                .get(n)
                .or(self.remaining.last())
                .unwrap();
            Ok(PlaybackState {
                progress_ms: 200_000 - remaining,
                duration_ms: 200_000,
                is_playing: true,
            })
        }
    }

    #[tokio::test(start_paused = true)]
    async fn exits_when_remaining_drops_below_threshold() {
        let music = ScriptedStatus::new(vec![6_000, 6_000, 5_000]);
        wait_for_track(&music).await.unwrap();
        // 6000 ms remaining is not yet "nearly over"; the third poll is.
        assert_eq!(music.polls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn times_out_at_the_deadline_and_not_before() {
        let music = ScriptedStatus::new(vec![120_000]);
        let started = tokio::time::Instant::now();
        let err = wait_for_track(&music).await.unwrap_err();
        assert!(matches!(err, PlaybackError::WaitTimeout));
        assert_eq!(started.elapsed(), WAIT_TIMEOUT);
        // Polls kept happening right up to the deadline.
        assert!(music.polls.load(Ordering::SeqCst) >= 100);
    }

    #[tokio::test(start_paused = true)]
    async fn status_failure_propagates() {
        struct Failing;
        #[async_trait]
        impl MusicService for Failing {
            async fn devices(&self) -> Result<Vec<PlayerDevice>> {
                unreachable!()
            }
            async fn playlists(&self) -> Result<Vec<Playlist>> {
                unreachable!()
            }
            async fn playlist(&self, _id: &str) -> Result<Playlist> {
                unreachable!()
            }
            async fn track(&self, _id: &str) -> Result<Track> {
                unreachable!()
            }
            async fn search(&self, _query: &str) -> Result<Vec<Track>> {
                unreachable!()
            }
            async fn play(&self, _t: &Track, _d: &PlayerDevice) -> Result<()> {
                unreachable!()
            }
            async fn pause(&self) -> Result<()> {
                unreachable!()
            }
            async fn currently_playing(&self) -> Result<PlaybackState> {
                Err(PlaybackError::NothingPlaying)
            }
        }

        let err = wait_for_track(&Failing).await.unwrap_err();
        assert!(matches!(err, PlaybackError::NothingPlaying));
    }
}
