//! Playback state machine
//!
//! One method per command. Every state- or track-changing command triggers
//! exactly one display refresh; `set_volume` refreshes too because the
//! overlay timer moved. Process-control failures are logged and the state
//! machine transitions as if the signal landed; the auto-advance poll
//! corrects reality on its next pass.

use crate::audio::{AudioBackend, TERMINATE_TIMEOUT};
use crate::model::{PlayerState, TrackMetadata};

use super::Player;

impl<B: AudioBackend> Player<B> {
    /// Launch track `index`. Any running decoder is terminated first, so at
    /// most one decode process is ever alive.
    pub async fn play(&mut self, index: usize) {
        if !self.playlist.select(index) {
            tracing::warn!(index, len = self.playlist.len(), "Play index out of range");
            return;
        }

        self.stop_process().await;

        let Some(path) = self.playlist.current().map(|p| p.to_path_buf()) else {
            return;
        };

        match self.backend.start(&path).await {
            Ok(handle) => {
                self.handle = Some(handle);
                self.state = PlayerState::Playing;
                tracing::info!(index, track = %path.display(), "Playing");
            }
            Err(e) => {
                self.state = PlayerState::Stopped;
                tracing::error!(track = %path.display(), error = %e, "Could not start decoder");
            }
        }

        self.refresh();
    }

    pub async fn next(&mut self) {
        let Some(index) = self.playlist.next_index() else {
            tracing::debug!("Next ignored, playlist is empty");
            return;
        };
        self.play(index).await;
    }

    pub async fn previous(&mut self) {
        let Some(index) = self.playlist.previous_index() else {
            tracing::debug!("Previous ignored, playlist is empty");
            return;
        };
        self.play(index).await;
    }

    pub async fn stop(&mut self) {
        self.stop_process().await;
        if self.state != PlayerState::Stopped {
            self.state = PlayerState::Stopped;
            tracing::info!("Playback stopped");
        }
        self.refresh();
    }

    pub async fn pause(&mut self) {
        if self.state != PlayerState::Playing || self.handle.is_none() {
            return;
        }
        if let Some(handle) = self.handle.as_mut() {
            if let Err(e) = self.backend.suspend(handle).await {
                tracing::warn!(error = %e, "Suspend failed, decoder likely exited");
            }
        }
        self.state = PlayerState::Paused;
        tracing::info!("Paused");
        self.refresh();
    }

    pub async fn resume(&mut self) {
        if self.state != PlayerState::Paused || self.handle.is_none() {
            return;
        }
        if let Some(handle) = self.handle.as_mut() {
            if let Err(e) = self.backend.resume(handle).await {
                tracing::warn!(error = %e, "Resume failed, decoder likely exited");
            }
        }
        self.state = PlayerState::Playing;
        tracing::info!("Resumed");
        self.refresh();
    }

    pub async fn toggle_play_pause(&mut self) {
        match self.state {
            PlayerState::Playing => self.pause().await,
            PlayerState::Paused => self.resume().await,
            PlayerState::Stopped => {
                let index = self.playlist.index();
                self.play(index).await;
            }
        }
    }

    pub async fn set_volume(&mut self, volume: u8) {
        self.volume = volume.min(100);
        self.backend.set_volume(self.volume).await;
        tracing::info!(volume = self.volume, "Volume set");
        self.compositor.note_volume_change();
        self.refresh();
    }

    pub async fn adjust_volume(&mut self, delta: i16) {
        let target = (i16::from(self.volume) + delta).clamp(0, 100) as u8;
        self.set_volume(target).await;
    }

    /// Encoder push-button: back to the configured default level.
    pub async fn reset_volume(&mut self) {
        tracing::info!(default = self.default_volume, "Volume reset");
        self.set_volume(self.default_volume).await;
    }

    /// Auto-advance poll: when the decoder exited on its own while we think
    /// we are playing, the track finished; move to the next one.
    pub async fn poll_playback(&mut self) {
        let finished = match (self.state, self.handle.as_mut()) {
            (PlayerState::Playing, Some(handle)) => !self.backend.is_alive(handle),
            _ => false,
        };
        if finished {
            tracing::info!(index = self.playlist.index(), "Track finished, advancing");
            self.handle = None;
            self.next().await;
        }
    }

    pub(crate) async fn stop_process(&mut self) {
        if let Some(handle) = self.handle.take() {
            if let Err(e) = self.backend.terminate(handle, TERMINATE_TIMEOUT).await {
                tracing::warn!(error = %e, "Decoder terminate failed");
            }
        }
    }

    /// One render per state-affecting command.
    fn refresh(&mut self) {
        let metadata = match self.playlist.current() {
            Some(path) => {
                let path = path.to_path_buf();
                self.metadata.load(&path)
            }
            None => std::sync::Arc::new(TrackMetadata::default()),
        };
        self.compositor
            .render_now_playing(self.state, self.volume, &metadata, false);
    }
}
