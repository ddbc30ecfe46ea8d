//! Controller module - command dispatch and playback control
//!
//! The controller owns the whole mutable state block (player state, playlist
//! position, volume, decode-process handle, overlay timer). Every event
//! source (physical inputs, the console) only enqueues `Command`s; a
//! single control task applies them and drives display refreshes, so no
//! callback ever touches state concurrently. It is organized into
//! submodules by responsibility:
//!
//! - `playback`: the state machine behind each command
//! - `input`: debouncing, quadrature decoding, raw-event translation

mod input;
mod playback;

pub use input::{Button, ControlInput, Debouncer, EncoderDecoder, InputBackend, RawInputEvent};

use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

use crate::audio::AudioBackend;
use crate::model::{MetadataCache, PlayerState, Playlist};
use crate::view::Compositor;

/// Polling cadence for detecting that the decode process finished a track.
const ADVANCE_POLL_INTERVAL: std::time::Duration = std::time::Duration::from_millis(500);

/// Commands accepted by the control task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Play(usize),
    Next,
    Previous,
    Stop,
    Pause,
    Resume,
    TogglePlayPause,
    SetVolume(u8),
    AdjustVolume(i16),
    ResetVolume,
    Shutdown,
}

/// The playback controller. Owns playlist position, player state, volume,
/// and the external decode-process handle.
pub struct Player<B: AudioBackend> {
    pub(crate) playlist: Playlist,
    pub(crate) state: PlayerState,
    pub(crate) volume: u8,
    pub(crate) default_volume: u8,
    pub(crate) backend: B,
    pub(crate) handle: Option<B::Handle>,
    pub(crate) compositor: Compositor,
    pub(crate) metadata: MetadataCache,
}

impl<B: AudioBackend> Player<B> {
    pub fn new(playlist: Playlist, backend: B, compositor: Compositor, default_volume: u8) -> Self {
        Self {
            playlist,
            state: PlayerState::Stopped,
            volume: default_volume.min(100),
            default_volume: default_volume.min(100),
            backend,
            handle: None,
            compositor,
            metadata: MetadataCache::new(),
        }
    }

    pub fn state(&self) -> PlayerState {
        self.state
    }

    pub fn volume(&self) -> u8 {
        self.volume
    }

    pub fn index(&self) -> usize {
        self.playlist.index()
    }

    /// Control loop: applies commands in arrival order and polls for decoder
    /// exit to auto-advance the playlist. Returns after `Shutdown` (or after
    /// every sender hung up), with the decoder stopped and the panel blanked.
    pub async fn run(mut self, mut commands: mpsc::Receiver<Command>) {
        self.backend.set_volume(self.volume).await;

        let mut poll = tokio::time::interval(ADVANCE_POLL_INTERVAL);
        poll.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                cmd = commands.recv() => match cmd {
                    None | Some(Command::Shutdown) => break,
                    Some(cmd) => self.apply(cmd).await,
                },
                _ = poll.tick() => self.poll_playback().await,
            }
        }

        self.shutdown().await;
    }

    /// Apply one command. Invalid arguments are no-ops; nothing propagates
    /// back to the event source.
    pub async fn apply(&mut self, cmd: Command) {
        tracing::debug!(?cmd, state = self.state.label(), "Applying command");
        match cmd {
            Command::Play(index) => self.play(index).await,
            Command::Next => self.next().await,
            Command::Previous => self.previous().await,
            Command::Stop => self.stop().await,
            Command::Pause => self.pause().await,
            Command::Resume => self.resume().await,
            Command::TogglePlayPause => self.toggle_play_pause().await,
            Command::SetVolume(v) => self.set_volume(v).await,
            Command::AdjustVolume(delta) => self.adjust_volume(delta).await,
            Command::ResetVolume => self.reset_volume().await,
            Command::Shutdown => self.shutdown().await,
        }
    }

    /// Shutdown order matters: silence the decoder before the input sources
    /// are gone, blank the panel last.
    async fn shutdown(&mut self) {
        tracing::info!("Shutting down player");
        self.stop_process().await;
        self.state = PlayerState::Stopped;
        self.compositor.clear();
    }
}
