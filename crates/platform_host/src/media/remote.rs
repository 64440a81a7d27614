//! Remote (embedded streaming) player contract.

use std::rc::Rc;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
/// Playback state reported by the remote player.
pub enum RemotePlayerState {
    /// Player created but nothing loaded or started.
    Unstarted,
    /// Current track finished.
    Ended,
    /// Audio is playing.
    Playing,
    /// Playback paused.
    Paused,
    /// Waiting on the network.
    Buffering,
    /// Track cued but not started.
    Cued,
}

impl RemotePlayerState {
    /// Maps the embed API's numeric state codes.
    pub const fn from_code(code: i32) -> Option<Self> {
        match code {
            -1 => Some(Self::Unstarted),
            0 => Some(Self::Ended),
            1 => Some(Self::Playing),
            2 => Some(Self::Paused),
            3 => Some(Self::Buffering),
            5 => Some(Self::Cued),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Construction options for a remote player instance.
pub struct RemotePlayerOptions {
    /// DOM id of the element the player replaces.
    pub container_id: String,
    /// Provider track identifier.
    pub track_id: String,
    /// Whether playback should begin as soon as the player is ready.
    pub autoplay: bool,
}

#[derive(Clone)]
/// Callbacks registered when a remote player is constructed.
pub struct RemotePlayerCallbacks {
    /// Fired once the player can accept commands.
    pub on_ready: Rc<dyn Fn()>,
    /// Fired on every playback state change.
    pub on_state_change: Rc<dyn Fn(RemotePlayerState)>,
    /// Fired when the provider reports a playback error (for example, embedding denied).
    pub on_error: Rc<dyn Fn(i32)>,
}

impl RemotePlayerCallbacks {
    /// Callbacks that ignore every event.
    pub fn ignore() -> Self {
        Self {
            on_ready: Rc::new(|| {}),
            on_state_change: Rc::new(|_| {}),
            on_error: Rc::new(|_| {}),
        }
    }
}

/// Live remote player instance.
///
/// Volume uses the provider's native `0..=100` scale.
pub trait RemotePlayerHandle {
    /// Starts or resumes playback.
    fn play(&self);
    /// Pauses playback.
    fn pause(&self);
    /// Stops playback and rewinds.
    fn stop(&self);
    /// Sets volume on the provider's native scale.
    fn set_volume(&self, volume: u8);
    /// Destroys the player and its embedded frame. Repeated calls are no-ops.
    fn destroy(&self);
}

/// Factory for remote player instances.
pub trait RemotePlayerProvider {
    /// Constructs a player bound to `options.track_id`.
    ///
    /// # Errors
    ///
    /// Returns an error when the provider cannot build a player (script missing, container
    /// absent).
    fn create(
        &self,
        options: RemotePlayerOptions,
        callbacks: RemotePlayerCallbacks,
    ) -> Result<Box<dyn RemotePlayerHandle>, String>;
}
