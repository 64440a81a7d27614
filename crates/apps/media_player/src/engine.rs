//! Playback engine capability interface and its two provider-backed variants.

use platform_host::{LocalMediaHandle, LocalPlayFuture, RemotePlayerHandle};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
/// Which provider backs the session. `Local` is terminal for a session.
pub enum EngineKind {
    Remote,
    Local,
}

/// Outcome of a play request.
pub enum PlayStart {
    /// The provider accepted the command synchronously.
    Started,
    /// The provider answers later and may reject.
    Pending(LocalPlayFuture),
    /// The engine was already torn down.
    Inactive,
}

/// Transport operations shared by both engines.
///
/// `set_volume` always receives the control value in `0..=100`; each engine converts it to its
/// provider's native scale. Every method is a no-op after [`PlaybackEngine::destroy`].
pub trait PlaybackEngine {
    fn kind(&self) -> EngineKind;
    fn play(&mut self) -> PlayStart;
    fn pause(&mut self);
    /// Pauses and rewinds to the start.
    fn stop(&mut self);
    fn set_volume(&mut self, level: u8);
    /// Releases the native resource. Safe to call repeatedly.
    fn destroy(&mut self);
    fn is_destroyed(&self) -> bool;
}

pub struct RemoteEngine {
    player: Option<Box<dyn RemotePlayerHandle>>,
}

impl RemoteEngine {
    pub fn new(player: Box<dyn RemotePlayerHandle>) -> Self {
        Self {
            player: Some(player),
        }
    }
}

impl PlaybackEngine for RemoteEngine {
    fn kind(&self) -> EngineKind {
        EngineKind::Remote
    }

    fn play(&mut self) -> PlayStart {
        match &self.player {
            Some(player) => {
                player.play();
                PlayStart::Started
            }
            None => PlayStart::Inactive,
        }
    }

    fn pause(&mut self) {
        if let Some(player) = &self.player {
            player.pause();
        }
    }

    fn stop(&mut self) {
        if let Some(player) = &self.player {
            player.stop();
        }
    }

    // The embed API takes 0..=100 directly.
    fn set_volume(&mut self, level: u8) {
        if let Some(player) = &self.player {
            player.set_volume(level.min(100));
        }
    }

    fn destroy(&mut self) {
        if let Some(player) = self.player.take() {
            player.destroy();
        }
    }

    fn is_destroyed(&self) -> bool {
        self.player.is_none()
    }
}

pub struct LocalEngine {
    media: Option<Box<dyn LocalMediaHandle>>,
}

impl LocalEngine {
    pub fn new(media: Box<dyn LocalMediaHandle>) -> Self {
        media.set_loop(true);
        Self { media: Some(media) }
    }
}

impl PlaybackEngine for LocalEngine {
    fn kind(&self) -> EngineKind {
        EngineKind::Local
    }

    fn play(&mut self) -> PlayStart {
        match &self.media {
            Some(media) => PlayStart::Pending(media.play()),
            None => PlayStart::Inactive,
        }
    }

    fn pause(&mut self) {
        if let Some(media) = &self.media {
            media.pause();
        }
    }

    fn stop(&mut self) {
        if let Some(media) = &self.media {
            media.pause();
            media.set_current_time(0.0);
        }
    }

    fn set_volume(&mut self, level: u8) {
        if let Some(media) = &self.media {
            media.set_volume(f64::from(level.min(100)) / 100.0);
        }
    }

    fn destroy(&mut self) {
        if let Some(media) = self.media.take() {
            media.pause();
        }
    }

    fn is_destroyed(&self) -> bool {
        self.media.is_none()
    }
}

#[cfg(test)]
mod tests {
    use platform_host::{
        LocalMediaProvider, MemoryLocalMediaProvider, MemoryRemotePlayerProvider, RemoteCall,
        RemotePlayerCallbacks, RemotePlayerOptions, RemotePlayerProvider,
    };
    use pretty_assertions::assert_eq;

    use super::*;

    fn remote_engine(provider: &MemoryRemotePlayerProvider) -> RemoteEngine {
        let player = provider
            .create(
                RemotePlayerOptions {
                    container_id: "stage".to_string(),
                    track_id: "t1".to_string(),
                    autoplay: false,
                },
                RemotePlayerCallbacks::ignore(),
            )
            .expect("create remote");
        RemoteEngine::new(player)
    }

    #[test]
    fn volume_scales_are_not_cross_normalized() {
        let remote_provider = MemoryRemotePlayerProvider::new();
        let mut remote = remote_engine(&remote_provider);
        remote.set_volume(50);
        assert_eq!(remote_provider.calls(0), vec![RemoteCall::SetVolume(50)]);

        let local_provider = MemoryLocalMediaProvider::new();
        let mut local = LocalEngine::new(local_provider.create("a.mp3").expect("create local"));
        local.set_volume(50);
        assert_eq!(local_provider.element(0).map(|e| e.volume), Some(0.5));
    }

    #[test]
    fn remote_destroy_is_idempotent_and_silences_commands() {
        let provider = MemoryRemotePlayerProvider::new();
        let mut engine = remote_engine(&provider);

        engine.destroy();
        engine.destroy();
        engine.play();
        engine.stop();

        assert!(engine.is_destroyed());
        assert_eq!(provider.calls(0), vec![RemoteCall::Destroy]);
    }

    #[test]
    fn local_stop_pauses_and_rewinds() {
        let provider = MemoryLocalMediaProvider::new();
        let mut engine = LocalEngine::new(provider.create("a.mp3").expect("create local"));
        if let PlayStart::Pending(start) = engine.play() {
            futures::executor::block_on(start).expect("play");
        }
        provider.advance_position(0, 12.5);

        engine.stop();

        let element = provider.element(0).expect("element");
        assert!(element.paused);
        assert_eq!(element.current_time, 0.0);
        assert!(element.looping);
    }
}
