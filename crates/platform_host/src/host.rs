//! Shared host-bundle model for browser and headless runtime composition.

use std::rc::Rc;

use crate::{
    blocking_spawner, ConfigSource, LocalMediaProvider, LocalSpawner, ManualTimerService,
    MemoryLocalMediaProvider, MemoryRemotePlayerProvider, NoopConfigSource, ProviderReadiness,
    RemotePlayerProvider, TimerService,
};

/// Stable host strategy selected for the current build/runtime composition path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostStrategy {
    /// Browser-backed runtime composition.
    Browser,
    /// Headless composition with in-memory adapters (native builds and tests).
    Headless,
}

impl HostStrategy {
    /// Returns a stable string token for diagnostics and runtime inspection.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Browser => "browser",
            Self::Headless => "headless",
        }
    }
}

/// Runtime-selected host service bundle injected into the desktop runtime and hosted apps.
///
/// All environment-specific service selection happens before this bundle crosses into
/// `desktop_runtime`, which keeps the runtime and app crates decoupled from adapter details.
#[derive(Clone)]
pub struct HostServices {
    /// Deferred/periodic callback scheduling.
    pub timers: Rc<dyn TimerService>,
    /// Local future spawning for asynchronous host promises.
    pub spawner: LocalSpawner,
    /// Embedded remote player factory.
    pub remote_player: Rc<dyn RemotePlayerProvider>,
    /// Readiness broker signalled by the remote player's script loader.
    pub remote_readiness: ProviderReadiness,
    /// Local media element factory.
    pub local_media: Rc<dyn LocalMediaProvider>,
    /// Desktop configuration document source.
    pub config: Rc<dyn ConfigSource>,
    /// Stable strategy identifier for diagnostics.
    pub host_strategy: HostStrategy,
}

impl HostServices {
    /// Builds a headless bundle backed by a virtual clock and recording media providers.
    pub fn headless(
        timers: ManualTimerService,
        remote_player: MemoryRemotePlayerProvider,
        local_media: MemoryLocalMediaProvider,
        remote_readiness: ProviderReadiness,
    ) -> Self {
        Self {
            timers: Rc::new(timers),
            spawner: blocking_spawner(),
            remote_player: Rc::new(remote_player),
            remote_readiness,
            local_media: Rc::new(local_media),
            config: Rc::new(NoopConfigSource),
            host_strategy: HostStrategy::Headless,
        }
    }

    /// Replaces the spawner, for example with a `LocalPool`-backed one.
    pub fn with_spawner(mut self, spawner: LocalSpawner) -> Self {
        self.spawner = spawner;
        self
    }
}
