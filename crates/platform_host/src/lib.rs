//! Typed host-domain contracts used across the desktop runtime, hosted apps, and browser adapters.
//!
//! This crate is the API-first boundary for platform services. It exposes timer scheduling,
//! local task spawning, media provider contracts, and the configuration document source, plus
//! in-memory adapters used by headless builds and tests. Concrete browser adapters live in
//! `platform_host_web`.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod config;
pub mod host;
pub mod media;
pub mod task;
pub mod time;
pub mod timer;

pub use config::{ConfigSource, ConfigSourceFuture, MemoryConfigSource, NoopConfigSource};
pub use host::{HostServices, HostStrategy};
pub use media::{
    LocalMediaHandle, LocalMediaProvider, LocalMediaSnapshot, LocalPlayFuture,
    MemoryLocalMediaProvider, MemoryRemotePlayerProvider, ProviderReadiness, RemoteCall,
    RemotePlayerCallbacks, RemotePlayerHandle, RemotePlayerOptions, RemotePlayerProvider,
    RemotePlayerState,
};
pub use task::{blocking_spawner, noop_spawner, LocalSpawner};
pub use time::unix_time_ms_now;
pub use timer::{IntervalCallback, ManualTimerService, TimeoutCallback, TimerHandle, TimerService};
