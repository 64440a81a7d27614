//! Media playback provider contracts.
//!
//! Two provider families exist: an embedded remote streaming player that becomes usable only
//! after an external script signals readiness, and a local media element that plays a directly
//! addressable file. Both expose handles whose teardown is safe to repeat.

pub mod local;
pub mod memory;
pub mod readiness;
pub mod remote;

pub use local::{LocalMediaHandle, LocalMediaProvider, LocalPlayFuture};
pub use memory::{
    LocalMediaSnapshot, MemoryLocalMediaProvider, MemoryRemotePlayerProvider, RemoteCall,
};
pub use readiness::ProviderReadiness;
pub use remote::{
    RemotePlayerCallbacks, RemotePlayerHandle, RemotePlayerOptions, RemotePlayerProvider,
    RemotePlayerState,
};
