//! Compile-time host-strategy selection and the browser host bundle.

use std::rc::Rc;

use futures::future::LocalBoxFuture;
use platform_host::{HostServices, HostStrategy, LocalSpawner, ProviderReadiness};

use crate::{WebConfigSource, WebLocalMediaProvider, WebRemotePlayerProvider, WebTimerService};

/// Returns the compile-time selected host strategy for the active build.
pub const fn selected_host_strategy() -> HostStrategy {
    #[cfg(target_arch = "wasm32")]
    {
        HostStrategy::Browser
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        HostStrategy::Headless
    }
}

/// Returns the selected host strategy as a stable string token.
pub fn host_strategy_name() -> &'static str {
    selected_host_strategy().as_str()
}

/// Spawner that hands futures to the browser microtask queue.
///
/// Native builds have no event loop and drop spawned futures unpolled.
pub fn browser_spawner() -> LocalSpawner {
    #[cfg(target_arch = "wasm32")]
    {
        Rc::new(|future: LocalBoxFuture<'static, ()>| wasm_bindgen_futures::spawn_local(future))
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        Rc::new(|_future: LocalBoxFuture<'static, ()>| {})
    }
}

/// Builds the browser host bundle and starts loading the remote player script.
///
/// The returned bundle's readiness broker flips once the embed API reports ready.
pub fn build_host_services() -> HostServices {
    let readiness = ProviderReadiness::new();
    let remote_player = WebRemotePlayerProvider::new(readiness.clone());
    remote_player.install_script();

    HostServices {
        timers: Rc::new(WebTimerService),
        spawner: browser_spawner(),
        remote_player: Rc::new(remote_player),
        remote_readiness: readiness,
        local_media: Rc::new(WebLocalMediaProvider),
        config: Rc::new(WebConfigSource::default()),
        host_strategy: selected_host_strategy(),
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn native_bundle_is_headless_and_inert() {
        let services = build_host_services();
        assert_eq!(services.host_strategy, HostStrategy::Headless);
        assert_eq!(host_strategy_name(), "headless");
        assert!(!services.remote_readiness.is_ready());

        let fired = Rc::new(Cell::new(false));
        let flag = fired.clone();
        let handle = services
            .timers
            .set_timeout(0, Box::new(move || flag.set(true)));
        handle.cancel();
        assert!(!fired.get());

        let ran = Rc::new(Cell::new(false));
        let flag = ran.clone();
        (services.spawner)(Box::pin(async move { flag.set(true) }));
        assert!(!ran.get());
    }
}
