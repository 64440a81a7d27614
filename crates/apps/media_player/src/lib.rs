//! Media player app: streams a playlist through the embedded remote provider and falls back to
//! a locally served file for the rest of the session once the provider fails.

mod controller;
mod engine;
mod playlist;
mod view;
mod visualizer;

use desktop_app_contract::{AppLifecycleEvent, ManagedApp, WindowHandle};
use leptos::{logging, view, IntoView, View};
use platform_host::HostServices;

pub use controller::{
    MediaPlayerController, PlaybackSession, PlayerConfig, PlayerSnapshot, PRESS_PLAY_STATUS,
    READINESS_POLL_MS,
};
pub use engine::{EngineKind, LocalEngine, PlayStart, PlaybackEngine, RemoteEngine};
pub use playlist::{default_fallback_track, default_playlist, FallbackTrack, Track};
pub use view::MediaPlayerView;
pub use visualizer::{
    Visualizer, BAR_COUNT, MAX_BAR_PERCENT, MIN_BAR_PERCENT, RESTING_BAR_PERCENT,
    VISUALIZER_PERIOD_MS,
};

/// Content template key rendered by the desktop shell for this app.
pub const MEDIA_PLAYER_TEMPLATE: &str = "media-player";

/// Hosted media player bound to one window.
pub struct MediaPlayerApp {
    controller: MediaPlayerController,
}

impl MediaPlayerApp {
    pub fn controller(&self) -> &MediaPlayerController {
        &self.controller
    }
}

impl ManagedApp for MediaPlayerApp {
    fn on_lifecycle(&mut self, event: AppLifecycleEvent) {
        if event == AppLifecycleEvent::Closed {
            self.controller.on_window_closed();
        }
    }

    fn view(&self) -> View {
        let controller = self.controller.clone();
        view! { <MediaPlayerView controller=controller /> }.into_view()
    }
}

/// DOM id of the provider stage for the window with runtime id `window_id`.
pub fn stage_container_id(window_id: u64) -> String {
    format!("media-player-stage-{window_id}")
}

/// Builds a player session for `window` and ties session teardown to the window's close
/// sequence.
///
/// The remote engine starts on a zero-delay timer, after the window body holding the player
/// stage has been rendered.
pub fn launch_media_player(window: &WindowHandle, services: HostServices) -> MediaPlayerApp {
    let config = PlayerConfig {
        container_id: stage_container_id(window.id()),
        visualizer_seed: platform_host::unix_time_ms_now() ^ window.id(),
        ..PlayerConfig::default()
    };
    let timers = services.timers.clone();
    let controller = MediaPlayerController::new(services, config);

    let starter = controller.clone();
    let deferred_start = timers.set_timeout(0, Box::new(move || starter.start()));

    let session = controller.clone();
    window.on_teardown(move |event| {
        logging::log!("releasing media player for window {}", event.window.id());
        deferred_start.cancel();
        session.on_window_closed();
    });

    MediaPlayerApp { controller }
}

#[cfg(test)]
mod tests {
    use platform_host::{
        ManualTimerService, MemoryLocalMediaProvider, MemoryRemotePlayerProvider,
        ProviderReadiness,
    };
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn window_teardown_releases_player_resources() {
        let timers = ManualTimerService::new();
        let remote = MemoryRemotePlayerProvider::new();
        let local = MemoryLocalMediaProvider::new();
        let services = HostServices::headless(
            timers.clone(),
            remote.clone(),
            local.clone(),
            ProviderReadiness::ready(),
        );
        let window = WindowHandle::new(4, "Media Player");

        let app = launch_media_player(&window, services);
        timers.advance(0);
        app.controller().play();
        assert_eq!(
            remote.options(0).map(|options| options.container_id),
            Some("media-player-stage-4".to_string())
        );
        assert_eq!(timers.pending(), 1);

        assert_eq!(window.teardown(), 1);

        assert!(remote.is_destroyed(0));
        assert_eq!(timers.pending(), 0);
        assert!(app.controller().snapshot().session.closed);
    }

    #[test]
    fn launch_before_provider_ready_waits_for_readiness() {
        let timers = ManualTimerService::new();
        let remote = MemoryRemotePlayerProvider::new();
        let readiness = ProviderReadiness::new();
        let services = HostServices::headless(
            timers.clone(),
            remote.clone(),
            MemoryLocalMediaProvider::new(),
            readiness.clone(),
        );
        let window = WindowHandle::new(9, "Media Player");

        let _app = launch_media_player(&window, services);
        timers.advance(0);
        assert_eq!(remote.created_count(), 0);

        readiness.mark_ready();
        timers.advance(u64::from(READINESS_POLL_MS));
        assert_eq!(remote.created_count(), 1);
    }

    #[test]
    fn remote_player_is_built_only_after_the_stage_renders() {
        let timers = ManualTimerService::new();
        let remote = MemoryRemotePlayerProvider::new();
        let services = HostServices::headless(
            timers.clone(),
            remote.clone(),
            MemoryLocalMediaProvider::new(),
            ProviderReadiness::ready(),
        );
        let window = WindowHandle::new(2, "Media Player");

        let app = launch_media_player(&window, services);
        assert_eq!(remote.created_count(), 0);
        assert_eq!(timers.pending(), 1);
        assert!(!app.controller().snapshot().engine_constructed);

        timers.advance(0);
        assert_eq!(
            remote.options(0).map(|options| options.container_id),
            Some(app.controller().container_id())
        );
        assert_eq!(app.controller().container_id(), "media-player-stage-2");
        assert_eq!(timers.pending(), 0);
    }

    #[test]
    fn closing_before_the_deferred_start_builds_nothing() {
        let timers = ManualTimerService::new();
        let remote = MemoryRemotePlayerProvider::new();
        let local = MemoryLocalMediaProvider::new();
        let services = HostServices::headless(
            timers.clone(),
            remote.clone(),
            local.clone(),
            ProviderReadiness::ready(),
        );
        let window = WindowHandle::new(3, "Media Player");

        let _app = launch_media_player(&window, services);
        assert_eq!(window.teardown(), 1);
        timers.advance(1_000);

        assert_eq!(timers.pending(), 0);
        assert_eq!(remote.created_count(), 0);
        assert_eq!(local.created_count(), 0);
    }
}
