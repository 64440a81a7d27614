//! Browser media provider adapters: the embedded remote player and `HtmlAudioElement`.

use std::cell::RefCell;

use platform_host::{
    LocalMediaHandle, LocalMediaProvider, ProviderReadiness, RemotePlayerCallbacks,
    RemotePlayerHandle, RemotePlayerOptions, RemotePlayerProvider,
};

use crate::bridge::{self, RemotePlayerBinding};

/// Script URL of the embedded streaming player API.
pub const REMOTE_PLAYER_SCRIPT_URL: &str = "https://www.youtube.com/iframe_api";

#[derive(Debug, Clone)]
/// Remote player provider backed by the embed API script.
pub struct WebRemotePlayerProvider {
    script_src: String,
    readiness: ProviderReadiness,
}

impl WebRemotePlayerProvider {
    /// Creates a provider whose script loader will signal `readiness`.
    pub fn new(readiness: ProviderReadiness) -> Self {
        Self {
            script_src: REMOTE_PLAYER_SCRIPT_URL.to_string(),
            readiness,
        }
    }

    /// Overrides the embed API script URL.
    pub fn with_script_src(mut self, script_src: impl Into<String>) -> Self {
        self.script_src = script_src.into();
        self
    }

    /// Readiness broker signalled by [`WebRemotePlayerProvider::install_script`].
    pub fn readiness(&self) -> ProviderReadiness {
        self.readiness.clone()
    }

    /// Injects the embed API script. The readiness broker is marked once the API reports ready.
    pub fn install_script(&self) {
        let readiness = self.readiness.clone();
        bridge::install_remote_player_script(
            &self.script_src,
            Box::new(move || {
                readiness.mark_ready();
            }),
        );
    }
}

impl RemotePlayerProvider for WebRemotePlayerProvider {
    fn create(
        &self,
        options: RemotePlayerOptions,
        callbacks: RemotePlayerCallbacks,
    ) -> Result<Box<dyn RemotePlayerHandle>, String> {
        if !self.readiness.is_ready() {
            return Err("remote player script is not ready".to_string());
        }
        let binding = bridge::create_remote_player(&options, callbacks)?;
        Ok(Box::new(WebRemotePlayerHandle {
            binding: RefCell::new(Some(binding)),
        }))
    }
}

struct WebRemotePlayerHandle {
    binding: RefCell<Option<RemotePlayerBinding>>,
}

impl WebRemotePlayerHandle {
    fn with_binding(&self, op: impl FnOnce(&RemotePlayerBinding)) {
        if let Some(binding) = self.binding.borrow().as_ref() {
            op(binding);
        }
    }
}

impl RemotePlayerHandle for WebRemotePlayerHandle {
    fn play(&self) {
        self.with_binding(|player| player.call("playVideo"));
    }

    fn pause(&self) {
        self.with_binding(|player| player.call("pauseVideo"));
    }

    fn stop(&self) {
        self.with_binding(|player| player.call("stopVideo"));
    }

    fn set_volume(&self, volume: u8) {
        self.with_binding(|player| player.call_with("setVolume", f64::from(volume.min(100))));
    }

    fn destroy(&self) {
        let binding = self.binding.borrow_mut().take();
        if let Some(binding) = binding {
            binding.call("destroy");
        }
    }
}

impl Drop for WebRemotePlayerHandle {
    fn drop(&mut self) {
        self.destroy();
    }
}

#[derive(Debug, Clone, Copy, Default)]
/// Local media provider backed by `HtmlAudioElement`.
pub struct WebLocalMediaProvider;

#[cfg(target_arch = "wasm32")]
mod audio {
    use futures::future;
    use platform_host::{LocalMediaHandle, LocalPlayFuture};
    use wasm_bindgen_futures::JsFuture;
    use web_sys::HtmlAudioElement;

    use crate::bridge::js_error_to_string;

    pub(super) struct WebLocalMediaHandle {
        pub(super) audio: HtmlAudioElement,
    }

    impl LocalMediaHandle for WebLocalMediaHandle {
        fn play(&self) -> LocalPlayFuture {
            match self.audio.play() {
                Ok(promise) => Box::pin(async move {
                    JsFuture::from(promise)
                        .await
                        .map(|_| ())
                        .map_err(js_error_to_string)
                }),
                Err(err) => Box::pin(future::ready(Err(js_error_to_string(err)))),
            }
        }

        fn pause(&self) {
            let _ = self.audio.pause();
        }

        fn is_paused(&self) -> bool {
            self.audio.paused()
        }

        fn volume(&self) -> f64 {
            self.audio.volume()
        }

        fn set_volume(&self, volume: f64) {
            self.audio.set_volume(volume.clamp(0.0, 1.0));
        }

        fn current_time(&self) -> f64 {
            self.audio.current_time()
        }

        fn set_current_time(&self, seconds: f64) {
            self.audio.set_current_time(seconds.max(0.0));
        }

        fn set_loop(&self, looping: bool) {
            self.audio.set_loop(looping);
        }
    }

    impl Drop for WebLocalMediaHandle {
        fn drop(&mut self) {
            let _ = self.audio.pause();
        }
    }
}

impl LocalMediaProvider for WebLocalMediaProvider {
    #[cfg(target_arch = "wasm32")]
    fn create(&self, source_url: &str) -> Result<Box<dyn LocalMediaHandle>, String> {
        let audio = web_sys::HtmlAudioElement::new_with_src(source_url)
            .map_err(bridge::js_error_to_string)?;
        audio.set_preload("auto");
        Ok(Box::new(audio::WebLocalMediaHandle { audio }))
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn create(&self, _source_url: &str) -> Result<Box<dyn LocalMediaHandle>, String> {
        Err("local media playback is only available when compiled for wasm32".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> RemotePlayerOptions {
        RemotePlayerOptions {
            container_id: "stage".to_string(),
            track_id: "track-a".to_string(),
            autoplay: true,
        }
    }

    #[test]
    fn remote_creation_waits_for_readiness() {
        let provider = WebRemotePlayerProvider::new(ProviderReadiness::new());
        let err = provider
            .create(options(), RemotePlayerCallbacks::ignore())
            .err()
            .expect("not ready");
        assert!(err.contains("not ready"), "{err}");
    }

    #[test]
    fn native_builds_report_missing_browser_players() {
        let provider = WebRemotePlayerProvider::new(ProviderReadiness::ready());
        assert!(provider
            .create(options(), RemotePlayerCallbacks::ignore())
            .is_err());
        assert!(WebLocalMediaProvider.create("audio/fallback.mp3").is_err());
    }

    #[test]
    fn script_install_shares_the_injected_readiness() {
        let readiness = ProviderReadiness::new();
        let provider =
            WebRemotePlayerProvider::new(readiness.clone()).with_script_src("/player_api.js");
        provider.install_script();
        assert!(!provider.readiness().is_ready());
        readiness.mark_ready();
        assert!(provider.readiness().is_ready());
    }
}
