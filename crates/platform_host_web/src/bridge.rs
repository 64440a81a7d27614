//! Browser interop layer for `platform_host_web` service adapters.
//!
//! This module contains the WASM/JS shim for the embedded remote player and the configuration
//! fetch, plus a non-WASM fallback so native builds and tests compile against the same API.

use platform_host::{RemotePlayerCallbacks, RemotePlayerOptions};

#[cfg(target_arch = "wasm32")]
mod imp {
    use super::*;
    use js_sys::{Function, Promise};
    use platform_host::RemotePlayerState;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen::JsCast;
    use wasm_bindgen_futures::JsFuture;

    #[wasm_bindgen(inline_js = r#"
function fail(message) {
  throw new Error(message);
}

export function jsInstallRemotePlayerScript(src, onReady) {
  if (window.YT && typeof window.YT.Player === 'function') {
    onReady();
    return;
  }
  const previous = window.onYouTubeIframeAPIReady;
  window.onYouTubeIframeAPIReady = () => {
    if (typeof previous === 'function') {
      previous();
    }
    onReady();
  };
  if (!document.querySelector(`script[src="${src}"]`)) {
    const tag = document.createElement('script');
    tag.src = src;
    tag.async = true;
    document.head.appendChild(tag);
  }
}

export function jsCreateRemotePlayer(containerId, trackId, autoplay, onReady, onStateChange, onError) {
  if (!(window.YT && typeof window.YT.Player === 'function')) {
    fail('remote player script has not loaded');
  }
  if (!document.getElementById(containerId)) {
    fail(`player stage #${containerId} is not mounted`);
  }
  return new window.YT.Player(containerId, {
    height: '0',
    width: '0',
    videoId: trackId,
    playerVars: { autoplay: autoplay ? 1 : 0, controls: 0, playsinline: 1 },
    events: {
      onReady: () => onReady(),
      onStateChange: (event) => onStateChange(event.data),
      onError: (event) => onError(event.data),
    },
  });
}

export function jsCallRemotePlayer(player, method, arg) {
  if (!player || typeof player[method] !== 'function') {
    return;
  }
  if (arg === undefined) {
    player[method]();
  } else {
    player[method](arg);
  }
}

export async function jsFetchText(url) {
  const response = await fetch(url, { cache: 'no-cache' });
  if (response.status === 404) {
    return null;
  }
  if (!response.ok) {
    fail(`request for ${url} failed with HTTP ${response.status}`);
  }
  return await response.text();
}
"#)]
    extern "C" {
        #[wasm_bindgen(js_name = jsInstallRemotePlayerScript)]
        fn js_install_remote_player_script(src: &str, on_ready: &Function);
        #[wasm_bindgen(catch, js_name = jsCreateRemotePlayer)]
        fn js_create_remote_player(
            container_id: &str,
            track_id: &str,
            autoplay: bool,
            on_ready: &Function,
            on_state_change: &Function,
            on_error: &Function,
        ) -> Result<JsValue, JsValue>;
        #[wasm_bindgen(js_name = jsCallRemotePlayer)]
        fn js_call_remote_player(player: &JsValue, method: &str, arg: JsValue);
        #[wasm_bindgen(js_name = jsFetchText)]
        fn js_fetch_text(url: &str) -> Promise;
    }

    /// Live embedded player plus the closures its event handlers call into.
    ///
    /// The closures are released together with the binding, after `destroy` has detached the
    /// player's events.
    pub struct RemotePlayerBinding {
        player: JsValue,
        _on_ready: Closure<dyn FnMut()>,
        _on_state_change: Closure<dyn FnMut(i32)>,
        _on_error: Closure<dyn FnMut(i32)>,
    }

    impl RemotePlayerBinding {
        pub fn call(&self, method: &str) {
            js_call_remote_player(&self.player, method, JsValue::UNDEFINED);
        }

        pub fn call_with(&self, method: &str, arg: f64) {
            js_call_remote_player(&self.player, method, JsValue::from_f64(arg));
        }
    }

    pub fn install_remote_player_script(src: &str, on_ready: Box<dyn FnOnce()>) {
        let callback = Closure::once_into_js(move || on_ready());
        js_install_remote_player_script(src, callback.unchecked_ref());
    }

    pub fn create_remote_player(
        options: &RemotePlayerOptions,
        callbacks: RemotePlayerCallbacks,
    ) -> Result<RemotePlayerBinding, String> {
        let ready = callbacks.on_ready.clone();
        let on_ready = Closure::<dyn FnMut()>::wrap(Box::new(move || ready()));
        let state_change = callbacks.on_state_change.clone();
        let on_state_change = Closure::<dyn FnMut(i32)>::wrap(Box::new(move |code: i32| {
            if let Some(state) = RemotePlayerState::from_code(code) {
                state_change(state);
            }
        }));
        let error = callbacks.on_error.clone();
        let on_error = Closure::<dyn FnMut(i32)>::wrap(Box::new(move |code: i32| error(code)));

        let player = js_create_remote_player(
            &options.container_id,
            &options.track_id,
            options.autoplay,
            on_ready.as_ref().unchecked_ref(),
            on_state_change.as_ref().unchecked_ref(),
            on_error.as_ref().unchecked_ref(),
        )
        .map_err(js_error_to_string)?;

        Ok(RemotePlayerBinding {
            player,
            _on_ready: on_ready,
            _on_state_change: on_state_change,
            _on_error: on_error,
        })
    }

    pub async fn fetch_text(url: &str) -> Result<Option<String>, String> {
        let value = await_promise(js_fetch_text(url)).await?;
        if value.is_null() || value.is_undefined() {
            Ok(None)
        } else {
            value
                .as_string()
                .map(Some)
                .ok_or_else(|| "fetch returned non-string payload".to_string())
        }
    }

    pub async fn await_promise(promise: Promise) -> Result<JsValue, String> {
        JsFuture::from(promise).await.map_err(js_error_to_string)
    }

    pub fn js_error_to_string(err: JsValue) -> String {
        if let Some(text) = err.as_string() {
            return text;
        }
        if let Ok(message) = js_sys::Reflect::get(&err, &JsValue::from_str("message")) {
            if let Some(text) = message.as_string() {
                return text;
            }
        }
        format!("{err:?}")
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod imp {
    use super::*;

    fn unsupported() -> String {
        "browser media APIs are only available when compiled for wasm32".to_string()
    }

    pub struct RemotePlayerBinding;

    impl RemotePlayerBinding {
        pub fn call(&self, _method: &str) {}

        pub fn call_with(&self, _method: &str, _arg: f64) {}
    }

    pub fn install_remote_player_script(_src: &str, _on_ready: Box<dyn FnOnce()>) {}

    pub fn create_remote_player(
        _options: &RemotePlayerOptions,
        _callbacks: RemotePlayerCallbacks,
    ) -> Result<RemotePlayerBinding, String> {
        Err(unsupported())
    }

    pub async fn fetch_text(_url: &str) -> Result<Option<String>, String> {
        Ok(None)
    }
}

#[cfg(target_arch = "wasm32")]
pub use imp::{await_promise, js_error_to_string};
pub use imp::RemotePlayerBinding;

/// Injects the remote player's script tag once and calls `on_ready` when its API is usable.
pub fn install_remote_player_script(src: &str, on_ready: Box<dyn FnOnce()>) {
    imp::install_remote_player_script(src, on_ready)
}

pub fn create_remote_player(
    options: &RemotePlayerOptions,
    callbacks: RemotePlayerCallbacks,
) -> Result<RemotePlayerBinding, String> {
    imp::create_remote_player(options, callbacks)
}

/// Fetches `url` as text. A 404 is reported as `Ok(None)`.
pub async fn fetch_text(url: &str) -> Result<Option<String>, String> {
    imp::fetch_text(url).await
}
