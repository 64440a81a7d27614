use leptos::*;

use crate::{
    controller::{MediaPlayerController, PlayerSnapshot},
    engine::EngineKind,
};

#[component]
/// Transport controls, track status, and visualizer bars for one player session.
pub fn MediaPlayerView(controller: MediaPlayerController) -> impl IntoView {
    let snapshot = create_rw_signal(controller.snapshot());
    controller.subscribe(std::rc::Rc::new(move |next: &PlayerSnapshot| {
        // The signal is gone once the window's view is disposed.
        let _ = snapshot.try_set(next.clone());
    }));

    let container_id = controller.container_id();
    let volume_text = move || {
        snapshot
            .with(|s| (s.session.volume * 100.0).round() as u8)
            .to_string()
    };
    let is_local = move || snapshot.with(|s| s.session.engine == EngineKind::Local);

    let on_prev = {
        let controller = controller.clone();
        move |_| controller.previous_track()
    };
    let on_play = {
        let controller = controller.clone();
        move |_| controller.play()
    };
    let on_pause = {
        let controller = controller.clone();
        move |_| controller.pause()
    };
    let on_stop = {
        let controller = controller.clone();
        move |_| controller.stop()
    };
    let on_next = {
        let controller = controller.clone();
        move |_| controller.next_track()
    };
    let on_volume = move |ev: ev::Event| {
        if let Ok(level) = event_target_value(&ev).parse::<u8>() {
            controller.set_volume(level);
        }
    };

    view! {
        <div class="app-shell app-media-player-shell">
            <div id=container_id class="media-player-stage" aria-hidden="true"></div>
            <div class="media-player-status" role="status" aria-live="polite">
                <span class="media-player-source">
                    {move || if is_local() { "Local" } else { "Stream" }}
                </span>
                <span class="media-player-title">
                    {move || snapshot.with(|s| s.session.now_playing.clone())}
                </span>
            </div>
            <div
                class="media-player-visualizer"
                class:resting=move || snapshot.with(|s| s.bars_resting)
                aria-hidden="true"
            >
                {move || {
                    snapshot.with(|s| {
                        s.bars
                            .iter()
                            .map(|height| {
                                view! {
                                    <span
                                        class="media-player-bar"
                                        style=format!("height: {height}%")
                                    ></span>
                                }
                            })
                            .collect_view()
                    })
                }}
            </div>
            <div class="media-player-controls" role="group" aria-label="Playback controls">
                <button type="button" title="Previous track" disabled=is_local on:click=on_prev>
                    "Prev"
                </button>
                <button
                    type="button"
                    title="Play"
                    class:active=move || snapshot.with(|s| s.session.playing)
                    on:click=on_play
                >
                    "Play"
                </button>
                <button type="button" title="Pause" on:click=on_pause>
                    "Pause"
                </button>
                <button type="button" title="Stop" on:click=on_stop>
                    "Stop"
                </button>
                <button type="button" title="Next track" disabled=is_local on:click=on_next>
                    "Next"
                </button>
                <label class="media-player-volume">
                    "Volume"
                    <input
                        type="range"
                        min="0"
                        max="100"
                        step="1"
                        prop:value=volume_text
                        on:input=on_volume
                    />
                </label>
            </div>
        </div>
    }
}
