//! Media player session controller: remote-first playback with a one-way local fallback.

use std::{
    cell::RefCell,
    rc::{Rc, Weak},
};

use leptos::logging;
use platform_host::{
    HostServices, LocalPlayFuture, LocalSpawner, RemotePlayerCallbacks, RemotePlayerOptions,
    RemotePlayerState, TimerHandle,
};
use serde::{Deserialize, Serialize};

use crate::{
    engine::{EngineKind, LocalEngine, PlayStart, PlaybackEngine, RemoteEngine},
    playlist::{default_fallback_track, default_playlist, FallbackTrack, Track},
    visualizer::{Visualizer, VISUALIZER_PERIOD_MS},
};

/// Delay between checks of the remote provider's readiness flag.
pub const READINESS_POLL_MS: u32 = 1_000;
/// Status line shown when the host refuses to start local playback on its own.
pub const PRESS_PLAY_STATUS: &str = "Press play to start";
const LOADING_STATUS: &str = "Connecting...";
const UNAVAILABLE_STATUS: &str = "Playback unavailable";
const DEFAULT_VOLUME: u8 = 50;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Per-window playback session state.
pub struct PlaybackSession {
    pub playlist: Vec<Track>,
    pub fallback: FallbackTrack,
    pub engine: EngineKind,
    pub playing: bool,
    /// Normalized `0.0..=1.0`.
    pub volume: f64,
    /// Index into `playlist`; meaningful only while `engine` is `Remote`.
    pub track_index: usize,
    pub now_playing: String,
    pub closed: bool,
}

#[derive(Debug, Clone, PartialEq)]
/// Render snapshot published to subscribers after every state change.
pub struct PlayerSnapshot {
    pub session: PlaybackSession,
    pub bars: Vec<u8>,
    /// Every bar sits at the resting height.
    pub bars_resting: bool,
    /// Whether a provider instance currently backs the active engine.
    pub engine_constructed: bool,
}

#[derive(Debug, Clone)]
/// Construction parameters for a player session.
pub struct PlayerConfig {
    /// DOM id handed to the remote provider.
    pub container_id: String,
    pub playlist: Vec<Track>,
    pub fallback: FallbackTrack,
    /// Initial volume on the `0..=100` control scale.
    pub volume: u8,
    pub visualizer_seed: u64,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            container_id: "media-player-stage".to_string(),
            playlist: default_playlist(),
            fallback: default_fallback_track(),
            volume: DEFAULT_VOLUME,
            visualizer_seed: platform_host::unix_time_ms_now(),
        }
    }
}

enum ProviderSignal {
    Ready,
    StateChange(RemotePlayerState),
    Error(i32),
}

struct PendingPlay {
    future: LocalPlayFuture,
    token: u64,
}

type SnapshotListener = Rc<dyn Fn(&PlayerSnapshot)>;

struct PlayerInner {
    session: PlaybackSession,
    engine: Option<Box<dyn PlaybackEngine>>,
    services: HostServices,
    container_id: String,
    visualizer: Visualizer,
    visualizer_timer: Option<TimerHandle>,
    readiness_poll: Option<TimerHandle>,
    // Bumped whenever an engine is built or released; stale provider callbacks carry old values.
    engine_generation: u64,
    // Bumped by every transport command; stale local play resolutions compare against it.
    play_token: u64,
    listeners: Vec<SnapshotListener>,
}

#[derive(Clone)]
/// Cheap handle to one player session. Clones share the session.
pub struct MediaPlayerController {
    inner: Rc<RefCell<PlayerInner>>,
}

impl MediaPlayerController {
    /// Creates a session in the `Remote` state. No provider instance exists until
    /// [`MediaPlayerController::start`] runs.
    pub fn new(services: HostServices, config: PlayerConfig) -> Self {
        let volume = config.volume.min(100);
        let session = PlaybackSession {
            playlist: config.playlist,
            fallback: config.fallback,
            engine: EngineKind::Remote,
            playing: false,
            volume: f64::from(volume) / 100.0,
            track_index: 0,
            now_playing: LOADING_STATUS.to_string(),
            closed: false,
        };
        Self {
            inner: Rc::new(RefCell::new(PlayerInner {
                session,
                engine: None,
                services,
                container_id: config.container_id,
                visualizer: Visualizer::new(config.visualizer_seed),
                visualizer_timer: None,
                readiness_poll: None,
                engine_generation: 0,
                play_token: 0,
                listeners: Vec::new(),
            })),
        }
    }

    /// Builds the remote engine for the current track, polling provider readiness if needed.
    pub fn start(&self) {
        let pending = {
            let mut inner = self.inner.borrow_mut();
            inner.enter_remote(&self.inner)
        };
        self.finish(pending);
    }

    /// Starts or resumes playback on the active engine.
    pub fn play(&self) {
        let pending = {
            let mut inner = self.inner.borrow_mut();
            if inner.session.closed {
                return;
            }
            let Some(engine) = inner.engine.as_mut() else {
                return;
            };
            let start = engine.play();
            inner.play_token += 1;
            let token = inner.play_token;
            let pending = match start {
                PlayStart::Inactive => return,
                PlayStart::Started => None,
                PlayStart::Pending(future) => Some(PendingPlay { future, token }),
            };
            inner.set_playing(true, &self.inner);
            pending
        };
        self.finish(pending);
    }

    pub fn pause(&self) {
        {
            let mut inner = self.inner.borrow_mut();
            if inner.session.closed {
                return;
            }
            let Some(engine) = inner.engine.as_mut() else {
                return;
            };
            engine.pause();
            inner.play_token += 1;
            inner.set_playing(false, &self.inner);
        }
        self.notify();
    }

    /// Pauses and rewinds the active engine.
    pub fn stop(&self) {
        {
            let mut inner = self.inner.borrow_mut();
            if inner.session.closed {
                return;
            }
            let Some(engine) = inner.engine.as_mut() else {
                return;
            };
            engine.stop();
            inner.play_token += 1;
            inner.set_playing(false, &self.inner);
        }
        self.notify();
    }

    /// Sets volume from a `0..=100` control value.
    ///
    /// The local engine receives `level / 100`; the remote engine receives `level` unchanged,
    /// matching each provider's native scale.
    pub fn set_volume(&self, level: u8) {
        {
            let mut inner = self.inner.borrow_mut();
            if inner.session.closed {
                return;
            }
            let level = level.min(100);
            inner.session.volume = f64::from(level) / 100.0;
            if let Some(engine) = inner.engine.as_mut() {
                engine.set_volume(level);
            }
        }
        self.notify();
    }

    /// Advances to the next playlist track (wrapping). Remote mode only.
    pub fn next_track(&self) {
        self.change_track(1);
    }

    /// Steps back to the previous playlist track (wrapping). Remote mode only.
    pub fn previous_track(&self) {
        self.change_track(-1);
    }

    /// Switches to local playback immediately. No-op once already local.
    pub fn activate_local(&self) {
        let pending = {
            let mut inner = self.inner.borrow_mut();
            if inner.session.closed {
                return;
            }
            inner.enter_local(&self.inner)
        };
        self.finish(pending);
    }

    /// Releases every resource the session holds. Safe to call repeatedly.
    pub fn on_window_closed(&self) {
        {
            let mut inner = self.inner.borrow_mut();
            if inner.session.closed {
                return;
            }
            inner.session.closed = true;
            inner.cancel_readiness_poll();
            inner.set_playing(false, &self.inner);
            inner.release_engine();
            inner.play_token += 1;
        }
        self.notify();
    }

    pub fn engine_kind(&self) -> EngineKind {
        self.inner.borrow().session.engine
    }

    pub fn is_local(&self) -> bool {
        self.engine_kind() == EngineKind::Local
    }

    pub fn is_playing(&self) -> bool {
        self.inner.borrow().session.playing
    }

    pub fn container_id(&self) -> String {
        self.inner.borrow().container_id.clone()
    }

    pub fn snapshot(&self) -> PlayerSnapshot {
        self.inner.borrow().snapshot()
    }

    /// Registers a listener called with a fresh snapshot after every state change.
    pub fn subscribe(&self, listener: Rc<dyn Fn(&PlayerSnapshot)>) {
        self.inner.borrow_mut().listeners.push(listener);
    }

    fn change_track(&self, step: isize) {
        let pending = {
            let mut inner = self.inner.borrow_mut();
            let len = inner.session.playlist.len();
            if inner.session.closed || inner.session.engine != EngineKind::Remote || len == 0 {
                return;
            }
            let index = inner.session.track_index as isize + step;
            inner.session.track_index = index.rem_euclid(len as isize) as usize;
            if inner.readiness_poll.is_some() {
                // The pending poll builds the engine on the new track.
                None
            } else {
                inner.play_token += 1;
                inner.set_playing(false, &self.inner);
                inner.release_engine();
                inner.enter_remote(&self.inner)
            }
        };
        self.finish(pending);
    }

    fn finish(&self, pending: Option<PendingPlay>) {
        if let Some(PendingPlay { future, token }) = pending {
            let spawner = self.inner.borrow().services.spawner.clone();
            let weak = Rc::downgrade(&self.inner);
            spawner(Box::pin(async move {
                let result = future.await;
                if let Some(inner) = weak.upgrade() {
                    MediaPlayerController { inner }.resolve_local_play(token, result);
                }
            }));
        }
        self.notify();
    }

    fn resolve_local_play(&self, token: u64, result: Result<(), String>) {
        {
            let mut inner = self.inner.borrow_mut();
            if inner.session.closed || inner.play_token != token {
                return;
            }
            match result {
                Ok(()) => {
                    inner.session.now_playing = inner.session.fallback.title.clone();
                    inner.set_playing(true, &self.inner);
                }
                Err(err) => {
                    logging::warn!("local playback did not start: {err}");
                    inner.session.now_playing = PRESS_PLAY_STATUS.to_string();
                    inner.set_playing(false, &self.inner);
                }
            }
        }
        self.notify();
    }

    fn handle_provider_signal(&self, generation: u64, signal: ProviderSignal) {
        let pending = {
            let mut inner = self.inner.borrow_mut();
            let live_kind = inner.engine.as_ref().map(|engine| engine.kind());
            if inner.session.closed
                || inner.engine_generation != generation
                || live_kind != Some(EngineKind::Remote)
            {
                return;
            }
            match signal {
                ProviderSignal::Ready => {
                    let level = (inner.session.volume * 100.0).round() as u8;
                    if let Some(engine) = inner.engine.as_mut() {
                        engine.set_volume(level);
                    }
                    None
                }
                ProviderSignal::StateChange(state) => {
                    match state {
                        RemotePlayerState::Playing => inner.set_playing(true, &self.inner),
                        RemotePlayerState::Paused
                        | RemotePlayerState::Ended
                        | RemotePlayerState::Unstarted => inner.set_playing(false, &self.inner),
                        RemotePlayerState::Buffering | RemotePlayerState::Cued => {}
                    }
                    None
                }
                ProviderSignal::Error(code) => {
                    logging::warn!("remote player error {code}; switching to local playback");
                    inner.enter_local(&self.inner)
                }
            }
        };
        self.finish(pending);
    }

    fn notify(&self) {
        let (listeners, snapshot) = {
            let inner = self.inner.borrow();
            (inner.listeners.clone(), inner.snapshot())
        };
        for listener in listeners {
            listener(&snapshot);
        }
    }
}

// Provider callbacks may arrive while the controller is mid-operation; those are re-queued
// through the spawner instead of re-entering the session borrow.
fn dispatch_provider_signal(
    weak: &Weak<RefCell<PlayerInner>>,
    spawner: &LocalSpawner,
    generation: u64,
    signal: ProviderSignal,
) {
    let Some(inner) = weak.upgrade() else {
        return;
    };
    if inner.try_borrow_mut().is_ok() {
        MediaPlayerController { inner }.handle_provider_signal(generation, signal);
        return;
    }
    let weak = weak.clone();
    spawner(Box::pin(async move {
        if let Some(inner) = weak.upgrade() {
            MediaPlayerController { inner }.handle_provider_signal(generation, signal);
        }
    }));
}

impl PlayerInner {
    fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            session: self.session.clone(),
            bars: self.visualizer.bars().to_vec(),
            bars_resting: self.visualizer.is_resting(),
            engine_constructed: self
                .engine
                .as_ref()
                .map(|engine| !engine.is_destroyed())
                .unwrap_or(false),
        }
    }

    fn enter_remote(&mut self, this: &Rc<RefCell<PlayerInner>>) -> Option<PendingPlay> {
        if self.session.closed || self.session.engine != EngineKind::Remote {
            return None;
        }
        let Some(track) = self.session.playlist.get(self.session.track_index).cloned() else {
            logging::warn!("media player playlist is empty; using local playback");
            return self.enter_local(this);
        };
        if !self.services.remote_readiness.is_ready() {
            self.schedule_readiness_poll(this);
            return None;
        }

        self.engine_generation += 1;
        let generation = self.engine_generation;
        let callbacks = remote_callbacks(
            Rc::downgrade(this),
            self.services.spawner.clone(),
            generation,
        );
        let options = RemotePlayerOptions {
            container_id: self.container_id.clone(),
            track_id: track.id.clone(),
            autoplay: false,
        };
        match self.services.remote_player.create(options, callbacks) {
            Ok(player) => {
                self.engine = Some(Box::new(RemoteEngine::new(player)));
                self.session.now_playing = track.title;
                None
            }
            Err(err) => {
                logging::warn!("remote player construction failed: {err}; using local playback");
                self.enter_local(this)
            }
        }
    }

    fn enter_local(&mut self, this: &Rc<RefCell<PlayerInner>>) -> Option<PendingPlay> {
        if self.session.engine == EngineKind::Local {
            return None;
        }
        self.cancel_readiness_poll();
        self.set_playing(false, this);
        self.release_engine();
        self.session.engine = EngineKind::Local;
        self.engine_generation += 1;
        self.play_token += 1;

        let media = match self.services.local_media.create(&self.session.fallback.url) {
            Ok(media) => media,
            Err(err) => {
                logging::warn!("local playback unavailable: {err}");
                self.session.now_playing = UNAVAILABLE_STATUS.to_string();
                return None;
            }
        };
        let mut engine = LocalEngine::new(media);
        engine.set_volume((self.session.volume * 100.0).round() as u8);
        let start = engine.play();
        self.engine = Some(Box::new(engine));
        self.session.now_playing = self.session.fallback.title.clone();
        logging::log!("media player switched to local playback");

        match start {
            PlayStart::Pending(future) => Some(PendingPlay {
                future,
                token: self.play_token,
            }),
            PlayStart::Started => {
                self.set_playing(true, this);
                None
            }
            PlayStart::Inactive => None,
        }
    }

    fn release_engine(&mut self) {
        if let Some(mut engine) = self.engine.take() {
            engine.destroy();
            self.engine_generation += 1;
        }
    }

    fn schedule_readiness_poll(&mut self, this: &Rc<RefCell<PlayerInner>>) {
        if self.readiness_poll.is_some() {
            return;
        }
        let weak = Rc::downgrade(this);
        let handle = self.services.timers.set_timeout(
            READINESS_POLL_MS,
            Box::new(move || {
                let Some(inner) = weak.upgrade() else {
                    return;
                };
                let controller = MediaPlayerController { inner };
                controller.inner.borrow_mut().readiness_poll = None;
                controller.start();
            }),
        );
        self.readiness_poll = Some(handle);
    }

    fn cancel_readiness_poll(&mut self) {
        if let Some(handle) = self.readiness_poll.take() {
            handle.cancel();
        }
    }

    fn set_playing(&mut self, playing: bool, this: &Rc<RefCell<PlayerInner>>) {
        self.session.playing = playing;
        if playing {
            self.start_visualizer(this);
        } else {
            self.stop_visualizer();
        }
    }

    fn start_visualizer(&mut self, this: &Rc<RefCell<PlayerInner>>) {
        if self.visualizer_timer.is_some() {
            return;
        }
        let weak = Rc::downgrade(this);
        let handle = self.services.timers.set_interval(
            VISUALIZER_PERIOD_MS,
            Rc::new(move || {
                let Some(inner) = weak.upgrade() else {
                    return;
                };
                let animated = match inner.try_borrow_mut() {
                    Ok(mut state) if state.session.playing => {
                        state.visualizer.animate();
                        true
                    }
                    _ => false,
                };
                if animated {
                    MediaPlayerController { inner }.notify();
                }
            }),
        );
        self.visualizer_timer = Some(handle);
    }

    fn stop_visualizer(&mut self) {
        if let Some(handle) = self.visualizer_timer.take() {
            handle.cancel();
        }
        self.visualizer.rest();
    }
}

fn remote_callbacks(
    weak: Weak<RefCell<PlayerInner>>,
    spawner: LocalSpawner,
    generation: u64,
) -> RemotePlayerCallbacks {
    let on_ready = {
        let (weak, spawner) = (weak.clone(), spawner.clone());
        Rc::new(move || {
            dispatch_provider_signal(&weak, &spawner, generation, ProviderSignal::Ready)
        })
    };
    let on_state_change = {
        let (weak, spawner) = (weak.clone(), spawner.clone());
        Rc::new(move |state: RemotePlayerState| {
            dispatch_provider_signal(
                &weak,
                &spawner,
                generation,
                ProviderSignal::StateChange(state),
            )
        })
    };
    let on_error = Rc::new(move |code: i32| {
        dispatch_provider_signal(&weak, &spawner, generation, ProviderSignal::Error(code))
    });
    RemotePlayerCallbacks {
        on_ready,
        on_state_change,
        on_error,
    }
}
