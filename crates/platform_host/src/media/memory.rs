//! In-memory media providers that record every call, for native tests and headless hosts.

use std::{cell::RefCell, rc::Rc};

use super::{
    LocalMediaHandle, LocalMediaProvider, LocalPlayFuture, RemotePlayerCallbacks,
    RemotePlayerHandle, RemotePlayerOptions, RemotePlayerProvider, RemotePlayerState,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Command recorded against a memory remote player.
pub enum RemoteCall {
    /// `play()`
    Play,
    /// `pause()`
    Pause,
    /// `stop()`
    Stop,
    /// `set_volume(v)`
    SetVolume(u8),
    /// First effective `destroy()`.
    Destroy,
}

struct RemotePlayerEntry {
    options: RemotePlayerOptions,
    callbacks: RemotePlayerCallbacks,
    calls: Vec<RemoteCall>,
    destroyed: bool,
}

#[derive(Default)]
struct MemoryRemoteState {
    players: Vec<RemotePlayerEntry>,
    reject_create: Option<String>,
}

#[derive(Clone, Default)]
/// Remote provider that keeps every constructed player and lets callers fire provider events.
pub struct MemoryRemotePlayerProvider {
    inner: Rc<RefCell<MemoryRemoteState>>,
}

impl MemoryRemotePlayerProvider {
    /// Creates an empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every following `create` call fail with `reason`.
    pub fn reject_create(&self, reason: impl Into<String>) {
        self.inner.borrow_mut().reject_create = Some(reason.into());
    }

    /// Number of players constructed so far.
    pub fn created_count(&self) -> usize {
        self.inner.borrow().players.len()
    }

    /// Number of constructed players not yet destroyed.
    pub fn live_count(&self) -> usize {
        self.inner
            .borrow()
            .players
            .iter()
            .filter(|player| !player.destroyed)
            .count()
    }

    /// Track id each player was constructed with, in construction order.
    pub fn track_ids(&self) -> Vec<String> {
        self.inner
            .borrow()
            .players
            .iter()
            .map(|player| player.options.track_id.clone())
            .collect()
    }

    /// Options the player at `index` was constructed with.
    pub fn options(&self, index: usize) -> Option<RemotePlayerOptions> {
        self.inner
            .borrow()
            .players
            .get(index)
            .map(|player| player.options.clone())
    }

    /// Calls recorded against the player at `index`.
    pub fn calls(&self, index: usize) -> Vec<RemoteCall> {
        self.inner
            .borrow()
            .players
            .get(index)
            .map(|player| player.calls.clone())
            .unwrap_or_default()
    }

    /// Whether the player at `index` was destroyed.
    pub fn is_destroyed(&self, index: usize) -> bool {
        self.inner
            .borrow()
            .players
            .get(index)
            .map(|player| player.destroyed)
            .unwrap_or(false)
    }

    /// Fires the ready callback of the player at `index`.
    pub fn emit_ready(&self, index: usize) {
        if let Some(callbacks) = self.live_callbacks(index) {
            (callbacks.on_ready)();
        }
    }

    /// Fires the state-change callback of the player at `index`.
    pub fn emit_state(&self, index: usize, state: RemotePlayerState) {
        if let Some(callbacks) = self.live_callbacks(index) {
            (callbacks.on_state_change)(state);
        }
    }

    /// Fires the error callback of the player at `index`.
    pub fn emit_error(&self, index: usize, code: i32) {
        if let Some(callbacks) = self.live_callbacks(index) {
            (callbacks.on_error)(code);
        }
    }

    /// Fires the error callback of the player at `index` even if it was already destroyed,
    /// like an event the embed API queued before `destroy()` ran.
    pub fn emit_late_error(&self, index: usize, code: i32) {
        let callbacks = self
            .inner
            .borrow()
            .players
            .get(index)
            .map(|player| player.callbacks.clone());
        if let Some(callbacks) = callbacks {
            (callbacks.on_error)(code);
        }
    }

    fn live_callbacks(&self, index: usize) -> Option<RemotePlayerCallbacks> {
        self.inner
            .borrow()
            .players
            .get(index)
            .filter(|player| !player.destroyed)
            .map(|player| player.callbacks.clone())
    }
}

impl RemotePlayerProvider for MemoryRemotePlayerProvider {
    fn create(
        &self,
        options: RemotePlayerOptions,
        callbacks: RemotePlayerCallbacks,
    ) -> Result<Box<dyn RemotePlayerHandle>, String> {
        let mut state = self.inner.borrow_mut();
        if let Some(reason) = state.reject_create.clone() {
            return Err(reason);
        }
        state.players.push(RemotePlayerEntry {
            options,
            callbacks,
            calls: Vec::new(),
            destroyed: false,
        });
        Ok(Box::new(MemoryRemotePlayer {
            index: state.players.len() - 1,
            inner: self.inner.clone(),
        }))
    }
}

struct MemoryRemotePlayer {
    index: usize,
    inner: Rc<RefCell<MemoryRemoteState>>,
}

impl MemoryRemotePlayer {
    fn record(&self, call: RemoteCall) {
        if let Some(player) = self.inner.borrow_mut().players.get_mut(self.index) {
            player.calls.push(call);
        }
    }
}

impl RemotePlayerHandle for MemoryRemotePlayer {
    fn play(&self) {
        self.record(RemoteCall::Play);
    }

    fn pause(&self) {
        self.record(RemoteCall::Pause);
    }

    fn stop(&self) {
        self.record(RemoteCall::Stop);
    }

    fn set_volume(&self, volume: u8) {
        self.record(RemoteCall::SetVolume(volume));
    }

    fn destroy(&self) {
        if let Some(player) = self.inner.borrow_mut().players.get_mut(self.index) {
            if !player.destroyed {
                player.destroyed = true;
                player.calls.push(RemoteCall::Destroy);
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
/// Observable state of a memory media element.
pub struct LocalMediaSnapshot {
    /// Source URL the element was created with.
    pub source: String,
    /// Paused flag.
    pub paused: bool,
    /// Normalized volume.
    pub volume: f64,
    /// Playback position in seconds.
    pub current_time: f64,
    /// Loop flag.
    pub looping: bool,
    /// Number of `play()` requests.
    pub play_attempts: u32,
}

#[derive(Default)]
struct MemoryLocalState {
    elements: Vec<Rc<RefCell<LocalMediaSnapshot>>>,
    reject_play: Option<String>,
}

#[derive(Clone, Default)]
/// Local provider whose elements resolve `play()` immediately, optionally rejecting it.
pub struct MemoryLocalMediaProvider {
    inner: Rc<RefCell<MemoryLocalState>>,
}

impl MemoryLocalMediaProvider {
    /// Creates an empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every following `play()` reject with `reason`, like a blocked autoplay.
    pub fn reject_play(&self, reason: impl Into<String>) {
        self.inner.borrow_mut().reject_play = Some(reason.into());
    }

    /// Lets following `play()` calls succeed again.
    pub fn allow_play(&self) {
        self.inner.borrow_mut().reject_play = None;
    }

    /// Number of media elements created.
    pub fn created_count(&self) -> usize {
        self.inner.borrow().elements.len()
    }

    /// Snapshot of the element at `index`.
    pub fn element(&self, index: usize) -> Option<LocalMediaSnapshot> {
        self.inner
            .borrow()
            .elements
            .get(index)
            .map(|element| element.borrow().clone())
    }

    /// Moves the playback position of the element at `index` forward, as if audio had played.
    pub fn advance_position(&self, index: usize, seconds: f64) {
        if let Some(element) = self.inner.borrow().elements.get(index) {
            element.borrow_mut().current_time += seconds;
        }
    }
}

impl LocalMediaProvider for MemoryLocalMediaProvider {
    fn create(&self, source_url: &str) -> Result<Box<dyn LocalMediaHandle>, String> {
        let element = Rc::new(RefCell::new(LocalMediaSnapshot {
            source: source_url.to_string(),
            paused: true,
            volume: 1.0,
            current_time: 0.0,
            looping: false,
            play_attempts: 0,
        }));
        self.inner.borrow_mut().elements.push(element.clone());
        Ok(Box::new(MemoryLocalMedia {
            element,
            provider: self.inner.clone(),
        }))
    }
}

struct MemoryLocalMedia {
    element: Rc<RefCell<LocalMediaSnapshot>>,
    provider: Rc<RefCell<MemoryLocalState>>,
}

impl LocalMediaHandle for MemoryLocalMedia {
    fn play(&self) -> LocalPlayFuture {
        let rejection = self.provider.borrow().reject_play.clone();
        let mut element = self.element.borrow_mut();
        element.play_attempts += 1;
        let result = match rejection {
            Some(reason) => Err(reason),
            None => {
                element.paused = false;
                Ok(())
            }
        };
        Box::pin(futures::future::ready(result))
    }

    fn pause(&self) {
        self.element.borrow_mut().paused = true;
    }

    fn is_paused(&self) -> bool {
        self.element.borrow().paused
    }

    fn volume(&self) -> f64 {
        self.element.borrow().volume
    }

    fn set_volume(&self, volume: f64) {
        self.element.borrow_mut().volume = volume.clamp(0.0, 1.0);
    }

    fn current_time(&self) -> f64 {
        self.element.borrow().current_time
    }

    fn set_current_time(&self, seconds: f64) {
        self.element.borrow_mut().current_time = seconds.max(0.0);
    }

    fn set_loop(&self, looping: bool) {
        self.element.borrow_mut().looping = looping;
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use futures::executor::block_on;

    use super::*;

    fn options(track_id: &str) -> RemotePlayerOptions {
        RemotePlayerOptions {
            container_id: "player".to_string(),
            track_id: track_id.to_string(),
            autoplay: false,
        }
    }

    #[test]
    fn remote_destroy_is_recorded_once_and_silences_callbacks() {
        let provider = MemoryRemotePlayerProvider::new();
        let errors = Rc::new(Cell::new(0));
        let seen = errors.clone();
        let callbacks = RemotePlayerCallbacks {
            on_error: Rc::new(move |_: i32| seen.set(seen.get() + 1)),
            ..RemotePlayerCallbacks::ignore()
        };
        let player = provider.create(options("abc"), callbacks).expect("create");

        provider.emit_error(0, 150);
        player.destroy();
        player.destroy();
        provider.emit_error(0, 150);

        assert_eq!(errors.get(), 1);
        assert_eq!(provider.calls(0), vec![RemoteCall::Destroy]);
        assert_eq!(provider.live_count(), 0);

        provider.emit_late_error(0, 150);
        assert_eq!(errors.get(), 2);
        provider.emit_late_error(7, 150);
        assert_eq!(errors.get(), 2);
    }

    #[test]
    fn rejected_create_surfaces_reason() {
        let provider = MemoryRemotePlayerProvider::new();
        provider.reject_create("script missing");
        let result = provider.create(options("abc"), RemotePlayerCallbacks::ignore());
        assert_eq!(result.err().as_deref(), Some("script missing"));
        assert_eq!(provider.created_count(), 0);
    }

    #[test]
    fn local_play_rejection_leaves_element_paused() {
        let provider = MemoryLocalMediaProvider::new();
        provider.reject_play("autoplay blocked");
        let media = provider.create("audio/fallback.mp3").expect("create");

        let result = block_on(media.play());

        assert_eq!(result, Err("autoplay blocked".to_string()));
        assert!(media.is_paused());
        assert_eq!(provider.element(0).map(|e| e.play_attempts), Some(1));
    }
}
