//! Local media element contract.

use futures::future::LocalBoxFuture;

/// Pending result of a local play request. Hosts may reject it (for example, autoplay policy).
pub type LocalPlayFuture = LocalBoxFuture<'static, Result<(), String>>;

/// Handle to a local media element bound to one source.
///
/// Volume uses a normalized `0.0..=1.0` scale; positions are in seconds.
pub trait LocalMediaHandle {
    /// Requests playback start.
    fn play(&self) -> LocalPlayFuture;
    /// Pauses playback.
    fn pause(&self);
    /// Returns whether the element is paused.
    fn is_paused(&self) -> bool;
    /// Current normalized volume.
    fn volume(&self) -> f64;
    /// Sets normalized volume.
    fn set_volume(&self, volume: f64);
    /// Current playback position in seconds.
    fn current_time(&self) -> f64;
    /// Seeks to `seconds`.
    fn set_current_time(&self, seconds: f64);
    /// Enables or disables looping.
    fn set_loop(&self, looping: bool);
}

/// Factory for local media elements.
pub trait LocalMediaProvider {
    /// Creates a media element for `source_url`.
    ///
    /// # Errors
    ///
    /// Returns an error when the host cannot create a media element.
    fn create(&self, source_url: &str) -> Result<Box<dyn LocalMediaHandle>, String>;
}
