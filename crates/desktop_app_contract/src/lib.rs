//! Shared contract types between the desktop window manager runtime and hosted apps.
//!
//! The window manager hands every launched app a [`WindowHandle`]. Apps keep the handle to
//! update their title and register teardown listeners; the manager runs those listeners
//! synchronously, exactly once, before the window leaves the render tree.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

use leptos::View;
use serde::{Deserialize, Serialize};

/// Stable identifier for a runtime-managed window.
pub type WindowRuntimeId = u64;

/// Stable identifier for an app package/module.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ApplicationId(String);

impl ApplicationId {
    /// Returns an app identifier when `raw` conforms to the `segment.segment...` policy.
    pub fn new(raw: impl Into<String>) -> Result<Self, String> {
        let raw = raw.into();
        if is_valid_application_id(&raw) {
            Ok(Self(raw))
        } else {
            Err(format!(
                "invalid application id `{raw}`; expected namespaced dotted segments"
            ))
        }
    }

    /// Returns the string form of the identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Creates an id without validation for compile-time/runtime trusted constants.
    pub fn trusted(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }
}

impl std::fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn is_valid_application_id(raw: &str) -> bool {
    if raw.is_empty() || raw.len() > 120 {
        return false;
    }

    let mut count = 0usize;
    for part in raw.split('.') {
        count += 1;
        if part.is_empty() || part.len() > 32 || part.ends_with('-') {
            return false;
        }
        let bytes = part.as_bytes();
        if !bytes[0].is_ascii_lowercase() {
            return false;
        }
        if !bytes
            .iter()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || *b == b'-')
        {
            return false;
        }
    }

    count >= 2
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
/// Lifecycle events the window manager forwards to hosted apps.
pub enum AppLifecycleEvent {
    /// App instance has been bound to its window.
    Mounted,
    /// Window was raised to the top of the stack.
    Focused,
    /// Close sequence started; teardown listeners run next.
    Closing,
    /// Window has been removed from the desktop.
    Closed,
}

impl AppLifecycleEvent {
    /// Returns a stable string token for debugging hooks.
    pub const fn token(self) -> &'static str {
        match self {
            Self::Mounted => "mounted",
            Self::Focused => "focused",
            Self::Closing => "closing",
            Self::Closed => "closed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
/// Whether a window is still on the desktop.
pub enum WindowLifecycleState {
    /// Window is open.
    Open,
    /// Window has been closed; its teardown listeners already ran.
    Closed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Opaque renderable payload a window displays, identified by its content template.
pub struct WindowContent {
    /// Template key the shell renders for this window (for example `media-player`).
    pub template: String,
}

impl WindowContent {
    /// Creates content bound to `template`.
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }
}

/// Notification delivered to teardown listeners while their window closes.
pub struct TeardownEvent {
    /// The closing window. It already reports [`WindowLifecycleState::Closed`].
    pub window: WindowHandle,
}

type TeardownListener = Box<dyn FnOnce(&TeardownEvent)>;

struct WindowShared {
    title: RefCell<String>,
    state: Cell<WindowLifecycleState>,
    teardown_listeners: RefCell<Vec<TeardownListener>>,
    title_observer: RefCell<Option<Rc<dyn Fn(&str)>>>,
}

#[derive(Clone)]
/// App-facing handle to one managed window.
///
/// Clones refer to the same window.
pub struct WindowHandle {
    id: WindowRuntimeId,
    shared: Rc<WindowShared>,
}

impl WindowHandle {
    /// Creates an open window handle. Called by the window manager.
    pub fn new(id: WindowRuntimeId, title: impl Into<String>) -> Self {
        Self {
            id,
            shared: Rc::new(WindowShared {
                title: RefCell::new(title.into()),
                state: Cell::new(WindowLifecycleState::Open),
                teardown_listeners: RefCell::new(Vec::new()),
                title_observer: RefCell::new(None),
            }),
        }
    }

    /// Runtime window id.
    pub fn id(&self) -> WindowRuntimeId {
        self.id
    }

    /// Current title text.
    pub fn title(&self) -> String {
        self.shared.title.borrow().clone()
    }

    /// Replaces the title text and notifies the shell's title observer.
    pub fn set_title(&self, title: impl Into<String>) {
        let title = title.into();
        *self.shared.title.borrow_mut() = title.clone();
        let observer = self.shared.title_observer.borrow().clone();
        if let Some(observer) = observer {
            observer(&title);
        }
    }

    /// Installs the single title observer used by the rendering layer.
    pub fn observe_title(&self, observer: Rc<dyn Fn(&str)>) {
        *self.shared.title_observer.borrow_mut() = Some(observer);
    }

    /// Current lifecycle state.
    pub fn state(&self) -> WindowLifecycleState {
        self.shared.state.get()
    }

    /// Whether the window is still open.
    pub fn is_open(&self) -> bool {
        self.state() == WindowLifecycleState::Open
    }

    /// Registers a listener that runs once when the window closes.
    ///
    /// Listeners registered after the window closed are dropped without running.
    pub fn on_teardown(&self, listener: impl FnOnce(&TeardownEvent) + 'static) {
        if self.is_open() {
            self.shared
                .teardown_listeners
                .borrow_mut()
                .push(Box::new(listener));
        }
    }

    /// Number of listeners waiting for teardown.
    pub fn teardown_listener_count(&self) -> usize {
        self.shared.teardown_listeners.borrow().len()
    }

    /// Marks the window closed and runs every registered teardown listener in registration order.
    ///
    /// Returns how many listeners ran; a second call runs none.
    pub fn teardown(&self) -> usize {
        if self.shared.state.replace(WindowLifecycleState::Closed) == WindowLifecycleState::Closed {
            return 0;
        }
        let listeners = std::mem::take(&mut *self.shared.teardown_listeners.borrow_mut());
        let event = TeardownEvent {
            window: self.clone(),
        };
        let count = listeners.len();
        for listener in listeners {
            listener(&event);
        }
        self.shared.title_observer.borrow_mut().take();
        count
    }
}

impl std::fmt::Debug for WindowHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WindowHandle")
            .field("id", &self.id)
            .field("title", &*self.shared.title.borrow())
            .field("state", &self.shared.state.get())
            .finish()
    }
}

/// Application instance hosted inside a managed window.
pub trait ManagedApp {
    /// Receives window lifecycle events.
    fn on_lifecycle(&mut self, _event: AppLifecycleEvent) {}

    /// Renders the app body inside the window chrome.
    fn view(&self) -> View;
}

/// Factory invoked with the freshly opened window; returns the hosted app instance.
pub type AppFactory = Rc<dyn Fn(WindowHandle) -> Result<Box<dyn ManagedApp>, String>>;

#[derive(Clone)]
/// Launcher registration binding an app id to its content template, title, and factory.
pub struct AppRegistration {
    /// Canonical app id.
    pub app_id: ApplicationId,
    /// Window title and launcher label.
    pub display_name: String,
    /// Initial window content.
    pub content: WindowContent,
    /// Whether the desktop renders an icon for this app.
    pub show_on_desktop: bool,
    /// App constructor.
    pub factory: AppFactory,
}

impl std::fmt::Debug for AppRegistration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppRegistration")
            .field("app_id", &self.app_id)
            .field("display_name", &self.display_name)
            .field("content", &self.content)
            .field("show_on_desktop", &self.show_on_desktop)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn application_id_requires_dotted_namespaces() {
        assert!(ApplicationId::new("desktop.calculator").is_ok());
        assert!(ApplicationId::new("desktop.media-player").is_ok());
        assert!(ApplicationId::new("calculator").is_err());
        assert!(ApplicationId::new("Desktop.calc").is_err());
        assert!(ApplicationId::new("desktop..calc").is_err());
        assert!(ApplicationId::new("desktop.calc-").is_err());
    }

    #[test]
    fn teardown_runs_each_listener_once_in_order() {
        let window = WindowHandle::new(7, "Player");
        let log = Rc::new(RefCell::new(Vec::new()));
        for label in ["first", "second"] {
            let log = log.clone();
            window.on_teardown(move |event| {
                assert!(!event.window.is_open());
                log.borrow_mut().push((label, event.window.id()));
            });
        }

        assert_eq!(window.teardown(), 2);
        assert_eq!(window.teardown(), 0);
        assert_eq!(*log.borrow(), vec![("first", 7), ("second", 7)]);
        assert_eq!(window.state(), WindowLifecycleState::Closed);
    }

    #[test]
    fn listeners_registered_after_close_are_dropped() {
        let window = WindowHandle::new(1, "Paint");
        window.teardown();
        window.on_teardown(|_| panic!("must not run"));
        assert_eq!(window.teardown_listener_count(), 0);
    }

    #[test]
    fn set_title_notifies_observer_and_clones_share_state() {
        let window = WindowHandle::new(3, "Player");
        let seen = Rc::new(RefCell::new(String::new()));
        let sink = seen.clone();
        window.observe_title(Rc::new(move |title: &str| *sink.borrow_mut() = title.to_string()));

        let clone = window.clone();
        clone.set_title("Player - offline");

        assert_eq!(window.title(), "Player - offline");
        assert_eq!(*seen.borrow(), "Player - offline");
    }
}
