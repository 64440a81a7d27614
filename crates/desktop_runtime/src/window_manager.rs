//! Stateful window manager that owns the window stack, app registry, and hosted app instances.
//!
//! All stack transitions go through [`reduce_desktop`]; this type adds what the pure reducer
//! cannot do: random spawn placement, app factories, lifecycle forwarding, and the synchronous
//! teardown sequence that runs before a window leaves the stack.

use std::collections::BTreeMap;

use desktop_app_contract::{
    AppLifecycleEvent, AppRegistration, ApplicationId, ManagedApp, WindowContent, WindowHandle,
};
use leptos::{logging, View};
use rand::{rngs::SmallRng, Rng, SeedableRng};
use thiserror::Error;

use crate::{
    model::{
        DesktopState, InteractionState, OpenWindowRequest, PointerPosition, WindowId,
        WindowPosition, WindowRecord, SPAWN_JITTER_PX, SPAWN_ORIGIN,
    },
    reducer::{reduce_desktop, DesktopAction, ReducerError, RuntimeEffect},
};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Reasons a launch request produced no window.
pub enum LaunchError {
    /// No registration exists for the requested app id.
    #[error("no app registered as `{0}`")]
    UnknownApp(ApplicationId),
    /// The registration has no content template to render.
    #[error("app `{0}` has no content template")]
    MissingTemplate(ApplicationId),
    /// The app factory refused to build an instance; its window was closed again.
    #[error("app `{app_id}` failed to start: {reason}")]
    Factory {
        /// App whose factory failed.
        app_id: ApplicationId,
        /// Factory error message.
        reason: String,
    },
}

struct WindowSession {
    handle: WindowHandle,
    app: Option<Box<dyn ManagedApp>>,
}

/// Window manager for one desktop.
pub struct WindowManager {
    state: DesktopState,
    interaction: InteractionState,
    registry: BTreeMap<ApplicationId, AppRegistration>,
    sessions: BTreeMap<WindowId, WindowSession>,
    rng: SmallRng,
}

impl Default for WindowManager {
    fn default() -> Self {
        Self::new()
    }
}

impl WindowManager {
    /// Creates an empty manager whose spawn offsets are seeded from the wall clock.
    pub fn new() -> Self {
        Self::with_seed(platform_host::unix_time_ms_now())
    }

    /// Creates an empty manager with a fixed spawn-offset seed.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            state: DesktopState::default(),
            interaction: InteractionState::default(),
            registry: BTreeMap::new(),
            sessions: BTreeMap::new(),
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Binds an app id to its registration. A later registration for the same id replaces it.
    pub fn register(&mut self, registration: AppRegistration) {
        self.registry
            .insert(registration.app_id.clone(), registration);
    }

    pub fn registrations(&self) -> impl Iterator<Item = &AppRegistration> {
        self.registry.values()
    }

    /// Opens a window for a registered app and hands it to the app's factory.
    ///
    /// Every failure is logged and leaves the desktop as it was.
    ///
    /// # Errors
    ///
    /// Returns [`LaunchError`] when the app is unknown, has no template, or its factory fails.
    pub fn launch(&mut self, app_id: &ApplicationId) -> Result<WindowId, LaunchError> {
        let result = self.try_launch(app_id);
        if let Err(err) = &result {
            logging::warn!("launch ignored: {err}");
        }
        result
    }

    fn try_launch(&mut self, app_id: &ApplicationId) -> Result<WindowId, LaunchError> {
        let registration = self
            .registry
            .get(app_id)
            .cloned()
            .ok_or_else(|| LaunchError::UnknownApp(app_id.clone()))?;
        if registration.content.template.trim().is_empty() {
            return Err(LaunchError::MissingTemplate(app_id.clone()));
        }

        let handle = self.open(
            Some(app_id.clone()),
            registration.display_name.clone(),
            registration.content.clone(),
        );
        let window_id = WindowId(handle.id());
        match (registration.factory)(handle) {
            Ok(mut app) => {
                app.on_lifecycle(AppLifecycleEvent::Mounted);
                if let Some(session) = self.sessions.get_mut(&window_id) {
                    session.app = Some(app);
                }
                logging::log!("launched {app_id} in window {}", window_id.0);
                Ok(window_id)
            }
            Err(reason) => {
                if let Err(err) = self.close(window_id) {
                    logging::warn!(
                        "could not close window {} after failed launch: {err}",
                        window_id.0
                    );
                }
                Err(LaunchError::Factory {
                    app_id: app_id.clone(),
                    reason,
                })
            }
        }
    }

    /// Opens a window with no associated app and returns its handle.
    pub fn open_window(&mut self, title: impl Into<String>, content: WindowContent) -> WindowHandle {
        self.open(None, title.into(), content)
    }

    fn open(
        &mut self,
        app_id: Option<ApplicationId>,
        title: String,
        content: WindowContent,
    ) -> WindowHandle {
        let position = self.spawn_position();
        let request = OpenWindowRequest {
            app_id,
            title: title.clone(),
            content,
            position,
        };
        let window_id = WindowId(self.state.next_window_id);
        if let Err(err) = self.apply(DesktopAction::OpenWindow(request)) {
            logging::warn!("open window {} failed: {err}", window_id.0);
        }

        let handle = WindowHandle::new(window_id.0, title);
        self.sessions.insert(
            window_id,
            WindowSession {
                handle: handle.clone(),
                app: None,
            },
        );
        handle
    }

    fn spawn_position(&mut self) -> WindowPosition {
        SPAWN_ORIGIN.offset(
            self.rng.gen_range(0..SPAWN_JITTER_PX),
            self.rng.gen_range(0..SPAWN_JITTER_PX),
        )
    }

    /// Raises the window above every other open window.
    ///
    /// # Errors
    ///
    /// Returns [`ReducerError::WindowNotFound`] for unknown or closed windows.
    pub fn focus(&mut self, window_id: WindowId) -> Result<(), ReducerError> {
        self.apply(DesktopAction::FocusWindow { window_id })?;
        if let Some(app) = self.app_mut(window_id) {
            app.on_lifecycle(AppLifecycleEvent::Focused);
        }
        Ok(())
    }

    /// Runs the window's teardown listeners, then removes it from the desktop.
    ///
    /// # Errors
    ///
    /// Returns [`ReducerError::WindowNotFound`] for unknown windows, including ones already closed.
    pub fn close(&mut self, window_id: WindowId) -> Result<(), ReducerError> {
        if self.state.window(window_id).is_none() {
            return Err(ReducerError::WindowNotFound);
        }
        let session = self.sessions.remove(&window_id);
        let mut app = None;
        if let Some(WindowSession {
            handle,
            app: mut hosted,
        }) = session
        {
            if let Some(hosted) = hosted.as_mut() {
                hosted.on_lifecycle(AppLifecycleEvent::Closing);
            }
            let listeners = handle.teardown();
            logging::log!(
                "closing window {}; ran {listeners} teardown listener(s)",
                window_id.0
            );
            app = hosted;
        }
        self.apply(DesktopAction::CloseWindow { window_id })?;
        if let Some(mut app) = app {
            app.on_lifecycle(AppLifecycleEvent::Closed);
        }
        Ok(())
    }

    /// Captures the pointer origin and window position for a title-bar drag.
    ///
    /// # Errors
    ///
    /// Returns [`ReducerError::WindowNotFound`] for unknown windows.
    pub fn begin_drag(
        &mut self,
        window_id: WindowId,
        pointer: PointerPosition,
    ) -> Result<(), ReducerError> {
        self.apply(DesktopAction::BeginMove { window_id, pointer })
            .map(|_| ())
    }

    /// Moves the captured window by the pointer delta. No-op without an active drag.
    ///
    /// # Errors
    ///
    /// Returns [`ReducerError::WindowNotFound`] if the dragged window disappeared.
    pub fn drag_to(&mut self, pointer: PointerPosition) -> Result<(), ReducerError> {
        self.apply(DesktopAction::UpdateMove { pointer }).map(|_| ())
    }

    pub fn end_drag(&mut self) {
        let _ = self.apply(DesktopAction::EndMove);
    }

    pub fn is_dragging(&self) -> bool {
        self.interaction.dragging.is_some()
    }

    pub fn state(&self) -> &DesktopState {
        &self.state
    }

    /// Open windows from bottom to top.
    pub fn windows_in_render_order(&self) -> Vec<&WindowRecord> {
        let mut windows: Vec<_> = self.state.windows.iter().collect();
        windows.sort_by_key(|w| w.z_index);
        windows
    }

    pub fn window(&self, window_id: WindowId) -> Option<&WindowRecord> {
        self.state.window(window_id)
    }

    pub fn handle(&self, window_id: WindowId) -> Option<WindowHandle> {
        self.sessions
            .get(&window_id)
            .map(|session| session.handle.clone())
    }

    pub fn topmost(&self) -> Option<WindowId> {
        self.state.topmost_window_id()
    }

    pub fn is_open(&self, window_id: WindowId) -> bool {
        self.state.window(window_id).is_some()
    }

    pub fn open_count(&self) -> usize {
        self.state.windows.len()
    }

    /// Renders the hosted app's body, if the window has one.
    pub fn render_app(&self, window_id: WindowId) -> Option<View> {
        self.sessions
            .get(&window_id)
            .and_then(|session| session.app.as_ref())
            .map(|app| app.view())
    }

    fn app_mut(&mut self, window_id: WindowId) -> Option<&mut Box<dyn ManagedApp>> {
        self.sessions
            .get_mut(&window_id)
            .and_then(|session| session.app.as_mut())
    }

    fn apply(&mut self, action: DesktopAction) -> Result<Vec<RuntimeEffect>, ReducerError> {
        let effects = reduce_desktop(&mut self.state, &mut self.interaction, action)?;
        self.sync_titles();
        Ok(effects)
    }

    // Apps retitle their windows through the handle; the record mirrors it for rendering.
    fn sync_titles(&mut self) {
        for record in &mut self.state.windows {
            if let Some(session) = self.sessions.get(&record.id) {
                let title = session.handle.title();
                if record.title != title {
                    record.title = title;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use desktop_app_contract::WindowLifecycleState;
    use leptos::IntoView;
    use pretty_assertions::assert_eq;

    use super::*;

    type EventLog = Rc<RefCell<Vec<String>>>;

    struct RecordingApp {
        log: EventLog,
    }

    impl ManagedApp for RecordingApp {
        fn on_lifecycle(&mut self, event: AppLifecycleEvent) {
            self.log.borrow_mut().push(event.token().to_string());
        }

        fn view(&self) -> View {
            "recording".into_view()
        }
    }

    fn recording_registration(app_id: &str, log: EventLog) -> AppRegistration {
        AppRegistration {
            app_id: ApplicationId::trusted(app_id),
            display_name: "Recorder".to_string(),
            content: WindowContent::new("recorder"),
            show_on_desktop: true,
            factory: Rc::new(move |window: WindowHandle| -> Result<Box<dyn ManagedApp>, String> {
                let log = log.clone();
                let listener_log = log.clone();
                window.on_teardown(move |event| {
                    assert_eq!(event.window.state(), WindowLifecycleState::Closed);
                    listener_log.borrow_mut().push("teardown".to_string());
                });
                Ok(Box::new(RecordingApp { log }) as Box<dyn ManagedApp>)
            }),
        }
    }

    fn content() -> WindowContent {
        WindowContent::new("placeholder")
    }

    #[test]
    fn focus_scenario_matches_expected_z_values() {
        let mut manager = WindowManager::with_seed(1);
        let a = WindowId(manager.open_window("A", content()).id());
        let b = WindowId(manager.open_window("B", content()).id());
        assert_eq!(manager.window(a).map(|w| w.z_index), Some(101));
        assert_eq!(manager.window(b).map(|w| w.z_index), Some(102));

        manager.focus(a).expect("focus");

        assert_eq!(manager.window(a).map(|w| w.z_index), Some(103));
        assert_eq!(manager.window(b).map(|w| w.z_index), Some(102));
        let order: Vec<_> = manager
            .windows_in_render_order()
            .iter()
            .map(|w| w.title.clone())
            .collect();
        assert_eq!(order, vec!["B".to_string(), "A".to_string()]);
        assert_eq!(manager.topmost(), Some(a));
    }

    #[test]
    fn spawn_positions_stay_inside_jitter_box() {
        let mut manager = WindowManager::with_seed(99);
        for n in 0..50 {
            let id = WindowId(manager.open_window(format!("w{n}"), content()).id());
            let position = manager.window(id).expect("window").position;
            assert!((50..150).contains(&position.x), "x = {}", position.x);
            assert!((50..150).contains(&position.y), "y = {}", position.y);
        }
        assert_eq!(manager.open_count(), 50);
    }

    #[test]
    fn launch_forwards_lifecycle_and_runs_teardown_before_removal() {
        let log: EventLog = Rc::default();
        let mut manager = WindowManager::with_seed(3);
        manager.register(recording_registration("test.recorder", log.clone()));

        let window_id = manager
            .launch(&ApplicationId::trusted("test.recorder"))
            .expect("launch");
        assert_eq!(
            manager.window(window_id).map(|w| w.title.clone()),
            Some("Recorder".to_string())
        );
        manager.focus(window_id).expect("focus");
        manager.close(window_id).expect("close");

        assert_eq!(
            *log.borrow(),
            vec!["mounted", "focused", "closing", "teardown", "closed"]
        );
        assert!(!manager.is_open(window_id));
        assert_eq!(manager.close(window_id), Err(ReducerError::WindowNotFound));
        assert_eq!(log.borrow().len(), 5);
    }

    #[test]
    fn relaunch_opens_independent_window() {
        let log: EventLog = Rc::default();
        let mut manager = WindowManager::with_seed(3);
        manager.register(recording_registration("test.recorder", log));
        let app_id = ApplicationId::trusted("test.recorder");

        let first = manager.launch(&app_id).expect("first");
        let second = manager.launch(&app_id).expect("second");

        assert_ne!(first, second);
        assert_eq!(manager.open_count(), 2);
    }

    #[test]
    fn unregistered_launch_is_a_no_op() {
        let mut manager = WindowManager::with_seed(5);
        let app_id = ApplicationId::trusted("desktop.missing");

        assert_eq!(
            manager.launch(&app_id),
            Err(LaunchError::UnknownApp(app_id.clone()))
        );
        assert_eq!(manager.open_count(), 0);
        assert_eq!(manager.state().z_counter, 100);
    }

    #[test]
    fn empty_template_is_a_no_op() {
        let mut manager = WindowManager::with_seed(5);
        let mut registration = recording_registration("test.recorder", Rc::default());
        registration.content = WindowContent::new("  ");
        let app_id = registration.app_id.clone();
        manager.register(registration);

        assert_eq!(
            manager.launch(&app_id),
            Err(LaunchError::MissingTemplate(app_id))
        );
        assert_eq!(manager.open_count(), 0);
    }

    #[test]
    fn failed_factory_closes_its_window() {
        let torn_down = Rc::new(RefCell::new(false));
        let flag = torn_down.clone();
        let mut manager = WindowManager::with_seed(5);
        manager.register(AppRegistration {
            app_id: ApplicationId::trusted("test.broken"),
            display_name: "Broken".to_string(),
            content: WindowContent::new("broken"),
            show_on_desktop: false,
            factory: Rc::new(move |window: WindowHandle| -> Result<Box<dyn ManagedApp>, String> {
                let flag = flag.clone();
                window.on_teardown(move |_| *flag.borrow_mut() = true);
                Err("no renderer".to_string())
            }),
        });

        let result = manager.launch(&ApplicationId::trusted("test.broken"));

        assert!(matches!(result, Err(LaunchError::Factory { .. })));
        assert_eq!(manager.open_count(), 0);
        assert!(*torn_down.borrow());
    }

    #[test]
    fn dragging_moves_window_without_changing_z() {
        let mut manager = WindowManager::with_seed(8);
        let a = WindowId(manager.open_window("A", content()).id());
        let b = WindowId(manager.open_window("B", content()).id());
        let start = manager.window(a).expect("window").position;

        manager
            .begin_drag(a, PointerPosition { x: 10, y: 10 })
            .expect("begin drag");
        manager
            .drag_to(PointerPosition { x: -990, y: 2010 })
            .expect("drag");
        manager.end_drag();

        let record = manager.window(a).expect("window");
        assert_eq!(record.position, start.offset(-1000, 2000));
        assert_eq!(record.z_index, 101);
        assert_eq!(manager.topmost(), Some(b));
        assert!(!manager.is_dragging());
    }

    #[test]
    fn handle_title_changes_reach_the_record() {
        let mut manager = WindowManager::with_seed(8);
        let handle = manager.open_window("Player", content());
        let window_id = WindowId(handle.id());

        handle.set_title("Player - Offline Mix");
        manager.focus(window_id).expect("focus");

        assert_eq!(
            manager.window(window_id).map(|w| w.title.clone()),
            Some("Player - Offline Mix".to_string())
        );
    }
}
