//! Runtime provider and context wiring for the desktop shell.
//!
//! This module owns the long-lived [`WindowManager`], mirrors its stack into a reactive
//! [`DesktopState`] signal, loads the desktop configuration, and registers the built-in apps.
//! UI composition stays in [`crate::components`].

use std::{cell::RefCell, rc::Rc};

use desktop_app_contract::ApplicationId;
use leptos::*;
use platform_host::HostServices;

use crate::{
    apps,
    config::{load_desktop_config, DesktopConfig},
    model::{DesktopState, PointerPosition, WindowId},
    window_manager::WindowManager,
};

#[derive(Debug, Clone, PartialEq, Eq)]
/// Desktop icon for a registered app.
pub struct LauncherEntry {
    pub app_id: ApplicationId,
    pub label: String,
}

#[derive(Clone, Copy)]
/// Leptos context for reading desktop state and driving the window manager.
pub struct DesktopRuntimeContext {
    /// Shared window manager. Borrowed only for the duration of one operation.
    pub manager: StoredValue<Rc<RefCell<WindowManager>>>,
    /// Reactive copy of the manager's window stack, republished after every operation.
    pub state: RwSignal<DesktopState>,
    /// Loaded desktop configuration; empty until the config source answers.
    pub config: RwSignal<DesktopConfig>,
    /// Apps shown as desktop icons.
    pub launchers: StoredValue<Vec<LauncherEntry>>,
}

impl DesktopRuntimeContext {
    /// Launches `app_id` and wires the new window's title into the reactive state.
    pub fn launch(&self, app_id: &ApplicationId) {
        let handle = self
            .with_manager(|manager| {
                let window_id = manager.launch(app_id).ok()?;
                manager.handle(window_id)
            })
            .flatten();
        if let Some(handle) = handle {
            let state = self.state;
            let window_id = WindowId(handle.id());
            handle.observe_title(Rc::new(move |title: &str| {
                let title = title.to_string();
                state.update(|desktop| {
                    if let Some(record) = desktop.windows.iter_mut().find(|w| w.id == window_id) {
                        record.title = title;
                    }
                });
            }));
        }
    }

    pub fn focus(&self, window_id: WindowId) {
        self.with_manager(|manager| {
            if let Err(err) = manager.focus(window_id) {
                logging::warn!("focus window {} failed: {err}", window_id.0);
            }
        });
    }

    pub fn close(&self, window_id: WindowId) {
        self.with_manager(|manager| {
            if let Err(err) = manager.close(window_id) {
                logging::warn!("close window {} failed: {err}", window_id.0);
            }
        });
    }

    pub fn begin_drag(&self, window_id: WindowId, pointer: PointerPosition) {
        self.with_manager(|manager| {
            if let Err(err) = manager.begin_drag(window_id, pointer) {
                logging::warn!("drag window {} failed: {err}", window_id.0);
            }
        });
    }

    pub fn drag_to(&self, pointer: PointerPosition) {
        self.with_manager(|manager| {
            if manager.is_dragging() {
                if let Err(err) = manager.drag_to(pointer) {
                    logging::warn!("drag update failed: {err}");
                    manager.end_drag();
                }
            }
        });
    }

    pub fn end_drag(&self) {
        self.with_manager(|manager| {
            if manager.is_dragging() {
                manager.end_drag();
            }
        });
    }

    /// Renders the body of the app hosted in `window_id`.
    pub fn render_app(&self, window_id: WindowId) -> Option<View> {
        let manager = self.manager.get_value();
        let manager = manager.try_borrow().ok()?;
        manager.render_app(window_id)
    }

    // Publishes the snapshot only after the borrow ends so re-renders can read the manager.
    fn with_manager<R>(&self, op: impl FnOnce(&mut WindowManager) -> R) -> Option<R> {
        let manager = self.manager.get_value();
        let (result, snapshot) = {
            let Ok(mut manager) = manager.try_borrow_mut() else {
                logging::warn!("window manager is busy; dropping re-entrant operation");
                return None;
            };
            let result = op(&mut manager);
            (result, manager.state().clone())
        };
        let changed = self.state.with_untracked(|current| *current != snapshot);
        if changed {
            self.state.set(snapshot);
        }
        Some(result)
    }
}

#[component]
/// Provides [`DesktopRuntimeContext`] to descendant components.
pub fn DesktopProvider(
    /// Injected browser or headless host bundle assembled by the entry layer.
    host_services: HostServices,
    children: Children,
) -> impl IntoView {
    let mut manager = WindowManager::new();
    let registrations = apps::builtin_registrations(&host_services);
    let launchers = registrations
        .iter()
        .filter(|registration| registration.show_on_desktop)
        .map(|registration| LauncherEntry {
            app_id: registration.app_id.clone(),
            label: registration.display_name.clone(),
        })
        .collect::<Vec<_>>();
    for registration in registrations {
        manager.register(registration);
    }
    logging::log!(
        "desktop runtime ready ({} host, {} launchers)",
        host_services.host_strategy.as_str(),
        launchers.len()
    );

    let state = create_rw_signal(manager.state().clone());
    let config = create_rw_signal(DesktopConfig::default());
    let runtime = DesktopRuntimeContext {
        manager: store_value(Rc::new(RefCell::new(manager))),
        state,
        config,
        launchers: store_value(launchers),
    };

    let source = host_services.config.clone();
    (host_services.spawner)(Box::pin(async move {
        let loaded = load_desktop_config(source.as_ref()).await;
        let _ = config.try_set(loaded);
    }));

    provide_context(runtime);

    children().into_view()
}

/// Returns the current [`DesktopRuntimeContext`].
///
/// # Panics
///
/// Panics if called outside [`DesktopProvider`].
pub fn use_desktop_runtime() -> DesktopRuntimeContext {
    use_context::<DesktopRuntimeContext>().expect("DesktopRuntimeContext not provided")
}
