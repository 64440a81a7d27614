//! Built-in app registry generated from `app.manifest.toml` files at build time.

mod placeholders;

use std::rc::Rc;

use desktop_app_contract::{
    AppFactory, AppRegistration, ApplicationId, ManagedApp, WindowContent, WindowHandle,
};
use desktop_app_media_player::launch_media_player;
use leptos::logging;
use platform_host::HostServices;
use serde::Deserialize;

use self::placeholders::PlaceholderApp;

include!(concat!(env!("OUT_DIR"), "/app_catalog_generated.rs"));

pub const CALCULATOR_APP_ID: &str = "desktop.calculator";
pub const CALENDAR_APP_ID: &str = "desktop.calendar";
pub const PAINT_APP_ID: &str = "desktop.paint";
pub const MEDIA_PLAYER_APP_ID: &str = "desktop.media-player";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
/// Launcher metadata for one built-in app.
pub struct AppManifest {
    pub app_id: String,
    pub display_name: String,
    pub content_template: String,
    pub show_on_desktop: bool,
}

/// Manifests compiled into the binary, sorted by app id.
pub fn builtin_manifests() -> Vec<AppManifest> {
    match serde_json::from_str(APP_MANIFEST_CATALOG_JSON) {
        Ok(manifests) => manifests,
        Err(err) => {
            logging::warn!("app manifest catalog is unreadable: {err}");
            Vec::new()
        }
    }
}

/// Registrations for every built-in app, bound to `services`.
///
/// Manifests with an invalid app id are skipped with a warning.
pub fn builtin_registrations(services: &HostServices) -> Vec<AppRegistration> {
    builtin_manifests()
        .into_iter()
        .filter_map(|manifest| match ApplicationId::new(manifest.app_id.clone()) {
            Ok(app_id) => Some(AppRegistration {
                factory: app_factory(&app_id, &manifest, services),
                app_id,
                display_name: manifest.display_name,
                content: WindowContent::new(manifest.content_template),
                show_on_desktop: manifest.show_on_desktop,
            }),
            Err(err) => {
                logging::warn!("skipping app manifest: {err}");
                None
            }
        })
        .collect()
}

fn app_factory(
    app_id: &ApplicationId,
    manifest: &AppManifest,
    services: &HostServices,
) -> AppFactory {
    if app_id.as_str() == MEDIA_PLAYER_APP_ID {
        let services = services.clone();
        return Rc::new(
            move |window: WindowHandle| -> Result<Box<dyn ManagedApp>, String> {
                Ok(Box::new(launch_media_player(&window, services.clone())))
            },
        );
    }

    let label = manifest.display_name.clone();
    let template = manifest.content_template.clone();
    Rc::new(
        move |_window: WindowHandle| -> Result<Box<dyn ManagedApp>, String> {
            Ok(Box::new(PlaceholderApp::new(label.clone(), template.clone())))
        },
    )
}

#[cfg(test)]
mod tests {
    use platform_host::{
        ManualTimerService, MemoryLocalMediaProvider, MemoryRemotePlayerProvider,
        ProviderReadiness,
    };
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::window_manager::WindowManager;

    struct Headless {
        timers: ManualTimerService,
        remote: MemoryRemotePlayerProvider,
        local: MemoryLocalMediaProvider,
    }

    fn headless() -> (HostServices, Headless) {
        let timers = ManualTimerService::new();
        let remote = MemoryRemotePlayerProvider::new();
        let local = MemoryLocalMediaProvider::new();
        let services = HostServices::headless(
            timers.clone(),
            remote.clone(),
            local.clone(),
            ProviderReadiness::ready(),
        );
        (
            services,
            Headless {
                timers,
                remote,
                local,
            },
        )
    }

    #[test]
    fn catalog_lists_every_builtin_app() {
        let ids: Vec<_> = builtin_manifests()
            .into_iter()
            .map(|manifest| manifest.app_id)
            .collect();
        assert_eq!(
            ids,
            vec![
                CALCULATOR_APP_ID.to_string(),
                CALENDAR_APP_ID.to_string(),
                MEDIA_PLAYER_APP_ID.to_string(),
                PAINT_APP_ID.to_string(),
            ]
        );
    }

    #[test]
    fn registrations_carry_templates_and_titles() {
        let (services, _) = headless();
        let registrations = builtin_registrations(&services);
        let player = registrations
            .iter()
            .find(|r| r.app_id.as_str() == MEDIA_PLAYER_APP_ID)
            .expect("media player registration");

        assert_eq!(player.display_name, "Media Player");
        assert_eq!(player.content.template, "media-player");
        assert!(registrations
            .iter()
            .all(|r| !r.content.template.is_empty()));
    }

    #[test]
    fn player_fallback_and_teardown_through_the_window_manager() {
        let (services, Headless { timers, remote, local }) = headless();
        let mut manager = WindowManager::with_seed(11);
        for registration in builtin_registrations(&services) {
            manager.register(registration);
        }

        let window_id = manager
            .launch(&ApplicationId::trusted(MEDIA_PLAYER_APP_ID))
            .expect("launch player");
        assert_eq!(remote.created_count(), 0);
        timers.advance(0);
        assert_eq!(remote.track_ids(), vec!["jfKfPfyJRdk".to_string()]);

        remote.emit_error(0, 150);
        assert!(remote.is_destroyed(0));
        assert_eq!(local.created_count(), 1);
        assert_eq!(
            local.element(0).map(|e| e.source),
            Some("assets/audio/offline-mix.mp3".to_string())
        );

        remote.emit_late_error(0, 150);
        assert_eq!(remote.created_count(), 1);
        assert_eq!(local.created_count(), 1);

        manager.close(window_id).expect("close");
        assert_eq!(local.element(0).map(|e| e.paused), Some(true));
    }

    #[test]
    fn placeholder_apps_launch_into_their_own_windows() {
        let (services, _) = headless();
        let mut manager = WindowManager::with_seed(2);
        for registration in builtin_registrations(&services) {
            manager.register(registration);
        }

        let calculator = manager
            .launch(&ApplicationId::trusted(CALCULATOR_APP_ID))
            .expect("calculator");
        let paint = manager
            .launch(&ApplicationId::trusted(PAINT_APP_ID))
            .expect("paint");

        assert_eq!(
            manager.window(calculator).map(|w| w.content.template.clone()),
            Some("calculator".to_string())
        );
        assert_eq!(manager.topmost(), Some(paint));
    }
}
