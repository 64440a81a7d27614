//! Desktop shell UI composition and interaction surfaces.

mod window;

use leptos::*;

use self::window::DesktopWindow;

use crate::model::PointerPosition;

pub use crate::runtime_context::{
    use_desktop_runtime, DesktopProvider, DesktopRuntimeContext, LauncherEntry,
};

#[component]
/// Renders desktop icons, the optional profile card, and every open window.
pub fn DesktopShell() -> impl IntoView {
    let runtime = use_desktop_runtime();
    let state = runtime.state;

    let on_pointer_move = move |ev: web_sys::PointerEvent| {
        runtime.drag_to(pointer_from_pointer_event(&ev));
    };
    let on_pointer_end = move |_| runtime.end_drag();

    view! {
        <div
            id="desktop-shell-root"
            class="desktop-shell"
            on:pointermove=on_pointer_move
            on:pointerup=on_pointer_end
            on:pointercancel=on_pointer_end
        >
            <div class="desktop-icon-grid" role="list">
                <For
                    each=move || runtime.launchers.get_value()
                    key=|entry| entry.app_id.to_string()
                    let:entry
                >
                    {{
                        let app_id = entry.app_id.clone();
                        view! {
                            <button
                                type="button"
                                class="desktop-icon"
                                role="listitem"
                                data-app-id=entry.app_id.to_string()
                                on:dblclick=move |_| runtime.launch(&app_id)
                            >
                                <span class="desktop-icon-label">{entry.label}</span>
                            </button>
                        }
                    }}
                </For>
            </div>

            <DesktopProfile />

            <div class="desktop-window-layer">
                // DOM order follows window ids so embedded players are never re-parented;
                // stacking comes from each window's z-index.
                <For
                    each=move || {
                        let mut ids: Vec<_> = state.get().windows.iter().map(|w| w.id).collect();
                        ids.sort();
                        ids
                    }
                    key=|id| id.0
                    let:window_id
                >
                    <DesktopWindow window_id=window_id />
                </For>
            </div>
        </div>
    }
}

#[component]
fn DesktopProfile() -> impl IntoView {
    let runtime = use_desktop_runtime();
    let config = runtime.config;

    view! {
        <aside class="desktop-profile">
            {move || {
                config
                    .with(|c| c.profile.clone())
                    .map(|profile| {
                        view! {
                            <div class="desktop-profile-card">
                                <strong>{profile.name}</strong>
                                <span>{profile.role}</span>
                                <a href=format!("mailto:{}", profile.email)>{profile.email.clone()}</a>
                                <a href=profile.link.clone() target="_blank" rel="noopener">
                                    {profile.link.clone()}
                                </a>
                            </div>
                        }
                    })
            }}
            {move || {
                config.with(|c| {
                    c.usable_links()
                        .map(|(category, entries)| {
                            let items = entries
                                .into_iter()
                                .map(|entry| {
                                    view! {
                                        <li>
                                            <a href=entry.url.clone() target="_blank" rel="noopener">
                                                {entry.label.clone()}
                                            </a>
                                        </li>
                                    }
                                })
                                .collect_view();
                            view! {
                                <section class="desktop-link-group">
                                    <h2>{category.to_string()}</h2>
                                    <ul>{items}</ul>
                                </section>
                            }
                        })
                        .collect_view()
                })
            }}
        </aside>
    }
}

fn pointer_from_pointer_event(ev: &web_sys::PointerEvent) -> PointerPosition {
    PointerPosition {
        x: ev.client_x(),
        y: ev.client_y(),
    }
}
