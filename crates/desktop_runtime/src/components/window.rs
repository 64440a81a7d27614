use super::*;
use crate::model::WindowId;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsCast;

#[cfg(target_arch = "wasm32")]
fn try_set_pointer_capture(ev: &web_sys::PointerEvent) {
    if let Some(target) = ev.current_target() {
        if let Ok(element) = target.dyn_into::<web_sys::Element>() {
            let _ = element.set_pointer_capture(ev.pointer_id());
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn try_set_pointer_capture(_: &web_sys::PointerEvent) {}

#[component]
pub(super) fn DesktopWindow(window_id: WindowId) -> impl IntoView {
    let runtime = use_desktop_runtime();

    let window = Signal::derive(move || {
        runtime
            .state
            .with(|desktop| desktop.window(window_id).cloned())
    });
    let style = move || {
        window
            .get()
            .map(|w| {
                format!(
                    "left:{}px;top:{}px;z-index:{};",
                    w.position.x, w.position.y, w.z_index
                )
            })
            .unwrap_or_default()
    };
    let title = move || window.get().map(|w| w.title).unwrap_or_default();
    let is_topmost =
        move || runtime.state.with(|desktop| desktop.topmost_window_id()) == Some(window_id);

    let focus = move |_: web_sys::PointerEvent| runtime.focus(window_id);
    let begin_move = move |ev: web_sys::PointerEvent| {
        if ev.pointer_type() == "mouse" && ev.button() != 0 {
            return;
        }
        if ev.pointer_type() != "mouse" && !ev.is_primary() {
            return;
        }
        try_set_pointer_capture(&ev);
        ev.prevent_default();
        runtime.begin_drag(window_id, pointer_from_pointer_event(&ev));
    };

    view! {
        <section
            class="desktop-window"
            class:focused=is_topmost
            style=style
            on:pointerdown=focus
            role="dialog"
            aria-label=title
        >
            <header class="titlebar" on:pointerdown=begin_move>
                <span class="titlebar-title">{title}</span>
                <div class="titlebar-controls">
                    <button
                        type="button"
                        aria-label="Close window"
                        on:pointerdown=move |ev: web_sys::PointerEvent| ev.stop_propagation()
                        on:click=move |_| runtime.close(window_id)
                    >
                        "x"
                    </button>
                </div>
            </header>
            <div class="window-body">
                <WindowBody window_id=window_id />
            </div>
        </section>
    }
}

#[component]
fn WindowBody(window_id: WindowId) -> impl IntoView {
    let runtime = use_desktop_runtime();
    let contents = runtime.render_app(window_id).unwrap_or_else(|| {
        let template = runtime.state.with_untracked(|desktop| {
            desktop
                .window(window_id)
                .map(|w| w.content.template.clone())
                .unwrap_or_default()
        });
        view! { <p class="window-template">{template}</p> }.into_view()
    });

    view! {
        <div class="window-body-content">
            {contents}
        </div>
    }
}
