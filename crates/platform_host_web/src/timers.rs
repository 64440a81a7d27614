//! `setTimeout`/`setInterval` timer adapter.

use platform_host::{IntervalCallback, TimeoutCallback, TimerHandle, TimerService};

#[derive(Debug, Clone, Copy, Default)]
/// Browser timer service backed by the window's timer functions.
///
/// Native builds have no event loop; scheduling returns an inert handle and never fires.
pub struct WebTimerService;

#[cfg(target_arch = "wasm32")]
fn clamp_ms(ms: u32) -> i32 {
    i32::try_from(ms).unwrap_or(i32::MAX)
}

#[cfg(target_arch = "wasm32")]
impl TimerService for WebTimerService {
    fn set_timeout(&self, delay_ms: u32, callback: TimeoutCallback) -> TimerHandle {
        use std::rc::Rc;
        use wasm_bindgen::{closure::Closure, JsCast};

        let Some(window) = web_sys::window() else {
            return TimerHandle::noop();
        };
        let js_callback = Closure::once_into_js(move || callback());
        let Ok(id) = window.set_timeout_with_callback_and_timeout_and_arguments_0(
            js_callback.unchecked_ref(),
            clamp_ms(delay_ms),
        ) else {
            return TimerHandle::noop();
        };
        TimerHandle::new(Rc::new(move || window.clear_timeout_with_handle(id)))
    }

    fn set_interval(&self, period_ms: u32, callback: IntervalCallback) -> TimerHandle {
        use std::{cell::RefCell, rc::Rc};
        use wasm_bindgen::{closure::Closure, JsCast};

        let Some(window) = web_sys::window() else {
            return TimerHandle::noop();
        };
        let closure = Closure::<dyn FnMut()>::wrap(Box::new(move || callback()));
        let Ok(id) = window.set_interval_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            clamp_ms(period_ms.max(1)),
        ) else {
            return TimerHandle::noop();
        };
        // Cleared together with the interval so the closure lives exactly as long as the timer.
        let closure = Rc::new(RefCell::new(Some(closure)));
        TimerHandle::new(Rc::new(move || {
            window.clear_interval_with_handle(id);
            closure.borrow_mut().take();
        }))
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl TimerService for WebTimerService {
    fn set_timeout(&self, _delay_ms: u32, _callback: TimeoutCallback) -> TimerHandle {
        TimerHandle::noop()
    }

    fn set_interval(&self, _period_ms: u32, _callback: IntervalCallback) -> TimerHandle {
        TimerHandle::noop()
    }
}
