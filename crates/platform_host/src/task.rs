//! Local (single-threaded) task spawning contract.

use std::rc::Rc;

use futures::future::LocalBoxFuture;

/// Spawns a `!Send` future onto the host event loop.
///
/// Browser hosts forward to `wasm_bindgen_futures::spawn_local`; native tests usually wrap a
/// `futures::executor::LocalPool` spawner.
pub type LocalSpawner = Rc<dyn Fn(LocalBoxFuture<'static, ()>)>;

/// Returns a spawner that drops every future without polling it.
pub fn noop_spawner() -> LocalSpawner {
    Rc::new(|_future: LocalBoxFuture<'static, ()>| {})
}

/// Returns a spawner that drives each future to completion immediately on the caller's stack.
///
/// Only suitable for futures that never wait on the event loop (for example, already-resolved
/// host promises in tests).
pub fn blocking_spawner() -> LocalSpawner {
    Rc::new(|future: LocalBoxFuture<'static, ()>| futures::executor::block_on(future))
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    #[test]
    fn blocking_spawner_runs_ready_futures_inline() {
        let ran = Rc::new(Cell::new(false));
        let flag = ran.clone();
        let spawn = blocking_spawner();
        spawn(Box::pin(async move { flag.set(true) }));
        assert!(ran.get());
    }

    #[test]
    fn noop_spawner_never_polls() {
        let ran = Rc::new(Cell::new(false));
        let flag = ran.clone();
        let spawn = noop_spawner();
        spawn(Box::pin(async move { flag.set(true) }));
        assert!(!ran.get());
    }
}
