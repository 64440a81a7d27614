//! Reducer actions, side-effect intents, and transition logic for the window stack.

use thiserror::Error;

use crate::model::{
    DesktopState, DragSession, InteractionState, OpenWindowRequest, PointerPosition, WindowId,
    WindowRecord,
};

#[derive(Debug, Clone, PartialEq)]
/// Actions accepted by [`reduce_desktop`] to mutate [`DesktopState`].
pub enum DesktopAction {
    /// Open a new window on top of the stack.
    OpenWindow(OpenWindowRequest),
    /// Raise a window to the top of the stack.
    FocusWindow {
        /// Window to focus.
        window_id: WindowId,
    },
    /// Remove a window from the desktop.
    CloseWindow {
        /// Window to close.
        window_id: WindowId,
    },
    /// Begin dragging a window by its title bar.
    BeginMove {
        /// Window being dragged.
        window_id: WindowId,
        /// Pointer position at drag start.
        pointer: PointerPosition,
    },
    /// Update an in-progress window drag.
    UpdateMove {
        /// Current pointer position.
        pointer: PointerPosition,
    },
    /// End the active window drag.
    EndMove,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Side-effect intents emitted by [`reduce_desktop`] for the window manager to act on.
pub enum RuntimeEffect {
    /// A window was added to the stack.
    WindowOpened(WindowId),
    /// A window received a fresh z value.
    WindowFocused(WindowId),
    /// A window left the stack.
    WindowClosed(WindowId),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Reducer errors for invalid actions (for example, referencing a missing window).
pub enum ReducerError {
    /// The target window id was not found in the current state.
    #[error("window not found")]
    WindowNotFound,
}

/// Applies a [`DesktopAction`] to the desktop state and collects resulting side effects.
///
/// Z values come from a counter that only grows: opening and focusing both take the next value,
/// and closing leaves the remaining values untouched. Dragging moves a window without clamping
/// and never changes its z value.
///
/// # Errors
///
/// Returns [`ReducerError::WindowNotFound`] when an action references a window that is not present.
pub fn reduce_desktop(
    state: &mut DesktopState,
    interaction: &mut InteractionState,
    action: DesktopAction,
) -> Result<Vec<RuntimeEffect>, ReducerError> {
    let mut effects = Vec::new();
    match action {
        DesktopAction::OpenWindow(req) => {
            let window_id = next_window_id(state);
            let z_index = state.next_z();
            state.windows.push(WindowRecord {
                id: window_id,
                app_id: req.app_id,
                title: req.title,
                position: req.position,
                z_index,
                content: req.content,
            });
            effects.push(RuntimeEffect::WindowOpened(window_id));
        }
        DesktopAction::FocusWindow { window_id } => {
            raise_window(state, window_id)?;
            effects.push(RuntimeEffect::WindowFocused(window_id));
        }
        DesktopAction::CloseWindow { window_id } => {
            let before_len = state.windows.len();
            state.windows.retain(|w| w.id != window_id);
            if state.windows.len() == before_len {
                return Err(ReducerError::WindowNotFound);
            }
            if interaction
                .dragging
                .as_ref()
                .is_some_and(|session| session.window_id == window_id)
            {
                interaction.dragging = None;
            }
            effects.push(RuntimeEffect::WindowClosed(window_id));
        }
        DesktopAction::BeginMove { window_id, pointer } => {
            let position_start = find_window_mut(state, window_id)?.position;
            interaction.dragging = Some(DragSession {
                window_id,
                pointer_start: pointer,
                position_start,
            });
        }
        DesktopAction::UpdateMove { pointer } => {
            if let Some(session) = interaction.dragging.as_ref() {
                let dx = pointer.x - session.pointer_start.x;
                let dy = pointer.y - session.pointer_start.y;
                let window = find_window_mut(state, session.window_id)?;
                window.position = session.position_start.offset(dx, dy);
            }
        }
        DesktopAction::EndMove => {
            interaction.dragging = None;
        }
    }

    Ok(effects)
}

fn next_window_id(state: &mut DesktopState) -> WindowId {
    let id = WindowId(state.next_window_id);
    state.next_window_id = state.next_window_id.saturating_add(1);
    id
}

// Takes the next z value and moves the window to the end of the stack, which keeps
// `state.windows` in ascending z order. Bumps even when the window is already topmost.
fn raise_window(state: &mut DesktopState, window_id: WindowId) -> Result<(), ReducerError> {
    let index = state
        .windows
        .iter()
        .position(|w| w.id == window_id)
        .ok_or(ReducerError::WindowNotFound)?;
    let z_index = state.next_z();
    let mut window = state.windows.remove(index);
    window.z_index = z_index;
    state.windows.push(window);
    Ok(())
}

fn find_window_mut(
    state: &mut DesktopState,
    window_id: WindowId,
) -> Result<&mut WindowRecord, ReducerError> {
    state
        .windows
        .iter_mut()
        .find(|w| w.id == window_id)
        .ok_or(ReducerError::WindowNotFound)
}
