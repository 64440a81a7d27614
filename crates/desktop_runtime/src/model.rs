use desktop_app_contract::{ApplicationId, WindowContent};
use serde::{Deserialize, Serialize};

/// Value of the z counter before the first window opens.
pub const Z_ORDER_BASE: u64 = 100;
/// Top-left corner of the spawn area for new windows.
pub const SPAWN_ORIGIN: WindowPosition = WindowPosition { x: 50, y: 50 };
/// Exclusive upper bound of the random spawn offset on each axis.
pub const SPAWN_JITTER_PX: i32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WindowId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowPosition {
    pub x: i32,
    pub y: i32,
}

impl WindowPosition {
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowRecord {
    pub id: WindowId,
    /// Launching app, or `None` for windows opened directly.
    pub app_id: Option<ApplicationId>,
    pub title: String,
    pub position: WindowPosition,
    pub z_index: u64,
    pub content: WindowContent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesktopState {
    pub next_window_id: u64,
    /// Last z value handed out. Never decreases, even when windows close.
    pub z_counter: u64,
    /// Open windows, kept in ascending z order.
    pub windows: Vec<WindowRecord>,
}

impl Default for DesktopState {
    fn default() -> Self {
        Self {
            next_window_id: 1,
            z_counter: Z_ORDER_BASE,
            windows: Vec::new(),
        }
    }
}

impl DesktopState {
    /// Increments the z counter and returns the new value.
    pub fn next_z(&mut self) -> u64 {
        self.z_counter += 1;
        self.z_counter
    }

    pub fn window(&self, window_id: WindowId) -> Option<&WindowRecord> {
        self.windows.iter().find(|w| w.id == window_id)
    }

    pub fn topmost_window_id(&self) -> Option<WindowId> {
        self.windows.iter().max_by_key(|w| w.z_index).map(|w| w.id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenWindowRequest {
    pub app_id: Option<ApplicationId>,
    pub title: String,
    pub content: WindowContent,
    pub position: WindowPosition,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointerPosition {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragSession {
    pub window_id: WindowId,
    pub pointer_start: PointerPosition,
    pub position_start: WindowPosition,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InteractionState {
    pub dragging: Option<DragSession>,
}
