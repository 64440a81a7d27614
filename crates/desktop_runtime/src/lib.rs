//! Desktop window manager runtime: window stack reducer, window manager, built-in app registry,
//! desktop configuration, and the Leptos shell that renders them.

pub mod apps;
pub mod components;
pub mod config;
pub mod model;
pub mod reducer;
mod runtime_context;
pub mod window_manager;

pub use components::{use_desktop_runtime, DesktopProvider, DesktopRuntimeContext, DesktopShell};
pub use config::{load_desktop_config, parse_desktop_config, ConfigError, DesktopConfig};
pub use model::*;
pub use reducer::{reduce_desktop, DesktopAction, ReducerError, RuntimeEffect};
pub use window_manager::{LaunchError, WindowManager};
