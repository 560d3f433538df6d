//! # Spritework Core
//!
//! Undo/redo and selection engine shared by every Spritework editor.
//!
//! - [`abstract_editor`]: reversible actions, the undo history and macros
//! - [`selection`]: selection models and index renumbering
//! - [`list_actions`]: generic add/remove/move/edit actions for lists and grids
//! - [`grid`]: the 2D cell buffer edited by grid actions

pub mod abstract_editor;
pub mod grid;
pub mod list_actions;
pub mod selection;

/// Core library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Logs the core version. Call once at startup after the logger is set up.
pub fn init() {
    log::info!("Spritework Core v{} initialized", VERSION);
}
