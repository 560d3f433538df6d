//! Abstract editor framework for reversible editing operations.
//!
//! This module provides the foundational traits and types for building
//! an undo/redo-capable editor. It knows nothing about concrete resources
//! (sprites, palettes, rooms) so that each editor can plug its own data in.
//!
//! - [`Editable`]: an editor working on a copy of one project resource
//! - [`EditAction`]: a reversible two-phase edit (Command pattern)
//! - [`EditActionHistory`]: undo/redo stack managing action sequences
//! - [`MacroHandle`]: an open macro grouping several actions into one entry
//! - [`EditContext`]: the history plus both copies, handed to edit helpers
//!
//! # Two copies
//!
//! An editor draws from its own *editor copy* of the data so that the UI can
//! show an edit the moment it happens. The *project copy* is the document
//! that gets saved, and it only ever changes through actions. Each action is
//! applied to the editor copy first and the project copy second. If the
//! project copy did not change the action is dropped, so edits that leave a
//! value as it was never show up in the history.
//!
//! # Macros
//!
//! ```ignore
//! let handle = history.start_macro("Clone frames");
//! history.add_action(Box::new(first), &mut editor, &mut project)?;
//! history.add_action(Box::new(second), &mut editor, &mut project)?;
//! history.end_macro(handle); // one undo entry
//! ```

mod action;
mod context;
mod history;
mod transaction;

pub use action::{EditAction, EditActionError, EditActionResult, Editable};
pub use context::EditContext;
pub use history::{DEFAULT_MAX_UNDO, EditActionHistory};
pub use transaction::{MacroAction, MacroHandle};
