//! Editors and their reversible actions.
//!
//! This module defines the core abstractions for the undo/redo system:
//!
//! - [`Editable`]: an editor holding a working copy of part of a project
//! - [`EditAction`]: a reversible, two-phase edit (Command pattern)
//! - [`EditActionError`] / [`EditActionResult`]: error handling for actions
//!
//! Every edit touches two copies of the data. The *editor copy* lives in the
//! editor and is what the UI draws; the *project copy* is the authoritative
//! document that gets saved. Actions store whatever they need to replay
//! themselves on both (addressing indices, old/new values).

use std::fmt;

use thiserror::Error;

/// An editor that works on a copy of one resource of a project.
///
/// # Example
///
/// ```ignore
/// struct PaletteEditor { data: Palette, selection: MultipleSelection, index: usize }
///
/// impl Editable for PaletteEditor {
///     type Project = ProjectFile;
///     type Gui = PaletteEditorGui;
///
///     fn item_index(&self) -> usize { self.index }
///     fn update_selection(&mut self) { self.selection.update(); }
/// }
/// ```
pub trait Editable: 'static {
    /// The authoritative document the editor commits to.
    type Project: 'static;

    /// View state told about undo/redo through [`EditAction::notify_gui`].
    type Gui: ?Sized;

    /// Index of the project resource this editor edits.
    fn item_index(&self) -> usize {
        0
    }

    /// Commits every pending selection of the editor.
    ///
    /// Called once at the end of each processed frame.
    fn update_selection(&mut self) {}
}

/// Error type for action execution failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditActionError {
    /// The target object was not found.
    #[error("target not found: {0}")]
    TargetNotFound(String),
    /// The target is in an invalid state for this action.
    #[error("invalid state: {0}")]
    InvalidState(String),
    /// An index does not address an existing item.
    #[error("index {index} out of bounds (len {len})")]
    IndexOutOfBounds { index: usize, len: usize },
    /// The edit would grow a list or grid past its maximum size.
    #[error("capacity exceeded: {requested} > {max}")]
    CapacityExceeded { requested: usize, max: usize },
    /// The undo stack is empty.
    #[error("nothing to undo")]
    NothingToUndo,
    /// The redo stack is empty.
    #[error("nothing to redo")]
    NothingToRedo,
    /// Undo/redo was requested while a macro is being recorded.
    #[error("a macro is in progress")]
    MacroInProgress,
    /// A custom error with a description.
    #[error("{0}")]
    Custom(String),
}

/// Result type for action operations.
pub type EditActionResult<T = ()> = Result<T, EditActionError>;

/// A reversible editor action.
///
/// An action is built when a UI edit completes, reading the *new* value from
/// the editor copy (which already shows it). It is then applied in two
/// phases, exactly once each:
///
/// 1. [`first_do_editor_data`](Self::first_do_editor_data) updates the editor
///    copy. The editor copy is provisional, so this phase cannot fail.
/// 2. [`first_do_project_file`](Self::first_do_project_file) updates the
///    project copy and captures the *old* value from it. Returning
///    `Ok(false)` means the project did not change; the action is then
///    discarded instead of recorded.
///
/// After that, [`undo`](Self::undo) and [`redo`](Self::redo) replay the
/// change on both copies any number of times.
///
/// # Object Safety
///
/// This trait is dyn-compatible so that different action types can be stored
/// in a single [`EditActionHistory`](super::EditActionHistory) as
/// `Box<dyn EditAction<E>>`.
///
/// # Example
///
/// ```ignore
/// #[derive(Debug)]
/// struct RenamePalette {
///     new_name: String,
///     old_name: Option<String>,
/// }
///
/// impl EditAction<PaletteEditor> for RenamePalette {
///     fn first_do_editor_data(&mut self, editor: &mut PaletteEditor) {
///         editor.data.name = self.new_name.clone();
///     }
///
///     fn first_do_project_file(&mut self, project: &mut ProjectFile) -> EditActionResult<bool> {
///         let palette = project.palette_mut(0)?;
///         if palette.name == self.new_name {
///             return Ok(false);
///         }
///         self.old_name = Some(std::mem::replace(&mut palette.name, self.new_name.clone()));
///         Ok(true)
///     }
///
///     // undo / redo write old_name / new_name into both copies
///     # fn undo(&mut self, _: &mut PaletteEditor, _: &mut ProjectFile) -> EditActionResult { Ok(()) }
///     # fn redo(&mut self, _: &mut PaletteEditor, _: &mut ProjectFile) -> EditActionResult { Ok(()) }
///
///     fn description(&self) -> &str {
///         "Rename palette"
///     }
/// }
/// ```
pub trait EditAction<E: Editable>: fmt::Debug {
    /// Applies the new value to the editor copy.
    fn first_do_editor_data(&mut self, editor: &mut E);

    /// Applies the new value to the project copy, capturing the old value.
    ///
    /// Returns `Ok(true)` if the project changed.
    fn first_do_project_file(&mut self, project: &mut E::Project) -> EditActionResult<bool>;

    /// Restores the old value into both copies.
    fn undo(&mut self, editor: &mut E, project: &mut E::Project) -> EditActionResult;

    /// Re-applies the new value into both copies.
    fn redo(&mut self, editor: &mut E, project: &mut E::Project) -> EditActionResult;

    /// A short, human-readable description for display in the edit menu.
    ///
    /// Examples: `"Add frame"`, `"Edit palette color"`, `"Paint tiles"`.
    fn description(&self) -> &str;

    /// Lets the editor's view invalidate derived state after undo/redo.
    ///
    /// Default: does nothing.
    fn notify_gui(&self, _gui: &mut E::Gui) {}
}
