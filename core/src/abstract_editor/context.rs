use super::action::{EditAction, EditActionResult, Editable};
use super::history::EditActionHistory;
use super::transaction::MacroHandle;

/// Everything an edit helper needs: the history and both copies of the data.
///
/// The history lives outside the editor so that an action can borrow the
/// editor and the project while the history records it.
pub struct EditContext<'a, E: Editable> {
    pub history: &'a mut EditActionHistory<E>,
    pub editor: &'a mut E,
    pub project: &'a mut E::Project,
}

impl<'a, E: Editable> EditContext<'a, E> {
    pub fn new(
        history: &'a mut EditActionHistory<E>,
        editor: &'a mut E,
        project: &'a mut E::Project,
    ) -> Self {
        Self {
            history,
            editor,
            project,
        }
    }

    /// Index of the project resource the editor edits.
    pub fn item_index(&self) -> usize {
        self.editor.item_index()
    }

    /// First-does `action` and records it if the project changed.
    pub fn add_action(&mut self, action: impl EditAction<E> + 'static) -> EditActionResult<bool> {
        self.history
            .add_action(Box::new(action), self.editor, self.project)
    }

    pub fn start_macro(&mut self, description: impl Into<String>) -> MacroHandle {
        self.history.start_macro(description)
    }

    pub fn end_macro(&mut self, handle: MacroHandle) -> bool {
        self.history.end_macro(handle)
    }

    /// Undoes the last entry and lets its actions notify `gui`.
    pub fn undo(&mut self, gui: &mut E::Gui) -> EditActionResult {
        self.history
            .undo(self.editor, self.project)?
            .notify_gui(gui);
        Ok(())
    }

    /// Redoes the last undone entry and lets its actions notify `gui`.
    pub fn redo(&mut self, gui: &mut E::Gui) -> EditActionResult {
        self.history
            .redo(self.editor, self.project)?
            .notify_gui(gui);
        Ok(())
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }
}
