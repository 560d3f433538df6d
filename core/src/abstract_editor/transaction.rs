//! Macros: runs of actions that undo and redo as one history entry.
//!
//! [`EditActionHistory::start_macro`](super::EditActionHistory::start_macro)
//! returns a [`MacroHandle`] that must be handed back to
//! [`end_macro`](super::EditActionHistory::end_macro). Every action added in
//! between is applied immediately but recorded into one [`MacroAction`].

use std::fmt;

use super::action::{EditAction, EditActionResult, Editable};

/// Proof of an open macro, consumed when the macro is closed.
///
/// Starting a macro while another is open extends the open one and returns
/// a nested handle; nested handles must be closed innermost first.
#[must_use = "a macro stays open until its handle is passed to `end_macro`"]
#[derive(Debug, PartialEq, Eq)]
pub struct MacroHandle {
    pub(super) id: u64,
    pub(super) depth: usize,
}

impl MacroHandle {
    /// Nesting depth of this handle, starting at 1 for the outermost macro.
    pub fn depth(&self) -> usize {
        self.depth
    }
}

/// A macro being recorded.
pub(super) struct OpenMacro<E: Editable> {
    pub id: u64,
    pub depth: usize,
    pub action: MacroAction<E>,
}

/// A compound action: sub-actions applied in order and undone in reverse.
pub struct MacroAction<E: Editable> {
    description: String,
    actions: Vec<Box<dyn EditAction<E>>>,
}

impl<E: Editable> MacroAction<E> {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            actions: Vec::new(),
        }
    }

    /// Appends an action that has already been first-done.
    pub fn push_executed(&mut self, action: Box<dyn EditAction<E>>) {
        self.actions.push(action);
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Descriptions of the sub-actions in execution order.
    pub fn descriptions(&self) -> impl Iterator<Item = &str> {
        self.actions.iter().map(|a| a.description())
    }
}

impl<E: Editable> fmt::Debug for MacroAction<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MacroAction")
            .field("description", &self.description)
            .field("actions", &self.actions)
            .finish()
    }
}

impl<E: Editable> EditAction<E> for MacroAction<E> {
    fn first_do_editor_data(&mut self, editor: &mut E) {
        for action in &mut self.actions {
            action.first_do_editor_data(editor);
        }
    }

    fn first_do_project_file(&mut self, project: &mut E::Project) -> EditActionResult<bool> {
        let mut changed = false;
        for action in &mut self.actions {
            changed |= action.first_do_project_file(project)?;
        }
        Ok(changed)
    }

    /// Undoes the sub-actions in reverse order.
    ///
    /// If one fails, the sub-actions already undone are redone so the macro
    /// is left fully applied.
    fn undo(&mut self, editor: &mut E, project: &mut E::Project) -> EditActionResult {
        for failed in (0..self.actions.len()).rev() {
            let Err(e) = self.actions[failed].undo(editor, project) else {
                continue;
            };
            for action in &mut self.actions[failed + 1..] {
                if let Err(rollback) = action.redo(editor, project) {
                    log::error!(
                        "Macro '{}' left partially undone at '{}': {rollback}",
                        self.description,
                        action.description()
                    );
                }
            }
            return Err(e);
        }
        Ok(())
    }

    /// Redoes the sub-actions in order, undoing the redone ones on failure.
    fn redo(&mut self, editor: &mut E, project: &mut E::Project) -> EditActionResult {
        for failed in 0..self.actions.len() {
            let Err(e) = self.actions[failed].redo(editor, project) else {
                continue;
            };
            for action in self.actions[..failed].iter_mut().rev() {
                if let Err(rollback) = action.undo(editor, project) {
                    log::error!(
                        "Macro '{}' left partially redone at '{}': {rollback}",
                        self.description,
                        action.description()
                    );
                }
            }
            return Err(e);
        }
        Ok(())
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn notify_gui(&self, gui: &mut E::Gui) {
        for action in &self.actions {
            action.notify_gui(gui);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Log {
        entries: Vec<String>,
    }

    impl Editable for Log {
        type Project = Vec<String>;
        type Gui = usize;
    }

    #[derive(Debug)]
    struct Push(&'static str);

    impl EditAction<Log> for Push {
        fn first_do_editor_data(&mut self, editor: &mut Log) {
            editor.entries.push(self.0.into());
        }

        fn first_do_project_file(&mut self, project: &mut Vec<String>) -> EditActionResult<bool> {
            project.push(self.0.into());
            Ok(true)
        }

        fn undo(&mut self, editor: &mut Log, project: &mut Vec<String>) -> EditActionResult {
            editor.entries.pop();
            project.pop();
            Ok(())
        }

        fn redo(&mut self, editor: &mut Log, project: &mut Vec<String>) -> EditActionResult {
            editor.entries.push(self.0.into());
            project.push(self.0.into());
            Ok(())
        }

        fn description(&self) -> &str {
            self.0
        }

        fn notify_gui(&self, gui: &mut usize) {
            *gui += 1;
        }
    }

    fn applied_macro(editor: &mut Log, project: &mut Vec<String>) -> MacroAction<Log> {
        let mut m = MacroAction::new("Both");
        for name in ["a", "b"] {
            let mut action = Box::new(Push(name));
            action.first_do_editor_data(editor);
            action.first_do_project_file(project).unwrap();
            m.push_executed(action);
        }
        m
    }

    #[test]
    fn undo_runs_in_reverse() {
        let mut editor = Log { entries: vec![] };
        let mut project = vec![];
        let mut m = applied_macro(&mut editor, &mut project);
        assert_eq!(project, vec!["a", "b"]);

        m.undo(&mut editor, &mut project).unwrap();
        assert!(project.is_empty());
        assert!(editor.entries.is_empty());

        m.redo(&mut editor, &mut project).unwrap();
        assert_eq!(editor.entries, vec!["a", "b"]);
    }

    #[test]
    fn reports_description_and_children() {
        let mut editor = Log { entries: vec![] };
        let mut project = vec![];
        let m = applied_macro(&mut editor, &mut project);
        assert_eq!(m.description(), "Both");
        assert_eq!(m.len(), 2);
        assert_eq!(m.descriptions().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn notify_gui_reaches_every_child() {
        let mut editor = Log { entries: vec![] };
        let mut project = vec![];
        let m = applied_macro(&mut editor, &mut project);
        let mut notified = 0;
        m.notify_gui(&mut notified);
        assert_eq!(notified, 2);
    }
}
