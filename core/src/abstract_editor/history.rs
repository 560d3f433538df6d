//! Undo/redo action history.
//!
//! [`EditActionHistory`] manages a linear undo/redo stack of [`EditAction`]
//! trait objects. When a new action is pushed after undoing, the redo stack
//! is cleared (standard editor behavior). The history cursor is the length
//! of the undo stack.

use std::collections::VecDeque;
use std::fmt;

use super::action::{EditAction, EditActionError, EditActionResult, Editable};
use super::transaction::{MacroAction, MacroHandle, OpenMacro};

/// Default maximum number of undo steps.
pub const DEFAULT_MAX_UNDO: usize = 100;

/// Manages an undo/redo stack of editor actions.
///
/// The undo stack is a bounded [`VecDeque`]; when it exceeds `max_undo`,
/// the oldest action is dropped from the front. The redo stack is an
/// unbounded [`Vec`] (it can never grow larger than the undo stack was).
///
/// # Example
///
/// ```ignore
/// let mut history = EditActionHistory::new(50);
///
/// // First-do an action and record it if it changed the project
/// history.add_action(Box::new(my_action), &mut editor, &mut project)?;
///
/// // Undo the last action, then let the view refresh
/// history.undo(&mut editor, &mut project)?.notify_gui(&mut gui);
///
/// // Redo it
/// history.redo(&mut editor, &mut project)?;
/// ```
pub struct EditActionHistory<E: Editable> {
    undo_stack: VecDeque<Box<dyn EditAction<E>>>,
    redo_stack: Vec<Box<dyn EditAction<E>>>,
    max_undo: usize,
    open_macro: Option<OpenMacro<E>>,
    next_macro_id: u64,
    /// Tracks distance from the saved state.
    ///
    /// - `Some(0)`: the current state matches the last save.
    /// - `Some(n)` where `n > 0`: `n` undos needed to reach the saved state.
    /// - `Some(n)` where `n < 0`: `|n|` redos needed to reach the saved state.
    /// - `None`: never saved, or the save point is permanently unreachable
    ///   (e.g. after capacity overflow dropped it, or the redo branch was discarded).
    save_distance: Option<i64>,
}

impl<E: Editable> EditActionHistory<E> {
    /// Creates a new empty action history with the given maximum undo depth.
    ///
    /// When the undo stack exceeds `max_undo`, the oldest action is dropped.
    /// A depth of zero is raised to one.
    pub fn new(max_undo: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            max_undo: max_undo.max(1),
            open_macro: None,
            next_macro_id: 0,
            save_distance: Some(0),
        }
    }

    /// First-does an action and records it if the project changed.
    ///
    /// The action's editor step runs first, then its project step. If the
    /// project step reports no change the action is dropped and `Ok(false)`
    /// is returned. Otherwise the redo stack is cleared and the action is
    /// pushed onto the undo stack, or into the open macro if there is one.
    ///
    /// If the project step fails, the action is dropped and the error
    /// returned.
    pub fn add_action(
        &mut self,
        mut action: Box<dyn EditAction<E>>,
        editor: &mut E,
        project: &mut E::Project,
    ) -> EditActionResult<bool> {
        action.first_do_editor_data(editor);

        if !action.first_do_project_file(project)? {
            log::trace!("Discarding unchanged action: {}", action.description());
            return Ok(false);
        }

        // Clearing the redo stack invalidates a save point that was in redo.
        self.redo_stack.clear();
        if let Some(d) = self.save_distance
            && d < 0
        {
            self.save_distance = None;
        }

        if let Some(open) = &mut self.open_macro {
            log::trace!(
                "Recording into macro '{}': {}",
                open.action.description(),
                action.description()
            );
            open.action.push_executed(action);
        } else {
            log::debug!("Recorded action: {}", action.description());
            self.push_undo(action);
        }
        Ok(true)
    }

    /// Starts recording a macro.
    ///
    /// Every action added until the matching [`end_macro`](Self::end_macro)
    /// becomes part of one history entry described by `description`. If a
    /// macro is already open it is extended and a nested handle is returned.
    pub fn start_macro(&mut self, description: impl Into<String>) -> MacroHandle {
        match &mut self.open_macro {
            Some(open) => {
                open.depth += 1;
                MacroHandle {
                    id: open.id,
                    depth: open.depth,
                }
            }
            None => {
                let id = self.next_macro_id;
                self.next_macro_id += 1;
                let action = MacroAction::new(description);
                log::trace!("Macro started: {}", action.description());
                self.open_macro = Some(OpenMacro {
                    id,
                    depth: 1,
                    action,
                });
                MacroHandle { id, depth: 1 }
            }
        }
    }

    /// Closes the macro opened by `handle`.
    ///
    /// Closing the outermost handle records the macro as one undo entry.
    /// Returns `true` if that happened; a macro with no recorded actions
    /// leaves no entry.
    ///
    /// # Panics
    ///
    /// Panics if no macro is open, or if `handle` is not the innermost open
    /// handle. Both indicate unbalanced macro calls.
    pub fn end_macro(&mut self, handle: MacroHandle) -> bool {
        let Some(open) = &mut self.open_macro else {
            panic!("end_macro called without an open macro");
        };
        assert!(
            open.id == handle.id && open.depth == handle.depth,
            "macro handles closed out of order (open depth {}, closing depth {})",
            open.depth,
            handle.depth
        );

        open.depth -= 1;
        if open.depth > 0 {
            return false;
        }

        let Some(open) = self.open_macro.take() else {
            return false;
        };
        if open.action.is_empty() {
            log::trace!("Dropping empty macro: {}", open.action.description());
            return false;
        }
        log::debug!(
            "Recorded macro: {} ({} actions)",
            open.action.description(),
            open.action.len()
        );
        self.push_undo(Box::new(open.action));
        true
    }

    /// Returns `true` while a macro is being recorded.
    pub fn is_macro_open(&self) -> bool {
        self.open_macro.is_some()
    }

    fn push_undo(&mut self, action: Box<dyn EditAction<E>>) {
        // New entry pushed, the save point moves one step further away.
        if let Some(d) = &mut self.save_distance {
            *d += 1;
        }
        self.undo_stack.push_back(action);
        self.enforce_max_undo();
    }

    fn enforce_max_undo(&mut self) {
        while self.undo_stack.len() > self.max_undo {
            self.undo_stack.pop_front();
            // If the save point was beyond the oldest surviving entry, it's gone.
            if let Some(d) = self.save_distance
                && d > self.undo_stack.len() as i64
            {
                self.save_distance = None;
            }
        }
    }

    /// Undoes the most recent action on both copies.
    ///
    /// Returns the undone action so the caller can
    /// [notify](EditAction::notify_gui) its view. Returns an error if the
    /// undo stack is empty, a macro is open, or the undo failed. A failed
    /// action stays on the undo stack.
    pub fn undo(
        &mut self,
        editor: &mut E,
        project: &mut E::Project,
    ) -> EditActionResult<&dyn EditAction<E>> {
        if self.open_macro.is_some() {
            return Err(EditActionError::MacroInProgress);
        }
        let mut action = self
            .undo_stack
            .pop_back()
            .ok_or(EditActionError::NothingToUndo)?;
        if let Err(e) = action.undo(editor, project) {
            log::warn!("Undo of '{}' failed: {e}", action.description());
            self.undo_stack.push_back(action);
            return Err(e);
        }
        log::debug!("Undo: {}", action.description());
        if let Some(d) = &mut self.save_distance {
            *d -= 1;
        }
        self.redo_stack.push(action);
        let top = self.redo_stack.len() - 1;
        Ok(self.redo_stack[top].as_ref())
    }

    /// Redoes the most recently undone action on both copies.
    ///
    /// Returns the redone action so the caller can notify its view. Returns
    /// an error if the redo stack is empty, a macro is open, or the redo
    /// failed. A failed action stays on the redo stack.
    pub fn redo(
        &mut self,
        editor: &mut E,
        project: &mut E::Project,
    ) -> EditActionResult<&dyn EditAction<E>> {
        if self.open_macro.is_some() {
            return Err(EditActionError::MacroInProgress);
        }
        let mut action = self.redo_stack.pop().ok_or(EditActionError::NothingToRedo)?;
        if let Err(e) = action.redo(editor, project) {
            log::warn!("Redo of '{}' failed: {e}", action.description());
            self.redo_stack.push(action);
            return Err(e);
        }
        log::debug!("Redo: {}", action.description());
        self.push_undo(action);
        let top = self.undo_stack.len() - 1;
        Ok(self.undo_stack[top].as_ref())
    }

    /// Returns `true` if there are actions that can be undone.
    pub fn can_undo(&self) -> bool {
        self.open_macro.is_none() && !self.undo_stack.is_empty()
    }

    /// Returns `true` if there are actions that can be redone.
    pub fn can_redo(&self) -> bool {
        self.open_macro.is_none() && !self.redo_stack.is_empty()
    }

    /// Returns an iterator over undo action descriptions, most recent first.
    pub fn undo_descriptions(&self) -> impl Iterator<Item = &str> {
        self.undo_stack.iter().rev().map(|a| a.description())
    }

    /// Returns an iterator over redo action descriptions, most recent first.
    pub fn redo_descriptions(&self) -> impl Iterator<Item = &str> {
        self.redo_stack.iter().rev().map(|a| a.description())
    }

    /// Returns the number of actions in the undo stack.
    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    /// Returns the number of actions in the redo stack.
    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }

    /// Returns the maximum undo depth.
    pub fn max_undo(&self) -> usize {
        self.max_undo
    }

    /// Records the current state as the saved state.
    ///
    /// After calling this, [`has_unsaved_changes`](Self::has_unsaved_changes)
    /// returns `false` until the history is modified by add, undo, or redo.
    pub fn mark_saved(&mut self) {
        self.save_distance = Some(0);
    }

    /// Returns `true` if the current state differs from the last saved state.
    ///
    /// Returns `true` if the history has been modified since the last save,
    /// or if the save point is permanently unreachable (e.g. dropped by
    /// capacity overflow or the redo branch was discarded).
    pub fn has_unsaved_changes(&self) -> bool {
        self.save_distance != Some(0)
    }

    /// Clears both undo and redo stacks.
    ///
    /// If the current state was the saved state (`has_unsaved_changes` was
    /// `false`), it remains so after clearing. Otherwise the save point is
    /// permanently lost.
    ///
    /// # Panics
    ///
    /// Panics if a macro is open.
    pub fn clear(&mut self) {
        assert!(
            self.open_macro.is_none(),
            "cannot clear history while a macro is open"
        );
        self.undo_stack.clear();
        self.redo_stack.clear();
        // If we were at the save point, clearing history doesn't change
        // the project, we are still at the saved state. Otherwise the
        // save point is unreachable.
        if self.save_distance != Some(0) {
            self.save_distance = None;
        }
    }
}

impl<E: Editable> fmt::Debug for EditActionHistory<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditActionHistory")
            .field("undo_count", &self.undo_stack.len())
            .field("redo_count", &self.redo_stack.len())
            .field("max_undo", &self.max_undo)
            .field("macro_open", &self.open_macro.is_some())
            .field("save_distance", &self.save_distance)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Editor copy and project copy of one counter.
    struct Counter {
        value: i32,
    }

    struct Project {
        value: i32,
    }

    impl Editable for Counter {
        type Project = Project;
        type Gui = Vec<String>;
    }

    #[derive(Debug)]
    struct Add {
        amount: i32,
    }

    impl EditAction<Counter> for Add {
        fn first_do_editor_data(&mut self, editor: &mut Counter) {
            editor.value += self.amount;
        }

        fn first_do_project_file(&mut self, project: &mut Project) -> EditActionResult<bool> {
            project.value += self.amount;
            Ok(self.amount != 0)
        }

        fn undo(&mut self, editor: &mut Counter, project: &mut Project) -> EditActionResult {
            editor.value -= self.amount;
            project.value -= self.amount;
            Ok(())
        }

        fn redo(&mut self, editor: &mut Counter, project: &mut Project) -> EditActionResult {
            editor.value += self.amount;
            project.value += self.amount;
            Ok(())
        }

        fn description(&self) -> &str {
            "Add"
        }

        fn notify_gui(&self, gui: &mut Vec<String>) {
            gui.push(format!("add {}", self.amount));
        }
    }

    #[derive(Debug)]
    struct FailingAction;

    impl EditAction<Counter> for FailingAction {
        fn first_do_editor_data(&mut self, _editor: &mut Counter) {}

        fn first_do_project_file(&mut self, _project: &mut Project) -> EditActionResult<bool> {
            Err(EditActionError::Custom("always fails".into()))
        }

        fn undo(&mut self, _editor: &mut Counter, _project: &mut Project) -> EditActionResult {
            Err(EditActionError::Custom("always fails".into()))
        }

        fn redo(&mut self, _editor: &mut Counter, _project: &mut Project) -> EditActionResult {
            Err(EditActionError::Custom("always fails".into()))
        }

        fn description(&self) -> &str {
            "Failing"
        }
    }

    /// Adds like [`Add`], but its undo or redo can be made to fail.
    #[derive(Debug)]
    struct Flaky {
        amount: i32,
        fail_undo: bool,
        fail_redo: bool,
    }

    impl EditAction<Counter> for Flaky {
        fn first_do_editor_data(&mut self, editor: &mut Counter) {
            editor.value += self.amount;
        }

        fn first_do_project_file(&mut self, project: &mut Project) -> EditActionResult<bool> {
            project.value += self.amount;
            Ok(true)
        }

        fn undo(&mut self, editor: &mut Counter, project: &mut Project) -> EditActionResult {
            if self.fail_undo {
                return Err(EditActionError::InvalidState("undo refused".into()));
            }
            editor.value -= self.amount;
            project.value -= self.amount;
            Ok(())
        }

        fn redo(&mut self, editor: &mut Counter, project: &mut Project) -> EditActionResult {
            if self.fail_redo {
                return Err(EditActionError::InvalidState("redo refused".into()));
            }
            editor.value += self.amount;
            project.value += self.amount;
            Ok(())
        }

        fn description(&self) -> &str {
            "Flaky"
        }
    }

    fn setup() -> (EditActionHistory<Counter>, Counter, Project) {
        (
            EditActionHistory::new(DEFAULT_MAX_UNDO),
            Counter { value: 0 },
            Project { value: 0 },
        )
    }

    fn add(
        history: &mut EditActionHistory<Counter>,
        editor: &mut Counter,
        project: &mut Project,
        amount: i32,
    ) -> bool {
        history
            .add_action(Box::new(Add { amount }), editor, project)
            .unwrap()
    }

    #[test]
    fn add_action_applies_and_pushes() {
        let (mut history, mut editor, mut project) = setup();

        assert!(add(&mut history, &mut editor, &mut project, 5));

        assert_eq!(editor.value, 5);
        assert_eq!(project.value, 5);
        assert_eq!(history.undo_count(), 1);
        assert_eq!(history.redo_count(), 0);
    }

    #[test]
    fn unchanged_action_is_discarded() {
        let (mut history, mut editor, mut project) = setup();

        assert!(!add(&mut history, &mut editor, &mut project, 0));
        assert!(!history.can_undo());
        assert!(!history.has_unsaved_changes());
    }

    #[test]
    fn undo_reverses_and_moves_to_redo() {
        let (mut history, mut editor, mut project) = setup();

        add(&mut history, &mut editor, &mut project, 5);
        history.undo(&mut editor, &mut project).unwrap();

        assert_eq!(editor.value, 0);
        assert_eq!(project.value, 0);
        assert_eq!(history.undo_count(), 0);
        assert_eq!(history.redo_count(), 1);
    }

    #[test]
    fn redo_reapplies_and_moves_to_undo() {
        let (mut history, mut editor, mut project) = setup();

        add(&mut history, &mut editor, &mut project, 5);
        history.undo(&mut editor, &mut project).unwrap();
        history.redo(&mut editor, &mut project).unwrap();

        assert_eq!(editor.value, 5);
        assert_eq!(project.value, 5);
        assert_eq!(history.undo_count(), 1);
        assert_eq!(history.redo_count(), 0);
    }

    #[test]
    fn undo_returns_action_for_gui_notification() {
        let (mut history, mut editor, mut project) = setup();
        let mut gui = Vec::new();

        add(&mut history, &mut editor, &mut project, 2);
        history
            .undo(&mut editor, &mut project)
            .unwrap()
            .notify_gui(&mut gui);
        history
            .redo(&mut editor, &mut project)
            .unwrap()
            .notify_gui(&mut gui);

        assert_eq!(gui, vec!["add 2", "add 2"]);
    }

    #[test]
    fn add_clears_redo_stack() {
        let (mut history, mut editor, mut project) = setup();

        add(&mut history, &mut editor, &mut project, 5);
        history.undo(&mut editor, &mut project).unwrap();
        assert_eq!(history.redo_count(), 1);

        add(&mut history, &mut editor, &mut project, 3);
        assert_eq!(history.redo_count(), 0);
        assert_eq!(project.value, 3);
    }

    #[test]
    fn undo_redo_empty_return_errors() {
        let (mut history, mut editor, mut project) = setup();

        assert_eq!(
            history.undo(&mut editor, &mut project).unwrap_err(),
            EditActionError::NothingToUndo
        );
        assert_eq!(
            history.redo(&mut editor, &mut project).unwrap_err(),
            EditActionError::NothingToRedo
        );
    }

    #[test]
    fn capacity_drops_oldest() {
        let mut history = EditActionHistory::new(2);
        let mut editor = Counter { value: 0 };
        let mut project = Project { value: 0 };

        add(&mut history, &mut editor, &mut project, 1);
        add(&mut history, &mut editor, &mut project, 2);
        add(&mut history, &mut editor, &mut project, 3);

        assert_eq!(history.undo_count(), 2);
        assert_eq!(project.value, 6);

        // Undo the two remaining actions (amount=3 and amount=2)
        history.undo(&mut editor, &mut project).unwrap();
        history.undo(&mut editor, &mut project).unwrap();
        assert_eq!(project.value, 1); // only amount=1 remains applied
        assert!(history.undo(&mut editor, &mut project).is_err());
    }

    #[test]
    fn failed_add_does_not_push() {
        let (mut history, mut editor, mut project) = setup();

        let result = history.add_action(Box::new(FailingAction), &mut editor, &mut project);
        assert!(result.is_err());
        assert_eq!(history.undo_count(), 0);
        assert_eq!(project.value, 0);
    }

    #[test]
    fn descriptions() {
        let (mut history, mut editor, mut project) = setup();

        assert_eq!(history.undo_descriptions().count(), 0);

        add(&mut history, &mut editor, &mut project, 1);
        let handle = history.start_macro("Add twice");
        add(&mut history, &mut editor, &mut project, 1);
        add(&mut history, &mut editor, &mut project, 1);
        history.end_macro(handle);

        let undos: Vec<&str> = history.undo_descriptions().collect();
        assert_eq!(undos, vec!["Add twice", "Add"]);

        history.undo(&mut editor, &mut project).unwrap();
        let redos: Vec<&str> = history.redo_descriptions().collect();
        assert_eq!(redos, vec!["Add twice"]);
    }

    #[test]
    fn macro_undoes_and_redoes_in_one_step() {
        let (mut history, mut editor, mut project) = setup();

        let handle = history.start_macro("Batch");
        for amount in [1, 2, 3] {
            add(&mut history, &mut editor, &mut project, amount);
        }
        assert!(history.is_macro_open());
        assert!(!history.can_undo());
        assert!(history.end_macro(handle));

        assert_eq!(project.value, 6);
        assert_eq!(history.undo_count(), 1);

        history.undo(&mut editor, &mut project).unwrap();
        assert_eq!((editor.value, project.value), (0, 0));

        history.redo(&mut editor, &mut project).unwrap();
        assert_eq!((editor.value, project.value), (6, 6));
    }

    #[test]
    fn nested_macro_extends_outer() {
        let (mut history, mut editor, mut project) = setup();

        let outer = history.start_macro("Outer");
        add(&mut history, &mut editor, &mut project, 1);
        let inner = history.start_macro("Inner");
        assert_eq!(inner.depth(), 2);
        add(&mut history, &mut editor, &mut project, 2);
        assert!(!history.end_macro(inner));
        assert!(history.is_macro_open());
        add(&mut history, &mut editor, &mut project, 3);
        assert!(history.end_macro(outer));

        assert_eq!(history.undo_count(), 1);
        assert_eq!(history.undo_descriptions().next(), Some("Outer"));
        history.undo(&mut editor, &mut project).unwrap();
        assert_eq!(project.value, 0);
    }

    #[test]
    fn empty_macro_records_nothing() {
        let (mut history, mut editor, mut project) = setup();

        let handle = history.start_macro("Nothing");
        add(&mut history, &mut editor, &mut project, 0);
        assert!(!history.end_macro(handle));
        assert_eq!(history.undo_count(), 0);
        assert!(!history.is_macro_open());
    }

    #[test]
    fn undo_during_macro_is_rejected() {
        let (mut history, mut editor, mut project) = setup();

        add(&mut history, &mut editor, &mut project, 1);
        let handle = history.start_macro("Open");
        assert_eq!(
            history.undo(&mut editor, &mut project).unwrap_err(),
            EditActionError::MacroInProgress
        );
        history.end_macro(handle);
        assert!(history.undo(&mut editor, &mut project).is_ok());
    }

    #[test]
    #[should_panic(expected = "without an open macro")]
    fn end_macro_without_start_panics() {
        let (mut history, _, _) = setup();
        let handle = history.start_macro("Once");
        let stale = MacroHandle { id: 0, depth: 1 };
        history.end_macro(handle);
        history.end_macro(stale);
    }

    #[test]
    #[should_panic(expected = "out of order")]
    fn closing_outer_before_inner_panics() {
        let (mut history, _, _) = setup();
        let outer = history.start_macro("Outer");
        let _inner = history.start_macro("Inner");
        history.end_macro(outer);
    }

    #[test]
    fn can_undo_can_redo() {
        let (mut history, mut editor, mut project) = setup();

        assert!(!history.can_undo());
        assert!(!history.can_redo());

        add(&mut history, &mut editor, &mut project, 1);
        assert!(history.can_undo());
        assert!(!history.can_redo());

        history.undo(&mut editor, &mut project).unwrap();
        assert!(!history.can_undo());
        assert!(history.can_redo());
    }

    #[test]
    fn clear_empties_both_stacks() {
        let (mut history, mut editor, mut project) = setup();

        add(&mut history, &mut editor, &mut project, 1);
        add(&mut history, &mut editor, &mut project, 2);
        history.undo(&mut editor, &mut project).unwrap();

        history.clear();
        assert_eq!(history.undo_count(), 0);
        assert_eq!(history.redo_count(), 0);
    }

    #[test]
    fn debug_impl() {
        let history = EditActionHistory::<Counter>::new(DEFAULT_MAX_UNDO);
        let debug = format!("{history:?}");
        assert!(debug.contains("EditActionHistory"));
        assert!(debug.contains("undo_count"));
    }

    #[test]
    fn max_undo_accessor() {
        let history = EditActionHistory::<Counter>::new(42);
        assert_eq!(history.max_undo(), 42);
    }

    #[test]
    fn zero_depth_keeps_one_entry() {
        let mut history = EditActionHistory::new(0);
        let mut editor = Counter { value: 0 };
        let mut project = Project { value: 0 };
        assert_eq!(history.max_undo(), 1);

        add(&mut history, &mut editor, &mut project, 1);
        add(&mut history, &mut editor, &mut project, 2);
        assert_eq!(history.undo_count(), 1);

        history.undo(&mut editor, &mut project).unwrap();
        assert_eq!(project.value, 1);
    }

    // -----------------------------------------------------------------------
    // Failed undo/redo
    // -----------------------------------------------------------------------

    #[test]
    fn failed_undo_keeps_entry() {
        let (mut history, mut editor, mut project) = setup();
        let stuck = Flaky {
            amount: 3,
            fail_undo: true,
            fail_redo: false,
        };
        history
            .add_action(Box::new(stuck), &mut editor, &mut project)
            .unwrap();
        history.mark_saved();

        let err = history.undo(&mut editor, &mut project).unwrap_err();
        assert_eq!(err, EditActionError::InvalidState("undo refused".into()));
        assert_eq!(history.undo_count(), 1);
        assert_eq!(history.redo_count(), 0);
        assert!(!history.has_unsaved_changes());
        assert_eq!(project.value, 3);
    }

    #[test]
    fn failed_macro_undo_reapplies_undone_steps() {
        let (mut history, mut editor, mut project) = setup();
        let handle = history.start_macro("Twice");
        let stuck = Flaky {
            amount: 1,
            fail_undo: true,
            fail_redo: false,
        };
        history
            .add_action(Box::new(stuck), &mut editor, &mut project)
            .unwrap();
        add(&mut history, &mut editor, &mut project, 1);
        history.end_macro(handle);

        assert!(history.undo(&mut editor, &mut project).is_err());
        // the second step was undone, then redone when the first one failed
        assert_eq!(project.value, 2);
        assert_eq!(editor.value, 2);
        assert_eq!(history.undo_count(), 1);
        assert_eq!(history.redo_count(), 0);
        assert_eq!(history.undo_descriptions().next(), Some("Twice"));
    }

    #[test]
    fn failed_macro_redo_rolls_back_redone_steps() {
        let (mut history, mut editor, mut project) = setup();
        let handle = history.start_macro("Twice");
        add(&mut history, &mut editor, &mut project, 1);
        let stuck = Flaky {
            amount: 1,
            fail_undo: false,
            fail_redo: true,
        };
        history
            .add_action(Box::new(stuck), &mut editor, &mut project)
            .unwrap();
        history.end_macro(handle);

        history.undo(&mut editor, &mut project).unwrap();
        assert_eq!(project.value, 0);

        assert!(history.redo(&mut editor, &mut project).is_err());
        assert_eq!(project.value, 0);
        assert_eq!(editor.value, 0);
        assert_eq!(history.undo_count(), 0);
        assert_eq!(history.redo_count(), 1);
        assert!(history.can_redo());
    }

    // -----------------------------------------------------------------------
    // Save-point tracking
    // -----------------------------------------------------------------------

    #[test]
    fn new_history_has_no_unsaved_changes() {
        let history = EditActionHistory::<Counter>::new(DEFAULT_MAX_UNDO);
        assert!(!history.has_unsaved_changes());
    }

    #[test]
    fn undo_back_to_save_point_is_clean() {
        let (mut history, mut editor, mut project) = setup();

        add(&mut history, &mut editor, &mut project, 1);
        history.mark_saved();
        add(&mut history, &mut editor, &mut project, 2);
        assert!(history.has_unsaved_changes());

        history.undo(&mut editor, &mut project).unwrap();
        assert!(!history.has_unsaved_changes());

        history.undo(&mut editor, &mut project).unwrap();
        assert!(history.has_unsaved_changes());

        history.redo(&mut editor, &mut project).unwrap();
        assert!(!history.has_unsaved_changes());
    }

    #[test]
    fn discarding_redo_branch_loses_save_point() {
        let (mut history, mut editor, mut project) = setup();

        add(&mut history, &mut editor, &mut project, 1);
        history.mark_saved();
        history.undo(&mut editor, &mut project).unwrap();
        add(&mut history, &mut editor, &mut project, 5);
        history.undo(&mut editor, &mut project).unwrap();

        // the saved state (value 1) can no longer be reached
        assert!(history.has_unsaved_changes());
    }

    #[test]
    fn overflow_loses_save_point() {
        let mut history = EditActionHistory::new(1);
        let mut editor = Counter { value: 0 };
        let mut project = Project { value: 0 };

        add(&mut history, &mut editor, &mut project, 1);
        add(&mut history, &mut editor, &mut project, 1);
        history.undo(&mut editor, &mut project).unwrap();
        assert!(history.has_unsaved_changes());
    }

    #[test]
    fn macro_counts_as_one_step_from_save_point() {
        let (mut history, mut editor, mut project) = setup();

        let handle = history.start_macro("Two");
        add(&mut history, &mut editor, &mut project, 1);
        add(&mut history, &mut editor, &mut project, 1);
        history.end_macro(handle);
        assert!(history.has_unsaved_changes());

        history.undo(&mut editor, &mut project).unwrap();
        assert!(!history.has_unsaved_changes());
    }

    #[test]
    fn clear_at_save_point_stays_clean() {
        let (mut history, mut editor, mut project) = setup();

        add(&mut history, &mut editor, &mut project, 1);
        history.mark_saved();
        history.clear();
        assert!(!history.has_unsaved_changes());

        add(&mut history, &mut editor, &mut project, 1);
        history.clear();
        assert!(history.has_unsaved_changes());
    }
}
