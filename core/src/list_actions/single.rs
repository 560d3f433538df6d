//! Actions on one item of a list, and on a whole list.

use std::fmt;

use super::{
    ListPolicy, Project, editor_insert, editor_item, editor_list, editor_move, editor_remove,
    project_insert, project_item, project_list, project_move, project_remove,
};
use crate::abstract_editor::{EditAction, EditActionError, EditActionResult};
use crate::selection::{ListSelection, SelectionModel};

fn not_applied() -> EditActionError {
    EditActionError::InvalidState("action was never applied to the project".into())
}

/// Inserts or removes one item.
///
/// An added item becomes the selection. A removed item's value is captured
/// from the project copy so that undo can put it back; putting it back only
/// renumbers the selection around it.
#[derive(Debug)]
pub struct AddRemove<P: ListPolicy> {
    item_index: usize,
    args: P::Args,
    index: usize,
    value: Option<P::Item>,
    adds: bool,
    description: String,
}

impl<P: ListPolicy> AddRemove<P> {
    pub fn add(item_index: usize, args: P::Args, index: usize, value: P::Item) -> Self {
        Self {
            item_index,
            args,
            index,
            value: Some(value),
            adds: true,
            description: format!("Add {}", P::ITEM_NAME),
        }
    }

    pub fn remove(item_index: usize, args: P::Args, index: usize) -> Self {
        Self {
            item_index,
            args,
            index,
            value: None,
            adds: false,
            description: format!("Remove {}", P::ITEM_NAME),
        }
    }

    /// Overrides the history description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    fn insert(&self, editor: &mut P::Editor, project: &mut Project<P>) -> EditActionResult {
        let value = self.value.clone().ok_or_else(not_applied)?;
        project_insert::<P>(project, self.item_index, self.args, self.index, value.clone())?;
        editor_insert::<P>(editor, self.args, self.index, value);
        if self.adds {
            P::selection_mut(editor).select_item(self.args, self.index);
        }
        Ok(())
    }

    fn take_out(&self, editor: &mut P::Editor, project: &mut Project<P>) -> EditActionResult {
        project_remove::<P>(project, self.item_index, self.args, self.index)?;
        editor_remove::<P>(editor, self.args, self.index);
        Ok(())
    }
}

impl<P: ListPolicy> EditAction<P::Editor> for AddRemove<P> {
    fn first_do_editor_data(&mut self, editor: &mut P::Editor) {
        if !self.adds {
            editor_remove::<P>(editor, self.args, self.index);
        } else if let Some(value) = &self.value {
            editor_insert::<P>(editor, self.args, self.index, value.clone());
            P::selection_mut(editor).select_item(self.args, self.index);
        }
    }

    fn first_do_project_file(&mut self, project: &mut Project<P>) -> EditActionResult<bool> {
        if self.adds {
            let value = self.value.clone().ok_or_else(not_applied)?;
            project_insert::<P>(project, self.item_index, self.args, self.index, value)?;
        } else {
            let removed = project_remove::<P>(project, self.item_index, self.args, self.index)?;
            self.value = Some(removed);
        }
        Ok(true)
    }

    fn undo(&mut self, editor: &mut P::Editor, project: &mut Project<P>) -> EditActionResult {
        if self.adds {
            self.take_out(editor, project)
        } else {
            self.insert(editor, project)
        }
    }

    fn redo(&mut self, editor: &mut P::Editor, project: &mut Project<P>) -> EditActionResult {
        if self.adds {
            self.insert(editor, project)
        } else {
            self.take_out(editor, project)
        }
    }

    fn description(&self) -> &str {
        &self.description
    }
}

/// Moves one item from `from` to `to`.
#[derive(Debug)]
pub struct Move<P: ListPolicy> {
    item_index: usize,
    args: P::Args,
    from: usize,
    to: usize,
    description: String,
}

impl<P: ListPolicy> Move<P> {
    pub fn new(item_index: usize, args: P::Args, from: usize, to: usize) -> Self {
        Self {
            item_index,
            args,
            from,
            to,
            description: format!("Move {}", P::ITEM_NAME),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

impl<P: ListPolicy> EditAction<P::Editor> for Move<P> {
    fn first_do_editor_data(&mut self, editor: &mut P::Editor) {
        editor_move::<P>(editor, self.args, self.from, self.to);
    }

    fn first_do_project_file(&mut self, project: &mut Project<P>) -> EditActionResult<bool> {
        if self.from == self.to {
            return Ok(false);
        }
        project_move::<P>(project, self.item_index, self.args, self.from, self.to)?;
        Ok(true)
    }

    fn undo(&mut self, editor: &mut P::Editor, project: &mut Project<P>) -> EditActionResult {
        project_move::<P>(project, self.item_index, self.args, self.to, self.from)?;
        editor_move::<P>(editor, self.args, self.to, self.from);
        Ok(())
    }

    fn redo(&mut self, editor: &mut P::Editor, project: &mut Project<P>) -> EditActionResult {
        project_move::<P>(project, self.item_index, self.args, self.from, self.to)?;
        editor_move::<P>(editor, self.args, self.from, self.to);
        Ok(())
    }

    fn description(&self) -> &str {
        &self.description
    }
}

/// Replaces one whole item.
#[derive(Debug)]
pub struct EditItem<P: ListPolicy> {
    item_index: usize,
    args: P::Args,
    index: usize,
    new: P::Item,
    old: Option<P::Item>,
    description: String,
}

impl<P: ListPolicy> EditItem<P> {
    pub fn new(item_index: usize, args: P::Args, index: usize, value: P::Item) -> Self {
        Self {
            item_index,
            args,
            index,
            new: value,
            old: None,
            description: format!("Edit {}", P::ITEM_NAME),
        }
    }

    fn write(
        &self,
        editor: &mut P::Editor,
        project: &mut Project<P>,
        value: &P::Item,
    ) -> EditActionResult {
        *project_item::<P>(project, self.item_index, self.args, self.index)? = value.clone();
        if let Some(item) = editor_item::<P>(editor, self.args, self.index) {
            *item = value.clone();
        }
        Ok(())
    }
}

impl<P: ListPolicy> EditAction<P::Editor> for EditItem<P> {
    fn first_do_editor_data(&mut self, editor: &mut P::Editor) {
        if let Some(item) = editor_item::<P>(editor, self.args, self.index) {
            *item = self.new.clone();
        }
    }

    fn first_do_project_file(&mut self, project: &mut Project<P>) -> EditActionResult<bool> {
        let item = project_item::<P>(project, self.item_index, self.args, self.index)?;
        if *item == self.new {
            return Ok(false);
        }
        self.old = Some(std::mem::replace(item, self.new.clone()));
        Ok(true)
    }

    fn undo(&mut self, editor: &mut P::Editor, project: &mut Project<P>) -> EditActionResult {
        let old = self.old.as_ref().ok_or_else(not_applied)?;
        self.write(editor, project, old)
    }

    fn redo(&mut self, editor: &mut P::Editor, project: &mut Project<P>) -> EditActionResult {
        self.write(editor, project, &self.new)
    }

    fn description(&self) -> &str {
        &self.description
    }
}

/// Accessor for one field of a list item.
pub type FieldAccessor<I, F> = fn(&mut I) -> &mut F;

/// Changes one field of one item, leaving the rest of the item alone.
pub struct EditItemField<P: ListPolicy, F> {
    item_index: usize,
    args: P::Args,
    index: usize,
    field: FieldAccessor<P::Item, F>,
    new: F,
    old: Option<F>,
    description: String,
}

impl<P: ListPolicy, F> EditItemField<P, F>
where
    F: Clone + PartialEq + fmt::Debug + 'static,
{
    pub fn new(
        item_index: usize,
        args: P::Args,
        index: usize,
        field: FieldAccessor<P::Item, F>,
        value: F,
        field_name: &str,
    ) -> Self {
        Self {
            item_index,
            args,
            index,
            field,
            new: value,
            old: None,
            description: format!("Edit {} {}", P::ITEM_NAME, field_name),
        }
    }

    fn write(&self, editor: &mut P::Editor, project: &mut Project<P>, value: &F) -> EditActionResult {
        let item = project_item::<P>(project, self.item_index, self.args, self.index)?;
        *(self.field)(item) = value.clone();
        if let Some(item) = editor_item::<P>(editor, self.args, self.index) {
            *(self.field)(item) = value.clone();
        }
        Ok(())
    }
}

impl<P: ListPolicy, F: fmt::Debug> fmt::Debug for EditItemField<P, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditItemField")
            .field("item_index", &self.item_index)
            .field("args", &self.args)
            .field("index", &self.index)
            .field("new", &self.new)
            .field("old", &self.old)
            .finish()
    }
}

impl<P: ListPolicy, F> EditAction<P::Editor> for EditItemField<P, F>
where
    F: Clone + PartialEq + fmt::Debug + 'static,
{
    fn first_do_editor_data(&mut self, editor: &mut P::Editor) {
        if let Some(item) = editor_item::<P>(editor, self.args, self.index) {
            *(self.field)(item) = self.new.clone();
        }
    }

    fn first_do_project_file(&mut self, project: &mut Project<P>) -> EditActionResult<bool> {
        let item = project_item::<P>(project, self.item_index, self.args, self.index)?;
        let field = (self.field)(item);
        if *field == self.new {
            return Ok(false);
        }
        self.old = Some(std::mem::replace(field, self.new.clone()));
        Ok(true)
    }

    fn undo(&mut self, editor: &mut P::Editor, project: &mut Project<P>) -> EditActionResult {
        let old = self.old.as_ref().ok_or_else(not_applied)?;
        self.write(editor, project, old)
    }

    fn redo(&mut self, editor: &mut P::Editor, project: &mut Project<P>) -> EditActionResult {
        self.write(editor, project, &self.new)
    }

    fn description(&self) -> &str {
        &self.description
    }
}

/// Replaces a whole list.
///
/// The selection is cleared whenever the list length changes, since its
/// indices can no longer be trusted.
#[derive(Debug)]
pub struct EditList<P: ListPolicy> {
    item_index: usize,
    args: P::Args,
    new: Vec<P::Item>,
    old: Option<Vec<P::Item>>,
    description: String,
}

impl<P: ListPolicy> EditList<P> {
    pub fn new(item_index: usize, args: P::Args, values: Vec<P::Item>) -> Self {
        Self {
            item_index,
            args,
            new: values,
            old: None,
            description: format!("Edit {} list", P::ITEM_NAME),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    fn write_editor(&self, editor: &mut P::Editor, values: &[P::Item]) {
        let resized = match editor_list::<P>(editor, self.args) {
            Some(list) => {
                let resized = list.len() != values.len();
                *list = values.to_vec();
                resized
            }
            None => false,
        };
        if resized {
            P::selection_mut(editor).clear_selection();
        }
    }

    fn write(
        &self,
        editor: &mut P::Editor,
        project: &mut Project<P>,
        values: &[P::Item],
    ) -> EditActionResult {
        *project_list::<P>(project, self.item_index, self.args)? = values.to_vec();
        self.write_editor(editor, values);
        Ok(())
    }
}

impl<P: ListPolicy> EditAction<P::Editor> for EditList<P> {
    fn first_do_editor_data(&mut self, editor: &mut P::Editor) {
        self.write_editor(editor, &self.new);
    }

    fn first_do_project_file(&mut self, project: &mut Project<P>) -> EditActionResult<bool> {
        let list = project_list::<P>(project, self.item_index, self.args)?;
        if *list == self.new {
            return Ok(false);
        }
        self.old = Some(std::mem::replace(list, self.new.clone()));
        Ok(true)
    }

    fn undo(&mut self, editor: &mut P::Editor, project: &mut Project<P>) -> EditActionResult {
        let old = self.old.as_deref().ok_or_else(not_applied)?;
        self.write(editor, project, old)
    }

    fn redo(&mut self, editor: &mut P::Editor, project: &mut Project<P>) -> EditActionResult {
        self.write(editor, project, &self.new)
    }

    fn description(&self) -> &str {
        &self.description
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::list_actions::test_support::{Fixture, Frame, Frames, frame};

    fn duration(frame: &mut Frame) -> &mut u32 {
        &mut frame.duration
    }

    #[test]
    fn add_selects_and_undo_removes() {
        let mut fx = Fixture::new(&["a", "b"]);
        fx.select(&[1]);

        let added = fx
            .ctx()
            .add_action(AddRemove::<Frames>::add(1, (), 1, frame("x")))
            .unwrap();
        assert!(added);
        fx.editor.selection.update();
        assert_eq!(fx.project_names(), vec!["a", "x", "b"]);
        assert_eq!(fx.editor_names(), vec!["a", "x", "b"]);
        assert_eq!(fx.selected(), vec![1]);

        fx.undo();
        assert_eq!(fx.project_names(), vec!["a", "b"]);
        assert_eq!(fx.editor_names(), vec!["a", "b"]);
    }

    #[test]
    fn remove_captures_project_value() {
        let mut fx = Fixture::new(&["a", "b", "c", "d"]);
        fx.project.sprites[1].frames[1].duration = 9;
        fx.select(&[1, 3]);

        fx.ctx()
            .add_action(AddRemove::<Frames>::remove(1, (), 1))
            .unwrap();
        fx.editor.selection.update();
        assert_eq!(fx.project_names(), vec!["a", "c", "d"]);
        assert_eq!(fx.editor.selection.mask(), 0b0100);

        fx.undo();
        assert_eq!(fx.editor.sprite.frames[1].duration, 9);
        assert_eq!(fx.project.sprites[1].frames[1].duration, 9);
        // the restored frame is not selected, "d" stays selected
        assert_eq!(fx.selected(), vec![3]);

        fx.redo();
        assert_eq!(fx.editor_names(), vec!["a", "c", "d"]);
    }

    #[test]
    fn move_to_same_index_is_discarded() {
        let mut fx = Fixture::new(&["a", "b"]);
        let moved = fx.ctx().add_action(Move::<Frames>::new(1, (), 1, 1)).unwrap();
        assert!(!moved);
        assert!(!fx.history.can_undo());
    }

    #[test]
    fn move_renumbers_selection() {
        let mut fx = Fixture::new(&["a", "b", "c"]);
        fx.select(&[0]);

        fx.ctx().add_action(Move::<Frames>::new(1, (), 0, 2)).unwrap();
        assert_eq!(fx.project_names(), vec!["b", "c", "a"]);
        assert_eq!(fx.selected(), vec![2]);

        fx.undo();
        assert_eq!(fx.project_names(), vec!["a", "b", "c"]);
        assert_eq!(fx.selected(), vec![0]);
    }

    #[test]
    fn edit_item_to_same_value_records_nothing() {
        let mut fx = Fixture::new(&["a"]);
        let changed = fx
            .ctx()
            .add_action(EditItem::<Frames>::new(1, (), 0, frame("a")))
            .unwrap();
        assert!(!changed);
        assert!(!fx.history.can_undo());
    }

    #[test]
    fn edit_field_round_trip() {
        let mut fx = Fixture::new(&["a", "b"]);
        let action = EditItemField::<Frames, u32>::new(
            1,
            (),
            1,
            duration,
            12,
            "duration",
        );
        assert_eq!(action.description(), "Edit frame duration");
        fx.ctx().add_action(action).unwrap();
        assert_eq!(fx.project.sprites[1].frames[1].duration, 12);

        fx.undo();
        assert_eq!(fx.project.sprites[1].frames[1].duration, 1);
        assert_eq!(fx.editor.sprite.frames[1].duration, 1);

        fx.redo();
        assert_eq!(fx.editor.sprite.frames[1].duration, 12);
    }

    #[test]
    fn edit_list_clears_selection_on_resize() {
        let mut fx = Fixture::new(&["a", "b"]);
        fx.select(&[1]);

        fx.ctx()
            .add_action(EditList::<Frames>::new(1, (), vec![frame("z")]))
            .unwrap();
        fx.editor.selection.update();
        assert_eq!(fx.project_names(), vec!["z"]);
        assert!(fx.selected().is_empty());

        fx.undo();
        assert_eq!(fx.project_names(), vec!["a", "b"]);
    }

    #[test]
    fn missing_project_resource_fails() {
        let mut fx = Fixture::new(&["a"]);
        let err = fx
            .ctx()
            .add_action(AddRemove::<Frames>::remove(7, (), 0))
            .unwrap_err();
        assert!(matches!(err, EditActionError::TargetNotFound(_)));
        assert!(!fx.history.can_undo());
    }
}
