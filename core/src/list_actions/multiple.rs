//! Actions on several items of one list at once.
//!
//! Indices are kept ascending. Insertions walk them forward, so each index
//! is the item's final position. Removals walk them in reverse, so that no
//! removal shifts an index that is still to be removed.

use std::fmt;

use super::single::FieldAccessor;
use super::{
    ListPolicy, Project, check_index, editor_insert, editor_item, editor_move, editor_remove,
    project_list,
};
use crate::abstract_editor::{EditAction, EditActionError, EditActionResult};
use crate::selection::ListSelection;

fn not_applied() -> EditActionError {
    EditActionError::InvalidState("action was never applied to the project".into())
}

/// Inserts or removes several items.
///
/// Inserted items become the selection. Undoing a removal puts the items
/// back without selecting them.
#[derive(Debug)]
pub struct AddRemoveMultiple<P: ListPolicy> {
    item_index: usize,
    args: P::Args,
    indexes: Vec<usize>,
    values: Vec<P::Item>,
    adds: bool,
    description: String,
}

impl<P: ListPolicy> AddRemoveMultiple<P> {
    /// Inserts each value at its index. Indices are final positions.
    pub fn add(item_index: usize, args: P::Args, mut items: Vec<(usize, P::Item)>) -> Self {
        items.sort_by_key(|(index, _)| *index);
        let (indexes, values) = items.into_iter().unzip();
        Self {
            item_index,
            args,
            indexes,
            values,
            adds: true,
            description: format!("Add {}s", P::ITEM_NAME),
        }
    }

    pub fn remove(item_index: usize, args: P::Args, mut indexes: Vec<usize>) -> Self {
        indexes.sort_unstable();
        indexes.dedup();
        Self {
            item_index,
            args,
            indexes,
            values: Vec::new(),
            adds: false,
            description: format!("Remove {}s", P::ITEM_NAME),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    fn editor_insert_all(&self, editor: &mut P::Editor) {
        for (&index, value) in self.indexes.iter().zip(&self.values) {
            editor_insert::<P>(editor, self.args, index, value.clone());
        }
        if self.adds {
            P::selection_mut(editor).select_items(self.args, &self.indexes);
        }
    }

    fn editor_remove_all(&self, editor: &mut P::Editor) {
        for &index in self.indexes.iter().rev() {
            editor_remove::<P>(editor, self.args, index);
        }
    }

    fn project_insert_all(&self, project: &mut Project<P>) -> EditActionResult {
        if self.values.len() != self.indexes.len() {
            return Err(not_applied());
        }
        let list = project_list::<P>(project, self.item_index, self.args)?;
        let len = list.len();
        for (n, &index) in self.indexes.iter().enumerate() {
            check_index(index, len + n + 1)?;
        }
        for (&index, value) in self.indexes.iter().zip(&self.values) {
            list.insert(index, value.clone());
        }
        Ok(())
    }

    fn project_remove_all(&self, project: &mut Project<P>) -> EditActionResult<Vec<P::Item>> {
        let list = project_list::<P>(project, self.item_index, self.args)?;
        if let Some(&last) = self.indexes.last() {
            check_index(last, list.len())?;
        }
        let mut removed: Vec<P::Item> = self
            .indexes
            .iter()
            .rev()
            .map(|&index| list.remove(index))
            .collect();
        removed.reverse();
        Ok(removed)
    }
}

impl<P: ListPolicy> EditAction<P::Editor> for AddRemoveMultiple<P> {
    fn first_do_editor_data(&mut self, editor: &mut P::Editor) {
        if self.adds {
            self.editor_insert_all(editor);
        } else {
            self.editor_remove_all(editor);
        }
    }

    fn first_do_project_file(&mut self, project: &mut Project<P>) -> EditActionResult<bool> {
        if self.indexes.is_empty() {
            return Ok(false);
        }
        if self.adds {
            self.project_insert_all(project)?;
        } else {
            self.values = self.project_remove_all(project)?;
        }
        Ok(true)
    }

    fn undo(&mut self, editor: &mut P::Editor, project: &mut Project<P>) -> EditActionResult {
        if self.adds {
            self.project_remove_all(project)?;
            self.editor_remove_all(editor);
        } else {
            self.project_insert_all(project)?;
            self.editor_insert_all(editor);
        }
        Ok(())
    }

    fn redo(&mut self, editor: &mut P::Editor, project: &mut Project<P>) -> EditActionResult {
        if self.adds {
            self.project_insert_all(project)?;
            self.editor_insert_all(editor);
        } else {
            self.project_remove_all(project)?;
            self.editor_remove_all(editor);
        }
        Ok(())
    }

    fn description(&self) -> &str {
        &self.description
    }
}

/// Applies a sequence of single-item moves as one action.
///
/// Each `(from, to)` pair is applied in order; undo applies the inverse
/// pairs in reverse order.
#[derive(Debug)]
pub struct MoveMultiple<P: ListPolicy> {
    item_index: usize,
    args: P::Args,
    moves: Vec<(usize, usize)>,
    description: String,
}

impl<P: ListPolicy> MoveMultiple<P> {
    pub fn new(item_index: usize, args: P::Args, moves: Vec<(usize, usize)>) -> Self {
        Self {
            item_index,
            args,
            moves,
            description: format!("Move {}s", P::ITEM_NAME),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn moves(&self) -> &[(usize, usize)] {
        &self.moves
    }

    fn project_apply(
        &self,
        project: &mut Project<P>,
        moves: impl Iterator<Item = (usize, usize)> + Clone,
    ) -> EditActionResult {
        let list = project_list::<P>(project, self.item_index, self.args)?;
        let len = list.len();
        for (from, to) in moves.clone() {
            check_index(from, len)?;
            check_index(to, len)?;
        }
        for (from, to) in moves {
            super::move_in_list(list, from, to);
        }
        Ok(())
    }

    fn inverse(&self) -> impl Iterator<Item = (usize, usize)> + Clone + '_ {
        self.moves.iter().rev().map(|&(from, to)| (to, from))
    }
}

impl<P: ListPolicy> EditAction<P::Editor> for MoveMultiple<P> {
    fn first_do_editor_data(&mut self, editor: &mut P::Editor) {
        for &(from, to) in &self.moves {
            editor_move::<P>(editor, self.args, from, to);
        }
    }

    fn first_do_project_file(&mut self, project: &mut Project<P>) -> EditActionResult<bool> {
        if self.moves.iter().all(|(from, to)| from == to) {
            return Ok(false);
        }
        self.project_apply(project, self.moves.iter().copied())?;
        Ok(true)
    }

    fn undo(&mut self, editor: &mut P::Editor, project: &mut Project<P>) -> EditActionResult {
        self.project_apply(project, self.inverse())?;
        for (from, to) in self.inverse() {
            editor_move::<P>(editor, self.args, from, to);
        }
        Ok(())
    }

    fn redo(&mut self, editor: &mut P::Editor, project: &mut Project<P>) -> EditActionResult {
        self.project_apply(project, self.moves.iter().copied())?;
        self.first_do_editor_data(editor);
        Ok(())
    }

    fn description(&self) -> &str {
        &self.description
    }
}

/// Replaces several whole items.
#[derive(Debug)]
pub struct EditMultipleItems<P: ListPolicy> {
    item_index: usize,
    args: P::Args,
    new: Vec<(usize, P::Item)>,
    old: Vec<P::Item>,
    description: String,
}

impl<P: ListPolicy> EditMultipleItems<P> {
    pub fn new(item_index: usize, args: P::Args, mut values: Vec<(usize, P::Item)>) -> Self {
        values.sort_by_key(|(index, _)| *index);
        Self {
            item_index,
            args,
            new: values,
            old: Vec::new(),
            description: format!("Edit {}s", P::ITEM_NAME),
        }
    }

    fn write_editor<'a>(
        &self,
        editor: &mut P::Editor,
        values: impl Iterator<Item = (usize, &'a P::Item)>,
    ) {
        for (index, value) in values {
            if let Some(item) = editor_item::<P>(editor, self.args, index) {
                *item = value.clone();
            }
        }
    }

    fn write<'a>(
        &self,
        editor: &mut P::Editor,
        project: &mut Project<P>,
        values: impl Iterator<Item = (usize, &'a P::Item)> + Clone,
    ) -> EditActionResult {
        let list = project_list::<P>(project, self.item_index, self.args)?;
        let len = list.len();
        for (index, _) in values.clone() {
            check_index(index, len)?;
        }
        for (index, value) in values.clone() {
            list[index] = value.clone();
        }
        self.write_editor(editor, values);
        Ok(())
    }

    fn old_values(&self) -> EditActionResult<impl Iterator<Item = (usize, &P::Item)> + Clone> {
        if self.old.len() != self.new.len() {
            return Err(not_applied());
        }
        Ok(self.new.iter().map(|(index, _)| *index).zip(&self.old))
    }
}

impl<P: ListPolicy> EditAction<P::Editor> for EditMultipleItems<P> {
    fn first_do_editor_data(&mut self, editor: &mut P::Editor) {
        self.write_editor(editor, self.new.iter().map(|(i, v)| (*i, v)));
    }

    fn first_do_project_file(&mut self, project: &mut Project<P>) -> EditActionResult<bool> {
        let list = project_list::<P>(project, self.item_index, self.args)?;
        for &(index, _) in &self.new {
            check_index(index, list.len())?;
        }
        if self.new.iter().all(|(index, value)| list[*index] == *value) {
            return Ok(false);
        }
        self.old = self
            .new
            .iter()
            .map(|(index, value)| std::mem::replace(&mut list[*index], value.clone()))
            .collect();
        Ok(true)
    }

    fn undo(&mut self, editor: &mut P::Editor, project: &mut Project<P>) -> EditActionResult {
        let old = self.old_values()?;
        self.write(editor, project, old)
    }

    fn redo(&mut self, editor: &mut P::Editor, project: &mut Project<P>) -> EditActionResult {
        self.write(editor, project, self.new.iter().map(|(i, v)| (*i, v)))
    }

    fn description(&self) -> &str {
        &self.description
    }
}

/// Changes one field of several items.
pub struct EditMultipleItemsField<P: ListPolicy, F> {
    item_index: usize,
    args: P::Args,
    field: FieldAccessor<P::Item, F>,
    new: Vec<(usize, F)>,
    old: Vec<F>,
    description: String,
}

impl<P: ListPolicy, F> EditMultipleItemsField<P, F>
where
    F: Clone + PartialEq + fmt::Debug + 'static,
{
    pub fn new(
        item_index: usize,
        args: P::Args,
        field: FieldAccessor<P::Item, F>,
        mut values: Vec<(usize, F)>,
        field_name: &str,
    ) -> Self {
        values.sort_by_key(|(index, _)| *index);
        Self {
            item_index,
            args,
            field,
            new: values,
            old: Vec::new(),
            description: format!("Edit {} {}", P::ITEM_NAME, field_name),
        }
    }

    fn write_editor<'a>(&self, editor: &mut P::Editor, values: impl Iterator<Item = (usize, &'a F)>) {
        for (index, value) in values {
            if let Some(item) = editor_item::<P>(editor, self.args, index) {
                *(self.field)(item) = value.clone();
            }
        }
    }

    fn write<'a>(
        &self,
        editor: &mut P::Editor,
        project: &mut Project<P>,
        values: impl Iterator<Item = (usize, &'a F)> + Clone,
    ) -> EditActionResult {
        let list = project_list::<P>(project, self.item_index, self.args)?;
        let len = list.len();
        for (index, _) in values.clone() {
            check_index(index, len)?;
        }
        for (index, value) in values.clone() {
            *(self.field)(&mut list[index]) = value.clone();
        }
        self.write_editor(editor, values);
        Ok(())
    }
}

impl<P: ListPolicy, F: fmt::Debug> fmt::Debug for EditMultipleItemsField<P, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditMultipleItemsField")
            .field("item_index", &self.item_index)
            .field("args", &self.args)
            .field("new", &self.new)
            .field("old", &self.old)
            .finish()
    }
}

impl<P: ListPolicy, F> EditAction<P::Editor> for EditMultipleItemsField<P, F>
where
    F: Clone + PartialEq + fmt::Debug + 'static,
{
    fn first_do_editor_data(&mut self, editor: &mut P::Editor) {
        self.write_editor(editor, self.new.iter().map(|(i, v)| (*i, v)));
    }

    fn first_do_project_file(&mut self, project: &mut Project<P>) -> EditActionResult<bool> {
        let list = project_list::<P>(project, self.item_index, self.args)?;
        for &(index, _) in &self.new {
            check_index(index, list.len())?;
        }
        let field = self.field;
        if self
            .new
            .iter()
            .all(|(index, value)| *field(&mut list[*index]) == *value)
        {
            return Ok(false);
        }
        self.old = self
            .new
            .iter()
            .map(|(index, value)| std::mem::replace(field(&mut list[*index]), value.clone()))
            .collect();
        Ok(true)
    }

    fn undo(&mut self, editor: &mut P::Editor, project: &mut Project<P>) -> EditActionResult {
        if self.old.len() != self.new.len() {
            return Err(not_applied());
        }
        let old = self.new.iter().map(|(index, _)| *index).zip(&self.old);
        self.write(editor, project, old)
    }

    fn redo(&mut self, editor: &mut P::Editor, project: &mut Project<P>) -> EditActionResult {
        self.write(editor, project, self.new.iter().map(|(i, v)| (*i, v)))
    }

    fn description(&self) -> &str {
        &self.description
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::list_actions::test_support::{Fixture, Frame, Frames, frame};
    use crate::selection::SelectionModel;

    fn duration(frame: &mut Frame) -> &mut u32 {
        &mut frame.duration
    }

    #[test]
    fn add_multiple_selects_new_items() {
        let mut fx = Fixture::new(&["a", "b"]);
        let action =
            AddRemoveMultiple::<Frames>::add(1, (), vec![(3, frame("y")), (0, frame("x"))]);
        fx.ctx().add_action(action).unwrap();
        fx.editor.selection.update();

        assert_eq!(fx.project_names(), vec!["x", "a", "b", "y"]);
        assert_eq!(fx.editor_names(), vec!["x", "a", "b", "y"]);
        assert_eq!(fx.selected(), vec![0, 3]);

        fx.undo();
        assert_eq!(fx.project_names(), vec!["a", "b"]);
    }

    #[test]
    fn remove_multiple_walks_in_reverse() {
        let mut fx = Fixture::new(&["a", "b", "c", "d", "e"]);
        fx.select(&[1, 2, 3]);

        let action = AddRemoveMultiple::<Frames>::remove(1, (), vec![3, 1]);
        fx.ctx().add_action(action).unwrap();
        assert_eq!(fx.project_names(), vec!["a", "c", "e"]);
        assert_eq!(fx.editor_names(), vec!["a", "c", "e"]);
        assert_eq!(fx.selected(), vec![1]);

        // restored items are not selected, "c" keeps its selection
        fx.undo();
        assert_eq!(fx.project_names(), vec!["a", "b", "c", "d", "e"]);
        assert_eq!(fx.selected(), vec![2]);
    }

    #[test]
    fn remove_out_of_bounds_leaves_project_untouched() {
        let mut fx = Fixture::new(&["a", "b"]);
        let action = AddRemoveMultiple::<Frames>::remove(1, (), vec![0, 5]);
        let err = fx.ctx().add_action(action).unwrap_err();
        assert_eq!(err, EditActionError::IndexOutOfBounds { index: 5, len: 2 });
        assert_eq!(fx.project_names(), vec!["a", "b"]);
    }

    #[test]
    fn move_multiple_undoes_in_reverse() {
        let mut fx = Fixture::new(&["a", "b", "c", "d"]);
        let action = MoveMultiple::<Frames>::new(1, (), vec![(3, 0), (3, 1)]);
        fx.ctx().add_action(action).unwrap();
        assert_eq!(fx.project_names(), vec!["d", "c", "a", "b"]);

        fx.undo();
        assert_eq!(fx.project_names(), vec!["a", "b", "c", "d"]);
        assert_eq!(fx.editor_names(), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn edit_multiple_skips_unchanged() {
        let mut fx = Fixture::new(&["a", "b"]);
        let same = EditMultipleItems::<Frames>::new(1, (), vec![(0, frame("a")), (1, frame("b"))]);
        assert!(!fx.ctx().add_action(same).unwrap());

        let changed = EditMultipleItems::<Frames>::new(1, (), vec![(1, frame("q")), (0, frame("a"))]);
        assert!(fx.ctx().add_action(changed).unwrap());
        assert_eq!(fx.project_names(), vec!["a", "q"]);

        fx.undo();
        assert_eq!(fx.editor_names(), vec!["a", "b"]);
        fx.redo();
        assert_eq!(fx.editor_names(), vec!["a", "q"]);
    }

    #[test]
    fn edit_multiple_fields() {
        let mut fx = Fixture::new(&["a", "b", "c"]);
        let action = EditMultipleItemsField::<Frames, u32>::new(
            1,
            (),
            duration,
            vec![(0, 4), (2, 8)],
            "duration",
        );
        fx.ctx().add_action(action).unwrap();
        let durations: Vec<u32> = fx.project.sprites[1].frames.iter().map(|f| f.duration).collect();
        assert_eq!(durations, vec![4, 1, 8]);

        fx.undo();
        let durations: Vec<u32> = fx.editor.sprite.frames.iter().map(|f| f.duration).collect();
        assert_eq!(durations, vec![1, 1, 1]);
    }
}
