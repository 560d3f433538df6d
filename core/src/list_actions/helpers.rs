//! Entry points that build list actions from the editor's current state.

use std::marker::PhantomData;

use super::multiple::{AddRemoveMultiple, EditMultipleItemsField, MoveMultiple};
use super::single::{AddRemove, EditItem, EditItemField, EditList, FieldAccessor, Move};
use super::{ListPolicy, check_capacity, check_index, editor_list};
use crate::abstract_editor::{EditActionError, EditActionResult, EditContext};
use crate::selection::ListSelection;

/// The list commands an editor offers for its current selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditListAction {
    Add,
    Clone,
    Remove,
    RaiseToTop,
    Raise,
    Lower,
    LowerToBottom,
}

impl EditListAction {
    pub const ALL: [Self; 7] = [
        Self::Add,
        Self::Clone,
        Self::Remove,
        Self::RaiseToTop,
        Self::Raise,
        Self::Lower,
        Self::LowerToBottom,
    ];

    /// Label for menus and toolbars.
    pub fn label(self) -> &'static str {
        match self {
            Self::Add => "Add",
            Self::Clone => "Clone",
            Self::Remove => "Remove",
            Self::RaiseToTop => "Raise to top",
            Self::Raise => "Raise",
            Self::Lower => "Lower",
            Self::LowerToBottom => "Lower to bottom",
        }
    }

    pub fn is_move(self) -> bool {
        matches!(
            self,
            Self::RaiseToTop | Self::Raise | Self::Lower | Self::LowerToBottom
        )
    }

    pub(super) fn move_description(self, item_name: &str) -> String {
        match self {
            Self::RaiseToTop => format!("Raise {item_name}s to top"),
            Self::LowerToBottom => format!("Lower {item_name}s to bottom"),
            _ => format!("{} {item_name}s", self.label()),
        }
    }
}

/// Computes the single-item moves that apply a move command to the sorted,
/// duplicate-free `selected` indices of a list of `len` items.
///
/// Raises are emitted front to back and lowers back to front, so no move
/// disturbs an item that still has to move. Returns `None` if the command is
/// not a move, the selection is empty, or any item would leave the list.
pub fn selection_moves(
    action: EditListAction,
    selected: &[usize],
    len: usize,
) -> Option<Vec<(usize, usize)>> {
    let (&first, &last) = (selected.first()?, selected.last()?);
    if last >= len {
        return None;
    }
    let moves: Vec<(usize, usize)> = match action {
        EditListAction::Raise if first > 0 => selected.iter().map(|&i| (i, i - 1)).collect(),
        EditListAction::Lower if last + 1 < len => {
            selected.iter().rev().map(|&i| (i, i + 1)).collect()
        }
        EditListAction::RaiseToTop => selected
            .iter()
            .enumerate()
            .map(|(n, &i)| (i, n))
            .filter(|(from, to)| from != to)
            .collect(),
        EditListAction::LowerToBottom => {
            let start = len - selected.len();
            selected
                .iter()
                .enumerate()
                .rev()
                .map(|(n, &i)| (i, start + n))
                .filter(|(from, to)| from != to)
                .collect()
        }
        _ => return None,
    };
    (!moves.is_empty()).then_some(moves)
}

/// Edit helpers for the list described by `P`.
///
/// Every helper validates its input against the editor copy before building
/// an action, returning [`EditActionError::IndexOutOfBounds`] or
/// [`EditActionError::CapacityExceeded`] without touching either copy. On
/// success they return whether an entry was recorded.
pub struct ListActions<P>(PhantomData<P>);

type Ctx<'a, 'b, P> = &'a mut EditContext<'b, <P as ListPolicy>::Editor>;

impl<P: ListPolicy> ListActions<P> {
    fn len(ctx: Ctx<'_, '_, P>, args: P::Args) -> EditActionResult<usize> {
        editor_list::<P>(ctx.editor, args)
            .map(|list| list.len())
            .ok_or_else(|| {
                EditActionError::TargetNotFound(format!(
                    "{} list {:?} in editor",
                    P::ITEM_NAME,
                    args
                ))
            })
    }

    fn editor_value(ctx: Ctx<'_, '_, P>, args: P::Args, index: usize) -> EditActionResult<P::Item> {
        let len = Self::len(ctx, args)?;
        check_index(index, len)?;
        editor_list::<P>(ctx.editor, args)
            .and_then(|list| list.get(index).cloned())
            .ok_or(EditActionError::IndexOutOfBounds { index, len })
    }

    /// The committed selection of the list, checked against its length.
    fn selected(ctx: Ctx<'_, '_, P>, args: P::Args) -> EditActionResult<(usize, Vec<usize>)> {
        let len = Self::len(ctx, args)?;
        let selected = P::selection(ctx.editor).selected_indexes(args);
        if let Some(&last) = selected.last() {
            check_index(last, len)?;
        }
        Ok((len, selected))
    }

    /// Appends a default item and selects it.
    pub fn add_item(ctx: Ctx<'_, '_, P>, args: P::Args) -> EditActionResult<bool>
    where
        P::Item: Default,
    {
        let len = Self::len(ctx, args)?;
        Self::add_item_at(ctx, args, len, P::Item::default())
    }

    /// Inserts `value` at `index` and selects it.
    pub fn add_item_at(
        ctx: Ctx<'_, '_, P>,
        args: P::Args,
        index: usize,
        value: P::Item,
    ) -> EditActionResult<bool> {
        let len = Self::len(ctx, args)?;
        check_index(index, len + 1)?;
        check_capacity(len + 1, P::MAX_SIZE)?;
        let item_index = ctx.item_index();
        ctx.add_action(AddRemove::<P>::add(item_index, args, index, value))
    }

    /// Inserts a copy of the item at `index` right after it.
    pub fn clone_item(ctx: Ctx<'_, '_, P>, args: P::Args, index: usize) -> EditActionResult<bool> {
        let value = Self::editor_value(ctx, args, index)?;
        let len = Self::len(ctx, args)?;
        check_capacity(len + 1, P::MAX_SIZE)?;
        let item_index = ctx.item_index();
        let action = AddRemove::<P>::add(item_index, args, index + 1, value)
            .with_description(format!("Clone {}", P::ITEM_NAME));
        ctx.add_action(action)
    }

    pub fn remove_item(ctx: Ctx<'_, '_, P>, args: P::Args, index: usize) -> EditActionResult<bool> {
        check_index(index, Self::len(ctx, args)?)?;
        let item_index = ctx.item_index();
        ctx.add_action(AddRemove::<P>::remove(item_index, args, index))
    }

    pub fn move_item(
        ctx: Ctx<'_, '_, P>,
        args: P::Args,
        from: usize,
        to: usize,
    ) -> EditActionResult<bool> {
        let len = Self::len(ctx, args)?;
        check_index(from, len)?;
        check_index(to, len)?;
        let item_index = ctx.item_index();
        ctx.add_action(Move::<P>::new(item_index, args, from, to))
    }

    /// Records an edit the UI already made to the editor copy of one item.
    pub fn item_edited(ctx: Ctx<'_, '_, P>, args: P::Args, index: usize) -> EditActionResult<bool> {
        let value = Self::editor_value(ctx, args, index)?;
        Self::set_item(ctx, args, index, value)
    }

    pub fn set_item(
        ctx: Ctx<'_, '_, P>,
        args: P::Args,
        index: usize,
        value: P::Item,
    ) -> EditActionResult<bool> {
        check_index(index, Self::len(ctx, args)?)?;
        let item_index = ctx.item_index();
        ctx.add_action(EditItem::<P>::new(item_index, args, index, value))
    }

    /// Records an edit the UI already made to one field of one item.
    pub fn field_edited<F>(
        ctx: Ctx<'_, '_, P>,
        args: P::Args,
        index: usize,
        field: FieldAccessor<P::Item, F>,
        field_name: &str,
    ) -> EditActionResult<bool>
    where
        F: Clone + PartialEq + std::fmt::Debug + 'static,
    {
        let mut item = Self::editor_value(ctx, args, index)?;
        let value = field(&mut item).clone();
        let item_index = ctx.item_index();
        ctx.add_action(EditItemField::<P, F>::new(
            item_index, args, index, field, value, field_name,
        ))
    }

    /// Sets one field of every selected item to `value`.
    pub fn selected_field_edited<F>(
        ctx: Ctx<'_, '_, P>,
        args: P::Args,
        field: FieldAccessor<P::Item, F>,
        value: F,
        field_name: &str,
    ) -> EditActionResult<bool>
    where
        F: Clone + PartialEq + std::fmt::Debug + 'static,
    {
        let (_, selected) = Self::selected(ctx, args)?;
        if selected.is_empty() {
            return Ok(false);
        }
        let values = selected.into_iter().map(|i| (i, value.clone())).collect();
        let item_index = ctx.item_index();
        ctx.add_action(EditMultipleItemsField::<P, F>::new(
            item_index, args, field, values, field_name,
        ))
    }

    /// Records a change the UI already made to the editor copy of the list.
    pub fn list_edited(ctx: Ctx<'_, '_, P>, args: P::Args) -> EditActionResult<bool> {
        let values = editor_list::<P>(ctx.editor, args)
            .cloned()
            .ok_or_else(|| {
                EditActionError::TargetNotFound(format!("{} list {:?}", P::ITEM_NAME, args))
            })?;
        Self::set_list(ctx, args, values)
    }

    pub fn set_list(
        ctx: Ctx<'_, '_, P>,
        args: P::Args,
        values: Vec<P::Item>,
    ) -> EditActionResult<bool> {
        check_capacity(values.len(), P::MAX_SIZE)?;
        let item_index = ctx.item_index();
        ctx.add_action(EditList::<P>::new(item_index, args, values))
    }

    /// Clones every selected item; each clone is inserted right after its
    /// original and the clones become the selection.
    pub fn clone_selected(ctx: Ctx<'_, '_, P>, args: P::Args) -> EditActionResult<bool> {
        match Self::clone_selected_action(ctx, args)? {
            Some(action) => ctx.add_action(action),
            None => Ok(false),
        }
    }

    pub(super) fn clone_selected_action(
        ctx: Ctx<'_, '_, P>,
        args: P::Args,
    ) -> EditActionResult<Option<AddRemoveMultiple<P>>> {
        let (len, selected) = Self::selected(ctx, args)?;
        if selected.is_empty() {
            return Ok(None);
        }
        check_capacity(len + selected.len(), P::MAX_SIZE)?;
        let Some(list) = editor_list::<P>(ctx.editor, args) else {
            return Ok(None);
        };
        let items = selected
            .iter()
            .enumerate()
            .map(|(n, &i)| (i + n + 1, list[i].clone()))
            .collect();
        let action = AddRemoveMultiple::<P>::add(ctx.item_index(), args, items)
            .with_description(format!("Clone {}s", P::ITEM_NAME));
        Ok(Some(action))
    }

    pub fn remove_selected(ctx: Ctx<'_, '_, P>, args: P::Args) -> EditActionResult<bool> {
        match Self::remove_selected_action(ctx, args)? {
            Some(action) => ctx.add_action(action),
            None => Ok(false),
        }
    }

    pub(super) fn remove_selected_action(
        ctx: Ctx<'_, '_, P>,
        args: P::Args,
    ) -> EditActionResult<Option<AddRemoveMultiple<P>>> {
        let (_, selected) = Self::selected(ctx, args)?;
        if selected.is_empty() {
            return Ok(None);
        }
        Ok(Some(AddRemoveMultiple::<P>::remove(
            ctx.item_index(),
            args,
            selected,
        )))
    }

    /// Raises or lowers the selected items.
    ///
    /// Nothing is recorded if any selected item would leave the list.
    pub fn move_selected(
        ctx: Ctx<'_, '_, P>,
        args: P::Args,
        action: EditListAction,
    ) -> EditActionResult<bool> {
        match Self::move_selected_action(ctx, args, action)? {
            Some(action) => ctx.add_action(action),
            None => Ok(false),
        }
    }

    pub(super) fn move_selected_action(
        ctx: Ctx<'_, '_, P>,
        args: P::Args,
        action: EditListAction,
    ) -> EditActionResult<Option<MoveMultiple<P>>> {
        let (len, selected) = Self::selected(ctx, args)?;
        let Some(moves) = selection_moves(action, &selected, len) else {
            log::trace!("{} unavailable for {:?}", action.label(), selected);
            return Ok(None);
        };
        Ok(Some(
            MoveMultiple::<P>::new(ctx.item_index(), args, moves)
                .with_description(action.move_description(P::ITEM_NAME)),
        ))
    }

    /// Returns `true` if `action` would do something for the current
    /// selection of the list at `args`.
    pub fn can_edit_list(editor: &mut P::Editor, args: P::Args, action: EditListAction) -> bool {
        let Some(len) = editor_list::<P>(editor, args).map(|list| list.len()) else {
            return false;
        };
        let selected = P::selection(editor).selected_indexes(args);
        if selected.last().is_some_and(|&last| last >= len) {
            return false;
        }
        match action {
            EditListAction::Add => len < P::MAX_SIZE,
            EditListAction::Clone => !selected.is_empty() && len + selected.len() <= P::MAX_SIZE,
            EditListAction::Remove => !selected.is_empty(),
            _ => selection_moves(action, &selected, len).is_some(),
        }
    }

    /// Runs `action` on the current selection of the list at `args`.
    pub fn edit_list(
        ctx: Ctx<'_, '_, P>,
        args: P::Args,
        action: EditListAction,
    ) -> EditActionResult<bool>
    where
        P::Item: Default,
    {
        match action {
            EditListAction::Add => Self::add_item(ctx, args),
            EditListAction::Clone => Self::clone_selected(ctx, args),
            EditListAction::Remove => Self::remove_selected(ctx, args),
            _ => Self::move_selected(ctx, args, action),
        }
    }
}
