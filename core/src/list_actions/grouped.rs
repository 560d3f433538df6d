use std::marker::PhantomData;

use super::helpers::{EditListAction, ListActions};
use super::{ListPolicy, editor_list};
use crate::abstract_editor::{EditAction, EditActionResult, EditContext};
use crate::selection::{GroupMultipleSelection, ListSelection};

type Ctx<'a, 'b, P> = &'a mut EditContext<'b, <P as ListPolicy>::Editor>;

/// List edits that span every group of a [`GroupMultipleSelection`].
///
/// Each command is validated for every selected group first; if any group
/// fails, nothing is recorded. The per-group actions are then recorded
/// inside one macro so the whole edit undoes in one step.
pub struct GroupedListActions<P>(PhantomData<P>);

impl<P> GroupedListActions<P>
where
    P: ListPolicy<Args = usize, Selection = GroupMultipleSelection>,
{
    fn selected_groups(ctx: Ctx<'_, '_, P>) -> Vec<usize> {
        P::selection(ctx.editor).selected_groups().collect()
    }

    fn record<A>(ctx: Ctx<'_, '_, P>, description: String, actions: Vec<A>) -> EditActionResult<bool>
    where
        A: EditAction<P::Editor> + 'static,
    {
        if actions.is_empty() {
            return Ok(false);
        }
        let handle = ctx.start_macro(description);
        let result = Self::add_all(ctx, actions);
        ctx.end_macro(handle);
        result
    }

    fn add_all<A>(ctx: Ctx<'_, '_, P>, actions: Vec<A>) -> EditActionResult<bool>
    where
        A: EditAction<P::Editor> + 'static,
    {
        let mut changed = false;
        for action in actions {
            changed |= ctx.add_action(action)?;
        }
        Ok(changed)
    }

    /// Clones the selected items of every group.
    pub fn clone_selected(ctx: Ctx<'_, '_, P>) -> EditActionResult<bool> {
        let mut actions = Vec::new();
        for group in Self::selected_groups(ctx) {
            if let Some(action) = ListActions::<P>::clone_selected_action(ctx, group)? {
                actions.push(action);
            }
        }
        Self::record(ctx, format!("Clone {}s", P::ITEM_NAME), actions)
    }

    /// Removes the selected items of every group.
    pub fn remove_selected(ctx: Ctx<'_, '_, P>) -> EditActionResult<bool> {
        let mut actions = Vec::new();
        for group in Self::selected_groups(ctx) {
            if let Some(action) = ListActions::<P>::remove_selected_action(ctx, group)? {
                actions.push(action);
            }
        }
        Self::record(ctx, format!("Remove {}s", P::ITEM_NAME), actions)
    }

    /// Moves the selected items of every group.
    ///
    /// Nothing is recorded unless every selected group can move.
    pub fn move_selected(ctx: Ctx<'_, '_, P>, action: EditListAction) -> EditActionResult<bool> {
        let mut actions = Vec::new();
        for group in Self::selected_groups(ctx) {
            match ListActions::<P>::move_selected_action(ctx, group, action)? {
                Some(a) => actions.push(a),
                None => return Ok(false),
            }
        }
        Self::record(ctx, action.move_description(P::ITEM_NAME), actions)
    }

    /// Returns `true` if `action` is available for every selected group.
    ///
    /// `Add` targets the lowest selected group.
    pub fn can_edit_list(editor: &mut P::Editor, action: EditListAction) -> bool {
        let groups: Vec<usize> = P::selection(editor).selected_groups().collect();
        match action {
            EditListAction::Add => groups.first().is_some_and(|&group| {
                editor_list::<P>(editor, group).is_some_and(|list| list.len() < P::MAX_SIZE)
            }),
            _ => {
                !groups.is_empty()
                    && groups
                        .iter()
                        .all(|&group| ListActions::<P>::can_edit_list(editor, group, action))
            }
        }
    }

    /// Runs `action` on the grouped selection.
    pub fn edit_list(ctx: Ctx<'_, '_, P>, action: EditListAction) -> EditActionResult<bool>
    where
        P::Item: Default,
    {
        match action {
            EditListAction::Add => match P::selection(ctx.editor).selected_list() {
                Some(group) => ListActions::<P>::add_item(ctx, group),
                None => Ok(false),
            },
            EditListAction::Clone => Self::clone_selected(ctx),
            EditListAction::Remove => Self::remove_selected(ctx),
            _ => Self::move_selected(ctx, action),
        }
    }
}
