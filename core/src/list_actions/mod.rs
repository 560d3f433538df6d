//! Generic edit actions over lists and grids.
//!
//! Editors hold many lists (animation frames, palette colors, room entities,
//! script statements) that all need the same edits: add, clone, remove,
//! reorder, and change one item or one field of it. Instead of one action
//! type per list, a list describes itself once through a [`ListPolicy`] and
//! reuses the actions here:
//!
//! ```ignore
//! #[derive(Debug)]
//! struct FramesPolicy;
//!
//! impl ListPolicy for FramesPolicy {
//!     type Editor = SpriteEditor;
//!     type Data = Sprite;
//!     type Item = Frame;
//!     type Args = ();
//!     type Selection = MultipleSelection;
//!
//!     const MAX_SIZE: usize = 64;
//!     const ITEM_NAME: &'static str = "frame";
//!
//!     fn editor_data(editor: &mut SpriteEditor) -> &mut Sprite { &mut editor.sprite }
//!     fn project_data(project: &mut Project, index: usize) -> Option<&mut Sprite> {
//!         project.sprites.get_mut(index)
//!     }
//!     fn list(sprite: &mut Sprite, _: ()) -> Option<&mut Vec<Frame>> { Some(&mut sprite.frames) }
//!     fn selection(editor: &SpriteEditor) -> &MultipleSelection { &editor.frame_sel }
//!     fn selection_mut(editor: &mut SpriteEditor) -> &mut MultipleSelection { &mut editor.frame_sel }
//! }
//!
//! ListActions::<FramesPolicy>::clone_selected(&mut ctx, ())?;
//! ```
//!
//! Actions address their list by the editor's
//! [`item_index`](crate::abstract_editor::Editable::item_index) and the
//! policy's `Args`, so the same action replays against either copy.

mod grid;
mod grouped;
mod helpers;
mod multiple;
mod single;

use std::fmt;

use crate::abstract_editor::{EditActionError, EditActionResult, Editable};
use crate::selection::ListSelection;

pub use grid::{EditGrid, EditGridRegion, GridActions, GridPolicy};
pub use grouped::GroupedListActions;
pub use helpers::{EditListAction, ListActions, selection_moves};
pub use multiple::{AddRemoveMultiple, EditMultipleItems, EditMultipleItemsField, MoveMultiple};
pub use single::{AddRemove, EditItem, EditItemField, EditList, FieldAccessor, Move};

/// Binds the generic list actions to one concrete list.
///
/// Implemented by a zero-sized marker type per list.
pub trait ListPolicy: fmt::Debug + 'static {
    /// The editor owning the editor copy of the list.
    type Editor: Editable;
    /// The resource holding the list, present in both copies.
    type Data;
    type Item: Clone + PartialEq + fmt::Debug + 'static;
    /// Addresses the list inside [`Data`](Self::Data): `()` for a top-level
    /// list, a parent index or tree path for nested lists.
    type Args: Copy + PartialEq + fmt::Debug + 'static;
    type Selection: ListSelection<Self::Args>;

    /// The list never grows beyond this many items.
    const MAX_SIZE: usize;
    /// Lower-case item name used in action descriptions.
    const ITEM_NAME: &'static str;

    fn editor_data(editor: &mut Self::Editor) -> &mut Self::Data;

    fn project_data(
        project: &mut <Self::Editor as Editable>::Project,
        item_index: usize,
    ) -> Option<&mut Self::Data>;

    fn list(data: &mut Self::Data, args: Self::Args) -> Option<&mut Vec<Self::Item>>;

    fn selection(editor: &Self::Editor) -> &Self::Selection;

    fn selection_mut(editor: &mut Self::Editor) -> &mut Self::Selection;
}

type Project<P> = <<P as ListPolicy>::Editor as Editable>::Project;

/// The editor copy of the list, or `None` (logged) if it cannot be found.
fn editor_list<P: ListPolicy>(
    editor: &mut P::Editor,
    args: P::Args,
) -> Option<&mut Vec<P::Item>> {
    let list = P::list(P::editor_data(editor), args);
    if list.is_none() {
        log::warn!("Editor has no {} list at {:?}", P::ITEM_NAME, args);
    }
    list
}

/// The project copy of the list.
fn project_list<P: ListPolicy>(
    project: &mut Project<P>,
    item_index: usize,
    args: P::Args,
) -> EditActionResult<&mut Vec<P::Item>> {
    P::project_data(project, item_index)
        .and_then(|data| P::list(data, args))
        .ok_or_else(|| {
            EditActionError::TargetNotFound(format!(
                "{} list {:?} of resource {}",
                P::ITEM_NAME,
                args,
                item_index
            ))
        })
}

fn project_item<P: ListPolicy>(
    project: &mut Project<P>,
    item_index: usize,
    args: P::Args,
    index: usize,
) -> EditActionResult<&mut P::Item> {
    let list = project_list::<P>(project, item_index, args)?;
    let len = list.len();
    list.get_mut(index)
        .ok_or(EditActionError::IndexOutOfBounds { index, len })
}

fn project_insert<P: ListPolicy>(
    project: &mut Project<P>,
    item_index: usize,
    args: P::Args,
    index: usize,
    value: P::Item,
) -> EditActionResult {
    let list = project_list::<P>(project, item_index, args)?;
    check_index(index, list.len() + 1)?;
    list.insert(index, value);
    Ok(())
}

fn project_remove<P: ListPolicy>(
    project: &mut Project<P>,
    item_index: usize,
    args: P::Args,
    index: usize,
) -> EditActionResult<P::Item> {
    let list = project_list::<P>(project, item_index, args)?;
    check_index(index, list.len())?;
    Ok(list.remove(index))
}

fn project_move<P: ListPolicy>(
    project: &mut Project<P>,
    item_index: usize,
    args: P::Args,
    from: usize,
    to: usize,
) -> EditActionResult {
    let list = project_list::<P>(project, item_index, args)?;
    check_index(from, list.len())?;
    check_index(to, list.len())?;
    move_in_list(list, from, to);
    Ok(())
}

/// Inserts into the editor copy and renumbers the selection.
fn editor_insert<P: ListPolicy>(
    editor: &mut P::Editor,
    args: P::Args,
    index: usize,
    value: P::Item,
) {
    if let Some(list) = editor_list::<P>(editor, args)
        && index <= list.len()
    {
        list.insert(index, value);
    }
    P::selection_mut(editor).item_added(args, index);
}

/// Removes from the editor copy and renumbers the selection.
fn editor_remove<P: ListPolicy>(editor: &mut P::Editor, args: P::Args, index: usize) {
    if let Some(list) = editor_list::<P>(editor, args)
        && index < list.len()
    {
        list.remove(index);
    }
    P::selection_mut(editor).item_removed(args, index);
}

/// Moves within the editor copy and renumbers the selection.
fn editor_move<P: ListPolicy>(editor: &mut P::Editor, args: P::Args, from: usize, to: usize) {
    if let Some(list) = editor_list::<P>(editor, args)
        && from < list.len()
        && to < list.len()
    {
        move_in_list(list, from, to);
    }
    P::selection_mut(editor).item_moved(args, from, to);
}

fn editor_item<P: ListPolicy>(
    editor: &mut P::Editor,
    args: P::Args,
    index: usize,
) -> Option<&mut P::Item> {
    editor_list::<P>(editor, args).and_then(|list| list.get_mut(index))
}

fn check_index(index: usize, len: usize) -> EditActionResult {
    if index < len {
        Ok(())
    } else {
        Err(EditActionError::IndexOutOfBounds { index, len })
    }
}

fn check_capacity(requested: usize, max: usize) -> EditActionResult {
    if requested <= max {
        Ok(())
    } else {
        Err(EditActionError::CapacityExceeded { requested, max })
    }
}

/// Moves the item at `from` to `to`, shifting the items in between.
fn move_in_list<T>(list: &mut Vec<T>, from: usize, to: usize) {
    let item = list.remove(from);
    list.insert(to, item);
}
