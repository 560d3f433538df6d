//! Selection models for list- and tree-shaped editor data.
//!
//! Every model holds a *committed* value, read by everything drawn during the
//! current frame, and a *pending* value written by user interaction. The
//! host calls [`SelectionModel::update`] once at the end of each frame to
//! commit pending to committed, so that several widgets touching one selection
//! within a frame all see the same state.
//!
//! Structural changes to the underlying list (insertion, removal, move) are
//! applied to both halves immediately through [`ListSelection`], because the
//! indices in either half would otherwise point at the wrong items.
//!
//! | Model | Addresses |
//! |---|---|
//! | [`SingleSelection`] | one index |
//! | [`MultipleSelection`] | up to 64 indices |
//! | [`ParentedMultipleSelection`] | up to 64 indices of one parent's child list |
//! | [`GroupMultipleSelection`] | [`MAX_GROUPS`] independent multi-selections |
//! | [`NodeSelection`] | one index inside a nested tree path |

mod grouped;
mod multiple;
mod node;
mod parented;
pub mod renumber;
mod single;

pub use grouped::{GroupMultipleSelection, MAX_GROUPS};
pub use multiple::{MAX_SELECTED, MultipleSelection};
pub use node::{Branch, MAX_DEPTH, NodeAddress, NodePath, NodeSelection, PathEntry};
pub use parented::ParentedMultipleSelection;
pub use single::SingleSelection;

/// Behaviour shared by every selection model.
pub trait SelectionModel {
    /// Commits the pending selection. Call once per processed frame.
    fn update(&mut self);

    /// Returns `true` if the pending selection differs from the committed one.
    fn is_selection_changing(&self) -> bool;

    /// Clears the pending selection.
    fn clear_selection(&mut self);
}

/// Hooks a selection model exposes to list actions.
///
/// `A` is the addressing tuple of the list the selection indexes into:
/// `()` for top-level lists, a parent or group index for nested lists, a
/// [`NodePath`] for tree-shaped lists. Calls addressed at a list the
/// selection does not track are ignored.
pub trait ListSelection<A>: SelectionModel {
    /// Address of the list holding the committed selection, if any.
    fn selected_list(&self) -> Option<A>;

    /// Committed selected indices of the list at `args`, ascending.
    fn selected_indexes(&self, args: A) -> Vec<usize>;

    /// Renumbers after an item was inserted at `index`.
    fn item_added(&mut self, args: A, index: usize);

    /// Renumbers after the item at `index` was removed.
    fn item_removed(&mut self, args: A, index: usize);

    /// Renumbers after the item at `from` was moved to `to`.
    fn item_moved(&mut self, args: A, from: usize, to: usize);

    /// Replaces the pending selection with `index`.
    fn select_item(&mut self, args: A, index: usize);

    /// Replaces the pending selection with `indexes`.
    ///
    /// Single-index models keep the last entry.
    fn select_items(&mut self, args: A, indexes: &[usize]);
}

/// Lists without a selection use `()` as their selection model.
impl SelectionModel for () {
    fn update(&mut self) {}

    fn is_selection_changing(&self) -> bool {
        false
    }

    fn clear_selection(&mut self) {}
}

impl<A> ListSelection<A> for () {
    fn selected_list(&self) -> Option<A> {
        None
    }

    fn selected_indexes(&self, _args: A) -> Vec<usize> {
        Vec::new()
    }

    fn item_added(&mut self, _args: A, _index: usize) {}

    fn item_removed(&mut self, _args: A, _index: usize) {}

    fn item_moved(&mut self, _args: A, _from: usize, _to: usize) {}

    fn select_item(&mut self, _args: A, _index: usize) {}

    fn select_items(&mut self, _args: A, _indexes: &[usize]) {}
}
