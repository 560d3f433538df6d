use super::renumber::{self, MASK_BITS};
use super::{ListSelection, SelectionModel};

/// Maximum number of indices a [`MultipleSelection`] can hold.
pub const MAX_SELECTED: usize = MASK_BITS;

/// Selection of any subset of the first [`MAX_SELECTED`] items of a list.
///
/// Stored as a bitmask. Indices at or beyond [`MAX_SELECTED`] can never be
/// selected; requests to select them are ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MultipleSelection {
    selected: u64,
    pending: u64,
}

#[inline]
fn bit(index: usize) -> u64 {
    if index < MAX_SELECTED { 1 << index } else { 0 }
}

/// Iterates the set bits of `mask` in ascending order.
pub(crate) fn mask_indexes(mut mask: u64) -> impl Iterator<Item = usize> {
    std::iter::from_fn(move || {
        if mask == 0 {
            return None;
        }
        let index = mask.trailing_zeros() as usize;
        mask &= mask - 1;
        Some(index)
    })
}

pub(crate) fn indexes_mask(indexes: &[usize]) -> u64 {
    indexes.iter().fold(0, |mask, &i| mask | bit(i))
}

impl MultipleSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Committed selection as a bitmask.
    pub fn mask(&self) -> u64 {
        self.selected
    }

    /// Pending selection as a bitmask.
    pub fn pending_mask(&self) -> u64 {
        self.pending
    }

    pub fn has_selection(&self) -> bool {
        self.selected != 0
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.selected & bit(index) != 0
    }

    /// Number of committed selected indices.
    pub fn len(&self) -> usize {
        self.selected.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.selected == 0
    }

    /// Committed selected indices, ascending.
    pub fn indexes(&self) -> impl Iterator<Item = usize> {
        mask_indexes(self.selected)
    }

    /// The committed index if exactly one item is selected.
    pub fn single_index(&self) -> Option<usize> {
        (self.selected.count_ones() == 1).then(|| self.selected.trailing_zeros() as usize)
    }

    pub fn set_selected(&mut self, index: usize) {
        self.pending = bit(index);
    }

    pub fn set_selected_indexes(&mut self, indexes: &[usize]) {
        self.pending = indexes_mask(indexes);
    }

    pub fn set_mask(&mut self, mask: u64) {
        self.pending = mask;
    }

    pub fn append_selection(&mut self, index: usize) {
        self.pending |= bit(index);
    }

    /// Handles a click on `index`.
    ///
    /// With `extend` the item is toggled in place, otherwise it replaces the
    /// selection.
    pub fn selection_clicked(&mut self, index: usize, extend: bool) {
        if extend {
            self.pending ^= bit(index);
        } else {
            self.pending = bit(index);
        }
    }

    pub(crate) fn add_index(&mut self, index: usize) {
        self.selected = renumber::item_added(self.selected, index);
        self.pending = renumber::item_added(self.pending, index);
    }

    pub(crate) fn remove_index(&mut self, index: usize) {
        self.selected = renumber::item_removed(self.selected, index);
        self.pending = renumber::item_removed(self.pending, index);
    }

    pub(crate) fn move_index(&mut self, from: usize, to: usize) {
        self.selected = renumber::item_moved(self.selected, from, to);
        self.pending = renumber::item_moved(self.pending, from, to);
    }
}

impl SelectionModel for MultipleSelection {
    fn update(&mut self) {
        self.selected = self.pending;
    }

    fn is_selection_changing(&self) -> bool {
        self.selected != self.pending
    }

    fn clear_selection(&mut self) {
        self.pending = 0;
    }
}

impl ListSelection<()> for MultipleSelection {
    fn selected_list(&self) -> Option<()> {
        self.has_selection().then_some(())
    }

    fn selected_indexes(&self, _args: ()) -> Vec<usize> {
        self.indexes().collect()
    }

    fn item_added(&mut self, _args: (), index: usize) {
        self.add_index(index);
    }

    fn item_removed(&mut self, _args: (), index: usize) {
        self.remove_index(index);
    }

    fn item_moved(&mut self, _args: (), from: usize, to: usize) {
        self.move_index(from, to);
    }

    fn select_item(&mut self, _args: (), index: usize) {
        self.set_selected(index);
    }

    fn select_items(&mut self, _args: (), indexes: &[usize]) {
        self.set_selected_indexes(indexes);
    }
}
