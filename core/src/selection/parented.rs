use super::multiple::{indexes_mask, mask_indexes};
use super::renumber::{self, index_added, index_moved, index_removed};
use super::{ListSelection, SelectionModel};

/// Multi-selection within the child list of one parent item.
///
/// Used for nested lists such as the frame objects of one selected frame.
/// Selecting under a different parent discards the previous selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParentedMultipleSelection {
    parent: Option<usize>,
    selected: u64,
    pending_parent: Option<usize>,
    pending: u64,
}

#[inline]
fn bit(index: usize) -> u64 {
    indexes_mask(&[index])
}

impl ParentedMultipleSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// The committed parent index.
    pub fn parent_index(&self) -> Option<usize> {
        self.parent
    }

    pub fn pending_parent_index(&self) -> Option<usize> {
        self.pending_parent
    }

    /// Committed child selection as a bitmask.
    pub fn mask(&self) -> u64 {
        self.selected
    }

    pub fn pending_mask(&self) -> u64 {
        self.pending
    }

    pub fn has_selection(&self) -> bool {
        self.parent.is_some() && self.selected != 0
    }

    pub fn is_selected(&self, parent: usize, index: usize) -> bool {
        self.parent == Some(parent) && self.selected & bit(index) != 0
    }

    /// Committed selected child indices, ascending.
    pub fn indexes(&self) -> impl Iterator<Item = usize> {
        mask_indexes(if self.parent.is_some() { self.selected } else { 0 })
    }

    /// Selects `parent` without any children.
    ///
    /// Changing the parent clears the pending child selection.
    pub fn set_parent(&mut self, parent: usize) {
        if self.pending_parent != Some(parent) {
            self.pending_parent = Some(parent);
            self.pending = 0;
        }
    }

    pub fn set_selected(&mut self, parent: usize, index: usize) {
        self.pending_parent = Some(parent);
        self.pending = bit(index);
    }

    pub fn set_selected_indexes(&mut self, parent: usize, indexes: &[usize]) {
        self.pending_parent = Some(parent);
        self.pending = indexes_mask(indexes);
    }

    pub fn append_selection(&mut self, parent: usize, index: usize) {
        self.set_parent(parent);
        self.pending |= bit(index);
    }

    /// Handles a click on child `index` of `parent`.
    ///
    /// With `extend` the child is toggled, unless the click is under another
    /// parent, which always replaces the selection.
    pub fn selection_clicked(&mut self, parent: usize, index: usize, extend: bool) {
        if extend && self.pending_parent == Some(parent) {
            self.pending ^= bit(index);
        } else {
            self.set_selected(parent, index);
        }
    }

    /// Renumbers the parent after an insertion into the parent list.
    pub fn parent_added(&mut self, index: usize) {
        self.parent = self.parent.map(|p| index_added(p, index));
        self.pending_parent = self.pending_parent.map(|p| index_added(p, index));
    }

    /// Renumbers the parent after a removal from the parent list.
    ///
    /// Removing the selected parent clears the selection.
    pub fn parent_removed(&mut self, index: usize) {
        self.parent = self.parent.and_then(|p| index_removed(p, index));
        if self.parent.is_none() {
            self.selected = 0;
        }
        self.pending_parent = self.pending_parent.and_then(|p| index_removed(p, index));
        if self.pending_parent.is_none() {
            self.pending = 0;
        }
    }

    /// Renumbers the parent after a move within the parent list.
    pub fn parent_moved(&mut self, from: usize, to: usize) {
        self.parent = self.parent.map(|p| index_moved(p, from, to));
        self.pending_parent = self.pending_parent.map(|p| index_moved(p, from, to));
    }

    fn renumber(&mut self, parent: usize, f: impl Fn(u64) -> u64) {
        if self.parent == Some(parent) {
            self.selected = f(self.selected);
        }
        if self.pending_parent == Some(parent) {
            self.pending = f(self.pending);
        }
    }
}

impl SelectionModel for ParentedMultipleSelection {
    fn update(&mut self) {
        self.parent = self.pending_parent;
        self.selected = self.pending;
    }

    fn is_selection_changing(&self) -> bool {
        self.parent != self.pending_parent || self.selected != self.pending
    }

    /// Clears the child selection; the parent stays selected.
    fn clear_selection(&mut self) {
        self.pending = 0;
    }
}

impl ListSelection<usize> for ParentedMultipleSelection {
    fn selected_list(&self) -> Option<usize> {
        self.parent
    }

    fn selected_indexes(&self, parent: usize) -> Vec<usize> {
        if self.parent == Some(parent) {
            mask_indexes(self.selected).collect()
        } else {
            Vec::new()
        }
    }

    fn item_added(&mut self, parent: usize, index: usize) {
        self.renumber(parent, |m| renumber::item_added(m, index));
    }

    fn item_removed(&mut self, parent: usize, index: usize) {
        self.renumber(parent, |m| renumber::item_removed(m, index));
    }

    fn item_moved(&mut self, parent: usize, from: usize, to: usize) {
        self.renumber(parent, |m| renumber::item_moved(m, from, to));
    }

    fn select_item(&mut self, parent: usize, index: usize) {
        self.set_selected(parent, index);
    }

    fn select_items(&mut self, parent: usize, indexes: &[usize]) {
        self.set_selected_indexes(parent, indexes);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appending_under_new_parent_clears() {
        let mut sel = ParentedMultipleSelection::new();
        sel.append_selection(0, 1);
        sel.append_selection(0, 2);
        sel.update();
        assert_eq!(sel.indexes().collect::<Vec<_>>(), vec![1, 2]);

        sel.append_selection(3, 4);
        sel.update();
        assert_eq!(sel.parent_index(), Some(3));
        assert_eq!(sel.indexes().collect::<Vec<_>>(), vec![4]);
        assert!(!sel.is_selected(0, 1));
        assert!(sel.is_selected(3, 4));
    }

    #[test]
    fn extend_click_under_other_parent_replaces() {
        let mut sel = ParentedMultipleSelection::new();
        sel.selection_clicked(0, 1, false);
        sel.selection_clicked(0, 3, true);
        sel.selection_clicked(2, 0, true);
        sel.update();
        assert_eq!(sel.parent_index(), Some(2));
        assert_eq!(sel.mask(), 0b1);
    }

    #[test]
    fn renumbering_ignores_other_parents() {
        let mut sel = ParentedMultipleSelection::new();
        sel.set_selected_indexes(1, &[0, 2]);
        sel.update();

        sel.item_added(0, 0);
        assert_eq!(sel.mask(), 0b101);

        sel.item_added(1, 1);
        assert_eq!(sel.mask(), 0b1001);
        assert_eq!(sel.selected_indexes(1), vec![0, 3]);
        assert!(sel.selected_indexes(0).is_empty());
    }

    #[test]
    fn parent_renumbering() {
        let mut sel = ParentedMultipleSelection::new();
        sel.set_selected(2, 5);
        sel.update();

        sel.parent_added(0);
        assert_eq!(sel.parent_index(), Some(3));
        sel.parent_moved(3, 1);
        assert_eq!(sel.parent_index(), Some(1));
        assert!(sel.is_selected(1, 5));

        sel.parent_removed(1);
        assert_eq!(sel.parent_index(), None);
        assert!(!sel.has_selection());
        assert_eq!(sel.indexes().count(), 0);
    }

    #[test]
    fn clear_keeps_parent() {
        let mut sel = ParentedMultipleSelection::new();
        sel.set_selected(4, 1);
        sel.update();
        sel.clear_selection();
        sel.update();
        assert_eq!(sel.parent_index(), Some(4));
        assert!(!sel.has_selection());
    }
}
