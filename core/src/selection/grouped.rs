use super::multiple::MultipleSelection;
use super::{ListSelection, SelectionModel};

/// Number of groups in a [`GroupMultipleSelection`].
pub const MAX_GROUPS: usize = 8;

/// A fixed set of independent multi-selections, one per group.
///
/// Used where one editor shows several sibling lists at once (e.g. the
/// entity groups of a room) and a selection may span all of them. Group
/// indices at or beyond [`MAX_GROUPS`] are ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GroupMultipleSelection {
    groups: [MultipleSelection; MAX_GROUPS],
}

impl GroupMultipleSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// The selection of one group.
    pub fn group(&self, group: usize) -> Option<&MultipleSelection> {
        self.groups.get(group)
    }

    /// Iterates `(group, selection)` for every group.
    pub fn groups(&self) -> impl Iterator<Item = (usize, &MultipleSelection)> {
        self.groups.iter().enumerate()
    }

    /// Groups with a non-empty committed selection, ascending.
    pub fn selected_groups(&self) -> impl Iterator<Item = usize> + '_ {
        self.groups
            .iter()
            .enumerate()
            .filter(|(_, s)| s.has_selection())
            .map(|(g, _)| g)
    }

    pub fn has_selection(&self) -> bool {
        self.groups.iter().any(MultipleSelection::has_selection)
    }

    pub fn is_selected(&self, group: usize, index: usize) -> bool {
        self.groups.get(group).is_some_and(|s| s.is_selected(index))
    }

    /// Selects `index` in `group` and clears every other group.
    pub fn set_selected(&mut self, group: usize, index: usize) {
        if group >= MAX_GROUPS {
            return;
        }
        for (g, sel) in self.groups.iter_mut().enumerate() {
            if g == group {
                sel.set_selected(index);
            } else {
                sel.clear_selection();
            }
        }
    }

    /// Replaces the selection of `group` only.
    pub fn set_group_selection(&mut self, group: usize, indexes: &[usize]) {
        if let Some(sel) = self.groups.get_mut(group) {
            sel.set_selected_indexes(indexes);
        }
    }

    pub fn append_selection(&mut self, group: usize, index: usize) {
        if let Some(sel) = self.groups.get_mut(group) {
            sel.append_selection(index);
        }
    }

    /// Handles a click on `index` of `group`.
    ///
    /// With `extend` the item is toggled within its group and the other
    /// groups are kept; otherwise the click replaces the whole selection.
    pub fn selection_clicked(&mut self, group: usize, index: usize, extend: bool) {
        if extend {
            if let Some(sel) = self.groups.get_mut(group) {
                sel.selection_clicked(index, true);
            }
        } else {
            self.set_selected(group, index);
        }
    }
}

impl SelectionModel for GroupMultipleSelection {
    fn update(&mut self) {
        self.groups.iter_mut().for_each(SelectionModel::update);
    }

    fn is_selection_changing(&self) -> bool {
        self.groups.iter().any(SelectionModel::is_selection_changing)
    }

    fn clear_selection(&mut self) {
        self.groups.iter_mut().for_each(SelectionModel::clear_selection);
    }
}

impl ListSelection<usize> for GroupMultipleSelection {
    /// The lowest group holding a selection.
    fn selected_list(&self) -> Option<usize> {
        self.selected_groups().next()
    }

    fn selected_indexes(&self, group: usize) -> Vec<usize> {
        self.groups
            .get(group)
            .map(|s| s.indexes().collect())
            .unwrap_or_default()
    }

    fn item_added(&mut self, group: usize, index: usize) {
        if let Some(sel) = self.groups.get_mut(group) {
            sel.add_index(index);
        }
    }

    fn item_removed(&mut self, group: usize, index: usize) {
        if let Some(sel) = self.groups.get_mut(group) {
            sel.remove_index(index);
        }
    }

    fn item_moved(&mut self, group: usize, from: usize, to: usize) {
        if let Some(sel) = self.groups.get_mut(group) {
            sel.move_index(from, to);
        }
    }

    /// Selects `index` in `group`, keeping the other groups.
    ///
    /// Grouped edits run once per group; replacing the other groups here
    /// would drop the results of the groups already processed.
    fn select_item(&mut self, group: usize, index: usize) {
        self.set_group_selection(group, &[index]);
    }

    fn select_items(&mut self, group: usize, indexes: &[usize]) {
        self.set_group_selection(group, indexes);
    }
}
