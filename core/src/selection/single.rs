use super::renumber::{index_added, index_moved, index_removed};
use super::{ListSelection, SelectionModel};

/// Selection of at most one item in a list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SingleSelection {
    selected: Option<usize>,
    pending: Option<usize>,
}

impl SingleSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// The committed selected index.
    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    /// The pending selected index.
    pub fn pending_index(&self) -> Option<usize> {
        self.pending
    }

    pub fn has_selection(&self) -> bool {
        self.selected.is_some()
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.selected == Some(index)
    }

    pub fn set_selected(&mut self, index: usize) {
        self.pending = Some(index);
    }

    /// Same as [`set_selected`](Self::set_selected); a single selection cannot grow.
    pub fn append_selection(&mut self, index: usize) {
        self.set_selected(index);
    }

    /// Handles a click on `index`.
    ///
    /// With `extend`, clicking the selected item deselects it.
    pub fn selection_clicked(&mut self, index: usize, extend: bool) {
        if extend && self.pending == Some(index) {
            self.pending = None;
        } else {
            self.pending = Some(index);
        }
    }

    fn renumber(&mut self, f: impl Fn(usize) -> Option<usize>) {
        self.selected = self.selected.and_then(&f);
        self.pending = self.pending.and_then(&f);
    }
}

impl SelectionModel for SingleSelection {
    fn update(&mut self) {
        self.selected = self.pending;
    }

    fn is_selection_changing(&self) -> bool {
        self.selected != self.pending
    }

    fn clear_selection(&mut self) {
        self.pending = None;
    }
}

impl ListSelection<()> for SingleSelection {
    fn selected_list(&self) -> Option<()> {
        self.selected.map(|_| ())
    }

    fn selected_indexes(&self, _args: ()) -> Vec<usize> {
        self.selected.into_iter().collect()
    }

    fn item_added(&mut self, _args: (), index: usize) {
        self.renumber(|s| Some(index_added(s, index)));
    }

    fn item_removed(&mut self, _args: (), index: usize) {
        self.renumber(|s| index_removed(s, index));
    }

    fn item_moved(&mut self, _args: (), from: usize, to: usize) {
        self.renumber(|s| Some(index_moved(s, from, to)));
    }

    fn select_item(&mut self, _args: (), index: usize) {
        self.set_selected(index);
    }

    fn select_items(&mut self, _args: (), indexes: &[usize]) {
        match indexes.last() {
            Some(&index) => self.set_selected(index),
            None => self.clear_selection(),
        }
    }
}
