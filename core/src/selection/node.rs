//! Selection of one node in a tree of nested lists.
//!
//! Tree-shaped data (script statements with `if`/`else` blocks) is addressed
//! by a [`NodePath`]: the chain of parent nodes, each tagged with the
//! [`Branch`] that was entered, down to the list holding the selected node.

use std::fmt;

use super::renumber::{index_added, index_moved, index_removed};
use super::{ListSelection, SelectionModel};

/// Maximum nesting depth of a [`NodePath`].
pub const MAX_DEPTH: usize = 9;

/// Which child list of a parent node a path enters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Branch {
    #[default]
    Then,
    Else,
}

/// One step of a [`NodePath`]: a node index and the branch entered below it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct PathEntry {
    pub index: usize,
    pub branch: Branch,
}

impl PathEntry {
    pub const fn then(index: usize) -> Self {
        Self {
            index,
            branch: Branch::Then,
        }
    }

    pub const fn else_(index: usize) -> Self {
        Self {
            index,
            branch: Branch::Else,
        }
    }
}

/// Address of a list inside a tree, at most [`MAX_DEPTH`] levels deep.
///
/// The empty path addresses the root list.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct NodePath {
    entries: [PathEntry; MAX_DEPTH],
    len: u8,
}

impl NodePath {
    /// The root list.
    pub const fn root() -> Self {
        Self {
            entries: [PathEntry::then(0); MAX_DEPTH],
            len: 0,
        }
    }

    /// Builds a path from entries, or `None` if deeper than [`MAX_DEPTH`].
    pub fn from_entries(entries: &[PathEntry]) -> Option<Self> {
        entries
            .iter()
            .try_fold(Self::root(), |path, &entry| path.child(entry))
    }

    /// Path of the child list entered through `entry`, or `None` if full.
    pub fn child(&self, entry: PathEntry) -> Option<Self> {
        let depth = self.depth();
        if depth >= MAX_DEPTH {
            return None;
        }
        let mut path = *self;
        path.entries[depth] = entry;
        path.len += 1;
        Some(path)
    }

    /// Path of the enclosing list, or `None` for the root.
    pub fn parent(&self) -> Option<Self> {
        let depth = self.depth().checked_sub(1)?;
        let mut path = *self;
        path.entries[depth] = PathEntry::default();
        path.len -= 1;
        Some(path)
    }

    pub fn depth(&self) -> usize {
        usize::from(self.len)
    }

    pub fn is_root(&self) -> bool {
        self.len == 0
    }

    pub fn entries(&self) -> &[PathEntry] {
        &self.entries[..self.depth()]
    }

    /// The entry entering this list from its parent.
    pub fn last(&self) -> Option<PathEntry> {
        self.entries().last().copied()
    }

    /// Returns `true` if `self` is `ancestor` or lies below it.
    pub fn starts_with(&self, ancestor: &NodePath) -> bool {
        self.entries().starts_with(ancestor.entries())
    }
}

impl fmt::Debug for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.entries()).finish()
    }
}

/// A selected node: the list it lives in and its index there.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct NodeAddress {
    pub parent: NodePath,
    pub index: usize,
}

impl NodeAddress {
    /// Renumbers the address after a change to the list at `list`.
    ///
    /// `f` maps an index of that list to its new value (`None` if the item was
    /// removed). Either the address itself lives in `list`, or one of its
    /// ancestors does, in which case that path entry is renumbered.
    fn renumber(self, list: &NodePath, f: impl Fn(usize) -> Option<usize>) -> Option<Self> {
        if self.parent == *list {
            return f(self.index).map(|index| Self { index, ..self });
        }
        if !self.parent.starts_with(list) {
            return Some(self);
        }
        let depth = list.depth();
        let mut parent = self.parent;
        let entry = &mut parent.entries[depth];
        entry.index = f(entry.index)?;
        Some(Self { parent, ..self })
    }
}

/// Selection of a single node in a tree of lists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NodeSelection {
    selected: Option<NodeAddress>,
    pending: Option<NodeAddress>,
}

impl NodeSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<&NodeAddress> {
        self.selected.as_ref()
    }

    pub fn pending(&self) -> Option<&NodeAddress> {
        self.pending.as_ref()
    }

    /// Path of the list holding the committed selection.
    pub fn parent_path(&self) -> Option<NodePath> {
        self.selected.map(|a| a.parent)
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected.map(|a| a.index)
    }

    pub fn has_selection(&self) -> bool {
        self.selected.is_some()
    }

    pub fn is_selected(&self, parent: &NodePath, index: usize) -> bool {
        self.selected
            .is_some_and(|a| a.parent == *parent && a.index == index)
    }

    pub fn set_selected(&mut self, parent: NodePath, index: usize) {
        self.pending = Some(NodeAddress { parent, index });
    }

    /// Same as [`set_selected`](Self::set_selected); only one node can be selected.
    pub fn append_selection(&mut self, parent: NodePath, index: usize) {
        self.set_selected(parent, index);
    }

    /// Handles a click on a node; with `extend`, clicking the selected node
    /// deselects it.
    pub fn selection_clicked(&mut self, parent: NodePath, index: usize, extend: bool) {
        let address = NodeAddress { parent, index };
        if extend && self.pending == Some(address) {
            self.pending = None;
        } else {
            self.pending = Some(address);
        }
    }

    fn renumber(&mut self, list: &NodePath, f: impl Fn(usize) -> Option<usize>) {
        self.selected = self.selected.and_then(|a| a.renumber(list, &f));
        self.pending = self.pending.and_then(|a| a.renumber(list, &f));
    }
}

impl SelectionModel for NodeSelection {
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

impl ListSelection<NodePath> for NodeSelection {
    fn selected_list(&self) -> Option<NodePath> {
        self.parent_path()
    }

    fn selected_indexes(&self, parent: NodePath) -> Vec<usize> {
        self.selected
            .filter(|a| a.parent == parent)
            .map(|a| a.index)
            .into_iter()
            .collect()
    }

    fn item_added(&mut self, parent: NodePath, index: usize) {
        self.renumber(&parent, |i| Some(index_added(i, index)));
    }

    fn item_removed(&mut self, parent: NodePath, index: usize) {
        self.renumber(&parent, |i| index_removed(i, index));
    }

    fn item_moved(&mut self, parent: NodePath, from: usize, to: usize) {
        self.renumber(&parent, |i| Some(index_moved(i, from, to)));
    }

    fn select_item(&mut self, parent: NodePath, index: usize) {
        self.set_selected(parent, index);
    }

    fn select_items(&mut self, parent: NodePath, indexes: &[usize]) {
        match indexes.last() {
            Some(&index) => self.set_selected(parent, index),
            None => self.clear_selection(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(entries: &[PathEntry]) -> NodePath {
        NodePath::from_entries(entries).unwrap()
    }

    fn committed(parent: NodePath, index: usize) -> NodeSelection {
        let mut sel = NodeSelection::new();
        sel.set_selected(parent, index);
        sel.update();
        sel
    }

    #[test]
    fn path_depth_is_bounded() {
        let entries = [PathEntry::then(0); MAX_DEPTH];
        let full = path(&entries);
        assert_eq!(full.depth(), MAX_DEPTH);
        assert!(full.child(PathEntry::then(1)).is_none());
        assert!(NodePath::from_entries(&[PathEntry::else_(0); MAX_DEPTH + 1]).is_none());
    }

    #[test]
    fn path_parent_and_child_round_trip() {
        let p = path(&[PathEntry::then(2), PathEntry::else_(1)]);
        let parent = p.parent().unwrap();
        assert_eq!(parent, path(&[PathEntry::then(2)]));
        assert_eq!(parent.child(PathEntry::else_(1)), Some(p));
        assert_eq!(p.last(), Some(PathEntry::else_(1)));
        assert!(NodePath::root().parent().is_none());
    }

    #[test]
    fn branch_distinguishes_paths() {
        let then = path(&[PathEntry::then(3)]);
        let else_ = path(&[PathEntry::else_(3)]);
        assert_ne!(then, else_);

        let mut sel = committed(then, 0);
        sel.item_added(else_, 0);
        assert_eq!(sel.selected_index(), Some(0));
        sel.item_added(then, 0);
        assert_eq!(sel.selected_index(), Some(1));
    }

    #[test]
    fn same_list_renumbering() {
        let root = NodePath::root();
        let mut sel = committed(root, 2);
        sel.item_moved(root, 2, 0);
        assert!(sel.is_selected(&root, 0));
        sel.item_removed(root, 0);
        assert!(!sel.has_selection());
    }

    #[test]
    fn ancestor_renumbering() {
        let root = NodePath::root();
        let inner = path(&[PathEntry::then(1), PathEntry::else_(4)]);
        let mut sel = committed(inner, 0);

        // statement inserted before the outer `if`
        sel.item_added(root, 0);
        let expected = path(&[PathEntry::then(2), PathEntry::else_(4)]);
        assert_eq!(sel.parent_path(), Some(expected));

        // statement moved inside the outer `if`, before the inner one
        let outer = path(&[PathEntry::then(2)]);
        sel.item_moved(outer, 4, 0);
        let expected = path(&[PathEntry::then(2), PathEntry::else_(0)]);
        assert_eq!(sel.parent_path(), Some(expected));
        assert_eq!(sel.selected_index(), Some(0));

        // removing the outer `if` removes the selected node with it
        sel.item_removed(root, 2);
        assert!(!sel.has_selection());
    }

    #[test]
    fn unrelated_lists_are_ignored() {
        let selected = path(&[PathEntry::then(1)]);
        let mut sel = committed(selected, 3);
        sel.item_removed(path(&[PathEntry::then(0)]), 0);
        sel.item_added(path(&[PathEntry::then(1), PathEntry::then(3)]), 0);
        assert!(sel.is_selected(&selected, 3));
    }
}
