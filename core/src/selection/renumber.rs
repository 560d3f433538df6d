//! Index renumbering for list-shape changes.
//!
//! Selection models store indices into lists that other code mutates. When an
//! item is inserted, removed or moved, every stored index at or after the
//! change has to follow its item. The functions here do that arithmetic for
//! the two storage forms used by the selection models:
//!
//! - a 64-bit mask, one bit per selected index ([`item_added`],
//!   [`item_removed`], [`item_moved`]);
//! - a single scalar index ([`index_added`], [`index_removed`],
//!   [`index_moved`]).
//!
//! All functions are pure.

/// Number of indices a selection mask can address.
pub const MASK_BITS: usize = u64::BITS as usize;

/// Mask with every bit below `index` set.
#[inline]
fn low_bits(index: usize) -> u64 {
    if index >= MASK_BITS {
        u64::MAX
    } else {
        (1u64 << index) - 1
    }
}

/// Renumbers `mask` after an item was inserted at `index`.
///
/// Bits at or above `index` move up by one and a zero is inserted at `index`.
/// Bits below `index` are unchanged. Bit 63 falls off the top.
///
/// ```
/// use spritework_core::selection::renumber::item_added;
///
/// // indices 0 and 2 selected, insert at 1 -> indices 0 and 3
/// assert_eq!(item_added(0b0101, 1), 0b1001);
/// ```
#[inline]
pub fn item_added(mask: u64, index: usize) -> u64 {
    if index >= MASK_BITS {
        return mask;
    }
    let low = low_bits(index);
    ((mask & !low) << 1) | (mask & low)
}

/// Renumbers `mask` after the item at `index` was removed.
///
/// The bit at `index` is dropped and higher bits move down by one. Bits below
/// `index` are unchanged.
///
/// ```
/// use spritework_core::selection::renumber::item_removed;
///
/// assert_eq!(item_removed(0b1010, 1), 0b0100);
/// ```
#[inline]
pub fn item_removed(mask: u64, index: usize) -> u64 {
    if index >= MASK_BITS {
        return mask;
    }
    let low = low_bits(index);
    ((mask >> 1) & !low) | (mask & low)
}

/// Renumbers `mask` after the item at `from` was moved to `to`.
///
/// `to` is the item's index in the final list. Bits strictly between the two
/// positions shift one step towards `from`; the bit at `from` lands on `to`.
#[inline]
pub fn item_moved(mask: u64, from: usize, to: usize) -> u64 {
    if from == to || from >= MASK_BITS || to >= MASK_BITS {
        return mask;
    }
    let moved = (mask >> from) & 1;
    let shifted = item_added(item_removed(mask, from), to);
    shifted | (moved << to)
}

/// Renumbers a selected scalar index after an insertion at `index`.
#[inline]
pub fn index_added(selected: usize, index: usize) -> usize {
    if selected >= index {
        selected + 1
    } else {
        selected
    }
}

/// Renumbers a selected scalar index after the item at `index` was removed.
///
/// Returns `None` when the selected item itself was removed.
#[inline]
pub fn index_removed(selected: usize, index: usize) -> Option<usize> {
    match selected.cmp(&index) {
        std::cmp::Ordering::Less => Some(selected),
        std::cmp::Ordering::Equal => None,
        std::cmp::Ordering::Greater => Some(selected - 1),
    }
}

/// Renumbers a selected scalar index after a move from `from` to `to`.
#[inline]
pub fn index_moved(selected: usize, from: usize, to: usize) -> usize {
    if selected == from {
        to
    } else if from < selected && selected <= to {
        selected - 1
    } else if to <= selected && selected < from {
        selected + 1
    } else {
        selected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn added_shifts_bits_at_and_above() {
        assert_eq!(item_added(0b0101, 1), 0b1001);
        assert_eq!(item_added(0b0101, 0), 0b1010);
        assert_eq!(item_added(0b0101, 3), 0b0101);
    }

    #[test]
    fn added_drops_top_bit() {
        assert_eq!(item_added(1 << 63, 0), 0);
        assert_eq!(item_added(1 << 63 | 1, 63), 1);
    }

    #[test]
    fn added_out_of_range_is_identity() {
        assert_eq!(item_added(0xFF, 64), 0xFF);
        assert_eq!(item_added(0xFF, 1000), 0xFF);
    }

    #[test]
    fn removed_drops_bit_and_shifts_down() {
        assert_eq!(item_removed(0b1010, 1), 0b0100);
        assert_eq!(item_removed(0b1111, 0), 0b0111);
        assert_eq!(item_removed(0b0001, 3), 0b0001);
        assert_eq!(item_removed(u64::MAX, 63), u64::MAX >> 1);
    }

    #[test]
    fn moved_forward() {
        // [a b c d e], select b and d, move b to 3 -> [a c d b e]
        // b now at 3, d now at 2
        assert_eq!(item_moved(0b01010, 1, 3), 0b01100);
    }

    #[test]
    fn moved_backward() {
        // select d (3), move d to 0 -> d at 0, a..c shift up
        assert_eq!(item_moved(0b1000, 3, 0), 0b0001);
        // select a (0), move d to 0 -> a at 1
        assert_eq!(item_moved(0b0001, 3, 0), 0b0010);
    }

    #[test]
    fn moved_same_index_is_identity() {
        assert_eq!(item_moved(0b1011, 2, 2), 0b1011);
    }

    #[test]
    fn moved_leaves_outside_bits() {
        // bits outside [from, to] untouched
        assert_eq!(item_moved(0b1000_0001, 2, 4), 0b1000_0001);
    }

    #[test]
    fn scalar_added() {
        assert_eq!(index_added(3, 1), 4);
        assert_eq!(index_added(3, 3), 4);
        assert_eq!(index_added(3, 4), 3);
    }

    #[test]
    fn scalar_removed() {
        assert_eq!(index_removed(3, 1), Some(2));
        assert_eq!(index_removed(3, 3), None);
        assert_eq!(index_removed(3, 4), Some(3));
    }

    #[test]
    fn scalar_moved() {
        assert_eq!(index_moved(1, 1, 3), 3);
        assert_eq!(index_moved(2, 1, 3), 1);
        assert_eq!(index_moved(3, 1, 3), 2);
        assert_eq!(index_moved(0, 3, 0), 1);
        assert_eq!(index_moved(4, 3, 0), 4);
    }

    #[test]
    fn scalar_agrees_with_mask() {
        for selected in 0..8 {
            for from in 0..8 {
                for to in 0..8 {
                    let mask = item_moved(1 << selected, from, to);
                    assert_eq!(mask, 1 << index_moved(selected, from, to));
                }
            }
        }
    }
}
