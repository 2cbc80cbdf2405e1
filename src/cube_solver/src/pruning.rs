use crate::{move_table::MoveTable, start, success, working};
use log::{debug, info};
use std::time::Instant;

/// Marks an entry the breadth-first fill has not reached yet. Never present
/// in a finished table.
const UNASSIGNED: u8 = 0xF;
/// Deeper entries are stored as this value, which keeps them admissible.
const MAX_STORED_DEPTH: u8 = 14;

/// An array of 4-bit values, four to a word.
#[derive(Debug, Clone)]
struct PackedNibbles {
    words: Box<[u16]>,
}

impl PackedNibbles {
    fn filled(len: usize, value: u8) -> Self {
        PackedNibbles {
            words: vec![u16::from(value) * 0x1111; len.div_ceil(4)].into_boxed_slice(),
        }
    }

    #[inline]
    fn get(&self, index: usize) -> u8 {
        ((self.words[index >> 2] >> ((index & 3) << 2)) & 0xF) as u8
    }

    #[inline]
    fn set(&mut self, index: usize, value: u8) {
        debug_assert!(value <= 0xF);
        let shift = (index & 3) << 2;
        let word = &mut self.words[index >> 2];
        *word = (*word & !(0xF << shift)) | (u16::from(value) << shift);
    }
}

/// The exact distance to solved of every state of a coordinate space, or of
/// the product of two coordinate spaces. Since the distance is measured in a
/// quotient of the cube group, it never overestimates the true distance.
#[derive(Debug, Clone)]
pub struct PruningTable {
    entries: PackedNibbles,
    len: usize,
    second_size: usize,
    max_depth: u8,
}

impl PruningTable {
    /// Builds the table over the composite index
    /// `first * second.size() + second`. Both move tables must have been
    /// generated with the same move list.
    pub fn generate(
        name: &str,
        first: &MoveTable,
        second: &MoveTable,
        solved: (u16, u16),
    ) -> Self {
        debug_assert_eq!(first.move_count(), second.move_count());
        let second_size = second.size();
        Self::generate_with(
            name,
            first.size() * second_size,
            second_size,
            first.move_count(),
            usize::from(solved.0) * second_size + usize::from(solved.1),
            |index, move_index| {
                let next_first = first.get((index / second_size) as u16, move_index);
                let next_second = second.get((index % second_size) as u16, move_index);
                usize::from(next_first) * second_size + usize::from(next_second)
            },
        )
    }

    /// Builds the table over a single coordinate space.
    pub fn generate_single(name: &str, table: &MoveTable, solved: u16) -> Self {
        Self::generate_with(
            name,
            table.size(),
            1,
            table.move_count(),
            solved.into(),
            |index, move_index| table.get(index as u16, move_index).into(),
        )
    }

    /// Fills the table layer by layer: every entry one move away from an
    /// entry of the previous layer that is still unassigned joins the next
    /// layer.
    fn generate_with(
        name: &str,
        len: usize,
        second_size: usize,
        move_count: usize,
        solved: usize,
        transition: impl Fn(usize, usize) -> usize,
    ) -> Self {
        info!(
            start!("Generating the {} pruning table with {} entries"),
            name, len
        );
        let start = Instant::now();

        let mut entries = PackedNibbles::filled(len, UNASSIGNED);
        entries.set(solved, 0);
        let mut assigned = 1;
        let mut depth = 0_u8;
        while assigned < len {
            let frontier = depth.min(MAX_STORED_DEPTH);
            depth += 1;
            let stored = depth.min(MAX_STORED_DEPTH);
            let mut layer = 0;
            for index in 0..len {
                if entries.get(index) != frontier {
                    continue;
                }
                for move_index in 0..move_count {
                    let next = transition(index, move_index);
                    if entries.get(next) == UNASSIGNED {
                        entries.set(next, stored);
                        layer += 1;
                    }
                }
            }
            debug!(working!("Depth {} has {} entries"), depth, layer);
            debug_assert!(layer > 0, "the coordinate graph of {name} is not connected");
            if layer == 0 {
                break;
            }
            assigned += layer;
        }

        info!(
            success!("Generated the {} pruning table in {:.3}s with max depth {}"),
            name,
            start.elapsed().as_secs_f64(),
            depth
        );
        PruningTable {
            entries,
            len,
            second_size,
            max_depth: depth,
        }
    }

    /// The stored distance of a composite index.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    #[must_use]
    #[inline]
    pub fn get(&self, index: usize) -> u8 {
        assert!(index < self.len);
        self.entries.get(index)
    }

    /// The stored distance of a pair of coordinates. Tables over a single
    /// coordinate space take zero as the second coordinate.
    #[must_use]
    #[inline]
    pub fn distance(&self, first: u16, second: u16) -> u8 {
        self.get(usize::from(first) * self.second_size + usize::from(second))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The largest distance in the table.
    #[must_use]
    pub fn max_depth(&self) -> u8 {
        self.max_depth
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_packed_entries_are_independent() {
        let mut entries = PackedNibbles::filled(11, UNASSIGNED);
        assert!((0..11).all(|index| entries.get(index) == UNASSIGNED));
        for index in 0..11 {
            entries.set(index, (index % 15) as u8);
        }
        entries.set(5, 0);
        for index in 0..11 {
            let expected = if index == 5 { 0 } else { (index % 15) as u8 };
            assert_eq!(entries.get(index), expected);
        }
    }

    #[test]
    fn test_cycle_graph_distances() {
        // A cycle of 10 nodes where the moves step one node either way
        let table = PruningTable::generate_with("cycle", 10, 1, 2, 0, |index, move_index| {
            if move_index == 0 {
                (index + 1) % 10
            } else {
                (index + 9) % 10
            }
        });
        let distances: Vec<u8> = (0..10).map(|index| table.get(index)).collect();
        assert_eq!(distances, vec![0, 1, 2, 3, 4, 5, 4, 3, 2, 1]);
        assert_eq!(table.max_depth(), 5);
    }

    #[test]
    fn test_deep_entries_saturate() {
        // A path of 20 nodes
        let table = PruningTable::generate_with("path", 20, 1, 1, 0, |index, _| {
            (index + 1).min(19)
        });
        assert_eq!(table.get(13), 13);
        assert_eq!(table.get(14), 14);
        assert_eq!(table.get(19), 14);
    }
}
