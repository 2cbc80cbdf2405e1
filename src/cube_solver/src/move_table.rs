use crate::{cubie::CubieCube, moves::Move, start, success};
use log::info;
use std::time::Instant;

/// A lookup from `(coordinate, move)` to the coordinate the move leads to,
/// for one coordinate space and a fixed list of moves. Move `i` of a table
/// is the `i`th entry of the move list it was generated with, which is not
/// necessarily the move with id `i`.
#[derive(Debug, Clone)]
pub struct MoveTable {
    table: Box<[u16]>,
    move_count: usize,
}

impl MoveTable {
    /// Builds the table by decoding every coordinate into a representative
    /// state, applying every move to it and encoding the result.
    pub fn generate<C: CubieCube>(
        name: &str,
        size: usize,
        moves: &[Move],
        decode: impl Fn(u16) -> C,
        encode: impl Fn(&C) -> u16,
    ) -> Self {
        debug_assert!(size <= usize::from(u16::MAX) + 1);
        info!(
            start!("Generating the {} move table with {} entries"),
            name,
            size * moves.len()
        );
        let start = Instant::now();

        let mut table = Vec::with_capacity(size * moves.len());
        for coordinate in 0..size {
            let representative = decode(coordinate as u16);
            for &move_ in moves {
                let mut next = representative.clone();
                next.apply_move(move_);
                table.push(encode(&next));
            }
        }

        info!(
            success!("Generated the {} move table in {:.3}s"),
            name,
            start.elapsed().as_secs_f64()
        );
        MoveTable {
            table: table.into_boxed_slice(),
            move_count: moves.len(),
        }
    }

    /// # Panics
    ///
    /// Panics if the coordinate or the move index is out of range.
    #[must_use]
    #[inline]
    pub fn get(&self, coordinate: u16, move_index: usize) -> u16 {
        debug_assert!(move_index < self.move_count);
        self.table[usize::from(coordinate) * self.move_count + move_index]
    }

    /// The number of coordinates.
    #[must_use]
    pub fn size(&self) -> usize {
        self.table.len() / self.move_count
    }

    #[must_use]
    pub fn move_count(&self) -> usize {
        self.move_count
    }
}
