//! Sticker-level cube representation. This is the interchange format between
//! the cubie models and anything that deals in face colors.
//!
//! Faces are stored in the order U R F D L B, each as `size * size` stickers
//! in row-major order as seen when looking at that face. A sticker's value is
//! the index of the face whose color it shows.

use crate::moves::{Axis, Move};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FaceletError {
    #[error("Unsupported cube size {0}, expected 2 or 3")]
    UnsupportedSize(usize),
    #[error("Expected {expected} facelets but got {actual}")]
    WrongLength { expected: usize, actual: usize },
    #[error("Facelet {position} has color {color}, expected a value below 6")]
    InvalidColor { position: usize, color: u8 },
    #[error("The stickers of corner position {position} match no corner piece")]
    UnrecognizedCorner { position: usize },
    #[error("The stickers of edge position {position} match no edge piece")]
    UnrecognizedEdge { position: usize },
    #[error("Expected a facelet cube of size {expected} but got size {actual}")]
    SizeMismatch { expected: usize, actual: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FaceletCube {
    size: usize,
    facelets: Vec<u8>,
}

/// The layer families a face turn moves. Opposite faces turn the same
/// family from the other side.
#[derive(Clone, Copy)]
enum LayerFamily {
    Horizontal,
    Vertical,
    Frontal,
}

impl FaceletCube {
    pub const FACES: usize = 6;

    /// # Errors
    ///
    /// Fails if `size` is not 2 or 3.
    pub fn solved(size: usize) -> Result<Self, FaceletError> {
        Self::check_size(size)?;
        let per_face = size * size;
        Ok(FaceletCube {
            size,
            facelets: (0..Self::FACES * per_face)
                .map(|i| (i / per_face) as u8)
                .collect(),
        })
    }

    /// Wraps a raw facelet array. Only the shape and color range are checked
    /// here; whether the stickers describe real pieces is checked when
    /// converting to a cubie model.
    ///
    /// # Errors
    ///
    /// Fails on an unsupported size, a wrong number of facelets, or a color
    /// that names no face.
    pub fn new(size: usize, facelets: Vec<u8>) -> Result<Self, FaceletError> {
        Self::check_size(size)?;
        let expected = Self::FACES * size * size;
        if facelets.len() != expected {
            return Err(FaceletError::WrongLength {
                expected,
                actual: facelets.len(),
            });
        }
        if let Some((position, &color)) = facelets
            .iter()
            .enumerate()
            .find(|&(_, &color)| usize::from(color) >= Self::FACES)
        {
            return Err(FaceletError::InvalidColor { position, color });
        }
        Ok(FaceletCube { size, facelets })
    }

    fn check_size(size: usize) -> Result<(), FaceletError> {
        if (2..=3).contains(&size) {
            Ok(())
        } else {
            Err(FaceletError::UnsupportedSize(size))
        }
    }

    pub(crate) fn from_raw(size: usize, facelets: Vec<u8>) -> Self {
        debug_assert_eq!(facelets.len(), Self::FACES * size * size);
        FaceletCube { size, facelets }
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    #[must_use]
    pub fn facelets(&self) -> &[u8] {
        &self.facelets
    }

    pub(crate) fn expect_size(&self, expected: usize) -> Result<(), FaceletError> {
        if self.size == expected {
            Ok(())
        } else {
            Err(FaceletError::SizeMismatch {
                expected,
                actual: self.size,
            })
        }
    }

    /// Turns the outer layer of the move's face.
    pub fn turn(&mut self, move_: Move) {
        let n = self.size;
        let power = usize::from(move_.power());
        let (family, layer, quarter_turns) = match move_.axis() {
            Axis::U => (LayerFamily::Horizontal, 1, power),
            Axis::R => (LayerFamily::Vertical, 1, power),
            Axis::F => (LayerFamily::Frontal, 1, power),
            Axis::D => (LayerFamily::Horizontal, n, 4 - power),
            Axis::L => (LayerFamily::Vertical, n, 4 - power),
            Axis::B => (LayerFamily::Frontal, n, 4 - power),
        };
        for _ in 0..quarter_turns {
            self.quarter_turn(family, layer);
        }
    }

    pub fn apply_moves(&mut self, moves: impl IntoIterator<Item = Move>) {
        for move_ in moves {
            self.turn(move_);
        }
    }

    fn offset(&self, axis: Axis) -> usize {
        axis.index() * self.size * self.size
    }

    /// Moves the sticker at `a` to `b`, `b` to `c`, `c` to `d` and `d` to `a`.
    fn cycle4(&mut self, a: usize, b: usize, c: usize, d: usize) {
        let tmp = self.facelets[a];
        self.facelets[a] = self.facelets[d];
        self.facelets[d] = self.facelets[c];
        self.facelets[c] = self.facelets[b];
        self.facelets[b] = tmp;
    }

    fn rotate_face(&mut self, axis: Axis, clockwise: bool) {
        let n = self.size;
        let o = self.offset(axis);
        for i in 0..n / 2 {
            for j in i..n - i - 1 {
                let a = o + i * n + j;
                let b = o + j * n + (n - i - 1);
                let c = o + (n - i - 1) * n + (n - j - 1);
                let d = o + (n - j - 1) * n + i;
                if clockwise {
                    self.cycle4(a, b, c, d);
                } else {
                    self.cycle4(a, d, c, b);
                }
            }
        }
    }

    /// Turns layer `layer` (1 being the U, R or F face) a quarter turn in
    /// the direction of that face's clockwise turn.
    fn quarter_turn(&mut self, family: LayerFamily, layer: usize) {
        let n = self.size;
        let [u, r, f, d, l, b] = Axis::ALL.map(|axis| self.offset(axis));
        let (near, far) = match family {
            LayerFamily::Horizontal => (Axis::U, Axis::D),
            LayerFamily::Vertical => (Axis::R, Axis::L),
            LayerFamily::Frontal => (Axis::F, Axis::B),
        };
        if layer == 1 {
            self.rotate_face(near, true);
        }
        for i in 0..n {
            match family {
                LayerFamily::Horizontal => {
                    let row = (layer - 1) * n + i;
                    self.cycle4(f + row, l + row, b + row, r + row);
                }
                LayerFamily::Vertical => self.cycle4(
                    u + i * n + (n - layer),
                    b + (n - i - 1) * n + (layer - 1),
                    d + i * n + (n - layer),
                    f + i * n + (n - layer),
                ),
                LayerFamily::Frontal => self.cycle4(
                    u + (n - layer) * n + i,
                    r + i * n + (layer - 1),
                    d + (layer - 1) * n + (n - i - 1),
                    l + (n - i - 1) * n + (n - layer),
                ),
            }
        }
        if layer == n {
            self.rotate_face(far, false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_four_quarter_turns_are_identity() {
        for size in 2..=3 {
            let solved = FaceletCube::solved(size).unwrap();
            for axis in Axis::ALL {
                let mut cube = solved.clone();
                for _ in 0..4 {
                    cube.turn(Move::new(axis, 1));
                }
                assert_eq!(cube, solved);

                cube.turn(Move::new(axis, 1));
                assert_ne!(cube, solved);
                cube.turn(Move::new(axis, 3));
                assert_eq!(cube, solved);
            }
        }
    }

    #[test]
    fn test_turn_moves_expected_stickers() {
        let mut cube = FaceletCube::solved(3).unwrap();
        cube.turn(Move::U);
        // The front face's top row now shows the right face's color
        assert_eq!(&cube.facelets()[18..21], &[1, 1, 1]);
        assert_eq!(&cube.facelets()[21..27], &[2; 6]);
        // The U face only rotates in place
        assert!(cube.facelets()[..9].iter().all(|&color| color == 0));
    }

    #[test]
    fn test_rejects_malformed_input() {
        assert_eq!(
            FaceletCube::solved(4),
            Err(FaceletError::UnsupportedSize(4))
        );
        assert_eq!(
            FaceletCube::new(2, vec![0; 23]),
            Err(FaceletError::WrongLength {
                expected: 24,
                actual: 23
            })
        );
        let mut facelets = FaceletCube::solved(2).unwrap().facelets().to_vec();
        facelets[5] = 6;
        assert_eq!(
            FaceletCube::new(2, facelets),
            Err(FaceletError::InvalidColor {
                position: 5,
                color: 6
            })
        );
    }
}
