//! Piece-level cube models. A cube state is the permutation and orientation
//! of each piece orbit, composed with the wreath-product multiplication in
//! [`compose_orbit`]. Every elementary move is the state a single turn
//! produces from solved.

use crate::{
    facelet::{FaceletCube, FaceletError},
    moves::Move,
};
use std::fmt::{self, Debug};
use thiserror::Error;

pub mod cube2;
pub mod cube3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PieceKind {
    Corner,
    Edge,
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PieceKind::Corner => f.write_str("corner"),
            PieceKind::Edge => f.write_str("edge"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CubieError {
    #[error("The {kind} permutation {permutation:?} is not a bijection")]
    InvalidPermutation {
        kind: PieceKind,
        permutation: Vec<u8>,
    },
    #[error("The {kind} orientation {value} is out of range, expected a value below {modulus}")]
    InvalidOrientation {
        kind: PieceKind,
        value: u8,
        modulus: u8,
    },
    #[error("The {kind} orientations sum to {sum}, which is not a multiple of {modulus}")]
    OrientationSum {
        kind: PieceKind,
        sum: u32,
        modulus: u8,
    },
    #[error("The corner permutation parity does not match the edge permutation parity")]
    ParityMismatch,
    #[error("The DBL corner must stay in place and unoriented on a 2x2x2 cube")]
    UnpinnedCorner,
    #[error("The {name} coordinate {value} is out of range, expected a value below {size}")]
    CoordinateOutOfRange {
        name: &'static str,
        value: u64,
        size: u64,
    },
    #[error(transparent)]
    Facelet(#[from] FaceletError),
}

/// The interface shared by the cubie models.
pub trait CubieCube: Clone + PartialEq + Debug {
    /// The number of elementary moves this puzzle supports. Their ids are
    /// `0..MOVE_COUNT`.
    const MOVE_COUNT: usize;

    fn solved() -> Self;

    /// Multiplies the state by the move's move cube.
    ///
    /// # Panics
    ///
    /// Panics if the move's id is not below `MOVE_COUNT`.
    fn apply_move(&mut self, move_: Move);

    /// The corner permutation coordinate.
    fn permutation_coordinate(&self) -> u16;

    /// The corner orientation coordinate.
    fn orientation_coordinate(&self) -> u16;

    fn to_facelet_cube(&self) -> FaceletCube;

    fn apply_moves(&mut self, moves: impl IntoIterator<Item = Move>) {
        for move_ in moves {
            self.apply_move(move_);
        }
    }

    fn is_solved(&self) -> bool {
        *self == Self::solved()
    }
}

/// Composes one orbit of `a` with one orbit of `b`: piece `i` of the result
/// is piece `b_perm[i]` of `a`, twisted further by `b_ori[i]`.
pub(crate) fn compose_orbit<const N: usize>(
    a_perm: &[u8; N],
    a_ori: &[u8; N],
    b_perm: &[u8; N],
    b_ori: &[u8; N],
    modulus: u8,
) -> ([u8; N], [u8; N]) {
    let mut perm = [0; N];
    let mut ori = [0; N];
    for i in 0..N {
        let from = usize::from(b_perm[i]);
        perm[i] = a_perm[from];
        ori[i] = (a_ori[from] + b_ori[i]) % modulus;
    }
    (perm, ori)
}

pub(crate) fn validate_permutation(kind: PieceKind, perm: &[u8]) -> Result<(), CubieError> {
    let mut seen = 0_u32;
    for &piece in perm {
        if usize::from(piece) >= perm.len() || seen & (1 << piece) != 0 {
            return Err(CubieError::InvalidPermutation {
                kind,
                permutation: perm.to_vec(),
            });
        }
        seen |= 1 << piece;
    }
    Ok(())
}

pub(crate) fn validate_orientation(
    kind: PieceKind,
    orientation: &[u8],
    modulus: u8,
) -> Result<(), CubieError> {
    if let Some(&value) = orientation.iter().find(|&&value| value >= modulus) {
        return Err(CubieError::InvalidOrientation {
            kind,
            value,
            modulus,
        });
    }
    let sum = orientation.iter().map(|&value| u32::from(value)).sum::<u32>();
    if sum % u32::from(modulus) != 0 {
        return Err(CubieError::OrientationSum { kind, sum, modulus });
    }
    Ok(())
}

pub(crate) fn check_range(name: &'static str, value: u64, size: u64) -> Result<(), CubieError> {
    if value < size {
        Ok(())
    } else {
        Err(CubieError::CoordinateOutOfRange { name, value, size })
    }
}

/// Writes the stickers of corner `position` given the piece sitting there.
/// `map[i]` lists the facelets of corner slot `i`, starting with its U or D
/// sticker and going clockwise.
pub(crate) fn place_corner(
    facelets: &mut [u8],
    map: &[[usize; 3]; 8],
    per_face: usize,
    position: usize,
    piece: u8,
    orientation: u8,
) {
    for j in 0..3 {
        let target = map[position][(j + usize::from(orientation)) % 3];
        facelets[target] = (map[usize::from(piece)][j] / per_face) as u8;
    }
}

/// Recovers the piece and orientation at corner `position` from its
/// stickers. The orientation is the index of the U or D colored sticker.
pub(crate) fn read_corner(
    facelets: &[u8],
    map: &[[usize; 3]; 8],
    per_face: usize,
    position: usize,
) -> Result<(u8, u8), FaceletError> {
    const U_COLOR: u8 = 0;
    const D_COLOR: u8 = 3;
    let stickers = map[position];
    let orientation = (0..3)
        .find(|&ori| matches!(facelets[stickers[ori]], U_COLOR | D_COLOR))
        .ok_or(FaceletError::UnrecognizedCorner { position })?;
    let colors = [0, 1, 2].map(|j| usize::from(facelets[stickers[(orientation + j) % 3]]));
    let piece = map
        .iter()
        .position(|slot| (0..3).all(|j| colors[j] == slot[j] / per_face))
        .ok_or(FaceletError::UnrecognizedCorner { position })?;
    Ok((piece as u8, orientation as u8))
}
