use super::{
    CubieCube, CubieError, PieceKind, check_range, compose_orbit, place_corner, read_corner,
    validate_orientation, validate_permutation,
};
use crate::{FACT_UNTIL_12, coord, facelet::FaceletCube, moves::Move};
use std::sync::LazyLock;

/// The number of corner permutation coordinates. DBL never moves, so only
/// the other seven corners are counted.
pub const N_PERMUTATION: usize = FACT_UNTIL_12[7] as usize;
/// The number of corner orientation coordinates over the seven free corners.
pub const N_TWIST: usize = 729;
pub const N_STATES: usize = N_PERMUTATION * N_TWIST;

const URF: u8 = 0;
const UFL: u8 = 1;
const ULB: u8 = 2;
const UBR: u8 = 3;
const DLF: u8 = 4;
const DFR: u8 = 5;
const DRB: u8 = 6;
const DBL: u8 = 7;

/// The facelets of each corner slot, U or D sticker first, then clockwise.
const CORNER_FACELETS: [[usize; 3]; 8] = [
    [3, 4, 9],
    [2, 8, 17],
    [0, 16, 21],
    [1, 20, 5],
    [12, 19, 10],
    [13, 11, 6],
    [15, 7, 22],
    [14, 23, 18],
];

/// A 2x2x2 cube. The DBL corner is pinned in place, so U, R and F turns
/// reach every state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cube2 {
    cp: [u8; 8],
    co: [u8; 8],
}

const QUARTER_TURNS: [Cube2; 3] = [
    Cube2 {
        cp: [UBR, URF, UFL, ULB, DLF, DFR, DRB, DBL],
        co: [0; 8],
    },
    Cube2 {
        cp: [DFR, UFL, ULB, URF, DLF, DRB, UBR, DBL],
        co: [2, 0, 0, 1, 0, 1, 2, 0],
    },
    Cube2 {
        cp: [UFL, DLF, ULB, UBR, DFR, URF, DRB, DBL],
        co: [1, 2, 0, 0, 1, 2, 0, 0],
    },
];

static MOVE_CUBES: LazyLock<[Cube2; Cube2::MOVE_COUNT]> = LazyLock::new(|| {
    let mut cubes = [Cube2::SOLVED; Cube2::MOVE_COUNT];
    for (axis, generator) in QUARTER_TURNS.iter().enumerate() {
        cubes[axis * 3] = *generator;
        for power in 1..3 {
            cubes[axis * 3 + power] = cubes[axis * 3 + power - 1].multiply(generator);
        }
    }
    cubes
});

impl Cube2 {
    pub const SOLVED: Cube2 = Cube2 {
        cp: [URF, UFL, ULB, UBR, DLF, DFR, DRB, DBL],
        co: [0; 8],
    };

    /// Builds a cube from raw corner arrays.
    ///
    /// # Errors
    ///
    /// Fails if `cp` is not a permutation, an orientation is out of range,
    /// the orientations do not sum to a multiple of three, or DBL is not
    /// solved.
    pub fn try_new(cp: [u8; 8], co: [u8; 8]) -> Result<Self, CubieError> {
        validate_permutation(PieceKind::Corner, &cp)?;
        validate_orientation(PieceKind::Corner, &co, 3)?;
        if cp[7] != DBL || co[7] != 0 {
            return Err(CubieError::UnpinnedCorner);
        }
        Ok(Cube2 { cp, co })
    }

    /// # Errors
    ///
    /// Fails if either coordinate is outside its space.
    pub fn from_coordinates(permutation: u16, twist: u16) -> Result<Self, CubieError> {
        check_range("permutation", permutation.into(), N_PERMUTATION as u64)?;
        check_range("twist", twist.into(), N_TWIST as u64)?;
        let mut cube = Cube2::SOLVED;
        cube.set_permutation_coordinate(permutation);
        cube.set_twist_coordinate(twist);
        Ok(cube)
    }

    /// Builds the state numbered `permutation * N_TWIST + twist`.
    ///
    /// # Errors
    ///
    /// Fails if `index` is not below [`N_STATES`].
    pub fn from_index(index: u32) -> Result<Self, CubieError> {
        check_range("state", index.into(), N_STATES as u64)?;
        let twist = N_TWIST as u32;
        Self::from_coordinates((index / twist) as u16, (index % twist) as u16)
    }

    /// A uniformly random state.
    #[must_use]
    pub fn random() -> Self {
        let mut cube = Cube2::SOLVED;
        cube.set_permutation_coordinate(fastrand::u16(..N_PERMUTATION as u16));
        cube.set_twist_coordinate(fastrand::u16(..N_TWIST as u16));
        cube
    }

    /// Builds a cube from its stickers.
    ///
    /// # Errors
    ///
    /// Fails if the facelet cube is not a 2x2x2, a corner's stickers match no
    /// piece, or the pieces do not form a valid state.
    pub fn from_facelet_cube(facelet_cube: &FaceletCube) -> Result<Self, CubieError> {
        facelet_cube.expect_size(2)?;
        let mut cp = [0; 8];
        let mut co = [0; 8];
        for position in 0..8 {
            (cp[position], co[position]) =
                read_corner(facelet_cube.facelets(), &CORNER_FACELETS, 4, position)?;
        }
        Self::try_new(cp, co)
    }

    #[must_use]
    pub fn permutation(&self) -> &[u8; 8] {
        &self.cp
    }

    #[must_use]
    pub fn orientation(&self) -> &[u8; 8] {
        &self.co
    }

    /// The group product `self * other`: the state reached by applying
    /// `other` after `self`.
    #[must_use]
    pub fn multiply(&self, other: &Cube2) -> Cube2 {
        let (cp, co) = compose_orbit(&self.cp, &self.co, &other.cp, &other.co, 3);
        Cube2 { cp, co }
    }

    /// The state a single move produces from solved.
    ///
    /// # Panics
    ///
    /// Panics if the move turns the D, L or B face.
    #[must_use]
    pub fn move_cube(move_: Move) -> &'static Cube2 {
        &MOVE_CUBES[move_.index()]
    }

    pub(crate) fn set_permutation_coordinate(&mut self, index: u16) {
        coord::set_permutation(&mut self.cp[..7], index.into());
        self.cp[7] = DBL;
    }

    pub(crate) fn set_twist_coordinate(&mut self, index: u16) {
        coord::set_orientation(&mut self.co[..7], index, 3);
        self.co[7] = 0;
    }
}

impl Default for Cube2 {
    fn default() -> Self {
        Cube2::SOLVED
    }
}

impl CubieCube for Cube2 {
    const MOVE_COUNT: usize = 9;

    fn solved() -> Self {
        Cube2::SOLVED
    }

    fn apply_move(&mut self, move_: Move) {
        *self = self.multiply(Self::move_cube(move_));
    }

    fn permutation_coordinate(&self) -> u16 {
        coord::permutation_index(&self.cp[..7]) as u16
    }

    fn orientation_coordinate(&self) -> u16 {
        coord::orientation_index(&self.co[..7], 3)
    }

    fn to_facelet_cube(&self) -> FaceletCube {
        let mut facelets = vec![0; FaceletCube::FACES * 4];
        for position in 0..8 {
            place_corner(
                &mut facelets,
                &CORNER_FACELETS,
                4,
                position,
                self.cp[position],
                self.co[position],
            );
        }
        FaceletCube::from_raw(2, facelets)
    }
}
