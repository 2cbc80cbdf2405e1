use super::{
    CubieCube, CubieError, PieceKind, check_range, compose_orbit, place_corner, read_corner,
    validate_orientation, validate_permutation,
};
use crate::{
    FACT_UNTIL_12, coord,
    facelet::{FaceletCube, FaceletError},
    moves::Move,
};
use std::sync::LazyLock;

pub const N_CORNER_PERMUTATION: usize = FACT_UNTIL_12[8] as usize;
pub const N_TWIST: usize = 2187;
pub const N_EDGE_PERMUTATION: u32 = FACT_UNTIL_12[12];
pub const N_FLIP: usize = 2048;
/// The number of ways to choose the four E-slice edge positions.
pub const N_SLICE_POSITION: usize = coord::choose(12, 4) as usize;
/// Permutations of the eight U and D layer edges within their layers.
pub const N_UD_EDGE_PERMUTATION: usize = FACT_UNTIL_12[8] as usize;
/// Permutations of the four E-slice edges within the slice.
pub const N_SLICE_EDGE_PERMUTATION: usize = FACT_UNTIL_12[4] as usize;

const URF: u8 = 0;
const UFL: u8 = 1;
const ULB: u8 = 2;
const UBR: u8 = 3;
const DLF: u8 = 4;
const DFR: u8 = 5;
const DRB: u8 = 6;
const DBL: u8 = 7;

const UF: u8 = 0;
const UL: u8 = 1;
const UB: u8 = 2;
const UR: u8 = 3;
const DF: u8 = 4;
const DR: u8 = 5;
const DB: u8 = 6;
const DL: u8 = 7;
const FL: u8 = 8;
const BL: u8 = 9;
const BR: u8 = 10;
const FR: u8 = 11;

/// The first E-slice edge. Every edge from here on lives in the E slice.
const FIRST_SLICE_EDGE: u8 = FL;

/// The facelets of each corner slot, U or D sticker first, then clockwise.
const CORNER_FACELETS: [[usize; 3]; 8] = [
    [8, 9, 20],
    [6, 18, 38],
    [0, 36, 47],
    [2, 45, 11],
    [27, 44, 24],
    [29, 26, 15],
    [35, 17, 51],
    [33, 53, 42],
];

/// The facelets of each edge slot, reference sticker first.
const EDGE_FACELETS: [[usize; 2]; 12] = [
    [7, 19],
    [3, 37],
    [1, 46],
    [5, 10],
    [28, 25],
    [32, 16],
    [34, 52],
    [30, 43],
    [21, 41],
    [50, 39],
    [48, 14],
    [23, 12],
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cube3 {
    cp: [u8; 8],
    co: [u8; 8],
    ep: [u8; 12],
    eo: [u8; 12],
}

const QUARTER_TURNS: [Cube3; 6] = [
    Cube3 {
        cp: [UBR, URF, UFL, ULB, DLF, DFR, DRB, DBL],
        co: [0; 8],
        ep: [UR, UF, UL, UB, DF, DR, DB, DL, FL, BL, BR, FR],
        eo: [0; 12],
    },
    Cube3 {
        cp: [DFR, UFL, ULB, URF, DLF, DRB, UBR, DBL],
        co: [2, 0, 0, 1, 0, 1, 2, 0],
        ep: [UF, UL, UB, FR, DF, BR, DB, DL, FL, BL, UR, DR],
        eo: [0; 12],
    },
    Cube3 {
        cp: [UFL, DLF, ULB, UBR, DFR, URF, DRB, DBL],
        co: [1, 2, 0, 0, 1, 2, 0, 0],
        ep: [FL, UL, UB, UR, FR, DR, DB, DL, DF, BL, BR, UF],
        eo: [1, 0, 0, 0, 1, 0, 0, 0, 1, 0, 0, 1],
    },
    Cube3 {
        cp: [URF, UFL, ULB, UBR, DBL, DLF, DFR, DRB],
        co: [0; 8],
        ep: [UF, UL, UB, UR, DL, DF, DR, DB, FL, BL, BR, FR],
        eo: [0; 12],
    },
    Cube3 {
        cp: [URF, ULB, DBL, UBR, UFL, DFR, DRB, DLF],
        co: [0, 1, 2, 0, 2, 0, 0, 1],
        ep: [UF, BL, UB, UR, DF, DR, DB, FL, UL, DL, BR, FR],
        eo: [0; 12],
    },
    Cube3 {
        cp: [URF, UFL, UBR, DRB, DLF, DFR, DBL, ULB],
        co: [0, 0, 1, 2, 0, 0, 1, 2],
        ep: [UF, UL, BR, UR, DF, DR, BL, DL, FL, UB, DB, FR],
        eo: [0, 0, 1, 0, 0, 0, 1, 0, 0, 1, 1, 0],
    },
];

static MOVE_CUBES: LazyLock<[Cube3; Cube3::MOVE_COUNT]> = LazyLock::new(|| {
    let mut cubes = [Cube3::SOLVED; Cube3::MOVE_COUNT];
    for (axis, generator) in QUARTER_TURNS.iter().enumerate() {
        cubes[axis * 3] = *generator;
        for power in 1..3 {
            cubes[axis * 3 + power] = cubes[axis * 3 + power - 1].multiply(generator);
        }
    }
    cubes
});

impl Cube3 {
    pub const SOLVED: Cube3 = Cube3 {
        cp: [URF, UFL, ULB, UBR, DLF, DFR, DRB, DBL],
        co: [0; 8],
        ep: [UF, UL, UB, UR, DF, DR, DB, DL, FL, BL, BR, FR],
        eo: [0; 12],
    };

    /// Builds a cube from raw piece arrays.
    ///
    /// # Errors
    ///
    /// Fails if either permutation is not a bijection, an orientation is out
    /// of range, an orbit's orientations do not sum to zero, or the corner
    /// and edge permutations differ in parity.
    pub fn try_new(
        cp: [u8; 8],
        co: [u8; 8],
        ep: [u8; 12],
        eo: [u8; 12],
    ) -> Result<Self, CubieError> {
        validate_permutation(PieceKind::Corner, &cp)?;
        validate_permutation(PieceKind::Edge, &ep)?;
        validate_orientation(PieceKind::Corner, &co, 3)?;
        validate_orientation(PieceKind::Edge, &eo, 2)?;
        if coord::permutation_is_odd(&cp) != coord::permutation_is_odd(&ep) {
            return Err(CubieError::ParityMismatch);
        }
        Ok(Cube3 { cp, co, ep, eo })
    }

    /// Builds a cube from its corner permutation, twist, full edge
    /// permutation and flip coordinates.
    ///
    /// # Errors
    ///
    /// Fails if a coordinate is outside its space or the two permutations
    /// differ in parity.
    pub fn from_coordinates(
        corner_permutation: u16,
        twist: u16,
        edge_permutation: u32,
        flip: u16,
    ) -> Result<Self, CubieError> {
        check_range(
            "corner permutation",
            corner_permutation.into(),
            N_CORNER_PERMUTATION as u64,
        )?;
        check_range("twist", twist.into(), N_TWIST as u64)?;
        check_range(
            "edge permutation",
            edge_permutation.into(),
            N_EDGE_PERMUTATION.into(),
        )?;
        check_range("flip", flip.into(), N_FLIP as u64)?;
        if !Self::is_solvable(corner_permutation, edge_permutation) {
            return Err(CubieError::ParityMismatch);
        }
        let mut cube = Cube3::SOLVED;
        cube.set_corner_permutation(corner_permutation);
        cube.set_twist(twist);
        cube.set_edge_permutation(edge_permutation);
        cube.set_flip(flip);
        Ok(cube)
    }

    /// Whether a corner permutation and an edge permutation coordinate can
    /// coexist on a real cube.
    #[must_use]
    pub fn is_solvable(corner_permutation: u16, edge_permutation: u32) -> bool {
        coord::index_is_odd(corner_permutation.into(), 8)
            == coord::index_is_odd(edge_permutation.into(), 12)
    }

    /// A uniformly random state.
    #[must_use]
    pub fn random() -> Self {
        let corner_permutation = fastrand::u16(..N_CORNER_PERMUTATION as u16);
        let edge_permutation = loop {
            let edge_permutation = fastrand::u32(..N_EDGE_PERMUTATION);
            if Self::is_solvable(corner_permutation, edge_permutation) {
                break edge_permutation;
            }
        };
        let mut cube = Cube3::SOLVED;
        cube.set_corner_permutation(corner_permutation);
        cube.set_twist(fastrand::u16(..N_TWIST as u16));
        cube.set_edge_permutation(edge_permutation);
        cube.set_flip(fastrand::u16(..N_FLIP as u16));
        cube
    }

    /// A uniformly random state of the subgroup generated by U, D, R2, L2, F2
    /// and B2: no twist, no flip and the E-slice edges within the slice.
    #[must_use]
    pub fn random_domino() -> Self {
        let corner_permutation = fastrand::u16(..N_CORNER_PERMUTATION as u16);
        let ud_edge_permutation = fastrand::u16(..N_UD_EDGE_PERMUTATION as u16);
        let slice_edge_permutation = loop {
            let slice_edge_permutation = fastrand::u16(..N_SLICE_EDGE_PERMUTATION as u16);
            let ud_odd = coord::index_is_odd(ud_edge_permutation.into(), 8);
            let slice_odd = coord::index_is_odd(slice_edge_permutation.into(), 4);
            if coord::index_is_odd(corner_permutation.into(), 8) == (ud_odd != slice_odd) {
                break slice_edge_permutation;
            }
        };
        let mut cube = Cube3::SOLVED;
        cube.set_corner_permutation(corner_permutation);
        cube.set_slice_edge_permutation(slice_edge_permutation);
        cube.set_ud_edge_permutation(ud_edge_permutation);
        cube
    }

    /// Builds a cube from its stickers. Centers are ignored.
    ///
    /// # Errors
    ///
    /// Fails if the facelet cube is not a 3x3x3, a piece's stickers match no
    /// piece, or the pieces do not form a valid state.
    pub fn from_facelet_cube(facelet_cube: &FaceletCube) -> Result<Self, CubieError> {
        facelet_cube.expect_size(3)?;
        let facelets = facelet_cube.facelets();
        let mut cp = [0; 8];
        let mut co = [0; 8];
        for position in 0..8 {
            (cp[position], co[position]) =
                read_corner(facelets, &CORNER_FACELETS, 9, position)?;
        }
        let mut ep = [0; 12];
        let mut eo = [0; 12];
        for (position, stickers) in EDGE_FACELETS.iter().enumerate() {
            let colors = stickers.map(|sticker| usize::from(facelets[sticker]));
            (ep[position], eo[position]) = EDGE_FACELETS
                .iter()
                .enumerate()
                .find_map(|(piece, slot)| {
                    let home = slot.map(|sticker| sticker / 9);
                    if colors == home {
                        Some((piece as u8, 0))
                    } else if colors == [home[1], home[0]] {
                        Some((piece as u8, 1))
                    } else {
                        None
                    }
                })
                .ok_or(FaceletError::UnrecognizedEdge { position })?;
        }
        Self::try_new(cp, co, ep, eo)
    }

    #[must_use]
    pub fn corner_permutation(&self) -> u16 {
        coord::permutation_index(&self.cp) as u16
    }

    #[must_use]
    pub fn twist(&self) -> u16 {
        coord::orientation_index(&self.co, 3)
    }

    #[must_use]
    pub fn edge_permutation(&self) -> u32 {
        coord::permutation_index(&self.ep) as u32
    }

    #[must_use]
    pub fn flip(&self) -> u16 {
        coord::orientation_index(&self.eo, 2)
    }

    /// Which four positions hold the E-slice edges. Zero when they are all
    /// in the slice.
    #[must_use]
    pub fn slice_position(&self) -> u16 {
        coord::subset_index(&self.ep, FIRST_SLICE_EDGE)
    }

    /// The permutation of the first eight edge positions.
    ///
    /// Only meaningful once every U and D layer edge is in the U or D layer.
    #[must_use]
    pub fn ud_edge_permutation(&self) -> u16 {
        debug_assert!(self.ep[..8].iter().all(|&edge| edge < FIRST_SLICE_EDGE));
        coord::permutation_index(&self.ep[..8]) as u16
    }

    /// The relative order of the four edges in the E-slice positions. These
    /// are the last three Lehmer digits of the full edge permutation.
    #[must_use]
    pub fn slice_edge_permutation(&self) -> u16 {
        (self.edge_permutation() % N_SLICE_EDGE_PERMUTATION as u32) as u16
    }

    #[must_use]
    pub fn corners(&self) -> (&[u8; 8], &[u8; 8]) {
        (&self.cp, &self.co)
    }

    #[must_use]
    pub fn edges(&self) -> (&[u8; 12], &[u8; 12]) {
        (&self.ep, &self.eo)
    }

    /// The group product `self * other`: the state reached by applying
    /// `other` after `self`.
    #[must_use]
    pub fn multiply(&self, other: &Cube3) -> Cube3 {
        let (cp, co) = compose_orbit(&self.cp, &self.co, &other.cp, &other.co, 3);
        let (ep, eo) = compose_orbit(&self.ep, &self.eo, &other.ep, &other.eo, 2);
        Cube3 { cp, co, ep, eo }
    }

    /// The state a single move produces from solved.
    #[must_use]
    pub fn move_cube(move_: Move) -> &'static Cube3 {
        &MOVE_CUBES[move_.index()]
    }

    // The setters below overwrite one projection and leave the rest alone.
    // They may produce parity-inconsistent states, which is what move table
    // construction needs.

    pub(crate) fn set_corner_permutation(&mut self, index: u16) {
        coord::set_permutation(&mut self.cp, index.into());
    }

    pub(crate) fn set_twist(&mut self, index: u16) {
        coord::set_orientation(&mut self.co, index, 3);
    }

    pub(crate) fn set_edge_permutation(&mut self, index: u32) {
        coord::set_permutation(&mut self.ep, index.into());
    }

    pub(crate) fn set_flip(&mut self, index: u16) {
        coord::set_orientation(&mut self.eo, index, 2);
    }

    pub(crate) fn set_slice_position(&mut self, index: u16) {
        coord::set_subset(&mut self.ep, index, FIRST_SLICE_EDGE);
    }

    pub(crate) fn set_ud_edge_permutation(&mut self, index: u16) {
        coord::set_permutation(&mut self.ep[..8], index.into());
    }

    /// Sets the slice edge order and puts the U and D layer edges home.
    pub(crate) fn set_slice_edge_permutation(&mut self, index: u16) {
        coord::set_permutation(&mut self.ep, index.into());
    }
}

impl Default for Cube3 {
    fn default() -> Self {
        Cube3::SOLVED
    }
}

impl CubieCube for Cube3 {
    const MOVE_COUNT: usize = 18;

    fn solved() -> Self {
        Cube3::SOLVED
    }

    fn apply_move(&mut self, move_: Move) {
        *self = self.multiply(Self::move_cube(move_));
    }

    fn permutation_coordinate(&self) -> u16 {
        self.corner_permutation()
    }

    fn orientation_coordinate(&self) -> u16 {
        self.twist()
    }

    fn to_facelet_cube(&self) -> FaceletCube {
        let mut facelets = vec![0; FaceletCube::FACES * 9];
        for face in 0..FaceletCube::FACES {
            facelets[face * 9 + 4] = face as u8;
        }
        for position in 0..8 {
            place_corner(
                &mut facelets,
                &CORNER_FACELETS,
                9,
                position,
                self.cp[position],
                self.co[position],
            );
        }
        for position in 0..12 {
            let piece = &EDGE_FACELETS[usize::from(self.ep[position])];
            for j in 0..2 {
                let target = EDGE_FACELETS[position][(j + usize::from(self.eo[position])) % 2];
                facelets[target] = (piece[j] / 9) as u8;
            }
        }
        FaceletCube::from_raw(3, facelets)
    }
}
