#![warn(clippy::pedantic)]
#![allow(
    clippy::similar_names,
    clippy::too_many_lines,
    clippy::too_many_arguments
)]

pub mod coord;
pub mod cubie;
pub mod facelet;
pub mod move_table;
pub mod moves;
pub mod pruning;
pub mod solver;

pub use cubie::{CubieCube, CubieError, PieceKind, cube2::Cube2, cube3::Cube3};
pub use facelet::{FaceletCube, FaceletError};
pub use moves::{Axis, Move, MoveSequence};
pub use solver::{SolverError, cube2::Cube2Solver, two_phase::Cube3Solver};

#[macro_export]
macro_rules! start {
    ($msg:expr) => {
        concat!("⏳ ", $msg)
    };
}

#[macro_export]
macro_rules! working {
    ($msg:expr) => {
        concat!("🛠  ", $msg)
    };
}

#[macro_export]
macro_rules! success {
    ($msg:expr) => {
        concat!("✅ ", $msg)
    };
}

/// A precomputed factorial table for 0! to 12!, where index[i] is i!. 12! is
/// the largest factorial a cube coordinate space needs and still fits in a
/// `u32`.
pub(crate) const FACT_UNTIL_12: [u32; 13] = {
    let mut arr = [0; 13];
    arr[0] = 1;
    let mut i = 1;
    while i < arr.len() {
        arr[i] = arr[i - 1] * i as u32;
        i += 1;
    }
    arr
};
