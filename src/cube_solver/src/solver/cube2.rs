//! Optimal 2x2x2 solving with IDA* over the permutation and twist
//! coordinates.

use super::{SearchMode, SearchMutable, SolverError};
use crate::{
    cubie::{
        CubieCube,
        cube2::{Cube2, N_PERMUTATION, N_TWIST},
    },
    move_table::MoveTable,
    moves::{Axis, Move, MoveSequence},
    pruning::PruningTable,
    start, success, working,
};
use log::{debug, info};
use std::{
    sync::LazyLock,
    time::{Duration, Instant},
};

/// Every 2x2x2 state can be solved in this many moves.
pub const MAX_LENGTH: usize = 11;
/// The largest bound [`Cube2Solver::is_solvable_in`] accepts.
pub const MAX_CHECK_LENGTH: usize = 11;

const AXES: [Axis; 3] = [Axis::U, Axis::R, Axis::F];

pub struct Cube2Tables {
    pub permutation_moves: MoveTable,
    pub twist_moves: MoveTable,
    pub permutation_pruning: PruningTable,
    pub twist_pruning: PruningTable,
    solved: (u16, u16),
}

static TABLES: LazyLock<Cube2Tables> = LazyLock::new(Cube2Tables::generate);

/// The 2x2x2 tables, built by the first caller.
pub fn tables() -> &'static Cube2Tables {
    &TABLES
}

impl Cube2Tables {
    fn generate() -> Self {
        let moves = Move::all(AXES.len()).collect::<Vec<_>>();
        let permutation_moves = MoveTable::generate(
            "2x2x2 permutation",
            N_PERMUTATION,
            &moves,
            |index| {
                let mut cube = Cube2::SOLVED;
                cube.set_permutation_coordinate(index);
                cube
            },
            Cube2::permutation_coordinate,
        );
        let twist_moves = MoveTable::generate(
            "2x2x2 twist",
            N_TWIST,
            &moves,
            |index| {
                let mut cube = Cube2::SOLVED;
                cube.set_twist_coordinate(index);
                cube
            },
            Cube2::orientation_coordinate,
        );
        let solved = (
            Cube2::SOLVED.permutation_coordinate(),
            Cube2::SOLVED.orientation_coordinate(),
        );
        let permutation_pruning =
            PruningTable::generate_single("2x2x2 permutation", &permutation_moves, solved.0);
        let twist_pruning = PruningTable::generate_single("2x2x2 twist", &twist_moves, solved.1);
        Cube2Tables {
            permutation_moves,
            twist_moves,
            permutation_pruning,
            twist_pruning,
            solved,
        }
    }

    /// A lower bound on the number of moves needed to solve a state.
    #[must_use]
    pub fn heuristic(&self, permutation: u16, twist: u16) -> u8 {
        self.permutation_pruning
            .distance(permutation, 0)
            .max(self.twist_pruning.distance(twist, 0))
    }
}

#[derive(Debug, Clone)]
pub struct Cube2Solver {
    cube: Cube2,
    time_limit: Option<Duration>,
}

impl Cube2Solver {
    #[must_use]
    pub fn new(cube: Cube2) -> Self {
        Cube2Solver {
            cube,
            time_limit: None,
        }
    }

    #[must_use]
    pub fn with_time_limit(mut self, time_limit: Duration) -> Self {
        self.time_limit = Some(time_limit);
        self
    }

    #[must_use]
    pub fn cube(&self) -> &Cube2 {
        &self.cube
    }

    /// Finds an optimal solution.
    ///
    /// # Errors
    ///
    /// Only fails if the time limit is exceeded.
    pub fn solve(&self) -> Result<MoveSequence, SolverError> {
        self.solve_with_min_length(0)
    }

    /// Finds the shortest solution that is at least `min_length` moves long.
    ///
    /// # Errors
    ///
    /// Fails with [`SolverError::NotSolved`] if no such solution exists
    /// within [`MAX_LENGTH`] moves.
    pub fn solve_with_min_length(&self, min_length: usize) -> Result<MoveSequence, SolverError> {
        info!(
            start!("Searching for a 2x2x2 solution of at least {} moves"),
            min_length
        );
        let start = Instant::now();
        let tables = tables();
        let permutation = self.cube.permutation_coordinate();
        let twist = self.cube.orientation_coordinate();
        let lower_bound = usize::from(tables.heuristic(permutation, twist));

        let mut mutable = SearchMutable::new(self.time_limit);
        for depth in min_length.max(lower_bound)..=MAX_LENGTH {
            debug!(working!("Searching depth {}..."), depth);
            let depth_start = Instant::now();
            let found = self.search(
                tables,
                &mut mutable,
                permutation,
                twist,
                depth as u8,
                None,
                SearchMode::Solve,
            )?;
            debug!(
                working!("Traversed {} nodes in {:.3}s"),
                mutable.nodes_visited,
                depth_start.elapsed().as_secs_f64()
            );
            if found {
                info!(
                    success!("Found a {}-move 2x2x2 solution in {:.3}s"),
                    depth,
                    start.elapsed().as_secs_f64()
                );
                return Ok(MoveSequence::new(mutable.path));
            }
            mutable.nodes_visited = 0;
        }
        Err(SolverError::NotSolved { bound: MAX_LENGTH })
    }

    /// Finds a sequence that scrambles the solved cube into this state.
    ///
    /// # Errors
    ///
    /// Only fails if the time limit is exceeded.
    pub fn generate(&self) -> Result<MoveSequence, SolverError> {
        self.generate_with_min_length(0)
    }

    /// Like [`Cube2Solver::generate`], with a sequence at least `min_length`
    /// moves long.
    ///
    /// # Errors
    ///
    /// See [`Cube2Solver::solve_with_min_length`].
    pub fn generate_with_min_length(&self, min_length: usize) -> Result<MoveSequence, SolverError> {
        self.solve_with_min_length(min_length)
            .map(|solution| solution.inverse())
    }

    /// Whether the cube can be solved in at most `max_length` moves.
    ///
    /// # Errors
    ///
    /// Fails with [`SolverError::CheckLengthExceeded`] if `max_length`
    /// exceeds [`MAX_CHECK_LENGTH`].
    pub fn is_solvable_in(&self, max_length: usize) -> Result<bool, SolverError> {
        if max_length > MAX_CHECK_LENGTH {
            return Err(SolverError::CheckLengthExceeded {
                requested: max_length,
                supported: MAX_CHECK_LENGTH,
            });
        }
        let tables = tables();
        let permutation = self.cube.permutation_coordinate();
        let twist = self.cube.orientation_coordinate();
        let lower_bound = usize::from(tables.heuristic(permutation, twist));

        let mut mutable = SearchMutable::new(self.time_limit);
        for depth in lower_bound..=max_length {
            if self.search(
                tables,
                &mut mutable,
                permutation,
                twist,
                depth as u8,
                None,
                SearchMode::Check,
            )? {
                debug!("Solvable with {}", MoveSequence::new(mutable.path));
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Depth-first search for a path of exactly `remaining` moves. Only
    /// canonical sequences are searched: no two consecutive turns on the
    /// same axis, and opposite faces turn with U, R or F first.
    fn search(
        &self,
        tables: &Cube2Tables,
        mutable: &mut SearchMutable,
        permutation: u16,
        twist: u16,
        remaining: u8,
        last_axis: Option<Axis>,
        mode: SearchMode,
    ) -> Result<bool, SolverError> {
        mutable.visit()?;
        if remaining == 0 {
            return Ok((permutation, twist) == tables.solved
                && (mode == SearchMode::Solve || mutable.replay(&self.cube).is_solved()));
        }
        for axis in AXES {
            if !axis.may_follow(last_axis) {
                continue;
            }
            for power in 1..=3 {
                let move_ = Move::new(axis, power);
                let next_permutation = tables.permutation_moves.get(permutation, move_.index());
                let next_twist = tables.twist_moves.get(twist, move_.index());
                let heuristic = tables.heuristic(next_permutation, next_twist);
                // The other powers of this axis are one move from this child,
                // so none of them is within reach either
                if heuristic > remaining {
                    break;
                }
                if heuristic == remaining {
                    continue;
                }
                mutable.path.push(move_);
                if self.search(
                    tables,
                    mutable,
                    next_permutation,
                    next_twist,
                    remaining - 1,
                    Some(axis),
                    mode,
                )? {
                    return Ok(true);
                }
                mutable.path.pop();
            }
        }
        Ok(false)
    }
}
