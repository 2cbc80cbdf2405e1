//! Kociemba's two-phase algorithm.
//!
//! Phase 1 searches over all 18 moves until the cube reaches the subgroup
//! generated by U, D, R2, L2, F2 and B2, where every piece is oriented and
//! the E-slice edges are in the E slice. Phase 2 then solves the cube with
//! those moves only. Each phase is an IDA* search over coordinates with a
//! pair of pruning tables as its heuristic.
//!
//! The returned solution is the first pair of phase lengths, in order of
//! phase 1 length, that fully solves the cube within the bound. It is not
//! necessarily the shortest solution.

use super::{SearchMode, SearchMutable, SolverError};
use crate::{
    cubie::{
        CubieCube,
        cube3::{
            Cube3, N_CORNER_PERMUTATION, N_FLIP, N_SLICE_EDGE_PERMUTATION, N_SLICE_POSITION,
            N_TWIST, N_UD_EDGE_PERMUTATION,
        },
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

/// Every state is at most this many moves away from the phase 2 subgroup.
pub const MAX_PHASE1_LENGTH: usize = 20;
/// Every state of the phase 2 subgroup is solvable in this many phase 2
/// moves.
pub const MAX_PHASE2_LENGTH: usize = 18;
/// The largest bound [`Cube3Solver::is_solvable_in`] accepts.
pub const MAX_CHECK_LENGTH: usize = 11;
/// The bound [`Cube3Solver::solve`] uses unless configured otherwise.
pub const DEFAULT_MAX_LENGTH: usize = 30;

/// The moves that keep a cube inside the phase 2 subgroup.
pub const PHASE2_MOVES: [Move; 10] = [
    Move::U,
    Move::U2,
    Move::U_PRIME,
    Move::R2,
    Move::F2,
    Move::D,
    Move::D2,
    Move::D_PRIME,
    Move::L2,
    Move::B2,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Phase1Coordinates {
    pub twist: u16,
    pub flip: u16,
    pub slice_position: u16,
}

impl Phase1Coordinates {
    #[must_use]
    pub fn of(cube: &Cube3) -> Self {
        Phase1Coordinates {
            twist: cube.twist(),
            flip: cube.flip(),
            slice_position: cube.slice_position(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Phase2Coordinates {
    pub corner_permutation: u16,
    pub ud_edge_permutation: u16,
    pub slice_edge_permutation: u16,
}

impl Phase2Coordinates {
    /// # Panics
    ///
    /// May panic in debug builds if the cube is not in the phase 2
    /// subgroup.
    #[must_use]
    pub fn of(cube: &Cube3) -> Self {
        Phase2Coordinates {
            corner_permutation: cube.corner_permutation(),
            ud_edge_permutation: cube.ud_edge_permutation(),
            slice_edge_permutation: cube.slice_edge_permutation(),
        }
    }
}

/// Move tables over all 18 moves and the phase 1 heuristic.
pub struct Phase1Tables {
    pub twist_moves: MoveTable,
    pub flip_moves: MoveTable,
    pub slice_position_moves: MoveTable,
    pub twist_slice_pruning: PruningTable,
    pub flip_slice_pruning: PruningTable,
    solved: Phase1Coordinates,
}

/// Move tables over [`PHASE2_MOVES`] and the phase 2 heuristic. Move index
/// `i` of these tables is `PHASE2_MOVES[i]`.
pub struct Phase2Tables {
    pub corner_moves: MoveTable,
    pub ud_edge_moves: MoveTable,
    pub slice_edge_moves: MoveTable,
    pub corner_slice_pruning: PruningTable,
    pub edge_slice_pruning: PruningTable,
    solved: Phase2Coordinates,
}

static PHASE1_TABLES: LazyLock<Phase1Tables> = LazyLock::new(Phase1Tables::generate);
static PHASE2_TABLES: LazyLock<Phase2Tables> = LazyLock::new(Phase2Tables::generate);

/// The phase 1 tables, built by the first caller.
pub fn phase1_tables() -> &'static Phase1Tables {
    &PHASE1_TABLES
}

/// The phase 2 tables, built by the first caller.
pub fn phase2_tables() -> &'static Phase2Tables {
    &PHASE2_TABLES
}

/// A solved cube with one projection replaced, the representative a move
/// table decodes a coordinate to.
fn representative(set: impl Fn(&mut Cube3, u16)) -> impl Fn(u16) -> Cube3 {
    move |index| {
        let mut cube = Cube3::SOLVED;
        set(&mut cube, index);
        cube
    }
}

impl Phase1Tables {
    fn generate() -> Self {
        let moves = Move::all(Axis::ALL.len()).collect::<Vec<_>>();
        let twist_moves = MoveTable::generate(
            "twist",
            N_TWIST,
            &moves,
            representative(Cube3::set_twist),
            Cube3::twist,
        );
        let flip_moves = MoveTable::generate(
            "flip",
            N_FLIP,
            &moves,
            representative(Cube3::set_flip),
            Cube3::flip,
        );
        let slice_position_moves = MoveTable::generate(
            "slice position",
            N_SLICE_POSITION,
            &moves,
            representative(Cube3::set_slice_position),
            Cube3::slice_position,
        );
        let solved = Phase1Coordinates::of(&Cube3::SOLVED);
        let twist_slice_pruning = PruningTable::generate(
            "twist and slice position",
            &twist_moves,
            &slice_position_moves,
            (solved.twist, solved.slice_position),
        );
        let flip_slice_pruning = PruningTable::generate(
            "flip and slice position",
            &flip_moves,
            &slice_position_moves,
            (solved.flip, solved.slice_position),
        );
        Phase1Tables {
            twist_moves,
            flip_moves,
            slice_position_moves,
            twist_slice_pruning,
            flip_slice_pruning,
            solved,
        }
    }

    /// The coordinates after the move with id `move_index`.
    #[must_use]
    pub fn apply(&self, coordinates: Phase1Coordinates, move_index: usize) -> Phase1Coordinates {
        Phase1Coordinates {
            twist: self.twist_moves.get(coordinates.twist, move_index),
            flip: self.flip_moves.get(coordinates.flip, move_index),
            slice_position: self
                .slice_position_moves
                .get(coordinates.slice_position, move_index),
        }
    }

    /// A lower bound on the number of moves needed to reach the phase 2
    /// subgroup.
    #[must_use]
    pub fn heuristic(&self, coordinates: Phase1Coordinates) -> u8 {
        self.twist_slice_pruning
            .distance(coordinates.twist, coordinates.slice_position)
            .max(
                self.flip_slice_pruning
                    .distance(coordinates.flip, coordinates.slice_position),
            )
    }

    #[must_use]
    pub fn solved(&self) -> Phase1Coordinates {
        self.solved
    }
}

impl Phase2Tables {
    fn generate() -> Self {
        let corner_moves = MoveTable::generate(
            "corner permutation",
            N_CORNER_PERMUTATION,
            &PHASE2_MOVES,
            representative(Cube3::set_corner_permutation),
            Cube3::corner_permutation,
        );
        let ud_edge_moves = MoveTable::generate(
            "UD edge permutation",
            N_UD_EDGE_PERMUTATION,
            &PHASE2_MOVES,
            representative(Cube3::set_ud_edge_permutation),
            Cube3::ud_edge_permutation,
        );
        let slice_edge_moves = MoveTable::generate(
            "slice edge permutation",
            N_SLICE_EDGE_PERMUTATION,
            &PHASE2_MOVES,
            representative(Cube3::set_slice_edge_permutation),
            Cube3::slice_edge_permutation,
        );
        let solved = Phase2Coordinates::of(&Cube3::SOLVED);
        let corner_slice_pruning = PruningTable::generate(
            "corner and slice edge permutation",
            &corner_moves,
            &slice_edge_moves,
            (solved.corner_permutation, solved.slice_edge_permutation),
        );
        let edge_slice_pruning = PruningTable::generate(
            "UD edge and slice edge permutation",
            &ud_edge_moves,
            &slice_edge_moves,
            (solved.ud_edge_permutation, solved.slice_edge_permutation),
        );
        Phase2Tables {
            corner_moves,
            ud_edge_moves,
            slice_edge_moves,
            corner_slice_pruning,
            edge_slice_pruning,
            solved,
        }
    }

    /// The coordinates after `PHASE2_MOVES[move_index]`.
    #[must_use]
    pub fn apply(&self, coordinates: Phase2Coordinates, move_index: usize) -> Phase2Coordinates {
        Phase2Coordinates {
            corner_permutation: self
                .corner_moves
                .get(coordinates.corner_permutation, move_index),
            ud_edge_permutation: self
                .ud_edge_moves
                .get(coordinates.ud_edge_permutation, move_index),
            slice_edge_permutation: self
                .slice_edge_moves
                .get(coordinates.slice_edge_permutation, move_index),
        }
    }

    /// A lower bound on the number of phase 2 moves needed to solve a state
    /// of the phase 2 subgroup.
    #[must_use]
    pub fn heuristic(&self, coordinates: Phase2Coordinates) -> u8 {
        self.corner_slice_pruning
            .distance(
                coordinates.corner_permutation,
                coordinates.slice_edge_permutation,
            )
            .max(self.edge_slice_pruning.distance(
                coordinates.ud_edge_permutation,
                coordinates.slice_edge_permutation,
            ))
    }

    #[must_use]
    pub fn solved(&self) -> Phase2Coordinates {
        self.solved
    }
}

#[derive(Debug, Clone)]
pub struct Cube3Solver {
    cube: Cube3,
    max_length: usize,
    time_limit: Option<Duration>,
}

impl Cube3Solver {
    #[must_use]
    pub fn new(cube: Cube3) -> Self {
        Cube3Solver {
            cube,
            max_length: DEFAULT_MAX_LENGTH,
            time_limit: None,
        }
    }

    /// Sets the bound [`Cube3Solver::solve`] and [`Cube3Solver::generate`]
    /// use.
    #[must_use]
    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length;
        self
    }

    #[must_use]
    pub fn with_time_limit(mut self, time_limit: Duration) -> Self {
        self.time_limit = Some(time_limit);
        self
    }

    #[must_use]
    pub fn cube(&self) -> &Cube3 {
        &self.cube
    }

    /// Finds a solution within the configured bound.
    ///
    /// # Errors
    ///
    /// See [`Cube3Solver::solve_within`].
    pub fn solve(&self) -> Result<MoveSequence, SolverError> {
        self.solve_within(self.max_length)
    }

    /// Finds a solution of at most `max_length` moves.
    ///
    /// # Errors
    ///
    /// Fails with [`SolverError::NotSolved`] if the two-phase search finds
    /// no solution within `max_length` moves, or
    /// [`SolverError::TimeLimitExceeded`].
    pub fn solve_within(&self, max_length: usize) -> Result<MoveSequence, SolverError> {
        info!(
            start!("Searching for a two-phase solution of at most {} moves"),
            max_length
        );
        let start = Instant::now();
        let tables = phase1_tables();
        let coordinates = Phase1Coordinates::of(&self.cube);
        let lower_bound = usize::from(tables.heuristic(coordinates));

        let mut mutable = SearchMutable::new(self.time_limit);
        for depth in lower_bound..=max_length.min(MAX_PHASE1_LENGTH) {
            debug!(working!("Searching phase 1 depth {}..."), depth);
            let depth_start = Instant::now();
            let found = self.phase1(
                tables,
                &mut mutable,
                coordinates,
                depth as u8,
                None,
                max_length,
                SearchMode::Solve,
            )?;
            debug!(
                working!("Traversed {} nodes in {:.3}s"),
                mutable.nodes_visited,
                depth_start.elapsed().as_secs_f64()
            );
            if found {
                info!(
                    success!("Found a {}-move solution in {:.3}s"),
                    mutable.path.len(),
                    start.elapsed().as_secs_f64()
                );
                return Ok(MoveSequence::new(mutable.path));
            }
            mutable.nodes_visited = 0;
        }
        Err(SolverError::NotSolved { bound: max_length })
    }

    /// Finds a sequence that scrambles the solved cube into this state,
    /// within the configured bound.
    ///
    /// # Errors
    ///
    /// See [`Cube3Solver::solve_within`].
    pub fn generate(&self) -> Result<MoveSequence, SolverError> {
        self.generate_within(self.max_length)
    }

    /// # Errors
    ///
    /// See [`Cube3Solver::solve_within`].
    pub fn generate_within(&self, max_length: usize) -> Result<MoveSequence, SolverError> {
        self.solve_within(max_length)
            .map(|solution| solution.inverse())
    }

    /// Whether the cube can be solved in at most `max_length` moves. Only
    /// phase 1 runs: a path that reaches the subgroup counts if it solves
    /// the cube outright.
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
        let tables = phase1_tables();
        let coordinates = Phase1Coordinates::of(&self.cube);
        let lower_bound = usize::from(tables.heuristic(coordinates));

        let mut mutable = SearchMutable::new(self.time_limit);
        for depth in lower_bound..=max_length {
            debug!(working!("Checking depth {}..."), depth);
            if self.phase1(
                tables,
                &mut mutable,
                coordinates,
                depth as u8,
                None,
                max_length,
                SearchMode::Check,
            )? {
                debug!("Solvable with {}", MoveSequence::new(mutable.path));
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Depth-first search for a phase 1 path of exactly `remaining` more
    /// moves, with the same canonical ordering as the 2x2x2 search.
    fn phase1(
        &self,
        tables: &Phase1Tables,
        mutable: &mut SearchMutable,
        coordinates: Phase1Coordinates,
        remaining: u8,
        last_axis: Option<Axis>,
        max_length: usize,
        mode: SearchMode,
    ) -> Result<bool, SolverError> {
        mutable.visit()?;
        if remaining == 0 {
            if coordinates != tables.solved {
                return Ok(false);
            }
            return match mode {
                SearchMode::Check => Ok(mutable.replay(&self.cube).is_solved()),
                SearchMode::Solve => self.start_phase2(mutable, last_axis, max_length),
            };
        }
        for axis in Axis::ALL {
            if !axis.may_follow(last_axis) {
                continue;
            }
            for power in 1..=3 {
                let move_ = Move::new(axis, power);
                let next = tables.apply(coordinates, move_.index());
                let heuristic = tables.heuristic(next);
                if heuristic > remaining {
                    break;
                }
                if heuristic == remaining {
                    continue;
                }
                mutable.path.push(move_);
                if self.phase1(
                    tables,
                    mutable,
                    next,
                    remaining - 1,
                    Some(axis),
                    max_length,
                    mode,
                )? {
                    return Ok(true);
                }
                mutable.path.pop();
            }
        }
        Ok(false)
    }

    /// Runs phase 2 from the end of the current phase 1 path, on the real
    /// corner and edge permutations the path leads to.
    fn start_phase2(
        &self,
        mutable: &mut SearchMutable,
        last_axis: Option<Axis>,
        max_length: usize,
    ) -> Result<bool, SolverError> {
        let cube = mutable.replay(&self.cube);
        // A phase 1 path ending in a phase 2 move is a shorter phase 1 path
        // followed by phase 2, which a smaller phase 1 depth already covered
        if mutable
            .path
            .last()
            .is_some_and(|last| PHASE2_MOVES.contains(last))
            && !cube.is_solved()
        {
            return Ok(false);
        }

        let tables = phase2_tables();
        let coordinates = Phase2Coordinates::of(&cube);
        let lower_bound = usize::from(tables.heuristic(coordinates));
        let budget = max_length
            .saturating_sub(mutable.path.len())
            .min(MAX_PHASE2_LENGTH);
        for depth in lower_bound..=budget {
            if self.phase2(tables, mutable, coordinates, depth as u8, last_axis)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Depth-first search for a phase 2 path of exactly `remaining` more
    /// moves.
    fn phase2(
        &self,
        tables: &Phase2Tables,
        mutable: &mut SearchMutable,
        coordinates: Phase2Coordinates,
        remaining: u8,
        last_axis: Option<Axis>,
    ) -> Result<bool, SolverError> {
        mutable.visit()?;
        if remaining == 0 {
            return Ok(coordinates == tables.solved);
        }
        for (move_index, &move_) in PHASE2_MOVES.iter().enumerate() {
            let axis = move_.axis();
            if !axis.may_follow(last_axis) {
                continue;
            }
            let next = tables.apply(coordinates, move_index);
            if tables.heuristic(next) >= remaining {
                continue;
            }
            mutable.path.push(move_);
            if self.phase2(tables, mutable, next, remaining - 1, Some(axis))? {
                return Ok(true);
            }
            mutable.path.pop();
        }
        Ok(false)
    }
}
