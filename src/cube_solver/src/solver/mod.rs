use crate::{cubie::CubieCube, moves::Move};
use std::time::{Duration, Instant};
use thiserror::Error;

pub mod cube2;
pub mod two_phase;

/// The deadline is checked on the first node and then once per this many
/// nodes.
const DEADLINE_CHECK_INTERVAL: u64 = 1 << 12;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SolverError {
    #[error("No solution was found within the bound of {bound} moves")]
    NotSolved { bound: usize },
    #[error("Solvability checks support at most {supported} moves but {requested} were requested")]
    CheckLengthExceeded { requested: usize, supported: usize },
    #[error("Time limit exceeded")]
    TimeLimitExceeded,
}

/// What a search does when it reaches a state whose coordinates are solved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SearchMode {
    /// Accept the path, or hand it to the next phase.
    Solve,
    /// Accept the path only if it solves the real cube.
    Check,
}

/// The state owned by a single solve or check invocation.
struct SearchMutable {
    /// The moves from the root to the current node.
    path: Vec<Move>,
    nodes_visited: u64,
    deadline: Option<Instant>,
}

impl SearchMutable {
    fn new(time_limit: Option<Duration>) -> Self {
        SearchMutable {
            path: Vec::with_capacity(32),
            nodes_visited: 0,
            deadline: time_limit.and_then(|time_limit| Instant::now().checked_add(time_limit)),
        }
    }

    /// Counts a visited node.
    ///
    /// # Errors
    ///
    /// Fails once the deadline has passed.
    fn visit(&mut self) -> Result<(), SolverError> {
        self.nodes_visited += 1;
        if self.nodes_visited % DEADLINE_CHECK_INTERVAL == 1
            && self
                .deadline
                .is_some_and(|deadline| Instant::now() >= deadline)
        {
            return Err(SolverError::TimeLimitExceeded);
        }
        Ok(())
    }

    /// A scratch copy of `cube` with the current path applied.
    fn replay<C: CubieCube>(&self, cube: &C) -> C {
        let mut cube = cube.clone();
        cube.apply_moves(self.path.iter().copied());
        cube
    }
}
