use cube_solver::{
    Cube2, Cube2Solver, CubieCube, CubieError, FaceletCube, FaceletError, Move, MoveSequence,
    PieceKind, SolverError,
    cubie::cube2::{N_PERMUTATION, N_STATES, N_TWIST},
    solver::cube2::{MAX_CHECK_LENGTH, MAX_LENGTH, tables},
};
use std::collections::{HashMap, hash_map::Entry};

fn scrambled(moves: &[Move]) -> Cube2 {
    let mut cube = Cube2::SOLVED;
    cube.apply_moves(moves.iter().copied());
    cube
}

fn assert_solves(cube: &Cube2, solution: &MoveSequence) {
    let mut cube = *cube;
    cube.apply_moves(solution);
    assert!(cube.is_solved(), "{solution} does not solve the cube");
}

#[test_log::test]
fn test_quarter_turns_have_order_four() {
    for move_ in Move::all(3).filter(|move_| move_.power() == 1) {
        let mut cube = Cube2::SOLVED;
        for _ in 0..3 {
            cube.apply_move(move_);
            assert!(!cube.is_solved());
        }
        cube.apply_move(move_);
        assert!(cube.is_solved());
    }
    for move_ in Move::all(3) {
        assert_eq!(
            Cube2::move_cube(move_).multiply(Cube2::move_cube(move_.inverse())),
            Cube2::SOLVED
        );
    }
}

#[test_log::test]
fn test_facelet_turns_match_move_cubes() {
    for move_ in Move::all(3) {
        let mut facelet_cube = FaceletCube::solved(2).unwrap();
        facelet_cube.turn(move_);
        assert_eq!(facelet_cube, Cube2::move_cube(move_).to_facelet_cube());
        assert_eq!(
            &Cube2::from_facelet_cube(&facelet_cube).unwrap(),
            Cube2::move_cube(move_)
        );
    }
}

#[test_log::test]
fn test_facelet_round_trip() {
    assert_eq!(
        Cube2::SOLVED.to_facelet_cube(),
        FaceletCube::solved(2).unwrap()
    );
    for _ in 0..200 {
        let cube = Cube2::random();
        let round_trip = Cube2::from_facelet_cube(&cube.to_facelet_cube()).unwrap();
        assert_eq!(round_trip, cube);
        assert_eq!(
            round_trip.permutation_coordinate(),
            cube.permutation_coordinate()
        );
        assert_eq!(
            round_trip.orientation_coordinate(),
            cube.orientation_coordinate()
        );
    }
}

#[test_log::test]
fn test_coordinate_construction() {
    for _ in 0..200 {
        let cube = Cube2::random();
        let permutation = cube.permutation_coordinate();
        let twist = cube.orientation_coordinate();
        assert_eq!(Cube2::from_coordinates(permutation, twist).unwrap(), cube);
        let index = u32::from(permutation) * N_TWIST as u32 + u32::from(twist);
        assert_eq!(Cube2::from_index(index).unwrap(), cube);
    }
    assert_eq!(Cube2::from_index(0).unwrap(), Cube2::SOLVED);
    assert!(matches!(
        Cube2::from_index(N_STATES as u32),
        Err(CubieError::CoordinateOutOfRange { .. })
    ));
    assert_eq!(
        Cube2::from_coordinates(N_PERMUTATION as u16, 0),
        Err(CubieError::CoordinateOutOfRange {
            name: "permutation",
            value: N_PERMUTATION as u64,
            size: N_PERMUTATION as u64,
        })
    );
}

#[test_log::test]
fn test_construction_errors() {
    let identity = [0, 1, 2, 3, 4, 5, 6, 7];
    assert_eq!(
        Cube2::try_new([0, 0, 2, 3, 4, 5, 6, 7], [0; 8]),
        Err(CubieError::InvalidPermutation {
            kind: PieceKind::Corner,
            permutation: vec![0, 0, 2, 3, 4, 5, 6, 7],
        })
    );
    assert_eq!(
        Cube2::try_new(identity, [3, 0, 0, 0, 0, 0, 0, 0]),
        Err(CubieError::InvalidOrientation {
            kind: PieceKind::Corner,
            value: 3,
            modulus: 3,
        })
    );
    assert_eq!(
        Cube2::try_new(identity, [1, 0, 0, 0, 0, 0, 0, 0]),
        Err(CubieError::OrientationSum {
            kind: PieceKind::Corner,
            sum: 1,
            modulus: 3,
        })
    );
    assert_eq!(
        Cube2::try_new([0, 1, 2, 3, 4, 5, 7, 6], [0; 8]),
        Err(CubieError::UnpinnedCorner)
    );
    assert_eq!(
        Cube2::try_new(identity, [0, 0, 0, 0, 0, 0, 1, 2]),
        Err(CubieError::UnpinnedCorner)
    );
    // A single corner swap is fine on a 2x2x2
    assert!(Cube2::try_new([1, 0, 2, 3, 4, 5, 6, 7], [1, 2, 0, 0, 0, 0, 0, 0]).is_ok());
}

#[test_log::test]
fn test_facelet_errors() {
    assert_eq!(
        Cube2::from_facelet_cube(&FaceletCube::solved(3).unwrap()),
        Err(CubieError::Facelet(FaceletError::SizeMismatch {
            expected: 2,
            actual: 3,
        }))
    );

    // Swapping two stickers of one corner leaves a mirrored corner
    let mut facelets = FaceletCube::solved(2).unwrap().facelets().to_vec();
    facelets.swap(3, 9);
    let facelet_cube = FaceletCube::new(2, facelets).unwrap();
    assert_eq!(
        Cube2::from_facelet_cube(&facelet_cube),
        Err(CubieError::Facelet(FaceletError::UnrecognizedCorner {
            position: 0
        }))
    );

    // Twisting a single corner is recognized but not solvable
    let mut facelets = FaceletCube::solved(2).unwrap().facelets().to_vec();
    facelets[3] = 2;
    facelets[4] = 0;
    facelets[9] = 1;
    let facelet_cube = FaceletCube::new(2, facelets).unwrap();
    assert!(matches!(
        Cube2::from_facelet_cube(&facelet_cube),
        Err(CubieError::OrientationSum { .. })
    ));
}

#[test_log::test]
fn test_move_tables_match_multiplication() {
    let tables = tables();
    for _ in 0..500 {
        let cube = Cube2::random();
        for move_ in Move::all(3) {
            let mut next = cube;
            next.apply_move(move_);
            assert_eq!(
                tables
                    .permutation_moves
                    .get(cube.permutation_coordinate(), move_.index()),
                next.permutation_coordinate()
            );
            assert_eq!(
                tables
                    .twist_moves
                    .get(cube.orientation_coordinate(), move_.index()),
                next.orientation_coordinate()
            );
        }
    }
}

/// Distances of a single coordinate computed by walking real cubes.
fn coordinate_distances(size: usize, coordinate: impl Fn(&Cube2) -> u16) -> Vec<u8> {
    let mut distances = vec![u8::MAX; size];
    let mut frontier = vec![Cube2::SOLVED];
    distances[usize::from(coordinate(&Cube2::SOLVED))] = 0;
    let mut depth = 0;
    while !frontier.is_empty() {
        depth += 1;
        let mut next_frontier = vec![];
        for cube in &frontier {
            for move_ in Move::all(3) {
                let mut next = *cube;
                next.apply_move(move_);
                let distance = &mut distances[usize::from(coordinate(&next))];
                if *distance == u8::MAX {
                    *distance = depth;
                    next_frontier.push(next);
                }
            }
        }
        frontier = next_frontier;
    }
    distances
}

#[test_log::test]
fn test_pruning_tables_match_independent_search() {
    let tables = tables();
    let permutation_distances =
        coordinate_distances(N_PERMUTATION, Cube2::permutation_coordinate);
    for (permutation, &distance) in permutation_distances.iter().enumerate() {
        assert_eq!(
            tables.permutation_pruning.distance(permutation as u16, 0),
            distance
        );
    }
    let twist_distances = coordinate_distances(N_TWIST, Cube2::orientation_coordinate);
    for (twist, &distance) in twist_distances.iter().enumerate() {
        assert_eq!(tables.twist_pruning.distance(twist as u16, 0), distance);
    }
    assert_eq!(tables.permutation_pruning.max_depth(), 7);
    assert_eq!(tables.twist_pruning.max_depth(), 6);
}

#[test_log::test]
fn test_known_position() {
    use Move as M;
    let cube = scrambled(&[
        M::U2,
        M::R,
        M::U,
        M::F,
        M::U2,
        M::R2,
        M::U_PRIME,
        M::F,
        M::R_PRIME,
    ]);
    let solver = Cube2Solver::new(cube);
    assert!(!solver.is_solvable_in(6).unwrap());
    assert!(!solver.is_solvable_in(8).unwrap());
    assert!(solver.is_solvable_in(9).unwrap());
    assert!(solver.is_solvable_in(11).unwrap());
    assert_eq!(
        solver.is_solvable_in(12),
        Err(SolverError::CheckLengthExceeded {
            requested: 12,
            supported: MAX_CHECK_LENGTH,
        })
    );

    let solution = solver.solve().unwrap();
    assert_eq!(solution.len(), 9);
    assert_solves(&cube, &solution);
}

#[test_log::test]
fn test_random_states_are_solved() {
    for _ in 0..1000 {
        let cube = Cube2::random();
        let solution = Cube2Solver::new(cube).solve().unwrap();
        assert!(solution.len() <= MAX_LENGTH);
        assert_solves(&cube, &solution);
    }
}

#[test_log::test]
fn test_short_solutions_are_optimal() {
    // Every state within six moves, with its distance
    let mut distances = HashMap::from([(Cube2::SOLVED, 0_usize)]);
    let mut frontier = vec![Cube2::SOLVED];
    let mut layer_sizes = vec![1];
    for depth in 1..=6 {
        let mut next_frontier = vec![];
        for cube in &frontier {
            for move_ in Move::all(3) {
                let mut next = *cube;
                next.apply_move(move_);
                if let Entry::Vacant(entry) = distances.entry(next) {
                    entry.insert(depth);
                    next_frontier.push(next);
                }
            }
        }
        layer_sizes.push(next_frontier.len());
        frontier = next_frontier;
    }
    assert_eq!(layer_sizes, vec![1, 9, 54, 321, 1847, 9992, 50136]);

    for (cube, &distance) in distances.iter().step_by(37) {
        let solution = Cube2Solver::new(*cube).solve().unwrap();
        assert_eq!(solution.len(), distance);
        assert_solves(cube, &solution);
    }
}

#[test_log::test]
fn test_min_length() {
    let cube = scrambled(&[Move::R, Move::U]);
    let solver = Cube2Solver::new(cube);
    assert_eq!(solver.solve().unwrap().len(), 2);

    let solution = solver.solve_with_min_length(4).unwrap();
    assert!(solution.len() >= 4);
    assert_solves(&cube, &solution);

    assert_eq!(
        solver.solve_with_min_length(MAX_LENGTH + 1),
        Err(SolverError::NotSolved { bound: MAX_LENGTH })
    );
}

#[test_log::test]
fn test_generate_scrambles_solved_cube() {
    for _ in 0..50 {
        let cube = Cube2::random();
        let solver = Cube2Solver::new(cube);
        let solution = solver.solve().unwrap();
        let scramble = solver.generate().unwrap();
        assert_eq!(scramble, solution.inverse());
        assert_eq!(scrambled(scramble.moves()), cube);
    }

    let cube = scrambled(&[Move::F, Move::R2]);
    let scramble = Cube2Solver::new(cube).generate_with_min_length(5).unwrap();
    assert!(scramble.len() >= 5);
    assert_eq!(scrambled(scramble.moves()), cube);
}

#[test_log::test]
fn test_solved_cube() {
    let solver = Cube2Solver::new(Cube2::SOLVED);
    assert!(solver.solve().unwrap().is_empty());
    assert!(solver.is_solvable_in(0).unwrap());
}

#[test_log::test]
fn test_time_limit() {
    let solver = Cube2Solver::new(Cube2::random()).with_time_limit(std::time::Duration::ZERO);
    assert_eq!(solver.solve(), Err(SolverError::TimeLimitExceeded));
}
