use rand::{Rng, SeedableRng, rngs::StdRng};

mod recur_backtrack;
mod simultaneous;

pub use recur_backtrack::recursive_backtrack;
pub use simultaneous::{SimultaneousConfig, simultaneous_agents, simultaneous_agents_with};

use crate::maze::{Board, MazeError, Position};

/// Get a random number generator, optionally seeded for reproducibility.
pub fn get_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_os_rng(),
    }
}

/// The cell found farthest from the start, and its distance in steps.
///
/// Since a generated maze is a tree, the distance is also the length of the only
/// path between the start and that cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Farthest {
    pub cell: Position,
    pub distance: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Generator {
    RecurBacktrack,
    #[default]
    Simultaneous,
}

impl std::fmt::Display for Generator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Generator::RecurBacktrack => write!(f, "Recursive Backtracking"),
            Generator::Simultaneous => write!(f, "Simultaneous Agents"),
        }
    }
}

/// Carves `board` into a perfect maze with the given generator, starting from
/// `board.start()`. The farthest cell becomes `board.end()`.
///
/// The same seed on the same board dimensions and start always yields the same
/// maze. `None` draws a seed from the operating system.
pub fn generate_maze(
    board: &mut Board,
    generator: Generator,
    seed: Option<u64>,
) -> Result<Farthest, MazeError> {
    let mut rng = get_rng(seed);
    generate_maze_with_rng(board, generator, &mut rng)
}

/// Like [`generate_maze`], with the caller's random source.
pub fn generate_maze_with_rng<R: Rng + ?Sized>(
    board: &mut Board,
    generator: Generator,
    rng: &mut R,
) -> Result<Farthest, MazeError> {
    generate_maze_with(board, generator, rng, SimultaneousConfig::default())
}

/// Like [`generate_maze_with_rng`], with custom tuning for
/// [`Generator::Simultaneous`]. Other generators ignore `config`.
pub fn generate_maze_with<R: Rng + ?Sized>(
    board: &mut Board,
    generator: Generator,
    rng: &mut R,
    config: SimultaneousConfig,
) -> Result<Farthest, MazeError> {
    // Generators require every cell to start out isolated
    board.fill_walls();

    let farthest = match generator {
        Generator::RecurBacktrack => recursive_backtrack(board, rng)?,
        Generator::Simultaneous => simultaneous_agents_with(board, rng, config)?,
    };
    board.set_end(farthest.cell);

    tracing::info!(
        "[generate] {} carved a {}x{} board, exit at {} is {} steps from {}",
        generator,
        board.height(),
        board.width(),
        farthest.cell,
        farthest.distance,
        board.start()
    );
    Ok(farthest)
}

#[cfg(test)]
mod tests {
    use super::*;

    const GENERATORS: [Generator; 2] = [Generator::RecurBacktrack, Generator::Simultaneous];

    #[test]
    fn test_generate_sets_end() {
        for generator in GENERATORS {
            let mut board = Board::new(6, 9, Position::new(2, 3)).unwrap();
            let farthest = generate_maze(&mut board, generator, Some(7)).unwrap();
            assert_eq!(board.end(), farthest.cell);
            assert_eq!(board.open_passages(), board.len() - 1);
        }
    }

    #[test]
    fn test_same_seed_same_maze() {
        for generator in GENERATORS {
            let mut first = Board::new(8, 8, Position::new(0, 0)).unwrap();
            let mut second = Board::new(8, 8, Position::new(0, 0)).unwrap();
            let a = generate_maze(&mut first, generator, Some(42)).unwrap();
            let b = generate_maze(&mut second, generator, Some(42)).unwrap();
            assert_eq!(a, b);
            assert_eq!(first.cells(), second.cells());
        }
    }

    #[test]
    fn test_regenerating_resets_board() {
        let mut board = Board::new(5, 5, Position::new(4, 4)).unwrap();
        generate_maze(&mut board, Generator::RecurBacktrack, Some(1)).unwrap();
        let again = generate_maze(&mut board, Generator::Simultaneous, Some(2)).unwrap();
        assert_eq!(board.open_passages(), 24);
        assert_eq!(board.end(), again.cell);
    }

    #[test]
    fn test_single_cell_board() {
        for generator in GENERATORS {
            let mut board = Board::new(1, 1, Position::new(0, 0)).unwrap();
            let farthest = generate_maze(&mut board, generator, Some(3)).unwrap();
            assert_eq!(
                farthest,
                Farthest {
                    cell: Position::new(0, 0),
                    distance: 0
                }
            );
            assert_eq!(board.open_passages(), 0);
        }
    }
}
