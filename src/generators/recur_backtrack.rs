use rand::{Rng, seq::SliceRandom};

use crate::{
    generators::Farthest,
    maze::{Board, Direction, MazeError, Position},
};

/// Carves the board depth-first from its start cell.
///
/// Every direction of a cell is tried once, in random order, and the passage is
/// only opened when the neighbor is still isolated. Each cell is thus entered
/// exactly once and the passages form a spanning tree.
///
/// Recursion depth grows with the longest corridor, up to the number of cells;
/// large boards need a thread with a matching stack.
pub fn recursive_backtrack<R: Rng + ?Sized>(
    board: &mut Board,
    rng: &mut R,
) -> Result<Farthest, MazeError> {
    let farthest = carve(board, rng, board.start(), None, 0)?;
    tracing::debug!(
        "[backtrack] farthest cell {} at distance {}",
        farthest.cell,
        farthest.distance
    );
    Ok(farthest)
}

/// Carves every isolated cell reachable from `cell` and returns the farthest
/// cell of that subtree. `from` is the side leading back to the parent.
fn carve<R: Rng + ?Sized>(
    board: &mut Board,
    rng: &mut R,
    cell: Position,
    from: Option<Direction>,
    distance: u32,
) -> Result<Farthest, MazeError> {
    let mut farthest = Farthest { cell, distance };

    let mut directions = Direction::ALL;
    directions.shuffle(rng);

    for dir in directions {
        // Never carve back toward the parent
        if Some(dir) == from {
            continue;
        }
        let next = cell.neighbor(dir);
        if !board.exists(next) || !board.is_isolated(next)? {
            continue;
        }
        board.set_wall(cell, dir, false);

        let branch = carve(board, rng, next, Some(dir.opposite()), distance + 1)?;
        // Ties keep the branch tried first
        if branch.distance > farthest.distance {
            farthest = branch;
        }
    }
    Ok(farthest)
}
