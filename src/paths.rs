//! Direct corridors carved between two cells.
//!
//! These helpers ignore the spanning-tree guarantee of the generators: carving
//! a corridor through a finished maze usually opens cycles. They are meant for
//! decorative or guided paths layered on top of a board.

use crate::maze::{Board, Direction, Position};

/// Carves a corridor approximating the straight line between two cells.
///
/// The Manhattan distance is split into as many steps, rows and columns being
/// interpolated independently, and consecutive points are joined with
/// [`angle_path`].
///
/// # Returns
/// Number of walls removed
pub fn straight_path(board: &mut Board, from: Position, to: Position) -> usize {
    let (from, to) = if from.row > to.row || from.col > to.col {
        (to, from)
    } else {
        (from, to)
    };

    let num_steps = from.manhattan(to);
    if num_steps == 0 {
        return 0;
    }
    let delta_row = f64::from(to.row - from.row) / f64::from(num_steps);
    let delta_col = f64::from(to.col - from.col) / f64::from(num_steps);

    let mut current = from;
    let mut opened = 0;
    for step in 1..=num_steps {
        let next = if step == num_steps {
            // Land exactly on the target whatever the rounding
            to
        } else {
            Position::new(
                (f64::from(from.row) + f64::from(step) * delta_row).floor() as i32,
                (f64::from(from.col) + f64::from(step) * delta_col).floor() as i32,
            )
        };
        opened += angle_path(board, current, next);
        current = next;
    }
    opened
}

/// Carves an L-shaped corridor: vertically until the row matches, then
/// horizontally until the column matches.
///
/// Walls outside the board are skipped.
///
/// # Returns
/// Number of walls removed
pub fn angle_path(board: &mut Board, from: Position, to: Position) -> usize {
    let vertical = if to.row > from.row {
        Direction::Down
    } else {
        Direction::Up
    };
    let horizontal = if to.col > from.col {
        Direction::Right
    } else {
        Direction::Left
    };

    let mut current = from;
    let mut opened = 0;
    while current.row != to.row {
        if board.set_wall(current, vertical, false) {
            opened += 1;
        }
        current = current.neighbor(vertical);
    }
    while current.col != to.col {
        if board.set_wall(current, horizontal, false) {
            opened += 1;
        }
        current = current.neighbor(horizontal);
    }
    opened
}
