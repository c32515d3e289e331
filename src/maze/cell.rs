use std::fmt;

/// Directions in which walls are checked and the player can move.
///
/// The declaration order matters: linking orphan cells tries directions in this
/// order, and [`Direction::rotate_ccw`] walks it cyclically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Right,
    Up,
    Left,
    Down,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Right,
        Direction::Up,
        Direction::Left,
        Direction::Down,
    ];

    /// The direction pointing the other way. `opposite(opposite(d)) == d`.
    pub fn opposite(self) -> Direction {
        match self {
            Direction::Right => Direction::Left,
            Direction::Up => Direction::Down,
            Direction::Left => Direction::Right,
            Direction::Down => Direction::Up,
        }
    }

    /// Quarter turn counter-clockwise: Right -> Up -> Left -> Down -> Right.
    pub fn rotate_ccw(self) -> Direction {
        match self {
            Direction::Right => Direction::Up,
            Direction::Up => Direction::Left,
            Direction::Left => Direction::Down,
            Direction::Down => Direction::Right,
        }
    }

    /// Row and column offsets of one step in this direction.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Right => (0, 1),
            Direction::Up => (-1, 0),
            Direction::Left => (0, -1),
            Direction::Down => (1, 0),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::Right => "right",
            Direction::Up => "up",
            Direction::Left => "left",
            Direction::Down => "down",
        };
        write!(f, "{}", name)
    }
}

/// A (row, column) pair. Positions carry no bounds of their own; whether one is
/// valid is decided by the board it is used with.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

impl Position {
    pub const fn new(row: i32, col: i32) -> Self {
        Position { row, col }
    }

    /// The adjacent position in `dir`. There is no wraparound, so the result may
    /// lie outside any board.
    pub fn neighbor(self, dir: Direction) -> Position {
        let (dr, dc) = dir.delta();
        Position {
            row: self.row + dr,
            col: self.col + dc,
        }
    }

    /// Number of unit steps between two positions along the axes.
    pub fn manhattan(self, other: Position) -> u32 {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Stored wall state of one cell. Only the top and left edges are kept; the
/// right and bottom edges belong to the neighbors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    /// True if there is a wall on top of this cell
    pub top: bool,
    /// True if there is a wall on the left side of this cell
    pub left: bool,
}

impl Cell {
    pub const WALLED: Cell = Cell {
        top: true,
        left: true,
    };
}

impl Default for Cell {
    fn default() -> Self {
        Cell::WALLED
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opposite_is_involution() {
        for dir in Direction::ALL {
            assert_ne!(dir.opposite(), dir);
            assert_eq!(dir.opposite().opposite(), dir);
        }
        assert_eq!(Direction::Left.opposite(), Direction::Right);
        assert_eq!(Direction::Up.opposite(), Direction::Down);
    }

    #[test]
    fn test_rotate_ccw_cycles_declaration_order() {
        let mut dir = Direction::Right;
        let mut seen = Vec::new();
        for _ in 0..4 {
            seen.push(dir);
            dir = dir.rotate_ccw();
        }
        assert_eq!(seen, Direction::ALL);
        assert_eq!(dir, Direction::Right);
    }

    #[test]
    fn test_neighbor_has_no_wraparound() {
        let origin = Position::new(0, 0);
        assert_eq!(origin.neighbor(Direction::Up), Position::new(-1, 0));
        assert_eq!(origin.neighbor(Direction::Left), Position::new(0, -1));
        assert_eq!(origin.neighbor(Direction::Down), Position::new(1, 0));
        assert_eq!(origin.neighbor(Direction::Right), Position::new(0, 1));
    }

    #[test]
    fn test_manhattan() {
        assert_eq!(Position::new(1, 2).manhattan(Position::new(4, 0)), 5);
        assert_eq!(Position::new(3, 3).manhattan(Position::new(3, 3)), 0);
    }
}
