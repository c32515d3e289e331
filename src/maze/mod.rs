pub mod cell;
pub mod grid;

use std::sync::mpsc::Sender;

pub use cell::{Cell, Direction, Position};
pub use grid::BoardEvent;
use grid::Grid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MazeError {
    /// Height or width was not strictly positive when creating a board.
    #[error("invalid board dimensions {height}x{width}, both must be at least 1")]
    InvalidDimension { height: i32, width: i32 },
    /// A position outside the board was used where a cell was required.
    #[error("position {0} is outside the board")]
    OutOfBounds(Position),
}

/// A rectangular grid of cells separated by shared walls.
///
/// Every cell stores its top and left wall. The right wall of a cell is the left
/// wall of its right neighbor, and the bottom wall is the top wall of the cell
/// below. Walls on the board boundary are always present and are never read
/// from storage.
pub struct Board {
    grid: Grid,
    height: i32,
    width: i32,
    start: Position,
    end: Position,
}

impl Board {
    /// Creates a board of `height` x `width` cells with every wall present.
    /// The end cell is initially the start cell.
    ///
    /// # Errors
    /// * [`MazeError::InvalidDimension`] if `height <= 0` or `width <= 0`
    /// * [`MazeError::OutOfBounds`] if `start` is not on the board
    pub fn new(height: i32, width: i32, start: Position) -> Result<Self, MazeError> {
        Board::build(height, width, start, None)
    }

    /// Same as [`Board::new`], but every stored wall change is also sent as a
    /// [`BoardEvent`] through `sender`.
    pub fn with_events(
        height: i32,
        width: i32,
        start: Position,
        sender: Sender<BoardEvent>,
    ) -> Result<Self, MazeError> {
        Board::build(height, width, start, Some(sender))
    }

    fn build(
        height: i32,
        width: i32,
        start: Position,
        sender: Option<Sender<BoardEvent>>,
    ) -> Result<Self, MazeError> {
        if height <= 0 || width <= 0 {
            return Err(MazeError::InvalidDimension { height, width });
        }
        let in_bounds = (0..height).contains(&start.row) && (0..width).contains(&start.col);
        if !in_bounds {
            return Err(MazeError::OutOfBounds(start));
        }
        tracing::debug!("[board] new {}x{} board starting at {}", height, width, start);
        Ok(Board {
            grid: Grid::new(height as usize, width as usize, sender),
            height,
            width,
            start,
            end: start,
        })
    }

    /// Returns the height of the board in cells.
    pub fn height(&self) -> i32 {
        self.height
    }

    /// Returns the width of the board in cells.
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.height as usize * self.width as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn start(&self) -> Position {
        self.start
    }

    /// The exit cell. Equal to the start until a generator has run.
    pub fn end(&self) -> Position {
        self.end
    }

    pub fn set_end(&mut self, end: Position) {
        self.end = end;
    }

    /// Checks if the given position is a cell of this board.
    pub fn exists(&self, pos: Position) -> bool {
        pos.row >= 0 && pos.row < self.height && pos.col >= 0 && pos.col < self.width
    }

    /// The adjacent position in `dir`, without wraparound. The result may be
    /// outside the board; check it with [`Board::exists`] before using it.
    pub fn neighbor(&self, pos: Position, dir: Direction) -> Position {
        pos.neighbor(dir)
    }

    /// Row-major index of a cell, for board-sized side tables.
    ///
    /// # Errors
    /// [`MazeError::OutOfBounds`] if `pos` is not on the board.
    pub fn index_of(&self, pos: Position) -> Result<usize, MazeError> {
        if !self.exists(pos) {
            return Err(MazeError::OutOfBounds(pos));
        }
        Ok(pos.row as usize * self.width as usize + pos.col as usize)
    }

    /// Iterates over every cell, row by row.
    pub fn positions(&self) -> impl Iterator<Item = Position> + use<> {
        let width = self.width;
        (0..self.height).flat_map(move |row| (0..width).map(move |col| Position::new(row, col)))
    }

    /// Whether a wall blocks movement from `pos` toward `dir`.
    ///
    /// Walls on the board boundary are always present.
    ///
    /// # Errors
    /// [`MazeError::OutOfBounds`] if `pos` is not on the board.
    pub fn get_wall(&self, pos: Position, dir: Direction) -> Result<bool, MazeError> {
        if !self.exists(pos) {
            return Err(MazeError::OutOfBounds(pos));
        }
        let neighbor = pos.neighbor(dir);
        if !self.exists(neighbor) {
            return Ok(true);
        }
        let wall = match dir {
            Direction::Up => self.grid.cell(pos.row as usize, pos.col as usize).top,
            Direction::Left => self.grid.cell(pos.row as usize, pos.col as usize).left,
            Direction::Down => self.grid.cell(neighbor.row as usize, neighbor.col as usize).top,
            Direction::Right => {
                self.grid
                    .cell(neighbor.row as usize, neighbor.col as usize)
                    .left
            }
        };
        Ok(wall)
    }

    /// Sets or removes the wall shared by `pos` and its neighbor in `dir`.
    ///
    /// Nothing happens if `pos` is outside the board or if the neighbor is (a
    /// boundary wall cannot be removed).
    ///
    /// # Returns
    /// `true` if the stored wall changed, `false` otherwise
    pub fn set_wall(&mut self, pos: Position, dir: Direction, present: bool) -> bool {
        let neighbor = pos.neighbor(dir);
        if !self.exists(pos) || !self.exists(neighbor) {
            return false;
        }
        let reported = (pos, dir);
        match dir {
            Direction::Up => {
                self.grid
                    .set_top(pos.row as usize, pos.col as usize, present, reported)
            }
            Direction::Left => {
                self.grid
                    .set_left(pos.row as usize, pos.col as usize, present, reported)
            }
            Direction::Down => self.grid.set_top(
                neighbor.row as usize,
                neighbor.col as usize,
                present,
                reported,
            ),
            Direction::Right => self.grid.set_left(
                neighbor.row as usize,
                neighbor.col as usize,
                present,
                reported,
            ),
        }
    }

    /// A cell is isolated when all four of its walls are present, i.e. it is not
    /// yet connected to any passage.
    ///
    /// # Errors
    /// [`MazeError::OutOfBounds`] if `pos` is not on the board.
    pub fn is_isolated(&self, pos: Position) -> Result<bool, MazeError> {
        for dir in Direction::ALL {
            if !self.get_wall(pos, dir)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Whether at least one in-bounds neighbor of `pos` is connected to a passage.
    ///
    /// # Errors
    /// [`MazeError::OutOfBounds`] if `pos` is not on the board.
    pub fn has_non_isolated_neighbor(&self, pos: Position) -> Result<bool, MazeError> {
        if !self.exists(pos) {
            return Err(MazeError::OutOfBounds(pos));
        }
        for neighbor in get_neighbors(pos, self) {
            if !self.is_isolated(neighbor)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Puts every wall back and resets the end cell to the start cell.
    pub fn fill_walls(&mut self) {
        self.grid.fill();
        self.end = self.start;
    }

    /// Drops the event sender, if any, so that observers see the channel close.
    pub fn detach_events(&mut self) {
        if self.grid.detach().is_some() {
            tracing::debug!("[board] event channel detached");
        }
    }

    /// Number of open passages between adjacent cells.
    pub fn open_passages(&self) -> usize {
        self.positions()
            .flat_map(|pos| [(pos, Direction::Right), (pos, Direction::Down)])
            .filter(|&(pos, dir)| matches!(self.get_wall(pos, dir), Ok(false)))
            .count()
    }

    /// Raw stored cells, row-major. Boundary entries of the first row and column
    /// are never read.
    pub fn cells(&self) -> &[Cell] {
        self.grid.cells()
    }
}

/// Get in-bounds neighbors of a cell.
/// A neighbor is a cell one step away in the cardinal directions, tried in
/// [`Direction::ALL`] order.
pub fn get_neighbors(pos: Position, board: &Board) -> impl Iterator<Item = Position> + '_ {
    Direction::ALL
        .into_iter()
        .map(move |dir| pos.neighbor(dir))
        .filter(move |&n| board.exists(n))
}
