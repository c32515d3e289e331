use std::fmt;

use crate::maze::{Board, Direction, MazeError, Position};

/// Someone walking through a finished maze, human or robot.
#[derive(Debug, Clone)]
pub struct Player {
    /// Tracks where the player currently is
    position: Position,
    /// Number of accepted moves so far
    steps: u32,
    /// Direction of the last accepted move
    heading: Direction,
    robot: bool,
}

impl Player {
    /// Places a new player on the start cell of `board`.
    pub fn new(board: &Board, robot: bool) -> Self {
        Player {
            position: board.start(),
            steps: 0,
            heading: Direction::Right,
            robot,
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn steps(&self) -> u32 {
        self.steps
    }

    pub fn is_robot(&self) -> bool {
        self.robot
    }

    /// Check if the exit has been reached.
    pub fn reached(&self, board: &Board) -> bool {
        self.position == board.end()
    }

    /// Attempt to move one cell toward `dir`.
    /// Returns `Ok(false)` and stays put if a wall is in the way.
    pub fn try_move(&mut self, board: &Board, dir: Direction) -> Result<bool, MazeError> {
        if board.get_wall(self.position, dir)? {
            return Ok(false);
        }
        self.position = self.position.neighbor(dir);
        self.heading = dir;
        self.steps += 1;
        tracing::trace!("[game] step {} to {}", self.steps, self.position);
        Ok(true)
    }

    /// Picks the next move of a wall follower.
    ///
    /// Starting from the way back, directions are rotated counter-clockwise
    /// until an open one is found; this keeps a hand on the same wall. If the
    /// rotation comes all the way round, the player is in a dead end and turns
    /// back. On a perfect maze this visits every cell, so the exit is always
    /// found.
    pub fn robot_step(&self, board: &Board) -> Result<Direction, MazeError> {
        let back = self.heading.opposite();
        let mut next = back;
        loop {
            next = next.rotate_ccw();
            if next == back || !board.get_wall(self.position, next)? {
                return Ok(next);
            }
        }
    }
}

/// What happened during a session, shown once the terminal is restored.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub reached: bool,
    pub steps: u32,
    /// Length of the only path from the start to the exit
    pub shortest: u32,
    pub height: i32,
    pub width: i32,
    pub seed: u64,
}

impl Summary {
    /// Extra steps taken compared to the shortest path, in percent.
    pub fn overhead(&self) -> Option<f64> {
        let shortest = f64::from(self.shortest);
        (self.shortest > 0).then(|| 100.0 * (f64::from(self.steps) - shortest) / shortest)
    }

    /// Share of the board's cells lying on the shortest path, in percent.
    pub fn path_rate(&self) -> f64 {
        let cells = f64::from(self.height) * f64::from(self.width);
        f64::from(self.shortest) * 100.0 / cells
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.reached {
            writeln!(
                f,
                "You have taken {} steps to leave the labyrinth.",
                self.steps
            )?;
        } else {
            writeln!(f, "You gave up after {} steps.", self.steps)?;
        }
        writeln!(f, "It was possible in {} steps.", self.shortest)?;
        if let (true, Some(overhead)) = (self.reached, self.overhead()) {
            writeln!(
                f,
                "This means you have taken {:.1}% more steps than was necessary.",
                overhead
            )?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "Board size: {}(h) × {}(w) = {} cells",
            self.height,
            self.width,
            i64::from(self.height) * i64::from(self.width)
        )?;
        writeln!(f, "Min. path rate: {:.2}%", self.path_rate())?;
        write!(f, "Seed: {}", self.seed)
    }
}
