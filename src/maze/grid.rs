use std::sync::mpsc::Sender;

use super::cell::{Cell, Direction, Position};

/// Change notifications emitted while a board is being carved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardEvent {
    /// Sent once when the board is attached to a channel.
    Initial { height: i32, width: i32 },
    /// The wall on side `dir` of `pos` was set (`present = true`) or removed.
    Wall {
        pos: Position,
        dir: Direction,
        present: bool,
    },
}

/// Row-major storage of the per-cell top/left walls.
pub struct Grid {
    data: Box<[Cell]>,
    height: usize,
    width: usize,
    sender: Option<Sender<BoardEvent>>,
}

impl Grid {
    pub fn new(height: usize, width: usize, sender: Option<Sender<BoardEvent>>) -> Self {
        let data = vec![Cell::WALLED; width * height].into_boxed_slice();
        if let Some(s) = &sender {
            let _ = s.send(BoardEvent::Initial {
                height: height as i32,
                width: width as i32,
            });
        }
        Grid {
            data,
            height,
            width,
            sender,
        }
    }

    fn ravel_index(&self, row: usize, col: usize) -> usize {
        row * self.width + col
    }

    pub fn cell(&self, row: usize, col: usize) -> Cell {
        self.data[self.ravel_index(row, col)]
    }

    /// Sets the top wall of `(row, col)`. Returns true if the stored value changed.
    /// `reported` is the side the caller addressed, forwarded to observers.
    pub fn set_top(
        &mut self,
        row: usize,
        col: usize,
        present: bool,
        reported: (Position, Direction),
    ) -> bool {
        let idx = self.ravel_index(row, col);
        if self.data[idx].top == present {
            return false;
        }
        self.data[idx].top = present;
        self.notify(reported, present);
        true
    }

    /// Sets the left wall of `(row, col)`. Returns true if the stored value changed.
    pub fn set_left(
        &mut self,
        row: usize,
        col: usize,
        present: bool,
        reported: (Position, Direction),
    ) -> bool {
        let idx = self.ravel_index(row, col);
        if self.data[idx].left == present {
            return false;
        }
        self.data[idx].left = present;
        self.notify(reported, present);
        true
    }

    /// Puts every wall back without notifying observers one wall at a time.
    pub fn fill(&mut self) {
        self.data.iter_mut().for_each(|cell| *cell = Cell::WALLED);
        if let Some(sender) = &self.sender {
            let _ = sender.send(BoardEvent::Initial {
                height: self.height as i32,
                width: self.width as i32,
            });
        }
    }

    pub fn detach(&mut self) -> Option<Sender<BoardEvent>> {
        self.sender.take()
    }

    fn notify(&self, (pos, dir): (Position, Direction), present: bool) {
        if let Some(sender) = &self.sender {
            // It's fine if nobody listens anymore
            let _ = sender.send(BoardEvent::Wall { pos, dir, present });
        }
    }

    /// Raw cells, row-major.
    pub fn cells(&self) -> &[Cell] {
        &self.data
    }
}
