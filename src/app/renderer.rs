use std::io::Write;

use crossterm::{
    cursor, queue,
    style::{self, Attribute, Color, StyledContent, Stylize},
    terminal::{self, ClearType},
};

use crate::maze::{Board, BoardEvent, Direction, Position};

/// Width in characters of a cell interior and of a horizontal wall segment.
pub const CELL_WIDTH: u16 = 2;
/// Screen columns used by one cell, its left wall included.
pub const CELL_COLUMNS: u16 = 3;
/// Screen rows used by one cell, its top wall included.
pub const CELL_ROWS: u16 = 2;

/// What a piece of the screen shows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Tile {
    Wall,
    Passage,
    Goal,
    Player,
    /// Where the player has been. Every hundredth step shows a counter.
    Trail(Option<u32>),
}

impl Tile {
    /// Styled content of this tile, `width` characters wide.
    fn styled(self, width: u16) -> StyledContent<String> {
        let blank = " ".repeat(width as usize);
        let styled = match self {
            Tile::Wall => blank.on(Color::Black),
            Tile::Passage => blank.on(Color::White),
            Tile::Goal => blank.on(Color::Red),
            Tile::Player => "::"
                .to_string()
                .with(Color::White)
                .on(Color::Blue)
                .attribute(Attribute::Bold),
            Tile::Trail(Some(hundreds)) => format!("{:02}", hundreds % 100)
                .with(Color::White)
                .on(Color::Blue),
            Tile::Trail(None) => blank.with(Color::White).on(Color::Blue),
        };

        #[cfg(debug_assertions)]
        {
            use unicode_width::UnicodeWidthStr;
            assert_eq!(
                styled.content().width(),
                width as usize,
                "Tile {:?} must occupy exactly {} character widths.",
                self,
                width
            );
        }

        styled
    }
}

/// Screen coordinates (x, y) of the top-left corner of a cell.
pub fn cell_origin(pos: Position) -> (u16, u16) {
    (
        pos.col.max(0) as u16 * CELL_COLUMNS,
        pos.row.max(0) as u16 * CELL_ROWS,
    )
}

/// Screen coordinates and width of the wall on side `dir` of `pos`.
pub fn wall_span(pos: Position, dir: Direction) -> ((u16, u16), u16) {
    let (x, y) = cell_origin(pos);
    match dir {
        Direction::Up => ((x + 1, y), CELL_WIDTH),
        Direction::Down => ((x + 1, y + CELL_ROWS), CELL_WIDTH),
        Direction::Left => ((x, y + 1), 1),
        Direction::Right => ((x + CELL_COLUMNS, y + 1), 1),
    }
}

/// Draws boards and players on a terminal.
///
/// A cell takes two rows and three columns: a corner and its top wall on the
/// first row, its left wall and interior on the second.
pub struct Renderer<W: Write> {
    out: W,
    /// Board dimensions (height, width), once known
    dims: Option<(i32, i32)>,
}

impl<W: Write> Renderer<W> {
    pub fn new(out: W) -> Self {
        Self { out, dims: None }
    }

    /// Screen rows needed below the maze for status lines.
    pub const NUM_LOG_ROWS: u16 = 1;

    /// Terminal size (columns, rows) needed to show a board.
    pub fn required_size(height: i32, width: i32) -> (u16, u16) {
        (
            width.max(0) as u16 * CELL_COLUMNS + 1,
            height.max(0) as u16 * CELL_ROWS + 1 + Self::NUM_LOG_ROWS,
        )
    }

    fn put(&mut self, (x, y): (u16, u16), tile: Tile, width: u16) -> std::io::Result<()> {
        queue!(
            self.out,
            cursor::MoveTo(x, y),
            style::PrintStyledContent(tile.styled(width))
        )
    }

    fn put_interior(&mut self, pos: Position, tile: Tile) -> std::io::Result<()> {
        let (x, y) = cell_origin(pos);
        self.put((x + 1, y + 1), tile, CELL_WIDTH)
    }

    fn wall_tile(present: bool) -> Tile {
        if present { Tile::Wall } else { Tile::Passage }
    }

    /// Draws every wall and cell of a board, then marks the goal.
    pub fn draw_board(&mut self, board: &Board) -> anyhow::Result<()> {
        self.dims = Some((board.height(), board.width()));
        queue!(self.out, terminal::Clear(ClearType::All))?;

        for pos in board.positions() {
            let origin = cell_origin(pos);
            self.put(origin, Tile::Wall, 1)?;

            let top = Self::wall_tile(board.get_wall(pos, Direction::Up)?);
            let (top_at, top_width) = wall_span(pos, Direction::Up);
            self.put(top_at, top, top_width)?;

            let left = Self::wall_tile(board.get_wall(pos, Direction::Left)?);
            let (left_at, left_width) = wall_span(pos, Direction::Left);
            self.put(left_at, left, left_width)?;

            let interior = Self::wall_tile(board.is_isolated(pos)?);
            self.put_interior(pos, interior)?;
        }
        self.draw_outer_boundary(board.height(), board.width())?;

        self.put_interior(board.end(), Tile::Goal)?;
        self.out.flush()?;
        Ok(())
    }

    /// Right column and bottom row, which no cell owns.
    fn draw_outer_boundary(&mut self, height: i32, width: i32) -> std::io::Result<()> {
        let (right_x, bottom_y) = cell_origin(Position::new(height, width));
        for row in 0..height {
            let (_, y) = cell_origin(Position::new(row, 0));
            self.put((right_x, y), Tile::Wall, 1)?;
            self.put((right_x, y + 1), Tile::Wall, 1)?;
        }
        for col in 0..width {
            let (x, _) = cell_origin(Position::new(0, col));
            self.put((x, bottom_y), Tile::Wall, 1)?;
            self.put((x + 1, bottom_y), Tile::Wall, CELL_WIDTH)?;
        }
        self.put((right_x, bottom_y), Tile::Wall, 1)
    }

    /// Renders one carving step observed while a board is generated.
    pub fn draw_event(&mut self, event: &BoardEvent) -> std::io::Result<()> {
        match *event {
            BoardEvent::Initial { height, width } => {
                self.dims = Some((height, width));
                queue!(self.out, terminal::Clear(ClearType::All))?;
                for row in 0..height {
                    for col in 0..width {
                        let (x, y) = cell_origin(Position::new(row, col));
                        self.put((x, y), Tile::Wall, CELL_COLUMNS)?;
                        self.put((x, y + 1), Tile::Wall, CELL_COLUMNS)?;
                    }
                }
                self.draw_outer_boundary(height, width)?;
            }
            BoardEvent::Wall { pos, dir, present } => {
                if self.dims.is_none() {
                    // Nothing drawn yet to update
                    return Ok(());
                }
                let (at, width) = wall_span(pos, dir);
                self.put(at, Self::wall_tile(present), width)?;
                if !present {
                    // Both sides of an opened wall are part of the maze now
                    self.put_interior(pos, Tile::Passage)?;
                    self.put_interior(pos.neighbor(dir), Tile::Passage)?;
                }
            }
        }
        self.out.flush()
    }

    pub fn draw_player(&mut self, pos: Position) -> std::io::Result<()> {
        self.put_interior(pos, Tile::Player)?;
        self.out.flush()
    }

    /// Paints the trail left when a player at `pos`, having taken `steps` steps,
    /// moves toward `dir`: the cell interior and the opening crossed.
    pub fn draw_trail(
        &mut self,
        pos: Position,
        steps: u32,
        dir: Direction,
    ) -> std::io::Result<()> {
        let counter = (steps % 100 == 0).then_some(steps / 100);
        self.put_interior(pos, Tile::Trail(counter))?;
        let (at, width) = wall_span(pos, dir);
        self.put(at, Tile::Trail(None), width)
    }

    /// Writes a status line below the board, replacing the previous one.
    pub fn log(&mut self, msg: Option<StyledContent<String>>) -> std::io::Result<()> {
        let (height, _) = self.dims.unwrap_or((0, 0));
        let (_, y) = cell_origin(Position::new(height, 0));
        queue!(
            self.out,
            cursor::MoveTo(0, y + 1),
            terminal::Clear(ClearType::CurrentLine)
        )?;
        if let Some(msg) = msg {
            queue!(self.out, style::PrintStyledContent(msg))?;
        }
        self.out.flush()
    }

    /// Checks the board fits in a terminal of `term_size` (columns, rows).
    pub fn fits(&self, term_size: (u16, u16)) -> bool {
        match self.dims {
            Some((height, width)) => {
                let (columns, rows) = Self::required_size(height, width);
                term_size.0 >= columns && term_size.1 >= rows
            }
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout() {
        assert_eq!(cell_origin(Position::new(2, 3)), (9, 4));
        assert_eq!(wall_span(Position::new(0, 0), Direction::Up), ((1, 0), 2));
        assert_eq!(wall_span(Position::new(0, 0), Direction::Left), ((0, 1), 1));
        // The right wall of a cell is the left wall of its right neighbor
        assert_eq!(
            wall_span(Position::new(1, 1), Direction::Right).0,
            wall_span(Position::new(1, 2), Direction::Left).0
        );
        assert_eq!(
            wall_span(Position::new(1, 1), Direction::Down).0,
            wall_span(Position::new(2, 1), Direction::Up).0
        );
    }

    #[test]
    fn test_required_size() {
        assert_eq!(Renderer::<Vec<u8>>::required_size(10, 20), (61, 22));
    }

    #[test]
    fn test_draw_board_and_player() {
        let board = Board::new(2, 3, Position::new(0, 0)).unwrap();
        let mut renderer = Renderer::new(Vec::new());
        renderer.draw_board(&board).unwrap();
        renderer.draw_player(board.start()).unwrap();
        let output = String::from_utf8(renderer.out).unwrap();
        assert!(output.contains("::"));
    }

    #[test]
    fn test_trail_counter() {
        let mut renderer = Renderer::new(Vec::new());
        renderer
            .draw_trail(Position::new(0, 0), 300, Direction::Right)
            .unwrap();
        let output = String::from_utf8(renderer.out).unwrap();
        assert!(output.contains("03"));
    }

    #[test]
    fn test_fits() {
        let mut renderer = Renderer::new(Vec::new());
        assert!(renderer.fits((1, 1)));
        renderer
            .draw_event(&BoardEvent::Initial {
                height: 3,
                width: 4,
            })
            .unwrap();
        assert!(renderer.fits((13, 8)));
        assert!(!renderer.fits((12, 8)));
    }
}
