pub mod game;
pub mod renderer;

use std::{
    io::{Stdout, Write},
    sync::mpsc,
    thread,
    time::Duration,
};

use crossterm::{
    cursor, queue,
    terminal::{self, ClearType},
};
use rand::Rng;

use crate::{
    app::{
        game::{Outcome, Player, Summary},
        renderer::{CELL_COLUMNS, CELL_ROWS, Renderer},
    },
    generators::{Farthest, Generator, SimultaneousConfig, generate_maze_with, get_rng},
    maze::{Board, BoardEvent, Position},
};

/// Everything needed to set up one session.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Board height in cells; derived from the terminal when unset
    pub height: Option<i32>,
    /// Board width in cells; derived from the terminal when unset
    pub width: Option<i32>,
    pub generator: Generator,
    pub simultaneous: SimultaneousConfig,
    /// Drives both the start cell and the carving
    pub seed: u64,
    /// Delay between robot steps. `None` lets a human play.
    pub robot_lag: Option<Duration>,
    /// Show carving steps while the maze is generated
    pub animate: bool,
}

impl Settings {
    /// Board dimensions (height, width) for a terminal of `term_size`
    /// (columns, rows). Explicit dimensions win over the terminal ones.
    pub fn board_size(&self, term_size: (u16, u16)) -> (i32, i32) {
        let (columns, rows) = term_size;
        let fit_height = rows.saturating_sub(1 + Renderer::<Stdout>::NUM_LOG_ROWS) / CELL_ROWS;
        let fit_width = columns.saturating_sub(1) / CELL_COLUMNS;
        (
            self.height.unwrap_or(i32::from(fit_height)).max(1),
            self.width.unwrap_or(i32::from(fit_width)).max(1),
        )
    }
}

/// Time budget for animating a whole generation.
const ANIMATION_DURATION: Duration = Duration::from_secs(4);
/// Upper bound on the pause after each carved wall.
const MAX_FRAME_DELAY: Duration = Duration::from_millis(20);
/// Stack reserved for the generator thread regardless of the board size.
const GENERATOR_BASE_STACK: usize = 8 * 1024 * 1024;
/// Extra stack per cell for recursive backtracking, which may recurse once
/// per cell.
const GENERATOR_STACK_PER_CELL: usize = 1024;

/// Stack size of the thread carving `cells` cells with `generator`.
fn generator_stack_size(generator: Generator, cells: usize) -> usize {
    match generator {
        Generator::RecurBacktrack => GENERATOR_BASE_STACK + cells * GENERATOR_STACK_PER_CELL,
        Generator::Simultaneous => GENERATOR_BASE_STACK,
    }
}

pub struct App {
    settings: Settings,
}

impl App {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    /// Set a panic hook to restore terminal state on panic
    /// This ensures that the terminal is not left in raw mode or alternate screen on panic
    /// even if the panic occurs in a different thread
    fn set_panic_hook() {
        let hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic_info| {
            let _ = App::restore_terminal(&mut std::io::stdout()); // ignore any errors as we are already failing
            hook(panic_info);
        }));
    }

    /// Setup terminal in raw mode and enter alternate screen
    /// Also sets a panic hook to restore terminal on panic
    pub fn setup_terminal(stdout: &mut Stdout) -> std::io::Result<()> {
        terminal::enable_raw_mode()?;
        App::set_panic_hook();
        queue!(
            stdout,
            terminal::EnterAlternateScreen,
            terminal::Clear(ClearType::All),
            cursor::Hide,
            cursor::MoveTo(0, 0)
        )?;
        stdout.flush()?;
        Ok(())
    }

    /// Restore terminal to original state
    /// Leave alternate screen and disable raw mode
    pub fn restore_terminal(stdout: &mut Stdout) -> std::io::Result<()> {
        queue!(stdout, terminal::LeaveAlternateScreen, cursor::Show)?;
        stdout.flush()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Generates a maze, lets the player walk it and reports how it went.
    pub fn run(&self, stdout: &mut Stdout) -> anyhow::Result<Summary> {
        let term_size = terminal::size()?;
        let (height, width) = self.settings.board_size(term_size);

        let mut rng = get_rng(Some(self.settings.seed));
        let start = Position::new(rng.random_range(0..height), rng.random_range(0..width));
        tracing::info!(
            "[game] {}x{} board, start {}, generator {}, seed {}",
            height,
            width,
            start,
            self.settings.generator,
            self.settings.seed
        );

        let mut renderer = Renderer::new(&mut *stdout);
        let (board, farthest) = self.generate(height, width, start, rng, &mut renderer)?;

        renderer.draw_board(&board)?;
        if !renderer.fits(term_size) {
            let (columns, rows) = Renderer::<Stdout>::required_size(height, width);
            tracing::warn!(
                "[game] board needs a {}x{} terminal, got {}x{}",
                columns,
                rows,
                term_size.0,
                term_size.1
            );
        }

        let robot = self.settings.robot_lag.is_some();
        let mut player = Player::new(&board, robot);
        let outcome = game::play(
            &board,
            &mut renderer,
            &mut player,
            self.settings.robot_lag.unwrap_or_default(),
        )?;

        Ok(Summary {
            reached: outcome == Outcome::Reached,
            steps: player.steps(),
            shortest: farthest.distance,
            height,
            width,
            seed: self.settings.seed,
        })
    }

    /// Carves the maze on a worker thread with a stack large enough for the
    /// generator's deepest recursion, drawing its progress when animation is on.
    fn generate<W: Write, R: Rng + Send + 'static>(
        &self,
        height: i32,
        width: i32,
        start: Position,
        mut rng: R,
        renderer: &mut Renderer<W>,
    ) -> anyhow::Result<(Board, Farthest)> {
        let (event_tx, event_rx) = mpsc::channel::<BoardEvent>();
        let mut board = if self.settings.animate {
            Board::with_events(height, width, start, event_tx)?
        } else {
            drop(event_tx);
            Board::new(height, width, start)?
        };

        let frame_delay = (ANIMATION_DURATION / board.len().max(1) as u32).min(MAX_FRAME_DELAY);
        let generator = self.settings.generator;
        let stack_size = generator_stack_size(generator, board.len());
        let config = self.settings.simultaneous;

        let handle = thread::Builder::new()
            .name("generator".to_string())
            .stack_size(stack_size)
            .spawn(move || {
                let farthest = generate_maze_with(&mut board, generator, &mut rng, config);
                // Closes the channel so the render loop below ends
                board.detach_events();
                farthest.map(|farthest| (board, farthest))
            })?;

        // Empty right away unless animating
        for event in event_rx {
            renderer.draw_event(&event)?;
            if let BoardEvent::Wall { present: false, .. } = event {
                thread::sleep(frame_delay);
            }
        }

        let generated = handle.join().expect("Generator thread panicked")?;
        Ok(generated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(height: Option<i32>, width: Option<i32>) -> Settings {
        Settings {
            height,
            width,
            generator: Generator::default(),
            simultaneous: SimultaneousConfig::default(),
            seed: 0,
            robot_lag: None,
            animate: false,
        }
    }

    #[test]
    fn test_board_size_from_terminal() {
        // 80 columns hold 26 cells with their right wall, 24 rows hold 11
        // rows of cells, their bottom wall and the status line
        assert_eq!(settings(None, None).board_size((80, 24)), (11, 26));
        let (columns, rows) = Renderer::<Stdout>::required_size(11, 26);
        assert!(columns <= 80 && rows <= 24);
    }

    #[test]
    fn test_board_size_explicit_and_tiny() {
        assert_eq!(settings(Some(5), None).board_size((80, 24)), (5, 26));
        assert_eq!(settings(None, Some(300)).board_size((80, 24)), (11, 300));
        assert_eq!(settings(None, None).board_size((0, 0)), (1, 1));
    }

    #[test]
    fn test_generator_stack_size() {
        let cells = 1024 * 1024;
        assert_eq!(
            generator_stack_size(Generator::Simultaneous, cells),
            GENERATOR_BASE_STACK
        );
        assert!(generator_stack_size(Generator::RecurBacktrack, cells) > 1024 * cells);
    }
}
