mod game_state;

pub use game_state::{Player, Summary};

use std::{io::Write, time::Duration};

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    style::{Attribute, Color, Stylize},
};

use crate::{
    app::renderer::Renderer,
    maze::{Board, Direction},
};

/// What a key press asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Move(Direction),
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The player stands on the exit
    Reached,
    /// The player gave up
    Quit,
}

/// How often to check the terminal for input while a human plays.
const INPUT_POLL_TIMEOUT: Duration = Duration::from_millis(100);

/// Maps a key to an action. Arrow keys move, and so do `t`, `s`, `r`, `n` for
/// left, down, up and right. `q` and Esc quit.
pub fn action_for_key(code: KeyCode) -> Option<Action> {
    let action = match code {
        KeyCode::Left | KeyCode::Char('t') => Action::Move(Direction::Left),
        KeyCode::Down | KeyCode::Char('s') => Action::Move(Direction::Down),
        KeyCode::Up | KeyCode::Char('r') => Action::Move(Direction::Up),
        KeyCode::Right | KeyCode::Char('n') => Action::Move(Direction::Right),
        KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
        _ => return None,
    };
    Some(action)
}

/// Moves the player toward `dir` and paints the trail behind them.
fn step<W: Write>(
    board: &Board,
    renderer: &mut Renderer<W>,
    player: &mut Player,
    dir: Direction,
) -> anyhow::Result<()> {
    let from = player.position();
    let steps = player.steps();
    if !player.try_move(board, dir)? {
        return Ok(());
    }
    renderer.draw_trail(from, steps, dir)?;
    renderer.draw_player(player.position())?;
    renderer.log(Some(format!("Steps: {}", player.steps()).with(Color::Yellow)))?;
    Ok(())
}

/// Redraws the whole scene after the terminal was resized.
fn redraw<W: Write>(
    board: &Board,
    renderer: &mut Renderer<W>,
    player: &Player,
    term_size: (u16, u16),
) -> anyhow::Result<()> {
    renderer.draw_board(board)?;
    renderer.draw_player(player.position())?;
    if !renderer.fits(term_size) {
        let (columns, rows) = Renderer::<W>::required_size(board.height(), board.width());
        tracing::warn!(
            "[game] terminal {}x{} too small, {}x{} needed",
            term_size.0,
            term_size.1,
            columns,
            rows
        );
    }
    Ok(())
}

/// Runs the game until the player reaches the exit or quits.
///
/// A human player moves with the keyboard. A robot follows the walls on its
/// own, one step every `robot_lag`; only quitting is read from the keyboard.
pub fn play<W: Write>(
    board: &Board,
    renderer: &mut Renderer<W>,
    player: &mut Player,
    robot_lag: Duration,
) -> anyhow::Result<Outcome> {
    tracing::info!(
        "[game] {} player starts at {}, exit at {}",
        if player.is_robot() { "robot" } else { "human" },
        player.position(),
        board.end()
    );
    renderer.draw_player(player.position())?;

    let poll_timeout = if player.is_robot() {
        robot_lag
    } else {
        INPUT_POLL_TIMEOUT
    };

    while !player.reached(board) {
        if !event::poll(poll_timeout)? {
            if player.is_robot() {
                let dir = player.robot_step(board)?;
                step(board, renderer, player, dir)?;
            }
            continue;
        }

        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                match action_for_key(key.code) {
                    Some(Action::Quit) => {
                        tracing::info!("[input loop] quit after {} steps", player.steps());
                        return Ok(Outcome::Quit);
                    }
                    Some(Action::Move(dir)) if !player.is_robot() => {
                        step(board, renderer, player, dir)?;
                    }
                    _ => {}
                }
            }
            Event::Resize(columns, rows) => {
                tracing::debug!("[input loop] terminal resized to {}x{}", columns, rows);
                redraw(board, renderer, player, (columns, rows))?;
            }
            _ => {}
        }
    }

    tracing::info!("[game] exit reached in {} steps", player.steps());
    renderer.log(Some(
        "You found the exit! Press any key to continue."
            .to_string()
            .with(Color::Green)
            .attribute(Attribute::Bold),
    ))?;
    wait_for_key()?;
    Ok(Outcome::Reached)
}

/// Blocks until any key is pressed.
fn wait_for_key() -> std::io::Result<()> {
    loop {
        if let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_mapping() {
        assert_eq!(
            action_for_key(KeyCode::Left),
            Some(Action::Move(Direction::Left))
        );
        assert_eq!(
            action_for_key(KeyCode::Char('t')),
            Some(Action::Move(Direction::Left))
        );
        assert_eq!(
            action_for_key(KeyCode::Char('s')),
            Some(Action::Move(Direction::Down))
        );
        assert_eq!(
            action_for_key(KeyCode::Char('r')),
            Some(Action::Move(Direction::Up))
        );
        assert_eq!(
            action_for_key(KeyCode::Char('n')),
            Some(Action::Move(Direction::Right))
        );
        assert_eq!(action_for_key(KeyCode::Esc), Some(Action::Quit));
        assert_eq!(action_for_key(KeyCode::Char('q')), Some(Action::Quit));
        assert_eq!(action_for_key(KeyCode::Char('x')), None);
        assert_eq!(action_for_key(KeyCode::Enter), None);
    }
}
