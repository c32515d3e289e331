use std::collections::{BTreeSet, VecDeque};

use rand::{Rng, seq::SliceRandom};

use crate::{
    generators::Farthest,
    maze::{Board, Direction, MazeError, Position, get_neighbors},
};

/// Tuning for [`simultaneous_agents_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimultaneousConfig {
    /// Maximum number of agents carving at the same time, the head included.
    /// Values below 2 are raised to 2. More agents make long parallel corridors
    /// that look artificial; fewer leave more orphans, and the linking phase
    /// then degenerates toward plain backtracking.
    pub max_agents: usize,
    /// Walls a lineage of agents may carve before its agents retire. At least 1.
    pub energy: u32,
}

impl Default for SimultaneousConfig {
    fn default() -> Self {
        Self {
            max_agents: 4,
            energy: 128,
        }
    }
}

/// A carving cursor.
#[derive(Debug, Clone, Copy)]
struct Agent {
    cell: Position,
    distance: u32,
    energy: u32,
}

/// Isolated cells next to a carved one, ordered row by row.
type Orphans = BTreeSet<Position>;

/// [`simultaneous_agents_with`] using [`SimultaneousConfig::default`].
pub fn simultaneous_agents<R: Rng + ?Sized>(
    board: &mut Board,
    rng: &mut R,
) -> Result<Farthest, MazeError> {
    simultaneous_agents_with(board, rng, SimultaneousConfig::default())
}

/// Carves the board with several agents advancing in turn, then links the
/// cells they missed.
///
/// Phase 1: agents sit in a round-robin queue. The head tries its four
/// directions in random order, opening a wall into every isolated neighbor
/// while the queue is under `max_agents`, and spawning a new agent there. The
/// head then retires.
///
/// Phase 2: the first isolated cell, row by row, that touches a carved one is
/// joined to the first such neighbor (right, up, left, down), and phase 1 runs
/// again from that cell. This repeats until no such cell is left.
///
/// Dead ends produced this way tend to be long and hard to spot.
pub fn simultaneous_agents_with<R: Rng + ?Sized>(
    board: &mut Board,
    rng: &mut R,
    config: SimultaneousConfig,
) -> Result<Farthest, MazeError> {
    // The start cell only joins the tree once its agent spawns a child
    let config = SimultaneousConfig {
        max_agents: config.max_agents.max(2),
        energy: config.energy.max(1),
    };
    let mut distances = vec![0; board.len()];
    let mut orphans = Orphans::new();
    for pos in board.positions() {
        if board.is_isolated(pos)? && board.has_non_isolated_neighbor(pos)? {
            orphans.insert(pos);
        }
    }

    let mut origin = board.start();
    let mut distance = 0;
    let mut farthest = Farthest {
        cell: origin,
        distance,
    };
    let mut linked = 0usize;

    loop {
        let branch = spread(
            board,
            rng,
            &config,
            &mut distances,
            &mut orphans,
            origin,
            distance,
        )?;
        if branch.distance > farthest.distance {
            farthest = branch;
        }

        let link = loop {
            let Some(orphan) = orphans.pop_first() else {
                break None;
            };
            if let Some(found) = carved_neighbor(board, orphan)? {
                break Some((orphan, found));
            }
        };
        let Some((orphan, (dir, neighbor))) = link else {
            break;
        };
        open(board, &mut orphans, orphan, dir)?;
        linked += 1;

        origin = orphan;
        distance = distances[board.index_of(neighbor)?] + 1;
    }

    tracing::debug!(
        "[simultaneous] linked {} orphans, farthest cell {} at distance {}",
        linked,
        farthest.cell,
        farthest.distance
    );
    Ok(farthest)
}

/// First non-isolated neighbor of `pos`, tried in [`Direction::ALL`] order.
fn carved_neighbor(
    board: &Board,
    pos: Position,
) -> Result<Option<(Direction, Position)>, MazeError> {
    for dir in Direction::ALL {
        let neighbor = pos.neighbor(dir);
        if board.exists(neighbor) && !board.is_isolated(neighbor)? {
            return Ok(Some((dir, neighbor)));
        }
    }
    Ok(None)
}

/// Opens the wall on side `dir` of `cell`. Both cells stop being orphans and
/// their isolated neighbors become ones.
fn open(
    board: &mut Board,
    orphans: &mut Orphans,
    cell: Position,
    dir: Direction,
) -> Result<(), MazeError> {
    board.set_wall(cell, dir, false);
    for pos in [cell, cell.neighbor(dir)] {
        orphans.remove(&pos);
        for neighbor in get_neighbors(pos, board) {
            if board.is_isolated(neighbor)? {
                orphans.insert(neighbor);
            }
        }
    }
    Ok(())
}

/// Phase 1 from `origin`, which is already connected to the tree at
/// `distance` steps from the start. Returns the farthest cell it carved.
fn spread<R: Rng + ?Sized>(
    board: &mut Board,
    rng: &mut R,
    config: &SimultaneousConfig,
    distances: &mut [u32],
    orphans: &mut Orphans,
    origin: Position,
    distance: u32,
) -> Result<Farthest, MazeError> {
    distances[board.index_of(origin)?] = distance;
    let mut farthest = Farthest {
        cell: origin,
        distance,
    };

    let mut agents = VecDeque::with_capacity(config.max_agents);
    agents.push_back(Agent {
        cell: origin,
        distance,
        energy: config.energy,
    });

    while let Some(head) = agents.front().copied() {
        if head.energy > 0 {
            let mut directions = Direction::ALL;
            directions.shuffle(rng);

            for dir in directions {
                if agents.len() >= config.max_agents {
                    break;
                }
                let next = head.cell.neighbor(dir);
                if !board.exists(next) || !board.is_isolated(next)? {
                    continue;
                }
                open(board, orphans, head.cell, dir)?;

                let child = Agent {
                    cell: next,
                    distance: head.distance + 1,
                    energy: head.energy - 1,
                };
                distances[board.index_of(next)?] = child.distance;
                if child.distance > farthest.distance {
                    farthest = Farthest {
                        cell: child.cell,
                        distance: child.distance,
                    };
                }
                agents.push_back(child);
            }
        }
        // Retire the head
        agents.pop_front();
    }
    Ok(farthest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::get_rng;

    fn assert_fully_carved(board: &Board) {
        for pos in board.positions() {
            assert!(
                !board.is_isolated(pos).unwrap(),
                "cell {} was left isolated",
                pos
            );
        }
        assert_eq!(board.open_passages(), board.len() - 1);
    }

    /// Links orphans by rescanning the whole board after every carving, and
    /// re-seeds recursively from each one.
    fn rescanning_seed<R: Rng + ?Sized>(
        board: &mut Board,
        rng: &mut R,
        config: &SimultaneousConfig,
        distances: &mut [u32],
        origin: Position,
        distance: u32,
    ) -> Farthest {
        let mut unused = Orphans::new();
        let mut farthest =
            spread(board, rng, config, distances, &mut unused, origin, distance).unwrap();
        for pos in board.positions() {
            if !board.is_isolated(pos).unwrap() || !board.has_non_isolated_neighbor(pos).unwrap()
            {
                continue;
            }
            let (dir, neighbor) = carved_neighbor(board, pos).unwrap().unwrap();
            board.set_wall(pos, dir, false);
            let orphan_distance = distances[board.index_of(neighbor).unwrap()] + 1;
            let branch = rescanning_seed(board, rng, config, distances, pos, orphan_distance);
            if branch.distance > farthest.distance {
                farthest = branch;
            }
        }
        farthest
    }

    #[test]
    fn test_default_config() {
        let mut board = Board::new(12, 17, Position::new(5, 5)).unwrap();
        let farthest = simultaneous_agents(&mut board, &mut get_rng(Some(9))).unwrap();
        assert_fully_carved(&board);
        assert!(farthest.distance > 0);
    }

    #[test]
    fn test_minimal_agents_rely_on_linking() {
        // The start spawns a single agent with no energy left, every other cell
        // comes from the linking phase
        let mut board = Board::new(5, 6, Position::new(2, 2)).unwrap();
        let config = SimultaneousConfig {
            max_agents: 2,
            energy: 1,
        };
        simultaneous_agents_with(&mut board, &mut get_rng(Some(8)), config).unwrap();
        assert_fully_carved(&board);
    }

    #[test]
    fn test_degenerate_config_is_clamped() {
        let mut board = Board::new(4, 4, Position::new(0, 0)).unwrap();
        let config = SimultaneousConfig {
            max_agents: 0,
            energy: 0,
        };
        simultaneous_agents_with(&mut board, &mut get_rng(Some(3)), config).unwrap();
        assert_fully_carved(&board);
    }

    #[test]
    fn test_many_agents() {
        let mut board = Board::new(9, 9, Position::new(4, 4)).unwrap();
        let config = SimultaneousConfig {
            max_agents: 16,
            energy: 3,
        };
        simultaneous_agents_with(&mut board, &mut get_rng(Some(21)), config).unwrap();
        assert_fully_carved(&board);
    }

    #[test]
    fn test_orphan_set_matches_rescanning() {
        let configs = [
            SimultaneousConfig::default(),
            SimultaneousConfig {
                max_agents: 2,
                energy: 1,
            },
            SimultaneousConfig {
                max_agents: 3,
                energy: 5,
            },
            SimultaneousConfig {
                max_agents: 8,
                energy: 12,
            },
        ];
        for config in configs {
            for seed in 0..6 {
                let start = Position::new(7, 3);
                let mut board = Board::new(14, 19, start).unwrap();
                let farthest =
                    simultaneous_agents_with(&mut board, &mut get_rng(Some(seed)), config)
                        .unwrap();

                let mut rescanned = Board::new(14, 19, start).unwrap();
                let mut distances = vec![0; rescanned.len()];
                let expected = rescanning_seed(
                    &mut rescanned,
                    &mut get_rng(Some(seed)),
                    &config,
                    &mut distances,
                    start,
                    0,
                );

                assert_eq!(farthest, expected, "seed {} with {:?}", seed, config);
                assert!(board.cells() == rescanned.cells());
            }
        }
    }

    #[test]
    fn test_orphans_are_isolated_cells_next_to_carved_ones() {
        let mut board = Board::new(3, 3, Position::new(0, 0)).unwrap();
        let mut orphans = Orphans::new();
        open(&mut board, &mut orphans, Position::new(1, 1), Direction::Right).unwrap();
        let expected = [(0, 1), (0, 2), (1, 0), (2, 1), (2, 2)]
            .map(|(row, col)| Position::new(row, col))
            .into_iter()
            .collect::<Orphans>();
        assert_eq!(orphans, expected);

        open(&mut board, &mut orphans, Position::new(1, 0), Direction::Right).unwrap();
        assert!(!orphans.contains(&Position::new(1, 0)));
        assert!(orphans.contains(&Position::new(0, 0)));
        assert!(orphans.contains(&Position::new(2, 0)));
    }
}
