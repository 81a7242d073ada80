//! Maze levels: walk from the top-left corner to the bottom-right one

use serde::{Deserialize, Serialize};

use crate::audio::SoundCue;
use crate::consts::*;
use crate::generate::{Direction, Maze, generate_maze};
use crate::highscores::GameId;

use super::{GameRules, Outcome, RoundContext, SessionStats};

/// Points for finishing `level` in `moves` steps
pub fn maze_level_points(moves: u32, level: u32) -> u32 {
    100u32.saturating_sub(2 * moves).max(20) + 10 * level
}

/// One level in progress
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MazeLevel {
    pub maze: Maze,
    pub player: (usize, usize),
    pub moves: u32,
}

impl MazeLevel {
    pub fn new(maze: Maze) -> Self {
        Self {
            maze,
            player: (0, 0),
            moves: 0,
        }
    }

    pub fn at_goal(&self) -> bool {
        self.player == self.maze.goal()
    }

    /// Directions from the player to the goal
    pub fn hint(&self) -> Option<Vec<Direction>> {
        self.maze.solution(self.player, self.maze.goal())
    }
}

#[derive(Debug, Default)]
pub struct MazeRules;

impl GameRules for MazeRules {
    type Round = MazeLevel;
    type Input = Direction;

    fn game_id(&self) -> GameId {
        GameId::Maze
    }

    fn total_rounds(&self) -> Option<u32> {
        Some(MAZE_LEVELS)
    }

    fn new_round(&mut self, ctx: &mut RoundContext<'_>) -> MazeLevel {
        let size = ctx.difficulty.maze_base_size() + (ctx.round as usize).saturating_sub(1);
        MazeLevel::new(generate_maze(ctx.rng, size, size))
    }

    fn apply(&mut self, level: &mut MazeLevel, dir: Direction, ctx: &mut RoundContext<'_>) -> Outcome {
        let (x, y) = level.player;
        let Some(next) = level.maze.step(x, y, dir) else {
            return Outcome::Ignored;
        };

        // Points count the moves made before the arriving step
        let moves_before = level.moves;
        level.player = next;
        level.moves += 1;
        ctx.cue(SoundCue::Click);

        if !level.at_goal() {
            return Outcome::Continue { points: 0 };
        }

        // The last level gets its success cue from the session finishing
        if ctx.round < MAZE_LEVELS {
            ctx.cue(SoundCue::Success);
        }
        Outcome::Resolved {
            correct: true,
            points: maze_level_points(moves_before, ctx.round),
        }
    }

    fn summary(&self, stats: &SessionStats) -> String {
        format!(
            "You escaped all {} mazes with {} points!",
            MAZE_LEVELS, stats.score
        )
    }
}
