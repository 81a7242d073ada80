//! Session state machine shared by every game
//!
//! A session cycles `Playing → Feedback → Playing … → Finished`. The game
//! itself is plugged in through `GameRules`: it builds each round, judges
//! input, and optionally advances with simulation time. The controller owns
//! score, streak, round counting, the feedback delay and the final write to
//! the progress store.

pub mod maze;
pub mod merge;
pub mod quiz;

pub use maze::{MazeLevel, MazeRules, maze_level_points};
pub use merge::{MergeInput, MergeRules};
pub use quiz::{
    ComboInput, ComboRound, ComboRules, GridInput, GridRules, MathRules, MissingRules,
};

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::audio::SoundCue;
use crate::consts::*;
use crate::highscores::{GameId, GameResult};
use crate::persistence::ProgressStore;
use crate::platform;
use crate::settings::Difficulty;
use crate::timer::{Epoch, TimerRequest, TimerToken};

/// Result shown after an answer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feedback {
    Correct,
    Wrong,
}

/// Where the session is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Waiting for input on the current round
    Playing,
    /// Showing the verdict; the next round starts when the timer fires
    Feedback(Feedback),
    /// Result recorded, nothing more happens until restart
    Finished,
}

/// What a piece of input (or a simulation step) did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing changed
    Ignored,
    /// Round still open, `points` earned along the way
    Continue { points: u32 },
    /// Round decided
    Resolved { correct: bool, points: u32 },
    /// Terminal condition, the session ends now
    GameOver,
}

/// Notifications for the UI and audio layers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    RoundStarted { round: u32 },
    Cue(SoundCue),
    ScoreChanged { score: u32 },
    Feedback(Feedback),
    Finished {
        score: u32,
        message: String,
        new_high_score: bool,
    },
}

/// Running totals, used for summary messages
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub score: u32,
    pub rounds_played: u32,
    pub correct: u32,
    pub best_streak: u32,
}

/// What rules see while building or judging a round
pub struct RoundContext<'a> {
    pub rng: &'a mut Pcg32,
    pub difficulty: Difficulty,
    /// 1-based round (or level) number
    pub round: u32,
    /// Consecutive correct answers before this one
    pub streak: u32,
    events: &'a mut Vec<SessionEvent>,
}

impl RoundContext<'_> {
    pub fn cue(&mut self, cue: SoundCue) {
        self.events.push(SessionEvent::Cue(cue));
    }
}

/// A game plugged into `SessionController`
pub trait GameRules {
    /// Problem or board presented each round
    type Round;
    /// Player input
    type Input;

    fn game_id(&self) -> GameId;

    /// Rounds per session, `None` if only `GameOver` ends it
    fn total_rounds(&self) -> Option<u32>;

    fn new_round(&mut self, ctx: &mut RoundContext<'_>) -> Self::Round;

    fn apply(
        &mut self,
        round: &mut Self::Round,
        input: Self::Input,
        ctx: &mut RoundContext<'_>,
    ) -> Outcome;

    /// Advance simulated time by one fixed step
    fn step(&mut self, _round: &mut Self::Round, _dt: f32, _ctx: &mut RoundContext<'_>) -> Outcome {
        Outcome::Ignored
    }

    /// Message shown when the session finishes
    fn summary(&self, stats: &SessionStats) -> String;
}

/// Drives one game from first round to Finished
pub struct SessionController<R: GameRules> {
    rules: R,
    rng: Pcg32,
    difficulty: Difficulty,
    phase: SessionPhase,
    round: R::Round,
    round_number: u32,
    streak: u32,
    stats: SessionStats,
    timer: Epoch,
    accumulator: f32,
    torn_down: bool,
    events: Vec<SessionEvent>,
}

impl<R: GameRules> SessionController<R> {
    /// Start a session using the store's current difficulty
    pub fn new(mut rules: R, store: &ProgressStore, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let difficulty = store.difficulty();
        let mut events = Vec::new();

        let round = {
            let mut ctx = RoundContext {
                rng: &mut rng,
                difficulty,
                round: 1,
                streak: 0,
                events: &mut events,
            };
            rules.new_round(&mut ctx)
        };
        events.push(SessionEvent::RoundStarted { round: 1 });
        log::debug!(
            "{} session started ({})",
            rules.game_id().as_str(),
            difficulty.as_str()
        );

        Self {
            rules,
            rng,
            difficulty,
            phase: SessionPhase::Playing,
            round,
            round_number: 1,
            streak: 0,
            stats: SessionStats::default(),
            timer: Epoch::default(),
            accumulator: 0.0,
            torn_down: false,
            events,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_finished(&self) -> bool {
        self.phase == SessionPhase::Finished
    }

    pub fn round(&self) -> &R::Round {
        &self.round
    }

    #[cfg(test)]
    pub(crate) fn round_mut(&mut self) -> &mut R::Round {
        &mut self.round
    }

    /// 1-based round (level) number
    pub fn round_number(&self) -> u32 {
        self.round_number
    }

    pub fn total_rounds(&self) -> Option<u32> {
        self.rules.total_rounds()
    }

    pub fn score(&self) -> u32 {
        self.stats.score
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn rules(&self) -> &R {
        &self.rules
    }

    /// Take every event emitted since the last drain
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    /// Feed player input. Ignored outside `Playing`. When the round is
    /// decided, returns the delayed callback the host must schedule.
    pub fn submit(&mut self, input: R::Input, store: &mut ProgressStore) -> Option<TimerRequest> {
        if self.torn_down || self.phase != SessionPhase::Playing {
            return None;
        }

        let mut ctx = RoundContext {
            rng: &mut self.rng,
            difficulty: self.difficulty,
            round: self.round_number,
            streak: self.streak,
            events: &mut self.events,
        };
        let outcome = self.rules.apply(&mut self.round, input, &mut ctx);
        self.handle(outcome, store)
    }

    /// Advance simulated time by a frame. Runs fixed steps, carrying the
    /// remainder to the next frame. If a step decides the round, returns the
    /// delayed callback the host must schedule, as `submit` does.
    pub fn advance(&mut self, frame_dt: f32, store: &mut ProgressStore) -> Option<TimerRequest> {
        if self.torn_down || self.phase != SessionPhase::Playing {
            return None;
        }

        self.accumulator += frame_dt;
        let mut steps = 0;
        let mut request = None;
        while self.accumulator >= SIM_DT && steps < MAX_SUBSTEPS {
            self.accumulator -= SIM_DT;
            steps += 1;

            let mut ctx = RoundContext {
                rng: &mut self.rng,
                difficulty: self.difficulty,
                round: self.round_number,
                streak: self.streak,
                events: &mut self.events,
            };
            let outcome = self.rules.step(&mut self.round, SIM_DT, &mut ctx);
            request = self.handle(outcome, store);
            if self.phase != SessionPhase::Playing {
                break;
            }
        }

        if steps == MAX_SUBSTEPS {
            // Too far behind; drop the backlog rather than spiral
            self.accumulator = 0.0;
        }
        request
    }

    fn handle(&mut self, outcome: Outcome, store: &mut ProgressStore) -> Option<TimerRequest> {
        match outcome {
            Outcome::Ignored => None,
            Outcome::Continue { points } => {
                self.add_points(points);
                None
            }
            Outcome::Resolved { correct, points } => {
                self.stats.rounds_played += 1;
                let feedback = if correct {
                    self.streak += 1;
                    self.stats.correct += 1;
                    self.stats.best_streak = self.stats.best_streak.max(self.streak);
                    self.add_points(points);
                    Feedback::Correct
                } else {
                    self.streak = 0;
                    Feedback::Wrong
                };

                self.phase = SessionPhase::Feedback(feedback);
                self.events.push(SessionEvent::Feedback(feedback));
                Some(TimerRequest {
                    token: self.timer.issue(),
                    delay_ms: FEEDBACK_DELAY_MS,
                })
            }
            Outcome::GameOver => {
                self.finish(store);
                None
            }
        }
    }

    fn add_points(&mut self, points: u32) {
        if points > 0 {
            self.stats.score += points;
            self.events.push(SessionEvent::ScoreChanged {
                score: self.stats.score,
            });
        }
    }

    /// Deliver a delayed callback. Stale tokens (from before a restart or
    /// teardown, or already delivered) are ignored. Returns whether the
    /// session moved on.
    pub fn fire(&mut self, token: TimerToken, store: &mut ProgressStore) -> bool {
        if self.torn_down || !self.timer.redeem(token) {
            return false;
        }
        if !matches!(self.phase, SessionPhase::Feedback(_)) {
            return false;
        }

        let done = self
            .rules
            .total_rounds()
            .is_some_and(|total| self.stats.rounds_played >= total);
        if done {
            self.finish(store);
        } else {
            self.round_number += 1;
            self.start_round();
        }
        true
    }

    fn start_round(&mut self) {
        let mut ctx = RoundContext {
            rng: &mut self.rng,
            difficulty: self.difficulty,
            round: self.round_number,
            streak: self.streak,
            events: &mut self.events,
        };
        self.round = self.rules.new_round(&mut ctx);
        self.phase = SessionPhase::Playing;
        self.accumulator = 0.0;
        self.events.push(SessionEvent::RoundStarted {
            round: self.round_number,
        });
        log::debug!(
            "{} round {} started",
            self.rules.game_id().as_str(),
            self.round_number
        );
    }

    fn finish(&mut self, store: &mut ProgressStore) {
        if self.phase == SessionPhase::Finished {
            return;
        }
        self.phase = SessionPhase::Finished;
        self.timer.advance();

        let game_id = self.rules.game_id();
        let score = self.stats.score;
        store.add_game_result(GameResult {
            game_id,
            score,
            played_at: platform::now_ms(),
        });
        let new_high_score = store.update_high_score(game_id, score);

        let message = self.rules.summary(&self.stats);
        log::info!(
            "{} finished with {} points{}",
            game_id.title(),
            score,
            if new_high_score { " (new high score)" } else { "" }
        );

        self.events.push(SessionEvent::Cue(SoundCue::Success));
        self.events.push(SessionEvent::Finished {
            score,
            message,
            new_high_score,
        });
    }

    /// Start over with fresh content and the store's current difficulty.
    /// Any pending callback becomes a no-op.
    pub fn restart(&mut self, store: &ProgressStore) {
        if self.torn_down {
            return;
        }
        self.timer.advance();
        self.difficulty = store.difficulty();
        self.streak = 0;
        self.stats = SessionStats::default();
        self.round_number = 1;
        self.events.clear();
        self.start_round();
    }

    /// The host is going away: every pending callback becomes a no-op and
    /// further input is ignored.
    pub fn teardown(&mut self) {
        self.torn_down = true;
        self.timer.advance();
        self.events.clear();
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }
}
