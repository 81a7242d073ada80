//! Answer-the-question games: arithmetic, missing operand and combo sums

use crate::audio::SoundCue;
use crate::consts::*;
use crate::generate::{
    ArithmeticProblem, ComboGrid, ComboProblem, GridCell, MissingProblem, SelectOutcome,
    generate_arithmetic_problem, generate_combo_problem, generate_missing_problem,
};
use crate::highscores::GameId;

use super::{GameRules, Outcome, RoundContext, SessionStats};

fn judge(ctx: &mut RoundContext<'_>, correct: bool, points: u32) -> Outcome {
    if correct {
        ctx.cue(SoundCue::Correct);
        Outcome::Resolved {
            correct: true,
            points,
        }
    } else {
        ctx.cue(SoundCue::Wrong);
        Outcome::Resolved {
            correct: false,
            points: 0,
        }
    }
}

/// Multiple-choice arithmetic drill
#[derive(Debug, Default)]
pub struct MathRules;

impl GameRules for MathRules {
    type Round = ArithmeticProblem;
    type Input = u32;

    fn game_id(&self) -> GameId {
        GameId::Math
    }

    fn total_rounds(&self) -> Option<u32> {
        Some(MATH_ROUNDS)
    }

    fn new_round(&mut self, ctx: &mut RoundContext<'_>) -> ArithmeticProblem {
        generate_arithmetic_problem(ctx.rng, ctx.difficulty)
    }

    fn apply(
        &mut self,
        round: &mut ArithmeticProblem,
        choice: u32,
        ctx: &mut RoundContext<'_>,
    ) -> Outcome {
        let multiplier = if ctx.streak >= STREAK_BONUS_THRESHOLD { 2 } else { 1 };
        judge(ctx, round.is_correct(choice), BASE_POINTS * multiplier)
    }

    fn summary(&self, stats: &SessionStats) -> String {
        format!(
            "You answered {} of {} questions correctly!",
            stats.correct, MATH_ROUNDS
        )
    }
}

/// Fill in the hidden term of `a op b = c`
#[derive(Debug, Default)]
pub struct MissingRules;

impl GameRules for MissingRules {
    type Round = MissingProblem;
    type Input = u32;

    fn game_id(&self) -> GameId {
        GameId::Missing
    }

    fn total_rounds(&self) -> Option<u32> {
        Some(MISSING_ROUNDS)
    }

    fn new_round(&mut self, ctx: &mut RoundContext<'_>) -> MissingProblem {
        generate_missing_problem(ctx.rng, ctx.difficulty)
    }

    fn apply(&mut self, round: &mut MissingProblem, choice: u32, ctx: &mut RoundContext<'_>) -> Outcome {
        judge(ctx, round.is_correct(choice), BASE_POINTS)
    }

    fn summary(&self, stats: &SessionStats) -> String {
        format!(
            "You found {} of {} missing numbers!",
            stats.correct, MISSING_ROUNDS
        )
    }
}

/// A combo round and the player's current picks
#[derive(Debug, Clone)]
pub struct ComboRound {
    pub problem: ComboProblem,
    selected: Vec<usize>,
}

impl ComboRound {
    pub fn new(problem: ComboProblem) -> Self {
        Self {
            problem,
            selected: Vec::new(),
        }
    }

    /// Selected indices in pick order
    pub fn selected(&self) -> &[usize] {
        &self.selected
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.selected.contains(&index)
    }

    pub fn current_sum(&self) -> u32 {
        self.problem.sum_of(&self.selected)
    }

    /// Select or deselect `index`. Returns false if out of range.
    fn toggle(&mut self, index: usize) -> bool {
        if index >= self.problem.numbers.len() {
            return false;
        }
        match self.selected.iter().position(|&i| i == index) {
            Some(at) => {
                self.selected.remove(at);
            }
            None => self.selected.push(index),
        }
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComboInput {
    Toggle(usize),
    Submit,
    Clear,
}

/// Pick numbers that add up to the target, one round at a time
#[derive(Debug, Default)]
pub struct ComboRules;

impl GameRules for ComboRules {
    type Round = ComboRound;
    type Input = ComboInput;

    fn game_id(&self) -> GameId {
        GameId::Combo
    }

    fn total_rounds(&self) -> Option<u32> {
        Some(COMBO_ROUNDS)
    }

    fn new_round(&mut self, ctx: &mut RoundContext<'_>) -> ComboRound {
        ComboRound::new(generate_combo_problem(ctx.rng, ctx.difficulty))
    }

    fn apply(&mut self, round: &mut ComboRound, input: ComboInput, ctx: &mut RoundContext<'_>) -> Outcome {
        match input {
            ComboInput::Toggle(index) => {
                if !round.toggle(index) {
                    return Outcome::Ignored;
                }
                ctx.cue(SoundCue::Click);
                Outcome::Continue { points: 0 }
            }
            ComboInput::Clear => {
                if round.selected.is_empty() {
                    return Outcome::Ignored;
                }
                round.selected.clear();
                Outcome::Continue { points: 0 }
            }
            ComboInput::Submit => {
                if round.selected.is_empty() {
                    return Outcome::Ignored;
                }
                let points = BASE_POINTS + 2 * round.selected.len() as u32;
                judge(ctx, round.problem.is_solution(&round.selected), points)
            }
        }
    }

    fn summary(&self, stats: &SessionStats) -> String {
        format!(
            "You solved {} of {} combos for {} points!",
            stats.correct, COMBO_ROUNDS, stats.score
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridInput {
    Tap(GridCell),
    /// Player ends the run; the score is recorded
    Finish,
}

/// Endless grid mode: tap cells until their sum hits the target. The board
/// is always solvable, so only `GridInput::Finish` ends the session.
#[derive(Debug, Default)]
pub struct GridRules;

impl GameRules for GridRules {
    type Round = ComboGrid;
    type Input = GridInput;

    fn game_id(&self) -> GameId {
        GameId::Combo
    }

    fn total_rounds(&self) -> Option<u32> {
        None
    }

    fn new_round(&mut self, ctx: &mut RoundContext<'_>) -> ComboGrid {
        ComboGrid::new(ctx.rng, ctx.difficulty)
    }

    fn apply(&mut self, grid: &mut ComboGrid, input: GridInput, ctx: &mut RoundContext<'_>) -> Outcome {
        let cell = match input {
            GridInput::Tap(cell) => cell,
            GridInput::Finish => return Outcome::GameOver,
        };
        match grid.select(ctx.rng, cell) {
            SelectOutcome::Ignored => Outcome::Ignored,
            SelectOutcome::Selecting { .. } => {
                ctx.cue(SoundCue::Click);
                Outcome::Continue { points: 0 }
            }
            SelectOutcome::Cleared { points, .. } => {
                ctx.cue(SoundCue::Success);
                Outcome::Continue { points }
            }
            SelectOutcome::Overshoot { .. } => {
                ctx.cue(SoundCue::Wrong);
                Outcome::Continue { points: 0 }
            }
        }
    }

    fn summary(&self, stats: &SessionStats) -> String {
        format!("You scored {} points!", stats.score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::ProgressStore;
    use crate::session::{Feedback, SessionController, SessionEvent, SessionPhase};
    use crate::generate::GRID_SIZE;
    use crate::generate::grid::{CLEAR_POINTS_PER_CELL, STREAK_BONUS};
    use crate::settings::Difficulty;

    fn cues(events: &[SessionEvent]) -> Vec<SoundCue> {
        events
            .iter()
            .filter_map(|e| match e {
                SessionEvent::Cue(cue) => Some(*cue),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_math_wrong_answer_scores_nothing() {
        let mut store = ProgressStore::in_memory();
        let mut session = SessionController::new(MathRules, &store, 3);
        session.drain_events();

        let wrong = session.round().answer + 1;
        assert!(session.submit(wrong, &mut store).is_some());
        assert_eq!(session.score(), 0);
        assert_eq!(session.phase(), SessionPhase::Feedback(Feedback::Wrong));
        assert_eq!(cues(&session.drain_events()), vec![SoundCue::Wrong]);
    }

    #[test]
    fn test_missing_scores_base_points() {
        let mut store = ProgressStore::in_memory();
        let mut session = SessionController::new(MissingRules, &store, 8);
        let answer = session.round().answer();
        session.submit(answer, &mut store);
        assert_eq!(session.score(), BASE_POINTS);
    }

    #[test]
    fn test_combo_toggle_and_submit() {
        let mut store = ProgressStore::in_memory();
        let mut session = SessionController::new(ComboRules, &store, 11);
        session.drain_events();

        // Empty submit does nothing
        assert!(session.submit(ComboInput::Submit, &mut store).is_none());
        assert_eq!(session.phase(), SessionPhase::Playing);

        // Select and deselect
        session.submit(ComboInput::Toggle(0), &mut store);
        assert_eq!(session.round().selected(), &[0]);
        session.submit(ComboInput::Toggle(0), &mut store);
        assert!(session.round().selected().is_empty());
        assert_eq!(
            cues(&session.drain_events()),
            vec![SoundCue::Click, SoundCue::Click]
        );

        // Out of range is ignored
        assert!(session.submit(ComboInput::Toggle(99), &mut store).is_none());
        assert!(session.round().selected().is_empty());
    }

    #[test]
    fn test_combo_any_matching_subset_scores() {
        let mut store = ProgressStore::in_memory();
        let mut session = SessionController::new(ComboRules, &store, 11);
        let problem = session.round().problem.clone();

        // Find any subset that hits the target
        let n = problem.numbers.len();
        let subset = (1u32..(1 << n))
            .map(|mask| (0..n).filter(|i| mask & (1 << i) != 0).collect::<Vec<_>>())
            .find(|s| problem.is_solution(s))
            .expect("generated round is solvable");

        for &i in &subset {
            session.submit(ComboInput::Toggle(i), &mut store);
        }
        assert_eq!(session.round().current_sum(), problem.target);
        assert!(session.submit(ComboInput::Submit, &mut store).is_some());
        assert_eq!(session.score(), BASE_POINTS + 2 * subset.len() as u32);
    }

    #[test]
    fn test_grid_clear_overshoot_and_finish() {
        let mut store = ProgressStore::in_memory();
        store.set_difficulty(Difficulty::Easy);
        let mut session = SessionController::new(GridRules, &store, 4);

        let mut columns = vec![vec![1; GRID_SIZE]; GRID_SIZE];
        columns[0][0] = 9;
        columns[2][0] = 9;
        columns[3][0] = 5;
        *session.round_mut() = ComboGrid::from_columns(10, columns).expect("8x8 board");
        session.drain_events();

        // Out of range does nothing
        assert!(session.submit(GridInput::Tap(GridCell::new(99, 0)), &mut store).is_none());

        // 9 + 1 hits the target
        session.submit(GridInput::Tap(GridCell::new(0, 0)), &mut store);
        session.submit(GridInput::Tap(GridCell::new(1, 0)), &mut store);
        let clear_points = 2 * CLEAR_POINTS_PER_CELL + STREAK_BONUS;
        assert_eq!(session.score(), clear_points);
        assert_eq!(session.round().streak(), 1);

        // 9 + 5 goes past it
        session.submit(GridInput::Tap(GridCell::new(2, 0)), &mut store);
        session.submit(GridInput::Tap(GridCell::new(3, 0)), &mut store);
        assert_eq!(session.round().streak(), 0);
        assert!(session.round().selection().is_empty());
        assert_eq!(session.score(), clear_points);
        assert_eq!(session.phase(), SessionPhase::Playing);

        assert_eq!(
            cues(&session.drain_events()),
            vec![
                SoundCue::Click,
                SoundCue::Success,
                SoundCue::Click,
                SoundCue::Wrong
            ]
        );

        // Ending the run records it
        assert!(session.submit(GridInput::Finish, &mut store).is_none());
        assert!(session.is_finished());
        assert_eq!(store.high_score(GameId::Combo), clear_points);
        assert_eq!(
            store.recent_games().latest().map(|g| (g.game_id, g.score)),
            Some((GameId::Combo, clear_points))
        );
        assert!(session.submit(GridInput::Tap(GridCell::new(0, 0)), &mut store).is_none());
    }
}
