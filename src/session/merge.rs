//! Fruit merge: drop fruits, fuse equal pairs, don't overflow the box

use crate::audio::SoundCue;
use crate::highscores::GameId;
use crate::sim::{MergeEvent, MergeState, points_in, tick};

use super::{GameRules, Outcome, RoundContext, SessionStats};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MergeInput {
    /// Move the drop position
    Aim(f32),
    /// Release the next fruit
    Drop,
}

/// One continuous round that only overflow ends
#[derive(Debug, Default)]
pub struct MergeRules;

impl GameRules for MergeRules {
    type Round = MergeState;
    type Input = MergeInput;

    fn game_id(&self) -> GameId {
        GameId::Fruit
    }

    fn total_rounds(&self) -> Option<u32> {
        None
    }

    fn new_round(&mut self, ctx: &mut RoundContext<'_>) -> MergeState {
        MergeState::new(ctx.rng, ctx.difficulty.merge_max_rank())
    }

    fn apply(&mut self, state: &mut MergeState, input: MergeInput, ctx: &mut RoundContext<'_>) -> Outcome {
        match input {
            MergeInput::Aim(x) => {
                state.aim(x);
                Outcome::Ignored
            }
            MergeInput::Drop => match state.drop_fruit(ctx.rng, ctx.difficulty.merge_max_rank()) {
                Some(_) => {
                    ctx.cue(SoundCue::Drop);
                    Outcome::Continue { points: 0 }
                }
                None => Outcome::Ignored,
            },
        }
    }

    fn step(&mut self, state: &mut MergeState, dt: f32, ctx: &mut RoundContext<'_>) -> Outcome {
        let events = tick(state, dt);
        for event in &events {
            if matches!(event, MergeEvent::Merged { .. }) {
                ctx.cue(SoundCue::Merge);
            }
        }

        if events.iter().any(|e| matches!(e, MergeEvent::Overflow { .. })) {
            return Outcome::GameOver;
        }
        match points_in(&events) {
            0 => Outcome::Ignored,
            points => Outcome::Continue { points },
        }
    }

    fn summary(&self, stats: &SessionStats) -> String {
        format!("The box overflowed! You scored {} points.", stats.score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::persistence::ProgressStore;
    use crate::session::{SessionController, SessionEvent};
    use crate::sim::radius_of;

    #[test]
    fn test_aim_is_clamped_to_next_fruit() {
        let mut store = ProgressStore::in_memory();
        let mut session = SessionController::new(MergeRules, &store, 5);
        session.submit(MergeInput::Aim(-100.0), &mut store);
        let r = radius_of(session.round().next_rank);
        assert_eq!(session.round().aim_x, r);
        session.submit(MergeInput::Aim(FIELD_WIDTH + 100.0), &mut store);
        assert_eq!(session.round().aim_x, FIELD_WIDTH - r);
    }

    #[test]
    fn test_drop_respects_cooldown() {
        let mut store = ProgressStore::in_memory();
        let mut session = SessionController::new(MergeRules, &store, 5);
        session.drain_events();

        session.submit(MergeInput::Drop, &mut store);
        session.submit(MergeInput::Drop, &mut store);
        assert_eq!(session.round().fruits.len(), 1);
        assert_eq!(
            session.drain_events(),
            vec![SessionEvent::Cue(SoundCue::Drop)]
        );

        let frames = (DROP_COOLDOWN_MS as f32 / 1000.0 / SIM_DT) as usize + 2;
        for _ in 0..frames {
            session.advance(SIM_DT, &mut store);
        }
        session.submit(MergeInput::Drop, &mut store);
        assert_eq!(session.round().fruits.len(), 2);
    }

    #[test]
    fn test_fusion_scores_through_session() {
        let mut store = ProgressStore::in_memory();
        let mut session = SessionController::new(MergeRules, &store, 5);
        session.drain_events();

        // Two touching cherries on the floor fuse on the next step
        let y = FIELD_HEIGHT - radius_of(0);
        for x in [100.0, 120.0] {
            let id = session.round_mut().spawn(0, glam::Vec2::new(x, y));
            assert!(id > 0);
        }
        session.advance(SIM_DT, &mut store);

        assert_eq!(session.score(), crate::sim::value_of(1));
        let events = session.drain_events();
        assert!(events.contains(&SessionEvent::Cue(SoundCue::Merge)));
    }

    #[test]
    fn test_overflow_finishes_session() {
        let mut store = ProgressStore::in_memory();
        let mut session = SessionController::new(MergeRules, &store, 5);

        // Stack watermelons, which never fuse, past the drop line
        let r = radius_of(crate::sim::MAX_RANK);
        let mut y = FIELD_HEIGHT - r;
        while y + r > DROP_LINE_Y - r {
            session
                .round_mut()
                .spawn(crate::sim::MAX_RANK, glam::Vec2::new(FIELD_WIDTH / 2.0, y));
            y -= 2.0 * r;
        }

        for _ in 0..(4 * OVERFLOW_GRACE_MS as usize * 60 / 1000) {
            for f in &mut session.round_mut().fruits {
                f.pos.x = FIELD_WIDTH / 2.0;
                f.vel.x = 0.0;
            }
            session.advance(SIM_DT, &mut store);
            if session.is_finished() {
                break;
            }
        }

        assert!(session.is_finished());
        assert_eq!(store.recent_games().len(), 1);
        assert_eq!(
            store.recent_games().latest().map(|g| g.game_id),
            Some(GameId::Fruit)
        );
        // Finished is terminal
        session.advance(1.0, &mut store);
        assert!(session.submit(MergeInput::Drop, &mut store).is_none());
        assert_eq!(store.recent_games().len(), 1);
    }
}
