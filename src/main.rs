//! Aiden Arcade entry point
//!
//! The browser build starts from `wasm_start` in the library. Natively this
//! binary is a headless autoplayer: it plays every game with a simulated
//! clock, answering correctly, and saves the results to disk.

#[cfg(not(target_arch = "wasm32"))]
mod autoplay {
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    use aiden_arcade::audio::{AudioManager, LogSink};
    use aiden_arcade::consts::*;
    use aiden_arcade::persistence::ProgressStore;
    use aiden_arcade::session::{
        ComboInput, ComboRound, ComboRules, GameRules, MathRules, MazeRules, MergeInput,
        MergeRules, MissingRules, SessionController, SessionEvent, SessionPhase,
    };
    use aiden_arcade::timer::TimerQueue;

    /// Milliseconds per simulated frame
    const FRAME_MS: u64 = 16;
    /// Give up on a session after this much simulated time
    const SESSION_LIMIT_MS: u64 = 10 * 60 * 1000;

    /// Play one session to the end. `pick` chooses the next input while the
    /// session is waiting for one.
    pub fn play<R: GameRules>(
        rules: R,
        store: &mut ProgressStore,
        audio: &mut AudioManager<LogSink>,
        seed: u64,
        mut pick: impl FnMut(&R::Round) -> Option<R::Input>,
    ) -> Option<u32> {
        let game = rules.game_id();
        let mut session = SessionController::new(rules, store, seed);
        let mut timers = TimerQueue::new();
        let mut now: u64 = 0;

        while !session.is_finished() && now < SESSION_LIMIT_MS {
            if session.phase() == SessionPhase::Playing {
                if let Some(input) = pick(session.round()) {
                    if let Some(request) = session.submit(input, store) {
                        timers.schedule(now, request);
                    }
                }
            }

            if let Some(request) = session.advance(FRAME_MS as f32 / 1000.0, store) {
                timers.schedule(now, request);
            }
            now += FRAME_MS;
            for token in timers.pop_due(now) {
                session.fire(token, store);
            }

            for event in session.drain_events() {
                match event {
                    SessionEvent::Cue(cue) => {
                        audio.play(cue);
                    }
                    SessionEvent::Finished {
                        score,
                        message,
                        new_high_score,
                    } => {
                        log::info!("{}: {} ({} points)", game.title(), message, score);
                        if new_high_score {
                            log::info!("New {} high score!", game.title());
                        }
                    }
                    _ => {}
                }
            }
        }

        if session.is_finished() {
            Some(session.score())
        } else {
            log::warn!("{} did not finish within the time limit", game.title());
            session.teardown();
            None
        }
    }

    /// Next index to toggle (or submit) toward some subset hitting the target
    fn combo_pick(round: &ComboRound) -> Option<ComboInput> {
        let numbers = &round.problem.numbers;
        let n = numbers.len();
        let solution: Vec<usize> = (1u32..(1 << n))
            .map(|mask| (0..n).filter(|i| mask & (1 << i) != 0).collect::<Vec<_>>())
            .find(|subset| round.problem.is_solution(subset))?;

        if round.selected() == solution.as_slice() {
            return Some(ComboInput::Submit);
        }
        if round.selected().iter().any(|i| !solution.contains(i)) {
            return Some(ComboInput::Clear);
        }
        solution
            .iter()
            .find(|&&i| !round.is_selected(i))
            .map(|&i| ComboInput::Toggle(i))
    }

    pub fn run(store: &mut ProgressStore, seed: u64) {
        let mut audio = AudioManager::new(LogSink, store.sound_enabled());

        play(MathRules, store, &mut audio, seed, |p| Some(p.answer));
        play(MissingRules, store, &mut audio, seed.wrapping_add(1), |p| Some(p.answer()));
        play(ComboRules, store, &mut audio, seed.wrapping_add(2), combo_pick);
        play(MazeRules, store, &mut audio, seed.wrapping_add(3), |level| {
            level.hint().and_then(|path| path.first().copied())
        });

        // Alternate aiming at a random column with dropping
        let mut aim_rng = Pcg32::seed_from_u64(seed ^ 0x5eed);
        let mut aimed = false;
        play(MergeRules, store, &mut audio, seed.wrapping_add(4), |state| {
            if !state.can_drop() {
                return None;
            }
            aimed = !aimed;
            if aimed {
                Some(MergeInput::Aim(aim_rng.random_range(0.0..FIELD_WIDTH)))
            } else {
                Some(MergeInput::Drop)
            }
        });
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use aiden_arcade::persistence::{FileStorage, ProgressStore};
    use aiden_arcade::platform::{self, NoBackButton};

    env_logger::init();
    log::info!("Aiden Arcade (native autoplay) starting...");

    let data_dir = std::env::var("ARCADE_DATA_DIR").unwrap_or_else(|_| "arcade-data".to_string());
    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or_else(platform::now_ms);
    log::info!("Seed {seed}, data in {data_dir}");

    platform::install_back_button(&mut NoBackButton);

    let mut store = ProgressStore::load(FileStorage::new(data_dir));
    log::info!("Difficulty: {}", store.difficulty().as_str());
    autoplay::run(&mut store, seed);

    for (game, best) in store.high_scores().iter() {
        log::info!("{:<12} best {}", game.title(), best);
    }
    log::info!("{} games in history", store.recent_games().len());
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Browser start-up happens in the library's `wasm_start`
}
