//! Multiple-choice answer options

use rand::Rng;
use rand::seq::SliceRandom;

/// Number of options shown per question
pub const OPTION_COUNT: usize = 4;

/// Largest distance between a distractor and the answer
pub const MAX_OFFSET: i64 = 5;

/// Random draws before falling back to a deterministic fill
const MAX_ATTEMPTS: u32 = 64;

/// Build `OPTION_COUNT` distinct positive options containing `answer`,
/// in shuffled order.
///
/// Distractors are the answer perturbed by an offset in
/// `[-MAX_OFFSET, MAX_OFFSET]`; non-positive and duplicate values are
/// rejected. Rejection sampling is bounded: if the draws run out, the
/// remaining slots take the smallest unused values above the answer.
pub fn generate_options<R: Rng + ?Sized>(rng: &mut R, answer: u32) -> [u32; OPTION_COUNT] {
    options_with_budget(rng, answer, MAX_ATTEMPTS)
}

fn options_with_budget<R: Rng + ?Sized>(
    rng: &mut R,
    answer: u32,
    max_attempts: u32,
) -> [u32; OPTION_COUNT] {
    let mut options = [answer; OPTION_COUNT];
    let mut filled = 1;

    let mut attempts = 0;
    while filled < OPTION_COUNT && attempts < max_attempts {
        attempts += 1;
        let candidate = answer as i64 + rng.random_range(-MAX_OFFSET..=MAX_OFFSET);
        if candidate <= 0 {
            continue;
        }
        let candidate = candidate as u32;
        if options[..filled].contains(&candidate) {
            continue;
        }
        options[filled] = candidate;
        filled += 1;
    }

    let mut next = answer.saturating_add(1);
    while filled < OPTION_COUNT {
        if !options[..filled].contains(&next) {
            options[filled] = next;
            filled += 1;
        }
        next = next.saturating_add(1);
    }

    options.shuffle(rng);
    options
}
