//! Missing-operand problems: `a op b = c` with one term blanked out

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::arithmetic::Operator;
use super::options::{OPTION_COUNT, generate_options};
use crate::settings::Difficulty;

/// Which term of `a op b = c` is hidden
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Blank {
    Left,
    Right,
    Result,
}

impl Blank {
    pub const ALL: [Blank; 3] = [Blank::Left, Blank::Right, Blank::Result];
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingProblem {
    pub lhs: u32,
    pub rhs: u32,
    pub result: u32,
    pub operator: Operator,
    pub blank: Blank,
    pub options: [u32; OPTION_COUNT],
}

impl MissingProblem {
    /// True value of the hidden term
    pub fn answer(&self) -> u32 {
        match self.blank {
            Blank::Left => self.lhs,
            Blank::Right => self.rhs,
            Blank::Result => self.result,
        }
    }

    pub fn is_correct(&self, choice: u32) -> bool {
        choice == self.answer()
    }

    /// The three terms as shown to the player, `None` for the blank
    pub fn terms(&self) -> [Option<u32>; 3] {
        let mut terms = [Some(self.lhs), Some(self.rhs), Some(self.result)];
        let hidden = match self.blank {
            Blank::Left => 0,
            Blank::Right => 1,
            Blank::Result => 2,
        };
        terms[hidden] = None;
        terms
    }

    /// Question text, e.g. `? + 4 = 9`
    pub fn prompt(&self) -> String {
        let show = |t: Option<u32>| t.map_or_else(|| "?".to_string(), |v| v.to_string());
        let [a, b, c] = self.terms();
        format!("{} {} {} = {}", show(a), self.operator.symbol(), show(b), show(c))
    }
}

/// Generate a missing-operand problem for `difficulty`.
///
/// Subtraction samples the minuend first and splits it, so every term is
/// at least 1.
pub fn generate_missing_problem<R: Rng + ?Sized>(
    rng: &mut R,
    difficulty: Difficulty,
) -> MissingProblem {
    let max = difficulty.operand_max();

    let (lhs, rhs, result, operator) = if rng.random_bool(0.5) {
        let lhs = rng.random_range(1..=max);
        let rhs = rng.random_range(1..=max);
        (lhs, rhs, lhs + rhs, Operator::Add)
    } else {
        let minuend = rng.random_range(2..=max + 1);
        let rhs = rng.random_range(1..minuend);
        (minuend, rhs, minuend - rhs, Operator::Sub)
    };

    let blank = Blank::ALL[rng.random_range(0..Blank::ALL.len())];
    let answer = match blank {
        Blank::Left => lhs,
        Blank::Right => rhs,
        Blank::Result => result,
    };

    MissingProblem {
        lhs,
        rhs,
        result,
        operator,
        blank,
        options: generate_options(rng, answer),
    }
}
