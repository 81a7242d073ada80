//! Four-operator arithmetic drill

use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use super::options::{OPTION_COUNT, generate_options};
use crate::settings::Difficulty;

/// Largest divisor and quotient in division problems
pub const DIVISION_MAX: u32 = 9;

/// Arithmetic operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
}

impl Operator {
    pub fn symbol(&self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Sub => '−',
            Operator::Mul => '×',
            Operator::Div => '÷',
        }
    }

    /// Exact result of `lhs op rhs`, `None` when it would not be a
    /// non-negative integer
    pub fn apply(&self, lhs: u32, rhs: u32) -> Option<u32> {
        match self {
            Operator::Add => lhs.checked_add(rhs),
            Operator::Sub => lhs.checked_sub(rhs),
            Operator::Mul => lhs.checked_mul(rhs),
            Operator::Div => {
                if rhs != 0 && lhs % rhs == 0 {
                    Some(lhs / rhs)
                } else {
                    None
                }
            }
        }
    }
}

/// `lhs op rhs = ?` with four answer options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArithmeticProblem {
    pub lhs: u32,
    pub rhs: u32,
    pub operator: Operator,
    pub answer: u32,
    pub options: [u32; OPTION_COUNT],
}

impl ArithmeticProblem {
    pub fn is_correct(&self, choice: u32) -> bool {
        choice == self.answer
    }

    /// Question text, e.g. `7 × 8 = ?`
    pub fn prompt(&self) -> String {
        format!("{} {} {} = ?", self.lhs, self.operator.symbol(), self.rhs)
    }
}

/// Generate a drill problem for `difficulty`.
///
/// Answers are always positive: subtraction keeps the subtrahend below the
/// minuend, and division builds the dividend from divisor × quotient so it
/// never leaves a remainder.
pub fn generate_arithmetic_problem<R: Rng + ?Sized>(
    rng: &mut R,
    difficulty: Difficulty,
) -> ArithmeticProblem {
    let max = difficulty.operand_max();
    let operator = *difficulty
        .operators()
        .choose(rng)
        .unwrap_or(&Operator::Add);

    let (lhs, rhs, answer) = match operator {
        Operator::Add => {
            let lhs = rng.random_range(1..=max);
            let rhs = rng.random_range(1..=max);
            (lhs, rhs, lhs + rhs)
        }
        Operator::Sub => {
            let lhs = rng.random_range(2..=max);
            let rhs = rng.random_range(1..lhs);
            (lhs, rhs, lhs - rhs)
        }
        Operator::Mul => {
            let lhs = rng.random_range(1..=difficulty.times_table().min(max));
            let rhs = rng.random_range(1..=DIVISION_MAX.min(max));
            (lhs, rhs, lhs * rhs)
        }
        Operator::Div => {
            let divisor = rng.random_range(1..=DIVISION_MAX);
            let quotient = rng.random_range(1..=DIVISION_MAX);
            (divisor * quotient, divisor, quotient)
        }
    };

    ArithmeticProblem {
        lhs,
        rhs,
        operator,
        answer,
        options: generate_options(rng, answer),
    }
}
