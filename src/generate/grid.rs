//! Match-sum grid: tap cells until they add up to the target
//!
//! The board is stored column-major with row 0 at the top. Cleared cells are
//! removed from their column, the survivors fall, and fresh values enter
//! from the top so every column is always `GRID_SIZE` tall.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::settings::Difficulty;

/// Side length of the board
pub const GRID_SIZE: usize = 8;
/// Largest value a cell may hold
pub const MAX_CELL_VALUE: u32 = 9;
/// Points per cleared cell
pub const CLEAR_POINTS_PER_CELL: u32 = 10;
/// Bonus per streak step on each clear
pub const STREAK_BONUS: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridCell {
    pub col: usize,
    pub row: usize,
}

impl GridCell {
    pub fn new(col: usize, row: usize) -> Self {
        Self { col, row }
    }
}

/// What a tap did to the board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectOutcome {
    /// Out of bounds
    Ignored,
    /// Selection changed, sum still below target
    Selecting { sum: u32 },
    /// Selection hit the target and was cleared
    Cleared { cells: usize, points: u32, streak: u32 },
    /// Selection went past the target and was dropped
    Overshoot { sum: u32 },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComboGrid {
    columns: Vec<Vec<u32>>,
    target: u32,
    selection: Vec<GridCell>,
    streak: u32,
    score: u32,
}

impl ComboGrid {
    /// Fresh random board for `difficulty`
    pub fn new<R: Rng + ?Sized>(rng: &mut R, difficulty: Difficulty) -> Self {
        let target = difficulty.grid_target();
        let max = max_value(target);
        let columns = (0..GRID_SIZE)
            .map(|_| (0..GRID_SIZE).map(|_| rng.random_range(1..=max)).collect())
            .collect();
        let mut grid = Self {
            columns,
            target,
            selection: Vec::new(),
            streak: 0,
            score: 0,
        };
        grid.ensure_solvable();
        grid
    }

    /// Board from explicit columns (each top to bottom). `None` unless the
    /// board is `GRID_SIZE` columns of `GRID_SIZE` positive values.
    pub fn from_columns(target: u32, columns: Vec<Vec<u32>>) -> Option<Self> {
        let well_formed = columns.len() == GRID_SIZE
            && columns
                .iter()
                .all(|col| col.len() == GRID_SIZE && col.iter().all(|&v| v > 0));
        if !well_formed {
            return None;
        }
        Some(Self {
            columns,
            target,
            selection: Vec::new(),
            streak: 0,
            score: 0,
        })
    }

    pub fn target(&self) -> u32 {
        self.target
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn selection(&self) -> &[GridCell] {
        &self.selection
    }

    pub fn value(&self, cell: GridCell) -> Option<u32> {
        self.columns.get(cell.col)?.get(cell.row).copied()
    }

    /// Height of every column
    pub fn column_heights(&self) -> impl Iterator<Item = usize> + '_ {
        self.columns.iter().map(Vec::len)
    }

    pub fn selection_sum(&self) -> u32 {
        self.selection.iter().filter_map(|&c| self.value(c)).sum()
    }

    /// Drop the in-progress selection without penalty
    pub fn cancel_selection(&mut self) {
        self.selection.clear();
    }

    /// Tap `cell`. Tapping a selected cell deselects it.
    pub fn select<R: Rng + ?Sized>(&mut self, rng: &mut R, cell: GridCell) -> SelectOutcome {
        if self.value(cell).is_none() {
            return SelectOutcome::Ignored;
        }

        if let Some(pos) = self.selection.iter().position(|&c| c == cell) {
            self.selection.remove(pos);
            return SelectOutcome::Selecting {
                sum: self.selection_sum(),
            };
        }

        self.selection.push(cell);
        let sum = self.selection_sum();

        if sum < self.target {
            SelectOutcome::Selecting { sum }
        } else if sum == self.target {
            let cells = self.selection.len();
            self.streak += 1;
            let points = cells as u32 * CLEAR_POINTS_PER_CELL + self.streak * STREAK_BONUS;
            self.score += points;
            self.clear_selection(rng);
            SelectOutcome::Cleared {
                cells,
                points,
                streak: self.streak,
            }
        } else {
            self.selection.clear();
            self.streak = 0;
            SelectOutcome::Overshoot { sum }
        }
    }

    fn clear_selection<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let max = max_value(self.target);
        for (col, column) in self.columns.iter_mut().enumerate() {
            let mut rows: Vec<usize> = self
                .selection
                .iter()
                .filter(|c| c.col == col)
                .map(|c| c.row)
                .collect();
            if rows.is_empty() {
                continue;
            }
            rows.sort_unstable_by(|a, b| b.cmp(a));
            for row in rows {
                column.remove(row);
            }
            // Survivors keep their order and sink; new values enter at the top
            let missing = GRID_SIZE - column.len();
            column.splice(0..0, (0..missing).map(|_| rng.random_range(1..=max)));
        }
        self.selection.clear();
        self.ensure_solvable();
    }

    /// Whether some set of cells sums exactly to the target
    pub fn is_solvable(&self) -> bool {
        // Bit i set = some subset sums to i (targets stay well below 64)
        let mask = if self.target >= 63 {
            u64::MAX
        } else {
            (1u64 << (self.target + 1)) - 1
        };
        let mut reachable = 1u64;
        for &v in self.columns.iter().flatten() {
            if v < 64 {
                reachable = (reachable | (reachable << v)) & mask;
            }
        }
        self.target < 64 && reachable & (1 << self.target) != 0
    }

    fn ensure_solvable(&mut self) {
        if self.is_solvable() {
            return;
        }
        log::debug!("Grid has no solution for {}, patching top row", self.target);
        let max = max_value(self.target);
        let mut remaining = self.target;
        for column in &mut self.columns {
            if remaining == 0 {
                break;
            }
            let v = remaining.min(max);
            column[0] = v;
            remaining -= v;
        }
    }
}

fn max_value(target: u32) -> u32 {
    MAX_CELL_VALUE.min(target.saturating_sub(1)).max(1)
}
