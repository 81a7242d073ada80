//! Procedural content generation
//!
//! Every generator is a pure function of an explicit random source and the
//! difficulty tier, so a fixed seed reproduces the same content:
//! - `arithmetic`: four-operator drill problems
//! - `missing`: `a op b = c` with one term hidden
//! - `combo`: pick numbers that add up to a target
//! - `grid`: 8×8 match-sum board with gravity refill
//! - `maze`: perfect mazes by depth-first carving

pub mod arithmetic;
pub mod combo;
pub mod grid;
pub mod maze;
pub mod missing;
pub mod options;

pub use arithmetic::{ArithmeticProblem, Operator, generate_arithmetic_problem};
pub use combo::{ComboProblem, generate_combo_problem};
pub use grid::{ComboGrid, GRID_SIZE, GridCell, SelectOutcome};
pub use maze::{Direction, Maze, MazeCell, Walls, generate_maze};
pub use missing::{Blank, MissingProblem, generate_missing_problem};
pub use options::{OPTION_COUNT, generate_options};
