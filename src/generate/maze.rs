//! Perfect mazes by randomized depth-first carving

use std::collections::VecDeque;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Movement direction on the grid (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Right, Direction::Down, Direction::Left];

    pub fn delta(&self) -> (isize, isize) {
        match self {
            Direction::Up => (0, -1),
            Direction::Right => (1, 0),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
        }
    }

    pub fn opposite(&self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Right => Direction::Left,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
        }
    }

    /// Map an arrow/WASD key name to a direction
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowUp" | "w" | "W" => Some(Direction::Up),
            "ArrowDown" | "s" | "S" => Some(Direction::Down),
            "ArrowLeft" | "a" | "A" => Some(Direction::Left),
            "ArrowRight" | "d" | "D" => Some(Direction::Right),
            _ => None,
        }
    }

    /// Classify a swipe by its dominant axis; shorter than `min_swipe` is no move
    pub fn from_swipe(dx: f32, dy: f32, min_swipe: f32) -> Option<Self> {
        if dx.abs() > dy.abs() {
            if dx > min_swipe {
                Some(Direction::Right)
            } else if dx < -min_swipe {
                Some(Direction::Left)
            } else {
                None
            }
        } else if dy > min_swipe {
            Some(Direction::Down)
        } else if dy < -min_swipe {
            Some(Direction::Up)
        } else {
            None
        }
    }
}

/// Wall flags of one cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Walls {
    pub top: bool,
    pub right: bool,
    pub bottom: bool,
    pub left: bool,
}

impl Walls {
    pub const CLOSED: Walls = Walls {
        top: true,
        right: true,
        bottom: true,
        left: true,
    };

    pub fn has(&self, dir: Direction) -> bool {
        match dir {
            Direction::Up => self.top,
            Direction::Right => self.right,
            Direction::Down => self.bottom,
            Direction::Left => self.left,
        }
    }

    fn open(&mut self, dir: Direction) {
        match dir {
            Direction::Up => self.top = false,
            Direction::Right => self.right = false,
            Direction::Down => self.bottom = false,
            Direction::Left => self.left = false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MazeCell {
    pub x: usize,
    pub y: usize,
    pub walls: Walls,
    /// Only meaningful while carving
    #[serde(skip)]
    pub visited: bool,
}

/// Immutable grid of cells, row-major
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Maze {
    width: usize,
    height: usize,
    cells: Vec<MazeCell>,
}

impl Maze {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn cell(&self, x: usize, y: usize) -> Option<&MazeCell> {
        if x < self.width && y < self.height {
            self.cells.get(y * self.width + x)
        } else {
            None
        }
    }

    pub fn cells(&self) -> &[MazeCell] {
        &self.cells
    }

    /// Bottom-right corner
    pub fn goal(&self) -> (usize, usize) {
        (self.width - 1, self.height - 1)
    }

    fn neighbor(&self, x: usize, y: usize, dir: Direction) -> Option<(usize, usize)> {
        let (dx, dy) = dir.delta();
        let nx = x.checked_add_signed(dx)?;
        let ny = y.checked_add_signed(dy)?;
        (nx < self.width && ny < self.height).then_some((nx, ny))
    }

    /// Cell reached by stepping `dir` from `(x, y)`, if no wall or edge is in the way
    pub fn step(&self, x: usize, y: usize, dir: Direction) -> Option<(usize, usize)> {
        let cell = self.cell(x, y)?;
        if cell.walls.has(dir) {
            return None;
        }
        self.neighbor(x, y, dir)
    }

    /// Shortest open path between two cells, both ends included
    pub fn shortest_path(&self, from: (usize, usize), to: (usize, usize)) -> Option<Vec<(usize, usize)>> {
        self.cell(from.0, from.1)?;
        self.cell(to.0, to.1)?;

        let idx = |(x, y): (usize, usize)| y * self.width + x;
        let mut came_from: Vec<Option<(usize, usize)>> = vec![None; self.cells.len()];
        let mut seen = vec![false; self.cells.len()];
        let mut queue = VecDeque::from([from]);
        seen[idx(from)] = true;

        while let Some(pos) = queue.pop_front() {
            if pos == to {
                let mut path = vec![pos];
                let mut cur = pos;
                while let Some(prev) = came_from[idx(cur)] {
                    path.push(prev);
                    cur = prev;
                }
                path.reverse();
                return Some(path);
            }
            for dir in Direction::ALL {
                if let Some(next) = self.step(pos.0, pos.1, dir) {
                    if !seen[idx(next)] {
                        seen[idx(next)] = true;
                        came_from[idx(next)] = Some(pos);
                        queue.push_back(next);
                    }
                }
            }
        }
        None
    }

    /// Directions that walk the shortest path from `from` to `to`
    pub fn solution(&self, from: (usize, usize), to: (usize, usize)) -> Option<Vec<Direction>> {
        let path = self.shortest_path(from, to)?;
        Some(
            path.windows(2)
                .filter_map(|w| {
                    Direction::ALL
                        .into_iter()
                        .find(|&d| self.neighbor(w[0].0, w[0].1, d) == Some(w[1]))
                })
                .collect(),
        )
    }
}

/// Carve a `width × height` perfect maze (both clamped to at least 1).
///
/// Depth-first search from (0, 0) with an explicit stack: the top cell opens
/// the wall to a random unvisited neighbour and pushes it, or is popped when
/// it has none. Every cell is visited exactly once, so carving terminates
/// and the opened walls form a spanning tree.
pub fn generate_maze<R: Rng + ?Sized>(rng: &mut R, width: usize, height: usize) -> Maze {
    let width = width.max(1);
    let height = height.max(1);

    let mut maze = Maze {
        width,
        height,
        cells: (0..height)
            .flat_map(|y| {
                (0..width).map(move |x| MazeCell {
                    x,
                    y,
                    walls: Walls::CLOSED,
                    visited: false,
                })
            })
            .collect(),
    };

    let mut stack = vec![(0usize, 0usize)];
    maze.cells[0].visited = true;

    let mut unvisited = Vec::with_capacity(4);
    while let Some(&(x, y)) = stack.last() {
        unvisited.clear();
        for dir in Direction::ALL {
            if let Some((nx, ny)) = maze.neighbor(x, y, dir) {
                if !maze.cells[ny * width + nx].visited {
                    unvisited.push((dir, nx, ny));
                }
            }
        }

        if unvisited.is_empty() {
            stack.pop();
            continue;
        }

        let (dir, nx, ny) = unvisited[rng.random_range(0..unvisited.len())];
        maze.cells[y * width + x].walls.open(dir);
        let next = &mut maze.cells[ny * width + nx];
        next.walls.open(dir.opposite());
        next.visited = true;
        stack.push((nx, ny));
    }

    maze
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn open_passages(maze: &Maze) -> usize {
        maze.cells()
            .iter()
            .map(|c| usize::from(!c.walls.right) + usize::from(!c.walls.bottom))
            .sum()
    }

    #[test]
    fn test_single_cell() {
        let mut rng = Pcg32::seed_from_u64(0);
        let maze = generate_maze(&mut rng, 1, 1);
        assert_eq!(maze.goal(), (0, 0));
        assert_eq!(maze.cell(0, 0).map(|c| c.walls), Some(Walls::CLOSED));
        assert_eq!(maze.shortest_path((0, 0), (0, 0)), Some(vec![(0, 0)]));
    }

    #[test]
    fn test_outer_walls_stay_closed() {
        let mut rng = Pcg32::seed_from_u64(21);
        let maze = generate_maze(&mut rng, 9, 6);
        for c in maze.cells() {
            if c.x == 0 {
                assert!(c.walls.left);
            }
            if c.y == 0 {
                assert!(c.walls.top);
            }
            if c.x == 8 {
                assert!(c.walls.right);
            }
            if c.y == 5 {
                assert!(c.walls.bottom);
            }
        }
    }

    #[test]
    fn test_walls_are_consistent() {
        let mut rng = Pcg32::seed_from_u64(22);
        let maze = generate_maze(&mut rng, 7, 7);
        for c in maze.cells() {
            if let Some(right) = maze.cell(c.x + 1, c.y) {
                assert_eq!(c.walls.right, right.walls.left);
            }
            if let Some(below) = maze.cell(c.x, c.y + 1) {
                assert_eq!(c.walls.bottom, below.walls.top);
            }
        }
    }

    #[test]
    fn test_step_blocked_by_wall() {
        let mut rng = Pcg32::seed_from_u64(23);
        let maze = generate_maze(&mut rng, 5, 5);
        assert_eq!(maze.step(0, 0, Direction::Up), None);
        assert_eq!(maze.step(0, 0, Direction::Left), None);
        for dir in Direction::ALL {
            let blocked = maze.cell(2, 2).map(|c| c.walls.has(dir)).unwrap_or(true);
            assert_eq!(maze.step(2, 2, dir).is_none(), blocked);
        }
    }

    #[test]
    fn test_solution_walks_to_goal() {
        let mut rng = Pcg32::seed_from_u64(24);
        let maze = generate_maze(&mut rng, 10, 10);
        let moves = maze.solution((0, 0), maze.goal()).unwrap();
        let mut pos = (0, 0);
        for dir in moves {
            pos = maze.step(pos.0, pos.1, dir).unwrap();
        }
        assert_eq!(pos, maze.goal());
    }

    #[test]
    fn test_input_mapping() {
        assert_eq!(Direction::from_key("ArrowLeft"), Some(Direction::Left));
        assert_eq!(Direction::from_key("W"), Some(Direction::Up));
        assert_eq!(Direction::from_key("q"), None);
        assert_eq!(Direction::from_swipe(50.0, 10.0, 30.0), Some(Direction::Right));
        assert_eq!(Direction::from_swipe(-5.0, -40.0, 30.0), Some(Direction::Up));
        assert_eq!(Direction::from_swipe(20.0, 5.0, 30.0), None);
    }

    proptest! {
        #[test]
        fn maze_is_perfect(seed in any::<u64>(), w in 1usize..16, h in 1usize..16) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let maze = generate_maze(&mut rng, w, h);

            // Spanning tree: n - 1 passages and every cell reachable
            prop_assert_eq!(open_passages(&maze), w * h - 1);
            for c in maze.cells() {
                prop_assert!(maze.shortest_path((0, 0), (c.x, c.y)).is_some());
            }
            prop_assert!(maze.shortest_path((0, 0), (w - 1, h - 1)).is_some());
        }
    }
}
