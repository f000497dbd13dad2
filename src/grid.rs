//! A ready-made chain-reaction board
//!
//! Each move adds one charge to an empty or own cell. A cell holding as many
//! charges as it has orthogonal neighbours explodes: it loses those charges
//! and every neighbour gains one and changes owner. Explosions cascade.
//!
//! A player who has moved and owns no cell is out of the game.
//!
//! ```
//! use cascade_turns::{grid::Grid, Board};
//!
//! let mut board = Grid::new(2, 2, &[0, 1]).with_cell(0, 0, 0, 1);
//! let steps: Vec<_> = board.apply_move(0, &0).collect();
//! assert_eq!(steps.len(), 4);
//! assert_eq!(board.owned_by(0), 2);
//! ```

use std::collections::VecDeque;

use crate::board::{Board, CellBoard, CellView};

/// One square of the grid
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Cell {
    /// Player holding the cell, if any
    pub owner: Option<u8>,
    /// Charges stacked on the cell
    pub level: u32,
}

/// One board change caused by a move
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    /// The mover added a charge to `cell`
    Place { cell: usize, player: u8 },
    /// `cell` reached its critical level and spilled over
    Explode { cell: usize },
    /// An explosion took `cell` over for `player`
    Capture { cell: usize, player: u8 },
}

/// A rectangular chain-reaction board, cells indexed row by row
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
    players: Vec<u8>,
    moved: Vec<u8>,
}

impl Grid {
    /// An empty `width` x `height` board for `players`
    pub fn new(width: usize, height: usize, players: &[u8]) -> Self {
        Grid {
            width,
            height,
            cells: vec![Cell::default(); width * height],
            players: players.to_vec(),
            moved: Vec::new(),
        }
    }

    /// Presets a cell and marks its owner as having moved
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` lies outside the board.
    pub fn with_cell(mut self, x: usize, y: usize, owner: u8, level: u32) -> Self {
        let index = y * self.width + x;
        self.cells[index] = Cell {
            owner: Some(owner),
            level,
        };
        if !self.moved.contains(&owner) {
            self.moved.push(owner);
        }
        self
    }

    /// Marks `player` as having already moved, so owning nothing kills them
    pub fn with_moved(mut self, player: u8) -> Self {
        if !self.moved.contains(&player) {
            self.moved.push(player);
        }
        self
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// The cell at `(x, y)`, or `None` outside the board
    pub fn cell(&self, x: usize, y: usize) -> Option<Cell> {
        if x >= self.width {
            return None;
        }
        self.cells.get(y * self.width + x).copied()
    }

    /// Move index of the cell at `(x, y)`
    pub fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    /// Number of cells held by `player`
    pub fn owned_by(&self, player: u8) -> usize {
        self.cells
            .iter()
            .filter(|cell| cell.owner == Some(player))
            .count()
    }

    fn neighbours(&self, index: usize) -> Vec<usize> {
        let (x, y) = (index % self.width, index / self.width);
        let mut out = Vec::with_capacity(4);
        if x > 0 {
            out.push(index - 1);
        }
        if x + 1 < self.width {
            out.push(index + 1);
        }
        if y > 0 {
            out.push(index - self.width);
        }
        if y + 1 < self.height {
            out.push(index + self.width);
        }
        out
    }

    fn critical(&self, index: usize) -> u32 {
        self.neighbours(index).len() as u32
    }

    fn single_owner(&self, player: u8) -> bool {
        self.cells
            .iter()
            .all(|cell| cell.owner.is_none() || cell.owner == Some(player))
    }

    fn cascade(&mut self, player: u8, start: usize) -> Vec<Step> {
        let mut steps = vec![Step::Place {
            cell: start,
            player,
        }];
        self.cells[start].owner = Some(player);
        self.cells[start].level += 1;

        let mut pending = VecDeque::from([start]);
        // Bounded so a board swallowed by one player cannot loop forever
        let mut budget = self.cells.len() * 8;
        while let Some(index) = pending.pop_front() {
            let critical = self.critical(index);
            if critical == 0 || self.cells[index].level < critical {
                continue;
            }
            if budget == 0 || (self.single_owner(player) && self.moved.len() > 1) {
                break;
            }
            budget -= 1;
            self.cells[index].level -= critical;
            if self.cells[index].level == 0 {
                self.cells[index].owner = None;
            }
            steps.push(Step::Explode { cell: index });
            for neighbour in self.neighbours(index) {
                let cell = &mut self.cells[neighbour];
                cell.level += 1;
                if cell.owner != Some(player) {
                    cell.owner = Some(player);
                    steps.push(Step::Capture {
                        cell: neighbour,
                        player,
                    });
                }
                pending.push_back(neighbour);
            }
        }
        steps
    }
}

impl Board for Grid {
    type Move = usize;
    type Player = u8;
    type Transition = Step;

    fn legal_moves(&self, player: u8) -> Vec<usize> {
        if !self.is_alive(player) {
            return Vec::new();
        }
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.owner.is_none() || cell.owner == Some(player))
            .map(|(index, _)| index)
            .collect()
    }

    fn is_alive(&self, player: u8) -> bool {
        !self.moved.contains(&player) || self.owned_by(player) > 0
    }

    fn apply_move(&mut self, player: u8, mv: &usize) -> impl Iterator<Item = Step> {
        if !self.moved.contains(&player) {
            self.moved.push(player);
        }
        self.cascade(player, *mv).into_iter()
    }

    fn players(&self) -> Vec<u8> {
        self.players.clone()
    }
}

impl CellBoard for Grid {
    fn cells(&self) -> impl Iterator<Item = CellView<u8>> {
        self.cells.iter().map(|cell| CellView {
            owner: cell.owner,
            level: cell.level,
        })
    }
}
