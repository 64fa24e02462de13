use std::fmt;

/// Tile coordinate on the playfield. Signed so that positions one step past
/// the border can still be expressed and rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub col: i32,
    pub row: i32,
}

impl Position {
    pub const fn new(col: i32, row: i32) -> Self {
        Position { col, row }
    }

    /// Grid distance with orthogonal moves only.
    pub fn manhattan(&self, other: Position) -> u32 {
        self.col.abs_diff(other.col) + self.row.abs_diff(other.row)
    }

    pub fn offset(&self, dcol: i32, drow: i32) -> Position {
        Position {
            col: self.col + dcol,
            row: self.row + drow,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.col, self.row)
    }
}

/// A tile coordinate paired with the tick offset at which it is occupied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimedPosition {
    pub col: i32,
    pub row: i32,
    pub time: u32,
}

impl TimedPosition {
    pub const fn new(col: i32, row: i32, time: u32) -> Self {
        TimedPosition { col, row, time }
    }

    pub fn at(position: Position, time: u32) -> Self {
        TimedPosition {
            col: position.col,
            row: position.row,
            time,
        }
    }

    /// Drops the time component.
    pub fn position(&self) -> Position {
        Position::new(self.col, self.row)
    }
}

impl fmt::Display for TimedPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, t={})", self.col, self.row, self.time)
    }
}

/// Up, down, left, right. The order is part of the search tie-breaking.
pub const ORTHOGONAL_MOVES: [(i32, i32); 4] = [(0, -1), (0, 1), (-1, 0), (1, 0)];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Safe,
    Blocked,
}

/// Boolean occupancy map for one time slice, indexed `[row][col]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OccupancyGrid {
    pub width: usize,
    pub height: usize,
    pub cells: Vec<Vec<Cell>>,
}

impl OccupancyGrid {
    pub fn new(width: usize, height: usize) -> Self {
        OccupancyGrid {
            width,
            height,
            cells: vec![vec![Cell::Safe; width]; height],
        }
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.col >= 0
            && pos.row >= 0
            && (pos.col as usize) < self.width
            && (pos.row as usize) < self.height
    }

    /// Out-of-bounds cells read as blocked.
    pub fn is_blocked(&self, pos: Position) -> bool {
        if !self.contains(pos) {
            return true;
        }
        self.cells[pos.row as usize][pos.col as usize] == Cell::Blocked
    }

    /// Writes `cell` at `pos`; positions outside the grid are ignored.
    pub fn set(&mut self, pos: Position, cell: Cell) {
        if self.contains(pos) {
            self.cells[pos.row as usize][pos.col as usize] = cell;
        }
    }

    pub fn fill_row(&mut self, row: usize, cell: Cell) {
        if let Some(cells) = self.cells.get_mut(row) {
            cells.fill(cell);
        }
    }

    pub fn blocked_count(&self) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|cell| **cell == Cell::Blocked)
            .count()
    }

    /// Cell-wise OR: a cell is blocked when either grid blocks it.
    pub fn union(&self, other: &OccupancyGrid) -> OccupancyGrid {
        debug_assert_eq!(
            (self.width, self.height),
            (other.width, other.height),
            "merged grids must share dimensions"
        );
        let cells = self
            .cells
            .iter()
            .zip(&other.cells)
            .map(|(a, b)| {
                a.iter()
                    .zip(b)
                    .map(|(x, y)| {
                        if *x == Cell::Blocked || *y == Cell::Blocked {
                            Cell::Blocked
                        } else {
                            Cell::Safe
                        }
                    })
                    .collect()
            })
            .collect();

        OccupancyGrid {
            width: self.width.min(other.width),
            height: self.height.min(other.height),
            cells,
        }
    }

    /// Safe in-bounds neighbours in up, down, left, right order.
    pub fn get_neighbors(&self, pos: &Position) -> Vec<Position> {
        ORTHOGONAL_MOVES
            .iter()
            .map(|(dcol, drow)| pos.offset(*dcol, *drow))
            .filter(|next| !self.is_blocked(*next))
            .collect()
    }

    /// Print a visual representation of the grid
    pub fn print_grid(&self, agent: Option<Position>, goals: &[Position]) {
        println!("Legend: A=Agent, G=Goal, #=Unsafe, .=Safe");

        print!("   ");
        for col in 0..self.width {
            print!("{:2}", col % 10);
        }
        println!();

        for row in 0..self.height {
            print!("{:2} ", row);
            for col in 0..self.width {
                let pos = Position::new(col as i32, row as i32);
                let symbol = if Some(pos) == agent {
                    'A'
                } else if goals.contains(&pos) {
                    'G'
                } else {
                    match self.cells[row][col] {
                        Cell::Blocked => '#',
                        Cell::Safe => '.',
                    }
                };
                print!("{} ", symbol);
            }
            println!();
        }
        println!();
    }
}
