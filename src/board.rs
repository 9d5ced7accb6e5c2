//! Board: settled cells, collision, merge and row sweep.

use std::collections::VecDeque;

use crate::piece::Matrix;

/// Default playfield width in cells.
pub const DEFAULT_WIDTH: u16 = 12;
/// Default playfield height in cells.
pub const DEFAULT_HEIGHT: u16 = 20;

/// Points for the first row of a sweep; doubles for each further row in the same sweep.
const ROW_POINTS: u32 = 10;

/// Top-left offset of a piece matrix in board coordinates. y grows downwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Outcome of a single sweep call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SweepResult {
    pub rows_cleared: u32,
    pub points: u32,
}

/// Settled cells. 0 is empty, 1..=7 is a colour index. rows[0] is the top row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    width: usize,
    height: usize,
    rows: VecDeque<Vec<u8>>,
}

impl Board {
    pub fn new(width: u16, height: u16) -> Self {
        let (w, h) = (width as usize, height as usize);
        assert!(w > 0 && h > 0, "board dimensions must be non-zero ({w}x{h})");
        let rows = (0..h).map(|_| vec![0; w]).collect();
        Self {
            width: w,
            height: h,
            rows,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        self.rows.iter().map(Vec::as_slice)
    }

    /// Cell value, or `None` when (x, y) is off the board.
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> Option<u8> {
        let x = usize::try_from(x).ok()?;
        let y = usize::try_from(y).ok()?;
        self.rows.get(y).and_then(|row| row.get(x)).copied()
    }

    #[cfg(test)]
    pub fn set(&mut self, x: usize, y: usize, value: u8) {
        self.rows[y][x] = value;
    }

    #[cfg(test)]
    pub fn fill_row(&mut self, y: usize, value: u8) {
        self.rows[y].fill(value);
    }

    /// True if any filled cell of `matrix` at `pos` overlaps a settled cell or leaves the board.
    pub fn collide(&self, matrix: &Matrix, pos: Position) -> bool {
        for (y, row) in matrix.iter().enumerate() {
            for (x, &value) in row.iter().enumerate() {
                if value == 0 {
                    continue;
                }
                let bx = pos.x + x as i32;
                let by = pos.y + y as i32;
                // Off-board lookups count as occupied.
                if self.get(bx, by).is_none_or(|cell| cell != 0) {
                    return true;
                }
            }
        }
        false
    }

    /// Write the filled cells of `matrix` at `pos` into the board.
    /// The caller guarantees the piece does not collide there.
    pub fn merge(&mut self, matrix: &Matrix, pos: Position) {
        for (y, row) in matrix.iter().enumerate() {
            for (x, &value) in row.iter().enumerate() {
                if value != 0 {
                    let bx = usize::try_from(pos.x + x as i32).expect("merge outside board");
                    let by = usize::try_from(pos.y + y as i32).expect("merge outside board");
                    self.rows[by][bx] = value;
                }
            }
        }
    }

    /// Remove full rows bottom-up and return how many went and what they scored.
    ///
    /// Row 0 is never inspected. After a removal the same index is checked again,
    /// since the rows above have shifted into it.
    pub fn sweep(&mut self) -> SweepResult {
        let mut result = SweepResult::default();
        let mut multiplier = 1;
        let mut y = self.height - 1;
        while y > 0 {
            if self.rows[y].iter().all(|&cell| cell != 0) {
                let mut row = self.rows.remove(y).expect("row in range");
                row.fill(0);
                self.rows.push_front(row);
                result.rows_cleared += 1;
                result.points += multiplier * ROW_POINTS;
                multiplier *= 2;
            } else {
                y -= 1;
            }
        }
        result
    }

    /// Wipe every cell to empty, keeping the dimensions.
    pub fn clear(&mut self) {
        for row in &mut self.rows {
            row.fill(0);
        }
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.rows.iter().all(|row| row.iter().all(|&cell| cell == 0))
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new(DEFAULT_WIDTH, DEFAULT_HEIGHT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::PieceKind;
    use proptest::prelude::*;

    #[test]
    fn test_new_board_is_empty() {
        let board = Board::default();
        assert_eq!(board.width(), 12);
        assert_eq!(board.height(), 20);
        assert_eq!(board.rows().count(), 20);
        assert!(board.rows().all(|row| row.len() == 12));
        assert!(board.is_empty());
    }

    #[test]
    fn test_get_out_of_bounds() {
        let board = Board::default();
        assert_eq!(board.get(0, 0), Some(0));
        assert_eq!(board.get(-1, 0), None);
        assert_eq!(board.get(0, -1), None);
        assert_eq!(board.get(12, 0), None);
        assert_eq!(board.get(0, 20), None);
    }

    #[test]
    fn test_collide_against_settled_cell() {
        let mut board = Board::default();
        let o = PieceKind::O.matrix();
        assert!(!board.collide(&o, Position::new(5, 10)));
        board.set(6, 11, 3);
        assert!(board.collide(&o, Position::new(5, 10)));
        assert!(!board.collide(&o, Position::new(7, 10)));
    }

    #[test]
    fn test_collide_ignores_empty_cells_outside() {
        // The T matrix has an empty top row, so it may hang above the board.
        let board = Board::default();
        let t = PieceKind::T.matrix();
        assert!(!board.collide(&t, Position::new(0, -1)));
        assert!(board.collide(&t, Position::new(0, -2)));
    }

    #[test]
    fn test_o_piece_locks_on_floor() {
        let board = Board::default();
        let o = PieceKind::O.matrix();
        assert!(!board.collide(&o, Position::new(5, 18)));
        assert!(board.collide(&o, Position::new(5, 19)));
    }

    #[test]
    fn test_merge_writes_filled_cells_only() {
        let mut board = Board::default();
        let t = PieceKind::T.matrix();
        board.merge(&t, Position::new(2, 3));
        assert_eq!(board.get(2, 3), Some(0));
        assert_eq!(board.get(2, 4), Some(1));
        assert_eq!(board.get(3, 4), Some(1));
        assert_eq!(board.get(4, 4), Some(1));
        assert_eq!(board.get(3, 5), Some(1));
        assert_eq!(board.get(2, 5), Some(0));
        assert!(board.collide(&t, Position::new(2, 3)));
    }

    #[test]
    fn test_sweep_without_full_rows_changes_nothing() {
        let mut board = Board::default();
        board.set(0, 19, 2);
        board.set(5, 12, 4);
        let before = board.clone();
        assert_eq!(board.sweep(), SweepResult::default());
        assert_eq!(board, before);
    }

    #[test]
    fn test_sweep_single_row() {
        let mut board = Board::default();
        board.fill_row(19, 5);
        board.set(3, 18, 7);
        let result = board.sweep();
        assert_eq!(result.rows_cleared, 1);
        assert_eq!(result.points, 10);
        assert_eq!(board.get(3, 19), Some(7));
        assert_eq!(board.get(3, 18), Some(0));
        assert!(board.rows().next().is_some_and(|row| row.iter().all(|&c| c == 0)));
        assert_eq!(board.rows().count(), 20);
    }

    #[test]
    fn test_sweep_doubles_within_call_and_resets_between_calls() {
        let mut board = Board::default();
        board.fill_row(19, 1);
        board.fill_row(17, 2);
        board.set(0, 18, 6);
        let result = board.sweep();
        assert_eq!(result.rows_cleared, 2);
        assert_eq!(result.points, 30);
        assert_eq!(board.get(0, 19), Some(6));

        board.fill_row(10, 3);
        let result = board.sweep();
        assert_eq!(result.rows_cleared, 1);
        assert_eq!(result.points, 10);
    }

    #[test]
    fn test_sweep_rechecks_same_index_after_shift() {
        let mut board = Board::default();
        board.fill_row(19, 1);
        board.fill_row(18, 1);
        board.fill_row(17, 1);
        let result = board.sweep();
        assert_eq!(result.rows_cleared, 3);
        assert_eq!(result.points, 10 + 20 + 40);
        assert!(board.is_empty());
    }

    #[test]
    fn test_sweep_never_inspects_top_row() {
        let mut board = Board::default();
        board.fill_row(0, 4);
        assert_eq!(board.sweep(), SweepResult::default());
        assert_eq!(board.get(11, 0), Some(4));
    }

    #[test]
    fn test_sweep_keeps_shape_when_every_lower_row_is_full() {
        let mut board = Board::new(4, 4);
        for y in 0..4 {
            board.fill_row(y, 2);
        }
        let result = board.sweep();
        // The top row shifts down into index 3 and is cleared there too.
        assert_eq!(result.rows_cleared, 4);
        assert_eq!(result.points, 10 + 20 + 40 + 80);
        assert_eq!(board.rows().count(), 4);
        assert!(board.rows().all(|row| row.len() == 4));
        assert!(board.is_empty());
    }

    #[test]
    fn test_clear_wipes_cells() {
        let mut board = Board::default();
        board.fill_row(0, 1);
        board.fill_row(1, 2);
        board.clear();
        assert!(board.is_empty());
        assert_eq!(board.height(), 20);
    }

    proptest! {
        #[test]
        fn prop_collide_when_any_cell_off_board(
            kind_index in 0usize..7,
            x in -6i32..16,
            y in -6i32..24,
        ) {
            let board = Board::default();
            let matrix = PieceKind::ALL[kind_index].matrix();
            let off_board = matrix.iter().enumerate().any(|(dy, row)| {
                row.iter().enumerate().any(|(dx, &v)| {
                    v != 0 && board.get(x + dx as i32, y + dy as i32).is_none()
                })
            });
            if off_board {
                prop_assert!(board.collide(&matrix, Position::new(x, y)));
            } else {
                prop_assert!(!board.collide(&matrix, Position::new(x, y)));
            }
        }
    }
}
