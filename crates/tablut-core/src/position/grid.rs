//! 駒配置（Grid）
//!
//! 千日手判定は駒配置だけの値比較で行うため、`Grid` は `Eq + Hash` を持つ。

use std::fmt;
use std::str::FromStr;

use crate::board::{Cell, geometry};
use crate::error::ParseError;
use crate::types::{BOARD_SIZE, Coord, Direction, Piece};

/// 9×9 の駒配置
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Grid {
    cells: [[Piece; BOARD_SIZE]; BOARD_SIZE],
}

impl Grid {
    /// 空の盤
    pub const fn empty() -> Self {
        Grid {
            cells: [[Piece::Empty; BOARD_SIZE]; BOARD_SIZE],
        }
    }

    /// 初期配置
    pub fn initial() -> Self {
        let mut grid = Grid::empty();
        let last = BOARD_SIZE - 1;
        for i in 3..=5 {
            grid.set(Coord::new(0, i), Piece::Attacker);
            grid.set(Coord::new(i, 0), Piece::Attacker);
            grid.set(Coord::new(last, i), Piece::Attacker);
            grid.set(Coord::new(i, last), Piece::Attacker);
        }
        grid.set(Coord::new(1, 4), Piece::Attacker);
        grid.set(Coord::new(4, 1), Piece::Attacker);
        grid.set(Coord::new(last - 1, 4), Piece::Attacker);
        grid.set(Coord::new(4, last - 1), Piece::Attacker);

        for i in [2, 3, 5, 6] {
            grid.set(Coord::new(4, i), Piece::Defender);
            grid.set(Coord::new(i, 4), Piece::Defender);
        }
        grid.set(Coord::CENTER, Piece::King);
        grid
    }

    #[inline]
    pub fn get(&self, c: Coord) -> Piece {
        self.cells[c.row()][c.col()]
    }

    #[inline]
    pub fn set(&mut self, c: Coord, piece: Piece) {
        self.cells[c.row()][c.col()] = piece;
    }

    #[inline]
    pub fn is_occupied(&self, c: Coord) -> bool {
        !self.get(c).is_empty()
    }

    /// 駒のある升を列挙する（行優先）
    pub fn occupied(&self) -> impl Iterator<Item = (Coord, Piece)> + '_ {
        Coord::all().filter_map(|c| {
            let pc = self.get(c);
            (!pc.is_empty()).then_some((c, pc))
        })
    }

    /// 指定駒種の数
    pub fn count(&self, piece: Piece) -> usize {
        self.occupied().filter(|&(_, pc)| pc == piece).count()
    }

    /// 王の位置（走査）
    pub fn find_king(&self) -> Option<Coord> {
        self.occupied().find(|&(_, pc)| pc.is_king()).map(|(c, _)| c)
    }

    /// `from` から `dir` 方向に進んで最初に駒がある升
    pub fn first_occupied(&self, from: Coord, dir: Direction) -> Option<Coord> {
        let mut cur = from.step(dir, 1);
        while let Some(c) = cur {
            if self.is_occupied(c) {
                return Some(c);
            }
            cur = c.step(dir, 1);
        }
        None
    }
}

impl Default for Grid {
    fn default() -> Self {
        Grid::empty()
    }
}

/// 盤面文字列: `B` 攻め方, `W` 守り方, `K` 王, 空升は地形で `T`(城) `X`(陣地) `-`(その他)
impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let geo = geometry();
        for row in 0..BOARD_SIZE {
            for col in 0..BOARD_SIZE {
                let c = Coord::new(row, col);
                let ch = match self.get(c) {
                    Piece::Empty => match geo.cell(c) {
                        Cell::Citadel => 'T',
                        Cell::Camp => 'X',
                        Cell::Empty | Cell::Escape => '-',
                    },
                    pc => pc.to_char(),
                };
                write!(f, "{ch}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        fmt::Display::fmt(self, f)
    }
}

impl FromStr for Grid {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rows: Vec<&str> = s.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
        if rows.len() != BOARD_SIZE {
            return Err(ParseError::RowCount(rows.len()));
        }
        let mut grid = Grid::empty();
        for (row, line) in rows.iter().enumerate() {
            let chars: Vec<char> = line.chars().filter(|ch| !ch.is_whitespace()).collect();
            if chars.len() != BOARD_SIZE {
                return Err(ParseError::RowLength {
                    row,
                    len: chars.len(),
                });
            }
            for (col, &ch) in chars.iter().enumerate() {
                let piece = match ch.to_ascii_uppercase() {
                    'B' => Piece::Attacker,
                    'W' => Piece::Defender,
                    'K' => Piece::King,
                    '-' | '.' | 'T' | 'X' | 'E' => Piece::Empty,
                    _ => return Err(ParseError::UnknownCell { row, col, ch }),
                };
                grid.set(Coord::new(row, col), piece);
            }
        }
        Ok(grid)
    }
}
