//! 升目（Coord）と方向（Direction）

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// 盤の一辺の長さ
pub const BOARD_SIZE: usize = 9;

/// 升目（行, 列）
///
/// 行 0 が盤の上端、列 0 が左端。文字列表記は列を `a`..`i`、行を `1`..`9` で表す
/// （`e5` が中央の城）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    row: u8,
    col: u8,
}

impl Coord {
    /// 升目の数
    pub const NUM: usize = BOARD_SIZE * BOARD_SIZE;

    /// 中央（城）
    pub const CENTER: Coord = Coord { row: 4, col: 4 };

    /// 行と列から生成する。範囲外は契約違反として panic する。
    #[inline]
    pub const fn new(row: usize, col: usize) -> Coord {
        assert!(row < BOARD_SIZE && col < BOARD_SIZE, "coordinate out of range");
        Coord {
            row: row as u8,
            col: col as u8,
        }
    }

    /// 範囲チェック付きで生成
    #[inline]
    pub const fn try_new(row: i32, col: i32) -> Option<Coord> {
        if row >= 0 && col >= 0 && (row as usize) < BOARD_SIZE && (col as usize) < BOARD_SIZE {
            Some(Coord {
                row: row as u8,
                col: col as u8,
            })
        } else {
            None
        }
    }

    #[inline]
    pub const fn row(self) -> usize {
        self.row as usize
    }

    #[inline]
    pub const fn col(self) -> usize {
        self.col as usize
    }

    /// インデックスとして使用（配列アクセス用）
    #[inline]
    pub const fn index(self) -> usize {
        self.row as usize * BOARD_SIZE + self.col as usize
    }

    /// インデックスから生成
    #[inline]
    pub const fn from_index(index: usize) -> Coord {
        Coord::new(index / BOARD_SIZE, index % BOARD_SIZE)
    }

    /// 行・列方向に (dr, dc) ずらした升。盤外なら None。
    #[inline]
    pub const fn offset(self, dr: i32, dc: i32) -> Option<Coord> {
        Coord::try_new(self.row as i32 + dr, self.col as i32 + dc)
    }

    /// 指定方向に `steps` 升進んだ升
    #[inline]
    pub const fn step(self, dir: Direction, steps: i32) -> Option<Coord> {
        let (dr, dc) = dir.delta();
        self.offset(dr * steps, dc * steps)
    }

    /// `self` から `to` へ向かう方向（同一直線上でなければ None）
    pub fn direction_to(self, to: Coord) -> Option<Direction> {
        if self == to {
            return None;
        }
        if self.row == to.row {
            Some(if to.col > self.col {
                Direction::Right
            } else {
                Direction::Left
            })
        } else if self.col == to.col {
            Some(if to.row > self.row {
                Direction::Down
            } else {
                Direction::Up
            })
        } else {
            None
        }
    }

    /// 直交4近傍（盤内のもののみ）
    pub fn neighbors(self) -> impl Iterator<Item = Coord> {
        Direction::ALL.into_iter().filter_map(move |d| self.step(d, 1))
    }

    /// 全ての升を返すイテレータ（行優先）
    pub fn all() -> impl Iterator<Item = Coord> {
        (0..Coord::NUM).map(Coord::from_index)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let file = (b'a' + self.col) as char;
        write!(f, "{file}{}", self.row + 1)
    }
}

impl FromStr for Coord {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.trim().as_bytes();
        let invalid = || ParseError::InvalidCoord(s.to_string());
        if bytes.len() != 2 {
            return Err(invalid());
        }
        let col = bytes[0].to_ascii_lowercase().wrapping_sub(b'a') as i32;
        let row = bytes[1].wrapping_sub(b'1') as i32;
        Coord::try_new(row, col).ok_or_else(invalid)
    }
}

/// 直交4方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Direction {
    Up = 0,
    Right = 1,
    Down = 2,
    Left = 3,
}

impl Direction {
    /// 方向の数
    pub const NUM: usize = 4;

    /// 全方向（インデックス順）
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// (行, 列) の増分
    #[inline]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Right => (0, 1),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
        }
    }

    /// 逆方向
    #[inline]
    pub const fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Right => Direction::Left,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
        }
    }

    /// 直交する2方向
    #[inline]
    pub const fn perpendicular(self) -> [Direction; 2] {
        match self {
            Direction::Up | Direction::Down => [Direction::Right, Direction::Left],
            Direction::Right | Direction::Left => [Direction::Up, Direction::Down],
        }
    }
}
