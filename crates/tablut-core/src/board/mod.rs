//! 盤の地形（BoardGeometry）
//!
//! 各升を Empty / Escape / Camp / Citadel に分類する不変テーブル。
//! `const fn` で一度だけ構築され、全局面から `&'static` で共有される。

use crate::types::{BOARD_SIZE, Coord};

/// 升の地形
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Cell {
    /// 通常升
    Empty = 0,
    /// 脱出升（王が到達すると守り方の勝ち）
    Escape = 1,
    /// 陣地（攻め方のみ、陣地から陣地へ移動できる）
    Camp = 2,
    /// 城（誰も進入できない）
    Citadel = 3,
}

/// 陣地の門（辺の中央の陣地升）。取りの壁として扱わない。
pub const GATES: [Coord; 4] = [
    Coord::new(0, 4),
    Coord::new(4, 0),
    Coord::new(BOARD_SIZE - 1, 4),
    Coord::new(4, BOARD_SIZE - 1),
];

/// 盤の地形テーブル
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardGeometry {
    cells: [[Cell; BOARD_SIZE]; BOARD_SIZE],
}

static GEOMETRY: BoardGeometry = BoardGeometry::tablut();

/// 共有の地形テーブルを返す
#[inline]
pub fn geometry() -> &'static BoardGeometry {
    &GEOMETRY
}

impl BoardGeometry {
    /// 9×9 Tablut（Ashton ルール）の地形
    pub const fn tablut() -> Self {
        let mut cells = [[Cell::Empty; BOARD_SIZE]; BOARD_SIZE];
        let last = BOARD_SIZE - 1;
        let mut i = 1;
        while i < last {
            let kind = if i < 3 || i > 5 {
                Cell::Escape
            } else {
                Cell::Camp
            };
            cells[0][i] = kind;
            cells[i][0] = kind;
            cells[last][i] = kind;
            cells[i][last] = kind;
            i += 1;
        }
        cells[1][4] = Cell::Camp;
        cells[4][1] = Cell::Camp;
        cells[last - 1][4] = Cell::Camp;
        cells[4][last - 1] = Cell::Camp;
        cells[4][4] = Cell::Citadel;
        BoardGeometry { cells }
    }

    #[inline]
    pub fn cell(&self, c: Coord) -> Cell {
        self.cells[c.row()][c.col()]
    }

    #[inline]
    pub fn is(&self, c: Coord, kind: Cell) -> bool {
        self.cell(c) == kind
    }

    #[inline]
    pub fn is_gate(&self, c: Coord) -> bool {
        GATES.contains(&c)
    }

    /// 地形そのものが取りの壁になるか（城、または門以外の陣地）
    #[inline]
    pub fn is_board_blocker(&self, c: Coord) -> bool {
        match self.cell(c) {
            Cell::Citadel => true,
            Cell::Camp => !self.is_gate(c),
            Cell::Empty | Cell::Escape => false,
        }
    }

    /// 城、または城に直交で隣接する升か
    pub fn is_at_or_next_to_citadel(&self, c: Coord) -> bool {
        self.is(c, Cell::Citadel) || c.neighbors().any(|n| self.is(n, Cell::Citadel))
    }
}
