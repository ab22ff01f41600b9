//! 駒（Piece）と陣営（Side）

use serde::{Deserialize, Serialize};

/// 陣営
///
/// 攻め方（Attacker, 黒16枚）と守り方（Defender, 白8枚＋王）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Side {
    Attacker = 0,
    Defender = 1,
}

impl Side {
    /// 陣営の数
    pub const NUM: usize = 2;

    /// 相手陣営を返す
    #[inline]
    pub const fn opponent(self) -> Side {
        match self {
            Side::Attacker => Side::Defender,
            Side::Defender => Side::Attacker,
        }
    }

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn label(self) -> &'static str {
        match self {
            Side::Attacker => "attacker",
            Side::Defender => "defender",
        }
    }
}

impl std::ops::Not for Side {
    type Output = Side;

    #[inline]
    fn not(self) -> Side {
        self.opponent()
    }
}

/// 升に置かれる駒
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum Piece {
    #[default]
    Empty = 0,
    Attacker = 1,
    Defender = 2,
    King = 3,
}

impl Piece {
    /// 駒の属する陣営（王は守り方）
    #[inline]
    pub const fn side(self) -> Option<Side> {
        match self {
            Piece::Empty => None,
            Piece::Attacker => Some(Side::Attacker),
            Piece::Defender | Piece::King => Some(Side::Defender),
        }
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        matches!(self, Piece::Empty)
    }

    #[inline]
    pub const fn is_king(self) -> bool {
        matches!(self, Piece::King)
    }

    /// `other` が自分から見て敵駒か
    #[inline]
    pub fn is_enemy_of(self, other: Piece) -> bool {
        match (self.side(), other.side()) {
            (Some(a), Some(b)) => a != b,
            _ => false,
        }
    }

    /// 盤面文字列での表記
    pub const fn to_char(self) -> char {
        match self {
            Piece::Empty => '-',
            Piece::Attacker => 'B',
            Piece::Defender => 'W',
            Piece::King => 'K',
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_opponent() {
        assert_eq!(Side::Attacker.opponent(), Side::Defender);
        assert_eq!(!Side::Defender, Side::Attacker);
    }

    #[test]
    fn test_king_is_defender() {
        assert_eq!(Piece::King.side(), Some(Side::Defender));
        assert!(!Piece::King.is_enemy_of(Piece::Defender));
        assert!(Piece::King.is_enemy_of(Piece::Attacker));
        assert!(Piece::Attacker.is_enemy_of(Piece::King));
    }

    #[test]
    fn test_empty_is_nobodys_enemy() {
        assert!(!Piece::Empty.is_enemy_of(Piece::Attacker));
        assert!(!Piece::Attacker.is_enemy_of(Piece::Empty));
        assert_eq!(Piece::Empty.side(), None);
    }
}
