/*
 * Lodestone, a UCI chess engine
 * Copyright (C) 2025 nlsn
 *
 * Lodestone is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * Lodestone is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with Lodestone. If not, see <https://www.gnu.org/licenses/>.
 */

use crate::core::{Color, PieceType, Square};
use crate::position::CastleRights;
use crate::rng;

const PIECE_SQUARE_SIZE: usize =
    Color::N_COLORS * PieceType::N_PIECE_TYPES * Square::N_SQUARES;
const CASTLING_SIZE: usize = 16;
const EN_PASSANT_SIZE: usize = Square::N_SQUARES;
const STM_SIZE: usize = 1;

const TOTAL_SIZE: usize = PIECE_SQUARE_SIZE + CASTLING_SIZE + EN_PASSANT_SIZE + STM_SIZE;

const PIECE_SQUARE_OFFSET: usize = 0;
const CASTLING_OFFSET: usize = PIECE_SQUARE_OFFSET + PIECE_SQUARE_SIZE;
const EN_PASSANT_OFFSET: usize = CASTLING_OFFSET + CASTLING_SIZE;
const STM_OFFSET: usize = EN_PASSANT_OFFSET + EN_PASSANT_SIZE;

#[allow(clippy::unreadable_literal)]
const KEYS: [u64; TOTAL_SIZE] = rng::fill_u64_array(0x3dd6ea8df208fc53);

#[must_use]
#[inline(always)]
pub fn piece_square(c: Color, kind: PieceType, sq: Square) -> u64 {
    debug_assert!(c != Color::NONE);
    debug_assert!(kind != PieceType::NONE);
    debug_assert!(sq != Square::NONE);

    KEYS[PIECE_SQUARE_OFFSET
        + (c.idx() * PieceType::N_PIECE_TYPES + kind.idx()) * Square::N_SQUARES
        + sq.idx()]
}

#[must_use]
#[inline(always)]
pub fn castling(rights: CastleRights) -> u64 {
    KEYS[CASTLING_OFFSET + rights.mask() as usize]
}

#[must_use]
#[inline(always)]
pub fn en_passant(sq: Square) -> u64 {
    if sq == Square::NONE {
        0
    } else {
        KEYS[EN_PASSANT_OFFSET + sq.idx()]
    }
}

#[must_use]
#[inline(always)]
pub fn stm() -> u64 {
    KEYS[STM_OFFSET]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_distinct_per_feature() {
        assert_ne!(
            piece_square(Color::WHITE, PieceType::PAWN, Square::E2),
            piece_square(Color::BLACK, PieceType::PAWN, Square::E2)
        );
        assert_ne!(
            piece_square(Color::WHITE, PieceType::PAWN, Square::E2),
            piece_square(Color::WHITE, PieceType::PAWN, Square::E4)
        );
        assert_ne!(castling(CastleRights::ALL), castling(CastleRights::NONE));
        assert_ne!(en_passant(Square::E3), en_passant(Square::D3));
        assert_ne!(stm(), 0);
    }

    #[test]
    fn absent_en_passant_contributes_nothing() {
        assert_eq!(en_passant(Square::NONE), 0);
    }
}
