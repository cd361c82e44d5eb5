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

//! Static evaluation in integer centipawns, from the side to move's
//! point of view.

use crate::bitboard::Bitboard;
use crate::core::{Color, PieceType, Square};
use crate::position::Position;

pub const VALUES: [i32; PieceType::N_PIECE_TYPES] = [100, 320, 330, 500, 900, 0];

const CENTER: Bitboard = Bitboard::from_raw(0x0000_0018_1800_0000);

const CASTLED_KING_BONUS: i32 = 40;
const UNCASTLED_KING_PENALTY: i32 = 20;
const CENTER_PAWN_BONUS: i32 = 20;
const PAWN_ADVANCE_BONUS: i32 = 15;

#[must_use]
pub fn evaluate(pos: &Position) -> i32 {
    let mut eval = 0;

    for kind in PieceType::all() {
        let white = pos.pieces(Color::WHITE, kind).popcount() as i32;
        let black = pos.pieces(Color::BLACK, kind).popcount() as i32;
        eval += (white - black) * VALUES[kind.idx()];
    }

    // reward a king tucked away on its castling square, nudge one still
    // in the middle; a side without a king scores neither term
    let white_king = pos.king_square(Color::WHITE);
    if white_king == Square::G1 || white_king == Square::C1 {
        eval += CASTLED_KING_BONUS;
    } else if white_king == Square::E1 {
        eval -= UNCASTLED_KING_PENALTY;
    }

    let black_king = pos.king_square(Color::BLACK);
    if black_king == Square::G8 || black_king == Square::C8 {
        eval -= CASTLED_KING_BONUS;
    } else if black_king == Square::E8 {
        eval += UNCASTLED_KING_PENALTY;
    }

    let white_pawns = pos.pieces(Color::WHITE, PieceType::PAWN);
    let black_pawns = pos.pieces(Color::BLACK, PieceType::PAWN);

    eval += ((white_pawns & CENTER).popcount() as i32 - (black_pawns & CENTER).popcount() as i32)
        * CENTER_PAWN_BONUS;

    // rank bonus only; this does not check for opposing pawns
    for sq in white_pawns {
        let rank = sq.rank() as i32;
        if rank >= 4 {
            eval += (rank - 3) * PAWN_ADVANCE_BONUS;
        }
    }

    for sq in black_pawns {
        let rank = sq.rank() as i32;
        if rank <= 3 {
            eval -= (4 - rank) * PAWN_ADVANCE_BONUS;
        }
    }

    if pos.side_to_move() == Color::WHITE {
        eval
    } else {
        -eval
    }
}
