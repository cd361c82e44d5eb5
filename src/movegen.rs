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

//! Pseudo-legal move generation followed by a play-and-test legality
//! filter. Promotions are generated to queens only.

use crate::attacks;
use crate::bitboard::Bitboard;
use crate::chess_move::Move;
use crate::core::{Color, PieceType, Square};
use crate::position::{CastleRights, Position};
use arrayvec::ArrayVec;

pub type MoveList = ArrayVec<Move, 256>;

fn serialize(moves: &mut MoveList, pos: &Position, src: Square, piece: PieceType, dsts: Bitboard) {
    for dst in dsts {
        let victim = pos.piece_type_at(dst);

        moves.push(if victim == PieceType::NONE {
            Move::normal(src, dst, piece)
        } else {
            Move::capture(src, dst, piece, victim)
        });
    }
}

fn generate_pawn_moves(moves: &mut MoveList, pos: &Position, captures_only: bool) {
    let stm = pos.side_to_move();

    let occ = pos.occupancy();
    let them = pos.color_occupancy(stm.flip());

    let push_offset: i32 = if stm == Color::WHITE { 8 } else { -8 };
    let start_rank = if stm == Color::WHITE { 1 } else { 6 };
    let promo_rank = if stm == Color::WHITE { 7 } else { 0 };

    for src in pos.pieces(stm, PieceType::PAWN) {
        if !captures_only {
            let dst_raw = i32::from(src.raw()) + push_offset;

            if (0..64).contains(&dst_raw) {
                let dst = Square::from_raw(dst_raw as u8);

                if !occ.get(dst) {
                    if dst.rank() == promo_rank {
                        moves.push(Move::promotion(src, dst, PieceType::NONE));
                    } else {
                        moves.push(Move::normal(src, dst, PieceType::PAWN));

                        if src.rank() == start_rank {
                            let dst2 = Square::from_raw((dst_raw + push_offset) as u8);

                            if !occ.get(dst2) {
                                moves.push(Move::normal(src, dst2, PieceType::PAWN));
                            }
                        }
                    }
                }
            }
        }

        for dst in attacks::pawn_attacks(stm, src) {
            if them.get(dst) {
                let victim = pos.piece_type_at(dst);

                if dst.rank() == promo_rank {
                    moves.push(Move::promotion(src, dst, victim));
                } else {
                    moves.push(Move::capture(src, dst, PieceType::PAWN, victim));
                }
            } else if !captures_only && dst == pos.en_passant() {
                moves.push(Move::en_passant(src, dst));
            }
        }
    }
}

fn generate_knight_moves(moves: &mut MoveList, pos: &Position, dst_mask: Bitboard) {
    let stm = pos.side_to_move();

    for src in pos.pieces(stm, PieceType::KNIGHT) {
        serialize(
            moves,
            pos,
            src,
            PieceType::KNIGHT,
            attacks::knight_attacks(src) & dst_mask,
        );
    }
}

fn generate_slider_moves(moves: &mut MoveList, pos: &Position, dst_mask: Bitboard) {
    let stm = pos.side_to_move();
    let occ = pos.occupancy();

    for src in pos.pieces(stm, PieceType::BISHOP) {
        serialize(
            moves,
            pos,
            src,
            PieceType::BISHOP,
            attacks::bishop_attacks(src, occ) & dst_mask,
        );
    }

    for src in pos.pieces(stm, PieceType::ROOK) {
        serialize(
            moves,
            pos,
            src,
            PieceType::ROOK,
            attacks::rook_attacks(src, occ) & dst_mask,
        );
    }

    for src in pos.pieces(stm, PieceType::QUEEN) {
        serialize(
            moves,
            pos,
            src,
            PieceType::QUEEN,
            attacks::queen_attacks(src, occ) & dst_mask,
        );
    }
}

fn generate_king_moves(moves: &mut MoveList, pos: &Position, dst_mask: Bitboard) {
    let stm = pos.side_to_move();

    for src in pos.pieces(stm, PieceType::KING) {
        serialize(
            moves,
            pos,
            src,
            PieceType::KING,
            attacks::king_attacks(src) & dst_mask,
        );
    }
}

fn generate_castling(moves: &mut MoveList, pos: &Position) {
    if pos.in_check() {
        return;
    }

    let stm = pos.side_to_move();
    let opp = stm.flip();
    let occ = pos.occupancy();

    let variants = if stm == Color::WHITE {
        [
            (
                CastleRights::WHITE_SHORT,
                Square::E1,
                Square::G1,
                Square::F1.bit() | Square::G1.bit(),
                [Square::F1, Square::G1],
            ),
            (
                CastleRights::WHITE_LONG,
                Square::E1,
                Square::C1,
                Square::B1.bit() | Square::C1.bit() | Square::D1.bit(),
                [Square::D1, Square::C1],
            ),
        ]
    } else {
        [
            (
                CastleRights::BLACK_SHORT,
                Square::E8,
                Square::G8,
                Square::F8.bit() | Square::G8.bit(),
                [Square::F8, Square::G8],
            ),
            (
                CastleRights::BLACK_LONG,
                Square::E8,
                Square::C8,
                Square::B8.bit() | Square::C8.bit() | Square::D8.bit(),
                [Square::D8, Square::C8],
            ),
        ]
    };

    for (right, src, dst, between, crossed) in variants {
        if pos.castling().contains(right)
            && (occ & between).is_empty()
            && !pos.is_attacked(crossed[0], opp)
            && !pos.is_attacked(crossed[1], opp)
        {
            moves.push(Move::normal(src, dst, PieceType::KING));
        }
    }
}

/// Generate the legal moves of the side to move. With `captures_only`
/// the generator is restricted to captures of pieces standing on their
/// target squares, which is what quiescence wants.
#[must_use]
pub fn generate(pos: &Position, captures_only: bool) -> MoveList {
    let mut moves = MoveList::new();

    let dst_mask = if captures_only {
        pos.color_occupancy(pos.side_to_move().flip())
    } else {
        !pos.color_occupancy(pos.side_to_move())
    };

    generate_pawn_moves(&mut moves, pos, captures_only);
    generate_knight_moves(&mut moves, pos, dst_mask);
    generate_slider_moves(&mut moves, pos, dst_mask);
    generate_king_moves(&mut moves, pos, dst_mask);

    if !captures_only {
        generate_castling(&mut moves, pos);
    }

    moves.retain(|mv| pos.is_legal(*mv));

    moves
}
