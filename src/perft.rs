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

use crate::movegen::generate;
use crate::position::Position;
use std::time::Instant;

#[must_use]
pub fn count(pos: &Position, depth: i32) -> usize {
    if depth <= 0 {
        return 1;
    }

    let moves = generate(pos, false);

    if depth == 1 {
        return moves.len();
    }

    let mut total = 0usize;

    for &mv in &moves {
        let mut child = pos.clone();
        child.apply_move(mv);
        total += count(&child, depth - 1);
    }

    total
}

pub fn perft(pos: &Position, depth: i32) {
    println!("{}", count(pos, depth));
}

pub fn split_perft(pos: &Position, depth: i32) {
    let start = Instant::now();

    let mut total = 0usize;

    for &mv in &generate(pos, false) {
        let mut child = pos.clone();
        child.apply_move(mv);

        let value = count(&child, depth - 1);
        total += value;

        println!("{}\t{}", mv, value);
    }

    let time = start.elapsed().as_secs_f64();
    let nps = (total as f64 / time) as usize;

    println!();
    println!("total {}", total);
    println!("{} nps", nps);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn startpos_shallow_counts() {
        let pos = Position::startpos();
        assert_eq!(count(&pos, 1), 20);
        assert_eq!(count(&pos, 2), 400);
        assert_eq!(count(&pos, 3), 8_902);
    }

    #[test]
    fn startpos_depth_four() {
        let pos = Position::startpos();
        assert_eq!(count(&pos, 4), 197_281);
    }

    // expensive at depth 5; promotion-free from the start position, so
    // queen-only promotion generation does not affect the count
    #[test]
    #[ignore]
    fn startpos_depth_five() {
        let pos = Position::startpos();
        assert_eq!(count(&pos, 5), 4_865_609);
    }

    #[test]
    fn kiwipete_shallow_counts() {
        let pos = Position::from_fen(
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        )
        .expect("FEN should parse");

        assert_eq!(count(&pos, 1), 48);
        assert_eq!(count(&pos, 2), 2_039);
    }

    #[test]
    fn rook_endgame_counts() {
        let pos =
            Position::from_fen("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1").expect("FEN should parse");

        assert_eq!(count(&pos, 1), 14);
        assert_eq!(count(&pos, 2), 191);
        assert_eq!(count(&pos, 3), 2_812);
    }
}
