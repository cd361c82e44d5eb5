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

//! Principal variation search under iterative deepening with aspiration
//! windows. Every recursion level searches its own copy of the
//! position.

use crate::chess_move::Move;
use crate::core::PieceType;
use crate::eval;
use crate::limit::SearchLimiter;
use crate::movegen::generate;
use crate::ordering::{self, HistoryTable, KillerTable};
use crate::position::Position;
use crate::tt::{Bound, TranspositionTable};
use std::time::Instant;

pub const INF: i32 = 999_999;
pub const MATE: i32 = 100_000;

const MAX_QDEPTH: i32 = 6;

const ASPIRATION_WINDOW: i32 = 50;
const NARROWED_WINDOW: i32 = 25;

#[derive(Debug, Default, Copy, Clone)]
pub struct SearchStats {
    pub nodes: u64,
    pub qnodes: u64,
}

pub struct Searcher {
    tt: TranspositionTable,
    killers: KillerTable,
    history: HistoryTable,
    stats: SearchStats,
    start: Instant,
    root_move: Move,
}

fn is_quiet(pos: &Position, mv: Move) -> bool {
    // "quiet" here means the target square holds no opponent piece, so
    // an en passant capture counts as quiet for pruning purposes
    !pos.color_occupancy(pos.side_to_move().flip()).get(mv.dst)
}

impl Searcher {
    #[must_use]
    pub fn new() -> Self {
        Self {
            tt: TranspositionTable::default(),
            killers: KillerTable::new(),
            history: HistoryTable::new(),
            stats: SearchStats::default(),
            start: Instant::now(),
            root_move: Move::NULL,
        }
    }

    pub fn new_game(&mut self) {
        self.tt.clear();
        self.killers.clear();
        self.history.clear();
    }

    pub fn resize_tt_mb(&mut self, mb: usize) {
        self.tt.resize_mb(mb);
    }

    #[must_use]
    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    /// Iterative deepening driver. Returns the move to play, or `None`
    /// when the side to move has no legal move at all.
    pub fn run(&mut self, pos: &Position, limiter: &SearchLimiter) -> Option<Move> {
        self.stats = SearchStats::default();
        self.start = Instant::now();
        self.root_move = Move::NULL;

        if generate(pos, false).is_empty() {
            return None;
        }

        let mut score = 0i32;
        let mut window = ASPIRATION_WINDOW;

        for depth in 1..=limiter.max_depth() {
            let (alpha, beta) = if depth >= 4 {
                (score - window, score + window)
            } else {
                (-INF, INF)
            };

            let mut result = self.alpha_beta(pos, depth, alpha, beta, 0, true);

            if result <= alpha || result >= beta {
                result = self.alpha_beta(pos, depth, -INF, INF, 0, true);
                window = ASPIRATION_WINDOW;
            } else {
                window = NARROWED_WINDOW;
            }

            score = result;
            self.print_info(depth, score);

            if score.abs() >= MATE - 1000 {
                break;
            }

            if limiter.should_stop(self.start.elapsed(), depth) {
                break;
            }
        }

        Some(self.root_move)
    }

    fn print_info(&self, depth: i32, score: i32) {
        let ms = self.start.elapsed().as_millis() as u64;
        let total = self.stats.nodes + self.stats.qnodes;
        let nps = if ms == 0 { 0 } else { total * 1000 / ms };

        print!("info depth {} score ", depth);

        if score.abs() >= MATE - 1000 {
            let mut mate_in = (MATE - score.abs() + 1) / 2;
            if score < 0 {
                mate_in = -mate_in;
            }
            print!("mate {}", mate_in);
        } else {
            print!("cp {}", score);
        }

        println!(
            " nodes {} nps {} pv {}",
            self.stats.nodes, nps, self.root_move
        );
    }

    fn alpha_beta(
        &mut self,
        pos: &Position,
        depth: i32,
        mut alpha: i32,
        beta: i32,
        ply: i32,
        null_ok: bool,
    ) -> i32 {
        self.stats.nodes += 1;

        let in_check = pos.in_check();
        let depth = if in_check { depth + 1 } else { depth };

        let mut tt_move = None;
        if let Some(entry) = self.tt.probe(pos.key()) {
            if entry.depth >= depth {
                match entry.bound {
                    Bound::Exact => {
                        if ply == 0 {
                            if let Some(hint) = entry.hint_move() {
                                self.root_move = hint;
                            }
                        }
                        return entry.score;
                    }
                    Bound::Alpha => {
                        if entry.score <= alpha {
                            return alpha;
                        }
                    }
                    Bound::Beta => {
                        if entry.score >= beta {
                            return beta;
                        }
                    }
                }
            }

            tt_move = entry.hint_move();
        }

        if depth <= 0 {
            return self.quiescence(pos, alpha, beta, 0);
        }

        if null_ok && !in_check && depth >= 3 && ply > 0 {
            let mut copy = pos.clone();
            copy.apply_null_move();

            let r = if depth > 6 { 3 } else { 2 };
            let score = -self.alpha_beta(&copy, depth - 1 - r, -beta, -beta + 1, ply + 1, false);

            if score >= beta {
                return beta;
            }
        }

        let mut moves = generate(pos, false);

        if moves.is_empty() {
            return if in_check { -MATE + ply } else { 0 };
        }

        ordering::score_moves(
            &mut moves,
            pos,
            tt_move,
            ply as usize,
            &self.killers,
            &self.history,
        );

        // seed the root move so a cutoff-riddled iteration still leaves
        // something playable behind
        if ply == 0 {
            self.root_move = moves[0];
        }

        let stm = pos.side_to_move();
        let orig_alpha = alpha;

        let mut best_score = -INF;
        let mut best_move = moves[0];
        let mut move_count = 0i32;

        for &mv in &moves {
            move_count += 1;

            let quiet = is_quiet(pos, mv);

            let mut reduction = 0;
            if move_count > 4 && depth >= 3 && !in_check && quiet && !mv.is_promotion() {
                reduction = if move_count > 12 {
                    3
                } else if move_count > 6 {
                    2
                } else {
                    1
                };

                // reduce killers and hot history moves one ply less
                if self.killers.is_killer(mv, ply as usize)
                    || self.history.get(stm, mv.src, mv.dst) > 5000
                {
                    reduction -= 1;
                }
            }

            let mut child = pos.clone();
            child.apply_move(mv);

            let mut score;
            let mut researched = false;

            if move_count == 1 {
                score =
                    -self.alpha_beta(&child, depth - 1 - reduction, -beta, -alpha, ply + 1, true);
            } else {
                score = -self.alpha_beta(
                    &child,
                    depth - 1 - reduction,
                    -alpha - 1,
                    -alpha,
                    ply + 1,
                    true,
                );

                if score > alpha && score < beta {
                    score = -self.alpha_beta(&child, depth - 1, -beta, -alpha, ply + 1, true);
                    researched = true;
                }
            }

            // a reduced search that beat alpha has to be confirmed at
            // full depth, unless the re-search above already did
            if reduction > 0 && score > alpha && !researched {
                score = -self.alpha_beta(&child, depth - 1, -beta, -alpha, ply + 1, true);
            }

            if score > best_score {
                best_score = score;
                best_move = mv;

                if ply == 0 {
                    self.root_move = mv;
                }
            }

            if score > alpha {
                alpha = score;

                if quiet {
                    self.history.update(stm, mv.src, mv.dst, depth);
                }
            }

            if alpha >= beta {
                if quiet {
                    self.killers.update(mv, ply as usize);
                }
                break;
            }

            if depth <= 2
                && !in_check
                && move_count > 8
                && quiet
                && eval::evaluate(pos) + 100 * depth < alpha
            {
                break;
            }
        }

        let bound = if best_score <= orig_alpha {
            Bound::Alpha
        } else if best_score >= beta {
            Bound::Beta
        } else {
            Bound::Exact
        };

        self.tt.store(pos.key(), depth, best_score, bound, best_move);

        best_score
    }

    fn quiescence(&mut self, pos: &Position, mut alpha: i32, beta: i32, qdepth: i32) -> i32 {
        self.stats.qnodes += 1;

        let stand_pat = eval::evaluate(pos);

        if stand_pat >= beta {
            return beta;
        }

        if stand_pat > alpha {
            alpha = stand_pat;
        }

        if qdepth <= -MAX_QDEPTH {
            return stand_pat;
        }

        let mut captures = generate(pos, true);
        ordering::score_moves(&mut captures, pos, None, 0, &self.killers, &self.history);

        for &mv in &captures {
            // delta pruning: skip captures that cannot plausibly catch
            // up to alpha once past the first extension ply
            let gain = if mv.piece == PieceType::PAWN { 200 } else { 900 };
            if stand_pat + gain < alpha && qdepth < -1 {
                continue;
            }

            let mut child = pos.clone();
            child.apply_move(mv);

            let score = -self.quiescence(&child, -beta, -alpha, qdepth - 1);

            if score >= beta {
                return beta;
            }

            if score > alpha {
                alpha = score;
            }
        }

        alpha
    }
}

impl Default for Searcher {
    fn default() -> Self {
        Self::new()
    }
}
