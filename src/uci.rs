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

use crate::limit::{SearchLimiter, SearchLimits, MAX_DEPTH, MIN_DEPTH};
use crate::perft;
use crate::position::Position;
use crate::search::Searcher;

const NAME: &str = "Lodestone";
const VERSION: &str = env!("CARGO_PKG_VERSION");
const AUTHORS: &str = env!("CARGO_PKG_AUTHORS");

const DEFAULT_DEPTH: i32 = 10;

const MIN_HASH_MB: usize = 1;
const MAX_HASH_MB: usize = 1024;

struct UciHandler {
    pos: Position,
    searcher: Searcher,
    depth_option: i32,
}

impl UciHandler {
    #[must_use]
    fn new() -> Self {
        Self {
            pos: Position::startpos(),
            searcher: Searcher::new(),
            depth_option: DEFAULT_DEPTH,
        }
    }

    fn run(&mut self) {
        let mut line = String::with_capacity(256);
        while let Ok(bytes) = std::io::stdin().read_line(&mut line) {
            if bytes == 0 {
                break;
            }

            let cmd: Vec<&str> = line.split_whitespace().collect();
            if cmd.is_empty() {
                line.clear();
                continue;
            }

            match cmd[0] {
                "uci" => self.handle_uci(),
                "setoption" => self.handle_setoption(&cmd[1..]),
                "isready" => println!("readyok"),
                "ucinewgame" => self.handle_ucinewgame(),
                "position" => self.handle_position(&cmd[1..]),
                "go" => self.handle_go(&cmd[1..]),
                "d" => self.handle_d(),
                "perft" => self.handle_perft(&cmd[1..], false),
                "splitperft" => self.handle_perft(&cmd[1..], true),
                "quit" => break,
                unknown => eprintln!("Unknown command '{}'", unknown),
            }

            line.clear();
        }
    }

    fn handle_uci(&self) {
        println!("id name {} {}", NAME, VERSION);
        println!("id author {}", AUTHORS.replace(':', ", "));
        println!(
            "option name Depth type spin default {} min {} max {}",
            DEFAULT_DEPTH, MIN_DEPTH, MAX_DEPTH
        );
        println!(
            "option name Hash type spin default 64 min {} max {}",
            MIN_HASH_MB, MAX_HASH_MB
        );
        println!("uciok");
    }

    fn handle_setoption(&mut self, args: &[&str]) {
        if args.len() < 2 || args[0] != "name" {
            eprintln!("Missing name");
            return;
        }

        let mut idx = 1usize;
        while idx < args.len() && args[idx] != "value" {
            idx += 1;
        }

        if idx + 1 >= args.len() {
            eprintln!("Missing value");
            return;
        }

        let name = args[1..idx].join(" ").to_ascii_lowercase();
        let value = args[idx + 1..].join(" ");

        match name.as_str() {
            "depth" => {
                if let Ok(depth) = value.parse::<i32>() {
                    self.depth_option = depth.clamp(MIN_DEPTH, MAX_DEPTH);
                } else {
                    eprintln!("Invalid depth");
                }
            }
            "hash" => {
                if let Ok(mb) = value.parse::<usize>() {
                    self.searcher
                        .resize_tt_mb(mb.clamp(MIN_HASH_MB, MAX_HASH_MB));
                } else {
                    eprintln!("Invalid hash size");
                }
            }
            // unknown options are ignored
            _ => {}
        }
    }

    fn handle_ucinewgame(&mut self) {
        self.pos.reset_to_startpos();
        self.searcher.new_game();
    }

    fn handle_position(&mut self, args: &[&str]) {
        if args.is_empty() {
            return;
        }

        let next = match args[0] {
            "startpos" => {
                self.pos.reset_to_startpos();
                1usize
            }
            "fen" => {
                let end = args
                    .iter()
                    .position(|&token| token == "moves")
                    .unwrap_or(args.len());

                if let Err(err) = self.pos.reset_from_fen_parts(&args[1..end]) {
                    eprintln!("{}", err);
                    return;
                }

                end
            }
            _ => return,
        };

        if args.len() <= next {
            return;
        } else if args[next] != "moves" {
            eprintln!("Unknown token '{}'", args[next]);
            return;
        }

        // a bad move is skipped; whatever applied so far stays
        for move_str in &args[next + 1..] {
            match self.pos.move_from_str(move_str) {
                Ok(mv) => self.pos.apply_move(mv),
                Err(err) => eprintln!("Skipping move '{}': {}", move_str, err),
            }
        }
    }

    fn handle_go(&mut self, args: &[&str]) {
        let mut limits = SearchLimits::default();

        let mut iter = args.iter();
        while let Some(&token) = iter.next() {
            match token {
                "depth" => limits.depth = iter.next().and_then(|v| v.parse().ok()),
                "movetime" => limits.movetime = iter.next().and_then(|v| v.parse().ok()),
                "wtime" => limits.wtime = iter.next().and_then(|v| v.parse().ok()),
                "btime" => limits.btime = iter.next().and_then(|v| v.parse().ok()),
                "winc" => limits.winc = iter.next().and_then(|v| v.parse().ok()),
                "binc" => limits.binc = iter.next().and_then(|v| v.parse().ok()),
                "movestogo" => limits.movestogo = iter.next().and_then(|v| v.parse().ok()),
                "infinite" => limits.infinite = true,
                _ => {}
            }
        }

        let limiter =
            SearchLimiter::resolve(&limits, self.pos.side_to_move(), self.depth_option);

        match self.searcher.run(&self.pos, &limiter) {
            Some(best) => println!("bestmove {}", best),
            None => println!("bestmove 0000"),
        }
    }

    fn handle_perft(&self, args: &[&str], split: bool) {
        let Some(depth) = args.first().and_then(|v| v.parse::<i32>().ok()) else {
            eprintln!("Missing depth");
            return;
        };

        if split {
            perft::split_perft(&self.pos, depth);
        } else {
            perft::perft(&self.pos, depth);
        }
    }

    fn handle_d(&self) {
        println!("{}", self.pos);
        println!();
        println!("Fen: {}", self.pos.to_fen());
        println!("Key: {:16x}", self.pos.key());
    }
}

pub fn run() {
    let mut handler = UciHandler::new();
    handler.run();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_startpos_applies_moves() {
        let mut handler = UciHandler::new();
        handler.handle_position(&["startpos", "moves", "e2e4", "e7e5"]);

        assert_eq!(
            handler.pos.to_fen(),
            "rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKB1R w KQkq e6 0 1"
        );
    }

    #[test]
    fn illegal_moves_are_skipped_but_prior_ones_stay() {
        let mut handler = UciHandler::new();
        handler.handle_position(&["startpos", "moves", "e2e4", "e2e5", "e7e5"]);

        // e2e5 is skipped, e2e4 and e7e5 survive
        assert_eq!(
            handler.pos.to_fen(),
            "rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKB1R w KQkq e6 0 1"
        );
    }

    #[test]
    fn position_fen_with_moves() {
        let mut handler = UciHandler::new();
        handler.handle_position(&[
            "fen", "4k3", "w", "-", "-", "0", "1", "moves", "e1e2",
        ]);

        // incomplete board FENs are rejected wholesale
        assert_eq!(handler.pos.key(), Position::startpos().key());

        handler.handle_position(&[
            "fen", "4k3/8/8/8/8/8/8/4K3", "w", "-", "-", "0", "1", "moves", "e1e2",
        ]);
        assert_eq!(handler.pos.to_fen(), "4k3/8/8/8/8/8/4K3/8 b - - 0 1");
    }

    #[test]
    fn ucinewgame_is_idempotent() {
        let mut handler = UciHandler::new();
        handler.handle_position(&["startpos", "moves", "e2e4"]);

        handler.handle_ucinewgame();
        let once = handler.pos.key();

        handler.handle_ucinewgame();
        assert_eq!(handler.pos.key(), once);
        assert_eq!(handler.pos.key(), Position::startpos().key());
    }

    #[test]
    fn setoption_clamps_depth() {
        let mut handler = UciHandler::new();

        handler.handle_setoption(&["name", "Depth", "value", "15"]);
        assert_eq!(handler.depth_option, 15);

        handler.handle_setoption(&["name", "Depth", "value", "99"]);
        assert_eq!(handler.depth_option, 30);

        handler.handle_setoption(&["name", "NoSuchOption", "value", "7"]);
        assert_eq!(handler.depth_option, 30);
    }
}
